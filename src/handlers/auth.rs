// src/handlers/auth.rs

use axum::{extract::State, Json};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::auth::{AuthResponse, DemoLoginPayload, User},
};

// POST /api/auth/demo-login
#[utoipa::path(
    post,
    path = "/api/auth/demo-login",
    tag = "Auth",
    request_body = DemoLoginPayload,
    responses(
        (status = 200, description = "Sessão da conta demo", body = AuthResponse),
        (status = 400, description = "E-mail inválido"),
        (status = 404, description = "Conta demo inexistente")
    )
)]
pub async fn demo_login(
    State(app_state): State<AppState>,
    Json(payload): Json<DemoLoginPayload>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.validate()?;

    let (token, user) = app_state.auth_service.demo_login(&payload.email)?;
    Ok(Json(AuthResponse { token, user }))
}

// Handler da rota protegida /me
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "Users",
    responses(
        (status = 200, description = "Usuário da sessão", body = User),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_me(AuthenticatedUser(user): AuthenticatedUser) -> Json<User> {
    Json(user)
}
