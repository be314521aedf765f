// src/middleware/auth.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};

use crate::{common::error::AppError, config::AppState, models::auth::User};

// Extrator para obter o usuário autenticado diretamente nos handlers.
// Sem token, vale o auto-login demo (se ligado); token inválido é sempre 401.
pub struct AuthenticatedUser(pub User);

impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let bearer = TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state).await;

        match bearer {
            Ok(TypedHeader(Authorization(bearer))) => {
                let user = state.auth_service.validate_token(bearer.token())?;
                Ok(AuthenticatedUser(user))
            }
            Err(_) => state
                .auth_service
                .anonymous_user()
                .map(AuthenticatedUser)
                .ok_or(AppError::InvalidToken),
        }
    }
}

// Guardião das rotas do vendedor (seller ou admin)
pub struct SellerUser(pub User);

impl FromRequestParts<AppState> for SellerUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let AuthenticatedUser(user) = AuthenticatedUser::from_request_parts(parts, state).await?;

        if !user.role.can_sell() {
            tracing::debug!("Acesso de vendedor negado para {}", user.email);
            return Err(AppError::SellerOnly);
        }
        Ok(SellerUser(user))
    }
}
