//src/main.rs

use axum::{
    routing::{get, patch, post},
    Router,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::{
    config::{AppConfig, AppState},
    docs::ApiDoc,
};

fn app(app_state: AppState) -> Router {
    // Rotas públicas de autenticação
    let auth_routes = Router::new()
        .route("/demo-login", post(handlers::auth::demo_login));

    let user_routes = Router::new()
        .route("/me", get(handlers::auth::get_me));

    let dashboard_routes = Router::new()
        .route("/", get(handlers::dashboard::get_dashboard))
        .route("/refresh", post(handlers::dashboard::refresh_dashboard));

    let order_routes = Router::new()
        .route("/", get(handlers::operations::list_orders))
        .route("/refresh", post(handlers::operations::refresh_orders))
        .route("/{order_id}/status", patch(handlers::operations::update_order_status));

    let product_routes = Router::new()
        .route("/"
               ,get(handlers::inventory::list_products)
               .post(handlers::inventory::create_product)
        )
        .route("/refresh", post(handlers::inventory::refresh_products))
        .route("/{product_id}", patch(handlers::inventory::update_product));

    let wallet_routes = Router::new()
        .route("/", get(handlers::wallet::get_wallet))
        .route("/connect", post(handlers::wallet::connect_wallet))
        .route("/disconnect", post(handlers::wallet::disconnect_wallet));

    let pos_routes = Router::new()
        .route("/rates", get(handlers::pos::get_rates))
        .route("/quote", post(handlers::pos::create_quote))
        .route("/confirm", post(handlers::pos::confirm_payment));

    // Combina tudo no router principal
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .nest("/api/dashboard", dashboard_routes)
        .nest("/api/orders", order_routes)
        .nest("/api/products", product_routes)
        .nest("/api/wallet", wallet_routes)
        .nest("/api/pos", pos_routes)
        .with_state(app_state)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("🔥 Falha ao escutar o sinal de desligamento: {}", e);
    }
    tracing::info!("🛑 Desligando o servidor...");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Inicializa o logger (RUST_LOG controla o nível; padrão "info")
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    // Se a configuração falhar, a aplicação não deve iniciar.
    let config = AppConfig::from_env()?;
    let addr = config.bind_addr.clone();

    let app_state = AppState::new(config).await?;
    app_state.mount().await;

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);

    axum::serve(listener, app(app_state.clone()))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Para o polling e descarta respostas que ainda estiverem a caminho
    app_state.unmount().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::OfflineStore,
        services::auth::{DEMO_BUYER_EMAIL, DEMO_SELLER_EMAIL},
    };
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    // Sobe o router numa porta efêmera e devolve a linha de status da resposta.
    async fn post_status(path: &str, login_as: Option<&str>) -> String {
        let config = AppConfig::from_lookup(|key| (key == "JWT_SECRET").then(|| "s".to_string())).unwrap();
        let state = AppState::with_store(config, Arc::new(OfflineStore));
        let token = login_as.map(|email| state.auth_service.demo_login(email).unwrap().0);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app(state)).await });

        let auth = token.map(|t| format!("Authorization: Bearer {}\r\n", t)).unwrap_or_default();
        let request = format!(
            "POST {} HTTP/1.1\r\nHost: localhost\r\n{}Content-Length: 0\r\nConnection: close\r\n\r\n",
            path, auth
        );

        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        stream.write_all(request.as_bytes()).await.unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        response.lines().next().unwrap_or_default().to_string()
    }

    #[tokio::test]
    async fn product_refresh_requires_a_seller() {
        assert!(post_status("/api/products/refresh", None).await.contains("401"));
        assert!(post_status("/api/products/refresh", Some(DEMO_BUYER_EMAIL)).await.contains("403"));
        assert!(post_status("/api/products/refresh", Some(DEMO_SELLER_EMAIL)).await.contains("200"));
    }
}
