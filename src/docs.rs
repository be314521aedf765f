// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;
use crate::services;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::demo_login,

        // --- Users ---
        handlers::auth::get_me,

        // --- Dashboard ---
        handlers::dashboard::get_dashboard,
        handlers::dashboard::refresh_dashboard,

        // --- Orders ---
        handlers::operations::list_orders,
        handlers::operations::refresh_orders,
        handlers::operations::update_order_status,

        // --- Products ---
        handlers::inventory::list_products,
        handlers::inventory::refresh_products,
        handlers::inventory::create_product,
        handlers::inventory::update_product,

        // --- Wallet ---
        handlers::wallet::get_wallet,
        handlers::wallet::connect_wallet,
        handlers::wallet::disconnect_wallet,

        // --- POS ---
        handlers::pos::get_rates,
        handlers::pos::create_quote,
        handlers::pos::confirm_payment,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::User,
            models::auth::DemoLoginPayload,
            models::auth::AuthResponse,

            // --- Dashboard ---
            models::dashboard::DashboardStat,
            models::dashboard::SalesPoint,
            models::dashboard::RecommendationIcon,
            models::dashboard::RecommendationCard,
            services::dashboard_service::DashboardSnapshot,

            // --- Orders ---
            models::operations::OrderStatus,
            models::operations::Order,
            services::operation_service::OrdersSnapshot,
            handlers::operations::UpdateOrderStatusPayload,

            // --- Products ---
            models::inventory::ProductStatus,
            models::inventory::Product,
            models::inventory::NewProduct,
            models::inventory::ProductUpdate,
            services::inventory_service::ProductsSnapshot,
            services::inventory_service::ProductWrite,
            services::fallback::WriteOutcome,

            // --- Wallet ---
            models::wallet::WalletType,
            models::wallet::WalletStatus,
            models::wallet::ConnectWalletPayload,

            // --- POS ---
            models::payment::CurrencyRates,
            models::payment::PaymentRequest,
            models::payment::PaymentQuote,
            models::payment::PaymentStatus,
            models::payment::PaymentConfirmation,
        )
    ),
    tags(
        (name = "Auth", description = "Sessões das contas demo"),
        (name = "Users", description = "Dados do Usuário"),
        (name = "Dashboard", description = "Indicadores e Gráficos do Vendedor"),
        (name = "Orders", description = "Pedidos do Vendedor"),
        (name = "Products", description = "Catálogo de Produtos"),
        (name = "Wallet", description = "Carteiras Solana"),
        (name = "POS", description = "Pagamentos em cripto no PDV")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
