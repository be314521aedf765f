// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

use crate::{
    db::{fixtures, MemoryStore, OfflineStore, PgStore, RemoteStore},
    services::{
        auth::AuthService,
        dashboard_service::DashboardService,
        inventory_service::InventoryService,
        operation_service::OperationsService,
        payment_service::{PaymentMode, PaymentService, DEFAULT_SOL_ADDRESS, DEFAULT_SPT_ADDRESS},
        wallet_service::WalletService,
    },
};

pub const MEMORY_DATABASE_URL: &str = "memory://";

// Configuração lida do ambiente (.env incluso)
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// `None` = sem banco: tudo roda em modo demo.
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub dashboard_refresh: Duration,
    pub demo_auto_login: bool,
    pub payment_mode: PaymentMode,
    pub sol_address: String,
    pub spt_address: String,
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let jwt_secret = var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;

        let refresh_secs = match var("DASHBOARD_REFRESH_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .with_context(|| format!("DASHBOARD_REFRESH_SECS inválido: {}", raw))?,
            None => 300,
        };
        anyhow::ensure!(refresh_secs > 0, "DASHBOARD_REFRESH_SECS deve ser maior que zero");

        let delay_ms = match var("PAYMENT_CONFIRMATION_DELAY_MS") {
            Some(raw) => raw
                .parse::<u64>()
                .with_context(|| format!("PAYMENT_CONFIRMATION_DELAY_MS inválido: {}", raw))?,
            None => 2000,
        };

        let payment_mode = match var("PAYMENT_MODE").as_deref() {
            None | Some("simulated") => PaymentMode::Simulated { delay: Duration::from_millis(delay_ms) },
            Some("onchain") => PaymentMode::OnChain,
            Some(other) => anyhow::bail!("PAYMENT_MODE desconhecido: {} (use simulated ou onchain)", other),
        };

        Ok(Self {
            database_url: var("DATABASE_URL"),
            jwt_secret,
            bind_addr: var("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
            dashboard_refresh: Duration::from_secs(refresh_secs),
            demo_auto_login: var("DEMO_AUTO_LOGIN").map(|v| parse_flag(&v)).unwrap_or(false),
            payment_mode,
            sol_address: var("POS_SOL_ADDRESS").unwrap_or_else(|| DEFAULT_SOL_ADDRESS.to_string()),
            spt_address: var("POS_SPT_ADDRESS").unwrap_or_else(|| DEFAULT_SPT_ADDRESS.to_string()),
        })
    }
}

// Escolhe o armazenamento remoto. Falha de conexão não impede a subida:
// o pool fica "lazy" e cada chamada tenta de novo (e cai no modo demo se falhar).
async fn connect_store(database_url: Option<&str>) -> anyhow::Result<Arc<dyn RemoteStore>> {
    let Some(url) = database_url else {
        tracing::warn!("⚠️ DATABASE_URL não definida: servindo apenas dados demo.");
        return Ok(Arc::new(OfflineStore));
    };

    if url == MEMORY_DATABASE_URL {
        tracing::info!("🧪 Usando armazenamento em memória (carregado com as fixtures).");
        let store = MemoryStore::new();
        fixtures::seed_memory_store(&store).await;
        return Ok(Arc::new(store));
    }

    let options = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(3));

    let pool = match options.clone().connect(url).await {
        Ok(pool) => {
            tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");
            pool
        }
        Err(e) => {
            tracing::warn!("⚠️ Falha ao conectar ao banco de dados ({}); tentando de novo a cada chamada.", e);
            options.connect_lazy(url).context("DATABASE_URL inválida")?
        }
    };

    Ok(Arc::new(PgStore::new(pool)))
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub auth_service: AuthService,
    pub dashboard_service: Arc<DashboardService>,
    pub operation_service: Arc<OperationsService>,
    pub inventory_service: Arc<InventoryService>,
    pub wallet_service: WalletService,
    pub payment_service: PaymentService,
}

impl AppState {
    pub async fn new(config: AppConfig) -> anyhow::Result<Self> {
        let store = connect_store(config.database_url.as_deref()).await?;
        Ok(Self::with_store(config, store))
    }

    // --- Monta o gráfico de dependências ---
    pub fn with_store(config: AppConfig, store: Arc<dyn RemoteStore>) -> Self {
        let auth_service = AuthService::new(config.jwt_secret.clone(), config.demo_auto_login);
        let payment_service = PaymentService::new(
            config.payment_mode,
            config.sol_address.clone(),
            config.spt_address.clone(),
        );

        Self {
            auth_service,
            dashboard_service: Arc::new(DashboardService::new(store.clone())),
            operation_service: Arc::new(OperationsService::new(store.clone())),
            inventory_service: Arc::new(InventoryService::new(store)),
            wallet_service: WalletService::new(),
            payment_service,
            config: Arc::new(config),
        }
    }

    /// Carga inicial dos hooks e início do polling do dashboard.
    pub async fn mount(&self) {
        tokio::join!(
            self.dashboard_service.mount(self.config.dashboard_refresh),
            self.operation_service.mount(),
            self.inventory_service.mount(),
        );
    }

    pub async fn unmount(&self) {
        self.dashboard_service.unmount().await;
        self.operation_service.unmount();
        self.inventory_service.unmount();
    }
}
