// src/models/dashboard.rs

use serde::{Deserialize, Serialize};
use rust_decimal::Decimal;
use utoipa::ToSchema;

// 1. Os Cards do Topo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStat {
    #[schema(example = "45231.89")]
    pub total_revenue: Decimal,
    pub revenue_change: f64,
    pub total_orders: u64,
    pub orders_change: f64,
    pub new_customers: u64,
    pub customers_change: f64,
    pub active_products: u64,
    pub new_products: u64,
}

// 2. Gráfico de Vendas (ordem = eixo do gráfico)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SalesPoint {
    #[schema(example = "Jan")]
    pub name: String,
    pub total: Decimal,
}

// 3. Recomendações do painel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum RecommendationIcon {
    TrendingUp,
    AlertCircle,
    Calendar,
}

impl RecommendationIcon {
    /// Nome do ícone (lucide) que a interface desenha para cada tipo.
    pub fn lucide_name(self) -> &'static str {
        match self {
            RecommendationIcon::TrendingUp => "trending-up",
            RecommendationIcon::AlertCircle => "alert-circle",
            RecommendationIcon::Calendar => "calendar",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Recommendation {
    pub title: String,
    pub description: String,
    pub icon: RecommendationIcon,
}

// O que a API devolve: a recomendação com o ícone já resolvido.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationCard {
    pub title: String,
    pub description: String,
    pub icon: RecommendationIcon,
    #[schema(example = "trending-up")]
    pub icon_name: String,
}

impl From<&Recommendation> for RecommendationCard {
    fn from(recommendation: &Recommendation) -> Self {
        Self {
            title: recommendation.title.clone(),
            description: recommendation.description.clone(),
            icon: recommendation.icon,
            icon_name: recommendation.icon.lucide_name().to_string(),
        }
    }
}
