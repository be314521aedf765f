// src/models/auth.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Buyer,
    Seller,
    Admin,
}

impl Role {
    /// Vendedores e administradores gerenciam produtos e pedidos.
    pub fn can_sell(self) -> bool {
        matches!(self, Role::Seller | Role::Admin)
    }
}

// O usuário vem do provedor de identidade; aqui só o lemos do token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct User {
    #[schema(example = "demo-seller-id")]
    pub id: String,
    #[schema(example = "demoseller@gmail.com")]
    pub email: String,
    #[schema(example = "Demo Seller")]
    pub name: String,
    pub role: Role,
}

// Login das contas demo (sem senha)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct DemoLoginPayload {
    #[validate(email(message = "The e-mail is invalid."))]
    #[schema(example = "demoseller@gmail.com")]
    pub email: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,   // Subject (ID do usuário)
    pub email: String,
    pub name: String,
    pub role: Role,
    pub exp: usize, // Expiration time (quando o token expira)
    pub iat: usize, // Issued At (quando o token foi criado)
}

impl From<Claims> for User {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            email: claims.email,
            name: claims.name,
            role: claims.role,
        }
    }
}
