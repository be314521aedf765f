// src/services/auth.rs

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::{
    common::error::AppError,
    models::auth::{Claims, Role, User},
};

pub const DEMO_SELLER_EMAIL: &str = "demoseller@gmail.com";
pub const DEMO_BUYER_EMAIL: &str = "demobuyer@gmail.com";

/// Contas demo aceitas sem credenciais.
pub fn demo_user(email: &str) -> Option<User> {
    let (id, name, role) = match email.trim().to_lowercase().as_str() {
        DEMO_SELLER_EMAIL => ("demo-seller-id", "Demo Seller", Role::Admin),
        DEMO_BUYER_EMAIL => ("demo-buyer-id", "Demo Buyer", Role::Buyer),
        _ => return None,
    };

    Some(User {
        id: id.to_string(),
        email: email.trim().to_lowercase(),
        name: name.to_string(),
        role,
    })
}

#[derive(Clone)]
pub struct AuthService {
    jwt_secret: String,
    demo_auto_login: bool,
}

impl AuthService {
    pub fn new(jwt_secret: String, demo_auto_login: bool) -> Self {
        Self { jwt_secret, demo_auto_login }
    }

    pub fn demo_login(&self, email: &str) -> Result<(String, User), AppError> {
        let user = demo_user(email).ok_or_else(|| AppError::UnknownDemoAccount(email.to_string()))?;
        let token = self.create_token(&user)?;
        tracing::info!("🔑 Login demo: {} ({:?})", user.email, user.role);
        Ok((token, user))
    }

    pub fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        Ok(token_data.claims.into())
    }

    /// Usuário para requisições sem token: o vendedor demo, se o auto-login estiver ligado.
    pub fn anonymous_user(&self) -> Option<User> {
        if self.demo_auto_login {
            demo_user(DEMO_SELLER_EMAIL)
        } else {
            None
        }
    }

    pub fn create_token(&self, user: &User) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(7);

        let claims = Claims {
            sub: user.id.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}
