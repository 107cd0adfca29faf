use crate::pool::MarketConfig;
use hmac::{Hmac, Mac};
use jwt::token::verified::VerifyWithKey;
use jwt::SignWithKey;
use market_core::model::UserRole;
use rocket::http::Status;
use rocket::request::{FromRequest, Outcome, Request};
use rocket::State;
use sha2::Sha256;
use std::collections::BTreeMap;
use std::str::FromStr;
use tracing::{info, warn};

/// A verified caller. The `role` claim inside the signed token is the
/// capability check for admin routes; the core never re-derives trust.
#[derive(Debug)]
pub struct MerchantToken {
    pub user_id: String,
    pub role: UserRole,
}

#[derive(Debug)]
pub struct AdminToken {
    pub user_id: String,
}

#[derive(Debug)]
pub enum AuthTokenError {
    Missing,
    Invalid,
    Forbidden,
}

pub fn generate_token(
    user_id: &str,
    email: &str,
    role: UserRole,
    jwt_key: &str,
) -> Result<String, String> {
    let key: Hmac<Sha256> = match Hmac::new_from_slice(jwt_key.as_bytes()) {
        Ok(key) => key,
        Err(error) => {
            warn!("Invalid key: {}", error);
            return Err("Invalid key".to_string());
        }
    };
    let role = role.to_string();
    let mut claims: BTreeMap<&str, &str> = BTreeMap::new();
    claims.insert("user_id", user_id);
    claims.insert("email", email);
    claims.insert("role", &role);

    let expiry = chrono::Local::now()
        .checked_add_days(chrono::Days::new(1))
        .unwrap()
        .to_string();

    claims.insert("expiry", &expiry);

    match claims.sign_with_key(&key) {
        Ok(token) => Ok(token),
        Err(error) => Err(error.to_string()),
    }
}

pub fn verify_token(token: &str, jwt_key: &str) -> Result<(String, UserRole), AuthTokenError> {
    let key: Hmac<Sha256> = match Hmac::new_from_slice(jwt_key.as_bytes()) {
        Ok(key) => key,
        Err(error) => {
            warn!("Faulty JWT key: {}", error);
            return Err(AuthTokenError::Invalid);
        }
    };
    let claims: BTreeMap<String, String> = match token.verify_with_key(&key) {
        Ok(claims) => claims,
        Err(error) => {
            info!("JWT verification error: {}", error);
            return Err(AuthTokenError::Invalid);
        }
    };
    let (user_id, role, expiry) = match (
        claims.get("user_id"),
        claims.get("role"),
        claims.get("expiry"),
    ) {
        (Some(user_id), Some(role), Some(expiry)) => (user_id, role, expiry),
        _ => {
            warn!("JWT token is missing claims");
            return Err(AuthTokenError::Invalid);
        }
    };
    let expiry: chrono::DateTime<chrono::Local> = match chrono::DateTime::from_str(expiry) {
        Ok(expiry) => expiry,
        Err(error) => {
            warn!("Bad expiry string: {}", error);
            return Err(AuthTokenError::Invalid);
        }
    };
    if chrono::Local::now().gt(&expiry) {
        info!("JWT token is expired");
        return Err(AuthTokenError::Invalid);
    }
    let role = match UserRole::from_str(role) {
        Ok(role) => role,
        Err(_) => {
            warn!("Unrecognized role in JWT token");
            return Err(AuthTokenError::Invalid);
        }
    };
    Ok((user_id.to_owned(), role))
}

fn bearer_token<'r>(request: &'r Request<'_>) -> Option<&'r str> {
    let header = request.headers().get_one("Authorization")?;
    match header.strip_prefix("Bearer ") {
        Some(token) => Some(token),
        None => Some(header),
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for MerchantToken {
    type Error = AuthTokenError;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let token = match bearer_token(request) {
            Some(token) => token,
            None => return Outcome::Error((Status::Unauthorized, AuthTokenError::Missing)),
        };
        let config = match request.guard::<&State<MarketConfig>>().await {
            Outcome::Success(config) => config,
            _ => return Outcome::Error((Status::InternalServerError, AuthTokenError::Invalid)),
        };
        match verify_token(token, &config.jwt_key) {
            Ok((user_id, role)) => Outcome::Success(MerchantToken { user_id, role }),
            Err(error) => Outcome::Error((Status::Unauthorized, error)),
        }
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AdminToken {
    type Error = AuthTokenError;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        match request.guard::<MerchantToken>().await {
            Outcome::Success(token) => {
                if token.role == UserRole::Admin {
                    Outcome::Success(AdminToken {
                        user_id: token.user_id,
                    })
                } else {
                    Outcome::Error((Status::Forbidden, AuthTokenError::Forbidden))
                }
            }
            Outcome::Error(error) => Outcome::Error(error),
            Outcome::Forward(status) => Outcome::Forward(status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_roundtrip_keeps_identity_and_role() {
        let token = generate_token("u1", "u1@example.com", UserRole::Merchant, "test-key")
            .expect("token should sign");
        let (user_id, role) = verify_token(&token, "test-key").expect("token should verify");
        assert_eq!(user_id, "u1");
        assert_eq!(role, UserRole::Merchant);
    }

    #[test]
    fn tampered_key_is_rejected() {
        let token =
            generate_token("u1", "u1@example.com", UserRole::Admin, "test-key").unwrap();
        assert!(verify_token(&token, "other-key").is_err());
    }
}
