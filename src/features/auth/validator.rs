use super::model::{AuthenticatedUser, CustomClaims};
use crate::core::error::AppError;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Verifies HS256 bearer tokens and turns them into an [`AuthenticatedUser`]
pub struct JwtValidator {
    decoding_key: DecodingKey,
    #[cfg(test)]
    secret: String,
    issuer: String,
    audience: String,
    leeway: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iss: String,
    aud: String,
    iat: u64,
    exp: u64,
    #[serde(rename = "accountId", default, skip_serializing_if = "Option::is_none")]
    account_id: Option<String>,
    #[serde(rename = "https://sheet-catalog/claims", default)]
    custom_claims: Option<CustomClaims>,
}

impl JwtValidator {
    pub fn new(secret: &str, issuer: String, audience: String, leeway: Duration) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            #[cfg(test)]
            secret: secret.to_string(),
            issuer,
            audience,
            leeway: leeway.as_secs(),
        }
    }

    pub fn validate_token(&self, token: &str) -> Result<AuthenticatedUser, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.leeway = self.leeway;
        validation.validate_nbf = true;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| AppError::Auth(e.to_string()))?;

        let claims = token_data.claims;
        let roles = claims
            .custom_claims
            .map(|custom| custom.roles)
            .unwrap_or_default();
        let account_id = claims.account_id.unwrap_or_else(|| claims.sub.clone());

        Ok(AuthenticatedUser {
            account_id,
            sub: claims.sub,
            roles,
        })
    }

    /// Mint a token signed with this validator's secret, valid for one hour
    #[cfg(test)]
    pub fn issue_for_tests(&self, sub: &str, roles: &[&str]) -> String {
        self.issue_with(sub, roles, &self.issuer, 3600)
    }

    #[cfg(test)]
    fn issue_with(&self, sub: &str, roles: &[&str], issuer: &str, ttl_secs: i64) -> String {
        use jsonwebtoken::{encode, EncodingKey, Header};

        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: sub.to_string(),
            iss: issuer.to_string(),
            aud: self.audience.clone(),
            iat: now as u64,
            exp: (now + ttl_secs).max(0) as u64,
            account_id: None,
            custom_claims: Some(CustomClaims {
                roles: roles.iter().map(|r| r.to_string()).collect(),
            }),
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .unwrap()
    }
}
