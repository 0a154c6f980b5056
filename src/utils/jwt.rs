//! OAuth state 令牌
//!
//! `authorize` 时签发，`token` 时校验，携带随机 nonce 和回跳地址，防止 CSRF。

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateClaims {
    pub nonce: String,
    pub redirect_uri: String,
    pub exp: usize,
    pub iat: usize,
}

pub struct StateToken;

impl StateToken {
    fn generate_nonce() -> String {
        let bytes: [u8; 16] = rand::rng().random();
        bytes.iter().map(|b| format!("{b:02x}")).collect()
    }

    // 签发 state
    pub fn issue(
        secret: &str,
        redirect_uri: &str,
        ttl_secs: i64,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = chrono::Utc::now();
        let claims = StateClaims {
            nonce: Self::generate_nonce(),
            redirect_uri: redirect_uri.to_string(),
            exp: (now + chrono::Duration::seconds(ttl_secs)).timestamp() as usize,
            iat: now.timestamp() as usize,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_ref()),
        )
    }

    // 校验 state，过期或签名不符都会失败
    pub fn verify(secret: &str, token: &str) -> Result<StateClaims, jsonwebtoken::errors::Error> {
        let mut validation = Validation::default();
        validation.leeway = 0;
        decode::<StateClaims>(
            token,
            &DecodingKey::from_secret(secret.as_ref()),
            &validation,
        )
        .map(|data| data.claims)
    }
}
