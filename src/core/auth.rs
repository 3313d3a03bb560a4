//! Upbit 私有 API 的 JWT 簽章。
//!
//! 每個 token 帶一個新的 UUID nonce；有查詢參數時另外附上
//! 查詢字串的 SHA-512 雜湊（`query_hash`），以 HS256 簽章。

use crate::utils::error::{Result, UpbitError};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512};
use std::fmt;
use uuid::Uuid;

pub const QUERY_HASH_ALG: &str = "SHA512";

#[derive(Clone)]
pub struct Credentials {
    access_key: String,
    secret_key: String,
}

impl Credentials {
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Result<Self> {
        let access_key = access_key.into();
        let secret_key = secret_key.into();

        if access_key.trim().is_empty() {
            return Err(UpbitError::auth("access key is empty"));
        }
        if secret_key.trim().is_empty() {
            return Err(UpbitError::auth("secret key is empty"));
        }

        Ok(Self {
            access_key,
            secret_key,
        })
    }

    pub fn access_key(&self) -> &str {
        &self.access_key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"***")
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub access_key: String,
    pub nonce: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_hash_alg: Option<String>,
}

pub struct TokenSigner {
    credentials: Credentials,
    key: EncodingKey,
}

impl TokenSigner {
    pub fn new(credentials: Credentials) -> Self {
        let key = EncodingKey::from_secret(credentials.secret_key.as_bytes());
        Self { credentials, key }
    }

    pub fn access_key(&self) -> &str {
        self.credentials.access_key()
    }

    /// 無查詢參數的請求用
    pub fn token(&self) -> Result<String> {
        self.sign(&self.claims(None))
    }

    /// `query` 必須與實際送出的查詢字串逐位元組相同
    pub fn token_with_query(&self, query: &str) -> Result<String> {
        if query.is_empty() {
            return self.token();
        }
        self.sign(&self.claims(Some(query)))
    }

    fn claims(&self, query: Option<&str>) -> TokenClaims {
        TokenClaims {
            access_key: self.credentials.access_key.clone(),
            nonce: Uuid::new_v4().to_string(),
            query_hash: query.map(query_hash),
            query_hash_alg: query.map(|_| QUERY_HASH_ALG.to_string()),
        }
    }

    fn sign(&self, claims: &TokenClaims) -> Result<String> {
        let token = encode(&Header::new(Algorithm::HS256), claims, &self.key)?;
        tracing::trace!(
            "🔑 Signed token for access key {} (query_hash: {})",
            claims.access_key,
            claims.query_hash.is_some()
        );
        Ok(token)
    }
}

impl fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSigner")
            .field("credentials", &self.credentials)
            .finish()
    }
}

pub fn query_hash(query: &str) -> String {
    hex::encode(Sha512::digest(query.as_bytes()))
}
