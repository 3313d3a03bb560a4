use crate::core::auth::TokenSigner;
use crate::core::query::{encode_query, parse_query, sort_pairs, to_query_pairs, QueryPairs};
use crate::domain::model::{HttpMethod, PreparedRequest};
use crate::utils::error::{Result, UpbitError};
use serde::Serialize;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// 公開行情，不帶 Authorization
    Public,
    /// 私有 API，需要 Bearer token
    Signed,
}

#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: HttpMethod,
    path: String,
    query: QueryPairs,
    auth: AuthMode,
}

impl ApiRequest {
    pub fn public(method: HttpMethod, path: impl Into<String>) -> Self {
        Self::new(method, path.into(), AuthMode::Public)
    }

    pub fn signed(method: HttpMethod, path: impl Into<String>) -> Self {
        Self::new(method, path.into(), AuthMode::Signed)
    }

    fn new(method: HttpMethod, path: String, auth: AuthMode) -> Self {
        // 路徑中已帶的參數（如 `?isDetails=true`）併入 query
        let (path, query) = match path.split_once('?') {
            Some((path, raw)) => (path.to_string(), parse_query(raw)),
            None => (path, Vec::new()),
        };

        Self {
            method,
            path,
            query,
            auth,
        }
    }

    pub fn with_query<T: Serialize + ?Sized>(mut self, query: &T) -> Result<Self> {
        self.query.extend(to_query_pairs(query)?);
        sort_pairs(&mut self.query);
        Ok(self)
    }

    pub fn with_pairs<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.query
            .extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
        sort_pairs(&mut self.query);
        self
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// 送出與簽章共用同一份字串
    pub fn query_string(&self) -> String {
        encode_query(&self.query)
    }

    pub fn url(&self, base_url: &str) -> Result<Url> {
        let base = Url::parse(base_url)?;
        if base.cannot_be_a_base() {
            return Err(UpbitError::ConfigError {
                message: format!("Base URL cannot carry a path: {}", base_url),
            });
        }

        let mut url = Url::parse(&format!(
            "{}/{}",
            base.as_str().trim_end_matches('/'),
            self.path.trim_start_matches('/')
        ))?;

        let query = self.query_string();
        url.set_query(if query.is_empty() { None } else { Some(&query) });
        Ok(url)
    }

    pub fn prepare(&self, base_url: &str, signer: Option<&TokenSigner>) -> Result<PreparedRequest> {
        let url = self.url(base_url)?;

        let bearer = match self.auth {
            AuthMode::Public => None,
            AuthMode::Signed => {
                let signer = signer.ok_or_else(|| {
                    UpbitError::auth(format!(
                        "{} {} requires API credentials",
                        self.method, self.path
                    ))
                })?;
                Some(signer.token_with_query(url.query().unwrap_or(""))?)
            }
        };

        Ok(PreparedRequest {
            method: self.method,
            url: url.to_string(),
            bearer,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::auth::{query_hash, Credentials, TokenClaims};
    use crate::domain::model::{OrderChanceQuery, OrderLookup};
    use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
    use std::collections::HashSet;

    const BASE: &str = "https://api.upbit.com";

    fn signer() -> TokenSigner {
        TokenSigner::new(Credentials::new("ak", "sk").unwrap())
    }

    fn claims(token: &str) -> TokenClaims {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims = HashSet::new();
        validation.validate_exp = false;
        validation.validate_aud = false;
        decode::<TokenClaims>(token, &DecodingKey::from_secret(b"sk"), &validation)
            .unwrap()
            .claims
    }

    #[test]
    fn test_public_request_url() {
        let request = ApiRequest::public(HttpMethod::Get, "/v1/candles/days")
            .with_pairs([("market", "KRW-BTC"), ("count", "2")]);

        let prepared = request.prepare(BASE, None).unwrap();
        assert_eq!(
            prepared.url,
            "https://api.upbit.com/v1/candles/days?count=2&market=KRW-BTC"
        );
        assert!(prepared.bearer.is_none());
    }

    #[test]
    fn test_embedded_path_query_is_kept() {
        let request = ApiRequest::public(HttpMethod::Get, "/v1/market/all?isDetails=true");
        assert_eq!(request.path(), "/v1/market/all");
        assert_eq!(
            request.url(BASE).unwrap().as_str(),
            "https://api.upbit.com/v1/market/all?isDetails=true"
        );
    }

    #[test]
    fn test_embedded_path_query_merges_with_added_pairs() {
        let request = ApiRequest::signed(HttpMethod::Get, "/v1/orders/chance?isDetails=true")
            .with_pairs([("count", "1")])
            .with_query(&OrderChanceQuery::new("KRW-BTC"))
            .unwrap();

        let expected = "count=1&isDetails=true&market=KRW-BTC";
        assert_eq!(request.query_string(), expected);

        let prepared = request.prepare(BASE, Some(&signer())).unwrap();
        assert_eq!(
            prepared.url,
            format!("https://api.upbit.com/v1/orders/chance?{}", expected)
        );
        let claims = claims(prepared.bearer.as_deref().unwrap());
        assert_eq!(claims.query_hash, Some(query_hash(expected)));
    }

    #[test]
    fn test_base_url_with_prefix_and_trailing_slash() {
        let request = ApiRequest::public(HttpMethod::Get, "/v1/accounts");
        assert_eq!(
            request.url("http://127.0.0.1:9000/proxy/").unwrap().as_str(),
            "http://127.0.0.1:9000/proxy/v1/accounts"
        );
    }

    #[test]
    fn test_signed_request_hashes_wire_query() {
        let request = ApiRequest::signed(HttpMethod::Get, "/v1/orders/chance")
            .with_query(&OrderChanceQuery::new("KRW-BTC"))
            .unwrap();

        let prepared = request.prepare(BASE, Some(&signer())).unwrap();
        let url = Url::parse(&prepared.url).unwrap();
        assert_eq!(url.query(), Some("market=KRW-BTC"));

        let claims = claims(prepared.bearer.as_deref().unwrap());
        assert_eq!(claims.access_key, "ak");
        assert_eq!(claims.query_hash, Some(query_hash("market=KRW-BTC")));
    }

    #[test]
    fn test_signed_request_without_query_has_no_hash() {
        let prepared = ApiRequest::signed(HttpMethod::Get, "/v1/accounts")
            .prepare(BASE, Some(&signer()))
            .unwrap();

        assert_eq!(prepared.url, "https://api.upbit.com/v1/accounts");
        assert!(claims(prepared.bearer.as_deref().unwrap()).query_hash.is_none());
    }

    #[test]
    fn test_signed_request_without_signer_fails() {
        let request = ApiRequest::signed(HttpMethod::Delete, "/v1/order")
            .with_query(&OrderLookup::by_uuid("abc"))
            .unwrap();

        let err = request.prepare(BASE, None).unwrap_err();
        assert!(matches!(err, UpbitError::AuthError { .. }));
    }

    #[test]
    fn test_invalid_base_url() {
        let request = ApiRequest::public(HttpMethod::Get, "/v1/accounts");
        assert!(matches!(
            request.url("not a url"),
            Err(UpbitError::UrlError(_))
        ));
        assert!(request.url("mailto:ops@example.com").is_err());
    }
}
