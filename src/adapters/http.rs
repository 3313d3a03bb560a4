use crate::domain::model::{ApiResponse, HttpMethod, PreparedRequest};
use crate::domain::ports::{ConfigProvider, Transport};
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, Method};
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = concat!("upbit-rest/", env!("CARGO_PKG_VERSION"));

/// reqwest 實作的 Transport
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        Self::with_options(None, None)
    }

    pub fn with_options(timeout: Option<Duration>, user_agent: Option<&str>) -> Result<Self> {
        let mut builder = Client::builder().user_agent(user_agent.unwrap_or(DEFAULT_USER_AGENT));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::with_options(
            config.timeout_seconds().map(Duration::from_secs),
            config.user_agent(),
        )
    }

    /// 使用呼叫端自行設定的 reqwest Client
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

fn to_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Delete => Method::DELETE,
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: PreparedRequest) -> Result<ApiResponse> {
        tracing::debug!(
            "📡 {} {} (signed: {})",
            request.method,
            request.url,
            request.bearer.is_some()
        );

        let mut builder = self
            .client
            .request(to_reqwest_method(request.method), &request.url)
            .header(ACCEPT, "application/json");

        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();

        Ok(ApiResponse { status, body })
    }
}
