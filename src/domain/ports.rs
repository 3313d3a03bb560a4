use crate::domain::model::{ApiResponse, PreparedRequest};
use crate::utils::error::Result;
use async_trait::async_trait;

/// 送出 HTTP 請求的抽象，方便測試時替換
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: PreparedRequest) -> Result<ApiResponse>;
}

pub trait ConfigProvider: Send + Sync {
    fn base_url(&self) -> &str;
    fn access_key(&self) -> Option<&str>;
    fn secret_key(&self) -> Option<&str>;
    fn timeout_seconds(&self) -> Option<u64>;
    fn user_agent(&self) -> Option<&str> {
        None
    }
}
