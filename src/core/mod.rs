pub mod auth;
pub mod client;
pub mod query;
pub mod request;

pub use crate::domain::model::{ApiResponse, HttpMethod, PreparedRequest};
pub use crate::domain::ports::{ConfigProvider, Transport};
pub use crate::utils::error::Result;
