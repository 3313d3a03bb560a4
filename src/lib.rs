pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::CliConfig;

pub use crate::adapters::http::HttpTransport;
pub use crate::config::{toml_config::TomlConfig, ClientConfig};
pub use crate::core::{
    auth::{Credentials, TokenSigner},
    client::UpbitClient,
    request::{ApiRequest, AuthMode},
};
pub use crate::domain::model::{
    CandleQuery, DayCandleQuery, MinuteUnit, NewOrder, OrderBy, OrderChanceQuery, OrderLookup,
    OrderSide, OrderState, OrderType, OrdersQuery,
};
pub use crate::utils::error::{Result, UpbitError};
