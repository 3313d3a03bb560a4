use crate::adapters::http::HttpTransport;
use crate::core::auth::{Credentials, TokenSigner};
use crate::core::request::ApiRequest;
use crate::domain::model::{
    CandleQuery, DayCandleQuery, HttpMethod, MinuteUnit, NewOrder, OrderChanceQuery, OrderLookup,
    OrdersQuery,
};
use crate::domain::ports::{ConfigProvider, Transport};
use crate::utils::error::Result;
use crate::utils::validation::{validate_required_field, validate_url, Validate};

pub mod endpoints {
    pub const ACCOUNTS: &str = "/v1/accounts";
    pub const ORDER_CHANCE: &str = "/v1/orders/chance";
    pub const ORDER: &str = "/v1/order";
    pub const ORDERS: &str = "/v1/orders";
    pub const MARKET_ALL: &str = "/v1/market/all?isDetails=true";
    pub const CANDLES_MINUTES: &str = "/v1/candles/minutes";
    pub const CANDLES_DAYS: &str = "/v1/candles/days";
    pub const CANDLES_WEEKS: &str = "/v1/candles/weeks";
    pub const CANDLES_MONTHS: &str = "/v1/candles/months";
}

/// Upbit REST 客戶端。每個方法送出一個請求，回傳原始 body。
pub struct UpbitClient<T: Transport = HttpTransport> {
    base_url: String,
    signer: Option<TokenSigner>,
    transport: T,
}

impl UpbitClient<HttpTransport> {
    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let transport = HttpTransport::from_config(config)?;
        let credentials = credentials_from_config(config)?;
        Self::new(config.base_url(), credentials, transport)
    }
}

impl<T: Transport> UpbitClient<T> {
    pub fn new(
        base_url: impl Into<String>,
        credentials: Option<Credentials>,
        transport: T,
    ) -> Result<Self> {
        let base_url = base_url.into();
        validate_url("base_url", &base_url)?;

        if credentials.is_none() {
            tracing::debug!("No API credentials configured; only public endpoints are available");
        }

        Ok(Self {
            base_url,
            signer: credentials.map(TokenSigner::new),
            transport,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn has_credentials(&self) -> bool {
        self.signer.is_some()
    }

    /// 送出任意請求並回傳原始 body。非 2xx 回應也照樣回傳 body。
    pub async fn execute(&self, request: ApiRequest) -> Result<Vec<u8>> {
        let prepared = request.prepare(&self.base_url, self.signer.as_ref())?;

        let response = self.transport.send(prepared).await?;
        tracing::debug!(
            "📡 {} {} -> {} ({} bytes)",
            request.method(),
            request.path(),
            response.status,
            response.body.len()
        );

        if !response.is_success() {
            tracing::warn!(
                "⚠️ {} {} returned status {}",
                request.method(),
                request.path(),
                response.status
            );
        }

        Ok(response.body)
    }

    /// 全部帳戶餘額
    pub async fn get_accounts(&self) -> Result<Vec<u8>> {
        self.execute(ApiRequest::signed(HttpMethod::Get, endpoints::ACCOUNTS))
            .await
    }

    pub async fn get_order_chance(&self, query: &OrderChanceQuery) -> Result<Vec<u8>> {
        query.validate()?;
        let request =
            ApiRequest::signed(HttpMethod::Get, endpoints::ORDER_CHANCE).with_query(query)?;
        self.execute(request).await
    }

    pub async fn get_order(&self, query: &OrderLookup) -> Result<Vec<u8>> {
        query.validate()?;
        let request = ApiRequest::signed(HttpMethod::Get, endpoints::ORDER).with_query(query)?;
        self.execute(request).await
    }

    pub async fn get_orders(&self, query: &OrdersQuery) -> Result<Vec<u8>> {
        query.validate()?;
        let request = ApiRequest::signed(HttpMethod::Get, endpoints::ORDERS).with_query(query)?;
        self.execute(request).await
    }

    pub async fn cancel_order(&self, query: &OrderLookup) -> Result<Vec<u8>> {
        query.validate()?;
        let request =
            ApiRequest::signed(HttpMethod::Delete, endpoints::ORDER).with_query(query)?;
        self.execute(request).await
    }

    /// 下單。參數以查詢字串送出，與簽章雜湊一致。
    pub async fn place_order(&self, order: &NewOrder) -> Result<Vec<u8>> {
        order.validate()?;
        tracing::info!(
            "📝 Placing {:?} {:?} order on {}",
            order.ord_type,
            order.side,
            order.market
        );
        let request = ApiRequest::signed(HttpMethod::Post, endpoints::ORDERS).with_query(order)?;
        self.execute(request).await
    }

    /// 可交易的市場列表（含警示資訊）
    pub async fn get_market_codes(&self) -> Result<Vec<u8>> {
        self.execute(ApiRequest::public(HttpMethod::Get, endpoints::MARKET_ALL))
            .await
    }

    pub async fn get_minute_candles(
        &self,
        query: &CandleQuery,
        unit: MinuteUnit,
    ) -> Result<Vec<u8>> {
        query.validate()?;
        let path = format!("{}/{}", endpoints::CANDLES_MINUTES, unit);
        let request = ApiRequest::public(HttpMethod::Get, path).with_query(query)?;
        self.execute(request).await
    }

    pub async fn get_day_candles(&self, query: &DayCandleQuery) -> Result<Vec<u8>> {
        query.validate()?;
        let request =
            ApiRequest::public(HttpMethod::Get, endpoints::CANDLES_DAYS).with_query(query)?;
        self.execute(request).await
    }

    pub async fn get_week_candles(&self, query: &CandleQuery) -> Result<Vec<u8>> {
        query.validate()?;
        let request =
            ApiRequest::public(HttpMethod::Get, endpoints::CANDLES_WEEKS).with_query(query)?;
        self.execute(request).await
    }

    pub async fn get_month_candles(&self, query: &CandleQuery) -> Result<Vec<u8>> {
        query.validate()?;
        let request =
            ApiRequest::public(HttpMethod::Get, endpoints::CANDLES_MONTHS).with_query(query)?;
        self.execute(request).await
    }
}

/// 兩把 key 都沒設定時視為只用公開 API；只設定一把則是設定錯誤
pub fn credentials_from_config<C: ConfigProvider>(config: &C) -> Result<Option<Credentials>> {
    let (access_key, secret_key) = (config.access_key(), config.secret_key());
    if access_key.is_none() && secret_key.is_none() {
        return Ok(None);
    }

    let access_key = validate_required_field("access_key", &access_key)?;
    let secret_key = validate_required_field("secret_key", &secret_key)?;
    Credentials::new(*access_key, *secret_key).map(Some)
}
