use crate::utils::error::{Result, UpbitError};
use crate::utils::validation::Validate;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// 單次請求的最大 K 線數量
pub const MAX_CANDLE_COUNT: u32 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    /// 買入
    Bid,
    /// 賣出
    Ask,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    Limit,
    /// 市價買入（指定總金額）
    Price,
    /// 市價賣出（指定數量）
    Market,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OrderState {
    Wait,
    Watch,
    Done,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OrderBy {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 已簽章、可直接送出的請求
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    pub method: HttpMethod,
    pub url: String,
    pub bearer: Option<String>,
}

/// 原始回應；body 不做任何解析
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// 分鐘 K 線支援的單位
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MinuteUnit {
    One,
    Three,
    Five,
    Ten,
    Fifteen,
    Thirty,
    Sixty,
    TwoHundredForty,
}

impl MinuteUnit {
    pub fn minutes(self) -> u32 {
        match self {
            MinuteUnit::One => 1,
            MinuteUnit::Three => 3,
            MinuteUnit::Five => 5,
            MinuteUnit::Ten => 10,
            MinuteUnit::Fifteen => 15,
            MinuteUnit::Thirty => 30,
            MinuteUnit::Sixty => 60,
            MinuteUnit::TwoHundredForty => 240,
        }
    }
}

impl TryFrom<u32> for MinuteUnit {
    type Error = UpbitError;

    fn try_from(value: u32) -> Result<Self> {
        match value {
            1 => Ok(MinuteUnit::One),
            3 => Ok(MinuteUnit::Three),
            5 => Ok(MinuteUnit::Five),
            10 => Ok(MinuteUnit::Ten),
            15 => Ok(MinuteUnit::Fifteen),
            30 => Ok(MinuteUnit::Thirty),
            60 => Ok(MinuteUnit::Sixty),
            240 => Ok(MinuteUnit::TwoHundredForty),
            other => Err(UpbitError::validation(format!(
                "Unsupported minute unit: {} (expected one of 1, 3, 5, 10, 15, 30, 60, 240)",
                other
            ))),
        }
    }
}

impl std::str::FromStr for MinuteUnit {
    type Err = UpbitError;

    fn from_str(s: &str) -> Result<Self> {
        let value: u32 = s
            .trim()
            .parse()
            .map_err(|_| UpbitError::validation(format!("Invalid minute unit: {}", s)))?;
        MinuteUnit::try_from(value)
    }
}

impl fmt::Display for MinuteUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.minutes())
    }
}

/// 市場下單可用資訊（手續費、最小下單額）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderChanceQuery {
    pub market: String,
}

impl OrderChanceQuery {
    pub fn new(market: impl Into<String>) -> Self {
        Self {
            market: market.into(),
        }
    }
}

impl Validate for OrderChanceQuery {
    fn validate(&self) -> Result<()> {
        require_market(&self.market)
    }
}

/// 以 UUID 或自訂 identifier 指定單一訂單（查詢與取消共用）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderLookup {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
}

impl OrderLookup {
    pub fn by_uuid(uuid: impl Into<String>) -> Self {
        Self {
            uuid: Some(uuid.into()),
            identifier: None,
        }
    }

    pub fn by_identifier(identifier: impl Into<String>) -> Self {
        Self {
            uuid: None,
            identifier: Some(identifier.into()),
        }
    }
}

impl Validate for OrderLookup {
    fn validate(&self) -> Result<()> {
        if !is_present(&self.uuid) && !is_present(&self.identifier) {
            return Err(UpbitError::validation(
                "Either uuid or identifier is required to look up an order",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrdersQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market: Option<String>,
    #[serde(rename = "uuids[]", default, skip_serializing_if = "Vec::is_empty")]
    pub uuids: Vec<String>,
    #[serde(rename = "identifiers[]", default, skip_serializing_if = "Vec::is_empty")]
    pub identifiers: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<OrderState>,
    #[serde(rename = "states[]", default, skip_serializing_if = "Vec::is_empty")]
    pub states: Vec<OrderState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_by: Option<OrderBy>,
}

impl Validate for OrdersQuery {
    fn validate(&self) -> Result<()> {
        if self.state.is_some() && !self.states.is_empty() {
            return Err(UpbitError::validation(
                "state and states[] cannot be combined",
            ));
        }
        if let Some(limit) = self.limit {
            if limit == 0 || limit > 100 {
                return Err(UpbitError::validation(format!(
                    "limit must be between 1 and 100, got {}",
                    limit
                )));
            }
        }
        if self.page == Some(0) {
            return Err(UpbitError::validation("page starts at 1"));
        }
        Ok(())
    }
}

/// 下單參數；數量與價格以字串傳遞，避免浮點誤差
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrder {
    pub market: String,
    pub side: OrderSide,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    pub ord_type: OrderType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
}

impl NewOrder {
    pub fn limit(
        market: impl Into<String>,
        side: OrderSide,
        volume: impl Into<String>,
        price: impl Into<String>,
    ) -> Self {
        Self {
            market: market.into(),
            side,
            volume: Some(volume.into()),
            price: Some(price.into()),
            ord_type: OrderType::Limit,
            identifier: None,
        }
    }

    pub fn market_buy(market: impl Into<String>, total_price: impl Into<String>) -> Self {
        Self {
            market: market.into(),
            side: OrderSide::Bid,
            volume: None,
            price: Some(total_price.into()),
            ord_type: OrderType::Price,
            identifier: None,
        }
    }

    pub fn market_sell(market: impl Into<String>, volume: impl Into<String>) -> Self {
        Self {
            market: market.into(),
            side: OrderSide::Ask,
            volume: Some(volume.into()),
            price: None,
            ord_type: OrderType::Market,
            identifier: None,
        }
    }

    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }
}

impl Validate for NewOrder {
    fn validate(&self) -> Result<()> {
        require_market(&self.market)?;

        let volume = is_present(&self.volume);
        let price = is_present(&self.price);
        match self.ord_type {
            OrderType::Limit if !(volume && price) => Err(UpbitError::validation(
                "limit orders require both volume and price",
            )),
            OrderType::Price if self.side != OrderSide::Bid || volume || !price => {
                Err(UpbitError::validation(
                    "price orders are market buys: side=bid, price set, volume empty",
                ))
            }
            OrderType::Market if self.side != OrderSide::Ask || price || !volume => {
                Err(UpbitError::validation(
                    "market orders are market sells: side=ask, volume set, price empty",
                ))
            }
            _ => Ok(()),
        }
    }
}

/// 分/週/月 K 線查詢
#[derive(Debug, Clone, Serialize)]
pub struct CandleQuery {
    pub market: String,
    /// 最後一根 K 線的時間（不含），省略時為最新
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_candle_time"
    )]
    pub to: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
}

impl CandleQuery {
    pub fn new(market: impl Into<String>) -> Self {
        Self {
            market: market.into(),
            to: None,
            count: None,
        }
    }

    pub fn with_count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }

    pub fn with_to(mut self, to: DateTime<Utc>) -> Self {
        self.to = Some(to);
        self
    }
}

impl Validate for CandleQuery {
    fn validate(&self) -> Result<()> {
        require_market(&self.market)?;
        if let Some(count) = self.count {
            if count == 0 || count > MAX_CANDLE_COUNT {
                return Err(UpbitError::validation(format!(
                    "count must be between 1 and {}, got {}",
                    MAX_CANDLE_COUNT, count
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DayCandleQuery {
    #[serde(flatten)]
    pub candle: CandleQuery,
    /// 換算幣別，例如 "KRW"
    #[serde(
        rename = "convertingPriceUnit",
        skip_serializing_if = "Option::is_none"
    )]
    pub converting_price_unit: Option<String>,
}

impl DayCandleQuery {
    pub fn new(market: impl Into<String>) -> Self {
        Self {
            candle: CandleQuery::new(market),
            converting_price_unit: None,
        }
    }
}

impl From<CandleQuery> for DayCandleQuery {
    fn from(candle: CandleQuery) -> Self {
        Self {
            candle,
            converting_price_unit: None,
        }
    }
}

impl Validate for DayCandleQuery {
    fn validate(&self) -> Result<()> {
        self.candle.validate()
    }
}

fn require_market(market: &str) -> Result<()> {
    if market.trim().is_empty() {
        return Err(UpbitError::validation("market is required (e.g. KRW-BTC)"));
    }
    Ok(())
}

/// 空白字串視同未填
fn is_present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|s| !s.trim().is_empty())
}

fn serialize_candle_time<S: Serializer>(
    value: &Option<DateTime<Utc>>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match value {
        Some(dt) => serializer.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::Secs, true)),
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_minute_unit_parsing() {
        assert_eq!("15".parse::<MinuteUnit>().unwrap(), MinuteUnit::Fifteen);
        assert_eq!(MinuteUnit::try_from(240).unwrap().to_string(), "240");
        assert!(MinuteUnit::try_from(2).is_err());
        assert!("abc".parse::<MinuteUnit>().is_err());
    }

    #[test]
    fn test_order_lookup_requires_a_key() {
        assert!(OrderLookup::default().validate().is_err());
        assert!(OrderLookup::by_uuid("9ca023a5").validate().is_ok());
        assert!(OrderLookup::by_identifier("my-order-1").validate().is_ok());
        assert!(OrderLookup::by_uuid("  ").validate().is_err());
    }

    #[test]
    fn test_new_order_shapes() {
        assert!(NewOrder::limit("KRW-BTC", OrderSide::Bid, "0.01", "100000000")
            .validate()
            .is_ok());
        assert!(NewOrder::market_buy("KRW-BTC", "5000").validate().is_ok());
        assert!(NewOrder::market_sell("KRW-BTC", "0.01").validate().is_ok());

        let mut broken = NewOrder::limit("KRW-BTC", OrderSide::Ask, "0.01", "1");
        broken.price = None;
        assert!(broken.validate().is_err());

        let mut wrong_side = NewOrder::market_buy("KRW-BTC", "5000");
        wrong_side.side = OrderSide::Ask;
        assert!(wrong_side.validate().is_err());

        assert!(NewOrder::market_sell("", "1").validate().is_err());
    }

    #[test]
    fn test_blank_volume_or_price_counts_as_missing() {
        assert!(NewOrder::limit("KRW-BTC", OrderSide::Bid, "", "100")
            .validate()
            .is_err());
        assert!(NewOrder::limit("KRW-BTC", OrderSide::Bid, "0.01", " ")
            .validate()
            .is_err());
        assert!(NewOrder::market_buy("KRW-BTC", "  ").validate().is_err());
        assert!(NewOrder::market_sell("KRW-BTC", "").validate().is_err());
    }

    #[test]
    fn test_candle_count_bounds() {
        assert!(CandleQuery::new("KRW-BTC").with_count(200).validate().is_ok());
        assert!(CandleQuery::new("KRW-BTC").with_count(0).validate().is_err());
        assert!(CandleQuery::new("KRW-BTC").with_count(201).validate().is_err());
    }

    #[test]
    fn test_candle_query_serialization() {
        let to = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let query = DayCandleQuery {
            candle: CandleQuery::new("KRW-ETH").with_to(to).with_count(3),
            converting_price_unit: Some("KRW".to_string()),
        };

        let value = serde_json::to_value(&query).unwrap();
        assert_eq!(value["market"], "KRW-ETH");
        assert_eq!(value["to"], "2024-01-02T03:04:05Z");
        assert_eq!(value["count"], 3);
        assert_eq!(value["convertingPriceUnit"], "KRW");
    }

    #[test]
    fn test_orders_query_rejects_mixed_state_filters() {
        let query = OrdersQuery {
            state: Some(OrderState::Done),
            states: vec![OrderState::Wait],
            ..Default::default()
        };
        assert!(query.validate().is_err());

        let query = OrdersQuery {
            limit: Some(101),
            ..Default::default()
        };
        assert!(query.validate().is_err());
    }
}
