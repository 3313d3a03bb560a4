use crate::domain::model::{
    CandleQuery, DayCandleQuery, MinuteUnit, NewOrder, OrderBy, OrderLookup, OrderSide, OrderState,
    OrderType, OrdersQuery,
};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Clone, Parser)]
#[command(name = "upbit")]
#[command(about = "Call the Upbit REST API and print the raw response body")]
pub struct CliConfig {
    #[arg(long, help = "TOML config file; defaults to UPBIT_* environment variables")]
    pub config: Option<String>,

    #[arg(long, help = "Override the API base URL")]
    pub base_url: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// 全部帳戶餘額
    Accounts,
    /// 市場下單可用資訊
    Chance {
        #[arg(long)]
        market: String,
    },
    /// 查詢單一訂單
    Order(LookupArgs),
    /// 查詢訂單列表
    Orders(OrdersArgs),
    /// 取消訂單
    Cancel(LookupArgs),
    /// 下單
    Place(PlaceArgs),
    /// 市場代碼列表
    Markets,
    /// K 線
    Candles(CandleArgs),
}

#[derive(Debug, Clone, Args)]
pub struct LookupArgs {
    #[arg(long, required_unless_present = "identifier")]
    pub uuid: Option<String>,
    #[arg(long)]
    pub identifier: Option<String>,
}

impl From<LookupArgs> for OrderLookup {
    fn from(args: LookupArgs) -> Self {
        OrderLookup {
            uuid: args.uuid,
            identifier: args.identifier,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct OrdersArgs {
    #[arg(long)]
    pub market: Option<String>,
    #[arg(long, value_delimiter = ',')]
    pub uuids: Vec<String>,
    #[arg(long, value_delimiter = ',')]
    pub identifiers: Vec<String>,
    #[arg(long, value_enum)]
    pub state: Option<OrderState>,
    #[arg(long, value_enum, value_delimiter = ',')]
    pub states: Vec<OrderState>,
    #[arg(long)]
    pub page: Option<u32>,
    #[arg(long)]
    pub limit: Option<u32>,
    #[arg(long, value_enum)]
    pub order_by: Option<OrderBy>,
}

impl From<OrdersArgs> for OrdersQuery {
    fn from(args: OrdersArgs) -> Self {
        OrdersQuery {
            market: args.market,
            uuids: args.uuids,
            identifiers: args.identifiers,
            state: args.state,
            states: args.states,
            page: args.page,
            limit: args.limit,
            order_by: args.order_by,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct PlaceArgs {
    #[arg(long)]
    pub market: String,
    #[arg(long, value_enum)]
    pub side: OrderSide,
    #[arg(long, value_enum)]
    pub ord_type: OrderType,
    #[arg(long)]
    pub volume: Option<String>,
    #[arg(long)]
    pub price: Option<String>,
    #[arg(long)]
    pub identifier: Option<String>,
}

impl From<PlaceArgs> for NewOrder {
    fn from(args: PlaceArgs) -> Self {
        NewOrder {
            market: args.market,
            side: args.side,
            volume: args.volume,
            price: args.price,
            ord_type: args.ord_type,
            identifier: args.identifier,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CandlePeriod {
    Minutes,
    Days,
    Weeks,
    Months,
}

#[derive(Debug, Clone, Args)]
pub struct CandleArgs {
    #[arg(value_enum)]
    pub period: CandlePeriod,
    #[arg(long)]
    pub market: String,
    #[arg(long, default_value = "1", help = "Minute unit: 1, 3, 5, 10, 15, 30, 60, 240")]
    pub unit: MinuteUnit,
    #[arg(long)]
    pub count: Option<u32>,
    #[arg(long, help = "RFC 3339 end time, e.g. 2024-01-01T00:00:00Z")]
    pub to: Option<DateTime<Utc>>,
    #[arg(long, help = "Day candles only: quote currency to convert into")]
    pub converting_price_unit: Option<String>,
}

impl CandleArgs {
    pub fn query(&self) -> CandleQuery {
        CandleQuery {
            market: self.market.clone(),
            to: self.to,
            count: self.count,
        }
    }

    pub fn day_query(&self) -> DayCandleQuery {
        DayCandleQuery {
            candle: self.query(),
            converting_price_unit: self.converting_price_unit.clone(),
        }
    }
}
