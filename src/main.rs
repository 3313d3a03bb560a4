use clap::Parser;
use std::io::Write;
use upbit_rest::config::cli::{CandlePeriod, Command};
use upbit_rest::utils::error::ErrorSeverity;
use upbit_rest::utils::{logger, validation::Validate};
use upbit_rest::{
    ClientConfig, CliConfig, OrderChanceQuery, OrderLookup, OrdersQuery, TomlConfig, UpbitClient,
    UpbitError,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 先讀設定檔才知道日誌格式
    let file_config = match &cli.config {
        Some(path) => Some(TomlConfig::from_file(path)),
        None => None,
    };
    let loaded = file_config.as_ref().and_then(|c| c.as_ref().ok());
    let json_logs = cli.json_logs || loaded.is_some_and(|c| c.log_json());
    let log_level = loaded.and_then(|c| c.log_level());

    // 初始化日誌
    if json_logs {
        logger::init_json_logger(log_level);
    } else {
        logger::init_cli_logger(cli.verbose, log_level);
    }

    tracing::debug!("CLI args: {:?}", cli);

    let result = match load_config(&cli, file_config) {
        Ok(config) => run(cli.command, config).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(body) => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&body)?;
            stdout.write_all(b"\n")?;
            stdout.flush()?;
        }
        Err(e) => {
            tracing::error!(
                "❌ Request failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            // 根據錯誤嚴重程度決定退出碼
            let exit_code = match e.severity() {
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

fn load_config(
    cli: &CliConfig,
    file_config: Option<upbit_rest::Result<TomlConfig>>,
) -> upbit_rest::Result<ClientConfig> {
    let mut config = match file_config {
        Some(loaded) => loaded?.upbit,
        None => ClientConfig::from_env()?,
    };

    if let Some(base_url) = &cli.base_url {
        config.base_url = base_url.clone();
    }

    // 驗證配置
    config.validate()?;
    tracing::debug!("Client config: {:?}", config);
    Ok(config)
}

async fn run(command: Command, config: ClientConfig) -> Result<Vec<u8>, UpbitError> {
    let client = UpbitClient::from_config(&config)?;

    match command {
        Command::Accounts => client.get_accounts().await,
        Command::Chance { market } => {
            client
                .get_order_chance(&OrderChanceQuery::new(market))
                .await
        }
        Command::Order(args) => client.get_order(&OrderLookup::from(args)).await,
        Command::Orders(args) => client.get_orders(&OrdersQuery::from(args)).await,
        Command::Cancel(args) => client.cancel_order(&OrderLookup::from(args)).await,
        Command::Place(args) => client.place_order(&args.into()).await,
        Command::Markets => client.get_market_codes().await,
        Command::Candles(args) => match args.period {
            CandlePeriod::Minutes => client.get_minute_candles(&args.query(), args.unit).await,
            CandlePeriod::Days => client.get_day_candles(&args.day_query()).await,
            CandlePeriod::Weeks => client.get_week_candles(&args.query()).await,
            CandlePeriod::Months => client.get_month_candles(&args.query()).await,
        },
    }
}
