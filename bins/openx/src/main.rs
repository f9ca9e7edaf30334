//! OpenExchange Pay Later binary
//!
//! Entry point for the interactive pay-later session and the one-shot
//! commands for quoting, inspecting the synthetic book and managing the
//! configuration file.

mod clipboard;
mod render;
mod session;

use anyhow::{Context, Result};
use cli::{Cli, Commands, DirectionArg};
use common::{PaymentPeriod, Side, TradingPair};
use config::{
    generate_default_config, load_config, load_config_or_default, save_config, validate_config,
    MasterConfig, ValidationReport,
};
use market_data::{MarketDataCoordinator, OrderBookGenerator};
use observability::{init_logging, init_metrics, LogFormat};
use pay_later::{compute_schedule, convert, payment_currency, PayLaterWorkflow, WorkflowSettings};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    let config = match &cli.command {
        Commands::Run { config, .. } | Commands::Book { config, .. } => {
            Some(load_config_or_default(config.as_ref())?)
        }
        _ => None,
    };

    let format = resolve_log_format(&cli, config.as_ref());
    // the interactive view shares the terminal with stderr
    let default_level = match cli.command {
        Commands::Run { .. } => "warn",
        _ => "info",
    };
    init_logging("openx", format, default_level)?;
    debug!(?cli, "CLI arguments parsed");

    match cli.command {
        Commands::Run { seed, .. } => {
            info!("Executing 'run' command");
            run_command(config.unwrap_or_else(generate_default_config), seed).await
        }
        Commands::Quote {
            amount,
            period,
            direction,
            pair,
            price,
        } => {
            info!("Executing 'quote' command");
            quote_command(amount, period, direction, &pair, price)
        }
        Commands::Book { rows, seed, .. } => {
            info!("Executing 'book' command");
            book_command(config.unwrap_or_else(generate_default_config), rows, seed)
        }
        Commands::Validate { config } => {
            info!("Executing 'validate' command");
            validate_command(config).await
        }
        Commands::Init { output } => {
            info!("Executing 'init' command");
            init_command(output).await
        }
    }
}

fn resolve_log_format(cli: &Cli, config: Option<&MasterConfig>) -> LogFormat {
    if let Some(arg) = cli.log_format {
        return LogFormat::parse(arg.as_str()).unwrap_or_default();
    }
    config
        .and_then(|c| LogFormat::parse(&c.logging().format))
        .unwrap_or_default()
}

fn report_or_bail(report: &ValidationReport) -> Result<()> {
    if !report.warnings.is_empty() {
        warn!("Configuration warnings:");
        for warning in &report.warnings {
            warn!(field = %warning.field, message = %warning.message);
        }
    }

    if !report.is_valid() {
        error!(
            error_count = report.errors.len(),
            "Configuration validation failed"
        );
        for err in &report.errors {
            error!("{}", err);
        }
        anyhow::bail!("Cannot start session due to configuration errors");
    }
    Ok(())
}

async fn run_command(config: MasterConfig, seed: Option<u64>) -> Result<()> {
    report_or_bail(&validate_config(&config))?;

    let mut market_data = config.market_data();
    let mut order_book = config.order_book();
    if seed.is_some() {
        market_data.seed = seed;
        order_book.seed = seed;
    }

    if let Some(monitoring) = config.monitoring.as_ref().filter(|m| m.metrics_enabled) {
        init_metrics(monitoring.metrics_port)?;
    }

    let shutdown = CancellationToken::new();
    let ctrl_c_token = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received Ctrl+C, shutting down");
                ctrl_c_token.cancel();
            }
            Err(e) => warn!("Failed to listen for Ctrl+C: {}", e),
        }
    });

    let market = MarketDataCoordinator::from_config(&market_data, &order_book)
        .context("Failed to build market data")?;
    let feed = market.start_feed(&shutdown).await?;

    let settings = WorkflowSettings::from_config(&config.pay_later())
        .context("Invalid pay_later configuration")?;
    let workflow = PayLaterWorkflow::new(
        settings,
        Arc::new(feed.source()),
        Arc::new(clipboard::TerminalClipboard::new()),
    );

    info!(symbol = %market_data.symbol, "Starting session");
    let session = session::Session::new(workflow, market, feed.subscribe(), market_data.symbol);
    let result = session.run(shutdown.clone()).await;

    shutdown.cancel();
    feed.join().await?;
    result
}

fn quote_command(
    amount: f64,
    period: u32,
    direction: DirectionArg,
    pair: &str,
    price: Option<f64>,
) -> Result<()> {
    let period = PaymentPeriod::try_from(period)?;
    let pair: TradingPair = pair.parse()?;
    let side: Side = direction.as_str().parse()?;

    let schedule = compute_schedule(amount, period.days())?;
    let conversion = price
        .map(|p| convert(schedule.total_payment, p, side, pair).map(|c| (p, c)))
        .transpose()?;
    let currency = payment_currency(side, pair);

    println!(
        "{}",
        render::render_quote(
            amount,
            period,
            &schedule,
            currency.as_str(),
            conversion.as_ref().map(|(p, c)| (*p, c)),
        )
    );
    Ok(())
}

fn book_command(config: MasterConfig, rows: Option<usize>, seed: Option<u64>) -> Result<()> {
    let mut order_book = config.order_book();
    if seed.is_some() {
        order_book.seed = seed;
    }

    let mut generator = OrderBookGenerator::new(order_book);
    let rows = rows.unwrap_or_else(|| generator.display_rows());
    let book = generator.generate_book().truncated(rows);
    let trades = generator.generate_trades();

    println!("{}", render::render_order_book(&book));
    println!("{}", render::render_trades(&trades[..rows.min(trades.len())]));
    Ok(())
}

async fn validate_command<P: AsRef<Path>>(config_path: P) -> Result<()> {
    info!(path = ?config_path.as_ref(), "Validating configuration");

    let config = match load_config(&config_path) {
        Ok(c) => c,
        Err(e) => {
            error!(%e, "Failed to load configuration");
            anyhow::bail!(e);
        }
    };

    let report = validate_config(&config);

    println!("\n=== Configuration Validation Report ===\n");

    if !report.defaults_applied.is_empty() {
        println!("Defaults Applied ({}):", report.defaults_applied.len());
        for default in &report.defaults_applied {
            println!("  [info] {} = {}", default.field, default.value);
        }
        println!();
    }

    if !report.warnings.is_empty() {
        println!("Warnings ({}):", report.warnings.len());
        for warning in &report.warnings {
            println!("  [warn] [{}] {}", warning.field, warning.message);
        }
        println!();
    }

    if !report.errors.is_empty() {
        println!("Errors ({}):", report.errors.len());
        for err in &report.errors {
            println!("  [error] {}", err);
        }
        println!();
        anyhow::bail!("Configuration validation failed");
    }

    let pay_later = config.pay_later();
    let market_data = config.market_data();

    println!("[ok] Configuration is valid!");
    println!();
    println!("Exchange: {}", config.exchange.name);
    println!("Version: {}", config.exchange.version);
    println!(
        "Deposit rate: {}  Weekly fee rate: {}",
        pay_later.deposit_rate, pay_later.weekly_fee_rate
    );
    println!(
        "Feed: {} every {} ms, {} {} candles",
        market_data.symbol,
        market_data.tick_interval_ms,
        market_data.history_candles,
        market_data.candle_interval
    );

    Ok(())
}

async fn init_command(output_path: PathBuf) -> Result<()> {
    let output_path = output_path.as_path();
    info!(?output_path, "Initializing new configuration file");

    let config = generate_default_config();

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }

    save_config(&config, output_path)?;

    println!("[ok] Configuration file created successfully!");
    println!();
    println!("Location: {:?}", output_path);
    println!();
    println!("This configuration includes:");
    println!("  - Exchange metadata (name, description, version)");
    println!("  - Pay-later rates, amount fallbacks and deposit wallet");
    println!("  - Synthetic price feed and order book settings");
    println!();
    println!("Next steps:");
    println!("  1. Edit the configuration file to customize settings");
    println!(
        "  2. Run 'openx validate --config {:?}' to check configuration",
        output_path
    );
    println!(
        "  3. Run 'openx run --config {:?}' to start a session",
        output_path
    );

    Ok(())
}
