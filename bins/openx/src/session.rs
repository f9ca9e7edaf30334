//! Interactive terminal session
//!
//! One task multiplexes stdin lines and price ticks with `tokio::select!`.
//! The workflow is only touched from this task, so it needs no locking.

use crate::render;
use anyhow::{Context, Result};
use market_data::{MarketDataCoordinator, PriceSubscription, PriceTick};
use pay_later::format::format_price;
use pay_later::{Field, PayLaterWorkflow};
use std::io::Write;
use std::str::FromStr;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

const DEFAULT_CHART_CANDLES: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Open,
    Edit(Field, String),
    Next,
    Close,
    Copy,
    Show,
    Price,
    Ticker(bool),
    Book(Option<usize>),
    Trades(Option<usize>),
    Chart(Option<usize>),
    Help,
    Quit,
}

fn optional_count(arg: &str) -> Result<Option<usize>, String> {
    if arg.is_empty() {
        return Ok(None);
    }
    arg.parse::<usize>()
        .map(Some)
        .map_err(|_| format!("'{}' is not a row count", arg))
}

fn required<'a>(name: &str, arg: &'a str) -> Result<&'a str, String> {
    if arg.is_empty() {
        Err(format!("'{}' needs a value", name))
    } else {
        Ok(arg)
    }
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, arg) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        let word = word.to_lowercase();
        let edit = |field: Field| required(&word, arg).map(|v| Command::Edit(field, v.to_string()));

        match word.as_str() {
            "open" => Ok(Command::Open),
            "pair" => edit(Field::TradingPair),
            "side" | "direction" => edit(Field::Direction),
            "period" => edit(Field::PaymentPeriod),
            "amount" | "transfer" => edit(Field::TransferAmount),
            "trade" => edit(Field::TradeAmount),
            "next" | "n" => Ok(Command::Next),
            "close" => Ok(Command::Close),
            "copy" => Ok(Command::Copy),
            "show" => Ok(Command::Show),
            "price" => Ok(Command::Price),
            "ticker" => match arg {
                "on" => Ok(Command::Ticker(true)),
                "off" => Ok(Command::Ticker(false)),
                other => Err(format!("ticker expects on or off, got '{}'", other)),
            },
            "book" => optional_count(arg).map(Command::Book),
            "trades" => optional_count(arg).map(Command::Trades),
            "chart" => optional_count(arg).map(Command::Chart),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            other => Err(format!("unknown command '{}', type 'help'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

pub struct Session {
    workflow: PayLaterWorkflow,
    market: MarketDataCoordinator,
    ticks: PriceSubscription,
    symbol: String,
    form_open: bool,
    ticker: bool,
}

impl Session {
    pub fn new(
        workflow: PayLaterWorkflow,
        market: MarketDataCoordinator,
        ticks: PriceSubscription,
        symbol: impl Into<String>,
    ) -> Self {
        Self {
            workflow,
            market,
            ticks,
            symbol: symbol.into(),
            form_open: false,
            ticker: false,
        }
    }

    /// Read commands until `quit`, end of input or cancellation
    pub async fn run(mut self, token: CancellationToken) -> Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut feed_open = true;

        println!("OpenExchange Pay Later - {} (type 'help' for commands)", self.symbol);
        prompt();

        loop {
            tokio::select! {
                _ = token.cancelled() => {
                    info!("Session cancelled");
                    break;
                }
                tick = self.ticks.next_tick(), if feed_open => match tick {
                    Some(tick) => {
                        if let Some(line) = self.on_tick(tick) {
                            println!("{}", line);
                            prompt();
                        }
                    }
                    None => {
                        warn!("Price feed closed");
                        feed_open = false;
                    }
                },
                line = lines.next_line() => {
                    let Some(line) = line.context("Failed to read from stdin")? else {
                        debug!("End of input");
                        break;
                    };
                    let (control, output) = self.handle_line(&line).await;
                    if !output.is_empty() {
                        println!("{}", output);
                    }
                    if control == Control::Quit {
                        break;
                    }
                    prompt();
                }
            }
        }

        info!("Session ended");
        Ok(())
    }

    fn on_tick(&self, tick: PriceTick) -> Option<String> {
        debug!(sequence = tick.sequence, price = tick.price, "Tick received");
        self.ticker.then(|| {
            format!(
                "  [{}] {} ${}",
                tick.sequence,
                self.symbol,
                format_price(tick.price)
            )
        })
    }

    pub async fn handle_line(&mut self, line: &str) -> (Control, String) {
        if line.trim().is_empty() {
            return (Control::Continue, String::new());
        }
        match line.parse::<Command>() {
            Ok(command) => self.execute(command).await,
            Err(message) => (Control::Continue, format!("  {}", message)),
        }
    }

    pub async fn execute(&mut self, command: Command) -> (Control, String) {
        debug!(?command, "Executing command");
        let needs_form = matches!(
            command,
            Command::Edit(..) | Command::Next | Command::Copy | Command::Close
        );
        if needs_form && !self.form_open {
            return (
                Control::Continue,
                "  The pay-later form is closed, type 'open' first".to_string(),
            );
        }

        let output = match command {
            Command::Open => {
                self.form_open = true;
                render::render_workflow(&self.workflow)
            }
            Command::Edit(field, value) => {
                let outcome = self.workflow.edit(field, &value);
                render::render_outcome(&outcome)
                    .unwrap_or_else(|| render::render_workflow(&self.workflow))
            }
            Command::Next => match self.workflow.advance() {
                Ok(_) => render::render_workflow(&self.workflow),
                Err(e) => format!("  ! {}", e),
            },
            Command::Close => {
                self.workflow.close();
                self.form_open = false;
                "  Pay-later form closed".to_string()
            }
            Command::Copy => format!("  {}", self.workflow.copy_wallet_address().message()),
            Command::Show => {
                if self.form_open {
                    render::render_workflow(&self.workflow)
                } else {
                    "  The pay-later form is closed, type 'open' to start".to_string()
                }
            }
            Command::Price => {
                let tick = self.ticks.current();
                format!("  {} ${} (tick {})", self.symbol, format_price(tick.price), tick.sequence)
            }
            Command::Ticker(on) => {
                self.ticker = on;
                format!("  Ticker {}", if on { "on" } else { "off" })
            }
            Command::Book(rows) => {
                let rows = match rows {
                    Some(rows) => rows,
                    None => self.market.display_rows().await,
                };
                render::render_order_book(&self.market.order_book(rows).await)
            }
            Command::Trades(rows) => {
                let rows = match rows {
                    Some(rows) => rows,
                    None => self.market.display_rows().await,
                };
                render::render_trades(&self.market.recent_trades(rows).await)
            }
            Command::Chart(count) => {
                let candles = self
                    .market
                    .get_candles(count.unwrap_or(DEFAULT_CHART_CANDLES))
                    .await;
                render::render_candles(&self.symbol, &candles)
            }
            Command::Help => render::HELP.to_string(),
            Command::Quit => return (Control::Quit, String::new()),
        };
        (Control::Continue, output)
    }
}

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{MarketDataConfig, OrderBookConfig};
    use pay_later::{MemoryClipboard, Step, WorkflowSettings};
    use std::sync::Arc;

    #[test]
    fn test_parse_commands() {
        assert_eq!("open".parse::<Command>(), Ok(Command::Open));
        assert_eq!(
            "amount 1.5".parse::<Command>(),
            Ok(Command::Edit(Field::TransferAmount, "1.5".to_string()))
        );
        assert_eq!(
            "period 14 days".parse::<Command>(),
            Ok(Command::Edit(Field::PaymentPeriod, "14 days".to_string()))
        );
        assert_eq!("PAIR eth/usdc".parse::<Command>(), Ok(Command::Edit(Field::TradingPair, "eth/usdc".to_string())));
        assert_eq!("book".parse::<Command>(), Ok(Command::Book(None)));
        assert_eq!("book 10".parse::<Command>(), Ok(Command::Book(Some(10))));
        assert_eq!("ticker on".parse::<Command>(), Ok(Command::Ticker(true)));
        assert!("book ten".parse::<Command>().is_err());
        assert!("amount".parse::<Command>().is_err());
        assert!("launch".parse::<Command>().is_err());
    }

    async fn session() -> (Session, market_data::PriceFeedHandle) {
        let market = MarketDataCoordinator::from_config(
            &MarketDataConfig {
                seed: Some(5),
                ..MarketDataConfig::default()
            },
            &OrderBookConfig {
                seed: Some(6),
                ..OrderBookConfig::default()
            },
        )
        .unwrap();
        let handle = market.start_feed(&CancellationToken::new()).await.unwrap();
        let workflow = PayLaterWorkflow::new(
            WorkflowSettings::default(),
            Arc::new(handle.source()),
            Arc::new(MemoryClipboard::new()),
        );
        (Session::new(workflow, market, handle.subscribe(), "BTC/USDC"), handle)
    }

    #[tokio::test(start_paused = true)]
    async fn test_walkthrough() {
        let (mut session, handle) = session().await;

        let (_, out) = session.handle_line("next").await;
        assert!(out.contains("closed"));

        session.handle_line("open").await;
        session.handle_line("amount 1.5").await;
        let (_, out) = session.handle_line("next").await;
        assert!(out.contains("Step 2 of 3"));

        let (_, out) = session.handle_line("trade 2").await;
        assert!(out.contains("ignored"));

        session.handle_line("trade 1.5").await;
        let (_, out) = session.handle_line("next").await;
        assert!(out.contains("Step 3 of 3"));
        assert_eq!(session.workflow.step(), Step::TradeConfirmed);
        assert!(session.workflow.settlement_price().is_some());

        let (_, out) = session.handle_line("next").await;
        assert!(out.contains("already confirmed"));

        session.handle_line("close").await;
        assert_eq!(session.workflow.step(), Step::Setup);

        let (control, _) = session.handle_line("quit").await;
        assert_eq!(control, Control::Quit);

        handle.stop();
        handle.join().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_market_views() {
        let (mut session, handle) = session().await;

        let (_, book) = session.handle_line("book 3").await;
        assert!(book.contains("112,000.00"));
        let (_, trades) = session.handle_line("trades 3").await;
        assert!(trades.contains("Recent trades"));
        let (_, chart) = session.handle_line("chart 5").await;
        assert_eq!(chart.lines().filter(|l| l.ends_with(" +") || l.ends_with(" -")).count(), 5);

        handle.stop();
        handle.join().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_output() {
        let (mut session, handle) = session().await;
        let first = session.ticks.next_tick().await.unwrap();
        assert_eq!(session.on_tick(first), None);

        session.handle_line("ticker on").await;
        let next = session.ticks.next_tick().await.unwrap();
        assert!(session.on_tick(next).unwrap().contains("BTC/USDC"));

        handle.stop();
        handle.join().await.unwrap();
    }
}
