use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "openx")]
#[command(about = "OpenExchange Pay Later - mock pay-later trading desk")]
#[command(version = "0.1.0")]
pub struct Cli {
    /// Log output format (overrides the config file)
    #[arg(long, global = true, value_enum, env = "OPENX_LOG_FORMAT")]
    pub log_format: Option<LogFormatArg>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start an interactive pay-later session with a live price feed
    Run {
        /// Path to the configuration file; built-in defaults when absent
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Seed for the synthetic feed and order book
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Print the payment schedule for one amount and period
    Quote {
        /// Amount transferred now
        #[arg(short, long)]
        amount: f64,

        /// Days until repayment (1, 2, 7, 14 or 28)
        #[arg(short, long, default_value_t = 14)]
        period: u32,

        #[arg(short, long, value_enum, default_value = "sell")]
        direction: DirectionArg,

        /// Trading pair, e.g. BTC/USDC
        #[arg(long, default_value = "BTC/USDC")]
        pair: String,

        /// Settlement price; also prints the received asset when given
        #[arg(long)]
        price: Option<f64>,
    },

    /// Print the synthetic order book and recent trades
    Book {
        /// Path to the configuration file; built-in defaults when absent
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Rows per side (config display_rows when absent)
        #[arg(short, long)]
        rows: Option<usize>,

        #[arg(long)]
        seed: Option<u64>,
    },

    /// Validate configuration without starting a session
    Validate {
        /// Path to the configuration file
        #[arg(short, long, default_value = "master_config/master_config.yaml")]
        config: PathBuf,
    },

    /// Initialize a new configuration file with all defaults
    Init {
        /// Output path for the new configuration file
        #[arg(short, long, default_value = "master_config.yaml")]
        output: PathBuf,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DirectionArg {
    Buy,
    Sell,
}

impl DirectionArg {
    pub fn as_str(&self) -> &'static str {
        match self {
            DirectionArg::Buy => "buy",
            DirectionArg::Sell => "sell",
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormatArg {
    Pretty,
    Json,
    Compact,
}

impl LogFormatArg {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormatArg::Pretty => "pretty",
            LogFormatArg::Json => "json",
            LogFormatArg::Compact => "compact",
        }
    }
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_quote_defaults() {
        let cli = Cli::try_parse_from(["openx", "quote", "--amount", "1.5"]).unwrap();
        match cli.command {
            Commands::Quote {
                amount,
                period,
                direction,
                pair,
                price,
            } => {
                assert_eq!(amount, 1.5);
                assert_eq!(period, 14);
                assert_eq!(direction, DirectionArg::Sell);
                assert_eq!(pair, "BTC/USDC");
                assert_eq!(price, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_run_with_seed() {
        let cli = Cli::try_parse_from(["openx", "run", "-c", "my.yaml", "--seed", "7", "--log-format", "json"])
            .unwrap();
        assert_eq!(cli.log_format, Some(LogFormatArg::Json));
        match cli.command {
            Commands::Run { config, seed } => {
                assert_eq!(config, Some(PathBuf::from("my.yaml")));
                assert_eq!(seed, Some(7));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_rejects_unknown_direction() {
        assert!(Cli::try_parse_from(["openx", "quote", "--amount", "1", "--direction", "hold"]).is_err());
    }
}
