//! Plain-text views printed by the terminal session and one-shot commands

use common::PaymentPeriod;
use market_data::{Candle, OrderBookSnapshot, Trade};
use pay_later::format::{format_amount, format_available, format_price};
use pay_later::{Confirmation, Conversion, EditOutcome, PayLaterWorkflow, PaymentSchedule, Step};

const LABEL_WIDTH: usize = 36;

fn row(out: &mut String, label: &str, value: impl std::fmt::Display) {
    out.push_str(&format!("  {:<width$}{}\n", label, value, width = LABEL_WIDTH));
}

fn heading(out: &mut String, title: &str) {
    out.push_str(&format!("\n== {} ==\n", title));
}

fn amount_with(value: f64, currency: impl std::fmt::Display) -> String {
    format!("{} {}", format_amount(value, 8), currency)
}

fn schedule_rows(out: &mut String, schedule: &PaymentSchedule, currency: &str) {
    row(out, "Your total payment would be", amount_with(schedule.total_payment, currency));
    row(out, "Your 15% deposit amount would be", amount_with(schedule.deposit_amount, currency));
    row(out, "Transaction fee is", amount_with(schedule.transaction_fee, currency));
}

fn live_price_text(price: Option<f64>) -> String {
    match price {
        Some(p) => format!("${}", format_price(p)),
        None => "waiting for feed".to_string(),
    }
}

/// The form for the current step, with its derived figures
pub fn render_workflow(workflow: &PayLaterWorkflow) -> String {
    match workflow.step() {
        Step::Setup => render_setup(workflow),
        Step::TransferConfirm => render_transfer_confirm(workflow),
        Step::TradeConfirmed => match workflow.confirmation() {
            Ok(confirmation) => render_confirmation(&confirmation),
            Err(e) => format!("\n  ! {}\n", e),
        },
    }
}

fn render_setup(workflow: &PayLaterWorkflow) -> String {
    let currency = workflow.payment_currency();
    let mut out = String::new();
    heading(&mut out, "Pay Later - Step 1 of 3: Set up your trade");

    row(&mut out, "Asset trading pair", workflow.trading_pair());
    row(&mut out, "Trade direction", workflow.direction());
    row(&mut out, "Payment period", workflow.payment_period());
    let transfer = workflow.transfer_amount();
    let transfer_text = if transfer.is_empty() {
        "-".to_string()
    } else {
        format!("{} {}", transfer, currency)
    };
    row(&mut out, "Amount to transfer", transfer_text);
    row(&mut out, "Live price", live_price_text(workflow.live_price()));
    out.push('\n');

    match workflow.preview() {
        Ok(preview) => schedule_rows(&mut out, &preview.schedule, currency.as_str()),
        Err(e) => out.push_str(&format!("  ! {}\n", e)),
    }

    out.push_str("\n  Transfer your funds to this address:\n");
    out.push_str(&format!("    {}\n", workflow.wallet_address()));
    out.push_str("\n  'copy' copies the address, 'next' once you have made the transfer\n");
    out
}

fn render_transfer_confirm(workflow: &PayLaterWorkflow) -> String {
    let currency = workflow.payment_currency();
    let mut out = String::new();
    heading(&mut out, "Pay Later - Step 2 of 3: Transfer complete");
    out.push_str("  We've confirmed the transfer into our wallet. You're now ready to start trading.\n\n");

    let available = workflow
        .funds_available()
        .map(|v| format!("{} {}", format_available(v), currency))
        .unwrap_or_else(|| "-".to_string());
    row(&mut out, "Total funds available in wallet", available);
    row(&mut out, "Trade direction (locked)", workflow.direction());
    row(&mut out, "Asset trading pair (locked)", workflow.trading_pair());
    row(&mut out, "Payment period", workflow.payment_period());
    row(&mut out, "Trade amount", format!("{} {}", workflow.trade_amount(), currency));
    row(&mut out, "Live price", live_price_text(workflow.live_price()));
    out.push('\n');

    match workflow.preview() {
        Ok(preview) => schedule_rows(&mut out, &preview.schedule, currency.as_str()),
        Err(e) => out.push_str(&format!("  ! {}\n", e)),
    }

    out.push_str("\n  'next' places the trade at the live price\n");
    out
}

pub fn render_confirmation(c: &Confirmation) -> String {
    let mut out = String::new();
    heading(&mut out, "Pay Later - Step 3 of 3: Trade confirmed");

    row(&mut out, "Asset trading pair", c.trading_pair);
    row(&mut out, "Settlement price", format!("${}", format_price(c.settlement_price)));
    row(&mut out, "Trade direction", c.direction);
    row(&mut out, "Payment period", c.payment_period);
    out.push('\n');
    row(&mut out, "15% deposit amount", amount_with(c.deposit_amount, &c.payment_currency));
    row(&mut out, "Transaction fee", amount_with(c.transaction_fee, &c.payment_currency));
    row(&mut out, "Overall payment amount", amount_with(c.total_payment, &c.payment_currency));
    row(&mut out, "Remaining payment due", amount_with(c.remaining_payment, &c.payment_currency));
    row(&mut out, "Total asset to be received", amount_with(c.asset_received, &c.received_currency));
    out.push_str("\n  'close' to finish\n");
    out
}

pub fn render_outcome(outcome: &EditOutcome) -> Option<String> {
    match outcome {
        EditOutcome::Applied => None,
        EditOutcome::Ignored(reason) => Some(format!("  ignored: {}", reason)),
    }
}

/// One-shot schedule printed by `openx quote`
pub fn render_quote(
    amount: f64,
    period: PaymentPeriod,
    schedule: &PaymentSchedule,
    payment_currency: &str,
    conversion: Option<(f64, &Conversion)>,
) -> String {
    let mut out = String::new();
    heading(&mut out, "Pay Later quote");

    row(&mut out, "Amount transferred", amount_with(amount, payment_currency));
    row(&mut out, "Payment period", period);
    out.push('\n');
    schedule_rows(&mut out, schedule, payment_currency);
    row(&mut out, "Remaining payment due", amount_with(schedule.remaining_payment(), payment_currency));

    if let Some((price, conversion)) = conversion {
        row(&mut out, "Settlement price", format!("${}", format_price(price)));
        row(
            &mut out,
            "Total asset to be received",
            amount_with(conversion.asset_amount, &conversion.asset_currency),
        );
    }
    out
}

pub fn render_order_book(book: &OrderBookSnapshot) -> String {
    let mut out = String::new();
    heading(&mut out, &format!("Order book {} (#{})", book.instrument_id, book.sequence));
    out.push_str(&format!(
        "  {:>14} {:>8} {:>14}   {:>14} {:>8} {:>14}\n",
        "Bid", "Volume", "Amount", "Ask", "Volume", "Amount"
    ));

    for (bid, ask) in book.bids.iter().zip(book.asks.iter()) {
        out.push_str(&format!(
            "  {:>14} {:>8.2} {:>14}   {:>14} {:>8.2} {:>14}\n",
            format_price(bid.price),
            bid.volume,
            format_price(bid.amount),
            format_price(ask.price),
            ask.volume,
            format_price(ask.amount),
        ));
    }
    out
}

pub fn render_trades(trades: &[Trade]) -> String {
    let mut out = String::new();
    heading(&mut out, "Recent trades");
    out.push_str(&format!("  {:<10} {:>14} {:>8} {:>14}\n", "Time", "Price", "Volume", "Amount"));

    for trade in trades {
        out.push_str(&format!(
            "  {:<10} {:>14} {:>8.3} {:>14}\n",
            trade.time.format("%H:%M:%S"),
            format_price(trade.price),
            trade.volume,
            format_price(trade.amount),
        ));
    }
    out
}

pub fn render_candles(symbol: &str, candles: &[Candle]) -> String {
    let mut out = String::new();
    heading(&mut out, &format!("{} candles", symbol));
    out.push_str(&format!(
        "  {:<17} {:>12} {:>12} {:>12} {:>12}\n",
        "Open time", "Open", "High", "Low", "Close"
    ));

    for candle in candles {
        let marker = if candle.is_bullish() { '+' } else { '-' };
        out.push_str(&format!(
            "  {:<17} {:>12} {:>12} {:>12} {:>12} {}\n",
            candle.open_time.format("%Y-%m-%d %H:%M"),
            format_price(candle.open),
            format_price(candle.high),
            format_price(candle.low),
            format_price(candle.close),
            marker,
        ));
    }
    out
}

pub const HELP: &str = "
Commands:
  open                 open the pay-later form (starts at step 1)
  pair <BASE/QUOTE>    BTC/USDC, ETH/USDC or ETH/BTC            (step 1)
  side <buy|sell>      trade direction                           (step 1)
  period <days>        1, 2, 7, 14 or 28                         (steps 1-2)
  amount <value>       amount to transfer, up to 8 decimals      (step 1)
  trade <value>        amount to trade, at most the transfer     (step 2)
  next                 continue to the next step
  copy                 copy the deposit wallet address
  show                 redraw the form
  close                close the form and discard it
  price                latest live price
  ticker <on|off>      print every price tick
  book [rows]          order book
  trades [rows]        recent trades
  chart [count]        most recent candles
  help                 this text
  quit                 leave the session
";
