//! Builds a small West African crude market and prints each grade's present value.
//!
//! Run with `RUST_LOG=crude_market=trace` to see which fallback step priced each grade.

use chrono::TimeDelta;
use crude_market::{BuySellInd, Grade, GradeBook, Market, Terms, TimeStamp, Trade};
use tracing_subscriber::EnvFilter;

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .compact()
        .init();
}

fn quote(
    grade: &str,
    ind: BuySellInd,
    differential: f64,
    counterparty: &str,
) -> anyhow::Result<Trade> {
    let now = TimeStamp::new();
    let expiry = now
        .checked_add(TimeDelta::days(5))
        .ok_or_else(|| anyhow::anyhow!("expiry out of range"))?;

    let mut builder = Trade::builder()
        .set_grade(Grade::new(grade))
        .set_location(format!("{grade} Terminal"))
        .set_terms(Terms::FOB)
        .set_kb(950)
        .set_formula("Dated Brent")
        .set_differential(differential)
        .set_buy_sell_ind(ind)
        .set_counterparty(counterparty)
        .set_expiry(expiry)
        .set_date(now.clone());
    if ind.is_confirmed() {
        builder = builder.set_deal_date(now);
    }
    Ok(builder.build()?)
}

fn main() -> anyhow::Result<()> {
    init_tracing("info");

    let mut market = Market::new();
    for name in ["Forcados", "Bonny Light", "Qua Iboe", "Escravos"] {
        market.add_grade(GradeBook::new(name))?;
    }

    market.record_trade(quote("Forcados", BuySellInd::Bid, -1.50, "A")?)?;
    market.record_trade(quote("Forcados", BuySellInd::Offer, -0.90, "B")?)?;
    market.record_trade(quote("Forcados", BuySellInd::Buy, -1.10, "C")?)?;
    market.record_trade(quote("Bonny Light", BuySellInd::Bid, 0.35, "A")?)?;
    market.record_trade(quote("Bonny Light", BuySellInd::Bid, 0.50, "D")?)?;
    market.record_trade(quote("Qua Iboe", BuySellInd::Offer, 1.20, "B")?)?;

    let report = market.valuation_report();
    for (grade, present_value) in report.priced() {
        tracing::info!(grade, present_value, "Priced");
    }
    for grade in market.grades().iter().filter(|g| report.get(g.name()) == Some(None)) {
        tracing::info!(grade = grade.name(), "No market data");
    }

    let (hash, cbor) = report.finalise()?;
    tracing::info!(bytes = cbor.len(), sha256 = %hash, "Encoded valuation report");

    Ok(())
}
