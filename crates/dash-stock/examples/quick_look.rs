//! One-shot lookup through the fetch-and-cache layer
//!
//! To run this example:
//! ```bash
//! # Finnhub and Anthropic keys are optional; without them the ratings and
//! # analysis sections report a configuration fault
//! export FINNHUB_API_KEY=your_key_here
//! export ANTHROPIC_API_KEY=your_key_here
//!
//! cargo run --example quick_look -- MSFT 1Y
//! ```

use dash_stock::{Dashboard, DashboardConfig, Period, StockDataService};
use dash_utils::{init_tracing, load_env};
use std::env;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_file = load_env();
    init_tracing();
    env_file.report();

    let mut args = env::args().skip(1);
    let symbol = args.next().unwrap_or_else(|| "AAPL".to_string());
    let period: Period = args.next().as_deref().unwrap_or("1D").parse()?;

    let config = DashboardConfig::builder().with_env_keys().build()?;
    let dashboard = Dashboard::new(Arc::new(StockDataService::new(Arc::new(config))));

    let state = dashboard
        .open(&dashboard.initial_state(), symbol, period)
        .await;

    for notice in &state.notices {
        println!("[{:?}] {notice}", notice.level);
    }

    let Some(view) = state.view() else {
        println!("Nothing to show.");
        return Ok(());
    };

    println!("=== {} ({}) ===\n", view.info.long_name, view.info.symbol);
    match view.change {
        Some(change) => println!(
            "{:.2} {} {} {:.2} ({:.2}%) {}",
            change.current_price,
            view.info.currency_code(),
            change.direction.arrow(),
            change.change.abs(),
            change.percent_change.abs(),
            state.period.caption()
        ),
        None => println!("Price change unavailable"),
    }
    println!("{} bars for {}", view.history.len(), state.period);

    if let Some(record) = view.ratings.as_ref().and_then(|r| r.latest()) {
        println!("\nAnalyst ratings ({}):", record.period);
        for share in record.breakdown() {
            println!("  {:<12} {:>3}", share.category.label(), share.count);
        }
    }

    if let Some(analysis) = &view.analysis {
        println!("\n{analysis}");
    }

    Ok(())
}
