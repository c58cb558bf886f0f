//! Terminal stock dashboard
//!
//! # Usage
//!
//! ```bash
//! # Provider credentials (a .env file in the working directory also works)
//! export FINNHUB_API_KEY=your_key_here
//! export ANTHROPIC_API_KEY=your_key_here
//!
//! # One-shot lookup
//! cargo run --bin stock-dashboard -- --ticker AAPL --period 1Y
//!
//! # Interactive mode
//! cargo run --bin stock-dashboard -- --interactive
//! ```

mod commands;
mod render;

use clap::Parser;
use commands::Command;
use dash_stock::{Dashboard, DashboardConfig, DashboardEvent, DashboardState, Period, StockDataService};
use dash_utils::{Config, LogFormat, init_tracing_with, load_env};
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "stock-dashboard")]
#[command(version, about = "Stock prices, analyst ratings, and an LLM outlook in the terminal", long_about = None)]
struct Args {
    /// Ticker symbol to look up
    #[arg(short, long)]
    ticker: Option<String>,

    /// Price history period: 1D, 1W, 3M, 1Y, MAX
    #[arg(short, long, default_value = "1D")]
    period: Period,

    /// Exclude pre-market and after-hours data
    #[arg(long)]
    no_extended_hours: bool,

    /// LLM model used for the outlook summary
    #[arg(long)]
    model: Option<String>,

    /// Keep reading tickers and commands after the first lookup
    #[arg(short, long)]
    interactive: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_file = load_env();
    let settings = Config::from_env();
    let default_directive = if settings.is_production() {
        "warn"
    } else {
        "warn,dash_stock=info"
    };
    init_tracing_with(default_directive, LogFormat::from_env());
    env_file.report();

    let args = Args::parse();
    info!(app = %settings.app_name, environment = %settings.environment, "Starting");

    let mut builder = DashboardConfig::builder()
        .with_env_keys()
        .include_extended_hours(!args.no_extended_hours);
    if let Some(model) = args.model {
        builder = builder.model(model);
    }
    let config = builder.build()?;

    let dashboard = Dashboard::new(Arc::new(StockDataService::new(Arc::new(config))));
    let mut state = dashboard.initial_state();

    if let Some(ticker) = args.ticker {
        state = dashboard.open(&state, ticker, args.period).await;
        print!("{}", render::render(&state));
        if !args.interactive {
            return Ok(());
        }
    } else {
        state = dashboard
            .apply(&state, DashboardEvent::PeriodSelected(args.period))
            .await;
    }

    repl(&dashboard, state).await
}

async fn repl(dashboard: &Dashboard, mut state: DashboardState) -> anyhow::Result<()> {
    println!("{}", Command::help_text().trim_start());
    println!("{}\n", render::status_line(&state));

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        let prompt = state
            .ticker
            .as_ref()
            .map_or_else(|| "> ".to_string(), |t| format!("{t}> "));
        print!("{prompt}");
        stdout.flush()?;

        let mut input = String::new();
        match stdin.lock().read_line(&mut input) {
            Ok(0) => {
                println!();
                break;
            }
            Ok(_) => {}
            Err(e) => {
                eprintln!("Error reading input: {e}");
                continue;
            }
        }

        if input.trim().is_empty() {
            continue;
        }

        let command = match Command::parse(&input) {
            Ok(command) => command,
            Err(e) => {
                eprintln!("{e:#}\n");
                continue;
            }
        };

        match command {
            Command::Quit => break,
            Command::Help => println!("{}", Command::help_text().trim_start()),
            Command::ClearCache => {
                dashboard.service().clear_cache().await;
                println!("Cache cleared.\n");
            }
            other => {
                if let Some(event) = other.event() {
                    state = dashboard.apply(&state, event).await;
                    println!("{}", render::render(&state));
                    if state.view().is_none() {
                        println!("{}\n", render::status_line(&state));
                    }
                }
            }
        }
    }

    Ok(())
}
