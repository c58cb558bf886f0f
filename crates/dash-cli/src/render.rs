//! Text rendering of a dashboard snapshot
//!
//! Rendering is a pure function of [`DashboardState`]; nothing here fetches.

use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, Table};
use dash_stock::{
    DashboardState, Lookup, NoticeLevel, Period, PriceChange, PriceSeries, RatingRecord,
    TickerView,
};
use std::fmt::Write;

/// Render a snapshot as plain text
pub fn render(state: &DashboardState) -> String {
    let mut out = String::new();

    for notice in &state.notices {
        let tag = match notice.level {
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        };
        let _ = writeln!(out, "{tag}: {notice}");
    }

    match &state.lookup {
        Lookup::Idle => {}
        Lookup::NotFound(ticker) => {
            let _ = writeln!(out, "No results found for the ticker symbol: {ticker}");
        }
        Lookup::Unavailable(ticker) => {
            let _ = writeln!(out, "{ticker} is unavailable right now; enter it again to retry.");
        }
        Lookup::Found(view) => render_view(&mut out, state, view),
    }

    out
}

/// One-line status: period and extended-hours flag
pub fn status_line(state: &DashboardState) -> String {
    let periods: Vec<String> = Period::ALL
        .iter()
        .map(|p| {
            if *p == state.period {
                format!("[{p}]")
            } else {
                p.to_string()
            }
        })
        .collect();
    let hours = if state.include_extended_hours { "on" } else { "off" };
    format!("{}  extended hours: {hours}", periods.join(" "))
}

fn render_view(out: &mut String, state: &DashboardState, view: &TickerView) {
    let _ = writeln!(out, "{} ({})", view.info.long_name, view.info.symbol);

    match view.change {
        Some(change) => {
            let _ = writeln!(out, "{}", price_line(&change, view.info.currency_code(), state.period));
        }
        None => {
            if let Some(price) = view.info.current_price {
                let _ = writeln!(out, "{price:.2} {}", view.info.currency_code());
            }
        }
    }
    let _ = writeln!(out, "{}\n", status_line(state));

    if view.history.is_empty() {
        let _ = writeln!(out, "No price history available for this period.\n");
    } else {
        let _ = writeln!(out, "{}\n", history_table(&view.history));
    }

    if let Some(record) = view.ratings.as_ref().and_then(|r| r.latest()) {
        let _ = writeln!(out, "Analyst Ratings ({})", record.period);
        let _ = writeln!(out, "{}\n", ratings_table(record));
    }

    if let Some(analysis) = &view.analysis {
        let _ = writeln!(out, "{analysis}");
    }
}

/// "150.00 USD ▲ 2.00 (1.35%) Today"
pub fn price_line(change: &PriceChange, currency: &str, period: Period) -> String {
    format!(
        "{:.2} {currency} {} {:.2} ({:.2}%) {}",
        change.current_price,
        change.direction.arrow(),
        change.change.abs(),
        change.percent_change.abs(),
        period.caption()
    )
}

fn history_table(series: &PriceSeries) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["From", "To", "Bars", "Open", "Close", "Low", "High"]);

    if let (Some(first), Some(last), Some((low, high))) =
        (series.first(), series.last(), series.price_range())
    {
        table.add_row(vec![
            Cell::new(first.timestamp.format("%Y-%m-%d %H:%M")),
            Cell::new(last.timestamp.format("%Y-%m-%d %H:%M")),
            Cell::new(series.len()).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.2}", first.open)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.2}", last.close)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{low:.2}")).set_alignment(CellAlignment::Right),
            Cell::new(format!("{high:.2}")).set_alignment(CellAlignment::Right),
        ]);
    }

    table.to_string()
}

fn ratings_table(record: &RatingRecord) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Rating", "Count", "Share"]);

    for share in record.breakdown() {
        table.add_row(vec![
            Cell::new(share.category.label()),
            Cell::new(share.count).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.0}%", share.share * 100.0)).set_alignment(CellAlignment::Right),
        ]);
    }

    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use dash_stock::{
        AnalysisText, Direction, Notice, PriceBar, RatingsSnapshot, StockInfo, TickerSymbol,
    };

    fn info() -> StockInfo {
        StockInfo {
            symbol: "AAPL".to_string(),
            long_name: "Apple Inc.".to_string(),
            short_name: Some("Apple".to_string()),
            currency: Some("USD".to_string()),
            current_price: Some(150.0),
            previous_close: Some(148.0),
            exchange: Some("NasdaqGS".to_string()),
            instrument_type: Some("EQUITY".to_string()),
        }
    }

    fn series() -> PriceSeries {
        PriceSeries::new(vec![
            PriceBar {
                timestamp: Utc.with_ymd_and_hms(2024, 6, 3, 13, 30, 0).unwrap(),
                open: 148.5,
                high: 149.0,
                low: 147.8,
                close: 148.9,
                volume: Some(10_000),
            },
            PriceBar {
                timestamp: Utc.with_ymd_and_hms(2024, 6, 3, 13, 35, 0).unwrap(),
                open: 148.9,
                high: 150.2,
                low: 148.7,
                close: 150.0,
                volume: Some(12_000),
            },
        ])
    }

    fn found_state() -> DashboardState {
        let view = TickerView {
            info: info(),
            history: series(),
            change: Some(PriceChange {
                current_price: 150.0,
                reference_price: 148.0,
                change: 2.0,
                percent_change: 1.351_351,
                direction: Direction::Up,
            }),
            ratings: Some(RatingsSnapshot::new(vec![RatingRecord {
                period: "2024-06-01".to_string(),
                strong_buy: 5,
                buy: 10,
                hold: 3,
                sell: 1,
                strong_sell: 0,
            }])),
            analysis: Some(AnalysisText::new("Apple remains a steady large-cap name.")),
        };
        DashboardState {
            ticker: Some(TickerSymbol::parse("AAPL").unwrap()),
            lookup: Lookup::Found(Box::new(view)),
            ..DashboardState::default()
        }
    }

    #[test]
    fn test_price_line() {
        let change = PriceChange {
            current_price: 90.0,
            reference_price: 100.0,
            change: -10.0,
            percent_change: -10.0,
            direction: Direction::Down,
        };
        assert_eq!(
            price_line(&change, "EUR", Period::OneYear),
            "90.00 EUR ▼ 10.00 (10.00%) in the last year"
        );
    }

    #[test]
    fn test_render_found() {
        let text = render(&found_state());
        assert!(text.contains("Apple Inc. (AAPL)"));
        assert!(text.contains("150.00 USD ▲ 2.00 (1.35%) Today"));
        assert!(text.contains("[1D] 1W 3M 1Y MAX  extended hours: on"));
        assert!(text.contains("Analyst Ratings (2024-06-01)"));
        assert!(text.contains("Strong Buy"));
        assert!(text.contains("53%"));
        assert!(text.ends_with("Apple remains a steady large-cap name.\n"));
    }

    #[test]
    fn test_render_empty_history() {
        let mut state = found_state();
        if let Lookup::Found(view) = &mut state.lookup {
            view.history = PriceSeries::default();
            view.ratings = Some(RatingsSnapshot::default());
        }
        let text = render(&state);
        assert!(text.contains("No price history available for this period."));
        assert!(!text.contains("Analyst Ratings"));
    }

    #[test]
    fn test_render_not_found() {
        let state = DashboardState {
            lookup: Lookup::NotFound(TickerSymbol::parse("ZZZZINVALID").unwrap()),
            ..DashboardState::default()
        };
        assert_eq!(
            render(&state),
            "No results found for the ticker symbol: ZZZZINVALID\n"
        );
    }

    #[test]
    fn test_render_notices_first() {
        let mut state = found_state();
        state.notices = vec![Notice::warning("finnhub rate limit error: slow down")];
        let text = render(&state);
        assert!(text.starts_with("warning: finnhub rate limit error: slow down\n"));
    }

    #[test]
    fn test_render_idle() {
        assert_eq!(render(&DashboardState::default()), "");
    }
}
