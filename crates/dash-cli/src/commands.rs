//! Interactive command parsing
//!
//! Plain input is a ticker; anything starting with `:` is a command.

use anyhow::{Context, Result, anyhow, bail};
use dash_stock::{DashboardEvent, Period};

/// Parsed line of interactive input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Look up a ticker
    Ticker(String),
    /// Switch the price history period
    Period(Period),
    /// Include or exclude pre-market and after-hours data
    Hours(bool),
    /// Drop all cached provider data
    ClearCache,
    Help,
    Quit,
}

impl Command {
    /// Parse a command from user input
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();

        if input.is_empty() {
            bail!("Empty input");
        }

        let Some(rest) = input.strip_prefix(':') else {
            return Ok(Command::Ticker(input.to_string()));
        };

        let parts: Vec<&str> = rest.split_whitespace().collect();
        let Some((cmd, args)) = parts.split_first() else {
            bail!("Empty command");
        };

        match cmd.to_lowercase().as_str() {
            "period" | "p" => {
                let name = args
                    .first()
                    .ok_or_else(|| anyhow!("Missing period name (1D, 1W, 3M, 1Y, MAX)"))?;
                let period = name.parse().with_context(|| format!("Bad period: {name}"))?;
                Ok(Command::Period(period))
            }
            "hours" => match args.first().map(|a| a.to_lowercase()).as_deref() {
                Some("on" | "true" | "yes") => Ok(Command::Hours(true)),
                Some("off" | "false" | "no") => Ok(Command::Hours(false)),
                _ => bail!("Usage: :hours on|off"),
            },
            "clear" => Ok(Command::ClearCache),
            "help" | "h" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            other => bail!("Unknown command: :{other}"),
        }
    }

    /// The dashboard event this command produces, if any
    pub fn event(&self) -> Option<DashboardEvent> {
        match self {
            Command::Ticker(raw) => Some(DashboardEvent::TickerEntered(raw.clone())),
            Command::Period(period) => Some(DashboardEvent::PeriodSelected(*period)),
            Command::Hours(include) => Some(DashboardEvent::ExtendedHoursToggled(*include)),
            Command::ClearCache | Command::Help | Command::Quit => None,
        }
    }

    /// Help text for interactive mode
    pub fn help_text() -> &'static str {
        r"
Commands:
  <TICKER>            look up a ticker (e.g. AAPL)
  :period <NAME>      switch period: 1D, 1W, 3M, 1Y, MAX   (alias :p)
  :hours on|off       include pre-market and after-hours data
  :clear              drop cached provider data
  :help               show this help
  :quit               exit                                 (alias :q)
"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_input_is_ticker() {
        assert_eq!(
            Command::parse("  msft ").unwrap(),
            Command::Ticker("msft".to_string())
        );
    }

    #[test]
    fn test_parse_period() {
        assert_eq!(
            Command::parse(":period 1y").unwrap(),
            Command::Period(Period::OneYear)
        );
        assert_eq!(
            Command::parse(":p MAX").unwrap(),
            Command::Period(Period::Max)
        );
        assert!(Command::parse(":period 2Y").is_err());
        assert!(Command::parse(":period").is_err());
    }

    #[test]
    fn test_parse_hours() {
        assert_eq!(Command::parse(":hours off").unwrap(), Command::Hours(false));
        assert_eq!(Command::parse(":HOURS On").unwrap(), Command::Hours(true));
        assert!(Command::parse(":hours maybe").is_err());
    }

    #[test]
    fn test_parse_control_commands() {
        assert_eq!(Command::parse(":q").unwrap(), Command::Quit);
        assert_eq!(Command::parse(":help").unwrap(), Command::Help);
        assert_eq!(Command::parse(":clear").unwrap(), Command::ClearCache);
    }

    #[test]
    fn test_parse_errors() {
        assert!(Command::parse("").is_err());
        assert!(Command::parse(":").is_err());
        assert!(Command::parse(":watch AAPL").is_err());
    }

    #[test]
    fn test_events() {
        assert_eq!(
            Command::Period(Period::ThreeMonths).event(),
            Some(DashboardEvent::PeriodSelected(Period::ThreeMonths))
        );
        assert_eq!(
            Command::Ticker("AAPL".to_string()).event(),
            Some(DashboardEvent::TickerEntered("AAPL".to_string()))
        );
        assert_eq!(Command::Quit.event(), None);
    }
}
