//! Command-line market dashboard

mod render;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};
use market_analytics::{
    AnalyticsConfig, AnalyticsEngine, AnalyticsError, LookbackPeriod, PortfolioWeights, Selection,
    Universe, YahooFinanceClient,
};
use market_utils::{LogConfig, init_tracing};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "market-dash")]
#[command(about = "Risk and return analytics for major US equities", long_about = None)]
struct Args {
    /// Lookback period (1mo, 3mo, 6mo, 1y, 2y, 5y, ...)
    #[arg(short, long)]
    period: Option<LookbackPeriod>,

    /// Comma-separated security names; defaults to the whole universe
    #[arg(short, long, value_delimiter = ',')]
    stocks: Vec<String>,

    /// Comma-separated portfolio weights, one per selected security
    #[arg(short, long, value_delimiter = ',')]
    weights: Vec<f64>,

    /// Annual risk-free rate as a decimal, skips the treasury lookup
    #[arg(long)]
    risk_free: Option<f64>,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Command {
    /// Per-security performance and risk figures
    Summary,
    /// Pairwise return correlation
    Correlation,
    /// Aggregate metrics for the selection as one portfolio
    Portfolio,
    /// Everything above in one record
    Snapshot,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Table,
    Json,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing(&LogConfig::from_env()?);

    let args = Args::parse();
    let config = AnalyticsConfig::default()
        .with_env_overrides()
        .context("invalid analytics configuration")?;
    let period = args.period.unwrap_or(config.default_period);

    info!(%period, command = ?args.command, "Starting market-dash");

    let provider = Arc::new(YahooFinanceClient::new(config.requests_per_minute));
    let mut engine = AnalyticsEngine::new(Universe::major_stocks(), provider, config);

    if !engine.fetch(period).await {
        bail!("no price data could be fetched for period {period}");
    }
    for failure in engine.failures() {
        warn!(name = %failure.name, reason = %failure.reason, "Security unavailable");
    }

    match args.risk_free {
        Some(rate) => engine.set_risk_free_rate(rate),
        None => {
            engine.refresh_risk_free_rate().await;
        }
    }

    let selection = if args.stocks.is_empty() {
        Selection::all()
    } else {
        Selection::of(args.stocks.iter().map(|s| s.trim()))
    };
    let weights = (!args.weights.is_empty()).then(|| PortfolioWeights::new(args.weights.clone()));

    let output = dispatch(&engine, args.command, args.format, &selection, weights.as_ref())?;
    println!("{output}");
    Ok(())
}

/// Output for one subcommand; selection problems become a message, not an error
fn dispatch(
    engine: &AnalyticsEngine,
    command: Command,
    format: OutputFormat,
    selection: &Selection,
    weights: Option<&PortfolioWeights>,
) -> market_analytics::Result<String> {
    match render_command(engine, command, format, selection, weights) {
        Err(e) => match selection_hint(&e, engine.universe()) {
            Some(hint) => Ok(hint),
            None => Err(e),
        },
        output => output,
    }
}

/// Run one subcommand against already loaded data
fn render_command(
    engine: &AnalyticsEngine,
    command: Command,
    format: OutputFormat,
    selection: &Selection,
    weights: Option<&PortfolioWeights>,
) -> market_analytics::Result<String> {
    let output = match (command, format) {
        (Command::Summary, OutputFormat::Json) => {
            serde_json::to_string_pretty(&engine.stock_summary(selection)?)?
        }
        (Command::Summary, OutputFormat::Table) => {
            render::summary_table(&engine.stock_summary(selection)?).to_string()
        }
        (Command::Correlation, OutputFormat::Json) => {
            serde_json::to_string_pretty(&engine.correlation_matrix(selection)?)?
        }
        (Command::Correlation, OutputFormat::Table) => {
            render::correlation_table(&engine.correlation_matrix(selection)?).to_string()
        }
        (Command::Portfolio, OutputFormat::Json) => {
            serde_json::to_string_pretty(&engine.portfolio_summary(selection, weights)?)?
        }
        (Command::Portfolio, OutputFormat::Table) => {
            render::portfolio_table(&engine.portfolio_summary(selection, weights)?).to_string()
        }
        (Command::Snapshot, OutputFormat::Json) => {
            serde_json::to_string_pretty(&engine.snapshot(selection, weights)?)?
        }
        (Command::Snapshot, OutputFormat::Table) => {
            render::snapshot_text(&engine.snapshot(selection, weights)?)
        }
    };
    Ok(output)
}

fn selection_hint(err: &AnalyticsError, universe: &Universe) -> Option<String> {
    match err {
        AnalyticsError::InsufficientData { operation, required, actual } => Some(format!(
            "Select at least {required} securities with data for {operation} ({actual} selected)"
        )),
        AnalyticsError::UnknownSecurity(name) => Some(format!(
            "Unknown security '{name}'; choose from: {}",
            universe.names().collect::<Vec<_>>().join(", ")
        )),
        AnalyticsError::WeightsMismatch { expected, actual } => Some(format!(
            "Expected {expected} weights, one per selected security, got {actual}"
        )),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use market_analytics::{PricePoint, PriceSeries};

    #[test]
    fn test_parse_full_command_line() {
        let args = Args::try_parse_from([
            "market-dash",
            "--period",
            "1y",
            "--stocks",
            "Apple,Microsoft",
            "--weights",
            "0.6,0.4",
            "--format",
            "json",
            "portfolio",
        ])
        .unwrap();

        assert_eq!(args.period, Some(LookbackPeriod::OneYear));
        assert_eq!(args.stocks, vec!["Apple", "Microsoft"]);
        assert_eq!(args.weights, vec![0.6, 0.4]);
        assert_eq!(args.format, OutputFormat::Json);
        assert!(matches!(args.command, Command::Portfolio));
    }

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["market-dash", "summary"]).unwrap();
        assert!(args.period.is_none());
        assert!(args.stocks.is_empty());
        assert!(args.risk_free.is_none());
        assert_eq!(args.format, OutputFormat::Table);
    }

    fn loaded_engine() -> AnalyticsEngine {
        let mut engine = AnalyticsEngine::new(
            Universe::major_stocks(),
            Arc::new(YahooFinanceClient::default()),
            AnalyticsConfig::default(),
        );
        for (name, symbol, closes) in [
            ("Apple", "AAPL", [100.0, 102.0, 101.0, 104.0]),
            ("Microsoft", "MSFT", [300.0, 297.0, 303.0, 306.0]),
        ] {
            let points = closes
                .iter()
                .enumerate()
                .map(|(i, &close)| {
                    let date = NaiveDate::from_ymd_opt(2024, 5, 1 + i as u32).unwrap();
                    PricePoint::new(date, close)
                })
                .collect();
            engine
                .insert_series(name, PriceSeries::new(symbol, points).unwrap())
                .unwrap();
        }
        engine
    }

    #[test]
    fn test_single_security_correlation_is_a_message() {
        let engine = loaded_engine();
        let output = dispatch(
            &engine,
            Command::Correlation,
            OutputFormat::Table,
            &Selection::of(["Apple"]),
            None,
        )
        .unwrap();
        assert!(output.starts_with("Select at least 2 securities"));
    }

    #[test]
    fn test_unknown_security_lists_choices() {
        let engine = loaded_engine();
        let output = dispatch(
            &engine,
            Command::Portfolio,
            OutputFormat::Json,
            &Selection::of(["Acme"]),
            None,
        )
        .unwrap();
        assert!(output.contains("'Acme'"));
        assert!(output.contains("Microsoft"));
    }

    #[test]
    fn test_weights_mismatch_is_a_message() {
        let engine = loaded_engine();
        let weights = PortfolioWeights::new(vec![1.0]);
        let output = dispatch(
            &engine,
            Command::Portfolio,
            OutputFormat::Table,
            &Selection::all(),
            Some(&weights),
        )
        .unwrap();
        assert!(output.starts_with("Expected 2 weights"));
    }

    #[test]
    fn test_dispatch_renders_loaded_data() {
        let engine = loaded_engine();
        let json = dispatch(
            &engine,
            Command::Correlation,
            OutputFormat::Json,
            &Selection::all(),
            None,
        )
        .unwrap();
        assert!(json.contains("\"Apple\""));

        let table =
            dispatch(&engine, Command::Summary, OutputFormat::Table, &Selection::all(), None)
                .unwrap();
        assert!(table.contains("MSFT"));
    }

    #[test]
    fn test_rejects_unknown_period() {
        assert!(Args::try_parse_from(["market-dash", "--period", "3w", "summary"]).is_err());
    }
}
