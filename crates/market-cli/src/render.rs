//! Terminal rendering of analytics results

use comfy_table::{Cell, CellAlignment, ContentArrangement, Table, presets::UTF8_FULL};
use market_analytics::{
    CorrelationMatrix, DashboardSnapshot, PortfolioSummary, SecuritySummary, SharpeRating,
};

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn number(value: f64, precision: usize) -> Cell {
    Cell::new(format!("{value:.precision$}")).set_alignment(CellAlignment::Right)
}

fn percent(value: f64) -> Cell {
    Cell::new(format!("{value:.2}%")).set_alignment(CellAlignment::Right)
}

fn rating_label(rating: SharpeRating) -> &'static str {
    match rating {
        SharpeRating::Strong => "strong",
        SharpeRating::Moderate => "moderate",
        SharpeRating::Weak => "weak",
    }
}

pub fn summary_table(summaries: &[SecuritySummary]) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        "Stock", "Symbol", "Price", "Total", "Annual", "Volatility", "Sharpe", "Rating",
        "Max DD", "VaR", "Beta", "Win rate", "Days",
    ]);

    for s in summaries {
        table.add_row(vec![
            Cell::new(&s.name),
            Cell::new(&s.symbol),
            number(s.current_price, 2),
            percent(s.total_return),
            percent(s.annualized_return),
            percent(s.volatility),
            number(s.sharpe_ratio, 2),
            Cell::new(rating_label(s.sharpe_rating())),
            percent(s.max_drawdown),
            percent(s.var_95),
            s.beta.map_or_else(|| Cell::new("n/a"), |b| number(b, 2)),
            percent(s.win_rate),
            Cell::new(s.trading_days).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

pub fn correlation_table(matrix: &CorrelationMatrix) -> Table {
    let mut table = new_table();
    let mut header = vec![String::new()];
    header.extend(matrix.names().iter().cloned());
    table.set_header(header);

    for (name, row) in matrix.names().iter().zip(matrix.values()) {
        let mut cells = vec![Cell::new(name)];
        cells.extend(row.iter().map(|v| number(*v, 3)));
        table.add_row(cells);
    }
    table
}

pub fn portfolio_table(summary: &PortfolioSummary) -> Table {
    let m = &summary.metrics;
    let mut table = new_table();
    table.set_header(vec!["Metric", "Value"]);
    table.add_row(vec![Cell::new("Securities"), Cell::new(summary.portfolio_size)]);
    table.add_row(vec![Cell::new("Annual return"), percent(m.portfolio_return)]);
    table.add_row(vec![Cell::new("Volatility"), percent(m.portfolio_volatility)]);
    table.add_row(vec![Cell::new("Sharpe ratio"), number(m.portfolio_sharpe, 2)]);
    table.add_row(vec![Cell::new("VaR"), percent(m.portfolio_var)]);
    table.add_row(vec![Cell::new("Max drawdown"), percent(m.portfolio_max_drawdown)]);
    table.add_row(vec![Cell::new("Diversification"), number(m.diversification_ratio, 2)]);
    table.add_row(vec![Cell::new("Avg correlation"), number(summary.avg_correlation, 3)]);
    table.add_row(vec![Cell::new("Aligned days"), Cell::new(summary.data_points)]);
    table.add_row(vec![Cell::new("Observations"), Cell::new(summary.total_observations)]);
    table.add_row(vec![Cell::new("Years"), number(summary.analysis_years, 1)]);
    table.add_row(vec![Cell::new("Risk-free rate"), percent(summary.risk_free_rate * 100.0)]);
    table
}

pub fn snapshot_text(snapshot: &DashboardSnapshot) -> String {
    let period = snapshot
        .period
        .map_or_else(|| "custom".to_string(), |p| p.to_string());

    let mut sections = vec![
        format!(
            "Period {period}, risk-free rate {:.2}%",
            snapshot.risk_free_rate * 100.0
        ),
        summary_table(&snapshot.securities).to_string(),
    ];
    if let Some(correlation) = &snapshot.correlation {
        sections.push(correlation_table(correlation).to_string());
    }
    if let Some(portfolio) = &snapshot.portfolio {
        sections.push(portfolio_table(portfolio).to_string());
    }
    sections.extend(snapshot.failures.iter().map(|failure| {
        format!(
            "Unavailable: {} ({}): {}",
            failure.name, failure.symbol, failure.reason
        )
    }));
    sections.join("\n")
}
