use std::fmt;

use colored::Colorize;

use crate::{
    currency::{format_currency_value, CurrencyCode, LocaleConfig, NegativeStyle},
    domain::{
        Dimension, FinancialReport, GrowthStatus, ProfitStatus, RentabilityEntry, StatementLine,
    },
    finance::Classification,
};

/// Message categories used by the summary printer.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Warning,
    Section,
}

fn apply_style(kind: MessageKind, message: impl fmt::Display) -> String {
    let text = message.to_string();
    match kind {
        MessageKind::Section => format!("=== {} ===", text.trim()).bold().to_string(),
        MessageKind::Warning => format!("WARNING: {text}").bright_yellow().to_string(),
        MessageKind::Info => text,
    }
}

pub fn print(kind: MessageKind, message: impl fmt::Display) {
    let formatted = apply_style(kind, message);
    match kind {
        MessageKind::Section => println!("\n{formatted}"),
        MessageKind::Warning | MessageKind::Info => println!("{formatted}"),
    }
}

pub fn info(message: impl fmt::Display) {
    print(MessageKind::Info, message);
}

pub fn section(title: impl fmt::Display) {
    print(MessageKind::Section, title);
}

pub fn warning(message: impl fmt::Display) {
    print(MessageKind::Warning, message);
}

/// Totals are bold, negative amounts red.
fn statement_row(line: &StatementLine) -> String {
    let percent = line
        .percent_of_net_revenue
        .map(|p| format!("{p:>8.2}%"))
        .unwrap_or_default();
    let row = format!("{:<26}{:>22}{}", line.label, line.formatted, percent);
    let is_total = !line.label.starts_with('(');
    match (line.value < 0.0, is_total) {
        (true, true) => row.red().bold().to_string(),
        (true, false) => row.red().to_string(),
        (false, true) => row.bold().to_string(),
        (false, false) => row,
    }
}

fn classification_label(classification: Classification) -> String {
    let text = classification.to_string();
    match classification {
        Classification::Excellent => text.bright_green().to_string(),
        Classification::Adequate => text.green().to_string(),
        Classification::Attention => text.bright_yellow().to_string(),
        Classification::Critical => text.bright_red().to_string(),
        Classification::NotApplicable => text.dimmed().to_string(),
    }
}

fn rentability_row(entry: &RentabilityEntry, code: &CurrencyCode, locale: &LocaleConfig) -> String {
    let row = format!(
        "{:<26}{:>22}{:>22}{:>8.2}%",
        entry.name,
        format_currency_value(entry.revenue, code, locale, NegativeStyle::Parentheses),
        format_currency_value(entry.profit, code, locale, NegativeStyle::Parentheses),
        entry.participation_percent
    );
    match entry.status {
        ProfitStatus::Loss => row.red().to_string(),
        ProfitStatus::Breakeven => row.dimmed().to_string(),
        ProfitStatus::Profitable => row,
    }
}

fn growth_label(status: GrowthStatus) -> String {
    let text = status.to_string();
    match status {
        GrowthStatus::Growth => text.bright_green().to_string(),
        GrowthStatus::Decline => text.bright_red().to_string(),
        GrowthStatus::Stable => text,
    }
}

/// Human-readable digest of a report: statement, key indicators, warnings.
pub fn print_summary(
    report: &FinancialReport,
    locale: &LocaleConfig,
    dimension: Option<Dimension>,
) {
    let code = CurrencyCode::new(report.currency.as_str());

    section(format!("DRE {} ({})", report.window, report.dre.scope));
    for line in report.dre.statement_lines(&code, locale) {
        info(statement_row(&line));
    }

    if let Some(dimension) = dimension {
        section(format!("Rentability by {dimension}"));
        for entry in report.rentability.get(&dimension).into_iter().flatten() {
            info(rentability_row(entry, &code, locale));
        }
    }

    section("Indicators");
    let indicators = &report.indicators;
    for snapshot in [
        &indicators.liquidity.current_ratio,
        &indicators.delinquency.delinquency_rate,
        &indicators.efficiency.ltv_cac_ratio,
        &indicators.sustainability.reserve_coverage_months,
    ] {
        let value = if snapshot.is_applicable() {
            format!("{:.2}", snapshot.value)
        } else {
            "n/a".to_string()
        };
        let marker = if snapshot.estimated { " (estimated)" } else { "" };
        info(format!(
            "{:<28}{:>12}  {}{}",
            snapshot.name,
            value,
            classification_label(snapshot.classification),
            marker
        ));
    }

    section("Growth");
    let growth = &report.growth;
    info(format!(
        "{:<28}{:>11.2}%  {}",
        "month over month",
        growth.mom.percent,
        growth_label(growth.mom.status)
    ));
    info(format!(
        "{:<28}{:>11.2}%  {}",
        "year over year",
        growth.yoy.percent,
        growth_label(growth.yoy.status)
    ));
    info(format!(
        "{:<28}{:>12}",
        "volatility",
        report.seasonality.volatility_tier.to_string()
    ));

    if !report.warnings.is_empty() {
        section(format!("{} warning(s)", report.warnings.len()));
        for item in &report.warnings {
            warning(item);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statement_row_keeps_label_and_amount() {
        colored::control::set_override(false);
        let line = StatementLine {
            label: "Net revenue".into(),
            value: 850.0,
            formatted: "R$ 850,00".into(),
            percent_of_net_revenue: Some(100.0),
        };
        let row = statement_row(&line);
        assert!(row.starts_with("Net revenue"));
        assert!(row.contains("R$ 850,00"));
        assert!(row.ends_with("100.00%"));
    }

    #[test]
    fn rentability_row_shows_revenue_profit_and_share() {
        colored::control::set_override(false);
        let entry = RentabilityEntry {
            dimension: Dimension::Seller,
            id: "ana".into(),
            name: "ana".into(),
            revenue: 1_000.0,
            cost: 400.0,
            expense: 0.0,
            profit: 600.0,
            margin_percent: 60.0,
            participation_percent: 25.0,
            roi: crate::finance::Ratio::defined(150.0),
            status: ProfitStatus::Profitable,
            transaction_count: 2,
        };
        let row = rentability_row(&entry, &CurrencyCode::new("BRL"), &LocaleConfig::pt_br());
        assert!(row.starts_with("ana"));
        assert!(row.contains("R$ 1.000,00"));
        assert!(row.contains("R$ 600,00"));
        assert!(row.ends_with("25.00%"));
    }
}
