use std::collections::BTreeMap;

use tracing::{debug, info};

use super::{
    DreService, GoalService, GrowthService, IndicatorContext, IndicatorService, RecordSet,
    RentabilityService,
};
use crate::{
    calendar::month_start,
    currency::round_currency,
    domain::{
        validate_transactions, AnalysisInput, Dimension, FinancialReport, GoalAttainment, Warning,
        WarningKind,
    },
    errors::Result,
};

pub struct ReportService;

impl ReportService {
    /// Runs every engine over one request and rounds the result for output.
    ///
    /// Fails only for an invalid window or configuration. Malformed records
    /// are skipped and listed in `warnings`.
    pub fn build(input: &AnalysisInput) -> Result<FinancialReport> {
        let window = input.window()?;
        let config = input.effective_config();
        config.validate()?;
        let reference_date = input.reference_date(&window);
        let fingerprint = input.fingerprint()?;

        let validated = validate_transactions(&input.transactions, &config);
        let mut warnings = validated.warnings;
        let records = RecordSet::new(
            validated.records,
            input.expense_records.clone(),
            input.financial_income.clone(),
        );
        let unit = input.unit_filter.as_deref();
        let history = records.for_unit(unit);
        let scoped = history.within(&window);
        debug!(
            window = %window,
            history = history.transactions.len(),
            in_window = scoped.transactions.len(),
            "prepared records"
        );

        let statement = DreService::consolidate(&records, &window, unit, &config)?;
        warnings.extend(statement.warnings);
        let dre = statement.dre;

        let unit_comparison = if input.units.is_empty() {
            None
        } else {
            Some(DreService::consolidate_units(&records, &window, &input.units, &config)?.rounded())
        };

        let rentability: BTreeMap<Dimension, _> = Dimension::ALL
            .iter()
            .map(|dimension| {
                let catalog = input
                    .dimension_catalogs
                    .get(dimension)
                    .map(Vec::as_slice)
                    .unwrap_or(&[]);
                let entries = RentabilityService::aggregate_by_dimension(
                    &scoped.transactions,
                    &scoped.expenses,
                    *dimension,
                    catalog,
                    &config,
                )
                .iter()
                .map(|entry| entry.rounded())
                .collect::<Vec<_>>();
                (*dimension, entries)
            })
            .collect();

        let ctx = IndicatorContext {
            transactions: &scoped.transactions,
            history: &history.transactions,
            expenses: &scoped.expenses,
            dre: &dre,
            balance_sheet: input.balance_sheet.as_ref(),
            window,
            reference_date,
        };
        let indicators = IndicatorService::compute(&ctx, &config);
        let estimated: Vec<&str> = [
            &indicators.liquidity.current_ratio,
            &indicators.liquidity.quick_ratio,
            &indicators.liquidity.immediate_liquidity,
            &indicators.sustainability.reserve_coverage_months,
            &indicators.sustainability.debt_ratio,
            &indicators.sustainability.solvency_index,
        ]
        .into_iter()
        .filter(|snapshot| snapshot.estimated)
        .map(|snapshot| snapshot.name.as_str())
        .collect();
        if !estimated.is_empty() {
            warnings.push(Warning::new(
                WarningKind::EstimatedIndicator,
                None,
                format!(
                    "balance sheet incomplete; {} estimated from transactions",
                    estimated.join(", ")
                ),
            ));
        }

        let current_month = month_start(window.last_day());
        let series = GrowthService::monthly_series(&history.transactions, current_month);
        let growth = GrowthService::summary(&series, current_month, &config);
        let seasonality = GrowthService::seasonality(&series, &config);
        let forecast = GrowthService::forecast(&series, current_month, &config);
        let recurrence = GrowthService::recurrence(&scoped.transactions);

        let goals = GoalService::evaluate(
            &input.goals,
            &dre,
            indicators.efficiency.new_customers,
            &config,
        )
        .into_iter()
        .map(|goal| GoalAttainment {
            actual: round_currency(goal.actual),
            attained_percent: goal.attained_percent.map(round_currency),
            ..goal
        })
        .collect();

        info!(
            %fingerprint,
            transactions = dre.transaction_count,
            warnings = warnings.len(),
            "built financial report"
        );

        Ok(FinancialReport {
            fingerprint,
            window,
            reference_date,
            currency: config.currency.clone(),
            dre: dre.rounded(),
            unit_comparison,
            rentability,
            indicators: indicators.rounded(),
            growth: growth.rounded(),
            seasonality: seasonality.rounded(),
            forecast: forecast.rounded(),
            recurrence: recurrence.rounded(),
            goals,
            warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{CatalogEntry, RawAmount, RawTransaction, WarningKind},
        errors::EngineError,
    };
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn raw(amount: f64, day: &str) -> RawTransaction {
        RawTransaction {
            amount: Some(RawAmount::from(amount)),
            date: Some(day.to_string()),
            ..RawTransaction::default()
        }
    }

    #[test]
    fn inverted_window_is_rejected() {
        let input = AnalysisInput::new(date(2024, 5, 1), date(2024, 4, 1));
        let err = ReportService::build(&input).unwrap_err();
        assert!(matches!(err, EngineError::InvalidWindow { .. }));
    }

    #[test]
    fn malformed_rows_become_warnings() {
        let mut input = AnalysisInput::new(date(2024, 5, 1), date(2024, 6, 1));
        input.transactions = vec![
            raw(1_000.0, "2024-05-10"),
            RawTransaction {
                date: Some("2024-05-11".into()),
                ..RawTransaction::default()
            },
        ];
        let report = ReportService::build(&input).unwrap();
        assert_eq!(report.dre.transaction_count, 1);
        assert!(report
            .warnings
            .iter()
            .any(|warning| warning.kind == WarningKind::MalformedRecord));
    }

    #[test]
    fn report_covers_every_dimension() {
        let mut input = AnalysisInput::new(date(2024, 5, 1), date(2024, 6, 1));
        input.transactions = vec![raw(250.0, "2024-05-03")];
        input
            .dimension_catalogs
            .insert(Dimension::CostCenter, vec![CatalogEntry::new("cc1", "Ops")]);
        let report = ReportService::build(&input).unwrap();
        assert_eq!(report.rentability.len(), Dimension::ALL.len());
        assert!(report.rentability[&Dimension::CostCenter]
            .iter()
            .any(|entry| entry.id == "cc1"));
        assert_eq!(report.currency, "BRL");
        assert_eq!(report.reference_date, date(2024, 5, 31));
        assert!(report.unit_comparison.is_none());
    }

    #[test]
    fn identical_requests_produce_identical_reports() {
        let mut input = AnalysisInput::new(date(2024, 5, 1), date(2024, 6, 1));
        input.transactions = vec![raw(10.0, "2024-05-03"), raw(20.0, "2024-04-03")];
        let first = ReportService::build(&input).unwrap();
        let second = ReportService::build(&input).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.to_json(false).unwrap(), second.to_json(false).unwrap());
    }
}
