mod common;

use common::{date, month_input, sale, sample_input};
use dre_core::{
    config::AnalysisConfig,
    domain::{AnalysisInput, GoalStatus, UnitScope, WarningKind},
    EngineError, FinancialReport, ReportService,
};

#[test]
fn sample_statement() {
    let report = ReportService::build(&sample_input()).unwrap();
    let dre = &report.dre;

    assert_eq!(dre.scope, UnitScope::All);
    assert_eq!(dre.transaction_count, 3);
    assert_eq!(dre.gross_revenue, 18_000.0);
    // m2 carries an explicit tax of 300, the other two are estimated at 15%
    assert_eq!(dre.taxes, 2_400.0);
    assert_eq!(dre.estimated_taxes, 2_100.0);
    assert_eq!(dre.net_revenue, 15_600.0);
    assert_eq!(dre.cost_of_goods_sold, 7_500.0);
    assert_eq!(dre.gross_margin, 8_100.0);
    assert_eq!(dre.operating_expenses.administrative, 3_000.0);
    assert_eq!(dre.operating_expenses.personnel, 4_000.0);
    assert_eq!(dre.operating_expenses.marketing, 1_000.0);
    assert_eq!(dre.operating_expenses.other, 500.0);
    assert_eq!(dre.operating_result, -400.0);
    assert_eq!(dre.financial_expenses, 200.0);
    assert_eq!(dre.financial_income, 150.0);
    assert_eq!(dre.net_result_before_tax, -450.0);
    assert_eq!(dre.unclassified_categories, vec!["consultoria".to_string()]);
}

#[test]
fn sample_warnings_and_goals() {
    let report = ReportService::build(&sample_input()).unwrap();

    let unclassified: Vec<_> = report
        .warnings
        .iter()
        .filter(|warning| warning.kind == WarningKind::UnclassifiedExpense)
        .collect();
    assert_eq!(unclassified.len(), 1);
    assert_eq!(unclassified[0].record_id.as_deref(), Some("e5"));
    assert!(report
        .warnings
        .iter()
        .any(|warning| warning.kind == WarningKind::DueDateInferred));
    assert!(!report
        .warnings
        .iter()
        .any(|warning| warning.kind == WarningKind::MalformedRecord));

    assert_eq!(report.goals.len(), 2);
    assert_eq!(report.goals[0].status, GoalStatus::OnTrack);
    assert_eq!(report.goals[0].attained_percent.value, 90.0);
    assert_eq!(report.goals[1].status, GoalStatus::Achieved);
}

#[test]
fn unit_comparison_matches_consolidated_totals() {
    let report = ReportService::build(&sample_input()).unwrap();
    let comparison = report.unit_comparison.as_ref().expect("units requested");

    assert_eq!(comparison.units.len(), 2);
    assert_eq!(comparison.units[0].scope, UnitScope::Unit("matriz".into()));
    assert_eq!(comparison.units[0].gross_revenue, 14_000.0);
    assert_eq!(comparison.units[1].gross_revenue, 4_000.0);
    assert_eq!(comparison.consolidated.gross_revenue, report.dre.gross_revenue);
    assert_eq!(
        comparison.consolidated.net_result_before_tax,
        report.dre.net_result_before_tax
    );
}

#[test]
fn unit_filter_restricts_every_section() {
    let mut input = sample_input();
    input.unit_filter = Some("filial".into());
    let report = ReportService::build(&input).unwrap();

    assert_eq!(report.dre.scope, UnitScope::Unit("filial".into()));
    assert_eq!(report.dre.gross_revenue, 4_000.0);
    assert_eq!(report.growth.mom.previous, 15_000.0);
    assert_eq!(report.recurrence.customers, 1);
}

#[test]
fn missing_tax_rate_rejects_the_request() {
    let mut input = month_input(2024, 3);
    input.transactions = vec![sale("t", 100.0, date(2024, 3, 2))];
    input.config = Some(AnalysisConfig {
        tax_rate_estimate: None,
        ..AnalysisConfig::default()
    });

    let err = ReportService::build(&input).unwrap_err();
    assert!(matches!(err, EngineError::ConfigMissing(_)));
}

#[test]
fn invalid_config_rejects_the_request() {
    let mut input = sample_input();
    input.config = Some(AnalysisConfig {
        aging_bucket_boundaries: vec![60, 30],
        ..AnalysisConfig::default()
    });
    let err = ReportService::build(&input).unwrap_err();
    assert!(matches!(err, EngineError::InvalidConfig(_)));
}

#[test]
fn huge_payment_term_is_rejected_instead_of_overflowing() {
    let mut input = sample_input();
    input.config = Some(AnalysisConfig {
        default_due_days: 1_000_000_000_000_000,
        ..AnalysisConfig::default()
    });
    let err = ReportService::build(&input).unwrap_err();
    assert!(matches!(err, EngineError::InvalidConfig(_)));
}

#[test]
fn fingerprint_tracks_scope_and_assumptions() {
    let base = ReportService::build(&sample_input()).unwrap();
    let again = ReportService::build(&sample_input()).unwrap();
    assert_eq!(base.fingerprint, again.fingerprint);

    let mut changed = sample_input();
    changed.config = Some(AnalysisConfig {
        tax_rate_estimate: Some(0.10),
        ..AnalysisConfig::default()
    });
    let other = ReportService::build(&changed).unwrap();
    assert_ne!(base.fingerprint, other.fingerprint);
    assert_eq!(other.dre.taxes, 1_700.0);
}

#[test]
fn request_and_report_survive_json() {
    let input = sample_input();
    let json = serde_json::to_string(&input).unwrap();
    let parsed: AnalysisInput = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, input);

    let report = ReportService::build(&parsed).unwrap();
    let text = report.to_json(true).unwrap();
    let back: FinancialReport = serde_json::from_str(&text).unwrap();
    assert_eq!(back, report);
    assert!(text.contains("\"cost_center\""));
}

#[test]
fn request_accepts_loose_source_encodings() {
    let json = r#"{
        "window_start": "2024-03-01",
        "window_end": "2024-04-01",
        "transactions": [
            { "id": 7, "amount": "1.250,50", "date": "05/03/2024", "status": "pago" },
            { "amount": 100, "date": "2024-03-06T10:00:00", "paid": false },
            { "amount": 50 }
        ]
    }"#;
    let input: AnalysisInput = serde_json::from_str(json).unwrap();
    let report = ReportService::build(&input).unwrap();

    assert_eq!(report.dre.transaction_count, 2);
    assert_eq!(report.dre.gross_revenue, 1_350.5);
    assert!(report
        .warnings
        .iter()
        .any(|warning| warning.kind == WarningKind::MalformedRecord
            && warning.record_id.as_deref() == Some("row-3")));
}
