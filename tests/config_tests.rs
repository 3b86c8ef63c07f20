mod common;

use std::fs;

use dre_core::{
    config::{AnalysisConfig, ConfigLoader},
    domain::ExpenseGroup,
    EngineError,
};
use tempfile::TempDir;

#[test]
fn missing_file_yields_defaults() {
    let dir = TempDir::new().unwrap();
    let config = ConfigLoader::load(&dir.path().join("absent.json")).unwrap();
    assert_eq!(config, AnalysisConfig::default());
}

#[test]
fn file_overrides_selected_fields() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    fs::write(
        &path,
        r#"{
            "tax_rate_estimate": 0.08,
            "aging_bucket_boundaries": [15, 45],
            "currency": "USD",
            "category_map": { "software": "administrative" }
        }"#,
    )
    .unwrap();

    let config = ConfigLoader::load(&path).unwrap();
    assert_eq!(config.tax_rate_estimate, Some(0.08));
    assert_eq!(config.aging_bucket_boundaries, vec![15, 45]);
    assert_eq!(config.currency, "USD");
    assert_eq!(config.expense_group("Software"), Some(ExpenseGroup::Administrative));
    assert_eq!(config.expense_group("aluguel"), None);
    assert_eq!(config.top_products, 20);
}

#[test]
fn invalid_values_are_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{ "tax_rate_estimate": 1.5 }"#).unwrap();
    assert!(matches!(
        ConfigLoader::load(&path).unwrap_err(),
        EngineError::InvalidConfig(_)
    ));

    fs::write(&path, "{ not json").unwrap();
    assert!(matches!(
        ConfigLoader::load(&path).unwrap_err(),
        EngineError::Serde(_)
    ));
}

#[test]
fn default_path_follows_home_override() {
    let home = common::temp_dir();
    std::env::set_var("DRE_CORE_HOME", &home);
    assert_eq!(ConfigLoader::default_path(), home.join("config.json"));

    fs::write(home.join("config.json"), r#"{ "top_debtors": 3 }"#).unwrap();
    assert_eq!(ConfigLoader::load_default().unwrap().top_debtors, 3);
    std::env::remove_var("DRE_CORE_HOME");
}

#[test]
fn category_lookup_ignores_case_and_spaces() {
    let config = AnalysisConfig::default();
    assert_eq!(config.expense_group("  Salarios "), Some(ExpenseGroup::Personnel));
    assert_eq!(config.expense_group("JUROS"), Some(ExpenseGroup::Financial));
    assert_eq!(config.expense_group("consultoria"), None);
}
