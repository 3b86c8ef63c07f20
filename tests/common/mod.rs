#![allow(dead_code)]

use std::{
    path::{Path, PathBuf},
    sync::Mutex,
};

use chrono::NaiveDate;
use dre_core::{
    calendar::DateWindow,
    domain::{
        AnalysisInput, BalanceSheet, CatalogEntry, Dimension, ExpenseRecord,
        FinancialIncomeRecord, Goal, GoalMetric, PaymentStatus, RawAmount, RawStatus,
        RawTransaction,
    },
};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn month_window(y: i32, m: u32) -> DateWindow {
    DateWindow::month_of(date(y, m, 1))
}

pub fn month_input(y: i32, m: u32) -> AnalysisInput {
    let window = month_window(y, m);
    AnalysisInput::new(window.start, window.end)
}

/// A paid sale without dimension keys.
pub fn sale(id: &str, amount: f64, day: NaiveDate) -> RawTransaction {
    RawTransaction {
        id: Some(dre_core::domain::RawId::Text(id.to_string())),
        amount: Some(RawAmount::from(amount)),
        date: Some(day.to_string()),
        status: Some(RawStatus::Flag(true)),
        ..RawTransaction::default()
    }
}

pub fn open_sale(id: &str, amount: f64, day: NaiveDate, due: NaiveDate) -> RawTransaction {
    RawTransaction {
        status: Some(RawStatus::Flag(false)),
        due_date: Some(due.to_string()),
        ..sale(id, amount, day)
    }
}

/// A March 2024 request with a year of history, two units, catalogs, a
/// balance sheet and goals.
pub fn sample_input() -> AnalysisInput {
    let mut input = month_input(2024, 3);
    let mut transactions = Vec::new();
    for month in 1..=12u32 {
        let day = date(2023, month, 10);
        transactions.push(RawTransaction {
            customer_id: Some(format!("c{}", month % 4)),
            unit_id: Some("matriz".into()),
            ..sale(&format!("h{month}"), 10_000.0 + 500.0 * month as f64, day)
        });
    }
    for (idx, month) in [1u32, 2].iter().enumerate() {
        transactions.push(RawTransaction {
            customer_id: Some("c1".into()),
            unit_id: Some("filial".into()),
            ..sale(&format!("y{idx}"), 15_000.0, date(2024, *month, 12))
        });
    }
    transactions.push(RawTransaction {
        cost: Some(RawAmount::from(6_000.0)),
        customer_id: Some("c1".into()),
        unit_id: Some("matriz".into()),
        cost_center_id: Some("cc-sales".into()),
        seller_id: Some("ana".into()),
        store_id: Some("s1".into()),
        channel_id: Some("web".into()),
        ..sale("m1", 12_000.0, date(2024, 3, 4))
    });
    transactions.push(RawTransaction {
        cost: Some(RawAmount::Text("1.500,00".into())),
        tax: Some(RawAmount::from(300.0)),
        customer_id: Some("c9".into()),
        unit_id: Some("filial".into()),
        cost_center_id: Some("cc-ops".into()),
        seller_id: Some("bia".into()),
        store_id: Some("s2".into()),
        channel_id: Some("store".into()),
        ..open_sale("m2", 4_000.0, date(2024, 3, 1), date(2024, 3, 5))
    });
    transactions.push(RawTransaction {
        customer_id: Some("c1".into()),
        unit_id: Some("matriz".into()),
        status: Some(RawStatus::Label("Pago".into())),
        ..sale("m3", 2_000.0, date(2024, 3, 20))
    });
    input.transactions = transactions;

    input.expense_records = vec![
        ExpenseRecord::new("e1", 3_000.0, date(2024, 3, 5), "aluguel")
            .with_unit("matriz")
            .with_cost_center("cc-ops"),
        ExpenseRecord::new("e2", 4_000.0, date(2024, 3, 5), "salarios").with_unit("matriz"),
        ExpenseRecord::new("e3", 1_000.0, date(2024, 3, 8), "marketing")
            .with_unit("filial")
            .with_cost_center("cc-sales"),
        ExpenseRecord::new("e4", 200.0, date(2024, 3, 9), "juros").with_unit("matriz"),
        ExpenseRecord::new("e5", 500.0, date(2024, 3, 15), "consultoria")
            .with_unit("filial")
            .with_status(PaymentStatus::Open),
    ];
    input.financial_income = vec![FinancialIncomeRecord {
        id: "f1".into(),
        amount: 150.0,
        date: date(2024, 3, 28),
        unit_id: Some("matriz".into()),
    }];
    input.dimension_catalogs.insert(
        Dimension::CostCenter,
        vec![
            CatalogEntry::new("cc-sales", "Sales"),
            CatalogEntry::new("cc-ops", "Operations"),
            CatalogEntry::new("cc-rnd", "Research"),
        ],
    );
    input.balance_sheet = Some(BalanceSheet {
        current_assets: Some(50_000.0),
        current_liabilities: Some(25_000.0),
        cash: Some(20_000.0),
        reserves: Some(42_000.0),
        ..BalanceSheet::default()
    });
    input.goals = vec![
        Goal {
            id: "g-revenue".into(),
            label: "March revenue".into(),
            metric: GoalMetric::Revenue,
            target: 20_000.0,
        },
        Goal {
            id: "g-count".into(),
            label: String::new(),
            metric: GoalMetric::TransactionCount,
            target: 3.0,
        },
    ];
    input.units = vec!["matriz".into(), "filial".into()];
    input
}

/// A directory removed when the test binary exits.
pub fn temp_dir() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let path = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    path
}

pub fn write_request(dir: &Path, input: &AnalysisInput) -> PathBuf {
    let path = dir.join("request.json");
    let json = serde_json::to_string_pretty(input).expect("serialize request");
    std::fs::write(&path, json).expect("write request");
    path
}
