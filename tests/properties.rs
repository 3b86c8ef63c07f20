mod common;

use common::{date, month_window};
use dre_core::{
    config::AnalysisConfig,
    core::{DreService, GrowthService, IndicatorService, RecordSet, RentabilityService},
    domain::{
        Dimension, ExpenseRecord, GrowthStatus, PaymentStatus, ProductLine, TransactionRecord,
    },
};
use quickcheck_macros::quickcheck;

const UNITS: [&str; 2] = ["north", "south"];
const CATEGORIES: [&str; 4] = ["rent", "salaries", "interest", "misc"];

fn transactions(rows: &[(u16, u16, u8, bool)]) -> Vec<TransactionRecord> {
    rows.iter()
        .enumerate()
        .map(|(idx, (amount, cost, day, paid))| {
            let status = if *paid { PaymentStatus::Paid } else { PaymentStatus::Open };
            TransactionRecord::new(
                format!("t{idx}"),
                *amount as f64 + 1.0,
                date(2024, 7, (*day as u32 % 31) + 1),
            )
            .with_cost(*cost as f64 / 2.0)
            .with_status(status)
            .with_unit(UNITS[idx % 2])
            .with_dimension(Dimension::Seller, format!("s{}", idx % 3))
        })
        .collect()
}

fn expenses(rows: &[(u16, u8)]) -> Vec<ExpenseRecord> {
    rows.iter()
        .enumerate()
        .map(|(idx, (amount, day))| {
            ExpenseRecord::new(
                format!("e{idx}"),
                *amount as f64,
                date(2024, 7, (*day as u32 % 31) + 1),
                CATEGORIES[idx % CATEGORIES.len()],
            )
            .with_unit(UNITS[idx % 2])
        })
        .collect()
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-6 * (1.0 + a.abs().max(b.abs()))
}

#[quickcheck]
fn statement_cascade_holds(rows: Vec<(u16, u16, u8, bool)>, costs: Vec<(u16, u8)>) -> bool {
    let set = RecordSet::new(transactions(&rows), expenses(&costs), Vec::new());
    let dre = DreService::consolidate(&set, &month_window(2024, 7), None, &AnalysisConfig::default())
        .unwrap()
        .dre;
    close(dre.net_revenue, dre.gross_revenue - dre.taxes - dre.discounts - dre.returns)
        && close(dre.gross_margin, dre.net_revenue - dre.cost_of_goods_sold)
        && close(dre.operating_result, dre.gross_margin - dre.total_operating_expenses)
        && close(
            dre.net_result_before_tax,
            dre.operating_result - dre.financial_expenses + dre.financial_income,
        )
}

#[quickcheck]
fn units_sum_to_union(rows: Vec<(u16, u16, u8, bool)>, costs: Vec<(u16, u8)>) -> bool {
    let set = RecordSet::new(transactions(&rows), expenses(&costs), Vec::new());
    let window = month_window(2024, 7);
    let config = AnalysisConfig::default();
    let units: Vec<String> = UNITS.iter().map(|unit| unit.to_string()).collect();
    let summed = DreService::consolidate_units(&set, &window, &units, &config)
        .unwrap()
        .consolidated;
    let union = DreService::consolidate(&set, &window, None, &config).unwrap().dre;
    close(summed.gross_revenue, union.gross_revenue)
        && close(summed.net_result_before_tax, union.net_result_before_tax)
        && summed.transaction_count == union.transaction_count
}

#[quickcheck]
fn participation_sums_to_one_hundred(rows: Vec<(u16, u16, u8, bool)>) -> bool {
    let txns = transactions(&rows);
    let entries = RentabilityService::aggregate_by_dimension(
        &txns,
        &[],
        Dimension::Seller,
        &[],
        &AnalysisConfig::default(),
    );
    let total: f64 = entries.iter().map(|entry| entry.participation_percent).sum();
    if txns.is_empty() {
        entries.is_empty()
    } else {
        close(total, 100.0)
    }
}

#[quickcheck]
fn product_participation_covers_everything_after_top_n(
    baskets: Vec<Vec<(u8, u16)>>,
    top: u8,
) -> bool {
    let txns: Vec<TransactionRecord> = baskets
        .iter()
        .enumerate()
        .map(|(idx, basket)| {
            let mut txn = TransactionRecord::new(format!("t{idx}"), 1.0, date(2024, 7, 1));
            txn.products = basket
                .iter()
                .map(|(product, amount)| ProductLine {
                    product_id: format!("p{}", product % 12),
                    amount: *amount as f64 + 1.0,
                    cost: 0.0,
                })
                .collect();
            txn
        })
        .collect();
    let config = AnalysisConfig {
        top_products: (top % 4) as usize + 1,
        ..AnalysisConfig::default()
    };
    let entries = RentabilityService::aggregate_by_dimension(
        &txns,
        &[],
        Dimension::Product,
        &[],
        &config,
    );
    let total: f64 = entries.iter().map(|entry| entry.participation_percent).sum();
    let revenue: f64 = entries.iter().map(|entry| entry.revenue).sum();
    let expected_revenue: f64 = txns
        .iter()
        .map(|txn| {
            if txn.products.is_empty() {
                txn.amount
            } else {
                txn.products.iter().map(|line| line.amount).sum()
            }
        })
        .sum();
    entries.len() <= config.top_products + 1
        && close(revenue, expected_revenue)
        && (txns.is_empty() || close(total, 100.0))
}

#[quickcheck]
fn aging_buckets_partition_overdue(rows: Vec<(u16, u16, u8, bool)>, offset: u8) -> bool {
    let txns = transactions(&rows);
    let reference = date(2024, 7, 31) + chrono::Duration::days(offset as i64);
    let delinquency = IndicatorService::delinquency(&txns, reference, &AnalysisConfig::default());
    let counted: usize = delinquency.aging.iter().map(|bucket| bucket.count).sum();
    let valued: f64 = delinquency.aging.iter().map(|bucket| bucket.value).sum();
    counted == delinquency.overdue_count && close(valued, delinquency.overdue_value)
}

#[quickcheck]
fn growth_status_follows_sign(current: u32, previous: u32) -> bool {
    let result = GrowthService::growth_rate(current as f64, previous as f64, 0.5);
    match result.status {
        GrowthStatus::Growth => current > previous,
        GrowthStatus::Decline => current < previous,
        GrowthStatus::Stable => result.percent.abs() <= 0.5,
    }
}
