use std::{cmp::Ordering, collections::BTreeMap};

use tracing::debug;

use crate::{
    config::AnalysisConfig,
    domain::{
        CatalogEntry, Dimension, ExpenseRecord, ProfitStatus, RentabilityEntry, TransactionRecord,
    },
    finance::{margin_percent, percent_of, roi_percent},
};

/// Group key for records without a value in the requested dimension.
pub const UNASSIGNED_ID: &str = "unassigned";
const UNASSIGNED_NAME: &str = "Unassigned";
/// Row that folds every product beyond `top_products`.
pub const OTHERS_ID: &str = "others";
const OTHERS_NAME: &str = "Others";

#[derive(Debug, Default)]
struct GroupTotals {
    revenue: f64,
    cost: f64,
    expense: f64,
    transactions: usize,
}

pub struct RentabilityService;

impl RentabilityService {
    /// Profitability per value of `dimension`.
    ///
    /// `transactions` and `expenses` must already be scoped to the window and
    /// unit. Expenses only count for cost centers, and only once settled.
    /// Catalog entries without activity are emitted as breakeven rows.
    pub fn aggregate_by_dimension(
        transactions: &[TransactionRecord],
        expenses: &[ExpenseRecord],
        dimension: Dimension,
        catalog: &[CatalogEntry],
        config: &AnalysisConfig,
    ) -> Vec<RentabilityEntry> {
        let mut groups: BTreeMap<String, GroupTotals> = catalog
            .iter()
            .map(|entry| (entry.id.clone(), GroupTotals::default()))
            .collect();

        for txn in transactions {
            if dimension == Dimension::Product && !txn.products.is_empty() {
                for line in &txn.products {
                    let group = groups.entry(line.product_id.clone()).or_default();
                    group.revenue += line.amount;
                    group.cost += line.cost;
                    group.transactions += 1;
                }
                continue;
            }
            let key = txn.dimension_key(dimension).unwrap_or(UNASSIGNED_ID);
            let group = groups.entry(key.to_string()).or_default();
            group.revenue += txn.amount;
            group.cost += txn.cost;
            group.transactions += 1;
        }

        if dimension == Dimension::CostCenter {
            for expense in expenses.iter().filter(|expense| expense.is_settled()) {
                let key = expense.cost_center_id.as_deref().unwrap_or(UNASSIGNED_ID);
                groups.entry(key.to_string()).or_default().expense += expense.amount;
            }
        }

        let names: BTreeMap<&str, &str> = catalog
            .iter()
            .map(|entry| (entry.id.as_str(), entry.name.as_str()))
            .collect();
        let total_revenue: f64 = groups.values().map(|group| group.revenue).sum();

        let mut entries: Vec<RentabilityEntry> = groups
            .into_iter()
            .map(|(id, totals)| {
                let name = match names.get(id.as_str()) {
                    Some(name) => name.to_string(),
                    None if id == UNASSIGNED_ID => UNASSIGNED_NAME.to_string(),
                    None => id.clone(),
                };
                build_entry(dimension, id, name, &totals, total_revenue)
            })
            .collect();

        entries.sort_by(compare_entries);
        if dimension.is_unbounded() && entries.len() > config.top_products {
            let tail = entries.split_off(config.top_products);
            let folded = tail.iter().fold(GroupTotals::default(), |mut acc, entry| {
                acc.revenue += entry.revenue;
                acc.cost += entry.cost;
                acc.expense += entry.expense;
                acc.transactions += entry.transaction_count;
                acc
            });
            debug!(folded = tail.len(), "folded products beyond top_products");
            entries.push(build_entry(
                dimension,
                OTHERS_ID.to_string(),
                OTHERS_NAME.to_string(),
                &folded,
                total_revenue,
            ));
        }
        debug!(%dimension, entries = entries.len(), "aggregated rentability");
        entries
    }
}

fn build_entry(
    dimension: Dimension,
    id: String,
    name: String,
    totals: &GroupTotals,
    total_revenue: f64,
) -> RentabilityEntry {
    let profit = totals.revenue - totals.cost - totals.expense;
    RentabilityEntry {
        dimension,
        id,
        name,
        revenue: totals.revenue,
        cost: totals.cost,
        expense: totals.expense,
        profit,
        margin_percent: margin_percent(profit, totals.revenue),
        participation_percent: percent_of(totals.revenue, total_revenue),
        roi: roi_percent(profit, totals.cost + totals.expense),
        status: ProfitStatus::from_profit(profit),
        transaction_count: totals.transactions,
    }
}

/// Active rows first, then revenue descending, then id for a stable order.
fn compare_entries(a: &RentabilityEntry, b: &RentabilityEntry) -> Ordering {
    b.has_activity()
        .cmp(&a.has_activity())
        .then_with(|| b.revenue.total_cmp(&a.revenue))
        .then_with(|| a.id.cmp(&b.id))
}
