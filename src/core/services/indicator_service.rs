//! Liquidity, delinquency, efficiency and sustainability indicators.
//!
//! Balance-sheet figures are optional. Whatever is missing is estimated from
//! the transaction stream and every snapshot built on an estimate is flagged
//! `estimated` with a note naming the heuristic.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::{
    calendar::{aging_bucket_index, aging_bucket_labels, DateWindow},
    config::AnalysisConfig,
    domain::{
        AgingBucket, BalanceSheet, ConsolidatedDre, DebtorRanking, DelinquencyIndicators,
        EfficiencyIndicators, ExpenseRecord, IndicatorSet, IndicatorSnapshot,
        LiquidityIndicators, SustainabilityIndicators, TransactionRecord,
    },
    finance::{
        cash_conversion_cycle, current_ratio, customer_acquisition_cost, days_outstanding,
        delinquency_rate, immediate_liquidity, lifetime_value, percent_of, quick_ratio,
        safe_ratio, Ratio,
    },
};

const UNIDENTIFIED_CUSTOMER: &str = "unidentified";

/// Everything the indicator families read.
#[derive(Debug, Clone, Copy)]
pub struct IndicatorContext<'a> {
    /// In-window transactions of the analysed scope.
    pub transactions: &'a [TransactionRecord],
    /// Every supplied transaction of the scope, used to tell new customers apart.
    pub history: &'a [TransactionRecord],
    /// In-window expenses of the analysed scope.
    pub expenses: &'a [ExpenseRecord],
    pub dre: &'a ConsolidatedDre,
    pub balance_sheet: Option<&'a BalanceSheet>,
    pub window: DateWindow,
    pub reference_date: NaiveDate,
}

#[derive(Debug, Clone, Copy)]
struct Figure {
    value: f64,
    estimate: Option<&'static str>,
}

impl Figure {
    fn reported(value: f64) -> Self {
        Self {
            value,
            estimate: None,
        }
    }

    fn estimated(value: f64, how: &'static str) -> Self {
        Self {
            value,
            estimate: Some(how),
        }
    }

    fn or_estimate(reported: Option<f64>, fallback: f64, how: &'static str) -> Self {
        match reported {
            Some(value) => Self::reported(value),
            None => Self::estimated(fallback, how),
        }
    }
}

/// Balance-sheet view with gaps filled from transactions.
#[derive(Debug, Clone, Copy)]
struct BalanceView {
    receivables: f64,
    payables: f64,
    current_assets: Figure,
    current_liabilities: Figure,
    inventory: Figure,
    cash: Figure,
    total_assets: Figure,
    total_liabilities: Figure,
    reserves: Figure,
}

impl BalanceView {
    fn resolve(ctx: &IndicatorContext<'_>) -> Self {
        let sheet = ctx.balance_sheet.cloned().unwrap_or_default();
        let receivables: f64 = ctx.transactions.iter().map(TransactionRecord::outstanding).sum();
        let payables: f64 = ctx
            .expenses
            .iter()
            .filter(|expense| !expense.is_settled())
            .map(|expense| expense.amount)
            .sum();
        let paid_in: f64 = ctx
            .transactions
            .iter()
            .filter(|txn| txn.status.is_paid())
            .map(|txn| txn.amount)
            .sum();
        let paid_out: f64 = ctx
            .expenses
            .iter()
            .filter(|expense| expense.is_settled())
            .map(|expense| expense.amount)
            .sum();

        let cash = Figure::or_estimate(
            sheet.cash,
            (paid_in - paid_out).max(0.0),
            "cash estimated as paid revenue minus settled expenses in the window",
        );
        let current_assets = Figure::or_estimate(
            sheet.current_assets,
            receivables + cash.value,
            "current assets estimated as open receivables plus cash",
        );
        let current_liabilities = Figure::or_estimate(
            sheet.current_liabilities,
            payables,
            "current liabilities estimated as unsettled expenses in the window",
        );
        let inventory = Figure::or_estimate(sheet.inventory, 0.0, "inventory unavailable; assumed zero");
        let total_assets = Figure::or_estimate(
            sheet.total_assets,
            current_assets.value,
            "total assets estimated as current assets",
        );
        let total_liabilities = Figure::or_estimate(
            sheet.total_liabilities,
            current_liabilities.value,
            "total liabilities estimated as current liabilities",
        );
        let reserves = match sheet.reserves {
            Some(value) => Figure::reported(value),
            None => Figure {
                value: cash.value,
                estimate: Some("reserves estimated as available cash"),
            },
        };

        Self {
            receivables,
            payables,
            current_assets,
            current_liabilities,
            inventory,
            cash,
            total_assets,
            total_liabilities,
            reserves,
        }
    }

    fn any_estimated(&self) -> bool {
        [
            self.current_assets,
            self.current_liabilities,
            self.inventory,
            self.cash,
            self.total_assets,
            self.total_liabilities,
            self.reserves,
        ]
        .iter()
        .any(|figure| figure.estimate.is_some())
    }
}

fn with_figures(mut snapshot: IndicatorSnapshot, figures: &[(&str, Figure)]) -> IndicatorSnapshot {
    for (key, figure) in figures {
        snapshot = snapshot.input(key, figure.value);
        if let Some(how) = figure.estimate {
            snapshot = snapshot.estimated_with(how);
        }
    }
    snapshot
}

pub struct IndicatorService;

impl IndicatorService {
    pub fn compute(ctx: &IndicatorContext<'_>, config: &AnalysisConfig) -> IndicatorSet {
        let balance = BalanceView::resolve(ctx);
        if balance.any_estimated() {
            warn!("balance sheet incomplete; indicators use estimated inputs");
        }
        IndicatorSet {
            liquidity: Self::liquidity_with(ctx, &balance, config),
            delinquency: Self::delinquency(ctx.transactions, ctx.reference_date, config),
            efficiency: Self::efficiency(ctx, config),
            sustainability: Self::sustainability_with(ctx, &balance, config),
        }
    }

    pub fn liquidity(ctx: &IndicatorContext<'_>, config: &AnalysisConfig) -> LiquidityIndicators {
        Self::liquidity_with(ctx, &BalanceView::resolve(ctx), config)
    }

    fn liquidity_with(
        ctx: &IndicatorContext<'_>,
        balance: &BalanceView,
        config: &AnalysisConfig,
    ) -> LiquidityIndicators {
        let thresholds = &config.liquidity_thresholds;
        let days = ctx.window.day_count() as f64;
        let assets = ("current_assets", balance.current_assets);
        let liabilities = ("current_liabilities", balance.current_liabilities);

        let current = with_figures(
            IndicatorSnapshot::new(
                "current_ratio",
                current_ratio(balance.current_assets.value, balance.current_liabilities.value),
            ),
            &[assets, liabilities],
        )
        .classified(thresholds);
        let quick = with_figures(
            IndicatorSnapshot::new(
                "quick_ratio",
                quick_ratio(
                    balance.current_assets.value,
                    balance.inventory.value,
                    balance.current_liabilities.value,
                ),
            ),
            &[assets, ("inventory", balance.inventory), liabilities],
        )
        .classified(thresholds);
        let immediate = with_figures(
            IndicatorSnapshot::new(
                "immediate_liquidity",
                immediate_liquidity(balance.cash.value, balance.current_liabilities.value),
            ),
            &[("cash", balance.cash), liabilities],
        )
        .classified(thresholds);

        let receivable_ratio = days_outstanding(balance.receivables, ctx.dre.gross_revenue, days);
        let receivable_days = IndicatorSnapshot::new("receivable_days", receivable_ratio)
            .input("receivables", balance.receivables)
            .input("gross_revenue", ctx.dre.gross_revenue)
            .input("period_days", days);

        let inventory_days = match ctx.balance_sheet.and_then(|sheet| sheet.inventory) {
            Some(inventory) => IndicatorSnapshot::new(
                "inventory_days",
                days_outstanding(inventory, ctx.dre.cost_of_goods_sold, days),
            )
            .input("inventory", inventory)
            .input("cost_of_goods_sold", ctx.dre.cost_of_goods_sold)
            .input("period_days", days),
            None => IndicatorSnapshot::new(
                "inventory_days",
                Ratio::defined(config.default_inventory_days),
            )
            .estimated_with("inventory days taken from default_inventory_days"),
        };

        let purchases = ctx.dre.cost_of_goods_sold + ctx.dre.total_operating_expenses;
        let payable_days = IndicatorSnapshot::new(
            "payable_days",
            days_outstanding(balance.payables, purchases, days),
        )
        .input("payables", balance.payables)
        .input("purchases", purchases)
        .input("period_days", days);

        let cycle_ratio = if receivable_days.is_applicable() && inventory_days.is_applicable() {
            let payable = if payable_days.is_applicable() {
                payable_days.value
            } else {
                0.0
            };
            Ratio::defined(cash_conversion_cycle(
                receivable_days.value,
                inventory_days.value,
                payable,
            ))
        } else {
            Ratio::not_applicable()
        };
        let mut cycle = IndicatorSnapshot::new("cash_conversion_cycle", cycle_ratio)
            .input("receivable_days", receivable_days.value)
            .input("inventory_days", inventory_days.value)
            .input("payable_days", payable_days.value);
        if inventory_days.estimated {
            cycle = cycle.estimated_with("inventory days are an assumption");
        }
        if cycle.is_applicable() && !payable_days.is_applicable() {
            cycle = cycle.estimated_with("payable days not applicable; treated as zero");
        }

        LiquidityIndicators {
            current_ratio: current,
            quick_ratio: quick,
            immediate_liquidity: immediate,
            receivable_days,
            inventory_days,
            payable_days,
            cash_conversion_cycle: cycle,
        }
    }

    /// Overdue receivables as of `reference`, bucketed by days past due.
    pub fn delinquency(
        transactions: &[TransactionRecord],
        reference: NaiveDate,
        config: &AnalysisConfig,
    ) -> DelinquencyIndicators {
        let boundaries = &config.aging_bucket_boundaries;
        let labels = aging_bucket_labels(boundaries);
        let mut aging: Vec<AgingBucket> = labels
            .into_iter()
            .enumerate()
            .map(|(idx, label)| AgingBucket {
                label,
                min_days: if idx == 0 { 0 } else { boundaries[idx - 1] },
                max_days: boundaries.get(idx).copied(),
                count: 0,
                value: 0.0,
                percent: 0.0,
            })
            .collect();

        #[derive(Default)]
        struct Debtor {
            outstanding: f64,
            transactions: usize,
            total_days: i64,
            max_days: i64,
        }

        let total_value: f64 = transactions.iter().map(|txn| txn.amount).sum();
        let mut overdue_value = 0.0;
        let mut overdue_count = 0usize;
        let mut total_days = 0i64;
        let mut debtors: BTreeMap<String, Debtor> = BTreeMap::new();

        for txn in transactions.iter().filter(|txn| txn.is_overdue(reference)) {
            let days = txn.days_overdue(reference);
            let bucket = &mut aging[aging_bucket_index(days, boundaries)];
            bucket.count += 1;
            bucket.value += txn.amount;

            overdue_value += txn.amount;
            overdue_count += 1;
            total_days += days;

            let customer = txn
                .customer_id
                .clone()
                .unwrap_or_else(|| UNIDENTIFIED_CUSTOMER.to_string());
            let debtor = debtors.entry(customer).or_default();
            debtor.outstanding += txn.amount;
            debtor.transactions += 1;
            debtor.total_days += days;
            debtor.max_days = debtor.max_days.max(days);
        }

        for bucket in &mut aging {
            bucket.percent = percent_of(bucket.value, overdue_value);
        }

        let mut top_debtors: Vec<DebtorRanking> = debtors
            .into_iter()
            .map(|(customer_id, debtor)| DebtorRanking {
                customer_id,
                outstanding: debtor.outstanding,
                overdue_transactions: debtor.transactions,
                average_days_overdue: debtor.total_days as f64 / debtor.transactions as f64,
                max_days_overdue: debtor.max_days,
            })
            .collect();
        top_debtors.sort_by(|a, b| {
            b.outstanding
                .total_cmp(&a.outstanding)
                .then_with(|| a.customer_id.cmp(&b.customer_id))
        });
        top_debtors.truncate(config.top_debtors);

        let average_days_overdue = if overdue_count == 0 {
            0.0
        } else {
            total_days as f64 / overdue_count as f64
        };
        debug!(overdue_count, overdue_value, "computed delinquency");

        DelinquencyIndicators {
            delinquency_rate: IndicatorSnapshot::new(
                "delinquency_rate",
                delinquency_rate(overdue_value, total_value),
            )
            .input("overdue_value", overdue_value)
            .input("total_value", total_value)
            .classified(&config.delinquency_thresholds),
            total_value,
            overdue_value,
            overdue_count,
            average_days_overdue,
            aging,
            top_debtors,
        }
    }

    pub fn efficiency(ctx: &IndicatorContext<'_>, config: &AnalysisConfig) -> EfficiencyIndicators {
        let dre = ctx.dre;
        let spend = dre.cost_of_goods_sold + dre.total_operating_expenses;
        let cost_to_revenue = IndicatorSnapshot::new(
            "cost_to_revenue",
            safe_ratio(spend, dre.gross_revenue).map(|ratio| ratio * 100.0),
        )
        .input("costs_and_expenses", spend)
        .input("gross_revenue", dre.gross_revenue);

        let average_ticket = if dre.transaction_count == 0 {
            0.0
        } else {
            dre.gross_revenue / dre.transaction_count as f64
        };

        let new_customers = Self::new_customers(ctx.history, &ctx.window);
        let marketing = dre.operating_expenses.marketing;
        let cac = IndicatorSnapshot::new(
            "customer_acquisition_cost",
            customer_acquisition_cost(marketing, new_customers),
        )
        .input("marketing_spend", marketing)
        .input("new_customers", new_customers as f64);

        let ltv_value = lifetime_value(
            average_ticket,
            config.purchase_frequency_per_month,
            config.customer_lifespan_months,
            config.margin_fraction,
        );
        let ltv = IndicatorSnapshot::new("lifetime_value", Ratio::defined(ltv_value))
            .input("average_ticket", average_ticket)
            .input("purchase_frequency_per_month", config.purchase_frequency_per_month)
            .input("customer_lifespan_months", config.customer_lifespan_months)
            .input("margin_fraction", config.margin_fraction)
            .estimated_with("frequency, lifespan and margin are configured assumptions");

        let ratio = if cac.is_applicable() {
            safe_ratio(ltv_value, cac.value)
        } else {
            Ratio::not_applicable()
        };
        let ltv_cac_ratio = IndicatorSnapshot::new("ltv_cac_ratio", ratio)
            .input("lifetime_value", ltv_value)
            .input("customer_acquisition_cost", cac.value)
            .estimated_with("lifetime value relies on configured assumptions")
            .classified(&config.ltv_cac_thresholds);

        EfficiencyIndicators {
            cost_to_revenue,
            average_ticket,
            new_customers,
            customer_acquisition_cost: cac,
            lifetime_value: ltv,
            ltv_cac_ratio,
        }
    }

    /// Customers whose first transaction in `history` falls inside `window`.
    pub fn new_customers(history: &[TransactionRecord], window: &DateWindow) -> usize {
        let mut first_seen: BTreeMap<&str, NaiveDate> = BTreeMap::new();
        for txn in history {
            let Some(customer) = txn.customer_id.as_deref() else {
                continue;
            };
            first_seen
                .entry(customer)
                .and_modify(|first| *first = (*first).min(txn.date))
                .or_insert(txn.date);
        }
        first_seen
            .values()
            .filter(|first| window.contains(**first))
            .count()
    }

    pub fn sustainability(
        ctx: &IndicatorContext<'_>,
        config: &AnalysisConfig,
    ) -> SustainabilityIndicators {
        Self::sustainability_with(ctx, &BalanceView::resolve(ctx), config)
    }

    fn sustainability_with(
        ctx: &IndicatorContext<'_>,
        balance: &BalanceView,
        config: &AnalysisConfig,
    ) -> SustainabilityIndicators {
        let fixed_total: f64 = ctx
            .expenses
            .iter()
            .filter(|expense| {
                config
                    .expense_group(&expense.category)
                    .is_some_and(|group| group.is_fixed())
            })
            .map(|expense| expense.amount)
            .sum();
        let months = ctx.window.month_count() as f64;
        let average_monthly_fixed_expenses = fixed_total / months;

        let reserve_coverage_months = with_figures(
            IndicatorSnapshot::new(
                "reserve_coverage_months",
                safe_ratio(balance.reserves.value, average_monthly_fixed_expenses),
            )
            .input("average_monthly_fixed_expenses", average_monthly_fixed_expenses),
            &[("reserves", balance.reserves)],
        )
        .classified(&config.reserve_thresholds);

        let debt_ratio = with_figures(
            IndicatorSnapshot::new(
                "debt_ratio",
                safe_ratio(balance.total_liabilities.value, balance.total_assets.value)
                    .map(|ratio| ratio * 100.0),
            ),
            &[
                ("total_liabilities", balance.total_liabilities),
                ("total_assets", balance.total_assets),
            ],
        );

        let solvency_index = with_figures(
            IndicatorSnapshot::new(
                "solvency_index",
                safe_ratio(balance.total_assets.value, balance.total_liabilities.value),
            ),
            &[
                ("total_assets", balance.total_assets),
                ("total_liabilities", balance.total_liabilities),
            ],
        )
        .classified(&config.liquidity_thresholds);

        SustainabilityIndicators {
            average_monthly_fixed_expenses,
            reserve_coverage_months,
            debt_ratio,
            solvency_index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{PaymentStatus, UnitScope},
        finance::{Classification, RatioStatus},
    };
    use chrono::Duration;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn june() -> DateWindow {
        DateWindow::new(date(2024, 6, 1), date(2024, 7, 1)).unwrap()
    }

    fn context<'a>(
        transactions: &'a [TransactionRecord],
        expenses: &'a [ExpenseRecord],
        dre: &'a ConsolidatedDre,
        balance_sheet: Option<&'a BalanceSheet>,
    ) -> IndicatorContext<'a> {
        IndicatorContext {
            transactions,
            history: transactions,
            expenses,
            dre,
            balance_sheet,
            window: june(),
            reference_date: date(2024, 6, 30),
        }
    }

    #[test]
    fn single_overdue_sale_is_fully_delinquent() {
        let reference = date(2024, 6, 20);
        let txn = TransactionRecord::new("t1", 1_000.0, date(2024, 6, 1))
            .with_cost(400.0)
            .with_status(PaymentStatus::Open)
            .with_due_date(reference - Duration::days(10));
        let result = IndicatorService::delinquency(&[txn], reference, &AnalysisConfig::default());

        assert_eq!(result.delinquency_rate.value, 100.0);
        assert_eq!(result.delinquency_rate.classification, Classification::Critical);
        assert_eq!(result.aging[0].label, "0-30");
        assert_eq!(result.aging[0].value, 1_000.0);
        assert_eq!(result.aging[0].percent, 100.0);
        assert_eq!(result.average_days_overdue, 10.0);
    }

    #[test]
    fn thirty_days_late_lands_in_second_bucket() {
        let due = date(2024, 5, 1);
        let reference = due + Duration::days(30);
        let txn = TransactionRecord::new("t1", 200.0, date(2024, 4, 1))
            .with_status(PaymentStatus::Overdue)
            .with_due_date(due);
        let result = IndicatorService::delinquency(&[txn], reference, &AnalysisConfig::default());
        assert_eq!(result.aging[0].count, 0);
        assert_eq!(result.aging[1].label, "31-60");
        assert_eq!(result.aging[1].count, 1);
        assert_eq!(result.aging[1].min_days, 30);
        assert_eq!(result.aging[3].max_days, None);
    }

    #[test]
    fn debtors_ranked_by_outstanding() {
        let reference = date(2024, 6, 30);
        let open = |id: &str, amount: f64, customer: &str, due: NaiveDate| {
            TransactionRecord::new(id, amount, date(2024, 5, 1))
                .with_status(PaymentStatus::Open)
                .with_customer(customer)
                .with_due_date(due)
        };
        let transactions = vec![
            open("a", 100.0, "ana", date(2024, 6, 20)),
            open("b", 300.0, "ana", date(2024, 6, 10)),
            open("c", 250.0, "bia", date(2024, 6, 25)),
            open("d", 999.0, "caio", date(2024, 7, 25)),
        ];
        let config = AnalysisConfig {
            top_debtors: 1,
            ..AnalysisConfig::default()
        };
        let result = IndicatorService::delinquency(&transactions, reference, &config);
        assert_eq!(result.overdue_count, 3);
        assert_eq!(result.top_debtors.len(), 1);
        let top = &result.top_debtors[0];
        assert_eq!(top.customer_id, "ana");
        assert_eq!(top.outstanding, 400.0);
        assert_eq!(top.max_days_overdue, 20);
        assert_eq!(top.average_days_overdue, 15.0);
    }

    #[test]
    fn no_sales_means_not_applicable_rate() {
        let result =
            IndicatorService::delinquency(&[], date(2024, 6, 30), &AnalysisConfig::default());
        assert_eq!(result.delinquency_rate.status, RatioStatus::NotApplicable);
        assert_eq!(
            result.delinquency_rate.classification,
            Classification::NotApplicable
        );
        assert!(result.aging.iter().all(|bucket| bucket.percent == 0.0));
    }

    #[test]
    fn liquidity_prefers_balance_sheet_figures() {
        let dre = ConsolidatedDre::empty(UnitScope::All);
        let sheet = BalanceSheet {
            current_assets: Some(300.0),
            current_liabilities: Some(150.0),
            inventory: Some(60.0),
            cash: Some(75.0),
            ..BalanceSheet::default()
        };
        let ctx = context(&[], &[], &dre, Some(&sheet));
        let liquidity = IndicatorService::liquidity(&ctx, &AnalysisConfig::default());
        assert_eq!(liquidity.current_ratio.value, 2.0);
        assert!(!liquidity.current_ratio.estimated);
        assert_eq!(liquidity.current_ratio.classification, Classification::Excellent);
        assert!((liquidity.quick_ratio.value - 1.6).abs() < 1e-9);
        assert_eq!(liquidity.immediate_liquidity.value, 0.5);
        assert_eq!(
            liquidity.immediate_liquidity.classification,
            Classification::Attention
        );
    }

    #[test]
    fn liquidity_estimates_are_flagged() {
        let transactions = vec![
            TransactionRecord::new("t1", 800.0, date(2024, 6, 3)),
            TransactionRecord::new("t2", 200.0, date(2024, 6, 4)).with_status(PaymentStatus::Open),
        ];
        let expenses = vec![
            ExpenseRecord::new("e1", 300.0, date(2024, 6, 5), "rent"),
            ExpenseRecord::new("e2", 250.0, date(2024, 6, 6), "rent")
                .with_status(PaymentStatus::Open),
        ];
        let dre = ConsolidatedDre::empty(UnitScope::All);
        let ctx = context(&transactions, &expenses, &dre, None);
        let liquidity = IndicatorService::liquidity(&ctx, &AnalysisConfig::default());

        // cash 800 - 300 = 500, receivables 200, payables 250
        assert_eq!(liquidity.current_ratio.inputs["current_assets"], 700.0);
        assert_eq!(liquidity.current_ratio.inputs["current_liabilities"], 250.0);
        assert_eq!(liquidity.current_ratio.value, 2.8);
        assert!(liquidity.current_ratio.estimated);
        assert!(!liquidity.current_ratio.notes.is_empty());
        assert!(liquidity.inventory_days.estimated);
    }

    #[test]
    fn cycle_without_purchases_flags_missing_payable_days() {
        let transactions = vec![
            TransactionRecord::new("t1", 300.0, date(2024, 6, 3)).with_status(PaymentStatus::Open)
        ];
        let mut dre = ConsolidatedDre::empty(UnitScope::All);
        dre.gross_revenue = 1_000.0;
        let ctx = context(&transactions, &[], &dre, None);
        let config = AnalysisConfig::default();
        let liquidity = IndicatorService::liquidity(&ctx, &config);

        assert!(!liquidity.payable_days.is_applicable());
        let cycle = &liquidity.cash_conversion_cycle;
        assert!(cycle.is_applicable());
        assert!(cycle.estimated);
        assert!(cycle
            .notes
            .iter()
            .any(|note| note == "payable days not applicable; treated as zero"));
        let expected = liquidity.receivable_days.value + config.default_inventory_days;
        assert!((cycle.value - expected).abs() < 1e-9);
    }

    #[test]
    fn new_customers_come_from_full_history() {
        let history = vec![
            TransactionRecord::new("old", 10.0, date(2024, 1, 5)).with_customer("ana"),
            TransactionRecord::new("a", 10.0, date(2024, 6, 5)).with_customer("ana"),
            TransactionRecord::new("b", 10.0, date(2024, 6, 6)).with_customer("bia"),
            TransactionRecord::new("c", 10.0, date(2024, 6, 7)).with_customer("bia"),
        ];
        assert_eq!(IndicatorService::new_customers(&history, &june()), 1);
    }

    #[test]
    fn cac_undefined_without_new_customers() {
        let mut dre = ConsolidatedDre::empty(UnitScope::All);
        dre.gross_revenue = 1_000.0;
        dre.transaction_count = 4;
        dre.operating_expenses.marketing = 100.0;
        let ctx = context(&[], &[], &dre, None);
        let efficiency = IndicatorService::efficiency(&ctx, &AnalysisConfig::default());
        assert_eq!(efficiency.average_ticket, 250.0);
        assert_eq!(efficiency.new_customers, 0);
        assert!(!efficiency.customer_acquisition_cost.is_applicable());
        assert!(!efficiency.ltv_cac_ratio.is_applicable());
        // 250 x 1 x 12 x 0.30
        assert!((efficiency.lifetime_value.value - 900.0).abs() < 1e-9);
        assert!(efficiency.lifetime_value.estimated);
    }

    #[test]
    fn reserve_coverage_uses_fixed_expenses_only() {
        let expenses = vec![
            ExpenseRecord::new("e1", 1_000.0, date(2024, 6, 5), "rent"),
            ExpenseRecord::new("e2", 2_000.0, date(2024, 6, 6), "salaries"),
            ExpenseRecord::new("e3", 5_000.0, date(2024, 6, 7), "marketing"),
        ];
        let sheet = BalanceSheet {
            reserves: Some(12_000.0),
            total_assets: Some(1_000.0),
            total_liabilities: Some(400.0),
            ..BalanceSheet::default()
        };
        let dre = ConsolidatedDre::empty(UnitScope::All);
        let ctx = context(&[], &expenses, &dre, Some(&sheet));
        let result = IndicatorService::sustainability(&ctx, &AnalysisConfig::default());
        assert_eq!(result.average_monthly_fixed_expenses, 3_000.0);
        assert_eq!(result.reserve_coverage_months.value, 4.0);
        assert_eq!(
            result.reserve_coverage_months.classification,
            Classification::Adequate
        );
        assert!((result.debt_ratio.value - 40.0).abs() < 1e-9);
        assert_eq!(result.solvency_index.value, 2.5);
    }
}
