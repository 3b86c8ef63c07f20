//! Income statement (DRE) value objects.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::expense::ExpenseGroup;
use crate::{
    currency::{format_currency_value, round_currency, CurrencyCode, LocaleConfig, NegativeStyle},
    finance::percent_of,
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
/// Which units a statement covers.
pub enum UnitScope {
    All,
    Unit(String),
    Consolidated(Vec<String>),
}

impl fmt::Display for UnitScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitScope::All => f.write_str("all units"),
            UnitScope::Unit(unit) => write!(f, "unit {unit}"),
            UnitScope::Consolidated(units) => write!(f, "consolidated {}", units.join(" + ")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct OperatingExpenses {
    pub administrative: f64,
    pub commercial: f64,
    pub personnel: f64,
    pub marketing: f64,
    pub other: f64,
}

impl OperatingExpenses {
    /// Books `amount` under `group`. Financial expenses are not operating and are ignored.
    pub fn add(&mut self, group: ExpenseGroup, amount: f64) {
        match group {
            ExpenseGroup::Administrative => self.administrative += amount,
            ExpenseGroup::Commercial => self.commercial += amount,
            ExpenseGroup::Personnel => self.personnel += amount,
            ExpenseGroup::Marketing => self.marketing += amount,
            ExpenseGroup::Other => self.other += amount,
            ExpenseGroup::Financial => {}
        }
    }

    pub fn total(&self) -> f64 {
        self.administrative + self.commercial + self.personnel + self.marketing + self.other
    }

    pub fn accumulate(&mut self, other: &OperatingExpenses) {
        self.administrative += other.administrative;
        self.commercial += other.commercial;
        self.personnel += other.personnel;
        self.marketing += other.marketing;
        self.other += other.other;
    }

    fn rounded(&self) -> Self {
        Self {
            administrative: round_currency(self.administrative),
            commercial: round_currency(self.commercial),
            personnel: round_currency(self.personnel),
            marketing: round_currency(self.marketing),
            other: round_currency(self.other),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
/// Additive inputs of a statement; everything else derives from these.
pub struct DreComponents {
    pub gross_revenue: f64,
    pub taxes: f64,
    /// Portion of `taxes` produced by the flat-rate estimator.
    pub estimated_taxes: f64,
    pub discounts: f64,
    pub returns: f64,
    pub cost_of_goods_sold: f64,
    pub operating_expenses: OperatingExpenses,
    pub financial_expenses: f64,
    pub financial_income: f64,
    pub transaction_count: usize,
}

impl DreComponents {
    pub fn accumulate(&mut self, other: &DreComponents) {
        self.gross_revenue += other.gross_revenue;
        self.taxes += other.taxes;
        self.estimated_taxes += other.estimated_taxes;
        self.discounts += other.discounts;
        self.returns += other.returns;
        self.cost_of_goods_sold += other.cost_of_goods_sold;
        self.operating_expenses.accumulate(&other.operating_expenses);
        self.financial_expenses += other.financial_expenses;
        self.financial_income += other.financial_income;
        self.transaction_count += other.transaction_count;
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
/// Each line as a percentage of net revenue; all zero when net revenue is zero.
pub struct DrePercentages {
    pub taxes: f64,
    pub cost_of_goods_sold: f64,
    pub gross_margin: f64,
    pub operating_expenses: f64,
    pub operating_result: f64,
    pub net_result: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConsolidatedDre {
    pub scope: UnitScope,
    pub gross_revenue: f64,
    pub taxes: f64,
    pub estimated_taxes: f64,
    pub discounts: f64,
    pub returns: f64,
    pub net_revenue: f64,
    pub cost_of_goods_sold: f64,
    pub gross_margin: f64,
    pub operating_expenses: OperatingExpenses,
    pub total_operating_expenses: f64,
    pub operating_result: f64,
    pub financial_expenses: f64,
    pub financial_income: f64,
    pub net_result_before_tax: f64,
    pub percentages: DrePercentages,
    pub transaction_count: usize,
    /// Expense categories missing from the category map, booked as `other`.
    #[serde(default)]
    pub unclassified_categories: Vec<String>,
}

impl ConsolidatedDre {
    /// Derives the cascade from additive components.
    pub fn from_components(
        scope: UnitScope,
        components: &DreComponents,
        unclassified_categories: Vec<String>,
    ) -> Self {
        let net_revenue =
            components.gross_revenue - components.taxes - components.discounts - components.returns;
        let gross_margin = net_revenue - components.cost_of_goods_sold;
        let total_operating_expenses = components.operating_expenses.total();
        let operating_result = gross_margin - total_operating_expenses;
        let net_result_before_tax =
            operating_result - components.financial_expenses + components.financial_income;

        let percentages = DrePercentages {
            taxes: percent_of(components.taxes, net_revenue),
            cost_of_goods_sold: percent_of(components.cost_of_goods_sold, net_revenue),
            gross_margin: percent_of(gross_margin, net_revenue),
            operating_expenses: percent_of(total_operating_expenses, net_revenue),
            operating_result: percent_of(operating_result, net_revenue),
            net_result: percent_of(net_result_before_tax, net_revenue),
        };

        Self {
            scope,
            gross_revenue: components.gross_revenue,
            taxes: components.taxes,
            estimated_taxes: components.estimated_taxes,
            discounts: components.discounts,
            returns: components.returns,
            net_revenue,
            cost_of_goods_sold: components.cost_of_goods_sold,
            gross_margin,
            operating_expenses: components.operating_expenses,
            total_operating_expenses,
            operating_result,
            financial_expenses: components.financial_expenses,
            financial_income: components.financial_income,
            net_result_before_tax,
            percentages,
            transaction_count: components.transaction_count,
            unclassified_categories,
        }
    }

    pub fn empty(scope: UnitScope) -> Self {
        Self::from_components(scope, &DreComponents::default(), Vec::new())
    }

    pub fn components(&self) -> DreComponents {
        DreComponents {
            gross_revenue: self.gross_revenue,
            taxes: self.taxes,
            estimated_taxes: self.estimated_taxes,
            discounts: self.discounts,
            returns: self.returns,
            cost_of_goods_sold: self.cost_of_goods_sold,
            operating_expenses: self.operating_expenses,
            financial_expenses: self.financial_expenses,
            financial_income: self.financial_income,
            transaction_count: self.transaction_count,
        }
    }

    /// Field-by-field sum with percentages recomputed on the totals.
    pub fn sum<'a>(scope: UnitScope, parts: impl IntoIterator<Item = &'a ConsolidatedDre>) -> Self {
        let mut totals = DreComponents::default();
        let mut unclassified: Vec<String> = Vec::new();
        for part in parts {
            totals.accumulate(&part.components());
            unclassified.extend(part.unclassified_categories.iter().cloned());
        }
        unclassified.sort();
        unclassified.dedup();
        Self::from_components(scope, &totals, unclassified)
    }

    /// Copy with money rounded to currency precision and percentages to two places.
    pub fn rounded(&self) -> Self {
        let pct = self.percentages;
        Self {
            scope: self.scope.clone(),
            gross_revenue: round_currency(self.gross_revenue),
            taxes: round_currency(self.taxes),
            estimated_taxes: round_currency(self.estimated_taxes),
            discounts: round_currency(self.discounts),
            returns: round_currency(self.returns),
            net_revenue: round_currency(self.net_revenue),
            cost_of_goods_sold: round_currency(self.cost_of_goods_sold),
            gross_margin: round_currency(self.gross_margin),
            operating_expenses: self.operating_expenses.rounded(),
            total_operating_expenses: round_currency(self.total_operating_expenses),
            operating_result: round_currency(self.operating_result),
            financial_expenses: round_currency(self.financial_expenses),
            financial_income: round_currency(self.financial_income),
            net_result_before_tax: round_currency(self.net_result_before_tax),
            percentages: DrePercentages {
                taxes: round_currency(pct.taxes),
                cost_of_goods_sold: round_currency(pct.cost_of_goods_sold),
                gross_margin: round_currency(pct.gross_margin),
                operating_expenses: round_currency(pct.operating_expenses),
                operating_result: round_currency(pct.operating_result),
                net_result: round_currency(pct.net_result),
            },
            transaction_count: self.transaction_count,
            unclassified_categories: self.unclassified_categories.clone(),
        }
    }

    /// Labelled, currency-formatted lines in statement order.
    pub fn statement_lines(&self, code: &CurrencyCode, locale: &LocaleConfig) -> Vec<StatementLine> {
        let pct = &self.percentages;
        let rows: [(&str, f64, Option<f64>); 15] = [
            ("Gross revenue", self.gross_revenue, None),
            ("(-) Taxes", -self.taxes, Some(pct.taxes)),
            ("(-) Discounts", -self.discounts, None),
            ("(-) Returns", -self.returns, None),
            ("Net revenue", self.net_revenue, Some(100.0)),
            ("(-) Cost of goods sold", -self.cost_of_goods_sold, Some(pct.cost_of_goods_sold)),
            ("Gross margin", self.gross_margin, Some(pct.gross_margin)),
            ("(-) Administrative", -self.operating_expenses.administrative, None),
            ("(-) Commercial", -self.operating_expenses.commercial, None),
            ("(-) Personnel", -self.operating_expenses.personnel, None),
            ("(-) Marketing", -self.operating_expenses.marketing, None),
            ("(-) Other expenses", -self.operating_expenses.other, None),
            ("Operating result", self.operating_result, Some(pct.operating_result)),
            (
                "(+/-) Financial result",
                self.financial_income - self.financial_expenses,
                None,
            ),
            ("Net result before tax", self.net_result_before_tax, Some(pct.net_result)),
        ];
        rows.into_iter()
            .map(|(label, value, percent)| StatementLine {
                label: label.to_string(),
                value,
                formatted: format_currency_value(value, code, locale, NegativeStyle::Parentheses),
                percent_of_net_revenue: percent.map(|p| if self.net_revenue == 0.0 { 0.0 } else { p }),
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatementLine {
    pub label: String,
    pub value: f64,
    pub formatted: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percent_of_net_revenue: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// Per-unit statements side by side plus their consolidation.
pub struct UnitComparison {
    pub units: Vec<ConsolidatedDre>,
    pub consolidated: ConsolidatedDre,
}

impl UnitComparison {
    pub fn rounded(&self) -> Self {
        Self {
            units: self.units.iter().map(ConsolidatedDre::rounded).collect(),
            consolidated: self.consolidated.rounded(),
        }
    }
}
