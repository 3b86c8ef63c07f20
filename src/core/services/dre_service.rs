use std::collections::BTreeSet;

use tracing::{debug, warn};

use super::RecordSet;
use crate::{
    calendar::DateWindow,
    config::AnalysisConfig,
    domain::{
        ConsolidatedDre, DreComponents, ExpenseGroup, UnitComparison, UnitScope, Warning,
        WarningKind,
    },
    errors::Result,
};

/// A statement plus the anomalies recovered while folding it.
#[derive(Debug, Clone, PartialEq)]
pub struct DreOutcome {
    pub dre: ConsolidatedDre,
    pub warnings: Vec<Warning>,
}

pub struct DreService;

impl DreService {
    /// Folds the in-window records of one scope into an income statement.
    ///
    /// `unit_filter` keeps only records tagged with that unit. Taxes come from
    /// the explicit field when present, otherwise from the configured flat
    /// rate; a missing rate is only an error if some record needs it.
    pub fn consolidate(
        records: &RecordSet,
        window: &DateWindow,
        unit_filter: Option<&str>,
        config: &AnalysisConfig,
    ) -> Result<DreOutcome> {
        let scope = match unit_filter {
            Some(unit) => UnitScope::Unit(unit.to_string()),
            None => UnitScope::All,
        };
        let scoped = records.for_unit(unit_filter).within(window);
        let (components, unclassified, warnings) = Self::fold(&scoped, config)?;
        debug!(
            %scope,
            transactions = components.transaction_count,
            expenses = scoped.expenses.len(),
            "consolidated statement"
        );
        Ok(DreOutcome {
            dre: ConsolidatedDre::from_components(scope, &components, unclassified),
            warnings,
        })
    }

    /// Per-unit statements side by side plus their field-by-field sum.
    ///
    /// Consolidated percentages are recomputed on the summed totals.
    pub fn consolidate_units(
        records: &RecordSet,
        window: &DateWindow,
        units: &[String],
        config: &AnalysisConfig,
    ) -> Result<UnitComparison> {
        let mut statements = Vec::with_capacity(units.len());
        for unit in units {
            statements.push(Self::consolidate(records, window, Some(unit), config)?.dre);
        }
        let consolidated = ConsolidatedDre::sum(UnitScope::Consolidated(units.to_vec()), &statements);
        Ok(UnitComparison {
            units: statements,
            consolidated,
        })
    }

    fn fold(
        records: &RecordSet,
        config: &AnalysisConfig,
    ) -> Result<(DreComponents, Vec<String>, Vec<Warning>)> {
        let mut components = DreComponents::default();
        let mut warnings = Vec::new();

        for txn in &records.transactions {
            let tax = match txn.tax {
                Some(explicit) => explicit,
                None => {
                    let estimate = txn.amount * config.required_tax_rate()?;
                    components.estimated_taxes += estimate;
                    estimate
                }
            };
            components.gross_revenue += txn.amount;
            components.taxes += tax;
            components.discounts += txn.discount;
            components.returns += txn.returns;
            components.cost_of_goods_sold += txn.cost;
            components.transaction_count += 1;
        }

        let mut unclassified = BTreeSet::new();
        for expense in &records.expenses {
            let group = match config.expense_group(&expense.category) {
                Some(group) => group,
                None => {
                    if unclassified.insert(expense.category.clone()) {
                        warnings.push(Warning::new(
                            WarningKind::UnclassifiedExpense,
                            Some(expense.id.clone()),
                            format!(
                                "expense category `{}` is not mapped; booked as other",
                                expense.category
                            ),
                        ));
                    }
                    ExpenseGroup::Other
                }
            };
            if group == ExpenseGroup::Financial {
                components.financial_expenses += expense.amount;
            } else {
                components.operating_expenses.add(group, expense.amount);
            }
        }
        if !unclassified.is_empty() {
            warn!(
                categories = unclassified.len(),
                "unclassified expense categories booked as other"
            );
        }

        components.financial_income = records.financial_income.iter().map(|i| i.amount).sum();

        Ok((components, unclassified.into_iter().collect(), warnings))
    }
}
