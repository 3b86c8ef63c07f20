use crate::{
    config::AnalysisConfig,
    domain::{ConsolidatedDre, Goal, GoalAttainment, GoalMetric, GoalStatus},
    finance::safe_ratio,
};

pub struct GoalService;

impl GoalService {
    pub fn evaluate(
        goals: &[Goal],
        dre: &ConsolidatedDre,
        new_customers: usize,
        config: &AnalysisConfig,
    ) -> Vec<GoalAttainment> {
        goals
            .iter()
            .map(|goal| {
                let actual = match goal.metric {
                    GoalMetric::Revenue => dre.gross_revenue,
                    GoalMetric::GrossMargin => dre.gross_margin,
                    GoalMetric::NetResult => dre.net_result_before_tax,
                    GoalMetric::NewCustomers => new_customers as f64,
                    GoalMetric::TransactionCount => dre.transaction_count as f64,
                };
                let attained = safe_ratio(actual, goal.target).map(|ratio| ratio * 100.0);
                let status = if !attained.is_defined() {
                    GoalStatus::NotApplicable
                } else if actual >= goal.target {
                    GoalStatus::Achieved
                } else if attained.value >= config.goal_on_track_percent {
                    GoalStatus::OnTrack
                } else {
                    GoalStatus::Behind
                };
                GoalAttainment {
                    goal_id: goal.id.clone(),
                    label: goal.label.clone(),
                    metric: goal.metric,
                    target: goal.target,
                    actual,
                    attained_percent: attained,
                    status,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UnitScope;

    fn goal(metric: GoalMetric, target: f64) -> Goal {
        Goal {
            id: format!("{metric:?}"),
            label: String::new(),
            metric,
            target,
        }
    }

    #[test]
    fn attainment_tiers() {
        let mut dre = ConsolidatedDre::empty(UnitScope::All);
        dre.gross_revenue = 900.0;
        dre.transaction_count = 3;
        let goals = vec![
            goal(GoalMetric::Revenue, 1_000.0),
            goal(GoalMetric::TransactionCount, 10.0),
            goal(GoalMetric::NewCustomers, 2.0),
            goal(GoalMetric::NetResult, 0.0),
        ];
        let results = GoalService::evaluate(&goals, &dre, 2, &AnalysisConfig::default());

        assert_eq!(results[0].status, GoalStatus::OnTrack);
        assert!((results[0].attained_percent.value - 90.0).abs() < 1e-9);
        assert_eq!(results[1].status, GoalStatus::Behind);
        assert_eq!(results[2].status, GoalStatus::Achieved);
        assert_eq!(results[3].status, GoalStatus::NotApplicable);
    }
}
