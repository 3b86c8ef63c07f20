use serde::{Deserialize, Serialize};

use crate::finance::Ratio;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum GoalMetric {
    Revenue,
    GrossMargin,
    NetResult,
    NewCustomers,
    TransactionCount,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// A target for the analysed window. Goal storage belongs to the caller.
pub struct Goal {
    pub id: String,
    #[serde(default)]
    pub label: String,
    pub metric: GoalMetric,
    pub target: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    Achieved,
    OnTrack,
    Behind,
    NotApplicable,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GoalAttainment {
    pub goal_id: String,
    pub label: String,
    pub metric: GoalMetric,
    pub target: f64,
    pub actual: f64,
    /// `actual / target * 100`; not applicable for non-positive targets.
    pub attained_percent: Ratio,
    pub status: GoalStatus,
}
