pub mod services;

pub use services::{
    DreOutcome, DreService, GoalService, GrowthService, IndicatorContext, IndicatorService,
    RecordSet, RentabilityService, ReportService,
};
