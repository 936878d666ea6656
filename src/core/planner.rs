use crate::core::constraints::ConstraintSet;
use crate::core::enricher::{enrich, TimeConversion};
use crate::core::report::{generate_co2_report_for_years, generate_purchase_plan, years_to_report};
use crate::core::search::{SearchSettings, SelectionSearch};
use crate::core::summary::SelectionSummary;
use crate::domain::model::{PlannerReport, ProjectRecord};
use crate::utils::error::Result;
use crate::utils::validation::validate_positive_amount;

#[derive(Debug, Clone, PartialEq)]
pub struct PlanRequest {
    pub money: f64,
    pub constraints: ConstraintSet,
    pub target_years: Option<i32>,
    pub search: SearchSettings,
    pub time_units: TimeConversion,
}

impl PlanRequest {
    pub fn new(money: f64) -> Self {
        Self {
            money,
            constraints: ConstraintSet::default(),
            target_years: Some(1),
            search: SearchSettings::default(),
            time_units: TimeConversion::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlanOutcome {
    pub report: PlannerReport,
    pub summary: SelectionSummary,
}

/// Enriches the records, searches for the best selection and builds both
/// reports. Reports for the years starting at the current one.
pub fn plan_offsets(records: &[ProjectRecord], request: &PlanRequest) -> Result<PlanOutcome> {
    plan_offsets_from(records, request, &years_to_report(request.target_years))
}

pub fn plan_offsets_from(
    records: &[ProjectRecord],
    request: &PlanRequest,
    years: &[i32],
) -> Result<PlanOutcome> {
    validate_positive_amount("money", request.money)?;

    let projects = enrich(records, &request.time_units)?;
    tracing::info!("🔎 Enriched {} projects", projects.len());

    let search = SelectionSearch::new(
        &projects,
        request.money,
        request.constraints,
        request.search.clone(),
    );
    let outcome = search.run();

    let summary = SelectionSummary::from_outcome(&outcome, request.money);
    if !outcome.found_selection() {
        tracing::warn!(
            "No selection satisfied the constraints after {} trials",
            outcome.trials_run
        );
    }

    let report = PlannerReport {
        purchase_plan: generate_purchase_plan(outcome.selection()),
        co2_report: generate_co2_report_for_years(outcome.selection(), years),
    };

    Ok(PlanOutcome { report, summary })
}
