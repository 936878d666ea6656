use crate::core::aggregator::aggregate;
use crate::domain::model::{Co2ReportEntry, Project, PurchasePlanEntry};
use crate::utils::numeric::round_to;
use chrono::Datelike;

/// Units and total price per project id. An empty selection produces a
/// single placeholder entry.
pub fn generate_purchase_plan(selection: &[&Project]) -> Vec<PurchasePlanEntry> {
    let aggregated = aggregate(selection);
    if aggregated.is_empty() {
        tracing::warn!("No projects selected, purchase plan is empty");
        return vec![PurchasePlanEntry::placeholder()];
    }

    aggregated
        .into_iter()
        .map(|project| {
            let price = round_to(project.unit_price * project.count as f64, 1);
            PurchasePlanEntry::new(project.id, project.count, price)
        })
        .collect()
}

pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

/// `years` consecutive calendar years starting with the current one.
pub fn years_to_report(years: Option<i32>) -> Vec<i32> {
    years_from(current_year(), years)
}

pub fn years_from(start: i32, years: Option<i32>) -> Vec<i32> {
    match years {
        Some(count) if count >= 1 => (0..count).map(|offset| start + offset).collect(),
        _ => {
            tracing::warn!("No target years to report on ({:?})", years);
            Vec::new()
        }
    }
}

pub fn generate_co2_report(selection: &[&Project], years: Option<i32>) -> Vec<Co2ReportEntry> {
    generate_co2_report_for_years(selection, &years_to_report(years))
}

/// Year-by-year capture as projects run out of duration.
///
/// Every year adds up the capture of projects still active, then takes one
/// year off each of them; a project whose remaining time drops below zero
/// stops contributing from the following year.
pub fn generate_co2_report_for_years(selection: &[&Project], years: &[i32]) -> Vec<Co2ReportEntry> {
    let mut active = aggregate(selection);
    if active.is_empty() || years.is_empty() {
        tracing::warn!("Nothing to report on, CO2 report is empty");
        return vec![Co2ReportEntry::placeholder()];
    }

    let mut report = Vec::with_capacity(years.len());
    for &year in years {
        active.retain(|project| !project.finished);

        let captured: f64 = active.iter().map(|project| project.total_co2_captured).sum();
        report.push(Co2ReportEntry::new(year, round_to(captured, 1)));

        for project in active.iter_mut() {
            project.remaining_std_time -= 1.0;
            if project.remaining_std_time < 0.0 {
                project.finished = true;
            }
        }
    }

    report
}
