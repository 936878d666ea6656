use crate::domain::model::{Project, ProjectRecord, TimeUnit};
use crate::utils::error::{PlannerError, Result};
use crate::utils::numeric::round_to;

/// How many of each unit make up one year.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeConversion {
    pub year: f64,
    pub month: f64,
    pub day: f64,
}

impl Default for TimeConversion {
    fn default() -> Self {
        Self {
            year: 1.0,
            month: 12.0,
            day: 365.0,
        }
    }
}

impl TimeConversion {
    pub fn per_year(&self, unit: TimeUnit) -> f64 {
        match unit {
            TimeUnit::Year => self.year,
            TimeUnit::Month => self.month,
            TimeUnit::Day => self.day,
        }
    }

    pub fn to_years(&self, time: f64, unit: TimeUnit) -> f64 {
        round_to(time / self.per_year(unit), 4)
    }
}

pub fn invalid_time_units(records: &[ProjectRecord]) -> Vec<&ProjectRecord> {
    records
        .iter()
        .filter(|record| TimeUnit::parse(&record.time_unit).is_none())
        .collect()
}

/// Converts every record's duration to years.
///
/// All or nothing: a single unrecognised unit rejects the whole batch, and
/// the error names every offending id.
pub fn normalize_time(records: &[ProjectRecord], table: &TimeConversion) -> Result<Vec<Project>> {
    if records.is_empty() {
        return Err(PlannerError::EmptyInput);
    }

    let invalid = invalid_time_units(records);
    if !invalid.is_empty() {
        let ids: Vec<String> = invalid.iter().map(|record| record.id.clone()).collect();
        tracing::error!("Time units are not recognised for projects with id: {:?}", ids);
        return Err(PlannerError::UnknownTimeUnits { ids });
    }

    let mut projects = Vec::with_capacity(records.len());
    for record in records {
        let time_unit =
            TimeUnit::parse(&record.time_unit).ok_or_else(|| PlannerError::UnknownTimeUnits {
                ids: vec![record.id.clone()],
            })?;

        projects.push(Project {
            id: record.id.clone(),
            time: record.time,
            time_unit,
            co2_volume: record.co2_volume,
            price: record.price,
            group: record.group,
            continent: record.continent.clone(),
            min_units: record.min_units,
            max_units: record.max_units,
            std_time: table.to_years(record.time, time_unit),
            yearly_co2_vol: 0.0,
        });
    }

    tracing::debug!("Normalised time for {} projects", projects.len());
    Ok(projects)
}

/// Fills in the CO2 captured per year by one unit of each project.
///
/// A project without a positive duration has no defined yearly rate and is
/// given a yield of 0.
pub fn calculate_efficiency(projects: Vec<Project>) -> Vec<Project> {
    projects
        .into_iter()
        .map(|mut project| {
            project.yearly_co2_vol = if project.std_time > 0.0 && project.co2_volume != 0.0 {
                round_to(project.co2_volume / project.std_time, 4)
            } else {
                if project.std_time <= 0.0 {
                    tracing::warn!(
                        "Project {} has no usable duration ({} {:?}), yield set to 0",
                        project.id,
                        project.time,
                        project.time_unit
                    );
                }
                0.0
            };
            project
        })
        .collect()
}

pub fn enrich(records: &[ProjectRecord], table: &TimeConversion) -> Result<Vec<Project>> {
    normalize_time(records, table).map(calculate_efficiency)
}
