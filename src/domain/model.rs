use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TermGroup {
    ShortTerm,
    MediumTerm,
    LongTerm,
}

impl TermGroup {
    pub const ALL: [TermGroup; 3] = [
        TermGroup::ShortTerm,
        TermGroup::MediumTerm,
        TermGroup::LongTerm,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TermGroup::ShortTerm => "short_term",
            TermGroup::MediumTerm => "medium_term",
            TermGroup::LongTerm => "long_term",
        }
    }
}

impl fmt::Display for TermGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeUnit {
    Year,
    Month,
    Day,
}

impl TimeUnit {
    /// Accepts the singular and plural spellings, ignoring case and
    /// surrounding whitespace.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "year" | "years" => Some(TimeUnit::Year),
            "month" | "months" => Some(TimeUnit::Month),
            "day" | "days" => Some(TimeUnit::Day),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub id: String,
    pub time: f64,
    pub time_unit: String,
    pub co2_volume: f64,
    pub price: f64,
    pub group: TermGroup,
    #[serde(default)]
    pub continent: Option<String>,
    #[serde(default)]
    pub min_units: Option<i64>,
    #[serde(default)]
    pub max_units: Option<i64>,
}

/// A project after time normalisation and yield calculation.
///
/// Repeats of the same `id` in a selection are units of one credit type and
/// share every derived field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Project {
    pub id: String,
    pub time: f64,
    pub time_unit: TimeUnit,
    pub co2_volume: f64,
    pub price: f64,
    pub group: TermGroup,
    pub continent: Option<String>,
    pub min_units: Option<i64>,
    pub max_units: Option<i64>,
    /// Duration in years, 4 decimals.
    pub std_time: f64,
    /// CO2 captured per year by one unit, 4 decimals.
    pub yearly_co2_vol: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedProject {
    pub id: String,
    pub count: usize,
    pub unit_price: f64,
    pub total_co2_captured: f64,
    pub remaining_std_time: f64,
    pub finished: bool,
}

/// One line of the purchase plan. The placeholder written for an empty
/// selection has no fields and serializes as `{}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PurchasePlanEntry {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub num_units: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub price: Option<f64>,
}

impl PurchasePlanEntry {
    pub fn new(project_id: impl Into<String>, num_units: usize, price: f64) -> Self {
        Self {
            project_id: Some(project_id.into()),
            num_units: Some(num_units),
            price: Some(price),
        }
    }

    pub fn placeholder() -> Self {
        Self::default()
    }

    pub fn is_placeholder(&self) -> bool {
        self.project_id.is_none() && self.num_units.is_none() && self.price.is_none()
    }
}

/// One year of the CO2 report, with the same placeholder convention as
/// [`PurchasePlanEntry`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Co2ReportEntry {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub co2_captured: Option<f64>,
}

impl Co2ReportEntry {
    pub fn new(year: i32, co2_captured: f64) -> Self {
        Self {
            year: Some(year),
            co2_captured: Some(co2_captured),
        }
    }

    pub fn placeholder() -> Self {
        Self::default()
    }

    pub fn is_placeholder(&self) -> bool {
        self.year.is_none() && self.co2_captured.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerReport {
    pub purchase_plan: Vec<PurchasePlanEntry>,
    pub co2_report: Vec<Co2ReportEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_deserializes_nullable_fields() {
        let record: ProjectRecord = serde_json::from_value(serde_json::json!({
            "id": "p9",
            "time": 3,
            "time_unit": "month",
            "co2_volume": 12.5,
            "price": 40,
            "group": "medium_term",
            "continent": null
        }))
        .unwrap();

        assert_eq!(record.group, TermGroup::MediumTerm);
        assert_eq!(record.continent, None);
        assert_eq!(record.min_units, None);
        assert_eq!(record.max_units, None);
        assert_eq!(record.price, 40.0);
    }

    #[test]
    fn test_record_accepts_negative_unit_bounds() {
        let record: ProjectRecord = serde_json::from_value(serde_json::json!({
            "id": "p5", "time": 1, "time_unit": "year", "co2_volume": 2,
            "price": 10, "group": "medium_term", "continent": "Oceania",
            "min_units": -1, "max_units": 3
        }))
        .unwrap();

        assert_eq!(record.min_units, Some(-1));
        assert_eq!(record.max_units, Some(3));
    }

    #[test]
    fn test_unknown_group_is_rejected() {
        let result: std::result::Result<ProjectRecord, _> =
            serde_json::from_value(serde_json::json!({
                "id": "p9",
                "time": 3,
                "time_unit": "month",
                "co2_volume": 12.5,
                "price": 40,
                "group": "forever"
            }));
        assert!(result.is_err());
    }

    #[test]
    fn test_time_unit_parse() {
        assert_eq!(TimeUnit::parse("day"), Some(TimeUnit::Day));
        assert_eq!(TimeUnit::parse(" Months "), Some(TimeUnit::Month));
        assert_eq!(TimeUnit::parse("years"), Some(TimeUnit::Year));
        assert_eq!(TimeUnit::parse("week"), None);
        assert_eq!(TimeUnit::parse(""), None);
    }

    #[test]
    fn test_placeholders_serialize_as_empty_objects() {
        let plan = serde_json::to_string(&PurchasePlanEntry::placeholder()).unwrap();
        let year = serde_json::to_string(&Co2ReportEntry::placeholder()).unwrap();
        assert_eq!(plan, "{}");
        assert_eq!(year, "{}");

        let entry = serde_json::to_value(PurchasePlanEntry::new("p1", 2, 464.0)).unwrap();
        assert_eq!(
            entry,
            serde_json::json!({"project_id": "p1", "num_units": 2, "price": 464.0})
        );
    }
}
