use crate::core::constraints::{count_continents, group_expenditures};
use crate::core::search::SearchOutcome;
use crate::domain::model::TermGroup;
use crate::utils::numeric::round_to;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupShare {
    pub group: TermGroup,
    pub spent: f64,
    /// Share of the total spend, in percent with 2 decimals.
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionSummary {
    pub yearly_co2: f64,
    pub money_spent: f64,
    pub money_available: f64,
    pub units: usize,
    pub continents: usize,
    pub groups: Vec<GroupShare>,
    pub trials_run: u64,
    pub trials_accepted: u64,
    pub timed_out: bool,
}

impl SelectionSummary {
    pub fn from_outcome(outcome: &SearchOutcome<'_>, money_available: f64) -> Self {
        let selection = outcome.selection();
        let expenditures = group_expenditures(selection);
        let total = expenditures.total();

        let groups = TermGroup::ALL
            .into_iter()
            .map(|group| {
                let spent = expenditures.get(group).unwrap_or(0.0);
                GroupShare {
                    group,
                    spent,
                    percent: share_percent(spent, total),
                }
            })
            .collect();

        Self {
            yearly_co2: round_to(outcome.best.value, 4),
            money_spent: outcome.best.money_spent,
            money_available,
            units: selection.len(),
            continents: count_continents(selection),
            groups,
            trials_run: outcome.trials_run,
            trials_accepted: outcome.trials_accepted,
            timed_out: outcome.timed_out,
        }
    }

    pub fn log(&self) {
        tracing::info!(
            "🌱 Best yearly CO2 captured: {} units ({} of {} trials valid)",
            self.yearly_co2,
            self.trials_accepted,
            self.trials_run
        );
        tracing::info!(
            "💰 Money spent over money available: {} / {}",
            self.money_spent,
            self.money_available
        );
        tracing::info!(
            "🌍 Units bought: {}, distinct continents: {}",
            self.units,
            self.continents
        );
        for share in &self.groups {
            tracing::info!(
                "   - {}: {} spent ({}%)",
                share.group,
                share.spent,
                share.percent
            );
        }
    }
}

/// `part` as a percentage of `total`; 0 when nothing was spent.
pub fn share_percent(part: f64, total: f64) -> f64 {
    if total <= 0.0 {
        return 0.0;
    }
    round_to(part / total * 100.0, 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::search::Trial;
    use crate::domain::model::{Project, TimeUnit};

    fn project(id: &str, price: f64, group: TermGroup, continent: &str) -> Project {
        Project {
            id: id.to_string(),
            time: 1.0,
            time_unit: TimeUnit::Year,
            co2_volume: 3.0,
            price,
            group,
            continent: Some(continent.to_string()),
            min_units: None,
            max_units: None,
            std_time: 1.0,
            yearly_co2_vol: 3.0,
        }
    }

    #[test]
    fn test_share_percent_guards_zero_total() {
        assert_eq!(share_percent(0.0, 0.0), 0.0);
        assert_eq!(share_percent(1.0, 3.0), 33.33);
        assert_eq!(share_percent(10.0, 10.0), 100.0);
    }

    #[test]
    fn test_summary_from_outcome() {
        let a = project("a", 30.0, TermGroup::ShortTerm, "Europe");
        let b = project("b", 10.0, TermGroup::LongTerm, "Asia");
        let outcome = SearchOutcome {
            best: Trial {
                selection: vec![&a, &b, &b],
                value: 9.0,
                money_spent: 50.0,
            },
            trials_run: 10,
            trials_accepted: 4,
            timed_out: false,
        };

        let summary = SelectionSummary::from_outcome(&outcome, 60.0);

        assert_eq!(summary.units, 3);
        assert_eq!(summary.continents, 2);
        assert_eq!(summary.groups[0].spent, 30.0);
        assert_eq!(summary.groups[0].percent, 60.0);
        assert_eq!(summary.groups[1].spent, 0.0);
        assert_eq!(summary.groups[1].percent, 0.0);
        assert_eq!(summary.groups[2].percent, 40.0);
    }

    #[test]
    fn test_summary_of_empty_outcome() {
        let outcome = SearchOutcome {
            best: Trial::empty(),
            trials_run: 5,
            trials_accepted: 0,
            timed_out: true,
        };
        let summary = SelectionSummary::from_outcome(&outcome, 100.0);

        assert_eq!(summary.units, 0);
        assert!(summary.groups.iter().all(|share| share.percent == 0.0));
        assert!(summary.timed_out);
    }
}
