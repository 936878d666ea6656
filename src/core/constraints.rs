//! Predicates a candidate selection has to satisfy before it can become the
//! best one: repetition bounds per project, geographic diversity and minimum
//! share of spend per term group.

use crate::domain::model::{Project, TermGroup};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

pub fn unit_counts<'a>(selection: &[&'a Project]) -> HashMap<&'a str, usize> {
    let mut counts = HashMap::new();
    for project in selection {
        *counts.entry(project.id.as_str()).or_insert(0) += 1;
    }
    counts
}

// Bounds are signed in the source data; a negative minimum is always met.
fn signed_count(count: usize) -> i64 {
    i64::try_from(count).unwrap_or(i64::MAX)
}

pub fn meets_min_units(count: usize, project: &Project) -> bool {
    project
        .min_units
        .map_or(true, |min| signed_count(count) >= min)
}

pub fn meets_max_units(count: usize, project: &Project) -> bool {
    project
        .max_units
        .map_or(true, |max| signed_count(count) <= max)
}

/// Every unit's id must be repeated within that project's `[min_units, max_units]`.
pub fn valid_project_constraints(selection: &[&Project]) -> bool {
    let counts = unit_counts(selection);
    selection.iter().all(|project| {
        let count = counts.get(project.id.as_str()).copied().unwrap_or(0);
        meets_min_units(count, project) && meets_max_units(count, project)
    })
}

/// Distinct known continents. Projects without a continent are not counted.
pub fn count_continents(selection: &[&Project]) -> usize {
    selection
        .iter()
        .filter_map(|project| project.continent.as_deref())
        .collect::<HashSet<_>>()
        .len()
}

pub fn valid_min_continents(selection: &[&Project], min_continents: usize) -> bool {
    count_continents(selection) >= min_continents
}

/// Money spent on one group, or `None` when the group is not represented.
pub fn sum_by_group(selection: &[&Project], group: TermGroup) -> Option<f64> {
    selection
        .iter()
        .filter(|project| project.group == group)
        .fold(None, |sum, project| Some(sum.unwrap_or(0.0) + project.price))
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GroupExpenditures {
    pub short_term: Option<f64>,
    pub medium_term: Option<f64>,
    pub long_term: Option<f64>,
}

impl GroupExpenditures {
    pub fn get(&self, group: TermGroup) -> Option<f64> {
        match group {
            TermGroup::ShortTerm => self.short_term,
            TermGroup::MediumTerm => self.medium_term,
            TermGroup::LongTerm => self.long_term,
        }
    }

    /// Sum of the money allocated across the groups that are present.
    pub fn total(&self) -> f64 {
        TermGroup::ALL
            .iter()
            .filter_map(|group| self.get(*group))
            .sum()
    }
}

pub fn group_expenditures(selection: &[&Project]) -> GroupExpenditures {
    GroupExpenditures {
        short_term: sum_by_group(selection, TermGroup::ShortTerm),
        medium_term: sum_by_group(selection, TermGroup::MediumTerm),
        long_term: sum_by_group(selection, TermGroup::LongTerm),
    }
}

/// `group_sum` is at least `percent`% of `total`. A percent of 0 always holds,
/// a missing group with a positive requirement never does.
pub fn meets_min_share(group_sum: Option<f64>, total: f64, percent: f64) -> bool {
    if percent <= 0.0 {
        return true;
    }
    match group_sum {
        Some(sum) => sum * 100.0 >= total * percent,
        None => false,
    }
}

/// Minimum percentage of the spend each term group must receive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupMinimums {
    #[serde(default)]
    pub short_term: f64,
    #[serde(default)]
    pub medium_term: f64,
    #[serde(default)]
    pub long_term: f64,
}

impl GroupMinimums {
    pub fn new(short_term: f64, medium_term: f64, long_term: f64) -> Self {
        Self {
            short_term,
            medium_term,
            long_term,
        }
    }

    pub fn get(&self, group: TermGroup) -> f64 {
        match group {
            TermGroup::ShortTerm => self.short_term,
            TermGroup::MediumTerm => self.medium_term,
            TermGroup::LongTerm => self.long_term,
        }
    }

    /// Groups with a positive requirement, paired with their percentage.
    pub fn constrained(&self) -> impl Iterator<Item = (TermGroup, f64)> + '_ {
        TermGroup::ALL
            .into_iter()
            .map(move |group| (group, self.get(group)))
            .filter(|(_, percent)| *percent > 0.0)
    }

    pub fn is_unconstrained(&self) -> bool {
        self.constrained().next().is_none()
    }
}

pub fn valid_min_groups(selection: &[&Project], minimums: &GroupMinimums) -> bool {
    if minimums.is_unconstrained() {
        return true;
    }

    let expenditures = group_expenditures(selection);
    let total = expenditures.total();
    minimums
        .constrained()
        .all(|(group, percent)| meets_min_share(expenditures.get(group), total, percent))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstraintSet {
    pub min_continents: usize,
    pub group_minimums: GroupMinimums,
}

impl Default for ConstraintSet {
    fn default() -> Self {
        Self {
            min_continents: 1,
            group_minimums: GroupMinimums::default(),
        }
    }
}

impl ConstraintSet {
    pub fn is_satisfied_by(&self, selection: &[&Project]) -> bool {
        valid_project_constraints(selection)
            && valid_min_continents(selection, self.min_continents)
            && valid_min_groups(selection, &self.group_minimums)
    }
}
