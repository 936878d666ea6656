//! Randomised greedy-fill search for the selection capturing the most CO2
//! per year within budget.
//!
//! Each trial draws projects uniformly (with replacement) and keeps adding
//! them until one does not fit in the remaining money. Trials breaking any
//! constraint are thrown away; the best valid trial wins. There is no
//! optimality guarantee.

use crate::core::constraints::ConstraintSet;
use crate::domain::model::Project;
use crate::domain::ports::RandomSource;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::time::{Duration, Instant};

pub const DEFAULT_ITERATIONS: u64 = 500_000;

/// Trials between two wall-clock checks.
const DEADLINE_CHECK_INTERVAL: u64 = 256;

#[derive(Debug, Clone, PartialEq)]
pub struct SearchSettings {
    pub iterations: u64,
    /// Number of independent shards. `None` uses one per rayon thread.
    pub workers: Option<usize>,
    /// Base seed; shard `i` is seeded with `seed + i`. Random when `None`.
    pub seed: Option<u64>,
    pub time_limit: Option<Duration>,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            workers: None,
            seed: None,
            time_limit: None,
        }
    }
}

pub struct SeededSource {
    rng: StdRng,
}

impl SeededSource {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededSource {
    fn next_index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Trial<'a> {
    pub selection: Vec<&'a Project>,
    pub value: f64,
    pub money_spent: f64,
}

impl<'a> Trial<'a> {
    pub fn empty() -> Self {
        Self {
            selection: Vec::new(),
            value: 0.0,
            money_spent: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome<'a> {
    /// Best valid trial. Empty when no trial satisfied the constraints.
    pub best: Trial<'a>,
    pub trials_run: u64,
    pub trials_accepted: u64,
    pub timed_out: bool,
}

impl<'a> SearchOutcome<'a> {
    pub fn selection(&self) -> &[&'a Project] {
        &self.best.selection
    }

    pub fn found_selection(&self) -> bool {
        !self.best.selection.is_empty()
    }

    /// Keeps `self` unless `other` is strictly better; counters are summed.
    fn merge(self, other: SearchOutcome<'a>) -> SearchOutcome<'a> {
        let trials_run = self.trials_run + other.trials_run;
        let trials_accepted = self.trials_accepted + other.trials_accepted;
        let timed_out = self.timed_out || other.timed_out;
        let best = if other.best.value > self.best.value {
            other.best
        } else {
            self.best
        };
        SearchOutcome {
            best,
            trials_run,
            trials_accepted,
            timed_out,
        }
    }
}

pub struct SelectionSearch<'a> {
    pool: Vec<&'a Project>,
    budget: f64,
    constraints: ConstraintSet,
    settings: SearchSettings,
}

impl<'a> SelectionSearch<'a> {
    /// The draw pool only holds projects with a positive price and duration.
    pub fn new(
        projects: &'a [Project],
        budget: f64,
        constraints: ConstraintSet,
        settings: SearchSettings,
    ) -> Self {
        let pool: Vec<&Project> = projects
            .iter()
            .filter(|project| {
                let usable = project.price > 0.0 && project.std_time > 0.0;
                if !usable {
                    tracing::warn!(
                        "Excluding project {} from search (price {}, std_time {})",
                        project.id,
                        project.price,
                        project.std_time
                    );
                }
                usable
            })
            .collect();

        if !budget.is_finite() {
            tracing::warn!("Budget {} is not a finite amount, every trial will be empty", budget);
        }

        Self {
            pool,
            budget,
            constraints,
            settings,
        }
    }

    pub fn pool(&self) -> &[&'a Project] {
        &self.pool
    }

    pub fn budget(&self) -> f64 {
        self.budget
    }

    pub fn run_trial<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Trial<'a> {
        let mut remaining = self.budget;
        let mut selection = Vec::new();
        let mut value = 0.0;

        if self.pool.is_empty() || !self.budget.is_finite() {
            return Trial::empty();
        }

        loop {
            let project = self.pool[rng.next_index(self.pool.len())];
            if project.price > remaining {
                break;
            }
            selection.push(project);
            remaining -= project.price;
            value += project.yearly_co2_vol;
        }

        Trial {
            selection,
            value,
            money_spent: self.budget - remaining,
        }
    }

    /// Runs `iterations` trials sequentially with the given randomness,
    /// stopping early once `deadline` has passed.
    pub fn run_with<R: RandomSource + ?Sized>(
        &self,
        rng: &mut R,
        iterations: u64,
        deadline: Option<Instant>,
    ) -> SearchOutcome<'a> {
        let mut best = Trial::empty();
        let mut trials_run = 0;
        let mut trials_accepted = 0;
        let mut timed_out = false;

        if self.pool.is_empty() {
            tracing::warn!("No usable projects to search over");
        }

        while trials_run < iterations {
            if let Some(deadline) = deadline {
                if trials_run % DEADLINE_CHECK_INTERVAL == 0 && Instant::now() >= deadline {
                    timed_out = true;
                    break;
                }
            }

            let trial = self.run_trial(&mut *rng);
            trials_run += 1;

            if !self.constraints.is_satisfied_by(&trial.selection) {
                continue;
            }
            trials_accepted += 1;

            if trial.value > best.value {
                tracing::debug!(
                    value = trial.value,
                    spent = trial.money_spent,
                    units = trial.selection.len(),
                    "New best selection"
                );
                best = trial;
            }
        }

        SearchOutcome {
            best,
            trials_run,
            trials_accepted,
            timed_out,
        }
    }

    /// Splits the iteration budget over independent seeded shards, runs them
    /// on the rayon pool and keeps the best valid result.
    pub fn run(&self) -> SearchOutcome<'a> {
        let workers = self
            .settings
            .workers
            .unwrap_or_else(rayon::current_num_threads)
            .max(1);
        let base_seed = self.settings.seed.unwrap_or_else(rand::random);
        let deadline = self
            .settings
            .time_limit
            .map(|limit| Instant::now() + limit);
        let shards = shard_iterations(self.settings.iterations, workers);

        tracing::debug!(
            "Searching {} iterations over {} shards (seed {})",
            self.settings.iterations,
            shards.len(),
            base_seed
        );

        // Shard results come back in shard order so ties resolve the same
        // way on every run with the same seed.
        let outcomes: Vec<SearchOutcome<'a>> = shards
            .par_iter()
            .enumerate()
            .map(|(shard, iterations)| {
                let mut rng = SeededSource::from_seed(base_seed.wrapping_add(shard as u64));
                self.run_with(&mut rng, *iterations, deadline)
            })
            .collect();

        let empty = SearchOutcome {
            best: Trial::empty(),
            trials_run: 0,
            trials_accepted: 0,
            timed_out: false,
        };
        let mut outcome = outcomes.into_iter().fold(empty, SearchOutcome::merge);

        if outcome.found_selection() && !self.is_acceptable(&outcome.best) {
            tracing::warn!("Best candidate failed re-validation, discarding it");
            outcome.best = Trial::empty();
        }

        if outcome.timed_out {
            tracing::warn!(
                "Time limit reached after {} trials, keeping best so far",
                outcome.trials_run
            );
        }

        outcome
    }

    fn is_acceptable(&self, trial: &Trial<'a>) -> bool {
        trial.money_spent <= self.budget && self.constraints.is_satisfied_by(&trial.selection)
    }
}

/// Splits `iterations` into `workers` near-equal parts, dropping empty ones.
fn shard_iterations(iterations: u64, workers: usize) -> Vec<u64> {
    let workers = workers as u64;
    let base = iterations / workers;
    let extra = iterations % workers;
    (0..workers)
        .map(|shard| base + u64::from(shard < extra))
        .filter(|count| *count > 0)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constraints::GroupMinimums;
    use crate::domain::model::{TermGroup, TimeUnit};

    /// Replays a fixed list of indices, wrapping around.
    struct ScriptedSource {
        picks: Vec<usize>,
        cursor: usize,
    }

    impl ScriptedSource {
        fn new(picks: Vec<usize>) -> Self {
            Self { picks, cursor: 0 }
        }
    }

    impl RandomSource for ScriptedSource {
        fn next_index(&mut self, len: usize) -> usize {
            let pick = self.picks[self.cursor % self.picks.len()] % len;
            self.cursor += 1;
            pick
        }
    }

    fn project(id: &str, price: f64, yearly: f64, group: TermGroup, continent: &str) -> Project {
        Project {
            id: id.to_string(),
            time: 1.0,
            time_unit: TimeUnit::Year,
            co2_volume: yearly,
            price,
            group,
            continent: Some(continent.to_string()),
            min_units: None,
            max_units: None,
            std_time: 1.0,
            yearly_co2_vol: yearly,
        }
    }

    fn pool() -> Vec<Project> {
        vec![
            project("cheap", 10.0, 1.0, TermGroup::ShortTerm, "Europe"),
            project("dense", 40.0, 20.0, TermGroup::LongTerm, "Asia"),
            project("pricey", 90.0, 5.0, TermGroup::MediumTerm, "Africa"),
        ]
    }

    fn settings(iterations: u64, workers: usize, seed: u64) -> SearchSettings {
        SearchSettings {
            iterations,
            workers: Some(workers),
            seed: Some(seed),
            time_limit: None,
        }
    }

    #[test]
    fn test_trial_stops_at_first_project_that_does_not_fit() {
        let projects = pool();
        let search =
            SelectionSearch::new(&projects, 100.0, ConstraintSet::default(), settings(1, 1, 0));

        // dense(40) + dense(40) + cheap(10) = 90, then pricey(90) does not fit
        let mut rng = ScriptedSource::new(vec![1, 1, 0, 2, 0]);
        let trial = search.run_trial(&mut rng);

        let ids: Vec<&str> = trial.selection.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["dense", "dense", "cheap"]);
        assert_eq!(trial.value, 41.0);
        assert_eq!(trial.money_spent, 90.0);
    }

    #[test]
    fn test_non_finite_budget_gives_empty_trials() {
        let projects = pool();
        for budget in [f64::NAN, f64::INFINITY] {
            let search =
                SelectionSearch::new(&projects, budget, ConstraintSet::default(), settings(4, 2, 1));

            let trial = search.run_trial(&mut ScriptedSource::new(vec![0]));
            assert!(trial.selection.is_empty());

            let outcome = search.run();
            assert_eq!(outcome.trials_run, 4);
            assert!(!outcome.found_selection());
        }
    }

    #[test]
    fn test_run_with_keeps_strictly_better_valid_trials() {
        let projects = pool();
        let constraints = ConstraintSet {
            min_continents: 2,
            group_minimums: GroupMinimums::default(),
        };
        let search = SelectionSearch::new(&projects, 100.0, constraints, settings(3, 1, 0));

        // each trial ends when pricey no longer fits
        // trial 1: dense, dense -> one continent, rejected
        // trial 2: cheap, dense -> two continents, value 21
        // trial 3: cheap, cheap -> one continent, rejected
        let mut rng = ScriptedSource::new(vec![1, 1, 2, 0, 1, 2, 0, 0, 2]);
        let outcome = search.run_with(&mut rng, 3, None);

        assert_eq!(outcome.trials_run, 3);
        assert_eq!(outcome.trials_accepted, 1);
        assert_eq!(outcome.best.value, 21.0);
        assert_eq!(outcome.best.money_spent, 50.0);
    }

    #[test]
    fn test_impossible_constraints_yield_empty_selection() {
        let projects = pool();
        let constraints = ConstraintSet {
            min_continents: 5,
            group_minimums: GroupMinimums::default(),
        };
        let search =
            SelectionSearch::new(&projects, 500.0, constraints, settings(2_000, 2, 7));
        let outcome = search.run();

        assert!(!outcome.found_selection());
        assert_eq!(outcome.best.value, 0.0);
        assert_eq!(outcome.trials_run, 2_000);
        assert_eq!(outcome.trials_accepted, 0);
    }

    #[test]
    fn test_best_selection_respects_budget_and_constraints() {
        let projects = pool();
        let constraints = ConstraintSet {
            min_continents: 2,
            group_minimums: GroupMinimums::new(10.0, 0.0, 10.0),
        };
        let search =
            SelectionSearch::new(&projects, 300.0, constraints, settings(5_000, 4, 42));
        let outcome = search.run();

        assert!(outcome.found_selection());
        assert!(outcome.best.money_spent <= 300.0);
        let total: f64 = outcome.selection().iter().map(|p| p.price).sum();
        assert!((total - outcome.best.money_spent).abs() < 1e-9);
        assert!(constraints.is_satisfied_by(outcome.selection()));
    }

    #[test]
    fn test_same_seed_same_result() {
        let projects = pool();
        let run = || {
            SelectionSearch::new(
                &projects,
                250.0,
                ConstraintSet::default(),
                settings(3_000, 3, 99),
            )
            .run()
        };
        let first = run();
        let second = run();

        assert_eq!(first.best.value, second.best.value);
        assert_eq!(first.best.selection, second.best.selection);
    }

    #[test]
    fn test_unusable_projects_are_excluded_from_pool() {
        let mut projects = pool();
        projects.push(project("free", 0.0, 100.0, TermGroup::LongTerm, "Asia"));
        let mut expired = project("expired", 5.0, 0.0, TermGroup::LongTerm, "Asia");
        expired.std_time = 0.0;
        projects.push(expired);

        let search =
            SelectionSearch::new(&projects, 100.0, ConstraintSet::default(), settings(10, 1, 1));
        let ids: Vec<&str> = search.pool().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["cheap", "dense", "pricey"]);
    }

    #[test]
    fn test_empty_pool_returns_empty_outcome() {
        let projects: Vec<Project> = Vec::new();
        let search =
            SelectionSearch::new(&projects, 100.0, ConstraintSet::default(), settings(50, 2, 1));
        let outcome = search.run();

        assert!(!outcome.found_selection());
        assert_eq!(outcome.trials_run, 50);
    }

    #[test]
    fn test_expired_deadline_stops_immediately() {
        let projects = pool();
        let search = SelectionSearch::new(
            &projects,
            100.0,
            ConstraintSet::default(),
            settings(1_000, 1, 3),
        );
        let mut rng = SeededSource::from_seed(3);
        let outcome = search.run_with(&mut rng, 1_000, Some(Instant::now()));

        assert!(outcome.timed_out);
        assert_eq!(outcome.trials_run, 0);
        assert!(!outcome.found_selection());
    }

    #[test]
    fn test_shard_iterations() {
        assert_eq!(shard_iterations(10, 3), vec![4, 3, 3]);
        assert_eq!(shard_iterations(2, 4), vec![1, 1]);
        assert_eq!(shard_iterations(0, 2), Vec::<u64>::new());
    }
}
