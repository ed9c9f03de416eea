//! The Monte Carlo search: repeated, budget-bounded randomized descents over
//! the AND/OR graph, keeping the cheapest successful trial.
//!
//! The graph the miner exposes is typically infinite (upcasts and method
//! chains can cycle) and the search is not required to be optimal — spec.md
//! §4.2 chooses randomized descent with hard budgets over exact search for
//! exactly that reason. A trial either succeeds with some cost or fails
//! outright; there is no partial credit, so a failed trial's scratch state
//! is simply discarded.

use std::collections::{HashMap, HashSet};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::miner::DependencyMiner;
use crate::model::{Dependency, Node, Plan};

/// Search budgets and the RNG seed (spec.md §4.2's "Configuration").
#[derive(Debug, Clone, Copy)]
pub struct Config {
    /// How many independent trials to run. Spec.md's documented default is
    /// 1000.
    pub number_of_trials: u32,
    /// A trial whose running cost exceeds this is aborted.
    pub cost_limit: u32,
    /// A trial whose recursion depth exceeds this is aborted.
    pub depth_limit: u32,
    /// Completed trials cheaper than this are discarded, letting callers
    /// demand a minimum complexity.
    pub min_cost: u32,
    /// Seed for the solver's RNG. Fixing this makes `solve` fully
    /// deterministic (spec.md §8, property 5).
    pub seed: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            number_of_trials: 1000,
            cost_limit: 64,
            depth_limit: 32,
            min_cost: 0,
            seed: 0,
        }
    }
}

/// Per-trial scratch state, discarded whether the trial succeeds or fails.
#[derive(Default)]
struct Trial {
    creation_order: Vec<Node>,
    dependency_order: Vec<Dependency>,
    cost: u32,
    created: HashSet<Node>,
}

/// The AND/OR search over a [`DependencyMiner`]'s candidates.
///
/// Owns its memoization table and RNG; per spec.md §5, a solver is
/// single-threaded scratch state and must not be shared across threads —
/// callers wanting parallelism instantiate one solver (and, transitively,
/// one view) per thread.
pub struct MonteCarloSolver<'v> {
    miner: DependencyMiner<'v>,
    /// `Node -> candidate dependencies`, populated lazily and shared across
    /// trials and across repeated calls to [`MonteCarloSolver::solve`].
    memo: HashMap<Node, Vec<Dependency>>,
    rng: SmallRng,
}

impl std::fmt::Debug for MonteCarloSolver<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MonteCarloSolver")
            .field("miner", &self.miner)
            .field("memoized_nodes", &self.memo.len())
            .finish_non_exhaustive()
    }
}

impl<'v> MonteCarloSolver<'v> {
    /// Wraps a miner with a solver seeded for deterministic search.
    #[must_use]
    pub fn new(miner: DependencyMiner<'v>, seed: u64) -> Self {
        Self {
            miner,
            memo: HashMap::new(),
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Runs up to `config.number_of_trials` independent trials for `root`
    /// and returns the cheapest one that both succeeded and met
    /// `config.min_cost`, or `None` if every trial failed or was too cheap
    /// to keep (spec.md §4.2's `Solve`).
    pub fn solve(&mut self, root: &Node, config: &Config) -> Option<Plan> {
        let mut best: Option<Plan> = None;
        for _ in 0..config.number_of_trials {
            let mut trial = Trial::default();
            if !self.recurse(root, 0, config, &mut trial) {
                continue;
            }
            if trial.cost < config.min_cost {
                continue;
            }
            let is_better = best.as_ref().is_none_or(|b| trial.cost < b.cost);
            if is_better {
                best = Some(Plan {
                    result: root.clone(),
                    creation_order: trial.creation_order,
                    dependency_order: trial.dependency_order,
                    cost: trial.cost,
                });
            }
        }
        best
    }

    /// One randomized descent, per spec.md §4.2's `recurse`.
    fn recurse(&mut self, node: &Node, depth: u32, config: &Config, trial: &mut Trial) -> bool {
        if trial.created.contains(node) {
            return true;
        }
        if depth > config.depth_limit {
            return false;
        }
        let deps = self.memoized_dependencies_of(node);
        if deps.is_empty() {
            return false;
        }
        let choice = self.rng.gen_range(0..deps.len());
        let dep = deps[choice].clone();

        trial.cost += dep.cost();
        if trial.cost > config.cost_limit {
            return false;
        }

        for requirement in dep.requirements() {
            if !self.recurse(&requirement, depth + 1, config, trial) {
                return false;
            }
        }

        trial.created.insert(node.clone());
        trial.creation_order.push(node.clone());
        trial.dependency_order.push(dep);
        true
    }

    fn memoized_dependencies_of(&mut self, node: &Node) -> Vec<Dependency> {
        if let Some(deps) = self.memo.get(node) {
            return deps.clone();
        }
        let deps = self.miner.dependencies_of(node);
        self.memo.insert(node.clone(), deps.clone());
        deps
    }
}
