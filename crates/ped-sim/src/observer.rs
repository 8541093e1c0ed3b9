//! Simulation observer trait for progress reporting and data collection.

use ped_core::Iteration;

use crate::Simulation;

/// Callbacks invoked by [`Simulation::run_iterations`] and
/// [`Simulation::run_until_empty`] around every iteration.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example — progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter { interval: u64 }
///
/// impl SimObserver for ProgressPrinter {
///     fn on_iteration_end(&mut self, sim: &Simulation) {
///         if sim.iteration().is_multiple_of(self.interval) {
///             println!("{}: {} agents", sim.iteration(), sim.agent_count());
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called before `iterate()`, with the iteration about to run.
    fn on_iteration_start(&mut self, _iteration: Iteration) {}

    /// Called after `iterate()` with read access to the committed state,
    /// the removed agents and the trace.
    fn on_iteration_end(&mut self, _sim: &Simulation) {}

    /// Called once when [`Simulation::run_until_empty`] returns.
    fn on_sim_end(&mut self, _sim: &Simulation) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
