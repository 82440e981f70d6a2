//! Step observer trait for watching a tick from the outside.

/// Hooks into the phases of one fixed tick.
///
/// Useful for debugging overlays and profiling. All methods default to
/// no-ops.
pub trait StepObserver {
    /// Called after the chain and targets have been Verlet-integrated.
    fn on_integrate(&mut self) {}

    /// Called after each solver iteration.
    fn on_solver_iteration(&mut self, _iteration: usize) {}

    /// Called when a target breaks, with its index at that moment.
    fn on_shatter(&mut self, _index: usize) {}

    /// Called when the tick is fully complete.
    fn on_tick_complete(&mut self) {}
}

/// Observer that ignores everything.
pub struct NoOpStepObserver;

impl StepObserver for NoOpStepObserver {}
