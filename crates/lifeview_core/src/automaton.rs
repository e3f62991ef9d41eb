//! Automaton engine interface
//!
//! The viewer drives a cellular-automaton engine through this trait; the engine
//! itself lives outside this workspace.

/// Run-for count meaning "never stop"
pub const RUN_FOREVER: u64 = u64::MAX;

/// A steppable cellular automaton
///
/// The engine owns a run-for counter. `next_generation` only advances while
/// the counter is non-zero, decrementing it unless it is [`RUN_FOREVER`].
pub trait Automaton: Send {
    /// Advance by one generation if the run-for counter allows it
    fn next_generation(&mut self);

    /// Live cell coordinates of the current generation
    fn live_cells(&self) -> Box<dyn Iterator<Item = (i64, i64)> + '_>;

    /// Generations left to run (0 = paused)
    fn run_for(&self) -> u64;

    fn set_run_for(&mut self, generations: u64);

    /// Number of generations computed so far
    fn generation(&self) -> u64;

    fn is_running(&self) -> bool {
        self.run_for() > 0
    }

    /// Seed cells at an offset
    fn add_cells(&mut self, dx: i64, dy: i64, cells: &[(i64, i64)]);
}
