use crate::term::Term;

/// Synchronous observer for the resolution engine, for tracing only.
///
/// Callbacks are invoked while the search runs and must never alter
/// resolution results; implementations needing interior state can wrap it in
/// a `RefCell`.
pub trait Tracer {
    /// The realizer is about to attempt proving `goal`.
    fn attempting_goal(&self, goal: &Term);
    /// The realizer is about to try `clause` as a candidate for the current
    /// goal.
    fn trying_clause(&self, clause: &Term);
    /// The realizer backtracked out of an exhausted proof subtree.
    fn backtracked(&self);
}
