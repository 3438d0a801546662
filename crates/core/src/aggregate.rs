//! Aggregate traits for the workflow entities (blocks and slabs).

/// Aggregate root marker + minimal interface.
pub trait AggregateRoot {
    /// Strongly-typed aggregate identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the aggregate identifier.
    fn id(&self) -> &Self::Id;

    /// Number of events applied to this instance since it was loaded or created.
    fn version(&self) -> u64;
}

/// Decide/evolve split for workflow entities.
///
/// - **Decision logic**: `handle(&self, cmd)` checks the command against the
///   current state and returns the resulting events.
/// - **State mutation**: `apply(&mut self, event)` evolves state.
///
/// Neither side performs IO. Persisting the outcome is the caller's job.
pub trait Aggregate: AggregateRoot {
    type Command: Clone + core::fmt::Debug;
    type Event: Clone + core::fmt::Debug;
    type Error: core::fmt::Debug;

    /// Evolve in-memory state from a single event.
    fn apply(&mut self, event: &Self::Event);

    /// Decide which events a command produces. Must not mutate state.
    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error>;

    /// Handle a command and return the evolved copy together with the events
    /// that produced it. `self` is left untouched, so a rejected command never
    /// leaves a half-applied entity behind.
    fn execute(&self, command: &Self::Command) -> Result<(Self, Vec<Self::Event>), Self::Error>
    where
        Self: Clone + Sized,
    {
        let events = self.handle(command)?;
        let mut next = self.clone();
        for event in &events {
            next.apply(event);
        }
        Ok((next, events))
    }
}
