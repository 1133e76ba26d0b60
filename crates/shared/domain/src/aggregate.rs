//! Event collection owned by an aggregate root.

use uuid::Uuid;

use crate::events::DomainEvent;

/// Append-only, insertion-ordered list of events raised since the aggregate
/// was created or loaded. Outer layers read it, dispatch, then drain it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainEvents<E> {
    events: Vec<E>,
}

impl<E> DomainEvents<E> {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub(crate) fn push(&mut self, event: impl Into<E>) {
        self.events.push(event.into());
    }

    /// Read-only view in the order the events were raised.
    pub fn as_slice(&self) -> &[E] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Drain all events, leaving the collection empty.
    pub fn take(&mut self) -> Vec<E> {
        std::mem::take(&mut self.events)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl<E: DomainEvent> DomainEvents<E> {
    /// Remove a single event by id. Returns whether it was present.
    pub fn remove(&mut self, event_id: Uuid) -> bool {
        let before = self.events.len();
        self.events.retain(|e| e.event_id() != event_id);
        self.events.len() != before
    }
}

impl<E> Default for DomainEvents<E> {
    fn default() -> Self {
        Self::new()
    }
}
