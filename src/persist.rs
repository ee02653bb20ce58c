//! Session persistence boundary.
//!
//! The engine does not own a durable format; it hands the caller a
//! serializable [`RoundState`] snapshot after every mutating intent and asks
//! for one back at construction. The shoe's card order is deliberately not
//! part of the snapshot; a restored session always starts from a fresh
//! shuffle of the configured deck count.

use std::cell::RefCell;
use std::rc::Rc;

use crate::round::RoundState;

/// Where durable session state lives.
pub trait StateStore {
    /// Returns the previously saved snapshot, if any. `None` means a fresh
    /// session with the default starting balance.
    fn load(&self) -> Option<RoundState>;

    /// Persists a snapshot.
    fn save(&mut self, state: &RoundState);
}

impl<S: StateStore> StateStore for Rc<RefCell<S>> {
    fn load(&self) -> Option<RoundState> {
        self.borrow().load()
    }

    fn save(&mut self, state: &RoundState) {
        self.borrow_mut().save(state);
    }
}

/// Store that keeps the latest snapshot in memory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryStore {
    state: Option<RoundState>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self { state: None }
    }
}

impl StateStore for MemoryStore {
    fn load(&self) -> Option<RoundState> {
        self.state.clone()
    }

    fn save(&mut self, state: &RoundState) {
        self.state = Some(state.clone());
    }
}

/// Store that discards every snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NullStore;

impl StateStore for NullStore {
    fn load(&self) -> Option<RoundState> {
        None
    }

    fn save(&mut self, _state: &RoundState) {}
}
