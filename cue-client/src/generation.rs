//! Stale-response guard
//!
//! Every lookup is issued with a [`Ticket`]. Issuing a new one (or switching
//! to another table) bumps the generation, so a response that arrives after
//! a newer request was made is recognized and dropped instead of
//! overwriting fresher state.

use parking_lot::Mutex;

/// Tag carried by one outstanding request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
    table_id: i64,
}

impl Ticket {
    pub fn table_id(&self) -> i64 {
        self.table_id
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Default)]
struct State {
    generation: u64,
    table_id: Option<i64>,
}

/// Generation counter for the currently viewed table
#[derive(Debug, Default)]
pub struct RequestGeneration {
    state: Mutex<State>,
}

impl RequestGeneration {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut State) -> R) -> R {
        let mut state = self.state.lock();
        f(&mut state)
    }

    /// Point at `table_id`; everything issued before becomes stale.
    pub fn switch_table(&self, table_id: i64) -> Ticket {
        self.with_state(|state| {
            state.generation += 1;
            state.table_id = Some(table_id);
            Ticket {
                generation: state.generation,
                table_id,
            }
        })
    }

    /// New ticket for the current table, superseding earlier ones.
    ///
    /// `None` until a table has been selected.
    pub fn issue(&self) -> Option<Ticket> {
        self.with_state(|state| {
            let table_id = state.table_id?;
            state.generation += 1;
            Some(Ticket {
                generation: state.generation,
                table_id,
            })
        })
    }

    /// Forget the current table; every outstanding ticket becomes stale.
    pub fn clear(&self) {
        self.with_state(|state| {
            state.generation += 1;
            state.table_id = None;
        });
    }

    pub fn current_table(&self) -> Option<i64> {
        self.with_state(|state| state.table_id)
    }

    pub fn is_current(&self, ticket: &Ticket) -> bool {
        self.with_state(|state| {
            state.generation == ticket.generation && state.table_id == Some(ticket.table_id)
        })
    }

    /// Pass `value` through if `ticket` is still current, else drop it.
    pub fn accept<T>(&self, ticket: &Ticket, value: T) -> Option<T> {
        if self.is_current(ticket) {
            Some(value)
        } else {
            tracing::debug!(
                table_id = ticket.table_id,
                generation = ticket.generation,
                "Discarding stale response"
            );
            None
        }
    }
}
