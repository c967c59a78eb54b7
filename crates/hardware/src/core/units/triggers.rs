//! Debug trigger module.
//!
//! Address-match triggers on fetch, load and store. A data-access match is
//! recorded as the *matched trigger* before it is raised; while a match is
//! recorded, data accesses pass unchecked. That is what makes re-running a
//! partially executed memory instruction safe: the replay completes without
//! raising the trigger a second time, and the step loop clears the record
//! afterwards.
//!
//! Execute matches are raised before the instruction has any effect and are
//! never recorded, so they are not replayed.

use std::fmt;

/// Access class a trigger watches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TriggerOp {
    /// Instruction fetch.
    Execute,
    /// Data load.
    Load,
    /// Data store.
    Store,
}

/// What happens once a trigger fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TriggerAction {
    /// Raise a breakpoint exception to the current trap handler.
    DebugException,
    /// Enter debug mode with the hardware-breakpoint cause.
    DebugMode,
}

/// An address-match trigger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Trigger {
    /// Watched address.
    pub address: u64,
    /// Watch fetches.
    pub execute: bool,
    /// Watch loads.
    pub load: bool,
    /// Watch stores.
    pub store: bool,
    /// Action taken on a match.
    pub action: TriggerAction,
}

impl Trigger {
    /// Returns true when the trigger fires for `op` at `addr`.
    pub const fn matches(&self, op: TriggerOp, addr: u64) -> bool {
        let watched = match op {
            TriggerOp::Execute => self.execute,
            TriggerOp::Load => self.load,
            TriggerOp::Store => self.store,
        };
        watched && self.address == addr
    }
}

/// A fired trigger, carried by `Exception::TriggerMatched`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchedTrigger {
    /// Index of the trigger that fired.
    pub index: usize,
    /// Access class that fired it.
    pub op: TriggerOp,
    /// Accessed address.
    pub address: u64,
    /// Configured action.
    pub action: TriggerAction,
}

impl fmt::Display for MatchedTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "trigger {} ({:?} at {:#x}, action {:?})",
            self.index, self.op, self.address, self.action
        )
    }
}

/// Trigger registers of one hart.
#[derive(Clone, Debug, Default)]
pub struct TriggerModule {
    triggers: Vec<Trigger>,
    matched: Option<MatchedTrigger>,
}

impl TriggerModule {
    /// Creates a module with no triggers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a trigger and returns its index.
    pub fn add(&mut self, trigger: Trigger) -> usize {
        self.triggers.push(trigger);
        self.triggers.len() - 1
    }

    /// Removes every trigger and any recorded match.
    pub fn clear(&mut self) {
        self.triggers.clear();
        self.matched = None;
    }

    /// Returns true when no trigger is installed.
    pub fn is_empty(&self) -> bool {
        self.triggers.is_empty()
    }

    fn find(&self, op: TriggerOp, addr: u64) -> Option<MatchedTrigger> {
        self.triggers
            .iter()
            .position(|t| t.matches(op, addr))
            .map(|index| MatchedTrigger {
                index,
                op,
                address: addr,
                action: self.triggers[index].action,
            })
    }

    /// Checks a data access. A match is recorded and returned; nothing fires
    /// while a previous match is still recorded.
    ///
    /// # Errors
    ///
    /// The matched trigger.
    pub fn check_memory(&mut self, op: TriggerOp, addr: u64) -> Result<(), MatchedTrigger> {
        if self.matched.is_some() {
            return Ok(());
        }
        match self.find(op, addr) {
            Some(hit) => {
                self.matched = Some(hit.clone());
                Err(hit)
            }
            None => Ok(()),
        }
    }

    /// Checks an instruction fetch at `pc`. Matches are not recorded.
    ///
    /// # Errors
    ///
    /// The matched trigger.
    pub fn check_execute(&self, pc: u64) -> Result<(), MatchedTrigger> {
        self.find(TriggerOp::Execute, pc).map_or(Ok(()), Err)
    }

    /// The recorded data-access match awaiting replay, if any.
    pub const fn matched(&self) -> Option<&MatchedTrigger> {
        self.matched.as_ref()
    }

    /// Forgets the recorded match once its instruction has been replayed.
    pub fn clear_matched(&mut self) {
        self.matched = None;
    }
}
