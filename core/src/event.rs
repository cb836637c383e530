//! The record passed through handler chains for one member access.

use crate::{AccessKind, Args, Value};
use std::time::Instant;

/// What kind of access produced the event, with its input.
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    /// A property read.
    Get,
    /// A property write of `input`.
    Set { input: Value },
    /// A method call with ordered arguments.
    Call { args: Args },
}

/// Dispatch progress of an event, and of a dispatcher's latest access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    #[default]
    Idle,
    Before,
    On,
    After,
    Resolved,
    /// A handler, the fallback or the lookup failed.
    Errored,
}

/// A single get, set or call access in flight.
///
/// The output starts absent and, once produced, is never cleared (it may be
/// overwritten). Absent output is distinct from a `Null` output. Stopping is
/// one-way.
#[derive(Debug, Clone)]
pub struct MagicEvent {
    name: String,
    kind: EventKind,
    output: Option<Value>,
    stopped: bool,
    phase: Phase,
    created_at: Instant,
}

impl MagicEvent {
    fn new(name: impl Into<String>, kind: EventKind) -> Self {
        Self {
            name: name.into(),
            kind,
            output: None,
            stopped: false,
            phase: Phase::Idle,
            created_at: Instant::now(),
        }
    }

    pub fn get(name: impl Into<String>) -> Self {
        Self::new(name, EventKind::Get)
    }

    pub fn set(name: impl Into<String>, input: impl Into<Value>) -> Self {
        Self::new(
            name,
            EventKind::Set {
                input: input.into(),
            },
        )
    }

    pub fn call(name: impl Into<String>, args: Args) -> Self {
        Self::new(name, EventKind::Call { args })
    }

    /// The accessed member name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &EventKind {
        &self.kind
    }

    pub fn access(&self) -> AccessKind {
        match self.kind {
            EventKind::Get => AccessKind::Get,
            EventKind::Set { .. } => AccessKind::Set,
            EventKind::Call { .. } => AccessKind::Call,
        }
    }

    /// The assigned value of a set access; `Null` for other kinds.
    pub fn input(&self) -> &Value {
        const NULL: &Value = &Value::Null;
        match &self.kind {
            EventKind::Set { input } => input,
            _ => NULL,
        }
    }

    /// The arguments of a call access; empty for other kinds.
    pub fn args(&self) -> &[Value] {
        match &self.kind {
            EventKind::Call { args } => args,
            _ => &[],
        }
    }

    pub fn has_output(&self) -> bool {
        self.output.is_some()
    }

    pub fn output(&self) -> Option<&Value> {
        self.output.as_ref()
    }

    /// The current output, or `default()` when nothing was produced yet.
    pub fn output_or_else(&self, default: impl FnOnce() -> Value) -> Value {
        match &self.output {
            Some(value) => value.clone(),
            None => default(),
        }
    }

    pub fn set_output(&mut self, value: impl Into<Value>) {
        self.output = Some(value.into());
    }

    /// Consume the event, yielding its output or `Null`.
    pub fn into_output(self) -> Value {
        self.output.unwrap_or_default()
    }

    /// Halt the current handler chain.
    pub fn stop(&mut self) {
        self.stopped = true;
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Advance the dispatch phase.
    pub fn enter(&mut self, phase: Phase) {
        self.phase = phase;
    }

    pub fn created_at(&self) -> Instant {
        self.created_at
    }
}
