//! Recording interface.
//!
//! The orchestrator calls [`Recorder::record`] at most once per decision, and only
//! when the explorer marked the decision record-worthy. Recording is infallible from
//! the orchestrator's point of view: a recorder that talks to a transport owns its own
//! failures and never blocks the caller's decision.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::ExplorerState;

/// Sink for record-worthy decisions.
pub trait Recorder<C: ?Sized, V, S> {
    fn record(
        &self,
        context: &C,
        value: &V,
        explorer_state: &ExplorerState,
        policy_state: Option<&S>,
        event_key: &str,
    );
}

impl<C: ?Sized, V, S, R: Recorder<C, V, S> + ?Sized> Recorder<C, V, S> for Arc<R> {
    fn record(
        &self,
        context: &C,
        value: &V,
        explorer_state: &ExplorerState,
        policy_state: Option<&S>,
        event_key: &str,
    ) {
        (**self).record(context, value, explorer_state, policy_state, event_key);
    }
}

impl<C: ?Sized, V, S, R: Recorder<C, V, S> + ?Sized> Recorder<C, V, S> for &R {
    fn record(
        &self,
        context: &C,
        value: &V,
        explorer_state: &ExplorerState,
        policy_state: Option<&S>,
        event_key: &str,
    ) {
        (**self).record(context, value, explorer_state, policy_state, event_key);
    }
}

/// Appends one text line per record:
///
/// ```text
/// <value> <event key> <explorer state> <policy state> | <context>
/// ```
///
/// A missing policy state (fallback exploration) prints as `-`.
#[derive(Debug, Default)]
pub struct StringRecorder {
    buf: Mutex<String>,
}

impl StringRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything recorded so far; with `flush` the buffer is emptied.
    pub fn take_recording(&self, flush: bool) -> String {
        let mut buf = self.buf.lock();
        if flush {
            std::mem::take(&mut *buf)
        } else {
            buf.clone()
        }
    }
}

impl<C, V, S> Recorder<C, V, S> for StringRecorder
where
    C: fmt::Display + ?Sized,
    V: fmt::Debug,
    S: fmt::Debug,
{
    fn record(
        &self,
        context: &C,
        value: &V,
        explorer_state: &ExplorerState,
        policy_state: Option<&S>,
        event_key: &str,
    ) {
        let policy_state = match policy_state {
            Some(s) => format!("{s:?}"),
            None => "-".to_string(),
        };
        let line = format!("{value:?} {event_key} {explorer_state} {policy_state} | {context}\n");
        self.buf.lock().push_str(&line);
    }
}

/// One stored record.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Interaction<C, V, S> {
    pub context: C,
    pub value: V,
    pub explorer_state: ExplorerState,
    pub policy_state: Option<S>,
    pub event_key: String,
}

/// Keeps cloned records in memory for inspection.
#[derive(Debug)]
pub struct MemoryRecorder<C, V, S> {
    records: Mutex<Vec<Interaction<C, V, S>>>,
}

impl<C, V, S> MemoryRecorder<C, V, S> {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// Remove and return everything recorded so far.
    pub fn drain(&self) -> Vec<Interaction<C, V, S>> {
        std::mem::take(&mut *self.records.lock())
    }
}

impl<C: Clone, V: Clone, S: Clone> MemoryRecorder<C, V, S> {
    pub fn records(&self) -> Vec<Interaction<C, V, S>> {
        self.records.lock().clone()
    }
}

impl<C, V, S> Default for MemoryRecorder<C, V, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clone, V: Clone, S: Clone> Recorder<C, V, S> for MemoryRecorder<C, V, S> {
    fn record(
        &self,
        context: &C,
        value: &V,
        explorer_state: &ExplorerState,
        policy_state: Option<&S>,
        event_key: &str,
    ) {
        self.records.lock().push(Interaction {
            context: context.clone(),
            value: value.clone(),
            explorer_state: explorer_state.clone(),
            policy_state: policy_state.cloned(),
            event_key: event_key.to_string(),
        });
    }
}
