//! Admission guards for engine entry points that must not overlap.
//!
//! A rejected request is dropped, not queued. Callers treat guarded
//! operations as best-effort.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

/// At most one holder at a time; the token releases the slot on drop.
#[derive(Debug, Default)]
pub(crate) struct SingleFlight {
    busy: AtomicBool,
}

impl SingleFlight {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn try_enter(&self) -> Option<FlightGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| FlightGuard { busy: &self.busy })
    }
}

pub(crate) struct FlightGuard<'a> {
    busy: &'a AtomicBool,
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

#[derive(Debug, Default)]
struct GateState {
    processing: bool,
    last_accepted: Option<Instant>,
}

/// Debounce plus reentrancy guard for track selection.
///
/// A request is rejected while a previous one is still being processed or
/// when it arrives within `window` of the last accepted request.
#[derive(Debug)]
pub(crate) struct SelectionGate {
    window: Duration,
    state: Mutex<GateState>,
}

impl SelectionGate {
    pub(crate) fn new(window: Duration) -> Self {
        Self {
            window,
            state: Mutex::new(GateState::default()),
        }
    }

    pub(crate) fn try_begin(&self) -> Option<SelectionTicket<'_>> {
        self.try_begin_at(Instant::now())
    }

    fn try_begin_at(&self, now: Instant) -> Option<SelectionTicket<'_>> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.processing {
            return None;
        }
        if let Some(last) = state.last_accepted {
            if now.saturating_duration_since(last) < self.window {
                return None;
            }
        }
        state.processing = true;
        state.last_accepted = Some(now);
        Some(SelectionTicket { gate: self })
    }
}

pub(crate) struct SelectionTicket<'a> {
    gate: &'a SelectionGate,
}

impl Drop for SelectionTicket<'_> {
    fn drop(&mut self) {
        let mut state = self
            .gate
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        state.processing = false;
    }
}
