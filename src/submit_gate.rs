//! Per-form submission gate.
//!
//! **Why this exists**: every form that talks to the backend must not be
//! submitted twice from repeated clicks, and the frontend needs one place
//! to read whether a form is idle, in flight, or finished. One mechanism
//! replaces a scattered per-page loading flag.
//!
//! **Design**:
//! - `SubmitGate` lives in `AppState` (shared via `Arc`)
//! - `try_begin()` returns `None` while the same form is already in flight
//! - the returned guard is RAII: resolve it with `succeed()`/`fail()`,
//!   or drop it to reset the form to idle
//! - `phase()` provides observability for the frontend status display

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

/// Which form is submitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormKind {
    Login,
    Register,
    Booking,
    ProfileUpdate,
}

/// Observable lifecycle of one form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum FormPhase {
    Idle,
    Submitting { started_at: String },
    Succeeded,
    Failed { reason: String },
}

/// Tracks in-flight submissions and last-known phase per form.
pub struct SubmitGate {
    inflight: Mutex<HashSet<FormKind>>,
    phases: Mutex<HashMap<FormKind, FormPhase>>,
}

impl SubmitGate {
    pub fn new() -> Self {
        Self {
            inflight: Mutex::new(HashSet::new()),
            phases: Mutex::new(HashMap::new()),
        }
    }

    /// Begin a submission. Returns `None` if the same form is already in
    /// flight — the caller must refuse the duplicate submit.
    pub fn try_begin(&self, kind: FormKind) -> Option<SubmitGuard<'_>> {
        {
            let mut inflight = self.inflight.lock().ok()?;
            if !inflight.insert(kind) {
                return None;
            }
        }
        self.set_phase(
            kind,
            FormPhase::Submitting {
                started_at: chrono::Utc::now().to_rfc3339(),
            },
        );
        Some(SubmitGuard {
            gate: self,
            kind,
            resolved: false,
        })
    }

    /// Last-known phase of a form.
    pub fn phase(&self, kind: FormKind) -> FormPhase {
        self.phases
            .lock()
            .ok()
            .and_then(|phases| phases.get(&kind).cloned())
            .unwrap_or(FormPhase::Idle)
    }

    /// Is the form currently in flight?
    pub fn is_submitting(&self, kind: FormKind) -> bool {
        self.inflight
            .lock()
            .map(|inflight| inflight.contains(&kind))
            .unwrap_or(false)
    }

    // ── Internal ────────────────────────────────────────────

    fn set_phase(&self, kind: FormKind, phase: FormPhase) {
        if let Ok(mut phases) = self.phases.lock() {
            phases.insert(kind, phase);
        }
    }

    fn release(&self, kind: FormKind) {
        if let Ok(mut inflight) = self.inflight.lock() {
            inflight.remove(&kind);
        }
    }
}

impl Default for SubmitGate {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII token for one in-flight submission.
///
/// Resolve with `succeed()` or `fail()`; dropping without resolving
/// resets the form to idle (the submission never completed).
pub struct SubmitGuard<'a> {
    gate: &'a SubmitGate,
    kind: FormKind,
    resolved: bool,
}

impl SubmitGuard<'_> {
    pub fn succeed(mut self) {
        self.resolved = true;
        self.gate.set_phase(self.kind, FormPhase::Succeeded);
    }

    pub fn fail(mut self, reason: &str) {
        self.resolved = true;
        self.gate.set_phase(
            self.kind,
            FormPhase::Failed {
                reason: reason.to_string(),
            },
        );
    }
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        if !self.resolved {
            self.gate.set_phase(self.kind, FormPhase::Idle);
        }
        self.gate.release(self.kind);
    }
}
