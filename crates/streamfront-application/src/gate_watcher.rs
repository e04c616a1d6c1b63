//! Reactive route gate.
//!
//! Re-evaluates a [`RouteGate`] whenever the session store publishes a new
//! snapshot, reporting only decisions that differ from the last one seen.

use streamfront_core::routing::{GateState, RouteGate};
use streamfront_core::session::SessionSnapshot;
use tokio::sync::watch;

pub struct GateWatcher {
    gate: RouteGate,
    session: watch::Receiver<SessionSnapshot>,
    last: GateState,
}

impl GateWatcher {
    pub fn new(gate: RouteGate, mut session: watch::Receiver<SessionSnapshot>) -> Self {
        let last = gate.evaluate(&session.borrow_and_update());
        Self {
            gate,
            session,
            last,
        }
    }

    pub fn gate(&self) -> RouteGate {
        self.gate
    }

    /// Decision for the latest published snapshot.
    pub fn current(&mut self) -> GateState {
        let state = self.gate.evaluate(&self.session.borrow_and_update());
        self.last = state.clone();
        state
    }

    /// Waits for the next decision that differs from the previous one.
    ///
    /// Returns `None` once the session store is gone. Snapshots that leave the
    /// decision unchanged (a profile edit on an allowed page, say) are skipped.
    pub async fn changed(&mut self) -> Option<GateState> {
        loop {
            if self.session.changed().await.is_err() {
                tracing::debug!("[GateWatcher] Session channel closed");
                return None;
            }
            let state = self.gate.evaluate(&self.session.borrow_and_update());
            if state != self.last {
                tracing::debug!("[GateWatcher] {:?} -> {:?}", self.last, state);
                self.last = state.clone();
                return Some(state);
            }
        }
    }
}
