//! Refresh coordination
//!
//! Tracks the session phase and the requests parked behind an in-flight
//! token refresh. All transitions happen under one short `parking_lot`
//! critical section; nothing here awaits while holding the lock.
//!
//! An explicit logout while `Refreshing` is remembered and wins over the
//! refresh outcome: the session stays logged out until the next login.
//!
//! ```text
//! Valid --401--> Refreshing --ok--> Valid
//!                          \--err--> LoggedOut --login--> Valid
//! ```

use std::collections::VecDeque;
use std::fmt;

use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::oneshot;

use super::errors::ApiError;
use super::request::ApiRequest;

/// Result delivered to a parked caller.
pub type ReplayResult = Result<Value, ApiError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Valid,
    Refreshing,
    LoggedOut,
}

ihome_domain::impl_domain_status_conversions!(SessionPhase {
    Valid => "valid",
    Refreshing => "refreshing",
    LoggedOut => "logged_out",
});

/// A request that hit 401 while a refresh was already running.
pub struct PendingRequest {
    pub request: ApiRequest,
    pub reply: oneshot::Sender<ReplayResult>,
}

impl PendingRequest {
    /// Deliver the outcome; a caller that went away is ignored.
    pub fn resolve(self, result: ReplayResult) {
        let _ = self.reply.send(result);
    }

    /// The caller dropped its future and will never read the result.
    pub fn is_abandoned(&self) -> bool {
        self.reply.is_closed()
    }
}

impl fmt::Debug for PendingRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingRequest").field("request", &self.request.describe()).finish()
    }
}

/// Outcome of admitting an authorization failure.
#[derive(Debug)]
pub enum Admission {
    /// The caller must run the refresh; the request comes back marked retried.
    Lead(ApiRequest),
    /// A refresh is already running; await the replay result here.
    Queued(oneshot::Receiver<ReplayResult>),
}

/// What a refresh cycle settled into.
#[derive(Debug)]
pub struct Settlement {
    pub phase: SessionPhase,
    /// Parked requests, oldest first.
    pub pending: Vec<PendingRequest>,
}

#[derive(Debug)]
struct CoordinatorState {
    phase: SessionPhase,
    queue: VecDeque<PendingRequest>,
    logout_requested: bool,
}

/// Phase plus FIFO queue of parked requests, owned by one API client.
#[derive(Debug)]
pub struct RefreshCoordinator {
    state: Mutex<CoordinatorState>,
}

impl RefreshCoordinator {
    pub fn new(phase: SessionPhase) -> Self {
        Self {
            state: Mutex::new(CoordinatorState {
                phase,
                queue: VecDeque::new(),
                logout_requested: false,
            }),
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.lock().phase
    }

    pub fn queued(&self) -> usize {
        self.state.lock().queue.len()
    }

    /// Admit a first-time 401 for `request`.
    ///
    /// While `Refreshing` the request is parked at the back of the queue.
    /// Otherwise the phase moves to `Refreshing` and the caller leads.
    /// Either way the request is marked retried.
    pub fn admit(&self, mut request: ApiRequest) -> Admission {
        request.retried = true;

        let mut state = self.state.lock();
        if state.phase == SessionPhase::Refreshing {
            let (reply, receiver) = oneshot::channel();
            state.queue.push_back(PendingRequest { request, reply });
            Admission::Queued(receiver)
        } else {
            state.phase = SessionPhase::Refreshing;
            state.logout_requested = false;
            Admission::Lead(request)
        }
    }

    /// Leave `Refreshing` and take every parked request, oldest first.
    ///
    /// Phase change and drain happen in one critical section, so a 401
    /// admitted afterwards sees the settled phase. A logout requested during
    /// the refresh settles as `LoggedOut` whatever the outcome.
    pub fn settle(&self, refreshed: bool) -> Settlement {
        let mut state = self.state.lock();
        let renewed = refreshed && !state.logout_requested;
        state.phase = if renewed { SessionPhase::Valid } else { SessionPhase::LoggedOut };
        state.logout_requested = false;
        Settlement { phase: state.phase, pending: state.queue.drain(..).collect() }
    }

    /// An explicit logout arrived while the current refresh was in flight.
    pub fn logout_requested(&self) -> bool {
        self.state.lock().logout_requested
    }

    /// Explicit login.
    pub fn mark_valid(&self) {
        let mut state = self.state.lock();
        state.phase = SessionPhase::Valid;
        state.logout_requested = false;
    }

    /// Explicit logout.
    ///
    /// Requests parked behind a refresh are left alone; the refresh task
    /// still settles them, as logged out.
    pub fn mark_logged_out(&self) {
        let mut state = self.state.lock();
        if state.phase == SessionPhase::Refreshing {
            state.logout_requested = true;
        } else {
            state.phase = SessionPhase::LoggedOut;
        }
    }
}

impl Default for RefreshCoordinator {
    fn default() -> Self {
        Self::new(SessionPhase::Valid)
    }
}
