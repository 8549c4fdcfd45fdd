//! The location tracker: one cancellable sampling session at a time.
//!
//! A session runs on a spawned task bound to a child of the tracker's
//! [`CancellationToken`] scope. It checks permission and location
//! services, then samples the provider immediately and every
//! [`TrackingConfig::interval`], sending `LocationUpdated` events into a
//! bounded channel that backs the stream returned by
//! [`LocationTracker::start`].
//!
//! # Lifecycle
//!
//! ```text
//! Idle -> Starting -> Tracking -> Stopping -> Idle
//!            |           |
//!            +-> Error <-+-> Idle
//! ```
//!
//! A session ends when its stream is dropped, when [`LocationTracker::stop`]
//! is called, when the scope is cancelled, or on a provider error. On every
//! exit path a drop guard resets `is_tracking`, clears the active session,
//! and releases the provider. The returned stream carries a guard of its
//! own, so dropping it tears the session down before `drop` returns and a
//! following `start()` begins a fresh session.
//!
//! Teardown passes through `Stopping` while the provider is released; the
//! session lock is not held across [`LocationProvider::stop_updates`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use fairway_types::{LocationTrackingState, RoundEvent};
use futures::StreamExt;
use futures::stream::{self, BoxStream};
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;

use crate::config::TrackingConfig;
use crate::error::TrackingError;
use crate::provider::{LocationProvider, PermissionChecker, PermissionRequester};

/// Stream of location events from one session. An error is the last item.
pub type LocationStream = BoxStream<'static, Result<RoundEvent, TrackingError>>;

type SessionItem = Result<RoundEvent, TrackingError>;

/// Where the tracker is in its session lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackingPhase {
    /// No session.
    #[default]
    Idle,
    /// A session is checking permission and location services.
    Starting,
    /// A session is sampling.
    Tracking,
    /// A session is being torn down and the provider released.
    Stopping,
    /// A session failed and is about to return to `Idle`.
    Error,
}

/// Periodic location sampling over a host-supplied provider.
pub struct LocationTracker<C, P> {
    inner: Arc<Inner<C, P>>,
}

impl<C, P> Clone for LocationTracker<C, P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct Inner<C, P> {
    checker: C,
    provider: P,
    config: TrackingConfig,
    scope: CancellationToken,
    state: watch::Sender<LocationTrackingState>,
    session: Mutex<Session>,
    next_session_id: AtomicU64,
}

#[derive(Default)]
struct Session {
    phase: TrackingPhase,
    active: Option<ActiveSession>,
}

struct ActiveSession {
    id: u64,
    token: CancellationToken,
}

impl Session {
    fn is_active(&self, id: u64) -> bool {
        self.active.as_ref().is_some_and(|a| a.id == id)
    }
}

impl<C: PermissionChecker, P: LocationProvider> LocationTracker<C, P> {
    /// Create a tracker with its own cancellation scope.
    pub fn new(checker: C, provider: P, config: TrackingConfig) -> Self {
        Self::with_scope(checker, provider, config, CancellationToken::new())
    }

    /// Create a tracker whose sessions end when `scope` is cancelled.
    pub fn with_scope(
        checker: C,
        provider: P,
        config: TrackingConfig,
        scope: CancellationToken,
    ) -> Self {
        let (state, _) = watch::channel(LocationTrackingState::default());
        Self {
            inner: Arc::new(Inner {
                checker,
                provider,
                config,
                scope,
                state,
                session: Mutex::new(Session::default()),
                next_session_id: AtomicU64::new(1),
            }),
        }
    }

    /// Start a tracking session and return its events.
    ///
    /// While a session is starting or tracking, returns an empty stream
    /// and leaves the provider alone. Must be called within a tokio
    /// runtime.
    pub fn start(&self) -> LocationStream {
        let (id, token) = {
            let mut session = self.inner.lock_session();
            if matches!(
                session.phase,
                TrackingPhase::Starting | TrackingPhase::Tracking
            ) {
                tracing::debug!(phase = ?session.phase, "Location tracking already active");
                return stream::empty().boxed();
            }

            let id = self.inner.next_session_id.fetch_add(1, Ordering::Relaxed);
            let token = self.inner.scope.child_token();
            session.phase = TrackingPhase::Starting;
            session.active = Some(ActiveSession {
                id,
                token: token.clone(),
            });
            self.inner.state.send_modify(|s| s.last_error = None);
            (id, token)
        };

        let (tx, rx) = mpsc::channel(self.inner.config.channel_capacity.max(1));
        tokio::spawn(run_session(Arc::clone(&self.inner), id, token, tx));
        tracing::debug!(session = id, "Spawned location tracking session");

        let consumer = SessionGuard {
            inner: Arc::clone(&self.inner),
            id,
        };
        stream::unfold((rx, consumer), |(mut rx, consumer)| async move {
            rx.recv().await.map(|item| (item, (rx, consumer)))
        })
        .boxed()
    }

    /// End the active session, if any.
    pub fn stop(&self) {
        match self.inner.teardown(|_| true) {
            Some(id) => tracing::info!(session = id, "Location tracking stopped"),
            None => tracing::debug!("No location tracking session to stop"),
        }
    }

    /// Watch the observable tracking state.
    pub fn subscribe(&self) -> watch::Receiver<LocationTrackingState> {
        self.inner.state.subscribe()
    }

    /// `true` while a session is sampling.
    pub fn is_tracking(&self) -> bool {
        self.inner.state.borrow().is_tracking
    }

    /// Current observable state.
    pub fn state(&self) -> LocationTrackingState {
        self.inner.state.borrow().clone()
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> TrackingPhase {
        self.inner.lock_session().phase
    }

    /// The configuration sessions run with.
    pub fn config(&self) -> &TrackingConfig {
        &self.inner.config
    }

    /// Ask the user for location permission in `context`.
    ///
    /// `is_requesting_permission` is set while the prompt is open, and
    /// `has_permission` records the answer.
    pub async fn request_permission<R: PermissionRequester>(
        &self,
        requester: &R,
        context: &R::Context,
    ) -> bool {
        self.inner
            .state
            .send_modify(|s| s.is_requesting_permission = true);
        let _requesting = RequestingGuard(&self.inner.state);

        let granted = requester.request_location_permission(context).await;
        self.inner
            .state
            .send_modify(|s| s.has_permission = Some(granted));

        tracing::info!(granted, "Location permission request finished");
        granted
    }
}

impl<C, P> Inner<C, P> {
    fn lock_session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<C: PermissionChecker, P: LocationProvider> Inner<C, P> {
    /// Permission first, then location services.
    fn preflight(&self) -> Result<(), TrackingError> {
        let granted = self.checker.has_location_permission();
        self.state.send_if_modified(|s| {
            let changed = s.has_permission != Some(granted);
            s.has_permission = Some(granted);
            changed
        });
        if !granted {
            return Err(TrackingError::PermissionDenied);
        }
        if !self.provider.is_location_enabled() {
            return Err(TrackingError::LocationDisabled);
        }
        Ok(())
    }

    /// Move a starting session to `Tracking`. `false` if it was stopped.
    fn begin_tracking(&self, id: u64) -> bool {
        let mut session = self.lock_session();
        if !session.is_active(id) {
            return false;
        }
        session.phase = TrackingPhase::Tracking;
        self.state.send_modify(|s| s.is_tracking = true);
        true
    }

    fn fail(&self, id: u64, error: &TrackingError) {
        let mut session = self.lock_session();
        if session.is_active(id) {
            session.phase = TrackingPhase::Error;
        }
        self.state
            .send_modify(|s| s.last_error = Some(error.to_string()));
    }
}

impl<C, P: LocationProvider> Inner<C, P> {
    /// Release everything session `id` holds, unless it already ended.
    fn end_session(&self, id: u64) {
        if self.teardown(|active| active.id == id).is_some() {
            tracing::debug!(session = id, "Location tracking session ended");
        }
    }

    /// Cancel the active session if `select` accepts it, release the
    /// provider, and return to `Idle`. Returns the ended session's id.
    fn teardown(&self, select: impl FnOnce(&ActiveSession) -> bool) -> Option<u64> {
        let active = {
            let mut session = self.lock_session();
            if !session.active.as_ref().is_some_and(select) {
                return None;
            }
            session.phase = TrackingPhase::Stopping;
            self.state.send_modify(|s| s.is_tracking = false);
            session.active.take()?
        };

        active.token.cancel();
        self.provider.stop_updates();

        let mut session = self.lock_session();
        // A new session may have started while the provider was released.
        if session.active.is_none() && session.phase == TrackingPhase::Stopping {
            session.phase = TrackingPhase::Idle;
        }
        Some(active.id)
    }
}

/// Runs [`Inner::end_session`] when the session task exits or its stream
/// is dropped, whichever comes first.
struct SessionGuard<C, P: LocationProvider> {
    inner: Arc<Inner<C, P>>,
    id: u64,
}

impl<C, P: LocationProvider> Drop for SessionGuard<C, P> {
    fn drop(&mut self) {
        self.inner.end_session(self.id);
    }
}

/// Clears `is_requesting_permission` even if the request is abandoned.
struct RequestingGuard<'a>(&'a watch::Sender<LocationTrackingState>);

impl Drop for RequestingGuard<'_> {
    fn drop(&mut self) {
        self.0.send_modify(|s| s.is_requesting_permission = false);
    }
}

async fn run_session<C: PermissionChecker, P: LocationProvider>(
    inner: Arc<Inner<C, P>>,
    id: u64,
    token: CancellationToken,
    tx: mpsc::Sender<SessionItem>,
) {
    let _guard = SessionGuard {
        inner: Arc::clone(&inner),
        id,
    };
    if token.is_cancelled() {
        return;
    }

    if let Err(e) = inner.preflight() {
        tracing::warn!(session = id, error = %e, "Location tracking could not start");
        inner.fail(id, &e);
        deliver(&tx, &token, Err(e)).await;
        return;
    }
    if !inner.begin_tracking(id) {
        return;
    }
    tracing::info!(
        session = id,
        interval_ms = inner.config.interval_ms,
        "Location tracking started"
    );

    let interval = inner.config.interval();
    loop {
        let sample = tokio::select! {
            biased;
            () = token.cancelled() => break,
            () = tx.closed() => break,
            sample = inner.provider.current_location() => sample,
        };

        match sample {
            Ok(location) => match location.validate() {
                Ok(()) => {
                    let event =
                        RoundEvent::location_updated(Utc::now().timestamp_millis(), location);
                    if !deliver(&tx, &token, Ok(event)).await {
                        break;
                    }
                }
                Err(e) => {
                    tracing::warn!(session = id, error = %e, "Skipping out-of-range location sample");
                }
            },
            Err(failure) => {
                let e = TrackingError::ProviderError(failure.message);
                tracing::warn!(session = id, error = %e, "Location provider failed");
                inner.fail(id, &e);
                deliver(&tx, &token, Err(e)).await;
                break;
            }
        }

        tokio::select! {
            biased;
            () = token.cancelled() => break,
            () = tx.closed() => break,
            () = tokio::time::sleep(interval) => {}
        }
    }

    tracing::debug!(session = id, "Location tracking loop exited");
}

/// Send one item unless the session is cancelled first.
///
/// `false` once the item can no longer be delivered.
async fn deliver(
    tx: &mpsc::Sender<SessionItem>,
    token: &CancellationToken,
    item: SessionItem,
) -> bool {
    tokio::select! {
        biased;
        () = token.cancelled() => false,
        sent = tx.send(item) => sent.is_ok(),
    }
}
