//! Credential state and the refresh wave queue.
//!
//! The credential, its generation counter, the in-flight flag and the queue
//! of waiting requests share one mutex so that "is a refresh running?" and
//! "join it" happen as a single step. The lock is only held for short,
//! synchronous sections and never across an `.await`.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::{oneshot, watch};

use storefront_core::{AccessToken, ApiResponse, Result, UserIdentity};

use crate::request::ApiRequest;

/// Authentication status as observed by the rest of the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthStatus {
    /// No credential has been obtained yet, or the user logged out.
    SignedOut,
    /// A credential is held.
    SignedIn(Option<UserIdentity>),
    /// The refresh endpoint rejected the session; the user must log in again.
    Expired,
}

/// The bearer token plus whatever identity came with it.
#[derive(Debug, Clone)]
pub(crate) struct SessionCredential {
    pub token: AccessToken,
    pub identity: Option<UserIdentity>,
}

/// Work parked until the open refresh wave settles.
pub(crate) enum Waiter {
    /// A request that failed with the stale credential.
    Replay {
        request: ApiRequest,
        reply: oneshot::Sender<Result<ApiResponse>>,
    },
    /// An explicit `refresh()` call that found a wave already open.
    Refresh { reply: oneshot::Sender<Result<()>> },
}

/// Handle on a wave outcome.
pub(crate) struct Ticket<T> {
    /// True when this admission opened the wave and must start it.
    pub opened: bool,
    pub outcome: oneshot::Receiver<Result<T>>,
}

pub(crate) enum ReplayAdmission {
    /// The credential changed after the request was sent; retry right away.
    Retry(ApiRequest),
    Wait(Ticket<ApiResponse>),
}

struct Inner {
    credential: Option<SessionCredential>,
    generation: u64,
    /// Generation when the open wave started.
    wave_generation: u64,
    in_flight: bool,
    pending: VecDeque<Waiter>,
}

impl Inner {
    /// Mark the wave open. Returns true when this call opened it.
    fn open_wave(&mut self) -> bool {
        if self.in_flight {
            return false;
        }
        self.in_flight = true;
        self.wave_generation = self.generation;
        true
    }

    fn install(&mut self, token: AccessToken, identity: Option<UserIdentity>) -> AuthStatus {
        let identity =
            identity.or_else(|| self.credential.as_ref().and_then(|c| c.identity.clone()));
        self.credential = Some(SessionCredential {
            token,
            identity: identity.clone(),
        });
        self.generation += 1;
        AuthStatus::SignedIn(identity)
    }
}

pub(crate) struct SessionState {
    inner: Mutex<Inner>,
    status: watch::Sender<AuthStatus>,
}

impl SessionState {
    pub fn new() -> Self {
        let (status, _) = watch::channel(AuthStatus::SignedOut);
        Self {
            inner: Mutex::new(Inner {
                credential: None,
                generation: 0,
                wave_generation: 0,
                in_flight: false,
                pending: VecDeque::new(),
            }),
            status,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current token and the generation it belongs to.
    pub fn snapshot(&self) -> (Option<AccessToken>, u64) {
        let inner = self.lock();
        (
            inner.credential.as_ref().map(|c| c.token.clone()),
            inner.generation,
        )
    }

    pub fn credential(&self) -> Option<SessionCredential> {
        self.lock().credential.clone()
    }

    /// Install a new credential. An identity of `None` keeps the one already held.
    pub fn store(&self, token: AccessToken, identity: Option<UserIdentity>) {
        let mut inner = self.lock();
        let status = inner.install(token, identity);
        self.status.send_replace(status);
    }

    /// Install the credential the open wave obtained. Returns false, leaving
    /// the session untouched, when a login, restore or logout moved the
    /// generation after the wave opened.
    pub fn store_refreshed(&self, token: AccessToken, identity: Option<UserIdentity>) -> bool {
        let mut inner = self.lock();
        if inner.generation != inner.wave_generation {
            return false;
        }
        let status = inner.install(token, identity);
        self.status.send_replace(status);
        true
    }

    /// Drop the credential and publish the given status.
    pub fn clear(&self, status: AuthStatus) {
        let mut inner = self.lock();
        inner.credential = None;
        inner.generation += 1;
        self.status.send_replace(status);
    }

    /// Expire the session the open wave was refreshing. Does nothing when the
    /// session was already replaced.
    pub fn expire_refreshed(&self) -> bool {
        let mut inner = self.lock();
        if inner.generation != inner.wave_generation {
            return false;
        }
        inner.credential = None;
        inner.generation += 1;
        self.status.send_replace(AuthStatus::Expired);
        true
    }

    /// Decide what a request answered with 401 should do next.
    pub fn admit_replay(&self, request: ApiRequest) -> ReplayAdmission {
        let mut inner = self.lock();

        if inner.credential.is_some() && inner.generation != request.sent_with {
            return ReplayAdmission::Retry(request);
        }

        let (reply, outcome) = oneshot::channel();
        let opened = inner.open_wave();
        inner.pending.push_back(Waiter::Replay { request, reply });

        ReplayAdmission::Wait(Ticket { opened, outcome })
    }

    /// Join the open wave, or open one.
    pub fn admit_refresh(&self) -> Ticket<()> {
        let mut inner = self.lock();
        let (reply, outcome) = oneshot::channel();
        let opened = inner.open_wave();
        inner.pending.push_back(Waiter::Refresh { reply });
        Ticket { opened, outcome }
    }

    /// Take everything queued so far, in arrival order. When nothing is
    /// queued the wave is closed and `None` is returned, so a request that
    /// fails after this point opens a new wave.
    pub fn take_batch(&self) -> Option<Vec<Waiter>> {
        let mut inner = self.lock();
        if inner.pending.is_empty() {
            inner.in_flight = false;
            None
        } else {
            Some(inner.pending.drain(..).collect())
        }
    }

    /// Close the wave without an outcome. Dropping the queued senders wakes
    /// every waiter with a closed channel.
    pub fn abandon(&self) {
        let dropped: Vec<Waiter> = {
            let mut inner = self.lock();
            inner.in_flight = false;
            inner.pending.drain(..).collect()
        };
        drop(dropped);
    }

    pub fn in_flight(&self) -> bool {
        self.lock().in_flight
    }

    pub fn pending(&self) -> usize {
        self.lock().pending.len()
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthStatus> {
        self.status.subscribe()
    }

    pub fn status(&self) -> AuthStatus {
        self.status.borrow().clone()
    }
}

impl std::fmt::Debug for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.lock();
        f.debug_struct("SessionState")
            .field("authenticated", &inner.credential.is_some())
            .field("generation", &inner.generation)
            .field("in_flight", &inner.in_flight)
            .field("pending", &inner.pending.len())
            .finish()
    }
}
