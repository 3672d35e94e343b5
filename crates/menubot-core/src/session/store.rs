//! `SessionStore` -- concurrent user-id -> `Session` map with TTL expiry.
//!
//! The entire keyspace sits behind one `std::sync::RwLock`. Reads run in
//! parallel; `put`, `update` and sweep passes are exclusive. No lock is ever
//! held across an `.await`.
//!
//! Timestamp discipline: `put` persists the session exactly as given. The
//! caller stamps `updated_at`, so the store never disagrees with the clock
//! the caller reasoned about. `update` hands the caller the store's `now`
//! for the same purpose.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use tracing::Span;

use menubot_types::session::Session;

use super::sweeper::EvictionSweeper;
use crate::clock::{Clock, SystemClock};

/// Sessions plus the TTL they are judged against, guarded together.
#[derive(Debug)]
pub(crate) struct SessionTable {
    sessions: HashMap<String, Session>,
    ttl: TimeDelta,
}

impl SessionTable {
    fn live(&self, user_id: &str, now: DateTime<Utc>) -> Option<&Session> {
        self.sessions
            .get(user_id)
            .filter(|session| !session.is_expired(now, self.ttl))
    }

    /// Remove every expired session. Returns how many were removed.
    pub(crate) fn sweep(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.sessions.len();
        let ttl = self.ttl;
        self.sessions.retain(|_, session| !session.is_expired(now, ttl));
        before - self.sessions.len()
    }

    pub(crate) fn len(&self) -> usize {
        self.sessions.len()
    }
}

pub(crate) type SharedTable = Arc<RwLock<SessionTable>>;

// A panic while holding the lock cannot leave a half-written entry behind
// (every mutation is a single map operation), so poisoned guards are reused.
pub(crate) fn read_table(table: &RwLock<SessionTable>) -> RwLockReadGuard<'_, SessionTable> {
    table.read().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn write_table(table: &RwLock<SessionTable>) -> RwLockWriteGuard<'_, SessionTable> {
    table.write().unwrap_or_else(PoisonError::into_inner)
}

fn to_time_delta(ttl: Duration) -> TimeDelta {
    TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX)
}

/// Concurrent per-user session store with lazy and active TTL eviction.
///
/// Exactly one entry exists per user id. A session idle for longer than
/// the TTL is invisible to [`get`](Self::get) and [`update`](Self::update),
/// and is physically removed by the eviction sweeper.
pub struct SessionStore {
    table: SharedTable,
    clock: Arc<dyn Clock>,
    sweeper: Mutex<Option<EvictionSweeper>>,
    span: Span,
}

impl SessionStore {
    /// TTL used until [`start_eviction`](Self::start_eviction) sets one.
    pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

    /// Create an empty store judging expiry against `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            table: Arc::new(RwLock::new(SessionTable {
                sessions: HashMap::new(),
                ttl: to_time_delta(ttl),
            })),
            clock: Arc::new(SystemClock),
            sweeper: Mutex::new(None),
            span: tracing::info_span!("session_store"),
        }
    }

    /// Replace the wall clock (tests use [`ManualClock`](crate::clock::ManualClock)).
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Parent span for every event this store and its sweeper emit.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Current time according to the store's clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// The idle duration after which sessions expire.
    pub fn ttl(&self) -> Duration {
        read_table(&self.table).ttl.to_std().unwrap_or(Duration::MAX)
    }

    /// Fetch the session for `user_id`.
    ///
    /// Returns a fresh `welcome` session (both timestamps at now, empty data)
    /// when no entry exists or the entry has expired. Never mutates the
    /// store: a default session is not persisted until someone `put`s it, and
    /// an expired entry stays in place until the sweeper removes it.
    pub fn get(&self, user_id: &str) -> Session {
        let now = self.clock.now();
        read_table(&self.table)
            .live(user_id, now)
            .cloned()
            .unwrap_or_else(|| Session::new(user_id, now))
    }

    /// Unconditionally insert or overwrite the session for `user_id`.
    ///
    /// The session is stored exactly as given; timestamps are the caller's
    /// responsibility.
    pub fn put(&self, user_id: &str, session: Session) {
        write_table(&self.table)
            .sessions
            .insert(user_id.to_string(), session);
    }

    /// Atomic read-modify-write of one user's session.
    ///
    /// Holds the write lock for the whole call, so concurrent updates for
    /// the same user are serialized and none is lost. `f` receives what
    /// [`get`](Self::get) would return plus the store's current time, and
    /// returns the session to store alongside a result. When `f` fails the
    /// stored entry is left untouched.
    ///
    /// `f` runs under the exclusive lock and must not call back into the
    /// store.
    pub fn update<T, E, F>(&self, user_id: &str, f: F) -> Result<T, E>
    where
        F: FnOnce(Session, DateTime<Utc>) -> Result<(Session, T), E>,
    {
        let mut table = write_table(&self.table);
        let now = self.clock.now();
        let current = table
            .live(user_id, now)
            .cloned()
            .unwrap_or_else(|| Session::new(user_id, now));

        let (next, output) = f(current, now)?;
        table.sessions.insert(user_id.to_string(), next);
        Ok(output)
    }

    /// Number of stored entries, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        read_table(&self.table).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether an entry is physically present, expired or not.
    pub fn contains_entry(&self, user_id: &str) -> bool {
        read_table(&self.table).sessions.contains_key(user_id)
    }

    /// Run one sweep pass now. Returns the number of sessions removed.
    pub fn sweep_expired(&self) -> usize {
        let now = self.clock.now();
        write_table(&self.table).sweep(now)
    }

    /// Set the TTL and start the background sweeper.
    ///
    /// Every `sweep_interval` (first pass one interval from now) the sweeper
    /// removes every session idle for longer than `ttl`. Must be called from
    /// within a tokio runtime.
    ///
    /// # Panics
    ///
    /// If a sweeper is already running, or `sweep_interval` is zero. Both
    /// are programmer errors.
    pub fn start_eviction(&self, ttl: Duration, sweep_interval: Duration) {
        assert!(
            !sweep_interval.is_zero(),
            "SessionStore::start_eviction: sweep interval must be non-zero"
        );

        let mut slot = self.sweeper.lock().unwrap_or_else(PoisonError::into_inner);
        assert!(
            slot.is_none(),
            "SessionStore::start_eviction called while eviction is already running"
        );

        write_table(&self.table).ttl = to_time_delta(ttl);

        let span = tracing::info_span!(parent: &self.span, "eviction_sweeper");
        *slot = Some(EvictionSweeper::spawn(
            Arc::clone(&self.table),
            Arc::clone(&self.clock),
            sweep_interval,
            span,
        ));

        tracing::info!(
            parent: &self.span,
            ttl_secs = ttl.as_secs(),
            interval_secs = sweep_interval.as_secs(),
            "session eviction started"
        );
    }

    /// Stop the background sweeper and wait for it to finish.
    ///
    /// Once this returns no further sweep runs and the sweeper task no
    /// longer touches the store.
    ///
    /// # Panics
    ///
    /// If no sweeper is running (never started, or already stopped).
    pub async fn stop_eviction(&self) {
        let sweeper = self
            .sweeper
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        let Some(sweeper) = sweeper else {
            panic!("SessionStore::stop_eviction called while eviction is not running");
        };

        sweeper.stop().await;
        tracing::info!(parent: &self.span, "session eviction stopped");
    }

    /// Whether the background sweeper is running.
    pub fn is_evicting(&self) -> bool {
        self.sweeper
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    #[cfg(test)]
    pub(crate) fn shared_table(&self) -> SharedTable {
        Arc::clone(&self.table)
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TTL)
    }
}

impl Drop for SessionStore {
    fn drop(&mut self) {
        let sweeper = self
            .sweeper
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(sweeper) = sweeper {
            sweeper.cancel();
        }
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("sessions", &self.len())
            .field("ttl", &self.ttl())
            .field("evicting", &self.is_evicting())
            .finish()
    }
}
