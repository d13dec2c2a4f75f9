//! Debounced search-as-you-type sessions.
//!
//! [`SessionMachine`] is the pure state machine; [`SearchSession`] drives it
//! on a tokio runtime. Every keystroke takes a new sequence number, and a
//! result is delivered only if its sequence is still the latest one when it
//! resolves. Superseded work is not interrupted once matching has begun; its
//! output is dropped.

use crate::matcher::{CharClassMatcher, MatchMode, QueryMatcher, SearchMatcher};
use kondate_core::config::SearchConfig;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

/// Default quiet period before a query is issued.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Where a session is in its keystroke-to-results cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No query outstanding
    #[default]
    Idle,
    /// Debounce timer running
    Pending,
    /// Matching in flight
    Matching,
    /// Results delivered
    Settled,
}

/// Sequence-numbered session state machine.
///
/// Transitions taking a sequence number only apply when that sequence is the
/// latest one issued and return whether they did.
#[derive(Debug, Clone, Default)]
pub struct SessionMachine {
    state: SessionState,
    latest: u64,
}

impl SessionMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Latest issued sequence number; 0 before the first keystroke.
    pub fn latest(&self) -> u64 {
        self.latest
    }

    /// Whether a request is waiting on its timer or matching.
    pub fn in_flight(&self) -> bool {
        matches!(self.state, SessionState::Pending | SessionState::Matching)
    }

    /// Record a keystroke and return the sequence of the request it issues.
    pub fn keystroke(&mut self) -> u64 {
        self.latest += 1;
        self.state = SessionState::Pending;
        self.latest
    }

    pub fn is_current(&self, seq: u64) -> bool {
        seq == self.latest
    }

    /// The debounce timer for `seq` elapsed.
    pub fn fire(&self, seq: u64) -> bool {
        self.is_current(seq) && self.state == SessionState::Pending
    }

    /// Pending → Matching.
    pub fn begin_matching(&mut self, seq: u64) -> bool {
        if !self.fire(seq) {
            return false;
        }
        self.state = SessionState::Matching;
        true
    }

    /// Pending or Matching → Settled.
    pub fn resolve(&mut self, seq: u64) -> bool {
        if !self.is_current(seq) || !self.in_flight() {
            return false;
        }
        self.state = SessionState::Settled;
        true
    }

    /// Back to Idle. Anything in flight becomes stale.
    pub fn clear(&mut self) {
        self.latest += 1;
        self.state = SessionState::Idle;
    }
}

/// Session timing and strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub debounce: Duration,
    pub mode: MatchMode,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            mode: MatchMode::Normalized,
        }
    }
}

impl From<&SearchConfig> for SessionConfig {
    fn from(config: &SearchConfig) -> Self {
        Self {
            debounce: Duration::from_millis(config.debounce_ms),
            mode: config.mode,
        }
    }
}

/// Results for one issued query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResults {
    pub sequence: u64,
    pub query: String,
    /// Indices into the candidate list, ascending
    pub matches: Vec<usize>,
}

/// Delivery counters for one session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub delivered: u64,
    pub superseded: u64,
    pub fallbacks: u64,
}

type ResultsCallback = Arc<dyn Fn(SearchResults) + Send + Sync>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

struct Shared<M> {
    matcher: M,
    config: SessionConfig,
    machine: Mutex<SessionMachine>,
    candidates: RwLock<Arc<[String]>>,
    callback: RwLock<Option<ResultsCallback>>,
    state_tx: watch::Sender<SessionState>,
    delivered: AtomicU64,
    superseded: AtomicU64,
    fallbacks: AtomicU64,
}

impl<M: QueryMatcher> Shared<M> {
    /// Apply `transition` and publish the resulting state.
    fn transition(&self, transition: impl FnOnce(&mut SessionMachine) -> bool) -> bool {
        let mut machine = lock(&self.machine);
        let applied = transition(&mut machine);
        if applied {
            self.state_tx.send_replace(machine.state());
        }
        applied
    }

    fn is_current(&self, seq: u64) -> bool {
        lock(&self.machine).is_current(seq)
    }

    fn candidates(&self) -> Arc<[String]> {
        let guard = self.candidates.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    async fn run(self: Arc<Self>, seq: u64, query: String) {
        tokio::time::sleep(self.config.debounce).await;

        let candidates = self.candidates();
        let matches = match self.config.mode {
            MatchMode::Sync => {
                if !lock(&self.machine).fire(seq) {
                    return;
                }
                crate::filter::filter_candidates_sync(&query, &candidates)
            }
            MatchMode::Normalized => {
                if !self.transition(|m| m.begin_matching(seq)) {
                    return;
                }
                trace!(seq, query = %query, "Matching");
                match self.match_all(seq, &query, &candidates).await {
                    Some(matches) => matches,
                    None => {
                        debug!(seq, "Superseded while matching");
                        return;
                    }
                }
            }
        };

        self.settle(seq, query, matches);
    }

    /// `None` once `seq` has been superseded.
    async fn match_all(&self, seq: u64, query: &str, candidates: &[String]) -> Option<Vec<usize>> {
        let mut matches = Vec::new();
        for (index, candidate) in candidates.iter().enumerate() {
            if !self.is_current(seq) {
                return None;
            }
            let matched = match self.matcher.try_matches(query, candidate).await {
                Ok(matched) => matched,
                Err(e) => {
                    warn!(query, error = %e, "Match failed, falling back to character folding");
                    self.fallbacks.fetch_add(1, Ordering::Relaxed);
                    CharClassMatcher.matches(query, candidate)
                }
            };
            if matched {
                matches.push(index);
            }
        }
        Some(matches)
    }

    fn settle(&self, seq: u64, query: String, matches: Vec<usize>) {
        if !self.transition(|m| m.resolve(seq)) {
            debug!(seq, "Dropping stale results");
            return;
        }

        let callback = self
            .callback
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        self.delivered.fetch_add(1, Ordering::Relaxed);
        debug!(seq, matches = matches.len(), "Results delivered");

        if let Some(callback) = callback {
            callback(SearchResults {
                sequence: seq,
                query,
                matches,
            });
        }
    }
}

/// A search field bound to one matcher and one candidate list.
///
/// Must be used from within a tokio runtime.
pub struct SearchSession<M> {
    shared: Arc<Shared<M>>,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl<M: QueryMatcher + 'static> SearchSession<M> {
    pub fn new(matcher: M, config: SessionConfig) -> Self {
        let (state_tx, _) = watch::channel(SessionState::Idle);
        Self {
            shared: Arc::new(Shared {
                matcher,
                config,
                machine: Mutex::new(SessionMachine::new()),
                candidates: RwLock::new(Arc::from(Vec::new())),
                callback: RwLock::new(None),
                state_tx,
                delivered: AtomicU64::new(0),
                superseded: AtomicU64::new(0),
                fallbacks: AtomicU64::new(0),
            }),
            timer: Mutex::new(None),
        }
    }

    pub fn config(&self) -> SessionConfig {
        self.shared.config
    }

    /// Replace the strings tested by later queries.
    pub fn set_candidates<I, S>(&self, candidates: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let candidates: Arc<[String]> = candidates.into_iter().map(Into::into).collect();
        *self
            .shared
            .candidates
            .write()
            .unwrap_or_else(PoisonError::into_inner) = candidates;
    }

    /// Register the consumer of delivered results, replacing any previous one.
    pub fn on_results<F>(&self, callback: F)
    where
        F: Fn(SearchResults) + Send + Sync + 'static,
    {
        *self
            .shared
            .callback
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(callback));
    }

    /// Record a keystroke. Restarts the debounce timer and supersedes any
    /// outstanding request. Returns the new request's sequence number.
    pub fn set_query(&self, text: impl Into<String>) -> u64 {
        let query = text.into();
        let (seq, was_pending) = {
            let mut machine = lock(&self.shared.machine);
            let was_pending = machine.state() == SessionState::Pending;
            if machine.in_flight() {
                self.shared.superseded.fetch_add(1, Ordering::Relaxed);
            }
            let seq = machine.keystroke();
            self.shared.state_tx.send_replace(machine.state());
            (seq, was_pending)
        };

        let mut timer = lock(&self.timer);
        if let Some(previous) = timer.take() {
            // A request already matching finishes on its own and is dropped.
            if was_pending {
                previous.abort();
            }
        }
        trace!(seq, query = %query, "Keystroke");
        *timer = Some(tokio::spawn(Arc::clone(&self.shared).run(seq, query)));
        seq
    }

    /// Drop any outstanding request and return to Idle.
    pub fn clear(&self) {
        {
            let mut machine = lock(&self.shared.machine);
            if machine.in_flight() {
                self.shared.superseded.fetch_add(1, Ordering::Relaxed);
            }
            machine.clear();
            self.shared.state_tx.send_replace(machine.state());
        }
        if let Some(previous) = lock(&self.timer).take() {
            previous.abort();
        }
    }

    pub fn state(&self) -> SessionState {
        lock(&self.shared.machine).state()
    }

    /// Receiver that observes every state change.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.shared.state_tx.subscribe()
    }

    /// Wait until the latest request has delivered its results.
    pub async fn wait_until_settled(&self) {
        let mut rx = self.subscribe();
        // The sender lives as long as `self`.
        let _ = rx.wait_for(|state| *state == SessionState::Settled).await;
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats {
            delivered: self.shared.delivered.load(Ordering::Relaxed),
            superseded: self.shared.superseded.load(Ordering::Relaxed),
            fallbacks: self.shared.fallbacks.load(Ordering::Relaxed),
        }
    }
}

impl SearchSession<SearchMatcher> {
    /// Session over `matcher` with its own normalization cache.
    pub fn scoped(matcher: &SearchMatcher, config: SessionConfig) -> Self {
        Self::new(matcher.session_scoped(), config)
    }
}

impl<M> Drop for SearchSession<M> {
    fn drop(&mut self) {
        if let Some(timer) = lock(&self.timer).take() {
            timer.abort();
        }
    }
}
