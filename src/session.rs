//! Pagination session: the state machine behind `search` and `load_more`.
//!
//! A [`PaginationController`] owns one [`SessionState`] and mutates it only
//! through [`search`](PaginationController::search) and
//! [`load_more`](PaginationController::load_more). Every transition is
//! published to subscribers in the order it happens.
//!
//! # Overlapping calls
//!
//! At most one fetch is in flight per session:
//!
//! - `load_more` while a fetch is in flight is ignored.
//! - `load_more` before any `search` is ignored.
//! - `search` while a fetch is in flight supersedes it. The session is
//!   reset immediately and the stale result is discarded when it arrives.
//!
//! Dropping an operation's future abandons its fetch and clears the
//! loading flag.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tokio::sync::broadcast;

use crate::error::Result;
use crate::models::Repository;
use crate::pagination::{Page, DEFAULT_PAGE_SIZE};
use crate::traits::RepositoryFetcher;

/// Snapshots buffered per subscriber before it starts lagging.
const EVENT_CAPACITY: usize = 64;

/// Observable state of one search session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionState {
    /// Subject of the current or most recent search.
    pub username: Option<String>,
    /// Next page `load_more` will fetch (1-indexed).
    pub current_page: u32,
    /// Accumulated results, page-then-item order.
    pub repos: Vec<Repository>,
    /// True exactly while a fetch is in flight.
    pub is_loading: bool,
    /// Message of the most recent failure, cleared by the next success.
    pub error: Option<String>,
    /// Whether the last fetched page advertised a next page.
    pub has_more: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            username: None,
            current_page: 1,
            repos: Vec::new(),
            is_loading: false,
            error: None,
            has_more: false,
        }
    }
}

impl SessionState {
    /// Lifecycle phase derived from the loading and error fields.
    pub fn phase(&self) -> SessionPhase {
        if self.is_loading {
            SessionPhase::Loading
        } else if self.error.is_some() {
            SessionPhase::Failed
        } else if self.username.is_some() {
            SessionPhase::Success
        } else {
            SessionPhase::Idle
        }
    }
}

/// Coarse state machine position derived from a [`SessionState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionPhase {
    Idle,
    Loading,
    Success,
    Failed,
}

/// What a call to `search` or `load_more` ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The page was merged into the session.
    Loaded { fetched: usize, has_more: bool },
    /// The fetch failed; the message is now the session's error.
    Failed { message: String },
    /// The call was rejected without fetching.
    Ignored,
    /// A newer `search` started while this fetch was in flight; its result
    /// was dropped.
    Superseded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Search,
    LoadMore,
}

struct Inner {
    state: SessionState,
    /// Bumped for every fetch started; identifies the one fetch allowed to
    /// complete.
    generation: u64,
}

/// Drives one paginated listing session on top of a [`RepositoryFetcher`].
///
/// Methods take `&self`, so the controller can be shared behind an `Arc`
/// between a presentation task and the tasks issuing operations.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use ghrepos::{GitHubClient, PaginationController};
///
/// # async fn example() -> ghrepos::Result<()> {
/// let client = Arc::new(GitHubClient::from_env()?);
/// let controller = PaginationController::new(client);
///
/// controller.search("octocat").await;
/// while controller.snapshot().has_more {
///     controller.load_more().await;
/// }
/// println!("{} repositories", controller.snapshot().repos.len());
/// # Ok(())
/// # }
/// ```
pub struct PaginationController<F: ?Sized> {
    fetcher: Arc<F>,
    per_page: u32,
    inner: Mutex<Inner>,
    events: broadcast::Sender<SessionState>,
}

impl<F: ?Sized> fmt::Debug for PaginationController<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaginationController")
            .field("per_page", &self.per_page)
            .field("state", &self.lock().state)
            .finish_non_exhaustive()
    }
}

impl<F: ?Sized> PaginationController<F> {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        // State is only mutated in short synchronous sections, so a
        // poisoned lock still holds a consistent value.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, state: &SessionState) {
        tracing::debug!(
            phase = ?state.phase(),
            page = state.current_page,
            repos = state.repos.len(),
            has_more = state.has_more,
            "session transition"
        );
        // No subscribers is fine
        let _ = self.events.send(state.clone());
    }
}

impl<F: RepositoryFetcher + ?Sized> PaginationController<F> {
    /// Create a controller fetching [`DEFAULT_PAGE_SIZE`] items per page.
    pub fn new(fetcher: Arc<F>) -> Self {
        Self::with_page_size(fetcher, DEFAULT_PAGE_SIZE)
    }

    /// Create a controller with a custom page size (at least 1).
    pub fn with_page_size(fetcher: Arc<F>, per_page: u32) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            fetcher,
            per_page: per_page.max(1),
            inner: Mutex::new(Inner {
                state: SessionState::default(),
                generation: 0,
            }),
            events,
        }
    }

    /// Page size sent with every fetch.
    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Current state.
    pub fn snapshot(&self) -> SessionState {
        self.lock().state.clone()
    }

    /// Receive every state published from now on, in transition order.
    ///
    /// A receiver that falls more than 64 snapshots behind gets
    /// [`RecvError::Lagged`](broadcast::error::RecvError::Lagged) and can
    /// resync through [`snapshot`](Self::snapshot).
    pub fn subscribe(&self) -> broadcast::Receiver<SessionState> {
        self.events.subscribe()
    }

    /// Start a new session for `username` and fetch its first page.
    ///
    /// The reset (loading) state is published before the fetch starts.
    /// Any string is accepted and passed to the fetcher unchanged.
    #[tracing::instrument(skip(self))]
    pub async fn search(&self, username: &str) -> FetchOutcome {
        let generation = {
            let mut inner = self.lock();
            if inner.state.is_loading {
                tracing::debug!("superseding in-flight fetch");
            }
            inner.generation += 1;
            inner.state = SessionState {
                username: Some(username.to_string()),
                is_loading: true,
                ..SessionState::default()
            };
            self.publish(&inner.state);
            inner.generation
        };

        let flight = Flight::new(self, generation);
        let result = self.fetcher.fetch_page(username, 1, self.per_page).await;
        flight.finish(Operation::Search, result)
    }

    /// Fetch the page at the cursor and append it to the session.
    ///
    /// Callers normally invoke this only while `has_more` is set. When it
    /// is not, the cursor has not advanced and the last page is fetched
    /// again.
    #[tracing::instrument(skip(self))]
    pub async fn load_more(&self) -> FetchOutcome {
        let (generation, username, page) = {
            let mut inner = self.lock();
            if inner.state.is_loading {
                tracing::debug!("fetch already in flight, ignoring load_more");
                return FetchOutcome::Ignored;
            }
            let Some(username) = inner.state.username.clone() else {
                tracing::debug!("no search yet, ignoring load_more");
                return FetchOutcome::Ignored;
            };
            inner.generation += 1;
            inner.state.is_loading = true;
            self.publish(&inner.state);
            (inner.generation, username, inner.state.current_page)
        };

        let flight = Flight::new(self, generation);
        let result = self.fetcher.fetch_page(&username, page, self.per_page).await;
        flight.finish(Operation::LoadMore, result)
    }

    fn complete(
        &self,
        generation: u64,
        operation: Operation,
        result: Result<Page<Repository>>,
    ) -> FetchOutcome {
        let mut inner = self.lock();
        if inner.generation != generation {
            tracing::debug!(?operation, "discarding superseded result");
            return FetchOutcome::Superseded;
        }

        let state = &mut inner.state;
        state.is_loading = false;
        let outcome = match result {
            Ok(page) => {
                let fetched = page.len();
                let has_more = page.has_more;
                match operation {
                    Operation::Search => state.repos = page.items,
                    Operation::LoadMore => state.repos.extend(page.items),
                }
                state.has_more = has_more;
                state.error = None;
                if has_more {
                    state.current_page += 1;
                }
                FetchOutcome::Loaded { fetched, has_more }
            }
            Err(err) => {
                let message = err.to_string();
                tracing::warn!(?operation, kind = ?err.kind(), error = %message, "fetch failed");
                state.error = Some(message.clone());
                FetchOutcome::Failed { message }
            }
        };

        self.publish(&inner.state);
        outcome
    }
}

/// Marks one fetch as in flight. Dropped unfinished, it clears the
/// loading flag if no newer fetch has started.
struct Flight<'a, F: ?Sized> {
    controller: &'a PaginationController<F>,
    generation: u64,
    finished: bool,
}

impl<'a, F: RepositoryFetcher + ?Sized> Flight<'a, F> {
    fn new(controller: &'a PaginationController<F>, generation: u64) -> Self {
        Self {
            controller,
            generation,
            finished: false,
        }
    }

    fn finish(mut self, operation: Operation, result: Result<Page<Repository>>) -> FetchOutcome {
        self.finished = true;
        self.controller.complete(self.generation, operation, result)
    }
}

impl<F: ?Sized> Drop for Flight<'_, F> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        let mut inner = self.controller.lock();
        if inner.generation == self.generation && inner.state.is_loading {
            tracing::debug!("fetch abandoned");
            inner.state.is_loading = false;
            self.controller.publish(&inner.state);
        }
    }
}
