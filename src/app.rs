//! View state for catalog-backed screens
//!
//! Each screen (listing, search, detail, playback) owns a `ViewState` that
//! tracks what it shows and which request is allowed to update it. Requests
//! are numbered; only the latest one may land, and nothing lands after the
//! view is closed.

use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::api::CatalogError;

// =============================================================================
// Loading State
// =============================================================================

/// Loading state for async operations
#[derive(Debug, Clone, Default, PartialEq)]
pub enum LoadingState {
    /// Idle - no loading in progress
    #[default]
    Idle,
    /// Loading with optional message
    Loading(Option<String>),
    /// Error with message
    Error(String),
}

impl LoadingState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadingState::Loading(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, LoadingState::Error(_))
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            LoadingState::Loading(Some(msg)) => Some(msg),
            LoadingState::Error(msg) => Some(msg),
            _ => None,
        }
    }
}

// =============================================================================
// Request Tickets
// =============================================================================

/// Proof that a request was started; stale once a newer one begins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

impl Ticket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

// =============================================================================
// View State
// =============================================================================

/// Data shown by one view plus the bookkeeping that guards it
#[derive(Debug)]
pub struct ViewState<T> {
    pub data: T,
    pub loading: LoadingState,
    error: Option<CatalogError>,
    generation: u64,
    loaded: bool,
    cancel: CancellationToken,
}

impl<T: Default> Default for ViewState<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> ViewState<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            loading: LoadingState::Idle,
            error: None,
            generation: 0,
            loaded: false,
            cancel: CancellationToken::new(),
        }
    }

    /// Start a request; every earlier ticket becomes stale
    pub fn begin(&mut self) -> Ticket {
        self.generation += 1;
        self.loading = LoadingState::Loading(None);
        Ticket(self.generation)
    }

    /// Start a request with a loading message
    pub fn begin_with(&mut self, message: impl Into<String>) -> Ticket {
        let ticket = self.begin();
        self.loading = LoadingState::Loading(Some(message.into()));
        ticket
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.generation && !self.cancel.is_cancelled()
    }

    /// Apply a request's outcome if it is still the latest one
    ///
    /// Returns whether the outcome was applied. A failure keeps the previous
    /// data and records the error, so the view can tell "could not reach the
    /// catalog" apart from "nothing to show".
    pub fn apply(&mut self, ticket: Ticket, outcome: Result<T, CatalogError>) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!(
                ticket = ticket.0,
                latest = self.generation,
                "Dropping superseded response"
            );
            return false;
        }

        match outcome {
            Ok(data) => {
                self.data = data;
                self.loaded = true;
                self.loading = LoadingState::Idle;
                self.error = None;
            }
            Err(e) => {
                self.loading = LoadingState::Error(e.to_string());
                self.error = Some(e);
            }
        }
        true
    }

    /// Run a request against this view and apply its outcome
    pub async fn load<F>(&mut self, request: F) -> bool
    where
        F: Future<Output = Result<T, CatalogError>>,
    {
        let ticket = self.begin();
        match self.guard(request).await {
            Some(outcome) => self.apply(ticket, outcome),
            None => false,
        }
    }

    /// Race a future against this view's lifetime
    ///
    /// Yields `None` once the view has been closed.
    pub async fn guard<F: Future>(&self, fut: F) -> Option<F::Output> {
        let token = self.cancel.clone();
        tokio::select! {
            biased;
            _ = token.cancelled() => None,
            out = fut => Some(out),
        }
    }

    /// Token that fires when the view closes, for requests spawned elsewhere
    pub fn cancellation(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Close the view; in-flight requests are abandoned
    pub fn close(&mut self) {
        self.cancel.cancel();
        if self.loading.is_loading() {
            self.loading = LoadingState::Idle;
        }
    }

    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// True once some request has succeeded
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Last request failed to reach or decode the catalog
    pub fn is_unavailable(&self) -> bool {
        self.loading.is_error()
    }

    /// Why the last applied request failed, if it did
    pub fn error(&self) -> Option<&CatalogError> {
        self.error.as_ref()
    }
}

impl<U> ViewState<Vec<U>> {
    /// The catalog answered and there was nothing in it
    pub fn is_confirmed_empty(&self) -> bool {
        self.loaded && !self.loading.is_error() && self.data.is_empty()
    }
}
