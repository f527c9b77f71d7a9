//! One search submission from form read to committed result or error.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use shared::{domain::SearchResults, error::RequestError};
use tracing::{debug, error, info, warn};

use crate::{
    form::{build_request, FormSource},
    render::{render, DisplayTree},
    SearchBackend,
};

/// Where a submission's busy state, results and errors are committed.
pub trait DisplaySurface: Send + Sync {
    fn set_busy(&self, busy: bool);
    /// Drops the previous results and any visible error.
    fn clear(&self);
    fn show_results(&self, tree: DisplayTree);
    fn show_error(&self, message: String);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Rendered { cards: usize },
    Empty,
    Rejected(RequestError),
    Failed(String),
    /// Another submission was still in flight.
    Ignored,
}

#[derive(Debug, Clone, Default)]
pub struct BusyFlag(Arc<AtomicBool>);

impl BusyFlag {
    pub fn is_busy(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Returns `None` while another guard is alive.
    pub fn acquire<'a>(&self, surface: &'a dyn DisplaySurface) -> Option<BusyGuard<'a>> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        surface.set_busy(true);
        Some(BusyGuard {
            flag: Arc::clone(&self.0),
            surface,
        })
    }
}

/// Holds the busy state; dropping it hides the indicator on every exit path.
pub struct BusyGuard<'a> {
    flag: Arc<AtomicBool>,
    surface: &'a dyn DisplaySurface,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.surface.set_busy(false);
        self.flag.store(false, Ordering::Release);
    }
}

pub struct SearchController<B> {
    backend: B,
    busy: BusyFlag,
}

impl<B: SearchBackend> SearchController<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            busy: BusyFlag::default(),
        }
    }

    pub fn busy_flag(&self) -> BusyFlag {
        self.busy.clone()
    }

    pub async fn submit<F>(&self, form: &F, surface: &dyn DisplaySurface) -> SubmitOutcome
    where
        F: FormSource + Sync + ?Sized,
    {
        let Some(_busy) = self.busy.acquire(surface) else {
            debug!("search already in flight; ignoring submit");
            return SubmitOutcome::Ignored;
        };

        surface.clear();

        let request = build_request(form);
        if let Err(err) = request.validate() {
            warn!(error = %err, "search request rejected before sending");
            surface.show_error(err.to_string());
            return SubmitOutcome::Rejected(err);
        }

        info!(
            objectives = ?request.objectives,
            session_minutes = ?request.session_minutes,
            pathologies = ?request.pathologies,
            level = %request.level,
            has_query = request.q.is_some(),
            "submitting routine search"
        );

        match self.backend.search(&request).await {
            Ok(response) => {
                let results = SearchResults::from_response(response);
                let tree = render(&results);
                let outcome = match tree.cards().len() {
                    0 => SubmitOutcome::Empty,
                    cards => SubmitOutcome::Rendered { cards },
                };
                info!(routines = results.routines.len(), "routine search rendered");
                surface.show_results(tree);
                outcome
            }
            Err(err) => {
                error!(error = %err, "routine search failed");
                let message = err.user_message();
                surface.show_error(message.clone());
                SubmitOutcome::Failed(message)
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
