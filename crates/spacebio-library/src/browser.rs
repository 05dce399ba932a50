//! Async driver pairing a composer with a page source.

use async_trait::async_trait;
use spacebio_common::{LibraryPage, Result};
use tokio::sync::Mutex;
use tracing::{debug, instrument};

use crate::composer::{Accepted, LibraryComposer, Transition};
use crate::state::LibraryQueryState;

/// Anything that can fetch one library page.
#[async_trait]
pub trait LibrarySource: Send + Sync {
    async fn fetch_library(&self, query: &LibraryQueryState) -> Result<LibraryPage>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum BrowseOutcome {
    Applied(LibraryPage),
    /// A later transition was issued while this one was in flight.
    Stale,
}

/// Shared browsing session. Transitions may be issued concurrently; the
/// composer lock is never held across the fetch.
pub struct LibraryBrowser<S> {
    composer: Mutex<LibraryComposer>,
    source: S,
}

impl<S: LibrarySource> LibraryBrowser<S> {
    pub fn new(source: S, page_size: u32) -> Self {
        Self { composer: Mutex::new(LibraryComposer::new(page_size)), source }
    }

    /// Apply `transition` and fetch its page. Errors surface only while the
    /// request is still the latest; a superseded failure is `Stale`.
    #[instrument(skip(self))]
    pub async fn transition(&self, transition: Transition) -> Result<BrowseOutcome> {
        let request = self.composer.lock().await.apply(transition);
        let fetched = self.source.fetch_library(&request.query).await;

        let mut composer = self.composer.lock().await;
        let page = match fetched {
            Ok(page) => page,
            Err(e) if composer.is_latest(request.seq) => return Err(e),
            Err(e) => {
                debug!(seq = request.seq, error = %e, "Dropping failure of superseded library query");
                return Ok(BrowseOutcome::Stale);
            }
        };
        match composer.accept(request.seq, page.clone()) {
            Accepted::Applied => Ok(BrowseOutcome::Applied(page)),
            Accepted::Stale => Ok(BrowseOutcome::Stale),
        }
    }

    pub async fn state(&self) -> LibraryQueryState {
        self.composer.lock().await.state().clone()
    }

    pub async fn page_count(&self) -> Option<u32> {
        self.composer.lock().await.page_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spacebio_common::ClientError;
    use std::time::Duration;

    /// Answers instantly unless the query text is "slow".
    struct DelayedSource;

    /// Fails every query after a delay when its text is "slow".
    struct SlowFailingSource;

    #[async_trait]
    impl LibrarySource for SlowFailingSource {
        async fn fetch_library(&self, query: &LibraryQueryState) -> Result<LibraryPage> {
            if query.q == "slow" {
                tokio::time::sleep(Duration::from_millis(50)).await;
                return Err(ClientError::RequestFailed { status: 500, detail: "boom".into() });
            }
            DelayedSource.fetch_library(query).await
        }
    }

    #[async_trait]
    impl LibrarySource for DelayedSource {
        async fn fetch_library(&self, query: &LibraryQueryState) -> Result<LibraryPage> {
            if query.q == "slow" {
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
            Ok(LibraryPage {
                total: query.q.len() as u64,
                page: query.page,
                page_size: query.page_size,
                results: Vec::new(),
            })
        }
    }

    #[tokio::test]
    async fn test_slow_earlier_response_does_not_overwrite() {
        let browser = LibraryBrowser::new(DelayedSource, 20);
        let (slow, fast) = tokio::join!(
            browser.transition(Transition::SetText("slow".into())),
            browser.transition(Transition::SetText("fast!".into())),
        );
        assert_eq!(slow.unwrap(), BrowseOutcome::Stale);
        assert!(matches!(fast.unwrap(), BrowseOutcome::Applied(p) if p.total == 5));
        assert_eq!(browser.state().await.q, "fast!");
        assert_eq!(browser.page_count().await, Some(1));
    }

    #[tokio::test]
    async fn test_superseded_failure_is_stale() {
        let browser = LibraryBrowser::new(SlowFailingSource, 20);
        let (slow, fast) = tokio::join!(
            browser.transition(Transition::SetText("slow".into())),
            browser.transition(Transition::SetText("fast".into())),
        );
        assert_eq!(slow.unwrap(), BrowseOutcome::Stale);
        assert!(matches!(fast.unwrap(), BrowseOutcome::Applied(p) if p.total == 4));
    }

    #[tokio::test]
    async fn test_latest_failure_is_returned() {
        let browser = LibraryBrowser::new(SlowFailingSource, 20);
        let err = browser.transition(Transition::SetText("slow".into())).await.unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert_eq!(browser.page_count().await, None);
    }
}
