//! Per-session cache of the most recent query, answer and search results.
//! Single logical owner; read-modify-write goes through the persistence port.

use crate::entities::{AnswerPayload, SearchResult};
use crate::error::Result;
use crate::store::{KeyValueStore, KeyValueStoreExt};

const LAST_QUERY_KEY: &str = "spacebio.last_query";
const LAST_ANSWER_KEY: &str = "spacebio.last_answer";
const LAST_RESULTS_KEY: &str = "spacebio.last_results";
const LAST_QUESTION_KEY: &str = "spacebio.last_question";

pub struct SessionCache<S> {
    store: S,
}

impl<S: KeyValueStore> SessionCache<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn remember_search(&self, query: &str, results: &[SearchResult]) -> Result<()> {
        self.store.set_json(LAST_QUERY_KEY, query)?;
        self.store.set_json(LAST_RESULTS_KEY, results)
    }

    pub fn remember_answer(&self, query: &str, answer: &AnswerPayload) -> Result<()> {
        self.store.set_json(LAST_QUERY_KEY, query)?;
        self.store.set_json(LAST_QUESTION_KEY, query)?;
        self.store.set_json(LAST_ANSWER_KEY, answer)
    }

    pub fn last_query(&self) -> Result<Option<String>> {
        self.store.get_json(LAST_QUERY_KEY)
    }

    /// The question `last_answer` answered. Unlike `last_query`, a later
    /// search does not replace it.
    pub fn last_question(&self) -> Result<Option<String>> {
        self.store.get_json(LAST_QUESTION_KEY)
    }

    pub fn last_answer(&self) -> Result<Option<AnswerPayload>> {
        self.store.get_json(LAST_ANSWER_KEY)
    }

    pub fn last_results(&self) -> Result<Vec<SearchResult>> {
        Ok(self.store.get_json(LAST_RESULTS_KEY)?.unwrap_or_default())
    }

    pub fn clear(&self) -> Result<()> {
        self.store.remove(LAST_QUERY_KEY)?;
        self.store.remove(LAST_ANSWER_KEY)?;
        self.store.remove(LAST_QUESTION_KEY)?;
        self.store.remove(LAST_RESULTS_KEY)
    }
}
