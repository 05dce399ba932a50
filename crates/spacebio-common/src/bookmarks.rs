//! Saved question/answer pairs, newest first, capped at `MAX_BOOKMARKS`.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::error::Result;
use crate::store::{KeyValueStore, KeyValueStoreExt};

pub const BOOKMARKS_KEY: &str = "spacebio.bookmarks";
pub const MAX_BOOKMARKS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkRecord {
    pub id: String,
    pub question: String,
    pub answer: String,
    /// Unix epoch milliseconds.
    pub timestamp: i64,
    pub source_count: usize,
}

impl BookmarkRecord {
    pub fn new(question: impl Into<String>, answer: impl Into<String>, source_count: usize) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            question: question.into(),
            answer: answer.into(),
            timestamp: Utc::now().timestamp_millis(),
            source_count,
        }
    }
}

pub struct BookmarkBook<S> {
    store: S,
}

impl<S: KeyValueStore> BookmarkBook<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn list(&self) -> Result<Vec<BookmarkRecord>> {
        Ok(self.store.get_json(BOOKMARKS_KEY)?.unwrap_or_default())
    }

    /// Record a new bookmark and return it.
    pub fn add(
        &self,
        question: impl Into<String>,
        answer: impl Into<String>,
        source_count: usize,
    ) -> Result<BookmarkRecord> {
        let record = BookmarkRecord::new(question, answer, source_count);
        self.insert(record.clone())?;
        Ok(record)
    }

    /// Prepend `record`, then truncate to the cap.
    pub fn insert(&self, record: BookmarkRecord) -> Result<()> {
        let mut all = self.list()?;
        all.insert(0, record);
        all.truncate(MAX_BOOKMARKS);
        debug!(count = all.len(), "Bookmarks updated");
        self.store.set_json(BOOKMARKS_KEY, &all)
    }

    /// Returns whether a bookmark with `id` existed.
    pub fn remove(&self, id: &str) -> Result<bool> {
        let mut all = self.list()?;
        let before = all.len();
        all.retain(|b| b.id != id);
        if all.len() == before {
            return Ok(false);
        }
        self.store.set_json(BOOKMARKS_KEY, &all)?;
        Ok(true)
    }

    pub fn clear(&self) -> Result<()> {
        self.store.remove(BOOKMARKS_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_newest_first() {
        let book = BookmarkBook::new(MemoryStore::new());
        book.add("q1", "a1", 2).unwrap();
        book.add("q2", "a2", 3).unwrap();
        let all = book.list().unwrap();
        assert_eq!(all[0].question, "q2");
        assert_eq!(all[1].question, "q1");
        assert_eq!(all[0].source_count, 3);
    }

    #[test]
    fn test_capped_at_ten() {
        let book = BookmarkBook::new(MemoryStore::new());
        for i in 0..15 {
            book.add(format!("q{i}"), "a", 1).unwrap();
        }
        let all = book.list().unwrap();
        assert_eq!(all.len(), MAX_BOOKMARKS);
        assert_eq!(all[0].question, "q14");
        assert_eq!(all[9].question, "q5");
    }

    #[test]
    fn test_remove_and_clear() {
        let store = MemoryStore::new();
        let book = BookmarkBook::new(&store);
        let keep = book.add("keep", "a", 1).unwrap();
        let drop = book.add("drop", "a", 1).unwrap();

        assert!(book.remove(&drop.id).unwrap());
        assert!(!book.remove(&drop.id).unwrap());
        assert_eq!(book.list().unwrap(), vec![keep]);

        book.clear().unwrap();
        assert!(book.list().unwrap().is_empty());
        assert_eq!(store.get(BOOKMARKS_KEY).unwrap(), None);
    }
}
