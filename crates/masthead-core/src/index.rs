//! Inverted token index over the registered-title set.
//!
//! Built once at startup from every record's `normalized_title`; queried
//! per request with IDF-weighted candidate ranking so rare tokens dominate.
//! The index is immutable after construction — title acceptance publishes a
//! whole new state through [`SharedIndex`], so readers always see postings,
//! document frequencies, and the titles map move together.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::TitleRecord;

/// One immutable snapshot of the index plus the records behind it.
#[derive(Debug, Clone, Default)]
pub struct IndexState {
    records: Vec<TitleRecord>,
    /// id → position in `records`. Every id in any posting list is a key.
    titles_map: HashMap<u64, usize>,
    postings: HashMap<String, Vec<u64>>,
    doc_freq: HashMap<String, usize>,
    total_docs: usize,
}

impl IndexState {
    pub fn build(records: Vec<TitleRecord>) -> Self {
        let mut state = Self::default();
        for record in records {
            state.insert(record);
        }
        state
    }

    /// Append one record, maintaining `doc_freq[t] == postings[t].len()`.
    pub fn insert(&mut self, record: TitleRecord) {
        let id = record.id;
        let tokens: HashSet<&str> = record.normalized_title.split_whitespace().collect();
        for token in tokens {
            self.postings.entry(token.to_string()).or_default().push(id);
            *self.doc_freq.entry(token.to_string()).or_insert(0) += 1;
        }
        self.titles_map.insert(id, self.records.len());
        self.records.push(record);
        self.total_docs += 1;
    }

    pub fn total_docs(&self) -> usize {
        self.total_docs
    }

    pub fn records(&self) -> &[TitleRecord] {
        &self.records
    }

    pub fn get(&self, id: u64) -> Option<&TitleRecord> {
        self.titles_map.get(&id).map(|&pos| &self.records[pos])
    }

    pub fn max_id(&self) -> u64 {
        self.records.iter().map(|r| r.id).max().unwrap_or(0)
    }

    /// Rank records sharing tokens with the query set.
    ///
    /// Each distinct query token present in the index contributes
    /// `ln(1 + N / max(1, df))` to every posting; duplicate query tokens do
    /// not inflate scores. Ties order by the id rendered as a string, which
    /// keeps ranking reproducible across runs.
    pub fn filter_by_tokens<'a, I>(&self, query_tokens: I) -> Vec<&TitleRecord>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let unique: HashSet<&str> = query_tokens.into_iter().collect();
        let mut scores: HashMap<u64, f64> = HashMap::new();
        for token in unique {
            let Some(ids) = self.postings.get(token) else {
                continue;
            };
            let df = self.doc_freq.get(token).copied().unwrap_or(0);
            let idf = (self.total_docs as f64 / df.max(1) as f64).ln_1p();
            for id in ids {
                *scores.entry(*id).or_insert(0.0) += idf;
            }
        }

        let mut ranked: Vec<(u64, f64)> = scores.into_iter().collect();
        ranked.sort_by(|a, b| {
            b.1.total_cmp(&a.1)
                .then_with(|| a.0.to_string().cmp(&b.0.to_string()))
        });
        ranked.into_iter().filter_map(|(id, _)| self.get(id)).collect()
    }
}

/// Process-lifetime handle: lock-free reads, serialized copy-on-write
/// appends.
pub struct SharedIndex {
    state: ArcSwap<IndexState>,
    write_lock: Mutex<()>,
}

impl SharedIndex {
    pub fn new(state: IndexState) -> Self {
        Self {
            state: ArcSwap::from_pointee(state),
            write_lock: Mutex::new(()),
        }
    }

    /// A consistent snapshot for the duration of one verification.
    pub fn snapshot(&self) -> Arc<IndexState> {
        self.state.load_full()
    }

    /// Append an accepted title. Readers never observe a partially updated
    /// posting list: the new state is built aside and swapped in whole.
    pub fn append(&self, record: TitleRecord) {
        self.append_with(move |_| record);
    }

    /// Append a record derived from the current state (e.g. to allocate the
    /// next id) under the writer lock, so concurrent acceptances cannot
    /// race on id assignment.
    pub fn append_with<F>(&self, build: F) -> TitleRecord
    where
        F: FnOnce(&IndexState) -> TitleRecord,
    {
        // A poisoned guard only means a writer panicked mid-clone; the
        // published state is still whole, so recover and continue.
        let _guard = match self.write_lock.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let current = self.state.load_full();
        let record = build(&current);
        let mut next = (*current).clone();
        next.insert(record.clone());
        self.state.store(Arc::new(next));
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> IndexState {
        IndexState::build(vec![
            TitleRecord::new(1, "Hindustan Times"),
            TitleRecord::new(2, "Dainik Jagran"),
            TitleRecord::new(3, "Sunrise Chronicle"),
            TitleRecord::new(4, "Sunrise Times"),
        ])
    }

    #[test]
    fn build_populates_all_maps() {
        let idx = sample();
        assert_eq!(idx.total_docs(), 4);
        assert_eq!(idx.records().len(), 4);
        for (token, ids) in &idx.postings {
            assert_eq!(idx.doc_freq[token], ids.len(), "token {token}");
            for id in ids {
                assert!(idx.get(*id).is_some());
            }
        }
    }

    #[test]
    fn rare_tokens_rank_higher() {
        let idx = sample();
        // "chronicle" is rarer than "sunrise"; record 3 must outrank 4 for
        // a query containing both
        let hits = idx.filter_by_tokens(["sunrise", "chronicle"]);
        assert_eq!(hits[0].id, 3);
        assert_eq!(hits[1].id, 4);
    }

    #[test]
    fn duplicate_query_tokens_do_not_inflate() {
        let idx = sample();
        let once = idx.filter_by_tokens(["sunrise"]);
        let twice = idx.filter_by_tokens(["sunrise", "sunrise"]);
        let ids = |v: &[&TitleRecord]| v.iter().map(|r| r.id).collect::<Vec<_>>();
        assert_eq!(ids(&once), ids(&twice));
    }

    #[test]
    fn ties_break_on_id_string() {
        let idx = sample();
        // Records 1 and 4 both match only "times" with equal scores;
        // "1" < "4" lexicographically
        let hits = idx.filter_by_tokens(["times"]);
        assert_eq!(hits.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 4]);
    }

    #[test]
    fn unknown_tokens_return_nothing() {
        let idx = sample();
        assert!(idx.filter_by_tokens(["pratidhwani"]).is_empty());
    }

    #[test]
    fn append_is_visible_and_consistent() {
        let shared = SharedIndex::new(sample());
        let before = shared.snapshot();
        shared.append(TitleRecord::new(5, "Sunrise Pratidhwani"));
        let after = shared.snapshot();

        // Old snapshot untouched
        assert_eq!(before.total_docs(), 4);
        assert_eq!(after.total_docs(), 5);
        assert_eq!(after.doc_freq["sunrise"], 3);
        assert_eq!(after.postings["sunrise"].len(), 3);
        assert_eq!(after.filter_by_tokens(["pratidhwani"])[0].id, 5);
    }

    #[test]
    fn max_id_tracks_appends() {
        let idx = sample();
        assert_eq!(idx.max_id(), 4);
        assert_eq!(IndexState::default().max_id(), 0);
    }
}
