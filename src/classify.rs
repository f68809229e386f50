//! The per-item dedup decision.
//!
//! A seen record only remembers the first day a URL showed up, so "seen
//! ever" splits into two cases: seen today (show it again) and seen on an
//! earlier day (already delivered, suppress it for good).

use chrono::NaiveDate;

use crate::store::{SeenRecord, SeenStore, StoreError};

/// What to do with one fetched item.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Verdict {
    /// Never seen: insert, maybe summarize, render.
    FreshNew,
    /// First seen earlier today: render again from the cached record, do not
    /// insert or summarize.
    FreshRepeat(SeenRecord),
    /// First seen on another day: no output, no mutation.
    StaleSkip,
}

impl Verdict {
    /// Pure part of the decision, given the result of the store lookup.
    pub fn from_lookup(record: Option<SeenRecord>, today: NaiveDate) -> Self {
        match record {
            None => Verdict::FreshNew,
            Some(record) if record.last_seen_date == today => Verdict::FreshRepeat(record),
            Some(_) => Verdict::StaleSkip,
        }
    }
}

/// Classifies items against the seen store for a fixed run date.
pub struct Classifier<'a> {
    store: &'a SeenStore,
    today: NaiveDate,
}

impl<'a> Classifier<'a> {
    pub fn new(store: &'a SeenStore, today: NaiveDate) -> Self {
        Self { store, today }
    }

    pub fn classify(&self, link: &str) -> Result<Verdict, StoreError> {
        Ok(Verdict::from_lookup(self.store.lookup(link)?, self.today))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    #[test]
    fn unknown_url_is_fresh_new() {
        let store = SeenStore::open_in_memory().unwrap();
        let classifier = Classifier::new(&store, day(2));
        assert_eq!(classifier.classify("https://example.com/a").unwrap(), Verdict::FreshNew);
    }

    #[test]
    fn seen_today_is_fresh_repeat_with_cached_record() {
        let store = SeenStore::open_in_memory().unwrap();
        store.insert("https://example.com/a", day(2), "cached").unwrap();
        let classifier = Classifier::new(&store, day(2));

        match classifier.classify("https://example.com/a").unwrap() {
            Verdict::FreshRepeat(record) => {
                assert_eq!(record.summary.as_deref(), Some("cached"));
            }
            other => panic!("expected FreshRepeat, got {other:?}"),
        }
    }

    #[test]
    fn seen_on_another_day_is_stale_skip() {
        let store = SeenStore::open_in_memory().unwrap();
        store.insert("https://example.com/a", day(1), "").unwrap();
        let classifier = Classifier::new(&store, day(2));
        assert_eq!(classifier.classify("https://example.com/a").unwrap(), Verdict::StaleSkip);
    }

    #[test]
    fn future_date_is_also_stale() {
        // Only equality with the run date counts as "today".
        let record = SeenRecord {
            url: "https://example.com/a".into(),
            last_seen_date: day(9),
            summary: None,
        };
        assert_eq!(Verdict::from_lookup(Some(record), day(2)), Verdict::StaleSkip);
    }

    #[test]
    fn classifying_does_not_mutate_the_store() {
        let store = SeenStore::open_in_memory().unwrap();
        store.insert("https://example.com/a", day(2), "").unwrap();
        let classifier = Classifier::new(&store, day(2));

        classifier.classify("https://example.com/a").unwrap();
        classifier.classify("https://example.com/b").unwrap();
        assert_eq!(store.len().unwrap(), 1);
    }
}
