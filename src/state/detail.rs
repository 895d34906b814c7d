use std::collections::{HashMap, HashSet};

use super::data::{Detail, DetailEntry, MonthKey};

/// Session cache of per-month detail documents.
/// A month is fetched at most once; entries are never evicted.
#[derive(Debug, Clone, Default)]
pub struct DetailCache {
    months: HashMap<MonthKey, Vec<DetailEntry>>,
    in_flight: HashSet<MonthKey>,
}

impl DetailCache {
    /// Register interest in a month.
    /// Returns true only when the caller has to start the fetch.
    pub fn request(&mut self, month: MonthKey) -> bool {
        if self.is_loaded(month) || self.is_in_flight(month) {
            return false;
        }
        self.in_flight.insert(month);
        true
    }

    /// Store a fetched month (an empty list for a failed fetch)
    pub fn insert(&mut self, month: MonthKey, entries: Vec<DetailEntry>) {
        self.in_flight.remove(&month);
        self.months.insert(month, entries);
    }

    pub fn is_loaded(&self, month: MonthKey) -> bool {
        self.months.contains_key(&month)
    }

    pub fn is_in_flight(&self, month: MonthKey) -> bool {
        self.in_flight.contains(&month)
    }

    /// Detail for one record.
    ///
    /// None while the month is not loaded; `Some(None)` when the month is
    /// loaded but has no entry for this record.
    pub fn lookup(&self, month: MonthKey, number: u32) -> Option<Option<&Detail>> {
        let entries = self.months.get(&month)?;
        Some(
            entries
                .iter()
                .find(|e| e.number == Some(number))
                .map(|e| &e.detail),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail_entry(number: u32, story: &str) -> DetailEntry {
        DetailEntry {
            number: Some(number),
            detail: Detail {
                story: Some(story.to_string()),
                ..Detail::default()
            },
        }
    }

    #[test]
    fn test_month_requested_once() {
        let mut cache = DetailCache::default();
        let feb = MonthKey::new(2026, 2);
        assert!(cache.request(feb));
        assert!(cache.is_in_flight(feb));
        assert!(!cache.request(feb));

        cache.insert(feb, vec![detail_entry(3, "story")]);
        assert!(!cache.is_in_flight(feb));
        assert!(cache.is_loaded(feb));
        assert!(!cache.request(feb));
    }

    #[test]
    fn test_lookup() {
        let mut cache = DetailCache::default();
        let feb = MonthKey::new(2026, 2);
        assert_eq!(cache.lookup(feb, 3), None);

        cache.insert(feb, vec![detail_entry(3, "story")]);
        let found = cache.lookup(feb, 3).unwrap().unwrap();
        assert_eq!(found.story(), Some("story"));
        assert_eq!(cache.lookup(feb, 4), Some(None));
    }

    #[test]
    fn test_failed_fetch_is_cached_as_empty() {
        let mut cache = DetailCache::default();
        let jan = MonthKey::new(2026, 1);
        cache.request(jan);
        cache.insert(jan, Vec::new());
        assert_eq!(cache.lookup(jan, 1), Some(None));
        assert!(!cache.request(jan));
    }
}
