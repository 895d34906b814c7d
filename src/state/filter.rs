/// Filter & pagination engine
///
/// The filtered sequence is a list of positions into `Library::records()`.
/// The feed materializes it page by page and interleaves month markers.

use chrono::NaiveDate;

use super::data::{MonthKey, Record};

/// Records materialized per page
pub const PAGE_SIZE: usize = 20;

/// Active filters; `None` means "any"
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub model: Option<String>,
    pub date: Option<NaiveDate>,
}

impl FilterState {
    /// ISO `YYYY-MM-DD` prefix for the selected date
    pub fn date_prefix(&self) -> Option<String> {
        self.date.map(|d| d.format("%Y-%m-%d").to_string())
    }

    pub fn is_active(&self) -> bool {
        self.model.is_some() || self.date.is_some()
    }
}

/// Single linear pass over all records, keeping source order
pub fn filter_records(records: &[Record], filter: &FilterState) -> Vec<usize> {
    let date_prefix = filter.date_prefix();

    records
        .iter()
        .enumerate()
        .filter(|(_, record)| {
            let model_ok = match &filter.model {
                Some(model) => record.model.as_deref() == Some(model.as_str()),
                None => true,
            };
            let date_ok = match &date_prefix {
                Some(prefix) => record.timestamp.starts_with(prefix.as_str()),
                None => true,
            };
            model_ok && date_ok
        })
        .map(|(index, _)| index)
        .collect()
}

/// One rendered grid entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedItem {
    /// Separator before the first record of a month
    MonthMarker(MonthKey),
    /// Position into `Library::records()`
    Record(usize),
}

/// The incrementally rendered view of the filtered sequence
#[derive(Debug, Clone)]
pub struct Feed {
    filtered: Vec<usize>,
    /// Number of filtered records already materialized
    cursor: usize,
    /// A page was handed to the view and has not settled yet
    loading: bool,
    items: Vec<FeedItem>,
    /// Month of the last materialized record, carried across pages
    last_month: Option<MonthKey>,
    page_size: usize,
}

impl Default for Feed {
    fn default() -> Self {
        Self::new(PAGE_SIZE)
    }
}

impl Feed {
    pub fn new(page_size: usize) -> Self {
        Self {
            filtered: Vec::new(),
            cursor: 0,
            loading: false,
            items: Vec::new(),
            last_month: None,
            page_size: page_size.max(1),
        }
    }

    /// Replace the filtered sequence and clear everything rendered so far
    pub fn reset(&mut self, filtered: Vec<usize>) {
        self.filtered = filtered;
        self.cursor = 0;
        self.loading = false;
        self.items.clear();
        self.last_month = None;
    }

    pub fn filtered(&self) -> &[usize] {
        &self.filtered
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn items(&self) -> &[FeedItem] {
        &self.items
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.filtered.len()
    }

    /// Materialize the next page.
    ///
    /// Returns the newly materialized record positions, or None when a page is
    /// still in flight or nothing is left. The in-flight flag stays set until
    /// `settle` is called.
    pub fn load_more(&mut self, records: &[Record]) -> Option<Vec<usize>> {
        if self.loading || self.is_exhausted() {
            return None;
        }
        self.loading = true;

        let end = (self.cursor + self.page_size).min(self.filtered.len());
        let page: Vec<usize> = self.filtered[self.cursor..end].to_vec();

        for &index in &page {
            let Some(record) = records.get(index) else {
                continue;
            };
            let month = record.month();
            if self.last_month != Some(month) {
                self.items.push(FeedItem::MonthMarker(month));
                self.last_month = Some(month);
            }
            self.items.push(FeedItem::Record(index));
        }

        self.cursor = end;
        Some(page)
    }

    /// The view has taken the in-flight page; the next `load_more` may run
    pub fn settle(&mut self) {
        self.loading = false;
    }

    /// Position in the filtered sequence of the first record of `month`
    pub fn first_in_month(&self, records: &[Record], month: MonthKey) -> Option<usize> {
        let prefix = month.prefix();
        self.filtered.iter().position(|&index| {
            records
                .get(index)
                .map(|r| r.timestamp.starts_with(prefix.as_str()))
                .unwrap_or(false)
        })
    }

    /// Materialize pages until filtered position `target` is rendered.
    ///
    /// Returns every record position materialized on the way, or None when a
    /// page is in flight and the caller has to retry after it settles.
    pub fn materialize_through(&mut self, records: &[Record], target: usize) -> Option<Vec<usize>> {
        if self.loading {
            return None;
        }
        let mut loaded = Vec::new();
        while target >= self.cursor {
            match self.load_more(records) {
                Some(page) => {
                    loaded.extend(page);
                    self.settle();
                }
                None => break,
            }
        }
        Some(loaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::library::tests::{entry, scenario_library};
    use crate::state::library::Library;
    use std::collections::HashMap;

    fn numbers(library: &Library, positions: &[usize]) -> Vec<u32> {
        positions.iter().map(|&i| library.records()[i].number).collect()
    }

    /// `count` records, one per day backwards from 2026-03-10
    fn library_of(count: u32) -> Library {
        let start = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let entries = (1..=count)
            .map(|n| {
                let day = start - chrono::Duration::days((count - n) as i64);
                let model = if n % 2 == 0 { "even" } else { "odd" };
                entry(n, &format!("{} 12:00:00", day.format("%Y-%m-%d")), Some(model), false)
            })
            .collect();
        Library::from_manifest(entries, HashMap::new(), HashMap::new())
    }

    #[test]
    fn test_scenario_filters() {
        let library = scenario_library();
        let records = library.records();

        let all = filter_records(records, &FilterState::default());
        assert_eq!(numbers(&library, &all), vec![3, 1]);

        let model_a = FilterState { model: Some("A".to_string()), date: None };
        assert_eq!(numbers(&library, &filter_records(records, &model_a)), vec![1]);

        let feb_first = FilterState {
            model: None,
            date: NaiveDate::from_ymd_opt(2026, 2, 1),
        };
        assert_eq!(numbers(&library, &filter_records(records, &feb_first)), vec![3]);
    }

    #[test]
    fn test_filtered_is_ordered_subsequence() {
        let library = library_of(50);
        let filter = FilterState { model: Some("even".to_string()), date: None };
        let filtered = filter_records(library.records(), &filter);
        assert_eq!(filtered.len(), 25);
        assert!(filtered.windows(2).all(|w| w[0] < w[1]));
        assert!(filtered
            .iter()
            .all(|&i| library.records()[i].model.as_deref() == Some("even")));
    }

    #[test]
    fn test_load_more_pages_and_guard() {
        let library = library_of(45);
        let mut feed = Feed::default();
        feed.reset(filter_records(library.records(), &FilterState::default()));

        let first = feed.load_more(library.records()).unwrap();
        assert_eq!(first.len(), PAGE_SIZE);
        // still in flight
        assert!(feed.load_more(library.records()).is_none());
        assert_eq!(feed.cursor(), 20);

        feed.settle();
        assert_eq!(feed.load_more(library.records()).unwrap().len(), 20);
        feed.settle();
        assert_eq!(feed.load_more(library.records()).unwrap().len(), 5);
        feed.settle();

        assert!(feed.is_exhausted());
        assert!(feed.load_more(library.records()).is_none());
        assert!(feed.load_more(library.records()).is_none());
        assert_eq!(feed.cursor(), 45);
    }

    #[test]
    fn test_month_markers_once_per_month_across_pages() {
        // 45 daily records from 2026-01-25 to 2026-03-10: pages split mid-month
        let library = library_of(45);
        let mut feed = Feed::default();
        feed.reset(filter_records(library.records(), &FilterState::default()));
        while feed.load_more(library.records()).is_some() {
            feed.settle();
        }

        let markers: Vec<MonthKey> = feed
            .items()
            .iter()
            .filter_map(|item| match item {
                FeedItem::MonthMarker(m) => Some(*m),
                FeedItem::Record(_) => None,
            })
            .collect();
        assert_eq!(
            markers,
            vec![MonthKey::new(2026, 3), MonthKey::new(2026, 2), MonthKey::new(2026, 1)]
        );

        // each marker sits right before the first record of its month
        for (pos, item) in feed.items().iter().enumerate() {
            if let FeedItem::MonthMarker(month) = item {
                match feed.items()[pos + 1] {
                    FeedItem::Record(i) => assert_eq!(library.records()[i].month(), *month),
                    FeedItem::MonthMarker(_) => panic!("empty month section"),
                }
            }
        }
    }

    #[test]
    fn test_reset_clears_rendered_state() {
        let library = library_of(30);
        let mut feed = Feed::default();
        feed.reset(filter_records(library.records(), &FilterState::default()));
        feed.load_more(library.records());

        feed.reset(Vec::new());
        assert_eq!(feed.cursor(), 0);
        assert!(feed.items().is_empty());
        assert!(!feed.is_loading());
        assert!(feed.load_more(library.records()).is_none());
    }

    #[test]
    fn test_materialize_through_target() {
        let library = library_of(60);
        let mut feed = Feed::default();
        feed.reset(filter_records(library.records(), &FilterState::default()));

        let january = feed.first_in_month(library.records(), MonthKey::new(2026, 1)).unwrap();
        let loaded = feed.materialize_through(library.records(), january).unwrap();
        assert!(feed.cursor() > january);
        assert_eq!(loaded.len(), feed.cursor());
        assert!(!feed.is_loading());

        assert!(feed.first_in_month(library.records(), MonthKey::new(2025, 6)).is_none());
    }

    #[test]
    fn test_materialize_waits_for_in_flight_page() {
        let library = library_of(60);
        let mut feed = Feed::default();
        feed.reset(filter_records(library.records(), &FilterState::default()));
        feed.load_more(library.records());
        assert!(feed.materialize_through(library.records(), 50).is_none());
    }
}
