use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::data::{ManifestEntry, MonthKey, Record};

/// The Library holds every published record plus the indices derived from it.
/// It is built once per manifest load and never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct Library {
    /// Newest first
    records: Vec<Record>,
    /// number -> position in `records`
    by_number: HashMap<u32, usize>,
    /// Sorted distinct model identifiers
    models: Vec<String>,
    /// Days with at least one record (calendar highlighting)
    days: BTreeSet<NaiveDate>,
    /// year -> months with at least one record (timeline)
    months: BTreeMap<i32, BTreeSet<u32>>,
    /// number -> like count
    likes: HashMap<u32, u64>,
    /// number -> external discussion link
    comments: HashMap<u32, String>,
}

impl Library {
    /// Build the library from raw manifest entries and the auxiliary documents.
    ///
    /// Failed and malformed entries are dropped; the rest is ordered newest-first
    /// (timestamp descending, ties broken by number descending).
    pub fn from_manifest(
        entries: Vec<ManifestEntry>,
        likes: HashMap<u32, u64>,
        comments: HashMap<u32, String>,
    ) -> Self {
        let total = entries.len();
        let mut records: Vec<Record> = entries.into_iter().filter_map(Record::from_entry).collect();

        let skipped = total - records.len();
        if skipped > 0 {
            log::info!("⏭️  Skipped {} failed or incomplete manifest entries", skipped);
        }

        records.sort_by(|a, b| {
            b.timestamp
                .cmp(&a.timestamp)
                .then_with(|| b.number.cmp(&a.number))
        });

        let by_number = records
            .iter()
            .enumerate()
            .map(|(index, record)| (record.number, index))
            .collect();

        let models: BTreeSet<String> = records.iter().filter_map(|r| r.model.clone()).collect();

        let mut days = BTreeSet::new();
        let mut months: BTreeMap<i32, BTreeSet<u32>> = BTreeMap::new();
        for record in &records {
            days.insert(record.date);
            let key = record.month();
            months.entry(key.year).or_default().insert(key.month);
        }

        Self {
            records,
            by_number,
            models: models.into_iter().collect(),
            days,
            months,
            likes,
            comments,
        }
    }

    /// All records, newest first
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn record(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    /// Position of a record in newest-first order
    pub fn position(&self, number: u32) -> Option<usize> {
        self.by_number.get(&number).copied()
    }

    pub fn by_number(&self, number: u32) -> Option<&Record> {
        self.position(number).and_then(|index| self.records.get(index))
    }

    pub fn latest(&self) -> Option<&Record> {
        self.records.first()
    }

    pub fn image_count(&self) -> usize {
        self.records.len()
    }

    pub fn models(&self) -> &[String] {
        &self.models
    }

    pub fn has_record_on(&self, date: NaiveDate) -> bool {
        self.days.contains(&date)
    }

    /// Year -> months, both ascending; callers reverse for display
    pub fn month_tree(&self) -> &BTreeMap<i32, BTreeSet<u32>> {
        &self.months
    }

    pub fn has_month(&self, key: MonthKey) -> bool {
        self.months
            .get(&key.year)
            .map(|months| months.contains(&key.month))
            .unwrap_or(false)
    }

    pub fn likes(&self, number: u32) -> u64 {
        self.likes.get(&number).copied().unwrap_or(0)
    }

    pub fn comment_link(&self, number: u32) -> Option<&str> {
        self.comments.get(&number).map(String::as_str)
    }
}
