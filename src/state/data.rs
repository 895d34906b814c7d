/// Shared data structures for the application state
///
/// These structs represent the data model that flows between
/// the feed documents and the UI layer. Raw manifest entries are
/// validated into `Record`s once, at load time.

use chrono::NaiveDate;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Generation status of a manifest entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Absent status means success (older manifests never wrote it)
    #[default]
    #[serde(alias = "ok")]
    Success,
    Failed,
    #[serde(other)]
    Unknown,
}

/// A calendar month, used as the detail-document key and the timeline bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthKey {
    pub year: i32,
    /// 1-based month
    pub month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn of(date: NaiveDate) -> Self {
        use chrono::Datelike;
        Self::new(date.year(), date.month())
    }

    /// `YYYY-MM`, the prefix every timestamp in this month starts with
    pub fn prefix(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s
            .split_once('-')
            .ok_or_else(|| format!("Invalid month key: {}", s))?;
        let year: i32 = year.parse().map_err(|_| format!("Invalid year in: {}", s))?;
        let month: u32 = month.parse().map_err(|_| format!("Invalid month in: {}", s))?;
        if !(1..=12).contains(&month) {
            return Err(format!("Month out of range in: {}", s));
        }
        Ok(Self::new(year, month))
    }
}

/// Extended per-record fields
///
/// In the earlier manifest shape these sit inline in `catlist.json`;
/// in the current shape they live in `cats/YYYY-MM.json`.
/// Every field is an explicit `Option` so that "absent" and
/// "present but empty" stay distinguishable.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Detail {
    pub prompt: Option<String>,
    pub story: Option<String>,
    pub idea: Option<String>,
    pub news_inspiration: Option<Vec<String>>,
    pub avoid_list: Option<Vec<String>>,
}

impl Detail {
    /// True when none of the extended fields is present at all
    pub fn is_absent(&self) -> bool {
        self.prompt.is_none()
            && self.story.is_none()
            && self.idea.is_none()
            && self.news_inspiration.is_none()
            && self.avoid_list.is_none()
    }

    /// Prompt text, if present and not blank
    pub fn prompt(&self) -> Option<&str> {
        non_blank(self.prompt.as_deref())
    }

    pub fn story(&self) -> Option<&str> {
        non_blank(self.story.as_deref())
    }

    pub fn idea(&self) -> Option<&str> {
        non_blank(self.idea.as_deref())
    }

    /// News tags, if the list is present and has at least one entry
    pub fn news_tags(&self) -> Option<&[String]> {
        non_empty(self.news_inspiration.as_deref())
    }

    pub fn avoid_tags(&self) -> Option<&[String]> {
        non_empty(self.avoid_list.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}

fn non_empty(value: Option<&[String]>) -> Option<&[String]> {
    value.filter(|tags| !tags.is_empty())
}

/// Where the idea for a picture came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inspiration {
    /// Pure imagination
    Original,
    /// The news summary that inspired the picture
    News(String),
}

impl Inspiration {
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            None
        } else if raw.eq_ignore_ascii_case("original") {
            Some(Self::Original)
        } else {
            Some(Self::News(raw.to_string()))
        }
    }
}

/// One entry of `catlist.json`, exactly as published
#[derive(Debug, Clone, Deserialize)]
pub struct ManifestEntry {
    #[serde(default)]
    pub number: Option<u32>,
    pub timestamp: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub inspiration: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    /// Inline extended fields (earlier manifest shape)
    #[serde(flatten)]
    pub detail: Detail,
}

/// One entry of a `cats/YYYY-MM.json` detail document
#[derive(Debug, Clone, Deserialize)]
pub struct DetailEntry {
    #[serde(default)]
    pub number: Option<u32>,
    #[serde(flatten)]
    pub detail: Detail,
}

/// A published, successfully generated picture
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Unique ordinal ("Cat #42")
    pub number: u32,
    /// Capture time, lexicographically sortable
    pub timestamp: String,
    /// Parsed from the first ten characters of `timestamp`
    pub date: NaiveDate,
    pub url: String,
    pub model: Option<String>,
    pub title: Option<String>,
    pub inspiration: Option<Inspiration>,
    /// Present only for manifests that still embed the extended fields
    pub inline_detail: Option<Detail>,
}

impl Record {
    /// Validate a manifest entry.
    ///
    /// Returns None for failed runs and for entries missing a number,
    /// an image URL or a parseable date.
    pub fn from_entry(entry: ManifestEntry) -> Option<Self> {
        if entry.status == Status::Failed {
            return None;
        }

        let number = entry.number?;
        let url = entry.url.filter(|u| !u.trim().is_empty())?;
        let date = entry
            .timestamp
            .get(..10)
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())?;

        let inline_detail = if entry.detail.is_absent() {
            None
        } else {
            Some(entry.detail)
        };

        Some(Self {
            number,
            timestamp: entry.timestamp,
            date,
            url,
            model: entry.model.filter(|m| !m.trim().is_empty()),
            title: entry.title.filter(|t| !t.trim().is_empty()),
            inspiration: entry.inspiration.as_deref().and_then(Inspiration::parse),
            inline_detail,
        })
    }

    pub fn month(&self) -> MonthKey {
        MonthKey::of(self.date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(json: &str) -> ManifestEntry {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_month_key_round_trip_and_order() {
        let key: MonthKey = "2026-02".parse().unwrap();
        assert_eq!(key, MonthKey::new(2026, 2));
        assert_eq!(key.to_string(), "2026-02");
        assert!(MonthKey::new(2025, 12) < MonthKey::new(2026, 1));
        assert!("2026-13".parse::<MonthKey>().is_err());
        assert!("garbage".parse::<MonthKey>().is_err());
    }

    #[test]
    fn test_status_defaults_to_success() {
        let e = entry(r#"{"number": 1, "timestamp": "2026-01-05 10:00:00", "url": "u"}"#);
        assert_eq!(e.status, Status::Success);

        let e = entry(r#"{"number": 1, "timestamp": "2026-01-05 10:00:00", "url": "u", "status": "ok"}"#);
        assert_eq!(e.status, Status::Success);

        let e = entry(r#"{"number": 1, "timestamp": "t", "url": "u", "status": "pending"}"#);
        assert_eq!(e.status, Status::Unknown);
    }

    #[test]
    fn test_failed_entry_is_rejected() {
        let e = entry(
            r#"{"number": null, "timestamp": "2026-01-06 03:00 UTC", "url": null,
                "model": "all failed", "status": "failed", "error": "quota"}"#,
        );
        assert_eq!(e.error.as_deref(), Some("quota"));
        assert!(Record::from_entry(e).is_none());
    }

    #[test]
    fn test_entry_without_date_is_rejected() {
        let e = entry(r#"{"number": 3, "timestamp": "yesterday", "url": "u"}"#);
        assert!(Record::from_entry(e).is_none());
    }

    #[test]
    fn test_current_shape_has_no_inline_detail() {
        let e = entry(
            r#"{"number": 7, "timestamp": "2026-02-01 08:00 UTC", "url": "https://x/7.webp",
                "model": "gemini", "title": "晨光", "inspiration": "original"}"#,
        );
        let record = Record::from_entry(e).unwrap();
        assert_eq!(record.number, 7);
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2026, 2, 1).unwrap());
        assert_eq!(record.month(), MonthKey::new(2026, 2));
        assert_eq!(record.inspiration, Some(Inspiration::Original));
        assert!(record.inline_detail.is_none());
    }

    #[test]
    fn test_earlier_shape_keeps_inline_detail() {
        let e = entry(
            r#"{"number": 2, "timestamp": "2026-01-30 05:00:00", "url": "u",
                "prompt": "a cat", "avoid_list": [], "style_picks": {"a": 1}}"#,
        );
        let record = Record::from_entry(e).unwrap();
        let detail = record.inline_detail.unwrap();
        assert_eq!(detail.prompt(), Some("a cat"));
        // present but empty is not the same as absent
        assert_eq!(detail.avoid_list, Some(vec![]));
        assert!(detail.avoid_tags().is_none());
        assert!(detail.story.is_none());
    }

    #[test]
    fn test_inspiration_classification() {
        assert_eq!(Inspiration::parse("Original"), Some(Inspiration::Original));
        assert_eq!(
            Inspiration::parse("颱風登陸"),
            Some(Inspiration::News("颱風登陸".to_string()))
        );
        assert_eq!(Inspiration::parse("  "), None);
    }

    #[test]
    fn test_blank_strings_are_not_content() {
        let detail = Detail {
            story: Some("   ".to_string()),
            idea: Some("idea".to_string()),
            ..Detail::default()
        };
        assert!(!detail.is_absent());
        assert!(detail.story().is_none());
        assert_eq!(detail.idea(), Some("idea"));
    }
}
