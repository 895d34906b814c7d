/// Application state and the single transition function
///
/// Every user action, viewport signal and network completion arrives as an
/// `Intent`. `AppState::update` applies it and returns the `Effect`s the shell
/// has to carry out (fetches, clipboard, timers, scrolling). Nothing in here
/// touches the network or the window, so all of it is unit-testable.

use chrono::NaiveDate;
use std::time::Duration;

use super::calendar::{Calendar, MonthGrid};
use super::data::{Detail, DetailEntry, MonthKey, Record};
use super::detail::DetailCache;
use super::filter::{filter_records, Feed, FilterState, PAGE_SIZE};
use super::library::Library;
use super::overlay::{DetailTab, Overlay, OverlayPhase};
use super::query::TimeQuery;
use super::timeline::Timeline;

/// Tunables that come from the config file
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    pub page_size: usize,
    /// How long "Copied!" stays visible
    pub copy_confirm: Duration,
    /// Windows narrower than this collapse the timeline after a jump
    pub narrow_width: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            page_size: PAGE_SIZE,
            copy_confirm: Duration::from_millis(2000),
            narrow_width: 768.0,
        }
    }
}

/// Manifest load state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadPhase {
    Loading,
    Ready,
    /// The manifest could not be fetched or parsed; shown instead of the gallery
    Failed(String),
}

/// Discrete user actions and async completions
#[derive(Debug, Clone)]
pub enum Intent {
    ManifestLoaded(Library),
    ManifestFailed(String),
    SelectModel(Option<String>),
    SelectDate(NaiveDate),
    ClearDate,
    /// Bottom sentinel became visible
    LoadMore,
    /// The shell has taken the last page
    PageSettled,
    OpenRecord(u32),
    CloseOverlay,
    SelectTab(DetailTab),
    CopyPrompt,
    CopyResetElapsed(u64),
    Download,
    OpenDiscussion,
    /// A month's detail document arrived (empty on failure)
    DetailLoaded(MonthKey, Vec<DetailEntry>),
    ToggleCalendar,
    CloseCalendar,
    CalendarPrev,
    CalendarNext,
    ToggleTimeline,
    ToggleYear(i32),
    JumpToMonth(MonthKey),
    ViewportResized(f32),
    Search(String),
}

/// Side effects requested by a transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    FetchDetail(MonthKey),
    /// (number, image url) for freshly materialized records
    FetchThumbnails(Vec<(u32, String)>),
    FetchImage(u32, String),
    CopyToClipboard(String),
    ScheduleCopyReset { token: u64, after: Duration },
    OpenExternal(String),
    ScrollToMonth(MonthKey),
    /// Acknowledge the page just materialized
    SettlePage,
}

#[derive(Debug, Clone)]
pub struct AppState {
    phase: LoadPhase,
    library: Library,
    filter: FilterState,
    feed: Feed,
    calendar: Calendar,
    timeline: Timeline,
    overlay: Overlay,
    details: DetailCache,
    settings: Settings,
    /// Local date, for the calendar's "today" marker
    today: NaiveDate,
    /// UTC date, for `today`/`yesterday` queries
    utc_today: NaiveDate,
    narrow: bool,
    /// Timeline jump waiting for an in-flight page
    pending_jump: Option<MonthKey>,
    /// Query given before the manifest finished loading
    pending_query: Option<String>,
    status: Option<String>,
}

impl AppState {
    pub fn new(settings: Settings, today: NaiveDate, utc_today: NaiveDate) -> Self {
        Self {
            phase: LoadPhase::Loading,
            library: Library::default(),
            filter: FilterState::default(),
            feed: Feed::new(settings.page_size),
            calendar: Calendar::new(today),
            timeline: Timeline::default(),
            overlay: Overlay::default(),
            details: DetailCache::default(),
            settings,
            today,
            utc_today,
            narrow: false,
            pending_jump: None,
            pending_query: None,
            status: None,
        }
    }

    /// Move "today" forward; the shell calls this before every dispatch
    pub fn set_clock(&mut self, today: NaiveDate, utc_today: NaiveDate) {
        self.today = today;
        self.utc_today = utc_today;
    }

    /// Apply one intent
    pub fn update(&mut self, intent: Intent) -> Vec<Effect> {
        match intent {
            Intent::ManifestLoaded(library) => {
                log::info!("🐱 Manifest loaded with {} cats", library.image_count());
                self.timeline = Timeline::from_library(&library);
                self.library = library;
                self.phase = LoadPhase::Ready;
                self.status = None;

                let mut effects = self.refilter();
                if let Some(query) = self.pending_query.take() {
                    effects.extend(self.search(&query));
                }
                effects
            }
            Intent::ManifestFailed(error) => {
                log::error!("❌ Failed to load manifest: {}", error);
                self.phase = LoadPhase::Failed(error);
                Vec::new()
            }
            Intent::SelectModel(model) => {
                self.filter.model = model.filter(|m| !m.is_empty());
                self.refilter()
            }
            Intent::SelectDate(date) => {
                self.filter.date = Some(date);
                self.calendar.close();
                self.refilter()
            }
            Intent::ClearDate => {
                self.filter.date = None;
                self.calendar.close();
                self.refilter()
            }
            Intent::LoadMore => self.load_page(),
            Intent::PageSettled => {
                self.feed.settle();
                match self.pending_jump.take() {
                    Some(month) => self.jump_to(month),
                    None => Vec::new(),
                }
            }
            Intent::OpenRecord(number) => self.open_record(number),
            Intent::CloseOverlay => {
                self.overlay.close();
                Vec::new()
            }
            Intent::SelectTab(tab) => {
                self.overlay.select_tab(tab);
                Vec::new()
            }
            Intent::CopyPrompt => {
                let Some(prompt) = self.overlay.detail().and_then(Detail::prompt).map(str::to_string) else {
                    return Vec::new();
                };
                let token = self.overlay.mark_copied();
                vec![
                    Effect::CopyToClipboard(prompt),
                    Effect::ScheduleCopyReset {
                        token,
                        after: self.settings.copy_confirm,
                    },
                ]
            }
            Intent::CopyResetElapsed(token) => {
                self.overlay.reset_copied(token);
                Vec::new()
            }
            Intent::Download => self
                .overlay_record()
                .map(|record| vec![Effect::OpenExternal(record.url.clone())])
                .unwrap_or_default(),
            Intent::OpenDiscussion => self
                .overlay
                .number()
                .and_then(|number| self.library.comment_link(number))
                .map(|link| vec![Effect::OpenExternal(link.to_string())])
                .unwrap_or_default(),
            Intent::DetailLoaded(month, entries) => {
                log::debug!("📦 Detail for {}: {} entries", month, entries.len());
                self.details.insert(month, entries);
                self.populate_from_cache();
                Vec::new()
            }
            Intent::ToggleCalendar => {
                self.calendar.toggle();
                Vec::new()
            }
            Intent::CloseCalendar => {
                self.calendar.close();
                Vec::new()
            }
            Intent::CalendarPrev => {
                self.calendar.prev_month();
                Vec::new()
            }
            Intent::CalendarNext => {
                self.calendar.next_month();
                Vec::new()
            }
            Intent::ToggleTimeline => {
                self.timeline.toggle_panel();
                Vec::new()
            }
            Intent::ToggleYear(year) => {
                self.timeline.toggle_year(year);
                Vec::new()
            }
            Intent::JumpToMonth(month) => self.jump_to(month),
            Intent::ViewportResized(width) => {
                self.narrow = width < self.settings.narrow_width;
                Vec::new()
            }
            Intent::Search(query) => {
                if self.phase == LoadPhase::Ready {
                    self.search(&query)
                } else {
                    self.pending_query = Some(query);
                    Vec::new()
                }
            }
        }
    }

    /// Recompute the filtered sequence, clear the view and load the first page
    fn refilter(&mut self) -> Vec<Effect> {
        let filtered = filter_records(self.library.records(), &self.filter);
        self.feed.reset(filtered);
        self.pending_jump = None;
        self.load_page()
    }

    fn load_page(&mut self) -> Vec<Effect> {
        if self.phase != LoadPhase::Ready {
            return Vec::new();
        }
        match self.feed.load_more(self.library.records()) {
            Some(page) => vec![self.thumbnails_for(&page), Effect::SettlePage],
            None => Vec::new(),
        }
    }

    fn thumbnails_for(&self, positions: &[usize]) -> Effect {
        Effect::FetchThumbnails(
            positions
                .iter()
                .filter_map(|&i| self.library.record(i))
                .map(|r| (r.number, r.url.clone()))
                .collect(),
        )
    }

    fn jump_to(&mut self, month: MonthKey) -> Vec<Effect> {
        if !self.library.has_month(month) {
            return Vec::new();
        }
        let records = self.library.records();
        let Some(target) = self.feed.first_in_month(records, month) else {
            return Vec::new();
        };

        if self.feed.materialize_through(records, target).is_none() {
            // retried from PageSettled
            self.pending_jump = Some(month);
            return Vec::new();
        }

        if self.narrow {
            self.timeline.collapse_panel();
        }

        // only the rows that land in view; the shell fetches the rest as they scroll in
        let end = (target + self.settings.page_size).min(self.feed.cursor());
        let visible = self.feed.filtered()[target..end].to_vec();

        vec![self.thumbnails_for(&visible), Effect::ScrollToMonth(month)]
    }

    fn open_record(&mut self, number: u32) -> Vec<Effect> {
        let Some(record) = self.library.by_number(number) else {
            self.status = Some(format!("Cat #{} not found", number));
            return Vec::new();
        };
        let month = record.month();
        let inline = record.inline_detail.clone();
        let mut effects = vec![Effect::FetchImage(record.number, record.url.clone())];

        self.overlay.open(number, month);
        self.overlay.begin_loading();

        // earlier manifest shape: everything is already here
        if let Some(detail) = inline {
            self.overlay.populate(detail);
            return effects;
        }

        if self.details.request(month) {
            effects.push(Effect::FetchDetail(month));
        } else {
            self.populate_from_cache();
        }
        effects
    }

    fn populate_from_cache(&mut self) {
        let (Some(number), Some(month)) = (self.overlay.number(), self.overlay.month()) else {
            return;
        };
        if self.overlay.phase() != OverlayPhase::DetailLoading {
            return;
        }
        if let Some(found) = self.details.lookup(month, number) {
            let detail = found.cloned().unwrap_or_default();
            self.overlay.populate(detail);
        }
    }

    fn search(&mut self, query: &str) -> Vec<Effect> {
        self.status = None;
        let Some(parsed) = TimeQuery::parse(query, self.utc_today) else {
            self.status = Some(format!("No cats found for '{}'.", query.trim()));
            return Vec::new();
        };

        match parsed {
            TimeQuery::Number(number) => self.open_record(number),
            TimeQuery::Latest => match self.library.latest().map(|r| r.number) {
                Some(number) => self.open_record(number),
                None => {
                    self.status = Some("No cats yet! Check back in an hour.".to_string());
                    Vec::new()
                }
            },
            TimeQuery::Date(date) => {
                let effects = self.update(Intent::SelectDate(date));
                if self.feed.filtered().is_empty() {
                    self.status = Some(format!("No cats found for '{}'.", query.trim()));
                }
                effects
            }
            TimeQuery::DateHour(date, hour) => {
                let mut effects = self.update(Intent::SelectDate(date));
                let prefix = TimeQuery::hour_prefix(date, hour);
                let hit = self
                    .feed
                    .filtered()
                    .iter()
                    .filter_map(|&i| self.library.record(i))
                    .find(|r| r.timestamp.starts_with(prefix.as_str()))
                    .map(|r| r.number);
                match hit {
                    Some(number) => effects.extend(self.open_record(number)),
                    None => self.status = Some(format!("No cats found for '{}'.", query.trim())),
                }
                effects
            }
        }
    }

    pub fn phase(&self) -> &LoadPhase {
        &self.phase
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn feed(&self) -> &Feed {
        &self.feed
    }

    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    pub fn calendar_grid(&self) -> MonthGrid {
        self.calendar.grid(self.today, self.filter.date, &self.library)
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    pub fn overlay_record(&self) -> Option<&Record> {
        self.overlay.number().and_then(|n| self.library.by_number(n))
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn is_narrow(&self) -> bool {
        self.narrow
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::filter::FeedItem;
    use crate::state::library::tests::{entry, scenario_library};
    use std::collections::HashMap;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ready(library: Library) -> AppState {
        let mut state = AppState::new(Settings::default(), date(2026, 2, 1), date(2026, 2, 1));
        state.update(Intent::ManifestLoaded(library));
        state
    }

    fn rendered(state: &AppState) -> Vec<u32> {
        state
            .feed()
            .items()
            .iter()
            .filter_map(|item| match item {
                FeedItem::Record(i) => Some(state.library().records()[*i].number),
                FeedItem::MonthMarker(_) => None,
            })
            .collect()
    }

    /// Hourly records for two months with a month-level detail document each
    fn two_month_library() -> Library {
        let mut entries = Vec::new();
        let mut number = 0;
        for (month, days) in [(1u32, 31u32), (2, 28)] {
            for day in 1..=days {
                number += 1;
                entries.push(entry(number, &format!("2026-{:02}-{:02} 08:00:00", month, day), None, false));
            }
        }
        Library::from_manifest(entries, HashMap::new(), HashMap::new())
    }

    #[test]
    fn test_scenario_model_and_date_filters() {
        let mut state = ready(scenario_library());
        assert_eq!(rendered(&state), vec![3, 1]);

        state.update(Intent::SelectModel(Some("A".to_string())));
        assert_eq!(rendered(&state), vec![1]);

        state.update(Intent::SelectModel(None));
        state.update(Intent::SelectDate(date(2026, 2, 1)));
        assert_eq!(rendered(&state), vec![3]);
        assert_eq!(state.filter().date_prefix().as_deref(), Some("2026-02-01"));
    }

    #[test]
    fn test_clearing_date_restores_model_only_sequence() {
        let mut state = ready(two_month_library());
        state.update(Intent::SelectModel(Some(String::new())));
        let initial = state.feed().filtered().to_vec();

        state.update(Intent::SelectDate(date(2026, 1, 10)));
        assert_eq!(state.feed().filtered().len(), 1);

        state.update(Intent::ClearDate);
        assert_eq!(state.feed().filtered(), initial.as_slice());
        assert_eq!(state.feed().cursor(), PAGE_SIZE);
    }

    #[test]
    fn test_load_more_is_serialized_until_settled() {
        let mut state = ready(two_month_library());
        // first page is in flight until the shell acknowledges it
        assert!(state.update(Intent::LoadMore).is_empty());

        state.update(Intent::PageSettled);
        let effects = state.update(Intent::LoadMore);
        assert_eq!(effects.len(), 2);
        assert!(matches!(&effects[0], Effect::FetchThumbnails(batch) if batch.len() == 20));
        assert_eq!(effects[1], Effect::SettlePage);
        assert_eq!(state.feed().cursor(), 40);
    }

    #[test]
    fn test_cursor_never_exceeds_filtered_length() {
        let mut state = ready(two_month_library());
        for _ in 0..10 {
            state.update(Intent::PageSettled);
            state.update(Intent::LoadMore);
            assert!(state.feed().cursor() <= state.feed().filtered().len());
        }
        assert_eq!(state.feed().cursor(), 59);
        state.update(Intent::PageSettled);
        assert!(state.update(Intent::LoadMore).is_empty());
    }

    #[test]
    fn test_detail_month_fetched_once() {
        let mut state = ready(two_month_library());
        // #32 and #33 are both in 2026-02
        let first = state.update(Intent::OpenRecord(32));
        assert!(first.contains(&Effect::FetchDetail(MonthKey::new(2026, 2))));
        assert_eq!(state.overlay().phase(), OverlayPhase::DetailLoading);

        let second = state.update(Intent::OpenRecord(33));
        assert!(!second.iter().any(|e| matches!(e, Effect::FetchDetail(_))));

        let entries: Vec<DetailEntry> = serde_json::from_str(
            r#"[{"number": 33, "prompt": "a cat", "story": "once"}, {"number": 32}]"#,
        )
        .unwrap();
        state.update(Intent::DetailLoaded(MonthKey::new(2026, 2), entries));
        assert_eq!(state.overlay().phase(), OverlayPhase::Populated);
        assert_eq!(state.overlay().tabs(), &[DetailTab::Story]);

        state.update(Intent::CloseOverlay);
        let third = state.update(Intent::OpenRecord(32));
        assert_eq!(third.len(), 1);
        assert_eq!(state.overlay().phase(), OverlayPhase::Populated);
        assert!(state.overlay().tabs().is_empty());
    }

    #[test]
    fn test_late_detail_for_previous_month_is_only_cached() {
        let mut state = ready(scenario_library());
        // #3 is in 2026-02, #1 in 2026-01
        state.update(Intent::OpenRecord(3));
        let effects = state.update(Intent::OpenRecord(1));
        assert!(effects.contains(&Effect::FetchDetail(MonthKey::new(2026, 1))));

        let february: Vec<DetailEntry> =
            serde_json::from_str(r#"[{"number": 3, "story": "february story"}]"#).unwrap();
        state.update(Intent::DetailLoaded(MonthKey::new(2026, 2), february));

        assert_eq!(state.overlay().number(), Some(1));
        assert_eq!(state.overlay().phase(), OverlayPhase::DetailLoading);
        assert!(state.overlay().detail().is_none());

        // reopening #3 is served from the cache
        let effects = state.update(Intent::OpenRecord(3));
        assert!(!effects.iter().any(|e| matches!(e, Effect::FetchDetail(_))));
        assert_eq!(
            state.overlay().detail().and_then(Detail::story),
            Some("february story")
        );
    }

    #[test]
    fn test_failed_detail_fetch_still_populates() {
        let mut state = ready(scenario_library());
        state.update(Intent::OpenRecord(3));
        state.update(Intent::DetailLoaded(MonthKey::new(2026, 2), Vec::new()));
        assert_eq!(state.overlay().phase(), OverlayPhase::Populated);
        assert!(state.overlay().detail().map(Detail::is_absent).unwrap_or(false));
    }

    #[test]
    fn test_inline_detail_skips_fetch() {
        let inline: ManifestEntryJson = serde_json::from_str(
            r#"{"number": 9, "timestamp": "2026-01-30 05:00:00", "url": "u9",
                "prompt": "cat in rain", "news_inspiration": ["storm"]}"#,
        )
        .unwrap();
        let mut state = ready(Library::from_manifest(vec![inline], HashMap::new(), HashMap::new()));
        let effects = state.update(Intent::OpenRecord(9));
        assert_eq!(effects, vec![Effect::FetchImage(9, "u9".to_string())]);
        assert_eq!(state.overlay().phase(), OverlayPhase::Populated);
        assert_eq!(state.overlay().active_tab(), Some(DetailTab::News));
    }

    type ManifestEntryJson = crate::state::data::ManifestEntry;

    #[test]
    fn test_copy_prompt_flow() {
        let inline: ManifestEntryJson = serde_json::from_str(
            r#"{"number": 9, "timestamp": "2026-01-30 05:00:00", "url": "u9", "prompt": "cat in rain"}"#,
        )
        .unwrap();
        let mut state = ready(Library::from_manifest(vec![inline], HashMap::new(), HashMap::new()));
        state.update(Intent::OpenRecord(9));

        let effects = state.update(Intent::CopyPrompt);
        assert_eq!(effects[0], Effect::CopyToClipboard("cat in rain".to_string()));
        let Effect::ScheduleCopyReset { token, after } = effects[1] else {
            panic!("expected a reset timer");
        };
        assert_eq!(after, Duration::from_millis(2000));
        assert!(state.overlay().is_copied());

        state.update(Intent::CopyResetElapsed(token));
        assert!(!state.overlay().is_copied());
    }

    #[test]
    fn test_copy_without_prompt_does_nothing() {
        let mut state = ready(scenario_library());
        state.update(Intent::OpenRecord(3));
        assert!(state.update(Intent::CopyPrompt).is_empty());
    }

    #[test]
    fn test_download_and_discussion_links() {
        let library = Library::from_manifest(
            vec![entry(1, "2026-01-05 10:00:00", None, false), entry(2, "2026-01-06 10:00:00", None, false)],
            HashMap::from([(1, 4)]),
            HashMap::from([(1, "https://github.com/c/1".to_string())]),
        );
        let mut state = ready(library);

        state.update(Intent::OpenRecord(1));
        assert_eq!(
            state.update(Intent::Download),
            vec![Effect::OpenExternal("https://img.example/1.webp".to_string())]
        );
        assert_eq!(
            state.update(Intent::OpenDiscussion),
            vec![Effect::OpenExternal("https://github.com/c/1".to_string())]
        );

        state.update(Intent::OpenRecord(2));
        assert!(state.update(Intent::OpenDiscussion).is_empty());

        state.update(Intent::CloseOverlay);
        assert!(state.update(Intent::Download).is_empty());
    }

    #[test]
    fn test_calendar_selection_closes_popover() {
        let mut state = ready(scenario_library());
        state.update(Intent::ToggleCalendar);
        assert!(state.calendar().is_open());
        state.update(Intent::CalendarPrev);
        assert_eq!(state.calendar().displayed(), MonthKey::new(2026, 1));

        state.update(Intent::SelectDate(date(2026, 1, 5)));
        assert!(!state.calendar().is_open());
        assert_eq!(rendered(&state), vec![1]);
        let grid = state.calendar_grid();
        assert!(grid.days[4].is_selected);
    }

    #[test]
    fn test_jump_materializes_and_scrolls() {
        let mut state = ready(two_month_library());
        state.update(Intent::PageSettled);
        state.update(Intent::ViewportResized(500.0));

        let effects = state.update(Intent::JumpToMonth(MonthKey::new(2026, 1)));
        assert_eq!(effects.last(), Some(&Effect::ScrollToMonth(MonthKey::new(2026, 1))));
        // 28 February records precede January's first (newest-first)
        assert!(state.feed().cursor() > 28);
        assert!(!state.timeline().is_panel_open());

        assert!(state.update(Intent::JumpToMonth(MonthKey::new(2025, 5))).is_empty());
    }

    #[test]
    fn test_jump_to_old_month_fetches_one_screen_of_thumbnails() {
        // hourly records for 180 days, newest first
        let start = date(2025, 9, 1);
        let entries = (0..180 * 24)
            .map(|i| {
                let day = start + chrono::Duration::days((i / 24) as i64);
                entry(i + 1, &format!("{} {:02}:00:00", day.format("%Y-%m-%d"), i % 24), None, false)
            })
            .collect();
        let mut state = ready(Library::from_manifest(entries, HashMap::new(), HashMap::new()));
        state.update(Intent::PageSettled);

        let effects = state.update(Intent::JumpToMonth(MonthKey::new(2025, 9)));
        let batch = effects
            .iter()
            .find_map(|e| match e {
                Effect::FetchThumbnails(batch) => Some(batch.clone()),
                _ => None,
            })
            .unwrap();
        assert!(state.feed().cursor() > 3000);
        assert_eq!(batch.len(), PAGE_SIZE);
        // newest record of September comes first
        assert_eq!(batch[0].0, 30 * 24);
        assert_eq!(effects.last(), Some(&Effect::ScrollToMonth(MonthKey::new(2025, 9))));
    }

    #[test]
    fn test_clock_moves_today_queries_and_calendar() {
        let mut state = ready(scenario_library());
        state.set_clock(date(2026, 1, 6), date(2026, 1, 6));

        state.update(Intent::Search("yesterday".to_string()));
        assert_eq!(state.filter().date, Some(date(2026, 1, 5)));
        assert_eq!(rendered(&state), vec![1]);

        let grid = state.calendar_grid();
        assert!(grid.days.iter().all(|d| !d.is_today));
        state.update(Intent::CalendarPrev);
        let grid = state.calendar_grid();
        assert!(grid.days[5].is_today);
    }

    #[test]
    fn test_jump_waits_for_in_flight_page() {
        let mut state = ready(two_month_library());
        // first page still in flight
        assert!(state.update(Intent::JumpToMonth(MonthKey::new(2026, 1))).is_empty());
        let effects = state.update(Intent::PageSettled);
        assert_eq!(effects.last(), Some(&Effect::ScrollToMonth(MonthKey::new(2026, 1))));
        assert!(state.timeline().is_panel_open());
    }

    #[test]
    fn test_search_queries() {
        let mut state = ready(scenario_library());

        state.update(Intent::Search("1".to_string()));
        assert_eq!(state.overlay().number(), Some(1));

        state.update(Intent::Search("latest".to_string()));
        assert_eq!(state.overlay().number(), Some(3));

        state.update(Intent::Search("2026-01-05".to_string()));
        assert_eq!(rendered(&state), vec![1]);

        state.update(Intent::Search("2026-02-01T09".to_string()));
        assert_eq!(rendered(&state), vec![3]);
        assert_eq!(state.overlay().number(), Some(3));

        state.update(Intent::Search("2026-02-01T10".to_string()));
        assert!(state.status().is_some());

        state.update(Intent::Search("whiskers".to_string()));
        assert_eq!(state.status(), Some("No cats found for 'whiskers'."));

        state.update(Intent::Search("today".to_string()));
        assert_eq!(state.filter().date, Some(date(2026, 2, 1)));
    }

    #[test]
    fn test_search_before_manifest_is_deferred() {
        let mut state = AppState::new(Settings::default(), date(2026, 2, 1), date(2026, 2, 1));
        assert!(state.update(Intent::Search("3".to_string())).is_empty());
        assert!(!state.overlay().is_open());

        state.update(Intent::ManifestLoaded(scenario_library()));
        assert_eq!(state.overlay().number(), Some(3));
    }

    #[test]
    fn test_manifest_failure() {
        let mut state = AppState::new(Settings::default(), date(2026, 2, 1), date(2026, 2, 1));
        state.update(Intent::ManifestFailed("HTTP 404".to_string()));
        assert_eq!(state.phase(), &LoadPhase::Failed("HTTP 404".to_string()));
        assert!(state.update(Intent::LoadMore).is_empty());
    }
}
