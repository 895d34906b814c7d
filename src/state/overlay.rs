/// Detail overlay state machine
///
/// Closed -> Opening -> DetailLoading -> Populated -> Closed.
/// Opening another record while one is shown replaces the state in place.

use super::data::{Detail, MonthKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlayPhase {
    #[default]
    Closed,
    /// Image and core fields are set
    Opening,
    /// Waiting for the month's detail document
    DetailLoading,
    /// Extended fields known (possibly none)
    Populated,
}

/// Tabs of the extended-field strip, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetailTab {
    Story,
    Idea,
    News,
    Avoid,
}

impl DetailTab {
    pub const ALL: [DetailTab; 4] = [DetailTab::Story, DetailTab::Idea, DetailTab::News, DetailTab::Avoid];

    pub fn label(&self) -> &'static str {
        match self {
            DetailTab::Story => "Story",
            DetailTab::Idea => "Idea",
            DetailTab::News => "News",
            DetailTab::Avoid => "Avoid",
        }
    }

    /// Tabs whose content is present and non-empty
    pub fn available(detail: &Detail) -> Vec<DetailTab> {
        Self::ALL
            .into_iter()
            .filter(|tab| match tab {
                DetailTab::Story => detail.story().is_some(),
                DetailTab::Idea => detail.idea().is_some(),
                DetailTab::News => detail.news_tags().is_some(),
                DetailTab::Avoid => detail.avoid_tags().is_some(),
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Overlay {
    phase: OverlayPhase,
    number: Option<u32>,
    month: Option<MonthKey>,
    detail: Option<Detail>,
    tabs: Vec<DetailTab>,
    active_tab: Option<DetailTab>,
    copied: bool,
    /// Bumped on every copy so a stale reset timer cannot clear a newer confirmation
    copy_token: u64,
}

impl Overlay {
    pub fn phase(&self) -> OverlayPhase {
        self.phase
    }

    pub fn is_open(&self) -> bool {
        self.phase != OverlayPhase::Closed
    }

    pub fn number(&self) -> Option<u32> {
        self.number
    }

    pub fn month(&self) -> Option<MonthKey> {
        self.month
    }

    pub fn detail(&self) -> Option<&Detail> {
        self.detail.as_ref()
    }

    pub fn tabs(&self) -> &[DetailTab] {
        &self.tabs
    }

    pub fn active_tab(&self) -> Option<DetailTab> {
        self.active_tab
    }

    pub fn is_copied(&self) -> bool {
        self.copied
    }

    /// Show a record; any previous record's state is dropped
    pub fn open(&mut self, number: u32, month: MonthKey) {
        self.phase = OverlayPhase::Opening;
        self.number = Some(number);
        self.month = Some(month);
        self.detail = None;
        self.tabs.clear();
        self.active_tab = None;
        self.copied = false;
    }

    /// Clear the tab strip and wait for detail
    pub fn begin_loading(&mut self) {
        if self.phase == OverlayPhase::Closed {
            return;
        }
        self.phase = OverlayPhase::DetailLoading;
        self.detail = None;
        self.tabs.clear();
        self.active_tab = None;
    }

    /// Fill extended fields; the first available tab is selected
    pub fn populate(&mut self, detail: Detail) {
        if self.phase == OverlayPhase::Closed {
            return;
        }
        self.tabs = DetailTab::available(&detail);
        self.active_tab = self.tabs.first().copied();
        self.detail = Some(detail);
        self.phase = OverlayPhase::Populated;
    }

    pub fn select_tab(&mut self, tab: DetailTab) {
        if self.tabs.contains(&tab) {
            self.active_tab = Some(tab);
        }
    }

    /// Show the copy confirmation; returns the token for the reset timer
    pub fn mark_copied(&mut self) -> u64 {
        self.copy_token += 1;
        self.copied = true;
        self.copy_token
    }

    pub fn reset_copied(&mut self, token: u64) {
        if token == self.copy_token {
            self.copied = false;
        }
    }

    pub fn close(&mut self) {
        let copy_token = self.copy_token;
        *self = Self {
            copy_token,
            ..Self::default()
        };
    }
}
