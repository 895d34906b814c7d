/// Timeline navigator: year -> month tree derived from the library

use super::library::Library;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearEntry {
    pub year: i32,
    /// Descending
    pub months: Vec<u32>,
    pub expanded: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timeline {
    /// Descending
    years: Vec<YearEntry>,
    panel_open: bool,
}

impl Timeline {
    /// Years descending, months descending; the newest year starts expanded
    pub fn from_library(library: &Library) -> Self {
        let years = library
            .month_tree()
            .iter()
            .rev()
            .enumerate()
            .map(|(i, (year, months))| YearEntry {
                year: *year,
                months: months.iter().rev().copied().collect(),
                expanded: i == 0,
            })
            .collect();

        Self {
            years,
            panel_open: true,
        }
    }

    pub fn years(&self) -> &[YearEntry] {
        &self.years
    }

    pub fn is_panel_open(&self) -> bool {
        self.panel_open
    }

    pub fn toggle_panel(&mut self) {
        self.panel_open = !self.panel_open;
    }

    pub fn collapse_panel(&mut self) {
        self.panel_open = false;
    }

    pub fn toggle_year(&mut self, year: i32) {
        if let Some(entry) = self.years.iter_mut().find(|e| e.year == year) {
            entry.expanded = !entry.expanded;
        }
    }
}
