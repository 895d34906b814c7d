/// State management module
///
/// This module handles all application state, including:
/// - Manifest records and derived indices (data.rs, library.rs)
/// - Filtering and incremental pagination (filter.rs)
/// - Calendar picker and timeline navigator (calendar.rs, timeline.rs)
/// - Detail overlay and the per-month detail cache (overlay.rs, detail.rs)
/// - Free-text time queries (query.rs)
/// - The intent/effect transition function tying it together (app.rs)

pub mod app;
pub mod calendar;
pub mod data;
pub mod detail;
pub mod filter;
pub mod library;
pub mod overlay;
pub mod query;
pub mod timeline;
