/// Gallery grid with month separators
///
/// Every row has a fixed height, so the scroll offset of a month separator
/// and the distance to the bottom sentinel can be computed without asking
/// the renderer.

use iced::alignment::Vertical;
use iced::widget::{button, column, container, image, scrollable, text, Column, Row, Space};
use iced::{ContentFit, Element, Length};
use std::collections::HashMap;

use super::intent;
use crate::state::app::{AppState, Intent};
use crate::state::data::{MonthKey, Record};
use crate::state::filter::FeedItem;
use crate::Message;

pub const MARKER_HEIGHT: f32 = 48.0;
pub const TILE_HEIGHT: f32 = 220.0;
pub const ROW_HEIGHT: f32 = TILE_HEIGHT + 12.0;
pub const GRID_PADDING: f32 = 16.0;
pub const FOOTER_HEIGHT: f32 = 60.0;
/// Load the next page once the bottom is closer than this
pub const SENTINEL_MARGIN: f32 = 400.0;

const IMAGE_HEIGHT: f32 = 180.0;

pub fn grid_id() -> scrollable::Id {
    scrollable::Id::new("gallery-grid")
}

pub fn columns_for(narrow: bool) -> usize {
    if narrow {
        2
    } else {
        4
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridRow {
    Marker(MonthKey),
    /// Record positions, at most `columns` of them
    Tiles(Vec<usize>),
}

impl GridRow {
    pub fn height(&self) -> f32 {
        match self {
            GridRow::Marker(_) => MARKER_HEIGHT,
            GridRow::Tiles(_) => ROW_HEIGHT,
        }
    }
}

/// Break the feed into rows; a month marker always starts a new row
pub fn layout(items: &[FeedItem], columns: usize) -> Vec<GridRow> {
    let columns = columns.max(1);
    let mut rows = Vec::new();
    let mut current: Vec<usize> = Vec::new();

    for item in items {
        match *item {
            FeedItem::MonthMarker(month) => {
                if !current.is_empty() {
                    rows.push(GridRow::Tiles(std::mem::take(&mut current)));
                }
                rows.push(GridRow::Marker(month));
            }
            FeedItem::Record(index) => {
                current.push(index);
                if current.len() == columns {
                    rows.push(GridRow::Tiles(std::mem::take(&mut current)));
                }
            }
        }
    }
    if !current.is_empty() {
        rows.push(GridRow::Tiles(current));
    }
    rows
}

/// Total scrollable height including padding and footer
pub fn content_height(rows: &[GridRow]) -> f32 {
    GRID_PADDING * 2.0 + rows.iter().map(GridRow::height).sum::<f32>() + FOOTER_HEIGHT
}

/// Scroll offset that puts the separator of `month` at the top
pub fn month_offset(rows: &[GridRow], month: MonthKey) -> Option<f32> {
    let mut offset = GRID_PADDING;
    for row in rows {
        if *row == GridRow::Marker(month) {
            return Some(offset);
        }
        offset += row.height();
    }
    None
}

/// Record positions of every row overlapping the vertical band `top..bottom`
pub fn records_between(rows: &[GridRow], top: f32, bottom: f32) -> Vec<usize> {
    let mut offset = GRID_PADDING;
    let mut positions = Vec::new();
    for row in rows {
        let end = offset + row.height();
        if offset >= bottom {
            break;
        }
        if let GridRow::Tiles(tiles) = row {
            if end > top {
                positions.extend_from_slice(tiles);
            }
        }
        offset = end;
    }
    positions
}

/// Whether the bottom sentinel is within reach of the viewport
pub fn near_bottom(content_height: f32, viewport_height: f32, scroll_y: f32) -> bool {
    content_height - (scroll_y + viewport_height) < SENTINEL_MARGIN
}

fn month_label(month: MonthKey) -> String {
    const NAMES: [&str; 12] = [
        "January", "February", "March", "April", "May", "June", "July", "August", "September",
        "October", "November", "December",
    ];
    let name = NAMES.get(month.month as usize - 1).copied().unwrap_or("?");
    format!("{} {}", name, month.year)
}

fn tile<'a>(record: &'a Record, thumbnail: Option<&image::Handle>) -> Element<'a, Message> {
    let picture: Element<'a, Message> = match thumbnail {
        Some(handle) => image(handle.clone())
            .width(Length::Fill)
            .height(Length::Fixed(IMAGE_HEIGHT))
            .content_fit(ContentFit::Cover)
            .into(),
        None => container(text("🐱").size(32))
            .width(Length::Fill)
            .height(Length::Fixed(IMAGE_HEIGHT))
            .center_x(Length::Fill)
            .center_y(Length::Fixed(IMAGE_HEIGHT))
            .into(),
    };

    let caption = match &record.title {
        Some(title) => format!("#{} {}", record.number, title),
        None => format!("#{}", record.number),
    };

    button(
        column![
            picture,
            text(caption).size(13),
            text(&record.timestamp).size(11),
        ]
        .spacing(2),
    )
    .on_press(intent(Intent::OpenRecord(record.number)))
    .style(button::text)
    .padding(4)
    .width(Length::FillPortion(1))
    .height(Length::Fixed(TILE_HEIGHT))
    .into()
}

/// The scrollable grid of everything materialized so far
pub fn view<'a>(
    state: &'a AppState,
    thumbnails: &'a HashMap<u32, image::Handle>,
    columns: usize,
) -> Element<'a, Message> {
    let records = state.library().records();
    let mut content = Column::new();

    for grid_row in layout(state.feed().items(), columns) {
        let element: Element<'a, Message> = match grid_row {
            GridRow::Marker(month) => container(text(month_label(month)).size(20))
                .height(Length::Fixed(MARKER_HEIGHT))
                .align_y(Vertical::Bottom)
                .padding([0, 4])
                .into(),
            GridRow::Tiles(positions) => {
                let mut tiles = Row::new().spacing(12).height(Length::Fixed(TILE_HEIGHT));
                for &position in &positions {
                    if let Some(record) = records.get(position) {
                        tiles = tiles.push(tile(record, thumbnails.get(&record.number)));
                    }
                }
                for _ in positions.len()..columns {
                    tiles = tiles.push(Space::with_width(Length::FillPortion(1)));
                }
                container(tiles).height(Length::Fixed(ROW_HEIGHT)).into()
            }
        };
        content = content.push(element);
    }

    let footer = if state.feed().filtered().is_empty() {
        "No cats match these filters."
    } else if state.feed().is_exhausted() {
        "That's all the cats 🐾"
    } else if state.feed().is_loading() {
        "Loading more cats…"
    } else {
        "Scroll for more cats"
    };
    content = content.push(
        container(text(footer).size(14))
            .height(Length::Fixed(FOOTER_HEIGHT))
            .center_x(Length::Fill)
            .align_y(Vertical::Center),
    );

    scrollable(container(content).padding(GRID_PADDING))
        .id(grid_id())
        .on_scroll(Message::Scrolled)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}
