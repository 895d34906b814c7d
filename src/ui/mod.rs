/// View layer
///
/// Pure functions from `AppState` to iced elements. Every interaction is
/// reported as `Message::Intent` so the state module stays the only place
/// where anything changes.

pub mod calendar;
pub mod grid;
pub mod overlay;
pub mod timeline;

use iced::widget::{button, center, container, horizontal_space, mouse_area, opaque, pick_list, row, stack, text, text_input};
use iced::{Alignment, Color, Element, Length};
use std::fmt;

use crate::state::app::{AppState, Intent};
use crate::Message;

pub fn intent(intent: Intent) -> Message {
    Message::Intent(intent)
}

/// Layer `content` over `base`; a click on the dimmed backdrop sends `on_blur`
pub fn modal<'a>(
    base: impl Into<Element<'a, Message>>,
    content: impl Into<Element<'a, Message>>,
    on_blur: Message,
    dim: f32,
) -> Element<'a, Message> {
    stack![
        base.into(),
        opaque(
            mouse_area(center(opaque(content)).style(move |_theme| container::Style {
                background: Some(
                    Color {
                        a: dim,
                        ..Color::BLACK
                    }
                    .into(),
                ),
                ..container::Style::default()
            }))
            .on_press(on_blur)
        )
    ]
    .into()
}

/// Entry of the model picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelChoice {
    Any,
    Model(String),
}

impl ModelChoice {
    fn into_filter(self) -> Option<String> {
        match self {
            ModelChoice::Any => None,
            ModelChoice::Model(model) => Some(model),
        }
    }
}

impl fmt::Display for ModelChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelChoice::Any => write!(f, "All models"),
            ModelChoice::Model(model) => write!(f, "{}", model),
        }
    }
}

fn cat_count(state: &AppState) -> String {
    let total = state.library().image_count();
    if state.filter().is_active() {
        format!("{} of {} cats", state.feed().filtered().len(), total)
    } else {
        format!("{} cats", total)
    }
}

/// Top bar: timeline toggle, model picker, date picker button, search box
pub fn header<'a>(state: &'a AppState, search: &'a str) -> Element<'a, Message> {
    let choices: Vec<ModelChoice> = std::iter::once(ModelChoice::Any)
        .chain(state.library().models().iter().cloned().map(ModelChoice::Model))
        .collect();
    let selected = match &state.filter().model {
        Some(model) => ModelChoice::Model(model.clone()),
        None => ModelChoice::Any,
    };

    let model_picker = pick_list(choices, Some(selected), |choice: ModelChoice| {
        intent(Intent::SelectModel(choice.into_filter()))
    });

    let date_label = match state.filter().date {
        Some(date) => format!("📅 {}", date.format("%Y-%m-%d")),
        None => "📅 Any date".to_string(),
    };
    let date_button = button(text(date_label)).on_press(intent(Intent::ToggleCalendar));
    let clear_date =
        button(text("✕")).on_press_maybe(state.filter().date.map(|_| intent(Intent::ClearDate)));

    let search_box = text_input("42, 2026-01-30, today, latest…", search)
        .on_input(Message::SearchChanged)
        .on_submit(Message::SearchSubmitted)
        .width(Length::Fixed(240.0));

    row![
        button(text("☰")).on_press(intent(Intent::ToggleTimeline)),
        text("Cat Gallery").size(24),
        text(cat_count(state)).size(14),
        horizontal_space(),
        model_picker,
        date_button,
        clear_date,
        search_box,
    ]
    .spacing(10)
    .padding(10)
    .align_y(Alignment::Center)
    .into()
}
