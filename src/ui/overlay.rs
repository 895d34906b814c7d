/// Detail overlay for a single record
use iced::widget::{button, column, container, image, row, scrollable, text, Row, Space};
use iced::{ContentFit, Element, Length, Theme};
use iced_aw::Wrap;

use super::intent;
use crate::state::app::{AppState, Intent};
use crate::state::data::{Detail, Inspiration};
use crate::state::overlay::{DetailTab, OverlayPhase};
use crate::Message;

const NEWS_TAG_CHARS: usize = 60;

fn chip<'a>(label: String) -> Element<'a, Message> {
    container(text(label).size(12))
        .padding([2, 8])
        .style(container::rounded_box)
        .into()
}

fn chips<'a>(tags: &'a [String]) -> Element<'a, Message> {
    Wrap::with_elements(tags.iter().map(|tag| chip(tag.clone())).collect())
        .spacing(6.0)
        .line_spacing(6.0)
        .into()
}

fn tab_content<'a>(detail: &'a Detail, tab: DetailTab) -> Element<'a, Message> {
    match tab {
        DetailTab::Story => text(detail.story().unwrap_or_default()).into(),
        DetailTab::Idea => text(detail.idea().unwrap_or_default()).into(),
        DetailTab::News => chips(detail.news_tags().unwrap_or_default()),
        DetailTab::Avoid => chips(detail.avoid_tags().unwrap_or_default()),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max).collect();
        format!("{}…", cut)
    }
}

pub fn view<'a>(state: &'a AppState, picture: Option<&image::Handle>) -> Element<'a, Message> {
    let overlay = state.overlay();
    let Some(record) = state.overlay_record() else {
        return Space::new(Length::Shrink, Length::Shrink).into();
    };

    let top = row![
        text(format!("Cat #{}", record.number)).size(22),
        Space::with_width(Length::Fill),
        button(text("✕")).on_press(intent(Intent::CloseOverlay)),
    ];

    let picture: Element<'a, Message> = match picture {
        Some(handle) => image(handle.clone())
            .width(Length::Fill)
            .height(Length::Fixed(420.0))
            .content_fit(ContentFit::Contain)
            .into(),
        None => container(text("Loading image…"))
            .height(Length::Fixed(420.0))
            .center_x(Length::Fill)
            .center_y(Length::Fixed(420.0))
            .into(),
    };

    let mut meta = column![text(&record.timestamp).size(14)].spacing(4);
    if let Some(title) = &record.title {
        meta = meta.push(text(title).size(18));
    }

    let mut tags = Row::new().spacing(6);
    if let Some(model) = &record.model {
        tags = tags.push(chip(format!("🤖 {}", model)));
    }
    match &record.inspiration {
        Some(Inspiration::Original) => tags = tags.push(chip("🎨 Original".to_string())),
        Some(Inspiration::News(summary)) => {
            tags = tags.push(chip(format!("📰 {}", truncate(summary, NEWS_TAG_CHARS))))
        }
        None => {}
    }

    let mut actions = Row::new().spacing(8);
    if state.library().comment_link(record.number).is_some() {
        actions = actions.push(
            button(text(format!("❤️ {}", state.library().likes(record.number))))
                .on_press(intent(Intent::OpenDiscussion)),
        );
    }
    actions = actions.push(button(text("⬇ Download")).on_press(intent(Intent::Download)));

    let detail = overlay.detail();
    let prompt_text = match overlay.phase() {
        OverlayPhase::Opening | OverlayPhase::DetailLoading => "Loading prompt…".to_string(),
        _ => detail
            .and_then(Detail::prompt)
            .unwrap_or("No prompt recorded.")
            .to_string(),
    };
    let copy_label = if overlay.is_copied() { "Copied!" } else { "Copy prompt" };
    let copy = button(text(copy_label)).on_press_maybe(
        detail
            .and_then(Detail::prompt)
            .map(|_| intent(Intent::CopyPrompt)),
    );
    let prompt = column![
        row![text("Prompt").size(16), Space::with_width(Length::Fill), copy],
        text(prompt_text).size(13),
    ]
    .spacing(6);

    let mut body = column![top, picture, meta, tags, actions, prompt].spacing(12);

    if let Some(detail) = detail {
        if !overlay.tabs().is_empty() {
            let strip = overlay.tabs().iter().fold(Row::new().spacing(4), |strip, &tab| {
                let style: fn(&Theme, button::Status) -> button::Style = if overlay.active_tab() == Some(tab) {
                    button::primary
                } else {
                    button::secondary
                };
                strip.push(
                    button(text(tab.label()))
                        .style(style)
                        .on_press(intent(Intent::SelectTab(tab))),
                )
            });
            body = body.push(strip);
            if let Some(tab) = overlay.active_tab() {
                body = body.push(tab_content(detail, tab));
            }
        }
    }

    container(scrollable(body.padding(20)))
        .max_width(760)
        .max_height(820)
        .style(container::rounded_box)
        .into()
}
