/// Collapsible year/month navigator
use iced::widget::{button, container, scrollable, text, Column};
use iced::{Element, Length};

use super::intent;
use crate::state::app::Intent;
use crate::state::data::MonthKey;
use crate::state::timeline::Timeline;
use crate::Message;

pub const PANEL_WIDTH: f32 = 170.0;

pub fn view<'a>(timeline: &'a Timeline) -> Element<'a, Message> {
    let mut entries = Column::new().spacing(2);

    for entry in timeline.years() {
        let arrow = if entry.expanded { "▾" } else { "▸" };
        entries = entries.push(
            button(text(format!("{} {}", arrow, entry.year)).size(16))
                .on_press(intent(Intent::ToggleYear(entry.year)))
                .style(button::text)
                .width(Length::Fill),
        );

        if entry.expanded {
            for &month in &entry.months {
                entries = entries.push(
                    button(text(format!("    {:02}", month)).size(14))
                        .on_press(intent(Intent::JumpToMonth(MonthKey::new(entry.year, month))))
                        .style(button::text)
                        .width(Length::Fill),
                );
            }
        }
    }

    container(scrollable(entries))
        .width(Length::Fixed(PANEL_WIDTH))
        .height(Length::Fill)
        .padding(8)
        .into()
}
