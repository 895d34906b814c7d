/// Date picker popover
use iced::alignment::Horizontal;
use iced::widget::{button, column, container, row, text, Column, Row, Space};
use iced::{Border, Element, Length, Theme};

use super::intent;
use crate::state::app::Intent;
use crate::state::calendar::{DayCell, MonthGrid};
use crate::Message;

const CELL: f32 = 40.0;
const WEEKDAYS: [&str; 7] = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"];

fn day_button<'a>(cell: DayCell) -> Element<'a, Message> {
    use chrono::Datelike;

    button(
        text(cell.date.day().to_string())
            .width(Length::Fill)
            .align_x(Horizontal::Center),
    )
    .on_press(intent(Intent::SelectDate(cell.date)))
    .width(Length::Fixed(CELL))
    .height(Length::Fixed(CELL))
    .style(move |theme: &Theme, status| {
        let palette = theme.extended_palette();
        let mut style = button::text(theme, status);
        if cell.is_selected {
            style.background = Some(palette.primary.strong.color.into());
            style.text_color = palette.primary.strong.text;
        } else if cell.has_cat {
            style.background = Some(palette.success.weak.color.into());
            style.text_color = palette.success.weak.text;
        }
        if cell.is_today {
            style.border = Border {
                color: palette.primary.base.color,
                width: 1.5,
                radius: 4.0.into(),
            };
        }
        style
    })
    .into()
}

/// Month page: navigation, weekday header, leading blanks, one cell per day
pub fn view<'a>(grid: MonthGrid) -> Element<'a, Message> {
    let navigation = row![
        button(text("‹")).on_press(intent(Intent::CalendarPrev)),
        text(grid.month.to_string())
            .size(18)
            .width(Length::Fill)
            .align_x(Horizontal::Center),
        button(text("›")).on_press(intent(Intent::CalendarNext)),
    ]
    .spacing(8);

    let weekdays = WEEKDAYS.iter().fold(Row::new(), |r, day| {
        r.push(
            text(*day)
                .size(12)
                .width(Length::Fixed(CELL))
                .align_x(Horizontal::Center),
        )
    });

    let mut cells: Vec<Element<'a, Message>> = (0..grid.leading_blanks)
        .map(|_| Space::new(Length::Fixed(CELL), Length::Fixed(CELL)).into())
        .collect();
    cells.extend(grid.days.iter().copied().map(day_button));

    let mut weeks = Column::new().spacing(2);
    let mut week = Row::new().spacing(0);
    let mut in_week = 0;
    for cell in cells {
        week = week.push(cell);
        in_week += 1;
        if in_week == 7 {
            weeks = weeks.push(week);
            week = Row::new().spacing(0);
            in_week = 0;
        }
    }
    if in_week > 0 {
        weeks = weeks.push(week);
    }

    let footer = row![
        button(text("Clear")).on_press(intent(Intent::ClearDate)),
        Space::with_width(Length::Fill),
        button(text("Close")).on_press(intent(Intent::CloseCalendar)),
    ];

    container(column![navigation, weekdays, weeks, footer].spacing(10))
        .padding(16)
        .width(Length::Fixed(CELL * 7.0 + 32.0))
        .style(container::rounded_box)
        .into()
}
