//! Query input widget

use iced::widget::{container, text_input};
use iced::{Background, Border, Color, Element, Length, Padding};

use super::theme::DarkTheme;

pub const PLACEHOLDER: &str = "예: 티비, 소파, 냉장고";

/// Search bar component
pub fn view<'a, Message: Clone + 'a>(
    value: &str,
    on_input: impl Fn(String) -> Message + 'a,
    on_submit: Message,
) -> Element<'a, Message> {
    container(
        text_input(PLACEHOLDER, value)
            .on_input(on_input)
            .on_submit(on_submit)
            .padding(Padding::new(12.0))
            .size(18)
            .style(|_theme, _status| text_input::Style {
                background: Background::Color(Color::TRANSPARENT),
                border: Border::default(),
                icon: DarkTheme::TEXT_MUTED,
                placeholder: DarkTheme::TEXT_PLACEHOLDER,
                value: DarkTheme::TEXT,
                selection: DarkTheme::PRIMARY,
            }),
    )
    .width(Length::Fill)
    .style(|_theme| container::Style {
        background: Some(Background::Color(DarkTheme::SURFACE)),
        border: Border {
            color: DarkTheme::BORDER,
            width: 1.0,
            radius: 12.0.into(),
        },
        ..Default::default()
    })
    .into()
}
