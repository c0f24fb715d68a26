use iced::widget::{container, text};
use iced::{theme, Background, Border, Color, Element, Shadow, Theme, Vector};
use newsly_core::{BadgeTone, Rgb};

pub const SLATE_900: Color = Color::from_rgb(0.059, 0.090, 0.165);
pub const SLATE_500: Color = Color::from_rgb(0.392, 0.455, 0.545);
pub const ORANGE_500: Color = Color::from_rgb(0.976, 0.451, 0.086);
pub const RED_600: Color = Color::from_rgb(0.863, 0.149, 0.149);
pub const GREEN_700: Color = Color::from_rgb(0.082, 0.502, 0.239);

pub fn color(rgb: Rgb) -> Color {
    Color::from_rgb8(rgb.0, rgb.1, rgb.2)
}

struct Badge(BadgeTone);

impl container::StyleSheet for Badge {
    type Style = Theme;

    fn appearance(&self, _style: &Self::Style) -> container::Appearance {
        let (background, foreground, border) = self.0.colors();
        container::Appearance {
            text_color: Some(color(foreground)),
            background: Some(Background::Color(color(background))),
            border: Border {
                color: color(border),
                width: 1.0,
                radius: 999.0.into(),
            },
            ..Default::default()
        }
    }
}

struct Card;

impl container::StyleSheet for Card {
    type Style = Theme;

    fn appearance(&self, _style: &Self::Style) -> container::Appearance {
        container::Appearance {
            text_color: Some(SLATE_900),
            background: Some(Background::Color(Color::WHITE)),
            border: Border {
                color: color(Rgb(0xe2, 0xe8, 0xf0)),
                width: 1.0,
                radius: 12.0.into(),
            },
            shadow: Shadow {
                color: Color::from_rgba(0.0, 0.0, 0.0, 0.06),
                offset: Vector::new(0.0, 2.0),
                blur_radius: 6.0,
            },
        }
    }
}

/// Pill showing a topic in its badge tone.
pub fn badge<'a, M: 'a>(label: &str, tone: BadgeTone) -> Element<'a, M> {
    container(text(label).size(12))
        .padding([2, 10])
        .style(theme::Container::Custom(Box::new(Badge(tone))))
        .into()
}

pub fn card<'a, M: 'a>(content: impl Into<Element<'a, M>>) -> container::Container<'a, M> {
    container(content)
        .padding(16)
        .style(theme::Container::Custom(Box::new(Card)))
}

pub fn muted<'a>(content: impl ToString) -> text::Text<'a> {
    text(content).size(13).style(SLATE_500)
}

pub fn error_text<'a>(content: impl ToString) -> text::Text<'a> {
    text(content).size(14).style(RED_600)
}
