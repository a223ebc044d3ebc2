use ceph_ops_core::{LineTone, VisualState};
use ratatui::style::{Color, Modifier, Style};

pub const SUMMARY_STYLE: Style = Style::new()
    .fg(Color::Rgb(235, 219, 178))
    .add_modifier(Modifier::BOLD);
pub const HEADER_STYLE: Style = Style::new()
    .fg(Color::Rgb(142, 192, 124))
    .add_modifier(Modifier::BOLD);
pub const RISING_STYLE: Style = Style::new().fg(Color::Rgb(184, 187, 38));
pub const IDLE_STYLE: Style = Style::new().fg(Color::Rgb(250, 189, 47));
pub const MUTED_STYLE: Style = Style::new().fg(Color::Rgb(146, 131, 116));

pub fn tone_style(tone: LineTone) -> Style {
    match tone {
        LineTone::Summary => SUMMARY_STYLE,
        LineTone::Header => HEADER_STYLE,
        LineTone::Item(VisualState::Rising) => RISING_STYLE,
        LineTone::Item(VisualState::Idle) => IDLE_STYLE,
        LineTone::Item(VisualState::None) | LineTone::Notice => MUTED_STYLE,
        LineTone::Blank => Style::new(),
    }
}
