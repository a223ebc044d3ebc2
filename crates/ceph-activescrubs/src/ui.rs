use crate::driver::View;
use crate::terminal::TerminalSession;
use crate::theme;
use ceph_ops_core::{render, CategoryCounts, ItemRecord, Screen};
use ratatui::{
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use std::io;

pub fn draw_screen(f: &mut Frame, screen: &Screen) {
    let lines: Vec<Line> = screen
        .lines
        .iter()
        .map(|line| {
            let style = theme::tone_style(line.tone);
            Line::from(Span::styled(line.text.as_str(), style))
        })
        .collect();
    f.render_widget(Paragraph::new(lines), f.size());
}

/// Draws each cycle into the alternate screen at the current terminal size.
pub struct TerminalView<'a> {
    session: &'a mut TerminalSession,
}

impl<'a> TerminalView<'a> {
    pub fn new(session: &'a mut TerminalSession) -> Self {
        Self { session }
    }
}

impl View for TerminalView<'_> {
    fn draw(&mut self, active: &[ItemRecord], counts: &CategoryCounts) -> io::Result<()> {
        self.session.terminal_mut().draw(|f| {
            let area = f.size();
            let screen = render(active, counts, area.height as usize, area.width as usize);
            draw_screen(f, &screen);
        })?;
        Ok(())
    }
}
