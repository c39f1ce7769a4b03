use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::App;
use crate::ui::render::centered_rect_fixed;
use crate::ui::styles;

// Placeholder: account creation is not wired to any service.
pub fn render(frame: &mut Frame, _app: &App, area: Rect) {
    let area = centered_rect_fixed(46, 8, area);
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(Span::styled("Sign Up", styles::title_style())),
        Line::from(Span::styled("authgate / sign-up", styles::muted_style())),
        Line::from(""),
        Line::from(Span::styled("Back to sign in", styles::link_style(true))),
        Line::from(""),
        Line::from(vec![
            Span::styled("Enter", styles::help_key_style()),
            Span::styled(" or ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to go back", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(
        Paragraph::new(lines).block(block).alignment(Alignment::Center),
        area,
    );
}
