use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::App;
use crate::ui::render::centered_rect_fixed;
use crate::ui::styles;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let area = centered_rect_fixed(46, 11, area);
    frame.render_widget(Clear, area);

    let email = app
        .auth
        .session
        .as_ref()
        .map(|user| user.email.clone())
        .unwrap_or_default();

    let button = if app.is_signing_out {
        "  Signing out...  "
    } else {
        "    Sign Out    "
    };

    let lines = vec![
        Line::from(Span::styled("Home", styles::title_style())),
        Line::from(Span::styled("authgate / home", styles::muted_style())),
        Line::from(""),
        Line::from(Span::styled("Logged in as:", styles::muted_style())),
        Line::from(Span::styled(email, styles::highlight_style())),
        Line::from(""),
        Line::from(Span::styled(button, styles::danger_button_style())),
        Line::from(""),
        Line::from(vec![
            Span::styled("[s]", styles::help_key_style()),
            Span::styled(" sign out  ", styles::muted_style()),
            Span::styled("[q]", styles::help_key_style()),
            Span::styled(" quit", styles::muted_style()),
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
