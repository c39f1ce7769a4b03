use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use authgate_core::navigation::Route;

use crate::app::{App, AppState};

use super::screens::{home, sign_in, sign_up};
use super::styles;

const LOGO: [&str; 3] = [
    "╔═╗╦ ╦╔╦╗╦ ╦╔═╗╔═╗╔╦╗╔═╗",
    "╠═╣║ ║ ║ ╠═╣║ ╦╠═╣ ║ ║╣ ",
    "╩ ╩╚═╝ ╩ ╩ ╩╚═╝╩ ╩ ╩ ╚═╝",
];

pub fn render(frame: &mut Frame, app: &App) {
    // Nothing but the splash until the session has loaded
    if app.splash.is_visible() {
        render_splash(frame);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(10),   // Screen
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);

    match app.current_route() {
        Some(Route::SignIn) => sign_in::render(frame, app, chunks[1]),
        Some(Route::SignUp) => sign_up::render(frame, app, chunks[1]),
        Some(Route::Home) => home::render(frame, app, chunks[1]),
        None => {}
    }

    render_status_bar(frame, app, chunks[2]);

    if matches!(app.state, AppState::ConfirmingQuit) {
        render_quit_overlay(frame);
    }
}

fn render_splash(frame: &mut Frame) {
    let area = centered_rect_fixed(34, 7, frame.area());
    frame.render_widget(Clear, area);

    let mut lines: Vec<Line> = LOGO
        .iter()
        .map(|row| Line::from(Span::styled(*row, styles::title_style())))
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Loading...", styles::muted_style())));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(
        Paragraph::new(lines).block(block).alignment(Alignment::Center),
        area,
    );
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = "  authgate";
    let route = app.current_route().map(|r| r.title()).unwrap_or_default();

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat(
            (area.width as usize).saturating_sub(title.len() + route.len() + 4),
        )),
        Span::styled(route, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(title_line).block(block), area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let left_text = match (&app.status_message, &app.auth.session) {
        (Some(msg), _) => format!(" {} ", msg),
        (None, Some(user)) => format!(" Signed in as {} ", user.email),
        (None, None) => " Signed out ".to_string(),
    };

    let shortcuts = match app.current_route() {
        Some(Route::SignIn) => "[Tab] next field | [Enter] select | [Esc] quit",
        Some(Route::SignUp) => "[Enter] back | [q]uit",
        Some(Route::Home) => "[s]ign out | [q]uit",
        None => "",
    };
    let right_text = format!(" {} ", shortcuts);

    let padding_len = (area.width as usize)
        .saturating_sub(left_text.chars().count())
        .saturating_sub(right_text.chars().count());
    let status_line = Line::from(vec![
        Span::styled(left_text, styles::muted_style()),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);

    frame.render_widget(
        Paragraph::new(status_line).style(styles::status_bar_style()),
        area,
    );
}

/// Create a centered rectangle with fixed dimensions
pub fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(46, 9, frame.area());
    frame.render_widget(Clear, area);

    let mut lines: Vec<Line> = LOGO
        .iter()
        .map(|row| Line::from(Span::styled(*row, styles::title_style())))
        .collect();
    lines.extend([
        Line::from(""),
        Line::from(Span::styled(
            "Are you sure you want to quit?",
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to quit, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(
        Paragraph::new(lines).block(block).alignment(Alignment::Center),
        area,
    );
}
