use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, SignInFocus};
use crate::ui::render::centered_rect_fixed;
use crate::ui::styles;

/// Visible width of the text fields
const FIELD_WIDTH: usize = 24;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let height = if app.sign_in_error.is_some() { 15 } else { 13 };
    let area = centered_rect_fixed(46, height, area);

    frame.render_widget(Clear, area);

    let mut lines = vec![
        Line::from(Span::styled("Sign In", styles::title_style())),
        Line::from(Span::styled("authgate / sign-in", styles::muted_style())),
        Line::from(""),
    ];

    // Email field
    let email_focused = app.focus == SignInFocus::Email;
    let cursor = if email_focused { "▌" } else { "" };
    lines.push(Line::from(vec![
        Span::styled("Email:    [", styles::muted_style()),
        Span::styled(
            format!("{:<width$}{}", tail(&app.email, FIELD_WIDTH), cursor, width = FIELD_WIDTH),
            styles::field_style(email_focused),
        ),
        Span::styled("]", styles::muted_style()),
    ]));

    // Password field, masked
    let password_focused = app.focus == SignInFocus::Password;
    let cursor = if password_focused { "▌" } else { "" };
    let masked = "*".repeat(app.password.chars().count().min(FIELD_WIDTH));
    lines.push(Line::from(vec![
        Span::styled("Password: [", styles::muted_style()),
        Span::styled(
            format!("{:<width$}{}", masked, cursor, width = FIELD_WIDTH),
            styles::field_style(password_focused),
        ),
        Span::styled("]", styles::muted_style()),
    ]));

    // Submit button
    lines.push(Line::from(""));
    let button_focused = app.focus == SignInFocus::Button;
    let label = match (app.is_submitting, button_focused) {
        (true, _) => "  Signing in...  ",
        (false, true) => "  ▶ Sign In ◀  ",
        (false, false) => "    Sign In    ",
    };
    lines.push(Line::from(Span::styled(
        label,
        styles::button_style(button_focused, app.is_submitting),
    )));

    // Error message
    if let Some(ref error) = app.sign_in_error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(error.clone(), styles::error_style())));
    }

    // Link to sign-up
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Don't have an account? Sign up",
        styles::link_style(app.focus == SignInFocus::SignUpLink),
    )));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

/// Keep the end of long input visible
fn tail(text: &str, width: usize) -> String {
    let count = text.chars().count();
    text.chars().skip(count.saturating_sub(width)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tail() {
        assert_eq!(tail("abc", 5), "abc");
        assert_eq!(tail("abcdef", 3), "def");
        assert_eq!(tail("", 3), "");
    }
}
