//! Terminal styling for user-facing messages.
//!
//! Everything here is a pure function from a [`Style`] and some text to a
//! `String`; nothing is printed and no state is shared.

/// Width of the horizontal rules framing each message.
pub const RULE_WIDTH: usize = 80;

pub const RESET: &str = "\x1b[0m";

/// 256-colour foreground styles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Cyan,
    Purple,
    Pink,
    Teal,
}

impl Style {
    pub const fn code(self) -> &'static str {
        match self {
            Style::Red => "\x1b[38;5;196m",
            Style::Orange => "\x1b[38;5;208m",
            Style::Yellow => "\x1b[38;5;214m",
            Style::Green => "\x1b[38;5;46m",
            Style::Blue => "\x1b[38;5;27m",
            Style::Cyan => "\x1b[38;5;51m",
            Style::Purple => "\x1b[38;5;105m",
            Style::Pink => "\x1b[38;5;45m",
            Style::Teal => "\x1b[38;5;87m",
        }
    }
}

/// Wrap `text` in the style's escape code and a reset.
pub fn paint(style: Style, text: &str) -> String {
    format!("{}{}{}", style.code(), text, RESET)
}

/// A two-line horizontal rule (lower then upper block characters).
pub fn rule(style: Style) -> String {
    format!(
        "{}\n{}",
        paint(style, &"▁".repeat(RULE_WIDTH)),
        paint(style, &"▔".repeat(RULE_WIDTH))
    )
}

/// A message framed by a cyan rule above and a green rule below.
pub fn banner(style: Style, message: &str) -> String {
    format!("{}\n{}\n{}", rule(Style::Cyan), paint(style, message), rule(Style::Green))
}

pub fn error_banner(message: &str) -> String {
    banner(Style::Red, &format!("❌ Error: {}", message))
}
