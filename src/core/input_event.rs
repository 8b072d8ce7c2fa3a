//! Logical input events decoded from raw terminal sequences.

const CTRL_C: &str = "\x03";
const ESC: &str = "\x1b";

/// One decoded unit of keyboard input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogicalEvent {
    /// `0`-`9`.
    Digit(u8),
    /// Any other printable character.
    Char(char),
    Left,
    Right,
    Up,
    Down,
    /// Carriage return or line feed.
    Enter,
    Backspace,
    /// A lone ESC, or ESC followed by an unrecognized sequence.
    Cancel,
    /// Ctrl+C, an external SIGINT/SIGTERM, or end of input.
    Interrupt,
    /// Anything else; callers ignore it.
    Unknown(String),
}

impl LogicalEvent {
    /// Character this event contributes to a free-text line, if any.
    pub fn as_text_char(&self) -> Option<char> {
        match self {
            LogicalEvent::Digit(digit) => char::from_digit(u32::from(*digit), 10),
            LogicalEvent::Char(ch) => Some(*ch),
            _ => None,
        }
    }

    /// Lower-cased letter for case-insensitive key bindings.
    pub fn letter(&self) -> Option<char> {
        match self {
            LogicalEvent::Char(ch) if ch.is_alphabetic() => ch.to_lowercase().next(),
            _ => None,
        }
    }
}

/// Decodes one complete sequence produced by
/// [`StdinBuffer`](crate::platform::stdin_buffer::StdinBuffer).
pub fn parse_logical_event(sequence: &str) -> LogicalEvent {
    match sequence {
        CTRL_C => return LogicalEvent::Interrupt,
        "\r" | "\n" | "\r\n" => return LogicalEvent::Enter,
        "\x7f" | "\x08" => return LogicalEvent::Backspace,
        ESC => return LogicalEvent::Cancel,
        "\x1b[D" | "\x1bOD" => return LogicalEvent::Left,
        "\x1b[C" | "\x1bOC" => return LogicalEvent::Right,
        "\x1b[A" | "\x1bOA" => return LogicalEvent::Up,
        "\x1b[B" | "\x1bOB" => return LogicalEvent::Down,
        _ => {}
    }

    if sequence.starts_with(ESC) {
        // Any other escape-led sequence counts as a cancel keystroke only
        // when it is ESC plus a single printable byte (Alt+key). Longer
        // CSI/SS3 sequences are keys we have no binding for.
        let tail = &sequence[ESC.len()..];
        let mut chars = tail.chars();
        return match (chars.next(), chars.next()) {
            (Some(ch), None) if ch != '[' && ch != 'O' => LogicalEvent::Cancel,
            _ => LogicalEvent::Unknown(sequence.to_string()),
        };
    }

    let mut chars = sequence.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) if ch.is_ascii_digit() => LogicalEvent::Digit(ch as u8 - b'0'),
        (Some(ch), None) if !ch.is_control() => LogicalEvent::Char(ch),
        _ => LogicalEvent::Unknown(sequence.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_logical_event, LogicalEvent};

    #[test]
    fn decodes_digits_and_letters() {
        assert_eq!(parse_logical_event("0"), LogicalEvent::Digit(0));
        assert_eq!(parse_logical_event("7"), LogicalEvent::Digit(7));
        assert_eq!(parse_logical_event("q"), LogicalEvent::Char('q'));
        assert_eq!(parse_logical_event("é"), LogicalEvent::Char('é'));
        assert_eq!(parse_logical_event(" "), LogicalEvent::Char(' '));
    }

    #[test]
    fn decodes_control_keys() {
        assert_eq!(parse_logical_event("\r"), LogicalEvent::Enter);
        assert_eq!(parse_logical_event("\n"), LogicalEvent::Enter);
        assert_eq!(parse_logical_event("\x03"), LogicalEvent::Interrupt);
        assert_eq!(parse_logical_event("\x7f"), LogicalEvent::Backspace);
        assert_eq!(parse_logical_event("\x1b"), LogicalEvent::Cancel);
    }

    #[test]
    fn decodes_arrows_in_both_cursor_modes() {
        assert_eq!(parse_logical_event("\x1b[D"), LogicalEvent::Left);
        assert_eq!(parse_logical_event("\x1b[C"), LogicalEvent::Right);
        assert_eq!(parse_logical_event("\x1bOD"), LogicalEvent::Left);
        assert_eq!(parse_logical_event("\x1bOC"), LogicalEvent::Right);
        assert_eq!(parse_logical_event("\x1b[A"), LogicalEvent::Up);
    }

    #[test]
    fn unbound_sequences_are_unknown() {
        assert_eq!(
            parse_logical_event("\x1b[3~"),
            LogicalEvent::Unknown("\x1b[3~".to_string())
        );
        assert_eq!(
            parse_logical_event("\x01"),
            LogicalEvent::Unknown("\x01".to_string())
        );
        assert_eq!(parse_logical_event("\x1bx"), LogicalEvent::Cancel);
    }

    #[test]
    fn letter_is_lowercased() {
        assert_eq!(LogicalEvent::Char('Y').letter(), Some('y'));
        assert_eq!(LogicalEvent::Digit(1).letter(), None);
        assert_eq!(LogicalEvent::Digit(4).as_text_char(), Some('4'));
    }
}
