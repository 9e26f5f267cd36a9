use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// 1-based ordinal in the application tab row.
    SwitchApp(u8),
    RailUp,
    RailDown,
    OpenSelected,
    HistoryBack,
    HistoryForward,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeymapPreset {
    Default,
    Emacs,
}

impl KeymapPreset {
    pub fn parse(value: &str) -> Self {
        match value {
            "emacs" => Self::Emacs,
            _ => Self::Default,
        }
    }
}

pub fn map_key(key: KeyEvent, preset: KeymapPreset) -> Option<Command> {
    if let KeyCode::Char(digit @ '1'..='9') = key.code
        && key.modifiers.is_empty()
    {
        return Some(Command::SwitchApp(digit as u8 - b'0'));
    }

    match preset {
        KeymapPreset::Default => map_key_default(key),
        KeymapPreset::Emacs => map_key_emacs(key),
    }
}

fn map_key_default(key: KeyEvent) -> Option<Command> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('o') => Some(Command::HistoryBack),
            KeyCode::Char('i') => Some(Command::HistoryForward),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char('j') | KeyCode::Down => Some(Command::RailDown),
        KeyCode::Char('k') | KeyCode::Up => Some(Command::RailUp),
        KeyCode::Char('l') | KeyCode::Enter => Some(Command::OpenSelected),
        KeyCode::Backspace => Some(Command::HistoryBack),
        KeyCode::Char('q') => Some(Command::Quit),
        _ => None,
    }
}

fn map_key_emacs(key: KeyEvent) -> Option<Command> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('n') => Some(Command::RailDown),
            KeyCode::Char('p') => Some(Command::RailUp),
            KeyCode::Char('m') => Some(Command::OpenSelected),
            KeyCode::Char('o') => Some(Command::HistoryBack),
            KeyCode::Char('i') => Some(Command::HistoryForward),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Down => Some(Command::RailDown),
        KeyCode::Up => Some(Command::RailUp),
        KeyCode::Enter => Some(Command::OpenSelected),
        KeyCode::Char('q') => Some(Command::Quit),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use super::{Command, KeymapPreset, map_key};

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn preset_parse_defaults_unknown_names() {
        assert_eq!(KeymapPreset::parse("emacs"), KeymapPreset::Emacs);
        assert_eq!(KeymapPreset::parse("vi"), KeymapPreset::Default);
    }

    #[test]
    fn digits_switch_applications_in_both_presets() {
        for preset in [KeymapPreset::Default, KeymapPreset::Emacs] {
            assert_eq!(
                map_key(key(KeyCode::Char('2'), KeyModifiers::NONE), preset),
                Some(Command::SwitchApp(2))
            );
        }
    }

    #[test]
    fn history_traversal_uses_control_chords() {
        assert_eq!(
            map_key(
                key(KeyCode::Char('o'), KeyModifiers::CONTROL),
                KeymapPreset::Default
            ),
            Some(Command::HistoryBack)
        );
        assert_eq!(
            map_key(
                key(KeyCode::Char('i'), KeyModifiers::CONTROL),
                KeymapPreset::Emacs
            ),
            Some(Command::HistoryForward)
        );
    }
}
