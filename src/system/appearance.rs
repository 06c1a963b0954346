// src/system/appearance.rs

use crate::models::Theme;
use std::env;

/// The theme to render with: the stored preference, or the terminal's own when none is stored.
pub fn effective_theme(preference: Option<Theme>) -> Theme {
    preference.unwrap_or_else(|| {
        let detected = detect_terminal_theme(env::var("COLORFGBG").ok().as_deref());
        log::debug!("No stored theme; terminal suggests {:?}", detected);
        detected
    })
}

/// Reads the background color out of a `COLORFGBG` value (`"fg;bg"` or `"fg;default;bg"`).
///
/// Backgrounds 0-6 and 8 are the dark ANSI colors. Anything unreadable counts as light.
pub fn detect_terminal_theme(colorfgbg: Option<&str>) -> Theme {
    let background = colorfgbg
        .and_then(|value| value.rsplit(';').next())
        .and_then(|bg| bg.trim().parse::<u8>().ok());

    match background {
        Some(0..=6 | 8) => Theme::Dark,
        _ => Theme::Light,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_preference_wins() {
        assert_eq!(effective_theme(Some(Theme::Dark)), Theme::Dark);
        assert_eq!(effective_theme(Some(Theme::Light)), Theme::Light);
    }

    #[test]
    fn test_detect_terminal_theme() {
        assert_eq!(detect_terminal_theme(Some("15;0")), Theme::Dark);
        assert_eq!(detect_terminal_theme(Some("0;15")), Theme::Light);
        assert_eq!(detect_terminal_theme(Some("12;default;8")), Theme::Dark);
        assert_eq!(detect_terminal_theme(Some("garbage")), Theme::Light);
        assert_eq!(detect_terminal_theme(None), Theme::Light);
    }
}
