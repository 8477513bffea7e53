// ABOUTME: Color themes for the dashboard, resolved once from config and passed to every component

use ratatui::style::Color;

pub const DEFAULT_THEME: &str = "slate";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub name: &'static str,
    pub header_bg: Color,
    pub panel_bg: Color,
    pub border: Color,
    pub text: Color,
    pub muted: Color,
    pub accent: Color,
    pub selected_bg: Color,
    pub selected_fg: Color,
    pub attached: Color,
    pub detached: Color,
}

const fn rgb(hex: u32) -> Color {
    Color::Rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
}

pub const THEMES: [Theme; 9] = [
    Theme {
        name: "slate",
        header_bg: rgb(0x1E293B),
        panel_bg: rgb(0x1E293B),
        border: rgb(0x334155),
        text: rgb(0xCBD5E1),
        muted: rgb(0x64748B),
        accent: rgb(0x06B6D4),
        selected_bg: rgb(0x06B6D4),
        selected_fg: rgb(0x0F172A),
        attached: rgb(0x10B981),
        detached: rgb(0xF59E0B),
    },
    Theme {
        name: "pink",
        header_bg: rgb(0x2A0A29),
        panel_bg: rgb(0x2A0A29),
        border: rgb(0x5A1A59),
        text: rgb(0xFAD4F9),
        muted: rgb(0x8A5A89),
        accent: rgb(0xFF00FF),
        selected_bg: rgb(0xFF00FF),
        selected_fg: rgb(0x2A0A29),
        attached: rgb(0x00FFAA),
        detached: rgb(0xFFAA00),
    },
    Theme {
        name: "forest",
        header_bg: rgb(0x1A2A1A),
        panel_bg: rgb(0x1A2A1A),
        border: rgb(0x3A5A3A),
        text: rgb(0xD4FAD4),
        muted: rgb(0x5A8A5A),
        accent: rgb(0x00FF00),
        selected_bg: rgb(0x00FF00),
        selected_fg: rgb(0x1A2A1A),
        attached: rgb(0x00FFAA),
        detached: rgb(0xFFAA00),
    },
    Theme {
        name: "mellow",
        header_bg: rgb(0xF0F8FF),
        panel_bg: rgb(0xF8F8FF),
        border: rgb(0xADD8E6),
        text: rgb(0x4682B4),
        muted: rgb(0x87CEEB),
        accent: rgb(0x6A5ACD),
        selected_bg: rgb(0xB0C4DE),
        selected_fg: rgb(0x191970),
        attached: rgb(0x32CD32),
        detached: rgb(0xFFD700),
    },
    Theme {
        name: "arctic",
        header_bg: rgb(0xE0FFFF),
        panel_bg: rgb(0xF0FFFF),
        border: rgb(0xB0E0E6),
        text: rgb(0x2F4F4F),
        muted: rgb(0x696969),
        accent: rgb(0x4682B4),
        selected_bg: rgb(0x87CEFA),
        selected_fg: rgb(0x1C1C1C),
        attached: rgb(0x5F9EA0),
        detached: rgb(0xFFA07A),
    },
    Theme {
        name: "solarized",
        header_bg: rgb(0x002B36),
        panel_bg: rgb(0x073642),
        border: rgb(0x586E75),
        text: rgb(0x839496),
        muted: rgb(0x657B83),
        accent: rgb(0x268BD2),
        selected_bg: rgb(0x2AA198),
        selected_fg: rgb(0x002B36),
        attached: rgb(0x859900),
        detached: rgb(0xB58900),
    },
    Theme {
        name: "dracula",
        header_bg: rgb(0x282A36),
        panel_bg: rgb(0x282A36),
        border: rgb(0x44475A),
        text: rgb(0xF8F8F2),
        muted: rgb(0x6272A4),
        accent: rgb(0xBD93F9),
        selected_bg: rgb(0xFF79C6),
        selected_fg: rgb(0x282A36),
        attached: rgb(0x50FA7B),
        detached: rgb(0xF1FA8C),
    },
    Theme {
        name: "gruvbox",
        header_bg: rgb(0x282828),
        panel_bg: rgb(0x3C3836),
        border: rgb(0x504945),
        text: rgb(0xEBDBB2),
        muted: rgb(0x928374),
        accent: rgb(0xFABD2F),
        selected_bg: rgb(0xFE8019),
        selected_fg: rgb(0x282828),
        attached: rgb(0xB8BB26),
        detached: rgb(0xD65D0E),
    },
    Theme {
        name: "nord",
        header_bg: rgb(0x2E3440),
        panel_bg: rgb(0x3B4252),
        border: rgb(0x4C566A),
        text: rgb(0xD8DEE9),
        muted: rgb(0x4C566A),
        accent: rgb(0x88C0D0),
        selected_bg: rgb(0x81A1C1),
        selected_fg: rgb(0x2E3440),
        attached: rgb(0xA3BE8C),
        detached: rgb(0xEBCB8B),
    },
];

impl Theme {
    pub fn by_name(name: &str) -> Option<Self> {
        THEMES.iter().copied().find(|theme| theme.name == name)
    }

    /// Unknown names fall back to the default theme.
    pub fn resolve(name: &str) -> Self {
        Self::by_name(name).unwrap_or(THEMES[0])
    }

    pub fn names() -> Vec<&'static str> {
        THEMES.iter().map(|theme| theme.name).collect()
    }
}

impl Default for Theme {
    fn default() -> Self {
        THEMES[0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_theme_is_first() {
        assert_eq!(Theme::default().name, DEFAULT_THEME);
        assert_eq!(Theme::resolve("does-not-exist").name, DEFAULT_THEME);
    }

    #[test]
    fn test_rgb_decoding() {
        assert_eq!(rgb(0x1E293B), Color::Rgb(0x1E, 0x29, 0x3B));
    }

    #[test]
    fn test_all_theme_names_resolve() {
        for name in Theme::names() {
            assert_eq!(Theme::resolve(name).name, name);
        }
        assert_eq!(Theme::names().len(), 9);
    }
}
