use ratatui::style::Color;

/// Light or dark palette selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeMode {
    #[default]
    Dark,
    Light,
}

impl ThemeMode {
    /// Parse the `ui.theme` setting, unknown names fall back to dark
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "light" | "gruvbox-light" => Self::Light,
            _ => Self::Dark,
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }
}

/// Runtime theme colors
#[derive(Debug, Clone)]
pub struct Theme {
    pub mode: ThemeMode,

    // Background colors
    pub bg0: Color,
    pub bg1: Color,
    pub bg2: Color,

    // Foreground colors
    pub fg0: Color,
    pub fg1: Color,
    pub grey0: Color,
    pub grey1: Color,

    // Palette colors
    pub yellow: Color,
    pub green: Color,
    pub aqua: Color,
    pub blue: Color,
    pub purple: Color,

    // Semantic colors
    pub selection: Color,
    pub error: Color,
    pub accent: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    pub fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Dark => Self::dark(),
            ThemeMode::Light => Self::light(),
        }
    }

    /// Gruvbox Material dark
    pub fn dark() -> Self {
        Self {
            mode: ThemeMode::Dark,
            bg0: Color::Rgb(0x28, 0x28, 0x28),
            bg1: Color::Rgb(0x32, 0x30, 0x2f),
            bg2: Color::Rgb(0x45, 0x40, 0x3d),
            fg0: Color::Rgb(0xd4, 0xbe, 0x98),
            fg1: Color::Rgb(0xdd, 0xc7, 0xa1),
            grey0: Color::Rgb(0x7c, 0x6f, 0x64),
            grey1: Color::Rgb(0x92, 0x83, 0x74),
            yellow: Color::Rgb(0xd8, 0xa6, 0x57),
            green: Color::Rgb(0xa9, 0xb6, 0x65),
            aqua: Color::Rgb(0x89, 0xb4, 0x82),
            blue: Color::Rgb(0x7d, 0xae, 0xa3),
            purple: Color::Rgb(0xd3, 0x86, 0x9b),
            selection: Color::Rgb(0x45, 0x40, 0x3d),
            error: Color::Rgb(0xea, 0x69, 0x62),
            accent: Color::Rgb(0x89, 0xb4, 0x82),
        }
    }

    /// Gruvbox Material light
    pub fn light() -> Self {
        Self {
            mode: ThemeMode::Light,
            bg0: Color::Rgb(0xfb, 0xf1, 0xc7),
            bg1: Color::Rgb(0xf4, 0xe8, 0xbe),
            bg2: Color::Rgb(0xeb, 0xdb, 0xb2),
            fg0: Color::Rgb(0x65, 0x47, 0x35),
            fg1: Color::Rgb(0x4f, 0x38, 0x29),
            grey0: Color::Rgb(0xa8, 0x99, 0x84),
            grey1: Color::Rgb(0x92, 0x83, 0x74),
            yellow: Color::Rgb(0xb4, 0x71, 0x09),
            green: Color::Rgb(0x6c, 0x78, 0x2e),
            aqua: Color::Rgb(0x4c, 0x7a, 0x5d),
            blue: Color::Rgb(0x45, 0x70, 0x7a),
            purple: Color::Rgb(0x94, 0x5e, 0x80),
            selection: Color::Rgb(0xeb, 0xdb, 0xb2),
            error: Color::Rgb(0xc1, 0x4a, 0x4a),
            accent: Color::Rgb(0x4c, 0x7a, 0x5d),
        }
    }

    pub fn toggled(&self) -> Self {
        Self::for_mode(self.mode.toggle())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_name() {
        assert_eq!(ThemeMode::from_name("light"), ThemeMode::Light);
        assert_eq!(ThemeMode::from_name(" Dark "), ThemeMode::Dark);
        assert_eq!(ThemeMode::from_name("solarized"), ThemeMode::Dark);
    }

    #[test]
    fn test_toggle_round_trip() {
        let theme = Theme::default();
        assert_eq!(theme.mode, ThemeMode::Dark);
        let light = theme.toggled();
        assert_eq!(light.mode, ThemeMode::Light);
        assert_eq!(light.bg0, Theme::light().bg0);
        assert_eq!(light.toggled().mode, ThemeMode::Dark);
    }
}
