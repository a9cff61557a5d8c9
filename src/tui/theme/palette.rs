//! UI colors. Swatch colors come from the palette itself, not from here.

use ratatui::style::Color;

#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub bg_primary: Color,
    pub bg_highlight: Color,
    pub fg_primary: Color,
    pub fg_secondary: Color,
    pub accent: Color,
    pub accent_alt: Color,
    pub border: Color,
    pub success: Color,
    pub error: Color,
}

impl Palette {
    pub const DARK: Self = Self {
        bg_primary: Color::Rgb(0, 0, 0),          // #000000
        bg_highlight: Color::Rgb(48, 48, 48),    // #303030
        fg_primary: Color::Rgb(255, 255, 255),   // #ffffff
        fg_secondary: Color::Rgb(136, 136, 136), // #888888
        accent: Color::Rgb(255, 255, 255),       // #ffffff
        accent_alt: Color::Rgb(200, 200, 200),   // #c8c8c8
        border: Color::Rgb(64, 64, 64),          // #404040
        success: Color::Rgb(152, 255, 152),      // #98ff98 mint
        error: Color::Rgb(255, 105, 97),         // #ff6961
    };

    pub const LIGHT: Self = Self {
        bg_primary: Color::Rgb(255, 255, 255),   // #ffffff
        bg_highlight: Color::Rgb(224, 224, 224), // #e0e0e0
        fg_primary: Color::Rgb(17, 17, 17),      // #111111
        fg_secondary: Color::Rgb(110, 110, 110), // #6e6e6e
        accent: Color::Rgb(0, 0, 0),             // #000000
        accent_alt: Color::Rgb(60, 60, 60),      // #3c3c3c
        border: Color::Rgb(190, 190, 190),       // #bebebe
        success: Color::Rgb(34, 139, 34),        // #228b22
        error: Color::Rgb(200, 30, 30),          // #c81e1e
    };
}
