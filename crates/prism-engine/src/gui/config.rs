use std::path::{Path, PathBuf};

use crate::paint::Color;

/// Environment variable consulted for a font file when none is configured.
pub const FONT_ENV_VAR: &str = "PRISM_FONT";

/// Fonts tried, in order, after the explicit path and the environment.
const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\segoeui.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

#[derive(Debug, Clone)]
pub struct GuiStyle {
    pub font_size: f32,
    pub padding: f32,
    pub spacing: f32,
    /// Fraction of the content width given to a widget's label.
    pub label_fraction: f32,
    pub panel_bg: Color,
    pub title_bg: Color,
    pub widget_bg: Color,
    pub widget_hover: Color,
    pub accent: Color,
    pub text: Color,
}

impl Default for GuiStyle {
    fn default() -> Self {
        Self {
            font_size: 14.0,
            padding: 6.0,
            spacing: 4.0,
            label_fraction: 0.4,
            panel_bg: Color::from_srgb_u8(24, 26, 32, 230),
            title_bg: Color::from_srgb_u8(41, 74, 122, 255),
            widget_bg: Color::from_srgb_u8(50, 54, 64, 255),
            widget_hover: Color::from_srgb_u8(66, 72, 86, 255),
            accent: Color::from_srgb_u8(66, 150, 250, 255),
            text: Color::from_srgb_u8(235, 235, 235, 255),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct GuiConfig {
    pub font_path: Option<PathBuf>,
    pub style: GuiStyle,
}

impl GuiConfig {
    /// First existing font file among the candidates.
    pub fn resolve_font(&self) -> Option<PathBuf> {
        let env = std::env::var_os(FONT_ENV_VAR).map(PathBuf::from);
        font_candidates(self.font_path.as_deref(), env.as_deref())
            .into_iter()
            .find(|p| p.is_file())
    }
}

/// Font paths in lookup order: explicit, then environment, then the system
/// list.
pub fn font_candidates(explicit: Option<&Path>, env: Option<&Path>) -> Vec<PathBuf> {
    explicit
        .into_iter()
        .chain(env)
        .map(Path::to_path_buf)
        .chain(SYSTEM_FONTS.iter().map(PathBuf::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_path_comes_first() {
        let c = font_candidates(Some(Path::new("a.ttf")), Some(Path::new("b.ttf")));
        assert_eq!(c[0], PathBuf::from("a.ttf"));
        assert_eq!(c[1], PathBuf::from("b.ttf"));
        assert_eq!(c.len(), SYSTEM_FONTS.len() + 2);
    }

    #[test]
    fn system_fonts_without_overrides() {
        let c = font_candidates(None, None);
        assert_eq!(c.len(), SYSTEM_FONTS.len());
        assert_eq!(c[0], PathBuf::from(SYSTEM_FONTS[0]));
    }

    #[test]
    fn missing_explicit_font_is_skipped() {
        let config = GuiConfig {
            font_path: Some(PathBuf::from("/nonexistent/prism.ttf")),
            ..Default::default()
        };
        assert_ne!(config.resolve_font(), Some(PathBuf::from("/nonexistent/prism.ttf")));
    }
}
