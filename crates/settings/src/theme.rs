use thiserror::Error;

use crate::preferences::Preferences;

/// 主題預設集：一個名稱配上一組背景/前景顏色。 /
/// A theme preset: a name bundled with a background/foreground color pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemePreset {
    pub name: &'static str,
    pub bg_color: &'static str,
    pub fg_color: &'static str,
}

/// 僅有的三個內建主題；主題選單只提供這些。 /
/// The only three builtin themes; the theme picker offers nothing else.
pub const BUILTIN_THEMES: [ThemePreset; 3] = [
    ThemePreset {
        name: "Light",
        bg_color: "white",
        fg_color: "black",
    },
    ThemePreset {
        name: "Dark",
        bg_color: "black",
        fg_color: "white",
    },
    ThemePreset {
        name: "Solarized",
        bg_color: "#fdf6e3",
        fg_color: "#657b83",
    },
];

impl ThemePreset {
    pub fn by_name(name: &str) -> Option<&'static ThemePreset> {
        BUILTIN_THEMES.iter().find(|preset| preset.name == name)
    }
}

impl Preferences {
    /// 套用主題會覆寫對應的顏色鍵；字型設定不受影響。 /
    /// Applying a theme overwrites the color keys; font settings are untouched.
    pub fn apply_theme(&mut self, preset: &ThemePreset) {
        self.bg_color = preset.bg_color.to_string();
        self.fg_color = preset.fg_color.to_string();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("unknown color name: {0}")]
    UnknownName(String),
    #[error("hex color must have 6 or 8 digits")]
    InvalidLength,
    #[error("hex color contains non-hexadecimal digits")]
    InvalidHex,
}

impl Color {
    const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// 解析 `#rrggbb`/`#rrggbbaa` 十六進位或常用顏色名稱。 /
    /// Parses `#rrggbb`/`#rrggbbaa` hex notation or a small set of common color names.
    pub fn parse(input: &str) -> Result<Self, ColorParseError> {
        let trimmed = input.trim();
        if let Some(hex) = trimmed.strip_prefix('#') {
            return parse_hex(hex);
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "white" => Ok(Color::opaque(255, 255, 255)),
            "black" => Ok(Color::opaque(0, 0, 0)),
            "gray" | "grey" => Ok(Color::opaque(128, 128, 128)),
            "red" => Ok(Color::opaque(255, 0, 0)),
            "green" => Ok(Color::opaque(0, 128, 0)),
            "blue" => Ok(Color::opaque(0, 0, 255)),
            other => Err(ColorParseError::UnknownName(other.to_string())),
        }
    }
}

fn parse_hex(hex: &str) -> Result<Color, ColorParseError> {
    // 先排除非 ASCII 輸入，位元組切片才不會落在字元中間。 /
    // Reject non-ASCII input first so the byte slicing below cannot split a character.
    if !hex.is_ascii() {
        return Err(ColorParseError::InvalidHex);
    }
    if hex.len() != 6 && hex.len() != 8 {
        return Err(ColorParseError::InvalidLength);
    }
    let mut rgba = [0u8; 4];
    for i in 0..(hex.len() / 2) {
        let start = i * 2;
        let slice = &hex[start..start + 2];
        rgba[i] = u8::from_str_radix(slice, 16).map_err(|_| ColorParseError::InvalidHex)?;
    }
    if hex.len() == 6 {
        rgba[3] = 255;
    }
    Ok(Color {
        r: rgba[0],
        g: rgba[1],
        b: rgba[2],
        a: rgba[3],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dark_preset_swaps_background_and_foreground() {
        let mut prefs = Preferences::default();
        prefs.apply_theme(ThemePreset::by_name("Dark").unwrap());
        assert_eq!(prefs.bg_color, "black");
        assert_eq!(prefs.fg_color, "white");
        assert_eq!(prefs.font, "Arial");
    }

    #[test]
    fn solarized_preset_uses_hex_colors() {
        let preset = ThemePreset::by_name("Solarized").unwrap();
        assert_eq!(preset.bg_color, "#fdf6e3");
        assert_eq!(preset.fg_color, "#657b83");
        assert!(Color::parse(preset.bg_color).is_ok());
        assert!(Color::parse(preset.fg_color).is_ok());
    }

    #[test]
    fn by_name_rejects_unknown_themes() {
        assert!(ThemePreset::by_name("Sepia").is_none());
    }

    #[test]
    fn parse_accepts_six_and_eight_digit_hex() {
        let color = Color::parse("#fdf6e3").unwrap();
        assert_eq!((color.r, color.g, color.b, color.a), (0xFD, 0xF6, 0xE3, 255));

        let color = Color::parse("#11223344").unwrap();
        assert_eq!(color.a, 0x44);
    }

    #[test]
    fn parse_accepts_named_colors_case_insensitively() {
        assert_eq!(Color::parse("White").unwrap(), Color::opaque(255, 255, 255));
        assert_eq!(Color::parse("black").unwrap(), Color::opaque(0, 0, 0));
    }

    #[test]
    fn parse_rejects_multibyte_hex_without_panicking() {
        // 設定檔可能被手改出多位元組字元，解析必須回傳錯誤而非 panic。 /
        // A hand-edited settings file can contain multibyte characters; parsing
        // must return an error instead of panicking.
        assert_eq!(
            Color::parse("#ab€c").unwrap_err(),
            ColorParseError::InvalidHex
        );
        assert_eq!(
            Color::parse("#€€€€€€").unwrap_err(),
            ColorParseError::InvalidHex
        );
    }

    #[test]
    fn parse_rejects_invalid_input() {
        assert_eq!(
            Color::parse("#123").unwrap_err(),
            ColorParseError::InvalidLength
        );
        assert_eq!(
            Color::parse("#12345g").unwrap_err(),
            ColorParseError::InvalidHex
        );
        assert!(matches!(
            Color::parse("chartreuse").unwrap_err(),
            ColorParseError::UnknownName(_)
        ));
    }
}
