pub mod preferences;
pub mod theme;

pub use preferences::{
    Preferences, PreferencesError, PreferencesStore, FONT_CHOICES, FONT_SIZE_RANGE, SETTINGS_FILE,
};
pub use theme::{Color, ColorParseError, ThemePreset, BUILTIN_THEMES};
