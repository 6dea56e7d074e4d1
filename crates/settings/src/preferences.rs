use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::ops::Range;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// 設定檔的固定相對位置。 / Fixed relative location of the settings record.
pub const SETTINGS_FILE: &str = "settings.json";

/// 字型選單提供的候選清單。 / Candidate list offered by the font picker.
pub const FONT_CHOICES: [&str; 5] = [
    "Arial",
    "Courier New",
    "Times New Roman",
    "Verdana",
    "Helvetica",
];

/// 字級選單提供的整數範圍。 / Integer range offered by the font-size picker.
pub const FONT_SIZE_RANGE: Range<u32> = 8..30;

#[derive(Debug, Error)]
pub enum PreferencesError {
    #[error("failed to serialize settings {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write settings {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to prepare directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default = "default_font")]
    pub font: String,
    #[serde(default = "default_font_size")]
    pub font_size: u32,
    #[serde(default = "default_bg_color")]
    pub bg_color: String,
    #[serde(default = "default_fg_color")]
    pub fg_color: String,
}

fn default_font() -> String {
    "Arial".to_string()
}

fn default_font_size() -> u32 {
    14
}

fn default_bg_color() -> String {
    "white".to_string()
}

fn default_fg_color() -> String {
    "black".to_string()
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            font: default_font(),
            font_size: default_font_size(),
            bg_color: default_bg_color(),
            fg_color: default_fg_color(),
        }
    }
}

impl Preferences {
    pub fn sanitize(&mut self) {
        if self.font.trim().is_empty() {
            self.font = default_font();
        }
        if self.font_size == 0 {
            self.font_size = default_font_size();
        }
        self.font_size = self.font_size.clamp(8, 96);
        if self.bg_color.trim().is_empty() {
            self.bg_color = default_bg_color();
        }
        if self.fg_color.trim().is_empty() {
            self.fg_color = default_fg_color();
        }
    }
}

/// 管理設定檔的持久化儲存。 / Owns the single on-disk settings record.
#[derive(Debug)]
pub struct PreferencesStore {
    path: PathBuf,
    data: Preferences,
}

impl PreferencesStore {
    pub fn new(path: impl Into<PathBuf>, preferences: Preferences) -> Self {
        Self {
            path: path.into(),
            data: preferences,
        }
    }

    /// 從磁碟載入設定；檔案不存在或內容損毀時改用預設值，不回報錯誤。 /
    /// Loads settings from disk; a missing or corrupt record yields defaults, never an error.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let mut data = fs::read_to_string(&path)
            .ok()
            .and_then(|contents| serde_json::from_str::<Preferences>(&contents).ok())
            .unwrap_or_default();
        data.sanitize();
        Self { path, data }
    }

    pub fn preferences(&self) -> &Preferences {
        &self.data
    }

    pub fn preferences_mut(&mut self) -> &mut Preferences {
        &mut self.data
    }

    pub fn update<F>(&mut self, mut op: F) -> Result<(), PreferencesError>
    where
        F: FnMut(&mut Preferences),
    {
        op(&mut self.data);
        self.data.sanitize();
        self.save()
    }

    /// 將完整設定寫回磁碟；每次都覆寫整份紀錄而非差異。 /
    /// Persists the full current record, overwriting the stored copy in one piece.
    pub fn save(&self) -> Result<(), PreferencesError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| PreferencesError::CreateDir {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }
        let payload = serde_json::to_string_pretty(&self.data).map_err(|source| {
            PreferencesError::Serialize {
                path: self.path.clone(),
                source,
            }
        })?;

        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, payload.as_bytes()).map_err(|source| PreferencesError::Write {
            path: tmp_path.clone(),
            source,
        })?;
        fs::rename(&tmp_path, &self.path).map_err(|source| PreferencesError::Write {
            path: self.path.clone(),
            source,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
