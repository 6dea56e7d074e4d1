use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

/// 文件載入或儲存時可能發生的錯誤。 / Errors that can occur while loading or saving a document.
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("file is not valid UTF-8 text")]
    InvalidUtf8,
    #[error("document has no associated path")]
    NoPath,
}

/// 以 UTF-8 純文字檔為後盾的文件記憶體模型。 /
/// In-memory representation of a text document backed by a plain UTF-8 text file.
#[derive(Debug, Clone)]
pub struct Document {
    path: Option<PathBuf>,
    contents: String,
    is_dirty: bool,
}

impl Document {
    /// 建立一個空內容且尚未儲存的文件。 / Creates an unsaved document with empty contents.
    pub fn new() -> Self {
        Self {
            path: None,
            contents: String::new(),
            is_dirty: false,
        }
    }

    /// 從磁碟載入文件；非 UTF-8 內容視為錯誤。 /
    /// Loads a document from disk; non-UTF-8 content is rejected.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path_ref = path.as_ref();
        let bytes = fs::read(path_ref)?;
        let contents = String::from_utf8(bytes).map_err(|_| DocumentError::InvalidUtf8)?;

        Ok(Self {
            path: Some(path_ref.to_path_buf()),
            contents,
            is_dirty: false,
        })
    }

    /// 將文件儲存至現有路徑；若尚未指定路徑則失敗。 /
    /// Saves the document to its current path; fails if no path is set.
    pub fn save(&mut self) -> Result<(), DocumentError> {
        let path = self.path.as_ref().ok_or(DocumentError::NoPath)?.to_path_buf();
        self.save_as(path)
    }

    /// 將文件另存為新路徑並採用該路徑。 /
    /// Saves the document to a new path and adopts it as the current one.
    pub fn save_as(&mut self, path: impl AsRef<Path>) -> Result<(), DocumentError> {
        let path_ref = path.as_ref();
        // 寫出時修掉尾端空白與換行；記憶體內容保持不變。 /
        // Trailing whitespace and newlines are trimmed on the way out; the buffer stays as-is.
        let payload = self.contents.trim_end();

        // 先寫入暫存檔再重新命名，避免出現部分寫入的情況。 /
        // Use a temporary file plus rename to guard against partial writes.
        let tmp_path = path_ref.with_extension("tmp_markpad");
        {
            let mut tmp_file = File::create(&tmp_path)?;
            tmp_file.write_all(payload.as_bytes())?;
            tmp_file.sync_all()?;
        }
        fs::rename(&tmp_path, path_ref).map_err(|err| {
            // 重新命名失敗時不要留下暫存檔。 / Do not leave the temp file behind when the rename fails.
            let _ = fs::remove_file(&tmp_path);
            err
        })?;

        // dirty 旗標只在寫入確定成功後清除。 / The dirty flag is cleared only after a confirmed write.
        self.path = Some(path_ref.to_path_buf());
        self.is_dirty = false;
        Ok(())
    }

    /// 取得目前文件內容。 / Returns the current document contents.
    pub fn contents(&self) -> &str {
        &self.contents
    }

    /// 提供編輯元件直接綁定的可變緩衝；變動後呼叫端必須 `mark_dirty`。 /
    /// Mutable buffer for direct widget binding; the caller pairs changes with `mark_dirty`.
    pub fn contents_mut(&mut self) -> &mut String {
        &mut self.contents
    }

    /// 以新文字取代記憶體內容並標記文件為已修改。 /
    /// Replaces the in-memory contents, marking the document as dirty.
    pub fn set_contents(&mut self, text: impl Into<String>) {
        self.contents = text.into();
        self.is_dirty = true;
    }

    /// 將文件標記為已修改。 / Marks the document as having unsaved changes.
    pub fn mark_dirty(&mut self) {
        self.is_dirty = true;
    }

    /// 判斷文件是否仍有未儲存變更。 / Returns whether the document has unsaved changes.
    pub fn is_dirty(&self) -> bool {
        self.is_dirty
    }

    /// 取得文件所屬的檔案路徑（若存在）。 / Retrieves the associated path if the document is linked to one.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// 回到初始狀態：清空內容、解除路徑、重設 dirty。 /
    /// Returns to the initial state: empty buffer, no path, clean.
    pub fn reset(&mut self) {
        self.path = None;
        self.contents.clear();
        self.is_dirty = false;
    }

    /// 狀態列顯示用的行數；空緩衝算一行，結尾換行開啟新的一行。 /
    /// Line count for the status bar; an empty buffer counts as one line and a
    /// trailing newline starts a new one.
    pub fn line_count(&self) -> usize {
        self.contents.matches('\n').count() + 1
    }

    /// 視窗標題顯示用的路徑文字。 / Path text used for the window title.
    pub fn display_name(&self) -> Option<String> {
        self.path
            .as_deref()
            .map(|path| path.display().to_string())
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed(path: &Path, bytes: &[u8]) {
        fs::write(path, bytes).expect("failed to seed test file");
    }

    #[test]
    fn new_document_is_empty_and_clean() {
        let doc = Document::new();
        assert_eq!(doc.contents(), "");
        assert!(doc.path().is_none());
        assert!(!doc.is_dirty());
        assert_eq!(doc.line_count(), 1);
    }

    #[test]
    fn open_loads_content_without_marking_dirty() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("notes.md");
        seed(&file_path, b"# Heading\n\nbody\n");

        let doc = Document::open(&file_path).unwrap();
        assert_eq!(doc.contents(), "# Heading\n\nbody\n");
        assert_eq!(doc.path(), Some(file_path.as_path()));
        assert!(!doc.is_dirty());
    }

    #[test]
    fn open_rejects_non_utf8_content() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("binary.md");
        seed(&file_path, &[0xFF, 0xFE, 0x00, 0x80]);

        let err = Document::open(&file_path).unwrap_err();
        assert!(matches!(err, DocumentError::InvalidUtf8));
    }

    #[test]
    fn open_missing_file_reports_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Document::open(dir.path().join("absent.md")).unwrap_err();
        assert!(matches!(err, DocumentError::Io(_)));
    }

    #[test]
    fn edits_mark_dirty_and_save_clears_it() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("draft.md");

        let mut doc = Document::new();
        doc.set_contents("hello");
        assert!(doc.is_dirty());

        doc.save_as(&file_path).unwrap();
        assert!(!doc.is_dirty());
        assert_eq!(doc.path(), Some(file_path.as_path()));
        assert_eq!(fs::read_to_string(&file_path).unwrap(), "hello");
    }

    #[test]
    fn save_without_path_fails_and_keeps_dirty() {
        let mut doc = Document::new();
        doc.set_contents("unsaved");

        let err = doc.save().unwrap_err();
        assert!(matches!(err, DocumentError::NoPath));
        assert!(doc.is_dirty());
    }

    #[test]
    fn failed_save_keeps_dirty_flag() {
        let dir = tempfile::tempdir().unwrap();

        let mut doc = Document::new();
        doc.set_contents("content");
        // 目標是目錄本身，rename 必定失敗。 / The target is the directory itself, so the rename must fail.
        let err = doc.save_as(dir.path()).unwrap_err();
        assert!(matches!(err, DocumentError::Io(_)));
        assert!(doc.is_dirty());
        assert!(doc.path().is_none());
        // 失敗的儲存不可留下暫存檔。 / A failed save must not leave its temp file behind.
        assert!(!dir.path().with_extension("tmp_markpad").exists());
    }

    #[test]
    fn save_trims_trailing_whitespace_only() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("trimmed.md");

        let mut doc = Document::new();
        doc.set_contents("  indented\nline  \n\n\t \n");
        doc.save_as(&file_path).unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "  indented\nline");
        // 記憶體內容不因儲存而被修剪。 / The in-memory buffer is not trimmed by saving.
        assert_eq!(doc.contents(), "  indented\nline  \n\n\t \n");
    }

    #[test]
    fn open_then_save_roundtrips_trimmed_content() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("roundtrip.md");
        seed(&file_path, b"alpha\nbeta");

        let mut doc = Document::open(&file_path).unwrap();
        doc.mark_dirty();
        doc.save().unwrap();
        assert_eq!(fs::read(&file_path).unwrap(), b"alpha\nbeta");
    }

    #[test]
    fn reset_returns_to_initial_state() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("reset.md");
        seed(&file_path, b"old");

        let mut doc = Document::open(&file_path).unwrap();
        doc.mark_dirty();
        doc.reset();
        assert_eq!(doc.contents(), "");
        assert!(doc.path().is_none());
        assert!(!doc.is_dirty());
    }

    #[test]
    fn line_count_follows_trailing_newlines() {
        let mut doc = Document::new();
        assert_eq!(doc.line_count(), 1);
        doc.set_contents("one\ntwo");
        assert_eq!(doc.line_count(), 2);
        doc.set_contents("one\ntwo\n");
        assert_eq!(doc.line_count(), 3);
    }
}
