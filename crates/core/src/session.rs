use std::path::PathBuf;

use crate::document::Document;

/// 未儲存變更提示的三種結果。 / The three outcomes of the unsaved-changes prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsavedChoice {
    Save,
    Discard,
    Cancel,
}

/// 呈現層提供的同步對話介面；所有呼叫都會阻塞直到使用者回應。 /
/// Synchronous dialog surface supplied by the presentation layer; every call
/// blocks until the user answers.
pub trait SessionUi {
    /// 詢問是否儲存未儲存的變更。 / Asks whether unsaved changes should be saved.
    fn confirm_unsaved(&mut self) -> UnsavedChoice;
    /// 讓使用者挑選要開啟的檔案；取消回傳 `None`。 / File-open picker; `None` on cancel.
    fn pick_open_path(&mut self) -> Option<PathBuf>;
    /// 讓使用者挑選儲存位置；取消回傳 `None`。 / File-save picker; `None` on cancel.
    fn pick_save_path(&mut self) -> Option<PathBuf>;
    /// 以阻塞的錯誤視窗通知使用者。 / Notifies the user through a blocking error box.
    fn alert_error(&mut self, message: &str);
}

/// 擁有文件生命週期的工作階段：開啟/關閉/儲存轉換與未儲存變更的把關。 /
/// Owns the document lifecycle: the open/close/save transitions and the
/// unsaved-changes gate in front of the destructive ones.
#[derive(Debug, Default)]
pub struct Session {
    document: Document,
}

impl Session {
    pub fn new() -> Self {
        Self {
            document: Document::new(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    /// 建立新文件；回傳 `true` 表示緩衝已被清空。 /
    /// Starts a new document; returns `true` when the buffer was cleared.
    pub fn new_file(&mut self, ui: &mut dyn SessionUi) -> bool {
        if !self.confirm_discard(ui) {
            return false;
        }
        self.document.reset();
        true
    }

    /// 開啟使用者挑選的檔案；回傳 `true` 表示緩衝已被取代。 /
    /// Opens a user-chosen file; returns `true` when the buffer was replaced.
    pub fn open_file(&mut self, ui: &mut dyn SessionUi) -> bool {
        if !self.confirm_discard(ui) {
            return false;
        }
        let Some(path) = ui.pick_open_path() else {
            return false;
        };
        match Document::open(&path) {
            Ok(document) => {
                self.document = document;
                true
            }
            Err(err) => {
                // 開啟失敗時文件狀態維持原樣。 / A failed open leaves the document untouched.
                ui.alert_error(&format!("Could not open {}: {err}", path.display()));
                false
            }
        }
    }

    /// 關閉目前文件；回傳 `true` 表示緩衝已被清空。 /
    /// Closes the current document; returns `true` when the buffer was cleared.
    pub fn close_file(&mut self, ui: &mut dyn SessionUi) -> bool {
        if !self.confirm_discard(ui) {
            return false;
        }
        self.document.reset();
        true
    }

    /// 儲存至現有路徑；沒有路徑時轉交另存新檔。回傳 `true` 表示寫入成功。 /
    /// Saves to the current path, delegating to Save-As when there is none;
    /// returns `true` when the write succeeded.
    pub fn save_file(&mut self, ui: &mut dyn SessionUi) -> bool {
        if self.document.path().is_none() {
            return self.save_file_as(ui);
        }
        match self.document.save() {
            Ok(()) => true,
            Err(err) => {
                // 寫入未成功，dirty 旗標必須保留。 / The write did not succeed, so dirty must stay set.
                ui.alert_error(&format!("Could not save file: {err}"));
                false
            }
        }
    }

    /// 另存至使用者挑選的路徑並採用之。回傳 `true` 表示寫入成功。 /
    /// Saves to a user-chosen path and adopts it; returns `true` when the
    /// write succeeded.
    pub fn save_file_as(&mut self, ui: &mut dyn SessionUi) -> bool {
        let Some(path) = ui.pick_save_path() else {
            return false;
        };
        match self.document.save_as(&path) {
            Ok(()) => true,
            Err(err) => {
                ui.alert_error(&format!("Could not save {}: {err}", path.display()));
                false
            }
        }
    }

    /// 未儲存變更的把關：乾淨時直接放行；髒污時以三向提示決定。 /
    /// The unsaved-changes gate: a clean buffer passes straight through, a
    /// dirty one goes through the three-way prompt.
    ///
    /// 選擇 Save 後不論儲存結果為何都放行原本的動作。 /
    /// Choosing Save proceeds with the original action regardless of the
    /// save's outcome.
    pub fn confirm_discard(&mut self, ui: &mut dyn SessionUi) -> bool {
        if !self.document.is_dirty() {
            return true;
        }
        match ui.confirm_unsaved() {
            UnsavedChoice::Save => {
                self.save_file(ui);
                true
            }
            UnsavedChoice::Discard => true,
            UnsavedChoice::Cancel => false,
        }
    }
}
