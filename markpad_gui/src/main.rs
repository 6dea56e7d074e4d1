use eframe::egui;
use egui::{Align, Color32, FontFamily, FontId, Key, Layout, Modifiers};
use once_cell::sync::Lazy;
use std::path::PathBuf;

use markpad_core::{Session, SessionUi, UnsavedChoice};
use markpad_settings::{
    Color, Preferences, PreferencesStore, ThemePreset, BUILTIN_THEMES, FONT_CHOICES,
    FONT_SIZE_RANGE, SETTINGS_FILE,
};

const APP_TITLE: &str = "Markdown Editor";

static FONT_SIZES: Lazy<Vec<u32>> = Lazy::new(|| FONT_SIZE_RANGE.collect());

fn main() -> Result<(), eframe::Error> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([800.0, 600.0])
            .with_title(APP_TITLE),
        ..Default::default()
    };
    eframe::run_native(
        APP_TITLE,
        options,
        Box::new(|_cc| Box::new(MarkPad::new())),
    )
}

/// 以原生對話框實作工作階段需要的呈現層介面。 /
/// Implements the session's presentation surface with native dialogs.
struct NativeDialogs;

impl NativeDialogs {
    fn file_dialog() -> rfd::FileDialog {
        rfd::FileDialog::new()
            .add_filter("Markdown Files", &["md"])
            .add_filter("Text Files", &["txt"])
            .add_filter("All Files", &["*"])
    }
}

impl SessionUi for NativeDialogs {
    fn confirm_unsaved(&mut self) -> UnsavedChoice {
        let result = rfd::MessageDialog::new()
            .set_level(rfd::MessageLevel::Warning)
            .set_title("Unsaved Changes")
            .set_description("Do you want to save changes to your file?")
            .set_buttons(rfd::MessageButtons::YesNoCancel)
            .show();
        match result {
            rfd::MessageDialogResult::Yes => UnsavedChoice::Save,
            rfd::MessageDialogResult::No => UnsavedChoice::Discard,
            _ => UnsavedChoice::Cancel,
        }
    }

    fn pick_open_path(&mut self) -> Option<PathBuf> {
        Self::file_dialog().pick_file()
    }

    fn pick_save_path(&mut self) -> Option<PathBuf> {
        Self::file_dialog().set_file_name("untitled.md").save_file()
    }

    fn alert_error(&mut self, message: &str) {
        let _ = rfd::MessageDialog::new()
            .set_level(rfd::MessageLevel::Error)
            .set_title("Error")
            .set_description(message)
            .set_buttons(rfd::MessageButtons::Ok)
            .show();
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Picker {
    Font,
    FontSize,
    Theme,
}

struct MarkPad {
    session: Session,
    store: PreferencesStore,
    dialogs: NativeDialogs,
    active_picker: Option<Picker>,
    pending_font: String,
    pending_size: u32,
    pending_theme: &'static str,
    title: String,
    sent_title: String,
    close_confirmed: bool,
}

impl MarkPad {
    fn new() -> Self {
        let store = PreferencesStore::load(SETTINGS_FILE);
        Self {
            session: Session::new(),
            store,
            dialogs: NativeDialogs,
            active_picker: None,
            pending_font: String::new(),
            pending_size: 0,
            pending_theme: "",
            title: APP_TITLE.to_string(),
            sent_title: APP_TITLE.to_string(),
            close_confirmed: false,
        }
    }

    fn preferences(&self) -> &Preferences {
        self.store.preferences()
    }

    fn refresh_title(&mut self, new_file: bool) {
        self.title = match self.session.document().display_name() {
            Some(name) => format!("{APP_TITLE} - {name}"),
            None if new_file => format!("{APP_TITLE} - New File"),
            None => APP_TITLE.to_string(),
        };
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        let ctrl_shift = Modifiers::CTRL.plus(Modifiers::SHIFT);
        if ctx.input_mut(|i| i.consume_key(ctrl_shift, Key::S)) {
            self.save_as_action();
        } else if ctx.input_mut(|i| i.consume_key(Modifiers::CTRL, Key::S)) {
            self.save_action();
        }
        if ctx.input_mut(|i| i.consume_key(Modifiers::CTRL, Key::N)) {
            self.new_action();
        }
        if ctx.input_mut(|i| i.consume_key(Modifiers::CTRL, Key::O)) {
            self.open_action();
        }
        if ctx.input_mut(|i| i.consume_key(Modifiers::CTRL, Key::W)) {
            self.close_action();
        }
    }

    fn new_action(&mut self) {
        if self.session.new_file(&mut self.dialogs) {
            self.refresh_title(true);
        }
    }

    fn open_action(&mut self) {
        if self.session.open_file(&mut self.dialogs) {
            self.refresh_title(false);
        }
    }

    fn close_action(&mut self) {
        if self.session.close_file(&mut self.dialogs) {
            self.refresh_title(false);
        }
    }

    fn save_action(&mut self) {
        if self.session.save_file(&mut self.dialogs) {
            self.refresh_title(false);
        }
    }

    fn save_as_action(&mut self) {
        if self.session.save_file_as(&mut self.dialogs) {
            self.refresh_title(false);
        }
    }

    fn open_picker(&mut self, picker: Picker) {
        let prefs = self.store.preferences();
        self.pending_font = prefs.font.clone();
        self.pending_size = prefs.font_size;
        self.pending_theme = BUILTIN_THEMES[0].name;
        self.active_picker = Some(picker);
    }

    fn persist_preferences(&mut self) {
        if let Err(err) = self.store.save() {
            self.dialogs
                .alert_error(&format!("Could not save settings: {err}"));
        }
    }

    fn show_pickers(&mut self, ctx: &egui::Context) {
        let Some(picker) = self.active_picker else {
            return;
        };
        let mut window_open = true;
        let mut confirmed = false;
        let title = match picker {
            Picker::Font => "Select Font",
            Picker::FontSize => "Select Font Size",
            Picker::Theme => "Select Theme",
        };
        egui::Window::new(title)
            .open(&mut window_open)
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().max_height(240.0).show(ui, |ui| match picker {
                    Picker::Font => {
                        for font in FONT_CHOICES {
                            if ui
                                .selectable_label(self.pending_font == font, font)
                                .clicked()
                            {
                                self.pending_font = font.to_string();
                            }
                        }
                    }
                    Picker::FontSize => {
                        for size in FONT_SIZES.iter() {
                            if ui
                                .selectable_label(self.pending_size == *size, size.to_string())
                                .clicked()
                            {
                                self.pending_size = *size;
                            }
                        }
                    }
                    Picker::Theme => {
                        for preset in &BUILTIN_THEMES {
                            if ui
                                .selectable_label(self.pending_theme == preset.name, preset.name)
                                .clicked()
                            {
                                self.pending_theme = preset.name;
                            }
                        }
                    }
                });
                ui.separator();
                if ui.button("Select").clicked() {
                    confirmed = true;
                }
            });

        if confirmed {
            match picker {
                Picker::Font => {
                    let font = self.pending_font.clone();
                    self.store.preferences_mut().font = font;
                }
                Picker::FontSize => {
                    self.store.preferences_mut().font_size = self.pending_size;
                }
                Picker::Theme => {
                    if let Some(preset) = ThemePreset::by_name(self.pending_theme) {
                        self.store.preferences_mut().apply_theme(preset);
                    }
                }
            }
            self.persist_preferences();
            self.active_picker = None;
        } else if !window_open {
            // 關閉視窗即取消，設定與畫面都不變。 / Closing the window cancels; nothing changes.
            self.active_picker = None;
        }
    }

    fn handle_close_request(&mut self, ctx: &egui::Context) {
        if self.close_confirmed || !ctx.input(|i| i.viewport().close_requested()) {
            return;
        }
        if self.session.confirm_discard(&mut self.dialogs) {
            self.close_confirmed = true;
        } else {
            ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
        }
    }
}

fn editor_font(prefs: &Preferences) -> FontId {
    // egui 內建字型有限，以最接近的字族呈現所選字型。 /
    // egui bundles a limited font set; render the chosen font with the closest family.
    let family = if prefs.font == "Courier New" {
        FontFamily::Monospace
    } else {
        FontFamily::Proportional
    };
    FontId::new(prefs.font_size as f32, family)
}

fn resolve_color(value: &str, fallback: Color32) -> Color32 {
    match Color::parse(value) {
        Ok(color) => Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a),
        Err(_) => fallback,
    }
}

impl eframe::App for MarkPad {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_close_request(ctx);
        self.handle_shortcuts(ctx);

        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                let mut action: Option<fn(&mut MarkPad)> = None;
                ui.menu_button("File", |ui| {
                    if ui.button("New").clicked() {
                        action = Some(MarkPad::new_action);
                        ui.close_menu();
                    }
                    if ui.button("Open...").clicked() {
                        action = Some(MarkPad::open_action);
                        ui.close_menu();
                    }
                    if ui.button("Close").clicked() {
                        action = Some(MarkPad::close_action);
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Save").clicked() {
                        action = Some(MarkPad::save_action);
                        ui.close_menu();
                    }
                    if ui.button("Save As...").clicked() {
                        action = Some(MarkPad::save_as_action);
                        ui.close_menu();
                    }
                });
                ui.menu_button("Settings", |ui| {
                    if ui.button("Change Font").clicked() {
                        action = Some(|app| app.open_picker(Picker::Font));
                        ui.close_menu();
                    }
                    if ui.button("Change Font Size").clicked() {
                        action = Some(|app| app.open_picker(Picker::FontSize));
                        ui.close_menu();
                    }
                    if ui.button("Change Theme").clicked() {
                        action = Some(|app| app.open_picker(Picker::Theme));
                        ui.close_menu();
                    }
                });
                if let Some(action) = action {
                    action(self);
                }
            });
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                ui.label(format!("Lines: {}", self.session.document().line_count()));
            });
        });

        let font = editor_font(self.preferences());
        let bg = resolve_color(&self.preferences().bg_color, Color32::WHITE);
        let fg = resolve_color(&self.preferences().fg_color, Color32::BLACK);

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(bg))
            .show(ctx, |ui| {
                ui.visuals_mut().extreme_bg_color = bg;
                let text_edit = egui::TextEdit::multiline(self.session.document_mut().contents_mut())
                    .desired_width(f32::INFINITY)
                    .desired_rows(25)
                    .font(font)
                    .text_color(fg)
                    .frame(false)
                    .margin(egui::vec2(20.0, 20.0));
                let response = ui.add_sized(ui.available_size(), text_edit);
                if response.changed() {
                    self.session.document_mut().mark_dirty();
                }
            });

        self.show_pickers(ctx);

        if self.title != self.sent_title {
            ctx.send_viewport_cmd(egui::ViewportCommand::Title(self.title.clone()));
            self.sent_title = self.title.clone();
        }
    }
}
