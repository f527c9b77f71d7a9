//! Planner app shell: search form, status line and result cards.

use std::time::Duration;

use client_core::{
    form::{LEVEL_FIELD, OBJECTIVES_FIELD, PATHOLOGIES_FIELD, QUERY_FIELD, SESSION_MINUTES_FIELD},
    render::capitalize,
    DisplayTree, FormSnapshot,
};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::domain::{
    DEFAULT_LEVEL, DEFAULT_SESSION_MINUTES, LEVELS, MAX_SESSION_MINUTES, MIN_SESSION_MINUTES,
    OBJECTIVES, PATHOLOGIES,
};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{
    events::{UiError, UiErrorCategory, UiErrorContext, UiEvent},
    orchestration::dispatch_backend_command,
};
use crate::ui::cards;

/// Editable form state. Multi-select fields keep the order in which
/// options were ticked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchForm {
    pub objectives: Vec<String>,
    pub pathologies: Vec<String>,
    pub level: String,
    pub session_minutes: u32,
    pub query: String,
}

impl Default for SearchForm {
    fn default() -> Self {
        Self {
            objectives: Vec::new(),
            pathologies: Vec::new(),
            level: DEFAULT_LEVEL.to_string(),
            session_minutes: DEFAULT_SESSION_MINUTES,
            query: String::new(),
        }
    }
}

impl SearchForm {
    pub fn snapshot(&self) -> FormSnapshot {
        let mut form = FormSnapshot::new();
        for objective in &self.objectives {
            form.append(OBJECTIVES_FIELD, objective.as_str());
        }
        for pathology in &self.pathologies {
            form.append(PATHOLOGIES_FIELD, pathology.as_str());
        }
        form.set(LEVEL_FIELD, self.level.as_str())
            .set(SESSION_MINUTES_FIELD, self.session_minutes.to_string())
            .set(QUERY_FIELD, self.query.as_str());
        form
    }
}

fn toggle_selection(selection: &mut Vec<String>, value: &str, selected: bool) {
    let present = selection.iter().any(|existing| existing == value);
    if selected && !present {
        selection.push(value.to_string());
    } else if !selected {
        selection.retain(|existing| existing != value);
    }
}

fn error_label(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::Validation => "Check the form",
        UiErrorCategory::Transport => "Connection problem",
        UiErrorCategory::Service => "Search failed",
        UiErrorCategory::Unknown => "Error",
    }
}

pub struct PlannerApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    form: SearchForm,
    busy: bool,
    backend_down: bool,
    results: Option<DisplayTree>,
    error: Option<UiError>,
    status: String,
    results_generation: u64,
}

impl PlannerApp {
    pub fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            form: SearchForm::default(),
            busy: false,
            backend_down: false,
            results: None,
            error: None,
            status: "Starting...".to_string(),
            results_generation: 0,
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => {
                    self.status = message;
                }
                UiEvent::Busy(busy) => {
                    self.busy = busy;
                    if busy {
                        self.status = "Searching routines...".to_string();
                    }
                }
                UiEvent::Cleared => {
                    self.results = None;
                    self.error = None;
                    self.results_generation = self.results_generation.wrapping_add(1);
                }
                UiEvent::Results(tree) => {
                    self.status = match tree.cards().len() {
                        0 => "No routines found".to_string(),
                        1 => "1 routine".to_string(),
                        count => format!("{count} routines"),
                    };
                    self.results = Some(tree);
                }
                UiEvent::Error(err) => {
                    if err.is_fatal() {
                        self.backend_down = true;
                    }
                    self.status = format!("{}: {}", error_label(err.category()), err.message());
                    self.error = Some(err);
                }
            }
        }
    }

    fn submit(&mut self) {
        if self.busy || self.backend_down {
            return;
        }
        let cmd = BackendCommand::Search {
            form: self.form.snapshot(),
        };
        if !dispatch_backend_command(&self.cmd_tx, cmd, &mut self.status) {
            self.error = Some(UiError::from_message(
                UiErrorContext::General,
                self.status.clone(),
            ));
        }
    }

    fn show_form(&mut self, ui: &mut egui::Ui) {
        ui.add_space(6.0);
        ui.heading("Routine planner");
        ui.add_space(4.0);

        egui::Grid::new("search_form_grid")
            .num_columns(2)
            .spacing([16.0, 8.0])
            .show(ui, |ui| {
                ui.label("Objectives");
                ui.horizontal_wrapped(|ui| {
                    for &objective in OBJECTIVES {
                        let mut checked = self.form.objectives.iter().any(|o| o == objective);
                        if ui.checkbox(&mut checked, capitalize(objective)).changed() {
                            toggle_selection(&mut self.form.objectives, objective, checked);
                        }
                    }
                });
                ui.end_row();

                ui.label("Avoid");
                ui.horizontal_wrapped(|ui| {
                    for &pathology in PATHOLOGIES {
                        let mut checked = self.form.pathologies.iter().any(|p| p == pathology);
                        if ui.checkbox(&mut checked, capitalize(pathology)).changed() {
                            toggle_selection(&mut self.form.pathologies, pathology, checked);
                        }
                    }
                });
                ui.end_row();

                ui.label("Level");
                egui::ComboBox::from_id_salt("level_combo")
                    .selected_text(capitalize(&self.form.level))
                    .show_ui(ui, |ui| {
                        for &level in LEVELS {
                            ui.selectable_value(
                                &mut self.form.level,
                                level.to_string(),
                                capitalize(level),
                            );
                        }
                    });
                ui.end_row();

                ui.label("Session");
                ui.add(
                    egui::Slider::new(
                        &mut self.form.session_minutes,
                        MIN_SESSION_MINUTES..=MAX_SESSION_MINUTES,
                    )
                    .suffix(" min"),
                );
                ui.end_row();

                ui.label("Search");
                let query = ui.add(
                    egui::TextEdit::singleline(&mut self.form.query)
                        .hint_text("exercise name (optional)"),
                );
                if query.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    self.submit();
                }
                ui.end_row();
            });

        ui.add_space(6.0);
        ui.horizontal(|ui| {
            let button = egui::Button::new(egui::RichText::new("Find routines").strong());
            if ui
                .add_enabled(!self.busy && !self.backend_down, button)
                .clicked()
            {
                self.submit();
            }
            if self.busy {
                ui.spinner();
            }
        });

        if let Some(err) = &self.error {
            let color = ui.visuals().error_fg_color;
            ui.colored_label(color, err.message());
        }
        ui.add_space(6.0);
    }

    fn show_results(&self, ui: &mut egui::Ui) {
        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                if let Some(tree) = &self.results {
                    cards::display_tree(ui, tree, self.results_generation);
                }
            });
    }
}

impl eframe::App for PlannerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        egui::TopBottomPanel::top("search_form").show(ctx, |ui| self.show_form(ui));
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal_wrapped(|ui| {
                ui.small("Status:");
                ui.small(egui::RichText::new(&self.status).weak());
            });
        });
        egui::CentralPanel::default().show(ctx, |ui| self.show_results(ui));

        let poll = if self.busy { 16 } else { 100 };
        ctx.request_repaint_after(Duration::from_millis(poll));
    }
}
