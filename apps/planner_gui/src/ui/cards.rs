//! Routine card widgets drawn from a [`DisplayTree`].

use client_core::{DisplayTree, ExerciseCard, ExerciseNode, RoutineCard, SectionBlock};
use eframe::egui;

/// `generation` changes with every committed tree so collapsing state from a
/// previous search never leaks into the next one.
pub fn display_tree(ui: &mut egui::Ui, tree: &DisplayTree, generation: u64) {
    match tree {
        DisplayTree::Placeholder(message) => {
            ui.add_space(12.0);
            ui.vertical_centered(|ui| {
                ui.label(egui::RichText::new(message).weak().size(15.0));
            });
        }
        DisplayTree::Cards(cards) => {
            for (index, card) in cards.iter().enumerate() {
                routine_card(ui, card, (generation, index));
                ui.add_space(8.0);
            }
        }
    }
}

fn routine_card(ui: &mut egui::Ui, card: &RoutineCard, card_id: (u64, usize)) {
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new(&card.title).strong().size(17.0));
            if let Some(badge) = card.badge {
                let accent = ui.visuals().selection.bg_fill;
                ui.label(egui::RichText::new(badge).small().strong().color(accent));
            }
        });
        ui.label(egui::RichText::new(&card.subtitle).weak());
        ui.add_space(4.0);

        for section in &card.sections {
            section_block(ui, section, card_id);
        }
    });
}

fn section_block(ui: &mut egui::Ui, section: &SectionBlock, card_id: (u64, usize)) {
    let header = match &section.minutes_label {
        Some(minutes) => format!("{} ({minutes})", section.label),
        None => section.label.clone(),
    };

    egui::CollapsingHeader::new(egui::RichText::new(header).strong())
        .id_salt((card_id, section.key.as_str()))
        .default_open(section.expanded)
        .show(ui, |ui| {
            if section.exercises.is_empty() {
                ui.label(egui::RichText::new("-").weak());
            }
            for node in &section.exercises {
                exercise_node(ui, node);
            }
        });
}

fn exercise_node(ui: &mut egui::Ui, node: &ExerciseNode) {
    match node {
        ExerciseNode::Card(card) => exercise_card(ui, card),
        ExerciseNode::Unavailable { message, .. } => {
            let color = ui.visuals().error_fg_color;
            ui.colored_label(color, *message);
        }
    }
}

fn exercise_card(ui: &mut egui::Ui, card: &ExerciseCard) {
    ui.horizontal_wrapped(|ui| {
        ui.label(egui::RichText::new(&card.name).strong());
        if let Some(pattern) = &card.pattern_tag {
            ui.label(egui::RichText::new(format!("[{pattern}]")).small().weak());
        }
    });
    if let Some(detail) = &card.detail {
        ui.label(detail);
    }
    if let Some(notes) = &card.notes {
        ui.label(egui::RichText::new(notes).italics().weak());
    }
    if !card.contraindication_tags.is_empty() {
        let warn = ui.visuals().warn_fg_color;
        ui.horizontal_wrapped(|ui| {
            for tag in &card.contraindication_tags {
                ui.label(egui::RichText::new(tag).small().color(warn));
            }
        });
    }
    if let Some(caption) = card.fallback_caption {
        ui.label(egui::RichText::new(caption).small().italics());
    }
    ui.add_space(4.0);
}
