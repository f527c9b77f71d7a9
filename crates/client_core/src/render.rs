//! Turns normalized search results into a display tree.
//!
//! Everything here is a pure function of its input. Front-ends commit the
//! resulting [`DisplayTree`] to their own surface (egui, terminal) and are
//! expected to drop whatever tree they showed before.

use std::fmt;

use shared::domain::{
    ExerciseItem, Routine, SearchResults, Section, SectionEntry, COOLDOWN_SECTION, MAIN_SECTION,
    WARMUP_SECTION,
};

pub const NO_RESULTS_MESSAGE: &str = "No routines available for this configuration.";
pub const FALLBACK_CAPTION: &str = "Automatic suggestion";
pub const MIXED_BADGE: &str = "Mixto";
pub const UNAVAILABLE_EXERCISE: &str = "Exercise could not be displayed";

const DETAIL_SEPARATOR: &str = " | ";

#[derive(Debug, Clone, PartialEq)]
pub enum DisplayTree {
    Placeholder(String),
    Cards(Vec<RoutineCard>),
}

impl DisplayTree {
    pub fn cards(&self) -> &[RoutineCard] {
        match self {
            DisplayTree::Placeholder(_) => &[],
            DisplayTree::Cards(cards) => cards,
        }
    }

    pub fn placeholder(&self) -> Option<&str> {
        match self {
            DisplayTree::Placeholder(message) => Some(message),
            DisplayTree::Cards(_) => None,
        }
    }

    /// Plain-text rendition. Collapsed sections only show their header
    /// unless `expand_all` is set.
    pub fn text(&self, expand_all: bool) -> TextView<'_> {
        TextView {
            tree: self,
            expand_all,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoutineCard {
    pub title: String,
    pub subtitle: String,
    pub badge: Option<&'static str>,
    pub sections: Vec<SectionBlock>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SectionBlock {
    pub key: String,
    pub label: String,
    pub minutes_label: Option<String>,
    /// Initial state only; the surface owns it afterwards.
    pub expanded: bool,
    pub exercises: Vec<ExerciseNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExerciseNode {
    Card(ExerciseCard),
    Unavailable {
        position: usize,
        message: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseCard {
    pub name: String,
    pub pattern_tag: Option<String>,
    pub detail: Option<String>,
    pub notes: Option<String>,
    pub contraindication_tags: Vec<String>,
    pub fallback_caption: Option<&'static str>,
}

pub fn render(results: &SearchResults) -> DisplayTree {
    if results.is_empty() {
        return DisplayTree::Placeholder(NO_RESULTS_MESSAGE.to_string());
    }

    DisplayTree::Cards(results.routines.iter().map(routine_card).collect())
}

pub fn routine_card(routine: &Routine) -> RoutineCard {
    let mut title = capitalize(&routine.objective);
    if let Some(minutes) = &routine.minutes_target {
        title.push_str(&format!(" {minutes} min"));
    }
    if let Some(level) = &routine.level {
        title.push_str(" - ");
        title.push_str(&capitalize(level));
    }

    RoutineCard {
        title,
        subtitle: routine.name.clone(),
        badge: routine.is_mixed().then_some(MIXED_BADGE),
        sections: routine.sections.iter().map(section_block).collect(),
    }
}

pub fn section_block(section: &Section) -> SectionBlock {
    let exercises = section
        .entries
        .iter()
        .map(|entry| match entry {
            SectionEntry::Exercise(item) => ExerciseNode::Card(exercise_card(item)),
            SectionEntry::Malformed { position, .. } => ExerciseNode::Unavailable {
                position: *position,
                message: UNAVAILABLE_EXERCISE,
            },
        })
        .collect();

    SectionBlock {
        key: section.key.clone(),
        label: section_label(&section.key),
        minutes_label: section.minutes.as_ref().map(|minutes| format!("{minutes} min")),
        expanded: section.key == WARMUP_SECTION,
        exercises,
    }
}

pub fn exercise_card(item: &ExerciseItem) -> ExerciseCard {
    ExerciseCard {
        name: item.name.clone(),
        pattern_tag: item.pattern.clone(),
        detail: detail_line(item),
        notes: item.notes.clone(),
        contraindication_tags: item.contraindications.as_slice().to_vec(),
        fallback_caption: item.is_fallback.then_some(FALLBACK_CAPTION),
    }
}

/// Sets win over minutes as the quantity descriptor; the two never appear
/// together.
pub fn detail_line(item: &ExerciseItem) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(sets) = &item.sets {
        parts.push(format!("{sets} series"));
    }
    if let Some(reps) = &item.reps {
        parts.push(format!("{reps} reps"));
    }
    if let (Some(minutes), None) = (&item.minutes, &item.sets) {
        parts.push(format!("{minutes} min"));
    }
    if let Some(rest) = &item.rest {
        parts.push(format!("descanso {rest}"));
    }
    if let Some(intensity) = &item.intensity {
        parts.push(format!("intensidad {intensity}"));
    }

    (!parts.is_empty()).then(|| parts.join(DETAIL_SEPARATOR))
}

pub fn section_label(key: &str) -> String {
    match key {
        WARMUP_SECTION => "Calentamiento".to_string(),
        MAIN_SECTION => "Bloque principal".to_string(),
        COOLDOWN_SECTION => "Vuelta a la calma".to_string(),
        other => capitalize(other),
    }
}

pub fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub struct TextView<'a> {
    tree: &'a DisplayTree,
    expand_all: bool,
}

impl fmt::Display for TextView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cards = match self.tree {
            DisplayTree::Placeholder(message) => return writeln!(f, "{message}"),
            DisplayTree::Cards(cards) => cards,
        };

        for (index, card) in cards.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            writeln!(f, "{}", card.title)?;
            match card.badge {
                Some(badge) => writeln!(f, "  {} [{badge}]", card.subtitle)?,
                None => writeln!(f, "  {}", card.subtitle)?,
            }

            for section in &card.sections {
                let open = section.expanded || self.expand_all;
                let marker = if open { '-' } else { '+' };
                match &section.minutes_label {
                    Some(minutes) => writeln!(f, "  {marker} {} ({minutes})", section.label)?,
                    None => writeln!(f, "  {marker} {}", section.label)?,
                }
                if !open {
                    continue;
                }
                for exercise in &section.exercises {
                    write_exercise(f, exercise)?;
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for DisplayTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text(false))
    }
}

fn write_exercise(f: &mut fmt::Formatter<'_>, exercise: &ExerciseNode) -> fmt::Result {
    let card = match exercise {
        ExerciseNode::Card(card) => card,
        ExerciseNode::Unavailable { message, .. } => return writeln!(f, "      {message}"),
    };

    match &card.pattern_tag {
        Some(pattern) => writeln!(f, "      {} [{pattern}]", card.name)?,
        None => writeln!(f, "      {}", card.name)?,
    }
    if let Some(detail) = &card.detail {
        writeln!(f, "        {detail}")?;
    }
    if let Some(notes) = &card.notes {
        writeln!(f, "        {notes}")?;
    }
    if !card.contraindication_tags.is_empty() {
        let tags: Vec<_> = card
            .contraindication_tags
            .iter()
            .map(|tag| format!("[{tag}]"))
            .collect();
        writeln!(f, "        {}", tags.join(" "))?;
    }
    if let Some(caption) = card.fallback_caption {
        writeln!(f, "        ({caption})")?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
