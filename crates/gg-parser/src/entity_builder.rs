use gg_core::{
    Association, Birth, Death, Diagnostic, DiagnosticCategory, Event, Family, GedcomDocument,
    Individual, Note, ParseConfig, Span,
};
use rustc_hash::FxHashMap;
use tracing::trace;

use crate::context::{ContextTracker, CurrentRecord, FocusTarget, RecordKind};
use crate::continuation::{ContinuationKind, ContinuationTarget, apply_continuation};
use crate::name::format_name;
use crate::tokenizer::{RecordLine, tokenize_line};

pub(crate) struct EntityBuilder {
    config: ParseConfig,
    document: GedcomDocument,
    individual_index: FxHashMap<String, usize>,
    family_index: FxHashMap<String, usize>,
    note_index: FxHashMap<String, usize>,
    tracker: ContextTracker,
    /// Unformatted NAME value of the current individual, extended by concatenation lines.
    raw_name: String,
    diagnostics: Vec<Diagnostic>,
    line_number: usize,
    seen_level_zero: bool,
}

impl EntityBuilder {
    pub(crate) fn new(config: ParseConfig) -> Self {
        Self {
            config,
            document: GedcomDocument::default(),
            individual_index: FxHashMap::default(),
            family_index: FxHashMap::default(),
            note_index: FxHashMap::default(),
            tracker: ContextTracker::default(),
            raw_name: String::new(),
            diagnostics: Vec::new(),
            line_number: 0,
            seen_level_zero: false,
        }
    }

    pub(crate) fn config(&self) -> &ParseConfig {
        &self.config
    }

    pub(crate) fn finish(self) -> (GedcomDocument, Vec<Diagnostic>, ParseConfig) {
        (self.document, self.diagnostics, self.config)
    }

    pub(crate) fn feed_line(&mut self, raw: &str) {
        self.line_number += 1;
        let raw = if self.line_number == 1 {
            raw.strip_prefix('\u{feff}').unwrap_or(raw)
        } else {
            raw
        };

        let Some(line) = tokenize_line(raw) else {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                let diagnostic = Diagnostic::info("Line has no level and tag; ignored")
                    .with_category(DiagnosticCategory::Tokenizer)
                    .with_span(self.span(raw))
                    .with_found(trimmed);
                self.diagnostics.push(diagnostic);
            }
            return;
        };

        if line.level == 0 {
            self.begin_record(&line, raw);
            return;
        }

        if !self.tracker.has_record() {
            if !self.seen_level_zero {
                let diagnostic = Diagnostic::info("Line appears before any record; ignored")
                    .with_category(DiagnosticCategory::Structure)
                    .with_span(self.span(raw))
                    .with_found(line.tag);
                self.diagnostics.push(diagnostic);
            }
            return;
        }

        if let Some(kind) = self.continuation_kind(line.tag) {
            self.continue_focus(kind, &line.value);
            return;
        }

        match self.tracker.record() {
            CurrentRecord::Individual(slot) => self.individual_line(slot, &line, raw),
            CurrentRecord::Family(slot) => self.family_line(slot, &line),
            CurrentRecord::Note(slot) => self.note_line(slot, &line),
            CurrentRecord::None => {}
        }
    }

    fn span(&self, raw: &str) -> Span {
        Span::at_line(self.line_number, raw.trim_end().chars().count())
    }

    fn continuation_kind(&self, tag: &str) -> Option<ContinuationKind> {
        if tag == self.config.concatenation_tag {
            Some(ContinuationKind::Concatenate)
        } else if tag == self.config.continuation_tag {
            Some(ContinuationKind::NewLine)
        } else {
            None
        }
    }

    fn begin_record(&mut self, line: &RecordLine<'_>, raw: &str) {
        self.seen_level_zero = true;
        self.raw_name.clear();

        let id = line.tag;
        let kind = RecordKind::classify(id, &self.config);
        let (record, focus, replaced) = match kind {
            RecordKind::Individual => {
                let (slot, replaced) = upsert(
                    &mut self.document.individuals,
                    &mut self.individual_index,
                    id,
                    Individual::new(id),
                );
                (CurrentRecord::Individual(slot), FocusTarget::None, replaced)
            }
            RecordKind::Family => {
                let (slot, replaced) = upsert(
                    &mut self.document.families,
                    &mut self.family_index,
                    id,
                    Family::new(id),
                );
                (CurrentRecord::Family(slot), FocusTarget::None, replaced)
            }
            RecordKind::Note => {
                let mut note = Note::new(id);
                if let Some(text) = inline_note_text(&line.value) {
                    note.text.push(text);
                }
                let (slot, replaced) =
                    upsert(&mut self.document.notes, &mut self.note_index, id, note);
                (CurrentRecord::Note(slot), FocusTarget::NoteText, replaced)
            }
            RecordKind::Other => {
                trace!(line = self.line_number, tag = id, "closing record");
                self.tracker.close();
                return;
            }
        };

        if replaced {
            let diagnostic = Diagnostic::warning(format!(
                "Duplicate record id {id}; earlier definition replaced"
            ))
            .with_category(DiagnosticCategory::Structure)
            .with_span(self.span(raw))
            .with_found(id);
            self.diagnostics.push(diagnostic);
        }

        trace!(line = self.line_number, ?record, "record start");
        self.tracker.begin(record, focus);
    }

    fn individual_line(&mut self, slot: usize, line: &RecordLine<'_>, raw: &str) {
        match line.level {
            1 => {
                let focus = self.individual_attribute(slot, line, raw);
                self.tracker.set_focus(focus);
            }
            2 => self.individual_detail(slot, line),
            _ => {}
        }
    }

    /// Level-1 dispatch; returns the new focus.
    fn individual_attribute(
        &mut self,
        slot: usize,
        line: &RecordLine<'_>,
        raw: &str,
    ) -> FocusTarget {
        let span = self.span(raw);
        let Some(individual) = self.document.individuals.get_mut(slot) else {
            return FocusTarget::None;
        };
        let value = &line.value;

        match line.tag {
            "NAME" => {
                self.raw_name.clone_from(value);
                individual.name = format_name(&self.raw_name);
                FocusTarget::Name
            }
            "SEX" => {
                individual.sex = Some(value.clone());
                FocusTarget::None
            }
            "BIRT" => {
                individual.birth = Some(Birth::default());
                FocusTarget::None
            }
            "DEAT" => {
                individual.death = Some(Death {
                    date: None,
                    place: None,
                    status: true,
                });
                FocusTarget::None
            }
            "OCCU" => {
                individual.occupation = Some(value.clone());
                FocusTarget::None
            }
            "NOTE" => {
                individual.notes.push(value.clone());
                FocusTarget::Notes
            }
            "QUOT" => {
                individual.quotes.push(value.clone());
                FocusTarget::Quotes
            }
            "ASSO" => {
                individual.associations.push(Association {
                    person: value.clone(),
                    relation: None,
                    notes: Vec::new(),
                });
                FocusTarget::Association
            }
            "EVEN" => {
                individual.events.push(Event {
                    value: non_empty(value),
                    ..Event::default()
                });
                FocusTarget::Event
            }
            "FAMC" => {
                individual.families.push(value.clone());
                FocusTarget::None
            }
            other => {
                if self.config.report_unknown_tags {
                    let diagnostic =
                        Diagnostic::info(format!("Unrecognized individual tag {other}; ignored"))
                            .with_category(DiagnosticCategory::Structure)
                            .with_span(span)
                            .with_found(other);
                    self.diagnostics.push(diagnostic);
                }
                FocusTarget::None
            }
        }
    }

    /// Level-2 dispatch. Never changes focus.
    fn individual_detail(&mut self, slot: usize, line: &RecordLine<'_>) {
        let focus = self.tracker.focus();
        let Some(individual) = self.document.individuals.get_mut(slot) else {
            return;
        };
        let value = &line.value;

        match (focus, line.tag) {
            (FocusTarget::Name, "NICK") => individual.nickname = non_empty(value),
            (FocusTarget::Name, "EMAIL") => individual.email = non_empty(value),
            (FocusTarget::Association, "RELA") => {
                if let Some(association) = individual.associations.last_mut() {
                    association.relation = non_empty(value);
                }
            }
            (FocusTarget::Association, "NOTE") => {
                if let Some(association) = individual.associations.last_mut() {
                    association.notes.push(value.clone());
                }
            }
            (FocusTarget::Event, "TYPE") => {
                if let Some(event) = individual.events.last_mut() {
                    event.event_type = non_empty(value);
                }
            }
            _ => {}
        }

        let is_date = line.tag == "DATE";
        if !is_date && line.tag != "PLAC" {
            return;
        }
        let normalized = if self.config.is_unknown(value) {
            None
        } else {
            non_empty(value)
        };

        if focus == FocusTarget::Event
            && let Some(event) = individual.events.last_mut()
        {
            let field = if is_date {
                &mut event.date
            } else {
                &mut event.place
            };
            field.clone_from(&normalized);
        }

        if let Some(birth) = individual.birth.as_mut() {
            fill_once(
                if is_date {
                    &mut birth.date
                } else {
                    &mut birth.place
                },
                &normalized,
            );
        }
        if let Some(death) = individual.death.as_mut() {
            fill_once(
                if is_date {
                    &mut death.date
                } else {
                    &mut death.place
                },
                &normalized,
            );
        }
    }

    fn family_line(&mut self, slot: usize, line: &RecordLine<'_>) {
        if line.level != 1 {
            return;
        }
        let Some(family) = self.document.families.get_mut(slot) else {
            return;
        };

        match line.tag {
            // An empty pointer leaves the parent unset.
            "HUSB" => family.husband = non_empty(&line.value),
            "WIFE" => family.wife = non_empty(&line.value),
            "CHIL" => family.children.push(line.value.clone()),
            _ => {}
        }
    }

    fn note_line(&mut self, slot: usize, line: &RecordLine<'_>) {
        if line.level != 1 || line.tag != "NOTE" {
            return;
        }
        if let Some(note) = self.document.notes.get_mut(slot) {
            note.text.push(line.value.clone());
        }
    }

    fn continue_focus(&mut self, kind: ContinuationKind, value: &str) {
        let focus = self.tracker.focus();
        let target = match self.tracker.record() {
            CurrentRecord::Individual(slot) => {
                match (self.document.individuals.get_mut(slot), focus) {
                    (Some(_), FocusTarget::Name) => ContinuationTarget::Scalar(&mut self.raw_name),
                    (Some(individual), FocusTarget::Notes) => {
                        ContinuationTarget::Sequence(&mut individual.notes)
                    }
                    (Some(individual), FocusTarget::Quotes) => {
                        ContinuationTarget::Sequence(&mut individual.quotes)
                    }
                    (Some(individual), FocusTarget::Association) => individual
                        .associations
                        .last_mut()
                        .map_or(ContinuationTarget::Nothing, |association| {
                            ContinuationTarget::Sequence(&mut association.notes)
                        }),
                    (Some(individual), FocusTarget::Event) => individual
                        .events
                        .last_mut()
                        .map_or(ContinuationTarget::Nothing, |event| {
                            ContinuationTarget::OptionalScalar(&mut event.value)
                        }),
                    _ => ContinuationTarget::Nothing,
                }
            }
            CurrentRecord::Note(slot) if focus == FocusTarget::NoteText => self
                .document
                .notes
                .get_mut(slot)
                .map_or(ContinuationTarget::Nothing, |note| {
                    ContinuationTarget::Sequence(&mut note.text)
                }),
            _ => ContinuationTarget::Nothing,
        };

        let applied = apply_continuation(kind, value, target);
        if !applied {
            trace!(line = self.line_number, ?kind, ?focus, "continuation without target");
            return;
        }

        if focus == FocusTarget::Name
            && let CurrentRecord::Individual(slot) = self.tracker.record()
            && let Some(individual) = self.document.individuals.get_mut(slot)
        {
            individual.name = format_name(&self.raw_name);
        }
    }
}

/// Insert a record, or replace the one already holding `id` in its original slot.
fn upsert<T>(
    table: &mut Vec<T>,
    index: &mut FxHashMap<String, usize>,
    id: &str,
    record: T,
) -> (usize, bool) {
    if let Some(&slot) = index.get(id)
        && let Some(existing) = table.get_mut(slot)
    {
        *existing = record;
        return (slot, true);
    }
    let slot = table.len();
    table.push(record);
    index.insert(id.to_string(), slot);
    (slot, false)
}

/// `0 @N1@ NOTE first line` carries the first text line inline.
fn inline_note_text(value: &str) -> Option<String> {
    let rest = value.strip_prefix("NOTE")?;
    if rest.is_empty() || !rest.starts_with(' ') {
        return None;
    }
    non_empty(rest.trim_start())
}

fn fill_once(field: &mut Option<String>, value: &Option<String>) {
    if field.is_none() {
        field.clone_from(value);
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}
