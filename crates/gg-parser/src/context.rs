use gg_core::ParseConfig;

/// Logical field that level-2 lines and continuation lines attach to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusTarget {
    #[default]
    None,
    /// Raw name of the current individual
    Name,
    /// Individual notes list
    Notes,
    /// Individual quotes list
    Quotes,
    /// Last association of the current individual
    Association,
    /// Last event of the current individual
    Event,
    /// Text lines of the current note record
    NoteText,
}

/// Record being built, as a slot in its entity table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CurrentRecord {
    #[default]
    None,
    Individual(usize),
    Family(usize),
    Note(usize),
}

/// Kind of record a level-0 tag opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Individual,
    Family,
    Note,
    /// Any other level-0 line (`HEAD`, `TRLR`, submitter records, ...)
    Other,
}

impl RecordKind {
    #[must_use]
    pub fn classify(tag: &str, config: &ParseConfig) -> Self {
        if tag.starts_with(&config.individual_prefix) {
            Self::Individual
        } else if tag.starts_with(&config.family_prefix) {
            Self::Family
        } else if tag.starts_with(&config.note_prefix) {
            Self::Note
        } else {
            Self::Other
        }
    }
}

/// The only state carried from one line to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContextTracker {
    record: CurrentRecord,
    focus: FocusTarget,
}

impl ContextTracker {
    /// Replace the whole context at a record boundary.
    pub fn begin(&mut self, record: CurrentRecord, focus: FocusTarget) {
        *self = Self { record, focus };
    }

    pub fn close(&mut self) {
        *self = Self::default();
    }

    pub fn set_focus(&mut self, focus: FocusTarget) {
        self.focus = focus;
    }

    #[must_use]
    pub const fn record(&self) -> CurrentRecord {
        self.record
    }

    #[must_use]
    pub const fn focus(&self) -> FocusTarget {
        self.focus
    }

    #[must_use]
    pub const fn has_record(&self) -> bool {
        !matches!(self.record, CurrentRecord::None)
    }
}
