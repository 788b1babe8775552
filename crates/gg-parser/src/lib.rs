#![forbid(unsafe_code)]

mod context;
mod continuation;
mod entity_builder;
mod name;
mod references;
mod tokenizer;

use gg_core::{Diagnostic, DiagnosticCounts, GedcomDocument, ParseConfig};
use serde::Serialize;
use serde_json::json;
use tracing::debug;

pub use context::{ContextTracker, CurrentRecord, FocusTarget, RecordKind};
pub use continuation::{ContinuationKind, ContinuationTarget, apply_continuation};
pub use name::format_name;
pub use references::resolve_note_references;
pub use tokenizer::{RecordLine, tokenize_line};

use entity_builder::EntityBuilder;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseResult {
    /// Entity tables with note references already resolved.
    pub document: GedcomDocument,
    /// Everything the parser ignored, replaced or could not resolve.
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseResult {
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_warning)
    }

    #[must_use]
    pub fn diagnostic_counts(&self) -> DiagnosticCounts {
        DiagnosticCounts::tally(&self.diagnostics)
    }
}

/// Incremental parser. Lines may arrive one at a time or in arbitrary chunks; the result
/// is the same as parsing the concatenated text in one call.
pub struct GedcomParser {
    builder: EntityBuilder,
    pending: String,
}

impl Default for GedcomParser {
    fn default() -> Self {
        Self::new()
    }
}

impl GedcomParser {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ParseConfig::default())
    }

    #[must_use]
    pub fn with_config(config: ParseConfig) -> Self {
        Self {
            builder: EntityBuilder::new(config),
            pending: String::new(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &ParseConfig {
        self.builder.config()
    }

    /// Feed one complete line (without its terminator).
    ///
    /// Do not interleave with [`GedcomParser::feed_chunk`] while a partial line is pending.
    pub fn feed_line(&mut self, line: &str) {
        self.builder.feed_line(line);
    }

    /// Feed an arbitrary slice of the input; a trailing partial line is held back until the
    /// next chunk or [`GedcomParser::finish`].
    pub fn feed_chunk(&mut self, chunk: &str) {
        self.pending.push_str(chunk);
        while let Some(newline) = self.pending.find('\n') {
            let line: String = self.pending.drain(..=newline).collect();
            let line = line.strip_suffix('\n').unwrap_or(&line);
            let line = line.strip_suffix('\r').unwrap_or(line);
            self.builder.feed_line(line);
        }
    }

    /// Flush any pending partial line and run the reference resolution pass.
    #[must_use]
    pub fn finish(mut self) -> ParseResult {
        if !self.pending.is_empty() {
            let line = std::mem::take(&mut self.pending);
            self.builder.feed_line(line.strip_suffix('\r').unwrap_or(&line));
        }

        let (mut document, mut diagnostics, config) = self.builder.finish();
        diagnostics.extend(resolve_note_references(
            &mut document.individuals,
            &document.notes,
            &config,
        ));

        debug!(
            individuals = document.individuals.len(),
            families = document.families.len(),
            notes = document.notes.len(),
            diagnostics = diagnostics.len(),
            "parsed document"
        );

        ParseResult {
            document,
            diagnostics,
        }
    }
}

/// Parse a complete document with the default tag vocabulary.
#[must_use]
pub fn parse(input: &str) -> ParseResult {
    parse_with_config(input, &ParseConfig::default())
}

#[must_use]
pub fn parse_with_config(input: &str, config: &ParseConfig) -> ParseResult {
    let mut parser = GedcomParser::with_config(config.clone());
    for line in input.lines() {
        parser.feed_line(line);
    }
    parser.finish()
}

/// True when the first non-blank line is a level-0 record line.
#[must_use]
pub fn looks_like_gedcom(input: &str) -> bool {
    input
        .lines()
        .map(|line| line.trim_start_matches('\u{feff}'))
        .find(|line| !line.trim().is_empty())
        .and_then(tokenize_line)
        .is_some_and(|line| line.level == 0)
}

#[must_use]
pub fn parse_evidence_json(parsed: &ParseResult) -> String {
    let counts = parsed.diagnostic_counts();
    json!({
        "individual_count": parsed.document.individuals.len(),
        "family_count": parsed.document.families.len(),
        "note_count": parsed.document.notes.len(),
        "diagnostic_count": counts.total(),
        "warning_count": counts.warnings,
        "warnings": parsed
            .diagnostics
            .iter()
            .filter(|diagnostic| diagnostic.is_warning())
            .map(ToString::to_string)
            .collect::<Vec<_>>(),
    })
    .to_string()
}
