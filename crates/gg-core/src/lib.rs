#![forbid(unsafe_code)]

mod config;

pub use config::ParseConfig;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    #[must_use]
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub fn at_line(line: usize, line_len: usize) -> Self {
        let start = Position { line, col: 1 };
        let end = Position {
            line,
            col: line_len.max(1),
        };
        Self::new(start, end)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Error, PartialEq, Eq)]
pub enum GedError {
    #[error("invalid config field '{field}': {message}")]
    Config { field: String, message: String },
    #[error("serialization failed: {0}")]
    Json(String),
}

impl From<serde_json::Error> for GedError {
    fn from(error: serde_json::Error) -> Self {
        Self::Json(error.to_string())
    }
}

/// Birth sub-record. Both fields stay `None` until a level-2 DATE/PLAC fills them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Birth {
    pub date: Option<String>,
    pub place: Option<String>,
}

/// Death sub-record. `status` is set by the presence of a DEAT tag alone.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Death {
    pub date: Option<String>,
    pub place: Option<String>,
    pub status: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Event {
    pub value: Option<String>,
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    pub date: Option<String>,
    pub place: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Association {
    /// Pointer id of the associated individual. May dangle.
    pub person: String,
    pub relation: Option<String>,
    #[serde(default)]
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Individual {
    pub id: String,
    /// Display name produced by the name formatter; empty when no NAME line was seen.
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sex: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth: Option<Birth>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub death: Option<Death>,
    #[serde(default)]
    pub notes: Vec<String>,
    #[serde(default)]
    pub quotes: Vec<String>,
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub associations: Vec<Association>,
    /// FAMC back-references, in declaration order.
    #[serde(default)]
    pub families: Vec<String>,
}

impl Individual {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_deceased(&self) -> bool {
        self.death.as_ref().is_some_and(|death| death.status)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Family {
    pub id: String,
    pub husband: Option<String>,
    pub wife: Option<String>,
    #[serde(default)]
    pub children: Vec<String>,
}

impl Family {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Note {
    pub id: String,
    #[serde(default)]
    pub text: Vec<String>,
}

impl Note {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: Vec::new(),
        }
    }

    /// Text lines joined without a separator, as substituted for note pointers.
    #[must_use]
    pub fn joined_text(&self) -> String {
        self.text.concat()
    }
}

/// Entity tables of one parsed document, each in first-appearance order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct GedcomDocument {
    pub individuals: Vec<Individual>,
    pub families: Vec<Family>,
    pub notes: Vec<Note>,
}

impl GedcomDocument {
    #[must_use]
    pub fn individual(&self, id: &str) -> Option<&Individual> {
        self.individuals.iter().find(|individual| individual.id == id)
    }

    #[must_use]
    pub fn family(&self, id: &str) -> Option<&Family> {
        self.families.iter().find(|family| family.id == id)
    }

    #[must_use]
    pub fn note(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty() && self.families.is_empty() && self.notes.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum LinkType {
    Association,
    #[default]
    Family,
}

impl LinkType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Association => "association",
            Self::Family => "family",
        }
    }
}

/// Relations synthesized from family records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FamilyRelation {
    Sibling,
    Spouse,
    Parent,
}

impl FamilyRelation {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sibling => "Sibling",
            Self::Spouse => "Spouse",
            Self::Parent => "Parent",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct GraphLink {
    pub source: String,
    pub target: String,
    pub relation: Option<String>,
    #[serde(rename = "type")]
    pub link_type: LinkType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<Vec<String>>,
}

impl GraphLink {
    #[must_use]
    pub fn family(
        source: impl Into<String>,
        target: impl Into<String>,
        relation: FamilyRelation,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            relation: Some(relation.as_str().to_string()),
            link_type: LinkType::Family,
            notes: None,
        }
    }

    #[must_use]
    pub fn touches(&self, id: &str) -> bool {
        self.source == id || self.target == id
    }
}

/// Graph nodes carry every individual attribute, so the node type is the individual itself.
pub type GraphNode = Individual;

/// The value handed to rendering collaborators.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct FamilyGraph {
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphLink>,
}

impl FamilyGraph {
    /// Find a node by id, returning its index.
    #[must_use]
    pub fn find_node_index(&self, id: &str) -> Option<usize> {
        self.nodes.iter().position(|node| node.id == id)
    }

    /// Find a node by id.
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|node| node.id == id)
    }
}

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, PartialOrd, Ord)]
pub enum DiagnosticSeverity {
    Hint,
    #[default]
    Info,
    /// Input was accepted but something was dropped or replaced
    Warning,
    Error,
}

impl DiagnosticSeverity {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hint => "hint",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// Category of diagnostic for filtering and grouping.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum DiagnosticCategory {
    /// Line could not be split into level and tag
    Tokenizer,
    /// Record nesting, duplicate ids, ignored tags
    #[default]
    Structure,
    /// Pointer ids without a matching record
    Reference,
}

impl DiagnosticCategory {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tokenizer => "tokenizer",
            Self::Structure => "structure",
            Self::Reference => "reference",
        }
    }
}

/// A non-fatal observation made while parsing or validating a document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Diagnostic {
    pub severity: DiagnosticSeverity,
    pub category: DiagnosticCategory,
    pub message: String,
    /// Source line where the issue occurred
    pub span: Option<Span>,
    /// Offending text, if any
    pub found: Option<String>,
}

impl Diagnostic {
    #[must_use]
    pub fn new(severity: DiagnosticSeverity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(DiagnosticSeverity::Warning, message)
    }

    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(DiagnosticSeverity::Info, message)
    }

    #[must_use]
    pub fn with_category(mut self, category: DiagnosticCategory) -> Self {
        self.category = category;
        self
    }

    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    #[must_use]
    pub fn with_found(mut self, found: impl Into<String>) -> Self {
        self.found = Some(found.into());
        self
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.severity, DiagnosticSeverity::Error)
    }

    #[must_use]
    pub const fn is_warning(&self) -> bool {
        matches!(self.severity, DiagnosticSeverity::Warning)
    }

    #[must_use]
    pub fn line(&self) -> Option<usize> {
        self.span.map(|span| span.start.line)
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.line() {
            Some(line) => write!(f, "Line {line}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Stable, machine-readable diagnostics payload for automation surfaces.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct StructuredDiagnostic {
    pub error_code: String,
    pub severity: String,
    pub message: String,
    pub source_line: Option<usize>,
    pub source_column: Option<usize>,
    pub found: Option<String>,
}

impl StructuredDiagnostic {
    #[must_use]
    pub fn from_diagnostic(diagnostic: &Diagnostic) -> Self {
        let (source_line, source_column) = diagnostic
            .span
            .map(|span| (Some(span.start.line), Some(span.start.col)))
            .unwrap_or((None, None));

        Self {
            error_code: format!("gedcom/diag/{}", diagnostic.category.as_str()),
            severity: diagnostic.severity.as_str().to_string(),
            message: diagnostic.message.clone(),
            source_line,
            source_column,
            found: diagnostic.found.clone(),
        }
    }
}

/// Counts of diagnostics by severity level.
#[derive(Debug, Clone, Copy, Serialize, Default, PartialEq, Eq)]
pub struct DiagnosticCounts {
    pub hints: usize,
    pub infos: usize,
    pub warnings: usize,
    pub errors: usize,
}

impl DiagnosticCounts {
    #[must_use]
    pub fn tally(diagnostics: &[Diagnostic]) -> Self {
        let mut counts = Self::default();
        for diag in diagnostics {
            match diag.severity {
                DiagnosticSeverity::Hint => counts.hints += 1,
                DiagnosticSeverity::Info => counts.infos += 1,
                DiagnosticSeverity::Warning => counts.warnings += 1,
                DiagnosticSeverity::Error => counts.errors += 1,
            }
        }
        counts
    }

    #[must_use]
    pub const fn total(&self) -> usize {
        self.hints + self.infos + self.warnings + self.errors
    }
}
