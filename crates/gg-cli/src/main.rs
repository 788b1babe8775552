#![forbid(unsafe_code)]

//! gedgraph CLI - turn GEDCOM records into a relationship graph.
//!
//! # Commands
//!
//! - `graph`: Output the `{nodes, links}` graph JSON
//! - `parse`: Output a parse summary or the resolved entity tables
//! - `validate`: Check input and report diagnostics and dangling links
//! - `inspect`: Show one person and every relationship touching them

use std::io::{self, Read, Write};
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use gg_core::{
    Diagnostic, DiagnosticSeverity, FamilyGraph, Individual, ParseConfig, StructuredDiagnostic,
};
use gg_graph::{dangling_links, links_of, neighbors, reverse_relation, synthesize, validate_links};
use gg_parser::{ParseResult, looks_like_gedcom, parse_evidence_json, parse_with_config};
use serde::Serialize;
use tracing::{debug, info, warn};

/// gedgraph CLI - turn GEDCOM records into a relationship graph.
#[derive(Debug, Parser)]
#[command(
    name = "gg-cli",
    version,
    about = "gedgraph CLI - turn GEDCOM records into a relationship graph",
    long_about = "Parses the line-oriented GEDCOM genealogy format and builds a graph of\n\
        individuals linked by sibling, spouse, parent and association relations."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose logging (can be repeated for more detail: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// TOML file overriding the tag vocabulary
    #[arg(long, global = true)]
    config: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Build the relationship graph and output it as JSON.
    Graph {
        /// Input file path or "-" for stdin. If omitted, reads from stdin.
        #[arg(default_value = "-")]
        input: String,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,

        /// Output file path. If omitted, writes to stdout.
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Parse a document and output a summary or the entity tables as JSON.
    Parse {
        /// Input file path or "-" for stdin.
        #[arg(default_value = "-")]
        input: String,

        /// Output the resolved entity tables (default is summary)
        #[arg(long)]
        full: bool,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Validate a document and report diagnostics.
    Validate {
        /// Input file path or "-" for stdin.
        #[arg(default_value = "-")]
        input: String,

        /// Output as JSON (structured diagnostics)
        #[arg(long)]
        json: bool,

        /// Exit with non-zero status on warnings (not just errors)
        #[arg(long)]
        strict: bool,
    },

    /// Show one individual and every relationship touching them.
    Inspect {
        /// Input file path or "-" for stdin.
        #[arg(default_value = "-")]
        input: String,

        /// Individual id, e.g. @I1@
        #[arg(long)]
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Result of validating a document.
#[derive(Debug, Serialize)]
struct ValidateResult {
    valid: bool,
    individual_count: usize,
    family_count: usize,
    note_count: usize,
    link_count: usize,
    dangling_link_count: usize,
    warning_count: usize,
    diagnostics: Vec<StructuredDiagnostic>,
    errors: Vec<ValidationError>,
}

#[derive(Debug, Serialize)]
struct ValidationError {
    code: String,
    message: String,
}

#[derive(Debug, Serialize)]
struct InspectResult<'a> {
    person: &'a Individual,
    neighbors: Vec<&'a str>,
    relationships: Vec<RelationshipView>,
}

/// One link seen from both ends.
#[derive(Debug, Serialize, PartialEq, Eq)]
struct RelationshipView {
    source: String,
    source_name: Option<String>,
    target: String,
    target_name: Option<String>,
    link_type: String,
    relation: Option<String>,
    reverse_relation: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Graph {
            input,
            pretty,
            output,
        } => cmd_graph(&input, &config, pretty, output.as_deref()),

        Command::Parse {
            input,
            full,
            pretty,
        } => cmd_parse(&input, &config, full, pretty),

        Command::Validate {
            input,
            json,
            strict,
        } => cmd_validate(&input, &config, json, strict),

        Command::Inspect { input, id, json } => cmd_inspect(&input, &config, &id, json),
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .without_time()
        .try_init();
}

fn load_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read from stdin")?;
        Ok(buffer)
    } else if Path::new(input).exists() {
        std::fs::read_to_string(input).context(format!("Failed to read file: {input}"))
    } else {
        // Treat as inline GEDCOM text
        Ok(input.to_string())
    }
}

fn load_config(path: Option<&str>) -> Result<ParseConfig> {
    let Some(path) = path else {
        return Ok(ParseConfig::default());
    };
    let raw =
        std::fs::read_to_string(path).context(format!("Failed to read config file: {path}"))?;
    let config: ParseConfig =
        toml::from_str(&raw).context(format!("Failed to parse config file: {path}"))?;
    config
        .validate()
        .context(format!("Invalid config file: {path}"))?;
    debug!(path, "loaded config");
    Ok(config)
}

fn write_output(output: Option<&str>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content).context(format!("Failed to write to: {path}"))?;
            info!("Wrote output to: {path}");
        }
        None => {
            io::stdout()
                .write_all(content.as_bytes())
                .context("Failed to write to stdout")?;
        }
    }
    Ok(())
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}

fn log_diagnostics(diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        if diagnostic.severity >= DiagnosticSeverity::Warning {
            warn!("Parse warning: {diagnostic}");
        } else {
            debug!("Parse note: {diagnostic}");
        }
    }
}

fn run_pipeline(source: &str, config: &ParseConfig) -> (ParseResult, FamilyGraph) {
    let parse_start = Instant::now();
    let parsed = parse_with_config(source, config);
    let parse_ms = parse_start.elapsed().as_secs_f64() * 1000.0;

    let graph_start = Instant::now();
    let graph = synthesize(&parsed.document);
    let graph_ms = graph_start.elapsed().as_secs_f64() * 1000.0;

    info!(
        individuals = parsed.document.individuals.len(),
        links = graph.links.len(),
        parse_ms,
        graph_ms,
        "pipeline complete"
    );
    (parsed, graph)
}

// =============================================================================
// Command: graph
// =============================================================================

fn cmd_graph(input: &str, config: &ParseConfig, pretty: bool, output: Option<&str>) -> Result<()> {
    let source = load_input(input)?;
    let (parsed, graph) = run_pipeline(&source, config);

    let mut json = to_json(&graph, pretty)?;
    json.push('\n');
    write_output(output, &json)?;

    log_diagnostics(&parsed.diagnostics);
    Ok(())
}

// =============================================================================
// Command: parse
// =============================================================================

fn cmd_parse(input: &str, config: &ParseConfig, full: bool, pretty: bool) -> Result<()> {
    let source = load_input(input)?;
    let parsed = parse_with_config(&source, config);

    let output = if full {
        to_json(&parsed.document, pretty)?
    } else if pretty {
        let value: serde_json::Value = serde_json::from_str(&parse_evidence_json(&parsed))?;
        serde_json::to_string_pretty(&value)?
    } else {
        parse_evidence_json(&parsed)
    };

    println!("{output}");

    log_diagnostics(&parsed.diagnostics);
    Ok(())
}

// =============================================================================
// Command: validate
// =============================================================================

fn validate_source(source: &str, config: &ParseConfig, strict: bool) -> ValidateResult {
    let (parsed, graph) = run_pipeline(source, config);

    let mut errors = Vec::new();
    if !looks_like_gedcom(source) {
        errors.push(ValidationError {
            code: "E001".to_string(),
            message: "Input does not start with a level-0 record line".to_string(),
        });
    }
    if parsed.document.is_empty() {
        errors.push(ValidationError {
            code: "E002".to_string(),
            message: "Document has no individual, family or note records".to_string(),
        });
    }

    let mut diagnostics = parsed.diagnostics;
    diagnostics.extend(validate_links(&graph));
    let warning_count = diagnostics
        .iter()
        .filter(|diagnostic| diagnostic.severity >= DiagnosticSeverity::Warning)
        .count();

    ValidateResult {
        valid: errors.is_empty() && (!strict || warning_count == 0),
        individual_count: parsed.document.individuals.len(),
        family_count: parsed.document.families.len(),
        note_count: parsed.document.notes.len(),
        link_count: graph.links.len(),
        dangling_link_count: dangling_links(&graph).len(),
        warning_count,
        diagnostics: diagnostics
            .iter()
            .map(StructuredDiagnostic::from_diagnostic)
            .collect(),
        errors,
    }
}

fn cmd_validate(input: &str, config: &ParseConfig, json_output: bool, strict: bool) -> Result<()> {
    let source = load_input(input)?;
    let result = validate_source(&source, config, strict);

    if json_output {
        let output = serde_json::to_string_pretty(&result)?;
        println!("{output}");
    } else {
        if result.valid {
            println!("✓ Valid GEDCOM document");
        } else {
            println!("✗ Invalid GEDCOM document");
        }

        println!("  Individuals: {}", result.individual_count);
        println!("  Families:    {}", result.family_count);
        println!("  Notes:       {}", result.note_count);
        println!(
            "  Links:       {} ({} dangling)",
            result.link_count, result.dangling_link_count
        );

        if !result.errors.is_empty() {
            println!("\nErrors:");
            for err in &result.errors {
                println!("  [{}] {}", err.code, err.message);
            }
        }

        if !result.diagnostics.is_empty() {
            println!("\nDiagnostics:");
            for diag in &result.diagnostics {
                let location = diag
                    .source_line
                    .map(|line| format!(" (line {line})"))
                    .unwrap_or_default();
                println!(
                    "  [{}] {}: {}{}",
                    diag.error_code, diag.severity, diag.message, location
                );
            }
        }
    }

    if !result.valid {
        std::process::exit(1);
    }

    Ok(())
}

// =============================================================================
// Command: inspect
// =============================================================================

fn relationship_views(graph: &FamilyGraph, id: &str) -> Vec<RelationshipView> {
    let name_of = |node_id: &str| graph.node(node_id).map(|node| node.name.clone());
    links_of(graph, id)
        .map(|link| RelationshipView {
            source: link.source.clone(),
            source_name: name_of(link.source.as_str()),
            target: link.target.clone(),
            target_name: name_of(link.target.as_str()),
            link_type: link.link_type.as_str().to_string(),
            relation: link.relation.clone(),
            reverse_relation: reverse_relation(graph, link).map(str::to_string),
        })
        .collect()
}

fn describe_person(person: &Individual) -> Vec<String> {
    let mut lines = vec![format!("Name:       {}", person.name)];
    if let Some(nickname) = &person.nickname {
        lines.push(format!("Nickname:   {nickname}"));
    }
    if let Some(email) = &person.email {
        lines.push(format!("Email:      {email}"));
    }
    lines.push(format!(
        "Sex:        {}",
        person.sex.as_deref().unwrap_or("unknown")
    ));
    lines.push(format!(
        "Occupation: {}",
        person.occupation.as_deref().unwrap_or("unknown occupation")
    ));
    lines.push(match &person.birth {
        Some(birth) => format!(
            "Birth:      {} at {}",
            birth.date.as_deref().unwrap_or("unknown date"),
            birth.place.as_deref().unwrap_or("unknown place")
        ),
        None => "Birth:      unknown birth".to_string(),
    });
    if let Some(death) = person.death.as_ref().filter(|death| death.status) {
        lines.push(format!(
            "Death:      {} at {}",
            death.date.as_deref().unwrap_or("unknown date"),
            death.place.as_deref().unwrap_or("unknown place")
        ));
    }

    lines.push("Notes:".to_string());
    if person.notes.is_empty() {
        lines.push("  - no notes".to_string());
    }
    lines.extend(person.notes.iter().map(|note| format!("  - {note}")));

    lines.push("Events:".to_string());
    if person.events.is_empty() {
        lines.push("  - no events".to_string());
    }
    for event in &person.events {
        let value = event
            .value
            .as_deref()
            .map(|value| format!("{value} - "))
            .unwrap_or_default();
        let place = event
            .place
            .as_deref()
            .map(|place| format!(" at {place}"))
            .unwrap_or_default();
        lines.push(format!(
            "  - {}: {value}{}{place}",
            event.event_type.as_deref().unwrap_or("unknown type"),
            event.date.as_deref().unwrap_or("unknown date"),
        ));
    }
    lines
}

fn display_name(id: &str, name: Option<&String>) -> String {
    match name {
        Some(name) if !name.is_empty() => name.clone(),
        _ => id.to_string(),
    }
}

fn cmd_inspect(input: &str, config: &ParseConfig, id: &str, json_output: bool) -> Result<()> {
    let source = load_input(input)?;
    let (parsed, graph) = run_pipeline(&source, config);

    let Some(person) = graph.node(id) else {
        bail!("No individual with id {id}");
    };
    let relationships = relationship_views(&graph, id);

    if json_output {
        let result = InspectResult {
            person,
            neighbors: neighbors(&graph, id),
            relationships,
        };
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        for line in describe_person(person) {
            println!("{line}");
        }
        println!("Relationships:");
        if relationships.is_empty() {
            println!("  - none");
        }
        for view in &relationships {
            let source = display_name(&view.source, view.source_name.as_ref());
            let target = display_name(&view.target, view.target_name.as_ref());
            println!(
                "  - {source} to {target}: {}",
                view.relation.as_deref().unwrap_or("unknown")
            );
            println!(
                "    {target} to {source}: {}",
                view.reverse_relation.as_deref().unwrap_or("N/A")
            );
        }
    }

    log_diagnostics(&parsed.diagnostics);
    Ok(())
}
