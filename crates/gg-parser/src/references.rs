use gg_core::{Diagnostic, DiagnosticCategory, Individual, Note, ParseConfig};
use rustc_hash::FxHashMap;

/// Replace note pointers in every individual's notes with the referenced note text.
///
/// Must run once, after every note record has been built, so forward references resolve.
/// A pointer without a matching note becomes an empty string and yields a warning.
pub fn resolve_note_references(
    individuals: &mut [Individual],
    notes: &[Note],
    config: &ParseConfig,
) -> Vec<Diagnostic> {
    let text_by_id: FxHashMap<&str, String> = notes
        .iter()
        .map(|note| (note.id.as_str(), note.joined_text()))
        .collect();
    let mut diagnostics = Vec::new();

    for individual in individuals.iter_mut() {
        for entry in &mut individual.notes {
            if !config.is_note_pointer(entry) {
                continue;
            }
            match text_by_id.get(entry.as_str()) {
                Some(text) => entry.clone_from(text),
                None => {
                    diagnostics.push(
                        Diagnostic::warning(format!(
                            "Individual {} references missing note {entry}",
                            individual.id
                        ))
                        .with_category(DiagnosticCategory::Reference)
                        .with_found(entry.as_str()),
                    );
                    entry.clear();
                }
            }
        }
    }

    diagnostics
}

#[cfg(test)]
mod tests {
    use gg_core::{DiagnosticCategory, Individual, Note, ParseConfig};

    use super::resolve_note_references;

    fn note(id: &str, lines: &[&str]) -> Note {
        Note {
            id: id.to_string(),
            text: lines.iter().map(|line| (*line).to_string()).collect(),
        }
    }

    #[test]
    fn replaces_pointer_with_joined_note_text() {
        let mut individual = Individual::new("@I1@");
        individual.notes = vec!["@N1@".to_string()];
        let mut individuals = vec![individual];

        let diagnostics = resolve_note_references(
            &mut individuals,
            &[note("@N1@", &["Born in", "Springfield"])],
            &ParseConfig::default(),
        );

        assert!(diagnostics.is_empty());
        assert_eq!(individuals[0].notes, vec!["Born inSpringfield"]);
    }

    #[test]
    fn missing_note_resolves_to_empty_string_with_warning() {
        let mut individual = Individual::new("@I1@");
        individual.notes = vec!["@N404@".to_string()];
        let mut individuals = vec![individual];

        let diagnostics =
            resolve_note_references(&mut individuals, &[], &ParseConfig::default());

        assert_eq!(individuals[0].notes, vec![String::new()]);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].category, DiagnosticCategory::Reference);
        assert_eq!(diagnostics[0].found.as_deref(), Some("@N404@"));
    }

    #[test]
    fn plain_text_notes_are_untouched_even_when_list_is_non_empty() {
        let mut individual = Individual::new("@I1@");
        individual.notes = vec![
            "Loved gardening".to_string(),
            "@N2@".to_string(),
            "See @N2@ for details".to_string(),
        ];
        let mut individuals = vec![individual];

        resolve_note_references(
            &mut individuals,
            &[note("@N2@", &["Second ", "son"])],
            &ParseConfig::default(),
        );

        assert_eq!(
            individuals[0].notes,
            vec!["Loved gardening", "Second son", "See @N2@ for details"]
        );
    }
}
