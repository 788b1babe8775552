//! Parser configuration.

use serde::{Deserialize, Serialize};

use crate::GedError;

/// Tag vocabulary and reporting switches for one parse.
///
/// Every field has a default, so a partial TOML or JSON document is enough to override a
/// single value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ParseConfig {
    /// Level-0 tag prefix that starts an individual record.
    pub individual_prefix: String,
    /// Level-0 tag prefix that starts a family record.
    pub family_prefix: String,
    /// Level-0 tag prefix that starts a note record; also identifies note pointers.
    pub note_prefix: String,
    /// Appends to the last focused line without a separator.
    pub concatenation_tag: String,
    /// Appends a new line to the focused sequence.
    pub continuation_tag: String,
    /// DATE/PLAC value treated as absent (compared case-insensitively).
    pub unknown_value: String,
    /// Emit a diagnostic for every unrecognized level-1 tag.
    pub report_unknown_tags: bool,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            individual_prefix: "@I".to_string(),
            family_prefix: "@F".to_string(),
            note_prefix: "@N".to_string(),
            concatenation_tag: "CONC".to_string(),
            continuation_tag: "CONT".to_string(),
            unknown_value: "unknown".to_string(),
            report_unknown_tags: false,
        }
    }
}

impl ParseConfig {
    pub fn validate(&self) -> Result<(), GedError> {
        let prefixes = [
            ("individual_prefix", &self.individual_prefix),
            ("family_prefix", &self.family_prefix),
            ("note_prefix", &self.note_prefix),
        ];

        for (field, prefix) in prefixes {
            if prefix.trim().is_empty() {
                return Err(config_error(field, "must not be empty"));
            }
            if prefix.chars().any(char::is_whitespace) {
                return Err(config_error(field, "must not contain whitespace"));
            }
        }

        for (index, (field, prefix)) in prefixes.iter().enumerate() {
            for (other_field, other) in &prefixes[index + 1..] {
                if other.starts_with(prefix.as_str()) || prefix.starts_with(other.as_str()) {
                    return Err(config_error(
                        field,
                        &format!("overlaps with {other_field} ('{prefix}' vs '{other}')"),
                    ));
                }
            }
        }

        for (field, tag) in [
            ("concatenation_tag", &self.concatenation_tag),
            ("continuation_tag", &self.continuation_tag),
        ] {
            if tag.trim().is_empty() {
                return Err(config_error(field, "must not be empty"));
            }
        }
        if self.concatenation_tag == self.continuation_tag {
            return Err(config_error(
                "continuation_tag",
                "must differ from concatenation_tag",
            ));
        }

        Ok(())
    }

    #[must_use]
    pub fn is_unknown(&self, value: &str) -> bool {
        value.eq_ignore_ascii_case(&self.unknown_value)
    }

    /// True for values shaped like a note pointer, e.g. `@N12@`.
    #[must_use]
    pub fn is_note_pointer(&self, value: &str) -> bool {
        value.len() > self.note_prefix.len()
            && value.starts_with(&self.note_prefix)
            && value.ends_with('@')
            && !value.chars().any(char::is_whitespace)
    }
}

fn config_error(field: &str, message: &str) -> GedError {
    GedError::Config {
        field: field.to_string(),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::ParseConfig;
    use crate::GedError;

    #[test]
    fn default_config_is_valid() {
        let config = ParseConfig::default();
        assert_eq!(config.individual_prefix, "@I");
        assert_eq!(config.concatenation_tag, "CONC");
        assert!(!config.report_unknown_tags);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_overrides_single_field() {
        let config: ParseConfig =
            serde_json::from_str(r#"{ "unknown_value": "n/a" }"#).expect("parse config");
        assert_eq!(config.unknown_value, "n/a");
        assert_eq!(config.note_prefix, "@N");
    }

    #[test]
    fn rejects_empty_prefix() {
        let config = ParseConfig {
            family_prefix: " ".to_string(),
            ..ParseConfig::default()
        };
        let Err(GedError::Config { field, .. }) = config.validate() else {
            panic!("expected config error");
        };
        assert_eq!(field, "family_prefix");
    }

    #[test]
    fn rejects_overlapping_prefixes() {
        let config = ParseConfig {
            note_prefix: "@".to_string(),
            ..ParseConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_identical_continuation_tags() {
        let config = ParseConfig {
            continuation_tag: "CONC".to_string(),
            ..ParseConfig::default()
        };
        let error = config.validate().expect_err("identical tags");
        assert!(error.to_string().contains("continuation_tag"));
    }

    #[test]
    fn unknown_value_is_case_insensitive() {
        let config = ParseConfig::default();
        assert!(config.is_unknown("UNKNOWN"));
        assert!(config.is_unknown("Unknown"));
        assert!(!config.is_unknown("unknown date"));
    }

    #[test]
    fn note_pointer_shape() {
        let config = ParseConfig::default();
        assert!(config.is_note_pointer("@N1@"));
        assert!(!config.is_note_pointer("@N"));
        assert!(!config.is_note_pointer("@N1"));
        assert!(!config.is_note_pointer("@N1@ extra"));
        assert!(!config.is_note_pointer("Lived in @N1@"));
        assert!(!config.is_note_pointer("@I1@"));
    }
}
