/// The two continuation conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContinuationKind {
    /// Text wrapped mid-word: glue onto the last line with no separator.
    Concatenate,
    /// Explicit newline: start a new line.
    NewLine,
}

/// Field a continuation line resolves to once the focus has been looked up.
#[derive(Debug)]
pub enum ContinuationTarget<'a> {
    Sequence(&'a mut Vec<String>),
    Scalar(&'a mut String),
    OptionalScalar(&'a mut Option<String>),
    Nothing,
}

/// Apply one continuation value. Returns `false` when the line was a no-op.
pub fn apply_continuation(
    kind: ContinuationKind,
    value: &str,
    target: ContinuationTarget<'_>,
) -> bool {
    match (kind, target) {
        (ContinuationKind::Concatenate, ContinuationTarget::Sequence(lines)) => {
            match lines.last_mut() {
                Some(last) => last.push_str(value),
                None => lines.push(value.to_string()),
            }
            true
        }
        (ContinuationKind::NewLine, ContinuationTarget::Sequence(lines)) => {
            lines.push(value.to_string());
            true
        }
        (ContinuationKind::Concatenate, ContinuationTarget::Scalar(text)) => {
            text.push_str(value);
            true
        }
        (ContinuationKind::Concatenate, ContinuationTarget::OptionalScalar(slot)) => {
            match slot.as_mut() {
                Some(text) => text.push_str(value),
                None if value.is_empty() => return false,
                None => *slot = Some(value.to_string()),
            }
            true
        }
        (ContinuationKind::NewLine, _) | (_, ContinuationTarget::Nothing) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::{ContinuationKind, ContinuationTarget, apply_continuation};

    #[test]
    fn concatenation_joins_without_separator() {
        let mut lines = vec!["Emigrated to Ameri".to_string()];
        assert!(apply_continuation(
            ContinuationKind::Concatenate,
            "ca in 1902",
            ContinuationTarget::Sequence(&mut lines),
        ));
        assert_eq!(lines, vec!["Emigrated to America in 1902".to_string()]);
    }

    #[test]
    fn continuation_appends_new_element() {
        let mut lines = vec!["first".to_string()];
        apply_continuation(
            ContinuationKind::NewLine,
            "second",
            ContinuationTarget::Sequence(&mut lines),
        );
        apply_continuation(
            ContinuationKind::NewLine,
            "third",
            ContinuationTarget::Sequence(&mut lines),
        );
        assert_eq!(lines, vec!["first", "second", "third"]);
    }

    #[test]
    fn concatenation_on_empty_sequence_starts_a_line() {
        let mut lines = Vec::new();
        apply_continuation(
            ContinuationKind::Concatenate,
            "orphan",
            ContinuationTarget::Sequence(&mut lines),
        );
        assert_eq!(lines, vec!["orphan"]);
    }

    #[test]
    fn scalar_accepts_concatenation_only() {
        let mut name = "John /Sm".to_string();
        assert!(apply_continuation(
            ContinuationKind::Concatenate,
            "ith/",
            ContinuationTarget::Scalar(&mut name),
        ));
        assert!(!apply_continuation(
            ContinuationKind::NewLine,
            "Jr",
            ContinuationTarget::Scalar(&mut name),
        ));
        assert_eq!(name, "John /Smith/");
    }

    #[test]
    fn optional_scalar_is_filled_then_extended() {
        let mut value = None;
        apply_continuation(
            ContinuationKind::Concatenate,
            "Graduated ",
            ContinuationTarget::OptionalScalar(&mut value),
        );
        apply_continuation(
            ContinuationKind::Concatenate,
            "with honours",
            ContinuationTarget::OptionalScalar(&mut value),
        );
        assert_eq!(value.as_deref(), Some("Graduated with honours"));
    }

    #[test]
    fn nothing_target_is_a_no_op() {
        assert!(!apply_continuation(
            ContinuationKind::Concatenate,
            "lost",
            ContinuationTarget::Nothing,
        ));
    }
}
