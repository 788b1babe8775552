/// Normalize a raw `given /SURNAME/ suffix` name into its display form.
///
/// Only a value with exactly two slashes is rewritten; anything else is returned trimmed.
#[must_use]
pub fn format_name(raw: &str) -> String {
    let parts: Vec<&str> = raw.split('/').collect();
    if let [given, surname, suffix] = parts.as_slice() {
        format!(
            "{} {} {}",
            given.trim(),
            surname.to_uppercase(),
            suffix.trim()
        )
        .trim()
        .to_string()
    } else {
        raw.trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::format_name;

    #[test]
    fn uppercases_surname_between_slashes() {
        assert_eq!(format_name("John /Smith/ Jr"), "John SMITH Jr");
        assert_eq!(format_name("John /SMITH/ Jr"), "John SMITH Jr");
    }

    #[test]
    fn trims_missing_given_or_suffix() {
        assert_eq!(format_name("Mary /Jones/"), "Mary JONES");
        assert_eq!(format_name("/Nobody/"), "NOBODY");
    }

    #[test]
    fn leaves_names_without_slash_pair_untouched() {
        assert_eq!(format_name("Madonna"), "Madonna");
        assert_eq!(format_name("  Cher  "), "Cher");
        assert_eq!(format_name("Ann /Half"), "Ann /Half");
        assert_eq!(format_name("A /B/ C /D/"), "A /B/ C /D/");
    }

    #[test]
    fn uppercases_non_ascii_surnames() {
        assert_eq!(format_name("Zoë /Müller/"), "Zoë MÜLLER");
    }
}
