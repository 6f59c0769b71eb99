/// Split bulk input into clean task titles.
///
/// Commas, semicolons, and newlines all separate titles. Fragments are
/// trimmed and empty ones dropped, so stray separators and padding are
/// harmless. Order is preserved. Any input yields a list, possibly empty.
pub fn parse_titles(raw: &str) -> Vec<String> {
    raw.split([',', ';', '\n'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn splits_commas_and_drops_noise() {
        assert_eq!(
            parse_titles(" Workout , Read Book, ,Meditate ,,  Code  "),
            ["Workout", "Read Book", "Meditate", "Code"]
        );
    }

    #[test]
    fn semicolons_and_newlines_also_separate() {
        assert_eq!(
            parse_titles("Inbox zero; Water plants\nCall mom"),
            ["Inbox zero", "Water plants", "Call mom"]
        );
    }

    #[test]
    fn crlf_line_endings_leave_no_residue() {
        assert_eq!(parse_titles("One\r\nTwo\r\n"), ["One", "Two"]);
    }

    #[test]
    fn empty_and_separator_only_input_yield_nothing() {
        assert_eq!(parse_titles(""), Vec::<String>::new());
        assert_eq!(parse_titles("  \n ; , ,\n"), Vec::<String>::new());
    }

    #[test]
    fn inner_spaces_survive() {
        assert_eq!(
            parse_titles("Plan the week ahead"),
            ["Plan the week ahead"]
        );
    }
}
