//! Canonical form of a scenario block for comparison
//!
//! Only incidental whitespace is removed: line endings are unified, trailing
//! whitespace is stripped from every line and the whole text is trimmed.
//! Indentation, case and comments are left untouched.

/// Normalize a scenario block
///
/// Pure and idempotent: `normalize(&normalize(t)) == normalize(t)`.
#[must_use]
pub fn normalize(text: &str) -> String {
    let unified = text.replace("\r\n", "\n").replace('\r', "\n");
    let stripped: Vec<&str> = unified.split('\n').map(str::trim_end).collect();
    stripped.join("\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn unifies_line_endings() {
        assert_eq!(normalize("a\r\nb\rc\n"), "a\nb\nc");
    }

    #[test]
    fn strips_trailing_whitespace_per_line() {
        assert_eq!(
            normalize("Scenario: x   \n  Given a \t\n  Then b"),
            "Scenario: x\n  Given a\n  Then b"
        );
    }

    #[test]
    fn trims_surrounding_blank_lines() {
        assert_eq!(normalize("\n\n  \n@A-1\nScenario: x\n\n\n"), "@A-1\nScenario: x");
    }

    #[test]
    fn keeps_indentation_case_and_comments() {
        let text = "Scenario: x\n    # note\n  given A";
        assert_eq!(normalize(text), text);
        assert_ne!(normalize("  Given a"), normalize("  given a"));
        assert_ne!(normalize("x\n  Given a"), normalize("x\n    Given a"));
    }

    #[test]
    fn inner_blank_lines_are_meaningful() {
        assert_ne!(normalize("a\n\nb"), normalize("a\nb"));
    }

    proptest! {
        #[test]
        fn prop_idempotent(text in "[ \t\r\na-zA-Z@#:|-]{0,120}") {
            let once = normalize(&text);
            prop_assert_eq!(normalize(&once), once);
        }

        #[test]
        fn prop_ignores_trailing_whitespace(
            lines in proptest::collection::vec("[a-zA-Z@:][a-zA-Z @:]{0,20}", 1..8),
            pad in "[ \t]{0,4}",
        ) {
            let plain = lines.join("\n");
            let padded = lines
                .iter()
                .map(|l| format!("{l}{pad}"))
                .collect::<Vec<_>>()
                .join("\r\n");
            prop_assert_eq!(normalize(&format!("\n\n{padded}\n  \n")), normalize(&plain));
        }
    }
}
