/// Canonical comparison form: lower-cased, with every character outside
/// `[a-z0-9]` removed. Absent input normalizes to the empty string.
pub fn normalize<'a>(text: impl Into<Option<&'a str>>) -> String {
    text.into()
        .unwrap_or_default()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_case_and_punctuation() {
        assert_eq!(normalize("User_Email"), "useremail");
        assert_eq!(normalize("Zip / Postal Code"), "zippostalcode");
        assert_eq!(normalize("E-mail Address 2"), "emailaddress2");
    }

    #[test]
    fn absent_and_blank_are_empty() {
        assert_eq!(normalize(None), "");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize(" -_/.,!? "), "");
    }

    #[test]
    fn idempotent() {
        for s in ["First Name", "état civil", "ÀB-c 9", "already"] {
            let once = normalize(s);
            assert_eq!(normalize(once.as_str()), once);
        }
    }

    #[test]
    fn non_ascii_letters_are_dropped() {
        assert_eq!(normalize("Straße"), "strae");
    }
}
