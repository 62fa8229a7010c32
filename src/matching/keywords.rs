use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;

use crate::matching::normalize::normalize;

/// Synonym phrases for well-known profile keys, e.g. `firstName` →
/// `["first name", "given name"]`.
///
/// Canonical names and synonyms are stored normalized, so a profile key
/// `first_name` or `First Name` looks up the same entry as `firstName`.
/// Phrases that normalize to nothing are dropped.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "BTreeMap<String, Vec<String>>")]
pub struct KeywordDictionary {
    synonyms: HashMap<String, Vec<String>>,
}

impl KeywordDictionary {
    pub fn new<I, K, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Vec<S>)>,
        K: AsRef<str>,
        S: AsRef<str>,
    {
        let mut synonyms: HashMap<String, Vec<String>> = HashMap::new();

        for (canonical, phrases) in entries {
            let key = normalize(canonical.as_ref());
            if key.is_empty() {
                continue;
            }

            let slot = synonyms.entry(key).or_default();
            for phrase in phrases {
                let phrase = normalize(phrase.as_ref());
                if !phrase.is_empty() && !slot.contains(&phrase) {
                    slot.push(phrase);
                }
            }
        }

        Self { synonyms }
    }

    /// Normalized synonyms for a normalized profile key.
    pub fn synonyms_for(&self, normalized_key: &str) -> Option<&[String]> {
        self.synonyms.get(normalized_key).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.synonyms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.synonyms.is_empty()
    }
}

impl From<BTreeMap<String, Vec<String>>> for KeywordDictionary {
    fn from(map: BTreeMap<String, Vec<String>>) -> Self {
        Self::new(map)
    }
}

impl Default for KeywordDictionary {
    fn default() -> Self {
        Self::new([
            ("firstName", vec!["first name", "firstname", "given name"]),
            ("lastName", vec!["last name", "lastname", "surname", "family name"]),
            ("email", vec!["email", "e-mail", "mail"]),
            ("phone", vec!["phone", "mobile", "contact number", "tel"]),
            ("address", vec!["address", "street"]),
            ("city", vec!["city", "town"]),
            ("state", vec!["state", "province", "region"]),
            ("zipCode", vec!["zip", "postal code", "postcode"]),
            ("country", vec!["country"]),
            ("company", vec!["company", "organization", "business"]),
            ("jobTitle", vec!["job title", "position", "role"]),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_covers_camel_case_keys() {
        let dict = KeywordDictionary::default();
        assert_eq!(dict.len(), 11);
        let first = dict.synonyms_for("firstname").unwrap();
        assert!(first.contains(&"givenname".to_string()));
        assert!(dict.synonyms_for("zipcode").is_some());
        assert!(dict.synonyms_for("firstName").is_none());
    }

    #[test]
    fn merges_entries_that_normalize_alike() {
        let dict = KeywordDictionary::new([
            ("first_name", vec!["prénom"]),
            ("First Name", vec!["vorname", "---"]),
        ]);
        assert_eq!(dict.len(), 1);
        assert_eq!(
            dict.synonyms_for("firstname").unwrap(),
            &["prnom".to_string(), "vorname".to_string()]
        );
    }

    #[test]
    fn deserializes_from_yaml_map() {
        let yaml = "email:\n  - courriel\n  - adresse e-mail\n";
        let dict: KeywordDictionary = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            dict.synonyms_for("email").unwrap(),
            &["courriel".to_string(), "adresseemail".to_string()]
        );
    }
}
