use crate::matching::keywords::KeywordDictionary;
use crate::matching::normalize::normalize;
use crate::profile::profile_model::ProfileField;

/// Normalized key found verbatim in the input text.
pub const DIRECT_MATCH_SCORE: f32 = 0.9;
/// A curated synonym of a well-known key found in the input text.
pub const KEYWORD_MATCH_SCORE: f32 = 0.8;
/// Candidates must score strictly above this to be accepted.
pub const ACCEPT_THRESHOLD: f32 = 0.5;

/// Heuristic confidence that an input corresponds to a profile field.
///
/// Two rules combine by maximum:
/// - direct: the normalized key is a substring of the input text
/// - keyword: the key is a known canonical name and one of its synonyms is a
///   substring of the input text
#[derive(Debug, Clone, Default)]
pub struct Scorer {
    dictionary: KeywordDictionary,
}

impl Scorer {
    pub fn new(dictionary: KeywordDictionary) -> Self {
        Self { dictionary }
    }

    pub fn dictionary(&self) -> &KeywordDictionary {
        &self.dictionary
    }

    /// Score one field against already-normalized input text.
    pub fn score(&self, input_text: &str, field: &ProfileField) -> f32 {
        let key = normalize(field.key.as_str());
        let mut score: f32 = 0.0;

        if input_text.contains(&key) {
            score = DIRECT_MATCH_SCORE;
        }

        if let Some(synonyms) = self.dictionary.synonyms_for(&key) {
            if synonyms.iter().any(|s| input_text.contains(s.as_str())) {
                score = score.max(KEYWORD_MATCH_SCORE);
            }
        }

        score
    }

    /// Highest-scoring field for the input text. Ties go to the field listed
    /// first. `None` when no rule fired for any field.
    pub fn best_match<'f>(
        &self,
        input_text: &str,
        fields: &'f [ProfileField],
    ) -> Option<(&'f ProfileField, f32)> {
        let mut best: Option<(&ProfileField, f32)> = None;

        for field in fields {
            let score = self.score(input_text, field);
            let highest = best.map_or(0.0, |(_, s)| s);
            if score > highest {
                best = Some((field, score));
            }
        }

        best
    }

    pub fn accepts(score: f32) -> bool {
        score > ACCEPT_THRESHOLD
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(key: &str, value: &str) -> ProfileField {
        ProfileField::new(key, value)
    }

    #[test]
    fn direct_match_beats_keyword() {
        let scorer = Scorer::default();
        // "email" is both the key and one of its own synonyms.
        assert_eq!(scorer.score("useremail", &field("email", "a@b.com")), DIRECT_MATCH_SCORE);
    }

    #[test]
    fn keyword_only_scores_exactly_keyword_score() {
        let scorer = Scorer::default();
        assert_eq!(scorer.score("givenname", &field("firstName", "Jane")), KEYWORD_MATCH_SCORE);
        assert_eq!(scorer.score("surname", &field("last_name", "Doe")), KEYWORD_MATCH_SCORE);
    }

    #[test]
    fn unknown_key_without_substring_scores_zero() {
        let scorer = Scorer::default();
        assert_eq!(scorer.score("field7", &field("company", "Acme")), 0.0);
        assert_eq!(scorer.score("favouritecolour", &field("nickname", "JJ")), 0.0);
    }

    #[test]
    fn punctuation_only_key_is_a_substring_of_everything() {
        let scorer = Scorer::default();
        assert_eq!(scorer.score("useremail", &field("#", "x")), DIRECT_MATCH_SCORE);
        assert_eq!(scorer.score("", &field("---", "x")), DIRECT_MATCH_SCORE);
    }

    #[test]
    fn best_match_prefers_first_on_tie() {
        let scorer = Scorer::default();
        let fields = vec![field("mail", "first"), field("email", "second")];
        let (best, score) = scorer.best_match("email", &fields).unwrap();
        assert_eq!(best.value, "first");
        assert_eq!(score, DIRECT_MATCH_SCORE);
    }

    #[test]
    fn best_match_prefers_direct_over_keyword() {
        let scorer = Scorer::default();
        let fields = vec![field("phone", "555"), field("mobile", "777")];
        let (best, _) = scorer.best_match("mobilenumber", &fields).unwrap();
        assert_eq!(best.value, "777");
    }

    #[test]
    fn best_match_none_when_nothing_fires() {
        let scorer = Scorer::default();
        let fields = vec![field("company", "Acme")];
        assert!(scorer.best_match("field7", &fields).is_none());
    }

    #[test]
    fn threshold_is_strict() {
        assert!(!Scorer::accepts(0.0));
        assert!(!Scorer::accepts(ACCEPT_THRESHOLD));
        assert!(Scorer::accepts(KEYWORD_MATCH_SCORE));
        assert!(Scorer::accepts(DIRECT_MATCH_SCORE));
    }

    #[test]
    fn substituted_dictionary_is_used() {
        let scorer = Scorer::new(KeywordDictionary::new([("email", vec!["courriel"])]));
        assert_eq!(scorer.score("courriel", &field("email", "a@b.com")), KEYWORD_MATCH_SCORE);
        assert_eq!(scorer.score("mail", &field("email", "a@b.com")), 0.0);
    }
}
