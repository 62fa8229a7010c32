use std::collections::HashMap;

use crate::ai::mapping_model::UnmatchedEntry;
use crate::matching::resolver::CandidateInput;

/// Per-pass map from session identifier to the unresolved control it names.
///
/// Identifiers are `input_<position>` over the unresolved order. Lookups go
/// through the table, never by parsing the identifier back into a number,
/// so anything not issued by this table (stale or foreign ids) resolves to
/// nothing. The table lives for one pass and is dropped afterwards.
#[derive(Debug, Clone, Default)]
pub struct CorrelationTable {
    entries: Vec<(String, CandidateInput)>,
    by_token: HashMap<String, usize>,
}

impl CorrelationTable {
    pub fn build(unresolved: &[CandidateInput]) -> Self {
        let mut table = Self::default();

        for (index, input) in unresolved.iter().enumerate() {
            let token = format!("input_{}", index);
            table.by_token.insert(token.clone(), index);
            table.entries.push((token, input.clone()));
        }

        table
    }

    pub fn lookup(&self, token: &str) -> Option<&CandidateInput> {
        self.by_token
            .get(token)
            .and_then(|&i| self.entries.get(i))
            .map(|(_, input)| input)
    }

    /// Serializable projections with raw (non-normalized) text.
    pub fn unmatched_entries(&self) -> Vec<UnmatchedEntry> {
        self.entries
            .iter()
            .map(|(token, input)| UnmatchedEntry {
                identifier: token.clone(),
                label: input.label.clone(),
                placeholder: input.placeholder.clone(),
                name: input.name.clone(),
                id: input.id.clone(),
            })
            .collect()
    }

    /// Tokens and inputs in unresolved order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CandidateInput)> {
        self.entries.iter().map(|(t, i)| (t.as_str(), i))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
