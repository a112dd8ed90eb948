//! Text folding and the pattern predicates shared by the rule tables.

use serde::{Deserialize, Serialize};

/// Lower-case and strip Spanish accents so `Depósito`, `DEPOSITO` and
/// `deposito` all compare equal.
pub fn fold(text: &str) -> String {
    text.chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'á' | 'à' | 'ä' => 'a',
            'é' | 'è' | 'ë' => 'e',
            'í' | 'ì' | 'ï' => 'i',
            'ó' | 'ò' | 'ö' => 'o',
            'ú' | 'ù' | 'ü' => 'u',
            'ñ' => 'n',
            other => other,
        })
        .collect()
}

/// A predicate over a folded description.
///
/// In TOML: `pattern = { contains = "deposito" }` or
/// `pattern = { starts_with = "tra " }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pattern {
    Contains(String),
    StartsWith(String),
}

impl Pattern {
    pub fn contains(needle: &str) -> Self {
        Pattern::Contains(fold(needle))
    }

    pub fn starts_with(prefix: &str) -> Self {
        Pattern::StartsWith(fold(prefix))
    }

    /// `folded` must already have gone through [`fold`].
    pub fn matches(&self, folded: &str) -> bool {
        match self {
            Pattern::Contains(needle) => folded.contains(&fold(needle)),
            Pattern::StartsWith(prefix) => folded.starts_with(&fold(prefix)),
        }
    }
}
