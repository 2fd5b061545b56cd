//! Domain models for the vocabulary list. These are plain data holders that
//! the store indexes and the terminal front end renders. Field names on disk
//! follow the historical dictionary files (`translates`, `example_eng`,
//! `example_rus`), so serde renames keep the Rust side readable.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// One vocabulary item: the word itself, its translations and the example
/// sentences that show it in context.
pub struct Entry {
    /// The lookup key. Unique within a store once compared in canonical form.
    pub word: String,
    /// Translations in the order they should be shown.
    #[serde(rename = "translates")]
    pub translations: Vec<String>,
    /// Example sentence pairs. A valid entry always carries at least one.
    pub examples: Vec<ExamplePair>,
}

impl Entry {
    /// Build an entry holding a single example pair, the shape produced by the
    /// add-entry flow.
    pub fn new(
        word: impl Into<String>,
        translations: Vec<String>,
        english: impl Into<String>,
        russian: impl Into<String>,
    ) -> Self {
        Self {
            word: word.into(),
            translations,
            examples: vec![ExamplePair::new(english, russian)],
        }
    }

    /// Translations joined for display, e.g. `кот, кошка`.
    pub fn translations_line(&self) -> String {
        self.translations.join(", ")
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.word)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// An English sentence and its Russian counterpart.
pub struct ExamplePair {
    #[serde(rename = "example_eng")]
    pub english: String,
    #[serde(rename = "example_rus")]
    pub russian: String,
}

impl ExamplePair {
    pub fn new(english: impl Into<String>, russian: impl Into<String>) -> Self {
        Self {
            english: english.into(),
            russian: russian.into(),
        }
    }
}
