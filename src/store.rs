//! Vocabulary persistence: the in-memory [`WordStore`] and the JSON document
//! format it reads and writes.

pub mod format;
mod word_store;

pub use word_store::{canonical_word, WordStore};
