use std::collections::{HashMap, HashSet};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;
use std::slice;

use log::{debug, info, warn};
use rand::seq::SliceRandom;
use rand::Rng;

use super::format::{parse_document, render_document};
use crate::error::{Result, StoreError};
use crate::models::Entry;

/// Key used for uniqueness and lookups: trimmed and lowercased.
pub fn canonical_word(word: &str) -> String {
    word.trim().to_lowercase()
}

/// In-memory vocabulary list with O(1) lookup by word.
///
/// `entries` is sorted by word when the store is built and only grows by
/// appending afterwards. `positions` maps every entry's canonical word to its
/// slot in `entries`; both are only ever changed together.
#[derive(Debug, Default, Clone)]
pub struct WordStore {
    entries: Vec<Entry>,
    positions: HashMap<String, usize>,
}

impl WordStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate, sort and index a list of entries.
    ///
    /// Fails with [`StoreError::Schema`] when an entry has a blank word, has no
    /// examples, or collides with another entry's canonical word.
    /// Positions in error messages count from 1 in document order.
    pub fn from_entries(mut entries: Vec<Entry>) -> Result<Self> {
        for (index, entry) in entries.iter().enumerate() {
            if canonical_word(&entry.word).is_empty() {
                return Err(StoreError::Schema(format!(
                    "entry #{} has an empty word",
                    index + 1
                )));
            }
            if entry.examples.is_empty() {
                return Err(StoreError::Schema(format!(
                    "entry #{} ('{}') has no examples",
                    index + 1,
                    entry.word
                )));
            }
        }

        entries.sort_by(|a, b| a.word.cmp(&b.word));

        let mut positions = HashMap::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            if positions.insert(canonical_word(&entry.word), index).is_some() {
                return Err(StoreError::Schema(format!(
                    "word '{}' appears more than once",
                    entry.word
                )));
            }
        }

        Ok(Self { entries, positions })
    }

    /// Read a dictionary document from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("loading dictionary from {}", path.display());

        let content = fs::read(path).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => StoreError::NotFound(path.to_path_buf()),
            _ => StoreError::io(path, err),
        })?;
        let store = Self::from_entries(parse_document(&content)?)?;

        info!("loaded {} dictionary entries", store.len());
        Ok(store)
    }

    /// Write every entry, in store order, to `path`.
    ///
    /// The document goes to a sibling `.tmp` file first and is renamed over
    /// the target, so a failed write leaves the previous file intact.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        debug!(
            "saving {} dictionary entries to {}",
            self.entries.len(),
            path.display()
        );

        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| StoreError::io(parent, err))?;
        }

        let content = render_document(&self.entries)
            .map_err(|err| StoreError::io(path, io::Error::from(err)))?;

        let temp_path = path.with_extension("tmp");
        let written = File::create(&temp_path).and_then(|mut file| {
            file.write_all(&content)?;
            file.sync_all()
        });
        if let Err(err) = written {
            let _ = fs::remove_file(&temp_path);
            return Err(StoreError::io(&temp_path, err));
        }

        fs::rename(&temp_path, path).map_err(|err| {
            let _ = fs::remove_file(&temp_path);
            StoreError::io(path, err)
        })?;

        info!("saved {} dictionary entries", self.entries.len());
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    pub fn get_by_index(&self, index: usize) -> Result<&Entry> {
        self.entries.get(index).ok_or(StoreError::IndexOutOfRange {
            index,
            len: self.entries.len(),
        })
    }

    pub fn get_by_word(&self, word: &str) -> Result<&Entry> {
        let index = self.index_of(word)?;
        Ok(&self.entries[index])
    }

    pub fn contains(&self, word: &str) -> bool {
        self.positions.contains_key(&canonical_word(word))
    }

    pub fn index_of(&self, word: &str) -> Result<usize> {
        self.positions
            .get(&canonical_word(word))
            .copied()
            .ok_or_else(|| StoreError::KeyNotFound(word.to_string()))
    }

    /// A uniformly random entry.
    pub fn random_entry(&self) -> Result<&Entry> {
        self.random_entry_excluding(std::iter::empty::<&str>())
    }

    /// A uniformly random entry whose word is not in `exclude`.
    pub fn random_entry_excluding<I, S>(&self, exclude: I) -> Result<&Entry>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.choose_excluding(exclude, &mut rand::thread_rng())
    }

    /// Same as [`Self::random_entry_excluding`] with a caller-supplied RNG.
    ///
    /// Eligible positions are collected first and one of them is drawn, so
    /// each remaining entry is equally likely no matter what was excluded.
    pub fn choose_excluding<I, S, R>(&self, exclude: I, rng: &mut R) -> Result<&Entry>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        R: Rng + ?Sized,
    {
        let excluded: HashSet<String> = exclude
            .into_iter()
            .map(|word| canonical_word(word.as_ref()))
            .collect();

        let eligible: Vec<usize> = (0..self.entries.len())
            .filter(|&index| !excluded.contains(&canonical_word(&self.entries[index].word)))
            .collect();

        let index = eligible.choose(rng).ok_or(StoreError::EmptySelection)?;
        Ok(&self.entries[*index])
    }

    /// Append a new entry with a single example pair.
    ///
    /// The word is stored in canonical form. Returns `false`, leaving the
    /// store untouched, when the word is already present (or blank).
    pub fn add_entry(
        &mut self,
        word: &str,
        translations: Vec<String>,
        example_english: &str,
        example_russian: &str,
    ) -> bool {
        let key = canonical_word(word);
        if key.is_empty() {
            warn!("not adding an entry with a blank word");
            return false;
        }
        if self.positions.contains_key(&key) {
            warn!("not adding '{key}': word already exists");
            return false;
        }

        self.entries.push(Entry::new(
            key.clone(),
            translations,
            example_english,
            example_russian,
        ));
        self.positions.insert(key, self.entries.len() - 1);
        true
    }
}

impl<'a> IntoIterator for &'a WordStore {
    type Item = &'a Entry;
    type IntoIter = slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
#[path = "word_store_test.rs"]
mod tests;
