use rand::Rng;

use crate::error::StoreError;
use crate::models::{Entry, ExamplePair};
use crate::store::WordStore;

/// Which card is on screen and which of its examples is showing. The store
/// knows nothing about this; the front end passes the store in on every move.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Cursor {
    index: usize,
    example: usize,
}

impl Cursor {
    pub(crate) fn index(&self) -> usize {
        self.index
    }

    pub(crate) fn example(&self) -> usize {
        self.example
    }

    pub(crate) fn current<'a>(&self, store: &'a WordStore) -> Option<&'a Entry> {
        store.get_by_index(self.index).ok()
    }

    pub(crate) fn current_example<'a>(&self, store: &'a WordStore) -> Option<&'a ExamplePair> {
        self.current(store)
            .and_then(|entry| entry.examples.get(self.example))
    }

    /// Step forward one card, wrapping to the first.
    pub(crate) fn next_entry(&mut self, store: &WordStore) {
        self.step_entry(store, 1);
    }

    /// Step back one card, wrapping to the last.
    pub(crate) fn previous_entry(&mut self, store: &WordStore) {
        self.step_entry(store, -1);
    }

    /// Jump to a random card. The current word is avoided whenever another
    /// card exists.
    pub(crate) fn random_entry<R: Rng + ?Sized>(
        &mut self,
        store: &WordStore,
        rng: &mut R,
    ) -> Result<(), StoreError> {
        let exclude: Vec<&str> = match self.current(store) {
            Some(entry) if store.len() > 1 => vec![entry.word.as_str()],
            _ => Vec::new(),
        };
        let word = store.choose_excluding(exclude, rng)?.word.clone();
        self.jump_to(store, &word)
    }

    pub(crate) fn next_example(&mut self, store: &WordStore) {
        self.step_example(store, 1);
    }

    pub(crate) fn previous_example(&mut self, store: &WordStore) {
        self.step_example(store, -1);
    }

    /// Show the card for `word`, starting from its first example.
    pub(crate) fn jump_to(&mut self, store: &WordStore, word: &str) -> Result<(), StoreError> {
        self.index = store.index_of(word)?;
        self.example = 0;
        Ok(())
    }

    fn step_entry(&mut self, store: &WordStore, offset: isize) {
        if store.is_empty() {
            return;
        }
        self.index = wrap(self.index, offset, store.len());
        self.example = 0;
    }

    fn step_example(&mut self, store: &WordStore, offset: isize) {
        let count = self
            .current(store)
            .map(|entry| entry.examples.len())
            .unwrap_or(0);
        if count == 0 {
            return;
        }
        self.example = wrap(self.example, offset, count);
    }
}

fn wrap(position: usize, offset: isize, len: usize) -> usize {
    (position as isize + offset).rem_euclid(len as isize) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn store() -> WordStore {
        let mut bridge = Entry::new("bridge", vec!["мост".into()], "Cross it.", "Перейди.");
        bridge
            .examples
            .push(ExamplePair::new("A long bridge.", "Длинный мост."));
        WordStore::from_entries(vec![
            Entry::new("cat", vec!["кот".into()], "A cat.", "Кот."),
            bridge,
            Entry::new("apple", vec!["яблоко".into()], "An apple.", "Яблоко."),
        ])
        .unwrap()
    }

    #[test]
    fn entry_navigation_wraps_and_resets_example() {
        let store = store();
        let mut cursor = Cursor::default();
        cursor.jump_to(&store, "bridge").unwrap();
        cursor.next_example(&store);
        assert_eq!(cursor.example(), 1);

        cursor.next_entry(&store);
        assert_eq!((cursor.index(), cursor.example()), (2, 0));
        cursor.next_entry(&store);
        assert_eq!(cursor.index(), 0);
        cursor.previous_entry(&store);
        assert_eq!(cursor.index(), 2);
    }

    #[test]
    fn example_navigation_wraps_within_entry() {
        let store = store();
        let mut cursor = Cursor::default();
        cursor.jump_to(&store, "bridge").unwrap();

        cursor.previous_example(&store);
        assert_eq!(cursor.example(), 1);
        assert_eq!(
            cursor.current_example(&store).unwrap().english,
            "A long bridge."
        );
        cursor.next_example(&store);
        assert_eq!(cursor.example(), 0);
    }

    #[test]
    fn random_entry_moves_off_current_word() {
        let store = store();
        let mut rng = StdRng::seed_from_u64(11);
        let mut cursor = Cursor::default();

        for _ in 0..50 {
            let before = cursor.index();
            cursor.random_entry(&store, &mut rng).unwrap();
            assert_ne!(cursor.index(), before);
        }
    }

    #[test]
    fn random_entry_with_single_card_stays_put() {
        let store =
            WordStore::from_entries(vec![Entry::new("cat", vec![], "A cat.", "Кот.")]).unwrap();
        let mut cursor = Cursor::default();

        cursor.random_entry(&store, &mut StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(cursor.index(), 0);
    }

    #[test]
    fn empty_store_is_inert() {
        let store = WordStore::new();
        let mut cursor = Cursor::default();

        cursor.next_entry(&store);
        cursor.next_example(&store);
        assert_eq!(cursor, Cursor::default());
        assert!(cursor.current(&store).is_none());
        assert!(matches!(
            cursor.random_entry(&store, &mut StdRng::seed_from_u64(1)),
            Err(StoreError::EmptySelection)
        ));
    }

    #[test]
    fn jump_to_unknown_word_keeps_position() {
        let store = store();
        let mut cursor = Cursor::default();
        cursor.jump_to(&store, "cat").unwrap();

        assert!(matches!(
            cursor.jump_to(&store, "dog"),
            Err(StoreError::KeyNotFound(_))
        ));
        assert_eq!(cursor.index(), 2);
    }
}
