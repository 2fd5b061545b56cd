//! Reading and writing dictionary documents.
//!
//! Two on-disk shapes exist in the wild. The list form is what the store
//! writes:
//!
//! ```json
//! [{"word": "cat", "translates": ["кот"],
//!   "examples": [{"example_eng": "I have a cat.", "example_rus": "У меня есть кот."}]}]
//! ```
//!
//! Older files are keyed by word and keep examples as an English→Russian
//! object:
//!
//! ```json
//! {"cat": {"translates": ["кот"], "examples": {"I have a cat.": "У меня есть кот."}}}
//! ```

use std::fmt;
use std::marker::PhantomData;

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;

use crate::error::Result;
use crate::models::{Entry, ExamplePair};

const INDENT: &[u8] = b"    ";

/// Parse either document shape into entries, in document order. Bytes that
/// are not UTF-8 are rejected as malformed JSON.
pub fn parse_document(content: &[u8]) -> Result<Vec<Entry>> {
    match content.iter().find(|byte| !byte.is_ascii_whitespace()) {
        Some(b'{') => {
            let keyed: OrderedMap<KeyedRecord> = serde_json::from_slice(content)?;
            Ok(keyed
                .0
                .into_iter()
                .map(|(word, record)| record.into_entry(word))
                .collect())
        }
        _ => Ok(serde_json::from_slice(content)?),
    }
}

/// Render entries in list form with four-space indentation. Non-ASCII text is
/// written as-is.
pub fn render_document(entries: &[Entry]) -> serde_json::Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(INDENT));
    entries.serialize(&mut serializer)?;
    buffer.push(b'\n');
    Ok(buffer)
}

#[derive(Deserialize)]
struct KeyedRecord {
    translates: Vec<String>,
    examples: OrderedMap<String>,
}

impl KeyedRecord {
    fn into_entry(self, word: String) -> Entry {
        Entry {
            word,
            translations: self.translates,
            examples: self
                .examples
                .0
                .into_iter()
                .map(|(english, russian)| ExamplePair { english, russian })
                .collect(),
        }
    }
}

/// A JSON object read as key/value pairs in the order they appear. Repeated
/// keys are kept so the store can reject them instead of silently keeping the
/// last one.
struct OrderedMap<V>(Vec<(String, V)>);

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedMapVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedMapVisitor<V> {
            type Value = OrderedMap<V>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut pairs = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some(pair) = access.next_entry::<String, V>()? {
                    pairs.push(pair);
                }
                Ok(OrderedMap(pairs))
            }
        }

        deserializer.deserialize_map(OrderedMapVisitor(PhantomData))
    }
}
