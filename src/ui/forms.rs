use anyhow::{anyhow, Result};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

/// Internal representation of the "add word" form fields.
#[derive(Default, Clone)]
pub(crate) struct EntryForm {
    pub(crate) word: String,
    pub(crate) translations: String,
    pub(crate) english: String,
    pub(crate) russian: String,
    pub(crate) active: EntryField,
    pub(crate) error: Option<String>,
}

/// Fields available within the entry form, in tab order.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) enum EntryField {
    #[default]
    Word,
    Translations,
    English,
    Russian,
}

impl EntryField {
    pub(crate) const ALL: [EntryField; 4] = [
        EntryField::Word,
        EntryField::Translations,
        EntryField::English,
        EntryField::Russian,
    ];

    pub(crate) fn label(self) -> &'static str {
        match self {
            EntryField::Word => "Word",
            EntryField::Translations => "Translations",
            EntryField::English => "English example",
            EntryField::Russian => "Russian example",
        }
    }

    fn position(self) -> usize {
        Self::ALL
            .iter()
            .position(|field| *field == self)
            .unwrap_or(0)
    }
}

/// Validated form contents, ready for [`crate::store::WordStore::add_entry`].
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct NewEntry {
    pub(crate) word: String,
    pub(crate) translations: Vec<String>,
    pub(crate) english: String,
    pub(crate) russian: String,
}

impl EntryForm {
    /// Move focus to the next field, wrapping after the last.
    pub(crate) fn next_field(&mut self) {
        let next = (self.active.position() + 1) % EntryField::ALL.len();
        self.active = EntryField::ALL[next];
    }

    /// Move focus to the previous field, wrapping before the first.
    pub(crate) fn previous_field(&mut self) {
        let len = EntryField::ALL.len();
        let previous = (self.active.position() + len - 1) % len;
        self.active = EntryField::ALL[previous];
    }

    /// Append a character to the active field. Control characters are ignored.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        self.value_mut(self.active).push(ch);
        true
    }

    pub(crate) fn backspace(&mut self) {
        self.value_mut(self.active).pop();
    }

    /// Validate the inputs. Translations are comma separated.
    pub(crate) fn parse_inputs(&self) -> Result<NewEntry> {
        let word = self.word.trim();
        if word.is_empty() {
            return Err(anyhow!("Word is required."));
        }

        let translations: Vec<String> = self
            .translations
            .split(',')
            .map(str::trim)
            .filter(|translation| !translation.is_empty())
            .map(str::to_string)
            .collect();
        if translations.is_empty() {
            return Err(anyhow!("At least one translation is required."));
        }

        let english = self.english.trim();
        if english.is_empty() {
            return Err(anyhow!("English example is required."));
        }
        let russian = self.russian.trim();
        if russian.is_empty() {
            return Err(anyhow!("Russian example is required."));
        }

        Ok(NewEntry {
            word: word.to_string(),
            translations,
            english: english.to_string(),
            russian: russian.to_string(),
        })
    }

    /// Render a single line for the form widget.
    pub(crate) fn build_line(&self, field: EntryField) -> Line<'static> {
        let value = self.value(field);
        let is_active = self.active == field;

        let display = if value.is_empty() {
            "<required>".to_string()
        } else {
            value.to_string()
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{}: ", field.label())),
            Span::styled(display, style),
        ])
    }

    /// Cursor column and row offsets for the active field inside the form.
    pub(crate) fn cursor_offset(&self) -> (usize, usize) {
        let prefix = self.active.label().chars().count() + ": ".len();
        let column = prefix + self.value(self.active).chars().count();
        (column, self.active.position())
    }

    fn value(&self, field: EntryField) -> &str {
        match field {
            EntryField::Word => &self.word,
            EntryField::Translations => &self.translations,
            EntryField::English => &self.english,
            EntryField::Russian => &self.russian,
        }
    }

    fn value_mut(&mut self, field: EntryField) -> &mut String {
        match field {
            EntryField::Word => &mut self.word,
            EntryField::Translations => &mut self.translations,
            EntryField::English => &mut self.english,
            EntryField::Russian => &mut self.russian,
        }
    }
}

/// Inline "go to word" prompt.
#[derive(Default, Clone)]
pub(crate) struct JumpPrompt {
    pub(crate) query: String,
}
