use std::mem;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use crossterm::event::KeyCode;
use log::warn;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::store::{canonical_word, WordStore};

use super::cursor::Cursor;
use super::forms::{EntryField, EntryForm, JumpPrompt};
use super::helpers::{capitalize, centered_rect, cursor_in, surface_error};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;

/// Fine-grained modes layered over the card view.
enum Mode {
    Normal,
    AddingEntry(EntryForm),
    Jumping(JumpPrompt),
    /// Saving on exit failed; holds the reason shown in the dialog.
    ConfirmQuit(String),
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state: the store, where it lives on disk, and which
/// card the user is looking at.
pub struct App {
    store: WordStore,
    dictionary_path: PathBuf,
    cursor: Cursor,
    mode: Mode,
    status: Option<StatusMessage>,
    unsaved: bool,
}

impl App {
    /// Open on a random card.
    pub fn new(store: WordStore, dictionary_path: PathBuf) -> Self {
        let mut app = Self {
            store,
            dictionary_path,
            cursor: Cursor::default(),
            mode: Mode::Normal,
            status: None,
            unsaved: false,
        };
        app.show_random();
        app
    }

    pub fn store(&self) -> &WordStore {
        &self.store
    }

    /// Whether words were added since the last successful save.
    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved
    }

    /// Feed one key press through the active mode. Returns `true` once the
    /// application should exit.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit),
            Mode::AddingEntry(form) => self.handle_add_entry(code, form),
            Mode::Jumping(prompt) => self.handle_jump(code, prompt),
            Mode::ConfirmQuit(reason) => self.handle_confirm_quit(code, reason, &mut exit),
        };

        exit
    }

    /// Ctrl-C quits from anywhere. A second press while the save-failed
    /// dialog is open exits without saving.
    pub(crate) fn handle_ctrl_c(&mut self) -> bool {
        if matches!(self.mode, Mode::ConfirmQuit(_)) {
            return true;
        }
        let mut exit = false;
        self.mode = self.quit(&mut exit);
        exit
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Mode {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return self.quit(exit),
            KeyCode::Right | KeyCode::Char('n') => {
                self.clear_status();
                self.cursor.next_entry(&self.store);
            }
            KeyCode::Left | KeyCode::Char('p') => {
                self.clear_status();
                self.cursor.previous_entry(&self.store);
            }
            KeyCode::Char('r') | KeyCode::Char(' ') => {
                self.clear_status();
                self.show_random();
            }
            KeyCode::Down | KeyCode::Char(']') => self.cursor.next_example(&self.store),
            KeyCode::Up | KeyCode::Char('[') => self.cursor.previous_example(&self.store),
            KeyCode::Char('+') | KeyCode::Char('a') => {
                self.clear_status();
                return Mode::AddingEntry(EntryForm::default());
            }
            KeyCode::Char('/') => {
                self.clear_status();
                return Mode::Jumping(JumpPrompt::default());
            }
            KeyCode::Char('s') => self.save_with_status(),
            _ => {}
        }
        Mode::Normal
    }

    fn handle_add_entry(&mut self, code: KeyCode, mut form: EntryForm) -> Mode {
        let mut keep_open = true;
        match code {
            KeyCode::Esc => {
                self.set_status("Add word cancelled.", StatusKind::Info);
                keep_open = false;
            }
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.previous_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.add_from_form(&form) {
                Ok(()) => keep_open = false,
                Err(err) => {
                    let message = surface_error(&err);
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }

        if keep_open {
            Mode::AddingEntry(form)
        } else {
            Mode::Normal
        }
    }

    fn handle_jump(&mut self, code: KeyCode, mut prompt: JumpPrompt) -> Mode {
        match code {
            KeyCode::Esc => {
                self.clear_status();
                return Mode::Normal;
            }
            KeyCode::Backspace => {
                prompt.query.pop();
            }
            KeyCode::Enter => match self.cursor.jump_to(&self.store, prompt.query.trim()) {
                Ok(()) => {
                    self.clear_status();
                    return Mode::Normal;
                }
                Err(err) => self.set_status(err.to_string(), StatusKind::Error),
            },
            KeyCode::Char(ch) if !ch.is_control() => prompt.query.push(ch),
            _ => {}
        }
        Mode::Jumping(prompt)
    }

    fn handle_confirm_quit(&mut self, code: KeyCode, reason: String, exit: &mut bool) -> Mode {
        match code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                warn!("exiting with unsaved words");
                *exit = true;
                Mode::Normal
            }
            KeyCode::Char('r') | KeyCode::Char('R') => self.quit(exit),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.set_status("Quit cancelled.", StatusKind::Info);
                Mode::Normal
            }
            _ => Mode::ConfirmQuit(reason),
        }
    }

    /// Save pending additions, then exit. A failed save opens the
    /// confirmation dialog instead of losing the words.
    fn quit(&mut self, exit: &mut bool) -> Mode {
        if !self.unsaved {
            *exit = true;
            return Mode::Normal;
        }

        match self.save() {
            Ok(()) => {
                *exit = true;
                Mode::Normal
            }
            Err(err) => {
                let message = surface_error(&err);
                warn!("saving on exit failed: {err:#}");
                self.set_status(message.clone(), StatusKind::Error);
                Mode::ConfirmQuit(message)
            }
        }
    }

    fn show_random(&mut self) {
        if let Err(err) = self.cursor.random_entry(&self.store, &mut rand::thread_rng()) {
            self.set_status(err.to_string(), StatusKind::Error);
        }
    }

    fn add_from_form(&mut self, form: &EntryForm) -> Result<()> {
        let entry = form.parse_inputs()?;
        let word = canonical_word(&entry.word);

        if !self.store.add_entry(
            &entry.word,
            entry.translations,
            &entry.english,
            &entry.russian,
        ) {
            return Err(anyhow!("Word '{word}' already exists."));
        }

        self.unsaved = true;
        self.cursor.jump_to(&self.store, &word)?;
        let message = format!("Added '{}'.", self.store.get_by_word(&word)?);
        self.set_status(message, StatusKind::Info);
        Ok(())
    }

    fn save(&mut self) -> Result<()> {
        self.store
            .save(&self.dictionary_path)
            .with_context(|| format!("failed to save {}", self.dictionary_path.display()))?;
        self.unsaved = false;
        Ok(())
    }

    fn save_with_status(&mut self) {
        match self.save() {
            Ok(()) => {
                let message = format!("Saved {} words.", self.store.len());
                self.set_status(message, StatusKind::Info);
            }
            Err(err) => {
                warn!("{err:#}");
                self.set_status(surface_error(&err), StatusKind::Error);
            }
        }
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        self.draw_card(frame, content_area);

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        match &self.mode {
            Mode::AddingEntry(form) => self.draw_entry_form(frame, area, form),
            Mode::Jumping(prompt) => self.draw_jump_prompt(frame, area, prompt),
            Mode::ConfirmQuit(reason) => self.draw_confirm_quit(frame, area, reason),
            Mode::Normal => {}
        }
    }

    fn draw_card(&self, frame: &mut Frame, area: Rect) {
        let Some(entry) = self.cursor.current(&self.store) else {
            let message = Paragraph::new("The dictionary is empty. Press '+' to add a word.")
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).title("word-cards"));
            frame.render_widget(message, area);
            return;
        };

        let title = format!("Card {}/{}", self.cursor.index() + 1, self.store.len());
        let block = Block::default().borders(Borders::ALL).title(title);

        let mut lines = vec![
            Line::from(Span::styled(
                capitalize(&entry.word),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(capitalize(&entry.translations_line())),
            Line::from(""),
            Line::from(Span::styled(
                format!(
                    "Example {}/{}",
                    self.cursor.example() + 1,
                    entry.examples.len()
                ),
                Style::default().fg(Color::DarkGray),
            )),
        ];

        if let Some(example) = self.cursor.current_example(&self.store) {
            lines.push(Line::from(example.english.clone()));
            lines.push(Line::from(Span::styled(
                example.russian.clone(),
                Style::default().add_modifier(Modifier::ITALIC),
            )));
        }

        let paragraph = Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = match &self.status {
            Some(status) => Line::from(vec![Span::styled(status.text.clone(), status.kind.style())]),
            None if self.unsaved => Line::from(Span::styled(
                "Unsaved changes.",
                Style::default().fg(Color::DarkGray),
            )),
            None => Line::from(""),
        };

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let keys: &[(&str, &str)] = match self.mode {
            Mode::Normal => &[
                ("[←→]", " Word   "),
                ("[↑↓]", " Example   "),
                ("[r]", " Random   "),
                ("[/]", " Go to   "),
                ("[+]", " Add   "),
                ("[s]", " Save   "),
                ("[q]", " Quit"),
            ],
            Mode::AddingEntry(_) => &[
                ("[Tab]", " Next field   "),
                ("[Enter]", " Add   "),
                ("[Esc]", " Cancel"),
            ],
            Mode::Jumping(_) => &[("[Enter]", " Go   "), ("[Esc]", " Cancel")],
            Mode::ConfirmQuit(_) => &[
                ("[y]", " Quit without saving   "),
                ("[r]", " Retry   "),
                ("[n]", " Stay"),
            ],
        };

        Line::from(
            keys.iter()
                .flat_map(|(key, action)| {
                    [Span::styled(*key, key_style), Span::raw(*action)]
                })
                .collect::<Vec<_>>(),
        )
    }

    fn draw_entry_form(&self, frame: &mut Frame, area: Rect, form: &EntryForm) {
        let popup_area = centered_rect(70, 50, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Add Word").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines: Vec<Line> = EntryField::ALL
            .iter()
            .map(|field| form.build_line(*field))
            .collect();
        lines.push(Line::from(""));

        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to add • Tab to switch • Esc to cancel • translations are comma separated",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let (column, row) = form.cursor_offset();
        frame.set_cursor_position(cursor_in(inner, column, row));
    }

    fn draw_jump_prompt(&self, frame: &mut Frame, area: Rect, prompt: &JumpPrompt) {
        let height = 3u16.min(area.height);
        let popup_area = Rect {
            x: area.x,
            y: area.y,
            width: area.width,
            height,
        };
        frame.render_widget(Clear, popup_area);

        let block = Block::default().borders(Borders::ALL).title("Go to word");
        let paragraph = Paragraph::new(Span::raw(format!("Word: {}", prompt.query)))
            .block(block.clone())
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);

        let inner = block.inner(popup_area);
        let column = "Word: ".len() + prompt.query.chars().count();
        frame.set_cursor_position(cursor_in(inner, column, 0));
    }

    fn draw_confirm_quit(&self, frame: &mut Frame, area: Rect, reason: &str) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Save failed")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red));

        let lines = vec![
            Line::from("New words could not be saved:"),
            Line::from(Span::styled(
                reason.to_string(),
                Style::default().fg(Color::Red),
            )),
            Line::from(""),
            Line::from("Quit anyway and lose them? (y = quit, r = retry, n = stay)"),
        ];

        let paragraph = Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Entry;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use tempfile::TempDir;

    fn fixture_store() -> WordStore {
        WordStore::from_entries(vec![
            Entry::new("cat", vec!["кот".into()], "I have a cat.", "У меня есть кот."),
            Entry::new("bridge", vec!["мост".into()], "Cross the bridge.", "Перейди мост."),
        ])
        .unwrap()
    }

    fn fixture_app() -> (App, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let app = App::new(fixture_store(), temp_dir.path().join("words.json"));
        (app, temp_dir)
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            assert!(!app.handle_key(KeyCode::Char(ch)));
        }
    }

    fn fill_form(app: &mut App, word: &str) {
        assert!(!app.handle_key(KeyCode::Char('+')));
        type_text(app, word);
        app.handle_key(KeyCode::Tab);
        type_text(app, "собака, пёс");
        app.handle_key(KeyCode::Tab);
        type_text(app, "The dog sleeps.");
        app.handle_key(KeyCode::Tab);
        type_text(app, "Собака спит.");
    }

    fn current_word(app: &App) -> String {
        app.cursor.current(&app.store).unwrap().word.clone()
    }

    #[test]
    fn opens_on_a_card() {
        let (app, _temp_dir) = fixture_app();
        assert!(app.cursor.current(&app.store).is_some());
        assert!(app.status.is_none());
    }

    #[test]
    fn empty_store_reports_instead_of_failing() {
        let temp_dir = TempDir::new().unwrap();
        let app = App::new(WordStore::new(), temp_dir.path().join("words.json"));

        let status = app.status.as_ref().unwrap();
        assert!(matches!(status.kind, StatusKind::Error));
    }

    #[test]
    fn adding_a_word_selects_it_and_marks_unsaved() {
        let (mut app, _temp_dir) = fixture_app();

        fill_form(&mut app, "Dog");
        assert!(!app.handle_key(KeyCode::Enter));

        assert!(matches!(app.mode, Mode::Normal));
        assert!(app.has_unsaved_changes());
        assert_eq!(app.store().len(), 3);
        assert_eq!(current_word(&app), "dog");
        assert_eq!(app.status.as_ref().unwrap().text, "Added 'dog'.");
    }

    #[test]
    fn adding_an_existing_word_keeps_form_open() {
        let (mut app, _temp_dir) = fixture_app();

        fill_form(&mut app, "CAT");
        app.handle_key(KeyCode::Enter);

        match &app.mode {
            Mode::AddingEntry(form) => {
                assert_eq!(form.error.as_deref(), Some("Word 'cat' already exists."));
            }
            _ => panic!("form should stay open"),
        }
        assert_eq!(app.store().len(), 2);
        assert!(!app.has_unsaved_changes());
    }

    #[test]
    fn quitting_saves_new_words() {
        let (mut app, _temp_dir) = fixture_app();
        fill_form(&mut app, "dog");
        app.handle_key(KeyCode::Enter);

        assert!(app.handle_key(KeyCode::Char('q')));

        let reloaded = WordStore::load(&app.dictionary_path).unwrap();
        assert_eq!(reloaded.len(), 3);
        assert!(reloaded.contains("dog"));
    }

    #[test]
    fn quitting_without_changes_leaves_disk_alone() {
        let (mut app, _temp_dir) = fixture_app();

        assert!(app.handle_key(KeyCode::Esc));
        assert!(!app.dictionary_path.exists());
    }

    #[test]
    fn failed_save_on_quit_asks_before_exiting() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let mut app = App::new(fixture_store(), blocker.join("words.json"));
        fill_form(&mut app, "dog");
        app.handle_key(KeyCode::Enter);

        assert!(!app.handle_key(KeyCode::Char('q')));
        assert!(matches!(app.mode, Mode::ConfirmQuit(_)));

        assert!(!app.handle_key(KeyCode::Char('n')));
        assert!(matches!(app.mode, Mode::Normal));

        assert!(!app.handle_key(KeyCode::Char('q')));
        assert!(app.handle_key(KeyCode::Char('y')));
    }

    #[test]
    fn jump_prompt_finds_words_case_insensitively() {
        let (mut app, _temp_dir) = fixture_app();

        app.handle_key(KeyCode::Char('/'));
        type_text(&mut app, "Bridge");
        app.handle_key(KeyCode::Enter);

        assert!(matches!(app.mode, Mode::Normal));
        assert_eq!(current_word(&app), "bridge");
    }

    #[test]
    fn jump_prompt_reports_unknown_word() {
        let (mut app, _temp_dir) = fixture_app();

        app.handle_key(KeyCode::Char('/'));
        type_text(&mut app, "zebra");
        app.handle_key(KeyCode::Enter);

        assert!(matches!(app.mode, Mode::Jumping(_)));
        assert!(app.status.as_ref().unwrap().text.contains("zebra"));
    }

    #[test]
    fn explicit_save_clears_unsaved_flag() {
        let (mut app, _temp_dir) = fixture_app();
        fill_form(&mut app, "dog");
        app.handle_key(KeyCode::Enter);

        app.handle_key(KeyCode::Char('s'));

        assert!(!app.has_unsaved_changes());
        assert_eq!(app.status.as_ref().unwrap().text, "Saved 3 words.");
        assert!(app.dictionary_path.exists());
    }

    #[test]
    fn draws_current_card() {
        let (mut app, _temp_dir) = fixture_app();
        app.handle_key(KeyCode::Char('/'));
        type_text(&mut app, "cat");
        app.handle_key(KeyCode::Enter);

        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();

        let rendered: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(rendered.contains("Cat"));
        assert!(rendered.contains("I have a cat."));
        assert!(rendered.contains("Card 2/2"));
    }

    #[test]
    fn long_input_keeps_cursor_on_screen() {
        let (mut app, _temp_dir) = fixture_app();
        let long = "x".repeat(70_000);
        let mut terminal = Terminal::new(TestBackend::new(40, 12)).unwrap();

        app.handle_key(KeyCode::Char('/'));
        type_text(&mut app, &long);
        terminal.draw(|frame| app.draw(frame)).unwrap();
        let position = terminal.get_cursor_position().unwrap();
        assert!(position.x < 40 && position.y < 12);

        app.handle_key(KeyCode::Esc);
        app.handle_key(KeyCode::Char('+'));
        type_text(&mut app, &long);
        terminal.draw(|frame| app.draw(frame)).unwrap();
        let position = terminal.get_cursor_position().unwrap();
        assert!(position.x < 40 && position.y < 12);
    }
}
