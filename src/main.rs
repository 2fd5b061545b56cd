//! Binary entry point: resolve configuration, start file logging, load the
//! dictionary and hand it to the terminal UI. New words are saved by the UI
//! before it exits.
use anyhow::Context;
use clap::Parser;
use word_cards::config::{Args, Config};
use word_cards::{logging, run_app, App, WordStore};

fn main() -> anyhow::Result<()> {
    let config = Config::resolve(Args::parse())?;

    if let Err(err) = logging::init(&config.log_path) {
        eprintln!("warning: logging disabled: {err:#}");
    }

    let store = WordStore::load(&config.dictionary_path).with_context(|| {
        format!(
            "failed to open dictionary {}",
            config.dictionary_path.display()
        )
    })?;

    let mut app = App::new(store, config.dictionary_path);
    run_app(&mut app)
}
