//! Command-line and environment configuration. Everything the binary needs
//! to know before it touches the terminal lives here: which dictionary to
//! open and where log output goes.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use clap::Parser;
use directories::BaseDirs;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".word-cards";
/// Dictionary file name stored inside the application data directory.
const DICTIONARY_FILE_NAME: &str = "words.json";
/// Log file name stored next to the dictionary.
const LOG_FILE_NAME: &str = "word-cards.log";

#[derive(Parser, Debug, Default)]
#[clap(author, version, about = "Vocabulary flashcards in the terminal", long_about = None)]
pub struct Args {
    /// Dictionary JSON file to study from
    #[clap(short, long, env = "WORD_CARDS_DICTIONARY")]
    pub dictionary: Option<PathBuf>,
    /// File that receives log output
    #[clap(long, env = "WORD_CARDS_LOG")]
    pub log_file: Option<PathBuf>,
}

/// Resolved runtime settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub dictionary_path: PathBuf,
    pub log_path: PathBuf,
}

impl Config {
    /// Fill anything the user left out with defaults under the home directory.
    pub fn resolve(args: Args) -> Result<Self> {
        let base_dirs = BaseDirs::new();
        Self::resolve_with_home(args, base_dirs.as_ref().map(|dirs| dirs.home_dir()))
    }

    fn resolve_with_home(args: Args, home: Option<&Path>) -> Result<Self> {
        let data_dir = || {
            home.map(|home| home.join(DATA_DIR_NAME))
                .ok_or_else(|| anyhow!("could not locate home directory; pass --dictionary and --log-file"))
        };

        let dictionary_path = match args.dictionary {
            Some(path) => path,
            None => data_dir()?.join(DICTIONARY_FILE_NAME),
        };
        let log_path = match args.log_file {
            Some(path) => path,
            None => data_dir()?.join(LOG_FILE_NAME),
        };

        Ok(Self {
            dictionary_path,
            log_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_live_under_home() {
        let config = Config::resolve_with_home(Args::default(), Some(Path::new("/home/ann"))).unwrap();

        assert_eq!(
            config.dictionary_path,
            PathBuf::from("/home/ann/.word-cards/words.json")
        );
        assert_eq!(
            config.log_path,
            PathBuf::from("/home/ann/.word-cards/word-cards.log")
        );
    }

    #[test]
    fn explicit_paths_win() {
        let args = Args::parse_from(["word-cards", "-d", "my/words.json", "--log-file", "out.log"]);
        let config = Config::resolve_with_home(args, None).unwrap();

        assert_eq!(config.dictionary_path, PathBuf::from("my/words.json"));
        assert_eq!(config.log_path, PathBuf::from("out.log"));
    }

    #[test]
    fn missing_home_without_paths_is_an_error() {
        let err = Config::resolve_with_home(Args::default(), None).unwrap_err();
        assert!(err.to_string().contains("home directory"));
    }
}
