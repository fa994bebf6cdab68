//! Dictionary module for word validation
//!
//! Parses a word list (one entry per line, or the second column of a
//! comma-separated SAOL export) into a hash set with case-insensitive lookup.
//! Loading happens on a background thread; the game polls for the result.

use crate::error::DictionaryError;
use log::{info, warn};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

/// Word-membership capability the game engine depends on.
pub trait WordList: Send {
    /// Case-insensitive membership test.
    fn contains(&self, word: &str) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Hash set of lowercase words.
#[derive(Debug, Clone, Default)]
pub struct WordSet {
    words: HashSet<String>,
}

impl WordSet {
    /// Parse word list text. Lines with commas contribute their second column.
    pub fn parse(text: &str) -> Self {
        let words = text
            .lines()
            .filter_map(|line| {
                let entry = if line.contains(',') {
                    line.split(',').nth(1)?
                } else {
                    line
                };
                let entry = entry.trim();
                (!entry.is_empty()).then(|| entry.to_lowercase())
            })
            .collect();
        Self { words }
    }

    /// Read and parse a word list file.
    pub fn load(path: &Path) -> Result<Self, DictionaryError> {
        let text = fs::read_to_string(path).map_err(|source| DictionaryError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let set = Self::parse(&text);
        if set.words.is_empty() {
            return Err(DictionaryError::Empty {
                path: path.to_path_buf(),
            });
        }
        Ok(set)
    }
}

impl<S: AsRef<str>> FromIterator<S> for WordSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            words: iter
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }
}

impl WordList for WordSet {
    fn contains(&self, word: &str) -> bool {
        self.words.contains(&word.to_lowercase())
    }

    fn len(&self) -> usize {
        self.words.len()
    }
}

/// Load progress as seen by the game.
pub enum DictionaryState {
    /// No word list was requested.
    NotLoaded,
    Loading(DictionaryLoader),
    Ready(Box<dyn WordList>),
    Failed(String),
}

impl DictionaryState {
    pub fn is_ready(&self) -> bool {
        matches!(self, DictionaryState::Ready(_))
    }

    /// Short label for the status panel.
    pub fn label(&self) -> String {
        match self {
            DictionaryState::NotLoaded => "not loaded".to_string(),
            DictionaryState::Loading(_) => "loading...".to_string(),
            DictionaryState::Ready(words) => format!("{} words", words.len()),
            DictionaryState::Failed(_) => "unavailable".to_string(),
        }
    }

    /// Move from `Loading` to `Ready`/`Failed` if the loader has finished.
    /// Returns true when the state changed.
    pub fn poll(&mut self) -> bool {
        let DictionaryState::Loading(loader) = self else {
            return false;
        };
        let Some(result) = loader.try_finish() else {
            return false;
        };
        *self = match result {
            Ok(words) => {
                info!("Word list loaded: {} words", words.len());
                DictionaryState::Ready(Box::new(words))
            }
            Err(e) => {
                warn!("Word list failed to load: {}", e);
                DictionaryState::Failed(e.to_string())
            }
        };
        true
    }
}

/// Background word list loader.
pub struct DictionaryLoader {
    rx: Receiver<Result<WordSet, DictionaryError>>,
}

impl DictionaryLoader {
    /// Start reading `path` on a worker thread.
    pub fn spawn(path: PathBuf) -> Self {
        let (tx, rx) = mpsc::channel();
        info!("Loading word list from {}", path.display());
        thread::spawn(move || {
            // The receiver may be gone if the game quit first.
            let _ = tx.send(WordSet::load(&path));
        });
        Self { rx }
    }

    /// Non-blocking check for the loader's result.
    pub fn try_finish(&self) -> Option<Result<WordSet, DictionaryError>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(DictionaryError::LoaderGone)),
        }
    }
}
