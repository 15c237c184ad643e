// Tweet tokenization.
//
// Lowercases, drops URLs and @mentions, keeps runs of Unicode letters,
// digits and apostrophes, so "fútbol" stays one word. Hashtags lose their
// `#` so "#nba" and "nba" count as the same word, which is also how GloVe's
// vocabulary spells them.

use std::collections::HashSet;

use regex_lite::Regex;
use stop_words::{get, LANGUAGE};

pub struct Tokenizer {
    noise: Regex,
    stop_words: HashSet<String>,
}

impl Tokenizer {
    /// Create a tokenizer. With `remove_stop_words`, English stop words
    /// from the `stop-words` crate are dropped.
    pub fn new(remove_stop_words: bool) -> Self {
        let stop_words = if remove_stop_words {
            get(LANGUAGE::English).into_iter().collect()
        } else {
            HashSet::new()
        };

        Self {
            noise: Regex::new(r"https?://\S+|www\.\S+|@\w+").expect("static noise regex"),
            stop_words,
        }
    }

    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        let cleaned = self.noise.replace_all(&lower, " ");

        cleaned
            .split(|c: char| !(c.is_alphanumeric() || c == '\''))
            .map(|t| t.trim_matches('\''))
            .filter(|t| !t.is_empty() && !self.stop_words.contains(*t))
            .map(str::to_string)
            .collect()
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(true)
    }
}
