//! Newline-delimited word lists.
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use tracing::debug;

/// Reads one trimmed word per non-empty line.
pub fn read_words<R: BufRead>(reader: R) -> io::Result<Vec<String>> {
    let mut words = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let word = line.trim();
        if !word.is_empty() {
            words.push(word.to_string());
        }
    }
    Ok(words)
}

pub fn read_words_from_path(path: &Path) -> io::Result<Vec<String>> {
    let file = File::open(path)?;
    let words = read_words(BufReader::new(file))?;
    debug!(path = %path.display(), count = words.len(), "read word list");
    Ok(words)
}
