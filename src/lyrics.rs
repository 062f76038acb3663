use itertools::Itertools;
use std::{fs, io, path::Path};

/// Turn raw lyrics into the character stream the player types.
///
/// Whitespace runs (including line breaks) collapse to a single space and
/// the result never starts or ends with one.
pub fn tokenize(text: &str) -> Vec<char> {
    text.split_whitespace().join(" ").chars().collect()
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Read a lyrics file as-is; tokenizing happens when the session starts.
pub fn load<P: AsRef<Path>>(path: P) -> io::Result<String> {
    fs::read_to_string(path)
}
