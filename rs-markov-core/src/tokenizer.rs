use crate::model::chain::{END, START};

/// Substrings marking a word as a link. Such words are discarded entirely.
const URL_MARKERS: [&str; 2] = ["https://", "http://"];

/// Cleans a raw word into a token.
///
/// - Drops non-ASCII characters
/// - Lowercases
/// - Returns an empty string if the word contains a URL marker
/// - Keeps only `a..=z`
///
/// Example: `"Don't!"` → `"dont"`
pub fn sanitize(word: &str) -> String {
	let ascii: String = word
		.chars()
		.filter(char::is_ascii)
		.map(|c| c.to_ascii_lowercase())
		.collect();

	if URL_MARKERS.iter().any(|marker| ascii.contains(marker)) {
		return String::new();
	}

	ascii.chars().filter(char::is_ascii_lowercase).collect()
}

/// Turns one line of text into a `START … END` token unit.
///
/// Empty tokens (words made only of punctuation, links...) are dropped.
/// A line left without any word yields no unit at all, so `START` is
/// never directly followed by `END`.
pub fn tokenize_line(line: &str) -> Vec<String> {
	let words: Vec<String> = line
		.split_whitespace()
		.map(sanitize)
		.filter(|token| !token.is_empty())
		.collect();
	if words.is_empty() {
		return Vec::new();
	}

	let mut tokens = Vec::with_capacity(words.len() + 2);
	tokens.push(START.to_owned());
	tokens.extend(words);
	tokens.push(END.to_owned());
	tokens
}

/// Tokenizes every line into its own unit.
///
/// Units are kept apart so that ingestion never links the `END` of a
/// line to the `START` of the next one.
pub fn tokenize_lines<I, S>(lines: I) -> Vec<Vec<String>>
where
	I: IntoIterator<Item = S>,
	S: AsRef<str>,
{
	lines.into_iter().map(|line| tokenize_line(line.as_ref())).collect()
}
