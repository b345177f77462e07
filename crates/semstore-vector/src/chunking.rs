//! Split a document into chunks suitable for embedding.
//!
//! Text is cut into sentences at a period followed by whitespace, then each
//! sentence into lines. Lines of one sentence are packed into chunks holding
//! at most `max_words` whitespace-separated words. Chunks never span two
//! sentences, and a single line longer than the limit is kept whole.

use regex::Regex;

/// Sentence- and line-aware document splitter.
#[derive(Debug, Clone)]
pub struct TextChunker {
    sentence_end: Regex,
    line_break: Regex,
}

impl Default for TextChunker {
    fn default() -> Self {
        Self::new()
    }
}

impl TextChunker {
    /// Create a chunker with pre-compiled split patterns.
    pub fn new() -> Self {
        Self {
            sentence_end: Regex::new(r"\.\s+").expect("static sentence pattern"),
            line_break: Regex::new(r"[\r\n]+").expect("static line pattern"),
        }
    }

    /// Split `text` into trimmed, non-empty chunks of at most `max_words`
    /// words.
    ///
    /// Blank lines are skipped. Lines packed into one chunk are joined with
    /// a single space. A `max_words` of 0 is treated as 1.
    pub fn chunk(&self, text: &str, max_words: usize) -> Vec<String> {
        let max_words = max_words.max(1);
        let mut chunks = Vec::new();

        for sentence in self.sentences(text) {
            let mut current = String::new();
            let mut current_words = 0;

            for line in self.line_break.split(sentence) {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let line_words = line.split_whitespace().count();
                if current_words > 0 && current_words + line_words > max_words {
                    chunks.push(std::mem::take(&mut current));
                    current_words = 0;
                }

                if !current.is_empty() {
                    current.push(' ');
                }
                current.push_str(line);
                current_words += line_words;
            }

            if !current.is_empty() {
                chunks.push(current);
            }
        }

        chunks
    }

    /// Sentences keep their closing period; the whitespace after it is dropped.
    fn sentences<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let mut sentences = Vec::new();
        let mut start = 0;
        for m in self.sentence_end.find_iter(text) {
            let end = m.start() + 1;
            sentences.push(&text[start..end]);
            start = m.end();
        }
        if start < text.len() {
            sentences.push(&text[start..]);
        }
        sentences
    }
}
