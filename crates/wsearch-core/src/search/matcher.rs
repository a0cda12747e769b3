use super::types::{Match, SkipReason};
use crate::config::consts::search::BINARY_SNIFF_BYTES;

/// Case-insensitive substring matcher over the lines of one file
#[derive(Debug, Clone)]
pub struct LineMatcher {
    needle: String,
}

impl LineMatcher {
    pub fn new(query: &str) -> Self {
        Self {
            needle: query.to_lowercase(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    pub fn matches(&self, line: &str) -> bool {
        line.to_lowercase().contains(&self.needle)
    }

    /// Matches in `content`, stopping once `budget` matches were produced
    pub fn scan(&self, file: &str, content: &str, budget: usize) -> Vec<Match> {
        let mut found = Vec::new();
        for (index, line) in content.split('\n').enumerate() {
            if found.len() >= budget {
                break;
            }
            if self.matches(line) {
                found.push(Match {
                    file: file.to_string(),
                    line: index + 1,
                    preview: line
                        .trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
                        .to_string(),
                });
            }
        }
        found
    }
}

/// Decode file bytes as text, or say why they are not searchable
pub fn classify_content(bytes: Vec<u8>) -> Result<String, SkipReason> {
    let sniff = &bytes[..bytes.len().min(BINARY_SNIFF_BYTES)];
    if sniff.contains(&0) {
        return Err(SkipReason::Binary);
    }
    String::from_utf8(bytes).map_err(|_| SkipReason::Binary)
}
