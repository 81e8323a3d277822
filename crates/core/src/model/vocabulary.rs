use std::collections::BTreeSet;

/// The fixed word list every new user starts from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    words: BTreeSet<String>,
}

impl Vocabulary {
    /// Parse a newline-separated word list.
    ///
    /// Trailing whitespace is stripped from each line, blank lines are
    /// skipped and duplicates collapse into one entry.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        text.lines()
            .map(|line| line.trim_end_matches([' ', '\n', '\r', '\t']))
            .filter(|word| !word.is_empty())
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    #[must_use]
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    /// Words in lexicographic order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for Vocabulary {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            words: iter.into_iter().map(Into::into).collect(),
        }
    }
}
