// Channel Actions
// Copyright (C) 2025 Throneless Tech

// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.

// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

/// Splits `text` into lowercase alphanumeric words.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Case-insensitive keyword lookup over tokenized text. A keyword of several
/// words matches when those words appear consecutively.
pub struct KeywordMatcher<'a> {
    keywords: Vec<(&'a str, Vec<String>)>,
}

impl<'a> KeywordMatcher<'a> {
    pub fn new(keywords: &'a [String]) -> Self {
        Self {
            keywords: keywords
                .iter()
                .map(|k| (k.as_str(), tokenize(k)))
                .filter(|(_, words)| !words.is_empty())
                .collect(),
        }
    }

    /// The first configured keyword found in `words`, in configuration order.
    pub fn first_match(&self, words: &[String]) -> Option<&'a str> {
        self.keywords
            .iter()
            .find(|(_, needle)| words.windows(needle.len()).any(|w| w == needle.as_slice()))
            .map(|(keyword, _)| *keyword)
    }
}
