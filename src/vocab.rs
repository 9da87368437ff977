//! Token vocabulary, tokenization, and sequence padding

use std::{collections::HashMap, path::Path};

use serde::{Deserialize, Serialize};

/// The token unknown words map to
pub static UNK: &str = "<unk>";

/// The token used to pad sequences to a uniform length
pub static PAD: &str = "<pad>";

/// An ordered, deduplicated list of tokens where a token's position is its id.
///
/// Immutable after construction. Serialized as the plain token list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Vocabulary {
    tokens: Vec<String>,
    index: HashMap<String, usize>,
}

impl Vocabulary {
    /// Create a vocabulary in insertion order, skipping duplicates
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut vocab = Self {
            tokens: Vec::new(),
            index: HashMap::new(),
        };

        for token in tokens {
            vocab.insert(token.into());
        }

        vocab
    }

    /// Build a vocabulary from a tokenized corpus.
    ///
    /// `<unk>` takes id 0, the reserved tokens follow, then every token seen at least
    /// `min_freq` times, most frequent first (ties broken alphabetically).
    pub fn build<S: AsRef<str>>(corpus: &[Vec<String>], min_freq: usize, reserved: &[S]) -> Self {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for token in corpus.iter().flatten() {
            *counts.entry(token.as_str()).or_default() += 1;
        }

        let mut frequent: Vec<(&str, usize)> = counts
            .into_iter()
            .filter(|(_, count)| *count >= min_freq)
            .collect();
        frequent.sort_by(|(a, a_count), (b, b_count)| b_count.cmp(a_count).then(a.cmp(b)));

        let mut vocab = Self::new([UNK]);
        for token in reserved {
            vocab.insert(token.as_ref().to_string());
        }
        for (token, _) in frequent {
            vocab.insert(token.to_string());
        }

        vocab
    }

    fn insert(&mut self, token: String) {
        if !self.index.contains_key(&token) {
            self.index.insert(token.clone(), self.tokens.len());
            self.tokens.push(token);
        }
    }

    /// Number of tokens
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the vocabulary has no tokens
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// All tokens, ordered by id
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// The id of a token, if present
    pub fn id(&self, token: &str) -> Option<usize> {
        self.index.get(token).copied()
    }

    /// The id of `<unk>`, or 0 if the vocabulary has none
    pub fn unk_id(&self) -> usize {
        self.id(UNK).unwrap_or(0)
    }

    /// The id of a token, falling back to `<unk>`
    pub fn get(&self, token: &str) -> usize {
        self.id(token).unwrap_or_else(|| self.unk_id())
    }

    /// The token for an id
    pub fn token(&self, id: usize) -> Option<&str> {
        self.tokens.get(id).map(String::as_str)
    }

    /// Map tokens to ids, unknown tokens becoming `<unk>`
    pub fn encode<S: AsRef<str>>(&self, tokens: &[S]) -> Vec<usize> {
        tokens.iter().map(|token| self.get(token.as_ref())).collect()
    }

    /// Write the vocabulary as a JSON list of tokens
    pub fn save<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let json = serde_json::to_string(self)?;

        std::fs::write(path.as_ref(), json)
            .map_err(|e| anyhow!("Unable to write vocabulary {:?}: {}", path.as_ref(), e))
    }

    /// Read a vocabulary written by [`Vocabulary::save`]
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())
            .map_err(|e| anyhow!("Unable to read vocabulary {:?}: {}", path.as_ref(), e))?;

        Ok(serde_json::from_str(&json)?)
    }
}

impl From<Vec<String>> for Vocabulary {
    fn from(tokens: Vec<String>) -> Self {
        Self::new(tokens)
    }
}

impl From<Vocabulary> for Vec<String> {
    fn from(vocab: Vocabulary) -> Self {
        vocab.tokens
    }
}

/// Split text into lowercase words on whitespace
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_lowercase).collect()
}

/// Truncate or pad a sequence of ids to exactly `len` entries
pub fn truncate_pad(ids: &[usize], len: usize, pad_id: usize) -> Vec<usize> {
    let mut padded: Vec<usize> = ids.iter().copied().take(len).collect();
    padded.resize(len, pad_id);

    padded
}
