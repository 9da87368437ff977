use std::collections::HashMap;

use crate::utils::files::read_lines;

use super::PretrainedEmbeddingSource;

/// Word vectors in the GloVe text format: one `token v1 v2 ... vD` entry per line
#[derive(Debug, Clone, Default)]
pub struct Glove {
    dim: usize,
    index: HashMap<String, usize>,
    vectors: Vec<f32>,
}

impl Glove {
    /// Load vectors from a text file such as `glove.6B.100d.txt`
    pub async fn load(path: &str) -> anyhow::Result<Self> {
        log::info!("Loading pretrained vectors from {}...", path);

        let lines = read_lines(path)
            .await
            .map_err(|e| anyhow!("Unable to read pretrained vectors {}: {}", path, e))?;

        let glove = Self::parse(lines)?;

        log::info!("Loaded {} vectors of size {}", glove.len(), glove.dim);

        Ok(glove)
    }

    /// Parse lines of vectors. The last `dim` space-separated fields of a line are the
    /// vector and everything before them is the token, so tokens may contain spaces.
    ///
    /// A first line of exactly two integers is a fastText `count dim` header and is skipped.
    /// Blank lines are ignored and later duplicates of a token are dropped.
    pub fn parse<I, S>(lines: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut glove = Self::default();
        let mut first = true;

        for (number, line) in lines.into_iter().enumerate() {
            let line = line.as_ref().trim_end();

            if line.is_empty() {
                continue;
            }

            if first {
                first = false;

                if let Some(dim) = header_dim(line) {
                    glove.dim = dim;
                    continue;
                }
            }

            if glove.dim == 0 {
                glove.dim = line.split_whitespace().count() - 1;

                if glove.dim == 0 {
                    return Err(anyhow!("Line {} has a token but no values", number + 1));
                }
            }

            let mut fields = line.rsplitn(glove.dim + 1, ' ').collect::<Vec<_>>();

            let token = match fields.pop() {
                Some(token) if fields.len() == glove.dim && !token.is_empty() => token,
                _ => {
                    return Err(anyhow!(
                        "Line {} has fewer than {} values",
                        number + 1,
                        glove.dim
                    ))
                }
            };

            let values = fields
                .into_iter()
                .rev()
                .map(str::parse::<f32>)
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| anyhow!("Invalid value on line {}: {}", number + 1, e))?;

            if glove.index.contains_key(token) {
                continue;
            }

            glove.index.insert(token.to_string(), glove.index.len());
            glove.vectors.extend(values);
        }

        Ok(glove)
    }

    /// Number of tokens with a vector
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether no vectors were loaded
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

/// The vector size announced by a fastText-style `count dim` header line
fn header_dim(line: &str) -> Option<usize> {
    let fields = line.split_whitespace().collect::<Vec<_>>();

    match fields[..] {
        [count, dim] => {
            count.parse::<usize>().ok()?;
            dim.parse::<usize>().ok().filter(|&dim| dim > 0)
        }
        _ => None,
    }
}

impl PretrainedEmbeddingSource for Glove {
    fn dim(&self) -> usize {
        self.dim
    }

    fn vector(&self, token: &str) -> Option<&[f32]> {
        self.index
            .get(token)
            .map(|&row| &self.vectors[row * self.dim..(row + 1) * self.dim])
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_parse() {
        let glove = Glove::parse(["the 0.1 0.2 0.3", "", "movie -1 0 1"]).unwrap();

        assert_eq!(glove.len(), 2);
        assert_eq!(glove.dim(), 3);
        assert_eq!(glove.vector("movie"), Some(&[-1.0, 0.0, 1.0][..]));
        assert_eq!(glove.vector("film"), None);
    }

    #[test]
    fn test_skips_header_lines() {
        let glove = Glove::parse(["2 3", "a 1 2 3", "b 4 5 6"]).unwrap();

        assert_eq!(glove.len(), 2);
        assert_eq!(glove.vector("b"), Some(&[4.0, 5.0, 6.0][..]));
    }

    #[test]
    fn test_keeps_first_duplicate() {
        let glove = Glove::parse(["a 1 2", "a 3 4"]).unwrap();

        assert_eq!(glove.len(), 1);
        assert_eq!(glove.vector("a"), Some(&[1.0, 2.0][..]));
    }

    #[test]
    fn test_rejects_short_or_invalid_vectors() {
        assert!(Glove::parse(["a 1 2", "b 1"]).is_err());
        assert!(Glove::parse(["a 1 x"]).is_err());
        assert!(Glove::parse(["a"]).is_err());
        assert!(Glove::parse(["2 3", "a 1 2"]).is_err());
    }

    #[test]
    fn test_tokens_with_spaces() {
        let glove = Glove::parse(["a 1 2", ". . . 3 4", "at&t 5 6"]).unwrap();

        assert_eq!(glove.len(), 3);
        assert_eq!(glove.vector(". . ."), Some(&[3.0, 4.0][..]));
        assert_eq!(glove.vector("at&t"), Some(&[5.0, 6.0][..]));
    }

    #[test]
    fn test_single_value_vectors() {
        let glove = Glove::parse(["good 1", "bad -1"]).unwrap();

        assert_eq!(glove.len(), 2);
        assert_eq!(glove.dim(), 1);
        assert_eq!(glove.vector("bad"), Some(&[-1.0][..]));
    }

    #[test]
    fn test_header_sets_dimension() {
        let glove = Glove::parse(["2 1", "good 1", "bad -1"]).unwrap();

        assert_eq!(glove.len(), 2);
        assert_eq!(glove.dim(), 1);
        assert_eq!(glove.vector("2"), None);
    }

    #[test]
    fn test_vectors_for_fills_zeros() {
        let glove = Glove::parse(["a 1 2"]).unwrap();

        assert_eq!(glove.vectors_for(&["b", "a"]), vec![0.0, 0.0, 1.0, 2.0]);
    }
}
