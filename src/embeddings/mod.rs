use burn::tensor::{backend::Backend, Data, Shape, Tensor};

use crate::vocab::Vocabulary;

/// GloVe-format pretrained word vectors
pub mod glove;

pub use glove::Glove;

/// A source of pretrained word vectors used to seed the embedding tables
pub trait PretrainedEmbeddingSource {
    /// Size of each vector
    fn dim(&self) -> usize;

    /// The vector for a token, if the source has one
    fn vector(&self, token: &str) -> Option<&[f32]>;

    /// A row-major [tokens.len(), dim] matrix, with zero vectors for unseen tokens
    fn vectors_for<S: AsRef<str>>(&self, tokens: &[S]) -> Vec<f32> {
        let dim = self.dim();
        let mut matrix = vec![0.0; tokens.len() * dim];

        for (row, token) in matrix.chunks_mut(dim.max(1)).zip(tokens) {
            if let Some(vector) = self.vector(token.as_ref()) {
                row.copy_from_slice(vector);
            }
        }

        matrix
    }
}

/// Build a [vocab_size, dim] weight tensor for the vocabulary from a pretrained source
pub fn embedding_weights<B, S>(source: &S, vocab: &Vocabulary, device: &B::Device) -> Tensor<B, 2>
where
    B: Backend,
    S: PretrainedEmbeddingSource,
{
    let tokens = vocab.tokens();
    let found = tokens
        .iter()
        .filter(|token| source.vector(token).is_some())
        .count();

    log::info!(
        "Found pretrained vectors for {} of {} tokens",
        found,
        tokens.len()
    );

    if found < tokens.len() {
        log::warn!(
            "{} tokens have no pretrained vector and start at zero",
            tokens.len() - found
        );
    }

    let matrix = source.vectors_for(tokens);

    Tensor::from_floats(
        Data::new(matrix, Shape::new([tokens.len(), source.dim()])),
        device,
    )
}

#[cfg(test)]
mod tests {
    use burn::backend::NdArray;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_unseen_tokens_are_zero() {
        let glove = Glove::parse(["good 1 2", "bad -1 -2"]).unwrap();
        let vocab = Vocabulary::new(["<unk>", "bad", "meh", "good"]);

        let weights = embedding_weights::<NdArray, _>(&glove, &vocab, &Default::default());

        assert_eq!(weights.dims(), [4, 2]);
        assert_eq!(
            weights.into_data().convert::<f32>().value,
            vec![0.0, 0.0, -1.0, -2.0, 0.0, 0.0, 1.0, 2.0]
        );
    }
}
