use burn::{
    module::{Module, Param},
    tensor::{backend::Backend, module::embedding, Data, Int, Shape, Tensor},
};

use super::error::InputError;

/// A token embedding table with an explicit trainability flag.
///
/// The TextCNN keeps two of these, seeded from the same vectors: a trainable table
/// that the optimizer updates, and a frozen table whose rows are detached from the
/// autodiff graph on every lookup so no gradient ever reaches it.
#[derive(Module, Debug)]
pub struct EmbeddingTable<B: Backend> {
    /// The [vocab_size, embedding_dim] matrix
    pub weight: Param<Tensor<B, 2>>,

    /// Whether gradients flow into this table
    pub trainable: bool,
}

impl<B: Backend> EmbeddingTable<B> {
    /// Create a table that is updated during training
    pub fn trainable(weights: Tensor<B, 2>) -> Self {
        Self {
            weight: Param::from_tensor(owned(weights)),
            trainable: true,
        }
    }

    /// Create a table that stays fixed at its initial values
    pub fn frozen(weights: Tensor<B, 2>) -> Self {
        Self {
            weight: Param::from_tensor(owned(weights)),
            trainable: false,
        }
    }

    /// Whether gradients flow into this table
    pub fn is_trainable(&self) -> bool {
        self.trainable
    }

    /// [vocab_size, embedding_dim]
    pub fn dims(&self) -> [usize; 2] {
        self.weight.val().dims()
    }

    /// Number of rows in the table
    pub fn vocab_size(&self) -> usize {
        self.dims()[0]
    }

    fn weights(&self) -> Tensor<B, 2> {
        if self.trainable {
            self.weight.val()
        } else {
            self.weight.val().detach()
        }
    }

    /// Gather the rows for a single sequence of token ids: [len, embedding_dim]
    pub fn lookup(&self, token_ids: &[usize]) -> Result<Tensor<B, 2>, InputError> {
        let vocab_size = self.vocab_size();

        if let Some(&id) = token_ids.iter().find(|&&id| id >= vocab_size) {
            return Err(InputError::TokenOutOfRange {
                id: id as i64,
                vocab_size,
            });
        }

        let weights = self.weights();
        let indices = Tensor::<B, 1, Int>::from_ints(
            Data::new(
                token_ids.iter().map(|&id| id as i32).collect(),
                Shape::new([token_ids.len()]),
            ),
            &weights.device(),
        );

        Ok(weights.select(0, indices))
    }

    /// Gather rows for a batch of token ids: [batch_size, seq_len] -> [batch_size, seq_len, embedding_dim]
    ///
    /// Ids are expected to be validated against the vocabulary by the caller.
    pub fn forward(&self, tokens: Tensor<B, 2, Int>) -> Tensor<B, 3> {
        embedding(self.weights(), tokens)
    }
}

/// A fresh leaf tensor holding a copy of the values, so no two tables share a graph node
fn owned<B: Backend>(weights: Tensor<B, 2>) -> Tensor<B, 2> {
    let device = weights.device();

    Tensor::from_data(weights.into_data(), &device)
}

#[cfg(test)]
mod tests {
    use burn::backend::{Autodiff, NdArray};
    use pretty_assertions::assert_eq;

    use super::*;

    type TestBackend = NdArray;
    type TestAutodiffBackend = Autodiff<NdArray>;

    fn table<B: Backend>(trainable: bool, device: &B::Device) -> EmbeddingTable<B> {
        let weights = Tensor::from_floats([[0.0, 0.5], [1.0, 1.5], [2.0, 2.5]], device);

        if trainable {
            EmbeddingTable::trainable(weights)
        } else {
            EmbeddingTable::frozen(weights)
        }
    }

    #[test]
    fn test_lookup_gathers_rows() {
        let device = Default::default();
        let table = table::<TestBackend>(true, &device);

        let rows = table.lookup(&[2, 0, 2]).unwrap();

        assert_eq!(rows.dims(), [3, 2]);
        assert_eq!(
            rows.into_data().convert::<f32>().value,
            vec![2.0, 2.5, 0.0, 0.5, 2.0, 2.5]
        );
    }

    #[test]
    fn test_lookup_rejects_out_of_range_ids() {
        let device = Default::default();
        let table = table::<TestBackend>(false, &device);

        assert_eq!(
            table.lookup(&[0, 3]).err(),
            Some(InputError::TokenOutOfRange {
                id: 3,
                vocab_size: 3
            })
        );
    }

    #[test]
    fn test_forward_batch() {
        let device = Default::default();
        let table = table::<TestBackend>(false, &device);
        let tokens = Tensor::<TestBackend, 2, Int>::from_ints([[1, 2], [0, 1]], &device);

        let output = table.forward(tokens);

        assert_eq!(output.dims(), [2, 2, 2]);
        assert_eq!(
            output.into_data().convert::<f32>().value,
            vec![1.0, 1.5, 2.0, 2.5, 0.0, 0.5, 1.0, 1.5]
        );
    }

    #[test]
    fn test_frozen_table_receives_no_gradient() {
        let device = Default::default();
        let trainable = table::<TestAutodiffBackend>(true, &device);
        let frozen = table::<TestAutodiffBackend>(false, &device);
        let tokens = Tensor::<TestAutodiffBackend, 2, Int>::from_ints([[1, 2]], &device);

        let loss = trainable.forward(tokens.clone()).sum() + frozen.forward(tokens).sum();
        let grads = loss.backward();

        assert!(trainable.weight.val().grad(&grads).is_some());
        assert!(frozen.weight.val().grad(&grads).is_none());
    }

    #[test]
    fn test_tables_from_one_tensor_are_independent() {
        let device = Default::default();
        let weights =
            Tensor::<TestAutodiffBackend, 2>::from_floats([[0.0, 0.5], [1.0, 1.5]], &device);

        let trainable = EmbeddingTable::trainable(weights.clone());
        let frozen = EmbeddingTable::frozen(weights);
        let tokens = Tensor::<TestAutodiffBackend, 2, Int>::from_ints([[0, 1]], &device);

        let loss = trainable.forward(tokens.clone()).sum() + frozen.forward(tokens).sum();
        let grads = loss.backward();

        assert!(trainable.weight.val().grad(&grads).is_some());
        assert!(frozen.weight.val().grad(&grads).is_none());
        assert_eq!(
            frozen.weight.val().into_data().convert::<f32>().value,
            vec![0.0, 0.5, 1.0, 1.5]
        );
    }
}
