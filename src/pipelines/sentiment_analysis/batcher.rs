use std::sync::Arc;

use burn::{
    data::dataloader,
    tensor::{backend::Backend, Int, Tensor},
};
use derive_new::new;

use crate::{
    models::textcnn::InputBatch,
    vocab::{tokenize, truncate_pad, Vocabulary, PAD},
};

use super::Item;

/// An inference batch for sentiment analysis
#[derive(Debug, Clone, new)]
pub struct Infer<B: Backend> {
    /// Token ids as a 2D tensor: [batch_size, seq_len]
    pub tokens: Tensor<B, 2, Int>,
}

/// A training batch for sentiment analysis
#[derive(Clone, Debug, new)]
pub struct Train<B: Backend> {
    /// TextCNN Model input
    pub input: Infer<B>,

    /// Class ids for the batch
    pub targets: Tensor<B, 1, Int>,

    /// Seed for the dropout masks drawn while training on this batch
    pub dropout_seed: u64,
}

/// Struct for batching sentiment analysis items
#[derive(Clone)]
pub struct Batcher<B: Backend> {
    /// Vocabulary for converting words to token ids
    pub vocab: Arc<Vocabulary>,

    /// Length every sequence is truncated or padded to
    pub seq_len: usize,

    /// ID of the padding token
    pub pad_token_id: usize,

    /// Base seed for per-batch dropout seeds
    seed: u64,

    /// Device on which to perform computation (e.g., CPU or CUDA device)
    pub device: B::Device,
}

impl<B: Backend> Batcher<B> {
    /// Creates a new batcher
    pub fn new(vocab: Arc<Vocabulary>, seq_len: usize, seed: u64, device: B::Device) -> Self {
        let pad_token_id = vocab.id(PAD).unwrap_or_else(|| vocab.unk_id());

        Self {
            vocab,
            seq_len,
            pad_token_id,
            seed,
            device,
        }
    }

    /// Tokenize, encode, and truncate or pad a text to the sequence length
    pub fn encode(&self, text: &str) -> Vec<usize> {
        let ids = self.vocab.encode(&tokenize(text));

        truncate_pad(&ids, self.seq_len, self.pad_token_id)
    }

    /// The dropout seed for a batch, mixed from the base seed and the batch contents.
    ///
    /// Depending only on what is in the batch keeps the masks reproducible however many
    /// data loader workers build batches and in whatever order they finish.
    fn dropout_seed(&self, batch: &InputBatch) -> u64 {
        let ids = batch.sequences().iter().flatten();
        let labels = batch.labels().unwrap_or_default();

        ids.chain(labels)
            .fold(mix(self.seed), |state, &value| mix(state ^ value as u64))
    }
}

/// SplitMix64 finalizer
fn mix(value: u64) -> u64 {
    let mut z = value.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);

    z ^ (z >> 31)
}

/// Implement Batcher trait for Batcher struct for inference
impl<B: Backend> dataloader::batcher::Batcher<String, Infer<B>> for Batcher<B> {
    /// Collects a vector of texts into an inference batch
    fn batch(&self, items: Vec<String>) -> Infer<B> {
        let sequences = items.iter().map(|text| self.encode(text)).collect();

        let batch =
            InputBatch::unlabeled(sequences).expect("sequences are padded to a uniform length");

        Infer {
            tokens: batch.tokens(&self.device),
        }
    }
}

/// Implement Batcher trait for Batcher struct for training
impl<B: Backend, I: Item> dataloader::batcher::Batcher<I, Train<B>> for Batcher<B> {
    /// Collects a vector of sentiment analysis items into a training batch
    fn batch(&self, items: Vec<I>) -> Train<B> {
        let sequences = items.iter().map(|item| self.encode(item.input())).collect();
        let labels = items.iter().map(|item| item.class_id()).collect();

        let batch =
            InputBatch::new(sequences, labels).expect("sequences are padded to a uniform length");

        Train {
            input: Infer {
                tokens: batch.tokens(&self.device),
            },
            targets: batch
                .targets(&self.device)
                .expect("training batches are labelled"),
            dropout_seed: self.dropout_seed(&batch),
        }
    }
}

#[cfg(test)]
mod tests {
    use burn::{backend::NdArray, data::dataloader::batcher::Batcher as _};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::datasets::imdb;

    type TestBackend = NdArray;

    fn batcher() -> Batcher<TestBackend> {
        let vocab = Vocabulary::new(["<unk>", "<pad>", "great", "movie", "bad"]);

        Batcher::new(Arc::new(vocab), 4, 42, Default::default())
    }

    #[test]
    fn test_encode_pads_and_truncates() {
        let batcher = batcher();

        assert_eq!(batcher.encode("Great movie"), vec![2, 3, 1, 1]);
        assert_eq!(batcher.encode("bad bad awful movie great"), vec![4, 4, 0, 3]);
    }

    #[test]
    fn test_inference_batch() {
        let batch: Infer<TestBackend> =
            batcher().batch(vec!["great movie".to_string(), "bad".to_string()]);

        assert_eq!(batch.tokens.dims(), [2, 4]);
        assert_eq!(
            batch.tokens.into_data().convert::<i64>().value,
            vec![2, 3, 1, 1, 4, 1, 1, 1]
        );
    }

    #[test]
    fn test_training_batch() {
        let batcher = batcher();
        let items = vec![
            imdb::Item::new("great movie".to_string(), 1),
            imdb::Item::new("bad movie".to_string(), 0),
        ];

        let first: Train<TestBackend> = batcher.batch(items.clone());

        assert_eq!(first.input.tokens.dims(), [2, 4]);
        assert_eq!(
            first.targets.into_data().convert::<i64>().value,
            vec![1, 0]
        );
    }

    #[test]
    fn test_dropout_seed_follows_batch_contents() {
        let batcher = batcher();
        let items = vec![
            imdb::Item::new("great movie".to_string(), 1),
            imdb::Item::new("bad movie".to_string(), 0),
        ];
        let reordered = vec![items[1].clone(), items[0].clone()];
        let relabelled = vec![
            imdb::Item::new("great movie".to_string(), 0),
            imdb::Item::new("bad movie".to_string(), 0),
        ];

        let reseeded = Batcher::<TestBackend>::new(batcher.vocab.clone(), 4, 7, Default::default());

        let first: Train<TestBackend> = batcher.batch(items.clone());

        // Another worker building the same batch later draws the same masks
        let again: Train<TestBackend> = batcher.clone().batch(items.clone());
        let swapped: Train<TestBackend> = batcher.batch(reordered);
        let changed: Train<TestBackend> = batcher.batch(relabelled);
        let reseeded: Train<TestBackend> = reseeded.batch(items);

        assert_eq!(first.dropout_seed, again.dropout_seed);
        assert_ne!(first.dropout_seed, swapped.dropout_seed);
        assert_ne!(first.dropout_seed, changed.dropout_seed);
        assert_ne!(first.dropout_seed, reseeded.dropout_seed);
    }
}
