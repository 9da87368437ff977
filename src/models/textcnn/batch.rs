use burn::tensor::{backend::Backend, Data, Int, Shape, Tensor};

use crate::utils::tensors::int_tensor;

use super::error::InputError;

/// Token id sequences of one uniform length, with optional parallel class labels.
///
/// Padding and truncation happen upstream; construction only checks the shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputBatch {
    sequences: Vec<Vec<usize>>,
    labels: Option<Vec<usize>>,
}

impl InputBatch {
    /// A labelled batch for training or validation
    pub fn new(sequences: Vec<Vec<usize>>, labels: Vec<usize>) -> Result<Self, InputError> {
        if labels.len() != sequences.len() {
            return Err(InputError::LabelCount {
                sequences: sequences.len(),
                labels: labels.len(),
            });
        }

        Self::check_uniform(&sequences)?;

        Ok(Self {
            sequences,
            labels: Some(labels),
        })
    }

    /// A batch for inference
    pub fn unlabeled(sequences: Vec<Vec<usize>>) -> Result<Self, InputError> {
        Self::check_uniform(&sequences)?;

        Ok(Self {
            sequences,
            labels: None,
        })
    }

    fn check_uniform(sequences: &[Vec<usize>]) -> Result<(), InputError> {
        let expected = sequences.first().ok_or(InputError::EmptyBatch)?.len();

        for (index, sequence) in sequences.iter().enumerate() {
            if sequence.len() != expected {
                return Err(InputError::NonUniformLength {
                    index,
                    expected,
                    found: sequence.len(),
                });
            }
        }

        Ok(())
    }

    /// Check every id and label against the vocabulary and class counts
    pub fn validate(&self, vocab_size: usize, n_classes: usize) -> Result<(), InputError> {
        if let Some(&id) = self.sequences.iter().flatten().find(|&&id| id >= vocab_size) {
            return Err(InputError::TokenOutOfRange {
                id: id as i64,
                vocab_size,
            });
        }

        if let Some(&label) = self.labels.iter().flatten().find(|&&label| label >= n_classes) {
            return Err(InputError::LabelOutOfRange { label, n_classes });
        }

        Ok(())
    }

    /// Number of sequences
    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    /// Always false, construction rejects empty batches
    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    /// The shared sequence length
    pub fn seq_len(&self) -> usize {
        self.sequences[0].len()
    }

    /// The token id sequences
    pub fn sequences(&self) -> &[Vec<usize>] {
        &self.sequences
    }

    /// The class labels, if any
    pub fn labels(&self) -> Option<&[usize]> {
        self.labels.as_deref()
    }

    /// Token ids as a [batch_size, seq_len] tensor
    pub fn tokens<B: Backend>(&self, device: &B::Device) -> Tensor<B, 2, Int> {
        int_tensor(&self.sequences, self.seq_len(), device)
    }

    /// Class labels as a [batch_size] tensor
    pub fn targets<B: Backend>(&self, device: &B::Device) -> Option<Tensor<B, 1, Int>> {
        self.labels.as_ref().map(|labels| {
            Tensor::from_ints(
                Data::new(
                    labels.iter().map(|&label| label as i32).collect(),
                    Shape::new([labels.len()]),
                ),
                device,
            )
        })
    }
}
