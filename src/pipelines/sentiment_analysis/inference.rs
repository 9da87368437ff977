use std::sync::Arc;

use burn::{data::dataloader::batcher::Batcher as _, tensor::backend::Backend};

use crate::{
    models::textcnn::{self, Model},
    vocab::Vocabulary,
};

use super::{artifacts, batcher::Infer, label_for, Batcher};

/// A predicted sentiment for one text
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// The input text
    pub text: String,

    /// The most probable class id
    pub class_id: usize,

    /// The name of the most probable class
    pub label: String,

    /// Probability of each class
    pub probabilities: Vec<f32>,
}

/// Predict the sentiment of each text with an evaluation-mode forward pass
pub fn predict<B: Backend>(
    model: &Model<B>,
    config: &textcnn::Config,
    vocab: Arc<Vocabulary>,
    texts: Vec<String>,
    device: &B::Device,
) -> anyhow::Result<Vec<Prediction>> {
    if texts.is_empty() {
        return Ok(Vec::new());
    }

    let batcher = Batcher::<B>::new(vocab, config.seq_len, 0, device.clone());
    let batch: Infer<B> = batcher.batch(texts.clone());

    let probabilities = model
        .infer(batch.tokens)?
        .into_data()
        .convert::<f32>()
        .value;

    let predictions = texts
        .into_iter()
        .zip(probabilities.chunks(config.n_classes))
        .map(|(text, probabilities)| {
            let class_id = probabilities
                .iter()
                .enumerate()
                .fold(0, |best, (index, &probability)| {
                    if probability > probabilities[best] {
                        index
                    } else {
                        best
                    }
                });

            Prediction {
                text,
                class_id,
                label: label_for(class_id),
                probabilities: probabilities.to_vec(),
            }
        })
        .collect();

    Ok(predictions)
}

/// Define inference function
pub fn infer<B: Backend>(
    device: B::Device,    // Device on which to perform computation (e.g., CPU or CUDA device)
    artifact_dir: &str,   // Directory containing model, vocabulary and config files
    samples: Vec<String>, // Text samples for inference
) -> anyhow::Result<Vec<Prediction>> {
    let (model, config, vocab) = artifacts::load::<B>(artifact_dir, &device)?;

    // Run inference on the given text samples
    log::info!("Running inference...");

    predict(&model, &config, Arc::new(vocab), samples, &device)
}
