use std::path::Path;

use burn::{
    config::Config as _,
    module::Module,
    record::{FullPrecisionSettings, NamedMpkFileRecorder, Recorder},
    tensor::backend::Backend,
};

use crate::{
    models::textcnn::{self, Model},
    vocab::Vocabulary,
};

/// Full-precision recorder, so reloaded weights reproduce the saved logits exactly
pub type ModelRecorder = NamedMpkFileRecorder<FullPrecisionSettings>;

/// The model configuration file within an artifact directory
pub static CONFIG_FILE: &str = "config.json";

/// The vocabulary file within an artifact directory
pub static VOCAB_FILE: &str = "vocab.json";

/// The weights file within an artifact directory, without the recorder's extension
pub static MODEL_FILE: &str = "model";

/// Save the configuration, vocabulary, and weights of a trained model
pub fn save<B: Backend>(
    artifact_dir: &str,
    config: &textcnn::Config,
    vocab: &Vocabulary,
    model: Model<B>,
) -> anyhow::Result<()> {
    let dir = Path::new(artifact_dir);

    std::fs::create_dir_all(dir)
        .map_err(|e| anyhow!("Unable to create artifact directory {}: {}", artifact_dir, e))?;

    config
        .save(dir.join(CONFIG_FILE))
        .map_err(|e| anyhow!("Unable to save config file: {}", e))?;

    vocab.save(dir.join(VOCAB_FILE))?;

    ModelRecorder::new()
        .record(model.into_record(), dir.join(MODEL_FILE))
        .map_err(|e| anyhow!("Unable to save model weights: {}", e))?;

    log::info!("Saved model artifacts to {}", artifact_dir);

    Ok(())
}

/// Load a model saved with [`save`], along with its configuration and vocabulary
pub fn load<B: Backend>(
    artifact_dir: &str,
    device: &B::Device,
) -> anyhow::Result<(Model<B>, textcnn::Config, Vocabulary)> {
    let dir = Path::new(artifact_dir);

    // Load experiment configuration
    let config = textcnn::Config::load(dir.join(CONFIG_FILE))
        .map_err(|e| anyhow!("Unable to load config file: {}", e))?;

    let vocab = Vocabulary::load(dir.join(VOCAB_FILE))?;

    if vocab.len() != config.vocab_size {
        return Err(anyhow!(
            "Vocabulary has {} tokens but the model was configured for {}",
            vocab.len(),
            config.vocab_size
        ));
    }

    // Load pre-trained model weights
    log::info!("Loading weights...");

    let record = ModelRecorder::new()
        .load(dir.join(MODEL_FILE), device)
        .map_err(|e| anyhow!("Unable to load trained model weights: {}", e))?;

    // Create model using loaded weights
    let model = config.init::<B>(device)?.load_record(record);

    Ok((model, config, vocab))
}
