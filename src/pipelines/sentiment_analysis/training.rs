use std::sync::Arc;

use burn::{
    config::Config as _,
    data::{dataloader::DataLoaderBuilder, dataset::Dataset},
    optim::AdamConfig,
    record::CompactRecorder,
    tensor::backend::AutodiffBackend,
    train::{
        metric::{AccuracyMetric, LearningRateMetric, LossMetric},
        LearnerBuilder,
    },
    LearningRate,
};

use crate::{
    embeddings::{embedding_weights, Glove},
    models::textcnn::{self, FilterConfig},
    vocab::{tokenize, Vocabulary, PAD},
};

use super::{artifacts, Batcher, Item, LABELS};

/// Define configuration struct for the experiment
#[derive(burn::config::Config)]
pub struct Config {
    /// Batch size
    #[config(default = 64)]
    pub batch_size: usize,

    /// Number of epochs
    #[config(default = 5)]
    pub num_epochs: usize,

    /// Initial learning rate
    #[config(default = 1e-3)]
    pub learning_rate: LearningRate,

    /// Seed for parameter initialization, shuffling, and dropout
    #[config(default = 42)]
    pub seed: u64,

    /// Minimum number of occurrences for a word to enter the vocabulary
    #[config(default = 5)]
    pub min_freq: usize,

    /// Length every review is truncated or padded to
    #[config(default = 500)]
    pub seq_len: usize,

    /// Size of each embedding vector
    #[config(default = 100)]
    pub embedding_dim: usize,

    /// Convolution filters, in concatenation order
    #[config(default = "FilterConfig::defaults()")]
    pub filters: Vec<FilterConfig>,

    /// Dropout rate
    #[config(default = 0.5)]
    pub dropout: f64,

    /// The location of the top-level data directory
    #[config(default = "\"data\".to_string()")]
    pub data_dir: String,

    /// Pretrained vectors in GloVe text format, used to seed both embedding tables
    pub glove_path: Option<String>,

    /// Number of data loading workers, defaulting to the available parallelism
    pub num_workers: Option<usize>,
}

impl Config {
    /// The directory trained models and checkpoints are written to
    pub fn artifact_dir(&self) -> String {
        format!("{}/sentiment-analysis/textcnn", self.data_dir)
    }

    /// The model configuration for a vocabulary of the given size
    pub fn model_config(&self, vocab_size: usize) -> textcnn::Config {
        textcnn::Config::new(vocab_size)
            .with_embedding_dim(self.embedding_dim)
            .with_seq_len(self.seq_len)
            .with_filters(self.filters.clone())
            .with_n_classes(LABELS.len())
            .with_dropout(self.dropout)
    }
}

/// Define train function
pub async fn train<B, I, D>(
    devices: Vec<B::Device>, // Device on which to perform computation (e.g., CPU or CUDA device)
    dataset_train: D,        // Training dataset
    dataset_test: D,         // Testing dataset
    config: Config,          // Experiment configuration
) -> anyhow::Result<()>
where
    B: AutodiffBackend,
    I: Item + 'static,
    D: Dataset<I> + 'static,
{
    let device = devices
        .first()
        .ok_or_else(|| anyhow!("At least one device is required"))?
        .clone();
    let artifact_dir = config.artifact_dir();

    B::seed(config.seed);

    log::info!("Building vocabulary from {} reviews...", dataset_train.len());

    let corpus: Vec<Vec<String>> = dataset_train
        .iter()
        .map(|item| tokenize(item.input()))
        .collect();
    let vocab = Vocabulary::build(&corpus, config.min_freq, &[PAD]);

    log::info!("Vocabulary has {} tokens", vocab.len());

    let model_config = config.model_config(vocab.len());

    let model = match &config.glove_path {
        Some(path) => {
            let glove = Glove::load(path).await?;
            let weights = embedding_weights::<B, _>(&glove, &vocab, &device);

            model_config.init_with_embeddings(weights)?
        }
        None => model_config.init::<B>(&device)?,
    };

    let vocab = Arc::new(vocab);

    // Initialize batchers for training and testing data
    let batcher_train =
        Batcher::<B>::new(vocab.clone(), config.seq_len, config.seed, device.clone());
    let batcher_test =
        Batcher::<B::InnerBackend>::new(vocab.clone(), config.seq_len, config.seed, device.clone());

    let workers = match config.num_workers {
        Some(workers) => workers,
        None => std::thread::available_parallelism()?.into(),
    };

    // Initialize data loaders for training and testing data
    let dataloader_train = DataLoaderBuilder::new(batcher_train)
        .batch_size(config.batch_size)
        .shuffle(config.seed)
        .num_workers(workers)
        .build(dataset_train);

    let dataloader_test = DataLoaderBuilder::new(batcher_test)
        .batch_size(config.batch_size)
        .num_workers(workers)
        .build(dataset_test);

    // Initialize optimizer
    let optimizer = AdamConfig::new().init();

    // Initialize learner
    let learner = LearnerBuilder::new(&artifact_dir)
        .metric_train_numeric(AccuracyMetric::new())
        .metric_valid_numeric(AccuracyMetric::new())
        .metric_train_numeric(LossMetric::new())
        .metric_valid_numeric(LossMetric::new())
        .metric_train_numeric(LearningRateMetric::new())
        .with_file_checkpointer(CompactRecorder::new())
        .devices(devices)
        .num_epochs(config.num_epochs)
        .summary()
        .build(model, optimizer, config.learning_rate);

    // Train the model
    let model_trained = learner.fit(dataloader_train, dataloader_test);

    // Save the configuration, vocabulary, and the trained model
    artifacts::save::<B>(&artifact_dir, &model_config, &vocab, model_trained)?;

    config
        .save(format!("{artifact_dir}/training.json"))
        .map_err(|e| anyhow!("Unable to save training config: {}", e))?;

    Ok(())
}
