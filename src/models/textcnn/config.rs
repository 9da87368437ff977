use burn::{
    config::Config as _,
    nn::LinearConfig,
    tensor::{backend::Backend, Distribution, Tensor},
};
use derive_new::new;
use serde::{Deserialize, Serialize};

use super::{
    classifier::Classifier, conv::ConvBank, embedding::EmbeddingTable, error::ConfigError,
    pooling::MaxOverTimePool, Model,
};

/// One convolution filter in the bank: a kernel width and its number of output channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, new)]
pub struct FilterConfig {
    /// Number of consecutive positions the kernel spans (the n-gram size)
    pub kernel_width: usize,

    /// Number of output channels (feature maps) produced by the kernel
    pub channels: usize,
}

impl FilterConfig {
    /// Kernel widths 3, 4 and 5 with 100 channels each
    pub fn defaults() -> Vec<FilterConfig> {
        vec![
            FilterConfig::new(3, 100),
            FilterConfig::new(4, 100),
            FilterConfig::new(5, 100),
        ]
    }
}

/// The TextCNN Model Configuration
#[derive(burn::config::Config, Debug)]
pub struct Config {
    /// Number of tokens in the vocabulary
    pub vocab_size: usize,

    /// Size of each embedding vector, per table
    #[config(default = 100)]
    pub embedding_dim: usize,

    /// Length every input sequence is truncated or padded to
    #[config(default = 500)]
    pub seq_len: usize,

    /// Convolution filters, in the order their pooled features are concatenated
    #[config(default = "FilterConfig::defaults()")]
    pub filters: Vec<FilterConfig>,

    /// Number of output classes
    #[config(default = 2)]
    pub n_classes: usize,

    /// Dropout probability applied to the pooled features during training
    #[config(default = 0.5)]
    pub dropout: f64,

    /// Log a warning when any pre-activation magnitude exceeds this value
    pub activation_warning_threshold: Option<f64>,
}

impl Config {
    /// Check the configuration before any parameters are allocated
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.vocab_size == 0 {
            return Err(ConfigError::EmptyVocabulary);
        }

        if self.embedding_dim == 0 {
            return Err(ConfigError::ZeroEmbeddingDim);
        }

        if self.filters.is_empty() {
            return Err(ConfigError::NoFilters);
        }

        for (index, filter) in self.filters.iter().enumerate() {
            if filter.kernel_width == 0 {
                return Err(ConfigError::ZeroKernelWidth { index });
            }

            if filter.channels == 0 {
                return Err(ConfigError::ZeroChannels { index });
            }
        }

        let kernel_width = self.max_kernel_width();
        if self.seq_len < kernel_width {
            return Err(ConfigError::SequenceTooShort {
                seq_len: self.seq_len,
                kernel_width,
            });
        }

        if self.n_classes == 0 {
            return Err(ConfigError::NoClasses);
        }

        if !(0.0..1.0).contains(&self.dropout) {
            return Err(ConfigError::InvalidDropout(self.dropout));
        }

        Ok(())
    }

    /// The widest configured kernel
    pub fn max_kernel_width(&self) -> usize {
        self.filters
            .iter()
            .map(|filter| filter.kernel_width)
            .max()
            .unwrap_or(0)
    }

    /// Length of the concatenated feature vector fed to the classifier
    pub fn n_features(&self) -> usize {
        self.filters.iter().map(|filter| filter.channels).sum()
    }

    /// Initialize a model with random embeddings, shared by both tables
    pub fn init<B: Backend>(&self, device: &B::Device) -> Result<Model<B>, ConfigError> {
        self.validate()?;

        let weights = Tensor::random(
            [self.vocab_size, self.embedding_dim],
            Distribution::Normal(0.0, 1.0),
            device,
        );

        self.init_with_tables(weights.clone(), weights)
    }

    /// Initialize a model with both tables seeded from the same pretrained vectors
    pub fn init_with_embeddings<B: Backend>(
        &self,
        weights: Tensor<B, 2>,
    ) -> Result<Model<B>, ConfigError> {
        self.init_with_tables(weights.clone(), weights)
    }

    /// Initialize a model from explicit trainable and frozen embedding matrices
    pub fn init_with_tables<B: Backend>(
        &self,
        trainable: Tensor<B, 2>,
        frozen: Tensor<B, 2>,
    ) -> Result<Model<B>, ConfigError> {
        self.validate()?;

        let expected = [self.vocab_size, self.embedding_dim];
        let trainable_dims = trainable.dims();
        let frozen_dims = frozen.dims();

        if trainable_dims != frozen_dims {
            return Err(ConfigError::TableMismatch {
                trainable: trainable_dims,
                frozen: frozen_dims,
            });
        }

        if trainable_dims != expected {
            return Err(ConfigError::EmbeddingShape {
                expected,
                found: trainable_dims,
            });
        }

        let device = trainable.device();

        let convs = ConvBank::init(
            2 * self.embedding_dim,
            &self.filters,
            self.activation_warning_threshold,
            &device,
        );

        let output = LinearConfig::new(self.n_features(), self.n_classes).init(&device);

        log::debug!(
            "Initialized TextCNN: {} filters, {} features, {} classes",
            self.filters.len(),
            self.n_features(),
            self.n_classes
        );

        Ok(Model {
            embedding: EmbeddingTable::trainable(trainable),
            constant_embedding: EmbeddingTable::frozen(frozen),
            convs,
            pool: MaxOverTimePool::new(),
            classifier: Classifier::new(output, self.dropout),
        })
    }

    /// Load a configuration saved next to trained weights
    pub fn load_file(path: &str) -> anyhow::Result<Self> {
        Self::load(path).map_err(|e| anyhow!("Unable to load config file {}: {}", path, e))
    }
}

#[cfg(test)]
mod tests {
    use burn::backend::NdArray;
    use pretty_assertions::assert_eq;

    use super::*;

    type TestBackend = NdArray;

    fn config() -> Config {
        Config::new(10)
            .with_embedding_dim(4)
            .with_seq_len(6)
            .with_filters(vec![FilterConfig::new(2, 3), FilterConfig::new(4, 5)])
    }

    #[test]
    fn test_defaults() {
        let config = Config::new(100);

        assert_eq!(config.embedding_dim, 100);
        assert_eq!(config.seq_len, 500);
        assert_eq!(config.filters, FilterConfig::defaults());
        assert_eq!(config.n_classes, 2);
        assert_eq!(config.dropout, 0.5);
        assert_eq!(config.n_features(), 300);
        assert_eq!(config.max_kernel_width(), 5);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_rejects_empty_dimensions() {
        let mut empty_vocabulary = config();
        empty_vocabulary.vocab_size = 0;

        assert_eq!(
            empty_vocabulary.validate(),
            Err(ConfigError::EmptyVocabulary)
        );
        assert_eq!(
            config().with_embedding_dim(0).validate(),
            Err(ConfigError::ZeroEmbeddingDim)
        );
        assert_eq!(
            config().with_n_classes(0).validate(),
            Err(ConfigError::NoClasses)
        );
        assert!(Config::new(0).init::<TestBackend>(&Default::default()).is_err());
    }

    #[test]
    fn test_rejects_empty_filters() {
        let config = config().with_filters(vec![]);

        assert_eq!(config.validate(), Err(ConfigError::NoFilters));
    }

    #[test]
    fn test_rejects_degenerate_filters() {
        let zero_width = config().with_filters(vec![FilterConfig::new(2, 3), FilterConfig::new(0, 3)]);
        let zero_channels = config().with_filters(vec![FilterConfig::new(2, 0)]);

        assert_eq!(
            zero_width.validate(),
            Err(ConfigError::ZeroKernelWidth { index: 1 })
        );
        assert_eq!(
            zero_channels.validate(),
            Err(ConfigError::ZeroChannels { index: 0 })
        );
    }

    #[test]
    fn test_sequence_length_boundary() {
        assert_eq!(config().with_seq_len(4).validate(), Ok(()));
        assert_eq!(
            config().with_seq_len(3).validate(),
            Err(ConfigError::SequenceTooShort {
                seq_len: 3,
                kernel_width: 4
            })
        );
    }

    #[test]
    fn test_rejects_invalid_dropout() {
        assert_eq!(
            config().with_dropout(1.0).validate(),
            Err(ConfigError::InvalidDropout(1.0))
        );
        assert_eq!(config().with_dropout(0.0).validate(), Ok(()));
    }

    #[test]
    fn test_rejects_mismatched_tables() {
        let device = Default::default();
        let trainable = Tensor::<TestBackend, 2>::zeros([10, 4], &device);
        let frozen = Tensor::<TestBackend, 2>::zeros([10, 3], &device);

        let result = config().init_with_tables(trainable, frozen);

        assert_eq!(
            result.err(),
            Some(ConfigError::TableMismatch {
                trainable: [10, 4],
                frozen: [10, 3]
            })
        );
    }

    #[test]
    fn test_rejects_wrong_embedding_shape() {
        let device = Default::default();
        let weights = Tensor::<TestBackend, 2>::zeros([9, 4], &device);

        let result = config().init_with_embeddings(weights);

        assert_eq!(
            result.err(),
            Some(ConfigError::EmbeddingShape {
                expected: [10, 4],
                found: [9, 4]
            })
        );
    }

    #[test]
    fn test_init_shapes() {
        let device = Default::default();
        let model = config().init::<TestBackend>(&device).unwrap();

        assert_eq!(model.embedding.dims(), [10, 4]);
        assert_eq!(model.constant_embedding.dims(), [10, 4]);
        assert!(model.embedding.is_trainable());
        assert!(!model.constant_embedding.is_trainable());
        assert_eq!(model.convs.filters(), config().filters);
        assert_eq!(model.convs.channels_in(), 8);
        assert_eq!(model.classifier.output.weight.val().dims(), [8, 2]);
    }

    #[test]
    fn test_tables_start_identical() {
        let device = Default::default();
        let model = config().init::<TestBackend>(&device).unwrap();

        let trainable = model.embedding.weight.val().into_data().convert::<f32>().value;
        let frozen = model.constant_embedding.weight.val().into_data().convert::<f32>().value;

        assert_eq!(trainable, frozen);
    }
}
