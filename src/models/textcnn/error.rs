/// Model configuration errors, raised before any parameters are allocated
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// No convolution filters were configured
    #[error("at least one convolution filter must be configured")]
    NoFilters,

    /// A filter was configured with a zero kernel width
    #[error("filter {index} has a kernel width of zero")]
    ZeroKernelWidth {
        /// Position of the filter in the configured order
        index: usize,
    },

    /// A filter was configured with zero output channels
    #[error("filter {index} has zero output channels")]
    ZeroChannels {
        /// Position of the filter in the configured order
        index: usize,
    },

    /// The sequence length cannot fit the widest kernel
    #[error("sequence length {seq_len} is shorter than the widest kernel ({kernel_width})")]
    SequenceTooShort {
        /// The configured sequence length
        seq_len: usize,
        /// The largest configured kernel width
        kernel_width: usize,
    },

    /// The vocabulary is empty
    #[error("vocabulary size must be greater than zero")]
    EmptyVocabulary,

    /// The embedding dimension is zero
    #[error("embedding dimension must be greater than zero")]
    ZeroEmbeddingDim,

    /// No output classes
    #[error("at least one output class is required")]
    NoClasses,

    /// Dropout probability must be in [0, 1)
    #[error("dropout probability {0} is outside of [0, 1)")]
    InvalidDropout(f64),

    /// A pretrained embedding matrix does not match the configured table shape
    #[error("embedding matrix has shape {found:?}, expected {expected:?}")]
    EmbeddingShape {
        /// [vocab_size, embedding_dim] from the model config
        expected: [usize; 2],
        /// The shape that was provided
        found: [usize; 2],
    },

    /// The trainable and frozen tables disagree on their dimensions
    #[error("trainable embedding table is {trainable:?} but the frozen table is {frozen:?}")]
    TableMismatch {
        /// Shape of the trainable table
        trainable: [usize; 2],
        /// Shape of the frozen table
        frozen: [usize; 2],
    },
}

/// Violations of the input contract for a forward pass
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    /// A batch with no sequences
    #[error("the batch is empty")]
    EmptyBatch,

    /// A token id outside of [0, vocab_size)
    #[error("token id {id} is outside of the vocabulary (size {vocab_size})")]
    TokenOutOfRange {
        /// The offending id
        id: i64,
        /// The size of the vocabulary
        vocab_size: usize,
    },

    /// Sequences in one batch have different lengths
    #[error("sequence {index} has length {found}, expected {expected}")]
    NonUniformLength {
        /// Position of the sequence in the batch
        index: usize,
        /// Length of the first sequence
        expected: usize,
        /// Length of the offending sequence
        found: usize,
    },

    /// The batch sequences are shorter than the widest kernel
    #[error("sequence length {length} is shorter than the widest kernel ({kernel_width})")]
    SequenceTooShort {
        /// Length of the batch sequences
        length: usize,
        /// The largest configured kernel width
        kernel_width: usize,
    },

    /// The number of labels does not match the number of sequences
    #[error("batch has {sequences} sequences but {labels} labels")]
    LabelCount {
        /// Number of sequences
        sequences: usize,
        /// Number of labels
        labels: usize,
    },

    /// A label outside of [0, n_classes)
    #[error("label {label} is outside of the {n_classes} configured classes")]
    LabelOutOfRange {
        /// The offending label
        label: usize,
        /// Number of classes
        n_classes: usize,
    },
}

/// TextCNN errors
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Invalid model configuration
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Invalid input batch
    #[error("input contract error: {0}")]
    Input(#[from] InputError),
}
