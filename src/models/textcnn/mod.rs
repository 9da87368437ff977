/// Model configuration and construction
pub mod config;

/// Configuration and input contract errors
pub mod error;

/// Trainable and frozen embedding tables
pub mod embedding;

/// The bank of 1-D convolution filters
pub mod conv;

/// Max-over-time pooling
pub mod pooling;

/// Feature concatenation
pub mod features;

/// Dropout and the output projection
pub mod classifier;

/// Uniform-length input batches
pub mod batch;

/// The composed TextCNN
pub mod model;

/// Training and validation steps
pub mod train;

pub use batch::InputBatch;
pub use classifier::{Classifier, Mode};
pub use config::{Config, FilterConfig};
pub use conv::ConvBank;
pub use embedding::EmbeddingTable;
pub use error::{ConfigError, Error, InputError};
pub use model::{Model, ModelRecord};
pub use pooling::MaxOverTimePool;
