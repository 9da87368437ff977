use burn::{
    module::Module,
    nn::loss::CrossEntropyLossConfig,
    tensor::{activation::softmax, backend::Backend, ElementConversion, Int, Tensor},
    train::ClassificationOutput,
};

use super::{
    classifier::{Classifier, Mode},
    conv::ConvBank,
    embedding::EmbeddingTable,
    error::InputError,
    features,
    pooling::MaxOverTimePool,
};

/// TextCNN for text classification (such as sentiment analysis)
#[derive(Module, Debug)]
pub struct Model<B: Backend> {
    /// Embedding table updated during training
    pub embedding: EmbeddingTable<B>,

    /// Embedding table fixed at its initial values
    pub constant_embedding: EmbeddingTable<B>,

    /// Convolution filters over the concatenated embeddings
    pub convs: ConvBank<B>,

    /// Max-over-time pooling shared by every filter
    pub pool: MaxOverTimePool,

    /// Dropout and the output projection
    pub classifier: Classifier<B>,
}

/// Define model behavior
impl<B: Backend> Model<B> {
    /// Check a batch of token ids against the input contract
    pub fn validate(&self, tokens: &Tensor<B, 2, Int>) -> Result<(), InputError> {
        let [batch_size, length] = tokens.dims();

        if batch_size == 0 {
            return Err(InputError::EmptyBatch);
        }

        let kernel_width = self.convs.max_kernel_width();
        if length < kernel_width {
            return Err(InputError::SequenceTooShort {
                length,
                kernel_width,
            });
        }

        let vocab_size = self.embedding.vocab_size();
        let min = tokens.clone().min().into_scalar().elem::<i64>();
        let max = tokens.clone().max().into_scalar().elem::<i64>();

        if min < 0 {
            return Err(InputError::TokenOutOfRange { id: min, vocab_size });
        }

        if max >= vocab_size as i64 {
            return Err(InputError::TokenOutOfRange { id: max, vocab_size });
        }

        Ok(())
    }

    /// Validate the batch, then compute class logits: [batch_size, seq_len] -> [batch_size, n_classes]
    pub fn forward(
        &self,
        tokens: Tensor<B, 2, Int>,
        mode: Mode<'_>,
    ) -> Result<Tensor<B, 2>, InputError> {
        self.validate(&tokens)?;

        Ok(self.logits(tokens, mode))
    }

    /// Compute class logits for a batch already known to satisfy the input contract
    pub fn logits(&self, tokens: Tensor<B, 2, Int>, mode: Mode<'_>) -> Tensor<B, 2> {
        // [batch_size, seq_len, 2 * embedding_dim]
        let embeddings = Tensor::cat(
            vec![
                self.embedding.forward(tokens.clone()),
                self.constant_embedding.forward(tokens),
            ],
            2,
        );

        // Channels-first for the convolutions: [batch_size, 2 * embedding_dim, seq_len]
        let embeddings = embeddings.swap_dims(1, 2);

        let pooled = self
            .convs
            .forward(embeddings)
            .into_iter()
            .map(|activations| self.pool.forward(activations))
            .collect();

        let features = features::concat(pooled);

        self.classifier.forward(features, mode)
    }

    /// Defines forward pass for training and validation, with cross-entropy loss
    pub fn forward_classification(
        &self,
        tokens: Tensor<B, 2, Int>,
        targets: Tensor<B, 1, Int>,
        mode: Mode<'_>,
    ) -> ClassificationOutput<B> {
        let output = self.logits(tokens, mode);
        let targets = targets.to_device(&output.device());

        let loss = CrossEntropyLossConfig::new()
            .init(&output.device())
            .forward(output.clone(), targets.clone());

        ClassificationOutput {
            loss,
            output,
            targets,
        }
    }

    /// Defines forward pass for inference, returning class probabilities
    pub fn infer(&self, tokens: Tensor<B, 2, Int>) -> Result<Tensor<B, 2>, InputError> {
        let logits = self.forward(tokens, Mode::Eval)?;

        Ok(softmax(logits, 1))
    }
}
