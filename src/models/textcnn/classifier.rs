use burn::{
    module::Module,
    nn::Linear,
    tensor::{backend::Backend, Data, Shape, Tensor},
};
use derive_new::new;
use rand::{Rng, RngCore};

/// Whether a forward pass is training (stochastic) or evaluation (deterministic)
pub enum Mode<'a> {
    /// Apply dropout, drawing masks from the given random number generator
    Train(&'a mut dyn RngCore),

    /// Dropout is the identity
    Eval,
}

/// Dropout followed by a linear projection to class logits
#[derive(Module, Debug, new)]
pub struct Classifier<B: Backend> {
    /// Linear layer from the concatenated features to the classes
    pub output: Linear<B>,

    /// Probability of zeroing each feature during training
    pub dropout: f64,
}

impl<B: Backend> Classifier<B> {
    /// [batch, n_features] -> [batch, n_classes]
    pub fn forward(&self, features: Tensor<B, 2>, mode: Mode<'_>) -> Tensor<B, 2> {
        let features = match mode {
            Mode::Train(rng) => self.apply_dropout(features, rng),
            Mode::Eval => features,
        };

        self.output.forward(features)
    }

    /// Zero each feature with probability `dropout`, scaling the survivors by 1 / (1 - dropout)
    fn apply_dropout(&self, features: Tensor<B, 2>, rng: &mut dyn RngCore) -> Tensor<B, 2> {
        if self.dropout == 0.0 {
            return features;
        }

        let [batch_size, n_features] = features.dims();
        let scale = (1.0 / (1.0 - self.dropout)) as f32;

        let mask: Vec<f32> = (0..batch_size * n_features)
            .map(|_| {
                if rng.gen::<f64>() < self.dropout {
                    0.0
                } else {
                    scale
                }
            })
            .collect();

        let mask = Tensor::from_floats(
            Data::new(mask, Shape::new([batch_size, n_features])),
            &features.device(),
        );

        features * mask
    }
}
