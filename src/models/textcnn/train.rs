use burn::{
    tensor::backend::{AutodiffBackend, Backend},
    train::{ClassificationOutput, TrainOutput, TrainStep, ValidStep},
};
use rand::{rngs::StdRng, SeedableRng};

use crate::pipelines::sentiment_analysis::batcher;

use super::{Mode, Model};

/// Define training step
impl<B: AutodiffBackend> TrainStep<batcher::Train<B>, ClassificationOutput<B>> for Model<B> {
    fn step(&self, item: batcher::Train<B>) -> TrainOutput<ClassificationOutput<B>> {
        // Dropout masks are drawn from the seed stamped on the batch by the batcher
        let mut rng = StdRng::seed_from_u64(item.dropout_seed);

        // Run forward pass, calculate gradients and return them along with the output
        let output =
            self.forward_classification(item.input.tokens, item.targets, Mode::Train(&mut rng));
        let grads = output.loss.backward();

        TrainOutput::new(self, grads, output)
    }
}

/// Define validation step
impl<B: Backend> ValidStep<batcher::Train<B>, ClassificationOutput<B>> for Model<B> {
    fn step(&self, item: batcher::Train<B>) -> ClassificationOutput<B> {
        // Run forward pass and return the output
        self.forward_classification(item.input.tokens, item.targets, Mode::Eval)
    }
}
