use burn::{
    module::Module,
    tensor::{backend::Backend, Tensor},
};

/// Max-over-time pooling: the global maximum along the length axis of each channel.
///
/// Weight-free and shared by every filter in the bank.
#[derive(Module, Clone, Debug, Default)]
pub struct MaxOverTimePool {}

impl MaxOverTimePool {
    /// Create the pooling layer
    pub fn new() -> Self {
        Self {}
    }

    /// [batch, channels, length] -> [batch, channels]
    ///
    /// # Panics
    ///
    /// Panics when the length axis is empty, which the sequence length validation
    /// performed at model construction rules out.
    pub fn forward<B: Backend>(&self, input: Tensor<B, 3>) -> Tensor<B, 2> {
        let [batch_size, channels, length] = input.dims();

        assert!(length > 0, "max-over-time pooling over an empty sequence");

        input.max_dim(2).reshape([batch_size, channels])
    }
}

#[cfg(test)]
mod tests {
    use burn::{backend::NdArray, tensor::Distribution};
    use pretty_assertions::assert_eq;

    use super::*;

    type TestBackend = NdArray;

    #[test]
    fn test_takes_maximum_per_channel() {
        let device = Default::default();
        let input = Tensor::<TestBackend, 3>::from_floats(
            [
                [[1.0, 5.0, -2.0], [-3.0, -1.0, -7.0]],
                [[0.0, 0.0, 0.5], [9.0, 8.0, 7.0]],
            ],
            &device,
        );

        let output = MaxOverTimePool::new().forward(input);

        assert_eq!(output.dims(), [2, 2]);
        assert_eq!(
            output.into_data().convert::<f32>().value,
            vec![5.0, -1.0, 0.5, 9.0]
        );
    }

    #[test]
    fn test_idempotent_when_broadcast_back() {
        let device = Default::default();
        let pool = MaxOverTimePool::new();
        let input = Tensor::<TestBackend, 3>::random([3, 4, 7], Distribution::Default, &device);

        let pooled = pool.forward(input);
        let broadcast = pooled.clone().reshape([3, 4, 1]).repeat(2, 7);
        let repooled = pool.forward(broadcast);

        assert_eq!(
            repooled.into_data().convert::<f32>().value,
            pooled.into_data().convert::<f32>().value
        );
    }

    #[test]
    fn test_single_position() {
        let device = Default::default();
        let input = Tensor::<TestBackend, 3>::from_floats([[[3.0], [-4.0]]], &device);

        let output = MaxOverTimePool::new().forward(input);

        assert_eq!(output.into_data().convert::<f32>().value, vec![3.0, -4.0]);
    }

    #[test]
    #[should_panic(expected = "empty sequence")]
    fn test_rejects_empty_sequence() {
        let device = Default::default();
        let input = Tensor::<TestBackend, 3>::zeros([1, 2, 0], &device);

        MaxOverTimePool::new().forward(input);
    }
}
