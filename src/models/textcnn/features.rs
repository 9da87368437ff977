use burn::tensor::{backend::Backend, Tensor};

/// Concatenate pooled features along the channel axis, preserving filter order:
/// [batch, channels_k] for each filter -> [batch, sum(channels_k)]
pub fn concat<B: Backend>(pooled: Vec<Tensor<B, 2>>) -> Tensor<B, 2> {
    assert!(!pooled.is_empty(), "no pooled features to concatenate");

    Tensor::cat(pooled, 1)
}
