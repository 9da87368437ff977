use burn::{
    module::Module,
    nn::conv::{Conv1d, Conv1dConfig},
    tensor::{activation::relu, backend::Backend, ElementConversion, Tensor},
};

use super::config::FilterConfig;

/// A bank of independent 1-D convolutions of different widths over the same input.
///
/// Each kernel is a valid (unpadded) cross-correlation with stride 1 followed by a
/// ReLU, so a filter of width `w` turns a sequence of length `L` into `L - w + 1`
/// positions. Filters are kept in configured order.
#[derive(Module, Debug)]
pub struct ConvBank<B: Backend> {
    /// One convolution per configured filter
    pub convs: Vec<Conv1d<B>>,

    /// Log a warning when any pre-activation magnitude exceeds this value
    pub warning_threshold: Option<f64>,
}

impl<B: Backend> ConvBank<B> {
    /// Initialize one convolution per filter, reading `channels_in` input channels
    pub fn init(
        channels_in: usize,
        filters: &[FilterConfig],
        warning_threshold: Option<f64>,
        device: &B::Device,
    ) -> Self {
        let convs = filters
            .iter()
            .map(|filter| {
                Conv1dConfig::new(channels_in, filter.channels, filter.kernel_width)
                    .with_bias(true)
                    .init(device)
            })
            .collect();

        Self {
            convs,
            warning_threshold,
        }
    }

    /// The (kernel_width, channels) pairs, in order
    pub fn filters(&self) -> Vec<FilterConfig> {
        self.convs
            .iter()
            .map(|conv| {
                let [channels, _channels_in, kernel_width] = conv.weight.val().dims();

                FilterConfig::new(kernel_width, channels)
            })
            .collect()
    }

    /// Number of input channels every kernel reads
    pub fn channels_in(&self) -> usize {
        self.convs
            .first()
            .map(|conv| conv.weight.val().dims()[1])
            .unwrap_or(0)
    }

    /// The widest kernel in the bank
    pub fn max_kernel_width(&self) -> usize {
        self.filters()
            .iter()
            .map(|filter| filter.kernel_width)
            .max()
            .unwrap_or(0)
    }

    /// Apply every kernel: [batch, channels_in, length] -> one [batch, channels_k, length - width_k + 1] per filter
    pub fn forward(&self, input: Tensor<B, 3>) -> Vec<Tensor<B, 3>> {
        self.convs
            .iter()
            .enumerate()
            .map(|(index, conv)| {
                let activations = conv.forward(input.clone());

                if let Some(threshold) = self.warning_threshold {
                    warn_if_unstable(index, &activations, threshold);
                }

                relu(activations)
            })
            .collect()
    }
}

fn warn_if_unstable<B: Backend>(index: usize, activations: &Tensor<B, 3>, threshold: f64) {
    if !log::log_enabled!(log::Level::Warn) {
        return;
    }

    if let Some(peak) = unstable_peak(activations, threshold) {
        log::warn!(
            "Filter {} produced a pre-activation magnitude of {} (threshold {})",
            index,
            peak,
            threshold
        );
    }
}

/// The largest pre-activation magnitude, when it is non-finite or above `threshold`
fn unstable_peak<B: Backend>(activations: &Tensor<B, 3>, threshold: f64) -> Option<f64> {
    let peak = activations
        .clone()
        .abs()
        .max()
        .into_scalar()
        .elem::<f64>();

    (!peak.is_finite() || peak > threshold).then_some(peak)
}
