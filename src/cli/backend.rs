//! Backend selection: NdArray on the CPU by default, LibTorch on CUDA with the `tch` feature

#[cfg(feature = "tch")]
mod selected {
    use burn::backend::{libtorch::LibTorchDevice, Autodiff, LibTorch};

    /// The inference backend
    pub type Backend = LibTorch;

    /// The training backend
    pub type TrainingBackend = Autodiff<LibTorch>;

    /// The device computations run on
    pub fn device() -> LibTorchDevice {
        LibTorchDevice::Cuda(0)
    }
}

#[cfg(not(feature = "tch"))]
mod selected {
    use burn::backend::{ndarray::NdArrayDevice, Autodiff, NdArray};

    /// The inference backend
    pub type Backend = NdArray;

    /// The training backend
    pub type TrainingBackend = Autodiff<NdArray>;

    /// The device computations run on
    pub fn device() -> NdArrayDevice {
        NdArrayDevice::Cpu
    }
}

pub use selected::{device, Backend, TrainingBackend};
