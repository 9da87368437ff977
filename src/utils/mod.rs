/// Async file reading and directory listing
pub mod files;

/// Tensor Utilities
pub mod tensors;
