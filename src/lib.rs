//! # TextCNN Burn
//!
//! Convolutional sentiment classification over word embeddings
#![forbid(unsafe_code)]

/// Models
pub mod models;

/// Pipelines
pub mod pipelines;

/// Datasets
pub mod datasets;

/// Vocabulary and tokenization
pub mod vocab;

/// Pretrained word vectors
pub mod embeddings;

/// Utilities
pub mod utils;

/// CLI indexes and utilities
pub mod cli;

/// Error macros
#[macro_use]
extern crate anyhow;
