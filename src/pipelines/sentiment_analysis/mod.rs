/// Batcher
pub mod batcher;

/// Sentiment Analysis Items
pub mod item;

/// Saving and loading trained models
pub mod artifacts;

/// Training
pub mod training;

/// Inference
pub mod inference;

pub use batcher::Batcher;
pub use inference::{infer, predict, Prediction};
pub use item::Item;
pub use training::train;

/// Class labels, indexed by class id
pub static LABELS: &[&str] = &["negative", "positive"];

/// The label for a class id, or the id itself when the model has more classes than labels
pub fn label_for(class_id: usize) -> String {
    LABELS
        .get(class_id)
        .map(|label| label.to_string())
        .unwrap_or_else(|| class_id.to_string())
}
