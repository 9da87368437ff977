use std::path::{Path, PathBuf};

use async_trait::async_trait;
use burn::data::dataset::{self, InMemDataset};
use derive_new::new;
use serde::{Deserialize, Serialize};
use tokio::io;

use crate::{pipelines::sentiment_analysis, utils::files};

use super::LoadableDataset;

/// The name of the IMDb dataset
pub static DATASET: &str = "imdb";

/// The directory the review archive extracts to, under `{data_dir}/datasets`
pub static ARCHIVE: &str = "aclImdb";

/// Where the archive can be downloaded from
pub static DOWNLOAD_URL: &str =
    "https://ai.stanford.edu/~amaas/data/sentiment/aclImdb_v1.tar.gz";

/// Review folders and their class ids
static SENTIMENT_FOLDERS: [(&str, usize); 2] = [("pos", 1), ("neg", 0)];

/// A movie review and its sentiment
#[derive(Clone, Debug, Serialize, Deserialize, new)]
pub struct Item {
    /// The review text
    pub input: String,

    /// 1 for a positive review, 0 for a negative one
    pub label: usize,
}

impl sentiment_analysis::Item for Item {
    fn input(&self) -> &str {
        &self.input
    }

    fn class_id(&self) -> usize {
        self.label
    }
}

/// Struct for the IMDb dataset, read from the extracted `aclImdb` archive
pub struct Dataset {
    /// Underlying In-Memory dataset
    dataset: InMemDataset<Item>,
}

/// Implement the Dataset trait for the IMDb dataset
impl dataset::Dataset<Item> for Dataset {
    /// Returns a specific item from the dataset
    fn get(&self, index: usize) -> Option<Item> {
        self.dataset.get(index)
    }

    /// Returns the length of the dataset
    fn len(&self) -> usize {
        self.dataset.len()
    }
}

#[async_trait]
impl LoadableDataset<Item> for Dataset {
    async fn load(data_dir: &str, mode: &str) -> io::Result<Self> {
        Dataset::load(data_dir, mode).await
    }
}

// Implement methods for constructing the IMDb dataset
impl Dataset {
    /// Constructs the dataset for a mode (either "train" or "test") from
    /// `{data_dir}/datasets/aclImdb/{mode}/{pos,neg}/*.txt`
    pub async fn load(data_dir: &str, mode: &str) -> io::Result<Self> {
        let mode_dir = archive_dir(data_dir).join(mode);

        let mut items = Vec::new();

        for (folder, label) in SENTIMENT_FOLDERS {
            for path in files::list_files(mode_dir.join(folder), "txt").await? {
                let review = files::read_joined(&path).await?;

                items.push(Item::new(review, label));
            }
        }

        log::info!("Loaded {} {} reviews from {:?}", items.len(), mode, mode_dir);

        Ok(Self::from_items(items))
    }

    /// Constructs the dataset from items already in memory
    pub fn from_items(items: Vec<Item>) -> Self {
        Self {
            dataset: InMemDataset::new(items),
        }
    }
}

/// The extracted archive within a data directory
pub fn archive_dir(data_dir: &str) -> PathBuf {
    Path::new(data_dir).join("datasets").join(ARCHIVE)
}
