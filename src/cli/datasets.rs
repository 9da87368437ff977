use std::{fmt::Display, path::PathBuf};

use crate::datasets::imdb;

/// Datasets the command line tools can train on
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Dataset {
    /// IMDb movie reviews
    Imdb,
}

impl Dataset {
    /// Where the dataset is expected within the data directory
    pub fn location(&self, data_dir: &str) -> PathBuf {
        match self {
            Dataset::Imdb => imdb::archive_dir(data_dir),
        }
    }

    /// Fail with download instructions when the dataset has not been extracted yet
    pub fn ensure_present(&self, data_dir: &str) -> Result<(), DatasetError> {
        let location = self.location(data_dir);

        if location.is_dir() {
            return Ok(());
        }

        let url = match self {
            Dataset::Imdb => imdb::DOWNLOAD_URL,
        };

        Err(DatasetError::Missing {
            dataset: self.to_string(),
            location,
            url: url.to_string(),
        })
    }
}

impl TryFrom<&str> for Dataset {
    type Error = DatasetError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            name if name == imdb::DATASET => Ok(Dataset::Imdb),
            _ => Err(DatasetError::Unknown(value.to_string())),
        }
    }
}

impl Display for Dataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dataset::Imdb => write!(f, "{}", imdb::DATASET),
        }
    }
}

/// Dataset Error
#[derive(thiserror::Error, Debug)]
pub enum DatasetError {
    /// No dataset found for the given string
    #[error("no dataset found for {0}")]
    Unknown(String),

    /// The dataset has not been downloaded and extracted
    #[error("the {dataset} dataset was not found at {location:?}; extract {url} there")]
    Missing {
        /// Dataset name
        dataset: String,

        /// Expected directory
        location: PathBuf,

        /// Archive to download
        url: String,
    },
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_parse_and_locate() {
        let dataset = Dataset::try_from("IMDb").unwrap();

        assert_eq!(dataset, Dataset::Imdb);
        assert_eq!(dataset.to_string(), "imdb");
        assert_eq!(
            dataset.location("data"),
            PathBuf::from("data/datasets/aclImdb")
        );
        assert!(Dataset::try_from("snli").is_err());
    }

    #[test]
    fn test_missing_archive() {
        let error = Dataset::Imdb
            .ensure_present("/nonexistent/textcnn")
            .unwrap_err();

        assert!(matches!(error, DatasetError::Missing { .. }));
        assert!(error.to_string().contains("aclImdb_v1.tar.gz"));
    }
}
