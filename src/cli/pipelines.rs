use std::fmt::Display;

/// The unique string token that identifies the sentiment analysis pipeline
pub static SENTIMENT_ANALYSIS: &str = "sentiment-analysis";

/// Available Pipelines
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Pipeline {
    /// Sentiment Analysis
    SentimentAnalysis,
}

impl TryFrom<&str> for Pipeline {
    type Error = PipelineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        if value == SENTIMENT_ANALYSIS {
            Ok(Pipeline::SentimentAnalysis)
        } else {
            Err(PipelineError::Unknown(value.to_string()))
        }
    }
}

impl Display for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Pipeline::SentimentAnalysis => SENTIMENT_ANALYSIS,
        };

        write!(f, "{}", name)
    }
}

/// Pipeline Error
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    /// No pipeline found for the given string
    #[error("no pipeline found for {0}")]
    Unknown(String),
}
