/// Sentiment Analysis
pub mod sentiment_analysis;
