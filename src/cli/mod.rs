/// CLI indexes: datasets
pub mod datasets;

/// CLI indexes: pipelines
pub mod pipelines;

/// The backend the command line tools run on
pub mod backend;
