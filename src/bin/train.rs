//! Command line tool to trigger training

use anyhow::anyhow;
use pico_args::Arguments;
use textcnn_burn::{
    cli::{
        backend::{device, TrainingBackend},
        datasets::Dataset,
        pipelines::Pipeline,
    },
    datasets::imdb,
    pipelines::sentiment_analysis,
};

const HELP: &str = "\
Usage: train PIPELINE DATASET [OPTIONS]

Arguments:
  PIPELINE             The pipeline to use (e.g., 'sentiment-analysis')
  DATASET              The dataset to use (e.g., 'imdb')

Options:
  -h, --help           Print help
  -d, --data-dir       The path to the top-level data directory (defaults to 'data')
  -n, --num-epochs     Number of epochs to train for
  -b, --batch-size     Batch size
  -g, --glove          Pretrained word vectors in GloVe text format
  -s, --seed           Seed for initialization, shuffling and dropout
";

#[derive(Debug)]
struct Args {
    pipeline: String,
    dataset: String,
    num_epochs: Option<usize>,
    batch_size: Option<usize>,
    data_dir: Option<String>,
    glove_path: Option<String>,
    seed: Option<u64>,
}

impl Args {
    fn parse() -> anyhow::Result<Option<Self>> {
        let mut pargs = Arguments::from_env();

        // Help has a higher priority and should be handled separately.
        if pargs.contains(["-h", "--help"]) {
            return Ok(None);
        }

        let args = Args {
            num_epochs: pargs.opt_value_from_str(["-n", "--num-epochs"])?,
            batch_size: pargs.opt_value_from_str(["-b", "--batch-size"])?,
            data_dir: pargs.opt_value_from_str(["-d", "--data-dir"])?,
            glove_path: pargs.opt_value_from_str(["-g", "--glove"])?,
            seed: pargs.opt_value_from_str(["-s", "--seed"])?,
            pipeline: pargs.free_from_str().map_err(|e| match e {
                pico_args::Error::MissingArgument => anyhow!("Missing required argument: PIPELINE"),
                _ => anyhow!("{}", e),
            })?,
            dataset: pargs.free_from_str().map_err(|e| match e {
                pico_args::Error::MissingArgument => anyhow!("Missing required argument: DATASET"),
                _ => anyhow!("{}", e),
            })?,
        };

        Ok(Some(args))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let Some(args) = Args::parse()? else {
        print!("{}", HELP);

        return Ok(());
    };

    let pipeline = Pipeline::try_from(args.pipeline.as_str())?;
    let dataset = Dataset::try_from(args.dataset.as_str())?;

    match pipeline {
        Pipeline::SentimentAnalysis => handle_sentiment_analysis(&dataset, &args).await,
    }
}

async fn handle_sentiment_analysis(dataset: &Dataset, args: &Args) -> anyhow::Result<()> {
    let mut config = sentiment_analysis::training::Config::new();

    if let Some(num_epochs) = args.num_epochs {
        config.num_epochs = num_epochs;
    }

    if let Some(batch_size) = args.batch_size {
        config.batch_size = batch_size;
    }

    if let Some(data_dir) = &args.data_dir {
        config.data_dir = data_dir.to_string();
    }

    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    config.glove_path = args.glove_path.clone();

    dataset.ensure_present(&config.data_dir)?;

    match dataset {
        Dataset::Imdb => {
            let train = imdb::Dataset::load(&config.data_dir, "train").await?;
            let test = imdb::Dataset::load(&config.data_dir, "test").await?;

            sentiment_analysis::train::<TrainingBackend, imdb::Item, imdb::Dataset>(
                vec![device()],
                train,
                test,
                config,
            )
            .await?;
        }
    }

    Ok(())
}
