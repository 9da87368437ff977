//! Command line tool for inference

use anyhow::Result;
use pico_args::Arguments;
use textcnn_burn::{
    cli::backend::{device, Backend},
    pipelines::sentiment_analysis::{self, infer},
};

const HELP: &str = "\
Usage: infer [OPTIONS] [TEXT...]

Arguments:
  TEXT                 Texts to classify (defaults to a pair of sample reviews)

Options:
  -h, --help           Print help
  -d, --data-dir       The path to the top-level data directory (defaults to 'data')
";

#[derive(Debug)]
struct Args {
    /// Prints the usage menu
    help: bool,

    /// The top-level data directory
    data_dir: Option<String>,

    /// The texts to classify
    texts: Vec<String>,
}

fn parse_args() -> Result<Args, pico_args::Error> {
    let mut pargs = Arguments::from_env();

    let help = pargs.contains(["-h", "--help"]);
    let data_dir = pargs.opt_value_from_str(["-d", "--data-dir"])?;

    let texts = pargs
        .finish()
        .into_iter()
        .map(|text| text.to_string_lossy().into_owned())
        .collect();

    Ok(Args {
        help,
        data_dir,
        texts,
    })
}

fn main() -> Result<()> {
    pretty_env_logger::init();

    let args = parse_args()?;

    if args.help {
        println!("{}", HELP);
        return Ok(());
    }

    let mut config = sentiment_analysis::training::Config::new();

    if let Some(data_dir) = args.data_dir {
        config.data_dir = data_dir;
    }

    let samples = if args.texts.is_empty() {
        vec![
            "this movie is so great".to_string(),
            "this movie is so bad".to_string(),
        ]
    } else {
        args.texts
    };

    let predictions = infer::<Backend>(device(), &config.artifact_dir(), samples)?;

    for (i, prediction) in predictions.into_iter().enumerate() {
        let probability = prediction.probabilities[prediction.class_id];

        println!(
            "\n=== Item {i} ===\
             \n- Text: {}\
             \n- Label: {} ({:.3})\
             \n================",
            prediction.text, prediction.label, probability
        );
    }

    Ok(())
}
