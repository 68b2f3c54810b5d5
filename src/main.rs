use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::filter::LevelFilter;

use bigramentropy::*;
use bigramentropy::experiment::ReportFormatter;
use bigramentropy::io::{PrettyFormatter, RowFormat};

/// Fits a bigram entropy model to training items and correlates its scores with judged test items
#[derive( Parser, Debug )]
#[command( name = "predictor", version )]
struct Args {
    /// Delimited file with a header row holding the judged test items
    #[arg( long )]
    judgments: String,

    /// Training items, one per line. Defaults to the Pothos (2000) corpus.
    #[arg( long )]
    training: Option<String>,

    /// Letters of the alphabet, in order
    #[arg( long, default_value = corpus::POTHOS_LETTERS )]
    alphabet: String,

    #[arg( long, default_value_t = ',' )]
    delimiter: char,

    #[arg( long, default_value = "items" )]
    item_column: String,

    #[arg( long, default_value = "p1" )]
    value_column: String,

    /// Keep the case of judged items instead of upper-casing them
    #[arg( long )]
    keep_case: bool,

    /// Write the fitted model as JSON
    #[arg( long )]
    model_out: Option<String>,

    /// Print the scores of every item
    #[arg( long )]
    show_predictions: bool,

    /// Raise log verbosity (-v debug, -vv trace)
    #[arg( short, long, action = clap::ArgAction::Count )]
    verbose: u8,
}

impl Args {
    fn to_config( &self ) -> ExperimentConfig {
	ExperimentConfig {
	    letters: self.alphabet.clone(),
	    training_path: self.training.clone(),
	    judgments_path: self.judgments.clone(),
	    row_format: RowFormat {
		delimiter: self.delimiter,
		item_column: self.item_column.clone(),
		value_column: self.value_column.clone(),
		uppercase: !self.keep_case,
	    },
	    model_out: self.model_out.clone(),
	}
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    prepare_logging( args.verbose )?;

    let report = experiment::run( &args.to_config() )?;
    info!( "Scored {} items, skipped {}", report.predictions.len(), report.skipped.len() );

    let mut formatter = ReportFormatter::new();
    if args.show_predictions {
	formatter.show_predictions();
    }
    println!( "{}", formatter.format_pretty( &report ));
    report.log( "correlations", Level::DEBUG );

    Ok( () )
}

fn prepare_logging( verbosity: u8 ) -> anyhow::Result<()> {
    let level = match verbosity {
	0 => LevelFilter::INFO,
	1 => LevelFilter::DEBUG,
	_ => LevelFilter::TRACE,
    };
    let tracer = tracing_subscriber::fmt::fmt()
        .with_max_level( level )
        .with_writer( std::io::stderr )
        .finish();
    tracing::subscriber::set_global_default( tracer )?;
    Ok( () )
}
