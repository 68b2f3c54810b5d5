
use rayon::prelude::*;
use thiserror::Error;

use crate::*;
use crate::data::SymbolError;
use crate::io::{DataError, Judgment, PrettyFormatter, RowFormat};
use crate::model::{FittedModel, ModelError, ScoringMethod};
use crate::stats::{Correlation, StatsError};

#[derive( Debug, Error )]
pub enum ExperimentError {
    #[error( "invalid alphabet: {0}" )]
    Alphabet( #[from] SymbolError ),
    #[error( "alphabet letter '{0}' is lower-case but judged items are upper-cased; keep their case to match it" )]
    LowercaseAlphabet( char ),
    #[error( transparent )]
    Model( #[from] ModelError ),
    #[error( transparent )]
    Data( #[from] DataError ),
    #[error( "cannot correlate {method}: {source}" )]
    Stats { method: ScoringMethod, source: StatsError },
}

/// Settings of one fit-predict-correlate run
#[derive( Debug, Clone )]
pub struct ExperimentConfig {
    /// Letters of the alphabet in order
    pub letters: String,
    /// One training item per line. None uses the built-in corpus.
    pub training_path: Option<String>,
    pub judgments_path: String,
    pub row_format: RowFormat,
    /// Where to write the fitted model as JSON
    pub model_out: Option<String>,
}

/// Scores of one test item next to its observed judgment
#[derive( Debug, Clone, PartialEq )]
pub struct Prediction {
    pub item: String,
    pub observed: f64,
    pub average_entropy: f64,
    pub summed_entropy: f64,
    pub average_probability: f64,
}

#[derive( Debug, Clone )]
pub struct Report {
    pub predictions: Vec<Prediction>,
    /// Items that are not sequences over the alphabet
    pub skipped: Vec<String>,
    pub correlations: Vec<(ScoringMethod, Correlation)>,
}

/// Fitted model plus the steps that validate it against judgments
pub struct Experiment {
    model: FittedModel,
}

pub struct ReportFormatter {
    show_predictions: bool,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
	ExperimentConfig {
	    letters: corpus::POTHOS_LETTERS.to_string(),
	    training_path: None,
	    judgments_path: "pothos2000.csv".to_string(),
	    row_format: RowFormat::default(),
	    model_out: None,
	}
    }
}

/// Loads training and judgment data, fits the model and correlates every score with the judgments
pub fn run( config: &ExperimentConfig ) -> Result<Report, ExperimentError> {
    let alphabet = Alphabet::new( config.letters.chars() )?;
    if config.row_format.uppercase {
	if let Some( letter ) = alphabet.letters().iter().find( |c| c.is_lowercase() ) {
	    return Err( ExperimentError::LowercaseAlphabet( *letter ));
	}
    }
    let training: Vec<String> = match &config.training_path {
	Some( path ) => io::read_training( path )?,
	None => corpus::POTHOS_TRAINING.iter().map( |item| item.to_string() ).collect(),
    };
    info!( "Training on {} items over alphabet {alphabet}", training.len() );

    let experiment = Experiment::fit( alphabet, &training )?;
    experiment.model().log( "fitted model", Level::DEBUG );
    if let Some( path ) = &config.model_out {
	io::write_model( experiment.model(), path )?;
	info!( "Wrote model to {path}" );
    }

    let judgments = io::read_judgments( &config.judgments_path, &config.row_format )?;
    experiment.evaluate( &judgments )
}

impl Experiment {

    pub fn fit<S: AsRef<str>>( alphabet: Alphabet, training: &[S] ) -> Result<Experiment, ExperimentError> {
	let _span = info_span!( "fit" ).entered();
	let model = FittedModel::train( alphabet, training )?;
	info!( "Fitted {} bigrams over {} start symbols", model.probabilities().len(), model.entropies().len() );
	Ok( Experiment{ model } )
    }

    pub fn new( model: FittedModel ) -> Experiment {
	Experiment{ model }
    }

    pub fn model( &self ) -> &FittedModel {
	&self.model
    }

    /// Scores every judged item in parallel. Returns the predictions in input order and the skipped items.
    pub fn predict( &self, judgments: &[Judgment] ) -> Result<(Vec<Prediction>, Vec<String>), ExperimentError> {
	let _span = info_span!( "predict", items = judgments.len() ).entered();
	let mut parsed: Vec<(&Judgment, Sequence)> = Vec::with_capacity( judgments.len() );
	let mut skipped: Vec<String> = Vec::new();
	for judgment in judgments {
	    match Sequence::parse( &judgment.item, self.model.alphabet() ) {
		Ok( sequence ) => parsed.push( (judgment, sequence) ),
		Err( err ) => {
		    warn!( "Skipping item {}: {err}", judgment.item );
		    skipped.push( judgment.item.clone() );
		},
	    }
	}

	let predictions = parsed.par_iter()
	    .map( |(judgment, sequence)| self.predict_one( judgment, sequence ))
	    .collect::<Result<Vec<Prediction>, ModelError>>()?;
	debug!( "Scored {} items, skipped {}", predictions.len(), skipped.len() );
	Ok( (predictions, skipped) )
    }

    /// Predicts the judgments and correlates each scoring method with the observed values
    pub fn evaluate( &self, judgments: &[Judgment] ) -> Result<Report, ExperimentError> {
	let (predictions, skipped) = self.predict( judgments )?;
	let observed: Vec<f64> = predictions.iter().map( |p| p.observed ).collect();

	let mut correlations = Vec::with_capacity( ScoringMethod::ALL.len() );
	for method in ScoringMethod::ALL {
	    let predicted: Vec<f64> = predictions.iter().map( |p| p.score( method )).collect();
	    let correlation = stats::correlate( &observed, &predicted )
		.map_err( |source| ExperimentError::Stats{ method, source } )?;
	    info!( "{method}: r = {:.3}, p = {:.4}", correlation.coefficient, correlation.p_value );
	    correlations.push( (method, correlation) );
	}
	Ok( Report{ predictions, skipped, correlations } )
    }

    fn predict_one( &self, judgment: &Judgment, sequence: &Sequence ) -> Result<Prediction, ModelError> {
	Ok( Prediction {
	    item: judgment.item.clone(),
	    observed: judgment.observed,
	    average_entropy: self.model.average_entropy( sequence ),
	    summed_entropy: self.model.sum_entropy( sequence ),
	    average_probability: self.model.average_probability( sequence )?,
	})
    }
}

impl Prediction {
    pub fn score( &self, method: ScoringMethod ) -> f64 {
	match method {
	    ScoringMethod::AverageEntropy => self.average_entropy,
	    ScoringMethod::SummedEntropy => self.summed_entropy,
	    ScoringMethod::AverageProbability => self.average_probability,
	}
    }
}

impl Report {
    pub fn correlation( &self, method: ScoringMethod ) -> Option<&Correlation> {
	self.correlations.iter()
	    .find( |(m, _)| *m == method )
	    .map( |(_, correlation)| correlation )
    }
}

impl Loggable for Report {
    fn log( &self, message: &str, level: Level ) {
	log_at( level, &format!( "{message}{}", ReportFormatter::new().format_pretty( self )));
    }
}

impl PrettyFormatter<Report> for ReportFormatter {

    fn format_pretty( &self, report: &Report ) -> String {
	let mut output = String::new();
	output.push( '\n' );

	if self.show_predictions {
	    output.push_str( &format!( "{:<10} {:>8} {:>8} {:>8} {:>8}\n", "item", "observed", "avg H", "sum H", "avg P" ));
	    for p in &report.predictions {
		output.push_str( &format!( "{:<10} {:>8.3} {:>8.3} {:>8.3} {:>8.3}\n",
					   p.item, p.observed, p.average_entropy, p.summed_entropy, p.average_probability ));
	    }
	}
	if !report.skipped.is_empty() {
	    output.push_str( &format!( "skipped: {}\n", report.skipped.join( " " )));
	}
	for (method, correlation) in &report.correlations {
	    output.push_str( &format!( "{method}: r = {:.3}, p = {:.4} (n = {})\n",
				       correlation.coefficient, correlation.p_value, correlation.n ));
	}
	output
    }
}

impl Default for ReportFormatter {
    fn default() -> Self {
	ReportFormatter::new()
    }
}

impl ReportFormatter {
    pub fn new() -> ReportFormatter {
	ReportFormatter{ show_predictions: false }
    }

    pub fn show_predictions( &mut self ) { self.show_predictions = true; }
}
