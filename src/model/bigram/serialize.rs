
use std::collections::BTreeMap;

use serde::Serialize;

use crate::*;
use crate::io::PrettyFormatter;

use super::FittedModel;

pub struct ModelFormatter {
    show_probabilities: bool,
    show_entropies: bool,
}

/// Flat record written as JSON. Keys are the printed bigrams and symbols, sorted.
#[derive( Serialize )]
struct ModelRecord {
    alphabet: String,
    probabilities: BTreeMap<String, f64>,
    entropies: BTreeMap<String, f64>,
}

impl PrettyFormatter<FittedModel> for ModelFormatter {

    fn format_pretty( &self, model: &FittedModel ) -> String {
	let mut output = String::new();
	output.push( '\n' ); // so output begins on a new line

	if self.show_entropies {
	    output = model.alphabet().start_symbols()
		.map( |symbol| {
		    let entropy = model.entropies().get( symbol ).unwrap_or( 0.0 );
		    format_entropy( symbol, entropy )
		}).fold( output, join_lines );
	}

	if self.show_probabilities {
	    let mut ordered: Vec<(&Bigram, &f64)> = model.probabilities().iter().collect();
	    ordered.sort_by_key( |(bigram, _)| **bigram );
	    output = ordered.into_iter()
		.map( |(bigram, probability)| format_probability( *bigram, *probability ))
		.fold( output, join_lines );
	}
	output
    }
}

impl serde::Serialize for FittedModel {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error> where S: serde::Serializer {
	let record = ModelRecord {
	    alphabet: self.alphabet().to_string(),
	    probabilities: self.probabilities().iter().map( |(bg, p)| (bg.to_string(), *p) ).collect(),
	    entropies: self.entropies().iter().map( |(s, h)| (s.to_string(), *h) ).collect(),
	};
	record.serialize( serializer )
    }
}

fn format_entropy( symbol: Symbol, entropy: f64 ) -> String {
    format!( "H({symbol}) = {entropy:.3}" )
}

fn format_probability( bigram: Bigram, probability: f64 ) -> String {
    format!( "P({bigram}) = {probability:.3}" )
}

fn join_lines( mut accumulator: String, addition: String ) -> String {
    accumulator.push_str( addition.as_str() );
    accumulator.push( '\n' );
    accumulator
}

impl Default for ModelFormatter {
    fn default() -> Self {
	ModelFormatter::new()
    }
}

impl ModelFormatter {
    pub fn new() -> ModelFormatter {
	ModelFormatter{
	    show_probabilities: false,
	    show_entropies: false,
	}
    }

    pub fn with_probabilities( mut self ) -> ModelFormatter { self.show_probabilities = true; self }
    pub fn with_entropies( mut self ) -> ModelFormatter { self.show_entropies = true; self }
}

#[cfg(test)]
mod test {
    use super::*;

    fn small_model() -> FittedModel {
	let alphabet = Alphabet::new( "XJVT".chars() ).unwrap();
	FittedModel::train( alphabet, &[ "XXVT", "VJ" ] ).unwrap()
    }

    #[test]
    fn test_pretty_entropies() {
	let text = ModelFormatter::new().with_entropies().format_pretty( &small_model() );
	let lines: Vec<&str> = text.lines().filter( |l| !l.is_empty() ).collect();
	assert_eq!( lines, vec!( "H(b) = 1.000", "H(X) = 1.000", "H(J) = 0.000", "H(V) = 1.000", "H(T) = 0.000" ));
    }

    #[test]
    fn test_pretty_probabilities() {
	let text = ModelFormatter::new().with_probabilities().format_pretty( &small_model() );
	assert_eq!( text.lines().filter( |l| l.starts_with( "P(" )).count(), 25 );
	assert!( text.contains( "P(bX) = 0.500" ));
	assert!( text.contains( "P(Je) = 1.000" ));
	assert!( !text.contains( "H(" ));
    }

    #[test]
    fn test_serialize_json() {
	let value = serde_json::to_value( small_model() ).unwrap();
	assert_eq!( value["alphabet"], "XJVT" );
	assert_eq!( value["probabilities"].as_object().unwrap().len(), 25 );
	assert_eq!( value["probabilities"]["VT"], 0.5 );
	assert_eq!( value["entropies"]["b"], 1.0 );
	assert_eq!( value["entropies"]["J"], 0.0 );
    }
}
