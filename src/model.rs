
use std::fmt;

use thiserror::Error;

use crate::*;
use crate::data::SymbolError;

mod bigram;
mod scoring;

pub use bigram::{FittedModel, FrequencyTable, ProbabilityTable, EntropyMap, ModelFormatter,
		 bigram_frequencies, normalize, entropy};
pub use scoring::{sum_entropy, average_entropy, average_probability};

#[derive( Debug, Error, PartialEq, Eq )]
pub enum ModelError {
    /// Normalization over a frequency table that sums to zero
    #[error( "start symbol '{0}' never occurs in the training data" )]
    UnobservedStartSymbol( Symbol ),
    /// Strict scoring met a bigram the fitted table does not know
    #[error( "bigram '{0}' is not in the fitted probability table" )]
    UnseenBigram( Bigram ),
    #[error( "training item {index} is invalid: {source}" )]
    InvalidSequence { index: usize, source: SymbolError },
}

/// Scalar predictions that can be derived from a fitted model
#[derive( Debug, Clone, Copy, PartialEq, Eq, Hash )]
pub enum ScoringMethod {
    SummedEntropy,
    AverageEntropy,
    AverageProbability,
}

impl ScoringMethod {
    pub const ALL: [ScoringMethod; 3] = [
	ScoringMethod::AverageEntropy,
	ScoringMethod::SummedEntropy,
	ScoringMethod::AverageProbability,
    ];

    pub fn score( &self, model: &FittedModel, sequence: &Sequence ) -> Result<f64, ModelError> {
	match self {
	    ScoringMethod::SummedEntropy => Ok( model.sum_entropy( sequence )),
	    ScoringMethod::AverageEntropy => Ok( model.average_entropy( sequence )),
	    ScoringMethod::AverageProbability => model.average_probability( sequence ),
	}
    }

    pub fn name( &self ) -> &'static str {
	match self {
	    ScoringMethod::SummedEntropy => "summed-entropy",
	    ScoringMethod::AverageEntropy => "average-entropy",
	    ScoringMethod::AverageProbability => "average-probability",
	}
    }
}

impl fmt::Display for ScoringMethod {
    fn fmt( &self, f: &mut fmt::Formatter<'_> ) -> fmt::Result {
	write!( f, "{}", self.name() )
    }
}
