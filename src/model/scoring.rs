
use crate::*;
use crate::data::bigrams_of;

use super::{EntropyMap, ModelError, ProbabilityTable};

/// Sum of the start-symbol entropies along the sequence's bigrams.
///
/// A bigram contributes the entropy of its first symbol, not a value of its own.
/// A bigram with probability zero, or missing from the table, contributes the
/// out-of-vocabulary penalty instead: the entropy of a uniform distribution over
/// the N start symbols of the entropy map, log2(N). Never fails.
pub fn sum_entropy( sequence: &Sequence, entropies: &EntropyMap, probabilities: &ProbabilityTable ) -> f64 {
    let penalty = unseen_penalty( entropies.len() );
    bigrams_of( sequence ).iter()
	.map( |bigram| {
	    match probabilities.get( bigram ) {
		Some( p ) if p != 0.0 => entropies.get( bigram.first() ).unwrap_or( penalty ),
		_ => {
		    trace!( "bigram {bigram} unseen in training, penalty {penalty:.3}" );
		    penalty
		},
	    }
	}).sum()
}

/// Summed entropy divided by the number of bigrams, len + 1
pub fn average_entropy( sequence: &Sequence, entropies: &EntropyMap, probabilities: &ProbabilityTable ) -> f64 {
    sum_entropy( sequence, entropies, probabilities ) / (sequence.len() + 1) as f64
}

/// Mean fitted probability of the sequence's bigrams.
/// Unlike the entropy scores this fails on a bigram the table does not contain.
pub fn average_probability( sequence: &Sequence, probabilities: &ProbabilityTable ) -> Result<f64, ModelError> {
    let bigrams = bigrams_of( sequence );
    let mut sum_probability = 0.0;
    for bigram in &bigrams {
	let p = probabilities.get( bigram ).ok_or( ModelError::UnseenBigram( *bigram ))?;
	sum_probability += p;
    }
    Ok( sum_probability / bigrams.len() as f64 )
}

/// -N * (1/N) * log2(1/N), which is log2(N)
fn unseen_penalty( n: usize ) -> f64 {
    if n == 0 {
	return 0.0;
    }
    let n = n as f64;
    let uniform = 1.0 / n;
    -n * uniform * f64::log2( uniform )
}
