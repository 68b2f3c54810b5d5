mod serialize; // serialization and pretty printing of the model

use rustc_hash::FxHashMap;

use crate::data::{corpus_bigrams, SymbolError};
use crate::io::PrettyFormatter;

use super::*;

pub use serialize::ModelFormatter;

#[derive( Debug, Clone, PartialEq )]
/// Counts of every bigram that begins with one start symbol
pub struct FrequencyTable {
    start: Symbol,
    counts: FxHashMap<Bigram, Count>,
}

#[derive( Debug, Clone, Default, PartialEq )]
/// Probability per bigram. Either one start symbol's distribution or the union of several.
pub struct ProbabilityTable {
    probabilities: FxHashMap<Bigram, f64>,
}

#[derive( Debug, Clone, Default, PartialEq )]
/// Shannon entropy of every start symbol's outgoing distribution, in bits
pub struct EntropyMap {
    entropies: FxHashMap<Symbol, f64>,
}

#[derive( Debug, Clone )]
/// Bigram entropy model fitted to a training corpus. Immutable once fitted.
pub struct FittedModel {
    alphabet: Alphabet,
    probabilities: ProbabilityTable,
    entropies: EntropyMap,
}

/// Counts the bigrams beginning with start. Every follow symbol of the alphabet gets a key, even if it never occurs.
pub fn bigram_frequencies( start: Symbol, bigrams: &[Bigram], alphabet: &Alphabet ) -> FrequencyTable {
    let mut counts: FxHashMap<Bigram, Count> = alphabet.follow_symbols()
	.filter_map( |follow| Bigram::new( start, follow ))
	.map( |bigram| (bigram, 0) )
	.collect();

    for bigram in bigrams.iter().filter( |bg| bg.first() == start ) {
	if let Some( count ) = counts.get_mut( bigram ) {
	    *count += 1;
	}
    }
    FrequencyTable{ start, counts }
}

/// Divides each count by the table's total count.
/// Fails for a table without any observation instead of producing NaN.
pub fn normalize( frequencies: &FrequencyTable ) -> Result<ProbabilityTable, ModelError> {
    let total = frequencies.total();
    if total == 0 {
	return Err( ModelError::UnobservedStartSymbol( frequencies.start ));
    }
    let probabilities = frequencies.counts.iter()
	.map( |(bigram, count)| (*bigram, *count as f64 / total as f64) )
	.collect();
    Ok( ProbabilityTable{ probabilities } )
}

/// Shannon entropy in bits. Zero probabilities contribute nothing.
pub fn entropy( probabilities: &ProbabilityTable ) -> f64 {
    let weighted_log: f64 = probabilities.probabilities.values()
	.filter( |p| **p > 0.0 )
	.map( |p| p * f64::log2( *p ))
	.sum();
    // subtract from positive zero so a certain outcome gives 0.0 rather than -0.0
    0.0 - weighted_log
}

impl FrequencyTable {
    pub fn start( &self ) -> Symbol {
	self.start
    }

    pub fn get( &self, bigram: &Bigram ) -> Option<Count> {
	self.counts.get( bigram ).copied()
    }

    pub fn total( &self ) -> Count {
	self.counts.values().sum()
    }

    pub fn len( &self ) -> usize {
	self.counts.len()
    }

    pub fn is_empty( &self ) -> bool {
	self.counts.is_empty()
    }

    pub fn iter( &self ) -> impl Iterator<Item = (&Bigram, &Count)> {
	self.counts.iter()
    }
}

impl ProbabilityTable {
    pub fn get( &self, bigram: &Bigram ) -> Option<f64> {
	self.probabilities.get( bigram ).copied()
    }

    pub fn len( &self ) -> usize {
	self.probabilities.len()
    }

    pub fn is_empty( &self ) -> bool {
	self.probabilities.is_empty()
    }

    pub fn iter( &self ) -> impl Iterator<Item = (&Bigram, &f64)> {
	self.probabilities.iter()
    }

    /// Adds every entry of other, replacing existing ones
    pub fn merge( &mut self, other: ProbabilityTable ) {
	self.probabilities.extend( other.probabilities );
    }
}

impl FromIterator<(Bigram, f64)> for ProbabilityTable {
    fn from_iter<I: IntoIterator<Item = (Bigram, f64)>>( iter: I ) -> Self {
	ProbabilityTable{ probabilities: iter.into_iter().collect() }
    }
}

impl EntropyMap {
    pub fn get( &self, symbol: Symbol ) -> Option<f64> {
	self.entropies.get( &symbol ).copied()
    }

    pub fn len( &self ) -> usize {
	self.entropies.len()
    }

    pub fn is_empty( &self ) -> bool {
	self.entropies.is_empty()
    }

    pub fn iter( &self ) -> impl Iterator<Item = (&Symbol, &f64)> {
	self.entropies.iter()
    }
}

impl FromIterator<(Symbol, f64)> for EntropyMap {
    fn from_iter<I: IntoIterator<Item = (Symbol, f64)>>( iter: I ) -> Self {
	EntropyMap{ entropies: iter.into_iter().collect() }
    }
}

impl FittedModel {

    /// Parses the training items over the alphabet and fits the model to them
    pub fn train<S: AsRef<str>>( alphabet: Alphabet, items: &[S] ) -> Result<FittedModel, ModelError> {
	let mut corpus = Vec::with_capacity( items.len() );
	for (index, item) in items.iter().enumerate() {
	    let sequence = Sequence::parse( item.as_ref(), &alphabet )
		.map_err( |source| ModelError::InvalidSequence{ index, source } )?;
	    corpus.push( sequence );
	}
	FittedModel::fit( alphabet, &corpus )
    }

    /// Derives the probability table and entropy map from the corpus.
    /// Every start symbol of the alphabet has to occur in the corpus.
    pub fn fit( alphabet: Alphabet, corpus: &[Sequence] ) -> Result<FittedModel, ModelError> {
	for (index, sequence) in corpus.iter().enumerate() {
	    if let Some( letter ) = sequence.letters().iter().find( |c| !alphabet.contains( **c )) {
		let source = SymbolError::UnknownSymbol( *letter );
		return Err( ModelError::InvalidSequence{ index, source } );
	    }
	}

	let bigrams = corpus_bigrams( corpus );
	debug!( "Fitting {} training items with {} bigrams", corpus.len(), bigrams.len() );

	let mut probabilities = ProbabilityTable::default();
	let mut entropies = EntropyMap::default();
	for start in alphabet.start_symbols() {
	    let frequencies = bigram_frequencies( start, &bigrams, &alphabet );
	    let distribution = normalize( &frequencies )?;
	    let start_entropy = entropy( &distribution );
	    trace!( "start symbol {start}: {} observations, entropy {start_entropy:.3}", frequencies.total() );

	    probabilities.merge( distribution );
	    entropies.entropies.insert( start, start_entropy );
	}

	debug!( "Fitted {} bigram probabilities for {} start symbols", probabilities.len(), entropies.len() );
	Ok( FittedModel{ alphabet, probabilities, entropies } )
    }

    pub fn alphabet( &self ) -> &Alphabet {
	&self.alphabet
    }

    pub fn probabilities( &self ) -> &ProbabilityTable {
	&self.probabilities
    }

    pub fn entropies( &self ) -> &EntropyMap {
	&self.entropies
    }

    pub fn sum_entropy( &self, sequence: &Sequence ) -> f64 {
	sum_entropy( sequence, &self.entropies, &self.probabilities )
    }

    pub fn average_entropy( &self, sequence: &Sequence ) -> f64 {
	average_entropy( sequence, &self.entropies, &self.probabilities )
    }

    pub fn average_probability( &self, sequence: &Sequence ) -> Result<f64, ModelError> {
	average_probability( sequence, &self.probabilities )
    }
}

impl Loggable for FittedModel {
    fn log( &self, message: &str, level: Level ) {
	let formatter = ModelFormatter::new().with_entropies();
	log_at( level, &format!( "{message}{}", formatter.format_pretty( self )));
    }
}
