
use std::fmt;

use super::{Sequence, Symbol};

/// Transition between two adjacent symbols of a sentinel-wrapped sequence.
/// Never begins with the end sentinel and never ends with the start sentinel.
#[derive( Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord )]
pub struct Bigram {
    first: Symbol,
    second: Symbol,
}

impl Bigram {
    /// Returns None for pairs that cannot occur in a wrapped sequence
    pub fn new( first: Symbol, second: Symbol ) -> Option<Bigram> {
	if first == Symbol::End || second == Symbol::Start {
	    None
	} else {
	    Some( Bigram{ first, second } )
	}
    }

    pub fn first( &self ) -> Symbol { self.first }
    pub fn second( &self ) -> Symbol { self.second }
}

impl fmt::Display for Bigram {
    fn fmt( &self, f: &mut fmt::Formatter<'_> ) -> fmt::Result {
	write!( f, "{}{}", self.first, self.second )
    }
}

/// Bigrams of start + sequence + end. A sequence of length L yields L + 1 bigrams.
pub fn bigrams_of( sequence: &Sequence ) -> Vec<Bigram> {
    let wrapped: Vec<Symbol> = sequence.iterate_wrapped().collect();
    wrapped.windows( 2 )
	.map( |pair| Bigram{ first: pair[0], second: pair[1] } )
	.collect()
}

/// Concatenates the bigrams of every sequence, keeping repetitions
pub fn corpus_bigrams( corpus: &[Sequence] ) -> Vec<Bigram> {
    corpus.iter().flat_map( bigrams_of ).collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::data::Alphabet;

    fn render( bigrams: &[Bigram] ) -> Vec<String> {
	bigrams.iter().map( |bg| bg.to_string() ).collect()
    }

    #[test]
    fn test_bigrams_of() {
	let alphabet = Alphabet::new( "XJVT".chars() ).unwrap();
	let sequence = Sequence::parse( "XXVT", &alphabet ).unwrap();
	assert_eq!( render( &bigrams_of( &sequence )), vec!( "bX", "XX", "XV", "VT", "Te" ));
    }

    #[test]
    /// The empty sequence still has one transition
    fn test_empty_sequence() {
	let alphabet = Alphabet::new( "X".chars() ).unwrap();
	let sequence = Sequence::parse( "", &alphabet ).unwrap();
	let bigrams = bigrams_of( &sequence );
	assert_eq!( bigrams.len(), 1 );
	assert_eq!( bigrams[0], Bigram::new( Symbol::Start, Symbol::End ).unwrap() );
    }

    #[test]
    fn test_length_and_sentinels() {
	let alphabet = Alphabet::new( "XJVT".chars() ).unwrap();
	for text in [ "X", "VJ", "XXVXJJ", "VJTVTV", "TTTTTTTTTT" ] {
	    let sequence = Sequence::parse( text, &alphabet ).unwrap();
	    let bigrams = bigrams_of( &sequence );
	    assert_eq!( bigrams.len(), text.len() + 1 );
	    assert_eq!( bigrams.first().unwrap().first(), Symbol::Start );
	    assert_eq!( bigrams.last().unwrap().second(), Symbol::End );
	    for bg in &bigrams {
		assert_ne!( bg.first(), Symbol::End );
		assert_ne!( bg.second(), Symbol::Start );
	    }
	}
    }

    #[test]
    fn test_corpus_bigrams_keep_repetitions() {
	let alphabet = Alphabet::new( "XJVT".chars() ).unwrap();
	let corpus = vec!(
	    Sequence::parse( "XXVT", &alphabet ).unwrap(),
	    Sequence::parse( "VJ", &alphabet ).unwrap(),
	    Sequence::parse( "VJ", &alphabet ).unwrap(),
	);
	let bigrams = corpus_bigrams( &corpus );
	assert_eq!( render( &bigrams ),
		    vec!( "bX", "XX", "XV", "VT", "Te", "bV", "VJ", "Je", "bV", "VJ", "Je" ));
    }

    #[test]
    fn test_invalid_pairs() {
	assert!( Bigram::new( Symbol::End, Symbol::Letter( 'X' )).is_none() );
	assert!( Bigram::new( Symbol::Letter( 'X' ), Symbol::Start ).is_none() );
	assert!( Bigram::new( Symbol::Start, Symbol::End ).is_some() );
    }
}
