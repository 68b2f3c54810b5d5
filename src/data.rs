
use std::fmt;

use thiserror::Error;

mod bigram;

pub use bigram::{Bigram, bigrams_of, corpus_bigrams};

/// Character printed for the start sentinel
pub const START_CHAR: char = 'b';
/// Character printed for the end sentinel
pub const END_CHAR: char = 'e';

pub type Count = u64;

/// Symbols of a sentinel-wrapped sequence.
/// Ordering puts the start sentinel first and the end sentinel last.
#[derive( Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord )]
pub enum Symbol {
    Start,
    Letter( char ),
    End,
}

#[derive( Debug, Error, PartialEq, Eq )]
pub enum SymbolError {
    #[error( "symbol '{0}' is not part of the alphabet" )]
    UnknownSymbol( char ),
    #[error( "symbol '{0}' is reserved for a sentinel" )]
    ReservedSymbol( char ),
    #[error( "symbol '{0}' occurs twice in the alphabet" )]
    DuplicateSymbol( char ),
    #[error( "the alphabet has no symbols" )]
    EmptyAlphabet,
}

/// Ordered set of observable symbols. Sentinels are implicit.
#[derive( Debug, Clone, PartialEq, Eq )]
pub struct Alphabet {
    letters: Vec<char>,
}

/// A string over an alphabet, sentinels excluded
#[derive( Debug, Clone, PartialEq, Eq, Hash )]
pub struct Sequence {
    letters: Vec<char>,
}

impl fmt::Display for Symbol {
    fn fmt( &self, f: &mut fmt::Formatter<'_> ) -> fmt::Result {
	let c = match self {
	    Symbol::Start => START_CHAR,
	    Symbol::Letter( c ) => *c,
	    Symbol::End => END_CHAR,
	};
	write!( f, "{c}" )
    }
}

impl Alphabet {

    /// Validates the letters once. Order of the letters is kept.
    pub fn new<I>( letters: I ) -> Result<Alphabet, SymbolError> where I: IntoIterator<Item = char> {
	let mut validated: Vec<char> = Vec::new();
	for letter in letters {
	    if is_reserved( letter ) {
		return Err( SymbolError::ReservedSymbol( letter ));
	    }
	    if validated.contains( &letter ) {
		return Err( SymbolError::DuplicateSymbol( letter ));
	    }
	    validated.push( letter );
	}
	if validated.is_empty() {
	    return Err( SymbolError::EmptyAlphabet );
	}
	Ok( Alphabet{ letters: validated } )
    }

    pub fn contains( &self, letter: char ) -> bool {
	self.letters.contains( &letter )
    }

    pub fn len( &self ) -> usize {
	self.letters.len()
    }

    pub fn letters( &self ) -> &[char] {
	&self.letters
    }

    /// Symbols a bigram may begin with: the start sentinel followed by every letter
    pub fn start_symbols<'a>( &'a self ) -> impl Iterator<Item = Symbol> + 'a {
	std::iter::once( Symbol::Start ).chain( self.letters.iter().map( |c| Symbol::Letter( *c )))
    }

    /// Symbols a bigram may end with: every letter followed by the end sentinel
    pub fn follow_symbols<'a>( &'a self ) -> impl Iterator<Item = Symbol> + 'a {
	self.letters.iter().map( |c| Symbol::Letter( *c )).chain( std::iter::once( Symbol::End ))
    }
}

impl fmt::Display for Alphabet {
    fn fmt( &self, f: &mut fmt::Formatter<'_> ) -> fmt::Result {
	let letters: String = self.letters.iter().collect();
	write!( f, "{letters}" )
    }
}

impl Sequence {

    /// Parses text into a sequence, rejecting characters outside the alphabet
    pub fn parse( text: &str, alphabet: &Alphabet ) -> Result<Sequence, SymbolError> {
	let mut letters = Vec::with_capacity( text.len() );
	for c in text.chars() {
	    if is_reserved( c ) {
		return Err( SymbolError::ReservedSymbol( c ));
	    }
	    if !alphabet.contains( c ) {
		return Err( SymbolError::UnknownSymbol( c ));
	    }
	    letters.push( c );
	}
	Ok( Sequence{ letters } )
    }

    pub fn len( &self ) -> usize {
	self.letters.len()
    }

    pub fn is_empty( &self ) -> bool {
	self.letters.is_empty()
    }

    pub fn letters( &self ) -> &[char] {
	&self.letters
    }

    /// Iterates the sentinel-wrapped form
    pub fn iterate_wrapped<'a>( &'a self ) -> impl Iterator<Item = Symbol> + 'a {
	std::iter::once( Symbol::Start )
	    .chain( self.letters.iter().map( |c| Symbol::Letter( *c )))
	    .chain( std::iter::once( Symbol::End ))
    }
}

impl fmt::Display for Sequence {
    fn fmt( &self, f: &mut fmt::Formatter<'_> ) -> fmt::Result {
	let text: String = self.letters.iter().collect();
	write!( f, "{text}" )
    }
}

fn is_reserved( c: char ) -> bool {
    c == START_CHAR || c == END_CHAR
}
