//! Artificial grammar items of Pothos & Bailey (2000).

use crate::data::Alphabet;

/// Letters of the artificial grammar
pub const POTHOS_LETTERS: &str = "XJVT";

/// Grammatical training items
pub const POTHOS_TRAINING: &[&str] = &[
    "XXVT", "XXVXJJ", "VXJJ", "XVJTVJ", "XXVXJ", "XVX", "VXJJJJ", "XVT", "XXXVT", "VJ", "XVXJJJ", "VJTVTV",
    "XXVJ", "VTVJ", "VJTVX", "XXXVTV", "XXVJ", "VJTVX", "XXXVTV", "XVXJJ", "VT", "VJTVXJ", "XXXVX", "VJTXVJ",
    "XVXJ", "XXXXVX",
];

/// Test items rated by participants. XXWJJ is deliberately outside the alphabet.
pub const POTHOS_TEST: &[&str] = &[
    "XXVXJ", "XVTV", "VXJ", "XXVTV", "XVJTVX", "XXVTVJ", "VJTXVX", "VX", "VJTVT", "VTVJJ", "VTVJ", "XVJTVT",
    "VTV", "XVTVJ", "XVTVJ", "VTVJJ", "VJTV", "XXV", "XVXV", "XVXVJ", "XXVJJJ", "XJJ", "VXVJ", "XVXT", "XXJJ",
    "VXJTJ", "XXWJJ", "JXVT", "XXTX", "TVJ", "VXJJX", "VJJXVT",
];

pub fn pothos_alphabet() -> Alphabet {
    Alphabet::new( POTHOS_LETTERS.chars() ).expect( "built-in letters form a valid alphabet" )
}
