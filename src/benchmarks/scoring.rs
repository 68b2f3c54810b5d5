use tracing::info;

use rand::prelude::*;
use rayon::prelude::*;
use statrs::distribution::DiscreteUniform;

use std::time::*;

use bigramentropy::*;

fn main() -> Result<(), String> {
    prepare_logging()?;

    let alphabet = corpus::pothos_alphabet();
    let n = 100000;
    let max_length = 12;

    let start = Instant::now();
    let model = FittedModel::train( alphabet.clone(), corpus::POTHOS_TRAINING ).map_err( |e| e.to_string() )?;
    info!( "Fit took {}us", Instant::now().duration_since( start ).as_micros() );

    let sequences = generate_random_sequences( &alphabet, n, max_length )?;
    benchmark_sequential( &model, &sequences );
    benchmark_parallel( &model, &sequences );

    Result::Ok( () )
}

fn benchmark_sequential( model: &FittedModel, sequences: &[Sequence] ) {
    info!( "Start benchmark: sequential scoring" );
    for method in ScoringMethod::ALL {
	let start = Instant::now();
	let total: f64 = sequences.iter()
	    .filter_map( |sequence| method.score( model, sequence ).ok() )
	    .sum();
	let time = Instant::now().duration_since( start );
	info!( "Result: {} {method} scores took {}ms (checksum {total:.3})", sequences.len(), time.as_millis() );
    }
}

fn benchmark_parallel( model: &FittedModel, sequences: &[Sequence] ) {
    info!( "Start benchmark: parallel scoring on {} threads", rayon::current_num_threads() );
    for method in ScoringMethod::ALL {
	let start = Instant::now();
	let total: f64 = sequences.par_iter()
	    .filter_map( |sequence| method.score( model, sequence ).ok() )
	    .sum();
	let time = Instant::now().duration_since( start );
	info!( "Result: {} {method} scores took {}ms (checksum {total:.3})", sequences.len(), time.as_millis() );
    }
}

fn generate_random_sequences( alphabet: &Alphabet, number: usize, max_length: usize ) -> Result<Vec<Sequence>, String> {
    let letters = alphabet.letters();
    // uniform lengths give the short sequences a shot too
    let length_distribution = DiscreteUniform::new( 0, max_length as i64 ).map_err( |e| e.to_string() )?;
    let letter_distribution = DiscreteUniform::new( 0, letters.len() as i64 - 1 ).map_err( |e| e.to_string() )?;
    let mut gen = thread_rng();

    let mut sequences = Vec::with_capacity( number );
    for _ in 0 .. number {
	let length = length_distribution.sample( &mut gen ) as usize;
	let text: String = (0 .. length)
	    .map( |_| letters[ letter_distribution.sample( &mut gen ) as usize ] )
	    .collect();
	sequences.push( Sequence::parse( &text, alphabet ).map_err( |e| e.to_string() )? );
    }
    Ok( sequences )
}

fn prepare_logging() -> Result<(), String> {
    let tracer = tracing_subscriber::fmt::fmt()
        .with_max_level( tracing_subscriber::filter::LevelFilter::INFO )
        .finish();
    tracing::subscriber::set_global_default( tracer ).map_err( |e| e.to_string() )
}
