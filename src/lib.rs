
pub mod corpus;
pub mod data;
pub mod experiment;
pub mod io;
pub mod model;
pub mod stats;

use tracing::*;

pub use data::{Alphabet, Bigram, Count, Sequence, Symbol};
pub use model::{FittedModel, ScoringMethod};
pub use experiment::{Experiment, ExperimentConfig, Report};

/// Objects that can be recorded in the log
pub trait Loggable {
    fn log( &self, message: &str, level: tracing::Level );
}

/// Emits text as an event at a level chosen at runtime
fn log_at( level: Level, text: &str ) {
    match level {
	Level::ERROR => error!( "{text}" ),
	Level::WARN => warn!( "{text}" ),
	Level::INFO => info!( "{text}" ),
	Level::DEBUG => debug!( "{text}" ),
	_ => trace!( "{text}" ),
    }
}
