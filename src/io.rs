use std::path::Path;
use std::fs::File;
use std::io::{BufReader, BufRead, Read, Write};

use thiserror::Error;

use crate::*;

/// Converts a structure into a string
pub trait PrettyFormatter<T> {
    fn format_pretty( &self, object: &T ) -> String;
}

pub type DataGenerator<T> = Box<dyn Iterator<Item = T>>;

#[derive( Debug, Error )]
pub enum DataError {
    #[error( "cannot access {path}: {source}" )]
    Io { path: String, source: std::io::Error },
    #[error( "column '{0}' is missing from the header" )]
    MissingColumn( String ),
    #[error( "line {line}: {message}" )]
    Parse { line: usize, message: String },
    #[error( "the file has no header row" )]
    MissingHeader,
    #[error( "delimiter '{0}' is not an ASCII character" )]
    Delimiter( char ),
    #[error( "cannot serialize: {0}" )]
    Json( #[from] serde_json::Error ),
}

/// One rated test item
#[derive( Debug, Clone, PartialEq )]
pub struct Judgment {
    pub item: String,
    pub observed: f64,
}

/// Layout of a delimited judgment file
#[derive( Debug, Clone )]
pub struct RowFormat {
    pub delimiter: char,
    pub item_column: String,
    pub value_column: String,
    /// Upper-cases items before they are returned
    pub uppercase: bool,
}

impl Default for RowFormat {
    fn default() -> Self {
	RowFormat {
	    delimiter: ',',
	    item_column: "items".to_string(),
	    value_column: "p1".to_string(),
	    uppercase: true,
	}
    }
}

/// Reads a file line by line. Creates data using the converter, which is given a line; rejected lines are dropped.
pub fn read_lines<T, F>( path: &str, converter: F ) -> Result<DataGenerator<T>, DataError> where
    F: Fn(&str) -> Option<T> + 'static,
    T: 'static,
{
    let file = open( path )?;
    let reader = BufReader::new( file );
    let generator = reader.lines()
        .filter_map( |l| l.ok() )
        .filter_map( move |l| converter( &l ));
    Result::Ok( Box::new( generator ))
}

/// Reads one training item per line, skipping blank lines
pub fn read_training( path: &str ) -> Result<Vec<String>, DataError> {
    let items = read_lines( path, |line| {
	let item = line.trim();
	if item.is_empty() { None } else { Some( item.to_string() ) }
    })?;
    Ok( items.collect() )
}

/// Reads a delimited file with a header row into judgments
pub fn read_judgments( path: &str, format: &RowFormat ) -> Result<Vec<Judgment>, DataError> {
    let file = open( path )?;
    let judgments = parse_judgments( file, format )?;
    debug!( "Read {} judgments from {path}", judgments.len() );
    Ok( judgments )
}

/// Parses delimited rows with quoting. Columns are located by their header name.
pub fn parse_judgments<R: Read>( reader: R, format: &RowFormat ) -> Result<Vec<Judgment>, DataError> {
    if !format.delimiter.is_ascii() {
	return Err( DataError::Delimiter( format.delimiter ));
    }
    let mut rows = csv::ReaderBuilder::new()
	.delimiter( format.delimiter as u8 )
	.has_headers( true )
	.flexible( true )
	.trim( csv::Trim::All )
	.from_reader( reader );

    let header = rows.headers().map_err( csv_error )?.clone();
    if header.is_empty() {
	return Err( DataError::MissingHeader );
    }
    let locate = |column: &str| header.iter().position( |name| name == column )
	.ok_or_else( || DataError::MissingColumn( column.to_string() ));
    let (item_index, value_index) = (locate( &format.item_column )?, locate( &format.value_column )?);

    let mut judgments = Vec::new();
    for row in rows.records() {
	let row = row.map_err( csv_error )?;
	let line = row.position().map_or( 0, |position| position.line() as usize );
	let field = |index: usize| row.get( index )
	    .ok_or_else( || DataError::Parse{ line, message: format!( "expected at least {} fields", index + 1 ) } );

	let item = field( item_index )?;
	let value = field( value_index )?;
	let observed: f64 = value.parse()
	    .map_err( |_| DataError::Parse{ line, message: format!( "'{value}' is not a number" ) } )?;
	let item = if format.uppercase { item.to_uppercase() } else { item.to_string() };
	judgments.push( Judgment{ item, observed } );
    }
    Ok( judgments )
}

/// Writes a serializeable model to a file
pub fn write_model<M: serde::Serialize>( model: &M, path: &str ) -> Result<(), DataError> {
    let model_string = serde_json::to_string_pretty( model )?;
    let mut file = File::create( Path::new( path ))
	.map_err( |source| DataError::Io{ path: path.to_string(), source } )?;
    write!( file, "{}", model_string ).map_err( |source| DataError::Io{ path: path.to_string(), source } )
}

fn open( path: &str ) -> Result<File, DataError> {
    File::open( Path::new( path )).map_err( |source| DataError::Io{ path: path.to_string(), source } )
}

fn csv_error( err: csv::Error ) -> DataError {
    let line = err.position().map_or( 0, |position| position.line() as usize );
    DataError::Parse{ line, message: err.to_string() }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_judgments() {
	let text = "id,items,p1,p2\n1,xxvxj,0.75,0.1\n2,\"VTV\",0.5,0.2\n\n3,vx,1e-1,0.3\n";
	let judgments = parse_judgments( Cursor::new( text ), &RowFormat::default() ).unwrap();
	assert_eq!( judgments, vec!(
	    Judgment{ item: "XXVXJ".to_string(), observed: 0.75 },
	    Judgment{ item: "VTV".to_string(), observed: 0.5 },
	    Judgment{ item: "VX".to_string(), observed: 0.1 },
	));
    }

    #[test]
    /// A quoted field may hold the delimiter without shifting later columns
    fn test_quoted_fields() {
	let text = "id,note,items,p1\n1,\"hard, long\",xvx,0.5\n2,\"said \"\"no\"\"\",vt,\"0.25\"\n";
	let judgments = parse_judgments( Cursor::new( text ), &RowFormat::default() ).unwrap();
	assert_eq!( judgments, vec!(
	    Judgment{ item: "XVX".to_string(), observed: 0.5 },
	    Judgment{ item: "VT".to_string(), observed: 0.25 },
	));
    }

    #[test]
    fn test_custom_format() {
	let text = "word;score\nxv;2\n";
	let format = RowFormat {
	    delimiter: ';',
	    item_column: "word".to_string(),
	    value_column: "score".to_string(),
	    uppercase: false,
	};
	let judgments = parse_judgments( Cursor::new( text ), &format ).unwrap();
	assert_eq!( judgments, vec!( Judgment{ item: "xv".to_string(), observed: 2.0 } ));
    }

    #[test]
    fn test_parse_errors() {
	let format = RowFormat::default();
	let missing = parse_judgments( Cursor::new( "items,p2\nXV,1\n" ), &format );
	assert!( matches!( missing, Err( DataError::MissingColumn( column )) if column == "p1" ));

	let bad_value = parse_judgments( Cursor::new( "items,p1\nXV,1\nVX,high\n" ), &format );
	assert!( matches!( bad_value, Err( DataError::Parse{ line: 3, .. } )));

	let short_row = parse_judgments( Cursor::new( "items,p1\nXV\n" ), &format );
	assert!( matches!( short_row, Err( DataError::Parse{ line: 2, .. } )));

	assert!( matches!( parse_judgments( Cursor::new( "" ), &format ), Err( DataError::MissingHeader )));

	let wide = RowFormat{ delimiter: '¦', ..RowFormat::default() };
	assert!( matches!( parse_judgments( Cursor::new( "items¦p1\n" ), &wide ), Err( DataError::Delimiter( '¦' ))));
    }

    #[test]
    fn test_read_files() {
	let dir = tempfile::tempdir().unwrap();
	let judgments_path = dir.path().join( "judgments.csv" );
	std::fs::write( &judgments_path, "items,p1\nxvx,0.25\n" ).unwrap();
	let judgments = read_judgments( judgments_path.to_str().unwrap(), &RowFormat::default() ).unwrap();
	assert_eq!( judgments, vec!( Judgment{ item: "XVX".to_string(), observed: 0.25 } ));

	let training_path = dir.path().join( "training.txt" );
	std::fs::write( &training_path, "XXVT\n\n  VJ \n" ).unwrap();
	let training = read_training( training_path.to_str().unwrap() ).unwrap();
	assert_eq!( training, vec!( "XXVT".to_string(), "VJ".to_string() ));

	let missing = dir.path().join( "missing.csv" );
	assert!( matches!( read_training( missing.to_str().unwrap() ), Err( DataError::Io{ .. } )));
    }

    #[test]
    fn test_write_model() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join( "model.json" );
	let model = model::FittedModel::train( corpus::pothos_alphabet(), corpus::POTHOS_TRAINING ).unwrap();
	write_model( &model, path.to_str().unwrap() ).unwrap();

	let written: serde_json::Value = serde_json::from_str( &std::fs::read_to_string( &path ).unwrap() ).unwrap();
	assert_eq!( written["alphabet"], "XJVT" );
	assert_eq!( written["entropies"].as_object().unwrap().len(), 5 );
    }
}
