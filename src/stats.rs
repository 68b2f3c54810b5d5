
use statrs::distribution::{ContinuousCDF, StudentsT};
use statrs::statistics::Statistics;
use thiserror::Error;

#[derive( Debug, Error, PartialEq )]
pub enum StatsError {
    #[error( "series differ in length ({0} vs {1})" )]
    LengthMismatch( usize, usize ),
    #[error( "need at least 3 points, got {0}" )]
    TooFewPoints( usize ),
    #[error( "a series has zero variance" )]
    ZeroVariance,
}

/// Pearson correlation and its two-sided significance
#[derive( Debug, Clone, Copy, PartialEq )]
pub struct Correlation {
    pub coefficient: f64,
    pub p_value: f64,
    pub n: usize,
}

/// Pearson's r between two series with the p-value of the null hypothesis r = 0,
/// using Student's t with n - 2 degrees of freedom.
pub fn correlate( xs: &[f64], ys: &[f64] ) -> Result<Correlation, StatsError> {
    if xs.len() != ys.len() {
	return Err( StatsError::LengthMismatch( xs.len(), ys.len() ));
    }
    let n = xs.len();
    if n < 3 {
	return Err( StatsError::TooFewPoints( n ));
    }

    // sample estimates; the n - 1 factors cancel in r
    let var_x = xs.variance();
    let var_y = ys.variance();
    if var_x == 0.0 || var_y == 0.0 {
	return Err( StatsError::ZeroVariance );
    }
    let covariance = xs.covariance( ys );

    // rounding can push |r| slightly past 1
    let coefficient = (covariance / (var_x * var_y).sqrt()).clamp( -1.0, 1.0 );
    let p_value = two_sided_p_value( coefficient, n );
    Ok( Correlation{ coefficient, p_value, n } )
}

/// Needs n >= 3 so the t distribution has at least one degree of freedom
fn two_sided_p_value( r: f64, n: usize ) -> f64 {
    if r.abs() >= 1.0 {
	return 0.0;
    }
    let freedom = (n - 2) as f64;
    let t = r * (freedom / (1.0 - r * r)).sqrt();
    let student = StudentsT::new( 0.0, 1.0, freedom ).expect( "positive degrees of freedom" );
    let p = 2.0 * (1.0 - student.cdf( t.abs() ));
    p.clamp( 0.0, 1.0 )
}

#[cfg(test)]
mod test {
    use super::*;

    macro_rules! assert_approx {
	($real:expr, $expected:expr, $delta:expr) => {
	    if $real < $expected - $delta || $real > $expected + $delta {
		panic!( "Violate {:.4} == {:.4} (+-{:.4})", $real, $expected, $delta );
	    }
	}
    }

    #[test]
    fn test_known_correlation() {
	let result = correlate( &[1.0, 2.0, 3.0, 4.0, 5.0], &[2.0, 4.0, 5.0, 4.0, 5.0] ).unwrap();
	assert_eq!( result.n, 5 );
	assert_approx!( result.coefficient, 0.7745966692, 1e-9 );
	assert_approx!( result.p_value, 0.1240270627, 1e-6 );
    }

    #[test]
    fn test_perfect_correlation() {
	let xs = [1.0, 2.0, 3.0, 4.0];
	let up: Vec<f64> = xs.iter().map( |x| 2.0 * x + 1.0 ).collect();
	let down: Vec<f64> = xs.iter().map( |x| -0.5 * x ).collect();

	let result = correlate( &xs, &up ).unwrap();
	assert_approx!( result.coefficient, 1.0, 1e-12 );
	assert_approx!( result.p_value, 0.0, 1e-9 );

	let result = correlate( &xs, &down ).unwrap();
	assert_approx!( result.coefficient, -1.0, 1e-12 );
	assert_approx!( result.p_value, 0.0, 1e-9 );
    }

    #[test]
    /// Symmetric about zero: uncorrelated data is not significant
    fn test_uncorrelated() {
	let result = correlate( &[1.0, 2.0, 3.0, 4.0, 5.0], &[1.0, 3.0, 5.0, 3.0, 1.0] ).unwrap();
	assert_approx!( result.coefficient, 0.0, 1e-12 );
	assert_approx!( result.p_value, 1.0, 1e-9 );
    }

    #[test]
    fn test_invalid_input() {
	assert_eq!( correlate( &[1.0, 2.0, 3.0], &[1.0, 2.0] ), Err( StatsError::LengthMismatch( 3, 2 )));
	assert_eq!( correlate( &[1.0, 2.0], &[1.0, 2.0] ), Err( StatsError::TooFewPoints( 2 )));
	assert_eq!( correlate( &[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0] ), Err( StatsError::ZeroVariance ));
	assert_eq!( correlate( &[1.0, 2.0, 3.0], &[4.0, 4.0, 4.0] ), Err( StatsError::ZeroVariance ));
    }
}
