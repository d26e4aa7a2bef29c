//! Standard normal density and distribution.
//!
//! The distribution uses Hart's double precision rational approximation,
//! accurate to about 1e-14 in absolute terms, so that Black prices
//! can be differentiated numerically at small bumps.

/// 1 / sqrt(2 * pi)
const FRAC_1_SQRT_2PI: f64 = 0.398_942_280_401_432_7;

/// sqrt(2 * pi)
const SQRT_2PI: f64 = 2.506_628_274_631_000_7;

/// Beyond this the lower tail underflows.
const TAIL_CUTOFF: f64 = 37.0;

/// Switch from the rational form to the continued fraction.
const RATIONAL_LIMIT: f64 = 7.071_067_811_865_47;

const NUMERATOR: [f64; 7] = [
    3.526_249_659_989_11e-2,
    0.700_383_064_443_688,
    6.373_962_203_531_65,
    33.912_866_078_383,
    112.079_291_497_871,
    221.213_596_169_931,
    220.206_867_912_376,
];

const DENOMINATOR: [f64; 8] = [
    8.838_834_764_831_84e-2,
    1.755_667_163_182_64,
    16.064_177_579_207,
    86.780_732_202_946_1,
    296.564_248_779_674,
    637.333_633_378_831,
    793.826_512_519_948,
    440.413_735_824_752,
];

fn horner(coefficients: &[f64], x: f64) -> f64 {
    coefficients.iter().fold(0.0, |acc, &c| acc * x + c)
}

/// `Φ(-|x|)`, the lower tail at distance `|x|`.
fn lower_tail(x: f64) -> f64 {
    let a = x.abs();
    if a > TAIL_CUTOFF {
        return 0.0;
    }
    let gauss = (-0.5 * a * a).exp();
    if a < RATIONAL_LIMIT {
        gauss * horner(&NUMERATOR, a) / horner(&DENOMINATOR, a)
    } else {
        let fraction = [4.0, 3.0, 2.0, 1.0]
            .iter()
            .fold(a + 0.65, |acc, &k| a + k / acc);
        gauss / fraction / SQRT_2PI
    }
}

/// Standard normal cumulative distribution `P(X <= x)`.
///
/// # Examples
/// ```
/// use pricer_models::analytical::distributions::norm_cdf;
///
/// assert_eq!(norm_cdf(0.0), 0.5);
/// assert!((norm_cdf(1.0) - 0.841_344_746_068_542_9).abs() < 1e-14);
/// ```
#[inline]
pub fn norm_cdf(x: f64) -> f64 {
    let tail = lower_tail(x);
    if x > 0.0 {
        1.0 - tail
    } else {
        tail
    }
}

/// Standard normal density `exp(-x² / 2) / sqrt(2π)`.
///
/// # Examples
/// ```
/// use pricer_models::analytical::distributions::norm_pdf;
///
/// assert!((norm_pdf(0.0) - 0.398_942_280_401_432_7).abs() < 1e-16);
/// ```
#[inline]
pub fn norm_pdf(x: f64) -> f64 {
    FRAC_1_SQRT_2PI * (-0.5 * x * x).exp()
}
