// tuning-lab -- tuning systems and additive synthesis for acoustics demos
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Rational numbers are used for the exact frequency ratios of the historical tunings.

use std::{cmp::Ordering, fmt, ops};

use snafu::Snafu;

use crate::error::MAX_OCTAVE_REDUCTIONS;

/// Underlying integral type for the rational numbers.
type Int = i64;

/// A rational number, always fully normalized.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Rational {
    /// The numerator of the fraction.
    /// If the fraction is negative, the numerator will be made negative.
    num: Int,
    /// The denominator of the fraction, always positive.
    denom: Int,
}

impl Rational {
    // ==================== Constructors ====================

    /// Create a new rational from a potentially unnormalized fraction.
    ///
    /// # Panic
    ///
    /// Panics if the denominator is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use tuning_lab::rational::*;
    ///
    /// assert_eq!(Rational::new(6, 4), Rational::new(3, 2));
    /// assert_eq!(Rational::new(-10, -5), Rational::new(6, 3));
    /// assert_eq!(Rational::new(-6, 8), Rational::new(3, -4));
    /// ```
    pub fn new(num: Int, denom: Int) -> Rational {
        assert_ne!(denom, 0, "Denominator must not be zero");

        let sign = num.signum() * denom.signum();
        let div = gcd(num, denom);
        Rational {
            num: sign * num.abs() / div,
            denom: denom.abs() / div,
        }
    }

    pub fn from_int(int: Int) -> Rational {
        Rational { num: int, denom: 1 }
    }

    pub fn one() -> Rational {
        Rational::from_int(1)
    }

    /// The ratio of a pure octave.
    pub fn octave() -> Rational {
        Rational::from_int(2)
    }

    // ==================== Transformations ====================

    pub fn recip(self) -> Rational {
        Rational::new(self.denom, self.num)
    }

    /// Raise the ratio to an integral power, or `None` if numerator or
    /// denominator no longer fit the integer type.
    ///
    /// # Examples
    ///
    /// ```
    /// use tuning_lab::rational::*;
    ///
    /// let fifth = Rational::new(3, 2);
    /// assert_eq!(fifth.checked_pow(12), Some(Rational::new(531441, 4096)));
    /// assert_eq!(fifth.checked_pow(0), Some(Rational::one()));
    /// assert_eq!(fifth.checked_pow(60), None);
    /// ```
    pub fn checked_pow(self, exp: u32) -> Option<Rational> {
        Some(Rational {
            num: self.num.checked_pow(exp)?,
            denom: self.denom.checked_pow(exp)?,
        })
    }

    /// Fold a ratio into the octave `[reference, 2 * reference)` by halving,
    /// returning the folded ratio together with the number of halvings.
    /// Ratios already below the reference are returned unchanged.
    ///
    /// Returns `None` for non-positive inputs, on integer overflow, or when more
    /// halvings than the crate wide bound would be required.
    ///
    /// # Examples
    ///
    /// ```
    /// use tuning_lab::rational::*;
    ///
    /// let twelve_fifths = Rational::new(3, 2).checked_pow(12).unwrap();
    /// assert_eq!(
    ///     twelve_fifths.reduce_to_octave(Rational::one()),
    ///     Some((Rational::new(531441, 524288), 7))
    /// );
    /// ```
    pub fn reduce_to_octave(self, reference: Rational) -> Option<(Rational, u32)> {
        if self.num <= 0 || reference.num <= 0 {
            return None;
        }
        let upper = Rational::new(reference.num.checked_mul(2)?, reference.denom);
        let mut value = self;
        let mut halvings = 0;
        while value >= upper {
            if halvings == MAX_OCTAVE_REDUCTIONS {
                return None;
            }
            value = Rational::new(value.num, value.denom.checked_mul(2)?);
            halvings += 1;
        }
        Some((value, halvings))
    }

    // ==================== Destructors ====================

    pub fn numerator(self) -> Int {
        self.num
    }

    pub fn denominator(self) -> Int {
        self.denom
    }

    /// Closest floating point value of the fraction.
    ///
    /// # Examples
    ///
    /// ```
    /// use tuning_lab::rational::*;
    ///
    /// assert_eq!(Rational::new(5, 4).to_f64(), 1.25);
    /// assert_eq!(Rational::octave().to_f64(), 2.0);
    /// ```
    pub fn to_f64(self) -> f64 {
        self.num as f64 / self.denom as f64
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.denom == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.denom)
        }
    }
}

/// # Examples
///
/// ```
/// use tuning_lab::rational::*;
///
/// assert_eq!(Rational::new(9, 8) * Rational::new(10, 9), Rational::new(5, 4));
/// assert_eq!(Rational::new(3, 2) * 2, Rational::from_int(3));
/// ```
impl ops::Mul for Rational {
    type Output = Rational;

    fn mul(self, rhs: Rational) -> Self::Output {
        Rational::new(self.num * rhs.num, self.denom * rhs.denom)
    }
}

impl ops::Div for Rational {
    type Output = Rational;

    fn div(self, rhs: Rational) -> Self::Output {
        self * rhs.recip()
    }
}

impl ops::Mul<Int> for Rational {
    type Output = Rational;

    fn mul(self, rhs: Int) -> Self::Output {
        Rational::new(self.num * rhs, self.denom)
    }
}

impl ops::Div<Int> for Rational {
    type Output = Rational;

    fn div(self, rhs: Int) -> Self::Output {
        Rational::new(self.num, self.denom * rhs)
    }
}

impl ops::MulAssign for Rational {
    fn mul_assign(&mut self, rhs: Rational) {
        *self = *self * rhs;
    }
}

impl ops::DivAssign for Rational {
    fn div_assign(&mut self, rhs: Rational) {
        *self = *self / rhs;
    }
}

impl PartialOrd for Rational {
    fn partial_cmp(&self, other: &Rational) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// ```
/// use tuning_lab::rational::*;
///
/// assert!(Rational::new(81, 64) > Rational::new(5, 4));
/// ```
impl Ord for Rational {
    fn cmp(&self, other: &Self) -> Ordering {
        // a / b < c / d
        // <=>
        // a * d < c * b
        let l = self.num as i128 * other.denom as i128;
        let r = other.num as i128 * self.denom as i128;
        l.cmp(&r)
    }
}

/// An error which can be returned when parsing a rational.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
pub enum ParseRationalError {
    #[snafu(display("{:?} is not an integer", part))]
    InvalidInt { part: String },
    #[snafu(display("The denominator must not be zero"))]
    ZeroDenominator,
    #[snafu(display("Expected a ratio of the form <int> or <int>/<int>, got {:?}", input))]
    Malformed { input: String },
}

/// # Examples
///
/// ```
/// use tuning_lab::rational::*;
///
/// assert_eq!("3/2".parse(), Ok(Rational::new(3, 2)));
/// assert_eq!("2".parse(), Ok(Rational::octave()));
/// assert!("1/0".parse::<Rational>().is_err());
/// assert!("1/2/3".parse::<Rational>().is_err());
/// ```
impl std::str::FromStr for Rational {
    type Err = ParseRationalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse_int = |part: &str| {
            part.trim()
                .parse::<Int>()
                .map_err(|_| ParseRationalError::InvalidInt {
                    part: part.to_string(),
                })
        };

        let mut parts = s.split('/');
        let numerator = parse_int(parts.next().unwrap_or(""))?;
        match (parts.next(), parts.next()) {
            (None, _) => Ok(Rational::from_int(numerator)),
            (Some(denominator_str), None) => {
                let denominator = parse_int(denominator_str)?;
                if denominator == 0 {
                    Err(ParseRationalError::ZeroDenominator)
                } else {
                    Ok(Rational::new(numerator, denominator))
                }
            }
            (Some(_), Some(_)) => Err(ParseRationalError::Malformed {
                input: s.to_string(),
            }),
        }
    }
}

/// Computes the greates common divisor of two numbers using euclids algorithm.
///
/// # Example
///
/// ```
/// use tuning_lab::rational::*;
///
/// assert_eq!(gcd(20, 15), 5);
/// assert_eq!(gcd(20, 19), 1);
/// assert_eq!(gcd(10, 0), 10);
/// assert_eq!(gcd(0, 10), 10);
/// assert_eq!(gcd(10, -10), 10);
/// ```
pub fn gcd(mut a: Int, mut b: Int) -> Int {
    // normalized inputs to be positive to guarantee that it terminates
    if a < 0 {
        a = -a
    }
    if b < 0 {
        b = -b
    }

    // Invariant: a >= b
    if a < b {
        std::mem::swap(&mut a, &mut b)
    }

    while b != 0 {
        let t = b;
        b = a % b;
        a = t;
    }
    a
}
