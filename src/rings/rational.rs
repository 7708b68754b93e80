use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Zero};
use std::fmt;
use std::fmt::Display;
use std::ops;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid rational literal: {0:?}")]
pub struct ParseRationalError(String);

/// Exact fraction over `BigInt`, kept normalized: gcd-reduced with a
/// positive denominator. Satisfies the matrix `Element` bound, so matrices
/// of rationals get exact determinants and inverses.
#[derive(Debug, Clone)]
pub struct Rational {
    num: BigInt,
    den: BigInt,
}

impl Rational {
    /// Panics on a zero denominator.
    pub fn new(num: BigInt, den: BigInt) -> Self {
        if den.is_zero() {
            panic!("Denominator cannot be zero");
        }

        let g = &num.gcd(&den);
        let num = num / g;
        let den = den / g;

        if den < BigInt::zero() {
            return Self {
                num: -num,
                den: -den,
            };
        }
        Self { num, den }
    }

    pub fn from_integer(value: i64) -> Self {
        Self {
            num: value.into(),
            den: BigInt::one(),
        }
    }
}

impl FromStr for Rational {
    type Err = ParseRationalError;

    /// Accepts `"a/b"` or a plain integer `"a"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (num, den) = match s.split_once('/') {
            Some((num, den)) => (num, den),
            None => (s, "1"),
        };

        let num = BigInt::parse_bytes(num.trim().as_bytes(), 10)
            .ok_or_else(|| ParseRationalError(s.into()))?;
        let den = BigInt::parse_bytes(den.trim().as_bytes(), 10)
            .ok_or_else(|| ParseRationalError(s.into()))?;

        if den.is_zero() {
            return Err(ParseRationalError(s.into()));
        }
        Ok(Rational::new(num, den))
    }
}

impl ops::Add for Rational {
    type Output = Rational;

    fn add(self, rhs: Rational) -> Rational {
        if self.den == rhs.den {
            return Rational::new(self.num + rhs.num, self.den);
        }

        Rational::new(
            &self.num * &rhs.den + &rhs.num * &self.den,
            &self.den * &rhs.den,
        )
    }
}

impl ops::Sub for Rational {
    type Output = Rational;

    fn sub(self, rhs: Rational) -> Rational {
        self + (-rhs)
    }
}

impl ops::Mul for Rational {
    type Output = Rational;

    fn mul(self, rhs: Rational) -> Rational {
        Rational::new(self.num * rhs.num, self.den * rhs.den)
    }
}

impl ops::Div for Rational {
    type Output = Rational;

    fn div(self, rhs: Rational) -> Rational {
        Rational::new(self.num * rhs.den, self.den * rhs.num)
    }
}

impl ops::Neg for Rational {
    type Output = Rational;

    fn neg(self) -> Rational {
        Rational {
            num: -self.num,
            den: self.den,
        }
    }
}

impl Zero for Rational {
    fn zero() -> Rational {
        Rational {
            num: BigInt::zero(),
            den: BigInt::one(),
        }
    }

    fn is_zero(&self) -> bool {
        self.num.is_zero()
    }
}

impl One for Rational {
    fn one() -> Rational {
        Rational {
            num: BigInt::one(),
            den: BigInt::one(),
        }
    }
}

impl std::iter::Sum<Rational> for Rational {
    fn sum<I: Iterator<Item = Rational>>(iter: I) -> Rational {
        iter.fold(Rational::zero(), |acc, r| acc + r)
    }
}

impl PartialEq<Rational> for Rational {
    fn eq(&self, rhs: &Rational) -> bool {
        // both sides normalized, so compare fields directly
        self.num == rhs.num && self.den == rhs.den
    }
}

impl Eq for Rational {}

impl PartialEq<i64> for Rational {
    fn eq(&self, rhs: &i64) -> bool {
        self.num == &self.den * rhs
    }
}

impl Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den.is_one() {
            return write!(f, "{}", self.num);
        }
        write!(f, "{}/{}", self.num, self.den)
    }
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::dense::Matrix;

    fn rat(s: &str) -> Rational {
        s.parse().unwrap()
    }

    #[test]
    fn test_normalization() {
        assert_eq!(rat("-6/8"), rat("-3/4"));
        assert_eq!(rat("4/-8"), rat("-1/2"));
        assert_eq!(rat("10/5"), 2);
        assert_eq!(Rational::from_integer(-7), rat("-7"));
    }

    #[test]
    fn test_parse_errors() {
        assert!("".parse::<Rational>().is_err());
        assert!("a/b".parse::<Rational>().is_err());
        assert!("1/0".parse::<Rational>().is_err());
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(rat("1/2") + rat("1/3"), rat("5/6"));
        assert_eq!(rat("1/2") - rat("1/3"), rat("1/6"));
        assert_eq!(rat("2/3") * rat("3/4"), rat("1/2"));
        assert_eq!(rat("2/3") / rat("4/3"), rat("1/2"));
        assert_eq!(-rat("1/2") + rat("1/2"), 0);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", rat("3/4")), "3/4");
        assert_eq!(format!("{}", rat("8/4")), "2");
        assert_eq!(format!("{}", rat("-1/3")), "-1/3");
    }

    #[test]
    fn test_rational_matrix() {
        let m = Matrix::from_rows(vec![
            vec![rat("1"), rat("2")],
            vec![rat("3"), rat("4")],
        ])
        .unwrap();

        let det = m.determinant().unwrap();
        assert_eq!(det, rat("-2"));

        let inv = m.inverse().unwrap();
        assert_eq!(
            inv.to_rows(),
            vec![
                vec![rat("-2"), rat("1")],
                vec![rat("3/2"), rat("-1/2")],
            ]
        );
        assert_eq!((&m * &inv).unwrap(), Matrix::identity(2));
    }
}
