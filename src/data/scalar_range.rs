//! `ScalarRange`: an inclusive, optionally open-ended interval of `f64`.
//!
//! Textual forms: `"none"`, `"all"`, `"v"` (exact value), `"lo:hi"`,
//! `"lo:"` (lower bound only) and `":hi"` (upper bound only).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum ScalarRange {
    /// Matches nothing.
    #[default]
    None,
    /// `x >= lo`
    GreaterEq(f64),
    /// `x <= hi`
    LessEq(f64),
    /// `lo <= x <= hi`
    Between(f64, f64),
    /// Matches everything.
    Always,
}

impl ScalarRange {
    /// Bounded range; an inverted pair yields [`ScalarRange::None`].
    pub fn between(lo: f64, hi: f64) -> Self {
        if lo <= hi {
            ScalarRange::Between(lo, hi)
        } else {
            ScalarRange::None
        }
    }

    pub fn contains(&self, x: f64) -> bool {
        match *self {
            ScalarRange::None => false,
            ScalarRange::GreaterEq(lo) => x >= lo,
            ScalarRange::LessEq(hi) => x <= hi,
            ScalarRange::Between(lo, hi) => lo <= x && x <= hi,
            ScalarRange::Always => true,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ScalarRange::None)
    }

    /// Lower bound, `-inf` when unbounded below.
    pub fn min(&self) -> f64 {
        match *self {
            ScalarRange::GreaterEq(lo) | ScalarRange::Between(lo, _) => lo,
            ScalarRange::None => f64::INFINITY,
            _ => f64::NEG_INFINITY,
        }
    }

    /// Upper bound, `+inf` when unbounded above.
    pub fn max(&self) -> f64 {
        match *self {
            ScalarRange::LessEq(hi) | ScalarRange::Between(_, hi) => hi,
            ScalarRange::None => f64::NEG_INFINITY,
            _ => f64::INFINITY,
        }
    }
}

impl fmt::Display for ScalarRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ScalarRange::None => write!(f, "none"),
            ScalarRange::GreaterEq(lo) => write!(f, "{lo}:"),
            ScalarRange::LessEq(hi) => write!(f, ":{hi}"),
            ScalarRange::Between(lo, hi) if lo == hi => write!(f, "{lo}"),
            ScalarRange::Between(lo, hi) => write!(f, "{lo}:{hi}"),
            ScalarRange::Always => write!(f, "all"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot parse scalar range from `{0}`")]
pub struct ParseScalarRangeError(String);

impl FromStr for ScalarRange {
    type Err = ParseScalarRangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let err = || ParseScalarRangeError(s.to_string());
        let num = |t: &str| t.trim().parse::<f64>().map_err(|_| err());
        match s {
            "none" => return Ok(ScalarRange::None),
            "all" | ":" => return Ok(ScalarRange::Always),
            _ => {}
        }
        match s.split_once(':') {
            None => {
                let v = num(s)?;
                Ok(ScalarRange::Between(v, v))
            }
            Some((lo, hi)) => match (lo.trim().is_empty(), hi.trim().is_empty()) {
                (false, true) => Ok(ScalarRange::GreaterEq(num(lo)?)),
                (true, false) => Ok(ScalarRange::LessEq(num(hi)?)),
                (false, false) => Ok(ScalarRange::between(num(lo)?, num(hi)?)),
                (true, true) => Err(err()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_forms() {
        assert_eq!("0.5:2".parse::<ScalarRange>().unwrap(), ScalarRange::Between(0.5, 2.0));
        assert_eq!("3:".parse::<ScalarRange>().unwrap(), ScalarRange::GreaterEq(3.0));
        assert_eq!(":-1".parse::<ScalarRange>().unwrap(), ScalarRange::LessEq(-1.0));
        assert_eq!("7".parse::<ScalarRange>().unwrap(), ScalarRange::Between(7.0, 7.0));
        assert_eq!("all".parse::<ScalarRange>().unwrap(), ScalarRange::Always);
        assert_eq!("none".parse::<ScalarRange>().unwrap(), ScalarRange::None);
        assert_eq!("5:1".parse::<ScalarRange>().unwrap(), ScalarRange::None);
        assert!("a:b".parse::<ScalarRange>().is_err());
    }

    #[test]
    fn contains_bounds_inclusive() {
        let r = ScalarRange::between(1.0, 2.0);
        assert!(r.contains(1.0) && r.contains(2.0));
        assert!(!r.contains(2.000001));
        assert!(ScalarRange::GreaterEq(0.0).contains(1e9));
        assert!(!ScalarRange::None.contains(0.0));
        assert!(ScalarRange::Always.contains(f64::NEG_INFINITY));
        assert_eq!(ScalarRange::LessEq(4.0).min(), f64::NEG_INFINITY);
    }

    #[test]
    fn display_reparses() {
        for r in [
            ScalarRange::Between(0.25, 4.0),
            ScalarRange::GreaterEq(1.5),
            ScalarRange::LessEq(2.0),
            ScalarRange::Between(3.0, 3.0),
            ScalarRange::Always,
            ScalarRange::None,
        ] {
            assert_eq!(r.to_string().parse::<ScalarRange>().unwrap(), r);
        }
    }
}
