//! Nagios-style thresholds
//!
//! A threshold is written on the command line either as a single number, which
//! is an upper bound by default:
//!
//! ```plain
//! 5      # breach if the result is > 5
//! ```
//!
//! or as a range, optionally inverted with a leading `@`:
//!
//! ```plain
//! 3:5    # breach if the result is < 3 or > 5
//! 3:     # breach if the result is < 3
//! @3:5   # breach if 3 <= result <= 5
//! ```
//!
//! Boundaries are inclusive: a result equal to a boundary never breaches a
//! normal threshold.

use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

use crate::perfdata::fmt_number;

lazy_static! {
    static ref RANGE: Regex = Regex::new(r"^(@)?(-?\d+(?:\.\d+)?):(-?\d+(?:\.\d+)?)?$").unwrap();
    static ref SIMPLE: Regex = Regex::new(r"^-?\d+(?:\.\d+)?$").unwrap();
}

/// The grammar quoted back at people who get it wrong
pub const GRAMMAR: &str = "[@][start:]end";

/// Errors from building or evaluating a `Threshold`
///
/// These are always the fault of whoever supplied the threshold, so the
/// engine reports them as usage errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ThresholdError {
    #[error("{}threshold not defined", label(.name))]
    Missing { name: String },

    #[error("invalid {}threshold '{spec}', must be in nagios format {}", label(.name), GRAMMAR)]
    Syntax { name: String, spec: String },

    #[error("invalid {}threshold '{value}', may not be negative", label(.name))]
    Negative { name: String, value: f64 },

    #[error("invalid {}threshold '{value}', must be an integer", label(.name))]
    NotInteger { name: String, value: f64 },

    #[error(
        "invalid {}threshold range, lower bound {lower} is greater than upper bound {upper}",
        label(.name)
    )]
    Inverted { name: String, lower: f64, upper: f64 },

    #[error("invalid {}threshold '{value}', may not be less than {min}", label(.name))]
    BelowMin { name: String, value: f64, min: f64 },

    #[error("invalid {}threshold '{value}', may not be greater than {max}", label(.name))]
    AboveMax { name: String, value: f64, max: f64 },

    #[error("non-numeric result '{value}' given to {}threshold", label(.name))]
    NotNumeric { name: String, value: String },
}

fn label(name: &str) -> String {
    if name.is_empty() {
        String::new()
    } else {
        format!("{} ", name)
    }
}

/// Which bound a bare number sets
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Simple {
    Upper,
    Lower,
}

impl Default for Simple {
    fn default() -> Simple {
        Simple::Upper
    }
}

impl FromStr for Simple {
    type Err = String;

    fn from_str(s: &str) -> Result<Simple, String> {
        match s {
            "upper" => Ok(Simple::Upper),
            "lower" => Ok(Simple::Lower),
            _ => Err(format!("simple must be 'upper' or 'lower', not '{}'", s)),
        }
    }
}

/// One end of a threshold's range
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Boundary {
    Lower,
    Upper,
}

impl FromStr for Boundary {
    type Err = String;

    fn from_str(s: &str) -> Result<Boundary, String> {
        match s {
            "lower" => Ok(Boundary::Lower),
            "upper" => Ok(Boundary::Upper),
            _ => Err(format!("boundary must be 'lower' or 'upper', not '{}'", s)),
        }
    }
}

/// Policy applied while parsing a threshold
///
/// The defaults match what most checks want: a positive whole number that is
/// an upper bound when written without a colon.
#[derive(Clone, Debug, PartialEq)]
pub struct ThresholdOptions {
    /// Used in error messages, e.g. "warning"
    pub name: String,
    pub simple: Simple,
    /// Reject negative boundaries
    pub positive: bool,
    /// Reject fractional boundaries
    pub integer: bool,
    /// Absolute floor every boundary must respect
    pub min: Option<f64>,
    /// Absolute ceiling every boundary must respect
    pub max: Option<f64>,
    /// Blank input means "always pass" instead of an error
    pub optional: bool,
}

impl Default for ThresholdOptions {
    fn default() -> ThresholdOptions {
        ThresholdOptions {
            name: String::new(),
            simple: Simple::Upper,
            positive: true,
            integer: true,
            min: None,
            max: None,
            optional: false,
        }
    }
}

impl ThresholdOptions {
    pub fn new() -> ThresholdOptions {
        ThresholdOptions::default()
    }

    pub fn name<S: Into<String>>(mut self, name: S) -> ThresholdOptions {
        self.name = name.into();
        self
    }

    pub fn simple(mut self, simple: Simple) -> ThresholdOptions {
        self.simple = simple;
        self
    }

    pub fn positive(mut self, positive: bool) -> ThresholdOptions {
        self.positive = positive;
        self
    }

    pub fn integer(mut self, integer: bool) -> ThresholdOptions {
        self.integer = integer;
        self
    }

    pub fn min(mut self, min: f64) -> ThresholdOptions {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> ThresholdOptions {
        self.max = Some(max);
        self
    }

    pub fn optional(mut self, optional: bool) -> ThresholdOptions {
        self.optional = optional;
        self
    }
}

/// An inclusive numeric range that a check result must stay in (or, when
/// inverted, stay out of)
#[derive(Clone, Debug, PartialEq)]
pub struct Threshold {
    lower: Option<f64>,
    upper: Option<f64>,
    invert: bool,
    opts: ThresholdOptions,
}

impl Threshold {
    /// Parse `spec` according to `opts`
    pub fn parse(spec: &str, opts: &ThresholdOptions) -> Result<Threshold, ThresholdError> {
        let spec = spec.trim();
        let mut threshold = Threshold {
            lower: None,
            upper: None,
            invert: false,
            opts: opts.clone(),
        };

        if spec.is_empty() {
            if opts.optional {
                debug!("no {}threshold given, always passing", label(&opts.name));
                return Ok(threshold);
            }
            return Err(ThresholdError::Missing {
                name: opts.name.clone(),
            });
        }

        if let Some(caps) = RANGE.captures(spec) {
            threshold.invert = caps.get(1).is_some();
            threshold.lower = Some(number(&caps[2], spec, opts)?);
            threshold.upper = match caps.get(3) {
                Some(end) => Some(number(end.as_str(), spec, opts)?),
                None => None,
            };
        } else if SIMPLE.is_match(spec) {
            let bound = number(spec, spec, opts)?;
            match opts.simple {
                Simple::Lower => threshold.lower = Some(bound),
                Simple::Upper => threshold.upper = Some(bound),
            }
        } else {
            return Err(ThresholdError::Syntax {
                name: opts.name.clone(),
                spec: spec.to_owned(),
            });
        }

        threshold.validate()?;
        debug!(
            "parsed {}threshold '{}' as lower={:?} upper={:?} invert={}",
            label(&opts.name),
            spec,
            threshold.lower,
            threshold.upper,
            threshold.invert
        );
        Ok(threshold)
    }

    /// A threshold with no bounds, nothing ever breaches it
    pub fn always_pass() -> Threshold {
        Threshold {
            lower: None,
            upper: None,
            invert: false,
            opts: ThresholdOptions::default().optional(true),
        }
    }

    fn validate(&self) -> Result<(), ThresholdError> {
        let name = &self.opts.name;
        for value in self.bounds() {
            if self.opts.positive && value < 0.0 {
                return Err(ThresholdError::Negative {
                    name: name.clone(),
                    value,
                });
            }
            if self.opts.integer && value.fract() != 0.0 {
                return Err(ThresholdError::NotInteger {
                    name: name.clone(),
                    value,
                });
            }
        }

        if let (Some(lower), Some(upper)) = (self.lower, self.upper) {
            if lower > upper {
                return Err(ThresholdError::Inverted {
                    name: name.clone(),
                    lower,
                    upper,
                });
            }
        }

        for value in self.bounds() {
            if let Some(min) = self.opts.min {
                if value < min {
                    return Err(ThresholdError::BelowMin {
                        name: name.clone(),
                        value,
                        min,
                    });
                }
            }
            if let Some(max) = self.opts.max {
                if value > max {
                    return Err(ThresholdError::AboveMax {
                        name: name.clone(),
                        value,
                        max,
                    });
                }
            }
        }
        Ok(())
    }

    fn bounds(&self) -> impl Iterator<Item = f64> {
        self.lower.into_iter().chain(self.upper)
    }

    /// True if `result` breaches this threshold
    pub fn check(&self, result: f64) -> bool {
        let outside = self.lower.map_or(false, |lower| result < lower)
            || self.upper.map_or(false, |upper| result > upper);
        if self.invert && !self.is_always_pass() {
            !outside
        } else {
            outside
        }
    }

    /// Like `check`, for results that arrive as text
    pub fn check_value(&self, result: &str) -> Result<bool, ThresholdError> {
        let value = result
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| ThresholdError::NotNumeric {
                name: self.opts.name.clone(),
                value: result.to_owned(),
            })?;
        Ok(self.check(value))
    }

    /// Describe how `result` breaches this threshold, if it does
    pub fn breach(&self, result: f64) -> Option<String> {
        if !self.check(result) {
            return None;
        }
        let result_str = fmt_number(Some(result));
        if self.invert {
            return Some(format!("{} in {}", result_str, self));
        }
        match self.lower {
            Some(lower) if result < lower => {
                Some(format!("{} < {}", result_str, fmt_number(Some(lower))))
            }
            _ => Some(format!("{} > {}", result_str, fmt_number(self.upper))),
        }
    }

    pub fn lower(&self) -> Option<f64> {
        self.lower
    }

    pub fn upper(&self) -> Option<f64> {
        self.upper
    }

    pub fn bound(&self, boundary: Boundary) -> Option<f64> {
        match boundary {
            Boundary::Lower => self.lower,
            Boundary::Upper => self.upper,
        }
    }

    pub fn is_inverted(&self) -> bool {
        self.invert
    }

    pub fn is_always_pass(&self) -> bool {
        self.lower.is_none() && self.upper.is_none()
    }

    pub fn name(&self) -> &str {
        &self.opts.name
    }

    pub fn options(&self) -> &ThresholdOptions {
        &self.opts
    }
}

fn number(raw: &str, spec: &str, opts: &ThresholdOptions) -> Result<f64, ThresholdError> {
    raw.parse().map_err(|_| ThresholdError::Syntax {
        name: opts.name.clone(),
        spec: spec.to_owned(),
    })
}

/// Parse with the default options
impl FromStr for Threshold {
    type Err = ThresholdError;

    fn from_str(s: &str) -> Result<Threshold, ThresholdError> {
        Threshold::parse(s, &ThresholdOptions::default())
    }
}

/// Renders back into the nagios grammar, always-pass thresholds are blank
impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.invert {
            write!(f, "@")?;
        }
        match (self.lower, self.upper) {
            (Some(_), _) => write!(
                f,
                "{}:{}",
                fmt_number(self.lower),
                fmt_number(self.upper)
            ),
            (None, Some(_)) => write!(f, "{}", fmt_number(self.upper)),
            (None, None) => Ok(()),
        }
    }
}

#[cfg(test)]
mod test {
    use assert_matches::assert_matches;

    use super::*;

    const EPSILON: f64 = 0.001;

    fn lower_opts() -> ThresholdOptions {
        ThresholdOptions::new().simple(Simple::Lower)
    }

    #[test]
    fn simple_upper_is_inclusive() {
        for n in &[0.0, 1.0, 5.0, 100.0] {
            let t: Threshold = fmt_number(Some(*n)).parse().unwrap();
            assert_eq!(t.upper(), Some(*n));
            assert_eq!(t.lower(), None);
            assert!(!t.check(*n), "{} breached itself", n);
            assert!(!t.check(n - EPSILON));
            assert!(t.check(n + EPSILON));
        }
    }

    #[test]
    fn simple_lower_is_inclusive() {
        for n in &[0.0, 1.0, 5.0, 100.0] {
            let t = Threshold::parse(&fmt_number(Some(*n)), &lower_opts()).unwrap();
            assert_eq!(t.lower(), Some(*n));
            assert!(!t.check(*n));
            assert!(t.check(n - EPSILON));
            assert!(!t.check(n + EPSILON));
        }
    }

    #[test]
    fn range_breaches_outside() {
        let t: Threshold = "3:5".parse().unwrap();
        for x in &[2.9, 5.1, -1.0, 100.0] {
            assert!(t.check(*x), "{} should breach 3:5", x);
        }
        for x in &[3.0, 4.0, 5.0] {
            assert!(!t.check(*x), "{} should not breach 3:5", x);
        }
    }

    #[test]
    fn range_without_end_is_a_lower_bound() {
        let t: Threshold = "10:".parse().unwrap();
        assert_eq!(t.lower(), Some(10.0));
        assert_eq!(t.upper(), None);
        assert!(t.check(9.0));
        assert!(!t.check(1_000_000.0));
    }

    #[test]
    fn inverted_range_breaches_inside() {
        let t: Threshold = "@3:5".parse().unwrap();
        assert!(t.is_inverted());
        for x in &[3.0, 4.0, 5.0] {
            assert!(t.check(*x), "{} should breach @3:5", x);
        }
        for x in &[2.9, 5.1] {
            assert!(!t.check(*x), "{} should not breach @3:5", x);
        }
    }

    #[test]
    fn inverted_range_is_ordered() {
        assert_matches!(
            "@5:3".parse::<Threshold>(),
            Err(ThresholdError::Inverted { .. })
        );
    }

    #[test]
    fn whole_numbers_round_trip() {
        for n in 0..200 {
            let t: Threshold = n.to_string().parse().unwrap();
            assert!(!t.check(f64::from(n)));
        }
    }

    #[test]
    fn min_and_max_are_enforced() {
        assert_matches!(
            Threshold::parse("4", &ThresholdOptions::new().max(3.0)),
            Err(ThresholdError::AboveMax { .. })
        );
        assert_matches!(
            Threshold::parse("2", &ThresholdOptions::new().min(3.0)),
            Err(ThresholdError::BelowMin { .. })
        );
        assert_matches!(
            Threshold::parse("1:4", &ThresholdOptions::new().min(0.0).max(3.0)),
            Err(ThresholdError::AboveMax { .. })
        );
        Threshold::parse("3", &ThresholdOptions::new().min(3.0).max(3.0)).unwrap();
    }

    #[test]
    fn positive_and_integer_by_default() {
        assert_matches!(
            "-1".parse::<Threshold>(),
            Err(ThresholdError::Negative { .. })
        );
        assert_matches!(
            "1.1".parse::<Threshold>(),
            Err(ThresholdError::NotInteger { .. })
        );

        let relaxed = ThresholdOptions::new().positive(false).integer(false);
        let t = Threshold::parse("-1.5:2.5", &relaxed).unwrap();
        assert_eq!(t.lower(), Some(-1.5));
        assert_eq!(t.upper(), Some(2.5));
    }

    #[test]
    fn descending_range_is_rejected() {
        assert_matches!(
            "5:3".parse::<Threshold>(),
            Err(ThresholdError::Inverted { .. })
        );
    }

    #[test]
    fn garbage_is_a_syntax_error() {
        for spec in &["abc", "5abc", "@5", ":5", "5:6:7", "1e3", "~:5"] {
            let err = Threshold::parse(spec, &ThresholdOptions::new().name("warning"))
                .unwrap_err();
            assert_matches!(err, ThresholdError::Syntax { .. });
            let msg = err.to_string();
            assert!(msg.contains("warning"), "{}", msg);
            assert!(msg.contains(GRAMMAR), "{}", msg);
        }
    }

    #[test]
    fn blank_depends_on_optional() {
        assert_matches!(
            "".parse::<Threshold>(),
            Err(ThresholdError::Missing { .. })
        );
        let t = Threshold::parse("  ", &ThresholdOptions::new().optional(true)).unwrap();
        assert!(t.is_always_pass());
        assert!(!t.check(f64::MAX));
        assert!(!t.check(-f64::MAX));
    }

    #[test]
    fn check_value_coerces() {
        let t: Threshold = "5".parse().unwrap();
        assert_eq!(t.check_value(" 6 "), Ok(true));
        assert_eq!(t.check_value("4.5"), Ok(false));
        assert_matches!(t.check_value("six"), Err(ThresholdError::NotNumeric { .. }));
        assert_matches!(t.check_value("NaN"), Err(ThresholdError::NotNumeric { .. }));
    }

    #[test]
    fn breach_descriptions() {
        let upper: Threshold = "5".parse().unwrap();
        assert_eq!(upper.breach(6.0), Some("6 > 5".to_owned()));
        assert_eq!(upper.breach(5.0), None);

        let range: Threshold = "3:5".parse().unwrap();
        assert_eq!(range.breach(2.0), Some("2 < 3".to_owned()));

        let inverted: Threshold = "@3:5".parse().unwrap();
        assert_eq!(inverted.breach(4.0), Some("4 in @3:5".to_owned()));
    }

    #[test]
    fn display_round_trips() {
        for spec in &["5", "3:5", "3:", "@3:5", "@0:"] {
            let t: Threshold = spec.parse().unwrap();
            assert_eq!(&t.to_string(), spec);
        }
        let lower = Threshold::parse("7", &lower_opts()).unwrap();
        assert_eq!(lower.to_string(), "7:");
        assert_eq!(Threshold::always_pass().to_string(), "");
    }

    #[test]
    fn inverted_lower_bound_breaches_at_and_above() {
        let t: Threshold = "@3:".parse().unwrap();
        assert!(!t.check(2.9));
        assert!(t.check(3.0));
        assert!(t.check(1e9));
        assert_eq!(t.breach(2.9), None);
        assert_eq!(t.breach(5.0), Some("5 in @3:".to_owned()));
    }
}
