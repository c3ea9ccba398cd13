//! Standard aperture, shutter-speed and ISO scales.
//!
//! Every derived exposure setting snaps to one of these tables. Shutter
//! speeds are stored in seconds; the `1/N` and `N"` forms only exist at the
//! display boundary (see [`format_shutter`] and [`parse_shutter`]).

use crate::error::{DarkroomError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Membership tolerance for [`Scale::contains`].
const MEMBER_EPSILON: f64 = 1e-9;

/// Which physical quantity a scale holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScaleKind {
    Aperture,
    Shutter,
    Iso,
}

impl fmt::Display for ScaleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Aperture => "aperture",
            Self::Shutter => "shutter speed",
            Self::Iso => "ISO",
        })
    }
}

/// f-numbers, widest first. Full stops plus the common f/1.2 and f/1.8.
const APERTURE_VALUES: [f64; 13] = [
    1.0, 1.2, 1.4, 1.8, 2.0, 2.8, 4.0, 5.6, 8.0, 11.0, 16.0, 22.0, 32.0,
];

/// Exposure times in seconds, fastest first.
const SHUTTER_VALUES: [f64; 19] = [
    1.0 / 8000.0,
    1.0 / 4000.0,
    1.0 / 2000.0,
    1.0 / 1000.0,
    1.0 / 500.0,
    1.0 / 250.0,
    1.0 / 125.0,
    1.0 / 60.0,
    1.0 / 30.0,
    1.0 / 15.0,
    1.0 / 8.0,
    1.0 / 4.0,
    1.0 / 2.0,
    1.0,
    2.0,
    4.0,
    8.0,
    15.0,
    30.0,
];

const ISO_VALUES: [f64; 11] = [
    25.0, 50.0, 100.0, 125.0, 160.0, 200.0, 400.0, 800.0, 1600.0, 3200.0, 6400.0,
];

/// Legal aperture values.
pub const APERTURES: Scale = Scale::new(ScaleKind::Aperture, &APERTURE_VALUES);

/// Legal shutter speeds, in seconds.
pub const SHUTTERS: Scale = Scale::new(ScaleKind::Shutter, &SHUTTER_VALUES);

/// Legal film speeds.
pub const ISOS: Scale = Scale::new(ScaleKind::Iso, &ISO_VALUES);

/// An ordered, immutable, non-empty table of legal values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    kind: ScaleKind,
    values: &'static [f64],
}

impl Scale {
    const fn new(kind: ScaleKind, values: &'static [f64]) -> Self {
        assert!(!values.is_empty());
        Self { kind, values }
    }

    #[inline]
    pub fn kind(&self) -> ScaleKind {
        self.kind
    }

    /// Values in declared order.
    #[inline]
    pub fn values(&self) -> &'static [f64] {
        self.values
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The element with the smallest absolute difference from `target`.
    ///
    /// On an exact tie the element declared first wins: a candidate only
    /// replaces the current best when its distance is strictly smaller.
    /// Targets at or beyond either end return that end, which also keeps
    /// infinite and huge targets from collapsing into an all-way tie.
    /// A NaN target yields the first element.
    pub fn nearest(&self, target: f64) -> f64 {
        let lo = self.values.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = self.values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if target <= lo {
            return lo;
        }
        if target >= hi {
            return hi;
        }

        let mut best = self.values[0];
        let mut best_diff = (best - target).abs();
        for &v in &self.values[1..] {
            let diff = (v - target).abs();
            if diff < best_diff {
                best = v;
                best_diff = diff;
            }
        }
        best
    }

    /// Position of `value` in the table, if it is a member.
    pub fn index_of(&self, value: f64) -> Option<usize> {
        self.values
            .iter()
            .position(|&v| (v - value).abs() <= MEMBER_EPSILON)
    }

    /// True when `value` is a member of the table.
    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        self.index_of(value).is_some()
    }

    /// Return `value` unchanged if it is a member, otherwise a contract error.
    pub fn require(&self, value: f64) -> Result<f64> {
        if self.contains(value) {
            Ok(value)
        } else {
            Err(DarkroomError::NotInScale {
                kind: self.kind,
                value,
            })
        }
    }

    /// Move `delta` entries along the table from `value`, stopping at either end.
    pub fn step(&self, value: f64, delta: i32) -> Result<f64> {
        let idx = self.index_of(value).ok_or(DarkroomError::NotInScale {
            kind: self.kind,
            value,
        })?;
        let last = self.values.len() as i64 - 1;
        let target = (idx as i64 + delta as i64).clamp(0, last);
        Ok(self.values[target as usize])
    }
}

/// Format an exposure time: `1/N` below one second, `N"` from one second up.
pub fn format_shutter(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "0\"".to_string();
    }
    if seconds >= 1.0 {
        let rounded = (seconds * 10.0).round() / 10.0;
        format!("{}\"", rounded)
    } else {
        format!("1/{}", (1.0 / seconds).round() as u64)
    }
}

/// Parse `1/125`, `2`, `2s` or `2"` into seconds.
pub fn parse_shutter(text: &str) -> Result<f64> {
    let trimmed = text.trim();
    let body = trimmed
        .strip_suffix('"')
        .or_else(|| trimmed.strip_suffix('s'))
        .unwrap_or(trimmed)
        .trim();

    let parse = |s: &str| {
        s.trim()
            .parse::<f64>()
            .map_err(|_| DarkroomError::Parse(format!("invalid shutter speed '{}'", text)))
    };

    let seconds = match body.split_once('/') {
        Some((num, den)) => {
            let den = parse(den)?;
            if den == 0.0 {
                return Err(DarkroomError::Parse(format!(
                    "shutter speed '{}' divides by zero",
                    text
                )));
            }
            parse(num)? / den
        }
        None => parse(body)?,
    };

    if !seconds.is_finite() || seconds <= 0.0 {
        return Err(DarkroomError::Parse(format!(
            "shutter speed '{}' must be positive",
            text
        )));
    }
    Ok(seconds)
}

/// Format an f-number as `f/8` or `f/2.8`.
pub fn format_aperture(n: f64) -> String {
    if n.fract() == 0.0 {
        format!("f/{}", n as i64)
    } else {
        format!("f/{:.1}", n)
    }
}
