//! # Quantity Module
//!
//! Ingredient quantities are fractional in the kitchen ("0.25 kg of onion per
//! pot") but must never drift. `Quantity` stores thousandths of a unit in an
//! `i64`, the same way [`Money`](crate::money::Money) stores cents.
//!
//! ```text
//!   entered      stored (milli)     displayed
//!   ───────      ──────────────     ─────────
//!   "0.25"   ──►       250      ──►   0.25
//!   "3"      ──►     3_000      ──►   3
//!   "1.125"  ──►     1_125      ──►   1.125
//! ```
//!
//! The unit itself (kg, l, unit, ...) is free text on the ingredient.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub};
use ts_rs::TS;

use crate::error::ValidationError;

/// An amount of some ingredient, in thousandths of its unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export)]
pub struct Quantity(i64);

impl Quantity {
    /// Thousandths per whole unit.
    pub const SCALE: i64 = 1_000;

    #[inline]
    pub const fn from_milli(milli: i64) -> Self {
        Quantity(milli)
    }

    /// Creates a quantity of whole units.
    #[inline]
    pub const fn from_units(units: i64) -> Self {
        Quantity(units * Self::SCALE)
    }

    #[inline]
    pub const fn milli(&self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Quantity(0)
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Scales a per-batch quantity by a batch multiplier.
    ///
    /// Returns `None` on overflow.
    #[inline]
    pub const fn checked_scale(&self, multiplier: i64) -> Option<Quantity> {
        match self.0.checked_mul(multiplier) {
            Some(v) => Some(Quantity(v)),
            None => None,
        }
    }

    /// Returns `None` on overflow.
    #[inline]
    pub const fn checked_add(&self, other: Quantity) -> Option<Quantity> {
        match self.0.checked_add(other.0) {
            Some(v) => Some(Quantity(v)),
            None => None,
        }
    }

    /// Parses a decimal amount such as `"0.25"` or `"3"`.
    ///
    /// At most three decimal places are accepted; negative amounts are
    /// rejected.
    ///
    /// ## Example
    /// ```rust
    /// use caribe_core::quantity::Quantity;
    ///
    /// assert_eq!(Quantity::parse("0.25").unwrap().milli(), 250);
    /// assert_eq!(Quantity::parse("12").unwrap().milli(), 12_000);
    /// assert!(Quantity::parse("1.2345").is_err());
    /// assert!(Quantity::parse("-1").is_err());
    /// ```
    pub fn parse(input: &str) -> Result<Quantity, ValidationError> {
        let invalid = |reason: &str| ValidationError::InvalidFormat {
            field: "quantity".to_string(),
            reason: reason.to_string(),
        };

        let input = input.trim();
        if input.is_empty() {
            return Err(ValidationError::Required {
                field: "quantity".to_string(),
            });
        }
        if input.starts_with('-') {
            return Err(ValidationError::Negative {
                field: "quantity".to_string(),
            });
        }

        let (whole, frac) = match input.split_once('.') {
            Some((w, f)) => (w, f),
            None => (input, ""),
        };
        if frac.len() > 3 {
            return Err(invalid("at most three decimal places"));
        }
        let digits_only = |s: &str| s.chars().all(|c| c.is_ascii_digit());
        if !digits_only(whole) || !digits_only(frac) || (whole.is_empty() && frac.is_empty()) {
            return Err(invalid("must be a decimal number"));
        }

        let whole: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid("too large"))?
        };
        let frac_milli: i64 = if frac.is_empty() {
            0
        } else {
            // "25" → 250, "5" → 500
            format!("{:0<3}", frac)
                .parse()
                .map_err(|_| invalid("must be a decimal number"))?
        };

        whole
            .checked_mul(Self::SCALE)
            .and_then(|w| w.checked_add(frac_milli))
            .map(Quantity)
            .ok_or_else(|| invalid("too large"))
    }
}

/// Shortest decimal form: `1.25`, `3`, `0.005`.
impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let whole = abs / Self::SCALE as u64;
        let frac = abs % Self::SCALE as u64;
        if frac == 0 {
            return write!(f, "{}{}", sign, whole);
        }
        let frac = format!("{:03}", frac);
        write!(f, "{}{}.{}", sign, whole, frac.trim_end_matches('0'))
    }
}

impl Add for Quantity {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Quantity(self.0 + other.0)
    }
}

impl AddAssign for Quantity {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Quantity {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Quantity(self.0 - other.0)
    }
}
