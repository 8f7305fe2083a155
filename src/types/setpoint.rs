// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Override setpoint type.
//!
//! The heater firmware accepts room overrides between 5.0 and 30.0 degrees
//! Celsius in 0.5 degree steps. Validation happens here, before any network
//! call, so an out-of-range write never reaches the device (which would
//! silently clamp or ignore it).

use std::fmt;

use crate::error::OverrideError;

/// A validated room override setpoint.
///
/// Stored internally in half-degree units, so the type is `Eq` and the wire
/// encoding is exact.
///
/// # Examples
///
/// ```
/// use lan2rf_lib::Setpoint;
///
/// let sp = Setpoint::new(19.5).unwrap();
/// assert_eq!(sp.degrees(), 19.5);
///
/// // Out of range or off the 0.5 grid is rejected
/// assert!(Setpoint::new(4.9).is_err());
/// assert!(Setpoint::new(19.3).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Setpoint(u8);

impl Setpoint {
    /// Minimum accepted setpoint (5.0 C).
    pub const MIN: Self = Self(10);

    /// Maximum accepted setpoint (30.0 C).
    pub const MAX: Self = Self(60);

    const MIN_DEGREES: f64 = 5.0;
    const MAX_DEGREES: f64 = 30.0;

    /// Creates a new setpoint from degrees Celsius.
    ///
    /// # Errors
    ///
    /// Returns [`OverrideError::OutOfRange`] if the value is outside
    /// 5.0-30.0, or [`OverrideError::NotHalfStep`] if it is not a multiple
    /// of 0.5.
    pub fn new(degrees: f64) -> Result<Self, OverrideError> {
        if !(Self::MIN_DEGREES..=Self::MAX_DEGREES).contains(&degrees) {
            return Err(OverrideError::OutOfRange {
                min: Self::MIN_DEGREES,
                max: Self::MAX_DEGREES,
                actual: degrees,
            });
        }

        let half_units = degrees * 2.0;
        if (half_units - half_units.round()).abs() > 1e-6 {
            return Err(OverrideError::NotHalfStep(degrees));
        }

        // Range-checked above: half_units is in [10, 60].
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let half_units = half_units.round() as u8;
        Ok(Self(half_units))
    }

    /// Returns the setpoint in degrees Celsius.
    #[must_use]
    pub fn degrees(self) -> f64 {
        f64::from(self.0) / 2.0
    }

    /// Returns the value the override write endpoint expects.
    ///
    /// The firmware encodes setpoints as tenths of a degree above the
    /// 5.0 C minimum, e.g. 19.5 C is sent as `145`.
    #[must_use]
    pub(crate) const fn wire_value(self) -> u16 {
        (self.0 as u16 - 10) * 5
    }
}

impl fmt::Display for Setpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.degrees())
    }
}

impl TryFrom<f64> for Setpoint {
    type Error = OverrideError;

    fn try_from(degrees: f64) -> Result<Self, Self::Error> {
        Self::new(degrees)
    }
}
