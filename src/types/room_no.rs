// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Room index type.
//!
//! A heater exposes at most two room thermostats. The gateway API numbers
//! them 1 and 2 in status fields, but the override write endpoint takes a
//! zero-based `thermostat` parameter.

use std::fmt;

/// Identifies one of the up to two rooms attached to a heater.
///
/// # Examples
///
/// ```
/// use lan2rf_lib::RoomNo;
///
/// assert_eq!(RoomNo::One.number(), 1);
/// assert_eq!(RoomNo::Two.number(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RoomNo {
    /// Room thermostat 1.
    One,
    /// Room thermostat 2.
    Two,
}

impl RoomNo {
    /// Both room numbers, in gateway order.
    pub const ALL: [Self; 2] = [Self::One, Self::Two];

    /// Returns the 1-based room number as used in status field names.
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
        }
    }

    /// Returns the zero-based index used by the override write endpoint.
    #[must_use]
    pub(crate) const fn thermostat_index(self) -> u8 {
        match self {
            Self::One => 0,
            Self::Two => 1,
        }
    }
}

impl fmt::Display for RoomNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}
