// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The room thermostat model.
//!
//! A [`Room`] reads its temperature and setpoint from the parent heater's
//! snapshot; the override value is different: it is fetched from the
//! gateway on every read and written through [`Room::set_override`], with
//! no caching on either path.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::Error;
use crate::gateway::Gateway;
use crate::payload::HeaterStatus;
use crate::types::{RoomNo, Setpoint};

/// One thermostat zone of a heater.
///
/// Obtained from [`Heater::rooms`](crate::Heater::rooms) after the first
/// successful update. Clones share the parent heater's snapshot.
#[derive(Debug, Clone)]
pub struct Room {
    gateway: Gateway,
    nodenr: u8,
    room_no: RoomNo,
    /// The parent heater's snapshot.
    status: Arc<RwLock<Option<HeaterStatus>>>,
}

impl Room {
    pub(crate) fn new(
        gateway: Gateway,
        nodenr: u8,
        room_no: RoomNo,
        status: Arc<RwLock<Option<HeaterStatus>>>,
    ) -> Self {
        Self {
            gateway,
            nodenr,
            room_no,
            status,
        }
    }

    /// Returns this room's number on the heater.
    #[must_use]
    pub fn room_no(&self) -> RoomNo {
        self.room_no
    }

    /// The current room temperature in C, from the heater's snapshot.
    ///
    /// `None` before the heater's first update or when the sensor reports
    /// the absent sentinel.
    #[must_use]
    pub fn room_temp(&self) -> Option<f64> {
        self.status
            .read()
            .as_ref()
            .and_then(|s| s.room_temp(self.room_no))
    }

    /// The thermostat's own setpoint in C, from the heater's snapshot.
    ///
    /// After a successful [`set_override`](Self::set_override) this value
    /// keeps showing the old setpoint until the heater's next update.
    #[must_use]
    pub fn setpoint(&self) -> Option<f64> {
        self.status
            .read()
            .as_ref()
            .and_then(|s| s.room_setpoint(self.room_no))
    }

    /// Reads the currently active override setpoint, fresh from the
    /// gateway.
    ///
    /// Returns `None` when no override is set. Fetched at call time, so it
    /// may disagree with [`setpoint`](Self::setpoint), which comes from an
    /// older snapshot.
    ///
    /// # Errors
    ///
    /// [`Error::Communication`], [`Error::Authentication`] or
    /// [`Error::UnexpectedResponse`] if the exchange fails.
    pub async fn override_setpoint(&self) -> Result<Option<f64>, Error> {
        self.gateway.room_override(self.nodenr, self.room_no).await
    }

    /// Requests an override of this room's setpoint.
    ///
    /// The value is validated client-side first: it must lie within
    /// 5.0-30.0 C on the 0.5 degree grid, otherwise
    /// [`Error::InvalidOverride`] is returned without any network call.
    /// A success response from the gateway does not guarantee the new
    /// value is visible yet; it appears with the heater's next update.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidOverride`] if the value fails validation
    /// - [`Error::Communication`], [`Error::Authentication`] or
    ///   [`Error::UnexpectedResponse`] if the write exchange fails
    pub async fn set_override(&self, degrees: f64) -> Result<(), Error> {
        let setpoint = Setpoint::new(degrees)?;
        self.gateway
            .set_room_override(self.nodenr, self.room_no, setpoint)
            .await
    }
}
