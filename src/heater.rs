// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The heater (boiler) model.
//!
//! A [`Heater`] owns the latest decoded status snapshot and the rooms
//! attached to it. The snapshot is replaced wholesale on each successful
//! [`update`](Heater::update) and left untouched on any failure, so a
//! caller always sees either the last known good state or nothing.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::Error;
use crate::gateway::Gateway;
use crate::payload::{self, HeaterStatus};
use crate::room::Room;
use crate::types::RoomNo;

/// One physical boiler visible through the gateway.
///
/// Created by [`Gateway::discover_heaters`]; the slot number and serial
/// are fixed for the heater's lifetime. Clones share the snapshot and the
/// room set.
///
/// # Examples
///
/// ```no_run
/// use lan2rf_lib::{Gateway, HttpConfig};
///
/// # async fn example() -> lan2rf_lib::Result<()> {
/// let gateway = Gateway::new(HttpConfig::new("192.168.0.10"))?;
/// let heaters = gateway.discover_heaters().await?;
///
/// let heater = &heaters[0];
/// heater.update().await?;
///
/// if heater.is_burning() == Some(true) {
///     println!("burning at {:?} C", heater.heater_temp());
/// }
/// for room in heater.rooms() {
///     println!("room {}: {:?} C", room.room_no(), room.room_temp());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Heater {
    gateway: Gateway,
    nodenr: u8,
    serial_no: String,
    status: Arc<RwLock<Option<HeaterStatus>>>,
    /// Room set, decided once at the first successful update.
    rooms: Arc<RwLock<Option<Vec<Room>>>>,
}

impl Heater {
    pub(crate) fn new(gateway: Gateway, nodenr: u8, serial_no: String) -> Self {
        Self {
            gateway,
            nodenr,
            serial_no,
            status: Arc::new(RwLock::new(None)),
            rooms: Arc::new(RwLock::new(None)),
        }
    }

    /// Returns the serial number reported at discovery.
    #[must_use]
    pub fn serial_no(&self) -> &str {
        &self.serial_no
    }

    /// Returns the gateway slot number used in API calls.
    #[must_use]
    pub fn nodenr(&self) -> u8 {
        self.nodenr
    }

    /// Fetches and decodes this heater's current status.
    ///
    /// On success the stored snapshot is replaced wholesale and a copy is
    /// returned. On any failure the previous snapshot (if any) and the
    /// decided room set are left unchanged; the caller decides whether
    /// stale data is acceptable.
    ///
    /// The set of rooms is decided at the first successful update, from
    /// which room temperatures are present in the snapshot, and is never
    /// re-evaluated afterwards. A later snapshot that contradicts the
    /// decision is logged, not acted upon.
    ///
    /// # Errors
    ///
    /// - [`Error::Communication`] / [`Error::Authentication`] /
    ///   [`Error::UnexpectedResponse`] if the exchange with the gateway
    ///   fails
    /// - [`Error::Decode`] if the payload cannot be decoded
    pub async fn update(&self) -> Result<HeaterStatus, Error> {
        let raw = self.gateway.heater_status_raw(self.nodenr).await?;
        let status = payload::decode(&raw)?;

        tracing::debug!(
            serial_no = %self.serial_no,
            display = %status.display_text,
            "heater status updated"
        );

        self.log_code_change(&status);
        self.decide_rooms(&status);
        *self.status.write() = Some(status.clone());

        Ok(status)
    }

    /// Returns the last successfully decoded snapshot, or `None` if
    /// [`update`](Self::update) has never succeeded.
    #[must_use]
    pub fn status(&self) -> Option<HeaterStatus> {
        self.status.read().clone()
    }

    /// Whether the burner is firing. `None` before the first update.
    #[must_use]
    pub fn is_burning(&self) -> Option<bool> {
        self.status.read().as_ref().map(|s| s.is_burning)
    }

    /// Whether the heater is in a failure state. `None` before the first
    /// update.
    #[must_use]
    pub fn is_failed(&self) -> Option<bool> {
        self.status.read().as_ref().map(|s| s.is_failed)
    }

    /// Whether the pump is running. `None` before the first update.
    #[must_use]
    pub fn is_pumping(&self) -> Option<bool> {
        self.status.read().as_ref().map(|s| s.is_pumping)
    }

    /// Whether hot tap water is being drawn. `None` before the first
    /// update.
    #[must_use]
    pub fn is_tapping(&self) -> Option<bool> {
        self.status.read().as_ref().map(|s| s.is_tapping)
    }

    /// The raw display code. `None` before the first update.
    #[must_use]
    pub fn display_code(&self) -> Option<u8> {
        self.status.read().as_ref().map(|s| s.display_code)
    }

    /// The display (or fault) text label. `None` before the first update.
    #[must_use]
    pub fn display_text(&self) -> Option<String> {
        self.status.read().as_ref().map(|s| s.display_text.clone())
    }

    /// The fault code, 0 when not failed. `None` before the first update.
    #[must_use]
    pub fn fault_code(&self) -> Option<u8> {
        self.status.read().as_ref().map(|s| s.fault_code)
    }

    /// Central heating supply temperature in C.
    ///
    /// `None` before the first update or when the sensor is absent.
    #[must_use]
    pub fn heater_temp(&self) -> Option<f64> {
        self.status.read().as_ref().and_then(|s| s.heater_temp)
    }

    /// Hot tap water temperature in C.
    ///
    /// `None` before the first update or when the sensor is absent.
    #[must_use]
    pub fn tap_temp(&self) -> Option<f64> {
        self.status.read().as_ref().and_then(|s| s.tap_temp)
    }

    /// Central heating water pressure in bar.
    ///
    /// `None` before the first update or when the sensor is absent.
    #[must_use]
    pub fn pressure(&self) -> Option<f64> {
        self.status.read().as_ref().and_then(|s| s.pressure)
    }

    /// Returns the rooms attached to this heater.
    ///
    /// Empty before the first successful update. Once decided, the set is
    /// fixed for the heater's lifetime.
    #[must_use]
    pub fn rooms(&self) -> Vec<Room> {
        self.rooms.read().clone().unwrap_or_default()
    }

    /// Decides the room set from the first snapshot: a room exists iff its
    /// temperature word is non-sentinel. Later snapshots only get checked
    /// for contradictions.
    fn decide_rooms(&self, status: &HeaterStatus) {
        let mut rooms = self.rooms.write();
        match rooms.as_ref() {
            None => {
                let decided: Vec<Room> = RoomNo::ALL
                    .into_iter()
                    .filter(|room| status.room_temp(*room).is_some())
                    .map(|room| {
                        Room::new(
                            self.gateway.clone(),
                            self.nodenr,
                            room,
                            Arc::clone(&self.status),
                        )
                    })
                    .collect();
                tracing::debug!(
                    serial_no = %self.serial_no,
                    rooms = decided.len(),
                    "room set decided"
                );
                *rooms = Some(decided);
            }
            Some(decided) => {
                let seen = RoomNo::ALL
                    .into_iter()
                    .filter(|room| status.room_temp(*room).is_some())
                    .count();
                if seen != decided.len() {
                    tracing::warn!(
                        serial_no = %self.serial_no,
                        decided = decided.len(),
                        seen,
                        "snapshot contradicts the decided room count; keeping the decision"
                    );
                }
            }
        }
    }

    /// Warns about undocumented display codes, once per code change.
    fn log_code_change(&self, status: &HeaterStatus) {
        if !status.has_unknown_code() {
            return;
        }
        let previous = self.status.read().as_ref().map(|s| s.display_code);
        if previous != Some(status.display_code) {
            tracing::warn!(
                serial_no = %self.serial_no,
                code = status.display_code,
                failed = status.is_failed,
                "heater reported an undocumented code"
            );
        }
    }
}
