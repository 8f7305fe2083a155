// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Decoder for the heater status payload.
//!
//! The gateway reports each heater's state as a run of byte fields. This
//! module turns that fixed-length byte sequence into a typed
//! [`HeaterStatus`]; it performs no I/O and keeps no state.
//!
//! # Sentinels
//!
//! A two-byte sensor field holding `0x7FFF` means "sensor absent / not
//! connected" and decodes to `None`, never to 327.67. The one-byte room
//! setpoint uses `0xFF` the same way. Downstream code relies on `None` to
//! detect missing rooms, which makes this the single most important
//! property of the decoder.

mod codes;

use serde::Serialize;

use crate::error::DecodeError;
use crate::types::RoomNo;

/// Fixed length of a heater status payload in bytes.
pub const PAYLOAD_LEN: usize = 23;

/// Two-byte "sensor absent" sentinel, 327.67 after scaling.
const SENTINEL_WORD: u16 = 0x7FFF;

/// One-byte "no setpoint" sentinel.
const SENTINEL_BYTE: u8 = 0xFF;

// IO bitmask bits.
const BITMASK_FAIL: u8 = 0x01;
const BITMASK_PUMP: u8 = 0x02;
const BITMASK_TAP: u8 = 0x04;
const BITMASK_BURNER: u8 = 0x08;

/// Production-line characters indexed by the `serial_line` byte.
const SERIAL_LINE: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Byte offsets within the payload.
mod offset {
    pub const NODENR: usize = 0;
    pub const DISPL_CODE: usize = 1;
    pub const IO: usize = 2;
    pub const SERIAL_YEAR: usize = 3;
    pub const SERIAL_MONTH: usize = 4;
    pub const SERIAL_LINE: usize = 5;
    pub const SERIAL_SN1: usize = 6;
    pub const SERIAL_SN2: usize = 7;
    pub const SERIAL_SN3: usize = 8;
    pub const CH_TEMP: usize = 9;
    pub const TAP_TEMP: usize = 11;
    pub const CH_PRESSURE: usize = 13;
    pub const ROOM_TEMP_1: usize = 15;
    pub const ROOM_TEMP_SET_1: usize = 17;
    pub const ROOM_TEMP_2: usize = 18;
    pub const ROOM_TEMP_SET_2: usize = 20;
    pub const RF_MESSAGE_RSSI: usize = 21;
    pub const RFSTATUS_CNTR: usize = 22;
}

/// Field names carrying the payload bytes in the gateway's data response,
/// in payload offset order. Two-byte fields appear as `_msb`/`_lsb` pairs.
pub(crate) const FIELD_KEYS: [&str; PAYLOAD_LEN] = [
    "nodenr",
    "displ_code",
    "IO",
    "serial_year",
    "serial_month",
    "serial_line",
    "serial_sn1",
    "serial_sn2",
    "serial_sn3",
    "ch_temp_msb",
    "ch_temp_lsb",
    "tap_temp_msb",
    "tap_temp_lsb",
    "ch_pressure_msb",
    "ch_pressure_lsb",
    "room_temp_1_msb",
    "room_temp_1_lsb",
    "room_temp_set_1",
    "room_temp_2_msb",
    "room_temp_2_lsb",
    "room_temp_set_2",
    "rf_message_rssi",
    "rfstatus_cntr",
];

/// Decoded status snapshot of one heater.
///
/// Produced wholesale by [`decode`]; never partially mutated. Temperature
/// and pressure fields are `None` when the corresponding sensor is absent.
///
/// # Examples
///
/// ```
/// use lan2rf_lib::payload::{decode, PAYLOAD_LEN};
///
/// let mut raw = [0u8; PAYLOAD_LEN];
/// raw[1] = 126; // standby
/// raw[9] = 12; // ch_temp = (12 << 8 | 50) / 100.0
/// raw[10] = 50;
///
/// let status = decode(&raw).unwrap();
/// assert_eq!(status.display_text, "standby");
/// assert_eq!(status.heater_temp, Some(31.22));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaterStatus {
    /// The raw display code byte.
    pub display_code: u8,
    /// Text label for the display code, or the fault label when failed.
    pub display_text: String,
    /// The fault code: the display byte while the failure bit is set, else 0.
    pub fault_code: u8,
    /// Burner is firing.
    pub is_burning: bool,
    /// Heater is in a failure (lockout) state.
    pub is_failed: bool,
    /// Central-heating pump is running.
    pub is_pumping: bool,
    /// Domestic hot water (tap) function is active.
    pub is_tapping: bool,
    /// Supply temperature of the central heating circuit, in C.
    pub heater_temp: Option<f64>,
    /// Domestic hot water temperature, in C.
    pub tap_temp: Option<f64>,
    /// Central heating water pressure, in bar.
    pub pressure: Option<f64>,
    /// Serial number assembled from the payload's serial bytes.
    pub serial_no: String,
    /// RF node number of the heater.
    pub nodenr: u8,
    /// Signal strength of the last RF message.
    pub rf_message_rssi: u8,
    /// RF status counter.
    pub rfstatus_cntr: u8,
    /// Room 1 temperature, in C.
    pub room_temp_1: Option<f64>,
    /// Room 1 thermostat setpoint, in C.
    pub room_setpoint_1: Option<f64>,
    /// Room 2 temperature, in C.
    pub room_temp_2: Option<f64>,
    /// Room 2 thermostat setpoint, in C.
    pub room_setpoint_2: Option<f64>,
}

impl HeaterStatus {
    /// Returns the temperature of the given room.
    #[must_use]
    pub fn room_temp(&self, room: RoomNo) -> Option<f64> {
        match room {
            RoomNo::One => self.room_temp_1,
            RoomNo::Two => self.room_temp_2,
        }
    }

    /// Returns the thermostat setpoint of the given room.
    #[must_use]
    pub fn room_setpoint(&self, room: RoomNo) -> Option<f64> {
        match room {
            RoomNo::One => self.room_setpoint_1,
            RoomNo::Two => self.room_setpoint_2,
        }
    }

    /// Returns true if the display code has no documented label.
    #[must_use]
    pub(crate) fn has_unknown_code(&self) -> bool {
        if self.is_failed {
            self.display_text.starts_with("unknown fault")
        } else {
            !codes::is_known_display_code(self.display_code)
        }
    }
}

/// Decodes a raw status payload into a [`HeaterStatus`].
///
/// Pure and total: every input of exactly [`PAYLOAD_LEN`] bytes decodes
/// without error, and equal inputs decode to field-for-field equal results.
///
/// # Errors
///
/// Returns [`DecodeError::Length`] if `raw` is not exactly [`PAYLOAD_LEN`]
/// bytes; truncated payloads are never partially decoded.
pub fn decode(raw: &[u8]) -> Result<HeaterStatus, DecodeError> {
    if raw.len() != PAYLOAD_LEN {
        return Err(DecodeError::Length {
            expected: PAYLOAD_LEN,
            actual: raw.len(),
        });
    }

    let io = raw[offset::IO];
    let is_failed = io & BITMASK_FAIL != 0;

    let display_code = raw[offset::DISPL_CODE];
    let display_text = if is_failed {
        codes::fault_text(display_code)
    } else {
        codes::display_text(display_code)
    };
    let fault_code = if is_failed { display_code } else { 0 };

    Ok(HeaterStatus {
        display_code,
        display_text,
        fault_code,
        is_burning: io & BITMASK_BURNER != 0,
        is_failed,
        is_pumping: io & BITMASK_PUMP != 0,
        is_tapping: io & BITMASK_TAP != 0,
        heater_temp: word(raw, offset::CH_TEMP),
        tap_temp: word(raw, offset::TAP_TEMP),
        pressure: word(raw, offset::CH_PRESSURE),
        serial_no: serial_no(raw),
        nodenr: raw[offset::NODENR],
        rf_message_rssi: raw[offset::RF_MESSAGE_RSSI],
        rfstatus_cntr: raw[offset::RFSTATUS_CNTR],
        room_temp_1: word(raw, offset::ROOM_TEMP_1),
        room_setpoint_1: half_degrees(raw[offset::ROOM_TEMP_SET_1]),
        room_temp_2: word(raw, offset::ROOM_TEMP_2),
        room_setpoint_2: half_degrees(raw[offset::ROOM_TEMP_SET_2]),
    })
}

/// Decodes a two-byte msb/lsb value scaled by 1/100, honoring the sentinel.
fn word(raw: &[u8], msb_offset: usize) -> Option<f64> {
    let value = (u16::from(raw[msb_offset]) << 8) | u16::from(raw[msb_offset + 1]);
    if value == SENTINEL_WORD {
        None
    } else {
        Some(f64::from(value) / 100.0)
    }
}

/// Decodes a one-byte half-degree value, honoring the sentinel.
fn half_degrees(raw: u8) -> Option<f64> {
    if raw == SENTINEL_BYTE {
        None
    } else {
        Some(f64::from(raw) / 2.0)
    }
}

/// Assembles the serial number string from the payload's serial bytes.
///
/// The line byte indexes a fixed character table; an index past the table
/// renders as `?` so that decoding stays total.
fn serial_no(raw: &[u8]) -> String {
    let line = SERIAL_LINE
        .get(usize::from(raw[offset::SERIAL_LINE]))
        .copied()
        .unwrap_or(b'?') as char;

    format!(
        "{}{}{}{}{}{}",
        raw[offset::SERIAL_YEAR],
        raw[offset::SERIAL_MONTH],
        line,
        raw[offset::SERIAL_SN1],
        raw[offset::SERIAL_SN2],
        raw[offset::SERIAL_SN3],
    )
}
