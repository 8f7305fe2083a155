// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Display-code and fault-code text tables.
//!
//! The boiler reports a single `displ_code` byte. When the failure bit of
//! the IO bitmask is clear it names the current operating mode; when the
//! bit is set the same byte carries an E-series fault code instead.

/// Returns the text label for an operating-mode display code.
///
/// Unmapped codes render as `unknown (<code>)` rather than failing the
/// decode; new firmware revisions occasionally add codes.
#[must_use]
pub(crate) fn display_text(code: u8) -> String {
    let text = match code {
        0 => "opentherm",
        15 => "boiler ext.",
        24 => "frost",
        37 => "central heating rf",
        51 => "tapwater int.",
        85 => "sensortest",
        102 => "central heating",
        126 => "standby",
        127 => "off",
        153 => "postrun boiler",
        170 => "service",
        204 => "tapwater",
        231 => "postrun ch",
        240 => "boiler int.",
        255 => "buffer",
        other => return format!("unknown ({other})"),
    };
    text.to_string()
}

/// Returns the text label for an E-series fault code.
#[must_use]
pub(crate) fn fault_text(code: u8) -> String {
    let text = match code {
        0 => "sensor fault after self check (E0)",
        1 => "cv temperature too high (E1)",
        2 => "s1 and s2 interchanged (E2)",
        4 => "no flame signal (E4)",
        5 => "poor flame signal (E5)",
        6 => "flame detection fault (E6)",
        8 => "incorrect fan speed (E8)",
        10..=14 => return format!("sensor fault s1 (E{code})"),
        20..=24 => return format!("sensor fault s2 (E{code})"),
        27 => "shortcut outside sensor temperature (E27)",
        29 | 30 => return format!("gas valve relay faulty (E{code})"),
        other => return format!("unknown fault ({other})"),
    };
    text.to_string()
}

/// Returns true if the code has a documented label.
#[must_use]
pub(crate) fn is_known_display_code(code: u8) -> bool {
    matches!(
        code,
        0 | 15 | 24 | 37 | 51 | 85 | 102 | 126 | 127 | 153 | 170 | 204 | 231 | 240 | 255
    )
}
