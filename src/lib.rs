// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `Lan2RF` Lib - a Rust client for InterGas InComfort heaters behind a
//! Lan2RF gateway.
//!
//! The gateway translates the boiler's RF protocol into a small HTTP/JSON
//! API. This library manages the session to that API, decodes the binary
//! status payload into typed fields, and writes room setpoint overrides.
//!
//! Each gateway exposes up to 8 heaters (boilers); each heater has 0-2
//! room thermostats.
//!
//! # Quick Start
//!
//! ```no_run
//! use lan2rf_lib::{Gateway, HttpConfig};
//!
//! #[tokio::main]
//! async fn main() -> lan2rf_lib::Result<()> {
//!     // Newer firmware needs credentials; older firmware takes none.
//!     let gateway = Gateway::new(
//!         HttpConfig::new("192.168.0.10").with_credentials("admin", "secret"),
//!     )?;
//!
//!     for heater in gateway.discover_heaters().await? {
//!         let status = heater.update().await?;
//!         println!(
//!             "{}: {} (pressure {:?} bar)",
//!             heater.serial_no(),
//!             status.display_text,
//!             status.pressure,
//!         );
//!
//!         for room in heater.rooms() {
//!             println!(
//!                 "  room {}: {:?} C, setpoint {:?} C",
//!                 room.room_no(),
//!                 room.room_temp(),
//!                 room.setpoint(),
//!             );
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Overriding a room setpoint
//!
//! Overrides are validated client-side (5.0-30.0 C, 0.5 steps) before any
//! request is sent. A successful write shows up in the room's
//! [`setpoint`](Room::setpoint) only after the heater's next
//! [`update`](Heater::update).
//!
//! ```no_run
//! # use lan2rf_lib::{Gateway, HttpConfig};
//! # async fn example() -> lan2rf_lib::Result<()> {
//! # let gateway = Gateway::new(HttpConfig::new("192.168.0.10"))?;
//! let heaters = gateway.discover_heaters().await?;
//! heaters[0].update().await?;
//!
//! let rooms = heaters[0].rooms();
//! if let Some(room) = rooms.first() {
//!     room.set_override(19.5).await?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Polling
//!
//! The library does not schedule anything: each [`Heater::update`] is one
//! fresh, independent snapshot, and callers decide when to poll. On any
//! failure the previously fetched snapshot stays in place.

pub mod error;
mod gateway;
mod heater;
pub mod payload;
mod protocol;
mod room;
pub mod types;

pub use error::{
    AuthenticationError, CommunicationError, DecodeError, Error, OverrideError, ResponseError,
    Result,
};
pub use gateway::{Gateway, NULL_SERIAL_NO};
pub use heater::Heater;
pub use payload::{HeaterStatus, PAYLOAD_LEN, decode};
pub use protocol::{HttpClient, HttpConfig};
pub use room::Room;
pub use types::{RoomNo, Setpoint};
