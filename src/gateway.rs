// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The Lan2RF gateway session.
//!
//! A [`Gateway`] owns the HTTP session and is the sole path through which
//! heaters and rooms fetch or mutate remote state. It discovers the set of
//! bound heaters once and hands out [`Heater`] handles; the discovered
//! identity list is assumed stable for the life of the session.

use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::{Map, Value};

use crate::error::{Error, ResponseError};
use crate::heater::Heater;
use crate::payload::{FIELD_KEYS, PAYLOAD_LEN};
use crate::protocol::{HttpClient, HttpConfig};
use crate::types::{RoomNo, Setpoint};

/// Serial number the gateway reports for an empty heater slot.
pub const NULL_SERIAL_NO: &str = "000W00000";

/// Key of the heater array in the discovery response.
const HEATERLIST: &str = "heaterlist";

/// A session to one Lan2RF gateway.
///
/// Cheap to clone; clones share the HTTP session and the cached heater
/// list. All state that can change after construction sits behind a lock,
/// so concurrent calls on one session are safe.
///
/// # Examples
///
/// ```no_run
/// use lan2rf_lib::{Gateway, HttpConfig};
///
/// # async fn example() -> lan2rf_lib::Result<()> {
/// let gateway = Gateway::new(HttpConfig::new("192.168.0.10"))?;
///
/// for heater in gateway.discover_heaters().await? {
///     let status = heater.update().await?;
///     println!("{}: {}", heater.serial_no(), status.display_text);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Gateway {
    inner: Arc<GatewayInner>,
}

#[derive(Debug)]
struct GatewayInner {
    client: HttpClient,
    /// Heater identities, cached on first successful discovery.
    heaters: RwLock<Option<Vec<HeaterId>>>,
}

/// Identity of a discovered heater: its slot on the gateway plus the
/// serial number reported for that slot.
#[derive(Debug, Clone)]
struct HeaterId {
    nodenr: u8,
    serial_no: String,
}

impl Gateway {
    /// Creates a session from the given configuration.
    ///
    /// No request is issued yet; discovery happens on first use.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Communication`] if the HTTP client cannot be built.
    pub fn new(config: HttpConfig) -> Result<Self, Error> {
        let client = config.into_client()?;
        Ok(Self {
            inner: Arc::new(GatewayInner {
                client,
                heaters: RwLock::new(None),
            }),
        })
    }

    /// Discovers the heaters bound to this gateway.
    ///
    /// The identity list (slot number + serial) is fetched once and cached;
    /// later calls reuse it without touching the network. Each call returns
    /// fresh [`Heater`] handles with no status snapshot yet.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyHeaterList`] if every slot is empty or holds the
    ///   null serial
    /// - [`Error::Authentication`], [`Error::Communication`],
    ///   [`Error::UnexpectedResponse`] per the shared taxonomy
    pub async fn discover_heaters(&self) -> Result<Vec<Heater>, Error> {
        let cached = self.inner.heaters.read().clone();
        let ids = match cached {
            Some(ids) => ids,
            None => {
                let ids = self.fetch_heaterlist().await?;
                *self.inner.heaters.write() = Some(ids.clone());
                ids
            }
        };

        Ok(ids
            .into_iter()
            .map(|id| Heater::new(self.clone(), id.nodenr, id.serial_no))
            .collect())
    }

    async fn fetch_heaterlist(&self) -> Result<Vec<HeaterId>, Error> {
        let body = self.inner.client.get_json(HEATERLIST_ENDPOINT).await?;

        let list = body
            .get(HEATERLIST)
            .and_then(Value::as_array)
            .ok_or_else(|| {
                Error::UnexpectedResponse(ResponseError::MissingField(HEATERLIST.to_string()))
            })?;

        let ids: Vec<HeaterId> = list
            .iter()
            .enumerate()
            .filter_map(|(slot, entry)| {
                let serial = entry.as_str()?;
                if serial.is_empty() || serial == NULL_SERIAL_NO {
                    return None;
                }
                Some(HeaterId {
                    // The gateway has 8 slots.
                    nodenr: u8::try_from(slot).ok()?,
                    serial_no: serial.to_string(),
                })
            })
            .collect();

        tracing::debug!(count = ids.len(), "discovered heaters");

        if ids.is_empty() {
            return Err(Error::EmptyHeaterList);
        }
        Ok(ids)
    }

    /// Fetches the raw status payload for the heater in the given slot.
    ///
    /// The gateway wraps the payload bytes in a JSON envelope, one decimal
    /// byte per field (two-byte values as msb/lsb pairs). This strips the
    /// envelope and returns the bytes in payload order, ready for
    /// [`decode`](crate::payload::decode).
    ///
    /// # Errors
    ///
    /// The shared taxonomy; additionally [`Error::UnexpectedResponse`] if a
    /// payload field is missing or not a byte.
    pub async fn heater_status_raw(&self, nodenr: u8) -> Result<Vec<u8>, Error> {
        let body = self
            .inner
            .client
            .get_json(&format!("data.json?heater={nodenr}"))
            .await?;
        extract_payload(&body)
    }

    /// Reads the current override setpoint of a room, fresh from the
    /// gateway.
    ///
    /// Returns `None` when no override is active. The value is read at
    /// request time and may disagree with a heater snapshot fetched
    /// earlier.
    ///
    /// # Errors
    ///
    /// The shared taxonomy.
    pub async fn room_override(&self, nodenr: u8, room: RoomNo) -> Result<Option<f64>, Error> {
        let body = self
            .inner
            .client
            .get_json(&format!("data.json?heater={nodenr}"))
            .await?;
        let fields = expect_object(&body)?;
        let stub = format!("room_set_ovr_{}", room.number());
        Ok(word_field(fields, &stub)?)
    }

    /// Writes a room override setpoint.
    ///
    /// One request, never retried here: a retry of a write of uncertain
    /// delivery is the caller's decision. Success means the gateway
    /// accepted the request, not that the room's setpoint already shows
    /// the new value - that appears on a later heater update.
    ///
    /// # Errors
    ///
    /// The shared taxonomy.
    pub async fn set_room_override(
        &self,
        nodenr: u8,
        room: RoomNo,
        setpoint: Setpoint,
    ) -> Result<(), Error> {
        tracing::debug!(
            nodenr,
            room = %room,
            setpoint = %setpoint,
            "setting room override"
        );

        // The firmware takes writes as a GET with extra query parameters.
        self.inner
            .client
            .get_json(&format!(
                "data.json?heater={nodenr}&thermostat={}&setpoint={}",
                room.thermostat_index(),
                setpoint.wire_value(),
            ))
            .await?;
        Ok(())
    }
}

const HEATERLIST_ENDPOINT: &str = "heaterlist.json";

fn expect_object(body: &Value) -> Result<&Map<String, Value>, Error> {
    body.as_object().ok_or_else(|| {
        Error::UnexpectedResponse(ResponseError::UnexpectedFormat(
            "data response is not a JSON object".to_string(),
        ))
    })
}

/// Assembles the fixed-length payload from the data response's byte fields.
fn extract_payload(body: &Value) -> Result<Vec<u8>, Error> {
    let fields = expect_object(body)?;

    let mut payload = Vec::with_capacity(PAYLOAD_LEN);
    for key in FIELD_KEYS {
        payload.push(byte_field(fields, key)?);
    }
    Ok(payload)
}

fn byte_field(fields: &Map<String, Value>, key: &str) -> Result<u8, ResponseError> {
    let value = fields
        .get(key)
        .ok_or_else(|| ResponseError::MissingField(key.to_string()))?;
    value
        .as_u64()
        .and_then(|v| u8::try_from(v).ok())
        .ok_or_else(|| ResponseError::InvalidByte {
            field: key.to_string(),
        })
}

/// Reads an msb/lsb field pair scaled by 1/100, with the word sentinel
/// mapped to `None`.
fn word_field(fields: &Map<String, Value>, stub: &str) -> Result<Option<f64>, ResponseError> {
    let msb = byte_field(fields, &format!("{stub}_msb"))?;
    let lsb = byte_field(fields, &format!("{stub}_lsb"))?;
    let value = (u16::from(msb) << 8) | u16::from(lsb);
    if value == 0x7FFF {
        Ok(None)
    } else {
        Ok(Some(f64::from(value) / 100.0))
    }
}
