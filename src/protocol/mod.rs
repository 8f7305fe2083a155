// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP transport to the Lan2RF gateway.

mod http;
mod json;

pub use http::{HttpClient, HttpConfig};

pub(crate) use json::parse_lenient;
