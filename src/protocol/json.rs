// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Lenient JSON parsing for gateway response bodies.
//!
//! Some Lan2RF firmware revisions emit JSON that strict parsers reject:
//! unquoted object keys and trailing commas are both seen in the wild.
//! Bodies are parsed strictly first; only on failure is a repair pass
//! applied and the parse retried. Leniency stops at the body - transport
//! and auth failures are never repaired.

use serde_json::Value;

use crate::error::ResponseError;

/// Parses a response body, tolerating the device's known JSON quirks.
///
/// # Errors
///
/// Returns [`ResponseError::Json`] if the body cannot be parsed even after
/// repair.
pub(crate) fn parse_lenient(body: &str) -> Result<Value, ResponseError> {
    match serde_json::from_str(body) {
        Ok(value) => Ok(value),
        Err(strict_err) => {
            tracing::debug!(error = %strict_err, "strict JSON parse failed, repairing body");
            serde_json::from_str(&repair(body)).map_err(ResponseError::Json)
        }
    }
}

/// Rewrites known firmware quirks into valid JSON.
///
/// Quotes bare object keys and drops trailing commas. String contents are
/// left untouched.
fn repair(body: &str) -> String {
    let mut out = String::with_capacity(body.len() + 16);
    let mut chars = body.char_indices().peekable();
    let mut in_string = false;
    let mut escaped = false;
    // Non-whitespace character last written, used to spot key positions.
    let mut last_significant = '\0';

    while let Some((idx, ch)) = chars.next() {
        if in_string {
            out.push(ch);
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
                last_significant = '"';
            }
            continue;
        }

        match ch {
            '"' => {
                in_string = true;
                out.push(ch);
            }
            ',' => {
                // Drop the comma if only whitespace separates it from a
                // closing bracket.
                let rest = &body[idx + ch.len_utf8()..];
                if matches!(rest.trim_start().chars().next(), Some('}' | ']')) {
                    continue;
                }
                out.push(ch);
                last_significant = ch;
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                // A bare identifier after '{' or ',' is an unquoted key;
                // quote it. Bare words elsewhere (true, false, null) pass
                // through.
                let mut word = String::from(c);
                while let Some((_, next)) = chars.peek() {
                    if next.is_ascii_alphanumeric() || *next == '_' {
                        word.push(*next);
                        chars.next();
                    } else {
                        break;
                    }
                }

                let starts_key = matches!(last_significant, '{' | ',');
                let followed_by_colon = {
                    let end = idx + word.len();
                    matches!(body[end..].trim_start().chars().next(), Some(':'))
                };

                if starts_key && followed_by_colon {
                    out.push('"');
                    out.push_str(&word);
                    out.push('"');
                } else {
                    out.push_str(&word);
                }
                last_significant = word.chars().last().unwrap_or(c);
            }
            c => {
                out.push(c);
                if !c.is_whitespace() {
                    last_significant = c;
                }
            }
        }
    }

    out
}
