// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Demonstration CLI for the Lan2RF client library.
//!
//! Discovers the heaters behind a gateway, updates each one and prints
//! the decoded view (or the raw payload with `--raw`). Optionally sets a
//! room override.
//!
//! # Usage
//!
//! ```bash
//! lan2rf <hostname> [-u|--user NAME -p|--pass WORD] [--raw]
//!        [-t|--temp DEGREES [--room N]]
//! ```
//!
//! # Examples
//!
//! ```bash
//! # Older firmware, no credentials
//! lan2rf 192.168.0.10
//!
//! # Newer firmware
//! lan2rf 192.168.0.10 -u admin -p secret
//!
//! # Raw payload bytes instead of the decoded view
//! lan2rf 192.168.0.10 --raw
//!
//! # Override room 1 of the first heater to 19.5 C
//! lan2rf 192.168.0.10 --temp 19.5 --room 1
//! ```

use std::env;
use std::process::ExitCode;

use lan2rf_lib::{Gateway, HttpConfig, RoomNo};

struct Args {
    hostname: String,
    user: Option<String>,
    pass: Option<String>,
    raw: bool,
    temp: Option<f64>,
    room: RoomNo,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = match parse_args(env::args().skip(1)) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("error: {message}");
            print_usage();
            return ExitCode::FAILURE;
        }
    };

    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Args) -> lan2rf_lib::Result<()> {
    let mut config = HttpConfig::new(&args.hostname);
    if let (Some(user), Some(pass)) = (&args.user, &args.pass) {
        config = config.with_credentials(user, pass);
    }

    let gateway = Gateway::new(config)?;
    let heaters = gateway.discover_heaters().await?;

    for heater in &heaters {
        if args.raw {
            let raw = gateway.heater_status_raw(heater.nodenr()).await?;
            println!("{}: {raw:?}", heater.serial_no());
            continue;
        }

        let status = heater.update().await?;
        println!("heater {}:", heater.serial_no());
        println!("{}", serde_json::to_string_pretty(&status).unwrap_or_default());

        for room in heater.rooms() {
            let over = room.override_setpoint().await?;
            println!(
                "  room {}: temp {:?} C, setpoint {:?} C, override {over:?} C",
                room.room_no(),
                room.room_temp(),
                room.setpoint(),
            );
        }
    }

    if let Some(degrees) = args.temp {
        let heater = &heaters[0];
        if heater.status().is_none() {
            heater.update().await?;
        }
        match heater
            .rooms()
            .into_iter()
            .find(|r| r.room_no() == args.room)
        {
            Some(room) => {
                room.set_override(degrees).await?;
                println!("override for room {} set to {degrees} C", args.room);
            }
            None => {
                eprintln!("heater {} has no room {}", heater.serial_no(), args.room);
            }
        }
    }

    Ok(())
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut hostname = None;
    let mut user = None;
    let mut pass = None;
    let mut raw = false;
    let mut temp = None;
    let mut room = RoomNo::One;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-u" | "--user" => user = Some(required_value(&arg, args.next())?),
            "-p" | "--pass" => pass = Some(required_value(&arg, args.next())?),
            "--raw" => raw = true,
            "-t" | "--temp" => {
                let value = required_value(&arg, args.next())?;
                temp = Some(
                    value
                        .parse::<f64>()
                        .map_err(|_| format!("{value} is not a temperature"))?,
                );
            }
            "--room" => {
                room = match required_value(&arg, args.next())?.as_str() {
                    "1" => RoomNo::One,
                    "2" => RoomNo::Two,
                    other => return Err(format!("room must be 1 or 2, got {other}")),
                };
            }
            other if hostname.is_none() && !other.starts_with('-') => {
                hostname = Some(other.to_string());
            }
            other => return Err(format!("unexpected argument: {other}")),
        }
    }

    if user.is_some() != pass.is_some() {
        return Err("--user and --pass must be given together".to_string());
    }

    Ok(Args {
        hostname: hostname.ok_or("missing gateway hostname")?,
        user,
        pass,
        raw,
        temp,
        room,
    })
}

fn required_value(flag: &str, value: Option<String>) -> Result<String, String> {
    value.ok_or_else(|| format!("{flag} requires a value"))
}

fn print_usage() {
    eprintln!(
        "usage: lan2rf <hostname> [-u|--user NAME -p|--pass WORD] [--raw] \
         [-t|--temp DEGREES [--room N]]"
    );
}
