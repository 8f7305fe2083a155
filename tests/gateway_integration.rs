// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests against a mocked Lan2RF gateway using wiremock.

use lan2rf_lib::{Error, Gateway, Heater, HttpConfig, RoomNo};
use serde_json::json;
use wiremock::matchers::{basic_auth, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SERIAL_NO_0: &str = "2110f25190";
const SERIAL_NO_1: &str = "2110f25191";

fn config_for(server: &MockServer) -> HttpConfig {
    let uri = server.uri();
    let addr = uri.strip_prefix("http://").unwrap();
    let (host, port) = addr.split_once(':').unwrap();
    HttpConfig::new(host).with_port(port.parse().unwrap())
}

fn heaterlist_body(serials: [Option<&str>; 8]) -> serde_json::Value {
    json!({ "heaterlist": serials })
}

/// Data response matching the documented sample payload: standby,
/// heater 31.22 C, tap 27.91 C, 1.23 bar, room 1 active at 26.4 C.
fn data_body_one_room() -> serde_json::Value {
    json!({
        "nodenr": 250,
        "displ_code": 126,
        "IO": 0,
        "serial_year": 21,
        "serial_month": 10,
        "serial_line": 15,
        "serial_sn1": 2,
        "serial_sn2": 51,
        "serial_sn3": 90,
        "ch_temp_msb": 12,
        "ch_temp_lsb": 50,
        "tap_temp_msb": 10,
        "tap_temp_lsb": 231,
        "ch_pressure_msb": 0,
        "ch_pressure_lsb": 123,
        "room_temp_1_msb": 10,
        "room_temp_1_lsb": 80,
        "room_temp_set_1": 39,
        "room_temp_2_msb": 127,
        "room_temp_2_lsb": 255,
        "room_temp_set_2": 38,
        "rf_message_rssi": 27,
        "rfstatus_cntr": 0,
        "room_set_ovr_1_msb": 7,
        "room_set_ovr_1_lsb": 108,
        "room_set_ovr_2_msb": 127,
        "room_set_ovr_2_lsb": 255,
    })
}

fn data_body_two_rooms() -> serde_json::Value {
    let mut body = data_body_one_room();
    body["room_temp_2_msb"] = json!(8);
    body["room_temp_2_lsb"] = json!(2);
    body
}

async fn mount_heaterlist(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/heaterlist.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(heaterlist_body([
            Some(SERIAL_NO_0),
            None,
            None,
            None,
            None,
            None,
            None,
            None,
        ])))
        .mount(server)
        .await;
}

async fn discovered_heater(server: &MockServer) -> Heater {
    let gateway = Gateway::new(config_for(server)).unwrap();
    gateway
        .discover_heaters()
        .await
        .unwrap()
        .into_iter()
        .next()
        .unwrap()
}

fn approx(actual: Option<f64>, expected: f64) -> bool {
    actual.is_some_and(|v| (v - expected).abs() < 1e-9)
}

// ============================================================================
// Discovery
// ============================================================================

mod discovery {
    use super::*;

    #[tokio::test]
    async fn finds_heaters_and_keeps_slot_numbers() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/heaterlist.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(heaterlist_body([
                None,
                Some(SERIAL_NO_0),
                Some("000W00000"),
                None,
                Some(SERIAL_NO_1),
                None,
                None,
                None,
            ])))
            .mount(&server)
            .await;

        let gateway = Gateway::new(config_for(&server)).unwrap();
        let heaters = gateway.discover_heaters().await.unwrap();

        assert_eq!(heaters.len(), 2);
        assert_eq!(heaters[0].serial_no(), SERIAL_NO_0);
        assert_eq!(heaters[0].nodenr(), 1);
        assert_eq!(heaters[1].serial_no(), SERIAL_NO_1);
        assert_eq!(heaters[1].nodenr(), 4);
    }

    #[tokio::test]
    async fn identity_list_is_cached() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/heaterlist.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(heaterlist_body([
                Some(SERIAL_NO_0),
                None,
                None,
                None,
                None,
                None,
                None,
                None,
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = Gateway::new(config_for(&server)).unwrap();
        gateway.discover_heaters().await.unwrap();
        let again = gateway.discover_heaters().await.unwrap();

        assert_eq!(again[0].serial_no(), SERIAL_NO_0);
    }

    #[tokio::test]
    async fn all_slots_empty_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/heaterlist.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(heaterlist_body([
                None,
                Some("000W00000"),
                None,
                None,
                None,
                None,
                None,
                None,
            ])))
            .mount(&server)
            .await;

        let gateway = Gateway::new(config_for(&server)).unwrap();
        let err = gateway.discover_heaters().await.unwrap_err();
        assert!(matches!(err, Error::EmptyHeaterList));
    }

    #[tokio::test]
    async fn tolerates_malformed_firmware_json() {
        let server = MockServer::start().await;

        // Unquoted key and trailing commas, as older firmware emits.
        let body = format!("{{heaterlist: [\"{SERIAL_NO_0}\", null, ], }}");
        Mock::given(method("GET"))
            .and(path("/heaterlist.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&server)
            .await;

        let gateway = Gateway::new(config_for(&server)).unwrap();
        let heaters = gateway.discover_heaters().await.unwrap();
        assert_eq!(heaters[0].serial_no(), SERIAL_NO_0);
    }

    #[tokio::test]
    async fn unparseable_body_is_unexpected_response() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/heaterlist.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
            .mount(&server)
            .await;

        let gateway = Gateway::new(config_for(&server)).unwrap();
        let err = gateway.discover_heaters().await.unwrap_err();
        assert!(matches!(err, Error::UnexpectedResponse(_)));
    }
}

// ============================================================================
// Authentication
// ============================================================================

mod authentication {
    use super::*;

    #[tokio::test]
    async fn unauthorized_is_authentication_not_communication() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/heaterlist.json"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let gateway = Gateway::new(config_for(&server)).unwrap();
        let err = gateway.discover_heaters().await.unwrap_err();
        assert!(matches!(err, Error::Authentication(_)));
    }

    #[tokio::test]
    async fn server_error_is_communication() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/heaterlist.json"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let gateway = Gateway::new(config_for(&server)).unwrap();
        let err = gateway.discover_heaters().await.unwrap_err();
        assert!(matches!(err, Error::Communication(_)));
    }

    #[tokio::test]
    async fn credentials_use_protected_path_and_basic_auth() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/protect/heaterlist.json"))
            .and(basic_auth("admin", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(heaterlist_body([
                Some(SERIAL_NO_0),
                None,
                None,
                None,
                None,
                None,
                None,
                None,
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let gateway =
            Gateway::new(config_for(&server).with_credentials("admin", "secret")).unwrap();
        let heaters = gateway.discover_heaters().await.unwrap();
        assert_eq!(heaters[0].serial_no(), SERIAL_NO_0);
    }
}

// ============================================================================
// Heater updates
// ============================================================================

mod heater_update {
    use super::*;

    #[tokio::test]
    async fn decodes_documented_sample() {
        let server = MockServer::start().await;
        mount_heaterlist(&server).await;

        Mock::given(method("GET"))
            .and(path("/data.json"))
            .and(query_param("heater", "0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(data_body_one_room()))
            .mount(&server)
            .await;

        let heater = discovered_heater(&server).await;
        assert!(heater.status().is_none());
        assert!(heater.rooms().is_empty());

        let status = heater.update().await.unwrap();

        assert_eq!(status.display_code, 126);
        assert_eq!(status.display_text, "standby");
        assert_eq!(status.fault_code, 0);
        assert!(!status.is_burning);
        assert!(approx(status.heater_temp, 31.22));
        assert!(approx(status.tap_temp, 27.91));
        assert!(approx(status.pressure, 1.23));
        assert_eq!(status.serial_no, SERIAL_NO_0);
        assert!(approx(status.room_temp_1, 26.4));
        assert!(approx(status.room_setpoint_1, 19.5));
        assert_eq!(status.room_temp_2, None);
        assert!(approx(status.room_setpoint_2, 19.0));

        assert_eq!(heater.is_burning(), Some(false));
        assert_eq!(heater.display_text().as_deref(), Some("standby"));
        assert!(approx(heater.pressure(), 1.23));
    }

    #[tokio::test]
    async fn room_set_follows_the_data() {
        let server = MockServer::start().await;
        mount_heaterlist(&server).await;

        Mock::given(method("GET"))
            .and(path("/data.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(data_body_two_rooms()))
            .mount(&server)
            .await;

        let heater = discovered_heater(&server).await;
        heater.update().await.unwrap();

        let rooms = heater.rooms();
        assert_eq!(rooms.len(), 2);
        assert_eq!(rooms[0].room_no(), RoomNo::One);
        assert_eq!(rooms[1].room_no(), RoomNo::Two);
        assert!(approx(rooms[1].room_temp(), 20.5));
    }

    #[tokio::test]
    async fn room_count_is_decided_once() {
        let server = MockServer::start().await;
        mount_heaterlist(&server).await;

        // First update sees room 2 absent, the next one sees it present.
        Mock::given(method("GET"))
            .and(path("/data.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(data_body_one_room()))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/data.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(data_body_two_rooms()))
            .mount(&server)
            .await;

        let heater = discovered_heater(&server).await;
        heater.update().await.unwrap();
        assert_eq!(heater.rooms().len(), 1);

        let status = heater.update().await.unwrap();
        // The snapshot itself reflects the new data...
        assert!(approx(status.room_temp_2, 20.5));
        // ...but the decided room set does not change.
        assert_eq!(heater.rooms().len(), 1);
    }

    #[tokio::test]
    async fn failed_update_keeps_last_known_good_status() {
        let server = MockServer::start().await;
        mount_heaterlist(&server).await;

        Mock::given(method("GET"))
            .and(path("/data.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(data_body_one_room()))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/data.json"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let heater = discovered_heater(&server).await;
        heater.update().await.unwrap();

        let err = heater.update().await.unwrap_err();
        assert!(matches!(err, Error::Communication(_)));

        // Last known good snapshot and room set survive the failure.
        let status = heater.status().unwrap();
        assert!(approx(status.heater_temp, 31.22));
        assert_eq!(heater.rooms().len(), 1);
    }

    #[tokio::test]
    async fn failed_first_update_leaves_no_status() {
        let server = MockServer::start().await;
        mount_heaterlist(&server).await;

        Mock::given(method("GET"))
            .and(path("/data.json"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let heater = discovered_heater(&server).await;
        assert!(heater.update().await.is_err());
        assert!(heater.status().is_none());
        assert!(heater.rooms().is_empty());
    }

    #[tokio::test]
    async fn incomplete_data_is_unexpected_response() {
        let server = MockServer::start().await;
        mount_heaterlist(&server).await;

        Mock::given(method("GET"))
            .and(path("/data.json"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "nodenr": 250, "IO": 0 })),
            )
            .mount(&server)
            .await;

        let heater = discovered_heater(&server).await;
        let err = heater.update().await.unwrap_err();
        assert!(matches!(err, Error::UnexpectedResponse(_)));
        assert!(heater.status().is_none());
    }
}

// ============================================================================
// Room overrides
// ============================================================================

mod room_override {
    use super::*;

    async fn one_room_heater(server: &MockServer) -> Heater {
        mount_heaterlist(server).await;
        Mock::given(method("GET"))
            .and(path("/data.json"))
            .and(query_param("heater", "0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(data_body_one_room()))
            .mount(server)
            .await;

        let heater = discovered_heater(server).await;
        heater.update().await.unwrap();
        heater
    }

    #[tokio::test]
    async fn read_override_is_fetched_fresh() {
        let server = MockServer::start().await;
        let heater = one_room_heater(&server).await;
        let room = heater.rooms().into_iter().next().unwrap();

        let over = room.override_setpoint().await.unwrap();
        assert!(approx(over, 19.0));
    }

    #[tokio::test]
    async fn set_override_issues_exactly_one_write() {
        let server = MockServer::start().await;
        let heater = one_room_heater(&server).await;
        let room = heater.rooms().into_iter().next().unwrap();

        let before = server.received_requests().await.unwrap().len();

        Mock::given(method("GET"))
            .and(path("/data.json"))
            .and(query_param("heater", "0"))
            .and(query_param("thermostat", "0"))
            .and(query_param("setpoint", "145"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            // Outranks the broader data.json mock mounted by the helper.
            .with_priority(1)
            .expect(1)
            .mount(&server)
            .await;

        room.set_override(19.5).await.unwrap();

        let after = server.received_requests().await.unwrap().len();
        assert_eq!(after, before + 1);
    }

    #[tokio::test]
    async fn out_of_range_override_makes_no_network_call() {
        let server = MockServer::start().await;
        let heater = one_room_heater(&server).await;
        let room = heater.rooms().into_iter().next().unwrap();

        let before = server.received_requests().await.unwrap().len();

        let err = room.set_override(4.9).await.unwrap_err();
        assert!(matches!(err, Error::InvalidOverride(_)));

        let err = room.set_override(19.3).await.unwrap_err();
        assert!(matches!(err, Error::InvalidOverride(_)));

        let after = server.received_requests().await.unwrap().len();
        assert_eq!(after, before);
    }

    #[tokio::test]
    async fn rejected_write_is_surfaced() {
        let server = MockServer::start().await;
        let heater = one_room_heater(&server).await;
        let room = heater.rooms().into_iter().next().unwrap();

        Mock::given(method("GET"))
            .and(path("/data.json"))
            .and(query_param("setpoint", "145"))
            .respond_with(ResponseTemplate::new(503))
            .with_priority(1)
            .mount(&server)
            .await;

        let err = room.set_override(19.5).await.unwrap_err();
        assert!(matches!(err, Error::Communication(_)));
    }
}
