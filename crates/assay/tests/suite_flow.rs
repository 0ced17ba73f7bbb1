//! A suite-shaped flow through the facade: token, polled data, assertions.

use std::time::Duration;

use assay::http::{AssertionError, RawResponse, StubTransport};
use assay::prelude::*;
use serde_json::json;

fn json_response(body: serde_json::Value) -> RawResponse {
    RawResponse::new(200, body.to_string())
        .with_header("Content-Type", ContentType::ApplicationJson.as_str())
}

#[test]
fn test_token_then_polled_sensor_data() {
    let transport = StubTransport::with_responses([
        json_response(json!({"code": 200, "result": {"idToken": "jwt-42"}})),
        json_response(json!({"code": 304})),
        json_response(json!({
            "code": 200,
            "message": "success",
            "result": [
                {"deviceId": "dev-1", "peopleCnt": 3, "ts": 1_700_000_100},
                {"deviceId": "dev-1", "peopleCnt": 5, "ts": 1_700_000_200}
            ]
        })),
    ]);
    let api = DeviceApi::new(
        "https://iot.example.com",
        transport,
        PollPolicy::every(Duration::from_millis(1)),
    );

    let token = api.user_token("secret").unwrap();
    let query = SensorQuery::new("dev-1", 1_700_000_000, 1_700_003_600);
    let response = api.sensor_data(&token, &query, Fetch::UntilReady).unwrap();

    let options = CompareOptions::new()
        .ignore_order(true)
        .try_exclude_all(["root['result'][0]['ts']", "root['result'][1]['ts']"])
        .unwrap();
    let expected = json!({
        "code": 200,
        "message": "SUCC.*",
        "result": [
            {"deviceId": "dev-\\d+", "peopleCnt": 5},
            {"deviceId": "dev-\\d+", "peopleCnt": 3}
        ]
    });

    response
        .assert_status(200)
        .unwrap()
        .assert_content_type(ContentType::ApplicationJson)
        .unwrap();

    // case-sensitive by default
    assert!(response
        .assert_body(&BodyAssertion::json(expected.clone()).with_options(options.clone()))
        .is_err());
    response
        .assert_body(&BodyAssertion::json(expected).with_options(options.ignore_string_case(true)))
        .unwrap();

    let requests = api.transport().requests();
    assert_eq!(requests.len(), 3);
    assert!(requests[1..].iter().all(|r| {
        r.header("idToken") == Some("jwt-42") && r.param("startTime") == Some("1700000000")
    }));
}

#[test]
fn test_aggregated_failure_lists_every_mismatch() {
    let transport = StubTransport::with_responses([json_response(json!({
        "code": 500,
        "result": {}
    }))]);

    let response = ApiRequest::get("https://api.example.com")
        .add_path("login")
        .send(&transport)
        .unwrap();

    let err = response
        .assert_json(&json!({
            "message": "ok",
            "result": {"user": "alice", "idToken": "[a-z]+"},
            "code": 200
        }))
        .unwrap_err();

    let AssertionError::Body(comparison) = &err else {
        panic!("expected body mismatches, got {err}");
    };
    let paths: Vec<String> = comparison
        .mismatches()
        .iter()
        .map(|m| m.path().to_string())
        .collect();
    assert_eq!(
        paths,
        [
            "root['message']",
            "root['result']['idToken']",
            "root['result']['user']",
            "root['code']"
        ]
    );
}
