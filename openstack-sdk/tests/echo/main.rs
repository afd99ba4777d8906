#![cfg(feature = "echo")]

use openstack_sdk::auth::StaticAuthentication;
use openstack_sdk::echo;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{header, header_exists, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn echo_message_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get"))
        .and(query_param("m", "hello world"))
        .and(header("Accept", "application/json"))
        .and(header_exists("User-Agent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "args": {"m": "hello world"},
            "headers": {"Accept": "application/json", "Host": "127.0.0.1"},
            "origin": "127.0.0.1",
            "url": "http://127.0.0.1/get?m=hello%20world"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = echo::Client::builder().base_uri(server.uri()).build();
    let resp = client
        .echo()
        .message("hello world")
        .build()
        .send()
        .await
        .unwrap();
    assert_eq!(resp.args["m"], "hello world");
    assert_eq!(resp.header("accept"), Some("application/json"));
    assert_eq!(resp.origin_ip(), Some("127.0.0.1".parse().unwrap()));

    let received = server.received_requests().await.unwrap();
    assert!(received[0].headers.get("x-auth-token").is_none());
    let agent = received[0].headers.get("user-agent").unwrap().to_str().unwrap();
    assert!(agent.starts_with("openstack-sdk/"));
}

#[tokio::test]
async fn echo_without_message_and_with_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get"))
        .and(query_param_is_missing("m"))
        .and(header("X-Auth-Token", "t0k"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let client = echo::Client::builder()
        .base_uri(server.uri())
        .auth(Arc::new(StaticAuthentication::new(Some("t0k".to_owned()))))
        .build();
    let resp = client.echo().build().send().await.unwrap();
    assert!(resp.args.is_empty());
    assert_eq!(resp.origin_ip(), None);
}

#[tokio::test]
async fn echo_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .mount(&server)
        .await;

    let client = echo::Client::builder().base_uri(server.uri()).build();
    let err = client.echo().build().send().await.unwrap_err();
    assert_eq!(err.status(), Some(reqwest::StatusCode::SERVICE_UNAVAILABLE));
}

/// Talks to the public httpbin instance.
#[tokio::test]
#[ignore]
async fn live_echo() {
    let client = echo::Client::builder().build();
    let resp = client.echo().message("ping").build().send().await.unwrap();
    println!("{:#?}", resp);
    assert_eq!(resp.args.get("m").map(String::as_str), Some("ping"));
}
