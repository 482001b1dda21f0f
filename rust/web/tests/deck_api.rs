use blackjack_web::server::{ServerConfig, WebServer};
use std::time::Duration;
use warp::hyper::{self, Client as HyperClient};

#[tokio::test]
async fn deck_endpoint_returns_a_full_shuffled_shoe() {
    let server = WebServer::new(ServerConfig::for_tests()).expect("construct server");
    let handle = server.start().await.expect("start server");
    let address = handle.address();
    let client = HyperClient::new();

    tokio::time::sleep(Duration::from_millis(20)).await;

    let deck_uri: hyper::Uri = format!("http://{address}/api/deck")
        .parse()
        .expect("parse deck uri");
    let response = client.get(deck_uri).await.expect("request deck");
    assert_eq!(response.status(), hyper::StatusCode::OK);

    let body = hyper::body::to_bytes(response.into_body())
        .await
        .expect("read deck body");
    let cards: serde_json::Value = serde_json::from_slice(&body).expect("parse deck json");
    let cards = cards.as_array().expect("deck is an array");
    assert_eq!(cards.len(), 312, "six decks by default");

    for card in cards {
        let fields = card.as_object().expect("card is an object");
        assert_eq!(fields.len(), 2, "cards carry rank and suit only");
        assert!(fields.contains_key("rank"));
        assert!(fields.contains_key("suit"));
    }

    tokio::time::timeout(Duration::from_secs(2), handle.shutdown())
        .await
        .expect("shutdown timed out")
        .expect("shutdown failed");
}

#[tokio::test]
async fn seeded_deck_requests_are_reproducible() {
    let server = WebServer::new(ServerConfig::for_tests()).expect("construct server");
    let handle = server.start().await.expect("start server");
    let address = handle.address();
    let client = HyperClient::new();

    tokio::time::sleep(Duration::from_millis(20)).await;

    let deck_uri: hyper::Uri = format!("http://{address}/api/deck?decks=2&seed=99")
        .parse()
        .expect("parse deck uri");

    let first_response = client
        .get(deck_uri.clone())
        .await
        .expect("request first deck");
    assert_eq!(first_response.status(), hyper::StatusCode::OK);
    let first_body = hyper::body::to_bytes(first_response.into_body())
        .await
        .expect("read first body");

    let second_response = client.get(deck_uri).await.expect("request second deck");
    assert_eq!(second_response.status(), hyper::StatusCode::OK);
    let second_body = hyper::body::to_bytes(second_response.into_body())
        .await
        .expect("read second body");

    let first_cards: serde_json::Value =
        serde_json::from_slice(&first_body).expect("parse first json");
    assert_eq!(
        first_cards.as_array().expect("deck is an array").len(),
        104,
        "two decks when requested"
    );
    assert_eq!(
        first_body, second_body,
        "same seed deals the same ordering"
    );

    tokio::time::timeout(Duration::from_secs(2), handle.shutdown())
        .await
        .expect("shutdown timed out")
        .expect("shutdown failed");
}

#[tokio::test]
async fn zero_deck_request_is_rejected_with_a_structured_error() {
    let server = WebServer::new(ServerConfig::for_tests()).expect("construct server");
    let handle = server.start().await.expect("start server");
    let address = handle.address();
    let client = HyperClient::new();

    tokio::time::sleep(Duration::from_millis(20)).await;

    let deck_uri: hyper::Uri = format!("http://{address}/api/deck?decks=0")
        .parse()
        .expect("parse deck uri");
    let response = client.get(deck_uri).await.expect("request deck");
    assert_eq!(response.status(), hyper::StatusCode::BAD_REQUEST);

    let body = hyper::body::to_bytes(response.into_body())
        .await
        .expect("read error body");
    let error_json: serde_json::Value = serde_json::from_slice(&body).expect("parse error json");
    assert_eq!(error_json["error"], "invalid_deck_count");
    assert_eq!(error_json["details"]["min"], 1);
    assert_eq!(error_json["details"]["max"], 8);

    tokio::time::timeout(Duration::from_secs(2), handle.shutdown())
        .await
        .expect("shutdown timed out")
        .expect("shutdown failed");
}
