//! Integration tests for the insight display and chat endpoints.

mod common;

use axum::http::StatusCode;
use common::{sample_snapshot, Script, TestClient};
use finsight::models::InsightReply;
use finsight::services::chat_session::{EMPTY_REPLY_MESSAGE, UNREACHABLE_MESSAGE};
use finsight::services::insight_client::{FALLBACK_INSIGHT, FALLBACK_RECOMMENDATION};
use finsight::store::Snapshot;
use http_body_util::BodyExt;
use std::sync::Arc;
use tokio::sync::Notify;
use tower::ServiceExt;

#[tokio::test]
async fn test_stats() {
    let client = TestClient::with_snapshot(sample_snapshot());
    let (status, data) = client.get_json("/api/insights/stats").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(data["income"], 1000.0);
    assert_eq!(data["expenses"], 400.0);
    assert_eq!(data["transactions"], 4);
    assert_eq!(data["budgets"], 2);
    assert_eq!(data["goals"], 1);
}

#[tokio::test]
async fn test_spending_analysis_is_normalized() {
    let client = TestClient::new();
    let (status, data) = client.get_json("/api/insights/spending-analysis").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(data["narrative"], "Food takes 75% of your spending.");
    assert_eq!(data["category"], "Spending");
    assert_eq!(
        data["recommendations"],
        serde_json::json!([
            "Cut dining out.",
            "Cancel unused subscriptions.",
            "Automate savings transfers every month."
        ])
    );
}

#[tokio::test]
async fn test_unreachable_service_falls_back() {
    let client = TestClient::with(Snapshot::default(), Script::Unreachable);

    for uri in [
        "/api/insights/spending-analysis",
        "/api/insights/budget-recommendations",
    ] {
        let (status, data) = client.get_json(uri).await;
        assert_eq!(status, StatusCode::OK, "{}", uri);
        assert_eq!(data["category"], "Error");
        assert_eq!(data["recommendations"], serde_json::json!([FALLBACK_RECOMMENDATION]));

        let narrative = data["narrative"].as_str().unwrap();
        assert!(!narrative.is_empty());
        assert!(FALLBACK_INSIGHT.starts_with(narrative.split('.').next().unwrap()));
    }
}

#[tokio::test]
async fn test_chat_round_trip() {
    let client = TestClient::with_snapshot(sample_snapshot());

    let (status, data) = client.ask("  Where does my money go?  ").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(data["accepted"], true);
    assert_eq!(data["awaitingResponse"], false);
    assert_eq!(
        data["messages"],
        serde_json::json!([
            {"role": "user", "content": "Where does my money go?"},
            {"role": "assistant", "content": "Your biggest expense is food."},
        ])
    );

    let queries = client.insights().queries();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].query, "Where does my money go?");
    assert!(queries[0].context.contains("Total expenses: ₹400.00"));

    let (status, log) = client.get_json("/api/chat").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(log["messages"].as_array().unwrap().len(), 2);
    assert_eq!(log["sessionId"], data["sessionId"]);
}

#[tokio::test]
async fn test_blank_chat_question_is_rejected() {
    let client = TestClient::new();
    let (status, data) = client.ask("   ").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(data["accepted"], false);
    assert!(data["messages"].as_array().unwrap().is_empty());
    assert!(client.insights().queries().is_empty());
}

#[tokio::test]
async fn test_chat_failure_appends_apology() {
    let client = TestClient::with(Snapshot::default(), Script::Unreachable);
    let (_, data) = client.ask("Can I afford a car?").await;

    assert_eq!(data["accepted"], true);
    assert_eq!(data["messages"][1]["role"], "assistant");
    assert_eq!(data["messages"][1]["content"], UNREACHABLE_MESSAGE);

    // the session is usable again
    let (_, data) = client.ask("And a bike?").await;
    assert_eq!(data["accepted"], true);
    assert_eq!(data["messages"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_empty_reply_uses_generic_message() {
    let client = TestClient::with(
        Snapshot::default(),
        Script::Answer {
            insight: Default::default(),
            reply: InsightReply::default(),
        },
    );
    let (_, data) = client.ask("Hello?").await;
    assert_eq!(data["messages"][1]["content"], EMPTY_REPLY_MESSAGE);
}

#[tokio::test]
async fn test_second_question_while_pending_is_rejected() {
    let release = Arc::new(Notify::new());
    let client = TestClient::with(
        Snapshot::default(),
        Script::Gated {
            release: release.clone(),
            reply: InsightReply::from_insight("Done."),
        },
    );

    let app = client.router();
    let first = tokio::spawn(async move {
        app.oneshot(TestClient::chat_request("first question"))
            .await
            .unwrap()
    });

    // wait until the first question is in flight
    loop {
        let (_, log) = client.get_json("/api/chat").await;
        if log["awaitingResponse"] == true {
            break;
        }
        tokio::task::yield_now().await;
    }

    let (status, data) = client.ask("second question").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(data["accepted"], false);
    assert_eq!(data["awaitingResponse"], true);
    assert_eq!(data["messages"].as_array().unwrap().len(), 1);

    release.notify_one();
    let response = first.await.unwrap();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let data: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(data["accepted"], true);
    let contents: Vec<&str> = data["messages"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["content"].as_str().unwrap())
        .collect();
    assert_eq!(contents, vec!["first question", "Done."]);
    assert_eq!(client.insights().queries().len(), 1);
}

#[tokio::test]
async fn test_dropped_chat_request_still_settles() {
    let release = Arc::new(Notify::new());
    let client = TestClient::with(
        Snapshot::default(),
        Script::Gated {
            release: release.clone(),
            reply: InsightReply::from_insight("Answered after the caller left."),
        },
    );

    let app = client.router();
    let first = tokio::spawn(async move {
        app.oneshot(TestClient::chat_request("first question"))
            .await
            .unwrap()
    });

    loop {
        let (_, log) = client.get_json("/api/chat").await;
        if log["awaitingResponse"] == true {
            break;
        }
        tokio::task::yield_now().await;
    }

    // the caller goes away while the service is still working
    first.abort();
    assert!(first.await.unwrap_err().is_cancelled());

    release.notify_one();
    let log = loop {
        let (_, log) = client.get_json("/api/chat").await;
        if log["awaitingResponse"] == false {
            break log;
        }
        tokio::task::yield_now().await;
    };
    assert_eq!(log["messages"][1]["content"], "Answered after the caller left.");

    release.notify_one();
    let (status, data) = client.ask("second question").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(data["accepted"], true);
    assert_eq!(data["messages"].as_array().unwrap().len(), 4);
    assert_eq!(client.insights().queries().len(), 2);
}
