use super::common::*;
use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::playbook::report::ReportOptions;
use crate::playbook::{PlaybookService, RecordStore};

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

fn get_request(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).expect("request builds")
}

#[tokio::test]
async fn create_profile_returns_created() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/profiles",
            json!({ "name": "Jess", "status": "dating", "looks_rating": 8 }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload["name"], "Jess");
    assert_eq!(payload["status"], "dating");
}

#[tokio::test]
async fn create_profile_rejects_invalid_drafts() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/profiles",
            json!({ "name": "Jess", "looks_rating": 12 }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .is_some_and(|message| message.contains("looks_rating")));
}

#[tokio::test]
async fn meetings_for_unknown_profiles_are_not_found() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/profiles/nobody/meetings",
            json!({ "type": "date", "amount_spent": 20, "rating": 6 }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn player_detail_reflects_recorded_meetings() {
    let (service, _) = build_service();
    let profile = service
        .add_profile(profile_draft("Jess", 8), now())
        .expect("profile stored");
    let router = router_with_service(service);

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/api/v1/profiles/{}/meetings", profile.id),
            json!({
                "type": "date",
                "amount_spent": 90,
                "base": "home",
                "rating": 7,
                "performance_rating": 9
            }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = router
        .oneshot(get_request(&format!("/api/v1/profiles/{}", profile.id)))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["rating"]["overall"], json!(8.0));
    assert_eq!(payload["spend"]["cpn"], json!(90.0));
    assert_eq!(payload["meetings"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn roster_route_applies_sort_and_search() {
    let (service, _) = build_service();
    for name in ["Zoe", "Amy", "Zara"] {
        service
            .add_profile(profile_draft(name, 6), now())
            .expect("profile stored");
    }
    let router = router_with_service(service);

    let response = router
        .oneshot(get_request("/api/v1/roster?sort=name&search=z"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let names: Vec<&str> = payload["active"]
        .as_array()
        .expect("active cards")
        .iter()
        .filter_map(|card| card["profile"]["name"].as_str())
        .collect();
    assert_eq!(names, ["Zara", "Zoe"]);
}

#[tokio::test]
async fn upcoming_route_schedules_and_lists_future_dates() {
    let (service, store) = build_service();
    let kim = service
        .add_profile(profile_draft("Kim", 9), now())
        .expect("profile stored");
    store
        .insert_upcoming(upcoming(&kim.id.0, -2))
        .expect("past date stored");
    let router = router_with_service(service);

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/upcoming",
            json!({ "profile_id": kim.id.0, "type": "dinner", "date": "2099-06-01T19:00:00Z" }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/upcoming",
            json!({ "profile_id": "nobody", "type": "dinner", "date": "2099-06-01T19:00:00Z" }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = router
        .oneshot(get_request(&format!("/api/v1/upcoming?profile_id={}", kim.id)))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let entries = payload.as_array().expect("entry list");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["type"], "dinner");
    assert_eq!(entries[0]["profile_name"], "Kim");
}

#[tokio::test]
async fn playbook_route_returns_report() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(get_request("/api/v1/playbook?period=yearly&top=2"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["period"], "yearly");
    assert_eq!(payload["series"]["values"], json!([0, 0, 0]));
    assert_eq!(payload["totals"]["total_dates"], 0);
}

#[tokio::test]
async fn playbook_route_rejects_zero_top() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(get_request("/api/v1/playbook?top=0"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn roster_handler_returns_internal_error_on_store_failure() {
    let service = Arc::new(PlaybookService::new(
        Arc::new(UnavailableStore),
        ReportOptions::default(),
    ));

    let response = crate::playbook::router::roster_handler::<UnavailableStore>(
        State(service),
        axum::extract::Query(Default::default()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
