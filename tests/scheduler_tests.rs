// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! End-to-end sync cycle tests.

use hike_tracker::error::AppError;
use hike_tracker::models::Activity;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

mod common;
use common::{strava_activity, token_body, TestEnv};

async fn mount_refresh_ok(env: &TestEnv) {
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("access", "refresh1")))
        .mount(&env.server)
        .await;
}

#[tokio::test]
async fn test_cycle_writes_snapshots_and_summarizes() {
    let env = TestEnv::new().await;
    env.store_refresh_token("refresh0").await;
    mount_refresh_ok(&env).await;

    Mock::given(method("GET"))
        .and(path("/athlete/activities"))
        .and(query_param("page", "1"))
        .and(header("authorization", "Bearer access"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            strava_activity(1, "Hike", 1609.34 * 3.0),
            strava_activity(2, "Ride", 40_000.0),
            strava_activity(5, "Hike", 1609.34 * 2.0),
        ])))
        .mount(&env.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/athlete/activities"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&env.server)
        .await;

    let summary = env.scheduler().run_cycle().await.unwrap();

    assert_eq!(summary.activities, 2);
    assert!((summary.total_miles - 5.0).abs() < 1e-9);
    // Activity 5 has the later start date.
    assert!((summary.most_recent_miles - 2.0).abs() < 1e-9);
    assert!((summary.remaining_miles - 1495.0).abs() < 1e-9);

    let written: Vec<Activity> =
        serde_json::from_slice(&std::fs::read(env.config.activities_json_path()).unwrap())
            .unwrap();
    assert_eq!(written.len(), 2);
    assert_eq!(written[0].id, 1);
    assert_eq!(written[1].id, 5);
    assert_eq!(env.snapshots().read_rows().await.unwrap().len(), 2);
    assert_eq!(env.stored_refresh_token().await.as_deref(), Some("refresh1"));
}

#[tokio::test]
async fn test_failed_fetch_leaves_previous_snapshot() {
    let env = TestEnv::new().await;
    env.store_refresh_token("refresh0").await;
    mount_refresh_ok(&env).await;

    let previous = vec![Activity {
        id: 77,
        date: "2025-01-01T10:00:00Z".to_string(),
        activity_type: "Hike".to_string(),
        distance: 6.0,
        suffer_score: None,
        average_heartrate: None,
    }];
    env.snapshots().write(&previous).await.unwrap();

    Mock::given(method("GET"))
        .and(path("/athlete/activities"))
        .and(query_param("page", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([strava_activity(1, "Hike", 1609.34)])),
        )
        .mount(&env.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/athlete/activities"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&env.server)
        .await;

    let err = env.scheduler().run_cycle().await.unwrap_err();

    assert!(matches!(err, AppError::Fetch { status: 503, .. }));
    assert!(!err.is_fatal());
    let raw = env.snapshots().read_raw().await.unwrap();
    let kept: Vec<Activity> = serde_json::from_value(raw).unwrap();
    assert_eq!(kept, previous);
}

#[tokio::test]
async fn test_run_skips_failed_cycle_and_stops_on_auth_failure() {
    let env = TestEnv::new().await;
    env.store_refresh_token("refresh0").await;

    // First cycle: refresh works but the fetch fails.
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("access", "refresh1")))
        .up_to_n_times(1)
        .with_priority(1)
        .expect(1)
        .mount(&env.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/athlete/activities"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&env.server)
        .await;

    // Second cycle: the refresh token is revoked and the new code is rejected.
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&env.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(body_string_contains("grant_type=authorization_code"))
        .respond_with(ResponseTemplate::new(400))
        .expect(1)
        .mount(&env.server)
        .await;

    let err = env.scheduler().run().await.unwrap_err();

    assert!(matches!(err, AppError::Auth(_)));
    assert_eq!(env.clock.sleeps(), vec![env.config.run_interval]);
    assert_eq!(env.codes.calls(), 1);
    assert!(!env.config.activities_json_path().exists());
}
