//! Integration tests for bsnd-se API endpoints
//!
//! Every test runs the real router against a private in-memory database.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use bsnd_common::db::init::init_in_memory_database;
use bsnd_common::{SoundAsset, SoundCategory, SoundConditions, TimeOfDay};
use bsnd_se::db::save_asset;
use bsnd_se::{build_router, AppState, RuntimeSettings};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tower::util::ServiceExt; // for `oneshot` method

/// Test helper: empty database with the full schema
async fn setup_test_db() -> SqlitePool {
    init_in_memory_database()
        .await
        .expect("Should create in-memory database")
}

/// Test helper: one universal fallback per category
async fn seed_fallbacks(db: &SqlitePool) {
    for category in SoundCategory::ALL {
        let asset = SoundAsset::new(category, format!("fallback/{}.mp3", category));
        save_asset(db, &asset).await.expect("Should save asset");
    }
}

fn setup_app(db: SqlitePool) -> axum::Router {
    build_router(AppState::new(db, RuntimeSettings::default()))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

async fn select(app: axum::Router, body: Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(post_json("/api/internal/select-sounds", body))
        .await
        .unwrap();
    let status = response.status();
    (status, extract_json(response.into_body()).await)
}

// =============================================================================
// Health and build info
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let app = setup_app(setup_test_db().await);

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "bsnd-se");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_buildinfo_endpoint() {
    let app = setup_app(setup_test_db().await);

    let response = app.oneshot(get("/api/buildinfo")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert!(body["git_hash"].is_string());
    assert!(body["build_profile"].is_string());
}

// =============================================================================
// Select sounds
// =============================================================================

#[tokio::test]
async fn test_select_fills_every_category() {
    let db = setup_test_db().await;
    seed_fallbacks(&db).await;

    let (status, body) = select(setup_app(db), json!({"duration_seconds": 120, "seed": 7})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["speech_only"], false);
    for category in SoundCategory::ALL {
        let slot = &body["selections"][category.as_str()];
        assert_eq!(slot["category"], category.as_str(), "slot {}", category);
        assert_eq!(
            slot["file_reference"],
            format!("fallback/{}.mp3", category)
        );
    }
    assert_eq!(body["midtros"], json!([]));
}

#[tokio::test]
async fn test_select_prefers_specific_high_priority() {
    let db = setup_test_db().await;
    seed_fallbacks(&db).await;

    let specific = SoundAsset::new(SoundCategory::Intro, "football-morning.mp3").with_conditions(
        SoundConditions {
            sport_ids: Some(vec![1]),
            time_of_day: Some(TimeOfDay::Morning),
            priority: 10,
            ..Default::default()
        },
    );
    save_asset(&db, &specific).await.unwrap();

    let app = setup_app(db);

    let (_, morning) = select(
        app.clone(),
        json!({"duration_seconds": 60, "sport_id": 1, "time_of_day": "morning", "day_of_week": 1}),
    )
    .await;
    assert_eq!(morning["selections"]["intro"]["id"], specific.id.to_string());

    // Wrong sport: the specific asset is ineligible, the fallback wins
    let (_, other_sport) = select(
        app.clone(),
        json!({"duration_seconds": 60, "sport_id": 2, "time_of_day": "morning", "day_of_week": 1}),
    )
    .await;
    assert_eq!(
        other_sport["selections"]["intro"]["file_reference"],
        "fallback/intro.mp3"
    );

    // No sport in the context never matches a restricted list
    let (_, no_sport) = select(
        app,
        json!({"duration_seconds": 60, "time_of_day": "morning", "day_of_week": 1}),
    )
    .await;
    assert_eq!(
        no_sport["selections"]["intro"]["file_reference"],
        "fallback/intro.mp3"
    );
}

#[tokio::test]
async fn test_select_with_seed_is_reproducible() {
    let db = setup_test_db().await;
    for i in 0..5 {
        save_asset(&db, &SoundAsset::new(SoundCategory::Background, format!("bed-{}.mp3", i)))
            .await
            .unwrap();
    }
    let app = setup_app(db);
    let request = json!({"duration_seconds": 90, "categories": ["background"], "seed": 1234});

    let (_, first) = select(app.clone(), request.clone()).await;
    let (_, second) = select(app, request).await;

    assert!(first["selections"]["background"].is_object());
    assert_eq!(
        first["selections"]["background"]["id"],
        second["selections"]["background"]["id"]
    );
}

#[tokio::test]
async fn test_select_only_requested_categories() {
    let db = setup_test_db().await;
    seed_fallbacks(&db).await;

    let (status, body) = select(
        setup_app(db),
        json!({"duration_seconds": 30, "categories": ["ad_intro", "ad_outro"]}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["selections"]["ad_intro"].is_object());
    assert!(body["selections"]["ad_outro"].is_object());
    assert!(body["selections"]["intro"].is_null());
    assert!(body["selections"]["background"].is_null());
}

#[tokio::test]
async fn test_empty_repository_is_speech_only() {
    let app = setup_app(setup_test_db().await);

    let (status, body) = select(app, json!({"duration_seconds": 120})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["speech_only"], true);
    for category in SoundCategory::ALL {
        assert!(body["selections"][category.as_str()].is_null());
    }
}

#[tokio::test]
async fn test_inactive_assets_never_selected() {
    let db = setup_test_db().await;
    save_asset(&db, &SoundAsset::new(SoundCategory::Outro, "retired.mp3").inactive())
        .await
        .unwrap();

    let (_, body) = select(
        setup_app(db),
        json!({"duration_seconds": 60, "categories": ["outro"]}),
    )
    .await;

    assert!(body["selections"]["outro"].is_null());
    assert_eq!(body["speech_only"], true);
}

#[tokio::test]
async fn test_midtros_follow_requested_policy() {
    let db = setup_test_db().await;
    for name in ["a", "b", "c"] {
        save_asset(&db, &SoundAsset::new(SoundCategory::Midtro, format!("{}.mp3", name)))
            .await
            .unwrap();
    }

    let (status, body) = select(
        setup_app(db),
        json!({
            "duration_seconds": 300,
            "categories": ["intro"],
            "midtro_count": 3,
            "midtro_policy": "no_repeat",
            "seed": 5
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["midtro_policy"], "no_repeat");
    let ids: std::collections::HashSet<String> = body["midtros"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids.len(), 3);
    assert_eq!(body["speech_only"], false);
}

#[tokio::test]
async fn test_midtro_count_over_limit_rejected() {
    let app = build_router(AppState::new(
        setup_test_db().await,
        RuntimeSettings {
            midtro_max_transitions: 2,
            ..Default::default()
        },
    ));

    let (status, body) = select(app, json!({"duration_seconds": 60, "midtro_count": 3})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_negative_duration_rejected() {
    let app = setup_app(setup_test_db().await);

    let (status, body) = select(app, json!({"duration_seconds": -1})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_CONTEXT");
    assert!(body["error"]["message"].is_string());
}

#[tokio::test]
async fn test_day_of_week_out_of_range_rejected() {
    let app = setup_app(setup_test_db().await);

    let (status, body) = select(app, json!({"duration_seconds": 60, "day_of_week": 7})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_CONTEXT");
}

// =============================================================================
// Fallback audit
// =============================================================================

#[tokio::test]
async fn test_audit_reports_missing_fallbacks() {
    let db = setup_test_db().await;
    save_asset(&db, &SoundAsset::new(SoundCategory::Intro, "intro.mp3"))
        .await
        .unwrap();

    let response = setup_app(db)
        .oneshot(get("/api/audit/fallbacks"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["healthy"], false);
    let missing = body["missing"].as_array().unwrap();
    assert_eq!(missing.len(), 5);
    assert!(!missing.contains(&json!("intro")));
    assert_eq!(body["categories"].as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn test_audit_healthy_when_seeded() {
    let db = setup_test_db().await;
    seed_fallbacks(&db).await;

    let response = setup_app(db)
        .oneshot(get("/api/audit/fallbacks"))
        .await
        .unwrap();

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["healthy"], true);
    assert_eq!(body["missing"], json!([]));
}
