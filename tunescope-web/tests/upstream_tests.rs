//! Integration tests against in-process mock upstream services
//!
//! Tests cover:
//! - Related-video search success, failure, retry, and filtering
//! - Test identity flow through the loading state
//! - Lyrics lookup
//! - Featured songs lookup
//! - Artwork dominant color

mod common;

use axum::{
    extract::{Path, Query},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use common::*;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

/// Twelve results for "Shape of You", three of them lyric videos
fn shape_of_you_videos() -> Value {
    let titles = [
        "Ed Sheeran - Shape of You (Official Music Video)",
        "Ed Sheeran - Shape Of You (Lyrics)",
        "Shape of You - Ed Sheeran (Live at the BRITs)",
        "Ed Sheeran - Shape of You [Galantis Remix]",
        "shape of you - ed sheeran lyrics",
        "Shape of You (slowed + reverb)",
        "Ed Sheeran - Shape of You (Acoustic)",
        "Shape of You | Piano Cover",
        "Ed Sheeran - Shape of You (Major Lazer Remix)",
        "Ed Sheeran - Shape of You [Official Lyric Video] LYRICS",
        "Shape of You sped up",
        "Ed Sheeran: The making of Shape of You",
    ];
    let videos: Vec<Value> = titles
        .iter()
        .enumerate()
        .map(|(i, title)| json!({ "video_id": format!("sy{:02}", i), "title": title, "channel": "Ed Sheeran" }))
        .collect();
    json!({ "videos": videos })
}

/// Video search upstream that counts requests and answers with `status`/`body`
fn video_upstream(counter: Arc<AtomicUsize>, status: StatusCode, body: Value) -> Router {
    Router::new().route(
        "/api/music-videos",
        post(move |Json(request): Json<Value>| {
            let counter = counter.clone();
            let body = body.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                assert_eq!(request["max_results"], 15);
                (status, Json(body))
            }
        }),
    )
}

async fn put_identity(app: &Router, song: &str, artist: &str) {
    let response = send(
        app,
        json_request(
            "PUT",
            "/api/session/song-details",
            json!({ "songName": song, "artistName": artist }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

// =============================================================================
// Related media
// =============================================================================

#[tokio::test]
async fn test_shape_of_you_lyrics_filter() {
    let counter = Arc::new(AtomicUsize::new(0));
    let base = spawn_upstream(video_upstream(counter.clone(), StatusCode::OK, shape_of_you_videos())).await;
    let app = app_with(config_for(&base));

    put_identity(&app, "Shape of You", "Ed Sheeran").await;
    let view = extract_json(send(&app, request("POST", "/api/related-media/load")).await).await;

    assert_eq!(view["state"], "ready");
    assert_eq!(view["video_count"], 12);
    assert_eq!(view["heading"], "Discover related content");
    assert_eq!(view["videos"][0]["key"], "sy00-0");
    assert_eq!(view["videos"][0]["channel"], "Ed Sheeran");
    assert_eq!(counter.load(Ordering::SeqCst), 1);

    let response = send(
        &app,
        json_request("POST", "/api/related-media/filter", json!({ "category": "lyrics" })),
    )
    .await;
    let body = extract_json(response).await;

    assert_eq!(body["applied"], true);
    assert_eq!(body["visible_count"], 3);
    let ids: Vec<&str> = body["view"]["videos"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["video_id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["sy01", "sy04", "sy09"]);
    assert_eq!(body["view"]["state"], "ready");
    assert_eq!(body["view"]["filter"], "lyrics");

    // Filtering is client-side only
    assert_eq!(counter.load(Ordering::SeqCst), 1);

    let body = extract_json(
        send(
            &app,
            json_request("POST", "/api/related-media/filter", json!({ "category": "all" })),
        )
        .await,
    )
    .await;
    assert_eq!(body["visible_count"], 12);
}

#[tokio::test]
async fn test_filter_with_no_matches_shows_empty_heading() {
    let counter = Arc::new(AtomicUsize::new(0));
    let videos = json!({ "videos": [{ "video_id": "a", "title": "Official Video" }] });
    let base = spawn_upstream(video_upstream(counter, StatusCode::OK, videos)).await;
    let app = app_with(config_for(&base));

    put_identity(&app, "Perfect", "Ed Sheeran").await;
    send(&app, request("POST", "/api/related-media/load")).await;

    let body = extract_json(
        send(
            &app,
            json_request("POST", "/api/related-media/filter", json!({ "category": "remix" })),
        )
        .await,
    )
    .await;
    assert_eq!(body["visible_count"], 0);
    assert_eq!(body["view"]["state"], "ready");
    assert_eq!(body["view"]["heading"], "No videos were found.");
}

#[tokio::test]
async fn test_server_error_then_retry_issues_one_request() {
    let counter = Arc::new(AtomicUsize::new(0));
    let base = spawn_upstream(video_upstream(
        counter.clone(),
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({}),
    ))
    .await;
    let app = app_with(config_for(&base));

    put_identity(&app, "Shape of You", "Ed Sheeran").await;
    let view = extract_json(send(&app, request("POST", "/api/related-media/load")).await).await;

    assert_eq!(view["state"], "failed");
    assert_eq!(view["message"], "HTTP error! status: 500");
    assert_eq!(view["can_retry"], true);
    assert_eq!(view["videos"], json!([]));
    assert_eq!(counter.load(Ordering::SeqCst), 1);

    let response = send(&app, request("POST", "/api/related-media/retry")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let view = extract_json(response).await;

    assert_eq!(view["state"], "failed");
    assert_eq!(counter.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_error_payload_becomes_message() {
    let counter = Arc::new(AtomicUsize::new(0));
    let base = spawn_upstream(video_upstream(
        counter,
        StatusCode::OK,
        json!({ "videos": [], "error": "YouTube quota exceeded" }),
    ))
    .await;
    let app = app_with(config_for(&base));

    put_identity(&app, "Shape of You", "Ed Sheeran").await;
    let view = extract_json(send(&app, request("POST", "/api/related-media/load")).await).await;

    assert_eq!(view["state"], "failed");
    assert_eq!(view["message"], "YouTube quota exceeded");
}

#[tokio::test]
async fn test_unreachable_upstream_uses_generic_message() {
    let app = app_with(config_for("http://127.0.0.1:9"));

    put_identity(&app, "Shape of You", "Ed Sheeran").await;
    let view = extract_json(send(&app, request("POST", "/api/related-media/load")).await).await;

    assert_eq!(view["state"], "failed");
    assert_eq!(view["message"], "Failed to fetch music videos");
}

#[tokio::test]
async fn test_test_identity_passes_through_loading() {
    let release = Arc::new(Notify::new());
    let upstream = Router::new().route(
        "/api/music-videos",
        post({
            let release = release.clone();
            move |Json(request): Json<Value>| {
                let release = release.clone();
                async move {
                    release.notified().await;
                    assert_eq!(request["song_name"], "Shape of You");
                    assert_eq!(request["artist_name"], "Ed Sheeran");
                    Json(json!({ "videos": [{ "video_id": "x", "title": "Shape of You" }] }))
                }
            }
        }),
    );
    let base = spawn_upstream(upstream).await;
    let app = app_with(config_for(&base));

    let view = extract_json(send(&app, request("POST", "/api/related-media/load")).await).await;
    assert_eq!(view["state"], "no_identity");

    let pending = tokio::spawn({
        let app = app.clone();
        async move { extract_json(send(&app, request("POST", "/api/related-media/test-identity")).await).await }
    });

    let mut saw_loading = false;
    for _ in 0..200 {
        let view = extract_json(send(&app, request("GET", "/api/related-media")).await).await;
        if view["state"] == "loading" {
            assert_eq!(view["identity"]["songName"], "Shape of You");
            saw_loading = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(saw_loading, "pipeline never entered loading");

    // Identity was written to the session
    let stored = extract_json(send(&app, request("GET", "/api/session/song-details")).await).await;
    assert_eq!(stored["isrc"], "GBAHS1700214");
    assert_eq!(stored["albumName"], "÷ (Divide)");

    release.notify_one();
    let view = pending.await.unwrap();
    assert_eq!(view["state"], "ready");
    assert_eq!(view["video_count"], 1);
}

// =============================================================================
// Lyrics
// =============================================================================

fn lyrics_upstream() -> Router {
    Router::new().route(
        "/api/lyrics",
        get(|Query(params): Query<HashMap<String, String>>| async move {
            match params.get("isrc").map(String::as_str) {
                Some("GBAHS1700214") => Json(json!({
                    "message": {
                        "header": { "status_code": 200 },
                        "body": { "lyrics": { "lyrics_body": "The club isn't the best place to find a lover" } }
                    }
                }))
                .into_response(),
                Some("BROKEN") => StatusCode::SERVICE_UNAVAILABLE.into_response(),
                _ => Json(json!({ "message": { "header": { "status_code": 404 }, "body": [] } }))
                    .into_response(),
            }
        }),
    )
}

#[tokio::test]
async fn test_lyrics_lookup() {
    let base = spawn_upstream(lyrics_upstream()).await;
    let app = app_with(config_for(&base));

    let body = extract_json(send(&app, request("GET", "/api/songs/GBAHS1700214/lyrics")).await).await;
    assert_eq!(body["isrc"], "GBAHS1700214");
    assert_eq!(body["lyrics"], "The club isn't the best place to find a lover");
}

#[tokio::test]
async fn test_missing_or_failed_lyrics_are_empty() {
    let base = spawn_upstream(lyrics_upstream()).await;
    let app = app_with(config_for(&base));

    for isrc in ["USUM71703861", "BROKEN"] {
        let response = send(&app, request("GET", &format!("/api/songs/{}/lyrics", isrc))).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(extract_json(response).await["lyrics"], "");
    }
}

// =============================================================================
// Featured songs
// =============================================================================

const ARTIST: &str = "6eUKZXaKkcviH0Ku9w2n3V";

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == "Bearer catalog-token")
}

fn catalog_upstream() -> Router {
    Router::new()
        .route(
            "/artists/:id/albums",
            get(
                |Path(id): Path<String>, Query(params): Query<HashMap<String, String>>, headers: HeaderMap| async move {
                    if !authorized(&headers) {
                        return StatusCode::UNAUTHORIZED.into_response();
                    }
                    assert_eq!(id, ARTIST);
                    assert_eq!(params.get("include_groups").map(String::as_str), Some("appears_on"));
                    assert_eq!(params.get("limit").map(String::as_str), Some("50"));
                    Json(json!({ "items": [
                        { "id": "va", "name": "Now 99", "album_type": "album", "artists": [{ "id": "v", "name": "Various Artists" }] },
                        { "id": "single", "name": "Remixes", "album_type": "single", "artists": [{ "id": "o", "name": "Other" }] },
                        { "id": "mood", "name": "Chill Vibes 2021", "album_type": "album", "artists": [{ "id": "o", "name": "Other" }] },
                        { "id": "g1", "name": "No.6 Collaborations Project", "album_type": "album", "artists": [{ "id": ARTIST, "name": "Ed Sheeran" }] },
                        { "id": "g2", "name": "Justice", "album_type": "album", "artists": [{ "id": "jb", "name": "Justin Bieber" }] }
                    ]}))
                    .into_response()
                },
            ),
        )
        .route(
            "/albums",
            get(|Query(params): Query<HashMap<String, String>>, headers: HeaderMap| async move {
                if !authorized(&headers) {
                    return StatusCode::UNAUTHORIZED.into_response();
                }
                assert_eq!(params.get("ids").map(String::as_str), Some("g1,g2"));
                Json(json!({ "albums": [
                    {
                        "id": "g1",
                        "name": "No.6 Collaborations Project",
                        "release_date": "2019-07-12",
                        "images": [{ "url": "https://img/g1.jpg" }, { "url": "https://img/g1-small.jpg" }],
                        "tracks": { "items": [
                            { "id": "t1", "name": "Beautiful People", "duration_ms": 197866, "artists": [{ "id": ARTIST, "name": "Ed Sheeran" }, { "id": "k", "name": "Khalid" }] }
                        ]}
                    },
                    {
                        "id": "g2",
                        "name": "Justice",
                        "release_date": "2021",
                        "images": [{ "url": "https://img/g2.jpg" }],
                        "tracks": { "items": [
                            { "id": "t2", "name": "Holy", "artists": [{ "id": "jb", "name": "Justin Bieber" }] },
                            { "id": "t3", "name": "Love You Different", "duration_ms": 199000, "artists": [{ "id": "jb", "name": "Justin Bieber" }, { "id": ARTIST, "name": "Ed Sheeran" }] }
                        ]}
                    }
                ]}))
                .into_response()
            }),
        )
}

#[tokio::test]
async fn test_featured_songs_via_cookie() {
    let base = spawn_upstream(catalog_upstream()).await;
    let app = app_with(config_for(&base));

    let request = axum::http::Request::builder()
        .uri(format!("/api/artists/{}/featured", ARTIST))
        .header("cookie", "token=catalog-token")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = send(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response).await;
    assert_eq!(body["artist_id"], ARTIST);
    assert_eq!(
        body["songs"],
        json!([
            {
                "id": "t1",
                "name": "Beautiful People",
                "imageURL": "https://img/g1.jpg",
                "label": "Beautiful People",
                "artists": "Ed Sheeran, Khalid",
                "length": "3:17",
                "year": "2019"
            },
            {
                "id": "t3",
                "name": "Love You Different",
                "imageURL": "https://img/g2.jpg",
                "label": "Love You Different",
                "artists": "Justin Bieber, Ed Sheeran",
                "length": "3:19",
                "year": "2021"
            }
        ])
    );
}

#[tokio::test]
async fn test_rejected_token_yields_empty_list() {
    let base = spawn_upstream(catalog_upstream()).await;
    let app = app_with(config_for(&base));

    let request = axum::http::Request::builder()
        .uri(format!("/api/artists/{}/featured", ARTIST))
        .header("authorization", "Bearer expired")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = send(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(extract_json(response).await["songs"], json!([]));
}

// =============================================================================
// Artwork
// =============================================================================

fn solid_png(r: u8, g: u8, b: u8) -> Vec<u8> {
    let image = image::RgbaImage::from_pixel(16, 16, image::Rgba([r, g, b, 255]));
    let mut bytes = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(image)
        .write_to(&mut bytes, image::ImageFormat::Png)
        .unwrap();
    bytes.into_inner()
}

fn artwork_upstream() -> Router {
    Router::new()
        .route(
            "/cover.png",
            get(|| async { ([("content-type", "image/png")], solid_png(200, 30, 30)) }),
        )
        .route("/not-an-image", get(|| async { "hello" }))
}

#[tokio::test]
async fn test_artwork_color() {
    let base = spawn_upstream(artwork_upstream()).await;
    let app = default_app();

    let uri = format!("/api/artwork/color?url={}/cover.png", base);
    let response = send(&app, request("GET", &uri)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response).await;
    assert_eq!(body["color"], json!([200, 30, 30]));
    assert_eq!(body["rgb"], "rgb(200, 30, 30)");
    assert_eq!(body["contrast_delta"], 50);
}

#[tokio::test]
async fn test_artwork_errors() {
    let base = spawn_upstream(artwork_upstream()).await;
    let app = default_app();

    let response = send(&app, request("GET", &format!("/api/artwork/color?url={}/not-an-image", base))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(&app, request("GET", &format!("/api/artwork/color?url={}/missing.png", base))).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(extract_json(response).await["error"]["code"], "UPSTREAM_ERROR");
}
