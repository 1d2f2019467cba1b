// tests/api_tests.rs

use std::sync::Arc;

use chrono::{Duration, Utc};
use comment_service::{
    config::Config,
    models::{challenge::Difficulty, comment::CommentRoot, report::ReportType},
    repositories::{MemoryStore, memory::NewComment},
    routes,
    state::AppState,
    utils::jwt::sign_jwt,
};

const JWT_SECRET: &str = "test_secret_for_integration_tests";

/// Spawns the app on a random port, backed by the given store.
/// Returns the base URL (e.g., "http://127.0.0.1:12345").
async fn spawn_app(store: Arc<MemoryStore>) -> String {
    let config = Config {
        database_url: "memory".to_string(),
        jwt_secret: JWT_SECRET.to_string(),
        rust_log: "error".to_string(),
        bind_addr: "127.0.0.1:0".to_string(),
    };

    let state = AppState { store, config };
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");

    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    address
}

fn token(user_id: i64, role: &str) -> String {
    sign_jwt(user_id, role, JWT_SECRET, 600).expect("Failed to sign token")
}

struct Fixture {
    store: Arc<MemoryStore>,
    voter: i64,
    challenge: i64,
    voted_comment: i64,
}

/// One challenge with three top-level comments, one reply, and one vote.
fn fixture() -> Fixture {
    let store = Arc::new(MemoryStore::new());
    let author = store.add_user("alice", "user");
    let voter = store.add_user("bob", "user");
    let challenge = store.add_challenge("Awaited", Difficulty::Easy, author, Utc::now());
    let root = CommentRoot::Challenge(challenge);

    let mut ids = Vec::new();
    for i in 0..3 {
        ids.push(store.add_comment(NewComment {
            root,
            parent_id: None,
            user_id: author,
            text: format!("top {}", i),
            visible: true,
            created_at: Utc::now() + Duration::seconds(i),
        }));
    }
    store.add_comment(NewComment {
        root,
        parent_id: Some(ids[0]),
        user_id: voter,
        text: "reply".to_string(),
        visible: true,
        created_at: Utc::now(),
    });
    store.add_vote(voter, ids[1]);

    Fixture {
        store,
        voter,
        challenge,
        voted_comment: ids[1],
    }
}

#[tokio::test]
async fn unknown_path_404() {
    let address = spawn_app(Arc::new(MemoryStore::new())).await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/random_path_that_does_not_exist", address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn list_comments_anonymous() {
    let f = fixture();
    let address = spawn_app(f.store.clone()).await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/api/comments/challenge/{}?page=1", address, f.challenge))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();

    assert_eq!(body["total_comments"], 4);
    assert_eq!(body["total_pages"], 1);
    assert_eq!(body["has_more"], false);

    let comments = body["comments"].as_array().unwrap();
    assert_eq!(comments.len(), 3);
    // Default ordering: newest first
    assert_eq!(comments[0]["text"], "top 2");
    assert_eq!(comments[0]["root_type"], "CHALLENGE");
    assert_eq!(comments[0]["author"]["name"], "alice");
    assert!(comments.iter().all(|c| c["has_voted"] == false));
}

#[tokio::test]
async fn list_comments_marks_viewer_votes() {
    let f = fixture();
    let address = spawn_app(f.store.clone()).await;
    let client = reqwest::Client::new();

    let body: serde_json::Value = client
        .get(format!(
            "{}/api/comments/CHALLENGE/{}?page=1&sort_key=vote&sort_order=desc",
            address, f.challenge
        ))
        .header("Authorization", format!("Bearer {}", token(f.voter, "user")))
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .unwrap();

    let comments = body["comments"].as_array().unwrap();
    assert_eq!(comments[0]["id"], f.voted_comment);
    assert_eq!(comments[0]["vote_count"], 1);
    assert_eq!(comments[0]["has_voted"], true);
    assert!(comments[1..].iter().all(|c| c["has_voted"] == false));
}

#[tokio::test]
async fn invalid_token_is_treated_as_anonymous() {
    let f = fixture();
    let address = spawn_app(f.store.clone()).await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/api/comments/challenge/{}?page=1", address, f.challenge))
        .header("Authorization", "Bearer not-a-jwt")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    let comments = body["comments"].as_array().unwrap();
    assert!(comments.iter().all(|c| c["has_voted"] == false));
}

#[tokio::test]
async fn list_replies_of_one_comment() {
    let f = fixture();
    let address = spawn_app(f.store.clone()).await;
    let client = reqwest::Client::new();

    let top: serde_json::Value = client
        .get(format!(
            "{}/api/comments/challenge/{}?page=1&sort_key=replies",
            address, f.challenge
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let parent = &top["comments"][0];
    assert_eq!(parent["reply_count"], 1);

    let replies: serde_json::Value = client
        .get(format!(
            "{}/api/comments/challenge/{}?page=1&parent_id={}",
            address, f.challenge, parent["id"]
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let comments = replies["comments"].as_array().unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0]["text"], "reply");
    assert_eq!(comments[0]["parent_id"], parent["id"]);
}

#[tokio::test]
async fn list_comments_rejects_bad_input() {
    let f = fixture();
    let address = spawn_app(f.store.clone()).await;
    let client = reqwest::Client::new();

    for path in [
        format!("/api/comments/challenge/{}?page=0", f.challenge),
        format!("/api/comments/post/{}?page=1", f.challenge),
        format!("/api/comments/challenge/{}", f.challenge),
        format!("/api/comments/challenge/{}?page=1&sort_key=likes", f.challenge),
    ] {
        let response = client
            .get(format!("{}{}", address, path))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status().as_u16(), 400, "path: {}", path);
    }
}

#[tokio::test]
async fn explore_returns_sections_in_order() {
    let store = Arc::new(MemoryStore::new());
    let author = store.add_user("alice", "user");
    let easy = store.add_challenge("Pick", Difficulty::Easy, author, Utc::now());
    let hard = store.add_challenge("Deep Readonly", Difficulty::Hard, author, Utc::now());
    store.add_challenge("Tuple to Union", Difficulty::Medium, author, Utc::now());
    store.add_challenge_vote(author, hard);

    let address = spawn_app(store).await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/api/explore", address))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 200);

    let sections: Vec<serde_json::Value> = response.json().await.unwrap();
    let tags: Vec<&str> = sections.iter().map(|s| s["tag"].as_str().unwrap()).collect();
    assert_eq!(tags, vec!["POPULAR", "NEWEST", "EASY", "MEDIUM", "HARD"]);

    assert_eq!(sections[0]["title"], "💕 Most Popular");
    assert_eq!(sections[0]["challenges"][0]["id"], hard);
    assert_eq!(sections[1]["challenges"].as_array().unwrap().len(), 3);

    let easy_section = sections[2]["challenges"].as_array().unwrap();
    assert_eq!(easy_section.len(), 1);
    assert_eq!(easy_section[0]["id"], easy);
    assert_eq!(sections[4]["redirect_route"], "/explore/hard");
}

#[tokio::test]
async fn comment_report_requires_admin() {
    let f = fixture();
    let report = f.store.add_report(ReportType::Comment, Some(f.voted_comment));
    let address = spawn_app(f.store.clone()).await;
    let client = reqwest::Client::new();
    let url = format!("{}/api/admin/reports/{}/comment", address, report);

    let response = client.get(&url).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 401);

    let response = client
        .get(&url)
        .header("Authorization", format!("Bearer {}", token(f.voter, "user")))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 403);
}

#[tokio::test]
async fn comment_report_view_for_admin() {
    let f = fixture();
    let admin = f.store.add_user("mod", "admin");
    let comment_report = f.store.add_report(ReportType::Comment, Some(f.voted_comment));
    let user_report = f.store.add_report(ReportType::User, None);
    let address = spawn_app(f.store.clone()).await;
    let client = reqwest::Client::new();
    let auth = format!("Bearer {}", token(admin, "admin"));

    let view: serde_json::Value = client
        .get(format!("{}/api/admin/reports/{}/comment", address, comment_report))
        .header("Authorization", &auth)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(view["href"], format!("/challenge/{}", f.challenge));
    assert_eq!(view["root_type"], "CHALLENGE");
    assert_eq!(view["root_label"], "Awaited");
    assert_eq!(view["comment"]["id"], f.voted_comment);

    let response = client
        .get(format!("{}/api/admin/reports/{}/comment", address, user_report))
        .header("Authorization", &auth)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body.is_null());

    let response = client
        .get(format!("{}/api/admin/reports/999999/comment", address))
        .header("Authorization", &auth)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);
}
