mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use chrono::{Duration, Utc};

use common::{request, slugs, TestApp};

#[tokio::test]
async fn post_notifies_other_member_and_feed_shows_slug() {
    let app = TestApp::new();
    let a = app.store.add_user("alice");
    let b = app.store.add_user("bob");
    let chat = app.store.add_chat(Some("seven"), &[a.id, b.id]);
    let uri = format!("/chats/{}", chat.id);

    let (status, body) = app
        .call(Method::POST, &uri, a.id, Some(r#"{"content":"hi"}"#))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    let messages = body["data"]["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["content"], "hi");
    assert_eq!(messages[0]["author_id"], a.id);
    let message_id = messages[0]["id"].as_i64().unwrap() as i32;

    let notifs = app.store.notifications_for_message(message_id);
    assert_eq!(notifs.len(), 1);
    assert_eq!(notifs[0].target_user, b.id);

    let (status, body) = app.call(Method::GET, "/notifications", b.id, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(slugs(&body), vec![format!("message-{}", notifs[0].id)]);
    assert_eq!(body["data"]["notifs"][0]["target_message"], message_id);

    // the author is not notified of their own message
    let (_, body) = app.call(Method::GET, "/notifications", a.id, None).await;
    assert!(slugs(&body).is_empty());
}

#[tokio::test]
async fn fan_out_covers_every_other_member() {
    let app = TestApp::new();
    let users: Vec<_> = ["a", "b", "c", "d"].iter().map(|n| app.store.add_user(n)).collect();
    let ids: Vec<_> = users.iter().map(|u| u.id).collect();
    let chat = app.store.add_chat(None, &ids);

    let (status, body) = app
        .call(Method::POST, &format!("/chats/{}", chat.id), ids[2], Some(r#"{"content":"yo"}"#))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(app.store.message_count(), 1);

    let message_id = body["data"]["messages"][0]["id"].as_i64().unwrap() as i32;
    let mut targets: Vec<_> = app
        .store
        .notifications_for_message(message_id)
        .iter()
        .map(|n| n.target_user)
        .collect();
    targets.sort();
    assert_eq!(targets, vec![ids[0], ids[1], ids[3]]);
}

#[tokio::test]
async fn get_chat_returns_thread_to_members_only() {
    let app = TestApp::new();
    let a = app.store.add_user("a");
    let b = app.store.add_user("b");
    let outsider = app.store.add_user("outsider");
    let chat = app.store.add_chat(Some("pair"), &[a.id, b.id]);
    let uri = format!("/chats/{}", chat.id);

    app.call(Method::POST, &uri, b.id, Some(r#"{"content":"first"}"#)).await;

    let (status, body) = app.call(Method::GET, &uri, a.id, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], chat.id);
    assert_eq!(body["data"]["name"], "pair");
    assert_eq!(body["data"]["members"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"]["messages"][0]["content"], "first");

    let (status, body) = app.call(Method::GET, &uri, outsider.id, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "E4002");
}

#[tokio::test]
async fn outsider_cannot_post() {
    let app = TestApp::new();
    let a = app.store.add_user("a");
    let outsider = app.store.add_user("outsider");
    let chat = app.store.add_chat(None, &[a.id]);

    let (status, _) = app
        .call(Method::POST, &format!("/chats/{}", chat.id), outsider.id, Some(r#"{"content":"hi"}"#))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(app.store.message_count(), 0);
}

#[tokio::test]
async fn unknown_chat_is_not_found() {
    let app = TestApp::new();
    let a = app.store.add_user("a");

    let (status, body) = app.call(Method::GET, "/chats/9999", a.id, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "E4001");

    let (status, _) = app
        .call(Method::POST, "/chats/9999", a.id, Some(r#"{"content":"hi"}"#))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.call(Method::GET, "/chats/not-a-number", a.id, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn post_without_content_is_bad_request() {
    let app = TestApp::new();
    let a = app.store.add_user("a");
    let b = app.store.add_user("b");
    let chat = app.store.add_chat(None, &[a.id, b.id]);
    let uri = format!("/chats/{}", chat.id);

    for body in [r#"{"text":"hi"}"#, r#"{"content":1}"#, "nonsense"] {
        let (status, json) = app.call(Method::POST, &uri, a.id, Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(json["error"]["code"], "E0008");
    }

    assert_eq!(app.store.message_count(), 0);
    let (_, json) = app.call(Method::GET, "/notifications", b.id, None).await;
    assert!(slugs(&json).is_empty());
}

#[tokio::test]
async fn long_message_is_posted_and_fanned_out() {
    let app = TestApp::new();
    let a = app.store.add_user("a");
    let b = app.store.add_user("b");
    let chat = app.store.add_chat(None, &[a.id, b.id]);
    let body = serde_json::json!({ "content": "x".repeat(5000) }).to_string();

    let (status, json) = app
        .call(Method::POST, &format!("/chats/{}", chat.id), a.id, Some(&body))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(app.store.message_count(), 1);
    assert_eq!(json["data"]["messages"][0]["content"].as_str().unwrap().len(), 5000);

    let (_, json) = app.call(Method::GET, "/notifications", b.id, None).await;
    assert_eq!(slugs(&json).len(), 1);
}

#[tokio::test]
async fn feed_is_sorted_oldest_first_across_kinds() {
    let app = TestApp::new();
    let u = app.store.add_user("u");
    let author = app.store.add_user("author");
    let comment = app.store.add_comment(author.id, "nice post");
    let now = Utc::now();

    let newer_message = app.store.add_message_notification(u.id, 1, now);
    let older_comment = app
        .store
        .add_comment_notification(u.id, comment.id, now - Duration::seconds(30));
    let oldest_message = app
        .store
        .add_message_notification(u.id, 1, now - Duration::seconds(60));

    let (status, body) = app.call(Method::GET, "/notifications", u.id, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        slugs(&body),
        vec![
            format!("message-{}", oldest_message.id),
            format!("comment-{}", older_comment.id),
            format!("message-{}", newer_message.id),
        ]
    );
    assert_eq!(body["data"]["notifs"][1]["kind"], "comment");
    assert_eq!(body["data"]["notifs"][1]["target_comment"], comment.id);
}

#[tokio::test]
async fn clearing_twice_returns_empty_feed() {
    let app = TestApp::new();
    let u = app.store.add_user("u");
    let other = app.store.add_user("other");
    app.store.add_message_notification(u.id, 1, Utc::now());
    app.store.add_comment_notification(u.id, 1, Utc::now());
    app.store.add_comment_notification(other.id, 1, Utc::now());

    for _ in 0..2 {
        let (status, body) = app.call(Method::DELETE, "/notifications", u.id, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["notifs"], serde_json::json!([]));
    }

    let (_, body) = app.call(Method::GET, "/notifications", other.id, None).await;
    assert_eq!(slugs(&body).len(), 1);
}

#[tokio::test]
async fn dismissing_by_slug_leaves_the_rest() {
    let app = TestApp::new();
    let u = app.store.add_user("u");
    let now = Utc::now();
    let m = app.store.add_message_notification(u.id, 1, now - Duration::seconds(2));
    let c = app.store.add_comment_notification(u.id, 1, now - Duration::seconds(1));
    let m2 = app.store.add_message_notification(u.id, 1, now);

    let (status, body) = app
        .call(Method::DELETE, &format!("/notifications/message-{}", m.id), u.id, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        slugs(&body),
        vec![format!("comment-{}", c.id), format!("message-{}", m2.id)]
    );

    let (status, _) = app
        .call(Method::DELETE, &format!("/notifications/message-{}", m.id), u.id, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cannot_dismiss_someone_elses_notification() {
    let app = TestApp::new();
    let owner = app.store.add_user("owner");
    let intruder = app.store.add_user("intruder");
    let c = app.store.add_comment_notification(owner.id, 1, Utc::now());

    let (status, body) = app
        .call(Method::DELETE, &format!("/notifications/comment-{}", c.id), intruder.id, None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "E5002");

    let (_, body) = app.call(Method::GET, "/notifications", owner.id, None).await;
    assert_eq!(slugs(&body), vec![format!("comment-{}", c.id)]);
}

#[tokio::test]
async fn bad_slugs_are_rejected_without_changes() {
    let app = TestApp::new();
    let u = app.store.add_user("u");
    let m = app.store.add_message_notification(u.id, 1, Utc::now());

    for slug in ["foo", "post-1", "MESSAGE-1", "message-"] {
        let (status, body) = app
            .call(Method::DELETE, &format!("/notifications/{slug}"), u.id, None)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{slug}");
        assert_eq!(body["error"]["code"], "E5003");
        assert_eq!(body["error"]["details"]["slug"], slug);
    }

    let (status, _) = app
        .call(Method::DELETE, "/notifications/comment-31337", u.id, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = app.call(Method::GET, "/notifications", u.id, None).await;
    assert_eq!(slugs(&body), vec![format!("message-{}", m.id)]);
}

#[tokio::test]
async fn requests_need_a_bearer_token() {
    let app = TestApp::new();

    let (status, body) = app
        .send(request(Method::GET, "/notifications", None, None))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "E0004");

    let forged = Request::builder()
        .uri("/notifications")
        .header("Authorization", "Bearer not-a-jwt")
        .body(Body::empty())
        .unwrap();
    let (status, body) = app.send(forged).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "E1005");
}

#[tokio::test]
async fn mutating_calls_need_csrf_header() {
    let app = TestApp::new();
    let u = app.store.add_user("u");
    app.store.add_comment_notification(u.id, 1, Utc::now());

    let no_csrf = Request::builder()
        .method(Method::DELETE)
        .uri("/notifications")
        .header("Authorization", format!("Bearer {}", common::token_for(u.id)))
        .body(Body::empty())
        .unwrap();
    let (status, body) = app.send(no_csrf).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "E0010");

    let (_, body) = app.call(Method::GET, "/notifications", u.id, None).await;
    assert_eq!(slugs(&body).len(), 1);
}

#[tokio::test]
async fn csrf_check_can_be_disabled() {
    let app = TestApp::with_csrf(false);
    let u = app.store.add_user("u");

    let no_csrf = Request::builder()
        .method(Method::DELETE)
        .uri("/notifications")
        .header("Authorization", format!("Bearer {}", common::token_for(u.id)))
        .body(Body::empty())
        .unwrap();
    let (status, _) = app.send(no_csrf).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn health_reports_store() {
    let app = TestApp::new();
    let req = Request::builder().uri("/health").body(Body::empty()).unwrap();

    let (status, body) = app.send(req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "socialmedia-api");
    assert_eq!(body["checks"][0]["name"], "store");
}
