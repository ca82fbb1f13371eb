use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde_json::json;
use std::sync::Arc;
use vidnest_common::media::{MediaKey, MediaReader, MediaStore, StorageError};

use crate::common::{TestApp, file_part, publish_form, routes};

mod publish {
    use super::*;

    #[tokio::test]
    async fn publish_stores_files_and_creates_video() {
        let app = TestApp::spawn().await;
        let alice = app.create_user("alice").await;

        let form = publish_form("First clip", "Hello world", b"fake mp4 bytes", b"fake png");
        let res = app
            .post_multipart_with_token(routes::VIDEOS, form, &alice.token)
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["title"], "First clip");
        assert_eq!(res.body["owner_id"], alice.id.as_str());
        assert_eq!(res.body["is_published"], true);
        assert_eq!(res.body["views"], 0);

        let key = MediaKey::of(b"fake mp4 bytes");
        assert_eq!(
            res.body["video_file"],
            format!("/api/v1/media/{key}/clip.mp4").as_str()
        );
    }

    #[tokio::test]
    async fn published_file_downloads_with_etag() {
        let app = TestApp::spawn().await;
        let alice = app.create_user("alice").await;

        let form = publish_form("Clip", "Desc", b"video payload", b"thumb payload");
        let res = app
            .post_multipart_with_token(routes::VIDEOS, form, &alice.token)
            .await;
        assert_eq!(res.status, 201, "{}", res.text);

        let url = res.body["thumbnail"].as_str().unwrap().to_string();
        let download = app.get_raw(&url, &[]).await;
        assert_eq!(download.status().as_u16(), 200);
        assert_eq!(download.headers()["content-type"], "image/png");
        let etag = download.headers()["etag"].to_str().unwrap().to_string();
        assert_eq!(download.bytes().await.unwrap().as_ref(), b"thumb payload");

        let cached = app.get_raw(&url, &[("If-None-Match", &etag)]).await;
        assert_eq!(cached.status().as_u16(), 304);
    }

    #[tokio::test]
    async fn missing_title_is_rejected() {
        let app = TestApp::spawn().await;
        let alice = app.create_user("alice").await;

        let form = publish_form("   ", "Desc", b"video", b"thumb");
        let res = app
            .post_multipart_with_token(routes::VIDEOS, form, &alice.token)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.code(), "VALIDATION_ERROR");
        assert_eq!(res.body["message"], "Title and description are required");
    }

    #[tokio::test]
    async fn rejected_publish_leaves_no_media_behind() {
        let app = TestApp::spawn().await;
        let alice = app.create_user("alice").await;

        let form = publish_form("", "Desc", b"orphan video", b"orphan thumb");
        let res = app
            .post_multipart_with_token(routes::VIDEOS, form, &alice.token)
            .await;
        assert_eq!(res.status, 400);

        assert!(!app.has_media(b"orphan video").await);
        assert!(!app.has_media(b"orphan thumb").await);

        let form = publish_form("Kept", "Desc", b"kept video", b"kept thumb");
        let res = app
            .post_multipart_with_token(routes::VIDEOS, form, &alice.token)
            .await;
        assert_eq!(res.status, 201, "{}", res.text);
        assert!(app.has_media(b"kept video").await);
    }

    #[tokio::test]
    async fn missing_thumbnail_is_rejected() {
        let app = TestApp::spawn().await;
        let alice = app.create_user("alice").await;

        let form = reqwest::multipart::Form::new()
            .text("title", "Clip")
            .text("description", "Desc")
            .part("video", file_part(b"video", "clip.mp4", "video/mp4"));
        let res = app
            .post_multipart_with_token(routes::VIDEOS, form, &alice.token)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["message"], "Thumbnail is required");
    }

    #[tokio::test]
    async fn publish_requires_token() {
        let app = TestApp::spawn().await;

        let form = publish_form("Clip", "Desc", b"video", b"thumb");
        let res = app
            .client
            .post(format!("http://{}{}", app.addr, routes::VIDEOS))
            .multipart(form)
            .send()
            .await
            .unwrap();

        assert_eq!(res.status().as_u16(), 401);
    }

    struct FailingStore;

    #[async_trait]
    impl MediaStore for FailingStore {
        async fn put_stream(&self, _reader: MediaReader) -> Result<MediaKey, StorageError> {
            Err(StorageError::Io(std::io::Error::other("disk on fire")))
        }

        async fn get_stream(&self, key: &MediaKey) -> Result<MediaReader, StorageError> {
            Err(StorageError::NotFound(key.to_hex()))
        }

        async fn size(&self, key: &MediaKey) -> Result<u64, StorageError> {
            Err(StorageError::NotFound(key.to_hex()))
        }
    }

    #[tokio::test]
    async fn failed_upload_creates_no_video() {
        let app = TestApp::spawn_with_media(Some(Arc::new(FailingStore))).await;
        let alice = app.create_user("alice").await;

        let form = publish_form("Clip", "Desc", b"video", b"thumb");
        let res = app
            .post_multipart_with_token(routes::VIDEOS, form, &alice.token)
            .await;
        assert_eq!(res.status, 500);
        assert_eq!(res.code(), "UPLOAD_FAILED");

        let list = app.get_without_token(routes::VIDEOS).await;
        assert_eq!(list.status, 200);
        assert_eq!(list.body["pagination"]["total"], 0);
    }

    struct UnreadableStore;

    #[async_trait]
    impl MediaStore for UnreadableStore {
        async fn put_stream(&self, _reader: MediaReader) -> Result<MediaKey, StorageError> {
            Err(StorageError::Io(std::io::Error::other("read-only")))
        }

        async fn get_stream(&self, _key: &MediaKey) -> Result<MediaReader, StorageError> {
            Err(StorageError::Io(std::io::Error::other("bad sector")))
        }

        async fn size(&self, _key: &MediaKey) -> Result<u64, StorageError> {
            Err(StorageError::Io(std::io::Error::other("bad sector")))
        }
    }

    #[tokio::test]
    async fn failed_media_read_is_an_internal_error() {
        let app = TestApp::spawn_with_media(Some(Arc::new(UnreadableStore))).await;

        let url = format!("/api/v1/media/{}/clip.mp4", MediaKey::of(b"clip"));
        let res = app.get_raw(&url, &[]).await;

        assert_eq!(res.status().as_u16(), 500);
        let body: serde_json::Value = res.json().await.unwrap();
        assert_eq!(body["code"], "INTERNAL_ERROR");
    }
}

mod list {
    use super::*;

    #[tokio::test]
    async fn only_published_videos_are_listed() {
        let app = TestApp::spawn().await;
        let alice = app.create_user("alice").await;
        let public = app.insert_video(&alice.id, "Public", true, 0).await;
        app.insert_video(&alice.id, "Draft", false, 0).await;

        let res = app.get_without_token(routes::VIDEOS).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.data_ids(), vec![public]);
        assert_eq!(res.body["pagination"]["total"], 1);
    }

    #[tokio::test]
    async fn items_carry_owner_and_counts() {
        let app = TestApp::spawn().await;
        let alice = app.create_user("alice").await;
        let bob = app.create_user("bob").await;
        let video = app.insert_video(&alice.id, "Clip", true, 5).await;
        app.insert_comment(&video, &bob.id).await;
        app.insert_comment(&video, &alice.id).await;
        app.post_empty_with_token(&routes::like_video(&video), &bob.token)
            .await;

        let anon = app.get_without_token(routes::VIDEOS).await;
        let item = &anon.body["data"][0];
        assert_eq!(item["owner"]["username"], "alice");
        assert_eq!(item["owner"]["id"], alice.id.as_str());
        assert_eq!(item["like_count"], 1);
        assert_eq!(item["comment_count"], 2);
        assert_eq!(item["is_liked"], false);

        let as_bob = app.get_with_token(routes::VIDEOS, &bob.token).await;
        assert_eq!(as_bob.body["data"][0]["is_liked"], true);
    }

    #[tokio::test]
    async fn search_matches_title_or_description_case_insensitively() {
        let app = TestApp::spawn().await;
        let alice = app.create_user("alice").await;
        let now = Utc::now();
        let by_title = app
            .insert_video_at(&alice.id, "Rust Tutorial", "basics", true, 0, now)
            .await;
        let by_desc = app
            .insert_video_at(&alice.id, "Episode 2", "more RUST please", true, 0, now)
            .await;
        app.insert_video_at(&alice.id, "Cooking", "pasta", true, 0, now)
            .await;

        let res = app
            .get_without_token(&format!("{}?query=rust", routes::VIDEOS))
            .await;

        let mut ids = res.data_ids();
        ids.sort();
        let mut expected = vec![by_title, by_desc];
        expected.sort();
        assert_eq!(ids, expected);
    }

    #[tokio::test]
    async fn search_treats_wildcards_literally() {
        let app = TestApp::spawn().await;
        let alice = app.create_user("alice").await;
        let exact = app.insert_video(&alice.id, "100% legit", true, 0).await;
        app.insert_video(&alice.id, "100 reasons", true, 0).await;

        let res = app
            .get_without_token(&format!("{}?query=100%25", routes::VIDEOS))
            .await;

        assert_eq!(res.data_ids(), vec![exact]);
    }

    #[tokio::test]
    async fn user_filter_restricts_owner_and_ignores_malformed_ids() {
        let app = TestApp::spawn().await;
        let alice = app.create_user("alice").await;
        let bob = app.create_user("bob").await;
        let mine = app.insert_video(&alice.id, "Mine", true, 0).await;
        app.insert_video(&bob.id, "Theirs", true, 0).await;

        let filtered = app
            .get_without_token(&format!("{}?userId={}", routes::VIDEOS, alice.id))
            .await;
        assert_eq!(filtered.data_ids(), vec![mine]);

        let malformed = app
            .get_without_token(&format!("{}?userId=not-an-id", routes::VIDEOS))
            .await;
        assert_eq!(malformed.status, 200);
        assert_eq!(malformed.body["pagination"]["total"], 2);
    }

    #[tokio::test]
    async fn sort_by_views_breaks_ties_by_id() {
        let app = TestApp::spawn().await;
        let alice = app.create_user("alice").await;
        let low = app.insert_video(&alice.id, "Low", true, 1).await;
        let tie_a = app.insert_video(&alice.id, "Tie A", true, 7).await;
        let tie_b = app.insert_video(&alice.id, "Tie B", true, 7).await;

        let desc = app
            .get_without_token(&format!("{}?sortBy=views&sortType=desc", routes::VIDEOS))
            .await;
        assert_eq!(desc.data_ids(), vec![tie_b.clone(), tie_a.clone(), low.clone()]);

        let asc = app
            .get_without_token(&format!("{}?sortBy=views&sortType=asc", routes::VIDEOS))
            .await;
        assert_eq!(asc.data_ids(), vec![low, tie_a, tie_b]);
    }

    #[tokio::test]
    async fn default_order_is_newest_first() {
        let app = TestApp::spawn().await;
        let alice = app.create_user("alice").await;
        let now = Utc::now();
        let old = app
            .insert_video_at(&alice.id, "Old", "d", true, 0, now - Duration::days(2))
            .await;
        let new = app.insert_video_at(&alice.id, "New", "d", true, 0, now).await;

        let res = app.get_without_token(routes::VIDEOS).await;

        assert_eq!(res.data_ids(), vec![new, old]);
    }

    #[tokio::test]
    async fn pagination_windows_and_clamps() {
        let app = TestApp::spawn().await;
        let alice = app.create_user("alice").await;
        for i in 0..5 {
            app.insert_video(&alice.id, &format!("Clip {i}"), true, i)
                .await;
        }

        let page2 = app
            .get_without_token(&format!("{}?page=2&limit=2&sortBy=views", routes::VIDEOS))
            .await;
        assert_eq!(page2.body["data"].as_array().unwrap().len(), 2);
        assert_eq!(page2.body["pagination"]["page"], 2);
        assert_eq!(page2.body["pagination"]["total"], 5);
        assert_eq!(page2.body["pagination"]["total_pages"], 3);

        let clamped = app
            .get_without_token(&format!("{}?page=0&limit=1000", routes::VIDEOS))
            .await;
        assert_eq!(clamped.body["pagination"]["page"], 1);
        assert_eq!(clamped.body["pagination"]["per_page"], 100);
    }

    #[tokio::test]
    async fn page_past_the_end_is_empty() {
        let app = TestApp::spawn().await;
        let alice = app.create_user("alice").await;
        for i in 0..5 {
            app.insert_video(&alice.id, &format!("Clip {i}"), true, i)
                .await;
        }

        let res = app
            .get_without_token(&format!("{}?page=4&limit=2", routes::VIDEOS))
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["data"], json!([]));
        assert_eq!(res.body["pagination"]["page"], 4);
        assert_eq!(res.body["pagination"]["total"], 5);
        assert_eq!(res.body["pagination"]["total_pages"], 3);
    }

    #[tokio::test]
    async fn huge_page_is_empty_not_an_error() {
        let app = TestApp::spawn().await;
        let alice = app.create_user("alice").await;
        app.insert_video(&alice.id, "Clip", true, 0).await;

        let res = app
            .get_without_token(&format!(
                "{}?page=18446744073709551615&limit=100",
                routes::VIDEOS
            ))
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["data"], json!([]));
        assert_eq!(res.body["pagination"]["total"], 1);
        assert_eq!(res.body["pagination"]["total_pages"], 1);
    }

    #[tokio::test]
    async fn non_numeric_page_is_a_validation_error() {
        let app = TestApp::spawn().await;

        let res = app
            .get_without_token(&format!("{}?page=abc", routes::VIDEOS))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.code(), "VALIDATION_ERROR");
    }
}

mod read {
    use super::*;

    #[tokio::test]
    async fn malformed_id_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(&routes::video("nope")).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["message"], "Invalid video id");
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app
            .get_without_token(&routes::video("65a1f0c2e4b0a1b2c3d4e5f6"))
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.code(), "NOT_FOUND");
    }

    #[tokio::test]
    async fn unpublished_video_is_visible_only_to_owner() {
        let app = TestApp::spawn().await;
        let alice = app.create_user("alice").await;
        let bob = app.create_user("bob").await;
        let draft = app.insert_video(&alice.id, "Draft", false, 0).await;

        let anon = app.get_without_token(&routes::video(&draft)).await;
        assert_eq!(anon.status, 404);

        let other = app.get_with_token(&routes::video(&draft), &bob.token).await;
        assert_eq!(other.status, 404);

        let owner = app
            .get_with_token(&routes::video(&draft), &alice.token)
            .await;
        assert_eq!(owner.status, 200);
        assert_eq!(owner.body["title"], "Draft");
    }

    #[tokio::test]
    async fn invalid_token_is_rejected_even_on_public_route() {
        let app = TestApp::spawn().await;

        let res = app.get_with_token(routes::VIDEOS, "garbage").await;

        assert_eq!(res.status, 401);
        assert_eq!(res.code(), "TOKEN_INVALID");
    }
}

mod modify {
    use super::*;

    #[tokio::test]
    async fn owner_updates_title_only() {
        let app = TestApp::spawn().await;
        let alice = app.create_user("alice").await;
        let video = app.insert_video(&alice.id, "Old title", true, 0).await;

        let form = reqwest::multipart::Form::new()
            .text("title", "New title")
            .text("description", "   ");
        let res = app
            .patch_multipart_with_token(&routes::video(&video), form, &alice.token)
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["title"], "New title");
        assert_eq!(res.body["description"], "A test video");
    }

    #[tokio::test]
    async fn non_owner_cannot_update() {
        let app = TestApp::spawn().await;
        let alice = app.create_user("alice").await;
        let bob = app.create_user("bob").await;
        let video = app.insert_video(&alice.id, "Clip", true, 0).await;

        let form = reqwest::multipart::Form::new().text("title", "Hijacked");
        let res = app
            .patch_multipart_with_token(&routes::video(&video), form, &bob.token)
            .await;

        assert_eq!(res.status, 403);
        assert_eq!(res.code(), "PERMISSION_DENIED");
        assert_eq!(res.body["message"], "You are not allowed to update this video");

        let unchanged = app.get_with_token(&routes::video(&video), &alice.token).await;
        assert_eq!(unchanged.body["title"], "Clip");
        assert_eq!(unchanged.body["description"], "A test video");
    }

    #[tokio::test]
    async fn toggle_publish_hides_from_list() {
        let app = TestApp::spawn().await;
        let alice = app.create_user("alice").await;
        let video = app.insert_video(&alice.id, "Clip", true, 0).await;

        let res = app
            .patch_empty_with_token(&routes::toggle_publish(&video), &alice.token)
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["is_published"], false);

        let list = app.get_without_token(routes::VIDEOS).await;
        assert_eq!(list.body["pagination"]["total"], 0);

        let again = app
            .patch_empty_with_token(&routes::toggle_publish(&video), &alice.token)
            .await;
        assert_eq!(again.body["is_published"], true);
    }

    #[tokio::test]
    async fn delete_cascades_to_likes_comments_and_playlists() {
        let app = TestApp::spawn().await;
        let alice = app.create_user("alice").await;
        let bob = app.create_user("bob").await;
        let video = app.insert_video(&alice.id, "Clip", true, 0).await;
        let comment = app.insert_comment(&video, &bob.id).await;
        app.post_empty_with_token(&routes::like_video(&video), &bob.token)
            .await;
        app.post_empty_with_token(&routes::like_comment(&comment), &alice.token)
            .await;
        let playlist = app.create_playlist(&bob.token, "Saved").await;
        let added = app
            .patch_empty_with_token(&routes::playlist_add(&video, &playlist), &bob.token)
            .await;
        assert_eq!(added.status, 200, "{}", added.text);

        let denied = app.delete_with_token(&routes::video(&video), &bob.token).await;
        assert_eq!(denied.status, 403);
        let survivor = app.get_without_token(routes::VIDEOS).await;
        assert_eq!(survivor.data_ids(), vec![video.clone()]);
        assert_eq!(survivor.body["data"][0]["like_count"], 1);
        assert_eq!(survivor.body["data"][0]["comment_count"], 1);

        let res = app.delete_with_token(&routes::video(&video), &alice.token).await;
        assert_eq!(res.status, 204, "{}", res.text);

        let gone = app.get_with_token(&routes::video(&video), &alice.token).await;
        assert_eq!(gone.status, 404);

        let liked = app.get_with_token(routes::LIKED_VIDEOS, &bob.token).await;
        assert_eq!(liked.body["data"], json!([]));

        let detail = app.get_with_token(&routes::playlist(&playlist), &bob.token).await;
        assert_eq!(detail.body["videos"], json!([]));

        // The comment is gone, so liking it again is a 404.
        let relike = app
            .post_empty_with_token(&routes::like_comment(&comment), &alice.token)
            .await;
        assert_eq!(relike.status, 404);
    }
}
