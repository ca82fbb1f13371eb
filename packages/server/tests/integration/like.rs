use crate::common::{TestApp, routes};

mod toggle {
    use super::*;

    #[tokio::test]
    async fn toggling_twice_restores_state() {
        let app = TestApp::spawn().await;
        let alice = app.create_user("alice").await;
        let bob = app.create_user("bob").await;
        let video = app.insert_video(&alice.id, "Clip", true, 0).await;

        let first = app
            .post_empty_with_token(&routes::like_video(&video), &bob.token)
            .await;
        assert_eq!(first.status, 200, "{}", first.text);
        assert_eq!(first.body["liked"], true);

        let second = app
            .post_empty_with_token(&routes::like_video(&video), &bob.token)
            .await;
        assert_eq!(second.body["liked"], false);

        let detail = app.get_with_token(&routes::video(&video), &bob.token).await;
        assert_eq!(detail.body["like_count"], 0);
        assert_eq!(detail.body["is_liked"], false);
    }

    #[tokio::test]
    async fn like_counts_are_per_actor() {
        let app = TestApp::spawn().await;
        let alice = app.create_user("alice").await;
        let bob = app.create_user("bob").await;
        let carol = app.create_user("carol").await;
        let video = app.insert_video(&alice.id, "Clip", true, 0).await;

        for user in [&alice, &bob, &carol] {
            let res = app
                .post_empty_with_token(&routes::like_video(&video), &user.token)
                .await;
            assert_eq!(res.body["liked"], true);
        }

        let detail = app.get_without_token(&routes::video(&video)).await;
        assert_eq!(detail.body["like_count"], 3);
    }

    #[tokio::test]
    async fn liking_missing_video_is_not_found() {
        let app = TestApp::spawn().await;
        let bob = app.create_user("bob").await;

        let res = app
            .post_empty_with_token(&routes::like_video("65a1f0c2e4b0a1b2c3d4e5f6"), &bob.token)
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["message"], "Video not found");
    }

    #[tokio::test]
    async fn malformed_ids_are_rejected_per_kind() {
        let app = TestApp::spawn().await;
        let bob = app.create_user("bob").await;

        let video = app
            .post_empty_with_token(&routes::like_video("xyz"), &bob.token)
            .await;
        assert_eq!(video.status, 400);
        assert_eq!(video.body["message"], "Invalid video id");

        let comment = app
            .post_empty_with_token(&routes::like_comment("xyz"), &bob.token)
            .await;
        assert_eq!(comment.body["message"], "Invalid comment id");

        let tweet = app
            .post_empty_with_token(&routes::like_tweet("xyz"), &bob.token)
            .await;
        assert_eq!(tweet.body["message"], "Invalid tweet id");
    }

    #[tokio::test]
    async fn malformed_ids_write_nothing() {
        let app = TestApp::spawn().await;
        let alice = app.create_user("alice").await;
        let bob = app.create_user("bob").await;
        let video = app.insert_video(&alice.id, "Clip", true, 0).await;
        app.insert_comment(&video, &bob.id).await;
        app.post_empty_with_token(&routes::like_video(&video), &bob.token)
            .await;
        let playlist = app.create_playlist(&bob.token, "Saved").await;
        let before = app.row_counts().await;

        let like = app
            .post_empty_with_token(&routes::like_video("not-a-video"), &bob.token)
            .await;
        let subscribe = app
            .post_empty_with_token(&routes::channel_subscription("123"), &bob.token)
            .await;
        let add = app
            .patch_empty_with_token(&routes::playlist_add("zzzz", &playlist), &bob.token)
            .await;
        let delete = app
            .delete_with_token(&routes::video("65a1f0c2e4b0a1b2c3d4e5f"), &alice.token)
            .await;

        for res in [&like, &subscribe, &add, &delete] {
            assert_eq!(res.status, 400, "{}", res.text);
            assert_eq!(res.code(), "VALIDATION_ERROR");
        }
        assert_eq!(app.row_counts().await, before);
    }

    #[tokio::test]
    async fn comment_likes_toggle() {
        let app = TestApp::spawn().await;
        let alice = app.create_user("alice").await;
        let bob = app.create_user("bob").await;
        let video = app.insert_video(&alice.id, "Clip", true, 0).await;
        let comment = app.insert_comment(&video, &bob.id).await;

        let on = app
            .post_empty_with_token(&routes::like_comment(&comment), &alice.token)
            .await;
        assert_eq!(on.body["liked"], true);

        let off = app
            .post_empty_with_token(&routes::like_comment(&comment), &alice.token)
            .await;
        assert_eq!(off.body["liked"], false);
    }

    #[tokio::test]
    async fn tweet_likes_do_not_check_existence() {
        let app = TestApp::spawn().await;
        let bob = app.create_user("bob").await;

        let res = app
            .post_empty_with_token(&routes::like_tweet("65a1f0c2e4b0a1b2c3d4e5f6"), &bob.token)
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["liked"], true);
    }

    #[tokio::test]
    async fn same_id_under_different_kinds_is_independent() {
        let app = TestApp::spawn().await;
        let alice = app.create_user("alice").await;
        let video = app.insert_video(&alice.id, "Clip", true, 0).await;

        app.post_empty_with_token(&routes::like_tweet(&video), &alice.token)
            .await;

        let detail = app.get_with_token(&routes::video(&video), &alice.token).await;
        assert_eq!(detail.body["like_count"], 0);
        assert_eq!(detail.body["is_liked"], false);
    }

    #[tokio::test]
    async fn toggle_requires_token() {
        let app = TestApp::spawn().await;

        let res = app
            .post_empty_without_token(&routes::like_tweet("65a1f0c2e4b0a1b2c3d4e5f6"))
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.code(), "TOKEN_MISSING");
    }
}

mod liked_list {
    use super::*;

    #[tokio::test]
    async fn most_recent_like_comes_first() {
        let app = TestApp::spawn().await;
        let alice = app.create_user("alice").await;
        let bob = app.create_user("bob").await;
        let first = app.insert_video(&alice.id, "First", true, 0).await;
        let second = app.insert_video(&alice.id, "Second", true, 0).await;

        app.post_empty_with_token(&routes::like_video(&first), &bob.token)
            .await;
        app.post_empty_with_token(&routes::like_video(&second), &bob.token)
            .await;

        let res = app.get_with_token(routes::LIKED_VIDEOS, &bob.token).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.data_ids(), vec![second, first]);
        assert_eq!(res.body["data"][0]["is_liked"], true);
        assert_eq!(res.body["data"][0]["owner"]["username"], "alice");
    }

    #[tokio::test]
    async fn unpublished_videos_are_skipped_for_others() {
        let app = TestApp::spawn().await;
        let alice = app.create_user("alice").await;
        let bob = app.create_user("bob").await;
        let video = app.insert_video(&alice.id, "Clip", true, 0).await;

        app.post_empty_with_token(&routes::like_video(&video), &bob.token)
            .await;
        app.post_empty_with_token(&routes::like_video(&video), &alice.token)
            .await;
        app.patch_empty_with_token(&routes::toggle_publish(&video), &alice.token)
            .await;

        let bob_list = app.get_with_token(routes::LIKED_VIDEOS, &bob.token).await;
        assert!(bob_list.data_ids().is_empty());

        let alice_list = app.get_with_token(routes::LIKED_VIDEOS, &alice.token).await;
        assert_eq!(alice_list.data_ids(), vec![video]);
    }

    #[tokio::test]
    async fn requires_token() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(routes::LIKED_VIDEOS).await;

        assert_eq!(res.status, 401);
    }
}
