//! Live integration tests for reelstore-db using `#[sqlx::test]`.
//!
//! Each test gets a fresh database with migrations applied. Requires a
//! reachable Postgres via `DATABASE_URL`.

use chrono::Utc;
use reelstore_db::{
    create_creator, delete_reel, ensure_creator, find_creator_by_handle, insert_reels,
    list_visible_reels, video_url_exists, DbError, NewReel,
};

fn new_reel(creator_id: i64, shortcode: &str) -> NewReel {
    NewReel {
        creator_id,
        caption: format!("Caption for {shortcode}"),
        thumbnail_image_url: format!("https://example.com/{shortcode}.jpg"),
        instagram_video_url: format!("https://www.instagram.com/p/{shortcode}/"),
        product_name: "Featured Product".to_string(),
        affiliate_link: "https://example.com/buy".to_string(),
        tags: "lifestyle, recommended".to_string(),
        show_on_website: true,
        post_date: Utc::now(),
    }
}

// ---------------------------------------------------------------------------
// Section 1: Creators
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn ensure_creator_creates_on_first_call(pool: sqlx::PgPool) {
    let creator = ensure_creator(&pool, "newuser", "Free")
        .await
        .expect("ensure_creator failed");

    assert_eq!(creator.instagram_handle, "newuser");
    assert_eq!(creator.name, "newuser");
    assert_eq!(creator.tier, "Free");
}

#[sqlx::test(migrations = "../../migrations")]
async fn ensure_creator_is_create_if_absent_not_upsert(pool: sqlx::PgPool) {
    let first = create_creator(&pool, "Display Name", "someuser", "Pro")
        .await
        .expect("create_creator failed");

    // Repeat sync must not touch existing metadata.
    let second = ensure_creator(&pool, "someuser", "Free")
        .await
        .expect("ensure_creator failed");

    assert_eq!(second.id, first.id);
    assert_eq!(second.name, "Display Name");
    assert_eq!(second.tier, "Pro");
}

#[sqlx::test(migrations = "../../migrations")]
async fn find_creator_by_handle_returns_none_for_unknown(pool: sqlx::PgPool) {
    let found = find_creator_by_handle(&pool, "ghost")
        .await
        .expect("find_creator_by_handle failed");
    assert!(found.is_none());
}

// ---------------------------------------------------------------------------
// Section 2: Reel insert + dedup
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn insert_reels_is_all_or_nothing_and_returns_rows(pool: sqlx::PgPool) {
    let creator = ensure_creator(&pool, "batcher", "Free").await.unwrap();

    let batch = vec![
        new_reel(creator.id, "AAA111"),
        new_reel(creator.id, "BBB222"),
    ];
    let inserted = insert_reels(&pool, &batch).await.expect("insert failed");

    assert_eq!(inserted.len(), 2);
    assert!(inserted.iter().all(|r| r.creator_id == Some(creator.id)));
}

#[sqlx::test(migrations = "../../migrations")]
async fn insert_reels_skips_conflicting_video_url(pool: sqlx::PgPool) {
    let creator = ensure_creator(&pool, "dupuser", "Free").await.unwrap();

    let first = insert_reels(&pool, &[new_reel(creator.id, "DUP999")])
        .await
        .unwrap();
    assert_eq!(first.len(), 1);

    // Same URL again: conflict is a skip, not an error, and the count
    // reflects only what actually landed.
    let second = insert_reels(
        &pool,
        &[new_reel(creator.id, "DUP999"), new_reel(creator.id, "NEW000")],
    )
    .await
    .unwrap();
    assert_eq!(second.len(), 1);
    assert_eq!(
        second[0].instagram_video_url.as_deref(),
        Some("https://www.instagram.com/p/NEW000/")
    );
}

#[sqlx::test(migrations = "../../migrations")]
async fn video_url_exists_reflects_stored_rows(pool: sqlx::PgPool) {
    let creator = ensure_creator(&pool, "checker", "Free").await.unwrap();
    let url = "https://www.instagram.com/p/CHK123/";

    assert!(!video_url_exists(&pool, url).await.unwrap());

    insert_reels(&pool, &[new_reel(creator.id, "CHK123")])
        .await
        .unwrap();

    assert!(video_url_exists(&pool, url).await.unwrap());
}

// ---------------------------------------------------------------------------
// Section 3: Visible listing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn list_visible_reels_hides_unflagged_rows(pool: sqlx::PgPool) {
    let creator = ensure_creator(&pool, "lister", "Free").await.unwrap();

    let mut hidden = new_reel(creator.id, "HID111");
    hidden.show_on_website = false;
    let visible = new_reel(creator.id, "VIS222");

    insert_reels(&pool, &[hidden, visible]).await.unwrap();

    let listed = list_visible_reels(&pool).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(
        listed[0].instagram_video_url.as_deref(),
        Some("https://www.instagram.com/p/VIS222/")
    );
    assert_eq!(listed[0].creator_handle.as_deref(), Some("lister"));
}

#[sqlx::test(migrations = "../../migrations")]
async fn list_visible_reels_orders_newest_post_first(pool: sqlx::PgPool) {
    let creator = ensure_creator(&pool, "orderer", "Free").await.unwrap();

    let mut older = new_reel(creator.id, "OLD111");
    older.post_date = Utc::now() - chrono::Duration::days(2);
    let newer = new_reel(creator.id, "NEW222");

    insert_reels(&pool, &[older, newer]).await.unwrap();

    let listed = list_visible_reels(&pool).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(
        listed[0].instagram_video_url.as_deref(),
        Some("https://www.instagram.com/p/NEW222/")
    );
}

// ---------------------------------------------------------------------------
// Section 4: Deletion
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn delete_reel_removes_row(pool: sqlx::PgPool) {
    let creator = ensure_creator(&pool, "deleter", "Free").await.unwrap();
    let inserted = insert_reels(&pool, &[new_reel(creator.id, "DEL111")])
        .await
        .unwrap();

    delete_reel(&pool, inserted[0].id).await.expect("delete failed");

    let listed = list_visible_reels(&pool).await.unwrap();
    assert!(listed.is_empty());
}

#[sqlx::test(migrations = "../../migrations")]
async fn delete_reel_unknown_id_is_not_found(pool: sqlx::PgPool) {
    let result = delete_reel(&pool, 999_999).await;
    assert!(
        matches!(result, Err(DbError::NotFound)),
        "expected NotFound, got: {result:?}"
    );
}
