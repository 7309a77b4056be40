//! Offline unit tests for reelstore-db pool configuration and row types.
//! These tests do not require a live database connection.

use reelstore_core::{AppConfig, Environment};
use reelstore_db::{NewReel, PoolConfig, ReelRow};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let app_config = AppConfig {
        database_url: "postgres://example".to_string(),
        env: Environment::Test,
        bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 3000),
        log_level: "info".to_string(),
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
        ingest_request_timeout_secs: 30,
        ingest_user_agent: "ua".to_string(),
        ingest_max_posts: 6,
        demo_mode: false,
        default_affiliate_link: "https://example.com/buy".to_string(),
        instagram_app_id: None,
        instagram_app_secret: None,
        instagram_redirect_uri: None,
    };

    let pool_config = PoolConfig::from_app_config(&app_config);
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

#[test]
fn pool_config_default_values() {
    let pool_config = PoolConfig::default();
    assert_eq!(pool_config.max_connections, 10);
    assert_eq!(pool_config.min_connections, 1);
    assert_eq!(pool_config.acquire_timeout_secs, 10);
}

/// Compile-time smoke test: confirm that [`ReelRow`] has all expected
/// fields with the correct types. No database required.
#[test]
fn reel_row_has_expected_fields() {
    use chrono::Utc;

    let row = ReelRow {
        id: 1_i64,
        creator_id: Some(2),
        caption: Some("caption".to_string()),
        thumbnail_image_url: Some("https://example.com/thumb.jpg".to_string()),
        instagram_video_url: Some("https://www.instagram.com/p/ABC123/".to_string()),
        product_name: "Featured Product".to_string(),
        affiliate_link: "https://example.com/buy".to_string(),
        tags: Some("tech, lifestyle".to_string()),
        show_on_website: true,
        created_at: Utc::now(),
        post_date: Some(Utc::now()),
    };

    assert_eq!(row.id, 1);
    assert_eq!(row.creator_id, Some(2));
    assert!(row.show_on_website);
    assert_eq!(row.product_name, "Featured Product");
}

#[test]
fn new_reel_carries_dedup_key() {
    use chrono::Utc;

    let reel = NewReel {
        creator_id: 1,
        caption: "caption".to_string(),
        thumbnail_image_url: "https://example.com/thumb.jpg".to_string(),
        instagram_video_url: "https://www.instagram.com/p/ABC123/".to_string(),
        product_name: "Featured Product".to_string(),
        affiliate_link: "https://example.com/buy".to_string(),
        tags: "tech".to_string(),
        show_on_website: true,
        post_date: Utc::now(),
    };

    assert!(reel.instagram_video_url.contains("/p/ABC123/"));
}
