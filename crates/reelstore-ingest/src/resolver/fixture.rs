//! Deterministic demo content for development, tests, and opt-in demo mode.

use async_trait::async_trait;

use crate::error::IngestError;
use crate::extract::canonical_post_url;

use super::{ResolvedPost, SourceResolver};

/// Shortcode → (caption, thumbnail) table for the demo posts.
const FIXTURE_POSTS: &[(&str, &str, &str)] = &[
    (
        "DJt_Q2IxQ8L",
        "Amazing wireless charging setup! This sleek charging pad keeps my desk organized \
         and my devices powered up 24/7. Perfect for tech enthusiasts who want a clean \
         workspace 🔌⚡ #TechSetup #WirelessCharging #DeskGoals",
        "https://images.unsplash.com/photo-1556656793-08538906a9f8?w=400&h=600&fit=crop",
    ),
    (
        "DJ1tnuLR0s8",
        "Skincare routine that actually works! ✨ This vitamin C serum transformed my skin \
         in just 30 days. The glow is real! 🌟 #SkincareRoutine #VitaminC #GlowUp",
        "https://images.unsplash.com/photo-1556228720-195a672e8a03?w=400&h=600&fit=crop",
    ),
    (
        "DJ4SbiURkgC",
        "Perfect coffee setup for work from home! ☕ This compact espresso machine makes \
         café-quality drinks right at my desk. Game changer for productivity 🚀 \
         #CoffeeSetup #WorkFromHome #EspressoLife",
        "https://images.unsplash.com/photo-1495474472287-4d71bcdd2085?w=400&h=600&fit=crop",
    ),
    (
        "DJ63MqjxJRp",
        "Fitness game changer! 💪 These resistance bands give you a full gym workout at \
         home. Perfect for building strength without expensive equipment 🏋️ \
         #HomeFitness #ResistanceBands #WorkoutMotivation",
        "https://images.unsplash.com/photo-1517836357463-d25dfeac3438?w=400&h=600&fit=crop",
    ),
    (
        "DJ9cA6oxMTv",
        "Travel essential! 📱 This portable phone stand is perfect for video calls and \
         content creation. Adjustable, sturdy, and fits in your pocket ✈️ \
         #TravelGadgets #PhoneStand #ContentCreator",
        "https://images.unsplash.com/photo-1512941937669-90a1b58e7e9c?w=400&h=600&fit=crop",
    ),
    (
        "DKAAxwUxiVK",
        "Must-have kitchen gadget! 🍳 This air fryer makes healthy cooking so easy and \
         delicious. Crispy results with minimal oil 🥗 #AirFryer #HealthyCooking \
         #KitchenGadgets",
        "https://images.unsplash.com/photo-1556909212-d5b604d0c90d?w=400&h=600&fit=crop",
    ),
];

/// Content served for shortcodes outside the fixture table. Deterministic,
/// so repeated syncs of unknown posts stay idempotent.
const DEFAULT_CAPTION: &str = "Check out this amazing product! Perfect for your lifestyle 🔥";
const DEFAULT_THUMBNAIL: &str = "https://via.placeholder.com/400x600/6b46c1/ffffff?text=Reel";

/// Fixture-backed [`SourceResolver`]: a fixed demo post list for any
/// handle, and a fixed shortcode → content table with a default entry for
/// unknown shortcodes.
#[derive(Debug, Clone, Default)]
pub struct FixtureResolver;

impl FixtureResolver {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// The demo post URLs, in enumeration order.
    #[must_use]
    pub fn demo_post_urls() -> Vec<String> {
        FIXTURE_POSTS
            .iter()
            .map(|(shortcode, _, _)| canonical_post_url(shortcode))
            .collect()
    }
}

#[async_trait]
impl SourceResolver for FixtureResolver {
    async fn recent_posts(&self, handle: &str) -> Result<Vec<String>, IngestError> {
        tracing::debug!(handle, "serving fixture post list");
        Ok(Self::demo_post_urls())
    }

    async fn resolve(&self, post_id: &str) -> Result<ResolvedPost, IngestError> {
        let entry = FIXTURE_POSTS
            .iter()
            .find(|(shortcode, _, _)| *shortcode == post_id);

        Ok(match entry {
            Some((_, caption, thumbnail)) => ResolvedPost {
                caption: (*caption).to_string(),
                thumbnail_url: (*thumbnail).to_string(),
            },
            None => ResolvedPost {
                caption: DEFAULT_CAPTION.to_string(),
                thumbnail_url: DEFAULT_THUMBNAIL.to_string(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn recent_posts_returns_six_demo_urls_for_any_handle() {
        let resolver = FixtureResolver::new();
        let posts = resolver.recent_posts("whoever").await.unwrap();
        assert_eq!(posts.len(), 6);
        assert!(posts[0].contains("/p/DJt_Q2IxQ8L/"));
    }

    #[tokio::test]
    async fn known_shortcode_resolves_to_table_entry() {
        let resolver = FixtureResolver::new();
        let post = resolver.resolve("DJ4SbiURkgC").await.unwrap();
        assert!(post.caption.contains("espresso machine"));
    }

    #[tokio::test]
    async fn unknown_shortcode_resolves_to_default_entry() {
        let resolver = FixtureResolver::new();
        let a = resolver.resolve("NOPE000").await.unwrap();
        let b = resolver.resolve("NOPE000").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.caption, DEFAULT_CAPTION);
    }
}
