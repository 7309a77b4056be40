//! Caption analysis: keyword-driven tag inference and product-name
//! suggestion for reel captions.
//!
//! Pure functions over fixed tables; deterministic for a given caption.

use regex::Regex;

/// Category tag and the lowercase keywords that trigger it.
///
/// Matching is case-insensitive substring membership; each category
/// contributes its tag at most once, in table order.
pub(crate) const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "tech",
        &[
            "technology",
            "gadget",
            "device",
            "smartphone",
            "laptop",
            "wireless",
            "charging",
        ],
    ),
    (
        "beauty",
        &["skincare", "makeup", "beauty", "serum", "cream", "glow"],
    ),
    (
        "fitness",
        &["workout", "exercise", "fitness", "gym", "health", "training"],
    ),
    (
        "lifestyle",
        &["lifestyle", "daily", "routine", "home", "decor"],
    ),
    (
        "fashion",
        &["fashion", "style", "outfit", "clothing", "accessories"],
    ),
    (
        "food",
        &[
            "food", "recipe", "cooking", "kitchen", "meal", "coffee", "espresso",
        ],
    ),
    (
        "travel",
        &["travel", "trip", "vacation", "luggage", "portable"],
    ),
    ("work", &["work", "desk", "office", "productivity"]),
];

/// Ordered product trigger rules; first match wins.
///
/// Each rule is a set of alternatives where ANY hit selects the name,
/// except the first rule which requires both words (a bare "wireless"
/// mention is too weak a signal for a charger).
const PRODUCT_RULES: &[(&[&str], &str)] = &[
    (&["serum", "skincare"], "Premium Skincare Serum"),
    (&["coffee", "espresso"], "Espresso Machine"),
    (&["fitness", "workout"], "Fitness Equipment"),
    (&["phone", "stand"], "Phone Stand"),
];

/// Tags applied when a caption matches nothing, so every reel carries at
/// least one tag for storefront filtering.
const FALLBACK_TAGS: &[&str] = &["lifestyle", "recommended"];

/// Hard cap on tags per reel; first 8 in discovery order survive.
const MAX_TAGS: usize = 8;

/// Result of analyzing one caption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionAnalysis {
    /// Lowercase tags in discovery order: hashtags first, then matched
    /// categories. Never empty, never more than 8.
    pub tags: Vec<String>,
    /// Canonical product name when a trigger rule matched, otherwise `None`.
    pub product_name: Option<String>,
}

/// Analyze a caption: extract hashtag and category tags, infer a product
/// name from trigger phrases.
#[must_use]
pub fn analyze(caption: &str) -> CaptionAnalysis {
    CaptionAnalysis {
        tags: extract_tags(caption),
        product_name: infer_product_name(caption),
    }
}

/// Extract up to [`MAX_TAGS`] lowercase tags from a caption.
///
/// Hashtag bodies come first (in order of appearance), then category tags
/// (in table order). Duplicates collapse to the first occurrence. An empty
/// or unmatched caption yields the fallback pair.
#[must_use]
pub fn extract_tags(caption: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();

    let hashtag_re = Regex::new(r"#(\w+)").expect("valid hashtag regex");
    for capture in hashtag_re.captures_iter(caption) {
        push_unique(&mut tags, capture[1].to_lowercase());
    }

    let lower = caption.to_lowercase();
    for &(category, keywords) in CATEGORY_KEYWORDS {
        if keywords.iter().any(|keyword| lower.contains(keyword)) {
            push_unique(&mut tags, category.to_string());
        }
    }

    if tags.is_empty() {
        return FALLBACK_TAGS.iter().map(ToString::to_string).collect();
    }

    tags.truncate(MAX_TAGS);
    tags
}

/// Infer a canonical product name from the caption, or `None` when no
/// trigger rule matches. Callers that need a name for every reel
/// substitute their own placeholder.
#[must_use]
pub fn infer_product_name(caption: &str) -> Option<String> {
    let lower = caption.to_lowercase();

    // The charger rule needs both words together; everything after is
    // any-of within the rule.
    if lower.contains("wireless") && lower.contains("charging") {
        return Some("Wireless Charging Pad".to_string());
    }

    for &(triggers, name) in PRODUCT_RULES {
        if triggers.iter().any(|trigger| lower.contains(trigger)) {
            return Some(name.to_string());
        }
    }

    None
}

fn push_unique(tags: &mut Vec<String>, tag: String) {
    if !tags.contains(&tag) {
        tags.push(tag);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_caption_yields_fallback_pair() {
        assert_eq!(extract_tags(""), vec!["lifestyle", "recommended"]);
    }

    #[test]
    fn unmatched_caption_yields_fallback_pair() {
        assert_eq!(
            extract_tags("the quick brown fox"),
            vec!["lifestyle", "recommended"]
        );
    }

    #[test]
    fn category_keyword_contributes_its_tag() {
        let tags = extract_tags("new gadget on my shelf");
        assert!(tags.contains(&"tech".to_string()), "got: {tags:?}");
    }

    #[test]
    fn each_category_contributes_at_most_once() {
        let tags = extract_tags("gadget device laptop wireless");
        assert_eq!(tags.iter().filter(|t| *t == "tech").count(), 1);
    }

    #[test]
    fn hashtags_contribute_lowercase_bodies_first() {
        let tags = extract_tags("#DeskGoals this gadget rules");
        assert_eq!(tags[0], "deskgoals");
        assert!(tags.contains(&"tech".to_string()));
    }

    #[test]
    fn duplicate_hashtag_and_category_collapse() {
        let tags = extract_tags("#tech love this tech gadget");
        assert_eq!(tags.iter().filter(|t| *t == "tech").count(), 1);
    }

    #[test]
    fn tag_count_never_exceeds_cap() {
        let caption = "#a #b #c #d #e #f #g gadget serum workout lifestyle fashion food travel desk";
        let tags = extract_tags(caption);
        assert!(tags.len() <= 8, "got {} tags: {tags:?}", tags.len());
    }

    #[test]
    fn cap_keeps_first_eight_in_discovery_order() {
        let caption = "#one #two #three #four #five #six #seven #eight #nine";
        let tags = extract_tags(caption);
        assert_eq!(
            tags,
            vec!["one", "two", "three", "four", "five", "six", "seven", "eight"]
        );
    }

    #[test]
    fn wireless_charging_infers_charging_pad() {
        assert_eq!(
            infer_product_name("sleek wireless charging pad for the desk"),
            Some("Wireless Charging Pad".to_string())
        );
    }

    #[test]
    fn bare_wireless_does_not_infer_charging_pad() {
        assert_eq!(infer_product_name("wireless earbuds are fine"), None);
    }

    #[test]
    fn skincare_infers_serum() {
        assert_eq!(
            infer_product_name("my skincare haul"),
            Some("Premium Skincare Serum".to_string())
        );
    }

    #[test]
    fn first_matching_rule_wins() {
        // Both the serum and espresso rules match; serum is earlier.
        assert_eq!(
            infer_product_name("serum before coffee"),
            Some("Premium Skincare Serum".to_string())
        );
    }

    #[test]
    fn no_trigger_leaves_product_unset() {
        assert_eq!(infer_product_name("lovely sunset today"), None);
    }

    #[test]
    fn analyze_is_deterministic() {
        let a = analyze("Amazing wireless charging pad for your desk #TechSetup");
        let b = analyze("Amazing wireless charging pad for your desk #TechSetup");
        assert_eq!(a, b);
    }

    #[test]
    fn analyze_tech_setup_scenario() {
        let result = analyze("Amazing wireless charging pad for your desk #TechSetup");
        assert!(result.tags.contains(&"tech".to_string()), "{result:?}");
        assert!(result.tags.contains(&"techsetup".to_string()), "{result:?}");
        assert_eq!(
            result.product_name.as_deref(),
            Some("Wireless Charging Pad")
        );
    }
}
