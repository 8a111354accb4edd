//! Tier → feature entitlement resolver.
//!
//! The feature catalog is a single ordered static table; each tier unlocks a
//! prefix of it. Expressing the five entitlement sets as prefix slices makes
//! the strict-superset invariant (`unlocked(BEG) ⊂ … ⊂ unlocked(VIP)`) hold
//! by construction; tests verify it anyway so catalog edits stay honest.

use serde::Serialize;

use crate::tier::Tier;

/// A feature in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Feature {
    /// Stable kebab-case identifier.
    pub id: &'static str,
    /// UI label.
    pub label: &'static str,
    /// Premium features sit behind the upgrade path in the UI.
    pub premium: bool,
}

const fn feature(id: &'static str, label: &'static str, premium: bool) -> Feature {
    Feature { id, label, premium }
}

/// The full feature catalog, ordered by the tier that introduces each entry.
/// The order is the stable display order for locked-feature lists.
pub const CATALOG: &[Feature] = &[
    // Beginner
    feature("workout-library", "Workout library", false),
    feature("progress-tracker", "Progress tracker", false),
    feature("community-feed", "Community feed", false),
    // Intermediate
    feature("custom-plans", "Custom training plans", false),
    feature("nutrition-guide", "Nutrition guide", false),
    // Advanced
    feature("ai-form-analysis", "AI form analysis", true),
    feature("advanced-analytics", "Advanced analytics", true),
    // Professional
    feature("personal-coach-chat", "Personal coach chat", true),
    feature("live-classes", "Live classes", true),
    // VIP
    feature("vip-concierge", "VIP concierge", true),
    feature("exclusive-events", "Exclusive events", true),
];

/// How many catalog entries each tier unlocks, indexed by `rank() - 1`.
const UNLOCK_COUNTS: [usize; 5] = [3, 5, 7, 9, 11];

fn unlock_count(tier: Tier) -> usize {
    UNLOCK_COUNTS[tier.rank() as usize - 1]
}

/// Features unlocked for `tier`, in catalog order.
pub fn unlocked_features(tier: Tier) -> &'static [Feature] {
    &CATALOG[..unlock_count(tier)]
}

/// Features still locked for `tier`, in catalog order.
pub fn locked_features(tier: Tier) -> &'static [Feature] {
    &CATALOG[unlock_count(tier)..]
}

/// Whether `feature_id` is unlocked at `tier`.
///
/// Unknown feature ids are never unlocked.
pub fn is_unlocked(tier: Tier, feature_id: &str) -> bool {
    unlocked_features(tier).iter().any(|f| f.id == feature_id)
}
