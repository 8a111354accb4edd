//! Membership tiers — the five ordered levels that govern feature access.

use serde::{Deserialize, Serialize};

/// A membership tier.
///
/// Total order: `Beginner < Intermediate < Advanced < Professional < Vip`.
/// The derived `Ord` backs every "meets or exceeds" comparison downstream.
/// Serialized as the three-letter wire code (`BEG`, `INT`, `ADV`, `PRO`,
/// `VIP`) — the same segment that appears inside access codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Tier {
    Beg,
    Int,
    Adv,
    Pro,
    Vip,
}

impl Tier {
    /// All tiers in ascending order.
    pub const ALL: [Tier; 5] = [Tier::Beg, Tier::Int, Tier::Adv, Tier::Pro, Tier::Vip];

    /// Numeric rank, 1 (Beginner) through 5 (VIP).
    pub fn rank(self) -> u8 {
        self as u8 + 1
    }

    /// Whether this tier meets or exceeds `required`.
    pub fn meets(self, required: Tier) -> bool {
        self >= required
    }

    /// Wire code used in access codes and serialized payloads.
    pub fn code(self) -> &'static str {
        match self {
            Self::Beg => "BEG",
            Self::Int => "INT",
            Self::Adv => "ADV",
            Self::Pro => "PRO",
            Self::Vip => "VIP",
        }
    }

    /// Human-readable label exposed to the UI layer.
    pub fn label(self) -> &'static str {
        match self {
            Self::Beg => "Beginner",
            Self::Int => "Intermediate",
            Self::Adv => "Advanced",
            Self::Pro => "Professional",
            Self::Vip => "VIP",
        }
    }
}

impl std::str::FromStr for Tier {
    type Err = crate::error::CredentialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BEG" => Ok(Self::Beg),
            "INT" => Ok(Self::Int),
            "ADV" => Ok(Self::Adv),
            "PRO" => Ok(Self::Pro),
            "VIP" => Ok(Self::Vip),
            other => Err(crate::error::CredentialError::UnknownTier(other.to_string())),
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_are_totally_ordered() {
        for pair in Tier::ALL.windows(2) {
            assert!(pair[0] < pair[1], "{} should sort below {}", pair[0], pair[1]);
        }
        assert!(Tier::Vip > Tier::Beg);
    }

    #[test]
    fn rank_is_one_through_five() {
        let ranks: Vec<u8> = Tier::ALL.iter().map(|t| t.rank()).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn meets_compares_ranks() {
        assert!(Tier::Pro.meets(Tier::Adv));
        assert!(Tier::Adv.meets(Tier::Adv));
        assert!(!Tier::Int.meets(Tier::Pro));
        assert!(Tier::Vip.meets(Tier::Beg));
    }

    #[test]
    fn code_roundtrips_through_from_str() {
        for tier in Tier::ALL {
            let parsed: Tier = tier.code().parse().unwrap();
            assert_eq!(parsed, tier);
        }
    }

    #[test]
    fn from_str_rejects_unknown_codes() {
        assert!("XXX".parse::<Tier>().is_err());
        assert!("beg".parse::<Tier>().is_err());
        assert!("".parse::<Tier>().is_err());
    }

    #[test]
    fn labels_match_ui_contract() {
        assert_eq!(Tier::Beg.label(), "Beginner");
        assert_eq!(Tier::Int.label(), "Intermediate");
        assert_eq!(Tier::Adv.label(), "Advanced");
        assert_eq!(Tier::Pro.label(), "Professional");
        assert_eq!(Tier::Vip.label(), "VIP");
    }

    #[test]
    fn serde_uses_wire_codes() {
        for tier in Tier::ALL {
            let json = serde_json::to_string(&tier).unwrap();
            assert_eq!(json, format!("\"{}\"", tier.code()));
            let parsed: Tier = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, tier);
        }
    }
}
