//! Rule-based tier classifier.
//!
//! Maps the free-text fitness-level answer onto a membership tier by testing
//! substring containment against ordered keyword groups, highest tier first.
//! First match wins. A missing, malformed, or unmatched answer resolves to
//! `Beginner` — classification is total and never errors.

use tracing::debug;

use crate::onboarding::model::AnswerSet;
use crate::onboarding::questions::Q_FITNESS_LEVEL;
use crate::tier::Tier;

/// Ordered (tier, keyword group) table, evaluated top-down.
///
/// Precedence is highest tier first so an answer carrying several cues
/// ("advanced but aiming for professional") lands on the strongest explicit
/// claim. The professional group deliberately carries only unambiguous full
/// words — never the bare token "pro" — so an aspirational "maybe pro"
/// mention does not pre-empt an explicit "advanced".
pub const KEYWORD_GROUPS: &[(Tier, &[&str])] = &[
    (
        Tier::Pro,
        &["professional", "athlete", "competitive", "coach", "elite"],
    ),
    (
        Tier::Adv,
        &["advanced", "expert", "experienced", "very fit", "years of training"],
    ),
    (
        Tier::Int,
        &["intermediate", "moderate", "regular", "decent", "average", "on and off"],
    ),
    (
        Tier::Beg,
        &["beginner", "new", "starting", "novice", "never", "just getting"],
    ),
];

/// Classify a (possibly partial) answer set into a tier.
///
/// Looks up the fitness-level answer, normalizes it, and walks
/// `KEYWORD_GROUPS` top-down. Defaults to `Beginner` in every case where no
/// keyword matches, including an empty answer set.
pub fn classify(answers: &AnswerSet) -> Tier {
    let Some(raw) = answers.text(Q_FITNESS_LEVEL) else {
        return Tier::Beg;
    };
    classify_text(raw)
}

/// Classify a raw fitness-level string. Exposed for callers that hold the
/// answer outside an `AnswerSet`.
pub fn classify_text(raw: &str) -> Tier {
    let normalized = normalize(raw);
    for (tier, keywords) in KEYWORD_GROUPS {
        if let Some(keyword) = keywords.iter().copied().find(|k| normalized.contains(k)) {
            debug!(tier = %tier, keyword, "Fitness level matched keyword group");
            return *tier;
        }
    }
    Tier::Beg
}

/// Lowercase and fold accented Latin letters to ASCII so keyword containment
/// is insensitive to casing and diacritics.
fn normalize(input: &str) -> String {
    input
        .chars()
        .flat_map(|c| c.to_lowercase())
        .map(|c| match c {
            'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
            'è' | 'é' | 'ê' | 'ë' => 'e',
            'ì' | 'í' | 'î' | 'ï' => 'i',
            'ò' | 'ó' | 'ô' | 'õ' | 'ö' => 'o',
            'ù' | 'ú' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            'ñ' => 'n',
            other => other,
        })
        .collect()
}
