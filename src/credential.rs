//! Access-code credential: `FIT-<TIER>-<NNNN>`.
//!
//! The generator draws the four-digit disambiguator uniformly from
//! 1000..=9999. The parser accepts any four ASCII digits (leading zeros
//! included) so older or externally minted codes keep validating. Codes make
//! no uniqueness promise — collision policy belongs to the persistence
//! gateway.

use rand::Rng;

use crate::error::CredentialError;
use crate::tier::Tier;

/// Prefix segment shared by every access code.
const PREFIX: &str = "FIT";

/// Mint a fresh access code for `tier`.
pub fn generate(tier: Tier) -> String {
    let disambiguator: u16 = rand::thread_rng().gen_range(1000..=9999);
    format!("{PREFIX}-{}-{disambiguator}", tier.code())
}

/// Parse an access code, returning its embedded tier.
///
/// The shape check is bit-exact: three `-`-separated segments, uppercase
/// `FIT` prefix, a known tier code, and exactly four ASCII digits.
pub fn parse(code: &str) -> Result<Tier, CredentialError> {
    let mut segments = code.split('-');
    let (Some(prefix), Some(tier_segment), Some(digits), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(CredentialError::Malformed(code.to_string()));
    };

    if prefix != PREFIX {
        return Err(CredentialError::Malformed(code.to_string()));
    }
    if digits.len() != 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CredentialError::Malformed(code.to_string()));
    }

    tier_segment.parse()
}

/// Whether `code` is a well-formed access code.
pub fn validate(code: &str) -> bool {
    parse(code).is_ok()
}
