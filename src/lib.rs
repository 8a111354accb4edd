//! Fitgate — onboarding and tier-classification engine.

pub mod classifier;
pub mod config;
pub mod credential;
pub mod entitlements;
pub mod error;
pub mod onboarding;
pub mod store;
pub mod tier;
