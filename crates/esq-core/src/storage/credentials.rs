//! Credential and endpoint overrides from the environment.
//!
//! Values set here win over the configuration file so secrets can stay out
//! of it. Empty variables count as unset.

use std::env;

pub const URL_VAR: &str = "ESQ_URL";
pub const API_KEY_VAR: &str = "ESQ_API_KEY";
pub const PASSWORD_VAR: &str = "ESQ_PASSWORD";

/// Look up an environment variable, treating empty values as missing.
pub fn read_non_empty(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}
