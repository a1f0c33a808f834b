//! Secret key sourcing.
//!
//! A run uses exactly one key. It comes from a base64 environment value
//! when configured; otherwise the caller may generate an ephemeral one.
//! Nothing in this module stores keys.

mod provider;
mod secret;

pub use provider::{decode_key, generate_key, load_key, KeyError, DEFAULT_KEY_ENV};
pub use secret::{SecretKey, DEFAULT_KEY_LEN};
