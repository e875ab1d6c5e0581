// src/types.rs

//! Identifier newtypes and the small enums shared by config and engine.

use std::borrow::Borrow;
use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Base-58 alphabet: digits and latin letters without `0`, `O`, `I` and `l`.
pub const ID_ALPHABET: &[u8] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Length of every generated bucket or task identifier.
pub const ID_LENGTH: usize = 11;

/// Generate a fresh random identifier.
///
/// Uniqueness is only birthday-bound; callers never reuse an ID once it has
/// been handed out.
pub fn generate_id() -> String {
    let mut rng = rand::rng();
    (0..ID_LENGTH)
        .map(|_| ID_ALPHABET[rng.random_range(0..ID_ALPHABET.len())] as char)
        .collect()
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// A new random identifier (see [`generate_id`]).
            pub fn generate() -> Self {
                Self(generate_id())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}

string_id!(
    /// Opaque identifier of a bucket.
    BucketId
);

string_id!(
    /// Opaque identifier of a task.
    TaskId
);

/// How the layer assigner turns chains into layer indices when a bucket has
/// no explicit override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LayeringStrategy {
    /// Longest path from a chain root: the largest position the bucket
    /// occupies in any chain. Independent of chain order.
    #[default]
    LongestPath,
    /// Position inside the first chain that contains the bucket.
    FirstChain,
}

/// What `set_layer` does with an override outside the bucket's bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OverridePolicy {
    /// Move the requested value to the nearest bound.
    #[default]
    Clamp,
    /// Refuse the override and leave the bucket untouched.
    Reject,
}

/// Log level accepted by [`crate::logging::init_logging`] and the
/// `[logging]` config section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}
