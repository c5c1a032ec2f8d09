//! Notation selection and decoder configuration.
//!
//! - [`Notation`]: which textual rendering [`crate::encode`] produces
//! - [`DecodeOptions`]: limits applied by the decoder
//!
//! ## Examples
//!
//! ```rust
//! use ifamily::{decode_with_options, DecodeOptions, Notation};
//!
//! let notation: Notation = "nested-list".parse().unwrap();
//! assert_eq!(notation, Notation::NestedList);
//!
//! let options = DecodeOptions::new().with_max_depth(2);
//! assert!(decode_with_options("@tuple(@tuple(@tuple(1)))", &options).is_err());
//! ```

use crate::Error;
use std::fmt;
use std::str::FromStr;

/// Textual renderings supported by the encoder.
///
/// # Examples
///
/// ```rust
/// use ifamily::{Error, Notation};
///
/// assert_eq!(Notation::Canonical.as_str(), "canonical");
/// assert_eq!("node-only".parse::<Notation>().unwrap(), Notation::NodeOnly);
/// assert!(matches!(
///     "yaml".parse::<Notation>(),
///     Err(Error::UnsupportedNotation(_))
/// ));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Notation {
    /// Tagged `@tag(...)` text; the only notation the decoder reads.
    #[default]
    Canonical,
    /// Fully parenthesized, untagged rendering for display and export.
    NestedList,
    /// Canonical rendering restricted to Node values.
    NodeOnly,
}

impl Notation {
    pub const ALL: [Notation; 3] = [Notation::Canonical, Notation::NestedList, Notation::NodeOnly];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Notation::Canonical => "canonical",
            Notation::NestedList => "nested-list",
            Notation::NodeOnly => "node-only",
        }
    }
}

impl fmt::Display for Notation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Notation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        Notation::ALL
            .into_iter()
            .find(|n| n.as_str() == s)
            .ok_or_else(|| Error::unsupported_notation(s))
    }
}

/// Configuration for the decoder.
///
/// # Examples
///
/// ```rust
/// use ifamily::DecodeOptions;
///
/// let options = DecodeOptions::new();
/// assert_eq!(options.max_depth, 128);
///
/// let shallow = DecodeOptions::new().with_max_depth(8);
/// assert_eq!(shallow.max_depth, 8);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Deepest nesting of composite values accepted before failing.
    pub max_depth: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions { max_depth: 128 }
    }
}

impl DecodeOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
