//! SuperOps data-center region.
//!
//! This module provides the [`Region`] enum that selects which API host a
//! client talks to.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// SuperOps API region.
///
/// The endpoint path is the same in every region; only the host differs.
/// Parsing never fails: exactly `"eu"` selects [`Region::Eu`] and every
/// other value, including `"EU"`, selects the default [`Region::Us`].
///
/// # Example
///
/// ```rust
/// use superops_msp::Region;
///
/// let region: Region = "eu".parse().unwrap();
/// assert_eq!(region.host(), "euapi.superops.ai");
///
/// let region: Region = "anything-else".parse().unwrap();
/// assert_eq!(region, Region::Us);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Region {
    /// United States data center (default).
    #[default]
    Us,
    /// European data center.
    Eu,
}

impl Region {
    /// Returns the API host for this region.
    #[must_use]
    pub const fn host(self) -> &'static str {
        match self {
            Self::Us => "api.superops.ai",
            Self::Eu => "euapi.superops.ai",
        }
    }

    /// Returns the short region code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Us => "us",
            Self::Eu => "eu",
        }
    }
}

impl FromStr for Region {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "eu" {
            Ok(Self::Eu)
        } else {
            Ok(Self::Us)
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
