//! ANTEX revision description
use crate::ParsingError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Current ANTEX revision supported to this day
pub const SUPPORTED_VERSION: Version = Version { major: 1, minor: 4 };

/// Version describes ANTEX standard revisions
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Version {
    /// Version major number
    pub major: u8,
    /// Version minor number
    pub minor: u8,
}

impl Default for Version {
    fn default() -> Self {
        SUPPORTED_VERSION
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl std::str::FromStr for Version {
    type Err = ParsingError;
    fn from_str(content: &str) -> Result<Self, Self::Err> {
        match content.trim().split_once('.') {
            Some((major, minor)) => {
                let major = major
                    .parse::<u8>()
                    .or(Err(ParsingError::VersionFormat(content.to_string())))?;
                let minor = minor
                    .parse::<u8>()
                    .or(Err(ParsingError::VersionFormat(content.to_string())))?;
                Ok(Self { major, minor })
            },
            _ => Err(ParsingError::VersionFormat(content.to_string())),
        }
    }
}
