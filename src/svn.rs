//! SVN: permanent (vehicle) satellite identification,
//! as opposed to PRN (broadcast) identification which
//! gets reassigned between vehicles over the years.
use gnss::prelude::Constellation;
use std::str::FromStr;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParsingError {
    #[error("invalid svn \"{0}\"")]
    InvalidSvn(String),
    #[error("constellation parsing error")]
    ConstellationParsing(#[from] gnss::constellation::ParsingError),
    #[error("svn number parsing error")]
    NumberParsing(#[from] std::num::ParseIntError),
}

/// SVN describes a physical satellite ("G063", "R731"..).
/// Unlike [SV](gnss::prelude::SV), the attached number is permanent:
/// it never gets reassigned to another vehicle.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Svn {
    /// Constellation this vehicle belongs to
    pub constellation: Constellation,
    /// Permanent vehicle number
    pub number: u16,
}

impl Svn {
    pub fn new(constellation: Constellation, number: u16) -> Self {
        Self {
            constellation,
            number,
        }
    }
}

impl FromStr for Svn {
    type Err = ParsingError;
    fn from_str(code: &str) -> Result<Self, Self::Err> {
        let code = code.trim();
        if code.len() < 2 {
            return Err(ParsingError::InvalidSvn(code.to_string()));
        }
        let constellation = Constellation::from_str(&code[0..1])?;
        let number = code[1..].trim().parse::<u16>()?;
        Ok(Self {
            constellation,
            number,
        })
    }
}

impl std::fmt::Display for Svn {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:x}{:02}", self.constellation, self.number)
    }
}
