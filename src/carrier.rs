//! ATX frequency codes and associated normalization rules.
use gnss::prelude::Constellation;
use std::str::FromStr;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Error, Debug)]
pub enum Error {
    #[error("unrecognized frequency code \"{0}\"")]
    UnknownCode(String),
    #[error("constellation parsing error")]
    ConstellationParsing(#[from] gnss::constellation::ParsingError),
    #[error("failed to parse channel number")]
    ChannelParsing(#[from] std::num::ParseIntError),
}

/// Frequency band attached to ANTEX phase data,
/// described by a constellation and a channel number:
/// "G01" is GPS L1, "R02" is Glonass L2..
/// Single digit codes ("G 1") and the historical "L1"/"L2"
/// aliases normalize to the same value.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Carrier {
    /// Constellation this band belongs to
    pub constellation: Constellation,
    /// Channel (band) number within the constellation
    pub channel: u8,
}

impl Default for Carrier {
    fn default() -> Self {
        Self {
            constellation: Constellation::GPS,
            channel: 1,
        }
    }
}

impl Carrier {
    pub fn new(constellation: Constellation, channel: u8) -> Self {
        Self {
            constellation,
            channel,
        }
    }
}

impl std::fmt::Display for Carrier {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:x}{:02}", self.constellation, self.channel)
    }
}

impl FromStr for Carrier {
    type Err = Error;
    fn from_str(code: &str) -> Result<Self, Self::Err> {
        // "L1"/"L2" predate the constellation+channel convention
        let code = match code.trim() {
            "L1" => "G01",
            "L2" => "G02",
            trimmed => trimmed,
        };
        if code.len() < 2 {
            return Err(Error::UnknownCode(code.to_string()));
        }
        let constellation = Constellation::from_str(&code[0..1])?;
        // tolerates "G 1" style single digit codes
        let channel = code[1..].trim().parse::<u8>()?;
        Ok(Self {
            constellation,
            channel,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    #[test]
    fn from_str() {
        for (code, expected) in [
            ("G01", Carrier::new(Constellation::GPS, 1)),
            ("G 1", Carrier::new(Constellation::GPS, 1)),
            (" G02 ", Carrier::new(Constellation::GPS, 2)),
            ("L1", Carrier::new(Constellation::GPS, 1)),
            ("L2", Carrier::new(Constellation::GPS, 2)),
            ("R01", Carrier::new(Constellation::Glonass, 1)),
            ("R 2", Carrier::new(Constellation::Glonass, 2)),
            ("E05", Carrier::new(Constellation::Galileo, 5)),
        ] {
            let carrier = Carrier::from_str(code);
            assert!(
                carrier.is_ok(),
                "failed to parse carrier from \"{}\": {:?}",
                code,
                carrier.err().unwrap()
            );
            assert_eq!(carrier.unwrap(), expected, "badly parsed \"{}\"", code);
        }
        for code in ["", "G", "Gxx", "X01"] {
            assert!(Carrier::from_str(code).is_err());
        }
    }
    #[test]
    fn aliases_are_identical_keys() {
        assert_eq!(
            Carrier::from_str("L1").unwrap(),
            Carrier::from_str("G01").unwrap()
        );
        assert_eq!(
            Carrier::from_str("L2").unwrap(),
            Carrier::from_str("G02").unwrap()
        );
    }
    #[test]
    fn display() {
        assert_eq!(Carrier::new(Constellation::GPS, 1).to_string(), "G01");
        assert_eq!(Carrier::new(Constellation::Glonass, 2).to_string(), "R02");
    }
}
