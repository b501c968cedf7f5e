//! IGS ANTEX (ATX) file parser and phase center lookup.
//!
//! ANTEX files describe antenna phase center offsets (PCO) and
//! phase center variations (PCV) for both ground station and
//! satellite antennas. Parsing produces one immutable [Antex]
//! model served by angle and time aware queries; once built, the
//! model is safely shared between threads without locking, a
//! re-parse simply produces a fresh snapshot.
//!
//! ```
//! use antex::prelude::*;
//! use std::str::FromStr;
//!
//! let atx = Antex::from_file("test_resources/ATX/igs_small.atx")
//!     .unwrap();
//!
//! // receiver antennas are identified by name + radome code
//! let key = AntennaKey::receiver("ASH700228A+EX", "NONE");
//! assert!(atx.exists(&key));
//!
//! let carrier = Carrier::from_str("G01").unwrap();
//! let (north, east, up) = atx.offset(&key, carrier).unwrap();
//!
//! // satellite antennas resolve from broadcast identity + date
//! let prn = SV::from_str("G01").unwrap();
//! let key = atx
//!     .satellite_key(prn, Epoch::from_gregorian_utc_at_midnight(2000, 1, 1))
//!     .unwrap();
//! assert!(atx.exists(&key));
//! ```
#![cfg_attr(docrs, feature(doc_cfg))]
extern crate gnss_rs as gnss;

#[macro_use]
extern crate lazy_static;

use std::collections::BTreeMap;
use std::str::FromStr;

use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use gnss::prelude::{Constellation, SV};
use hifitime::Epoch;

pub mod antenna;
pub mod carrier;
pub mod cospar;
pub mod epoch;
pub mod resolver;
pub mod svn;
pub mod version;

mod parsing;
mod reader;

#[cfg(test)]
mod tests;

use antenna::{AntennaKey, AntennaRecord, FrequencyEntry};
use carrier::Carrier;
use resolver::SvnIndex;
use svn::Svn;
use version::Version;

pub mod prelude {
    pub use crate::{
        antenna::{AntennaKey, AntennaRecord, Calibration, CalibrationMethod, FrequencyEntry},
        carrier::Carrier,
        cospar::COSPAR,
        resolver::{SvnEntry, SvnIndex},
        svn::Svn,
        version::Version,
        Antex, Error, ParsingError, Pcv,
    };
    // Pub re-export
    pub use gnss::prelude::{Constellation, SV};
    pub use hifitime::{Duration, Epoch, TimeScale};
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("file i/o error")]
    Io(#[from] std::io::Error),
    #[error("parsing error")]
    Parsing(#[from] ParsingError),
    /// Query against an antenna this model does not contain
    #[error("unknown antenna \"{0}\"")]
    UnknownAntenna(AntennaKey),
    /// Query against a frequency this antenna does not publish
    #[error("antenna \"{0}\" has no \"{1}\" entry")]
    UnknownFrequency(AntennaKey, Carrier),
}

#[derive(Debug, Error)]
pub enum ParsingError {
    #[error("version format error \"{0}\"")]
    VersionFormat(String),
    #[error("unknown pcv code \"{0}\"")]
    UnknownPcv(String),
    #[error("datetime format error")]
    DatetimeFormat,
    #[error("failed to parse datetime field \"{0}\"")]
    DatetimeParsing(String),
}

/// Phase Center Variation publication type
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Pcv {
    /// Given data is absolute
    #[default]
    Absolute,
    /// Given data is relative (to "AOAD/M_T" historically)
    Relative,
}

impl std::fmt::Display for Pcv {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Absolute => f.write_str("A"),
            Self::Relative => f.write_str("R"),
        }
    }
}

impl FromStr for Pcv {
    type Err = ParsingError;
    fn from_str(code: &str) -> Result<Self, Self::Err> {
        if code.eq("A") {
            Ok(Self::Absolute)
        } else if code.eq("R") {
            Ok(Self::Relative)
        } else {
            Err(ParsingError::UnknownPcv(code.to_string()))
        }
    }
}

/// Immutable ANTEX model: antenna datasets under unique keys,
/// plus the broadcast-to-vehicle identity index built along.
#[derive(Default, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Antex {
    /// File revision
    pub version: Version,
    /// Type of phase center variations published in this file
    pub pcv_type: Pcv,
    /// Reference antenna serial number used to produce
    /// this calibration file, when published
    pub reference_ant_sn: Option<String>,
    /// Antenna datasets, one per [AntennaKey]
    pub antennas: BTreeMap<AntennaKey, AntennaRecord>,
    /// PRN ↔ SVN identity index over every satellite dataset
    pub sv_index: SvnIndex,
}

impl Antex {
    /// Returns true if this model contains given antenna
    pub fn exists(&self, key: &AntennaKey) -> bool {
        self.antennas.contains_key(key)
    }
    /// Returns true if this model contains given antenna,
    /// with phase data published on given frequency
    pub fn exists_frequency(&self, key: &AntennaKey, carrier: Carrier) -> bool {
        self.antennas
            .get(key)
            .map(|record| record.frequencies.contains_key(&carrier))
            .unwrap_or(false)
    }
    fn record(&self, key: &AntennaKey) -> Result<&AntennaRecord, Error> {
        self.antennas
            .get(key)
            .ok_or_else(|| Error::UnknownAntenna(key.clone()))
    }
    fn frequency_entry(
        &self,
        key: &AntennaKey,
        carrier: Carrier,
    ) -> Result<&FrequencyEntry, Error> {
        self.record(key)?
            .frequencies
            .get(&carrier)
            .ok_or_else(|| Error::UnknownFrequency(key.clone(), carrier))
    }
    /// Returns the mean phase center offset of given antenna on
    /// given frequency, in mm: (north, east, up) for receiver
    /// antennas, (x, y, z) for satellite antennas.
    pub fn offset(&self, key: &AntennaKey, carrier: Carrier) -> Result<(f64, f64, f64), Error> {
        let entry = self.frequency_entry(key, carrier)?;
        Ok(entry.offset)
    }
    /// Returns the phase center variations of given antenna on
    /// given frequency, as azimuth keyed rows (azimuth in degrees,
    /// one value per zenith step, in mm). Azimuth independent
    /// datasets reduce to a single row keyed at azimuth 0: callers
    /// iterate the same shape regardless of the source variant.
    pub fn pcv(&self, key: &AntennaKey, carrier: Carrier) -> Result<Vec<(f64, Vec<f64>)>, Error> {
        let entry = self.frequency_entry(key, carrier)?;
        if entry.is_azimuth_dependent() {
            Ok(entry.azimuth_rows.clone())
        } else {
            Ok(vec![(0.0, entry.noazi.clone())])
        }
    }
    /// Returns the zenith grid definition of given antenna:
    /// (zen1, zen2, dzen), all in degrees.
    pub fn zenith_angles(&self, key: &AntennaKey) -> Result<(f64, f64, f64), Error> {
        let record = self.record(key)?;
        Ok((record.zen1, record.zen2, record.dzen))
    }
    /// Returns the azimuth grid definition of given antenna:
    /// (0, 360, dazi) in degrees. dazi = 0 legitimately signals
    /// azimuth independent data: callers must check.
    pub fn azimuth_angles(&self, key: &AntennaKey) -> Result<(f64, f64, f64), Error> {
        let record = self.record(key)?;
        Ok((0.0, 360.0, record.dazi))
    }
    /// Returns the fixed format grid summary of given antenna:
    /// zenith sample count, zen1, dzen, azimuth sample count,
    /// 0.0, dazi. Azimuth independent datasets report one single
    /// azimuth sample with a 360° increment.
    pub fn antenna_header_line(&self, key: &AntennaKey) -> Result<String, Error> {
        let record = self.record(key)?;
        let (nb_azi, dazi) = match record.nb_azimuth_rows() {
            Some(nb_rows) => (nb_rows - 1, record.dazi),
            None => (1, 360.0_f64),
        };
        Ok(format!(
            "{:6}{:10.1}{:10.1}{:6}{:10.1}{:10.1}",
            record.nb_zenith_samples(),
            record.zen1,
            record.dzen,
            nb_azi,
            0.0_f64,
            dazi
        ))
    }
    /// Returns every broadcast identity (PRN) transmitting at
    /// instant "now", sorted, optionally restricted to one
    /// constellation.
    pub fn satellites_on_date(&self, now: Epoch, constellation: Option<Constellation>) -> Vec<SV> {
        self.sv_index.prn_on_date(now, constellation)
    }
    /// Resolves the vehicle transmitting given PRN at instant
    /// "now". None is a normal outcome: no vehicle was registered
    /// under this PRN at that time.
    pub fn resolve_svn(&self, prn: SV, now: Epoch) -> Option<Svn> {
        self.sv_index.resolve_svn(prn, now)
    }
    /// Resolves the broadcast identity given vehicle transmitted,
    /// scanning the whole index.
    pub fn resolve_prn(&self, svn: Svn) -> Option<SV> {
        self.sv_index.resolve_prn(svn)
    }
    /// Builds the [AntennaKey] describing the satellite antenna
    /// broadcasting given PRN at instant "now".
    pub fn satellite_key(&self, prn: SV, now: Epoch) -> Option<AntennaKey> {
        let svn = self.sv_index.resolve_svn(prn, now)?;
        Some(AntennaKey::satellite(prn, svn))
    }
    /// Returns an iterator over every antenna dataset
    pub fn antennas(&self) -> impl Iterator<Item = (&AntennaKey, &AntennaRecord)> + '_ {
        self.antennas.iter()
    }
    /// Returns an iterator over receiver (ground) antenna datasets
    pub fn receiver_antennas(&self) -> impl Iterator<Item = (&AntennaKey, &AntennaRecord)> + '_ {
        self.antennas.iter().filter(|(key, _)| !key.is_satellite())
    }
    /// Returns an iterator over satellite antenna datasets
    pub fn satellite_antennas(&self) -> impl Iterator<Item = (&AntennaKey, &AntennaRecord)> + '_ {
        self.antennas.iter().filter(|(key, _)| key.is_satellite())
    }
    /// Returns an iterator over the frequencies given antenna
    /// publishes phase data for. Empty on unknown antennas.
    pub fn carriers<'a>(&'a self, key: &AntennaKey) -> impl Iterator<Item = Carrier> + 'a {
        self.antennas
            .get(key)
            .into_iter()
            .flat_map(|record| record.frequencies.keys().copied())
    }
    /// Total number of antenna datasets
    pub fn nb_antennas(&self) -> usize {
        self.antennas.len()
    }
}
