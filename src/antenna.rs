//! Antenna records and their indexing keys.
use crate::carrier::Carrier;
use crate::epoch::{far_future, far_past};
use crate::svn::Svn;
use gnss::prelude::SV;

use crate::cospar::COSPAR;
use hifitime::Epoch;
use std::collections::BTreeMap;
use strum::EnumString;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Known calibration methods
#[derive(Default, Clone, Debug, PartialEq, PartialOrd, EnumString)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CalibrationMethod {
    #[strum(serialize = "")]
    Unknown,
    #[default]
    #[strum(serialize = "CHAMBER")]
    Chamber,
    #[strum(serialize = "FIELD")]
    Field,
    #[strum(serialize = "ROBOT")]
    Robot,
    /// Copied from other antenna
    #[strum(serialize = "COPIED")]
    Copied,
    /// Converted from igs_01.pcv or blank
    #[strum(serialize = "CONVERTED")]
    Converted,
}

/// Calibration information
#[derive(Default, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Calibration {
    /// Calibration method
    pub method: CalibrationMethod,
    /// Agency who performed this calibration
    pub agency: String,
    /// Number of calibrated antennas
    pub nb_calibrated: u16,
    /// Date of calibration, kept as published ("23-SEP-20"..)
    pub date: String,
}

/// Unique identification of one [AntennaRecord].
/// Receiver antennas are identified by IGS name and radome code,
/// satellite antennas by (broadcast, vehicle) identity.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AntennaKey {
    /// Ground station (receiver) antenna
    Receiver {
        /// IGS antenna name, like "ASH700228A+EX"
        name: String,
        /// Radome code, "NONE" when operated without a radome
        dome: String,
    },
    /// Satellite antenna
    Satellite {
        /// Broadcast identity (PRN), reassigned over the years
        prn: SV,
        /// Permanent vehicle identity (SVN)
        svn: Svn,
    },
}

impl AntennaKey {
    /// Builds the key describing given receiver antenna + radome
    pub fn receiver(name: &str, dome: &str) -> Self {
        Self::Receiver {
            name: name.to_string(),
            dome: dome.to_string(),
        }
    }
    /// Builds the key describing given satellite antenna
    pub fn satellite(prn: SV, svn: Svn) -> Self {
        Self::Satellite { prn, svn }
    }
    /// Returns true if this key describes a satellite antenna
    pub fn is_satellite(&self) -> bool {
        matches!(self, Self::Satellite { .. })
    }
}

impl std::fmt::Display for AntennaKey {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Receiver { name, dome } => write!(f, "{} {}", name, dome),
            Self::Satellite { prn, svn } => write!(f, "{}({})", prn, svn),
        }
    }
}

/// Phase data attached to one frequency band of an antenna.
/// Offsets and pattern values in millimeters.
#[derive(Default, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FrequencyEntry {
    /// Mean phase center position with regard to the antenna
    /// reference point: (north, east, up) for receiver antennas,
    /// (x, y, z) in the spacecraft frame for satellite antennas.
    pub offset: (f64, f64, f64),
    /// Azimuth independent ("NOAZI") pattern, one value
    /// per zenith step from zen1 to zen2.
    pub noazi: Vec<f64>,
    /// Azimuth dependent rows: (azimuth angle in degrees,
    /// clockwise from north, one value per zenith step).
    /// Empty when the record is azimuth independent (dazi = 0).
    pub azimuth_rows: Vec<(f64, Vec<f64>)>,
}

impl FrequencyEntry {
    /// Returns true if this pattern is azimuth dependent
    pub fn is_azimuth_dependent(&self) -> bool {
        !self.azimuth_rows.is_empty()
    }
}

/// One complete ATX antenna dataset: grid definition,
/// validity window and per frequency phase data.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AntennaRecord {
    /// Zenith grid start angle [°]
    pub zen1: f64,
    /// Zenith grid stop angle [°]
    pub zen2: f64,
    /// Zenith grid increment [°]
    pub dzen: f64,
    /// Azimuth increment [°]: 0 means azimuth independent data
    pub dazi: f64,
    /// Calibration information
    pub calibration: Calibration,
    /// Antenna type, for satellite antennas ("BLOCK IIR-A", "GLONASS-M"..)
    pub igs_type: Option<String>,
    /// Serial number, for receiver antennas that publish one
    pub sn: Option<String>,
    /// COSPAR launch identification (satellite antennas)
    pub cospar: Option<COSPAR>,
    /// Start of validity. Receiver antennas carry the all-time window.
    pub valid_from: Epoch,
    /// End of validity, far future sentinel when never declared.
    pub valid_until: Epoch,
    /// Phase data per frequency band
    pub frequencies: BTreeMap<Carrier, FrequencyEntry>,
}

impl Default for AntennaRecord {
    fn default() -> Self {
        Self {
            zen1: 0.0_f64,
            zen2: 0.0_f64,
            dzen: 0.0_f64,
            dazi: 0.0_f64,
            calibration: Calibration::default(),
            igs_type: None,
            sn: None,
            cospar: None,
            valid_from: far_past(),
            valid_until: far_future(),
            frequencies: BTreeMap::new(),
        }
    }
}

impl AntennaRecord {
    /// Number of zenith samples each pattern row must carry:
    /// (zen2 - zen1) / dzen + 1
    pub fn nb_zenith_samples(&self) -> usize {
        if self.dzen > 0.0 {
            ((self.zen2 - self.zen1) / self.dzen).round() as usize + 1
        } else {
            0
        }
    }
    /// Number of azimuth rows an azimuth dependent pattern
    /// must carry: 360 / dazi + 1. None when dazi = 0.
    pub fn nb_azimuth_rows(&self) -> Option<usize> {
        if self.dazi > 0.0 {
            Some((360.0 / self.dazi) as usize + 1)
        } else {
            None
        }
    }
    /// Returns true if this record applies at instant "now"
    /// (validity interval is inclusive on both ends)
    pub fn is_valid(&self, now: Epoch) -> bool {
        self.valid_from <= now && now <= self.valid_until
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::epoch::from_ymd;
    use std::str::FromStr;
    #[test]
    fn zenith_samples() {
        let record = AntennaRecord {
            zen1: 0.0,
            zen2: 90.0,
            dzen: 5.0,
            ..Default::default()
        };
        assert_eq!(record.nb_zenith_samples(), 19);
        assert_eq!(record.nb_azimuth_rows(), None);

        let record = AntennaRecord {
            zen1: 0.0,
            zen2: 14.0,
            dzen: 1.0,
            dazi: 5.0,
            ..Default::default()
        };
        assert_eq!(record.nb_zenith_samples(), 15);
        assert_eq!(record.nb_azimuth_rows(), Some(73));
    }
    #[test]
    fn default_record_is_all_time() {
        let record = AntennaRecord::default();
        assert!(record.is_valid(from_ymd(1995, 1, 1)));
        assert!(record.is_valid(from_ymd(2300, 1, 1)));
    }
    #[test]
    fn calibration_methods() {
        assert_eq!(
            CalibrationMethod::from_str("ROBOT").unwrap(),
            CalibrationMethod::Robot
        );
        assert_eq!(
            CalibrationMethod::from_str("CHAMBER").unwrap(),
            CalibrationMethod::Chamber
        );
        assert_eq!(
            CalibrationMethod::from_str("").unwrap(),
            CalibrationMethod::Unknown
        );
    }
}
