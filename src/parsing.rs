//! ANTEX parsing: line classification, section state machine
//! and record assembly.
use std::collections::BTreeMap;
use std::io::BufRead;
use std::path::Path;
use std::str::FromStr;

use regex::Regex;

#[cfg(feature = "log")]
use log::warn;

use crate::{
    antenna::{AntennaKey, AntennaRecord, Calibration, CalibrationMethod, FrequencyEntry},
    carrier::Carrier,
    epoch::parse_validity,
    reader::BufferedReader,
    resolver::{SvnEntry, SvnIndex},
    svn::Svn,
    version::Version,
    Antex, Error, Pcv,
};

use gnss::prelude::SV;

use crate::cospar::COSPAR;
use hifitime::Epoch;

lazy_static! {
    /// GPS satellite "TYPE / SERIAL NO" shape:
    /// block name, broadcast PRN, vehicle SVN, launch identification
    static ref GPS_TYPE_SERIAL: Regex =
        Regex::new(r"^(\S.*?)\s+(G\d{2})\s+(G\d{1,3})(?:\s+(\S+))?$").unwrap();
    /// GLONASS analog of the GPS shape
    static ref GLO_TYPE_SERIAL: Regex =
        Regex::new(r"^(\S.*?)\s+(R\d{2})\s+(R\d{1,3})(?:\s+(\S+))?$").unwrap();
}

/// Returns true if this line marker opens a new antenna dataset
pub(crate) fn is_new_antenna(marker: &str) -> bool {
    marker.contains("START OF ANTENNA")
}

/// "TYPE / SERIAL NO" interpretations, in attempt order:
/// satellite shapes first, receiver antenna as the fallback.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TypeSerialNo {
    /// GPS satellite antenna
    GpsSatellite {
        block: String,
        prn: SV,
        svn: Svn,
        cospar: Option<COSPAR>,
    },
    /// GLONASS satellite antenna
    GlonassSatellite {
        block: String,
        prn: SV,
        svn: Svn,
        cospar: Option<COSPAR>,
    },
    /// Ground station antenna: IGS name, radome code, serial number
    Receiver {
        name: String,
        dome: String,
        sn: String,
    },
}

impl TypeSerialNo {
    /// Interprets the content field of a "TYPE / SERIAL NO" line
    pub(crate) fn parse(content: &str) -> Self {
        if let Some(parsed) = Self::try_satellite(&GPS_TYPE_SERIAL, content) {
            return parsed;
        }
        if let Some(parsed) = Self::try_satellite(&GLO_TYPE_SERIAL, content) {
            return parsed;
        }
        Self::receiver(content)
    }
    fn try_satellite(regex: &Regex, content: &str) -> Option<Self> {
        let caps = regex.captures(content.trim_end())?;
        let block = caps.get(1)?.as_str().to_string();
        let prn = SV::from_str(caps.get(2)?.as_str()).ok()?;
        let svn = Svn::from_str(caps.get(3)?.as_str()).ok()?;
        let cospar = caps
            .get(4)
            .and_then(|c| COSPAR::from_str(c.as_str()).ok());
        if prn.constellation == gnss::prelude::Constellation::GPS {
            Some(Self::GpsSatellite {
                block,
                prn,
                svn,
                cospar,
            })
        } else {
            Some(Self::GlonassSatellite {
                block,
                prn,
                svn,
                cospar,
            })
        }
    }
    /*
     * Receiver antennas use fixed columns: name in columns 0..16,
     * radome code in 16..20, serial number in 20..40.
     */
    fn receiver(content: &str) -> Self {
        let name = content.get(0..16).unwrap_or(content).trim();
        let dome = content.get(16..20).unwrap_or("").trim();
        let sn = content.get(20..40).unwrap_or("").trim();
        Self::Receiver {
            name: name.to_string(),
            dome: dome.to_string(),
            sn: sn.to_string(),
        }
    }
}

/// Section state: RMS sub sections mirror the phase data layout
/// but their rows must not reach the model.
#[derive(Default, Copy, Clone, Debug, PartialEq)]
enum Section {
    #[default]
    Header,
    Frequency,
    FrequencyRms,
}

/// Antenna dataset being assembled. Fully rebuilt on each
/// "START OF ANTENNA" so no context leaks across datasets.
#[derive(Default, Debug, Clone)]
struct PendingAntenna {
    key: Option<AntennaKey>,
    record: AntennaRecord,
    valid_from: Option<Epoch>,
    valid_until: Option<Epoch>,
}

#[derive(Debug, Clone)]
struct PendingFrequency {
    carrier: Carrier,
    entry: FrequencyEntry,
}

fn parse_calibration(content: &str) -> Calibration {
    let method = content.get(0..20).unwrap_or("").trim();
    let agency = content.get(20..40).unwrap_or("").trim();
    let nb = content.get(40..50).unwrap_or("").trim();
    let date = content.get(50..60).unwrap_or("").trim();
    Calibration {
        method: CalibrationMethod::from_str(method).unwrap_or(CalibrationMethod::Unknown),
        agency: agency.to_string(),
        nb_calibrated: nb.parse().unwrap_or(0),
        date: date.to_string(),
    }
}

impl Antex {
    /// Parses ANTEX data from given local file,
    /// with possible seamless .gz decompression when
    /// compiled with the "flate2" feature.
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let fullpath = path.to_string_lossy().to_string();
        Self::from_file(&fullpath)
    }
    /// See [Self::from_path]
    pub fn from_file(path: &str) -> Result<Self, Error> {
        let reader = BufferedReader::new(path)?;
        Self::from_reader(reader)
    }
    /// Parses ANTEX data from any [BufRead] implementation.
    /// An unreadable source is the only fatal outcome: structural
    /// anomalies are isolated to the dataset carrying them.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let mut version = Version::default();
        let mut pcv_type = Pcv::default();
        let mut reference_ant_sn = Option::<String>::None;

        let mut section = Section::default();
        let mut pending = Option::<PendingAntenna>::None;
        let mut frequency = Option::<PendingFrequency>::None;

        let mut antennas = BTreeMap::<AntennaKey, AntennaRecord>::new();
        let mut sv_index = SvnIndex::default();

        for line in reader.lines() {
            let line = line?;
            // data content lies in the first 60 columns, the line
            // marker occupies the remainder: dispatch on the marker
            // only, free text (COMMENT..) may quote any keyword
            let offset = line
                .char_indices()
                .nth(60)
                .map(|(index, _)| index)
                .unwrap_or(line.len());
            let (content, marker) = line.split_at(offset);

            if is_new_antenna(marker) {
                // full reset of the transient parsing state,
                // pending validity window included
                pending = Some(PendingAntenna::default());
                frequency = None;
                section = Section::Header;
            } else if marker.contains("ANTEX VERSION / SYST") {
                if let Some(item) = content.split_ascii_whitespace().next() {
                    if let Ok(parsed) = Version::from_str(item) {
                        version = parsed;
                    }
                }
            } else if marker.contains("PCV TYPE / REFANT") {
                if let Some(item) = content.split_ascii_whitespace().next() {
                    if let Ok(parsed) = Pcv::from_str(item) {
                        pcv_type = parsed;
                    }
                }
                let sn = content.get(20..40).unwrap_or("").trim();
                if !sn.is_empty() {
                    reference_ant_sn = Some(sn.to_string());
                }
            } else if marker.contains("END OF HEADER") || marker.contains("COMMENT") {
                continue;
            } else if marker.contains("TYPE / SERIAL NO") {
                if let Some(ref mut pending) = pending {
                    match TypeSerialNo::parse(content) {
                        TypeSerialNo::GpsSatellite {
                            block,
                            prn,
                            svn,
                            cospar,
                        }
                        | TypeSerialNo::GlonassSatellite {
                            block,
                            prn,
                            svn,
                            cospar,
                        } => {
                            pending.key = Some(AntennaKey::satellite(prn, svn));
                            pending.record.igs_type = Some(block);
                            pending.record.cospar = cospar;
                        },
                        TypeSerialNo::Receiver { name, dome, sn } => {
                            pending.key = Some(AntennaKey::receiver(&name, &dome));
                            if !sn.is_empty() {
                                pending.record.sn = Some(sn);
                            }
                        },
                    }
                }
            } else if marker.contains("METH / BY / # / DATE") {
                if let Some(ref mut pending) = pending {
                    pending.record.calibration = parse_calibration(content);
                }
            } else if marker.contains("ZEN1 / ZEN2 / DZEN") {
                if let Some(ref mut pending) = pending {
                    let mut items = content.split_ascii_whitespace();
                    if let (Some(z1), Some(z2), Some(dz)) =
                        (items.next(), items.next(), items.next())
                    {
                        if let (Ok(zen1), Ok(zen2), Ok(dzen)) =
                            (f64::from_str(z1), f64::from_str(z2), f64::from_str(dz))
                        {
                            pending.record.zen1 = zen1;
                            pending.record.zen2 = zen2;
                            pending.record.dzen = dzen;
                        }
                    }
                }
            } else if marker.contains("DAZI") {
                if let Some(ref mut pending) = pending {
                    if let Some(item) = content.split_ascii_whitespace().next() {
                        if let Ok(dazi) = f64::from_str(item) {
                            pending.record.dazi = dazi;
                        }
                    }
                }
            } else if marker.contains("VALID FROM") {
                if let Some(ref mut pending) = pending {
                    match parse_validity(content) {
                        Ok(t) => pending.valid_from = Some(t),
                        Err(_e) => {
                            #[cfg(feature = "log")]
                            warn!("dropped invalid VALID FROM field: {}", _e);
                        },
                    }
                }
            } else if marker.contains("VALID UNTIL") {
                if let Some(ref mut pending) = pending {
                    match parse_validity(content) {
                        Ok(t) => pending.valid_until = Some(t),
                        Err(_e) => {
                            #[cfg(feature = "log")]
                            warn!("dropped invalid VALID UNTIL field: {}", _e);
                        },
                    }
                }
            } else if marker.contains("# OF FREQUENCIES") {
                // redundant with the assembled frequency map
                continue;
            } else if marker.contains("START OF FREQ RMS") {
                section = Section::FrequencyRms;
            } else if marker.contains("END OF FREQ RMS") {
                section = Section::Header;
            } else if marker.contains("START OF FREQUENCY") {
                section = Section::Frequency;
                let code = content.get(0..10).unwrap_or(content).trim();
                match Carrier::from_str(code) {
                    Ok(carrier) => {
                        frequency = Some(PendingFrequency {
                            carrier,
                            entry: FrequencyEntry::default(),
                        });
                    },
                    Err(_e) => {
                        frequency = None;
                        #[cfg(feature = "log")]
                        warn!("dropped frequency section \"{}\": {}", code, _e);
                    },
                }
            } else if marker.contains("END OF FREQUENCY") {
                section = Section::Header;
                if let (Some(pending), Some(pf)) = (pending.as_mut(), frequency.take()) {
                    if let Some(expected) = pending.record.nb_azimuth_rows() {
                        if pf.entry.azimuth_rows.len() != expected {
                            #[cfg(feature = "log")]
                            warn!(
                                "{}: {} azimuth rows, {} expected",
                                pf.carrier,
                                pf.entry.azimuth_rows.len(),
                                expected
                            );
                        }
                    }
                    pending.record.frequencies.insert(pf.carrier, pf.entry);
                }
            } else if marker.contains("NORTH / EAST / UP") {
                // also present in RMS sub sections: only record
                // phase data while inside a frequency section
                if section == Section::Frequency {
                    if let Some(ref mut pf) = frequency {
                        let mut items = content.split_ascii_whitespace();
                        if let (Some(n), Some(e), Some(u)) =
                            (items.next(), items.next(), items.next())
                        {
                            if let (Ok(north), Ok(east), Ok(up)) =
                                (f64::from_str(n), f64::from_str(e), f64::from_str(u))
                            {
                                pf.entry.offset = (north, east, up);
                            }
                        }
                    }
                }
            } else if content.contains("NOAZI") {
                if section == Section::Frequency {
                    if let (Some(pending), Some(pf)) = (pending.as_ref(), frequency.as_mut()) {
                        let values: Result<Vec<f64>, _> = content
                            .split_ascii_whitespace()
                            .skip(1) // NOAZI tag
                            .map(f64::from_str)
                            .collect();
                        match values {
                            Ok(values) => {
                                if values.len() != pending.record.nb_zenith_samples() {
                                    #[cfg(feature = "log")]
                                    warn!(
                                        "{}: NOAZI row carries {} values, {} expected",
                                        pf.carrier,
                                        values.len(),
                                        pending.record.nb_zenith_samples()
                                    );
                                }
                                // stored as parsed, even on mismatch
                                pf.entry.noazi = values;
                            },
                            Err(_e) => {
                                #[cfg(feature = "log")]
                                warn!("{}: dropped malformed NOAZI row: {}", pf.carrier, _e);
                            },
                        }
                    }
                }
            } else if marker.contains("END OF ANTENNA") {
                section = Section::Header;
                frequency = None;
                if let Some(pending) = pending.take() {
                    match pending.key {
                        Some(key) => {
                            let mut record = pending.record;
                            if let AntennaKey::Satellite { prn, svn } = &key {
                                match pending.valid_from {
                                    Some(t) => record.valid_from = t,
                                    None => {
                                        // mandatory for satellite datasets:
                                        // downgraded to the all-time start
                                        #[cfg(feature = "log")]
                                        warn!("{}: missing VALID FROM", key);
                                    },
                                }
                                if let Some(t) = pending.valid_until {
                                    record.valid_until = t;
                                }
                                sv_index.register(
                                    *prn,
                                    SvnEntry {
                                        svn: *svn,
                                        valid_from: record.valid_from,
                                        valid_until: record.valid_until,
                                    },
                                );
                            }
                            // receiver datasets keep the all-time window
                            antennas.insert(key, record);
                        },
                        None => {
                            #[cfg(feature = "log")]
                            warn!("dropped antenna dataset without TYPE / SERIAL NO");
                        },
                    }
                }
            } else {
                // inside a frequency section, remaining lines are
                // azimuth dependent pattern rows: azimuth angle
                // followed by one value per zenith step
                if section != Section::Frequency {
                    continue;
                }
                if let (Some(pending), Some(pf)) = (pending.as_ref(), frequency.as_mut()) {
                    if pending.record.dazi == 0.0 {
                        continue;
                    }
                    let mut items = content.split_ascii_whitespace();
                    let azimuth = match items.next().map(f64::from_str) {
                        Some(Ok(azimuth)) => azimuth,
                        _ => continue,
                    };
                    let values: Result<Vec<f64>, _> = items.map(f64::from_str).collect();
                    match values {
                        Ok(values) => {
                            if values.len() != pending.record.nb_zenith_samples() {
                                #[cfg(feature = "log")]
                                warn!(
                                    "{}: azimuth {}° row carries {} values, {} expected",
                                    pf.carrier,
                                    azimuth,
                                    values.len(),
                                    pending.record.nb_zenith_samples()
                                );
                            }
                            // stored as parsed, even on mismatch
                            pf.entry.azimuth_rows.push((azimuth, values));
                        },
                        Err(_e) => {
                            #[cfg(feature = "log")]
                            warn!("{}: dropped malformed azimuth row: {}", pf.carrier, _e);
                        },
                    }
                }
            }
        }

        Ok(Self {
            version,
            pcv_type,
            reference_ant_sn,
            antennas,
            sv_index,
        })
    }
}
