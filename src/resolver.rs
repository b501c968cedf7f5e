//! PRN ↔ SVN identity resolution.
//! A broadcast identity (PRN) designates whatever vehicle
//! transmits that signal during a given period: the index keeps,
//! per PRN, every vehicle registration with its validity window.
use crate::svn::Svn;
use gnss::prelude::{Constellation, SV};
use hifitime::Epoch;
use itertools::Itertools;
use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One vehicle registration under a broadcast identity
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SvnEntry {
    /// Permanent vehicle identity
    pub svn: Svn,
    /// Start of registration
    pub valid_from: Epoch,
    /// End of registration, far future sentinel when never declared
    pub valid_until: Epoch,
}

impl SvnEntry {
    /// Interval containment, inclusive on both ends
    pub fn contains(&self, now: Epoch) -> bool {
        self.valid_from <= now && now <= self.valid_until
    }
}

/// Broadcast to vehicle identity index, built once at parsing time.
/// Registrations under one PRN are expected not to overlap in time;
/// that is a data quality expectation the index does not enforce:
/// on overlap, resolution returns the first registration
/// in file order.
#[derive(Default, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SvnIndex {
    entries: HashMap<SV, Vec<SvnEntry>>,
}

impl SvnIndex {
    /// Registers given vehicle under given broadcast identity,
    /// preserving file order.
    pub(crate) fn register(&mut self, prn: SV, entry: SvnEntry) {
        self.entries.entry(prn).or_default().push(entry);
    }
    /// Resolves the vehicle transmitting given PRN at instant "now".
    /// None when no registered window contains it.
    pub fn resolve_svn(&self, prn: SV, now: Epoch) -> Option<Svn> {
        self.entries
            .get(&prn)?
            .iter()
            .find(|entry| entry.contains(now))
            .map(|entry| entry.svn)
    }
    /// Resolves the broadcast identity given vehicle ever transmitted.
    /// Linear scan, first match wins on (unexpected) duplicates.
    pub fn resolve_prn(&self, svn: Svn) -> Option<SV> {
        self.entries
            .iter()
            .find(|(_, entries)| entries.iter().any(|entry| entry.svn == svn))
            .map(|(prn, _)| *prn)
    }
    /// Returns every PRN with at least one registration
    /// covering instant "now", sorted, optionally restricted
    /// to one constellation.
    pub fn prn_on_date(&self, now: Epoch, constellation: Option<Constellation>) -> Vec<SV> {
        self.entries
            .iter()
            .filter(|(prn, entries)| {
                if let Some(c) = constellation {
                    if prn.constellation != c {
                        return false;
                    }
                }
                entries.iter().any(|entry| entry.contains(now))
            })
            .map(|(prn, _)| *prn)
            .sorted()
            .collect()
    }
    /// Total number of registrations
    pub fn len(&self) -> usize {
        self.entries.values().map(|entries| entries.len()).sum()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::epoch::{far_future, from_ymd};
    use std::str::FromStr;

    fn index() -> SvnIndex {
        let mut index = SvnIndex::default();
        index.register(
            SV::from_str("G01").unwrap(),
            SvnEntry {
                svn: Svn::from_str("G032").unwrap(),
                valid_from: from_ymd(1992, 11, 22),
                valid_until: from_ymd(2008, 10, 16),
            },
        );
        index.register(
            SV::from_str("G01").unwrap(),
            SvnEntry {
                svn: Svn::from_str("G049").unwrap(),
                valid_from: from_ymd(2009, 3, 24),
                valid_until: far_future(),
            },
        );
        index.register(
            SV::from_str("R02").unwrap(),
            SvnEntry {
                svn: Svn::from_str("R731").unwrap(),
                valid_from: from_ymd(2008, 12, 25),
                valid_until: far_future(),
            },
        );
        index
    }

    #[test]
    fn resolution_by_window() {
        let index = index();
        let g01 = SV::from_str("G01").unwrap();

        // inside first window
        assert_eq!(
            index.resolve_svn(g01, from_ymd(2000, 1, 1)),
            Some(Svn::from_str("G032").unwrap()),
        );
        // both bounds inclusive
        assert_eq!(
            index.resolve_svn(g01, from_ymd(1992, 11, 22)),
            Some(Svn::from_str("G032").unwrap()),
        );
        assert_eq!(
            index.resolve_svn(g01, from_ymd(2008, 10, 16)),
            Some(Svn::from_str("G032").unwrap()),
        );
        // gap between registrations
        assert_eq!(index.resolve_svn(g01, from_ymd(2009, 1, 1)), None);
        // open ended second window
        assert_eq!(
            index.resolve_svn(g01, from_ymd(2020, 6, 1)),
            Some(Svn::from_str("G049").unwrap()),
        );
        // unknown PRN
        assert_eq!(
            index.resolve_svn(SV::from_str("E11").unwrap(), from_ymd(2020, 6, 1)),
            None
        );
    }

    #[test]
    fn reverse_resolution_roundtrip() {
        let index = index();
        let g01 = SV::from_str("G01").unwrap();
        let svn = index.resolve_svn(g01, from_ymd(2000, 1, 1)).unwrap();
        assert_eq!(index.resolve_prn(svn), Some(g01));
        assert_eq!(index.resolve_prn(Svn::from_str("G999").unwrap()), None);
    }

    #[test]
    fn prn_on_date() {
        let index = index();
        let listed = index.prn_on_date(from_ymd(2010, 1, 1), None);
        assert_eq!(
            listed,
            vec![SV::from_str("G01").unwrap(), SV::from_str("R02").unwrap()],
        );
        let gps_only = index.prn_on_date(from_ymd(2010, 1, 1), Some(Constellation::GPS));
        assert_eq!(gps_only, vec![SV::from_str("G01").unwrap()]);
        // nobody transmits in the G01 gap but R02 does
        let listed = index.prn_on_date(from_ymd(2009, 1, 1), None);
        assert_eq!(listed, vec![SV::from_str("R02").unwrap()]);
    }
}
