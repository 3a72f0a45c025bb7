//! Exact-match repairs for header lines known to be malformed in the archive.
//!
//! The table is pure data: a malformed line maps to its corrected form. Lines
//! not in the table pass through untouched and fail later in parsing if they
//! are broken.

use std::borrow::Cow;
use std::collections::HashMap;

/// Built-in repairs for the `Date:` and `References:` lines of the source dump.
const BUILTIN_REPAIRS: &[(&str, &str)] = &[
    // ambiguous or malformed time zones
    (
        "Date: 11 Sep 93 12:58:28 -500",
        "Date: 11 Sep 93 12:58:28 -0500",
    ),
    (
        "Date: 11 Sep 93 23:10:45 -500",
        "Date: 11 Sep 93 23:10:45 -0500",
    ),
    (
        "Date: Wed, 12 Oct 1994 09:35:51 Central",
        "Date: Wed, 12 Oct 1994 09:35:51 CST",
    ),
    (
        "Date: Thu, 02 Dec 93 19:50:54 est",
        "Date: Thu, 02 Dec 93 19:50:54 EST",
    ),
    (
        "Date: Tue, 15 Jun 93 15:10:37 T-1",
        "Date: Tue, 15 Jun 93 15:10:37 -0100",
    ),
    // broken brackets and truncated reference lists
    ("References: <", "References: <missing-reference-id>"),
    (
        "References: C0GzED.A2u@news.cso.uiuc.edu> <1829@idacrd.UUCP> <1ii5rfINNc2q@darkstar.UCSC.EDU",
        "References: <C0GzED.A2u@news.cso.uiuc.edu> <1829@idacrd.UUCP> <1ii5rfINNc2q@darkstar.UCSC.EDU>",
    ),
    (
        "References: RSI Customer Service",
        "References: <RSI-Customer-Service>",
    ),
    (
        "References: <1991Apr13.030312.7999@vax1.tcd.ie}",
        "References: <1991Apr13.030312.7999@vax1.tcd.ie>",
    ),
    (
        "References: <1991Nov12.183857.24316@newcastle.ac.uk> <1991Nov18.011915.40",
        "References: <1991Nov12.183857.24316@newcastle.ac.uk> <1991Nov18.011915.408@bradley.bradley.edu>",
    ),
    (
        "References: <1992Mar21.004047.17322@erg.sri.com>> <18182@ector.cs.purdue.edu> <1992Mar21.213430.8671@daimi.aau.dk",
        "References: <1992Mar21.004047.17322@erg.sri.com> <18182@ector.cs.purdue.edu> <1992Mar21.213430.8671@daimi.aau.dk>",
    ),
    (
        "References: <1993Feb1.162305.16901@magnus.acs.ohio-state.edu> <1kjon1INN81d@bre",
        "References: <1993Feb1.162305.16901@magnus.acs.ohio-state.edu> <1kjon1INN81d@bredbeddle.cs.purdue.edu>",
    ),
    (
        "References: <8fJ=SMe00WBLE7En4P@andrew.cmu.edu> <21390@ucdavis.ucdavis.edu> <8f",
        "References: <8fJ=SMe00WBLE7En4P@andrew.cmu.edu> <21390@ucdavis.ucdavis.edu> <invalid-reference-id>",
    ),
    (
        "References: <C1tyDE.EI9@inews.Intel.COM> <16B69C2D4.X049RH@tamvm1.tamu.edu> <19",
        "References: <C1tyDE.EI9@inews.Intel.COM> <16B69C2D4.X049RH@tamvm1.tamu.edu> <1993Feb4.044100.17009@midway.uchicago.edu>",
    ),
];

/// Lookup table from a malformed header line to its corrected text.
#[derive(Debug, Clone, Default)]
pub struct RepairTable {
    fixes: HashMap<String, String>,
}

impl RepairTable {
    /// An empty table that repairs nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The table of repairs known for the source dump.
    pub fn builtin() -> Self {
        let mut table = Self::empty();
        for (malformed, corrected) in BUILTIN_REPAIRS {
            table.insert(*malformed, *corrected);
        }
        table
    }

    /// Add (or replace) a repair.
    pub fn insert(&mut self, malformed: impl Into<String>, corrected: impl Into<String>) {
        self.fixes.insert(malformed.into(), corrected.into());
    }

    /// Return the corrected line, or the line itself when no repair applies.
    pub fn apply<'a>(&'a self, line: &'a str) -> Cow<'a, str> {
        match self.fixes.get(line) {
            Some(fixed) => Cow::Borrowed(fixed.as_str()),
            None => Cow::Borrowed(line),
        }
    }

    pub fn len(&self) -> usize {
        self.fixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fixes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_repairs_timezone() {
        let table = RepairTable::builtin();
        assert_eq!(
            table.apply("Date: 11 Sep 93 12:58:28 -500"),
            "Date: 11 Sep 93 12:58:28 -0500"
        );
    }

    #[test]
    fn test_builtin_repairs_truncated_references() {
        let table = RepairTable::builtin();
        assert_eq!(
            table.apply("References: <1991Apr13.030312.7999@vax1.tcd.ie}"),
            "References: <1991Apr13.030312.7999@vax1.tcd.ie>"
        );
    }

    #[test]
    fn test_unknown_lines_pass_through() {
        let table = RepairTable::builtin();
        let line = "Date: sometime last week";
        assert_eq!(table.apply(line), line);
    }

    #[test]
    fn test_match_is_exact() {
        let table = RepairTable::builtin();
        // a trailing character defeats the match
        let line = "Date: 11 Sep 93 12:58:28 -500x";
        assert_eq!(table.apply(line), line);
    }

    #[test]
    fn test_custom_repair() {
        let mut table = RepairTable::empty();
        assert!(table.is_empty());
        table.insert("Date: soon", "Date: 1 Jan 1990 00:00:00 GMT");
        assert_eq!(table.len(), 1);
        assert_eq!(table.apply("Date: soon"), "Date: 1 Jan 1990 00:00:00 GMT");
    }
}
