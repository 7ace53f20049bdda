//! Splice-site scoring for intron transitions.
//!
//! Donor (5') and acceptor (3') sites are scored from the two intron bases
//! they consume. GT-AG introns are canonical, GC-AG semi-canonical and AT-AC
//! the minor (U12) class; anything else is allowed but penalised.

use core::fmt;

/// Classification of one splice-site dinucleotide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SiteClass {
    /// GT donor or AG acceptor.
    Canonical,
    /// GC donor.
    SemiCanonical,
    /// AT donor or AC acceptor (U12-type).
    Minor,
    /// Any other dinucleotide.
    NonCanonical,
}

/// Which end of the intron a site sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpliceSide {
    Donor,
    Acceptor,
}

impl fmt::Display for SpliceSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpliceSide::Donor => f.write_str("donor"),
            SpliceSide::Acceptor => f.write_str("acceptor"),
        }
    }
}

/// Intron scoring parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpliceScores {
    /// Charged once per intron, at the donor (default: -15).
    pub intron_open: i32,
    /// Charged for every intron base between the two sites (default: 0).
    pub intron_extend: i32,
    /// Bonus for a GT donor or AG acceptor (default: 4).
    pub canonical_bonus: i32,
    /// Bonus for a GC donor (default: 0).
    pub semi_canonical_bonus: i32,
    /// Bonus for an AT donor or AC acceptor (default: 2).
    pub minor_bonus: i32,
    /// Score for any other dinucleotide (default: -10).
    pub non_canonical_penalty: i32,
}

impl Default for SpliceScores {
    fn default() -> Self {
        Self {
            intron_open: -15,
            intron_extend: 0,
            canonical_bonus: 4,
            semi_canonical_bonus: 0,
            minor_bonus: 2,
            non_canonical_penalty: -10,
        }
    }
}

impl SpliceScores {
    /// Score contributed by one site class.
    pub fn class_score(&self, class: SiteClass) -> i32 {
        match class {
            SiteClass::Canonical => self.canonical_bonus,
            SiteClass::SemiCanonical => self.semi_canonical_bonus,
            SiteClass::Minor => self.minor_bonus,
            SiteClass::NonCanonical => self.non_canonical_penalty,
        }
    }
}

/// Classify the first two intron bases.
pub fn classify_donor(dinucleotide: &[u8]) -> SiteClass {
    match upper_pair(dinucleotide) {
        Some([b'G', b'T']) => SiteClass::Canonical,
        Some([b'G', b'C']) => SiteClass::SemiCanonical,
        Some([b'A', b'T']) => SiteClass::Minor,
        _ => SiteClass::NonCanonical,
    }
}

/// Classify the last two intron bases.
pub fn classify_acceptor(dinucleotide: &[u8]) -> SiteClass {
    match upper_pair(dinucleotide) {
        Some([b'A', b'G']) => SiteClass::Canonical,
        Some([b'A', b'C']) => SiteClass::Minor,
        _ => SiteClass::NonCanonical,
    }
}

fn upper_pair(bases: &[u8]) -> Option<[u8; 2]> {
    match bases {
        [a, b] => Some([a.to_ascii_uppercase(), b.to_ascii_uppercase()]),
        _ => None,
    }
}

/// Label data for a splice-site transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpliceSite {
    side: SpliceSide,
    scores: SpliceScores,
}

impl SpliceSite {
    pub fn donor(scores: SpliceScores) -> Self {
        Self {
            side: SpliceSide::Donor,
            scores,
        }
    }

    pub fn acceptor(scores: SpliceScores) -> Self {
        Self {
            side: SpliceSide::Acceptor,
            scores,
        }
    }

    pub fn side(&self) -> SpliceSide {
        self.side
    }

    pub fn classify(&self, dinucleotide: &[u8]) -> SiteClass {
        match self.side {
            SpliceSide::Donor => classify_donor(dinucleotide),
            SpliceSide::Acceptor => classify_acceptor(dinucleotide),
        }
    }

    /// Score the two target bases this site consumes. The donor also pays
    /// the intron-open cost.
    pub fn score(&self, dinucleotide: &[u8]) -> i32 {
        let class = self.scores.class_score(self.classify(dinucleotide));
        match self.side {
            SpliceSide::Donor => class.saturating_add(self.scores.intron_open),
            SpliceSide::Acceptor => class,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn donor_classes() {
        assert_eq!(classify_donor(b"GT"), SiteClass::Canonical);
        assert_eq!(classify_donor(b"gc"), SiteClass::SemiCanonical);
        assert_eq!(classify_donor(b"AT"), SiteClass::Minor);
        assert_eq!(classify_donor(b"CC"), SiteClass::NonCanonical);
        assert_eq!(classify_donor(b"G"), SiteClass::NonCanonical);
    }

    #[test]
    fn acceptor_classes() {
        assert_eq!(classify_acceptor(b"AG"), SiteClass::Canonical);
        assert_eq!(classify_acceptor(b"ac"), SiteClass::Minor);
        assert_eq!(classify_acceptor(b"GT"), SiteClass::NonCanonical);
    }

    #[test]
    fn canonical_intron_total() {
        let scores = SpliceScores::default();
        let donor = SpliceSite::donor(scores);
        let acceptor = SpliceSite::acceptor(scores);
        // GT-AG: open + two canonical bonuses
        assert_eq!(donor.score(b"GT") + acceptor.score(b"AG"), -7);
        // GC-AG
        assert_eq!(donor.score(b"GC") + acceptor.score(b"AG"), -11);
    }

    #[test]
    fn non_canonical_is_worse_than_canonical() {
        let donor = SpliceSite::donor(SpliceScores::default());
        assert!(donor.score(b"TT") < donor.score(b"GT"));
        assert_eq!(donor.side(), SpliceSide::Donor);
    }
}
