//! Evidential stamps
//!
//! Every input event gets a fresh evidence id; derived beliefs carry the
//! ids of the inputs they came from. Two beliefs whose stamps share an id
//! are not independent evidence and must never be merged by revision.

use std::fmt;

/// Maximum evidence ids retained per stamp.
pub const STAMP_CAPACITY: usize = 10;

/// Ordered evidential base, newest contributors first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Stamp {
    base: Vec<u64>,
}

impl Stamp {
    /// Stamp naming a single input event.
    pub fn from_id(id: u64) -> Self {
        Stamp { base: vec![id] }
    }

    pub fn ids(&self) -> &[u64] {
        &self.base
    }

    pub fn is_empty(&self) -> bool {
        self.base.is_empty()
    }

    /// True iff the two evidential bases intersect.
    pub fn overlaps(&self, other: &Stamp) -> bool {
        self.base.iter().any(|id| other.base.contains(id))
    }

    /// Joint provenance of two parents: interleave the bases, truncating at
    /// capacity. Alternating keeps a mix from both parents rather than all
    /// of one when the combined base overflows.
    pub fn zip(a: &Stamp, b: &Stamp) -> Self {
        let mut base = Vec::with_capacity(STAMP_CAPACITY);
        let longest = a.base.len().max(b.base.len());
        for i in 0..longest {
            if let Some(&id) = a.base.get(i) {
                if base.len() < STAMP_CAPACITY {
                    base.push(id);
                }
            }
            if let Some(&id) = b.base.get(i) {
                if base.len() < STAMP_CAPACITY {
                    base.push(id);
                }
            }
            if base.len() == STAMP_CAPACITY {
                break;
            }
        }
        Stamp { base }
    }
}

impl fmt::Display for Stamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, id) in self.base.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", id)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stamp(ids: &[u64]) -> Stamp {
        ids.iter()
            .copied()
            .fold(Stamp::default(), |acc, id| Stamp::zip(&acc, &Stamp::from_id(id)))
    }

    #[test]
    fn shared_id_means_overlap() {
        let s1 = stamp(&[1, 2]);
        let s2 = stamp(&[2, 3, 4]);
        assert!(s1.overlaps(&s2));
        assert!(s2.overlaps(&s1));
    }

    #[test]
    fn disjoint_bases_do_not_overlap() {
        assert!(!stamp(&[1, 2]).overlaps(&stamp(&[3, 4])));
        assert!(!Stamp::default().overlaps(&stamp(&[1])));
    }

    #[test]
    fn zip_interleaves_parents() {
        let z = Stamp::zip(&stamp(&[1, 2]), &stamp(&[3, 4]));
        assert_eq!(z.ids(), &[1, 3, 2, 4]);
    }

    #[test]
    fn zip_truncates_with_a_mix_of_both_parents() {
        let left = stamp(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
        let right = stamp(&[11, 12, 13, 14, 15, 16, 17, 18, 19, 20]);
        let z = Stamp::zip(&left, &right);
        assert_eq!(z.ids().len(), STAMP_CAPACITY);
        let from_left = z.ids().iter().filter(|&&id| id <= 10).count();
        assert_eq!(from_left, STAMP_CAPACITY / 2);
    }
}
