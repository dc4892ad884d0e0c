//! Report ordering and the Performance/Efficiency split.

use crate::{CoreGroup, CoreTier, PerCpuEntry};

/// Highest rank first; equal ranks by ascending sibling tuple.
pub fn sort_core_groups(cores: &mut [CoreGroup]) {
    cores.sort_by(|a, b| {
        b.rank
            .cmp(&a.rank)
            .then_with(|| a.siblings.cmp(&b.siblings))
    });
}

/// Physical threads before SMT threads, each fastest first, then by id.
pub fn sort_per_cpu(entries: &mut [PerCpuEntry]) {
    entries.sort_by(|a, b| {
        a.is_smt
            .cmp(&b.is_smt)
            .then_with(|| b.rank.cmp(&a.rank))
            .then_with(|| a.cpu_id.cmp(&b.cpu_id))
    });
}

/// Midpoint between the lowest and highest rank on the host.
///
/// Ranks strictly above the midpoint are [`CoreTier::Performance`], the rest
/// [`CoreTier::Efficiency`]. On a host where every rank is equal all CPUs are
/// Efficiency. The split only labels rows; it never changes the sort.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierSplit {
    midpoint: f64,
}

impl TierSplit {
    /// `None` when `entries` is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use cpu_rank::{CoreTier, PerCpuEntry, TierSplit};
    ///
    /// let entries = [
    ///     PerCpuEntry { cpu_id: 0, rank: 166, is_smt: false },
    ///     PerCpuEntry { cpu_id: 1, rank: 101, is_smt: false },
    /// ];
    /// let split = TierSplit::from_entries(&entries).unwrap();
    /// assert_eq!(split.midpoint(), 133.5);
    /// assert_eq!(split.tier_of(166), CoreTier::Performance);
    /// assert_eq!(split.tier_of(101), CoreTier::Efficiency);
    /// ```
    pub fn from_entries(entries: &[PerCpuEntry]) -> Option<Self> {
        let min = entries.iter().map(|e| e.rank).min()?;
        let max = entries.iter().map(|e| e.rank).max()?;
        let (lo, hi) = (min as f64, max as f64);
        Some(Self {
            midpoint: lo + (hi - lo) / 2.0,
        })
    }

    pub fn midpoint(&self) -> f64 {
        self.midpoint
    }

    pub fn tier_of(&self, rank: i64) -> CoreTier {
        if rank as f64 > self.midpoint {
            CoreTier::Performance
        } else {
            CoreTier::Efficiency
        }
    }
}

#[cfg(test)]
mod tests {
    use {super::*, crate::SiblingSet};

    fn core(rank: i64, siblings: &[u32]) -> CoreGroup {
        CoreGroup {
            siblings: SiblingSet::new(siblings.iter().copied()).unwrap(),
            rank,
            min_mhz: 0,
            max_mhz: 0,
        }
    }

    fn entry(cpu_id: u32, rank: i64, is_smt: bool) -> PerCpuEntry {
        PerCpuEntry { cpu_id, rank, is_smt }
    }

    #[test]
    fn test_core_sort_rank_then_siblings() {
        let mut cores = vec![core(50, &[2, 3]), core(100, &[0, 1]), core(100, &[4, 5])];
        sort_core_groups(&mut cores);

        let order: Vec<(i64, &[u32])> = cores
            .iter()
            .map(|c| (c.rank, c.siblings.as_slice()))
            .collect();
        assert_eq!(
            order,
            vec![(100, &[0, 1][..]), (100, &[4, 5][..]), (50, &[2, 3][..])]
        );
    }

    #[test]
    fn test_core_sort_ignores_input_order() {
        let mut a = vec![core(7, &[4]), core(7, &[0, 8]), core(9, &[2]), core(7, &[0, 1])];
        let mut b = a.clone();
        b.reverse();
        sort_core_groups(&mut a);
        sort_core_groups(&mut b);
        assert_eq!(a, b);
        assert_eq!(a[0].siblings.as_slice(), &[2]);
        assert_eq!(a[1].siblings.as_slice(), &[0, 1]);
    }

    #[test]
    fn test_per_cpu_physical_before_smt() {
        let mut entries = vec![
            entry(8, 999, true),
            entry(1, 10, false),
            entry(0, 20, false),
            entry(9, 5, true),
        ];
        sort_per_cpu(&mut entries);

        let ids: Vec<u32> = entries.iter().map(|e| e.cpu_id).collect();
        assert_eq!(ids, vec![0, 1, 8, 9]);
        let first_smt = entries.iter().position(|e| e.is_smt).unwrap();
        assert!(entries[..first_smt].iter().all(|e| !e.is_smt));
        assert!(entries[first_smt..].iter().all(|e| e.is_smt));
    }

    #[test]
    fn test_per_cpu_ties_by_id() {
        let mut entries = vec![entry(3, 100, false), entry(1, 100, false), entry(2, 100, false)];
        sort_per_cpu(&mut entries);
        let ids: Vec<u32> = entries.iter().map(|e| e.cpu_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_tier_split_uses_real_midpoint() {
        let entries = [entry(0, 1, false), entry(1, 2, false)];
        let split = TierSplit::from_entries(&entries).unwrap();
        assert_eq!(split.midpoint(), 1.5);
        assert_eq!(split.tier_of(2), CoreTier::Performance);
        assert_eq!(split.tier_of(1), CoreTier::Efficiency);
    }

    #[test]
    fn test_tier_split_uniform_host() {
        let entries = [entry(0, 100, false), entry(1, 100, true)];
        let split = TierSplit::from_entries(&entries).unwrap();
        assert_eq!(split.tier_of(100), CoreTier::Efficiency);
    }

    #[test]
    fn test_tier_split_empty() {
        assert!(TierSplit::from_entries(&[]).is_none());
    }
}
