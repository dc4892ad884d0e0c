//! Kernel cpulist syntax (`0-3,8,10-11`).

use std::collections::BTreeSet;

/// Upper bound on CPU ids accepted from a list. Matches the kernel's largest
/// `NR_CPUS`, and keeps a corrupted range from expanding without bound.
pub const MAX_CPUS: u32 = 8192;

/// Expands a cpulist into the set of ids it names.
///
/// Returns `None` when any element is empty, non-numeric, a reversed range,
/// or names an id at or above [`MAX_CPUS`]. A partially valid list is
/// rejected as a whole.
///
/// # Examples
///
/// ```
/// use cpu_rank::cpulist::parse_cpu_list;
///
/// let ids = parse_cpu_list("0,2-4,3\n").unwrap();
/// assert_eq!(ids.into_iter().collect::<Vec<_>>(), vec![0, 2, 3, 4]);
/// assert!(parse_cpu_list("4-2").is_none());
/// ```
pub fn parse_cpu_list(list: &str) -> Option<BTreeSet<u32>> {
    let mut cpus = BTreeSet::new();

    for part in list.trim().split(',') {
        let part = part.trim();
        if let Some((start, end)) = part.split_once('-') {
            let start = parse_id(start)?;
            let end = parse_id(end)?;
            if start > end {
                return None;
            }
            cpus.extend(start..=end);
        } else {
            cpus.insert(parse_id(part)?);
        }
    }

    Some(cpus)
}

fn parse_id(s: &str) -> Option<u32> {
    let s = s.trim();
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse::<u32>().ok().filter(|&id| id < MAX_CPUS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(list: &str) -> Vec<u32> {
        parse_cpu_list(list).unwrap().into_iter().collect()
    }

    #[test]
    fn test_single_id() {
        assert_eq!(ids("5"), vec![5]);
        assert_eq!(ids("0\n"), vec![0]);
    }

    #[test]
    fn test_range_is_inclusive() {
        assert_eq!(ids("0-3"), vec![0, 1, 2, 3]);
        assert_eq!(ids("7-7"), vec![7]);
    }

    #[test]
    fn test_mixed_list_is_union() {
        assert_eq!(ids("0,16"), vec![0, 16]);
        assert_eq!(ids("0-3,16-19"), vec![0, 1, 2, 3, 16, 17, 18, 19]);
        assert_eq!(ids("1,0-2,2"), vec![0, 1, 2]);
    }

    #[test]
    fn test_malformed_lists() {
        assert!(parse_cpu_list("").is_none());
        assert!(parse_cpu_list("\n").is_none());
        assert!(parse_cpu_list("0,,1").is_none());
        assert!(parse_cpu_list("a").is_none());
        assert!(parse_cpu_list("0-").is_none());
        assert!(parse_cpu_list("-1").is_none());
        assert!(parse_cpu_list("+1").is_none());
        assert!(parse_cpu_list("3-1").is_none());
        assert!(parse_cpu_list("0-1-2").is_none());
    }

    #[test]
    fn test_rejects_ids_beyond_max() {
        assert!(parse_cpu_list("0-4294967295").is_none());
        assert!(parse_cpu_list(&MAX_CPUS.to_string()).is_none());
        assert_eq!(ids(&(MAX_CPUS - 1).to_string()), vec![MAX_CPUS - 1]);
    }
}
