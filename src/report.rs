//! Text rendering of sorted results.
//!
//! Pure formatting; nothing here reads the filesystem.

use std::fmt::Write;

use crate::{CoreGroup, HostInfo, PerCpuEntry, TierSplit};

/// Markdown table with one row per physical core.
pub fn cores_as_markdown(cores: &[CoreGroup]) -> String {
    let mut out = String::from("Rank | CPU IDs | MHz min | MHz max\n----:|:--------|--------:|--------:\n");

    for core in cores {
        let siblings = core
            .siblings
            .iter()
            .map(|id| format!("{id:>2}"))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(
            out,
            "{:>4} |{:>8} |{:>8} |{:>8}",
            core.rank, siblings, core.min_mhz, core.max_mhz
        );
    }

    out
}

/// Markdown table with one row per logical CPU. The `Type` column is added
/// when a [`TierSplit`] is given.
pub fn cpus_as_markdown(entries: &[PerCpuEntry], tiers: Option<&TierSplit>) -> String {
    let mut out = String::new();

    match tiers {
        Some(_) => out.push_str("CPU ID | Rank | Status   | Type\n-----:|-----:|:---------|:-----------\n"),
        None => out.push_str("CPU ID | Rank | Status\n-----:|-----:|:---------\n"),
    }

    for entry in entries {
        let status = entry.class().to_string();
        let _ = match tiers {
            Some(split) => writeln!(
                out,
                "{:>6} |{:>5} | {:<8} | {}",
                entry.cpu_id,
                entry.rank,
                status,
                split.tier_of(entry.rank)
            ),
            None => writeln!(out, "{:>6} |{:>5} | {}", entry.cpu_id, entry.rank, status),
        };
    }

    out
}

/// Comma-separated ids in the given order. Usable directly as a CPU list for
/// `taskset -c` and similar pinning tools.
///
/// ```
/// use cpu_rank::{report::affinity_list, PerCpuEntry};
///
/// let entries = [
///     PerCpuEntry { cpu_id: 2, rank: 166, is_smt: false },
///     PerCpuEntry { cpu_id: 0, rank: 120, is_smt: false },
///     PerCpuEntry { cpu_id: 3, rank: 166, is_smt: true },
/// ];
/// assert_eq!(affinity_list(&entries), "2,0,3");
/// ```
pub fn affinity_list(entries: &[PerCpuEntry]) -> String {
    entries
        .iter()
        .map(|entry| entry.cpu_id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Host summary, a blank line, then the core table.
pub fn core_report(host: &HostInfo, cores: &[CoreGroup]) -> String {
    format!("{host}\n\n{}", cores_as_markdown(cores))
}

/// Host summary, the per-CPU table, then the affinity list.
pub fn cpu_report(host: &HostInfo, entries: &[PerCpuEntry], with_tiers: bool) -> String {
    let split = if with_tiers { TierSplit::from_entries(entries) } else { None };
    format!(
        "{host}\n\n{}\nAffinity: {}\n",
        cpus_as_markdown(entries, split.as_ref()),
        affinity_list(entries)
    )
}
