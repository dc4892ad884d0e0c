//! Rank the cores of a Linux machine by the best performance signal the
//! kernel exposes, fastest first.
//!
//! Discovery reads `/sys/devices/system/cpu` (or any directory laid out like
//! it), groups logical CPUs into physical cores, resolves a rank per core or
//! per logical CPU, and sorts the result. The [`report`] module turns the
//! sorted data into text.
//!
//! # Examples
//!
//! ```no_run
//! use cpu_rank::{linux, report, HostInfo, SysfsLayout};
//!
//! # fn main() -> Result<(), cpu_rank::CpuRankError> {
//! let layout = SysfsLayout::default();
//! let host = HostInfo::detect(&layout);
//! let cores = linux::ranked_cores(&layout)?;
//! println!("{}", report::core_report(&host, &cores));
//! # Ok(())
//! # }
//! ```

pub mod cpulist;
mod error;
#[cfg(feature = "linux")]
pub mod linux;
pub mod report;
pub mod sort;
pub mod sysfs;

use std::fmt;

pub use error::CpuRankError;
pub use sort::TierSplit;
pub use sysfs::SysfsLayout;



/// Machine-wide CPU information.
///
/// Every field falls back to its default on its own when the source is
/// missing, so a partially populated sysfs still yields a usable value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostInfo {
    /// CPU model name from the first processor block of `/proc/cpuinfo`
    pub model_name: String,
    /// Active frequency scaling driver (`intel_pstate`, `amd-pstate-epp`, ...)
    pub driver: String,
    /// Active scaling governor
    pub governor: String,
    /// Governors the driver supports, in the order the kernel lists them
    pub available_governors: Vec<String>,
    /// Opportunistic boost state
    pub boost: Boost,
}

impl Default for HostInfo {
    fn default() -> Self {
        Self {
            model_name: UNKNOWN.to_string(),
            driver: UNKNOWN.to_string(),
            governor: UNKNOWN.to_string(),
            available_governors: Vec::new(),
            boost: Boost::Unknown,
        }
    }
}

impl fmt::Display for HostInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.model_name)?;
        writeln!(
            f,
            "Governor: {} ({})",
            self.governor,
            self.available_governors.join(", ")
        )?;
        writeln!(f, "Driver:   {}", self.driver)?;
        write!(f, "Turbo:    {}", self.boost)
    }
}

pub(crate) const UNKNOWN: &str = "unknown";

/// Boost (turbo) state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Boost {
    Enabled,
    Disabled,
    /// Neither `cpufreq/policy0/boost` nor `intel_pstate/no_turbo` is readable
    #[default]
    Unknown,
}

impl Boost {
    /// From `cpufreq/policyN/boost`, where `1` means enabled.
    pub fn from_boost_flag(value: i64) -> Self {
        if value == 1 { Boost::Enabled } else { Boost::Disabled }
    }

    /// From `intel_pstate/no_turbo`, where `0` means enabled.
    pub fn from_no_turbo_flag(value: i64) -> Self {
        if value == 0 { Boost::Enabled } else { Boost::Disabled }
    }
}

impl fmt::Display for Boost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Boost::Enabled => "Enabled",
            Boost::Disabled => "Disabled",
            Boost::Unknown => UNKNOWN,
        })
    }
}

/// Logical CPU ids sharing one physical core.
///
/// Always non-empty and sorted ascending without duplicates, so the derived
/// `Ord` is the lexicographic order of the id tuples.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SiblingSet(Vec<u32>);

impl SiblingSet {
    /// Builds a set from arbitrary ids. Returns `None` when `ids` is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use cpu_rank::SiblingSet;
    ///
    /// let set = SiblingSet::new([7, 3, 7]).unwrap();
    /// assert_eq!(set.as_slice(), &[3, 7]);
    /// assert!(SiblingSet::new([]).is_none());
    /// ```
    pub fn new(ids: impl IntoIterator<Item = u32>) -> Option<Self> {
        let mut ids: Vec<u32> = ids.into_iter().collect();
        ids.sort_unstable();
        ids.dedup();
        if ids.is_empty() { None } else { Some(Self(ids)) }
    }

    /// Group holding a single CPU, used when no sibling list is available.
    pub fn singleton(cpu: u32) -> Self {
        Self(vec![cpu])
    }

    /// Lowest-numbered sibling. Used as the representative for per-core reads.
    pub fn primary(&self) -> u32 {
        self.0[0]
    }

    /// Whether `cpu` is a secondary (SMT) thread of this core.
    ///
    /// ```
    /// use cpu_rank::SiblingSet;
    ///
    /// let set = SiblingSet::new([3, 7]).unwrap();
    /// assert!(set.is_smt(7));
    /// assert!(!set.is_smt(3));
    /// ```
    pub fn is_smt(&self, cpu: u32) -> bool {
        cpu != self.primary()
    }

    pub fn contains(&self, cpu: u32) -> bool {
        self.0.binary_search(&cpu).is_ok()
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Result of topology discovery: the logical CPUs and their core groups.
///
/// Groups are pairwise disjoint, cover every discovered CPU, and are kept in
/// ascending [`SiblingSet`] order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topology {
    cpus: Vec<u32>,
    groups: Vec<SiblingSet>,
}

impl Topology {
    /// Logical CPU ids found under the CPU base directory, ascending.
    pub fn cpus(&self) -> &[u32] {
        &self.cpus
    }

    pub fn groups(&self) -> &[SiblingSet] {
        &self.groups
    }

    /// The core group `cpu` belongs to.
    pub fn group_of(&self, cpu: u32) -> Option<&SiblingSet> {
        self.groups.iter().find(|group| group.contains(cpu))
    }
}

/// Fully resolved physical core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreGroup {
    pub siblings: SiblingSet,
    /// Host-relative performance score, higher is faster
    pub rank: i64,
    /// `cpuinfo_min_freq` in MHz, 0 when unknown
    pub min_mhz: u64,
    /// `cpuinfo_max_freq` in MHz, 0 when unknown
    pub max_mhz: u64,
}

/// One logical CPU in the per-CPU report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PerCpuEntry {
    pub cpu_id: u32,
    pub rank: i64,
    /// True when `cpu_id` is not the lowest id of its core
    pub is_smt: bool,
}

impl PerCpuEntry {
    pub fn class(&self) -> CpuClass {
        if self.is_smt { CpuClass::Smt } else { CpuClass::Physical }
    }
}

/// Physical thread or SMT sibling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuClass {
    Physical,
    Smt,
}

impl fmt::Display for CpuClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CpuClass::Physical => "Physical",
            CpuClass::Smt => "SMT",
        })
    }
}

/// Hybrid core type derived from where a rank falls relative to the
/// midpoint of all observed ranks. See [`TierSplit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreTier {
    Performance,
    Efficiency,
}

impl fmt::Display for CoreTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CoreTier::Performance => "Performance",
            CoreTier::Efficiency => "Efficiency",
        })
    }
}
