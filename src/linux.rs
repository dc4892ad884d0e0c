use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::cpulist::parse_cpu_list;
use crate::error::CpuRankError;
use crate::sort::{sort_core_groups, sort_per_cpu};
use crate::sysfs::{read_int, read_str, SysfsLayout};
use crate::{Boost, CoreGroup, HostInfo, PerCpuEntry, SiblingSet, Topology};

/// Rank used when no performance source exists for a CPU.
///
/// Hosts without any signal then sort as equals.
pub const DEFAULT_RANK: i64 = 100;

const THREAD_SIBLINGS_LIST: &str = "topology/thread_siblings_list";
const CPUINFO_MIN_FREQ: &str = "cpufreq/cpuinfo_min_freq";
const CPUINFO_MAX_FREQ: &str = "cpufreq/cpuinfo_max_freq";

#[cfg(feature = "linux")]
impl HostInfo {
    /// Gathers the host summary. Each field defaults independently when its
    /// source is absent.
    pub fn detect(layout: &SysfsLayout) -> Self {
        let defaults = HostInfo::default();
        let policy = layout.policy_base();

        let boost = read_int(&policy.join("boost"))
            .map(Boost::from_boost_flag)
            .or_else(|| {
                read_int(&layout.cpu_base().join("intel_pstate/no_turbo"))
                    .map(Boost::from_no_turbo_flag)
            })
            .unwrap_or(Boost::Unknown);

        let available_governors = read_str(&policy.join("scaling_available_governors"))
            .map(|s| s.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();

        Self {
            model_name: Self::read_model_name(layout.cpuinfo()).unwrap_or(defaults.model_name),
            driver: read_trimmed(&policy.join("scaling_driver")).unwrap_or(defaults.driver),
            governor: read_trimmed(&policy.join("scaling_governor")).unwrap_or(defaults.governor),
            available_governors,
            boost,
        }
    }

    /// Reads `model name` from the first processor block of a cpuinfo file.
    ///
    /// Scanning stops at the first blank or key-less line, which ends the
    /// block of processor 0.
    fn read_model_name(cpuinfo: &Path) -> Option<String> {
        let content = read_str(cpuinfo)?;

        for line in content.lines() {
            let (key, value) = line.split_once(':')?;
            if key.trim() == "model name" {
                return Some(value.trim().to_string());
            }
        }

        None
    }
}

fn read_trimmed(path: &Path) -> Option<String> {
    read_str(path).map(|s| s.trim().to_string())
}

#[cfg(feature = "linux")]
impl Topology {
    /// Lists logical CPUs and groups them into physical cores.
    ///
    /// Each CPU's `thread_siblings_list` is expanded and deduplicated. CPUs
    /// with no usable list that no other list covers become singleton groups.
    ///
    /// # Errors
    ///
    /// Returns [`CpuRankError::Enumeration`] if the CPU base directory cannot
    /// be read and [`CpuRankError::NoCpus`] if it holds no `cpu<N>` entry.
    pub fn discover(layout: &SysfsLayout) -> Result<Self, CpuRankError> {
        let cpus = enumerate_cpus(layout.cpu_base())?;
        let mut unique: BTreeSet<SiblingSet> = BTreeSet::new();

        for &cpu in &cpus {
            let path = layout.cpu_dir(cpu).join(THREAD_SIBLINGS_LIST);
            let Some(raw) = read_str(&path) else {
                continue;
            };
            match parse_cpu_list(&raw).and_then(SiblingSet::new) {
                Some(siblings) => {
                    unique.insert(siblings);
                }
                None => warn!(cpu, list = raw.trim(), "malformed thread_siblings_list"),
            }
        }

        let mut claimed = BTreeSet::new();
        let mut groups = Vec::with_capacity(unique.len());

        for siblings in unique {
            let free: Vec<u32> = siblings.iter().filter(|id| !claimed.contains(id)).collect();
            if free.len() != siblings.len() {
                warn!(?siblings, "sibling list overlaps another core, keeping unclaimed ids");
            }
            if let Some(group) = SiblingSet::new(free) {
                claimed.extend(group.iter());
                groups.push(group);
            }
        }

        for &cpu in &cpus {
            if claimed.insert(cpu) {
                debug!(cpu, "no sibling list, using a singleton group");
                groups.push(SiblingSet::singleton(cpu));
            }
        }

        groups.sort();
        info!(cpus = cpus.len(), cores = groups.len(), "discovered topology");

        Ok(Self { cpus, groups })
    }
}

/// Collects the ids of all `cpu<N>` entries under `base`, ascending.
fn enumerate_cpus(base: &Path) -> Result<Vec<u32>, CpuRankError> {
    let entries = fs::read_dir(base).map_err(|source| CpuRankError::Enumeration {
        path: base.to_path_buf(),
        source,
    })?;

    let mut cpus: Vec<u32> = entries
        .flatten()
        .filter_map(|entry| {
            let name = entry.file_name();
            let rest = name.to_str()?.strip_prefix("cpu")?;
            if rest.is_empty() || !rest.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            rest.parse::<u32>().ok()
        })
        .collect();

    if cpus.is_empty() {
        return Err(CpuRankError::NoCpus {
            path: base.to_path_buf(),
        });
    }

    cpus.sort_unstable();
    Ok(cpus)
}

/// Where a rank came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankSource {
    /// AMD CPPC `acpi_cppc/highest_perf`
    CppcHighestPerf,
    /// Intel ITMT `topology/itmt_score`
    ItmtScore,
    /// Intel `cpufreq/base_frequency`, converted from kHz to MHz
    BaseFrequency,
    /// `topology/core_id`, an ordinal rather than a performance figure
    CoreId,
    /// Nothing readable, [`DEFAULT_RANK`]
    Default,
}

impl RankSource {
    /// Sources in priority order. The first readable one wins.
    pub const CHAIN: [RankSource; 4] = [
        RankSource::CppcHighestPerf,
        RankSource::ItmtScore,
        RankSource::BaseFrequency,
        RankSource::CoreId,
    ];

    fn relative_path(self) -> Option<&'static str> {
        match self {
            RankSource::CppcHighestPerf => Some("acpi_cppc/highest_perf"),
            RankSource::ItmtScore => Some("topology/itmt_score"),
            RankSource::BaseFrequency => Some("cpufreq/base_frequency"),
            RankSource::CoreId => Some("topology/core_id"),
            RankSource::Default => None,
        }
    }

    fn to_rank(self, raw: i64) -> i64 {
        match self {
            RankSource::BaseFrequency => raw.div_euclid(1000),
            _ => raw,
        }
    }
}

/// Rank of one logical CPU and the source it was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rank {
    pub value: i64,
    pub source: RankSource,
}

/// Resolves the rank of `cpu` through [`RankSource::CHAIN`].
///
/// Sources are never blended: the first present value is returned as is
/// (base frequency is floored to MHz), and [`DEFAULT_RANK`] when none is.
pub fn resolve_rank(layout: &SysfsLayout, cpu: u32) -> Rank {
    let dir = layout.cpu_dir(cpu);

    let rank = RankSource::CHAIN
        .iter()
        .find_map(|&source| {
            let raw = read_int(&dir.join(source.relative_path()?))?;
            Some(Rank {
                value: source.to_rank(raw),
                source,
            })
        })
        .unwrap_or(Rank {
            value: DEFAULT_RANK,
            source: RankSource::Default,
        });

    debug!(cpu, rank = rank.value, source = ?rank.source, "resolved rank");
    rank
}

/// Minimum and maximum supported frequency of `cpu` in MHz, 0 when unknown.
///
/// The two values are read independently and not cross-checked.
pub fn resolve_frequencies(layout: &SysfsLayout, cpu: u32) -> (u64, u64) {
    let dir = layout.cpu_dir(cpu);
    let read_mhz = |file: &str| read_int(&dir.join(file)).and_then(khz_to_mhz).unwrap_or(0);
    (read_mhz(CPUINFO_MIN_FREQ), read_mhz(CPUINFO_MAX_FREQ))
}

/// Floors kHz to whole MHz. Negative readings count as absent.
fn khz_to_mhz(khz: i64) -> Option<u64> {
    u64::try_from(khz).ok().map(|khz| khz / 1000)
}

#[cfg(feature = "linux")]
impl CoreGroup {
    /// Builds a core from its siblings, reading rank and frequencies from the
    /// lowest-numbered sibling only.
    pub fn resolve(layout: &SysfsLayout, siblings: SiblingSet) -> Self {
        let primary = siblings.primary();
        let rank = resolve_rank(layout, primary).value;
        let (min_mhz, max_mhz) = resolve_frequencies(layout, primary);

        Self {
            siblings,
            rank,
            min_mhz,
            max_mhz,
        }
    }
}

#[cfg(feature = "linux")]
impl PerCpuEntry {
    /// Builds the entry of one logical CPU. `group` is the core it belongs
    /// to; `None` classifies the CPU as physical.
    pub fn resolve(layout: &SysfsLayout, cpu_id: u32, group: Option<&SiblingSet>) -> Self {
        Self {
            cpu_id,
            rank: resolve_rank(layout, cpu_id).value,
            is_smt: group.is_some_and(|group| group.is_smt(cpu_id)),
        }
    }
}

/// Discovers, resolves and sorts physical cores, fastest first.
pub fn ranked_cores(layout: &SysfsLayout) -> Result<Vec<CoreGroup>, CpuRankError> {
    let topology = Topology::discover(layout)?;

    let mut cores: Vec<CoreGroup> = topology
        .groups()
        .iter()
        .cloned()
        .map(|siblings| CoreGroup::resolve(layout, siblings))
        .collect();

    sort_core_groups(&mut cores);
    Ok(cores)
}

/// Discovers, resolves and sorts logical CPUs: physical threads first, each
/// half fastest first.
pub fn ranked_cpus(layout: &SysfsLayout) -> Result<Vec<PerCpuEntry>, CpuRankError> {
    let topology = Topology::discover(layout)?;

    let mut entries: Vec<PerCpuEntry> = topology
        .cpus()
        .iter()
        .map(|&cpu| PerCpuEntry::resolve(layout, cpu, topology.group_of(cpu)))
        .collect();

    sort_per_cpu(&mut entries);
    Ok(entries)
}
