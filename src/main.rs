//! cpu-rank: print the cores of this machine, fastest first.
//!
//! With no arguments, prints the host summary and one row per physical core.
//! `--per-cpu` switches to one row per logical CPU followed by an affinity
//! list; `--affinity` prints only that list, e.g. for `taskset -c`.

use std::{env, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cpu_rank::{HostInfo, SysfsLayout, linux, report};

#[derive(Parser, Debug)]
#[command(name = "cpu-rank", version, about = "Rank CPU cores by performance from sysfs")]
struct Cli {
    /// CPU base directory to read instead of /sys/devices/system/cpu
    #[arg(long, env = "CPU_RANK_SYSFS", value_name = "DIR")]
    sysfs: Option<PathBuf>,

    /// cpuinfo file to read instead of /proc/cpuinfo
    #[arg(long, env = "CPU_RANK_CPUINFO", value_name = "FILE")]
    cpuinfo: Option<PathBuf>,

    /// One row per logical CPU, physical threads before SMT threads
    #[arg(long)]
    per_cpu: bool,

    /// Add a Performance/Efficiency column (implies --per-cpu)
    #[arg(long)]
    tiers: bool,

    /// Print only the comma-separated CPU list (implies --per-cpu)
    #[arg(long)]
    affinity: bool,
}

impl Cli {
    fn layout(&self) -> SysfsLayout {
        let layout = match &self.sysfs {
            Some(root) => SysfsLayout::with_root(root),
            None => SysfsLayout::default(),
        };
        match &self.cpuinfo {
            Some(cpuinfo) => layout.with_cpuinfo(cpuinfo),
            None => layout,
        }
    }
}

/// Logs go to stderr, filtered by CPU_RANK_LOG or RUST_LOG (default `warn`).
fn init_tracing() {
    let filter = env::var("CPU_RANK_LOG")
        .or_else(|_| env::var("RUST_LOG"))
        .unwrap_or_else(|_| "warn".into());
    let env_filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let layout = cli.layout();
    tracing::debug!(?layout, "starting");

    if cli.affinity {
        let entries = linux::ranked_cpus(&layout).context("failed to read CPU topology")?;
        println!("{}", report::affinity_list(&entries));
        return Ok(());
    }

    let host = HostInfo::detect(&layout);

    if cli.per_cpu || cli.tiers {
        let entries = linux::ranked_cpus(&layout).context("failed to read CPU topology")?;
        print!("{}", report::cpu_report(&host, &entries, cli.tiers));
    } else {
        let cores = linux::ranked_cores(&layout).context("failed to read CPU topology")?;
        println!("{}", report::core_report(&host, &cores));
    }

    Ok(())
}
