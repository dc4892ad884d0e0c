//! Error types for CPU discovery.
//!
//! Missing or malformed per-CPU files never surface here; they degrade to
//! defaults at the read site. Only failing to learn the CPU set is fatal.

use {
    std::{io, path::PathBuf},
    thiserror::Error,
};

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum CpuRankError {
    /// The CPU base directory could not be listed
    #[error("cannot enumerate CPUs under {}: {source}", .path.display())]
    Enumeration {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The CPU base directory holds no `cpu<N>` entry
    #[error("no cpu<N> entries found under {}", .path.display())]
    NoCpus { path: PathBuf },
}
