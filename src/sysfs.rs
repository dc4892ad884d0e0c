//! Paths and tolerant scalar reads for the sysfs CPU tree.
//!
//! Which files exist depends on the vendor, the kernel and the scaling
//! driver, so every read returns `Option` and never an error.

use std::{
    fs,
    path::{Path, PathBuf},
};

pub const DEFAULT_CPU_BASE: &str = "/sys/devices/system/cpu";
pub const DEFAULT_CPUINFO: &str = "/proc/cpuinfo";

/// Where the CPU tree, the frequency policy and the cpuinfo text live.
///
/// # Examples
///
/// ```
/// use cpu_rank::SysfsLayout;
/// use std::path::Path;
///
/// let layout = SysfsLayout::with_root("/tmp/fake-cpu");
/// assert_eq!(layout.cpu_dir(3), Path::new("/tmp/fake-cpu/cpu3"));
/// assert_eq!(layout.policy_base(), Path::new("/tmp/fake-cpu/cpufreq/policy0"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SysfsLayout {
    cpu_base: PathBuf,
    policy_base: PathBuf,
    cpuinfo: PathBuf,
}

impl Default for SysfsLayout {
    fn default() -> Self {
        Self::with_root(DEFAULT_CPU_BASE)
    }
}

impl SysfsLayout {
    /// Uses `cpu_base` in place of `/sys/devices/system/cpu`. The policy
    /// directory becomes `<cpu_base>/cpufreq/policy0`.
    pub fn with_root(cpu_base: impl Into<PathBuf>) -> Self {
        let cpu_base = cpu_base.into();
        let policy_base = cpu_base.join("cpufreq").join("policy0");
        Self {
            cpu_base,
            policy_base,
            cpuinfo: PathBuf::from(DEFAULT_CPUINFO),
        }
    }

    pub fn with_cpuinfo(mut self, cpuinfo: impl Into<PathBuf>) -> Self {
        self.cpuinfo = cpuinfo.into();
        self
    }

    pub fn cpu_base(&self) -> &Path {
        &self.cpu_base
    }

    pub fn policy_base(&self) -> &Path {
        &self.policy_base
    }

    pub fn cpuinfo(&self) -> &Path {
        &self.cpuinfo
    }

    /// `cpu<N>` directory for a logical CPU.
    pub fn cpu_dir(&self, cpu: u32) -> PathBuf {
        self.cpu_base.join(format!("cpu{cpu}"))
    }
}

/// Reads a whole file as text. `None` if it is missing or unreadable.
pub fn read_str(path: &Path) -> Option<String> {
    fs::read_to_string(path).ok()
}

/// Reads a base-10 integer, ignoring surrounding whitespace.
///
/// `None` if the file is missing, unreadable, or does not hold an integer.
pub fn read_int(path: &Path) -> Option<i64> {
    read_str(path).and_then(|s| s.trim().parse::<i64>().ok())
}

#[cfg(test)]
mod tests {
    use {super::*, tempfile::TempDir};

    #[test]
    fn test_default_layout() {
        let layout = SysfsLayout::default();
        assert_eq!(layout.cpu_base(), Path::new("/sys/devices/system/cpu"));
        assert_eq!(
            layout.policy_base(),
            Path::new("/sys/devices/system/cpu/cpufreq/policy0")
        );
        assert_eq!(layout.cpuinfo(), Path::new("/proc/cpuinfo"));
    }

    #[test]
    fn test_with_cpuinfo() {
        let layout = SysfsLayout::with_root("/x").with_cpuinfo("/y/cpuinfo");
        assert_eq!(layout.cpuinfo(), Path::new("/y/cpuinfo"));
        assert_eq!(layout.cpu_base(), Path::new("/x"));
    }

    #[test]
    fn test_read_int_trims_whitespace() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("value");
        fs::write(&path, " 3600000\n").unwrap();
        assert_eq!(read_int(&path), Some(3_600_000));
    }

    #[test]
    fn test_read_int_malformed_is_absent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("value");
        fs::write(&path, "fast\n").unwrap();
        assert_eq!(read_int(&path), None);
        assert_eq!(read_str(&path).as_deref(), Some("fast\n"));

        fs::write(&path, "").unwrap();
        assert_eq!(read_int(&path), None);
    }

    #[test]
    fn test_missing_file_is_absent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing");
        assert_eq!(read_str(&path), None);
        assert_eq!(read_int(&path), None);
    }

    #[test]
    fn test_directory_is_absent() {
        let dir = TempDir::new().unwrap();
        assert_eq!(read_str(dir.path()), None);
    }
}
