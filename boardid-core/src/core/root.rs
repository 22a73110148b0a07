//! Root directory under which every system file is looked up.

use std::path::{Component, Path, PathBuf};

/// A root prefix prepended to every path a strategy opens.
///
/// On a real board this is `/`. Tests point it at a temporary directory that
/// holds fake `/proc` and `/sys` files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemRoot {
    prefix: PathBuf,
}

impl SystemRoot {
    /// The root of the running system.
    pub fn host() -> Self {
        Self {
            prefix: PathBuf::from("/"),
        }
    }

    /// Uses `prefix` in place of `/`.
    pub fn new<P: AsRef<Path>>(prefix: P) -> Self {
        Self {
            prefix: prefix.as_ref().to_path_buf(),
        }
    }

    /// Returns `true` when paths resolve against the real filesystem root.
    #[must_use]
    pub fn is_host(&self) -> bool {
        self.prefix == Path::new("/")
    }

    /// Maps `path` below the prefix. Absolute and relative paths are both
    /// treated as relative to the prefix, and `..` components are dropped so
    /// the result never leaves it.
    pub fn resolve<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        let relative: PathBuf = path
            .as_ref()
            .components()
            .filter(|c| matches!(c, Component::Normal(_)))
            .collect();
        self.prefix.join(relative)
    }
}

impl Default for SystemRoot {
    fn default() -> Self {
        Self::host()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_root_keeps_absolute_paths() {
        let root = SystemRoot::host();
        assert!(root.is_host());
        assert_eq!(root.resolve("/proc/cpuinfo"), PathBuf::from("/proc/cpuinfo"));
    }

    #[test]
    fn test_prefix_is_prepended() {
        let root = SystemRoot::new("/tmp/fake");
        assert!(!root.is_host());
        assert_eq!(
            root.resolve("/sys/class/net/eth0/address"),
            PathBuf::from("/tmp/fake/sys/class/net/eth0/address")
        );
        assert_eq!(root.resolve("uboot.env"), PathBuf::from("/tmp/fake/uboot.env"));
        assert_eq!(root.resolve("../../etc/x"), PathBuf::from("/tmp/fake/etc/x"));
        assert_eq!(root.resolve("/dev/../../mtd2"), PathBuf::from("/tmp/fake/dev/mtd2"));
    }
}
