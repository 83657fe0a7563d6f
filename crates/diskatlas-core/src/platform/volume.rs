/// Volume capacity lookup.
///
/// Only used to estimate a denominator for progress percentages; nothing
/// here affects what a scan produces.
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Size of the file system holding a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolumeCapacity {
    pub total_bytes: u64,
    pub free_bytes: u64,
}

impl VolumeCapacity {
    pub fn used_bytes(&self) -> u64 {
        self.total_bytes.saturating_sub(self.free_bytes)
    }

    /// Usage percentage (0.0–100.0).
    pub fn usage_percent(&self) -> f32 {
        if self.total_bytes == 0 {
            return 0.0;
        }
        (self.used_bytes() as f64 / self.total_bytes as f64 * 100.0) as f32
    }
}

/// Capacity of the volume containing `path`, or `None` if it cannot be
/// determined on this platform.
#[cfg(unix)]
pub fn volume_capacity(path: &Path) -> Option<VolumeCapacity> {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let c_path = CString::new(path.as_os_str().as_bytes()).ok()?;
    // SAFETY: `statvfs` is plain old data, and the pointer passed to
    // `libc::statvfs` refers to a live, NUL-terminated string.
    let mut stats: libc::statvfs = unsafe { std::mem::zeroed() };
    let rc = unsafe { libc::statvfs(c_path.as_ptr(), &mut stats) };
    if rc != 0 {
        return None;
    }

    let block = stats.f_frsize as u128;
    Some(VolumeCapacity {
        total_bytes: (stats.f_blocks as u128 * block).min(u64::MAX as u128) as u64,
        free_bytes: (stats.f_bavail as u128 * block).min(u64::MAX as u128) as u64,
    })
}

#[cfg(not(unix))]
pub fn volume_capacity(_path: &Path) -> Option<VolumeCapacity> {
    None
}

/// Sum of the capacities of the volumes holding `roots`, counting each
/// volume once. `None` when no capacity could be read at all.
pub fn estimate_total_bytes(roots: &[PathBuf]) -> Option<u64> {
    let mut seen = HashSet::new();
    let mut total: u64 = 0;
    let mut any = false;

    for root in roots {
        if !seen.insert(volume_key(root)) {
            continue;
        }
        match volume_capacity(root) {
            Some(cap) if cap.total_bytes > 0 => {
                total = total.saturating_add(cap.total_bytes);
                any = true;
            }
            _ => warn!(path = %root.display(), "Volume size unavailable, progress will be approximate"),
        }
    }

    any.then_some(total)
}

/// Scanned bytes as a percentage of `total`, clamped to `0..=100`.
/// A zero total yields 0.
pub fn progress_percent(bytes_scanned: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (bytes_scanned as f64 / total as f64 * 100.0).clamp(0.0, 100.0)
}

/// Identity of the volume holding `path`: the device id where the platform
/// exposes one, otherwise the path itself.
#[cfg(unix)]
fn volume_key(path: &Path) -> VolumeKey {
    use std::os::unix::fs::MetadataExt;
    match std::fs::metadata(path) {
        Ok(meta) => VolumeKey::Device(meta.dev()),
        Err(_) => VolumeKey::Path(path.to_path_buf()),
    }
}

#[cfg(not(unix))]
fn volume_key(path: &Path) -> VolumeKey {
    VolumeKey::Path(path.to_path_buf())
}

#[derive(Debug, PartialEq, Eq, Hash)]
enum VolumeKey {
    #[cfg_attr(not(unix), allow(dead_code))]
    Device(u64),
    Path(PathBuf),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_is_clamped() {
        assert_eq!(progress_percent(50, 200), 25.0);
        assert_eq!(progress_percent(500, 200), 100.0);
        assert_eq!(progress_percent(10, 0), 0.0);
    }

    #[test]
    fn usage_of_an_empty_volume_is_zero() {
        let cap = VolumeCapacity {
            total_bytes: 0,
            free_bytes: 0,
        };
        assert_eq!(cap.usage_percent(), 0.0);
        let cap = VolumeCapacity {
            total_bytes: 100,
            free_bytes: 25,
        };
        assert_eq!(cap.used_bytes(), 75);
        assert_eq!(cap.usage_percent(), 75.0);
    }

    #[cfg(unix)]
    #[test]
    fn same_volume_is_counted_once() {
        let dir = std::env::temp_dir();
        let single = estimate_total_bytes(&[dir.clone()]);
        let twice = estimate_total_bytes(&[dir.clone(), dir]);
        assert!(single.is_some());
        assert_eq!(single, twice);
    }

    #[test]
    fn missing_paths_give_no_estimate() {
        assert_eq!(
            estimate_total_bytes(&[PathBuf::from("/definitely/not/a/real/path/xyz")]),
            None
        );
    }
}
