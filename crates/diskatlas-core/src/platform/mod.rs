/// Platform-specific functionality: volume statistics used to turn
/// scanned bytes into a progress percentage.
pub mod volume;

pub use volume::{estimate_total_bytes, progress_percent, volume_capacity, VolumeCapacity};
