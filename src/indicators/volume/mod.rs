//! Volume average and ratio

use crate::common::math;
use crate::models::indicators::{Bar, VolumeIndicator};

pub const DEFAULT_VOLUME_PERIOD: u32 = 20;

/// Latest volume against its `period`-bar SMA (current bar included).
///
/// When the average is zero (feeds without volume) the ratio is 0.
pub fn calculate_volume(bars: &[Bar], period: u32) -> Option<VolumeIndicator> {
    let volumes: Vec<f64> = bars.iter().map(|b| b.volume).collect();
    let volume_ma = math::sma(&volumes, period as usize)?;
    let volume = *volumes.last()?;

    let ratio = if volume_ma > 0.0 {
        volume / volume_ma
    } else {
        0.0
    };

    Some(VolumeIndicator {
        volume,
        volume_ma,
        volume_ma_period: period,
        ratio,
    })
}
