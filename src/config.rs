use crate::surface::Rgb;

/// Pacing of the show. The defaults are the tuned values; nothing else
/// adjusts them at runtime.
#[derive(Debug, Clone, PartialEq)]
pub struct SchedulerConfig {
    /// Frames between autolaunch batches.
    pub autolaunch_period: u32,
    /// Frames between pointer launches while the pointer is held.
    pub throttle_period: u32,
    /// Alpha of the erase pass that leaves fading streaks behind.
    pub fade_alpha: f32,
    /// Surfaces this wide or narrower get the small batch.
    pub narrow_max_width: f32,
    /// Autolaunch targets are picked above this fraction of the height.
    pub target_ceiling: f32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            autolaunch_period: 150,
            throttle_period: 5,
            fade_alpha: 0.5,
            narrow_max_width: 500.0,
            target_ceiling: 4.0 / 5.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DisplayConfig {
    /// Logical pixels per raster pixel. One terminal cell holds two raster
    /// pixels stacked vertically.
    pub cell_scale: f32,
    pub background: Rgb,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            cell_scale: 4.0,
            background: Rgb(0, 0, 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{explosion, projectile, spark};
    use pretty_assertions::assert_eq;

    #[test]
    fn published_defaults() {
        let pacing = SchedulerConfig::default();
        assert_eq!(pacing.autolaunch_period, 150);
        assert_eq!(pacing.throttle_period, 5);
        assert_eq!(pacing.fade_alpha, 0.5);
        assert_eq!(pacing.narrow_max_width, 500.0);
        assert_eq!(pacing.target_ceiling, 0.8);

        let display = DisplayConfig::default();
        assert_eq!(display.cell_scale, 4.0);
        assert_eq!(display.background, Rgb(0, 0, 0));
    }

    #[test]
    fn entity_constants_match_tuning() {
        assert_eq!(projectile::TRAIL_LEN, 3);
        assert_eq!(projectile::LAUNCH_SPEED, 0.7);
        assert_eq!(projectile::ACCELERATION, 1.01);

        assert_eq!(spark::TRAIL_LEN, 5);
        assert_eq!(spark::FRICTION, 0.9);
        assert_eq!(spark::GRAVITY, 0.8);
        assert_eq!(spark::INITIAL_ALPHA, 1.2);
        assert_eq!(spark::HUE_SPREAD, 40.0);

        assert_eq!(explosion::SPARKS_PER_BURST, 65);
    }
}
