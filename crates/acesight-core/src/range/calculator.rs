use serde::Serialize;

use crate::config::MapConfig;
use crate::vision::Point;

/// Distance between the player and ping markers
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RangeMeasurement {
    pub pixel_distance: f64,
    /// Meters per pixel
    pub conversion_factor: f64,
    pub range_m: f64,
}

/// Converts minimap pixel distances using one map calibration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeCalculator {
    conversion_factor: f64,
}

impl RangeCalculator {
    pub fn new(config: &MapConfig) -> Self {
        Self {
            conversion_factor: config.conversion_factor(),
        }
    }

    /// Calculator for a cell size that differs from the stored calibration
    pub fn from_cell(grid_cell_period_px: u32, cell_size_m: f64) -> Self {
        Self {
            conversion_factor: cell_size_m / grid_cell_period_px as f64,
        }
    }

    pub fn conversion_factor(&self) -> f64 {
        self.conversion_factor
    }

    pub fn measure(&self, from: Point, to: Point) -> RangeMeasurement {
        self.measure_pixels(from.distance(&to))
    }

    pub fn measure_pixels(&self, pixel_distance: f64) -> RangeMeasurement {
        RangeMeasurement {
            pixel_distance,
            conversion_factor: self.conversion_factor,
            range_m: pixel_distance * self.conversion_factor,
        }
    }
}

/// Range between two markers, if both are resolved and a map is active
pub fn compute_range(
    player: Option<Point>,
    ping: Option<Point>,
    calculator: Option<&RangeCalculator>,
) -> Option<RangeMeasurement> {
    Some(calculator?.measure(player?, ping?))
}
