use serde::Serialize;

use crate::config::MapConfig;

/// Positions of the grid lines along one axis
///
/// Lines sit at `n * period + offset` for every `n` from
/// `floor(-offset / period)` to `ceil((size - offset) / period)`, so the
/// first and last line may lie just outside `0..=size`.
pub fn grid_lines(size: u32, period: u32, offset: i32) -> Vec<i32> {
    if period == 0 {
        return Vec::new();
    }
    let period = period as i64;
    let offset = offset as i64;
    let n_min = (-offset).div_euclid(period);
    let n_max = -((offset - size as i64).div_euclid(period));
    (n_min..=n_max)
        .map(|n| (n * period + offset) as i32)
        .collect()
}

/// Vertical and horizontal grid lines across a region
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridLines {
    pub xs: Vec<i32>,
    pub ys: Vec<i32>,
}

impl GridLines {
    pub fn new(width: u32, height: u32, period: u32, offset: (i32, i32)) -> Self {
        Self {
            xs: grid_lines(width, period, offset.0),
            ys: grid_lines(height, period, offset.1),
        }
    }

    pub fn for_map(width: u32, height: u32, config: &MapConfig) -> Self {
        Self::new(width, height, config.grid_cell_period_px, config.grid_offset)
    }
}
