use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::tracking;
use crate::vision::{BinaryMask, Point, min_enclosing_circle};

/// Tuning of the jump hysteresis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerParams {
    /// Fewer "on" pixels than this means no detection
    pub min_count: usize,
    /// Moves up to this many pixels are adopted immediately
    pub distance_threshold: f64,
    /// Consecutive qualifying far frames needed to commit a jump
    pub stable_threshold: u32,
    /// A far frame qualifies when its pixel count exceeds this multiple of the committed count
    pub growth_ratio: f64,
    /// Cap for the reported marker radius
    pub max_radius: u32,
}

impl Default for TrackerParams {
    fn default() -> Self {
        Self {
            min_count: tracking::MIN_PIXEL_COUNT,
            distance_threshold: tracking::DISTANCE_THRESHOLD_PX,
            stable_threshold: tracking::STABLE_THRESHOLD,
            growth_ratio: tracking::GROWTH_RATIO,
            max_radius: tracking::MAX_RADIUS_PX,
        }
    }
}

/// Current estimate of a marker's position
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TrackedTarget {
    /// `None` when the marker is not detected
    pub center: Option<Point>,
    pub radius: u32,
    pub pixel_count: usize,
    pub stability_streak: u32,
}

impl TrackedTarget {
    pub fn is_resolved(&self) -> bool {
        self.center.is_some()
    }
}

/// What the last update did with the observed position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackOutcome {
    /// Too few pixels; target cleared
    Cleared,
    /// First detection after a clear
    Initial,
    /// Within the distance threshold
    Followed,
    /// Far jump with enough pixel mass, not yet corroborated
    Pending,
    /// Far jump corroborated for enough frames
    Jumped,
    /// Far jump without enough pixel mass
    Rejected,
}

#[derive(Debug, Clone, Copy)]
struct Committed {
    center: Point,
    count: usize,
}

/// Hysteresis-smoothed tracker for one marker
///
/// - A mask with fewer than `min_count` pixels clears the target.
/// - With no committed center, the new center is adopted with streak 1.
/// - A move within `distance_threshold` is adopted and the streak reset.
/// - A far move whose pixel count exceeds `growth_ratio` times the committed
///   count increments the streak; at `stable_threshold` the jump is committed
///   and the streak reset.
/// - Any other far move is rejected and the streak reset.
///
/// While a jump is pending or rejected the committed center is reported with
/// a radius derived from the committed pixel count.
#[derive(Debug, Clone)]
pub struct TargetTracker {
    name: &'static str,
    params: TrackerParams,
    committed: Option<Committed>,
    streak: u32,
    last: TrackedTarget,
    last_outcome: Option<TrackOutcome>,
}

impl TargetTracker {
    pub fn new(name: &'static str, params: TrackerParams) -> Self {
        Self {
            name,
            params,
            committed: None,
            streak: 0,
            last: TrackedTarget::default(),
            last_outcome: None,
        }
    }

    pub fn params(&self) -> &TrackerParams {
        &self.params
    }

    pub fn current(&self) -> TrackedTarget {
        self.last
    }

    pub fn last_outcome(&self) -> Option<TrackOutcome> {
        self.last_outcome
    }

    /// Forget the committed position
    pub fn reset(&mut self) {
        self.committed = None;
        self.streak = 0;
        self.last = TrackedTarget::default();
        self.last_outcome = None;
    }

    /// Feed one detection mask and return the new estimate
    pub fn update(&mut self, mask: &BinaryMask) -> TrackedTarget {
        let count = mask.count();
        let circle = if count < self.params.min_count {
            None
        } else {
            min_enclosing_circle(&mask.points())
        };
        let Some(circle) = circle else {
            return self.finish(TrackOutcome::Cleared, TrackedTarget {
                pixel_count: count,
                ..Default::default()
            });
        };

        let center = circle.center();
        let radius = (circle.radius as u32).min(self.params.max_radius);
        let observed = TrackedTarget {
            center: Some(center),
            radius,
            pixel_count: count,
            stability_streak: 0,
        };

        let Some(committed) = self.committed else {
            self.committed = Some(Committed { center, count });
            self.streak = 1;
            info!(
                tag = "MINIMAP",
                "{}: initial detection at ({}, {}) with {} pixels", self.name, center.x, center.y, count
            );
            return self.finish(TrackOutcome::Initial, TrackedTarget {
                stability_streak: 1,
                ..observed
            });
        };

        if center.distance(&committed.center) <= self.params.distance_threshold {
            self.committed = Some(Committed { center, count });
            self.streak = 0;
            return self.finish(TrackOutcome::Followed, observed);
        }

        if count as f64 > self.params.growth_ratio * committed.count as f64 {
            self.streak += 1;
            if self.streak >= self.params.stable_threshold {
                self.committed = Some(Committed { center, count });
                self.streak = 0;
                info!(
                    tag = "MINIMAP",
                    "{}: tracked center moved to ({}, {}) with {} pixels", self.name, center.x, center.y, count
                );
                return self.finish(TrackOutcome::Jumped, observed);
            }
            debug!(
                tag = "MINIMAP",
                "{}: jump to ({}, {}) pending, streak {}", self.name, center.x, center.y, self.streak
            );
            let held = self.held(committed);
            return self.finish(TrackOutcome::Pending, held);
        }

        self.streak = 0;
        debug!(
            tag = "MINIMAP",
            "{}: rejected jump to ({}, {}) with {} pixels", self.name, center.x, center.y, count
        );
        let held = self.held(committed);
        self.finish(TrackOutcome::Rejected, held)
    }

    fn held(&self, committed: Committed) -> TrackedTarget {
        TrackedTarget {
            center: Some(committed.center),
            radius: (committed.count / 10) as u32,
            pixel_count: committed.count,
            stability_streak: self.streak,
        }
    }

    fn finish(&mut self, outcome: TrackOutcome, target: TrackedTarget) -> TrackedTarget {
        if outcome == TrackOutcome::Cleared {
            self.committed = None;
            self.streak = 0;
        }
        self.last = target;
        self.last_outcome = Some(outcome);
        target
    }
}
