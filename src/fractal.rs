//! Fractal detector
//!
//! Scans a fixed odd-width window of the history store for a confirmed
//! swing high or swing low a half-window behind the latest bar.

use crate::{BarHistory, FractalDirection};

/// Detects local price extremes over a symmetric bar window
///
/// The emitted direction latches: when the latest window confirms
/// neither a swing high nor a swing low, the previous direction is
/// retained unchanged. Stale latches are never cleared; callers that
/// care about freshness must track it themselves.
#[derive(Debug, Clone)]
pub struct FractalDetector {
    width: usize,
    direction: FractalDirection,
}

impl FractalDetector {
    /// Create a detector over a `width`-bar window
    ///
    /// `width` must already be normalized to an odd value >= 5
    /// (see `EngineConfig::fractal_width`).
    pub fn new(width: usize) -> Self {
        debug_assert!(width >= 5 && width % 2 == 1);
        FractalDetector {
            width,
            direction: FractalDirection::None,
        }
    }

    /// Re-scan the most recent window and return the latched direction
    pub fn update(&mut self, history: &BarHistory) -> FractalDirection {
        if history.len() < self.width {
            return self.direction;
        }

        let center = self.width / 2;
        let center_bar = match history.get(center) {
            Some(bar) => *bar,
            None => return self.direction,
        };

        let mut strictly_highest = true;
        let mut strictly_lowest = true;
        for offset in 0..self.width {
            if offset == center {
                continue;
            }
            let other = match history.get(offset) {
                Some(bar) => bar,
                None => return self.direction,
            };
            if other.high >= center_bar.high {
                strictly_highest = false;
            }
            if other.low <= center_bar.low {
                strictly_lowest = false;
            }
            if !strictly_highest && !strictly_lowest {
                break;
            }
        }

        if strictly_highest {
            self.direction = FractalDirection::Up;
        } else if strictly_lowest {
            self.direction = FractalDirection::Down;
        }
        self.direction
    }

    /// Last confirmed direction
    pub fn direction(&self) -> FractalDirection {
        self.direction
    }
}
