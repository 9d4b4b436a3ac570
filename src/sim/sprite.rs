//! Frame-timer animation state machine
//!
//! Every visible entity embeds an [`AnimationState`]: a single counter
//! cycling through `[min_frame, max_frame]`, advanced one step each time
//! the accumulated timer exceeds the frame interval.

use serde::{Deserialize, Serialize};

use crate::render::Rect;

/// Animation counter plus the timer that paces it.
///
/// Invariant: `min_frame <= current_frame <= max_frame`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimationState {
    pub current_frame: u32,
    pub min_frame: u32,
    pub max_frame: u32,
    pub frames_per_row: u32,
    pub frame_timer_ms: f64,
    pub frame_interval_ms: f64,
}

impl AnimationState {
    pub fn new(min_frame: u32, max_frame: u32, frames_per_row: u32, frame_interval_ms: f64) -> Self {
        debug_assert!(min_frame <= max_frame);
        debug_assert!(frames_per_row > 0);
        Self {
            current_frame: min_frame,
            min_frame,
            max_frame,
            frames_per_row,
            frame_timer_ms: 0.0,
            frame_interval_ms,
        }
    }

    /// Accumulate `dt_ms`, stepping the frame (wrapping to `min_frame`
    /// past `max_frame`) once the timer exceeds the interval, then
    /// resetting the timer. An interval of 0 advances on every call.
    pub fn advance(&mut self, dt_ms: f64) {
        self.frame_timer_ms += dt_ms;
        if self.frame_timer_ms > self.frame_interval_ms {
            self.current_frame = if self.current_frame < self.max_frame {
                self.current_frame + 1
            } else {
                self.min_frame
            };
            self.frame_timer_ms = 0.0;
        }
    }

    /// Column of the current frame on its sheet
    #[inline]
    pub fn frame_x(&self) -> u32 {
        self.current_frame % self.frames_per_row
    }

    /// Row of the current frame on its sheet
    #[inline]
    pub fn frame_y(&self) -> u32 {
        self.current_frame / self.frames_per_row
    }

    /// Source rectangle on a sheet whose cells are `frame_w` x `frame_h`.
    pub fn src_rect(&self, frame_w: f32, frame_h: f32) -> Rect {
        Rect::new(
            self.frame_x() as f32 * frame_w,
            self.frame_y() as f32 * frame_h,
            frame_w,
            frame_h,
        )
    }
}
