//! Pointer position state and animated travel

use std::sync::Arc;
use std::time::Duration;

use pagepilot_dom_port::Point;
use tokio::time::sleep;
use tracing::debug;

/// Rendering seam for the pointer glyph. The engine reports every animation
/// frame and click pulse; the presentation layer draws them.
pub trait PointerSink: Send + Sync {
    /// The pointer is at `point` (one frame of travel, or a jump).
    fn position(&self, point: Point);

    /// Play the click-affordance pulse for `duration`.
    fn pulse(&self, duration: Duration);
}

/// Discards all pointer rendering. Default when no presentation layer is
/// attached.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullPointerSink;

impl PointerSink for NullPointerSink {
    fn position(&self, _point: Point) {}
    fn pulse(&self, _duration: Duration) {}
}

const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Owns the believed pointer position.
///
/// The position commits only after a move completes; callers that measure
/// geometry after `move_to` returns see post-travel state. There are no
/// failure modes here, movement is purely presentational.
pub(crate) struct PointerController {
    position: Point,
    travel: Duration,
    sink: Arc<dyn PointerSink>,
}

impl PointerController {
    pub fn new(travel: Duration, sink: Arc<dyn PointerSink>) -> Self {
        Self {
            position: Point::default(),
            travel,
            sink,
        }
    }

    pub fn position(&self) -> Point {
        self.position
    }

    /// Move to `target`. Animated moves interpolate with an ease-in-out
    /// curve and suspend the caller until the final frame has played;
    /// non-animated moves commit immediately.
    pub async fn move_to(&mut self, target: Point, animate: bool) {
        if !animate || self.travel.is_zero() {
            self.position = target;
            self.sink.position(target);
            return;
        }

        let start = self.position;
        let frames = (self.travel.as_millis() / FRAME_INTERVAL.as_millis()).max(1) as u32;
        debug!(
            from_x = start.x,
            from_y = start.y,
            to_x = target.x,
            to_y = target.y,
            frames = frames,
            "animating pointer travel"
        );

        for frame in 1..=frames {
            sleep(FRAME_INTERVAL).await;
            let progress = ease_in_out(f64::from(frame) / f64::from(frames));
            self.sink.position(Point {
                x: start.x + (target.x - start.x) * progress,
                y: start.y + (target.y - start.y) * progress,
            });
        }

        self.position = target;
    }

    /// Play the click pulse and wait for it to finish.
    pub async fn pulse(&self, duration: Duration) {
        self.sink.pulse(duration);
        sleep(duration).await;
    }
}

/// Symmetric ease matching a CSS `ease-in-out` feel.
fn ease_in_out(t: f64) -> f64 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}
