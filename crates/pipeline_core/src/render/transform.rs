//! Pan/zoom state applied by the host to the `zoom-pan-group` element.
//!
//! A point `p` in diagram space is shown at `translate + scale * p`.

const WHEEL_ZOOM_OUT: f64 = 0.9;
const WHEEL_ZOOM_IN: f64 = 1.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub scale: f64,
    pub x: f64,
    pub y: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            x: 0.0,
            y: 0.0,
        }
    }
}

impl ViewTransform {
    /// Scales by `factor` keeping `point` (view space) fixed.
    ///
    /// Non-positive or non-finite factors are ignored.
    pub fn zoom_at(&mut self, factor: f64, point: (f64, f64)) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        self.scale *= factor;
        self.x = point.0 + (self.x - point.0) * factor;
        self.y = point.1 + (self.y - point.1) * factor;
    }

    /// Wheel step: scrolling down zooms out, up zooms in.
    pub fn wheel_zoom(&mut self, delta_y: f64, point: (f64, f64)) {
        if delta_y > 0.0 {
            self.zoom_at(WHEEL_ZOOM_OUT, point);
        } else if delta_y < 0.0 {
            self.zoom_at(WHEEL_ZOOM_IN, point);
        }
    }

    /// Two-finger gesture: scale by the finger distance ratio, then follow
    /// the moved midpoint.
    pub fn pinch(&mut self, previous_distance: f64, distance: f64, midpoint_shift: (f64, f64)) {
        if previous_distance > 0.0 && distance.is_finite() {
            let factor = distance / previous_distance;
            if factor.is_finite() && factor > 0.0 {
                self.scale *= factor;
            }
        }
        self.pan(midpoint_shift.0, midpoint_shift.1);
    }

    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }

    /// Maps a diagram point to view space.
    pub fn apply(&self, point: (f64, f64)) -> (f64, f64) {
        (
            self.x + self.scale * point.0,
            self.y + self.scale * point.1,
        )
    }

    pub fn to_svg_attribute(&self) -> String {
        format!("translate({}, {}) scale({})", self.x, self.y, self.scale)
    }
}
