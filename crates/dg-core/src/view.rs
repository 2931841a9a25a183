//! Zoom and pan, and conversion between screen and model coordinates.
//!
//! `screen = (model + pan) × zoom`, so `model = screen / zoom − pan`.

use kurbo::{Affine, Point, Vec2};
use serde::Serialize;

pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 3.0;
/// Factor applied by the zoom-in / zoom-out buttons.
pub const ZOOM_STEP: f64 = 1.2;
/// Wheel zoom uses its own factors (0.9 out, 1.1 in), not `ZOOM_STEP`.
pub const WHEEL_ZOOM_OUT: f64 = 0.9;
pub const WHEEL_ZOOM_IN: f64 = 1.1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewTransform {
    zoom: f64,
    pan: Vec2,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan: Vec2::ZERO,
        }
    }
}

impl ViewTransform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn pan(&self) -> Vec2 {
        self.pan
    }

    /// Multiply the zoom by `factor`, clamped to `[MIN_ZOOM, MAX_ZOOM]`.
    /// Returns `true` if the zoom changed.
    pub fn zoom_by(&mut self, factor: f64) -> bool {
        if !factor.is_finite() {
            return false;
        }
        let zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        let changed = zoom != self.zoom;
        self.zoom = zoom;
        changed
    }

    pub fn zoom_in_step(&mut self) -> bool {
        self.zoom_by(ZOOM_STEP)
    }

    pub fn zoom_out_step(&mut self) -> bool {
        self.zoom_by(1.0 / ZOOM_STEP)
    }

    /// Scrolling down (`delta_y > 0`) zooms out.
    pub fn wheel_zoom(&mut self, delta_y: f64) -> bool {
        self.zoom_by(if delta_y > 0.0 {
            WHEEL_ZOOM_OUT
        } else {
            WHEEL_ZOOM_IN
        })
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        self.pan += delta;
    }

    /// Back to zoom 1 and no pan. Returns `true` if anything changed.
    pub fn reset(&mut self) -> bool {
        let changed = *self != Self::default();
        *self = Self::default();
        changed
    }

    pub fn screen_to_model(&self, screen: Point) -> Point {
        Point::new(screen.x / self.zoom, screen.y / self.zoom) - self.pan
    }

    pub fn model_to_screen(&self, model: Point) -> Point {
        let shifted = model + self.pan;
        Point::new(shifted.x * self.zoom, shifted.y * self.zoom)
    }

    /// The model → screen transform, for renderers that apply it wholesale.
    pub fn affine(&self) -> Affine {
        Affine::scale(self.zoom) * Affine::translate(self.pan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn button_steps_use_1_2() {
        let mut view = ViewTransform::new();
        view.zoom_in_step();
        assert!(approx(view.zoom(), 1.2));
        view.zoom_out_step();
        assert!(approx(view.zoom(), 1.0));
    }

    #[test]
    fn wheel_uses_its_own_factors() {
        let mut view = ViewTransform::new();
        view.wheel_zoom(120.0);
        assert!(approx(view.zoom(), 0.9));
        view.reset();
        view.wheel_zoom(-120.0);
        assert!(approx(view.zoom(), 1.1));
    }

    #[test]
    fn zoom_clamps_at_both_ends() {
        let mut view = ViewTransform::new();
        for _ in 0..100 {
            view.wheel_zoom(120.0);
        }
        assert!(approx(view.zoom(), MIN_ZOOM));
        assert!(!view.wheel_zoom(120.0), "clamped zoom must not keep shrinking");

        for _ in 0..100 {
            view.zoom_in_step();
        }
        assert!(approx(view.zoom(), MAX_ZOOM));
    }

    #[test]
    fn non_finite_factor_leaves_zoom_alone() {
        let mut view = ViewTransform::new();
        view.zoom_in_step();
        for factor in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(!view.zoom_by(factor));
            assert!(approx(view.zoom(), 1.2));
        }
        let p = view.screen_to_model(Point::new(120.0, 120.0));
        assert!(p.x.is_finite() && p.y.is_finite());
    }

    #[test]
    fn zoom_stays_in_range_for_mixed_sequences() {
        let mut view = ViewTransform::new();
        for i in 0..500 {
            match i % 7 {
                0 | 3 => view.zoom_in_step(),
                1 => view.wheel_zoom(-1.0),
                2 | 5 => view.wheel_zoom(3.0),
                4 => view.zoom_out_step(),
                _ => view.reset(),
            };
            assert!((MIN_ZOOM..=MAX_ZOOM).contains(&view.zoom()));
        }
    }

    #[test]
    fn screen_model_conversion() {
        let mut view = ViewTransform::new();
        view.zoom_by(2.0);
        view.pan_by(Vec2::new(10.0, -5.0));
        let model = view.screen_to_model(Point::new(100.0, 100.0));
        assert_eq!(model, Point::new(40.0, 55.0));
        assert_eq!(view.model_to_screen(model), Point::new(100.0, 100.0));
        assert_eq!(view.affine() * model, Point::new(100.0, 100.0));
    }

    #[test]
    fn reset_restores_identity() {
        let mut view = ViewTransform::new();
        assert!(!view.reset());
        view.zoom_by(1.5);
        view.pan_by(Vec2::new(3.0, 4.0));
        assert!(view.reset());
        assert_eq!(view, ViewTransform::default());
    }
}
