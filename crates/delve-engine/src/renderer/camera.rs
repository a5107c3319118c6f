use glam::Vec2;

use crate::core::geom::Rect;

/// Follow camera in world pixels. Y grows downward, matching the tile grid.
#[derive(Debug, Clone)]
pub struct Camera2D {
    /// Visible width in world units.
    pub width: f32,
    /// Visible height in world units.
    pub height: f32,
    /// Camera center position in world space.
    pub center: Vec2,
    /// Optional clamp region for the visible area.
    pub bounds: Option<Rect>,
    /// Fraction of the remaining distance kept per 60 Hz frame
    /// (0.0 = instant snap, 0.9 = closes 10% per frame).
    pub smoothing: f32,
}

impl Camera2D {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            center: Vec2::ZERO,
            bounds: None,
            smoothing: 0.0,
        }
    }

    pub fn with_smoothing(mut self, smoothing: f32) -> Self {
        self.set_smoothing(smoothing);
        self
    }

    pub fn set_smoothing(&mut self, smoothing: f32) {
        self.smoothing = smoothing.clamp(0.0, 0.99);
    }

    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = Some(bounds);
        self.clamp_to_bounds();
    }

    pub fn clear_bounds(&mut self) {
        self.bounds = None;
    }

    /// Snap to `target`, respecting bounds.
    pub fn look_at(&mut self, target: Vec2) {
        self.center = target;
        self.clamp_to_bounds();
    }

    /// Ease toward `target`. Frame-rate independent.
    pub fn follow(&mut self, target: Vec2, dt: f32) {
        if self.smoothing <= 0.0 {
            self.look_at(target);
            return;
        }
        let lerp_factor = 1.0 - self.smoothing.powf(dt * 60.0);
        self.center += (target - self.center) * lerp_factor;
        self.clamp_to_bounds();
    }

    /// Visible world area, rounded outward to whole pixels.
    pub fn view_rect(&self) -> Rect {
        let left = (self.center.x - self.width / 2.0).floor() as i32;
        let top = (self.center.y - self.height / 2.0).floor() as i32;
        let right = (self.center.x + self.width / 2.0).ceil() as i32;
        let bottom = (self.center.y + self.height / 2.0).ceil() as i32;
        Rect::new(left, top, right - left, bottom - top)
    }

    /// Screen-space offset for a world point (top-left of the view is 0,0).
    pub fn world_to_screen(&self, point: Vec2) -> Vec2 {
        point - (self.center - Vec2::new(self.width, self.height) / 2.0)
    }

    pub fn is_rect_visible(&self, rect: &Rect) -> bool {
        self.view_rect().overlaps(rect)
    }

    fn clamp_to_bounds(&mut self) {
        let Some(bounds) = self.bounds else {
            return;
        };
        let half_w = self.width / 2.0;
        let half_h = self.height / 2.0;

        if self.width >= bounds.w as f32 {
            self.center.x = bounds.center().x;
        } else {
            self.center.x = self
                .center
                .x
                .clamp(bounds.left() as f32 + half_w, bounds.right() as f32 - half_w);
        }

        if self.height >= bounds.h as f32 {
            self.center.y = bounds.center().y;
        } else {
            self.center.y = self
                .center
                .y
                .clamp(bounds.top() as f32 + half_h, bounds.bottom() as f32 - half_h);
        }
    }
}
