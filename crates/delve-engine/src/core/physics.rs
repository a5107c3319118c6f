use glam::{IVec2, Vec2};

use crate::core::geom::Rect;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Largest displacement applied per sub-step, in pixels.
/// Must not exceed the smallest tile edge or thin tiles can be skipped.
pub const STEP_SIZE: f32 = 2.0;

/// Remaining displacement below this is treated as exhausted.
const STEP_EPSILON: f32 = 0.01;

/// Downward acceleration in px/s² (Y-down).
pub const DEFAULT_GRAVITY: f32 = 1200.0;

/// Vertical speed cap applied while gravity is active.
pub const DEFAULT_MAX_FALL_SPEED: f32 = 1200.0;

// ---------------------------------------------------------------------------
// Solid query seam
// ---------------------------------------------------------------------------

/// Read-only view of the collidable world.
///
/// Bodies only ever ask for solid rectangles; they never see other bodies.
pub trait SolidQuery {
    /// World-space rectangles of every solid cell overlapping `rect`.
    fn solids_overlapping(&self, rect: Rect) -> Vec<Rect>;

    /// Whether the pixel at `(px, py)` lies inside a solid cell.
    fn is_solid_at(&self, px: i32, py: i32) -> bool {
        !self.solids_overlapping(Rect::new(px, py, 1, 1)).is_empty()
    }
}

impl<T: SolidQuery + ?Sized> SolidQuery for &T {
    fn solids_overlapping(&self, rect: Rect) -> Vec<Rect> {
        (**self).solids_overlapping(rect)
    }

    fn is_solid_at(&self, px: i32, py: i32) -> bool {
        (**self).is_solid_at(px, py)
    }
}

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Which sides of the box touched a solid during the last `integrate`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionFlags {
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
}

impl CollisionFlags {
    pub fn any(&self) -> bool {
        self.top || self.bottom || self.left || self.right
    }

    pub fn horizontal(&self) -> bool {
        self.left || self.right
    }

    pub fn vertical(&self) -> bool {
        self.top || self.bottom
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    X,
    Y,
}

/// Kinematic body with axis-separated, sub-stepped tile collision.
///
/// `position` is authoritative; `bbox` is its integer rounding and is
/// written back into `position` at the end of every step.
#[derive(Debug, Clone)]
pub struct PhysicsBody {
    position: Vec2,
    bbox: Rect,
    pub velocity: Vec2,
    /// Only the x component is integrated; gravity drives y.
    pub acceleration: Vec2,
    pub gravity: f32,
    pub max_fall_speed: f32,
    step_size: f32,
    collisions: CollisionFlags,
}

impl PhysicsBody {
    /// Body with its top-left corner at `position` and a box of `size` pixels.
    pub fn new(position: Vec2, size: IVec2) -> Self {
        Self {
            position,
            bbox: Rect::new(
                position.x.round() as i32,
                position.y.round() as i32,
                size.x.max(1),
                size.y.max(1),
            ),
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            gravity: DEFAULT_GRAVITY,
            max_fall_speed: DEFAULT_MAX_FALL_SPEED,
            step_size: STEP_SIZE,
            collisions: CollisionFlags::default(),
        }
    }

    // -- Builder pattern --

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_max_fall_speed(mut self, max_fall_speed: f32) -> Self {
        self.max_fall_speed = max_fall_speed;
        self
    }

    /// Sub-step length. Non-positive values fall back to [`STEP_SIZE`].
    pub fn with_step_size(mut self, step_size: f32) -> Self {
        self.step_size = if step_size > 0.0 { step_size } else { STEP_SIZE };
        self
    }

    // -- Accessors --

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn bbox(&self) -> Rect {
        self.bbox
    }

    pub fn size(&self) -> IVec2 {
        self.bbox.size()
    }

    pub fn center(&self) -> Vec2 {
        self.bbox.center()
    }

    /// Bottom-center point, in world pixels.
    pub fn feet(&self) -> Vec2 {
        Vec2::new(self.bbox.center().x, self.bbox.bottom() as f32)
    }

    pub fn collisions(&self) -> CollisionFlags {
        self.collisions
    }

    /// Standing on something as of the last step.
    pub fn is_grounded(&self) -> bool {
        self.collisions.bottom
    }

    /// Teleport. No collision correction is applied here or retroactively.
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
        self.bbox.x = position.x.round() as i32;
        self.bbox.y = position.y.round() as i32;
    }

    /// Adopt a new box size (e.g. the sprite's frame changed), keeping the
    /// bottom-center anchored so feet stay on the ground.
    pub fn resize(&mut self, size: IVec2) {
        let size = size.max(IVec2::ONE);
        let center_x = self.bbox.x + self.bbox.w / 2;
        let bottom = self.bbox.bottom();
        self.bbox = Rect::new(center_x - size.x / 2, bottom - size.y, size.x, size.y);
        self.sync_position();
    }

    /// Shift horizontally by `dx` pixels if the destination is free of solids.
    pub fn nudge_x<S: SolidQuery + ?Sized>(&mut self, dx: i32, solids: &S) -> bool {
        let target = self.bbox.translated(dx, 0);
        if !solids.solids_overlapping(target).is_empty() {
            return false;
        }
        self.bbox = target;
        self.sync_position();
        true
    }

    // -- Integration --

    /// Advance one tick: accelerate, apply gravity, then move and resolve
    /// horizontally before vertically.
    pub fn integrate<S: SolidQuery + ?Sized>(&mut self, dt: f32, solids: &S) {
        self.collisions = CollisionFlags::default();

        self.velocity.x += self.acceleration.x * dt;

        if self.gravity != 0.0 {
            self.velocity.y += self.gravity * dt;
            if self.velocity.y > self.max_fall_speed {
                self.velocity.y = self.max_fall_speed;
            }
        }

        let dx = self.velocity.x * dt;
        let dy = self.velocity.y * dt;

        self.move_axis(Axis::X, dx, solids);
        let hit_vertical = self.move_axis(Axis::Y, dy, solids);

        if !hit_vertical && dy >= 0.0 {
            self.probe_ground(solids);
        }

        self.sync_position();
    }

    /// Sub-step along one axis. Returns `true` if a solid stopped the motion.
    fn move_axis<S: SolidQuery + ?Sized>(&mut self, axis: Axis, delta: f32, solids: &S) -> bool {
        let mut remaining = delta;
        while remaining.abs() > STEP_EPSILON {
            let step = remaining.clamp(-self.step_size, self.step_size);

            match axis {
                Axis::X => {
                    self.position.x += step;
                    self.bbox.x = self.position.x.round() as i32;
                }
                Axis::Y => {
                    self.position.y += step;
                    self.bbox.y = self.position.y.round() as i32;
                }
            }

            let hit = solids
                .solids_overlapping(self.bbox)
                .into_iter()
                .find(|tile| tile.overlaps(&self.bbox));

            if let Some(tile) = hit {
                self.snap_to(axis, step, &tile);
                return true;
            }

            remaining -= step;
        }
        false
    }

    /// Align the leading edge with the tile's facing edge and record the side.
    fn snap_to(&mut self, axis: Axis, step: f32, tile: &Rect) {
        match axis {
            Axis::X => {
                if step > 0.0 {
                    self.bbox.set_right(tile.left());
                    self.collisions.right = true;
                } else {
                    self.bbox.x = tile.right();
                    self.collisions.left = true;
                }
                self.position.x = self.bbox.x as f32;
                if (step > 0.0 && self.velocity.x > 0.0) || (step < 0.0 && self.velocity.x < 0.0) {
                    self.velocity.x = 0.0;
                }
            }
            Axis::Y => {
                if step > 0.0 {
                    self.bbox.set_bottom(tile.top());
                    self.collisions.bottom = true;
                } else {
                    self.bbox.y = tile.bottom();
                    self.collisions.top = true;
                }
                self.position.y = self.bbox.y as f32;
                if (step > 0.0 && self.velocity.y > 0.0) || (step < 0.0 && self.velocity.y < 0.0) {
                    self.velocity.y = 0.0;
                }
            }
        }
    }

    /// Resting contact: a solid directly under the box counts as ground even
    /// when this tick's fall was too small to round into it.
    fn probe_ground<S: SolidQuery + ?Sized>(&mut self, solids: &S) {
        let below = Rect::new(self.bbox.x, self.bbox.bottom(), self.bbox.w, 1);
        if !solids.solids_overlapping(below).is_empty() {
            self.collisions.bottom = true;
            if self.velocity.y > 0.0 {
                self.velocity.y = 0.0;
            }
        }
    }

    fn sync_position(&mut self) {
        self.position.x = self.bbox.x as f32;
        self.position.y = self.bbox.y as f32;
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Free-standing solids for exercising the body without a tilemap.
    pub(crate) struct Solids(pub Vec<Rect>);

    impl SolidQuery for Solids {
        fn solids_overlapping(&self, rect: Rect) -> Vec<Rect> {
            self.0.iter().copied().filter(|r| r.overlaps(&rect)).collect()
        }
    }

    const DT: f32 = 1.0 / 60.0;

    fn floor() -> Solids {
        Solids(vec![Rect::new(0, 64, 256, 32)])
    }

    #[test]
    fn falls_and_lands_flush_on_floor() {
        let world = floor();
        let mut body = PhysicsBody::new(Vec2::new(10.0, 0.0), IVec2::new(16, 16));

        for _ in 0..120 {
            body.integrate(DT, &world);
        }

        assert_eq!(body.bbox().bottom(), 64);
        assert!(body.collisions().bottom);
        assert_eq!(body.velocity.y, 0.0);
        assert!(world.solids_overlapping(body.bbox()).is_empty());
    }

    #[test]
    fn resting_body_stays_put_and_grounded() {
        let world = floor();
        let mut body = PhysicsBody::new(Vec2::new(32.0, 48.0), IVec2::new(16, 16));

        for tick in 0..10 {
            body.integrate(DT, &world);
            assert_eq!(body.position(), Vec2::new(32.0, 48.0), "tick {}", tick);
            assert!(body.collisions().bottom, "tick {}", tick);
        }
    }

    #[test]
    fn moving_into_wall_snaps_to_its_edge() {
        let world = Solids(vec![Rect::new(96, 0, 32, 128)]);
        let mut body = PhysicsBody::new(Vec2::new(60.0, 10.0), IVec2::new(16, 16))
            .with_gravity(0.0)
            .with_velocity(Vec2::new(1500.0, 0.0));

        body.integrate(DT, &world);

        assert_eq!(body.bbox().right(), 96);
        assert!(body.collisions().right);
        assert!(!body.collisions().left);
        assert_eq!(body.velocity.x, 0.0);
        assert!(world.solids_overlapping(body.bbox()).is_empty());
    }

    #[test]
    fn moving_left_into_wall_snaps_to_right_edge() {
        let world = Solids(vec![Rect::new(0, 0, 32, 128)]);
        let mut body = PhysicsBody::new(Vec2::new(40.0, 10.0), IVec2::new(16, 16))
            .with_gravity(0.0)
            .with_velocity(Vec2::new(-900.0, 0.0));

        body.integrate(DT, &world);

        assert_eq!(body.bbox().left(), 32);
        assert!(body.collisions().left);
        assert_eq!(body.velocity.x, 0.0);
    }

    #[test]
    fn head_bump_sets_top_and_stops_rising() {
        let world = Solids(vec![Rect::new(0, 0, 128, 32)]);
        let mut body = PhysicsBody::new(Vec2::new(20.0, 40.0), IVec2::new(16, 16))
            .with_velocity(Vec2::new(0.0, -800.0));

        body.integrate(DT, &world);

        assert_eq!(body.bbox().top(), 32);
        assert!(body.collisions().top);
        assert_eq!(body.velocity.y, 0.0);
    }

    #[test]
    fn diagonal_corner_resolution_is_order_not_speed_dependent() {
        // L-shaped corner: floor along the bottom, wall on the right.
        let world = Solids(vec![Rect::new(0, 64, 128, 32), Rect::new(96, 0, 32, 64)]);

        let run = |velocity: Vec2| {
            let mut body = PhysicsBody::new(Vec2::new(70.0, 40.0), IVec2::new(16, 16))
                .with_gravity(0.0)
                .with_velocity(velocity);
            body.integrate(0.1, &world);
            body
        };

        let wide = run(Vec2::new(600.0, 300.0));
        let tall = run(Vec2::new(300.0, 600.0));

        assert_eq!(wide.position(), Vec2::new(80.0, 48.0));
        assert_eq!(tall.position(), wide.position());
        for body in [&wide, &tall] {
            assert!(body.collisions().right && body.collisions().bottom);
            assert!(world.solids_overlapping(body.bbox()).is_empty());
        }
    }

    #[test]
    fn sub_stepping_prevents_tunneling_through_thin_walls() {
        let world = Solids(vec![Rect::new(100, 0, 4, 64)]);
        let mut body = PhysicsBody::new(Vec2::new(60.0, 10.0), IVec2::new(8, 8))
            .with_gravity(0.0)
            .with_velocity(Vec2::new(4000.0, 0.0));

        body.integrate(DT, &world);

        assert_eq!(body.bbox().right(), 100);
        assert!(body.collisions().right);
    }

    #[test]
    fn zero_gravity_keeps_vertical_velocity() {
        let world = Solids(Vec::new());
        let mut body = PhysicsBody::new(Vec2::ZERO, IVec2::new(8, 8))
            .with_gravity(0.0)
            .with_max_fall_speed(0.0)
            .with_velocity(Vec2::new(0.0, 50.0));

        body.integrate(DT, &world);

        assert_eq!(body.velocity.y, 50.0);
        assert!(body.position().y > 0.0);
    }

    #[test]
    fn fall_speed_is_capped() {
        let world = Solids(Vec::new());
        let mut body = PhysicsBody::new(Vec2::ZERO, IVec2::new(8, 8)).with_max_fall_speed(300.0);
        for _ in 0..60 {
            body.integrate(DT, &world);
        }
        assert_eq!(body.velocity.y, 300.0);
    }

    #[test]
    fn horizontal_acceleration_accumulates() {
        let world = floor();
        let mut body = PhysicsBody::new(Vec2::new(0.0, 48.0), IVec2::new(16, 16));
        body.acceleration.x = 600.0;
        body.integrate(0.5, &world);
        assert!((body.velocity.x - 300.0).abs() < 1e-3);
        assert!(body.position().x > 0.0);
    }

    #[test]
    fn body_starting_inside_solid_is_not_corrected_at_rest() {
        let world = Solids(vec![Rect::new(0, 0, 64, 64)]);
        let mut body = PhysicsBody::new(Vec2::new(16.0, 16.0), IVec2::new(8, 8)).with_gravity(0.0);
        body.integrate(DT, &world);
        assert_eq!(body.position(), Vec2::new(16.0, 16.0));
        assert!(!body.collisions().horizontal());
        assert!(!body.collisions().top);
    }

    #[test]
    fn nudge_respects_solids() {
        let world = Solids(vec![Rect::new(20, 0, 10, 10)]);
        let mut body = PhysicsBody::new(Vec2::new(10.0, 0.0), IVec2::new(8, 8));
        assert!(body.nudge_x(-2, &world));
        assert_eq!(body.position().x, 8.0);
        assert!(!body.nudge_x(10, &world));
        assert_eq!(body.position().x, 8.0);
    }

    #[test]
    fn resize_keeps_feet_anchored() {
        let mut body = PhysicsBody::new(Vec2::new(10.0, 10.0), IVec2::new(20, 20));
        body.resize(IVec2::new(10, 30));
        assert_eq!(body.bbox(), Rect::new(15, 0, 10, 30));
        assert_eq!(body.position(), Vec2::new(15.0, 0.0));
    }
}
