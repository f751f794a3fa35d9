use engine::{Mat4, Transform, Vec2, Vec3};

const LOCAL_TOP_LEFT: Vec3 = Vec3::new(-0.5, 0.5, 0.0);
const LOCAL_BOTTOM_RIGHT: Vec3 = Vec3::new(0.5, -0.5, 0.0);

/// Axis-aligned rectangle in world units. Extents are always non-negative and
/// containment is half-open on both axes: `[x, x + width) × [y, y + height)`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct Rectangle {
    pub(crate) x: f32,
    pub(crate) y: f32,
    pub(crate) width: f32,
    pub(crate) height: f32,
}

impl Rectangle {
    pub(crate) fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        let (x, width) = if width < 0.0 { (x + width, -width) } else { (x, width) };
        let (y, height) = if height < 0.0 { (y + height, -height) } else { (y, height) };
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Hitbox of a unit quad placed by `transform`, shifted by `pivot` and scaled by
    /// `scale` in the node's local space.
    pub(crate) fn from_transform(transform: &Transform, pivot: Vec3, scale: Vec3) -> Self {
        let matrix = transform.matrix() * Mat4::from_translation(pivot) * Mat4::from_scale(scale);
        let top_left = matrix.transform_point3(LOCAL_TOP_LEFT);
        let bottom_right = matrix.transform_point3(LOCAL_BOTTOM_RIGHT);
        let size = bottom_right - top_left;
        Self::new(top_left.x, top_left.y, size.x, size.y)
    }

    pub(crate) fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x
            && point.x < self.x + self.width
            && point.y >= self.y
            && point.y < self.y + self.height
    }

    pub(crate) fn top(&self) -> f32 {
        self.y + self.height
    }
}
