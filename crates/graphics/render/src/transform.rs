use math::{AffineTransform, Angle, Vec2D};

/// Position, rotation and scale of a shape relative to its parent
///
/// The local to parent mapping is
/// `translate(position) * translate(pivot) * rotate * scale * translate(-pivot)`,
/// so rotation and scaling happen around the pivot, which is given in the
/// shape's own coordinate system. The default pivot is the shape's origin.
///
/// Setters silently reject non-finite values, the previous value is kept.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    position: Vec2D,

    /// Always inside `[0, 360)`
    rotation: Angle,
    scale: Vec2D,
    pivot: Vec2D,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec2D::ORIGIN,
            rotation: Angle::ZERO,
            scale: Vec2D::new(1., 1.),
            pivot: Vec2D::ORIGIN,
        }
    }
}

fn all_finite(values: &[f32], operation: &str) -> bool {
    let finite = values.iter().all(|value| value.is_finite());
    if !finite {
        log::warn!("Ignoring non-finite input to {operation}: {values:?}");
    }
    finite
}

impl Transform {
    #[must_use]
    pub fn new(position: Vec2D) -> Self {
        let mut transform = Self::default();
        transform.set_position(position.x, position.y);
        transform
    }

    #[inline]
    #[must_use]
    pub fn position(&self) -> Vec2D {
        self.position
    }

    #[inline]
    #[must_use]
    pub fn x(&self) -> f32 {
        self.position.x
    }

    #[inline]
    #[must_use]
    pub fn y(&self) -> f32 {
        self.position.y
    }

    #[inline]
    #[must_use]
    pub fn rotation_angle(&self) -> Angle {
        self.rotation
    }

    #[inline]
    #[must_use]
    pub fn scale_x(&self) -> f32 {
        self.scale.x
    }

    #[inline]
    #[must_use]
    pub fn scale_y(&self) -> f32 {
        self.scale.y
    }

    #[inline]
    #[must_use]
    pub fn pivot(&self) -> Vec2D {
        self.pivot
    }

    pub fn set_position(&mut self, x: f32, y: f32) {
        if all_finite(&[x, y], "set_position") {
            self.position = Vec2D::new(x, y);
        }
    }

    pub fn set_x(&mut self, x: f32) {
        if all_finite(&[x], "set_x") {
            self.position.x = x;
        }
    }

    pub fn set_y(&mut self, y: f32) {
        if all_finite(&[y], "set_y") {
            self.position.y = y;
        }
    }

    /// Move by a relative offset
    pub fn translate(&mut self, dx: f32, dy: f32) {
        if all_finite(&[dx, dy], "translate") {
            self.position += Vec2D::new(dx, dy);
        }
    }

    /// Rotate relative to the current rotation
    pub fn rotate(&mut self, angle: Angle) {
        if all_finite(&[angle.degrees()], "rotate") {
            self.rotation = (self.rotation + angle).normalized();
        }
    }

    pub fn set_rotation_angle(&mut self, angle: Angle) {
        if all_finite(&[angle.degrees()], "set_rotation_angle") {
            self.rotation = angle.normalized();
        }
    }

    /// Zero and negative factors are allowed, they collapse or mirror the geometry
    pub fn set_scale(&mut self, scale_x: f32, scale_y: f32) {
        if all_finite(&[scale_x, scale_y], "set_scale") {
            self.scale = Vec2D::new(scale_x, scale_y);
        }
    }

    /// Set the scale and move the pivot to `origin` in the same step
    pub fn set_scale_about(&mut self, scale_x: f32, scale_y: f32, origin: Vec2D) {
        if all_finite(&[scale_x, scale_y, origin.x, origin.y], "set_scale_about") {
            self.scale = Vec2D::new(scale_x, scale_y);
            self.pivot = origin;
        }
    }

    pub fn set_scale_x(&mut self, scale_x: f32) {
        if all_finite(&[scale_x], "set_scale_x") {
            self.scale.x = scale_x;
        }
    }

    pub fn set_scale_y(&mut self, scale_y: f32) {
        if all_finite(&[scale_y], "set_scale_y") {
            self.scale.y = scale_y;
        }
    }

    pub fn set_pivot(&mut self, x: f32, y: f32) {
        if all_finite(&[x, y], "set_pivot") {
            self.pivot = Vec2D::new(x, y);
        }
    }

    /// The matrix mapping local coordinates into the parent's coordinate system
    #[must_use]
    pub fn to_matrix(&self) -> AffineTransform {
        self.matrix_with_rotation(self.rotation)
    }

    /// Like [Self::to_matrix], but ignoring the rotation
    #[must_use]
    pub fn to_matrix_without_rotation(&self) -> AffineTransform {
        self.matrix_with_rotation(Angle::ZERO)
    }

    fn matrix_with_rotation(&self, rotation: Angle) -> AffineTransform {
        AffineTransform::translate(-self.pivot)
            .chain(AffineTransform::scale(self.scale.x, self.scale.y))
            .chain(AffineTransform::rotate(rotation))
            .chain(AffineTransform::translate(self.pivot))
            .chain(AffineTransform::translate(self.position))
    }
}

/// Placement of a texture inside the bounding box of a shape
///
/// Texture coordinates are normalized, `(0, 0)` is the top left corner of
/// the shape's bounding box and `(1, 1)` the bottom right one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextureTransform {
    pub offset: Vec2D,
    pub scale: Vec2D,

    /// Rotation around the center of the texture
    pub rotation: Angle,

    /// Keep the texture upright when the shape itself rotates
    pub fixed: bool,
}

impl Default for TextureTransform {
    fn default() -> Self {
        Self {
            offset: Vec2D::ORIGIN,
            scale: Vec2D::new(1., 1.),
            rotation: Angle::ZERO,
            fixed: false,
        }
    }
}

impl TextureTransform {
    /// Map normalized shape coordinates to texture coordinates
    ///
    /// The coordinates are first rotated around `(0.5, 0.5)`, then scaled and
    /// finally offset.
    #[must_use]
    pub fn apply(&self, uv: Vec2D) -> Vec2D {
        let center = Vec2D::new(0.5, 0.5);
        let rotated = AffineTransform::rotate(self.rotation).apply_to(uv - center) + center;

        Vec2D::new(
            rotated.x.mul_add(self.scale.x, self.offset.x),
            rotated.y.mul_add(self.scale.y, self.offset.y),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{TextureTransform, Transform};
    use math::{Angle, Vec2D};

    fn assert_close(a: Vec2D, b: Vec2D) {
        assert!(a.distance_to(b) < 1e-3, "{a:?} != {b:?}");
    }

    #[test]
    fn position_round_trips() {
        let mut transform = Transform::default();
        transform.set_position(12.25, -3.5);
        assert_eq!(transform.position(), Vec2D::new(12.25, -3.5));

        transform.translate(1., 1.);
        assert_eq!((transform.x(), transform.y()), (13.25, -2.5));
    }

    #[test]
    fn rotation_accumulates_and_wraps() {
        let mut split = Transform::default();
        split.rotate(Angle::from_degrees(300.));
        split.rotate(Angle::from_degrees(100.));

        let mut combined = Transform::default();
        combined.rotate(Angle::from_degrees(400.));

        assert_eq!(split.rotation_angle(), combined.rotation_angle());
        assert_eq!(split.rotation_angle(), Angle::from_degrees(40.));

        split.set_rotation_angle(Angle::from_degrees(-90.));
        assert_eq!(split.rotation_angle().degrees(), 270.);
    }

    #[test]
    fn non_finite_input_is_ignored() {
        let mut transform = Transform::new(Vec2D::new(1., 2.));
        transform.set_position(f32::NAN, 0.);
        transform.set_scale(f32::INFINITY, 1.);
        transform.rotate(Angle::from_degrees(f32::NAN));

        assert_eq!(transform.position(), Vec2D::new(1., 2.));
        assert_eq!(transform.scale_x(), 1.);
        assert_eq!(transform.rotation_angle(), Angle::ZERO);
    }

    #[test]
    fn rotation_happens_around_pivot() {
        let mut transform = Transform::default();
        transform.set_pivot(32., 32.);
        transform.rotate(Angle::from_degrees(90.));

        let matrix = transform.to_matrix();
        assert_close(matrix.apply_to(Vec2D::new(52., 32.)), Vec2D::new(32., 52.));
        assert_close(matrix.apply_to(Vec2D::new(32., 32.)), Vec2D::new(32., 32.));
    }

    #[test]
    fn scale_about_origin() {
        let mut transform = Transform::new(Vec2D::new(10., 10.));
        transform.set_scale_about(2., 2., Vec2D::new(1., 1.));

        let matrix = transform.to_matrix();
        assert_close(matrix.apply_to(Vec2D::new(1., 1.)), Vec2D::new(11., 11.));
        assert_close(matrix.apply_to(Vec2D::new(2., 1.)), Vec2D::new(13., 11.));
    }

    #[test]
    fn matrix_without_rotation() {
        let mut transform = Transform::new(Vec2D::new(5., 0.));
        transform.rotate(Angle::from_degrees(45.));
        assert_eq!(
            transform.to_matrix_without_rotation().apply_to(Vec2D::ORIGIN),
            Vec2D::new(5., 0.)
        );
    }

    #[test]
    fn texture_transform() {
        let mut texture_transform = TextureTransform::default();
        assert_close(texture_transform.apply(Vec2D::new(0.2, 0.7)), Vec2D::new(0.2, 0.7));

        texture_transform.rotation = Angle::from_degrees(180.);
        assert_close(texture_transform.apply(Vec2D::new(0.25, 0.)), Vec2D::new(0.75, 1.));

        texture_transform.rotation = Angle::ZERO;
        texture_transform.scale = Vec2D::new(2., 0.5);
        texture_transform.offset = Vec2D::new(0.1, 0.);
        assert_close(texture_transform.apply(Vec2D::new(0.5, 0.5)), Vec2D::new(1.1, 0.25));
    }
}
