use super::{Angle, Vec2D};

/// A 2-dimensional transformation.
///
/// Each [AffineTransform] is a `3x3` matrix that transforms a 2 dimensional vector `x`, `y`.
/// See [Wikipedia](https://en.wikipedia.org/wiki/Affine_transformation) for more information.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AffineTransform([[f32; 3]; 2]);

impl AffineTransform {
    #[inline]
    pub const fn identity() -> Self {
        Self([[1., 0., 0.], [0., 1., 0.]])
    }

    /// Create transformation that shifts every point by a fixed offset
    #[inline]
    pub const fn translate(translate_by: Vec2D) -> Self {
        Self([[1., 0., translate_by.x], [0., 1., translate_by.y]])
    }

    /// Create a transformation that scales points by fixed values along the X and Y axis
    #[inline]
    pub const fn scale(x_scale: f32, y_scale: f32) -> Self {
        Self([[x_scale, 0., 0.], [0., y_scale, 0.]])
    }

    /// Create a transformation that rotates points around the origin by a fixed
    /// amount
    ///
    /// Since the y axis of a pixel buffer points downwards, positive angles
    /// rotate clockwise on screen.
    #[inline]
    pub fn rotate(angle: Angle) -> Self {
        let (sin, cos) = angle.radians().sin_cos();
        Self([[cos, -sin, 0.], [sin, cos, 0.]])
    }

    /// Apply this transform to a provided vector
    #[inline]
    pub fn apply_to(self, point: Vec2D) -> Vec2D {
        Vec2D {
            x: point
                .x
                .mul_add(self.0[0][0], point.y.mul_add(self.0[0][1], self.0[0][2])),
            y: point
                .x
                .mul_add(self.0[1][0], point.y.mul_add(self.0[1][1], self.0[1][2])),
        }
    }

    /// Combine two transforms together into a single one
    ///
    /// The resulting transform applies `self` first and `other` second.
    #[inline]
    pub fn chain(&self, other: Self) -> Self {
        // Multiply the two matrices together
        // a b c
        // d e f
        // 0 0 1
        let a = other.0[0][0].mul_add(self.0[0][0], other.0[0][1] * self.0[1][0]);
        let b = other.0[0][0].mul_add(self.0[0][1], other.0[0][1] * self.0[1][1]);
        let c = other.0[0][0].mul_add(
            self.0[0][2],
            other.0[0][1].mul_add(self.0[1][2], other.0[0][2]),
        );

        let d = other.0[1][0].mul_add(self.0[0][0], other.0[1][1] * self.0[1][0]);
        let e = other.0[1][0].mul_add(self.0[0][1], other.0[1][1] * self.0[1][1]);
        let f = other.0[1][0].mul_add(
            self.0[0][2],
            other.0[1][1].mul_add(self.0[1][2], other.0[1][2]),
        );

        Self([[a, b, c], [d, e, f]])
    }

    /// Determinant of the linear part of the transform
    ///
    /// Its absolute value is the factor by which areas are scaled.
    #[inline]
    #[must_use]
    pub fn determinant(&self) -> f32 {
        self.0[0][0].mul_add(self.0[1][1], -self.0[0][1] * self.0[1][0])
    }

    /// The transform that undoes `self`, if there is one
    ///
    /// Returns `None` for degenerate transforms (for example a zero scale).
    #[must_use]
    pub fn inverse(&self) -> Option<Self> {
        let det = self.determinant();
        if det.abs() < f32::EPSILON || !det.is_finite() {
            return None;
        }

        let [[a, b, c], [d, e, f]] = self.0;
        Some(Self([
            [e / det, -b / det, (b * f - c * e) / det],
            [-d / det, a / det, (c * d - a * f) / det],
        ]))
    }

    /// The image of the origin, i.e. the translation part of the transform
    #[inline]
    #[must_use]
    pub fn origin(&self) -> Vec2D {
        Vec2D::new(self.0[0][2], self.0[1][2])
    }

    /// Geometric mean of the two axis scale factors
    ///
    /// Used to scale lengths that have no orientation, like the radius of a circle.
    #[inline]
    #[must_use]
    pub fn mean_scale(&self) -> f32 {
        self.determinant().abs().sqrt()
    }
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::AffineTransform;
    use crate::{Angle, Vec2D};

    fn assert_close(a: Vec2D, b: Vec2D) {
        assert!(a.distance_to(b) < 1e-4, "{a:?} != {b:?}");
    }

    #[test]
    fn test_identity() {
        let transform = AffineTransform::identity();
        let point = Vec2D::new(2., 3.);
        assert_eq!(transform.apply_to(point), point);
    }

    #[test]
    fn test_translate() {
        let transform = AffineTransform::translate(Vec2D::new(1., 2.));
        let point = Vec2D::new(4., -3.);
        assert_eq!(transform.apply_to(point), Vec2D::new(5., -1.));
    }

    #[test]
    fn test_scale() {
        let transform = AffineTransform::scale(2., -1.);
        let point = Vec2D::new(2., 2.);
        assert_eq!(transform.apply_to(point), Vec2D::new(4., -2.));
    }

    #[test]
    fn test_chain() {
        let translate = AffineTransform::translate(Vec2D::new(1., 2.));
        let scale = AffineTransform::scale(2., 3.);
        let chained = translate.chain(scale);
        let p = Vec2D::new(-2., 2.);
        assert_eq!(chained.apply_to(p), Vec2D::new(-2., 12.));
    }

    #[test]
    fn rotation_is_clockwise_on_screen() {
        let rotate = AffineTransform::rotate(Angle::from_degrees(90.));
        assert_close(rotate.apply_to(Vec2D::new(1., 0.)), Vec2D::new(0., 1.));
    }

    #[test]
    fn inverse_undoes_transform() {
        let transform = AffineTransform::scale(2., 4.)
            .chain(AffineTransform::rotate(Angle::from_degrees(30.)))
            .chain(AffineTransform::translate(Vec2D::new(5., -7.)));
        let inverse = transform.inverse().expect("transform is invertible");

        let p = Vec2D::new(3., 9.);
        assert_close(inverse.apply_to(transform.apply_to(p)), p);
    }

    #[test]
    fn zero_scale_has_no_inverse() {
        assert!(AffineTransform::scale(0., 1.).inverse().is_none());
    }

    #[test]
    fn mean_scale_of_uniform_scale() {
        let transform = AffineTransform::scale(3., 3.)
            .chain(AffineTransform::rotate(Angle::from_degrees(45.)));
        assert!((transform.mean_scale() - 3.).abs() < 1e-5);
    }
}
