use super::Vec2D;

use std::ops;

/// An axis-aligned rectangle, described by two of its corners
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rectangle<T = f32> {
    top_left: Vec2D<T>,
    bottom_right: Vec2D<T>,
}

impl<T> Rectangle<T> {
    pub const fn from_corners(top_left: Vec2D<T>, bottom_right: Vec2D<T>) -> Self {
        Self {
            top_left,
            bottom_right,
        }
    }
}

impl<T> Rectangle<T>
where
    T: Copy,
{
    pub const fn top_left(&self) -> Vec2D<T> {
        self.top_left
    }

    pub const fn bottom_right(&self) -> Vec2D<T> {
        self.bottom_right
    }
}

impl<T> Rectangle<T>
where
    T: ops::Add<Output = T> + ops::Sub<Output = T> + Copy,
{
    pub fn from_position_and_size(top_left: Vec2D<T>, width: T, height: T) -> Self {
        let bottom_right = Vec2D {
            x: top_left.x + width,
            y: top_left.y + height,
        };

        Self {
            top_left,
            bottom_right,
        }
    }

    pub fn width(&self) -> T {
        self.bottom_right.x - self.top_left.x
    }

    pub fn height(&self) -> T {
        self.bottom_right.y - self.top_left.y
    }
}

impl Rectangle<f32> {
    /// The smallest rectangle containing all of the given points
    ///
    /// Returns `None` if there are no points.
    pub fn bounding_box<I: IntoIterator<Item = Vec2D>>(points: I) -> Option<Self> {
        points.into_iter().fold(None, |extent: Option<Self>, point| {
            let Some(extent) = extent else {
                return Some(Self::from_corners(point, point));
            };

            Some(Self::from_corners(
                Vec2D::new(
                    f32::min(extent.top_left.x, point.x),
                    f32::min(extent.top_left.y, point.y),
                ),
                Vec2D::new(
                    f32::max(extent.bottom_right.x, point.x),
                    f32::max(extent.bottom_right.y, point.y),
                ),
            ))
        })
    }

    /// Create a pixel-aligned rectangle containing `self`
    ///
    /// The aligned rectangle is chosen to be as small as possible,
    /// but is guaranteed to contain `self` in its entirety.
    pub fn snap_to_grid(&self) -> Rectangle<i32> {
        Rectangle {
            top_left: self.top_left.map(|value| value.floor() as i32),
            bottom_right: self.bottom_right.map(|value| value.ceil() as i32),
        }
    }
}

impl Rectangle<i32> {
    /// The overlapping area of two rectangles, if they overlap at all
    #[must_use]
    pub fn intersection(&self, other: Self) -> Option<Self> {
        let top_left = Vec2D::new(
            self.top_left.x.max(other.top_left.x),
            self.top_left.y.max(other.top_left.y),
        );
        let bottom_right = Vec2D::new(
            self.bottom_right.x.min(other.bottom_right.x),
            self.bottom_right.y.min(other.bottom_right.y),
        );

        (top_left.x < bottom_right.x && top_left.y < bottom_right.y)
            .then_some(Self::from_corners(top_left, bottom_right))
    }

    /// Whether the point lies inside the half-open area `[top_left, bottom_right)`
    #[inline]
    #[must_use]
    pub fn contains_point(&self, point: Vec2D<i32>) -> bool {
        (self.top_left.x..self.bottom_right.x).contains(&point.x)
            && (self.top_left.y..self.bottom_right.y).contains(&point.y)
    }
}

#[cfg(test)]
mod tests {
    use super::Rectangle;
    use crate::Vec2D;

    #[test]
    fn bounding_box_of_points() {
        let points = [
            Vec2D::new(1., 5.),
            Vec2D::new(-2., 3.),
            Vec2D::new(4., -1.),
        ];
        let bbox = Rectangle::bounding_box(points).expect("points are not empty");
        assert_eq!(bbox.top_left(), Vec2D::new(-2., -1.));
        assert_eq!(bbox.bottom_right(), Vec2D::new(4., 5.));
        assert!(Rectangle::bounding_box(Vec::<Vec2D>::new()).is_none());
    }

    #[test]
    fn intersection_clips() {
        let a = Rectangle::from_position_and_size(Vec2D::new(0, 0), 10, 10);
        let b = Rectangle::from_position_and_size(Vec2D::new(5, -5), 10, 10);
        let overlap = a.intersection(b).expect("rectangles overlap");
        assert_eq!(overlap.top_left(), Vec2D::new(5, 0));
        assert_eq!(overlap.bottom_right(), Vec2D::new(10, 5));

        let far = Rectangle::from_position_and_size(Vec2D::new(20, 20), 1, 1);
        assert!(a.intersection(far).is_none());
    }

    #[test]
    fn half_open_containment() {
        let area = Rectangle::from_position_and_size(Vec2D::new(0, 0), 4, 4);
        assert!(area.contains_point(Vec2D::new(3, 3)));
        assert!(!area.contains_point(Vec2D::new(4, 0)));
    }
}
