use std::ops;

/// Zero cost wrapper type for an `f32` holding an angle in **degrees**.
///
/// This type exists since coordinates are also `f32`'s.
/// It should enforce type safety to prevent coordinates from accidentally being
/// used as angles, and radians from accidentally being used as degrees.
#[derive(Clone, Copy, Debug, Default)]
pub struct Angle(f32);

impl Angle {
    /// Angles with a difference below this value (in degrees) are considered equal
    const MAX_ERROR: f32 = 0.01;

    pub const ZERO: Self = Self(0.);

    #[inline]
    #[must_use]
    pub const fn from_degrees(degrees: f32) -> Self {
        Self(degrees)
    }

    #[inline]
    #[must_use]
    pub fn from_radians(radians: f32) -> Self {
        Self(radians.to_degrees())
    }

    #[inline]
    #[must_use]
    pub const fn degrees(&self) -> f32 {
        self.0
    }

    #[inline]
    #[must_use]
    pub fn radians(&self) -> f32 {
        self.0.to_radians()
    }

    /// Wrap the angle into `[0, 360)`
    #[inline]
    #[must_use]
    pub fn normalized(&self) -> Self {
        let wrapped = self.0.rem_euclid(360.);

        // rem_euclid can round up to exactly 360 for tiny negative inputs
        if wrapped >= 360. {
            Self(0.)
        } else {
            Self(wrapped)
        }
    }

    /// The smallest absolute difference between two angles, in `[0, 180]`
    #[inline]
    #[must_use]
    pub fn diff(&self, other: &Self) -> Self {
        let difference = (self.0 - other.0).rem_euclid(360.);

        if 180. < difference {
            Self(360. - difference)
        } else {
            Self(difference)
        }
    }

    #[inline]
    #[must_use]
    pub fn sin(&self) -> f32 {
        self.radians().sin()
    }

    #[inline]
    #[must_use]
    pub fn cos(&self) -> f32 {
        self.radians().cos()
    }
}

impl PartialEq for Angle {
    fn eq(&self, other: &Self) -> bool {
        self.diff(other).0 < Self::MAX_ERROR
    }
}

impl ops::Add for Angle {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl ops::Sub for Angle {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl ops::Neg for Angle {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}
