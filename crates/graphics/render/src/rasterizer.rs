//! Turns shapes into the pixels they cover
//!
//! There is no anti-aliasing, a pixel is either covered or it is not. Filled
//! polygons are sampled at pixel centers, so an axis-aligned `w x h`
//! rectangle covers exactly `w * h` pixels.

use image::Texture;
use math::{AffineTransform, Color, Rectangle, Vec2D};

use crate::{Geometry, Shape, TextureTransform};

/// Rasterizes shapes into an area of `width x height` pixels
///
/// Pixels outside of that area are never emitted.
#[derive(Clone, Copy, Debug)]
pub struct Rasterizer {
    clip: Rectangle<i32>,
}

impl Rasterizer {
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        let to_i32 = |value: usize| i32::try_from(value).unwrap_or(i32::MAX);
        Self {
            clip: Rectangle::from_position_and_size(Vec2D::new(0, 0), to_i32(width), to_i32(height)),
        }
    }

    #[must_use]
    pub fn clip(&self) -> Rectangle<i32> {
        self.clip
    }

    /// Emit every pixel covered by `shape` together with its color
    ///
    /// `parent` maps the shape's parent coordinate system to the buffer, use
    /// [AffineTransform::identity] for shapes without a parent. Collections
    /// don't cover any pixels by themselves.
    pub fn rasterize<F>(&self, shape: &Shape, parent: AffineTransform, mut emit: F)
    where
        F: FnMut(i32, i32, Color),
    {
        let world = shape.local_matrix().chain(parent);
        let color = shape.color();

        match shape.geometry() {
            Geometry::Collection { .. } => {},
            Geometry::Point => {
                let point = world.apply_to(Vec2D::ORIGIN).round_to_grid();
                if self.clip.contains_point(point) {
                    emit(point.x, point.y, color);
                }
            },
            Geometry::LineSegment { end } => {
                let mut points = vec![];
                self.line(
                    world.apply_to(Vec2D::ORIGIN).round_to_grid(),
                    world.apply_to(*end).round_to_grid(),
                    &mut points,
                );
                paint_unique(points, |x, y| emit(x, y, color));
            },
            Geometry::Circle { radius } => {
                let center = world.apply_to(Vec2D::ORIGIN).round_to_grid();
                let radius = radius * world.mean_scale();

                if shape.is_filled() {
                    let texture = TextureMapping::new(shape, parent, world);
                    self.fill_circle(center, radius, |x, y| {
                        emit(x, y, shade(texture.as_ref(), color, x, y));
                    });
                } else {
                    self.stroke_circle(center, radius, |x, y| emit(x, y, color));
                }
            },
            geometry => {
                let Some(ring) = geometry.vertex_ring() else {
                    return;
                };
                let ring: Vec<Vec2D> = ring.into_iter().map(|v| world.apply_to(v)).collect();

                if shape.is_filled() {
                    let texture = TextureMapping::new(shape, parent, world);
                    self.fill_polygon(&ring, |x, y| {
                        emit(x, y, shade(texture.as_ref(), color, x, y));
                    });
                } else {
                    self.stroke_polygon(&ring, |x, y| emit(x, y, color));
                }
            },
        }
    }

    /// Even-odd scanline fill, sampling every pixel at its center
    ///
    /// Edges are half-open, a scanline exactly on a vertex only counts the
    /// edge that starts there.
    pub fn fill_polygon(&self, ring: &[Vec2D], mut paint: impl FnMut(i32, i32)) {
        let Some(bounds) = Rectangle::bounding_box(ring.iter().copied()) else {
            return;
        };
        let Some(area) = bounds.snap_to_grid().intersection(self.clip) else {
            return;
        };

        let mut crossings: Vec<f32> = vec![];
        for y in area.top_left().y..area.bottom_right().y {
            let scanline = y as f32 + 0.5;

            crossings.clear();
            crossings.extend(edges(ring).filter_map(|(from, to)| {
                let crosses = (from.y <= scanline && scanline < to.y)
                    || (to.y <= scanline && scanline < from.y);
                crosses.then(|| from.x + (scanline - from.y) * (to.x - from.x) / (to.y - from.y))
            }));
            crossings.sort_by(f32::total_cmp);

            for span in crossings.chunks_exact(2) {
                let start = ((span[0] - 0.5).ceil() as i32).max(area.top_left().x);
                let end = ((span[1] - 0.5).ceil() as i32).min(area.bottom_right().x);
                for x in start..end {
                    paint(x, y);
                }
            }
        }
    }

    /// Outline every edge of a closed ring
    pub fn stroke_polygon(&self, ring: &[Vec2D], paint: impl FnMut(i32, i32)) {
        let mut points = vec![];
        for (from, to) in edges(ring) {
            self.line(from.round_to_grid(), to.round_to_grid(), &mut points);
        }
        paint_unique(points, paint);
    }

    /// Every pixel within `radius` of `center`, measured between integer coordinates
    pub fn fill_circle(&self, center: Vec2D<i32>, radius: f32, mut paint: impl FnMut(i32, i32)) {
        if !(radius >= 0.) {
            return;
        }

        let reach = radius.floor() as i32;
        let bounds = Rectangle::from_corners(
            Vec2D::new(center.x.saturating_sub(reach), center.y.saturating_sub(reach)),
            Vec2D::new(
                center.x.saturating_add(reach).saturating_add(1),
                center.y.saturating_add(reach).saturating_add(1),
            ),
        );
        let Some(area) = bounds.intersection(self.clip) else {
            return;
        };

        let radius_squared = radius as f64 * radius as f64;
        for y in area.top_left().y..area.bottom_right().y {
            let dy = y as i64 - center.y as i64;
            for x in area.top_left().x..area.bottom_right().x {
                let dx = x as i64 - center.x as i64;
                if ((dx * dx + dy * dy) as f64) <= radius_squared {
                    paint(x, y);
                }
            }
        }
    }

    /// Midpoint circle outline on the rounded radius
    ///
    /// Every octant is walked along its minor axis, and only the part of the
    /// walk that can reach the clip area is visited.
    pub fn stroke_circle(&self, center: Vec2D<i32>, radius: f32, paint: impl FnMut(i32, i32)) {
        if !(radius >= 0.) {
            return;
        }

        let radius = radius.round() as i64;
        let (cx, cy) = (center.x as i64, center.y as i64);
        let (left, top) = (self.clip.top_left().x as i64, self.clip.top_left().y as i64);
        let (right, bottom) = (
            self.clip.bottom_right().x as i64,
            self.clip.bottom_right().y as i64,
        );
        let outside = cx + radius < left
            || cy + radius < top
            || cx - radius >= right
            || cy - radius >= bottom;
        if outside {
            return;
        }

        // In each octant one coordinate of the pixel is the center offset by +-minor
        let runs = [
            (top - cy, bottom - 1 - cy),
            (cy - (bottom - 1), cy - top),
            (left - cx, right - 1 - cx),
            (cx - (right - 1), cx - left),
        ];

        let radius_squared = (radius as f64) * (radius as f64);
        let mut points = vec![];
        for (first, last) in runs {
            for minor in first.max(0)..=last.min(radius) {
                let major = (radius_squared - (minor as f64) * (minor as f64))
                    .sqrt()
                    .round() as i64;
                if major < minor {
                    break;
                }

                for (dx, dy) in [
                    (major, minor),
                    (minor, major),
                    (-minor, major),
                    (-major, minor),
                    (-major, -minor),
                    (-minor, -major),
                    (minor, -major),
                    (major, -minor),
                ] {
                    self.push_clipped(cx + dx, cy + dy, &mut points);
                }
            }
        }
        paint_unique(points, paint);
    }

    /// Bresenham's line algorithm, including both endpoints
    ///
    /// The pixel at every step along the major axis is computed directly, so
    /// only the steps that land inside the clip area are visited.
    fn line(&self, from: Vec2D<i32>, to: Vec2D<i32>, points: &mut Vec<(i32, i32)>) {
        let clip_x = (
            self.clip.top_left().x as i64,
            self.clip.bottom_right().x as i64,
        );
        let clip_y = (
            self.clip.top_left().y as i64,
            self.clip.bottom_right().y as i64,
        );
        let (dx, dy) = (to.x as i64 - from.x as i64, to.y as i64 - from.y as i64);
        let x_major = dx.abs() >= dy.abs();

        let steps = if x_major {
            LineSteps::new((from.x as i64, dx, clip_x), (from.y as i64, dy, clip_y))
        } else {
            LineSteps::new((from.y as i64, dy, clip_y), (from.x as i64, dx, clip_x))
        };
        let Some(steps) = steps else {
            return;
        };

        for (major, minor) in steps.pixels() {
            if x_major {
                self.push_clipped(major, minor, points);
            } else {
                self.push_clipped(minor, major, points);
            }
        }
    }

    fn push_clipped(&self, x: i64, y: i64, points: &mut Vec<(i32, i32)>) {
        let (Ok(x), Ok(y)) = (i32::try_from(x), i32::try_from(y)) else {
            return;
        };
        if self.clip.contains_point(Vec2D::new(x, y)) {
            points.push((x, y));
        }
    }
}

/// A line walked one pixel at a time along its major axis
///
/// At step `i` the minor coordinate has moved by `round(i * minor_length / major_length)`
/// pixels, rounding halves up.
#[derive(Clone, Copy, Debug)]
struct LineSteps {
    major_start: i64,
    major_step: i64,
    minor_start: i64,
    minor_step: i64,
    major_length: i128,
    minor_length: i128,
    first: i128,
    last: i128,
}

impl LineSteps {
    /// Each axis is given as `(start, delta, (clip_start, clip_end))`
    ///
    /// Returns `None` if no step of the line lies inside the clip area.
    fn new(major: (i64, i64, (i64, i64)), minor: (i64, i64, (i64, i64))) -> Option<Self> {
        let (major_start, major_delta, major_clip) = major;
        let (minor_start, minor_delta, minor_clip) = minor;
        let major_length = major_delta.abs() as i128;
        let minor_length = minor_delta.abs() as i128;
        let major_step = if major_delta < 0 { -1 } else { 1 };
        let minor_step = if minor_delta < 0 { -1 } else { 1 };

        // Offsets along each axis that stay inside the clip area
        let offsets = |start: i64, step: i64, (clip_start, clip_end): (i64, i64)| {
            let low = clip_start as i128 - start as i128;
            let high = clip_end as i128 - 1 - start as i128;
            if step > 0 {
                (low, high)
            } else {
                (-high, -low)
            }
        };

        let (major_low, major_high) = offsets(major_start, major_step, major_clip);
        let (mut first, mut last) = (major_low.max(0), major_high.min(major_length));

        let (minor_low, minor_high) = offsets(minor_start, minor_step, minor_clip);
        let (minor_low, minor_high) = (minor_low.max(0), minor_high.min(minor_length));
        if minor_low > minor_high {
            return None;
        }

        if minor_length > 0 {
            // Smallest step whose minor offset is at least minor_low, and the
            // last step before the minor offset exceeds minor_high
            let denominator = 2 * minor_length;
            first = first.max(div_ceil(major_length * (2 * minor_low - 1), denominator));
            last = last.min(div_ceil(major_length * (2 * minor_high + 1), denominator) - 1);
        }

        (first <= last).then_some(Self {
            major_start,
            major_step,
            minor_start,
            minor_step,
            major_length,
            minor_length,
            first,
            last,
        })
    }

    fn pixels(self) -> impl Iterator<Item = (i64, i64)> {
        (self.first..=self.last).map(move |step| {
            let minor_offset = if self.major_length == 0 {
                0
            } else {
                (2 * step * self.minor_length + self.major_length) / (2 * self.major_length)
            };
            (
                self.major_start + self.major_step * step as i64,
                self.minor_start + self.minor_step * minor_offset as i64,
            )
        })
    }
}

/// `ceil(numerator / denominator)` for a positive denominator
fn div_ceil(numerator: i128, denominator: i128) -> i128 {
    -((-numerator).div_euclid(denominator))
}

/// Paint each point once, in row-major order
///
/// Outlines visit shared pixels more than once, which would otherwise blend
/// translucent colors twice.
fn paint_unique(mut points: Vec<(i32, i32)>, mut paint: impl FnMut(i32, i32)) {
    points.sort_unstable_by_key(|&(x, y)| (y, x));
    points.dedup();
    for (x, y) in points {
        paint(x, y);
    }
}

fn edges(ring: &[Vec2D]) -> impl Iterator<Item = (Vec2D, Vec2D)> + '_ {
    ring.iter()
        .copied()
        .zip(ring.iter().cycle().skip(1).copied())
}

fn shade(texture: Option<&TextureMapping<'_>>, color: Color, x: i32, y: i32) -> Color {
    texture.map_or(color, |texture| texture.color_at(x, y))
}

/// Maps buffer pixels onto the texture of a filled shape
struct TextureMapping<'a> {
    texture: &'a Texture,
    to_local: AffineTransform,
    bounds: Rectangle,
    texture_transform: TextureTransform,
    tint: Color,
}

impl<'a> TextureMapping<'a> {
    fn new(shape: &'a Shape, parent: AffineTransform, world: AffineTransform) -> Option<Self> {
        let texture: &Texture = shape.texture().filter(|texture| texture.is_valid())?;
        let texture_transform = *shape.texture_transform();

        let texture_space = if texture_transform.fixed {
            shape
                .transform()
                .to_matrix_without_rotation()
                .chain(parent)
        } else {
            world
        };

        let Some(to_local) = texture_space.inverse() else {
            log::debug!("Shape transform is degenerate, drawing it without its texture");
            return None;
        };

        let bounds = shape.geometry().bounding_box()?;
        if bounds.width() <= 0. || bounds.height() <= 0. {
            return None;
        }

        Some(Self {
            texture,
            to_local,
            bounds,
            texture_transform,
            tint: shape.color(),
        })
    }

    fn color_at(&self, x: i32, y: i32) -> Color {
        let local = self
            .to_local
            .apply_to(Vec2D::new(x as f32 + 0.5, y as f32 + 0.5));
        let uv = Vec2D::new(
            (local.x - self.bounds.top_left().x) / self.bounds.width(),
            (local.y - self.bounds.top_left().y) / self.bounds.height(),
        );
        let uv = self.texture_transform.apply(uv);

        self.texture.sample(uv.x, uv.y).multiply(self.tint)
    }
}
