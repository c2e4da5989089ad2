use std::{f32::consts::PI, sync::Arc};

use image::Texture;
use math::{AffineTransform, Angle, Color, Rectangle, Vec2D};

use crate::{ShapeId, TextureTransform, Transform};

#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum ShapeError {
    #[error("dimensions must be positive, got {0}")]
    NonPositiveDimension(f32),

    #[error("polygons need at least 3 vertices, got {0}")]
    TooFewVertices(usize),

    #[error("regular polygons need at least 3 sides, got {0}")]
    TooFewSides(usize),

    #[error("geometry contains non-finite values")]
    NonFiniteInput,

    #[error("exactly one of radius and side length must be given")]
    ConflictingParameters,
}

/// The size of a regular polygon, given either by its circumradius or its side length
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RegularPolygonSize {
    Radius(f32),
    SideLength(f32),
}

/// Loosely specified regular polygon parameters, as they come from a
/// configuration file or script
///
/// Exactly one of `radius` and `side_length` must be set.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RegularPolygonParams {
    pub sides: usize,
    pub radius: Option<f32>,
    pub side_length: Option<f32>,
}

impl TryFrom<RegularPolygonParams> for RegularPolygonSize {
    type Error = ShapeError;

    fn try_from(params: RegularPolygonParams) -> Result<Self, Self::Error> {
        match (params.radius, params.side_length) {
            (Some(radius), None) => Ok(Self::Radius(radius)),
            (None, Some(side_length)) => Ok(Self::SideLength(side_length)),
            _ => Err(ShapeError::ConflictingParameters),
        }
    }
}

/// Side length of a regular polygon with `sides` corners on a circle of radius `radius`
#[must_use]
pub fn regular_polygon_side_length(sides: usize, radius: f32) -> f32 {
    2. * radius * (PI / sides as f32).sin()
}

/// Circumradius of a regular polygon with `sides` sides of length `side_length`
#[must_use]
pub fn regular_polygon_radius(sides: usize, side_length: f32) -> f32 {
    side_length / (2. * (PI / sides as f32).sin())
}

/// The geometry of a shape, in the shape's local coordinate system
#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    Point,

    /// A line from the local origin to `end`
    LineSegment { end: Vec2D },

    /// A circle centered on the local origin
    Circle { radius: f32 },

    /// Spans `[0, width) x [0, height)` from the local origin
    Rectangle { width: f32, height: f32 },

    /// Vertices relative to the local origin
    Polygon { vertices: Vec<Vec2D> },

    /// Centered on the local origin, the first vertex points straight up
    RegularPolygon { sides: usize, radius: f32 },

    /// Draws nothing itself, but carries the transform of its children
    ///
    /// Children are managed through the [Scene](crate::Scene).
    Collection { children: Vec<ShapeId> },
}

impl Geometry {
    /// Whether the geometry encloses an area that can be filled
    #[must_use]
    pub fn is_closed(&self) -> bool {
        matches!(
            self,
            Self::Circle { .. }
                | Self::Rectangle { .. }
                | Self::Polygon { .. }
                | Self::RegularPolygon { .. }
        )
    }

    /// The outline of polygonal geometry as a closed ring of vertices
    ///
    /// Returns `None` for points, lines, circles and collections.
    #[must_use]
    pub fn vertex_ring(&self) -> Option<Vec<Vec2D>> {
        match self {
            Self::Rectangle { width, height } => Some(vec![
                Vec2D::ORIGIN,
                Vec2D::new(*width, 0.),
                Vec2D::new(*width, *height),
                Vec2D::new(0., *height),
            ]),
            Self::Polygon { vertices } => Some(vertices.clone()),
            Self::RegularPolygon { sides, radius } => Some(
                (0..*sides)
                    .map(|k| {
                        let phi = 2. * PI * k as f32 / *sides as f32 - PI / 2.;
                        Vec2D::new(radius * phi.cos(), radius * phi.sin())
                    })
                    .collect(),
            ),
            _ => None,
        }
    }

    /// The local axis-aligned bounds, used to map textures onto the shape
    #[must_use]
    pub fn bounding_box(&self) -> Option<Rectangle> {
        match self {
            Self::Point | Self::Collection { .. } => None,
            Self::LineSegment { end } => Rectangle::bounding_box([Vec2D::ORIGIN, *end]),
            Self::Circle { radius } => Some(Rectangle::from_corners(
                Vec2D::new(-radius, -radius),
                Vec2D::new(*radius, *radius),
            )),
            Self::Rectangle { width, height } => Some(Rectangle::from_position_and_size(
                Vec2D::ORIGIN,
                *width,
                *height,
            )),
            Self::Polygon { .. } | Self::RegularPolygon { .. } => {
                Rectangle::bounding_box(self.vertex_ring().unwrap_or_default())
            },
        }
    }
}

/// What is used when testing a shape for intersections
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Collider {
    /// The shape's own geometry
    #[default]
    Outline,

    /// A circle around the local origin
    Circle { radius: f32 },

    /// A polygon in local coordinates
    Polygon { vertices: Vec<Vec2D> },
}

impl Collider {
    fn validated(self) -> Result<Self, ShapeError> {
        match &self {
            Self::Outline => {},
            Self::Circle { radius } => {
                check_dimension(*radius)?;
            },
            Self::Polygon { vertices } => {
                if vertices.len() < 3 {
                    return Err(ShapeError::TooFewVertices(vertices.len()));
                }
                if !vertices.iter().all(Vec2D::is_finite) {
                    return Err(ShapeError::NonFiniteInput);
                }
            },
        }
        Ok(self)
    }
}

/// A drawable primitive together with its transform and style
#[derive(Clone, Debug)]
pub struct Shape {
    geometry: Geometry,
    transform: Transform,
    color: Color,
    z: f32,
    fill: bool,
    texture: Option<Arc<Texture>>,
    texture_transform: TextureTransform,
    collider: Option<Collider>,
}

fn check_dimension(value: f32) -> Result<f32, ShapeError> {
    if !value.is_finite() {
        return Err(ShapeError::NonFiniteInput);
    }
    if value <= 0. {
        return Err(ShapeError::NonPositiveDimension(value));
    }
    Ok(value)
}

fn check_point(point: Vec2D) -> Result<Vec2D, ShapeError> {
    if point.is_finite() {
        Ok(point)
    } else {
        Err(ShapeError::NonFiniteInput)
    }
}

impl Shape {
    fn new(geometry: Geometry, position: Vec2D) -> Result<Self, ShapeError> {
        let position = check_point(position)?;

        Ok(Self {
            geometry,
            transform: Transform::new(position),
            color: Color::default(),
            z: 0.,
            fill: false,
            texture: None,
            texture_transform: TextureTransform::default(),
            collider: None,
        })
    }

    pub fn point(position: Vec2D) -> Result<Self, ShapeError> {
        Self::new(Geometry::Point, position)
    }

    /// A line from `from` to `to`, both given in the parent's coordinate system
    pub fn line_segment(from: Vec2D, to: Vec2D) -> Result<Self, ShapeError> {
        let end = check_point(to)? - check_point(from)?;
        Self::new(Geometry::LineSegment { end }, from)
    }

    pub fn circle(center: Vec2D, radius: f32) -> Result<Self, ShapeError> {
        let radius = check_dimension(radius)?;
        Self::new(Geometry::Circle { radius }, center)
    }

    pub fn rectangle(top_left: Vec2D, width: f32, height: f32) -> Result<Self, ShapeError> {
        let width = check_dimension(width)?;
        let height = check_dimension(height)?;
        Self::new(Geometry::Rectangle { width, height }, top_left)
    }

    /// A polygon whose vertices are relative to `position`
    pub fn polygon(position: Vec2D, vertices: Vec<Vec2D>) -> Result<Self, ShapeError> {
        if vertices.len() < 3 {
            return Err(ShapeError::TooFewVertices(vertices.len()));
        }
        if !vertices.iter().all(Vec2D::is_finite) {
            return Err(ShapeError::NonFiniteInput);
        }
        Self::new(Geometry::Polygon { vertices }, position)
    }

    pub fn regular_polygon(
        center: Vec2D,
        sides: usize,
        size: RegularPolygonSize,
    ) -> Result<Self, ShapeError> {
        if sides < 3 {
            return Err(ShapeError::TooFewSides(sides));
        }

        let radius = match size {
            RegularPolygonSize::Radius(radius) => check_dimension(radius)?,
            RegularPolygonSize::SideLength(side_length) => {
                regular_polygon_radius(sides, check_dimension(side_length)?)
            },
        };
        Self::new(Geometry::RegularPolygon { sides, radius }, center)
    }

    /// An empty collection, children are added with [Scene::add_child](crate::Scene::add_child)
    pub fn collection(position: Vec2D) -> Result<Self, ShapeError> {
        Self::new(Geometry::Collection { children: vec![] }, position)
    }

    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    #[must_use]
    pub fn with_z(mut self, z: f32) -> Self {
        self.set_z(z);
        self
    }

    #[must_use]
    pub fn filled(mut self, fill: bool) -> Self {
        self.fill = fill;
        self
    }

    pub fn with_collider(mut self, collider: Collider) -> Result<Self, ShapeError> {
        self.add_collider(collider)?;
        Ok(self)
    }

    #[inline]
    #[must_use]
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut Vec<ShapeId>> {
        match &mut self.geometry {
            Geometry::Collection { children } => Some(children),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    #[inline]
    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    /// The matrix mapping local coordinates into the parent's coordinate system
    #[inline]
    #[must_use]
    pub fn local_matrix(&self) -> AffineTransform {
        self.transform.to_matrix()
    }

    #[inline]
    #[must_use]
    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    #[inline]
    #[must_use]
    pub fn z(&self) -> f32 {
        self.z
    }

    pub fn set_z(&mut self, z: f32) {
        if z.is_finite() {
            self.z = z;
        } else {
            log::warn!("Ignoring non-finite z index {z}");
        }
    }

    /// Whether closed geometry is filled instead of outlined
    #[inline]
    #[must_use]
    pub fn is_filled(&self) -> bool {
        self.fill
    }

    pub fn set_fill(&mut self, fill: bool) {
        self.fill = fill;
    }

    #[must_use]
    pub fn texture(&self) -> Option<&Arc<Texture>> {
        self.texture.as_ref()
    }

    pub fn set_texture(&mut self, texture: Arc<Texture>) {
        self.texture = Some(texture);
    }

    pub fn remove_texture(&mut self) {
        self.texture = None;
    }

    #[must_use]
    pub fn texture_transform(&self) -> &TextureTransform {
        &self.texture_transform
    }

    pub fn texture_transform_mut(&mut self) -> &mut TextureTransform {
        &mut self.texture_transform
    }

    pub fn set_texture_offset(&mut self, x: f32, y: f32) {
        self.texture_transform.offset = Vec2D::new(x, y);
    }

    pub fn set_texture_scale(&mut self, x: f32, y: f32) {
        self.texture_transform.scale = Vec2D::new(x, y);
    }

    pub fn set_texture_rotation(&mut self, rotation: Angle) {
        self.texture_transform.rotation = rotation.normalized();
    }

    pub fn set_fixed_texture(&mut self, fixed: bool) {
        self.texture_transform.fixed = fixed;
    }

    #[must_use]
    pub fn collider(&self) -> Option<&Collider> {
        self.collider.as_ref()
    }

    pub fn add_collider(&mut self, collider: Collider) -> Result<(), ShapeError> {
        self.collider = Some(collider.validated()?);
        Ok(())
    }

    pub fn remove_collider(&mut self) {
        self.collider = None;
    }

    // Transform shortcuts

    pub fn set_position(&mut self, x: f32, y: f32) {
        self.transform.set_position(x, y);
    }

    pub fn set_x(&mut self, x: f32) {
        self.transform.set_x(x);
    }

    pub fn set_y(&mut self, y: f32) {
        self.transform.set_y(y);
    }

    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.transform.translate(dx, dy);
    }

    pub fn rotate(&mut self, angle: Angle) {
        self.transform.rotate(angle);
    }

    pub fn set_rotation_angle(&mut self, angle: Angle) {
        self.transform.set_rotation_angle(angle);
    }

    pub fn set_scale(&mut self, scale_x: f32, scale_y: f32) {
        self.transform.set_scale(scale_x, scale_y);
    }

    pub fn set_scale_about(&mut self, scale_x: f32, scale_y: f32, origin: Vec2D) {
        self.transform.set_scale_about(scale_x, scale_y, origin);
    }

    pub fn set_scale_x(&mut self, scale_x: f32) {
        self.transform.set_scale_x(scale_x);
    }

    pub fn set_scale_y(&mut self, scale_y: f32) {
        self.transform.set_scale_y(scale_y);
    }

    pub fn set_pivot(&mut self, x: f32, y: f32) {
        self.transform.set_pivot(x, y);
    }

    #[must_use]
    pub fn position(&self) -> Vec2D {
        self.transform.position()
    }

    #[must_use]
    pub fn x(&self) -> f32 {
        self.transform.x()
    }

    #[must_use]
    pub fn y(&self) -> f32 {
        self.transform.y()
    }

    #[must_use]
    pub fn rotation_angle(&self) -> Angle {
        self.transform.rotation_angle()
    }

    #[must_use]
    pub fn scale_x(&self) -> f32 {
        self.transform.scale_x()
    }

    #[must_use]
    pub fn scale_y(&self) -> f32 {
        self.transform.scale_y()
    }

    #[must_use]
    pub fn pivot(&self) -> Vec2D {
        self.transform.pivot()
    }
}
