//! The animated scenes that can be played on the panels

use std::sync::Arc;

use font::{BitmapFont, Font};
use image::Texture;
use math::{Angle, Bitmap, Color, Vec2D};
use render::{
    Collider, FrameBuffer, RegularPolygonSize, RenderError, Renderer, Scene, SceneError, Shape,
    ShapeError, ShapeId,
};
use settings::SceneKind;

#[derive(Debug, thiserror::Error)]
pub enum SceneBuildError {
    #[error("invalid shape")]
    Shape(#[from] ShapeError),

    #[error("invalid scene graph")]
    Scene(#[from] SceneError),
}

/// An animation that draws one frame at a time
pub trait Demo {
    /// Advance the animation to `frame` and draw it on top of `frame_buffer`
    fn draw(
        &mut self,
        frame: u64,
        renderer: &Renderer,
        frame_buffer: &mut FrameBuffer,
    ) -> Result<(), RenderError>;
}

/// Build one of the demo scenes for a display of the given size
///
/// `texture` replaces the built-in checkerboard texture.
pub fn build(
    kind: SceneKind,
    width: usize,
    height: usize,
    texture: Option<Arc<Texture>>,
) -> Result<Box<dyn Demo>, SceneBuildError> {
    let texture =
        texture.unwrap_or_else(|| Arc::new(checkerboard(8, Color::WHITE, Color::MAGENTA)));
    let size = Vec2D::new(width as f32, height as f32);

    let demo: Box<dyn Demo> = match kind {
        SceneKind::Shapes => Box::new(Shapes::new(size, texture)?),
        SceneKind::SolarSystem => Box::new(SolarSystem::new(size, texture)?),
        SceneKind::Collision => Box::new(Collision::new(size)?),
        SceneKind::Text => Box::new(Text::new(size)?),
    };
    Ok(demo)
}

fn checkerboard(tile: usize, a: Color, b: Color) -> Texture {
    let size = tile * 2;
    let pixels = (0..size * size)
        .map(|index| {
            let (x, y) = (index % size, index / size);
            if (x / tile + y / tile) % 2 == 0 {
                a
            } else {
                b
            }
        })
        .collect();
    Texture::from_pixels(Bitmap::from_data(pixels, size, size))
}

fn group(
    scene: &mut Scene,
    position: Vec2D,
    children: &[ShapeId],
) -> Result<ShapeId, SceneBuildError> {
    let collection = scene.insert(Shape::collection(position)?);
    for &child in children {
        scene.add_child(collection, child)?;
    }
    Ok(collection)
}

/// Rotate a shape, ignoring ids that are no longer part of the scene
fn spin(scene: &mut Scene, id: ShapeId, degrees: f32) {
    if let Some(shape) = scene.get_mut(id) {
        shape.rotate(Angle::from_degrees(degrees));
    }
}

/// One shape of every kind, each spinning around its own pivot
struct Shapes {
    scene: Scene,
    root: ShapeId,
    spinning: Vec<(ShapeId, f32)>,
    pulse: ShapeId,
}

impl Shapes {
    fn new(size: Vec2D, texture: Arc<Texture>) -> Result<Self, SceneBuildError> {
        let mut scene = Scene::new();
        let unit = size.x.min(size.y) / 64.;
        let column = |n: f32| size.x * n / 4.;
        let row = |n: f32| size.y * n / 4.;

        let mut textured = Shape::rectangle(
            Vec2D::new(column(1.) - 8. * unit, row(1.) - 8. * unit),
            16. * unit,
            16. * unit,
        )?
        .with_color(Color::WHITE)
        .filled(true);
        textured.set_pivot(8. * unit, 8. * unit);
        textured.set_texture(texture);
        textured.set_texture_scale(2., 2.);

        let triangle = Shape::regular_polygon(
            Vec2D::new(column(3.), row(1.)),
            3,
            RegularPolygonSize::Radius(9. * unit),
        )?
        .with_color(Color::GREEN)
        .filled(true);

        let hexagon = Shape::regular_polygon(
            Vec2D::new(column(1.), row(3.)),
            6,
            RegularPolygonSize::SideLength(7. * unit),
        )?
        .with_color(Color::CYAN);

        let star = Shape::polygon(
            Vec2D::new(column(3.), row(3.)),
            (0..10)
                .map(|index| {
                    let radius = if index % 2 == 0 { 9. * unit } else { 4. * unit };
                    let angle = Angle::from_degrees(index as f32 * 36. - 90.);
                    Vec2D::new(angle.cos() * radius, angle.sin() * radius)
                })
                .collect(),
        )?
        .with_color(Color::YELLOW)
        .filled(true);

        let line = Shape::line_segment(
            Vec2D::new(size.x / 2., row(1.) - 10. * unit),
            Vec2D::new(size.x / 2., row(3.) + 10. * unit),
        )?
        .with_color(Color::rgba(255, 255, 255, 0.5))
        .with_z(-1.);

        let pulse = Shape::circle(Vec2D::new(size.x / 2., size.y / 2.), 3. * unit)?
            .with_color(Color::RED)
            .filled(true)
            .with_z(1.);

        let center = Shape::point(Vec2D::new(size.x / 2., size.y / 2.))?
            .with_color(Color::WHITE)
            .with_z(2.);

        let ids = [
            scene.insert(textured),
            scene.insert(triangle),
            scene.insert(hexagon),
            scene.insert(star),
            scene.insert(line),
            scene.insert(pulse),
            scene.insert(center),
        ];
        let root = group(&mut scene, Vec2D::ORIGIN, &ids)?;

        Ok(Self {
            scene,
            root,
            spinning: vec![(ids[0], 2.), (ids[1], -3.), (ids[2], 1.5), (ids[3], 4.)],
            pulse: ids[5],
        })
    }
}

impl Demo for Shapes {
    fn draw(
        &mut self,
        frame: u64,
        renderer: &Renderer,
        frame_buffer: &mut FrameBuffer,
    ) -> Result<(), RenderError> {
        for &(id, speed) in &self.spinning {
            spin(&mut self.scene, id, speed);
        }

        if let Some(pulse) = self.scene.get_mut(self.pulse) {
            let scale = 1. + 0.5 * (frame as f32 * 0.15).sin();
            pulse.set_scale(scale, scale);
        }

        renderer.render(&self.scene, self.root, frame_buffer)
    }
}

/// Planets orbiting a sun, the moon orbits the earth
///
/// Every orbit is a collection rotating around its origin, so the planets
/// inherit the rotation of their orbit.
struct SolarSystem {
    scene: Scene,
    root: ShapeId,
    orbits: Vec<(ShapeId, f32)>,
}

impl SolarSystem {
    fn new(size: Vec2D, texture: Arc<Texture>) -> Result<Self, SceneBuildError> {
        let mut scene = Scene::new();
        let center = Vec2D::new(size.x / 2., size.y / 2.);
        let unit = size.x.min(size.y) / 64.;

        let mut sun = Shape::circle(center, 6. * unit)?
            .with_color(Color::YELLOW)
            .filled(true);
        sun.set_texture(texture);
        sun.set_fixed_texture(true);
        let sun = scene.insert(sun);

        let earth_ring = scene.insert(
            Shape::circle(center, 20. * unit)?
                .with_color(Color::rgba(255, 255, 255, 0.15))
                .with_z(-1.),
        );
        let mars_ring = scene.insert(
            Shape::circle(center, 28. * unit)?
                .with_color(Color::rgba(255, 255, 255, 0.15))
                .with_z(-1.),
        );

        let moon = scene.insert(
            Shape::circle(Vec2D::new(6. * unit, 0.), unit)?
                .with_color(Color::WHITE)
                .filled(true),
        );
        let moon_orbit = group(&mut scene, Vec2D::new(20. * unit, 0.), &[moon])?;

        let earth = scene.insert(
            Shape::circle(Vec2D::new(20. * unit, 0.), 3. * unit)?
                .with_color(Color::BLUE)
                .filled(true),
        );
        let earth_orbit = group(&mut scene, center, &[earth, moon_orbit])?;

        let mars = scene.insert(
            Shape::regular_polygon(
                Vec2D::new(28. * unit, 0.),
                5,
                RegularPolygonSize::Radius(2. * unit),
            )?
            .with_color(Color::RED)
            .filled(true),
        );
        let mars_orbit = group(&mut scene, center, &[mars])?;

        let root = group(
            &mut scene,
            Vec2D::ORIGIN,
            &[earth_ring, mars_ring, sun, earth_orbit, mars_orbit],
        )?;

        Ok(Self {
            scene,
            root,
            orbits: vec![
                (sun, 1.),
                (earth_orbit, 2.),
                (moon_orbit, 6.),
                (mars_orbit, 1.2),
            ],
        })
    }
}

impl Demo for SolarSystem {
    fn draw(
        &mut self,
        _frame: u64,
        renderer: &Renderer,
        frame_buffer: &mut FrameBuffer,
    ) -> Result<(), RenderError> {
        for &(id, speed) in &self.orbits {
            spin(&mut self.scene, id, speed);
        }
        renderer.render(&self.scene, self.root, frame_buffer)
    }
}

/// A ball bouncing between the walls and a rotating bar
///
/// Shapes turn red while they intersect.
struct Collision {
    scene: Scene,
    root: ShapeId,
    ball: ShapeId,
    bar: ShapeId,
    velocity: Vec2D,
    bounds: Vec2D,
}

impl Collision {
    const BALL_RADIUS: f32 = 4.;

    fn new(size: Vec2D) -> Result<Self, SceneBuildError> {
        let mut scene = Scene::new();

        let ball = scene.insert(
            Shape::circle(Vec2D::new(Self::BALL_RADIUS, size.y / 3.), Self::BALL_RADIUS)?
                .filled(true)
                .with_collider(Collider::Outline)?,
        );

        let mut bar =
            Shape::rectangle(Vec2D::new(size.x / 2. - 12., size.y / 2. - 2.), 24., 4.)?
                .filled(true)
                .with_collider(Collider::Outline)?;
        bar.set_pivot(12., 2.);
        let bar = scene.insert(bar);

        let root = group(&mut scene, Vec2D::ORIGIN, &[bar, ball])?;

        Ok(Self {
            scene,
            root,
            ball,
            bar,
            velocity: Vec2D::new(1.3, 0.9),
            bounds: size,
        })
    }

    fn step(&mut self) {
        spin(&mut self.scene, self.bar, 3.);

        let Some(ball) = self.scene.get_mut(self.ball) else {
            return;
        };

        let mut position = ball.position() + self.velocity;
        let min = Self::BALL_RADIUS;
        let max = self.bounds - Vec2D::new(Self::BALL_RADIUS, Self::BALL_RADIUS);
        if position.x < min || position.x > max.x {
            self.velocity.x = -self.velocity.x;
            position.x = position.x.clamp(min, max.x);
        }
        if position.y < min || position.y > max.y {
            self.velocity.y = -self.velocity.y;
            position.y = position.y.clamp(min, max.y);
        }
        ball.set_position(position.x, position.y);

        let color = if self.scene.intersects(self.ball, self.bar) {
            Color::RED
        } else {
            Color::GREEN
        };
        for id in [self.ball, self.bar] {
            if let Some(shape) = self.scene.get_mut(id) {
                shape.set_color(color);
            }
        }
    }
}

impl Demo for Collision {
    fn draw(
        &mut self,
        _frame: u64,
        renderer: &Renderer,
        frame_buffer: &mut FrameBuffer,
    ) -> Result<(), RenderError> {
        self.step();
        renderer.render(&self.scene, self.root, frame_buffer)
    }
}

/// A scrolling headline above a frame counter
struct Text {
    scene: Scene,
    frame: ShapeId,
    font: BitmapFont,
    width: i32,
}

impl Text {
    const HEADLINE: &'static str = "Hello from the LED panel!";

    fn new(size: Vec2D) -> Result<Self, SceneBuildError> {
        let mut scene = Scene::new();
        let frame = scene.insert(
            Shape::rectangle(Vec2D::ORIGIN, size.x - 1., size.y - 1.)?
                .with_color(Color::rgba(0, 255, 255, 0.5)),
        );

        Ok(Self {
            scene,
            frame,
            font: BitmapFont::new(),
            width: size.x as i32,
        })
    }
}

impl Demo for Text {
    fn draw(
        &mut self,
        frame: u64,
        renderer: &Renderer,
        frame_buffer: &mut FrameBuffer,
    ) -> Result<(), RenderError> {
        renderer.render(&self.scene, self.frame, frame_buffer)?;

        let headline_width = self.font.text_width(Self::HEADLINE) as i32;
        let period = (self.width + headline_width).max(1) as u64;
        let x = self.width - (frame % period) as i32;
        renderer.draw_text(
            frame_buffer,
            Self::HEADLINE,
            x,
            4,
            &self.font,
            Color::YELLOW,
            false,
        );

        renderer.draw_text(
            frame_buffer,
            &format!("frame {frame}"),
            2,
            16,
            &self.font,
            Color::WHITE,
            true,
        );
        Ok(())
    }
}
