use std::collections::HashSet;

use font::Font;
use math::{AffineTransform, Color, Vec2D};

use crate::{FrameBuffer, Rasterizer, Scene, ShapeId};

/// Largest supported width and height
const MAX_SIZE: usize = 512;

/// Used when the requested size is not supported
const FALLBACK_SIZE: usize = 64;

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("{0:?} does not refer to a shape in the scene")]
    UnknownShape(ShapeId),

    #[error("{0:?} is reachable more than once, the scene graph contains a cycle")]
    Cycle(ShapeId),
}

/// A shape that is ready to be rasterized
#[derive(Clone, Copy, Debug)]
struct DrawCommand {
    id: ShapeId,
    parent_transform: AffineTransform,
    z: f32,
}

/// Draws scene graphs into [FrameBuffers](FrameBuffer)
#[derive(Clone, Copy, Debug)]
pub struct Renderer {
    width: usize,
    height: usize,
}

impl Renderer {
    /// Create a renderer for a display of the given size
    ///
    /// Sizes outside of `1..=512` are replaced by `64x64`.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        let valid = |size: usize| (1..=MAX_SIZE).contains(&size);
        if !valid(width) || !valid(height) {
            log::warn!(
                "Unsupported renderer size {width}x{height}, using {FALLBACK_SIZE}x{FALLBACK_SIZE}"
            );
            return Self {
                width: FALLBACK_SIZE,
                height: FALLBACK_SIZE,
            };
        }

        Self { width, height }
    }

    #[inline]
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    fn rasterizer_for(&self, frame_buffer: &FrameBuffer) -> Rasterizer {
        Rasterizer::new(
            self.width.min(frame_buffer.width()),
            self.height.min(frame_buffer.height()),
        )
    }

    /// Draw `root` and everything below it on top of the current buffer contents
    ///
    /// Shapes are drawn in ascending `z` order, shapes with equal `z` in
    /// depth-first order. The buffer is not cleared first. If the scene
    /// graph can't be traversed nothing is drawn.
    pub fn render(
        &self,
        scene: &Scene,
        root: ShapeId,
        frame_buffer: &mut FrameBuffer,
    ) -> Result<(), RenderError> {
        let mut commands = self.collect(scene, root)?;

        // sort_by is stable, so equal z keeps traversal order
        commands.sort_by(|a, b| a.z.total_cmp(&b.z));

        let rasterizer = self.rasterizer_for(frame_buffer);
        for command in commands {
            let Some(shape) = scene.get(command.id) else {
                return Err(RenderError::UnknownShape(command.id));
            };

            rasterizer.rasterize(shape, command.parent_transform, |x, y, color| {
                frame_buffer.blend_pixel(x, y, color);
            });
        }
        Ok(())
    }

    fn collect(&self, scene: &Scene, root: ShapeId) -> Result<Vec<DrawCommand>, RenderError> {
        let mut commands = vec![];
        let mut visited = HashSet::new();
        let root_transform = scene
            .parent_transform(root)
            .map_err(|_| RenderError::UnknownShape(root))?;
        let mut stack = vec![(root, root_transform)];

        while let Some((id, parent_transform)) = stack.pop() {
            if !visited.insert(id) {
                log::error!("Shape {id:?} was visited twice while rendering");
                return Err(RenderError::Cycle(id));
            }

            let shape = scene.get(id).ok_or(RenderError::UnknownShape(id))?;
            commands.push(DrawCommand {
                id,
                parent_transform,
                z: shape.z(),
            });

            let world = shape.local_matrix().chain(parent_transform);
            stack.extend(scene.children(id).iter().rev().map(|&child| (child, world)));
        }

        Ok(commands)
    }

    /// Draw a string using the glyphs of `font`, starting with the top left corner at `(x, y)`
    ///
    /// `'\n'` starts a new line. With `wrap` set, a glyph that would not fit
    /// onto the current line is moved to the next one, unless it is the first
    /// glyph on its line. Returns the cursor position after the last glyph.
    pub fn draw_text<F: Font + ?Sized>(
        &self,
        frame_buffer: &mut FrameBuffer,
        text: &str,
        x: i32,
        y: i32,
        font: &F,
        color: Color,
        wrap: bool,
    ) -> Vec2D<i32> {
        let clip = self.rasterizer_for(frame_buffer).clip();
        let line_height = font.height() as i32;
        let mut cursor = Vec2D::new(x, y);

        for character in text.chars() {
            if character == '\n' {
                cursor = Vec2D::new(x, cursor.y + line_height);
                continue;
            }

            let width = font.char_width(character) as i32;
            if wrap && cursor.x != x && cursor.x + width > clip.width() {
                cursor = Vec2D::new(x, cursor.y + line_height);
            }

            for glyph_y in 0..font.height() {
                for glyph_x in 0..font.char_width(character) {
                    if !font.glyph_pixel(character, glyph_x, glyph_y) {
                        continue;
                    }

                    let pixel = Vec2D::new(cursor.x + glyph_x as i32, cursor.y + glyph_y as i32);
                    if clip.contains_point(pixel) {
                        frame_buffer.blend_pixel(pixel.x, pixel.y, color);
                    }
                }
            }

            cursor.x += width + font.char_spacing(character) as i32;
        }

        cursor
    }
}

#[cfg(test)]
mod tests {
    use super::{RenderError, Renderer};
    use crate::{FrameBuffer, Scene, Shape};
    use font::{BitmapFont, Font};
    use math::{Angle, Color, Vec2D};

    #[test]
    fn unsupported_sizes_fall_back() {
        let renderer = Renderer::new(0, 32);
        assert_eq!((renderer.width(), renderer.height()), (64, 64));

        let renderer = Renderer::new(513, 10);
        assert_eq!((renderer.width(), renderer.height()), (64, 64));

        let renderer = Renderer::new(128, 32);
        assert_eq!((renderer.width(), renderer.height()), (128, 32));
    }

    #[test]
    fn higher_z_is_drawn_on_top() {
        let mut scene = Scene::new();
        let root = scene.insert(Shape::collection(Vec2D::ORIGIN).unwrap());
        let top = scene.insert(
            Shape::rectangle(Vec2D::ORIGIN, 4., 4.)
                .unwrap()
                .with_color(Color::RED)
                .with_z(2.)
                .filled(true),
        );
        let bottom = scene.insert(
            Shape::rectangle(Vec2D::ORIGIN, 4., 4.)
                .unwrap()
                .with_color(Color::BLUE)
                .filled(true),
        );
        scene.add_child(root, top).unwrap();
        scene.add_child(root, bottom).unwrap();

        let mut buffer = FrameBuffer::new(8, 8);
        Renderer::new(8, 8).render(&scene, root, &mut buffer).unwrap();
        assert_eq!(buffer.get_pixel(1, 1), Some(Color::RED));
    }

    #[test]
    fn equal_z_keeps_insertion_order() {
        let mut scene = Scene::new();
        let root = scene.insert(Shape::collection(Vec2D::ORIGIN).unwrap());
        for color in [Color::RED, Color::GREEN, Color::BLUE] {
            let square = scene.insert(
                Shape::rectangle(Vec2D::ORIGIN, 2., 2.)
                    .unwrap()
                    .with_color(color)
                    .filled(true),
            );
            scene.add_child(root, square).unwrap();
        }

        let mut buffer = FrameBuffer::new(4, 4);
        Renderer::new(4, 4).render(&scene, root, &mut buffer).unwrap();
        assert_eq!(buffer.get_pixel(0, 0), Some(Color::BLUE));
    }

    #[test]
    fn render_does_not_clear() {
        let mut scene = Scene::new();
        let dot = scene.insert(Shape::point(Vec2D::new(1., 1.)).unwrap().with_color(Color::RED));

        let mut buffer = FrameBuffer::new(4, 4);
        buffer.set_pixel(3, 3, Color::GREEN);
        Renderer::new(4, 4).render(&scene, dot, &mut buffer).unwrap();

        assert_eq!(buffer.get_pixel(3, 3), Some(Color::GREEN));
        assert_eq!(buffer.get_pixel(1, 1), Some(Color::RED));
        assert_eq!(buffer.get_pixel(0, 0), Some(Color::TRANSPARENT));
    }

    #[test]
    fn translucent_shapes_blend() {
        let mut scene = Scene::new();
        let root = scene.insert(
            Shape::rectangle(Vec2D::ORIGIN, 2., 2.)
                .unwrap()
                .with_color(Color::rgba(255, 0, 0, 0.5))
                .filled(true),
        );

        let mut buffer = FrameBuffer::new(2, 2);
        buffer.clear_with(Color::rgb(0, 0, 254));
        Renderer::new(2, 2).render(&scene, root, &mut buffer).unwrap();
        assert_eq!(buffer.get_pixel(0, 0), Some(Color::rgb(128, 0, 127)));
    }

    #[test]
    fn collection_rotates_children_around_pivot() {
        let mut scene = Scene::new();
        let mut group = Shape::collection(Vec2D::ORIGIN).unwrap();
        group.set_pivot(32., 32.);
        group.rotate(Angle::from_degrees(90.));
        let group = scene.insert(group);
        let dot = scene.insert(Shape::point(Vec2D::new(52., 32.)).unwrap().with_color(Color::WHITE));
        scene.add_child(group, dot).unwrap();

        let mut buffer = FrameBuffer::new(64, 64);
        Renderer::new(64, 64).render(&scene, group, &mut buffer).unwrap();

        assert_eq!(buffer.get_pixel(32, 52), Some(Color::WHITE));
        assert_eq!(buffer.covered_pixels().count(), 1);
    }

    #[test]
    fn renders_into_smaller_buffers() {
        let mut scene = Scene::new();
        let root = scene.insert(
            Shape::rectangle(Vec2D::ORIGIN, 64., 64.)
                .unwrap()
                .with_color(Color::WHITE)
                .filled(true),
        );

        let mut buffer = FrameBuffer::new(16, 8);
        Renderer::new(64, 64).render(&scene, root, &mut buffer).unwrap();
        assert_eq!(buffer.covered_pixels().count(), 16 * 8);
    }

    #[test]
    fn dangling_root_is_an_error() {
        let mut scene = Scene::new();
        let root = scene.insert(Shape::point(Vec2D::ORIGIN).unwrap());
        scene.remove(root).unwrap();

        let mut buffer = FrameBuffer::new(4, 4);
        assert_eq!(
            Renderer::new(4, 4).render(&scene, root, &mut buffer),
            Err(RenderError::UnknownShape(root))
        );
    }

    #[test]
    fn text_advances_the_cursor() {
        let font = BitmapFont::new();
        let renderer = Renderer::new(64, 16);
        let mut buffer = FrameBuffer::new(64, 16);

        let cursor = renderer.draw_text(&mut buffer, "HI", 1, 2, &font, Color::WHITE, false);
        assert_eq!(cursor, Vec2D::new(1 + 6 + 4, 2));

        // Top left corner of the 'H'
        assert_eq!(buffer.get_pixel(1, 2), Some(Color::WHITE));
        assert_eq!(buffer.get_pixel(2, 2), Some(Color::TRANSPARENT));
    }

    #[test]
    fn text_wraps_at_the_buffer_edge() {
        let font = BitmapFont::new();
        let renderer = Renderer::new(64, 64);
        let mut buffer = FrameBuffer::new(14, 32);

        // Two glyphs fit onto the first line, the third one is moved down
        let cursor = renderer.draw_text(&mut buffer, "AAA", 0, 0, &font, Color::RED, true);
        assert_eq!(cursor, Vec2D::new(6, font.height() as i32));
        assert_eq!(buffer.get_pixel(0, font.height() as i32 + 3), Some(Color::RED));

        let cursor = renderer.draw_text(&mut buffer, "AAA", 0, 0, &font, Color::RED, false);
        assert_eq!(cursor, Vec2D::new(18, 0));
    }

    #[test]
    fn newlines_always_break() {
        let font = BitmapFont::new();
        let renderer = Renderer::new(64, 64);
        let mut buffer = FrameBuffer::new(64, 64);

        let cursor = renderer.draw_text(&mut buffer, "A\nB", 5, 5, &font, Color::RED, false);
        assert_eq!(cursor, Vec2D::new(5 + 6, 5 + font.height() as i32));
    }
}
