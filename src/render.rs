//! Software rendering of the cart-pole scene
//!
//! The renderer never touches the environment; it paints a [`RenderView`],
//! a read-only snapshot of the cart position and pole angle, into an RGB
//! [`Frame`]. Layout is worked out with y pointing up from the bottom edge
//! and mapped to image rows when drawing.

use std::path::Path;

use image::{Rgb, RgbImage};
use imageproc::{
    drawing::{draw_filled_circle_mut, draw_line_segment_mut, draw_polygon_mut},
    point::Point,
};

use crate::error::FufiError;

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
const POLE: Rgb<u8> = Rgb([202, 152, 101]);
const AXLE: Rgb<u8> = Rgb([129, 132, 203]);

/// What the renderer needs to know about the system
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderView {
    /// Cart position (m)
    pub cart_position: f64,
    /// Pole angle (rad)
    pub pole_angle: f64,
    /// Half the drawn track width (m)
    pub x_threshold: f64,
    /// Half the pole's length (m)
    pub pole_half_length: f64,
}

/// Rendered RGB image, row 0 at the top
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    image: RgbImage,
}

impl Frame {
    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Color at column `x`, row `y`, `None` outside the image
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb<u8>> {
        self.image.get_pixel_checked(x, y).copied()
    }

    /// Shape as `(height, width, channels)`
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.height() as usize, self.width() as usize, 3)
    }

    /// Row-major RGB bytes
    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    /// Underlying image buffer
    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    /// Take ownership of the image buffer
    pub fn into_image(self) -> RgbImage {
        self.image
    }

    /// Encode to a file, format chosen by extension
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), FufiError> {
        self.image.save(path)?;
        Ok(())
    }
}

/// Draws the cart, pole, axle and track
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CartPoleRenderer {
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Pole width in pixels
    pub pole_width: f64,
    /// Cart width in pixels
    pub cart_width: f64,
    /// Cart height in pixels
    pub cart_height: f64,
    /// Height of the track line (pixels from the bottom)
    pub track_y: f64,
}

impl Default for CartPoleRenderer {
    fn default() -> Self {
        Self {
            width: 600,
            height: 400,
            pole_width: 10.0,
            cart_width: 50.0,
            cart_height: 30.0,
            track_y: 100.0,
        }
    }
}

impl CartPoleRenderer {
    /// Renderer with the default 600x400 layout
    pub fn new() -> Self {
        Self::default()
    }

    /// Paint `view` into a fresh frame
    pub fn draw(&self, view: &RenderView) -> Frame {
        let mut image = RgbImage::from_pixel(self.width, self.height, WHITE);
        if self.width == 0 || self.height == 0 {
            return Frame { image };
        }

        let height = self.height as f64;
        let to_image = |(x, y): (f64, f64)| (x, height - y);

        let world_width = view.x_threshold * 2.0;
        let scale = self.width as f64 / world_width;
        let pole_len = scale * (2.0 * view.pole_half_length);

        let (l, r) = (-self.cart_width / 2.0, self.cart_width / 2.0);
        let (t, b) = (self.cart_height / 2.0, -self.cart_height / 2.0);
        let axle_offset = self.cart_height / 4.0;
        let cart_x = view.cart_position * scale + self.width as f64 / 2.0;
        let cart_y = self.track_y;

        let cart =
            [(l, b), (l, t), (r, t), (r, b)].map(|(x, y)| to_image((x + cart_x, y + cart_y)));
        fill_quad(&mut image, cart, BLACK);

        let (l, r) = (-self.pole_width / 2.0, self.pole_width / 2.0);
        let (t, b) = (pole_len - self.pole_width / 2.0, -self.pole_width / 2.0);
        let (sin, cos) = (-view.pole_angle).sin_cos();
        let pole = [(l, b), (l, t), (r, t), (r, b)].map(|(x, y)| {
            to_image((x * cos - y * sin + cart_x, x * sin + y * cos + cart_y + axle_offset))
        });
        fill_quad(&mut image, pole, POLE);

        let (ax, ay) = to_image((cart_x, cart_y + axle_offset));
        let radius = (self.pole_width / 2.0).round() as i32;
        draw_filled_circle_mut(&mut image, (ax.round() as i32, ay.round() as i32), radius, AXLE);

        let track = (height - cart_y) as f32;
        draw_line_segment_mut(&mut image, (0.0, track), ((self.width - 1) as f32, track), BLACK);

        Frame { image }
    }
}

/// Fill a quadrilateral given in image coordinates
///
/// Corners that round onto the same pixel are merged; anything thinner than a
/// triangle is skipped.
fn fill_quad(image: &mut RgbImage, corners: [(f64, f64); 4], color: Rgb<u8>) {
    let mut points: Vec<Point<i32>> = Vec::with_capacity(corners.len());
    for (x, y) in corners {
        let p = Point::new(x.round() as i32, y.round() as i32);
        if points.last() != Some(&p) {
            points.push(p);
        }
    }
    while points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    if points.len() >= 3 {
        draw_polygon_mut(image, &points, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(cart_position: f64, pole_angle: f64) -> RenderView {
        RenderView { cart_position, pole_angle, x_threshold: 2.4, pole_half_length: 0.5 }
    }

    #[test]
    fn test_frame_shape() {
        let frame = CartPoleRenderer::new().draw(&view(0.0, 0.0));
        assert_eq!(frame.shape(), (400, 600, 3));
        assert_eq!(frame.as_raw().len(), 400 * 600 * 3);
    }

    #[test]
    fn test_centered_scene() {
        let frame = CartPoleRenderer::new().draw(&view(0.0, 0.0));

        // Track line sits 100 px above the bottom edge
        assert_eq!(frame.pixel(5, 300), Some(BLACK));
        // Cart body straddles the track at the center
        assert_eq!(frame.pixel(285, 290), Some(BLACK));
        // Upright pole above the axle
        assert_eq!(frame.pixel(300, 200), Some(POLE));
        // Axle disc
        assert_eq!(frame.pixel(300, 292), Some(AXLE));
        // Background
        assert_eq!(frame.pixel(10, 10), Some(WHITE));
        assert_eq!(frame.pixel(450, 200), Some(WHITE));
    }

    #[test]
    fn test_cart_follows_position() {
        let frame = CartPoleRenderer::new().draw(&view(1.2, 0.0));
        // 1.2 m is a quarter of the 4.8 m track: 150 px right of center
        assert_eq!(frame.pixel(440, 290), Some(BLACK));
        assert_eq!(frame.pixel(285, 290), Some(WHITE));
    }

    #[test]
    fn test_pole_tilts_with_angle() {
        let frame = CartPoleRenderer::new().draw(&view(0.0, 0.5));
        // Positive angle leans the pole to the right
        assert_eq!(frame.pixel(300, 200), Some(WHITE));
        // 110 px along the pole axis from the axle at (300, 292.5)
        assert_eq!(frame.pixel(352, 196), Some(POLE));
    }

    #[test]
    fn test_pixel_outside_frame() {
        let frame = CartPoleRenderer::new().draw(&view(0.0, 0.0));
        assert_eq!(frame.pixel(600, 0), None);
        assert_eq!(frame.pixel(0, 400), None);
        assert_eq!(frame.pixel(u32::MAX, u32::MAX), None);
    }

    #[test]
    fn test_save_png() {
        let frame = CartPoleRenderer::new().draw(&view(0.3, -0.1));
        let path = std::env::temp_dir().join(format!("fufi_frame_{}.png", std::process::id()));
        frame.save(&path).unwrap();

        let decoded = image::open(&path).unwrap().to_rgb8();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(&decoded, frame.image());
    }

    #[test]
    fn test_degenerate_layouts_do_not_panic() {
        let frame = CartPoleRenderer::new().draw(&view(-10.0, 3.0));
        assert_eq!(frame.as_raw().len(), 400 * 600 * 3);

        let empty = CartPoleRenderer { width: 0, ..CartPoleRenderer::new() }.draw(&view(0.0, 0.0));
        assert_eq!(empty.shape(), (400, 0, 3));
        assert_eq!(empty.pixel(0, 0), None);

        let thin = CartPoleRenderer { pole_width: 0.0, ..CartPoleRenderer::new() };
        let frame = thin.draw(&view(0.0, 0.2));
        assert_eq!(frame.pixel(285, 290), Some(BLACK));
    }
}
