//! Drawing-surface seam between the viewport core and whatever actually paints.
//!
//! The browser crate implements these traits over a `CanvasRenderingContext2d`;
//! tests implement them with a command recorder.

use crate::clip::ClipShape;
use crate::points::{Point, Rect, Size};

/// Receives path-construction commands. Never draws or fills by itself.
pub trait PathSink {
    type Error;

    fn move_to(&mut self, point: Point);

    fn line_to(&mut self, point: Point);

    /// Full circle of `radius` around `center`
    fn circle(&mut self, center: Point, radius: f64) -> Result<(), Self::Error>;

    fn close_path(&mut self);
}

/// 2D drawing surface the widget paints onto.
pub trait DrawSurface: PathSink {
    /// Drawable handle of a decoded image
    type Image: ?Sized;

    fn clear(&mut self, region: Rect);

    fn save(&mut self);

    fn restore(&mut self);

    fn begin_path(&mut self);

    /// Intersect the drawable region with the current path
    fn clip(&mut self);

    /// Draw the `src` region of `image` scaled into `dst`
    fn draw_image(&mut self, image: &Self::Image, src: Rect, dst: Rect)
        -> Result<(), Self::Error>;
}

/// Repaint the canvas: clear, apply the clip path if any, draw the visible region.
///
/// Output depends only on the arguments, so repeating the call with the same
/// inputs produces the same frame.
pub fn paint<S: DrawSurface>(
    surface: &mut S,
    image: &S::Image,
    canvas: Size,
    view_rect: Rect,
    clip: Option<&ClipShape>,
) -> Result<(), S::Error> {
    let full = Rect::from_size(canvas);
    surface.clear(full);
    surface.save();
    let drawn = draw_clipped(surface, image, canvas, view_rect, clip);
    // Restore even when drawing failed so the clip never leaks into the next frame
    surface.restore();
    drawn
}

fn draw_clipped<S: DrawSurface>(
    surface: &mut S,
    image: &S::Image,
    canvas: Size,
    view_rect: Rect,
    clip: Option<&ClipShape>,
) -> Result<(), S::Error> {
    if let Some(shape) = clip {
        surface.begin_path();
        shape.trace(canvas, surface)?;
        surface.clip();
    }
    surface.draw_image(image, view_rect, Rect::from_size(canvas))
}
