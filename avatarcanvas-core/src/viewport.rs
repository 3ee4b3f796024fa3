use crate::points::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// Upper bound for the user zoom multiplier when nothing else is configured.
pub const DEFAULT_SCALE_MAX: f64 = 5.0;

/// Mapping between canvas pixel space and image pixel space.
///
/// - `scale`: base "cover" scale, chosen on image load so the image fills the canvas
/// - `scale_modifier`: user zoom multiplier in `[1, scale_max]`
/// - `origin`: image-space point shown at the canvas centre
/// - `offset`: transient drag delta (image-space units), folded into `origin` on release
///
/// Only exists once an image has been decoded, so every operation works on a
/// non-empty image.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewportModel {
    image: Size,
    scale: f64,
    scale_modifier: f64,
    scale_max: f64,
    origin: Point,
    offset: Point,
}

impl ViewportModel {
    /// Fit a freshly loaded image to the canvas using the cover policy.
    pub fn cover(image: Size, canvas: Size, scale_max: f64) -> Self {
        let mut model = Self {
            image,
            scale: 1.0,
            scale_modifier: 1.0,
            scale_max: scale_max.max(1.0),
            origin: Point::ORIGIN,
            offset: Point::ORIGIN,
        };
        model.on_image_loaded(image, canvas);
        model
    }

    /// Re-fit for a new image. Keeps `scale_max`, resets everything else.
    pub fn on_image_loaded(&mut self, image: Size, canvas: Size) {
        self.image = image;
        self.scale = (canvas.width / image.width).max(canvas.height / image.height);
        self.scale_modifier = 1.0;
        self.origin = image.center();
        self.offset = Point::ORIGIN;
        log::debug!(
            "image {}x{} fitted to canvas {}x{} at scale {}",
            image.width,
            image.height,
            canvas.width,
            canvas.height,
            self.scale
        );
    }

    pub fn base_scale(&self) -> f64 {
        self.scale
    }

    pub fn scale_modifier(&self) -> f64 {
        self.scale_modifier
    }

    pub fn scale_max(&self) -> f64 {
        self.scale_max
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn offset(&self) -> Point {
        self.offset
    }

    /// Canvas pixels per image pixel
    pub fn effective_scale(&self) -> f64 {
        self.scale * self.scale_modifier
    }

    /// Set the zoom multiplier, clamped into `[1, scale_max]`. Returns the stored value.
    pub fn set_scale_modifier(&mut self, modifier: f64) -> f64 {
        self.scale_modifier = if modifier.is_nan() {
            1.0
        } else {
            modifier.clamp(1.0, self.scale_max)
        };
        self.scale_modifier
    }

    /// Change the zoom ceiling (never below 1) and re-clamp the current multiplier.
    pub fn set_scale_max(&mut self, scale_max: f64) {
        self.scale_max = scale_max.max(1.0);
        self.scale_modifier = self.scale_modifier.clamp(1.0, self.scale_max);
    }

    pub fn set_offset(&mut self, offset: Point) {
        self.offset = offset;
    }

    /// Fold the drag delta into the origin and clear it.
    pub fn commit_offset(&mut self) {
        self.origin = self.origin.sub(&self.offset);
        self.offset = Point::ORIGIN;
    }

    /// Pull the origin halfway towards `point` (wheel zoom anchoring).
    pub fn reanchor_towards(&mut self, point: Point) {
        self.origin = self.origin.midpoint(&point);
    }

    /// Visible image-space rectangle for a canvas of the given size, clamped to the image.
    ///
    /// Writes the clamped origin back, so calling this again without other
    /// mutations yields the same rectangle.
    pub fn compute_view_rect(&mut self, canvas: Size) -> Rect {
        let effective_scale = self.effective_scale();
        let width = canvas.width / effective_scale;
        let height = canvas.height / effective_scale;
        self.clamp_view_rect(Size::new(width, height))
    }

    /// Place a view of size `view` around `origin - offset`, shifted back inside
    /// the image bounds axis by axis.
    ///
    /// Low edge is checked first, then high edge; when the view is larger than
    /// the image on an axis both fire and the high edge wins.
    pub fn clamp_view_rect(&mut self, view: Size) -> Rect {
        let (x, origin_x) =
            clamp_axis(self.origin.x, self.offset.x, view.width, self.image.width);
        let (y, origin_y) =
            clamp_axis(self.origin.y, self.offset.y, view.height, self.image.height);
        self.origin = Point::new(origin_x, origin_y);
        Rect::new(x, y, view.width, view.height)
    }

    /// Map a canvas-space point into image space.
    pub fn to_image_space(canvas_point: Point, view_rect: &Rect, effective_scale: f64) -> Point {
        Point::new(
            canvas_point.x / effective_scale + view_rect.x,
            canvas_point.y / effective_scale + view_rect.y,
        )
    }

    /// Inverse of [`ViewportModel::to_image_space`].
    pub fn to_canvas_space(image_point: Point, view_rect: &Rect, effective_scale: f64) -> Point {
        Point::new(
            (image_point.x - view_rect.x) * effective_scale,
            (image_point.y - view_rect.y) * effective_scale,
        )
    }
}

/// Clamp one axis. Returns `(low_edge, new_origin)`.
///
/// The origin is stored so that `origin - offset` is the clamped centre; with no
/// drag in progress that anchors the origin at `extent / 2` (low) or
/// `bound - extent / 2` (high). While dragging, the origin reported by
/// `getOrigin()` and `mousemove` therefore still includes the live offset.
fn clamp_axis(origin: f64, offset: f64, extent: f64, bound: f64) -> (f64, f64) {
    let half = extent / 2.0;
    let mut center = origin - offset;
    let mut clamped = false;

    if center - half < 0.0 {
        center = half;
        clamped = true;
    }
    if center + half > bound {
        center = bound - half;
        clamped = true;
    }

    if clamped {
        (center - half, center + offset)
    } else {
        (center - half, origin)
    }
}
