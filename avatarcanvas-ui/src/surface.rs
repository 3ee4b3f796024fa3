use avatarcanvas_core::{DrawSurface, PathSink, Point, Rect};
use std::f64::consts::TAU;
use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

/// [`DrawSurface`] over a borrowed 2D context.
pub struct CanvasSurface<'a>(pub &'a CanvasRenderingContext2d);

impl PathSink for CanvasSurface<'_> {
    type Error = JsValue;

    fn move_to(&mut self, point: Point) {
        self.0.move_to(point.x, point.y);
    }

    fn line_to(&mut self, point: Point) {
        self.0.line_to(point.x, point.y);
    }

    fn circle(&mut self, center: Point, radius: f64) -> Result<(), JsValue> {
        self.0.arc(center.x, center.y, radius, 0.0, TAU)
    }

    fn close_path(&mut self) {
        self.0.close_path();
    }
}

impl DrawSurface for CanvasSurface<'_> {
    type Image = HtmlImageElement;

    fn clear(&mut self, region: Rect) {
        self.0
            .clear_rect(region.x, region.y, region.width, region.height);
    }

    fn save(&mut self) {
        self.0.save();
    }

    fn restore(&mut self) {
        self.0.restore();
    }

    fn begin_path(&mut self) {
        self.0.begin_path();
    }

    fn clip(&mut self) {
        self.0.clip();
    }

    fn draw_image(
        &mut self,
        image: &HtmlImageElement,
        src: Rect,
        dst: Rect,
    ) -> Result<(), JsValue> {
        self.0
            .draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                image, src.x, src.y, src.width, src.height, dst.x, dst.y, dst.width, dst.height,
            )
    }
}
