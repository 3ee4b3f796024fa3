use avatarcanvas_core::{AvatarError, Point, Size};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, MouseEvent};

pub fn document() -> Result<Document, JsValue> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("No document"))
}

/// Look up `#id` and check it is a `T` (`expected` names the element in errors).
pub fn element_by_id<T: JsCast>(id: &str, expected: &'static str) -> Result<T, JsValue> {
    let element = document()?
        .get_element_by_id(id)
        .ok_or_else(|| to_js_error(AvatarError::ElementNotFound(id.to_string())))?;
    element.dyn_into::<T>().map_err(|_| {
        to_js_error(AvatarError::WrongElementType {
            id: id.to_string(),
            expected,
        })
    })
}

/// Get 2D rendering context from canvas.
pub fn get_2d_context(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, JsValue> {
    Ok(canvas
        .get_context("2d")?
        .ok_or_else(|| to_js_error(AvatarError::NoContext))?
        .dyn_into::<CanvasRenderingContext2d>()?)
}

pub fn canvas_size(canvas: &HtmlCanvasElement) -> Size {
    Size::new(canvas.width() as f64, canvas.height() as f64)
}

/// Pointer position in canvas pixels.
///
/// Corrects for CSS scaling when the element is displayed at a different size
/// than its backing store.
pub fn canvas_point(canvas: &HtmlCanvasElement, event: &MouseEvent) -> Point {
    let rect = canvas.get_bounding_client_rect();
    let x = event.client_x() as f64 - rect.left();
    let y = event.client_y() as f64 - rect.top();
    let sx = if rect.width() > 0.0 {
        canvas.width() as f64 / rect.width()
    } else {
        1.0
    };
    let sy = if rect.height() > 0.0 {
        canvas.height() as f64 / rect.height()
    } else {
        1.0
    };
    Point::new(x * sx, y * sy)
}

pub fn to_js_error(err: AvatarError) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}
