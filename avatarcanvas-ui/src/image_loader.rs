//! Image decoding through detached `<img>` elements.

use crate::listeners::EventListener;
use avatarcanvas_core::{LoadTicket, Size};
use wasm_bindgen::JsValue;
use web_sys::{Blob, HtmlImageElement, Url};

/// An image that is still decoding, tagged with the ticket it was started under.
pub struct PendingImage {
    ticket: LoadTicket,
    element: HtmlImageElement,
    src: String,
    listeners: [EventListener; 2],
}

impl PendingImage {
    /// Start loading `src`; `on_settled(ticket, ok)` runs once the element fires
    /// `load` (`ok = true`) or `error`.
    pub fn start<F>(ticket: LoadTicket, src: &str, on_settled: F) -> Result<Self, JsValue>
    where
        F: Fn(LoadTicket, bool) + Clone + 'static,
    {
        let element = HtmlImageElement::new()?;
        // Keeps the canvas exportable when the image is served with CORS headers
        element.set_cross_origin(Some("anonymous"));

        let on_load = on_settled.clone();
        let load = EventListener::new(&element, "load", move |_| on_load(ticket, true))?;
        let error = EventListener::new(&element, "error", move |_| on_settled(ticket, false))?;
        element.set_src(src);

        Ok(Self {
            ticket,
            element,
            src: src.to_string(),
            listeners: [load, error],
        })
    }

    pub fn ticket(&self) -> LoadTicket {
        self.ticket
    }

    pub fn src(&self) -> &str {
        &self.src
    }

    pub fn natural_size(&self) -> Size {
        Size::new(
            self.element.natural_width() as f64,
            self.element.natural_height() as f64,
        )
    }

    /// Split into the decoded element and the listeners that reported it.
    ///
    /// The listeners are returned rather than dropped since this is usually
    /// called from inside one of them.
    pub fn finish(self) -> (HtmlImageElement, [EventListener; 2]) {
        (self.element, self.listeners)
    }
}

/// Object URL for a picked file, revoked on drop.
pub struct ObjectUrl(String);

impl ObjectUrl {
    pub fn from_blob(blob: &Blob) -> Result<Self, JsValue> {
        Ok(Self(Url::create_object_url_with_blob(blob)?))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Drop for ObjectUrl {
    fn drop(&mut self) {
        if let Err(err) = Url::revoke_object_url(&self.0) {
            log::warn!("Failed to revoke {}: {:?}", self.0, err);
        }
    }
}
