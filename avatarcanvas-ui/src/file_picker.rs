use crate::canvas_utils::document;
use crate::listeners::EventListener;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Event, File, HtmlInputElement};

/// File input whose `change` events hand the first selected file to a callback.
pub struct FilePicker {
    input: HtmlInputElement,
    _change: EventListener,
}

impl FilePicker {
    pub fn bind<F>(input: HtmlInputElement, mut on_file: F) -> Result<Self, JsValue>
    where
        F: FnMut(File) + 'static,
    {
        let change = EventListener::new(&input, "change", move |event| {
            match selected_file(&event) {
                Some(file) => on_file(file),
                None => log::debug!("File input changed without a file"),
            }
        })?;

        Ok(Self {
            input,
            _change: change,
        })
    }

    /// Open the browser file dialog through a detached input.
    pub fn open<F>(on_file: F) -> Result<Self, JsValue>
    where
        F: FnMut(File) + 'static,
    {
        let input = document()?
            .create_element("input")?
            .dyn_into::<HtmlInputElement>()?;
        input.set_type("file");
        input.set_accept("image/*");

        let picker = Self::bind(input, on_file)?;
        picker.input.click();
        Ok(picker)
    }
}

fn selected_file(event: &Event) -> Option<File> {
    let input = event.target()?.dyn_into::<HtmlInputElement>().ok()?;
    input.files()?.get(0)
}
