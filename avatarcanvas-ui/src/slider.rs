use crate::listeners::EventListener;
use avatarcanvas_core::{SliderAttributes, SliderSetup};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::HtmlInputElement;

/// Range input driving the zoom modifier.
pub struct SliderBinding {
    element: HtmlInputElement,
    _input: EventListener,
}

impl SliderBinding {
    pub fn bind<F>(element: HtmlInputElement, mut on_input: F) -> Result<Self, JsValue>
    where
        F: FnMut(f64) + 'static,
    {
        let input = EventListener::new(&element, "input", move |event| {
            let value = event
                .target()
                .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
                .map(|input| input.value_as_number());
            if let Some(value) = value {
                on_input(value);
            }
        })?;

        Ok(Self {
            element,
            _input: input,
        })
    }

    pub fn element(&self) -> &HtmlInputElement {
        &self.element
    }

    pub fn attributes(element: &HtmlInputElement) -> SliderAttributes {
        SliderAttributes {
            max: element.max(),
            step: element.step(),
        }
    }

    pub fn apply(&self, setup: &SliderSetup) {
        self.element.set_max(&setup.max);
        self.element.set_step(&setup.step);
        if setup.reset_range {
            self.element.set_min("1");
            self.element.set_value("1");
        }
    }

    pub fn set_value(&self, value: f64) {
        self.element.set_value_as_number(value);
    }
}
