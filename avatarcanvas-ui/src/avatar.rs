//! The `AvatarCanvas` object handed to JavaScript.
//!
//! All widget state sits behind one `Rc<Shared>`. DOM closures hold a `Weak`
//! back-reference so dropping the JS object releases everything. No `RefCell`
//! borrow is held while a listener or a DOM event runs, so JS callbacks may
//! call straight back into the widget.

use crate::canvas_utils::{
    canvas_point, canvas_size, element_by_id, get_2d_context, to_js_error,
};
use crate::file_picker::FilePicker;
use crate::image_loader::{ObjectUrl, PendingImage};
use crate::listeners::EventListener;
use crate::slider::SliderBinding;
use crate::surface::CanvasSurface;
use avatarcanvas_core::{
    export_quality, paint, resolve_slider, AvatarConfig, AvatarError, AvatarEvent, ClipOptions,
    ClipShape, EventEmitter, ExportFormat, InteractionController, Listener, ListenerId,
    LoadSequence, LoadTicket, Reaction, SliderOptions,
};
use gloo_utils::format::JsValueSerdeExt;
use serde::Serialize;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::prelude::*;
use web_sys::{
    CanvasRenderingContext2d, CustomEvent, CustomEventInit, File, HtmlCanvasElement,
    HtmlImageElement, HtmlInputElement, PointerEvent, WheelEvent,
};

struct State {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
    controller: InteractionController,
    clip: Option<ClipShape>,
    /// Decoded image currently on screen
    image: Option<HtmlImageElement>,
    loads: LoadSequence,
    pending: Option<PendingImage>,
    /// Listeners of the last settled load, released when the next load starts
    settled: Option<[EventListener; 2]>,
    object_url: Option<ObjectUrl>,
    slider: Option<SliderBinding>,
    loader: Option<FilePicker>,
    file_select: Option<FilePicker>,
    /// Slider `max` used when the element carries none
    fallback_scale_max: f64,
}

impl State {
    fn repaint(&mut self) {
        let canvas = canvas_size(&self.canvas);
        let Some(view) = self.controller.frame(canvas) else {
            return;
        };
        let Some(image) = self.image.as_ref() else {
            return;
        };
        let mut surface = CanvasSurface(&self.context);
        if let Err(err) = paint(&mut surface, image, canvas, view, self.clip.as_ref()) {
            log::error!("Failed to paint avatar: {:?}", err);
        }
    }
}

struct Shared {
    state: RefCell<State>,
    emitter: RefCell<EventEmitter>,
}

/// Run `f` against the state, then carry out the returned reaction.
fn react(weak: &Weak<Shared>, f: impl FnOnce(&mut State) -> Reaction) {
    let Some(shared) = weak.upgrade() else {
        return;
    };
    let reaction = f(&mut shared.state.borrow_mut());
    apply(&shared, reaction);
}

fn apply(shared: &Shared, reaction: Reaction) {
    if reaction.is_noop() {
        return;
    }

    let canvas = {
        let mut state = shared.state.borrow_mut();
        if let (Some(value), Some(slider)) = (reaction.slider_value, state.slider.as_ref()) {
            slider.set_value(value);
        }
        if reaction.repaint {
            state.repaint();
        }
        state.canvas.clone()
    };

    for event in &reaction.events {
        dispatch(shared, &canvas, event);
    }
}

fn dispatch(shared: &Shared, canvas: &HtmlCanvasElement, event: &AvatarEvent) {
    let listeners = shared.emitter.borrow().listeners_for(event);
    for listener in listeners {
        listener(event);
    }
    if let Err(err) = dispatch_dom_event(canvas, event) {
        log::warn!("Failed to dispatch avatar-{}: {:?}", event.name(), err);
    }
}

fn dispatch_dom_event(canvas: &HtmlCanvasElement, event: &AvatarEvent) -> Result<(), JsValue> {
    let init = CustomEventInit::new();
    init.set_detail(&to_js(&event.detail())?);
    let custom = CustomEvent::new_with_event_init_dict(&format!("avatar-{}", event.name()), &init)?;
    canvas.dispatch_event(&custom)?;
    Ok(())
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    JsValue::from_serde(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn parse_config(value: &JsValue) -> Result<AvatarConfig, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(AvatarConfig::default());
    }
    value
        .into_serde::<serde_json::Value>()
        .map_err(|e| AvatarError::InvalidConfig(e.to_string()))
        .and_then(AvatarConfig::from_value)
        .map_err(|err| {
            log::warn!("Rejected avatar config: {}", err);
            to_js_error(err)
        })
}

fn attach_canvas_listeners(
    shared: &Rc<Shared>,
    canvas: &HtmlCanvasElement,
) -> Result<Vec<EventListener>, JsValue> {
    let weak = Rc::downgrade(shared);
    let down = EventListener::new(canvas, "pointerdown", move |event| {
        let Some(event) = event.dyn_ref::<PointerEvent>() else {
            return;
        };
        if event.button() != 0 {
            return;
        }
        event.prevent_default();
        react(&weak, |state| {
            // Keeps move/up events flowing when the pointer leaves the canvas
            if let Err(err) = state.canvas.set_pointer_capture(event.pointer_id()) {
                log::debug!("Pointer capture refused: {:?}", err);
            }
            let position = canvas_point(&state.canvas, event);
            state.controller.pointer_down(position)
        });
    })?;

    let weak = Rc::downgrade(shared);
    let moved = EventListener::new(canvas, "pointermove", move |event| {
        let Some(event) = event.dyn_ref::<PointerEvent>() else {
            return;
        };
        react(&weak, |state| {
            let position = canvas_point(&state.canvas, event);
            state.controller.pointer_move(position)
        });
    })?;

    let weak = Rc::downgrade(shared);
    let up = EventListener::new(canvas, "pointerup", move |_| {
        react(&weak, |state| state.controller.pointer_up());
    })?;

    let weak = Rc::downgrade(shared);
    let cancel = EventListener::new(canvas, "pointercancel", move |_| {
        react(&weak, |state| state.controller.pointer_up());
    })?;

    let weak = Rc::downgrade(shared);
    let wheel = EventListener::new_non_passive(canvas, "wheel", move |event| {
        let Some(event) = event.dyn_ref::<WheelEvent>() else {
            return;
        };
        event.prevent_default();
        react(&weak, |state| state.controller.wheel(event.delta_y()));
    })?;

    Ok(vec![down, moved, up, cancel, wheel])
}

/// Start decoding `src`; a later call supersedes any load still in flight.
fn load_image(shared: &Rc<Shared>, src: &str, object_url: Option<ObjectUrl>) -> Result<(), JsValue> {
    let weak = Rc::downgrade(shared);
    let mut state = shared.state.borrow_mut();
    let ticket = state.loads.begin();
    let pending = PendingImage::start(ticket, src, move |ticket, ok| {
        image_settled(&weak, ticket, ok)
    })?;
    log::debug!("Loading image #{}: {}", ticket.id(), src);

    state.pending = Some(pending);
    state.settled = None;
    // Revokes the previous file's URL
    state.object_url = object_url;
    Ok(())
}

fn load_file(shared: &Rc<Shared>, file: &File) -> Result<(), JsValue> {
    let url = ObjectUrl::from_blob(file)?;
    let src = url.as_str().to_string();
    load_image(shared, &src, Some(url))
}

fn image_settled(weak: &Weak<Shared>, ticket: LoadTicket, ok: bool) {
    react(weak, |state| {
        if !state.loads.complete(ticket) {
            return Reaction::default();
        }
        let Some(pending) = state.pending.take() else {
            return Reaction::default();
        };
        if pending.ticket() != ticket {
            state.pending = Some(pending);
            return Reaction::default();
        }

        let src = pending.src().to_string();
        let image_size = pending.natural_size();
        let (element, listeners) = pending.finish();
        state.settled = Some(listeners);

        if !ok || image_size.is_empty() {
            log::warn!("Image failed to load: {}", src);
            return state.controller.image_failed(&src);
        }
        let canvas = canvas_size(&state.canvas);
        let reaction = state.controller.image_loaded(image_size, canvas, &src);
        // A zero-sized canvas rejects the image; keep showing the old one
        if reaction.repaint {
            state.image = Some(element);
        }
        reaction
    });
}

fn bind_slider(shared: &Rc<Shared>, options: &SliderOptions) -> Result<(), JsValue> {
    let (id, overrides) = match options.resolve() {
        Ok(resolved) => resolved,
        // Already warned; the widget keeps running without a slider
        Err(AvatarError::InvalidSliderConfig) => return Ok(()),
        Err(err) => return Err(to_js_error(err)),
    };

    let mut guard = shared.state.borrow_mut();
    let state = &mut *guard;
    let first_binding = state.slider.is_none();
    let element = match id {
        Some(id) => element_by_id::<HtmlInputElement>(id, "input")?,
        None => state
            .slider
            .as_ref()
            .map(|slider| slider.element().clone())
            .ok_or_else(|| to_js_error(AvatarError::NoSliderBound))?,
    };
    let setup = resolve_slider(
        &SliderBinding::attributes(&element),
        &overrides,
        state.fallback_scale_max,
        first_binding,
    );

    let rebound = match state.slider.as_ref() {
        Some(slider) => slider.element() != &element,
        None => true,
    };
    if rebound {
        let weak = Rc::downgrade(shared);
        // Replacing the binding detaches the old element's listener
        state.slider = Some(SliderBinding::bind(element, move |value| {
            react(&weak, |state| state.controller.slider_input(value));
        })?);
    }

    if let Some(enabled) = setup.slider_enabled {
        state.controller.capabilities_mut().slider = enabled;
    }
    let lowered = state.controller.set_scale_max(setup.scale_max);

    if let Some(slider) = state.slider.as_ref() {
        slider.apply(&setup);
        if rebound && !first_binding {
            slider.element().set_min("1");
        }
        if !setup.reset_range {
            slider.set_value(state.controller.scale_modifier());
        }
    }
    if lowered.is_some() {
        state.repaint();
    }
    Ok(())
}

fn bind_loader(shared: &Rc<Shared>, id: &str) -> Result<(), JsValue> {
    let input = element_by_id::<HtmlInputElement>(id, "input")?;
    let weak = Rc::downgrade(shared);
    let picker = FilePicker::bind(input, move |file| {
        let Some(shared) = weak.upgrade() else {
            return;
        };
        if let Err(err) = load_file(&shared, &file) {
            log::error!("Failed to load picked file: {:?}", err);
        }
    })?;
    shared.state.borrow_mut().loader = Some(picker);
    Ok(())
}

/// Pan/zoom avatar editor bound to a `<canvas>` element.
#[wasm_bindgen]
pub struct AvatarCanvas {
    shared: Rc<Shared>,
    listeners: Vec<EventListener>,
}

#[wasm_bindgen]
impl AvatarCanvas {
    /// Throws when `canvas_id` does not name a canvas or the config is malformed.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str, config: JsValue) -> Result<AvatarCanvas, JsValue> {
        let config = parse_config(&config)?;
        let canvas = element_by_id::<HtmlCanvasElement>(canvas_id, "canvas")?;
        let context = get_2d_context(&canvas)?;

        let shared = Rc::new(Shared {
            state: RefCell::new(State {
                canvas: canvas.clone(),
                context,
                controller: InteractionController::from_config(&config),
                clip: config.clip.as_ref().and_then(ClipShape::resolve),
                image: None,
                loads: LoadSequence::new(),
                pending: None,
                settled: None,
                object_url: None,
                slider: None,
                loader: None,
                file_select: None,
                fallback_scale_max: config.scale_max,
            }),
            emitter: RefCell::new(EventEmitter::new()),
        });

        let listeners = attach_canvas_listeners(&shared, &canvas)?;
        if let Some(src) = config.image.as_deref() {
            load_image(&shared, src, None)?;
        }
        if let Some(slider) = config.slider.as_ref() {
            if let Err(err) = bind_slider(&shared, slider) {
                log::warn!("Slider not bound: {:?}", err);
            }
        }
        if let Some(loader) = config.loader.as_deref() {
            if let Err(err) = bind_loader(&shared, loader) {
                log::warn!("Loader not bound: {:?}", err);
            }
        }
        log::info!("Avatar canvas attached to #{}", canvas_id);

        Ok(AvatarCanvas { shared, listeners })
    }

    #[wasm_bindgen(js_name = getCanvas)]
    pub fn get_canvas(&self) -> HtmlCanvasElement {
        self.shared.state.borrow().canvas.clone()
    }

    /// Visible image region `{x, y, width, height}` in image pixels
    #[wasm_bindgen(js_name = getViewRect)]
    pub fn get_view_rect(&self) -> Result<JsValue, JsValue> {
        to_js(&self.shared.state.borrow().controller.view_rect())
    }

    #[wasm_bindgen(js_name = getOrigin)]
    pub fn get_origin(&self) -> Result<JsValue, JsValue> {
        to_js(&self.shared.state.borrow().controller.origin())
    }

    #[wasm_bindgen(js_name = getImage)]
    pub fn get_image(&self) -> Option<HtmlImageElement> {
        self.shared.state.borrow().image.clone()
    }

    /// Effective scale (cover scale times modifier)
    #[wasm_bindgen(js_name = getScale)]
    pub fn get_scale(&self) -> f64 {
        self.shared.state.borrow().controller.effective_scale()
    }

    #[wasm_bindgen(js_name = getScaleModifier)]
    pub fn get_scale_modifier(&self) -> f64 {
        self.shared.state.borrow().controller.scale_modifier()
    }

    #[wasm_bindgen(js_name = allowZoom)]
    pub fn allow_zoom(&self, allow: Option<bool>) {
        self.shared.state.borrow_mut().controller.capabilities_mut().zoom = allow.unwrap_or(true);
    }

    #[wasm_bindgen(js_name = allowScroll)]
    pub fn allow_scroll(&self, allow: Option<bool>) {
        self.shared.state.borrow_mut().controller.capabilities_mut().scroll = allow.unwrap_or(true);
    }

    #[wasm_bindgen(js_name = allowSlider)]
    pub fn allow_slider(&self, allow: Option<bool>) {
        self.shared.state.borrow_mut().controller.capabilities_mut().slider = allow.unwrap_or(true);
    }

    #[wasm_bindgen(js_name = allowPan)]
    pub fn allow_pan(&self, allow: Option<bool>) {
        self.shared.state.borrow_mut().controller.capabilities_mut().pan = allow.unwrap_or(true);
    }

    /// Zoom change per unit of wheel `deltaY`
    #[wasm_bindgen(js_name = setWheelSensitivity)]
    pub fn set_wheel_sensitivity(&self, sensitivity: f64) {
        self.shared
            .state
            .borrow_mut()
            .controller
            .set_wheel_sensitivity(sensitivity);
    }

    #[wasm_bindgen(js_name = toPNG)]
    pub fn to_png(&self, quality: Option<f64>) -> Result<String, JsValue> {
        self.export(ExportFormat::Png, quality)
    }

    #[wasm_bindgen(js_name = toJPG)]
    pub fn to_jpg(&self, quality: Option<f64>) -> Result<String, JsValue> {
        self.export(ExportFormat::Jpeg, quality)
    }

    /// Hand a PNG `Blob` of the canvas to `callback`
    #[wasm_bindgen(js_name = toBlob)]
    pub fn to_blob(&self, callback: &js_sys::Function) -> Result<(), JsValue> {
        self.shared.state.borrow().canvas.to_blob(callback)
    }

    #[wasm_bindgen(js_name = setImage)]
    pub fn set_image(&self, src: &str) -> Result<(), JsValue> {
        load_image(&self.shared, src, None)
    }

    /// Open a file dialog; the chosen image replaces the current one and
    /// `callback(file)` runs once its load has started.
    #[wasm_bindgen(js_name = fileSelect)]
    pub fn file_select(&self, callback: Option<js_sys::Function>) -> Result<(), JsValue> {
        let weak = Rc::downgrade(&self.shared);
        let picker = FilePicker::open(move |file| {
            let Some(shared) = weak.upgrade() else {
                return;
            };
            if let Err(err) = load_file(&shared, &file) {
                log::error!("Failed to load picked file: {:?}", err);
                return;
            }
            if let Some(callback) = callback.as_ref() {
                if let Err(err) = callback.call1(&JsValue::NULL, &file) {
                    log::error!("fileSelect callback threw: {:?}", err);
                }
            }
        })?;
        self.shared.state.borrow_mut().file_select = Some(picker);
        Ok(())
    }

    /// Replace the clip (`undefined`/`null` removes it) and repaint.
    pub fn clip(&self, config: JsValue) {
        let shape = if config.is_undefined() || config.is_null() {
            None
        } else {
            match config.into_serde::<ClipOptions>() {
                Ok(options) => ClipShape::resolve(&options),
                Err(err) => {
                    log::warn!("Clip must be a shape name or a list of points: {}", err);
                    None
                }
            }
        };
        let mut state = self.shared.state.borrow_mut();
        state.clip = shape;
        state.repaint();
    }

    /// Bind or reconfigure the zoom slider: an element id or `{id?, max?, step?, disabled?}`.
    pub fn slider(&self, config: JsValue) -> Result<(), JsValue> {
        let options = config
            .into_serde::<SliderOptions>()
            .unwrap_or(SliderOptions::Invalid(serde_json::Value::Null));
        bind_slider(&self.shared, &options)
    }

    /// Subscribe to `name` (`"*"` or empty for every notification); the
    /// callback receives the notification detail.
    pub fn on(&self, name: &str, callback: js_sys::Function) -> u32 {
        let filter = match name {
            "" | "*" => None,
            name => Some(name),
        };
        let listener: Listener = Rc::new(move |event: &AvatarEvent| {
            let detail = match to_js(&event.detail()) {
                Ok(detail) => detail,
                Err(err) => {
                    log::error!("Failed to convert {} detail: {:?}", event.name(), err);
                    return;
                }
            };
            if let Err(err) = callback.call1(&JsValue::NULL, &detail) {
                log::error!("{} listener threw: {:?}", event.name(), err);
            }
        });
        self.shared.emitter.borrow_mut().subscribe(filter, listener).0
    }

    pub fn off(&self, id: u32) -> bool {
        self.shared.emitter.borrow_mut().unsubscribe(ListenerId(id))
    }

    /// Detach every DOM listener the widget installed.
    pub fn destroy(&mut self) {
        self.listeners.clear();
        let mut state = self.shared.state.borrow_mut();
        state.slider = None;
        state.loader = None;
        state.file_select = None;
        state.pending = None;
        state.settled = None;
        log::debug!("Avatar canvas destroyed");
    }
}

impl AvatarCanvas {
    fn export(&self, format: ExportFormat, quality: Option<f64>) -> Result<String, JsValue> {
        let quality = export_quality(quality);
        self.shared
            .state
            .borrow()
            .canvas
            .to_data_url_with_type_and_encoder_options(format.mime(), &JsValue::from_f64(quality))
    }
}

#[cfg(test)]
mod browser_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn mount_canvas(id: &str, width: u32, height: u32) -> HtmlCanvasElement {
        let document = crate::canvas_utils::document().unwrap();
        let canvas = document
            .create_element("canvas")
            .unwrap()
            .dyn_into::<HtmlCanvasElement>()
            .unwrap();
        canvas.set_id(id);
        canvas.set_width(width);
        canvas.set_height(height);
        document.body().unwrap().append_child(&canvas).unwrap();
        canvas
    }

    fn mount_slider(id: &str) -> HtmlInputElement {
        let document = crate::canvas_utils::document().unwrap();
        let input = document
            .create_element("input")
            .unwrap()
            .dyn_into::<HtmlInputElement>()
            .unwrap();
        input.set_type("range");
        input.set_id(id);
        document.body().unwrap().append_child(&input).unwrap();
        input
    }

    #[wasm_bindgen_test]
    fn missing_canvas_is_an_error() {
        assert!(AvatarCanvas::new("no-such-canvas", JsValue::UNDEFINED).is_err());
    }

    #[wasm_bindgen_test]
    fn unloaded_widget_reports_neutral_scale() {
        mount_canvas("avatar-neutral", 300, 200);
        let avatar = AvatarCanvas::new("avatar-neutral", JsValue::UNDEFINED).unwrap();

        assert_eq!(avatar.get_scale(), 1.0);
        assert_eq!(avatar.get_scale_modifier(), 1.0);
        assert!(avatar.get_image().is_none());
    }

    #[wasm_bindgen_test]
    fn bare_slider_gets_default_attributes() {
        mount_canvas("avatar-slider", 300, 200);
        let slider = mount_slider("avatar-slider-input");
        slider.remove_attribute("max").unwrap();
        slider.remove_attribute("step").unwrap();

        let config = JsValue::from_serde(&serde_json::json!({ "slider": "avatar-slider-input" })).unwrap();
        let _avatar = AvatarCanvas::new("avatar-slider", config).unwrap();

        assert_eq!(slider.max(), "5");
        assert_eq!(slider.step(), "0.1");
        assert_eq!(slider.min(), "1");
        assert_eq!(slider.value(), "1");
    }

    #[wasm_bindgen_test]
    fn reconfiguring_without_binding_fails() {
        mount_canvas("avatar-unbound", 300, 200);
        let avatar = AvatarCanvas::new("avatar-unbound", JsValue::UNDEFINED).unwrap();
        let config = JsValue::from_serde(&serde_json::json!({ "max": 3 })).unwrap();

        assert!(avatar.slider(config).is_err());
    }

    #[wasm_bindgen_test]
    fn wrong_shaped_slider_config_is_logged_not_thrown() {
        mount_canvas("avatar-bad-slider", 300, 200);
        let avatar = AvatarCanvas::new("avatar-bad-slider", JsValue::UNDEFINED).unwrap();

        assert!(avatar.slider(JsValue::from(42)).is_ok());
        assert!(avatar.shared.state.borrow().slider.is_none());
    }

    #[wasm_bindgen_test]
    fn wheel_sensitivity_is_adjustable() {
        mount_canvas("avatar-sensitivity", 300, 200);
        let avatar = AvatarCanvas::new("avatar-sensitivity", JsValue::UNDEFINED).unwrap();

        avatar.set_wheel_sensitivity(0.1);

        assert_eq!(
            avatar.shared.state.borrow().controller.wheel_sensitivity(),
            0.1
        );
    }

    #[wasm_bindgen_test]
    fn clip_replacement_keeps_only_the_latest_shape() {
        mount_canvas("avatar-clip", 300, 200);
        let avatar = AvatarCanvas::new("avatar-clip", JsValue::UNDEFINED).unwrap();

        avatar.clip(JsValue::from_str("circle"));
        assert_eq!(avatar.shared.state.borrow().clip, Some(ClipShape::Circle));
        avatar.clip(JsValue::from_str("diamond"));
        assert_eq!(avatar.shared.state.borrow().clip, Some(ClipShape::Diamond));

        avatar.clip(JsValue::NULL);
        assert_eq!(avatar.shared.state.borrow().clip, None);
    }

    #[wasm_bindgen_test]
    fn png_export_is_a_data_url() {
        mount_canvas("avatar-export", 300, 200);
        let avatar = AvatarCanvas::new("avatar-export", JsValue::UNDEFINED).unwrap();

        let url = avatar.to_png(None).unwrap();

        assert!(url.starts_with(&ExportFormat::Png.data_url_prefix()));
    }

    #[wasm_bindgen_test]
    fn listeners_can_be_removed() {
        mount_canvas("avatar-listeners", 300, 200);
        let avatar = AvatarCanvas::new("avatar-listeners", JsValue::UNDEFINED).unwrap();
        let callback = js_sys::Function::new_no_args("");

        let id = avatar.on("imagechanged", callback);

        assert!(avatar.off(id));
        assert!(!avatar.off(id));
    }
}
