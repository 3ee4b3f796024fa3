//! Input state machine driving the viewport.
//!
//! The controller consumes host-neutral input (canvas-space pointer positions,
//! wheel deltas, slider values, image-load signals), mutates the
//! [`ViewportModel`] and answers each input with a [`Reaction`] describing what
//! the host has to do next. It never touches the DOM itself.

use crate::config::AvatarConfig;
use crate::events::AvatarEvent;
use crate::points::{Point, Rect, Size};
use crate::viewport::ViewportModel;

/// Independently togglable input capabilities. All enabled by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Master switch for wheel and slider zoom
    pub zoom: bool,
    /// Wheel zoom
    pub scroll: bool,
    /// Slider zoom
    pub slider: bool,
    /// Drag to pan
    pub pan: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            zoom: true,
            scroll: true,
            slider: true,
            pan: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    /// Pointer went down at `start` (canvas space)
    Dragging { start: Point },
}

/// What the host must do in response to one input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reaction {
    /// Repaint the canvas
    pub repaint: bool,
    /// Write this value into the bound slider, if any
    pub slider_value: Option<f64>,
    /// Notifications to dispatch, in order
    pub events: Vec<AvatarEvent>,
}

impl Reaction {
    fn repaint(events: Vec<AvatarEvent>) -> Self {
        Self {
            repaint: true,
            slider_value: None,
            events,
        }
    }

    fn notify(event: AvatarEvent) -> Self {
        Self {
            repaint: false,
            slider_value: None,
            events: vec![event],
        }
    }

    /// True when nothing at all has to happen
    pub fn is_noop(&self) -> bool {
        !self.repaint && self.slider_value.is_none() && self.events.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct InteractionController {
    /// `None` until the first image has loaded
    viewport: Option<ViewportModel>,
    capabilities: Capabilities,
    drag: DragState,
    mouse_on_canvas: Point,
    mouse_on_image: Point,
    view_rect: Rect,
    canvas: Size,
    wheel_sensitivity: f64,
    scale_max: f64,
}

impl InteractionController {
    pub fn new(wheel_sensitivity: f64, scale_max: f64) -> Self {
        Self {
            viewport: None,
            capabilities: Capabilities::default(),
            drag: DragState::Idle,
            mouse_on_canvas: Point::ORIGIN,
            mouse_on_image: Point::ORIGIN,
            view_rect: Rect::default(),
            canvas: Size::default(),
            wheel_sensitivity,
            scale_max: scale_max.max(1.0),
        }
    }

    pub fn from_config(config: &AvatarConfig) -> Self {
        Self::new(config.wheel_sensitivity, config.scale_max)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn viewport(&self) -> Option<&ViewportModel> {
        self.viewport.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.viewport.is_some()
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn capabilities_mut(&mut self) -> &mut Capabilities {
        &mut self.capabilities
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging { .. })
    }

    /// View rectangle of the last computed frame
    pub fn view_rect(&self) -> Rect {
        self.view_rect
    }

    pub fn origin(&self) -> Point {
        self.viewport
            .as_ref()
            .map_or(Point::ORIGIN, ViewportModel::origin)
    }

    /// `scale * scale_modifier`; 1 before any image has loaded
    pub fn effective_scale(&self) -> f64 {
        self.viewport
            .as_ref()
            .map_or(1.0, ViewportModel::effective_scale)
    }

    pub fn scale_modifier(&self) -> f64 {
        self.viewport
            .as_ref()
            .map_or(1.0, ViewportModel::scale_modifier)
    }

    pub fn scale_max(&self) -> f64 {
        self.scale_max
    }

    pub fn mouse_on_canvas(&self) -> Point {
        self.mouse_on_canvas
    }

    pub fn mouse_on_image(&self) -> Point {
        self.mouse_on_image
    }

    pub fn wheel_sensitivity(&self) -> f64 {
        self.wheel_sensitivity
    }

    pub fn set_wheel_sensitivity(&mut self, sensitivity: f64) {
        self.wheel_sensitivity = sensitivity;
    }

    /// Change the zoom ceiling. Returns the new modifier if it had to be lowered.
    pub fn set_scale_max(&mut self, scale_max: f64) -> Option<f64> {
        self.scale_max = scale_max.max(1.0);
        let vp = self.viewport.as_mut()?;
        let before = vp.scale_modifier();
        vp.set_scale_max(self.scale_max);
        (vp.scale_modifier() != before).then(|| vp.scale_modifier())
    }

    // ========================================================================
    // Frame
    // ========================================================================

    /// Compute (and clamp) the view rectangle for the next paint.
    ///
    /// Returns `None` while no image is loaded.
    pub fn frame(&mut self, canvas: Size) -> Option<Rect> {
        self.canvas = canvas;
        let vp = self.viewport.as_mut()?;
        self.view_rect = vp.compute_view_rect(canvas);
        Some(self.view_rect)
    }

    /// Re-derive the view for the current canvas so notifications carry the
    /// clamped origin.
    fn refresh(&mut self) {
        let canvas = self.canvas;
        self.frame(canvas);
    }

    // ========================================================================
    // Image lifecycle
    // ========================================================================

    /// A decode finished. Fits the image with the cover policy and resets zoom.
    pub fn image_loaded(&mut self, image: Size, canvas: Size, src: &str) -> Reaction {
        if image.is_empty() || canvas.is_empty() {
            log::warn!(
                "Ignoring image '{}' with unusable size {}x{} (canvas {}x{})",
                src,
                image.width,
                image.height,
                canvas.width,
                canvas.height
            );
            return self.image_failed(src);
        }

        if let Some(vp) = self.viewport.as_mut() {
            vp.on_image_loaded(image, canvas);
        } else {
            self.viewport = Some(ViewportModel::cover(image, canvas, self.scale_max));
        }
        self.canvas = canvas;
        self.refresh();

        Reaction {
            repaint: true,
            slider_value: Some(1.0),
            events: vec![AvatarEvent::ImageChanged {
                image: src.to_string(),
            }],
        }
    }

    pub fn image_failed(&mut self, src: &str) -> Reaction {
        Reaction::notify(AvatarEvent::ImageLoadFailed {
            image: src.to_string(),
        })
    }

    // ========================================================================
    // Pointer
    // ========================================================================

    pub fn pointer_down(&mut self, position: Point) -> Reaction {
        self.track(position);
        self.drag = DragState::Dragging { start: position };
        log::debug!("drag started at ({}, {})", position.x, position.y);

        Reaction::notify(AvatarEvent::MouseDown {
            canvas: self.mouse_on_canvas,
            image: self.mouse_on_image,
            origin: self.origin(),
        })
    }

    pub fn pointer_move(&mut self, position: Point) -> Reaction {
        self.track(position);

        let mut repaint = false;
        if let (DragState::Dragging { start }, true) = (self.drag, self.capabilities.pan) {
            if let Some(vp) = self.viewport.as_mut() {
                let offset = position.sub(&start).div_scalar(vp.effective_scale());
                vp.set_offset(offset);
                repaint = true;
            }
        }
        if repaint {
            self.refresh();
        }

        Reaction {
            repaint,
            slider_value: None,
            events: vec![AvatarEvent::MouseMove {
                dragging: self.is_dragging(),
                canvas: self.mouse_on_canvas,
                image: self.mouse_on_image,
                origin: self.origin(),
            }],
        }
    }

    /// Ends a drag, folding the pan offset into the origin. No-op while idle.
    pub fn pointer_up(&mut self) -> Reaction {
        if !self.is_dragging() {
            return Reaction::default();
        }
        self.drag = DragState::Idle;
        if let Some(vp) = self.viewport.as_mut() {
            vp.commit_offset();
        }
        self.refresh();
        log::debug!("drag ended, origin now {:?}", self.origin());

        Reaction::repaint(vec![AvatarEvent::MouseUp {
            canvas: self.mouse_on_canvas,
            image: self.mouse_on_image,
        }])
    }

    fn track(&mut self, position: Point) {
        self.mouse_on_canvas = position;
        if self.viewport.is_some() {
            self.mouse_on_image =
                ViewportModel::to_image_space(position, &self.view_rect, self.effective_scale());
        }
    }

    // ========================================================================
    // Zoom
    // ========================================================================

    /// Wheel zoom: negative `delta_y` zooms in. The origin is pulled halfway
    /// towards the image point under the cursor.
    pub fn wheel(&mut self, delta_y: f64) -> Reaction {
        if !(self.capabilities.zoom && self.capabilities.scroll) {
            return Reaction::default();
        }
        let sensitivity = self.wheel_sensitivity;
        let cursor = self.mouse_on_image;
        let Some(vp) = self.viewport.as_mut() else {
            return Reaction::default();
        };

        let modifier = vp.set_scale_modifier(vp.scale_modifier() + delta_y * -sensitivity);
        vp.reanchor_towards(cursor);
        self.refresh();

        Reaction {
            repaint: true,
            slider_value: Some(modifier),
            events: vec![self.scale_event(true)],
        }
    }

    /// Slider zoom. Values outside `[1, scale_max]` are clamped.
    pub fn slider_input(&mut self, value: f64) -> Reaction {
        if !(self.capabilities.zoom && self.capabilities.slider) {
            return Reaction::default();
        }
        let Some(vp) = self.viewport.as_mut() else {
            return Reaction::default();
        };

        vp.set_scale_modifier(value);
        self.refresh();

        Reaction::repaint(vec![self.scale_event(false)])
    }

    fn scale_event(&self, from_wheel: bool) -> AvatarEvent {
        let (scale, modifier) = self
            .viewport
            .as_ref()
            .map_or((1.0, 1.0), |vp| (vp.base_scale(), vp.scale_modifier()));
        let origin = self.origin();
        if from_wheel {
            AvatarEvent::Scaled {
                wheel: true,
                scale,
                modifier,
                absolute: scale * modifier,
                origin,
            }
        } else {
            AvatarEvent::ScaleChanged {
                slider: true,
                scale,
                modifier,
                absolute: scale * modifier,
                origin,
            }
        }
    }
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::from_config(&AvatarConfig::default())
    }
}
