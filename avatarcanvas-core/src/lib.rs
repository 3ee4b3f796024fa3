pub mod clip;
pub mod config;
pub mod error;
pub mod events;
pub mod export;
pub mod image_load;
pub mod interaction;
pub mod points;
pub mod slider;
pub mod surface;
pub mod viewport;

pub use clip::ClipShape;
pub use config::{AvatarConfig, ClipOptions, SliderConfig, SliderOptions, DEFAULT_WHEEL_SENSITIVITY};
pub use error::{AvatarError, Result};
pub use events::{AvatarEvent, EventEmitter, Listener, ListenerId};
pub use export::{export_quality, ExportFormat};
pub use image_load::{LoadSequence, LoadTicket};
pub use interaction::{Capabilities, InteractionController, Reaction};
pub use points::{Point, Rect, Size};
pub use slider::{resolve_slider, SliderAttributes, SliderSetup};
pub use surface::{paint, DrawSurface, PathSink};
pub use viewport::{ViewportModel, DEFAULT_SCALE_MAX};
