pub mod api;
pub mod core;
pub mod systems;
pub mod renderer;
pub mod bridge;
pub mod input;
pub mod assets;
pub mod extensions;

// Re-export key types at crate root for convenience
pub use api::globe::{GlobeContext, EventSource, REPLAY_ID_BASE};
pub use api::config::GlobeConfig;
pub use api::types::{
    AttackId, AttackCategory, AttackEvent, Endpoint, GlobeEvent,
    CountryStat, CategoryStat, StatsSnapshot, MAX_INTENSITY,
};
pub use assets::geography::{Geography, CountryTable, CountryEntry};
pub use core::geo::{GeoCoord, to_sphere, from_sphere, angular_distance};
pub use core::spin::GlobeSpin;
pub use core::time::FixedTimestep;
pub use core::registry::VisualRegistry;
pub use core::schedule::{TaskScheduler, TaskKey, TaskAction, TaskId};
pub use renderer::instance::{PointInstance, LineVertex, RenderBuffer};
pub use renderer::camera::{CameraState, CameraMode, CameraUniform, OrbitControls};
pub use renderer::{Renderer, FrameData, DrawTiming, NullRenderer};
pub use input::queue::{InputEvent, InputQueue};
pub use bridge::protocol::ProtocolLayout;
pub use bridge::protocol::{LIGHT_FLOATS, DEFAULT_MAX_LIGHTS};
pub use systems::arc::{ArcBuilder, ArcCurve, ArcPlan};
pub use systems::attack::{AttackVisual, VisualPhase};
pub use systems::impact::{ImpactCluster, ImpactEffect};
pub use systems::lighting::{PointLight, LightState};
pub use systems::choreographer::{Choreographer, ChoreoPhase, ZoomQueueItem, ZoomState};
pub use systems::popup::PopupState;

// Extensions: easing and tweens
pub use extensions::{Easing, lerp, lerp_vec3, ease, ease_vec3, Tween};
