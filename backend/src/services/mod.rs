//! Service layer: background work and derived views that sit between the
//! wizard state machine and the HTTP handlers.
//!
//! Services own the tokio tasks (catalog search, tutorial animation) and
//! compute presentation data that is not part of the wizard itself.

pub mod search;
pub mod search_tracker;
pub mod system_view;
pub mod tutorial_animation;

pub use search::{SearchContext, SearchPhase, SearchPlan, SearchPlanError, SearchRunner};
pub use search_tracker::{LogLevel, SearchJob, SearchLogEntry, SearchStatus, SearchTracker};
pub use system_view::{system_scene, BackgroundStar, SystemScene};
pub use tutorial_animation::{TutorialAnimation, DEFAULT_FRAME_INTERVAL};
