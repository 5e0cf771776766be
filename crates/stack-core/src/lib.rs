//! Core of the stacked-primitives scene.
//!
//! Everything here is plain Rust with no browser dependency: mesh generation,
//! slider parameters, the stack layout, scene state, camera and orbit
//! controls. GPU resources are reached only through [`resources::GeometryBackend`],
//! so the whole scene runs headless in tests against [`resources::NullBackend`].

pub mod camera;
pub mod config;
pub mod controls;
pub mod error;
pub mod layout;
pub mod materials;
pub mod math;
pub mod params;
pub mod resources;
pub mod scene;
pub mod shapes;
pub mod stage;
pub mod viewport;

pub use error::{BackendError, SceneError, SceneResult};
pub use params::ParamKey;
pub use scene::StackedScene;
pub use shapes::ShapeId;
pub use stage::Stage;
