//! Lumen Core - renderer-agnostic scene descriptions.
//!
//! This crate provides:
//!
//! - **Camera settings**: `CameraSettings`, the user-facing camera options
//! - **Scene descriptions**: `SceneDescription`, named materials and the
//!   spheres that reference them, loadable from JSON
//!
//! # Example
//!
//! ```ignore
//! use lumen_core::SceneDescription;
//!
//! let scene = SceneDescription::load("scenes/showcase.json")?;
//! println!("Loaded {} materials, {} spheres",
//!     scene.materials.len(),
//!     scene.spheres.len());
//! ```

pub mod camera;
pub mod scene;

// Re-export commonly used types
pub use camera::CameraSettings;
pub use scene::{
    MaterialDescription, MaterialKind, SceneDescription, SceneError, SceneResult,
    SphereDescription,
};
