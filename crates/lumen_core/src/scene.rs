//! Scene descriptions for lumen.
//!
//! A scene is a camera plus a flat list of spheres. Materials are declared
//! once by name and referenced from any number of spheres, mirroring how
//! the renderer shares one material instance between primitives.

use std::collections::HashSet;
use std::path::Path;

use lumen_math::{Color, Point3, Vec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::camera::CameraSettings;

/// Errors that can occur while loading or validating a scene.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse scene: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Material '{0}' is defined more than once")]
    DuplicateMaterial(String),

    #[error("Sphere {index} references unknown material '{material}'")]
    UnknownMaterial { index: usize, material: String },

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: f64 },
}

pub type SceneResult<T> = Result<T, SceneError>;

/// How a material scatters light.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MaterialKind {
    /// Ideal diffuse surface
    Lambertian { albedo: Color },
    /// Reflective surface, `fuzz` in [0, 1] roughens the reflection
    Metal {
        albedo: Color,
        #[serde(default)]
        fuzz: f64,
    },
    /// Clear refractive surface such as glass or water
    Dielectric { refraction_index: f64 },
}

/// A named material that spheres refer to.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MaterialDescription {
    pub name: String,
    #[serde(flatten)]
    pub kind: MaterialKind,
}

impl MaterialDescription {
    pub fn new(name: impl Into<String>, kind: MaterialKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// A sphere placed in the scene.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SphereDescription {
    pub center: Point3,
    pub radius: f64,
    /// Name of a material in [`SceneDescription::materials`]
    pub material: String,
}

impl SphereDescription {
    pub fn new(center: Point3, radius: f64, material: impl Into<String>) -> Self {
        Self {
            center,
            radius,
            material: material.into(),
        }
    }
}

/// Everything needed to render an image.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDescription {
    #[serde(default)]
    pub camera: CameraSettings,
    #[serde(default)]
    pub materials: Vec<MaterialDescription>,
    #[serde(default)]
    pub spheres: Vec<SphereDescription>,
}

impl SceneDescription {
    /// Load and validate a scene from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> SceneResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let scene = Self::from_json(&text)?;
        log::info!(
            "Loaded scene {}: {} materials, {} spheres",
            path.display(),
            scene.materials.len(),
            scene.spheres.len()
        );
        Ok(scene)
    }

    /// Parse and validate a scene from a JSON string.
    pub fn from_json(text: &str) -> SceneResult<Self> {
        let scene: SceneDescription = serde_json::from_str(text)?;
        scene.validate()?;
        Ok(scene)
    }

    /// Serialize the scene as pretty-printed JSON.
    pub fn to_json(&self) -> SceneResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check material names are unique and every sphere's material exists.
    ///
    /// Numeric ranges the renderer already tolerates (negative radius,
    /// fuzz above 1) are not rejected here; only values that cannot mean
    /// anything are.
    pub fn validate(&self) -> SceneResult<()> {
        let mut names = HashSet::new();
        for material in &self.materials {
            if !names.insert(material.name.as_str()) {
                return Err(SceneError::DuplicateMaterial(material.name.clone()));
            }
            if let MaterialKind::Dielectric { refraction_index } = material.kind {
                if !(refraction_index > 0.0) {
                    return Err(SceneError::InvalidValue {
                        field: format!("materials.{}.refraction_index", material.name),
                        value: refraction_index,
                    });
                }
            }
        }

        for (index, sphere) in self.spheres.iter().enumerate() {
            if !names.contains(sphere.material.as_str()) {
                return Err(SceneError::UnknownMaterial {
                    index,
                    material: sphere.material.clone(),
                });
            }
            if !sphere.radius.is_finite() {
                return Err(SceneError::InvalidValue {
                    field: format!("spheres[{}].radius", index),
                    value: sphere.radius,
                });
            }
        }

        if !(self.camera.aspect_ratio > 0.0) {
            return Err(SceneError::InvalidValue {
                field: "camera.aspect_ratio".into(),
                value: self.camera.aspect_ratio,
            });
        }

        Ok(())
    }

    /// The glass-and-mirrors showcase scene.
    pub fn showcase() -> Self {
        let camera = CameraSettings {
            aspect_ratio: 16.0 / 9.0,
            image_width: 600,
            samples_per_pixel: 100,
            max_depth: 30,
            vfov: 40.0,
            look_from: Point3::new(6.0, 5.0, -3.0),
            look_at: Point3::ZERO,
            vup: Vec3::X,
            defocus_angle: 0.3,
            focus_dist: 8.0,
        };

        let materials = vec![
            MaterialDescription::new(
                "matte_ground",
                MaterialKind::Lambertian {
                    albedo: Color::new(0.05, 0.05, 0.05),
                },
            ),
            MaterialDescription::new(
                "glass",
                MaterialKind::Dielectric {
                    refraction_index: 1.5,
                },
            ),
            MaterialDescription::new(
                "mirror_purple",
                MaterialKind::Metal {
                    albedo: Color::new(0.6, 0.2, 0.9),
                    fuzz: 0.0,
                },
            ),
            MaterialDescription::new(
                "mirror_blue",
                MaterialKind::Metal {
                    albedo: Color::new(0.2, 0.8, 1.0),
                    fuzz: 0.0,
                },
            ),
            MaterialDescription::new(
                "mirror_silver",
                MaterialKind::Metal {
                    albedo: Color::new(0.95, 0.95, 0.95),
                    fuzz: 0.0,
                },
            ),
        ];

        let spheres = vec![
            SphereDescription::new(Point3::new(0.0, -1000.5, 0.0), 1000.0, "matte_ground"),
            SphereDescription::new(Point3::new(0.0, 1.0, 0.0), 1.0, "glass"),
            SphereDescription::new(Point3::new(-2.5, 1.2, -1.5), 1.0, "mirror_purple"),
            SphereDescription::new(Point3::new(2.5, 1.0, -1.0), 1.0, "mirror_blue"),
            SphereDescription::new(Point3::new(0.0, 3.2, 0.5), 0.7, "mirror_silver"),
            SphereDescription::new(Point3::new(-2.5, 3.0, -1.5), 0.3, "glass"),
        ];

        Self {
            camera,
            materials,
            spheres,
        }
    }
}
