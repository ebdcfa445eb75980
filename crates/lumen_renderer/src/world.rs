//! Turning a scene description into renderable objects.

use std::collections::HashMap;
use std::sync::Arc;

use lumen_core::{SceneDescription, SceneError, SceneResult};

use crate::{Camera, HittableList, Material, Sphere};

/// A camera and the objects it looks at, ready to render.
pub struct World {
    pub camera: Camera,
    pub objects: HittableList,
}

impl World {
    /// Build a world from a scene description.
    ///
    /// Each named material is created once; every sphere that names it
    /// shares that one instance.
    pub fn from_description(desc: &SceneDescription) -> SceneResult<Self> {
        desc.validate()?;

        let materials: HashMap<&str, Arc<Material>> = desc
            .materials
            .iter()
            .map(|m| (m.name.as_str(), Arc::new(Material::from(&m.kind))))
            .collect();

        let mut objects = HittableList::new();
        for (index, sphere) in desc.spheres.iter().enumerate() {
            let material = materials
                .get(sphere.material.as_str())
                .ok_or_else(|| SceneError::UnknownMaterial {
                    index,
                    material: sphere.material.clone(),
                })?;
            if sphere.radius < 0.0 {
                log::warn!(
                    "Sphere {} has negative radius {}, clamping to 0",
                    index,
                    sphere.radius
                );
            }
            objects.add(Sphere::new(sphere.center, sphere.radius, Arc::clone(material)));
        }

        log::debug!(
            "Built world with {} objects sharing {} materials",
            objects.len(),
            materials.len()
        );

        Ok(Self {
            camera: Camera::new(desc.camera.clone()),
            objects,
        })
    }
}
