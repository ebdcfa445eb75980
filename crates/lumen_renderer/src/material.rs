//! Materials describing how light scatters off surfaces.
//!
//! The set of behaviors is closed: [`Material`] is an enum over the three
//! scatter models, shared between primitives through `Arc`.

use crate::{hittable::HitRecord, Ray};
use lumen_core::MaterialKind;
use lumen_math::{
    near_zero, reflect, refract,
    sampling::{random_double, random_unit_vector},
    unit_vector, Color, Vec3,
};
use rand::RngCore;

/// Result of a successful scatter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterResult {
    /// Color the scattered light is multiplied by
    pub attenuation: Color,
    /// The outgoing ray
    pub scattered: Ray,
}

/// A surface material.
#[derive(Debug, Clone, PartialEq)]
pub enum Material {
    Lambertian(Lambertian),
    Metal(Metal),
    Dielectric(Dielectric),
}

impl Material {
    /// Scatter an incoming ray.
    ///
    /// Returns `None` if the ray is absorbed.
    pub fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        match self {
            Material::Lambertian(m) => m.scatter(ray_in, rec, rng),
            Material::Metal(m) => m.scatter(ray_in, rec, rng),
            Material::Dielectric(m) => m.scatter(ray_in, rec, rng),
        }
    }
}

impl From<Lambertian> for Material {
    fn from(m: Lambertian) -> Self {
        Material::Lambertian(m)
    }
}

impl From<Metal> for Material {
    fn from(m: Metal) -> Self {
        Material::Metal(m)
    }
}

impl From<Dielectric> for Material {
    fn from(m: Dielectric) -> Self {
        Material::Dielectric(m)
    }
}

impl From<&MaterialKind> for Material {
    fn from(kind: &MaterialKind) -> Self {
        match *kind {
            MaterialKind::Lambertian { albedo } => Lambertian::new(albedo).into(),
            MaterialKind::Metal { albedo, fuzz } => Metal::new(albedo, fuzz).into(),
            MaterialKind::Dielectric { refraction_index } => {
                Dielectric::new(refraction_index).into()
            }
        }
    }
}

/// Lambertian (diffuse) material.
#[derive(Debug, Clone, PartialEq)]
pub struct Lambertian {
    albedo: Color,
}

impl Lambertian {
    /// Create a new Lambertian material with the given albedo color.
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }

    pub fn albedo(&self) -> Color {
        self.albedo
    }

    /// Offset the normal by a unit vector, falling back to the normal when
    /// the two nearly cancel.
    pub fn scatter_direction(normal: Vec3, unit_sample: Vec3) -> Vec3 {
        let direction = normal + unit_sample;
        if near_zero(direction) {
            normal
        } else {
            direction
        }
    }

    fn scatter(
        &self,
        _ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let direction = Self::scatter_direction(rec.normal, random_unit_vector(rng));
        Some(ScatterResult {
            attenuation: self.albedo,
            scattered: Ray::new(rec.p, direction),
        })
    }
}

/// Metal (specular) material.
#[derive(Debug, Clone, PartialEq)]
pub struct Metal {
    albedo: Color,
    fuzz: f64,
}

impl Metal {
    /// Create a new Metal material.
    ///
    /// - `albedo`: The color of the metal
    /// - `fuzz`: Roughness, 0.0 = perfect mirror, 1.0 = very rough.
    ///   Clamped to [0, 1].
    pub fn new(albedo: Color, fuzz: f64) -> Self {
        Self {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }

    pub fn albedo(&self) -> Color {
        self.albedo
    }

    pub fn fuzz(&self) -> f64 {
        self.fuzz
    }

    /// Mirror `direction` about `normal` and perturb it by `fuzz * unit_sample`.
    ///
    /// Returns `None` when the perturbed reflection points into the surface.
    pub fn scatter_direction(
        &self,
        direction: Vec3,
        normal: Vec3,
        unit_sample: Vec3,
    ) -> Option<Vec3> {
        let reflected = unit_vector(reflect(direction, normal)) + self.fuzz * unit_sample;
        (reflected.dot(normal) > 0.0).then_some(reflected)
    }

    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let direction =
            self.scatter_direction(ray_in.direction(), rec.normal, random_unit_vector(rng))?;
        Some(ScatterResult {
            attenuation: self.albedo,
            scattered: Ray::new(rec.p, direction),
        })
    }
}

/// Dielectric (glass) material.
#[derive(Debug, Clone, PartialEq)]
pub struct Dielectric {
    /// Refractive index in vacuum or air, or the ratio of the material's
    /// index over the index of the enclosing medium
    refraction_index: f64,
}

impl Dielectric {
    /// Create a new Dielectric material.
    ///
    /// - `refraction_index`: 1.0 = air, 1.33 = water, 1.5 = glass, 2.4 = diamond
    pub fn new(refraction_index: f64) -> Self {
        Self { refraction_index }
    }

    pub fn refraction_index(&self) -> f64 {
        self.refraction_index
    }

    /// Schlick's approximation for reflectance.
    pub fn reflectance(cosine: f64, refraction_ratio: f64) -> f64 {
        let r0 = ((1.0 - refraction_ratio) / (1.0 + refraction_ratio)).powi(2);
        r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
    }

    /// Ratio of indices across the boundary for a hit on the given side.
    pub fn refraction_ratio(&self, front_face: bool) -> f64 {
        if front_face {
            1.0 / self.refraction_index
        } else {
            self.refraction_index
        }
    }

    /// Choose between reflection and refraction for a ray arriving along
    /// `direction`.
    ///
    /// `sample` is a uniform draw in [0, 1) compared against the Schlick
    /// reflectance.
    pub fn scatter_direction(
        &self,
        direction: Vec3,
        normal: Vec3,
        front_face: bool,
        sample: f64,
    ) -> Vec3 {
        let ri = self.refraction_ratio(front_face);

        let unit_direction = unit_vector(direction);
        let cos_theta = (-unit_direction).dot(normal).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

        // Total internal reflection
        let cannot_refract = ri * sin_theta > 1.0;

        if cannot_refract || Self::reflectance(cos_theta, ri) > sample {
            reflect(unit_direction, normal)
        } else {
            refract(unit_direction, normal, ri)
        }
    }

    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let direction = self.scatter_direction(
            ray_in.direction(),
            rec.normal,
            rec.front_face,
            random_double(rng),
        );
        Some(ScatterResult {
            attenuation: Color::ONE,
            scattered: Ray::new(rec.p, direction),
        })
    }
}
