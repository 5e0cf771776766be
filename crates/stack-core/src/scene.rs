use glam::{Mat4, Vec3};

use crate::config::SceneConfig;
use crate::error::{SceneError, SceneResult};
use crate::layout::{max_seam_error, stack_centers};
use crate::materials::Material;
use crate::params::{ParamKey, ParameterSet};
use crate::resources::GeometryBackend;
use crate::shapes::dispatcher::mesh_for;
use crate::shapes::{Orientation, Primitive, ShapeId};

/// One mesh of the scene: its dimensions, placement, material and the GPU
/// geometry currently standing for it.
#[derive(Debug)]
pub struct SceneObject<H> {
    pub id: ShapeId,
    pub primitive: Primitive,
    pub orientation: Orientation,
    pub material: Material,
    pub position: Vec3,
    geometry: Option<H>,
}

impl<H> SceneObject<H> {
    pub fn geometry(&self) -> Option<&H> {
        self.geometry.as_ref()
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.orientation.rotation(), self.position)
    }

    pub fn vertical_extent(&self) -> f32 {
        self.primitive.vertical_extent(self.orientation)
    }

    pub fn bottom(&self) -> f32 {
        self.position.y - self.vertical_extent() * 0.5
    }

    pub fn top(&self) -> f32 {
        self.position.y + self.vertical_extent() * 0.5
    }
}

/// Everything the renderer needs for one draw call.
pub struct DrawItem<'a, H> {
    pub shape: ShapeId,
    pub geometry: &'a H,
    pub model: Mat4,
    pub material: &'a Material,
}

/// Outcome of a single parameter change.
#[derive(Clone, Debug, PartialEq)]
pub struct ChangeReport {
    pub key: ParamKey,
    pub previous: f32,
    pub value: f32,
    pub delta: f32,
    /// Whether the shape's geometry was replaced.
    pub rebuilt: bool,
    /// Vertical movement of every shape whose position changed.
    pub offsets: Vec<(ShapeId, f32)>,
}

impl ChangeReport {
    pub fn offset_of(&self, shape: ShapeId) -> f32 {
        self.offsets
            .iter()
            .find(|(id, _)| *id == shape)
            .map_or(0.0, |(_, offset)| *offset)
    }
}

/// Five primitives stacked on a ground plane, resized through parameters.
///
/// Positions are never nudged by hand: after every change the whole stack is
/// laid out again from the current dimensions, so each shape's bottom rests on
/// the top of the one below it.
pub struct StackedScene<B: GeometryBackend> {
    config: SceneConfig,
    params: ParameterSet,
    // Indexed by `ShapeId as usize`.
    objects: Vec<SceneObject<B::Handle>>,
    backend: B,
}

impl<B: GeometryBackend> StackedScene<B> {
    pub fn new(config: SceneConfig, backend: B) -> SceneResult<Self> {
        let params = ParameterSet::default();
        let objects = ShapeId::STACK
            .into_iter()
            .chain([ShapeId::Ground])
            .map(|id| {
                let (primitive, orientation) = initial_primitive(id, &config, &params);
                let position = if id.is_stacked() {
                    Vec3::ZERO
                } else {
                    Vec3::new(0.0, config.ground_y, 0.0)
                };
                SceneObject {
                    id,
                    primitive,
                    orientation,
                    material: Material::preset(id),
                    position,
                    geometry: None,
                }
            })
            .collect();

        let mut scene = Self {
            config,
            params,
            objects,
            backend,
        };
        scene.relayout();

        for index in 0..scene.objects.len() {
            if let Err(err) = scene.rebuild_geometry(index) {
                scene.release_all();
                return Err(err);
            }
        }

        log::info!(
            "stacked scene ready on {} backend, stack top at y={:.3}",
            scene.backend.label(),
            scene.stack_top()
        );
        Ok(scene)
    }

    /// Apply a new value to `key`: resize its shape, re-stack everything above
    /// it and swap in freshly built geometry.
    ///
    /// Range limits are the panel's business; any finite positive value is
    /// accepted here. Re-applying the current value is a no-op unless the
    /// shape lost its geometry to a failed upload.
    pub fn on_parameter_change(&mut self, key: ParamKey, value: f32) -> SceneResult<ChangeReport> {
        if !value.is_finite() {
            return Err(SceneError::NonFinite { key, value });
        }
        if value <= 0.0 {
            return Err(SceneError::NonPositive { key, value });
        }

        let previous = self.params.get(key);
        let delta = self.params.apply(key, value);
        let mut report = ChangeReport {
            key,
            previous,
            value,
            delta,
            rebuilt: false,
            offsets: Vec::new(),
        };
        let index = key.shape() as usize;
        // A shape left without geometry by a failed upload is rebuilt even
        // when the value is unchanged.
        if delta == 0.0 && self.objects[index].geometry.is_some() {
            return Ok(report);
        }

        let object = &mut self.objects[index];
        object.primitive = object.primitive.with_dimension(value);

        report.offsets = self.relayout();
        self.rebuild_geometry(index)?;
        report.rebuilt = true;

        log::debug!(
            "{} {:.3} -> {:.3} (delta {:+.3}), {} shape(s) moved",
            key,
            previous,
            value,
            delta,
            report.offsets.len()
        );
        Ok(report)
    }

    /// [`on_parameter_change`](Self::on_parameter_change) addressed by string id,
    /// e.g. `"cube.size"`.
    pub fn set_parameter(&mut self, id: &str, value: f32) -> SceneResult<ChangeReport> {
        let key = ParamKey::from_id(id).ok_or_else(|| SceneError::UnknownParameter(id.to_owned()))?;
        self.on_parameter_change(key, value)
    }

    pub fn parameter(&self, key: ParamKey) -> f32 {
        self.params.get(key)
    }

    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn objects(&self) -> &[SceneObject<B::Handle>] {
        &self.objects
    }

    pub fn object(&self, shape: ShapeId) -> &SceneObject<B::Handle> {
        &self.objects[shape as usize]
    }

    pub fn position_y(&self, shape: ShapeId) -> f32 {
        self.object(shape).position.y
    }

    pub fn stack_top(&self) -> f32 {
        self.object(ShapeId::Cone).top()
    }

    /// Worst gap or overlap between neighbouring stacked shapes.
    pub fn seam_error(&self) -> f32 {
        let stacked = self.objects.iter().filter(|o| o.id.is_stacked());
        let (extents, centers): (Vec<f32>, Vec<f32>) =
            stacked.map(|o| (o.vertical_extent(), o.position.y)).unzip();
        max_seam_error(self.config.ground_y, &extents, &centers)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn draw_items(&self) -> impl Iterator<Item = DrawItem<'_, B::Handle>> + '_ {
        self.objects.iter().filter_map(|object| {
            Some(DrawItem {
                shape: object.id,
                geometry: object.geometry.as_ref()?,
                model: object.model_matrix(),
                material: &object.material,
            })
        })
    }

    /// Release every geometry handle and give the backend back.
    pub fn into_backend(mut self) -> B {
        self.release_all();
        self.backend
    }

    /// Recompute every stacked shape's Y from the current dimensions and
    /// return the shapes that moved.
    fn relayout(&mut self) -> Vec<(ShapeId, f32)> {
        let extents: Vec<f32> = self
            .objects
            .iter()
            .filter(|o| o.id.is_stacked())
            .map(|o| o.vertical_extent())
            .collect();
        let centers = stack_centers(self.config.ground_y, &extents);

        let mut offsets = Vec::new();
        let stacked = self.objects.iter_mut().filter(|o| o.id.is_stacked());
        for (object, center) in stacked.zip(centers) {
            let offset = center - object.position.y;
            if offset != 0.0 {
                log::trace!("{} moved {:+.4} to y={:.4}", object.id, offset, center);
                offsets.push((object.id, offset));
            }
            object.position.y = center;
        }
        offsets
    }

    /// Build the mesh for object `index` and swap it in, releasing the old
    /// geometry before the new upload.
    fn rebuild_geometry(&mut self, index: usize) -> SceneResult<()> {
        let object = &mut self.objects[index];
        let mesh = mesh_for(&object.primitive, &self.config.resolution);
        if let Some(old) = object.geometry.take() {
            self.backend.release(old);
        }
        object.geometry = Some(self.backend.upload(object.id.label(), &mesh)?);
        Ok(())
    }

    fn release_all(&mut self) {
        for object in &mut self.objects {
            if let Some(handle) = object.geometry.take() {
                self.backend.release(handle);
            }
        }
    }
}

fn initial_primitive(id: ShapeId, config: &SceneConfig, params: &ParameterSet) -> (Primitive, Orientation) {
    match id {
        ShapeId::CylinderSmall => (
            Primitive::Cylinder {
                radius: params.get(ParamKey::CylinderSmallRadius),
                height: config.small_cylinder_height,
            },
            Orientation::Lying,
        ),
        ShapeId::Sphere => (
            Primitive::Sphere {
                radius: params.get(ParamKey::SphereRadius),
            },
            Orientation::Upright,
        ),
        ShapeId::CylinderMedium => (
            Primitive::Cylinder {
                radius: params.get(ParamKey::CylinderMediumRadius),
                height: config.medium_cylinder_height,
            },
            Orientation::Upright,
        ),
        ShapeId::Cube => (
            Primitive::Cube {
                size: params.get(ParamKey::CubeSize),
            },
            Orientation::Upright,
        ),
        ShapeId::Cone => {
            let radius = params.get(ParamKey::ConeRadius);
            (Primitive::Cone { radius, height: radius }, Orientation::Inverted)
        }
        ShapeId::Ground => (
            Primitive::Plane {
                width: config.ground_size,
                depth: config.ground_size,
            },
            Orientation::Lying,
        ),
    }
}
