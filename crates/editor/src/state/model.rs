//! Live scene entities
//!
//! These are the mutable objects the editor works on. They mirror what the
//! graphics collaborator draws; the graph handles they carry are never
//! serialized.

use std::f64::consts::FRAC_PI_4;

use glam::DVec3;
use serde::{Deserialize, Serialize};
use shared::HexColor;

use crate::codec::color::linear_from_hex;
use crate::graph::NodeHandle;

/// Stable, unique entity identifier (UUID v4 string)
pub type EntityId = String;

/// Generate a fresh entity id
pub fn new_entity_id() -> EntityId {
    uuid::Uuid::new_v4().to_string()
}

/// Linear-space RGB color as the renderer consumes it
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color { r: 0.0, g: 0.0, b: 0.0 };

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn is_finite(&self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite()
    }
}

/// Position, Euler XYZ rotation (radians) and scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: DVec3,
    pub rotation: DVec3,
    pub scale: DVec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: DVec3::ZERO,
            rotation: DVec3::ZERO,
            scale: DVec3::ONE,
        }
    }
}

impl Transform {
    /// Identity rotation/scale at `position`
    pub fn at(position: DVec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.rotation.is_finite() && self.scale.is_finite()
    }
}

/// Shape family plus its numeric parameters
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Box {
        width: f64,
        height: f64,
        depth: f64,
    },
    Sphere {
        radius: f64,
        width_segments: u32,
        height_segments: u32,
    },
    Cylinder {
        radius_top: f64,
        radius_bottom: f64,
        height: f64,
        radial_segments: u32,
    },
    Plane {
        width: f64,
        height: f64,
    },
}

impl Geometry {
    pub fn unit_box() -> Self {
        Geometry::Box {
            width: 1.0,
            height: 1.0,
            depth: 1.0,
        }
    }

    /// Wire tag for this family
    pub fn family(&self) -> &'static str {
        match self {
            Geometry::Box { .. } => "BoxGeometry",
            Geometry::Sphere { .. } => "SphereGeometry",
            Geometry::Cylinder { .. } => "CylinderGeometry",
            Geometry::Plane { .. } => "PlaneGeometry",
        }
    }

    /// Half extents of the local bounding box
    pub fn half_extents(&self) -> DVec3 {
        match *self {
            Geometry::Box {
                width,
                height,
                depth,
            } => DVec3::new(width, height, depth) * 0.5,
            Geometry::Sphere { radius, .. } => DVec3::splat(radius),
            Geometry::Cylinder {
                radius_top,
                radius_bottom,
                height,
                ..
            } => {
                let r = radius_top.max(radius_bottom);
                DVec3::new(r, height * 0.5, r)
            }
            Geometry::Plane { width, height } => DVec3::new(width * 0.5, height * 0.5, 0.0),
        }
    }
}

/// PBR surface description
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub color: Color,
    pub emissive: Color,
    pub roughness: f64,
    pub metalness: f64,
    pub opacity: f64,
    pub transparent: bool,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: linear_from_hex(HexColor::from_u32(0xcccccc)),
            emissive: Color::BLACK,
            roughness: 0.6,
            metalness: 0.2,
            opacity: 1.0,
            transparent: false,
        }
    }
}

impl Material {
    pub fn is_finite(&self) -> bool {
        self.color.is_finite()
            && self.emissive.is_finite()
            && [self.roughness, self.metalness, self.opacity]
                .iter()
                .all(|v| v.is_finite())
    }
}

/// A primitive shape placed in the scene
#[derive(Debug, Clone, PartialEq)]
pub struct MeshObject {
    pub id: EntityId,
    pub name: String,
    /// Free-form kind tag shown in listings ("Box", "Sphere", "Box (2x1x1)")
    pub kind: String,
    pub geometry: Geometry,
    pub transform: Transform,
    pub material: Material,
    /// Emissive value from before the selection highlight was applied
    pub(crate) saved_emissive: Option<Color>,
    pub(crate) node: Option<NodeHandle>,
}

impl MeshObject {
    pub fn new(name: impl Into<String>, kind: impl Into<String>, geometry: Geometry) -> Self {
        Self {
            id: new_entity_id(),
            name: name.into(),
            kind: kind.into(),
            geometry,
            transform: Transform::default(),
            material: Material::default(),
            saved_emissive: None,
            node: None,
        }
    }

    /// Emissive color as the user set it, ignoring any selection highlight
    pub fn authored_emissive(&self) -> Color {
        self.saved_emissive.unwrap_or(self.material.emissive)
    }

    /// Material as the user set it, ignoring any selection highlight
    pub fn authored_material(&self) -> Material {
        Material {
            emissive: self.authored_emissive(),
            ..self.material
        }
    }

    pub fn is_highlighted(&self) -> bool {
        self.saved_emissive.is_some()
    }

    /// Graph node while the mesh is in the scene
    pub fn node(&self) -> Option<NodeHandle> {
        self.node
    }

    /// Copy with a fresh id, detached from the graph and unhighlighted
    pub fn duplicate(&self, name: impl Into<String>) -> Self {
        Self {
            id: new_entity_id(),
            name: name.into(),
            kind: self.kind.clone(),
            geometry: self.geometry.clone(),
            transform: self.transform,
            material: self.authored_material(),
            saved_emissive: None,
            node: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightKind {
    Point,
    Directional,
    Spot,
    Ambient,
}

impl LightKind {
    /// Wire tag ("Point", "Directional", ...)
    pub fn as_str(self) -> &'static str {
        match self {
            LightKind::Point => "Point",
            LightKind::Directional => "Directional",
            LightKind::Spot => "Spot",
            LightKind::Ambient => "Ambient",
        }
    }

    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "Point" => Some(LightKind::Point),
            "Directional" => Some(LightKind::Directional),
            "Spot" => Some(LightKind::Spot),
            "Ambient" => Some(LightKind::Ambient),
            _ => None,
        }
    }

    pub fn has_position(self) -> bool {
        self != LightKind::Ambient
    }

    /// Directional and spot lights aim at a target satellite
    pub fn has_target(self) -> bool {
        matches!(self, LightKind::Directional | LightKind::Spot)
    }

    pub fn has_helper(self) -> bool {
        self != LightKind::Ambient
    }

    /// Resting tint of the helper gizmo
    pub fn helper_color(self) -> HexColor {
        match self {
            LightKind::Point => HexColor::from_u32(0xffff00),
            LightKind::Directional => HexColor::from_u32(0x00ff00),
            LightKind::Spot => HexColor::from_u32(0xff0000),
            LightKind::Ambient => HexColor::from_u32(0x888888),
        }
    }

    pub fn default_position(self) -> Option<DVec3> {
        match self {
            LightKind::Point => Some(DVec3::new(2.0, 3.0, 2.0)),
            LightKind::Directional => Some(DVec3::new(5.0, 10.0, 7.5)),
            LightKind::Spot => Some(DVec3::new(0.0, 5.0, 3.0)),
            LightKind::Ambient => None,
        }
    }

    pub fn default_params(self) -> LightParams {
        let color = linear_from_hex(HexColor::from_u32(0xfff5e0));
        match self {
            LightKind::Point => LightParams {
                color,
                intensity: 1.0,
                distance: Some(50.0),
                decay: Some(1.5),
                angle: None,
                penumbra: None,
                target: None,
            },
            LightKind::Directional => LightParams {
                color,
                intensity: 0.8,
                distance: None,
                decay: None,
                angle: None,
                penumbra: None,
                target: Some(DVec3::ZERO),
            },
            LightKind::Spot => LightParams {
                color,
                intensity: 1.0,
                distance: Some(70.0),
                decay: Some(1.5),
                angle: Some(FRAC_PI_4),
                penumbra: Some(0.3),
                target: Some(DVec3::ZERO),
            },
            LightKind::Ambient => LightParams {
                color,
                intensity: 0.5,
                distance: None,
                decay: None,
                angle: None,
                penumbra: None,
                target: None,
            },
        }
    }
}

/// Editable light properties. Fields that do not apply to the light's kind
/// stay `None`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightParams {
    pub color: Color,
    pub intensity: f64,
    /// Point / spot
    pub distance: Option<f64>,
    /// Point / spot
    pub decay: Option<f64>,
    /// Spot only, radians
    pub angle: Option<f64>,
    /// Spot only
    pub penumbra: Option<f64>,
    /// Directional / spot aim point
    pub target: Option<DVec3>,
}

impl LightParams {
    pub fn is_finite(&self) -> bool {
        self.color.is_finite()
            && self.intensity.is_finite()
            && [self.distance, self.decay, self.angle, self.penumbra]
                .iter()
                .flatten()
                .all(|v| v.is_finite())
            && self.target.map_or(true, |t| t.is_finite())
    }
}

/// Graph nodes owned by a light. They exist iff the light is in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LightSatellites {
    pub node: Option<NodeHandle>,
    pub target: Option<NodeHandle>,
    pub helper: Option<NodeHandle>,
}

impl LightSatellites {
    pub fn is_attached(&self) -> bool {
        self.node.is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LightObject {
    pub id: EntityId,
    pub name: String,
    pub kind: LightKind,
    /// `None` for ambient lights
    pub position: Option<DVec3>,
    pub params: LightParams,
    /// Current helper tint (resting kind color, or the highlight)
    pub(crate) helper_tint: Color,
    pub(crate) saved_tint: Option<Color>,
    pub(crate) satellites: LightSatellites,
}

impl LightObject {
    /// New light with the defaults for `kind`
    pub fn new(name: impl Into<String>, kind: LightKind) -> Self {
        Self {
            id: new_entity_id(),
            name: name.into(),
            kind,
            position: kind.default_position(),
            params: kind.default_params(),
            helper_tint: linear_from_hex(kind.helper_color()),
            saved_tint: None,
            satellites: LightSatellites::default(),
        }
    }

    pub fn satellites(&self) -> LightSatellites {
        self.satellites
    }

    pub fn helper_tint(&self) -> Color {
        self.helper_tint
    }

    pub fn is_highlighted(&self) -> bool {
        self.saved_tint.is_some()
    }

    /// Copy with a fresh id, detached from the graph and unhighlighted
    pub fn duplicate(&self, name: impl Into<String>) -> Self {
        Self {
            id: new_entity_id(),
            name: name.into(),
            kind: self.kind,
            position: self.position,
            params: self.params,
            helper_tint: self.saved_tint.unwrap_or(self.helper_tint),
            saved_tint: None,
            satellites: LightSatellites::default(),
        }
    }

    /// Light expressed as a transform (only the position is meaningful)
    pub fn transform(&self) -> Option<Transform> {
        self.position.map(Transform::at)
    }
}

/// Camera pose and projection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    pub position: DVec3,
    /// Orbit pivot
    pub target: DVec3,
    pub fov_degrees: f64,
    pub near: f64,
    pub far: f64,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            position: DVec3::splat(8.0),
            target: DVec3::new(0.0, 1.0, 0.0),
            fov_degrees: 60.0,
            near: 0.1,
            far: 5000.0,
        }
    }
}

impl CameraState {
    pub fn is_finite(&self) -> bool {
        self.position.is_finite()
            && self.target.is_finite()
            && [self.fov_degrees, self.near, self.far]
                .iter()
                .all(|v| v.is_finite())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvironmentState {
    pub background: Color,
    pub ambient_color: Color,
    pub ambient_intensity: f64,
}

impl Default for EnvironmentState {
    fn default() -> Self {
        Self {
            background: linear_from_hex(shared::default_background()),
            ambient_color: linear_from_hex(shared::default_ambient_color()),
            ambient_intensity: shared::default_ambient_intensity(),
        }
    }
}

impl EnvironmentState {
    pub fn is_finite(&self) -> bool {
        self.background.is_finite()
            && self.ambient_color.is_finite()
            && self.ambient_intensity.is_finite()
    }
}

/// Either kind of placeable entity
#[derive(Debug, Clone, PartialEq)]
pub enum SceneEntity {
    Mesh(MeshObject),
    Light(LightObject),
}

impl SceneEntity {
    pub fn id(&self) -> &EntityId {
        match self {
            SceneEntity::Mesh(m) => &m.id,
            SceneEntity::Light(l) => &l.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            SceneEntity::Mesh(m) => &m.name,
            SceneEntity::Light(l) => &l.name,
        }
    }
}

/// Reference to an entity in the scene by kind and id
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum EntityRef {
    Mesh(EntityId),
    Light(EntityId),
}

impl EntityRef {
    pub fn id(&self) -> &EntityId {
        match self {
            EntityRef::Mesh(id) | EntityRef::Light(id) => id,
        }
    }
}

/// Primitive shapes offered by the "create" actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Box,
    Sphere,
    Cylinder,
    Plane,
}

impl ShapeKind {
    pub fn base_name(self) -> &'static str {
        match self {
            ShapeKind::Box => "Box",
            ShapeKind::Sphere => "Sphere",
            ShapeKind::Cylinder => "Cylinder",
            ShapeKind::Plane => "Plane",
        }
    }

    pub fn default_geometry(self) -> Geometry {
        match self {
            ShapeKind::Box => Geometry::unit_box(),
            ShapeKind::Sphere => Geometry::Sphere {
                radius: 0.75,
                width_segments: 32,
                height_segments: 16,
            },
            ShapeKind::Cylinder => Geometry::Cylinder {
                radius_top: 0.5,
                radius_bottom: 0.5,
                height: 1.5,
                radial_segments: 32,
            },
            ShapeKind::Plane => Geometry::Plane {
                width: 10.0,
                height: 10.0,
            },
        }
    }
}
