//! Snapshot codec
//!
//! Converts between the live [`SceneState`] and the serializable
//! [`SceneSnapshot`]. Decoding is tolerant: records that cannot be used are
//! skipped or substituted and reported as warnings, and only a payload that
//! is not a JSON object at all is rejected. Decoding never touches the
//! scene, so a rejected payload leaves everything as it was.

pub mod color;

use std::collections::HashSet;

use glam::DVec3;
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::{
    CameraRecord, GeometryParams, HexColor, LightRecord, MaterialRecord, MeshRecord, SceneSnapshot,
};

use crate::error::{SnapshotError, SnapshotWarning};
use crate::state::{
    new_entity_id, CameraState, EnvironmentState, Geometry, LightKind, LightObject, LightParams,
    LightSatellites, Material, MeshObject, SceneState, Transform,
};

use color::{hex_from_linear, linear_from_hex};

const DEFAULT_MESH_NAME: &str = "Object";
const DEFAULT_LIGHT_NAME: &str = "Light";

/// Everything that had to be substituted or skipped while decoding
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RestoreReport {
    pub warnings: Vec<SnapshotWarning>,
}

impl RestoreReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    fn warn(&mut self, warning: SnapshotWarning) {
        tracing::warn!("{}", warning);
        self.warnings.push(warning);
    }
}

/// A validated snapshot, ready to be swapped into a scene
#[derive(Debug, Clone)]
pub struct DecodedScene {
    pub meshes: Vec<MeshObject>,
    pub lights: Vec<LightObject>,
    pub camera: CameraState,
    pub environment: EnvironmentState,
    pub report: RestoreReport,
}

// ---------------------------------------------------------------------------
// capture

fn to_array(v: DVec3) -> [f64; 3] {
    v.to_array()
}

fn geometry_params(geometry: &Geometry) -> GeometryParams {
    let entries: Vec<(&str, f64)> = match *geometry {
        Geometry::Box {
            width,
            height,
            depth,
        } => vec![("width", width), ("height", height), ("depth", depth)],
        Geometry::Sphere {
            radius,
            width_segments,
            height_segments,
        } => vec![
            ("radius", radius),
            ("widthSegments", f64::from(width_segments)),
            ("heightSegments", f64::from(height_segments)),
        ],
        Geometry::Cylinder {
            radius_top,
            radius_bottom,
            height,
            radial_segments,
        } => vec![
            ("radiusTop", radius_top),
            ("radiusBottom", radius_bottom),
            ("height", height),
            ("radialSegments", f64::from(radial_segments)),
        ],
        Geometry::Plane { width, height } => vec![("width", width), ("height", height)],
    };
    entries
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

fn mesh_record(mesh: &MeshObject) -> MeshRecord {
    let material = mesh.authored_material();
    MeshRecord {
        uuid: Some(mesh.id.clone()),
        name: Some(mesh.name.clone()),
        kind: Some(mesh.kind.clone()),
        geometry_type: Some(mesh.geometry.family().to_string()),
        geometry_params: Some(geometry_params(&mesh.geometry)),
        position: Some(to_array(mesh.transform.position)),
        rotation: Some(to_array(mesh.transform.rotation)),
        scale: Some(to_array(mesh.transform.scale)),
        material: Some(MaterialRecord {
            color: Some(hex_from_linear(material.color)),
            emissive: Some(hex_from_linear(material.emissive)),
            roughness: Some(material.roughness),
            metalness: Some(material.metalness),
            opacity: Some(material.opacity),
            transparent: Some(material.transparent),
        }),
    }
}

fn light_record(light: &LightObject) -> LightRecord {
    let p = &light.params;
    LightRecord {
        uuid: Some(light.id.clone()),
        name: Some(light.name.clone()),
        kind: Some(light.kind.as_str().to_string()),
        position: light.position.map(to_array),
        target_position: p.target.map(to_array),
        color: Some(hex_from_linear(p.color)),
        intensity: Some(p.intensity),
        distance: p.distance,
        decay: p.decay,
        angle: p.angle,
        penumbra: p.penumbra,
    }
}

pub fn camera_record(camera: &CameraState) -> CameraRecord {
    CameraRecord {
        position: to_array(camera.position),
        target: to_array(camera.target),
        fov: camera.fov_degrees,
        near: camera.near,
        far: camera.far,
    }
}

pub fn camera_from_record(record: &CameraRecord) -> CameraState {
    CameraState {
        position: DVec3::from_array(record.position),
        target: DVec3::from_array(record.target),
        fov_degrees: record.fov,
        near: record.near,
        far: record.far,
    }
}

/// Serializable copy of the scene. Selection highlights are not part of it.
pub fn capture(scene: &SceneState) -> SceneSnapshot {
    let env = scene.environment();
    SceneSnapshot {
        objects: scene.meshes().iter().map(mesh_record).collect(),
        lights: scene.lights().iter().map(light_record).collect(),
        camera: camera_record(scene.camera()),
        scene_bg_color: hex_from_linear(env.background),
        default_ambient_light_color: hex_from_linear(env.ambient_color),
        default_ambient_light_intensity: env.ambient_intensity,
    }
}

/// Snapshot of a brand-new project: one default cube resting on the ground
pub fn initial_snapshot() -> SceneSnapshot {
    let mut cube = MeshObject::new("Default Cube", "Cube", Geometry::unit_box());
    cube.transform = Transform::at(DVec3::new(0.0, 0.5, 0.0));
    SceneSnapshot {
        objects: vec![mesh_record(&cube)],
        ..SceneSnapshot::default()
    }
}

// ---------------------------------------------------------------------------
// decode

/// Validate and convert snapshot text. Fails only when `text` is not a JSON
/// object.
pub fn decode(text: &str) -> Result<DecodedScene, SnapshotError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| SnapshotError::Malformed(e.to_string()))?;
    let Value::Object(root) = value else {
        return Err(SnapshotError::Malformed(
            "top level is not a JSON object".to_string(),
        ));
    };

    let mut report = RestoreReport::default();
    let objects: Vec<MeshRecord> = records(root.get("objects"), "objects", &mut report);
    let lights: Vec<LightRecord> = records(root.get("lights"), "lights", &mut report);
    let defaults = SceneSnapshot::default();
    let snapshot = SceneSnapshot {
        objects,
        lights,
        camera: field(root.get("camera"), "camera", &mut report).unwrap_or(defaults.camera),
        scene_bg_color: field(root.get("sceneBgColor"), "sceneBgColor", &mut report)
            .unwrap_or(defaults.scene_bg_color),
        default_ambient_light_color: field(
            root.get("defaultAmbientLightColor"),
            "defaultAmbientLightColor",
            &mut report,
        )
        .unwrap_or(defaults.default_ambient_light_color),
        default_ambient_light_intensity: field(
            root.get("defaultAmbientLightIntensity"),
            "defaultAmbientLightIntensity",
            &mut report,
        )
        .unwrap_or(defaults.default_ambient_light_intensity),
    };
    Ok(decode_with_report(&snapshot, report))
}

/// Convert an already-typed snapshot
pub fn decode_snapshot(snapshot: &SceneSnapshot) -> DecodedScene {
    decode_with_report(snapshot, RestoreReport::default())
}

/// Per-element decode of an array field; bad elements are skipped
fn records<T: DeserializeOwned>(
    value: Option<&Value>,
    collection: &'static str,
    report: &mut RestoreReport,
) -> Vec<T> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .filter_map(|(index, item)| match serde_json::from_value::<T>(item.clone()) {
                Ok(record) => Some(record),
                Err(e) => {
                    report.warn(SnapshotWarning::SkippedRecord {
                        collection,
                        index,
                        reason: e.to_string(),
                    });
                    None
                }
            })
            .collect(),
        Some(_) => {
            report.warn(SnapshotWarning::InvalidField {
                field: collection,
                reason: "expected an array".to_string(),
            });
            Vec::new()
        }
    }
}

/// Decode a scalar/object field, falling back (with a warning) when invalid
fn field<T: DeserializeOwned>(
    value: Option<&Value>,
    name: &'static str,
    report: &mut RestoreReport,
) -> Option<T> {
    match value {
        None | Some(Value::Null) => None,
        Some(v) => match serde_json::from_value::<T>(v.clone()) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                report.warn(SnapshotWarning::InvalidField {
                    field: name,
                    reason: e.to_string(),
                });
                None
            }
        },
    }
}

fn decode_with_report(snapshot: &SceneSnapshot, mut report: RestoreReport) -> DecodedScene {
    let mut ids = HashSet::new();
    let meshes = snapshot
        .objects
        .iter()
        .map(|r| mesh_from_record(r, &mut ids, &mut report))
        .collect();
    let lights = snapshot
        .lights
        .iter()
        .map(|r| light_from_record(r, &mut ids, &mut report))
        .collect();
    DecodedScene {
        meshes,
        lights,
        camera: camera_from_record(&snapshot.camera),
        environment: EnvironmentState {
            background: linear_from_hex(snapshot.scene_bg_color),
            ambient_color: linear_from_hex(snapshot.default_ambient_light_color),
            ambient_intensity: snapshot.default_ambient_light_intensity,
        },
        report,
    }
}

/// Keep the stored id unless it is missing or already taken
fn claim_id(
    stored: Option<&str>,
    entity: &str,
    ids: &mut HashSet<String>,
    report: &mut RestoreReport,
) -> String {
    let id = match stored.filter(|s| !s.is_empty()) {
        Some(id) if !ids.contains(id) => id.to_string(),
        Some(id) => {
            report.warn(SnapshotWarning::DuplicateId {
                entity: entity.to_string(),
                id: id.to_string(),
            });
            new_entity_id()
        }
        None => new_entity_id(),
    };
    ids.insert(id.clone());
    id
}

fn param(params: Option<&GeometryParams>, key: &str, default: f64) -> f64 {
    params
        .and_then(|p| p.get(key))
        .copied()
        .filter(|v| v.is_finite() && *v > 0.0)
        .unwrap_or(default)
}

fn segments(params: Option<&GeometryParams>, key: &str, default: u32) -> u32 {
    param(params, key, f64::from(default)).round().max(1.0) as u32
}

fn geometry_from_record(
    family: Option<&str>,
    params: Option<&GeometryParams>,
    entity: &str,
    report: &mut RestoreReport,
) -> Geometry {
    match family {
        None | Some("Box" | "BoxGeometry") => Geometry::Box {
            width: param(params, "width", 1.0),
            height: param(params, "height", 1.0),
            depth: param(params, "depth", 1.0),
        },
        Some("Sphere" | "SphereGeometry") => Geometry::Sphere {
            radius: param(params, "radius", 0.75),
            width_segments: segments(params, "widthSegments", 32),
            height_segments: segments(params, "heightSegments", 16),
        },
        Some("Cylinder" | "CylinderGeometry") => Geometry::Cylinder {
            radius_top: param(params, "radiusTop", 0.5),
            radius_bottom: param(params, "radiusBottom", 0.5),
            height: param(params, "height", 1.5),
            radial_segments: segments(params, "radialSegments", 32),
        },
        Some("Plane" | "PlaneGeometry") => Geometry::Plane {
            width: param(params, "width", 10.0),
            height: param(params, "height", 10.0),
        },
        Some(other) => {
            report.warn(SnapshotWarning::UnknownGeometryFamily {
                entity: entity.to_string(),
                family: other.to_string(),
            });
            Geometry::unit_box()
        }
    }
}

fn material_from_record(record: Option<&MaterialRecord>) -> Material {
    let defaults = Material::default();
    let Some(m) = record else {
        return defaults;
    };
    let opacity = m.opacity.unwrap_or(defaults.opacity);
    Material {
        color: m.color.map(linear_from_hex).unwrap_or(defaults.color),
        emissive: m.emissive.map(linear_from_hex).unwrap_or(defaults.emissive),
        roughness: m.roughness.unwrap_or(defaults.roughness),
        metalness: m.metalness.unwrap_or(defaults.metalness),
        opacity,
        transparent: m.transparent.unwrap_or(opacity < 1.0),
    }
}

fn vec_or(v: Option<[f64; 3]>, default: DVec3) -> DVec3 {
    v.map(DVec3::from_array).unwrap_or(default)
}

fn mesh_from_record(
    record: &MeshRecord,
    ids: &mut HashSet<String>,
    report: &mut RestoreReport,
) -> MeshObject {
    let name = record
        .name
        .clone()
        .unwrap_or_else(|| DEFAULT_MESH_NAME.to_string());
    let id = claim_id(record.uuid.as_deref(), &name, ids, report);
    let geometry = geometry_from_record(
        record.geometry_type.as_deref(),
        record.geometry_params.as_ref(),
        &name,
        report,
    );
    MeshObject {
        id,
        kind: record
            .kind
            .clone()
            .unwrap_or_else(|| DEFAULT_MESH_NAME.to_string()),
        name,
        geometry,
        transform: Transform {
            position: vec_or(record.position, DVec3::ZERO),
            rotation: vec_or(record.rotation, DVec3::ZERO),
            scale: vec_or(record.scale, DVec3::ONE),
        },
        material: material_from_record(record.material.as_ref()),
        saved_emissive: None,
        node: None,
    }
}

fn light_from_record(
    record: &LightRecord,
    ids: &mut HashSet<String>,
    report: &mut RestoreReport,
) -> LightObject {
    let name = record
        .name
        .clone()
        .unwrap_or_else(|| DEFAULT_LIGHT_NAME.to_string());
    let id = claim_id(record.uuid.as_deref(), &name, ids, report);
    let kind = match record.kind.as_deref().and_then(LightKind::parse) {
        Some(kind) => kind,
        None => {
            report.warn(SnapshotWarning::UnknownLightKind {
                entity: name.clone(),
                kind: record.kind.clone().unwrap_or_default(),
            });
            LightKind::Point
        }
    };

    let defaults = kind.default_params();
    let params = LightParams {
        color: record
            .color
            .map(linear_from_hex)
            .unwrap_or_else(|| linear_from_hex(HexColor::from_u32(0xffffff))),
        intensity: record.intensity.unwrap_or(defaults.intensity),
        distance: defaults.distance.map(|d| record.distance.unwrap_or(d)),
        decay: defaults.decay.map(|d| record.decay.unwrap_or(d)),
        angle: defaults.angle.map(|d| record.angle.unwrap_or(d)),
        penumbra: defaults.penumbra.map(|d| record.penumbra.unwrap_or(d)),
        target: defaults.target.map(|d| vec_or(record.target_position, d)),
    };
    let position = kind
        .default_position()
        .map(|d| vec_or(record.position, d));

    LightObject {
        id,
        name,
        kind,
        position,
        params,
        helper_tint: linear_from_hex(kind.helper_color()),
        saved_tint: None,
        satellites: LightSatellites::default(),
    }
}

// ---------------------------------------------------------------------------
// restore

/// Tear down the scene's entities and rebuild it from `decoded`. Callers
/// clear the selection first.
pub fn restore(scene: &mut SceneState, decoded: DecodedScene) -> RestoreReport {
    let DecodedScene {
        meshes,
        lights,
        camera,
        environment,
        report,
    } = decoded;

    scene.clear_entities();
    for mesh in meshes {
        scene.insert_mesh(None, mesh);
    }
    for light in lights {
        scene.insert_light(None, light);
    }
    scene.set_camera(camera);
    scene.set_environment(environment);

    tracing::info!(
        "Restored scene: {} objects, {} lights, {} warnings",
        scene.meshes().len(),
        scene.lights().len(),
        report.warnings.len()
    );
    report
}
