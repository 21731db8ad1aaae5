//! Factory functions for creating test data.
//!
//! Builds live entities, snapshot records and snapshot JSON for tests and
//! for scripted sessions.

use glam::DVec3;
use shared::{GeometryParams, HexColor, LightRecord, MaterialRecord, MeshRecord, SceneSnapshot};

use crate::state::{Geometry, LightKind, LightObject, MeshObject, Transform};

// ── Live entities ───────────────────────────────────────────────

/// Unit box mesh with a fixed id
pub fn cube_mesh(id: &str, name: &str) -> MeshObject {
    let mut mesh = MeshObject::new(name, "Cube", Geometry::unit_box());
    mesh.id = id.to_string();
    mesh
}

/// Unit box mesh at a position
pub fn cube_mesh_at(id: &str, name: &str, pos: [f64; 3]) -> MeshObject {
    let mut mesh = cube_mesh(id, name);
    mesh.transform = Transform::at(DVec3::from_array(pos));
    mesh
}

/// Sphere mesh with a fixed id
pub fn sphere_mesh(id: &str, name: &str, radius: f64) -> MeshObject {
    let mut mesh = MeshObject::new(
        name,
        "Sphere",
        Geometry::Sphere {
            radius,
            width_segments: 32,
            height_segments: 16,
        },
    );
    mesh.id = id.to_string();
    mesh
}

/// Light of any kind with default parameters and a fixed id
pub fn light(id: &str, name: &str, kind: LightKind) -> LightObject {
    let mut light = LightObject::new(name, kind);
    light.id = id.to_string();
    light
}

pub fn point_light(id: &str, name: &str) -> LightObject {
    light(id, name, LightKind::Point)
}

pub fn spot_light(id: &str, name: &str) -> LightObject {
    light(id, name, LightKind::Spot)
}

// ── Snapshot records ────────────────────────────────────────────

/// Box record as written by a capture
pub fn box_record(uuid: &str, name: &str, size: [f64; 3], pos: [f64; 3]) -> MeshRecord {
    let mut params = GeometryParams::new();
    params.insert("width".into(), size[0]);
    params.insert("height".into(), size[1]);
    params.insert("depth".into(), size[2]);
    MeshRecord {
        uuid: Some(uuid.to_string()),
        name: Some(name.to_string()),
        kind: Some("Box".to_string()),
        geometry_type: Some("BoxGeometry".to_string()),
        geometry_params: Some(params),
        position: Some(pos),
        rotation: Some([0.0; 3]),
        scale: Some([1.0; 3]),
        material: Some(MaterialRecord {
            color: Some(HexColor::from_u32(0xcccccc)),
            emissive: Some(HexColor::from_u32(0x000000)),
            roughness: Some(0.6),
            metalness: Some(0.2),
            opacity: Some(1.0),
            transparent: Some(false),
        }),
    }
}

/// Point light record
pub fn point_light_record(uuid: &str, name: &str, pos: [f64; 3]) -> LightRecord {
    LightRecord {
        uuid: Some(uuid.to_string()),
        name: Some(name.to_string()),
        kind: Some("Point".to_string()),
        position: Some(pos),
        color: Some(HexColor::from_u32(0xfff5e0)),
        intensity: Some(1.0),
        distance: Some(50.0),
        decay: Some(1.5),
        ..Default::default()
    }
}

/// Snapshot with default camera and environment
pub fn snapshot(objects: Vec<MeshRecord>, lights: Vec<LightRecord>) -> SceneSnapshot {
    SceneSnapshot {
        objects,
        lights,
        ..SceneSnapshot::default()
    }
}

/// Two boxes and a point light
pub fn sample_snapshot() -> SceneSnapshot {
    snapshot(
        vec![
            box_record("wall", "Wall", [4.0, 2.5, 0.2], [0.0, 1.25, -2.0]),
            box_record("table", "Table", [1.6, 0.75, 0.9], [0.5, 0.375, 0.0]),
        ],
        vec![point_light_record("lamp", "Lamp", [0.0, 2.4, 0.0])],
    )
}

/// [`sample_snapshot`] as pretty JSON
pub fn sample_snapshot_json() -> String {
    sample_snapshot().to_json_pretty()
}

/// Snapshot JSON with one unit box per position, ids `box_0`, `box_1`, ...
pub fn boxes_json(positions: &[[f64; 3]]) -> String {
    let objects = positions
        .iter()
        .enumerate()
        .map(|(i, pos)| box_record(&format!("box_{i}"), &format!("Box_{}", i + 1), [1.0; 3], *pos))
        .collect();
    snapshot(objects, Vec::new()).to_json()
}
