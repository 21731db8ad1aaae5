//! Wire/storage records for scene snapshots.
//!
//! These are plain serde shapes. They hold no live state and know nothing
//! about the graphics collaborator; the editor's codec converts between them
//! and the live scene.

mod hex_color;

use std::collections::BTreeMap;

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

pub use hex_color::HexColor;

/// Position / scale triple as stored on the wire
pub type Vec3Record = [f64; 3];

/// Named numeric geometry parameters (`width`, `radius`, `radialSegments`, ...)
pub type GeometryParams = BTreeMap<String, f64>;

/// Euler rotation, optionally followed by an order tag (`[x, y, z, "XYZ"]`).
/// The order tag is accepted and dropped; rotations are always XYZ.
fn deserialize_euler<'de, D>(deserializer: D) -> Result<Option<Vec3Record>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum EulerRepr {
        Plain([f64; 3]),
        Ordered(f64, f64, f64, IgnoredAny),
    }

    let repr = Option::<EulerRepr>::deserialize(deserializer)?;
    Ok(repr.map(|r| match r {
        EulerRepr::Plain(v) => v,
        EulerRepr::Ordered(x, y, z, _) => [x, y, z],
    }))
}

/// Surface material of a mesh. Colors are display-space (sRGB) hex.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MaterialRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<HexColor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emissive: Option<HexColor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roughness: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metalness: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transparent: Option<bool>,
}

/// A mesh object record (`objects[]` in a snapshot)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct MeshRecord {
    /// Stable id; a fresh one is generated on load when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Free-form kind tag ("Cube", "Box (2x1x1)", ...)
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Geometry family tag ("BoxGeometry", "SphereGeometry", ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry_params: Option<GeometryParams>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Vec3Record>,
    #[serde(
        default,
        deserialize_with = "deserialize_euler",
        skip_serializing_if = "Option::is_none"
    )]
    pub rotation: Option<Vec3Record>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<Vec3Record>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<MaterialRecord>,
}

/// A light record (`lights[]` in a snapshot)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct LightRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// "Point" | "Directional" | "Spot" | "Ambient"
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Absent for ambient lights
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Vec3Record>,
    /// Directional / spot only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_position: Option<Vec3Record>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<HexColor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intensity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decay: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angle: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub penumbra: Option<f64>,
}

/// Camera pose and projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraRecord {
    pub position: Vec3Record,
    /// Orbit pivot
    pub target: Vec3Record,
    /// Vertical field of view in degrees
    pub fov: f64,
    pub near: f64,
    pub far: f64,
}

impl Default for CameraRecord {
    fn default() -> Self {
        Self {
            position: [8.0, 8.0, 8.0],
            target: [0.0, 1.0, 0.0],
            fov: 60.0,
            near: 0.1,
            far: 5000.0,
        }
    }
}

/// Complete, serializable scene contents at one point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneSnapshot {
    #[serde(default)]
    pub objects: Vec<MeshRecord>,
    #[serde(default)]
    pub lights: Vec<LightRecord>,
    #[serde(default)]
    pub camera: CameraRecord,
    #[serde(default = "default_background")]
    pub scene_bg_color: HexColor,
    #[serde(default = "default_ambient_color")]
    pub default_ambient_light_color: HexColor,
    #[serde(default = "default_ambient_intensity")]
    pub default_ambient_light_intensity: f64,
}

pub fn default_background() -> HexColor {
    HexColor::from_rgb(0x1a, 0x1d, 0x21)
}

pub fn default_ambient_color() -> HexColor {
    HexColor::from_rgb(0x70, 0x70, 0x70)
}

pub fn default_ambient_intensity() -> f64 {
    0.5
}

impl Default for SceneSnapshot {
    fn default() -> Self {
        Self {
            objects: Vec::new(),
            lights: Vec::new(),
            camera: CameraRecord::default(),
            scene_bg_color: default_background(),
            default_ambient_light_color: default_ambient_color(),
            default_ambient_light_intensity: default_ambient_intensity(),
        }
    }
}

impl SceneSnapshot {
    /// Compact serialization. Snapshots are equal iff these strings are equal.
    pub fn to_json(&self) -> String {
        // Every field is a string, number, bool, array or string-keyed map
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Human-readable serialization used for export
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip<T: Serialize + for<'de> Deserialize<'de> + PartialEq + std::fmt::Debug>(val: &T) {
        let json = serde_json::to_string(val).expect("serialize");
        let back: T = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(*val, back);
    }

    fn sample_mesh() -> MeshRecord {
        let mut params = GeometryParams::new();
        params.insert("width".into(), 2.0);
        params.insert("height".into(), 1.0);
        params.insert("depth".into(), 1.0);
        MeshRecord {
            uuid: Some("m1".into()),
            name: Some("Box_1".into()),
            kind: Some("Box".into()),
            geometry_type: Some("BoxGeometry".into()),
            geometry_params: Some(params),
            position: Some([1.0, 0.5, -2.0]),
            rotation: Some([0.0, 0.25, 0.0]),
            scale: Some([1.0, 1.0, 1.0]),
            material: Some(MaterialRecord {
                color: Some(HexColor::from_rgb(0xcc, 0xcc, 0xcc)),
                emissive: Some(HexColor::from_rgb(0, 0, 0)),
                roughness: Some(0.6),
                metalness: Some(0.2),
                opacity: Some(1.0),
                transparent: Some(false),
            }),
        }
    }

    #[test]
    fn test_mesh_record_serde() {
        let m = sample_mesh();
        roundtrip(&m);
        let json = serde_json::to_string(&m).unwrap();
        assert!(json.contains(r#""type":"Box""#));
        assert!(json.contains(r#""geometryType":"BoxGeometry""#));
        assert!(json.contains(r##""color":"#cccccc""##));
    }

    #[test]
    fn test_light_record_skips_absent_fields() {
        let l = LightRecord {
            uuid: Some("l1".into()),
            name: Some("AmbientLight_1".into()),
            kind: Some("Ambient".into()),
            color: Some(HexColor::from_rgb(255, 255, 255)),
            intensity: Some(0.5),
            ..Default::default()
        };
        roundtrip(&l);
        let json = serde_json::to_string(&l).unwrap();
        assert!(!json.contains("position"));
        assert!(!json.contains("targetPosition"));
    }

    #[test]
    fn test_rotation_with_order_tag() {
        let json = r#"{"rotation": [0.1, 0.2, 0.3, "XYZ"]}"#;
        let m: MeshRecord = serde_json::from_str(json).unwrap();
        assert_eq!(m.rotation, Some([0.1, 0.2, 0.3]));
    }

    #[test]
    fn test_rotation_plain() {
        let json = r#"{"rotation": [1, 2, 3]}"#;
        let m: MeshRecord = serde_json::from_str(json).unwrap();
        assert_eq!(m.rotation, Some([1.0, 2.0, 3.0]));
    }

    #[test]
    fn test_empty_object_is_empty_snapshot() {
        let s: SceneSnapshot = serde_json::from_str("{}").unwrap();
        assert_eq!(s, SceneSnapshot::default());
        assert_eq!(s.camera.fov, 60.0);
        assert_eq!(s.scene_bg_color, HexColor::from_rgb(0x1a, 0x1d, 0x21));
    }

    #[test]
    fn test_snapshot_keys_are_camel_case() {
        let json = SceneSnapshot::default().to_json();
        assert!(json.contains("sceneBgColor"));
        assert!(json.contains("defaultAmbientLightColor"));
        assert!(json.contains("defaultAmbientLightIntensity"));
    }

    #[test]
    fn test_snapshot_serialization_is_deterministic() {
        let mut s = SceneSnapshot::default();
        s.objects.push(sample_mesh());
        assert_eq!(s.to_json(), s.clone().to_json());
        roundtrip(&s);
    }

    #[test]
    fn test_missing_camera_fields_use_defaults() {
        let json = r#"{"camera": {"fov": 45}}"#;
        let s: SceneSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(s.camera.fov, 45.0);
        assert_eq!(s.camera.position, [8.0, 8.0, 8.0]);
        assert_eq!(s.camera.far, 5000.0);
    }
}
