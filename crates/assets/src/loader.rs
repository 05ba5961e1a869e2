use crate::mesh::{MeshVertex, ModelMesh, TextureImage};
use glam::{Mat3, Mat4, Vec3};
use std::collections::HashMap;
use std::path::Path;

/// Errors from model loading.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("failed to load glTF file: {0}")]
    Gltf(#[from] gltf::Error),
    #[error("missing position data for mesh: {0}")]
    MissingPositions(String),
    #[error("mesh {mesh}: index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        mesh: String,
        index: u32,
        vertex_count: usize,
    },
    #[error("mesh {mesh}: {attribute} has {found} elements, expected {expected}")]
    AttributeCount {
        mesh: String,
        attribute: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("glTF file has no scene with triangle geometry")]
    EmptyScene,
}

/// Load the default scene of a `.gltf` or `.glb` file into one mesh.
///
/// Buffers and images are resolved relative to the file. Only images used as
/// a base color texture are kept.
pub fn load_model(path: impl AsRef<Path>) -> Result<ModelMesh, AssetError> {
    let path = path.as_ref();
    let (document, buffers, images) = gltf::import(path)?;

    let scene = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .ok_or(AssetError::EmptyScene)?;

    let mut baker = Baker {
        buffers: &buffers,
        images: &images,
        texture_slots: HashMap::new(),
        mesh: ModelMesh {
            name: scene
                .name()
                .map(str::to_string)
                .or_else(|| path.file_stem().map(|s| s.to_string_lossy().into_owned()))
                .unwrap_or_else(|| "model".into()),
            ..ModelMesh::default()
        },
    };

    for node in scene.nodes() {
        baker.node(&node, Mat4::IDENTITY)?;
    }

    let mesh = baker.mesh;
    if mesh.is_empty() {
        return Err(AssetError::EmptyScene);
    }

    tracing::info!(
        name = %mesh.name,
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        textures = mesh.textures.len(),
        "loaded glTF model"
    );
    Ok(mesh)
}

/// Accumulates baked primitives and the textures they reference.
struct Baker<'a> {
    buffers: &'a [gltf::buffer::Data],
    images: &'a [gltf::image::Data],
    /// glTF image index to slot in `mesh.textures`, `None` if undecodable.
    texture_slots: HashMap<usize, Option<usize>>,
    mesh: ModelMesh,
}

impl Baker<'_> {
    /// Bake a node and its children, accumulating parent transforms.
    fn node(&mut self, node: &gltf::Node, parent: Mat4) -> Result<(), AssetError> {
        let world = parent * Mat4::from_cols_array_2d(&node.transform().matrix());

        if let Some(node_mesh) = node.mesh() {
            let mesh_name = node_mesh.name().unwrap_or("unnamed");
            for primitive in node_mesh.primitives() {
                if primitive.mode() != gltf::mesh::Mode::Triangles {
                    tracing::debug!(
                        mesh = mesh_name,
                        mode = ?primitive.mode(),
                        "skipping non-triangle primitive"
                    );
                    continue;
                }
                self.primitive(&primitive, mesh_name, world)?;
            }
        }

        for child in node.children() {
            self.node(&child, world)?;
        }
        Ok(())
    }

    fn primitive(
        &mut self,
        primitive: &gltf::Primitive,
        mesh_name: &str,
        world: Mat4,
    ) -> Result<(), AssetError> {
        let buffers = self.buffers;
        let reader = primitive.reader(|buffer| {
            buffers
                .get(buffer.index())
                .map(|data| data.0.as_slice())
        });
        let positions: Vec<Vec3> = reader
            .read_positions()
            .ok_or_else(|| AssetError::MissingPositions(mesh_name.to_string()))?
            .map(|p| world.transform_point3(Vec3::from(p)))
            .collect();
        let vertex_count = positions.len();

        let indices: Vec<u32> = match reader.read_indices() {
            Some(indices) => indices.into_u32().collect(),
            None => (0..vertex_count as u32).collect(),
        };
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(AssetError::IndexOutOfRange {
                mesh: mesh_name.to_string(),
                index,
                vertex_count,
            });
        }

        let normal_matrix = Mat3::from_mat4(world).inverse().transpose();
        let normals: Vec<Vec3> = match reader.read_normals() {
            Some(normals) => normals
                .map(|n| (normal_matrix * Vec3::from(n)).normalize_or_zero())
                .collect(),
            None => smooth_normals(&positions, &indices),
        };
        check_count(mesh_name, "NORMAL", vertex_count, normals.len())?;

        let material = primitive.material();
        let pbr = material.pbr_metallic_roughness();
        let color = pbr.base_color_factor();
        let (texture, tex_coord) = match pbr.base_color_texture() {
            Some(info) => (
                self.texture_slot(info.texture().source().index()),
                info.tex_coord(),
            ),
            None => (None, 0),
        };

        let uvs: Vec<[f32; 2]> = match reader.read_tex_coords(tex_coord) {
            Some(uvs) => uvs.into_f32().collect(),
            None => vec![[0.0; 2]; vertex_count],
        };
        check_count(mesh_name, "TEXCOORD", vertex_count, uvs.len())?;

        let vertices = positions
            .iter()
            .zip(&normals)
            .zip(&uvs)
            .map(|((p, n), uv)| MeshVertex {
                position: p.to_array(),
                normal: n.to_array(),
                color,
                uv: *uv,
            })
            .collect();
        self.mesh.extend(vertices, &indices, texture);
        Ok(())
    }

    /// Decode a glTF image on first use and return its slot.
    fn texture_slot(&mut self, image: usize) -> Option<usize> {
        if let Some(slot) = self.texture_slots.get(&image) {
            return *slot;
        }
        let decoded = self.images.get(image).and_then(to_rgba8);
        let slot = decoded.map(|texture| {
            self.mesh.textures.push(texture);
            self.mesh.textures.len() - 1
        });
        if slot.is_none() {
            tracing::warn!(image, "unsupported base color image, using factor only");
        }
        self.texture_slots.insert(image, slot);
        slot
    }
}

fn check_count(
    mesh: &str,
    attribute: &'static str,
    expected: usize,
    found: usize,
) -> Result<(), AssetError> {
    if expected == found {
        return Ok(());
    }
    Err(AssetError::AttributeCount {
        mesh: mesh.to_string(),
        attribute,
        expected,
        found,
    })
}

/// Expand 8-bit images to RGBA8. Wider channel formats are not supported.
fn to_rgba8(image: &gltf::image::Data) -> Option<TextureImage> {
    use gltf::image::Format;

    let px = &image.pixels;
    let rgba = match image.format {
        Format::R8G8B8A8 => px.clone(),
        Format::R8G8B8 => px
            .chunks_exact(3)
            .flat_map(|p| [p[0], p[1], p[2], 255])
            .collect(),
        Format::R8G8 => px
            .chunks_exact(2)
            .flat_map(|p| [p[0], p[0], p[0], p[1]])
            .collect(),
        Format::R8 => px.iter().flat_map(|&l| [l, l, l, 255]).collect(),
        _ => return None,
    };
    Some(TextureImage {
        width: image.width,
        height: image.height,
        rgba,
    })
}

/// Area-weighted vertex normals for primitives that ship without normals.
///
/// Indices must already be in range.
fn smooth_normals(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let face = (positions[b] - positions[a]).cross(positions[c] - positions[a]);
        normals[a] += face;
        normals[b] += face;
        normals[c] += face;
    }
    normals.iter().map(|n| n.normalize_or(Vec3::Y)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    // Bytes 0..36 positions (0,0,0) (1,0,0) (0,1,0); 36..72 normals +Z; 72..96 uvs
    // (0,0) (1,0) (0,1); 96..102 u16 indices 0 1 2; 104..110 u16 indices 0 1 7.
    const TRIANGLE_BUFFER: &str = "data:application/octet-stream;base64,\
AAAAAAAAAAAAAAAAAACAPwAAAAAAAAAAAAAAAAAAgD8AAAAAAAAAAAAAAAAAAIA/AAAAAAAAAAAAAIA/AAAAAAAAAAAAAIA/\
AAAAAAAAAAAAAIA/AAAAAAAAAAAAAIA/AAABAAIAAAAAAAEABwAAAA==";

    // 2x1 RGBA PNG: one red pixel, one blue pixel.
    const TWO_PIXEL_PNG: &str = "data:image/png;base64,\
iVBORw0KGgoAAAANSUhEUgAAAAIAAAABCAYAAAD0In+KAAAADklEQVR4nGP4z8AAQv8BD/kD/YURmXYAAAAASUVORK5CYII=";

    const PLAIN: &str = r#"{ "attributes": { "POSITION": 0 }, "indices": 3, "material": 0 }"#;
    const TEXTURED: &str = r#"{
        "attributes": { "POSITION": 0, "NORMAL": 1, "TEXCOORD_0": 2 },
        "indices": 3,
        "material": 1
    }"#;

    fn model_gltf(node: &str, primitives: &[&str]) -> String {
        let primitives = primitives.join(", ");
        format!(
            r#"{{
  "asset": {{ "version": "2.0" }},
  "scene": 0,
  "scenes": [ {{ "name": "earth", "nodes": [0] }} ],
  "nodes": [ {node} ],
  "meshes": [ {{ "name": "tri", "primitives": [ {primitives} ] }} ],
  "materials": [
    {{ "pbrMetallicRoughness": {{ "baseColorFactor": [0.1, 0.4, 0.9, 1.0] }} }},
    {{ "pbrMetallicRoughness": {{ "baseColorTexture": {{ "index": 0 }} }} }}
  ],
  "textures": [ {{ "source": 0 }} ],
  "images": [ {{ "uri": "{TWO_PIXEL_PNG}" }} ],
  "buffers": [ {{ "byteLength": 112, "uri": "{TRIANGLE_BUFFER}" }} ],
  "bufferViews": [
    {{ "buffer": 0, "byteOffset": 0, "byteLength": 36, "target": 34962 }},
    {{ "buffer": 0, "byteOffset": 36, "byteLength": 36, "target": 34962 }},
    {{ "buffer": 0, "byteOffset": 72, "byteLength": 24, "target": 34962 }},
    {{ "buffer": 0, "byteOffset": 96, "byteLength": 6, "target": 34963 }},
    {{ "buffer": 0, "byteOffset": 104, "byteLength": 6, "target": 34963 }}
  ],
  "accessors": [
    {{ "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
       "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0] }},
    {{ "bufferView": 1, "componentType": 5126, "count": 3, "type": "VEC3" }},
    {{ "bufferView": 2, "componentType": 5126, "count": 3, "type": "VEC2" }},
    {{ "bufferView": 3, "componentType": 5123, "count": 3, "type": "SCALAR" }},
    {{ "bufferView": 4, "componentType": 5123, "count": 3, "type": "SCALAR" }},
    {{ "bufferView": 1, "componentType": 5126, "count": 2, "type": "VEC3" }}
  ]
}}"#
        )
    }

    fn write_gltf(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".gltf").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn loads_embedded_triangle() {
        let file = write_gltf(&model_gltf(r#"{ "mesh": 0 }"#, &[PLAIN]));
        let mesh = load_model(file.path()).unwrap();

        assert_eq!(mesh.name, "earth");
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.indices, vec![0, 1, 2]);
        assert_eq!(mesh.vertices[1].position, [1.0, 0.0, 0.0]);
        assert_eq!(mesh.vertices[0].color, [0.1, 0.4, 0.9, 1.0]);
        assert_eq!(mesh.parts.len(), 1);
        assert_eq!(mesh.parts[0].texture, None);
        assert!(mesh.textures.is_empty());
    }

    #[test]
    fn missing_normals_are_computed_from_winding() {
        let file = write_gltf(&model_gltf(r#"{ "mesh": 0 }"#, &[PLAIN]));
        let mesh = load_model(file.path()).unwrap();
        for v in &mesh.vertices {
            let n = Vec3::from(v.normal);
            assert!((n - Vec3::Z).length() < 1e-5);
        }
    }

    #[test]
    fn node_hierarchy_transforms_are_baked() {
        let file = write_gltf(&model_gltf(
            r#"{ "translation": [0.0, 0.0, 2.0], "scale": [2.0, 2.0, 2.0], "mesh": 0 }"#,
            &[PLAIN],
        ));
        let mesh = load_model(file.path()).unwrap();
        let (lo, hi) = mesh.bounds().unwrap();
        assert!((lo - Vec3::new(0.0, 0.0, 2.0)).length() < 1e-5);
        assert!((hi - Vec3::new(2.0, 2.0, 2.0)).length() < 1e-5);
    }

    #[test]
    fn base_color_texture_is_decoded_with_uvs() {
        let file = write_gltf(&model_gltf(r#"{ "mesh": 0 }"#, &[TEXTURED]));
        let mesh = load_model(file.path()).unwrap();

        assert_eq!(mesh.textures.len(), 1);
        let texture = &mesh.textures[0];
        assert_eq!((texture.width, texture.height), (2, 1));
        assert_eq!(texture.rgba, vec![255, 0, 0, 255, 0, 0, 255, 255]);
        assert_eq!(mesh.parts[0].texture, Some(0));
        assert_eq!(mesh.vertices[1].uv, [1.0, 0.0]);
        assert_eq!(mesh.vertices[2].uv, [0.0, 1.0]);
        // Default factor leaves the texture color unchanged.
        assert_eq!(mesh.vertices[0].color, [1.0; 4]);
    }

    #[test]
    fn shared_texture_is_decoded_once() {
        let file = write_gltf(&model_gltf(r#"{ "mesh": 0 }"#, &[TEXTURED, PLAIN, TEXTURED]));
        let mesh = load_model(file.path()).unwrap();

        assert_eq!(mesh.textures.len(), 1);
        let slots: Vec<_> = mesh.parts.iter().map(|p| p.texture).collect();
        assert_eq!(slots, vec![Some(0), None, Some(0)]);
        assert_eq!(mesh.parts[2].first_index, 6);
        assert_eq!(&mesh.indices[6..], &[6, 7, 8]);
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let bad = r#"{ "attributes": { "POSITION": 0 }, "indices": 4 }"#;
        let file = write_gltf(&model_gltf(r#"{ "mesh": 0 }"#, &[PLAIN, bad]));
        let err = load_model(file.path()).unwrap_err();
        assert!(matches!(
            err,
            AssetError::IndexOutOfRange {
                index: 7,
                vertex_count: 3,
                ..
            }
        ));
    }

    #[test]
    fn short_normal_accessor_is_rejected() {
        let short = r#"{ "attributes": { "POSITION": 0, "NORMAL": 5 }, "indices": 3 }"#;
        let file = write_gltf(&model_gltf(r#"{ "mesh": 0 }"#, &[short]));
        let err = load_model(file.path()).unwrap_err();
        assert!(matches!(
            err,
            AssetError::AttributeCount {
                attribute: "NORMAL",
                expected: 3,
                found: 2,
                ..
            }
        ));
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_model(dir.path().join("earth/scene.gltf")).unwrap_err();
        assert!(matches!(err, AssetError::Gltf(_)));
    }

    #[test]
    fn malformed_json_is_an_error() {
        let file = write_gltf("{ not gltf");
        assert!(load_model(file.path()).is_err());
    }

    #[test]
    fn scene_without_geometry_is_empty() {
        let file = write_gltf(
            r#"{ "asset": { "version": "2.0" }, "scene": 0, "scenes": [ { "nodes": [0] } ], "nodes": [ {} ] }"#,
        );
        let err = load_model(file.path()).unwrap_err();
        assert!(matches!(err, AssetError::EmptyScene));
    }

    #[test]
    fn smooth_normals_fall_back_to_up_for_degenerate_faces() {
        let positions = [Vec3::ZERO, Vec3::ZERO, Vec3::ZERO];
        let normals = smooth_normals(&positions, &[0, 1, 2]);
        assert!(normals.iter().all(|n| *n == Vec3::Y));
    }
}
