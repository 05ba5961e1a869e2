use glam::Vec3;

/// A single vertex with baked world-space attributes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    /// Material base color factor.
    pub color: [f32; 4],
    pub uv: [f32; 2],
}

/// Decoded base color image, tightly packed RGBA8 in sRGB.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Run of indices drawn with one base color texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshPart {
    pub first_index: u32,
    pub index_count: u32,
    /// Index into [`ModelMesh::textures`], or `None` for an untextured part.
    pub texture: Option<usize>,
}

/// Triangle list ready for upload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelMesh {
    pub name: String,
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
    pub parts: Vec<MeshPart>,
    pub textures: Vec<TextureImage>,
}

impl ModelMesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Axis-aligned bounds as `(min, max)`, or `None` for an empty mesh.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut iter = self.vertices.iter().map(|v| Vec3::from(v.position));
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p))))
    }

    /// Append one primitive as a new part, rebasing its indices.
    ///
    /// Every index must be below `vertices.len()`.
    pub(crate) fn extend(
        &mut self,
        vertices: Vec<MeshVertex>,
        indices: &[u32],
        texture: Option<usize>,
    ) {
        let base = self.vertices.len() as u32;
        self.parts.push(MeshPart {
            first_index: self.indices.len() as u32,
            index_count: indices.len() as u32,
            texture,
        });
        self.vertices.extend(vertices);
        self.indices.extend(indices.iter().map(|i| i + base));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertex(x: f32, y: f32, z: f32) -> MeshVertex {
        MeshVertex {
            position: [x, y, z],
            normal: [0.0, 0.0, 1.0],
            color: [1.0; 4],
            uv: [0.0; 2],
        }
    }

    #[test]
    fn empty_mesh_has_no_bounds() {
        let m = ModelMesh::default();
        assert!(m.is_empty());
        assert!(m.bounds().is_none());
    }

    #[test]
    fn bounds_cover_all_vertices() {
        let mut m = ModelMesh::default();
        m.extend(
            vec![vertex(-1.0, 2.0, 0.5), vertex(3.0, -4.0, 0.0), vertex(0.0, 0.0, -2.0)],
            &[0, 1, 2],
            None,
        );
        let (lo, hi) = m.bounds().unwrap();
        assert_eq!(lo, Vec3::new(-1.0, -4.0, -2.0));
        assert_eq!(hi, Vec3::new(3.0, 2.0, 0.5));
    }

    #[test]
    fn extend_rebases_indices() {
        let mut m = ModelMesh::default();
        m.extend(vec![vertex(0.0, 0.0, 0.0); 3], &[0, 1, 2], None);
        m.extend(vec![vertex(1.0, 1.0, 1.0); 3], &[0, 2, 1], Some(0));
        assert_eq!(m.indices, vec![0, 1, 2, 3, 5, 4]);
        assert_eq!(m.vertex_count(), 6);
        assert_eq!(m.triangle_count(), 2);
        assert_eq!(
            m.parts[1],
            MeshPart {
                first_index: 3,
                index_count: 3,
                texture: Some(0),
            }
        );
    }
}
