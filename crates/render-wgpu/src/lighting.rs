use bytemuck::{Pod, Zeroable};
use earthview_scene::{Light, LightKind};

/// Directional lights beyond this count are ignored by the shader.
pub const MAX_DIRECTIONAL_LIGHTS: usize = 2;

/// Light block as laid out in the shader uniform.
///
/// Colors are premultiplied by intensity. Directions point toward the light.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct LightUniforms {
    pub ambient: [f32; 4],
    pub directions: [[f32; 4]; MAX_DIRECTIONAL_LIGHTS],
    pub colors: [[f32; 4]; MAX_DIRECTIONAL_LIGHTS],
}

impl LightUniforms {
    pub fn from_lights(lights: &[Light]) -> Self {
        let mut out = Self::zeroed();
        let mut directional = 0;

        for light in lights {
            let radiance = light.color.0 * light.intensity;
            match light.kind {
                LightKind::Ambient => {
                    out.ambient[0] += radiance.x;
                    out.ambient[1] += radiance.y;
                    out.ambient[2] += radiance.z;
                }
                LightKind::Directional { from } => {
                    if directional == MAX_DIRECTIONAL_LIGHTS {
                        tracing::warn!(
                            light = light.name,
                            "directional light limit reached, skipping"
                        );
                        continue;
                    }
                    out.directions[directional] = from.extend(0.0).to_array();
                    out.colors[directional] = radiance.extend(1.0).to_array();
                    directional += 1;
                }
            }
        }
        out
    }
}
