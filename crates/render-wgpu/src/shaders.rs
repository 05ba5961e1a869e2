/// WGSL shader for the lit, textured model mesh.
///
/// Untextured parts bind a 1x1 white texture so the base color factor passes through.
pub const MODEL_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
    model: mat4x4<f32>,
    normal_matrix: mat4x4<f32>,
    ambient: vec4<f32>,
    light_dirs: array<vec4<f32>, 2>,
    light_colors: array<vec4<f32>, 2>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

@group(1) @binding(0)
var base_color_texture: texture_2d<f32>;
@group(1) @binding(1)
var base_color_sampler: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) color: vec4<f32>,
    @location(3) uv: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_normal: vec3<f32>,
    @location(1) color: vec4<f32>,
    @location(2) uv: vec2<f32>,
};

@vertex
fn vs_main(vertex: VertexInput) -> VertexOutput {
    let world_pos = uniforms.model * vec4<f32>(vertex.position, 1.0);
    let world_normal = (uniforms.normal_matrix * vec4<f32>(vertex.normal, 0.0)).xyz;

    var out: VertexOutput;
    out.clip_position = uniforms.view_proj * world_pos;
    out.world_normal = normalize(world_normal);
    out.color = vertex.color;
    out.uv = vertex.uv;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let n = normalize(in.world_normal);
    var lighting = uniforms.ambient.rgb;
    for (var i = 0u; i < 2u; i = i + 1u) {
        let diffuse = max(dot(n, uniforms.light_dirs[i].xyz), 0.0);
        lighting = lighting + uniforms.light_colors[i].rgb * diffuse;
    }
    let base = in.color * textureSample(base_color_texture, base_color_sampler, in.uv);
    let rgb = min(base.rgb * lighting, vec3<f32>(1.0));
    return vec4<f32>(rgb, base.a);
}
"#;
