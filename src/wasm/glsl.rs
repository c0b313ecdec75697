//! GLSL ES 3.00 sources.
//!
//! `MASK_FRAG` is the GPU twin of `mask::shade`; keep the two in step.

/// Full-screen triangle from `gl_VertexID`, no vertex buffers.
pub const FULLSCREEN_VERT: &str = r#"#version 300 es
void main() {
    vec2 p = vec2(float((gl_VertexID << 1) & 2), float(gl_VertexID & 2));
    gl_Position = vec4(p * 2.0 - 1.0, 0.0, 1.0);
}
"#;

/// Stand-in for the model presenter's output: a lit, banded sphere spinning
/// above its ground shadow.
pub const SCENE_FRAG: &str = r#"#version 300 es
precision highp float;

uniform vec2 u_resolution;
uniform float u_time;

out vec4 frag_color;

void main() {
    vec2 p = (gl_FragCoord.xy - 0.5 * u_resolution) / min(u_resolution.x, u_resolution.y);
    vec3 col = mix(vec3(0.93, 0.94, 0.96), vec3(0.78, 0.82, 0.88), gl_FragCoord.y / u_resolution.y);

    float shadow = 1.0 - smoothstep(0.0, 0.32, length(vec2(p.x, (p.y + 0.36) * 4.0)));
    col *= 1.0 - 0.35 * shadow;

    float r2 = dot(p, p) / 0.09;
    if (r2 < 1.0) {
        vec3 n = vec3(p / 0.3, sqrt(1.0 - r2));
        float a = u_time * 0.6;
        float c = cos(a);
        float s = sin(a);
        vec3 rn = vec3(c * n.x + s * n.z, n.y, -s * n.x + c * n.z);
        float bands = step(0.0, sin(atan(rn.z, rn.x) * 6.0) * cos(rn.y * 9.0));
        vec3 base = mix(vec3(0.95, 0.45, 0.2), vec3(0.2, 0.5, 0.9), bands);
        float diffuse = max(dot(n, normalize(vec3(0.4, 0.6, 0.7))), 0.0);
        col = base * (0.25 + 0.75 * diffuse);
    }
    frag_color = vec4(col, 1.0);
}
"#;

pub const MASK_FRAG: &str = r#"#version 300 es
precision highp float;

uniform sampler2D u_scene;
uniform vec2 u_resolution;
uniform vec2 u_focus;
uniform float u_granularity;
uniform float u_circle_radius;
uniform float u_blur_radius;
uniform float u_fisheye_strength;
uniform float u_edge_warp_amplitude;
uniform float u_edge_warp_frequency;
uniform float u_border_thickness;
uniform vec3 u_border_color;
uniform bool u_active;

out vec4 frag_color;

const float MIN_DIST = 1e-4;

float mask_smoothstep(float edge0, float edge1, float x) {
    if (edge1 <= edge0) {
        return x < edge0 ? 0.0 : 1.0;
    }
    float t = clamp((x - edge0) / (edge1 - edge0), 0.0, 1.0);
    return t * t * (3.0 - 2.0 * t);
}

void main() {
    vec2 frag = gl_FragCoord.xy;
    vec2 uv = frag / u_resolution;

    vec2 cell = vec2(max(u_granularity, 1.0)) / u_resolution;
    vec2 snapped = floor(uv / cell) * cell + 0.5 / u_resolution;
    vec3 pixelated = texture(u_scene, snapped).rgb;
    if (!u_active) {
        frag_color = vec4(pixelated, 1.0);
        return;
    }

    vec2 delta = frag - u_focus;
    float raw = length(delta);
    float dist = raw;
    if (u_edge_warp_amplitude > 0.0 && u_edge_warp_frequency > 0.0 && raw > MIN_DIST) {
        float angle = atan(delta.y, delta.x);
        dist += sin(angle * u_edge_warp_frequency) * u_edge_warp_amplitude;
    }

    vec2 sample_uv = uv;
    if (u_fisheye_strength > 0.0 && u_circle_radius > 0.0 && raw < u_circle_radius && raw > MIN_DIST) {
        float t = clamp(raw / u_circle_radius, 0.0, 1.0);
        float s = u_fisheye_strength * (1.0 - t * t);
        vec2 focus_uv = u_focus / u_resolution;
        sample_uv = focus_uv + (uv - focus_uv) * (1.0 - s);
    }
    vec3 sharp = texture(u_scene, sample_uv).rgb;

    float outer = u_circle_radius + u_blur_radius;
    vec3 color;
    if (dist <= outer) {
        float k = mask_smoothstep(u_circle_radius - u_blur_radius, outer, dist);
        color = mix(sharp, pixelated, clamp(k, 0.0, 1.0));
    } else if (dist < outer + u_border_thickness) {
        color = u_border_color;
    } else {
        color = pixelated;
    }
    frag_color = vec4(color, 1.0);
}
"#;

/// Every uniform `MASK_FRAG` declares; `MaskPass` looks each one up.
pub const MASK_UNIFORMS: [&str; 12] = [
    "u_scene",
    "u_resolution",
    "u_focus",
    "u_granularity",
    "u_circle_radius",
    "u_blur_radius",
    "u_fisheye_strength",
    "u_edge_warp_amplitude",
    "u_edge_warp_frequency",
    "u_border_thickness",
    "u_border_color",
    "u_active",
];
