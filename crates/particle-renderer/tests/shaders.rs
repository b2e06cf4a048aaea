//! Shader validation without a GPU.
//!
//! The bundled WGSL is compiled with naga exactly as `compile_program` does,
//! and the failure paths are checked for useful diagnostics.

use particle_renderer::{
    compile_stage, link_stages, RenderError, ShaderStage, FRAGMENT_ENTRY, FRAGMENT_SHADER,
    POINT_COLOR, POINT_SIZE, VERTEX_ENTRY, VERTEX_SHADER,
};

#[test]
fn test_bundled_shaders_compile() {
    let vertex = compile_stage(VERTEX_SHADER, ShaderStage::Vertex).expect("vertex stage");
    let fragment = compile_stage(FRAGMENT_SHADER, ShaderStage::Fragment).expect("fragment stage");

    assert!(vertex.entry_points.iter().any(|ep| ep.name == VERTEX_ENTRY));
    assert!(fragment.entry_points.iter().any(|ep| ep.name == FRAGMENT_ENTRY));
    link_stages(&vertex, &fragment).expect("link");
}

#[test]
fn test_shader_constants_match_rendering_constants() {
    assert!(VERTEX_SHADER.contains(&format!("POINT_SIZE: f32 = {:.1}", POINT_SIZE)));

    let [r, g, b, a] = POINT_COLOR;
    let color = format!("vec4<f32>({:.1}, {:.1}, {:.1}, {:.1})", r, g, b, a);
    assert!(FRAGMENT_SHADER.contains(&color), "expected {color}");
}

#[test]
fn test_syntax_error_reports_stage_and_diagnostic() {
    let broken = "@vertex fn vs_main( -> @builtin(position) vec4<f32> {}";

    match compile_stage(broken, ShaderStage::Vertex) {
        Err(RenderError::ShaderCompile { stage, diagnostic }) => {
            assert_eq!(stage, ShaderStage::Vertex);
            assert!(!diagnostic.is_empty());
        }
        other => panic!("expected compile error, got {:?}", other.err()),
    }
}

#[test]
fn test_type_error_is_a_compile_error() {
    let mistyped = r#"
@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return vec3<f32>(1.0, 1.0, 1.0);
}
"#;

    let err = compile_stage(mistyped, ShaderStage::Fragment).unwrap_err();
    assert!(matches!(
        err,
        RenderError::ShaderCompile {
            stage: ShaderStage::Fragment,
            ..
        }
    ));
    assert!(err.to_string().starts_with("Failed to compile fragment shader"));
}

#[test]
fn test_missing_entry_point_fails_to_link() {
    let vertex = compile_stage(VERTEX_SHADER, ShaderStage::Vertex).unwrap();
    let fragment = compile_stage(
        r#"
@fragment
fn main() -> @location(0) vec4<f32> {
    return vec4<f32>(0.0);
}
"#,
        ShaderStage::Fragment,
    )
    .unwrap();

    let err = link_stages(&vertex, &fragment).unwrap_err();
    match err {
        RenderError::ProgramLink(msg) => assert!(msg.contains(FRAGMENT_ENTRY)),
        other => panic!("expected link error, got {other}"),
    }
}
