////////////////////////////////////////////////////////////////////////////////////
// Copyright (c) 2019 DasEtwas - All Rights Reserved                               /
//      Unauthorized copying of this file, via any medium is strictly prohibited   /
//      Proprietary and confidential                                               /
////////////////////////////////////////////////////////////////////////////////////

use std::{fs::File, path::PathBuf};

use entry_point_generator::{
    generate, output, render, render_all, ArtifactKind, Catalog, Document, EntryPointModel, Error,
    PackedEnumTable, Provenance, RenderContext, RenderedArtifact, Scope, Tables, Version,
};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures").join(name)
}

fn catalog() -> Catalog {
    Catalog::load(&fixture("gl.xml"), &[fixture("gl_angle_ext.xml")]).unwrap()
}

fn tables() -> Tables {
    let packed = PackedEnumTable::from_reader(File::open(fixture("packed.json")).unwrap()).unwrap();
    Tables::angle(packed)
}

fn provenance(catalog: &Catalog) -> Provenance {
    Provenance::new("gen_entry_points", 2018, "gl.xml", catalog.source_name())
}

fn artifacts() -> Vec<RenderedArtifact> {
    let catalog = catalog();
    generate(&catalog, &tables(), &provenance(&catalog)).unwrap()
}

fn contents(artifacts: &[RenderedArtifact], kind: ArtifactKind) -> &str {
    &artifacts
        .iter()
        .find(|artifact| artifact.kind == kind)
        .unwrap_or_else(|| panic!("{:?} was not rendered", kind))
        .contents
}

fn export_ordinals(def: &str) -> Vec<(String, u32)> {
    def.lines()
        .filter_map(|line| {
            let at = line.find('@')?;
            let symbol = line[..at].trim().to_owned();
            Some((symbol, line[at + 1..].parse().unwrap()))
        })
        .collect()
}

#[test]
fn test_every_artifact_is_rendered() {
    let artifacts = artifacts();
    // 5 header/source pairs, the context API, the enum, 2 export files, 4 includes
    assert_eq!(artifacts.len(), 18);

    let paths: Vec<_> = artifacts.iter().map(|a| a.path.to_string_lossy().into_owned()).collect();
    assert!(paths.contains(&"src/libGLESv2/entry_points_gles_3_1_autogen.h".to_owned()));
    assert!(paths.contains(&"src/libGLESv2/entry_points_gles_ext_autogen.cpp".to_owned()));
    assert!(paths.contains(&"src/libANGLE/Context_gles_1_0_autogen.h".to_owned()));
    assert!(paths.contains(&"include/GLES2/gl2ext_explicit_context_autogen.inc".to_owned()));
}

#[test]
fn test_generation_is_deterministic() {
    assert_eq!(artifacts(), artifacts());
}

#[test]
fn test_single_render_matches_full_render() {
    let catalog = catalog();
    let model = EntryPointModel::build(&catalog, &tables()).unwrap();
    let provenance = provenance(&catalog);
    let ctx = RenderContext::new(&model, &provenance);

    let artifacts = render_all(&ctx).unwrap();
    assert_eq!(artifacts.len(), 18);
    for artifact in &artifacts {
        assert_eq!(artifact.path, artifact.kind.path());
        assert_eq!(render(artifact.kind, &ctx).unwrap(), artifact.contents, "{:?}", artifact.kind);
    }
}

#[test]
fn test_ordinals_are_contiguous_and_unique() {
    let artifacts = artifacts();
    let exports = export_ordinals(contents(&artifacts, ArtifactKind::ExportDefinitions));

    let ordinals: Vec<u32> = exports.iter().map(|(_, ordinal)| *ordinal).collect();
    assert_eq!(ordinals, (1..=42).collect::<Vec<_>>());

    let lookup = |symbol: &str| exports.iter().find(|(s, _)| s == symbol).map(|(_, o)| *o);
    assert_eq!(lookup("glActiveTexture"), Some(1));
    assert_eq!(lookup("glClear"), Some(3));
    assert_eq!(lookup("glAlphaFunc"), Some(10));
    assert_eq!(lookup("glRequestExtensionANGLE"), Some(13));
    assert_eq!(lookup("glBindVertexArrayOES"), Some(21));
    assert_eq!(lookup("glActiveTextureContextANGLE"), Some(22));
    assert_eq!(lookup("glClearContextANGLE"), Some(24));
    assert_eq!(lookup("glDrawABCDContextANGLE"), Some(25));
}

#[test]
fn test_duplicate_command_is_defined_once() {
    let artifacts = artifacts();
    let es2 = contents(&artifacts, ArtifactKind::EntryPointSource(Scope::Version(Version::new(2, 0))));
    let ext = contents(&artifacts, ArtifactKind::EntryPointSource(Scope::Extensions));

    assert_eq!(es2.matches("void GL_APIENTRY DrawABCD(GLint x)").count(), 1);
    assert_eq!(ext.matches("void GL_APIENTRY DrawABCD(GLint x)").count(), 0);
    assert!(ext.contains("\n// GL_EXT_draw_buffers\n"));
    assert!(ext.contains("// DrawABCD is already defined.\n"));

    let def = contents(&artifacts, ArtifactKind::ExportDefinitions);
    assert_eq!(def.matches("    glDrawABCD ").count(), 1);
}

#[test]
fn test_gles1_does_not_redefine_gles2_commands() {
    let artifacts = artifacts();
    let scope = Scope::Version(Version::new(1, 0));
    let header = contents(&artifacts, ArtifactKind::EntryPointHeader(scope));

    assert!(header.contains("ANGLE_EXPORT void GL_APIENTRY AlphaFunc(GLenum func, GLfloat ref);"));
    assert!(header.contains("ANGLE_EXPORT void GL_APIENTRY GetPointerv(GLenum pname, void **params);"));
    assert!(!header.contains(" Clear("));
    assert!(!header.contains("already defined"));

    let source = contents(&artifacts, ArtifactKind::EntryPointSource(scope));
    assert!(!source.contains("void GL_APIENTRY Clear("));
    assert!(source.contains(
        "// ActiveTexture is already defined.
// Clear is already defined.
// GetError is already defined.
// GetString is already defined.
"
    ));
}

#[test]
fn test_extensions_sorted_with_explicit_context_last() {
    let artifacts = artifacts();
    let header = contents(&artifacts, ArtifactKind::EntryPointHeader(Scope::Extensions));

    let banners = [
        "// GL_ANGLE_request_extension",
        "// GL_EXT_debug_marker",
        "// GL_EXT_draw_buffers",
        "// GL_EXT_texture_storage",
        "// GL_KHR_debug",
        "// GL_OES_framebuffer_object",
        "// GL_OES_matrix_palette",
        "// GL_OES_vertex_array_object",
        "// EGL_ANGLE_explicit_context",
    ];
    let positions: Vec<usize> = banners.iter().map(|banner| header.find(banner).unwrap()).collect();
    assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
    assert!(!header.contains("GL_NV_fence_foo"));
}

#[test]
fn test_foreign_api_and_dsa_groups_are_filtered() {
    let artifacts = artifacts();
    let header = contents(&artifacts, ArtifactKind::EntryPointHeader(Scope::Extensions));

    assert!(header.contains(" DebugMessageControlKHR("));
    assert!(!header.contains(" DebugMessageControl("));
    assert!(header.contains(" TexStorage2DEXT("));
    assert!(!header.contains("TextureStorage2DEXT"));
}

#[test]
fn test_debug_marker_definition() {
    let artifacts = artifacts();
    let ext = contents(&artifacts, ArtifactKind::EntryPointSource(Scope::Extensions));

    assert!(ext.contains(
        "    // EVENT(\"(length = %d, marker = 0x%0.8p)\", length, marker);\n\n    Context *context = \
         GetValidGlobalContext();"
    ));
    assert!(ext.contains("context->pushGroupMarker(length, marker);"));
    assert!(ext.contains("context->requestExtension(name);"));
}

#[test]
fn test_packed_enums_reach_every_artifact() {
    let artifacts = artifacts();
    let es2 = contents(&artifacts, ArtifactKind::EntryPointSource(Scope::Version(Version::new(2, 0))));
    assert!(es2.contains("        BufferBinding targetPacked = FromGLenum<BufferBinding>(target);\n"));
    assert!(es2.contains("ValidateBindBuffer(context, targetPacked, buffer)"));

    let ext = contents(&artifacts, ArtifactKind::EntryPointSource(Scope::Extensions));
    assert!(ext.contains("void GL_APIENTRY BindBufferContextANGLE(GLeglContext ctx, GLenum target, GLuint buffer)"));
    assert!(ext.contains("context->bindBuffer(targetPacked, buffer);"));

    let api = contents(&artifacts, ArtifactKind::ContextApi(Version::new(1, 0)));
    assert!(api.contains("    void matrixMode(MatrixType modePacked); \\\n"));
}

#[test]
fn test_context_api_macro() {
    let artifacts = artifacts();
    let api = contents(&artifacts, ArtifactKind::ContextApi(Version::new(1, 0)));

    assert!(api.contains("#define ANGLE_GLES1_CONTEXT_API \\\n    void alphaFunc(GLenum func, GLfloat ref); \\\n"));
    assert!(!api.contains("getPointerv"));
    assert!(api.contains(
        "    /* GL_OES_framebuffer_object */ \\\n    /* GL_OES_matrix_palette */ \\\n    void \
         currentPaletteMatrix(GLuint matrixpaletteindex); \\\n"
    ));
    assert!(!api.contains("bindFramebuffer"));
    // listed even though the registry does not define it
    assert!(api.contains("    /* GL_OES_draw_texture */ \\\n"));
}

#[test]
fn test_export_definitions_layout() {
    let artifacts = artifacts();
    let def = contents(&artifacts, ArtifactKind::ExportDefinitions);

    assert!(def.starts_with("; GENERATED FILE - DO NOT EDIT.\n"));
    assert!(def.contains("LIBRARY libGLESv2\nEXPORTS\n\n    ; OpenGL ES 2.0\n    glActiveTexture"));
    assert!(def.contains(&format!("\n    glClear{}@3\n", " ".repeat(43))));
    assert!(def.contains(&format!("\n    glClearContextANGLE{}@24\n", " ".repeat(43))));
    assert!(def.contains("\n\n    ; GL_OES_matrix_palette\n"));
    assert!(def.contains("\n\n    ; EGL_ANGLE_explicit_context\n"));
}

#[test]
fn test_entry_points_enum() {
    let artifacts = artifacts();
    let header = contents(&artifacts, ArtifactKind::EntryPointsEnum);

    assert!(header.contains("enum class EntryPoint\n{\n    Invalid,\n    ActiveTexture,\n    AlphaFunc,\n"));
    assert!(header.contains("    UniformMatrix2fv\n};\n"));
    assert_eq!(header.matches("    DrawABCD,\n").count(), 1);
}

#[test]
fn test_explicit_context_includes() {
    let artifacts = artifacts();

    let es1 = contents(&artifacts, ArtifactKind::ExplicitContextInc(Version::new(1, 0)));
    assert!(es1.contains("// glext_explicit_context_autogen.inc:\n"));
    assert!(es1.contains(
        "GL_API void GL_APIENTRY glCurrentPaletteMatrixOESContextANGLE(GLeglContext ctx, GLuint \
         matrixpaletteindex);"
    ));

    let es2 = contents(&artifacts, ArtifactKind::ExplicitContextInc(Version::new(2, 0)));
    assert!(es2.contains(
        "typedef const GLubyte *(GL_APIENTRYP PFNGLGETSTRINGCONTEXTANGLE)(GLeglContext ctx, GLenum name);"
    ));
    assert!(es2.contains("GL_APICALL void GL_APIENTRY glDrawBuffersEXTContextANGLE("));
    assert!(!es2.contains("glCurrentPaletteMatrixOES"));

    // catalog order, not extension order
    let position = |name: &str| es2.find(name).unwrap_or_else(|| panic!("{} is missing", name));
    assert!(position("PFNGLBINDVERTEXARRAYOESCONTEXTANGLE") < position("PFNGLDEBUGMESSAGECONTROLKHRCONTEXTANGLE"));
    assert!(position("PFNGLDEBUGMESSAGECONTROLKHRCONTEXTANGLE") < position("PFNGLPUSHGROUPMARKEREXTCONTEXTANGLE"));
    assert!(position("PFNGLTEXSTORAGE2DEXTCONTEXTANGLE") < position("PFNGLREQUESTEXTENSIONANGLECONTEXTANGLE"));
    assert!(position("glGetStringContextANGLE") < position("glBindVertexArrayOESContextANGLE"));

    let es31 = contents(&artifacts, ArtifactKind::ExplicitContextInc(Version::new(3, 1)));
    assert!(es31.contains("#ifdef GL_GLEXT_PROTOTYPES\nGL_APICALL void GL_APIENTRY glMemoryBarrierContextANGLE"));
}

#[test]
fn test_provenance_banner() {
    let artifacts = artifacts();
    let es2 = contents(&artifacts, ArtifactKind::EntryPointHeader(Scope::Version(Version::new(2, 0))));
    assert!(es2.starts_with(
        "// GENERATED FILE - DO NOT EDIT.\n// Generated by gen_entry_points using data from gl.xml.\n//\n// \
         Copyright 2018 The ANGLE Project Authors. All rights reserved.\n"
    ));

    let ext = contents(&artifacts, ArtifactKind::EntryPointHeader(Scope::Extensions));
    assert!(ext.contains("using data from gl.xml and gl_angle_ext.xml."));
}

#[test]
fn test_explicit_context_can_be_disabled() {
    let catalog = catalog();
    let mut tables = tables();
    tables.explicit_context = false;
    let artifacts = generate(&catalog, &tables, &provenance(&catalog)).unwrap();

    assert_eq!(artifacts.len(), 14);
    let def = contents(&artifacts, ArtifactKind::ExportDefinitions);
    assert!(!def.contains("ContextANGLE"));
    assert_eq!(export_ordinals(def).len(), 21);
}

#[test]
fn test_rerun_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let artifacts = artifacts();

    let first = output::write_artifacts(dir.path(), &artifacts, false).unwrap();
    assert_eq!(first.len(), artifacts.len());
    assert!(dir.path().join("include/GLES3/gl31ext_explicit_context_autogen.inc").exists());

    let second = output::write_artifacts(dir.path(), &artifacts, false).unwrap();
    assert!(second.is_empty());
}

#[test]
fn test_missing_extensions_collection_is_fatal() {
    let xml = r#"<registry><commands namespace="GL"/></registry>"#;
    let err = Document::from_reader(xml.as_bytes(), "broken.xml").unwrap_err();
    assert!(matches!(err, Error::MalformedDescription { .. }));
}
