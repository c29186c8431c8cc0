////////////////////////////////////////////////////////////////////////////////////
// Copyright (c) 2019 DasEtwas - All Rights Reserved                               /
//      Unauthorized copying of this file, via any medium is strictly prohibited   /
//      Proprietary and confidential                                               /
////////////////////////////////////////////////////////////////////////////////////

use std::{io, path::PathBuf};

use crate::{config::Version, model::EntryPointModel};

pub mod context_api;
pub mod entry_points;
pub mod entry_points_enum;
pub mod explicit_context_inc;
pub mod exports;

use self::{
    context_api::ContextApiGenerator,
    entry_points::{EntryPointHeaderGenerator, EntryPointSourceGenerator, ScopeFragments},
    entry_points_enum::EntryPointsEnumGenerator,
    explicit_context_inc::ExplicitContextIncGenerator,
    exports::{ExportDefinitionsGenerator, ExportFragments, ExportSourceGenerator},
};

/// Trait for an artifact generator.
pub trait Generator {
    /// Writes the whole artifact.
    fn write<W>(&self, ctx: &RenderContext<'_>, dest: &mut W) -> io::Result<()>
    where W: io::Write;
}

/// Who generated the files, from what, and when.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provenance {
    pub script_name: String,
    pub year: i32,
    pub copyright_holder: String,
    /// Name of the base registry, e.g. `gl.xml`.
    pub base_source: String,
    /// Names of every registry, e.g. `gl.xml and gl_angle_ext.xml`.
    pub all_sources: String,
}

impl Provenance {
    pub fn new(script_name: &str, year: i32, base_source: &str, all_sources: &str) -> Self {
        Provenance {
            script_name: script_name.to_owned(),
            year,
            copyright_holder: "The ANGLE Project Authors".to_owned(),
            base_source: base_source.to_owned(),
            all_sources: all_sources.to_owned(),
        }
    }
}

pub struct RenderContext<'a> {
    pub model: &'a EntryPointModel,
    pub provenance: &'a Provenance,
}

impl<'a> RenderContext<'a> {
    pub fn new(model: &'a EntryPointModel, provenance: &'a Provenance) -> Self {
        RenderContext { model, provenance }
    }
}

/// A group of entry points sharing one header/source pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Version(Version),
    /// Every extension plus the explicit context entry points.
    Extensions,
}

impl Scope {
    /// `"2_0"` or `"ext"`.
    pub fn annotation(self) -> String {
        match self {
            Scope::Version(version) => version.annotation(),
            Scope::Extensions => "ext".to_owned(),
        }
    }

    /// `"2.0"` or `"extension"`.
    pub fn comment(self) -> String {
        match self {
            Scope::Version(version) => version.to_string(),
            Scope::Extensions => "extension".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    EntryPointHeader(Scope),
    EntryPointSource(Scope),
    EntryPointsEnum,
    ContextApi(Version),
    ExportSource,
    ExportDefinitions,
    ExplicitContextInc(Version),
}

impl ArtifactKind {
    /// Location relative to the root of the source tree.
    pub fn path(self) -> PathBuf {
        match self {
            ArtifactKind::EntryPointHeader(scope) => PathBuf::from("src/libGLESv2")
                .join(format!("entry_points_gles_{}_autogen.h", scope.annotation().to_lowercase())),
            ArtifactKind::EntryPointSource(scope) => PathBuf::from("src/libGLESv2")
                .join(format!("entry_points_gles_{}_autogen.cpp", scope.annotation().to_lowercase())),
            ArtifactKind::EntryPointsEnum => PathBuf::from("src/libANGLE/entry_points_enum_autogen.h"),
            ArtifactKind::ContextApi(version) => PathBuf::from("src/libANGLE")
                .join(format!("Context_gles_{}_autogen.h", version.annotation())),
            ArtifactKind::ExportSource => PathBuf::from("src/libGLESv2/libGLESv2_autogen.cpp"),
            ArtifactKind::ExportDefinitions => PathBuf::from("src/libGLESv2/libGLESv2_autogen.def"),
            ArtifactKind::ExplicitContextInc(version) => PathBuf::from("include")
                .join(version.include_dir())
                .join(format!("gl{}ext_explicit_context_autogen.inc", version.header_version())),
        }
    }
}

/// One output document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedArtifact {
    pub kind: ArtifactKind,
    pub path: PathBuf,
    pub contents: String,
}

fn to_string<F>(write: F) -> io::Result<String>
where F: FnOnce(&mut Vec<u8>) -> io::Result<()> {
    let mut buf = Vec::new();
    write(&mut buf)?;
    String::from_utf8(buf).map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
}

fn artifact<F>(kind: ArtifactKind, write: F) -> io::Result<RenderedArtifact>
where F: FnOnce(&mut Vec<u8>) -> io::Result<()> {
    Ok(RenderedArtifact {
        kind,
        path: kind.path(),
        contents: to_string(write)?,
    })
}

/// Renders a single artifact.
pub fn render(kind: ArtifactKind, ctx: &RenderContext<'_>) -> io::Result<String> {
    match kind {
        ArtifactKind::EntryPointHeader(scope) => {
            to_string(|dest| EntryPointHeaderGenerator(scope).write(ctx, dest))
        },
        ArtifactKind::EntryPointSource(scope) => {
            to_string(|dest| EntryPointSourceGenerator(scope).write(ctx, dest))
        },
        ArtifactKind::EntryPointsEnum => to_string(|dest| EntryPointsEnumGenerator.write(ctx, dest)),
        ArtifactKind::ContextApi(version) => {
            to_string(|dest| ContextApiGenerator(version).write(ctx, dest))
        },
        ArtifactKind::ExportSource => to_string(|dest| ExportSourceGenerator.write(ctx, dest)),
        ArtifactKind::ExportDefinitions => {
            to_string(|dest| ExportDefinitionsGenerator.write(ctx, dest))
        },
        ArtifactKind::ExplicitContextInc(version) => {
            to_string(|dest| ExplicitContextIncGenerator(version).write(ctx, dest))
        },
    }
}

/// Renders every artifact of the model.
///
/// A scope's header and source come from one walk over its entry points, and so do the export
/// source and the export definitions.
pub fn render_all(ctx: &RenderContext<'_>) -> io::Result<Vec<RenderedArtifact>> {
    let model = ctx.model;
    let mut artifacts = Vec::new();

    let scopes = model
        .versions
        .iter()
        .map(|scope| Scope::Version(scope.version))
        .chain(std::iter::once(Scope::Extensions));
    for scope in scopes {
        let fragments = ScopeFragments::collect(ctx, scope);
        artifacts.push(artifact(ArtifactKind::EntryPointHeader(scope), |dest| {
            entry_points::write_header(ctx, scope, &fragments, dest)
        })?);
        artifacts.push(artifact(ArtifactKind::EntryPointSource(scope), |dest| {
            entry_points::write_source(ctx, scope, &fragments, dest)
        })?);
    }

    if let Some(gles1) = model.versions.iter().find(|scope| scope.version.is_gles1()) {
        let kind = ArtifactKind::ContextApi(gles1.version);
        artifacts.push(artifact(kind, |dest| ContextApiGenerator(gles1.version).write(ctx, dest))?);
    }

    artifacts.push(artifact(ArtifactKind::EntryPointsEnum, |dest| {
        EntryPointsEnumGenerator.write(ctx, dest)
    })?);

    let exports = ExportFragments::collect(ctx);
    artifacts.push(artifact(ArtifactKind::ExportSource, |dest| {
        exports::write_source(ctx, &exports, dest)
    })?);
    artifacts.push(artifact(ArtifactKind::ExportDefinitions, |dest| {
        exports::write_definitions(ctx, &exports, dest)
    })?);

    if model.explicit_context_enabled {
        for scope in &model.versions {
            let kind = ArtifactKind::ExplicitContextInc(scope.version);
            artifacts.push(artifact(kind, |dest| {
                ExplicitContextIncGenerator(scope.version).write(ctx, dest)
            })?);
        }
    }

    debug!("Rendered {} artifacts", artifacts.len());
    Ok(artifacts)
}

/// Writes the "generated file" banner shared by every artifact, each line starting with
/// `comment`.
pub fn write_banner<W>(
    ctx: &RenderContext<'_>,
    comment: &str,
    data_source: &str,
    dest: &mut W,
) -> io::Result<()>
where
    W: io::Write,
{
    writeln!(
        dest,
        "{c} GENERATED FILE - DO NOT EDIT.
{c} Generated by {script_name} using data from {data_source}.
{c}
{c} Copyright {year} {holder}. All rights reserved.
{c} Use of this source code is governed by a BSD-style license that can be
{c} found in the LICENSE file.",
        c = comment,
        script_name = ctx.provenance.script_name,
        data_source = data_source,
        year = ctx.provenance.year,
        holder = ctx.provenance.copyright_holder,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_paths() {
        let es2 = Version::new(2, 0);
        let es31 = Version::new(3, 1);
        let es1 = Version::new(1, 0);

        assert_eq!(
            ArtifactKind::EntryPointHeader(Scope::Version(es2)).path(),
            PathBuf::from("src/libGLESv2/entry_points_gles_2_0_autogen.h")
        );
        assert_eq!(
            ArtifactKind::EntryPointSource(Scope::Extensions).path(),
            PathBuf::from("src/libGLESv2/entry_points_gles_ext_autogen.cpp")
        );
        assert_eq!(
            ArtifactKind::ContextApi(es1).path(),
            PathBuf::from("src/libANGLE/Context_gles_1_0_autogen.h")
        );
        assert_eq!(
            ArtifactKind::ExplicitContextInc(es31).path(),
            PathBuf::from("include/GLES3/gl31ext_explicit_context_autogen.inc")
        );
        assert_eq!(
            ArtifactKind::ExplicitContextInc(es1).path(),
            PathBuf::from("include/GLES/glext_explicit_context_autogen.inc")
        );
        assert_eq!(
            ArtifactKind::ExportDefinitions.path(),
            PathBuf::from("src/libGLESv2/libGLESv2_autogen.def")
        );
    }

    #[test]
    fn test_scope_naming() {
        assert_eq!(Scope::Version(Version::new(3, 0)).annotation(), "3_0");
        assert_eq!(Scope::Version(Version::new(3, 0)).comment(), "3.0");
        assert_eq!(Scope::Extensions.annotation(), "ext");
        assert_eq!(Scope::Extensions.comment(), "extension");
    }
}
