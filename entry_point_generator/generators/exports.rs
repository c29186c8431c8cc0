////////////////////////////////////////////////////////////////////////////////////
// Copyright (c) 2019 DasEtwas - All Rights Reserved                               /
//      Unauthorized copying of this file, via any medium is strictly prohibited   /
//      Proprietary and confidential                                               /
////////////////////////////////////////////////////////////////////////////////////

//! `libGLESv2_autogen.{cpp,def}`: the exported `extern "C"` thunks and their ordinal table.

use std::io;

use super::{write_banner, Generator, RenderContext};
use crate::variant::{EntryPoint, EXPLICIT_CONTEXT_EXTENSION};

/// Column the `@ordinal` of an export line is aligned to, counted from the symbol's start.
pub const EXPORT_COLUMN: usize = 50;

#[allow(missing_copy_implementations)]
pub struct ExportSourceGenerator;

#[allow(missing_copy_implementations)]
pub struct ExportDefinitionsGenerator;

impl Generator for ExportSourceGenerator {
    fn write<W>(&self, ctx: &RenderContext<'_>, dest: &mut W) -> io::Result<()>
    where W: io::Write {
        write_source(ctx, &ExportFragments::collect(ctx), dest)
    }
}

impl Generator for ExportDefinitionsGenerator {
    fn write<W>(&self, ctx: &RenderContext<'_>, dest: &mut W) -> io::Result<()>
    where W: io::Write {
        write_definitions(ctx, &ExportFragments::collect(ctx), dest)
    }
}

/// Thunks and export lines of every entry point, built in the same walk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportFragments {
    pub defs: Vec<String>,
    pub exports: Vec<String>,
}

impl ExportFragments {
    pub fn collect(ctx: &RenderContext<'_>) -> Self {
        let model = ctx.model;
        let mut fragments = ExportFragments::default();

        for scope in &model.versions {
            fragments.push_banner(&format!("OpenGL ES {}", scope.version));
            fragments.push_all(&scope.entry_points);
        }

        for extension in &model.extensions {
            fragments.push_banner(&extension.name);
            fragments.push_all(&extension.entry_points);
        }

        if model.explicit_context_enabled {
            fragments.push_banner(EXPLICIT_CONTEXT_EXTENSION);
            fragments.push_all(&model.explicit_context);
        }

        fragments
    }

    fn push_banner(&mut self, title: &str) {
        self.defs.push(format!("\n// {}", title));
        self.exports.push(format!("\n    ; {}", title));
    }

    fn push_all(&mut self, entry_points: &[EntryPoint]) {
        for entry_point in entry_points {
            self.defs.push(format_export_def(entry_point));
            self.exports.push(format_export(entry_point));
        }
    }
}

/// The exported symbol forwarding to its `gl::` entry point.
pub fn format_export_def(entry_point: &EntryPoint) -> String {
    format!(
        "{return_type}GL_APIENTRY {symbol}({params})
{{
    return gl::{function}({args});
}}
",
        return_type = entry_point.command.return_type_prefix(),
        symbol = entry_point.symbol(),
        params = entry_point.params(),
        function = entry_point.function_name(),
        args = entry_point.args(),
    )
}

/// `    glClear                                           @12`
///
/// The padding only accounts for the base command name, so explicit context symbols push their
/// ordinal past the column.
pub fn format_export(entry_point: &EntryPoint) -> String {
    let name = &entry_point.command.name;
    format!(
        "    {symbol}{spaces}@{ordinal}",
        symbol = entry_point.symbol(),
        spaces = " ".repeat(EXPORT_COLUMN.saturating_sub(name.len())),
        ordinal = entry_point.ordinal,
    )
}

fn includes(ctx: &RenderContext<'_>) -> String {
    let mut headers: Vec<String> = ctx
        .model
        .versions
        .iter()
        .map(|scope| scope.version.annotation())
        .chain(std::iter::once("ext".to_owned()))
        .map(|annotation| format!("#include \"libGLESv2/entry_points_gles_{}_autogen.h\"", annotation))
        .collect();
    headers.sort();

    format!(
        "
#include \"angle_gl.h\"

{headers}

#include \"common/event_tracer.h\"
",
        headers = headers.join("\n"),
    )
}

pub fn write_source<W>(ctx: &RenderContext<'_>, fragments: &ExportFragments, dest: &mut W) -> io::Result<()>
where W: io::Write {
    write_banner(ctx, "//", &ctx.provenance.all_sources, dest)?;
    write!(
        dest,
        "//
// libGLESv2.cpp: Implements the exported OpenGL ES functions.

{includes}
extern \"C\" {{
{entry_points}
}} // extern \"C\"
",
        includes = includes(ctx),
        entry_points = fragments.defs.join("\n"),
    )
}

pub fn write_definitions<W>(
    ctx: &RenderContext<'_>,
    fragments: &ExportFragments,
    dest: &mut W,
) -> io::Result<()>
where
    W: io::Write,
{
    write_banner(ctx, ";", &ctx.provenance.all_sources, dest)?;
    write!(
        dest,
        "LIBRARY libGLESv2
EXPORTS
{exports}
",
        exports = fragments.exports.join("\n"),
    )
}
