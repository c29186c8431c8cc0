////////////////////////////////////////////////////////////////////////////////////
// Copyright (c) 2019 DasEtwas - All Rights Reserved                               /
//      Unauthorized copying of this file, via any medium is strictly prohibited   /
//      Proprietary and confidential                                               /
////////////////////////////////////////////////////////////////////////////////////

//! `Context_gles_1_0_autogen.h`: the `ANGLE_GLES1_CONTEXT_API` macro declaring the context
//! methods the GLES1 entry points dispatch to.

use std::io;

use super::{write_banner, Generator, RenderContext};
use crate::{command::CommandSpec, config::Version, variant::EntryPoint};

#[allow(missing_copy_implementations)]
pub struct ContextApiGenerator(pub Version);

impl Generator for ContextApiGenerator {
    fn write<W>(&self, ctx: &RenderContext<'_>, dest: &mut W) -> io::Result<()>
    where W: io::Write {
        let annotation = self.0.annotation();
        let interface = interface_lines(ctx, self.0);

        write_banner(ctx, "//", &ctx.provenance.base_source, dest)?;
        write!(
            dest,
            "//
// Context_gles_{lower}_autogen.h: Creates a macro for interfaces in Context.

#ifndef ANGLE_CONTEXT_GLES_{upper}_AUTOGEN_H_
#define ANGLE_CONTEXT_GLES_{upper}_AUTOGEN_H_

#define ANGLE_GLES1_CONTEXT_API \\
{interface}

#endif // ANGLE_CONTEXT_API_{upper}_AUTOGEN_H_
",
            lower = annotation.to_lowercase(),
            upper = annotation.to_uppercase(),
            interface = interface.join("\n"),
        )
    }
}

/// `    void alphaFunc(GLenum func, GLfloat ref); \`
pub fn format_context_decl(command: &CommandSpec) -> String {
    format!(
        "    {return_type} {dispatch}({params}); \\",
        return_type = command.return_type,
        dispatch = command.dispatch_name,
        params = command.internal_declarations(),
    )
}

fn decls<'a>(entry_points: &'a [EntryPoint]) -> impl Iterator<Item = String> + 'a {
    entry_points
        .iter()
        .filter(|entry_point| !entry_point.command.overloaded)
        .map(|entry_point| format_context_decl(&entry_point.command))
}

fn interface_lines(ctx: &RenderContext<'_>, version: Version) -> Vec<String> {
    let model = ctx.model;
    let mut lines: Vec<String> = model
        .version(version)
        .map(|scope| decls(&scope.entry_points).collect())
        .unwrap_or_default();

    for name in &model.gles1_extensions {
        lines.push(format!("    /* {} */ \\", name));
        if model.gles1_no_context_decl_extensions.contains(name) {
            continue;
        }
        if let Some(extension) = model.extension(name) {
            lines.extend(decls(&extension.entry_points));
        }
    }

    lines
}
