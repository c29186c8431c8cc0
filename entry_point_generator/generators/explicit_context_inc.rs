////////////////////////////////////////////////////////////////////////////////////
// Copyright (c) 2019 DasEtwas - All Rights Reserved                               /
//      Unauthorized copying of this file, via any medium is strictly prohibited   /
//      Proprietary and confidential                                               /
////////////////////////////////////////////////////////////////////////////////////

//! `gl*ext_explicit_context_autogen.inc`: public typedefs and prototypes of the explicit context
//! entry points, one file per version.
//!
//! The ES 1.0 file also carries the GLES1 extension commands and the ES 2.0 file every other
//! extension command.

use std::{io, sync::Arc};

use super::{write_banner, Generator, RenderContext};
use crate::{
    command::CommandSpec,
    config::Version,
    model::{GLES1_EXTENSION_SCOPE, GLES2_EXTENSION_SCOPE},
    variant::{Variant, EXPLICIT_CONTEXT_EXTENSION},
};

#[allow(missing_copy_implementations)]
pub struct ExplicitContextIncGenerator(pub Version);

impl Generator for ExplicitContextIncGenerator {
    fn write<W>(&self, ctx: &RenderContext<'_>, dest: &mut W) -> io::Result<()>
    where W: io::Write {
        let version = self.0;
        let commands = commands(ctx, version);
        let pointers: Vec<String> = commands.iter().map(|command| format_pointer(command)).collect();
        let prototypes: Vec<String> =
            commands.iter().map(|command| format_prototype(command, version)).collect();

        write_banner(ctx, "//", &ctx.provenance.all_sources, dest)?;
        write!(
            dest,
            "//
// gl{version}ext_explicit_context_autogen.inc:
//   Function declarations for the {extension} extension

{pointers}
#ifdef GL_GLEXT_PROTOTYPES
{prototypes}
#endif
",
            version = version.header_version(),
            extension = EXPLICIT_CONTEXT_EXTENSION,
            pointers = pointers.join("\n"),
            prototypes = prototypes.join("\n"),
        )
    }
}

fn commands<'a>(ctx: &'a RenderContext<'_>, version: Version) -> Vec<&'a Arc<CommandSpec>> {
    let model = ctx.model;
    let mut commands = model.scope_commands_in_document_order(&version.annotation());
    if version.is_gles1() {
        commands.extend(model.scope_commands_in_document_order(GLES1_EXTENSION_SCOPE));
    } else if version == Version::new(2, 0) {
        commands.extend(model.scope_commands_in_document_order(GLES2_EXTENSION_SCOPE));
    }
    commands
}

fn separator(command: &CommandSpec) -> &'static str {
    Variant::ExplicitContext.comma(!command.params.is_empty())
}

/// `typedef void (GL_APIENTRYP PFNGLCLEARCONTEXTANGLE)(GLeglContext ctx, GLbitfield mask);`
pub fn format_pointer(command: &CommandSpec) -> String {
    let variant = Variant::ExplicitContext;
    format!(
        "typedef {return_type}(GL_APIENTRYP PFN{name_upper}{suffix_upper})({context}{comma}{params});",
        return_type = command.return_type_prefix(),
        name_upper = command.name.to_uppercase(),
        suffix_upper = variant.suffix_upper(),
        context = variant.context_param(),
        comma = separator(command),
        params = command.declarations(),
    )
}

pub fn format_prototype(command: &CommandSpec, version: Version) -> String {
    let variant = Variant::ExplicitContext;
    format!(
        "{apicall} {return_type}GL_APIENTRY {name}{suffix}({context}{comma}{params});",
        apicall = if version.is_gles1() { "GL_API" } else { "GL_APICALL" },
        return_type = command.return_type_prefix(),
        name = command.name,
        suffix = variant.suffix(),
        context = variant.context_param(),
        comma = separator(command),
        params = command.declarations(),
    )
}
