////////////////////////////////////////////////////////////////////////////////////
// Copyright (c) 2019 DasEtwas - All Rights Reserved                               /
//      Unauthorized copying of this file, via any medium is strictly prohibited   /
//      Proprietary and confidential                                               /
////////////////////////////////////////////////////////////////////////////////////

//! `entry_points_gles_*_autogen.{h,cpp}`: the `gl::` entry points of one scope.

use std::io;

use super::{write_banner, Generator, RenderContext, Scope};
use crate::{
    errors::DuplicateCommandWarning,
    variant::{EntryPoint, EXPLICIT_CONTEXT_EXTENSION},
};

const EVENT_COMMENT: &str = "// Don't run an EVENT() macro on the EXT_debug_marker entry points.
    // It can interfere with the debug events being set by the caller.
    // ";

#[allow(missing_copy_implementations)]
pub struct EntryPointHeaderGenerator(pub Scope);

#[allow(missing_copy_implementations)]
pub struct EntryPointSourceGenerator(pub Scope);

impl Generator for EntryPointHeaderGenerator {
    fn write<W>(&self, ctx: &RenderContext<'_>, dest: &mut W) -> io::Result<()>
    where W: io::Write {
        let fragments = ScopeFragments::collect(ctx, self.0);
        write_header(ctx, self.0, &fragments, dest)
    }
}

impl Generator for EntryPointSourceGenerator {
    fn write<W>(&self, ctx: &RenderContext<'_>, dest: &mut W) -> io::Result<()>
    where W: io::Write {
        let fragments = ScopeFragments::collect(ctx, self.0);
        write_source(ctx, self.0, &fragments, dest)
    }
}

/// Declarations and definitions of one scope, built in the same walk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeFragments {
    pub decls: Vec<String>,
    pub defs: Vec<String>,
}

impl ScopeFragments {
    pub fn collect(ctx: &RenderContext<'_>, scope: Scope) -> Self {
        let model = ctx.model;
        let mut fragments = ScopeFragments::default();

        match scope {
            Scope::Version(version) => {
                if let Some(scope) = model.version(version) {
                    fragments.push_all(&scope.entry_points);
                    fragments.push_duplicates(&scope.duplicates);
                }
            },
            Scope::Extensions => {
                for extension in &model.extensions {
                    fragments.push_banner(&extension.name);
                    fragments.push_all(&extension.entry_points);
                    fragments.push_duplicates(&extension.duplicates);
                }

                if model.explicit_context_enabled {
                    fragments.push_banner(EXPLICIT_CONTEXT_EXTENSION);
                    fragments.push_all(&model.explicit_context);
                }
            },
        }

        fragments
    }

    fn push_banner(&mut self, name: &str) {
        let banner = format!("\n// {}", name);
        self.decls.push(banner.clone());
        self.defs.push(banner);
    }

    /// One `// X is already defined.` line per duplicate, sorted by command name.
    fn push_duplicates(&mut self, duplicates: &[DuplicateCommandWarning]) {
        let mut names: Vec<&str> = duplicates
            .iter()
            .map(|duplicate| duplicate.command.get(2..).unwrap_or(&duplicate.command))
            .collect();
        names.sort_unstable();
        for name in names {
            self.defs.push(format!("// {} is already defined.\n", name));
        }
    }

    fn push_all(&mut self, entry_points: &[EntryPoint]) {
        for entry_point in entry_points {
            self.decls.push(format_decl(entry_point));
            self.defs.push(format_def(entry_point));
        }
    }
}

/// `ANGLE_EXPORT void GL_APIENTRY Clear(GLbitfield mask);`
pub fn format_decl(entry_point: &EntryPoint) -> String {
    format!(
        "ANGLE_EXPORT {return_type}GL_APIENTRY {name}({params});",
        return_type = entry_point.command.return_type_prefix(),
        name = entry_point.function_name(),
        params = entry_point.params(),
    )
}

/// Body of the `gl::` entry point: logs the call, finds the context, validates and dispatches.
pub fn format_def(entry_point: &EntryPoint) -> String {
    let command = &entry_point.command;
    let name = command.entry_point_name();
    let has_params = !command.params.is_empty();

    let conversions: String = command
        .packed_params()
        .map(|param| {
            format!(
                "\n        {ty} {internal} = FromGLenum<{ty}>({name});",
                ty = param.internal_type(),
                internal = param.internal_name(),
                name = param.name,
            )
        })
        .collect();

    let internal_names = command.internal_names();
    let validate_params = if has_params {
        format!("context, {}", internal_names)
    } else {
        "context".to_owned()
    };

    let (return_if_needed, default_return) = if command.returns_void() {
        ("", String::new())
    } else {
        (
            "return ",
            format!(
                "\n    return GetDefaultReturnValue<EntryPoint::{}, {}>();\n",
                name, command.return_type
            ),
        )
    };

    format!(
        "{return_type}GL_APIENTRY {function}({params})
{{
    {event_comment}EVENT(\"({format_params})\"{comma}{pass_params});

    Context *context = {context_getter};
    if (context)
    {{{assert_explicit_context}{conversions}
        context->gatherParams<EntryPoint::{name}>({internal_names});

        if (context->skipValidation() || Validate{name}({validate_params}))
        {{
            {return_if_needed}context->{dispatch}({internal_names});
        }}
    }}
{default_return}}}
",
        return_type = command.return_type_prefix(),
        function = entry_point.function_name(),
        params = entry_point.params(),
        event_comment = if entry_point.instrumented { "" } else { EVENT_COMMENT },
        format_params = command.format_string(),
        comma = if has_params { ", " } else { "" },
        pass_params = command.names(),
        context_getter = entry_point.variant.context_getter(&command.name),
        assert_explicit_context = if entry_point.variant.is_explicit() {
            "\nASSERT(context == GetValidGlobalContext());"
        } else {
            ""
        },
        conversions = conversions,
        name = name,
        internal_names = internal_names,
        validate_params = validate_params,
        return_if_needed = return_if_needed,
        dispatch = command.dispatch_name,
        default_return = default_return,
    )
}

fn data_source<'a>(ctx: &'a RenderContext<'_>, scope: Scope) -> &'a str {
    match scope {
        Scope::Version(_) => &ctx.provenance.base_source,
        Scope::Extensions => &ctx.provenance.all_sources,
    }
}

fn header_includes(scope: Scope) -> String {
    match scope {
        Scope::Version(version) => {
            let mut includes = format!(
                "#include <GLES{major}/gl{major}{minor}.h>\n#include <export.h>",
                major = version.major_if_not_one(),
                minor = version.minor_if_not_zero(),
            );
            // platform.h undefines the MemoryBarrier macro which conflicts with glMemoryBarrier
            if version.major == 3 && version.minor == 1 {
                includes.push_str("\n#include \"common/platform.h\"\n");
            }
            includes
        },
        Scope::Extensions => "#include <GLES/gl.h>
#include <export.h>
#include <GLES/gl.h>
#include <GLES/glext.h>
#include <GLES2/gl2.h>
#include <GLES2/gl2ext.h>
"
        .to_owned(),
    }
}

fn source_includes(scope: Scope) -> String {
    let (validation, extra) = match scope {
        Scope::Version(version) => (
            format!("{}{}", version.major, version.minor_if_not_zero()),
            "",
        ),
        Scope::Extensions => (
            String::new(),
            "
#include \"libANGLE/validationES.h\"
#include \"libANGLE/validationES1.h\"
#include \"libANGLE/validationES3.h\"
#include \"libANGLE/validationES31.h\"
",
        ),
    };

    format!(
        "#include \"libGLESv2/entry_points_gles_{annotation}_autogen.h\"

#include \"libANGLE/Context.h\"
#include \"libANGLE/validationES{validation}.h\"
#include \"libGLESv2/global_state.h\"
{extra}",
        annotation = scope.annotation().to_lowercase(),
        validation = validation,
        extra = extra,
    )
}

/// Writes the declaration header of `scope` from already collected fragments.
pub fn write_header<W>(
    ctx: &RenderContext<'_>,
    scope: Scope,
    fragments: &ScopeFragments,
    dest: &mut W,
) -> io::Result<()>
where
    W: io::Write,
{
    let annotation = scope.annotation();
    write_banner(ctx, "//", data_source(ctx, scope), dest)?;
    write!(
        dest,
        "//
// entry_points_gles_{lower}_autogen.h:
//   Defines the GLES {comment} entry points.

#ifndef LIBGLESV2_ENTRY_POINTS_GLES_{upper}_AUTOGEN_H_
#define LIBGLESV2_ENTRY_POINTS_GLES_{upper}_AUTOGEN_H_

{includes}

namespace gl
{{
{entry_points}
}}  // namespace gl

#endif  // LIBGLESV2_ENTRY_POINTS_GLES_{upper}_AUTOGEN_H_
",
        lower = annotation.to_lowercase(),
        upper = annotation.to_uppercase(),
        comment = scope.comment(),
        includes = header_includes(scope),
        entry_points = fragments.decls.join("\n"),
    )
}

/// Writes the definition source of `scope` from already collected fragments.
pub fn write_source<W>(
    ctx: &RenderContext<'_>,
    scope: Scope,
    fragments: &ScopeFragments,
    dest: &mut W,
) -> io::Result<()>
where
    W: io::Write,
{
    write_banner(ctx, "//", data_source(ctx, scope), dest)?;
    write!(
        dest,
        "//
// entry_points_gles_{lower}_autogen.cpp:
//   Defines the GLES {comment} entry points.

{includes}

namespace gl
{{
{entry_points}}}  // namespace gl
",
        lower = scope.annotation().to_lowercase(),
        comment = scope.comment(),
        includes = source_includes(scope),
        entry_points = fragments.defs.join("\n"),
    )
}
