////////////////////////////////////////////////////////////////////////////////////
// Copyright (c) 2019 DasEtwas - All Rights Reserved                               /
//      Unauthorized copying of this file, via any medium is strictly prohibited   /
//      Proprietary and confidential                                               /
////////////////////////////////////////////////////////////////////////////////////

use std::io;

use super::{write_banner, Generator, RenderContext};

/// `entry_points_enum_autogen.h`: `enum class EntryPoint` over every admitted command.
#[allow(missing_copy_implementations)]
pub struct EntryPointsEnumGenerator;

impl Generator for EntryPointsEnumGenerator {
    fn write<W>(&self, ctx: &RenderContext<'_>, dest: &mut W) -> io::Result<()>
    where W: io::Write {
        let entries: Vec<String> = ctx
            .model
            .registry
            .entry_point_enum()
            .into_iter()
            .map(|name| format!("    {}", name))
            .collect();

        write_banner(ctx, "//", &ctx.provenance.all_sources, dest)?;
        write!(
            dest,
            "//
// entry_points_enum_autogen.h:
//   Defines the GLES entry points enumeration.

#ifndef LIBGLESV2_ENTRYPOINTSENUM_AUTOGEN_H_
#define LIBGLESV2_ENTRYPOINTSENUM_AUTOGEN_H_

namespace gl
{{
enum class EntryPoint
{{
{entries}
}};
}}  // namespace gl
#endif  // LIBGLESV2_ENTRY_POINTS_ENUM_AUTOGEN_H_
",
            entries = entries.join(",\n"),
        )
    }
}
