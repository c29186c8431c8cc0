////////////////////////////////////////////////////////////////////////////////////
// Copyright (c) 2019 DasEtwas - All Rights Reserved                               /
//      Unauthorized copying of this file, via any medium is strictly prohibited   /
//      Proprietary and confidential                                               /
////////////////////////////////////////////////////////////////////////////////////

//! Ambient and explicit context flavours of an entry point.
//!
//! `EGL_ANGLE_explicit_context` adds a twin of every entry point which takes the context as a
//! leading argument instead of looking up the current one. Both share the validation and the
//! context method they call.

use std::sync::Arc;

use crate::{command::CommandSpec, config::Tables};

pub const EXPLICIT_CONTEXT_SUFFIX: &str = "ContextANGLE";
pub const EXPLICIT_CONTEXT_PARAM: &str = "GLeglContext ctx";
pub const EXPLICIT_CONTEXT_ARG: &str = "ctx";
pub const EXPLICIT_CONTEXT_EXTENSION: &str = "EGL_ANGLE_explicit_context";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    /// Acts on the current context.
    Ambient,
    /// Takes the context as its first argument.
    ExplicitContext,
}

impl Variant {
    pub fn is_explicit(self) -> bool {
        self == Variant::ExplicitContext
    }

    pub fn suffix(self) -> &'static str {
        match self {
            Variant::Ambient => "",
            Variant::ExplicitContext => EXPLICIT_CONTEXT_SUFFIX,
        }
    }

    pub fn suffix_upper(self) -> String {
        self.suffix().to_uppercase()
    }

    /// Declaration of the extra leading parameter.
    pub fn context_param(self) -> &'static str {
        match self {
            Variant::Ambient => "",
            Variant::ExplicitContext => EXPLICIT_CONTEXT_PARAM,
        }
    }

    /// Argument forwarding the extra leading parameter.
    pub fn context_arg(self) -> &'static str {
        match self {
            Variant::Ambient => "",
            Variant::ExplicitContext => EXPLICIT_CONTEXT_ARG,
        }
    }

    /// Separator between the context parameter and the regular ones.
    pub fn comma(self, has_params: bool) -> &'static str {
        if self.is_explicit() && has_params {
            ", "
        } else {
            ""
        }
    }

    /// Expression yielding the acting context.
    pub fn context_getter(self, command: &str) -> &'static str {
        match self {
            Variant::Ambient if command == "glGetError" => "GetGlobalContext()",
            Variant::Ambient => "GetValidGlobalContext()",
            Variant::ExplicitContext => "static_cast<gl::Context *>(ctx)",
        }
    }
}

/// One exported entry point: a command, the way it finds its context, and its export ordinal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPoint {
    pub command: Arc<CommandSpec>,
    pub variant: Variant,
    pub ordinal: u32,
    /// Runs the `EVENT()` logging macro.
    pub instrumented: bool,
}

impl EntryPoint {
    pub fn new(command: Arc<CommandSpec>, variant: Variant, ordinal: u32, tables: &Tables) -> Self {
        let instrumented = tables.is_instrumented(&command.name);
        EntryPoint {
            command,
            variant,
            ordinal,
            instrumented,
        }
    }

    /// The explicit context twin of this entry point.
    pub fn explicit_twin(&self, ordinal: u32) -> Self {
        EntryPoint {
            command: Arc::clone(&self.command),
            variant: Variant::ExplicitContext,
            ordinal,
            instrumented: self.instrumented,
        }
    }

    /// Exported symbol, e.g. `glDrawArraysContextANGLE`.
    pub fn symbol(&self) -> String {
        format!("{}{}", self.command.name, self.variant.suffix())
    }

    /// `gl::` function implementing the symbol, e.g. `DrawArraysContextANGLE`.
    pub fn function_name(&self) -> String {
        format!("{}{}", self.command.entry_point_name(), self.variant.suffix())
    }

    /// Full parameter list including the context parameter.
    pub fn params(&self) -> String {
        format!(
            "{}{}{}",
            self.variant.context_param(),
            self.variant.comma(!self.command.params.is_empty()),
            self.command.declarations()
        )
    }

    /// Full argument list forwarded to `gl::`.
    pub fn args(&self) -> String {
        format!(
            "{}{}{}",
            self.variant.context_arg(),
            self.variant.comma(!self.command.params.is_empty()),
            self.command.names()
        )
    }
}
