////////////////////////////////////////////////////////////////////////////////////
// Copyright (c) 2019 DasEtwas - All Rights Reserved                               /
//      Unauthorized copying of this file, via any medium is strictly prohibited   /
//      Proprietary and confidential                                               /
////////////////////////////////////////////////////////////////////////////////////

//! Fixed configuration consulted while building the entry point model.
//!
//! Everything here is immutable once a [`Tables`] value is built. [`Tables::angle`] carries the
//! lists used for the real libGLESv2 surface; tests build small tables of their own.

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt, io,
};

use lazy_static::*;

use crate::errors::Result;

/// ANGLE and Chromium extensions.
pub const ANGLE_EXTENSIONS: &[&str] = &[
    "GL_CHROMIUM_bind_uniform_location",
    "GL_CHROMIUM_framebuffer_mixed_samples",
    "GL_CHROMIUM_path_rendering",
    "GL_CHROMIUM_copy_texture",
    "GL_CHROMIUM_copy_compressed_texture",
    "GL_ANGLE_request_extension",
    "GL_ANGLE_robust_client_memory",
    "GL_ANGLE_multiview",
];

/// ES1 extensions (possibly the minimum set needed by Android).
pub const GLES1_EXTENSIONS: &[&str] = &[
    "GL_OES_draw_texture",
    "GL_OES_framebuffer_object",
    "GL_OES_matrix_palette",
    "GL_OES_point_size_array",
    "GL_OES_query_matrix",
    "GL_OES_texture_cube_map",
];

pub const GLES2_EXTENSIONS: &[&str] = &[
    "GL_ANGLE_framebuffer_blit",
    "GL_ANGLE_framebuffer_multisample",
    "GL_ANGLE_instanced_arrays",
    "GL_ANGLE_translated_shader_source",
    "GL_EXT_debug_marker",
    "GL_EXT_discard_framebuffer",
    "GL_EXT_disjoint_timer_query",
    "GL_EXT_draw_buffers",
    "GL_EXT_map_buffer_range",
    "GL_EXT_occlusion_query_boolean",
    "GL_EXT_robustness",
    "GL_EXT_texture_storage",
    "GL_KHR_debug",
    "GL_NV_fence",
    "GL_OES_EGL_image",
    "GL_OES_get_program_binary",
    "GL_OES_mapbuffer",
    "GL_OES_vertex_array_object",
];

/// GLES1 extensions that get no declarations in the context interface macro.
pub const GLES1_NO_CONTEXT_DECL_EXTENSIONS: &[&str] = &["GL_OES_framebuffer_object"];

/// ES1 commands whose semantics changed in later versions while the name stayed the same.
pub const GLES1_OVERLOADED: &[&str] = &["glGetPointerv"];

/// Entry points that must not run the `EVENT()` macro, it would interfere with the debug events
/// set by the caller.
pub const NO_EVENT_MARKER_EXCEPTIONS: &[&str] =
    &["glInsertEventMarkerEXT", "glPopGroupMarkerEXT", "glPushGroupMarkerEXT"];

/// Checked in this order. NV is not stripped.
pub const STRIP_SUFFIXES: &[&str] = &["ANGLE", "EXT", "KHR", "OES", "CHROMIUM"];

/// Processing order of the core versions: ES2+ first, ES1-only commands last.
pub const VERSIONS: &[Version] = &[
    Version::new(2, 0),
    Version::new(3, 0),
    Version::new(3, 1),
    Version::new(1, 0),
];

lazy_static! {
    /// printf-style specifiers used by the `EVENT()` macro for scalar parameters.
    pub static ref FORMAT_SPECIFIERS: BTreeMap<&'static str, &'static str> = {
        let mut map = BTreeMap::new();
        map.insert("GLbitfield", "0x%X");
        map.insert("GLboolean", "%u");
        map.insert("GLclampx", "0x%X");
        map.insert("GLenum", "0x%X");
        map.insert("GLfixed", "0x%X");
        map.insert("GLfloat", "%f");
        map.insert("GLint", "%d");
        map.insert("GLintptr", "%d");
        map.insert("GLshort", "%d");
        map.insert("GLsizei", "%d");
        map.insert("GLsizeiptr", "%d");
        map.insert("GLsync", "0x%0.8p");
        map.insert("GLubyte", "%d");
        map.insert("GLuint", "%u");
        map.insert("GLuint64", "%llu");
        map.insert("GLDEBUGPROC", "0x%0.8p");
        map.insert("GLDEBUGPROCKHR", "0x%0.8p");
        map.insert("GLeglImageOES", "0x%0.8p");
        map
    };
}

/// A core GLES version, the unit the registry admits core commands under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Version {
    pub major: u8,
    pub minor: u8,
}

impl Version {
    pub const fn new(major: u8, minor: u8) -> Self {
        Version { major, minor }
    }

    pub fn is_gles1(self) -> bool {
        self.major == 1
    }

    /// `"2_0"`, also the registry scope tag of the version.
    pub fn annotation(self) -> String {
        format!("{}_{}", self.major, self.minor)
    }

    /// The `<feature>` holding the version's commands.
    pub fn feature_name(self) -> String {
        if self.is_gles1() {
            format!("GL_VERSION_ES_CM_{}", self.annotation())
        } else {
            format!("GL_ES_VERSION_{}", self.annotation())
        }
    }

    /// `""` for ES1, the major version otherwise.
    pub fn major_if_not_one(self) -> String {
        if self.is_gles1() {
            String::new()
        } else {
            self.major.to_string()
        }
    }

    /// `""` for `.0` versions, the minor version otherwise.
    pub fn minor_if_not_zero(self) -> String {
        if self.minor == 0 {
            String::new()
        } else {
            self.minor.to_string()
        }
    }

    /// Version as it appears in the khronos header names: `""`, `"2"`, `"3"`, `"31"`.
    pub fn header_version(self) -> String {
        format!("{}{}", self.major_if_not_one(), self.minor_if_not_zero())
    }

    /// Directory of the public headers for this version: `GLES`, `GLES2` or `GLES3`.
    pub fn include_dir(self) -> String {
        format!("GLES{}", self.major_if_not_one())
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// `command -> { param -> strong type }`, loaded from `entry_point_packed_gl_enums.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackedEnumTable {
    entries: BTreeMap<String, BTreeMap<String, String>>,
}

impl PackedEnumTable {
    pub fn from_reader<R>(reader: R) -> Result<Self>
    where R: io::Read {
        let entries = serde_json::from_reader(reader)?;
        Ok(PackedEnumTable { entries })
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let entries = serde_json::from_str(json)?;
        Ok(PackedEnumTable { entries })
    }

    /// Packed types of one command, keyed by parameter name.
    pub fn params(&self, command: &str) -> Option<&BTreeMap<String, String>> {
        self.entries.get(command)
    }

    pub fn packed_type(&self, command: &str, param: &str) -> Option<&str> {
        self.params(command)?.get(param).map(String::as_str)
    }

    pub fn insert(&mut self, command: &str, param: &str, strong_type: &str) {
        self.entries
            .entry(command.to_owned())
            .or_default()
            .insert(param.to_owned(), strong_type.to_owned());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The static lists that drive a generation run.
#[derive(Debug, Clone)]
pub struct Tables {
    pub versions: Vec<Version>,
    pub supported_extensions: BTreeSet<String>,
    pub gles1_extensions: BTreeSet<String>,
    pub gles1_no_context_decl_extensions: BTreeSet<String>,
    pub overloaded: BTreeSet<String>,
    pub no_event_marker_exceptions: BTreeSet<String>,
    pub strip_suffixes: Vec<String>,
    pub format_specifiers: BTreeMap<String, String>,
    pub packed_enums: PackedEnumTable,
    /// Generate the `EGL_ANGLE_explicit_context` variants.
    pub explicit_context: bool,
}

fn owned_set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Tables {
    /// The libGLESv2 configuration.
    pub fn angle(packed_enums: PackedEnumTable) -> Self {
        let supported_extensions = ANGLE_EXTENSIONS
            .iter()
            .chain(GLES1_EXTENSIONS)
            .chain(GLES2_EXTENSIONS)
            .map(|s| s.to_string())
            .collect();

        Tables {
            versions: VERSIONS.to_vec(),
            supported_extensions,
            gles1_extensions: owned_set(GLES1_EXTENSIONS),
            gles1_no_context_decl_extensions: owned_set(GLES1_NO_CONTEXT_DECL_EXTENSIONS),
            overloaded: owned_set(GLES1_OVERLOADED),
            no_event_marker_exceptions: owned_set(NO_EVENT_MARKER_EXCEPTIONS),
            strip_suffixes: STRIP_SUFFIXES.iter().map(|s| s.to_string()).collect(),
            format_specifiers: FORMAT_SPECIFIERS
                .iter()
                .map(|(ty, spec)| (ty.to_string(), spec.to_string()))
                .collect(),
            packed_enums,
            explicit_context: true,
        }
    }

    pub fn is_supported(&self, extension: &str) -> bool {
        self.supported_extensions.contains(extension)
    }

    pub fn is_gles1_extension(&self, extension: &str) -> bool {
        self.gles1_extensions.contains(extension)
    }

    pub fn is_overloaded(&self, command: &str) -> bool {
        self.overloaded.contains(command)
    }

    pub fn is_instrumented(&self, command: &str) -> bool {
        !self.no_event_marker_exceptions.contains(command)
    }

    pub fn format_specifier(&self, ty: &str) -> Option<&str> {
        self.format_specifiers.get(ty).map(String::as_str)
    }
}
