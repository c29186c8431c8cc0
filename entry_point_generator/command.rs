////////////////////////////////////////////////////////////////////////////////////
// Copyright (c) 2019 DasEtwas - All Rights Reserved                               /
//      Unauthorized copying of this file, via any medium is strictly prohibited   /
//      Proprietary and confidential                                               /
////////////////////////////////////////////////////////////////////////////////////

use std::borrow::Cow;

use crate::{
    config::Tables,
    errors::{Error, Result},
};

/// Format slot used for every pointer-typed parameter.
pub const POINTER_FORMAT: &str = "0x%0.8p";

/// Suffix given to the internal name of a packed parameter.
pub const PACKED_SUFFIX: &str = "Packed";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    /// Declared type, e.g. `"const GLfloat *"`.
    pub ty: String,
    pub name: String,
    /// Strong type replacing `ty` at the dispatch boundary.
    pub packed_type: Option<String>,
    /// `"name = %d"`-style slot of the `EVENT()` format string.
    pub format: String,
}

impl Param {
    pub fn is_pointer(&self) -> bool {
        self.ty.contains('*')
    }

    pub fn is_packed(&self) -> bool {
        self.packed_type.is_some()
    }

    /// Declaration as it appears in the public prototypes.
    pub fn declaration(&self) -> String {
        join_param(&self.ty, &self.name)
    }

    /// Name used past the dispatch boundary.
    pub fn internal_name(&self) -> Cow<'_, str> {
        if self.is_packed() {
            Cow::Owned(format!("{}{}", self.name, PACKED_SUFFIX))
        } else {
            Cow::Borrowed(&self.name)
        }
    }

    /// Type used past the dispatch boundary.
    pub fn internal_type(&self) -> &str {
        self.packed_type.as_deref().unwrap_or(&self.ty)
    }

    /// Declaration used by the context interface.
    pub fn internal_declaration(&self) -> String {
        join_param(self.internal_type(), &self.internal_name())
    }
}

/// A normalized command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// External name, e.g. `glDrawArrays`.
    pub name: String,
    pub return_type: String,
    pub params: Vec<Param>,
    /// Name of the method called on the context, e.g. `drawArrays`.
    pub dispatch_name: String,
    /// Same external name as a later version, different semantics.
    pub overloaded: bool,
}

impl CommandSpec {
    /// Normalizes one `<command>`: `proto` is the text of its `<proto>` element and `params`
    /// the text of each `<param>`.
    pub fn build<S>(name: &str, proto: &str, params: &[S], tables: &Tables) -> Result<Self>
    where S: AsRef<str> {
        let return_type = split_proto(name, proto)?;
        let packed = tables.packed_enums.params(name);

        let params = params
            .iter()
            .map(|raw| -> Result<Param> {
                let raw = raw.as_ref().trim();
                let (ty, param_name) = split_param(raw).ok_or_else(|| {
                    Error::malformed(name, format!("cannot split parameter `{}`", raw))
                })?;
                let format = format_slot(name, ty, param_name, tables)?;

                Ok(Param {
                    ty: ty.to_owned(),
                    name: param_name.to_owned(),
                    packed_type: packed.and_then(|p| p.get(param_name)).cloned(),
                    format,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let overloaded = tables.is_overloaded(name);
        let dispatch_name = if overloaded {
            lower_first(strip_prefix(name))
        } else {
            dispatch_name(name, &tables.strip_suffixes)
        };

        Ok(CommandSpec {
            name: name.to_owned(),
            return_type,
            params,
            dispatch_name,
            overloaded,
        })
    }

    /// Name without the `gl` prefix, also the `EntryPoint` enumerator.
    pub fn entry_point_name(&self) -> &str {
        strip_prefix(&self.name)
    }

    pub fn returns_void(&self) -> bool {
        self.return_type == "void"
    }

    /// Return type as written right before `GL_APIENTRY`: pointers stay glued to the marker.
    pub fn return_type_prefix(&self) -> String {
        if self.return_type.ends_with('*') {
            self.return_type.clone()
        } else {
            format!("{} ", self.return_type)
        }
    }

    pub fn packed_params(&self) -> impl Iterator<Item = &Param> {
        self.params.iter().filter(|param| param.is_packed())
    }

    /// Declarations joined with `", "`.
    pub fn declarations(&self) -> String {
        self.params.iter().map(Param::declaration).collect::<Vec<_>>().join(", ")
    }

    pub fn names(&self) -> String {
        self.params.iter().map(|param| param.name.as_str()).collect::<Vec<_>>().join(", ")
    }

    pub fn internal_names(&self) -> String {
        self.params
            .iter()
            .map(|param| param.internal_name())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn internal_declarations(&self) -> String {
        self.params
            .iter()
            .map(Param::internal_declaration)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Body of the `EVENT()` format string.
    pub fn format_string(&self) -> String {
        self.params.iter().map(|param| param.format.as_str()).collect::<Vec<_>>().join(", ")
    }
}

fn strip_prefix(name: &str) -> &str {
    name.get(2..).unwrap_or("")
}

fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Context method name: prefix removed, first letter lower-cased, first matching suffix of
/// `suffixes` stripped.
pub fn dispatch_name<S>(name: &str, suffixes: &[S]) -> String
where S: AsRef<str> {
    let lowered = lower_first(strip_prefix(name));
    for suffix in suffixes {
        let suffix = suffix.as_ref();
        if !suffix.is_empty() && lowered.len() > suffix.len() && lowered.ends_with(suffix) {
            return lowered[..lowered.len() - suffix.len()].to_owned();
        }
    }
    lowered
}

/// Return type of `proto`, which must end with `name`.
fn split_proto(name: &str, proto: &str) -> Result<String> {
    let proto = proto.trim_end();
    if name.is_empty() || !proto.ends_with(name) {
        return Err(Error::malformed(
            name,
            format!("prototype `{}` does not end with the command name", proto),
        ));
    }
    Ok(proto[..proto.len() - name.len()].trim().to_owned())
}

/// Splits a parameter declaration at its rightmost space or `*`.
///
/// The name is what follows the boundary. The type is what precedes it, keeping the `*` when the
/// boundary is one: `"const GLfloat *m"` gives `("const GLfloat *", "m")`, `"GLfloat v[4]"`
/// gives `("GLfloat", "v[4]")`.
pub fn split_param(raw: &str) -> Option<(&str, &str)> {
    let boundary = raw.rfind(|c: char| c == ' ' || c == '*')?;
    let name = &raw[boundary + 1..];
    if name.is_empty() {
        return None;
    }

    let ty = if raw[boundary..].starts_with('*') {
        &raw[..=boundary]
    } else {
        raw[..boundary].trim_end()
    };
    if ty.is_empty() {
        return None;
    }

    Some((ty, name))
}

/// Inverse of [`split_param`]: a pointer marker stays glued to the name.
pub fn join_param(ty: &str, name: &str) -> String {
    if ty.ends_with('*') {
        format!("{}{}", ty, name)
    } else {
        format!("{} {}", ty, name)
    }
}

fn format_slot(command: &str, ty: &str, name: &str, tables: &Tables) -> Result<String> {
    if ty.contains('*') {
        return Ok(format!("{} = {}", name, POINTER_FORMAT));
    }

    match tables.format_specifier(ty) {
        Some(spec) => Ok(format!("{} = {}", name, spec)),
        None => Err(Error::UnknownFormatType {
            command: command.to_owned(),
            param: name.to_owned(),
            ty: ty.to_owned(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PackedEnumTable;

    fn tables() -> Tables {
        let mut packed = PackedEnumTable::default();
        packed.insert("glBindBuffer", "target", "BufferBinding");
        packed.insert("glBufferData", "target", "BufferBinding");
        packed.insert("glBufferData", "usage", "BufferUsage");
        Tables::angle(packed)
    }

    #[test]
    fn test_split_param_shapes() {
        assert_eq!(split_param("GLenum target"), Some(("GLenum", "target")));
        assert_eq!(split_param("const GLfloat *m"), Some(("const GLfloat *", "m")));
        assert_eq!(
            split_param("const GLchar *const*string"),
            Some(("const GLchar *const*", "string"))
        );
        assert_eq!(split_param("GLfloat v[4]"), Some(("GLfloat", "v[4]")));
        assert_eq!(split_param("void **params"), Some(("void **", "params")));
        assert_eq!(split_param("GLuint"), None);
        assert_eq!(split_param("GLuint *"), None);
    }

    #[test]
    fn test_split_join_round_trip() {
        for raw in &[
            "GLenum target",
            "const GLfloat *m",
            "const void *const*indices",
            "GLfloat v[4]",
            "GLDEBUGPROCKHR callback",
        ] {
            let (ty, name) = split_param(raw).unwrap();
            let joined = join_param(ty, name);
            assert_eq!(joined, *raw);
            assert_eq!(split_param(&joined), Some((ty, name)), "{}", raw);
        }
    }

    #[test]
    fn test_join_param_normalizes_spacing() {
        let (ty, name) = split_param("GLvoid* pointer").unwrap();
        assert_eq!((ty, name), ("GLvoid*", "pointer"));
        assert_eq!(join_param(ty, name), "GLvoid*pointer");
    }

    #[test]
    fn test_dispatch_name() {
        let suffixes = &tables().strip_suffixes;
        assert_eq!(dispatch_name("glTestEXT", suffixes), "test");
        assert_eq!(dispatch_name("glDrawArrays", suffixes), "drawArrays");
        assert_eq!(dispatch_name("glBindVertexArrayOES", suffixes), "bindVertexArray");
        assert_eq!(dispatch_name("glCopyTextureCHROMIUM", suffixes), "copyTexture");
        assert_eq!(dispatch_name("glSetFenceNV", suffixes), "setFenceNV");
        assert_eq!(dispatch_name("glDebugMessageCallbackKHR", suffixes), "debugMessageCallback");
    }

    #[test]
    fn test_dispatch_name_strips_first_match_only() {
        let suffixes = ["EXT", "OES"];
        assert_eq!(dispatch_name("glFooOESEXT", &suffixes), "fooOES");
    }

    #[test]
    fn test_dispatch_name_keeps_bare_suffix() {
        assert_eq!(dispatch_name("glEXT", &["EXT"]), "eXT");
    }

    #[test]
    fn test_build_pointer_param() {
        let cmd = CommandSpec::build(
            "glLoadMatrixf",
            "void glLoadMatrixf",
            &["const GLfloat *m"],
            &tables(),
        )
        .unwrap();

        assert_eq!(cmd.return_type, "void");
        assert!(cmd.returns_void());
        assert_eq!(cmd.params[0].ty, "const GLfloat *");
        assert_eq!(cmd.params[0].name, "m");
        assert_eq!(cmd.params[0].format, "m = 0x%0.8p");
        assert_eq!(cmd.dispatch_name, "loadMatrixf");
        assert_eq!(cmd.entry_point_name(), "LoadMatrixf");
    }

    #[test]
    fn test_build_pointer_return() {
        let cmd = CommandSpec::build(
            "glGetString",
            "const GLubyte *glGetString",
            &["GLenum name"],
            &tables(),
        )
        .unwrap();

        assert_eq!(cmd.return_type, "const GLubyte *");
        assert_eq!(cmd.return_type_prefix(), "const GLubyte *");
        assert_eq!(cmd.format_string(), "name = 0x%X");
        assert!(!cmd.returns_void());
    }

    #[test]
    fn test_build_packed_params() {
        let cmd = CommandSpec::build(
            "glBufferData",
            "void glBufferData",
            &["GLenum target", "GLsizeiptr size", "const void *data", "GLenum usage"],
            &tables(),
        )
        .unwrap();

        let packed: Vec<_> = cmd.packed_params().map(|p| p.name.as_str()).collect();
        assert_eq!(packed, vec!["target", "usage"]);
        assert_eq!(cmd.names(), "target, size, data, usage");
        assert_eq!(cmd.internal_names(), "targetPacked, size, data, usagePacked");
        assert_eq!(
            cmd.internal_declarations(),
            "BufferBinding targetPacked, GLsizeiptr size, const void *data, BufferUsage usagePacked"
        );
        assert_eq!(
            cmd.declarations(),
            "GLenum target, GLsizeiptr size, const void *data, GLenum usage"
        );
    }

    #[test]
    fn test_unknown_scalar_type_is_an_error() {
        let err = CommandSpec::build("glFoo", "void glFoo", &["GLhalf h"], &tables()).unwrap_err();
        match err {
            Error::UnknownFormatType { command, param, ty } => {
                assert_eq!(command, "glFoo");
                assert_eq!(param, "h");
                assert_eq!(ty, "GLhalf");
            },
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_unknown_pointer_type_is_fine() {
        let cmd = CommandSpec::build("glFoo", "void glFoo", &["GLhalf *h"], &tables()).unwrap();
        assert_eq!(cmd.format_string(), "h = 0x%0.8p");
    }

    #[test]
    fn test_proto_must_end_with_name() {
        let err = CommandSpec::build("glFoo", "void glBar", &[] as &[&str], &tables()).unwrap_err();
        assert!(matches!(err, Error::MalformedDescription { .. }));
    }

    #[test]
    fn test_overloaded_command_keeps_its_dispatch_path() {
        let mut tables = tables();
        tables.overloaded.insert("glGetPointervKHR".to_string());

        let cmd = CommandSpec::build(
            "glGetPointervKHR",
            "void glGetPointervKHR",
            &["GLenum pname", "void **params"],
            &tables,
        )
        .unwrap();
        assert!(cmd.overloaded);
        assert_eq!(cmd.dispatch_name, "getPointervKHR");

        let cmd = CommandSpec::build(
            "glGetPointerv",
            "void glGetPointerv",
            &["GLenum pname", "void **params"],
            &tables,
        )
        .unwrap();
        assert!(cmd.overloaded);
        assert_eq!(cmd.dispatch_name, "getPointerv");
    }

    #[test]
    fn test_dispatch_name_does_not_depend_on_build_order() {
        let tables = tables();
        let a = CommandSpec::build("glTestEXT", "void glTestEXT", &["GLint x"], &tables).unwrap();
        let _ = CommandSpec::build("glTest", "void glTest", &["GLint x"], &tables).unwrap();
        let b = CommandSpec::build("glTestEXT", "void glTestEXT", &["GLint x"], &tables).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.dispatch_name, "test");
    }
}
