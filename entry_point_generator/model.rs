////////////////////////////////////////////////////////////////////////////////////
// Copyright (c) 2019 DasEtwas - All Rights Reserved                               /
//      Unauthorized copying of this file, via any medium is strictly prohibited   /
//      Proprietary and confidential                                               /
////////////////////////////////////////////////////////////////////////////////////

//! The registry pass: decides which scope owns which command and hands out ordinals.
//!
//! Versions are walked first, in the order of [`Tables::versions`], then the supported
//! extensions sorted by name, then (when enabled) every admitted command once more for its
//! explicit context twin. The resulting [`EntryPointModel`] is frozen; every artifact is
//! rendered from it.

use std::{collections::HashMap, sync::Arc};

use crate::{
    command::CommandSpec,
    config::{Tables, Version},
    errors::{DuplicateCommandWarning, Result},
    registry::{Catalog, CommandRegistry},
    variant::{EntryPoint, Variant},
};

/// Scope tag of the extensions enabled on GLES1 contexts.
pub const GLES1_EXTENSION_SCOPE: &str = "glext";
/// Scope tag of every other extension.
pub const GLES2_EXTENSION_SCOPE: &str = "gl2ext";

#[derive(Debug, Clone)]
pub struct VersionScope {
    pub version: Version,
    pub entry_points: Vec<EntryPoint>,
    pub duplicates: Vec<DuplicateCommandWarning>,
}

#[derive(Debug, Clone)]
pub struct ExtensionScope {
    pub name: String,
    pub gles1: bool,
    pub entry_points: Vec<EntryPoint>,
    pub duplicates: Vec<DuplicateCommandWarning>,
}

impl ExtensionScope {
    pub fn scope_tag(&self) -> &'static str {
        if self.gles1 {
            GLES1_EXTENSION_SCOPE
        } else {
            GLES2_EXTENSION_SCOPE
        }
    }
}

#[derive(Debug, Clone)]
pub struct EntryPointModel {
    pub versions: Vec<VersionScope>,
    /// Sorted by extension name.
    pub extensions: Vec<ExtensionScope>,
    pub explicit_context_enabled: bool,
    /// Explicit context twins in admission order; empty when the variant set is disabled.
    pub explicit_context: Vec<EntryPoint>,
    /// Names of the GLES1 extensions, sorted, whether or not the catalog defines them.
    pub gles1_extensions: Vec<String>,
    /// GLES1 extensions left out of the context interface macro.
    pub gles1_no_context_decl_extensions: Vec<String>,
    pub registry: CommandRegistry,
    commands: HashMap<String, Arc<CommandSpec>>,
    /// name -> position of its `<command>` in the catalog
    document_index: HashMap<String, usize>,
}

struct ModelBuilder<'a> {
    catalog: &'a Catalog,
    tables: &'a Tables,
    registry: CommandRegistry,
    commands: HashMap<String, Arc<CommandSpec>>,
    document_index: HashMap<String, usize>,
}

impl<'a> ModelBuilder<'a> {
    fn spec(&mut self, name: &str) -> Result<Arc<CommandSpec>> {
        if let Some(spec) = self.commands.get(name) {
            return Ok(Arc::clone(spec));
        }

        // only names the catalog knows get admitted
        let node = self
            .catalog
            .command(name)
            .ok_or_else(|| crate::errors::Error::malformed(name, "command has no definition"))?;
        let spec = Arc::new(CommandSpec::build(&node.name, &node.proto, &node.params, self.tables)?);
        self.commands.insert(name.to_owned(), Arc::clone(&spec));
        if let Some(index) = self.catalog.index_of(name) {
            self.document_index.insert(name.to_owned(), index);
        }
        Ok(spec)
    }

    /// Admits `candidates` under `scope` and builds an ambient entry point per admitted command.
    fn admit(
        &mut self,
        scope: &str,
        candidates: &[String],
    ) -> Result<(Vec<EntryPoint>, Vec<DuplicateCommandWarning>)> {
        let candidates = self.catalog.in_document_order(candidates);
        let admission = self.registry.admit(scope, &candidates);

        let mut entry_points = Vec::with_capacity(admission.admitted.len());
        for name in &admission.admitted {
            let spec = self.spec(name)?;
            let ordinal = self.registry.next_ordinal();
            entry_points.push(EntryPoint::new(spec, Variant::Ambient, ordinal, self.tables));
        }

        let duplicates = admission
            .duplicates
            .into_iter()
            .map(|command| {
                let claimed_by = self.registry.claimed_by(&command).unwrap_or_default().to_owned();
                DuplicateCommandWarning {
                    command,
                    scope: scope.to_owned(),
                    claimed_by,
                }
            })
            .collect();

        Ok((entry_points, duplicates))
    }
}

impl EntryPointModel {
    /// Runs the registry pass over `catalog`.
    ///
    /// Fails on the first command that cannot be modeled; nothing partial is returned.
    pub fn build(catalog: &Catalog, tables: &Tables) -> Result<Self> {
        let mut builder = ModelBuilder {
            catalog,
            tables,
            registry: CommandRegistry::new(),
            commands: HashMap::new(),
            document_index: HashMap::new(),
        };

        let mut versions = Vec::with_capacity(tables.versions.len());
        for &version in &tables.versions {
            let feature_name = version.feature_name();
            let candidates = match catalog.feature(&feature_name) {
                Some(feature) => feature.commands.clone(),
                None => {
                    warn!("{} has no <feature> in {}", feature_name, catalog.source_name());
                    Vec::new()
                },
            };

            let (entry_points, duplicates) = builder.admit(&version.annotation(), &candidates)?;
            // ES1 shares most of its commands with ES2
            for warning in &duplicates {
                debug!("{}", warning);
            }
            info!(
                "OpenGL ES {}: {} entry points, {} already defined",
                version,
                entry_points.len(),
                duplicates.len()
            );
            versions.push(VersionScope {
                version,
                entry_points,
                duplicates,
            });
        }

        let mut extensions = Vec::new();
        for entry in catalog.extension_entries(|name| tables.is_supported(name)) {
            let gles1 = tables.is_gles1_extension(&entry.name);
            let scope = if gles1 {
                GLES1_EXTENSION_SCOPE
            } else {
                GLES2_EXTENSION_SCOPE
            };

            let (entry_points, duplicates) = builder.admit(scope, &entry.required_command_names)?;
            for warning in &duplicates {
                warn!("{}", warning);
            }
            extensions.push(ExtensionScope {
                name: entry.name,
                gles1,
                entry_points,
                duplicates,
            });
        }
        info!("{} extensions", extensions.len());

        let mut explicit_context = Vec::new();
        if tables.explicit_context {
            let ambient = versions
                .iter()
                .flat_map(|scope| scope.entry_points.iter())
                .chain(extensions.iter().flat_map(|scope| scope.entry_points.iter()));
            for entry_point in ambient {
                explicit_context.push(entry_point.explicit_twin(builder.registry.next_ordinal()));
            }
            info!(
                "{}: {} entry points",
                crate::variant::EXPLICIT_CONTEXT_EXTENSION,
                explicit_context.len()
            );
        }

        Ok(EntryPointModel {
            versions,
            extensions,
            explicit_context_enabled: tables.explicit_context,
            explicit_context,
            gles1_extensions: tables.gles1_extensions.iter().cloned().collect(),
            gles1_no_context_decl_extensions: tables
                .gles1_no_context_decl_extensions
                .iter()
                .cloned()
                .collect(),
            registry: builder.registry,
            commands: builder.commands,
            document_index: builder.document_index,
        })
    }

    pub fn command(&self, name: &str) -> Option<&Arc<CommandSpec>> {
        self.commands.get(name)
    }

    pub fn version(&self, version: Version) -> Option<&VersionScope> {
        self.versions.iter().find(|scope| scope.version == version)
    }

    pub fn extension(&self, name: &str) -> Option<&ExtensionScope> {
        self.extensions.iter().find(|scope| scope.name == name)
    }

    /// Every ambient entry point: versions first, then extensions.
    pub fn ambient_entry_points(&self) -> impl Iterator<Item = &EntryPoint> {
        self.versions
            .iter()
            .flat_map(|scope| scope.entry_points.iter())
            .chain(self.extensions.iter().flat_map(|scope| scope.entry_points.iter()))
    }

    /// Every entry point in ordinal order.
    pub fn all_entry_points(&self) -> impl Iterator<Item = &EntryPoint> {
        self.ambient_entry_points().chain(self.explicit_context.iter())
    }

    /// Specs of the commands `scope` claimed, in admission order.
    pub fn scope_commands(&self, scope: &str) -> Vec<&Arc<CommandSpec>> {
        self.registry
            .commands(scope)
            .iter()
            .filter_map(|name| self.commands.get(name))
            .collect()
    }

    /// Specs of the commands `scope` claimed, in the order the catalog defines them.
    pub fn scope_commands_in_document_order(&self, scope: &str) -> Vec<&Arc<CommandSpec>> {
        let mut commands = self.scope_commands(scope);
        commands.sort_by_key(|spec| self.document_index.get(&spec.name).copied().unwrap_or(usize::MAX));
        commands
    }
}
