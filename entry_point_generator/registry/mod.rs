////////////////////////////////////////////////////////////////////////////////////
// Copyright (c) 2019 DasEtwas - All Rights Reserved                               /
//      Unauthorized copying of this file, via any medium is strictly prohibited   /
//      Proprietary and confidential                                               /
////////////////////////////////////////////////////////////////////////////////////

//! Loading of the Khronos XML registry and the vendor extension registries.
//!
//! A [`Document`] is one parsed XML file. The base document and the extension documents are
//! merged into one [`Catalog`], which is what the rest of the generator reads from.

use std::{
    collections::{BTreeMap, HashMap},
    fs::File,
    io::{self, BufReader},
    path::Path,
};

use indexmap::IndexSet;

use crate::errors::{Error, Result};

mod command_names;
mod parse;

pub use self::command_names::{Admission, AdmissionRecord, CommandRegistry};
use self::parse::{parse_tree, Element};

/// A `<command>` node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandNode {
    pub name: String,
    /// Text of the `<proto>` element, e.g. `"const GLubyte *glGetString"`.
    pub proto: String,
    /// Text of each `<param>` element, in declaration order.
    pub params: Vec<String>,
}

/// A `<feature>` node, i.e. an API version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureNode {
    pub api: Option<String>,
    pub name: String,
    pub commands: Vec<String>,
}

/// One `<require>` group of an extension.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RequireGroup {
    pub api: Option<String>,
    pub comment: Option<String>,
    pub commands: Vec<String>,
}

/// An `<extension>` node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionNode {
    pub name: String,
    pub requires: Vec<RequireGroup>,
}

/// One parsed registry document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub source_name: String,
    pub commands: Vec<CommandNode>,
    pub features: Vec<FeatureNode>,
    pub extensions: Vec<ExtensionNode>,
}

impl Document {
    pub fn from_file(path: &Path) -> Result<Self> {
        let source_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file), &source_name)
    }

    /// Parses a registry document.
    ///
    /// Fails with [`Error::MalformedDescription`] when the top-level `<commands>` or
    /// `<extensions>` collection is missing.
    pub fn from_reader<R>(source: R, source_name: &str) -> Result<Self>
    where R: io::Read {
        let root = parse_tree(source, source_name)?;

        if root.first_named("commands").is_none() {
            return Err(Error::malformed(source_name, "missing top-level <commands> collection"));
        }
        if root.first_named("extensions").is_none() {
            return Err(Error::malformed(source_name, "missing top-level <extensions> collection"));
        }

        let commands = root
            .elements_named("commands")
            .flat_map(|commands| commands.elements_named("command"))
            .map(|command| read_command(command, source_name))
            .collect::<Result<Vec<_>>>()?;

        let features = root
            .elements_named("feature")
            .map(|feature| read_feature(feature, source_name))
            .collect::<Result<Vec<_>>>()?;

        let extensions = root
            .elements_named("extensions")
            .flat_map(|extensions| extensions.elements_named("extension"))
            .map(|extension| read_extension(extension, source_name))
            .collect::<Result<Vec<_>>>()?;

        debug!(
            "{}: {} commands, {} features, {} extensions",
            source_name,
            commands.len(),
            features.len(),
            extensions.len()
        );

        Ok(Document {
            source_name: source_name.to_owned(),
            commands,
            features,
            extensions,
        })
    }

    /// Appends the command and extension nodes of `extensions` after the ones of `base`.
    ///
    /// Node order inside every appended batch is kept. Features only come from `base`.
    pub fn merge(base: Document, extensions: &[Document]) -> Document {
        let mut merged = base;
        for doc in extensions {
            merged.commands.extend(doc.commands.iter().cloned());
            merged.extensions.extend(doc.extensions.iter().cloned());
            merged.source_name = format!("{} and {}", merged.source_name, doc.source_name);
        }
        merged
    }
}

fn read_command(command: &Element, source_name: &str) -> Result<CommandNode> {
    let proto = command
        .first_named("proto")
        .ok_or_else(|| Error::malformed(source_name, "<command> without <proto>"))?;
    let name = proto
        .first_named("name")
        .map(Element::text)
        .ok_or_else(|| Error::malformed(source_name, "<proto> without <name>"))?;

    Ok(CommandNode {
        name,
        proto: proto.text(),
        params: command.elements_named("param").map(Element::text).collect(),
    })
}

fn required_commands(group: &Element) -> Vec<String> {
    group
        .elements_named("command")
        .filter_map(|command| command.attr("name"))
        .map(str::to_owned)
        .collect()
}

fn read_feature(feature: &Element, source_name: &str) -> Result<FeatureNode> {
    let name = feature
        .attr("name")
        .ok_or_else(|| Error::malformed(source_name, "<feature> without a name"))?;

    Ok(FeatureNode {
        api: feature.attr("api").map(str::to_owned),
        name: name.to_owned(),
        commands: feature
            .elements_named("require")
            .flat_map(required_commands)
            .collect(),
    })
}

fn read_extension(extension: &Element, source_name: &str) -> Result<ExtensionNode> {
    let name = extension
        .attr("name")
        .ok_or_else(|| Error::malformed(source_name, "<extension> without a name"))?;

    Ok(ExtensionNode {
        name: name.to_owned(),
        requires: extension
            .elements_named("require")
            .map(|group| RequireGroup {
                api: group.attr("api").map(str::to_owned),
                comment: group.attr("comment").map(str::to_owned),
                commands: required_commands(group),
            })
            .collect(),
    })
}

/// Comment of the `EXT_texture_storage` requirement group that only applies with desktop DSA.
pub const DIRECT_STATE_ACCESS_CAVEAT: &str =
    "Supported only if GL_EXT_direct_state_access is supported";

/// The group is tagged for an API other than GLES (KHR extensions list the unsuffixed desktop
/// signatures under `api="gl"`).
pub fn is_foreign_api(group: &RequireGroup) -> bool {
    match group.api.as_deref() {
        Some(api) => api != "gles2" && api != "gles1",
        None => false,
    }
}

pub fn has_direct_state_access_caveat(group: &RequireGroup) -> bool {
    group.comment.as_deref() == Some(DIRECT_STATE_ACCESS_CAVEAT)
}

pub fn applies_to_gles(group: &RequireGroup) -> bool {
    !is_foreign_api(group) && !has_direct_state_access_caveat(group)
}

/// An extension with the commands it contributes to GLES.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionEntry {
    pub name: String,
    /// Ordered and de-duplicated.
    pub required_command_names: Vec<String>,
}

impl ExtensionEntry {
    pub fn from_node(node: &ExtensionNode) -> Self {
        let names: IndexSet<&str> = node
            .requires
            .iter()
            .filter(|group| applies_to_gles(group))
            .flat_map(|group| group.commands.iter().map(String::as_str))
            .collect();

        ExtensionEntry {
            name: node.name.clone(),
            required_command_names: names.into_iter().map(str::to_owned).collect(),
        }
    }
}

/// The merged registry, indexed for lookups.
#[derive(Debug, Clone)]
pub struct Catalog {
    document: Document,
    by_name: HashMap<String, usize>,
}

impl Catalog {
    pub fn new(document: Document) -> Self {
        let mut by_name = HashMap::with_capacity(document.commands.len());
        for (index, command) in document.commands.iter().enumerate() {
            if by_name.contains_key(&command.name) {
                warn!("{} is defined more than once, keeping the first definition", command.name);
                continue;
            }
            by_name.insert(command.name.clone(), index);
        }

        Catalog { document, by_name }
    }

    /// Loads and merges the base registry with the extension registries.
    pub fn load(base: &Path, extensions: &[impl AsRef<Path>]) -> Result<Self> {
        info!("Loading {}", base.display());
        let base = Document::from_file(base)?;
        let extensions = extensions
            .iter()
            .map(|path| {
                info!("Loading {}", path.as_ref().display());
                Document::from_file(path.as_ref())
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Catalog::new(Document::merge(base, &extensions)))
    }

    pub fn source_name(&self) -> &str {
        &self.document.source_name
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn command(&self, name: &str) -> Option<&CommandNode> {
        self.by_name.get(name).map(|&index| &self.document.commands[index])
    }

    /// Position of the `<command>` definition of `name` in the merged document.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    pub fn feature(&self, name: &str) -> Option<&FeatureNode> {
        self.document.features.iter().find(|feature| feature.name == name)
    }

    /// Orders `names` the way their `<command>` nodes appear in the catalog.
    ///
    /// Names without a definition are dropped with a warning.
    pub fn in_document_order(&self, names: &[String]) -> Vec<String> {
        let mut known: Vec<(usize, &String)> = Vec::with_capacity(names.len());
        for name in names {
            match self.by_name.get(name) {
                Some(&index) => known.push((index, name)),
                None => warn!("{} is required but has no <command> definition, skipping", name),
            }
        }
        known.sort_by_key(|&(index, _)| index);
        known.dedup_by_key(|&mut (index, _)| index);
        known.into_iter().map(|(_, name)| name.clone()).collect()
    }

    /// The supported extensions sorted by name.
    ///
    /// When two nodes share a name the later one wins.
    pub fn extension_entries<F>(&self, is_supported: F) -> Vec<ExtensionEntry>
    where F: Fn(&str) -> bool {
        let mut entries = BTreeMap::new();
        for node in &self.document.extensions {
            if !is_supported(&node.name) {
                trace!("Skipping unsupported extension {}", node.name);
                continue;
            }
            entries.insert(node.name.clone(), ExtensionEntry::from_node(node));
        }
        entries.into_iter().map(|(_, entry)| entry).collect()
    }
}
