////////////////////////////////////////////////////////////////////////////////////
// Copyright (c) 2019 DasEtwas - All Rights Reserved                               /
//      Unauthorized copying of this file, via any medium is strictly prohibited   /
//      Proprietary and confidential                                               /
////////////////////////////////////////////////////////////////////////////////////

//! A GLES entry point layer generator. It reads the Khronos `gl.xml` registry (plus any number
//! of extension registries such as `gl_angle_ext.xml`) and renders the C++ sources binding every
//! supported command to a context object: per version declarations and definitions, the
//! extension entry points, the `EntryPoint` enumeration, the export thunks with their ordinal
//! table, the GLES1 context interface macro and the `EGL_ANGLE_explicit_context` includes.
//!
//! # Example
//!
//! ```no_run
//! extern crate entry_point_generator;
//!
//! use entry_point_generator::{generate, output, Catalog, PackedEnumTable, Provenance, Tables};
//! use std::{fs::File, path::Path};
//!
//! fn main() {
//!     let catalog = Catalog::load(Path::new("gl.xml"), &["gl_angle_ext.xml"]).unwrap();
//!     let packed = PackedEnumTable::from_reader(File::open("packed.json").unwrap()).unwrap();
//!     let provenance = Provenance::new("gen_entry_points", 2018, "gl.xml", catalog.source_name());
//!
//!     let artifacts = generate(&catalog, &Tables::angle(packed), &provenance).unwrap();
//!     output::write_artifacts(Path::new("angle"), &artifacts, false).unwrap();
//! }
//! ```
//!
//! Every artifact is rendered from one frozen [`EntryPointModel`], so a command gets the same
//! name, parameters and ordinal wherever it appears. Nothing is written unless every artifact
//! rendered.

extern crate lazy_static;
#[macro_use]
extern crate log;
extern crate xml;

pub mod command;
pub mod config;
pub mod errors;
pub mod generators;
pub mod model;
pub mod output;
pub mod registry;
pub mod variant;

pub use crate::{
    command::{CommandSpec, Param},
    config::{PackedEnumTable, Tables, Version},
    errors::{DuplicateCommandWarning, Error, Result},
    generators::{render, render_all, ArtifactKind, Provenance, RenderContext, RenderedArtifact, Scope},
    model::EntryPointModel,
    registry::{Catalog, CommandRegistry, Document},
    variant::{EntryPoint, Variant},
};

/// Builds the model and renders every artifact.
pub fn generate(catalog: &Catalog, tables: &Tables, provenance: &Provenance) -> Result<Vec<RenderedArtifact>> {
    let model = EntryPointModel::build(catalog, tables)?;
    info!(
        "{} entry points, {} ordinals",
        model.registry.admitted().len(),
        model.registry.ordinals_assigned()
    );

    let artifacts = render_all(&RenderContext::new(&model, provenance))?;
    Ok(artifacts)
}
