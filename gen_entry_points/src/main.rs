////////////////////////////////////////////////////////////////////////////////////
// Copyright (c) 2019 DasEtwas - All Rights Reserved                               /
//      Unauthorized copying of this file, via any medium is strictly prohibited   /
//      Proprietary and confidential                                               /
////////////////////////////////////////////////////////////////////////////////////

use std::{
    fs::File,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::Datelike;
use clap::{AppSettings, Parser};
use entry_point_generator::{generate, output, Catalog, PackedEnumTable, Provenance, Tables};
use log::{info, LevelFilter};
use simple_logger::SimpleLogger;

const SCRIPT_NAME: &str = "gen_entry_points";
const PACKED_ENUMS_FILE: &str = "entry_point_packed_gl_enums.json";

#[derive(Parser, Debug)]
#[clap(name = "gen_entry_points")]
#[clap(about = "Generates the GLES entry point layer from the Khronos registry", version, author)]
#[clap(setting(AppSettings::ArgRequiredElseHelp))]
struct Cli {
    /// Base registry, usually gl.xml
    #[clap(long, short)]
    registry: PathBuf,
    /// Extra registries merged into the base one, e.g. gl_angle_ext.xml
    #[clap(long, short)]
    extension_registry: Vec<PathBuf>,
    /// Packed enum table, defaults to entry_point_packed_gl_enums.json next to the registry
    #[clap(long, short)]
    packed_enums: Option<PathBuf>,
    /// Root of the source tree the artifacts are written to
    #[clap(long, short)]
    output: PathBuf,
    /// Copyright year, defaults to the current one
    #[clap(long)]
    year: Option<i32>,
    /// Skip the EGL_ANGLE_explicit_context entry points
    #[clap(long)]
    no_explicit_context: bool,
    /// Report which files would change without writing them
    #[clap(long)]
    dry_run: bool,
    /// Verbose mode
    #[clap(long, short)]
    verbose: bool,
}

fn main() -> Result<()> {
    let res = main_internal();

    match &res {
        Ok(changed) => {
            for path in changed {
                println!("{}", path.display());
            }
        },
        Err(err) => {
            for i in err.chain() {
                eprintln!("{}", i);
            }
        },
    }
    res.map(|_| ())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn main_internal() -> Result<Vec<PathBuf>> {
    let args = Cli::parse();

    let log_level = if args.verbose {
        LevelFilter::Trace
    } else {
        LevelFilter::Warn
    };
    SimpleLogger::new().with_level(log_level).init()?;

    let catalog = Catalog::load(&args.registry, &args.extension_registry)
        .with_context(|| format!("failed to load {}", args.registry.display()))?;

    let packed_path = args
        .packed_enums
        .clone()
        .unwrap_or_else(|| args.registry.with_file_name(PACKED_ENUMS_FILE));
    let packed_file = File::open(&packed_path)
        .with_context(|| format!("failed to open {}", packed_path.display()))?;
    let packed = PackedEnumTable::from_reader(packed_file)
        .with_context(|| format!("failed to parse {}", packed_path.display()))?;
    info!("{} commands with packed enums", packed.len());

    let mut tables = Tables::angle(packed);
    tables.explicit_context = !args.no_explicit_context;

    let base_source = file_name(&args.registry);
    let all_sources = std::iter::once(&args.registry)
        .chain(args.extension_registry.iter())
        .map(|path| file_name(path))
        .collect::<Vec<_>>()
        .join(" and ");
    let year = args.year.unwrap_or_else(|| chrono::Local::now().year());
    let provenance = Provenance::new(SCRIPT_NAME, year, &base_source, &all_sources);

    let artifacts = generate(&catalog, &tables, &provenance)?;
    let changed = output::write_artifacts(&args.output, &artifacts, args.dry_run)
        .with_context(|| format!("failed to write to {}", args.output.display()))?;
    info!("{} of {} artifacts changed", changed.len(), artifacts.len());

    Ok(changed)
}
