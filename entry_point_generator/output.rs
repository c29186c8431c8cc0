////////////////////////////////////////////////////////////////////////////////////
// Copyright (c) 2019 DasEtwas - All Rights Reserved                               /
//      Unauthorized copying of this file, via any medium is strictly prohibited   /
//      Proprietary and confidential                                               /
////////////////////////////////////////////////////////////////////////////////////

use std::{
    fs,
    io::{self, BufReader, Read},
    path::{Path, PathBuf},
};

use crate::generators::RenderedArtifact;

/// Whether the file at `dest` holds anything other than `contents`.
pub fn is_stale(dest: &Path, contents: &[u8]) -> io::Result<bool> {
    match fs::File::open(dest) {
        Ok(file) => {
            let mut existing = Vec::with_capacity(contents.len());
            BufReader::new(file).read_to_end(&mut existing)?;
            Ok(existing != contents)
        },
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(true),
        Err(err) => Err(err),
    }
}

/// Writes every artifact below `root` whose contents changed, creating directories as needed.
///
/// Returns the paths that were (or with `dry_run`, would have been) written.
pub fn write_artifacts(
    root: &Path,
    artifacts: &[RenderedArtifact],
    dry_run: bool,
) -> io::Result<Vec<PathBuf>> {
    let mut changed = Vec::new();

    for artifact in artifacts {
        let dest = root.join(&artifact.path);
        if !is_stale(&dest, artifact.contents.as_bytes())? {
            trace!("{} is up to date", dest.display());
            continue;
        }

        if dry_run {
            info!("Would write {}", dest.display());
        } else {
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&dest, &artifact.contents)?;
            info!("Wrote {}", dest.display());
        }
        changed.push(dest);
    }

    Ok(changed)
}
