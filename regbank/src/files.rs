// Licensed under the Apache-2.0 license

//! Template lookup and generated file output.

use anyhow::{bail, Context, Result};
use log::{debug, info};
use regbank_generator::DEFAULT_AXI4_LITE_TEMPLATE;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use tempfile::NamedTempFile;

/// Template name selecting the built-in AXI4-Lite slave.
pub const BUILTIN_AXI4_LITE: &str = "builtin:axi4-lite";

/// Name of the output directory created next to the first input file when
/// none is given.
pub const DEFAULT_GEN_DIR: &str = "gen";

/// A document waiting to be written to the generation directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedFile {
    /// File name relative to the generation directory.
    pub name: String,
    pub contents: String,
}

/// Generation directory used when none is given: `gen` next to `first_input`.
pub fn default_gen_dir(first_input: &Path) -> PathBuf {
    first_input
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(DEFAULT_GEN_DIR)
}

/// Find and read a template.
///
/// `None` and [`BUILTIN_AXI4_LITE`] select the built-in template. An absolute
/// path is read as is. A relative path is tried against `source_dir`, the
/// working directory and then each of `template_dirs`.
pub fn resolve_template(
    name: Option<&str>,
    source_dir: Option<&Path>,
    template_dirs: &[PathBuf],
) -> Result<String> {
    let name = match name {
        None | Some(BUILTIN_AXI4_LITE) => return Ok(DEFAULT_AXI4_LITE_TEMPLATE.to_string()),
        Some(name) => name,
    };

    let path = Path::new(name);
    let candidates: Vec<PathBuf> = if path.is_absolute() {
        vec![path.to_path_buf()]
    } else {
        source_dir
            .map(|dir| dir.join(path))
            .into_iter()
            .chain(std::iter::once(path.to_path_buf()))
            .chain(template_dirs.iter().map(|dir| dir.join(path)))
            .collect()
    };

    for candidate in &candidates {
        if candidate.is_file() {
            debug!("using template {}", candidate.display());
            return std::fs::read_to_string(candidate)
                .with_context(|| format!("failed to read template {}", candidate.display()));
        }
    }

    let searched: Vec<_> = candidates.iter().map(|c| c.display().to_string()).collect();
    bail!("template {name} not found (searched {})", searched.join(", "))
}

/// Write all of `files` into `gen_dir`, or none of them, creating the
/// directory if needed.
///
/// Every file name must be a plain relative path that stays inside
/// `gen_dir`. All names are checked before anything is written.
pub fn write_generated_files(gen_dir: &Path, files: &[GeneratedFile]) -> Result<Vec<PathBuf>> {
    let outputs = files
        .iter()
        .map(|file| Ok((output_path(gen_dir, &file.name)?, file.contents.as_str())))
        .collect::<Result<Vec<_>>>()?;
    write_all_or_nothing(&outputs)?;
    Ok(outputs.into_iter().map(|(path, _)| path).collect())
}

/// Write each `(path, contents)` pair, replacing existing files.
///
/// Each document is first staged in a temporary file next to its
/// destination. Destinations are only replaced once every document is
/// staged, so a failure before that point leaves existing files untouched
/// (directories created on the way may remain).
pub fn write_all_or_nothing<P: AsRef<Path>>(outputs: &[(P, &str)]) -> Result<()> {
    let mut staged = Vec::with_capacity(outputs.len());
    for (path, contents) in outputs {
        let path = path.as_ref();
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
        let mut temp = NamedTempFile::new_in(parent)
            .with_context(|| format!("failed to stage {}", path.display()))?;
        temp.write_all(contents.as_bytes())
            .with_context(|| format!("failed to stage {}", path.display()))?;
        debug!("staged {} at {}", path.display(), temp.path().display());
        staged.push((temp, path));
    }

    for (temp, path) in staged {
        temp.persist(path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!("wrote file: {}", path.display());
    }
    Ok(())
}

/// Destination of the output `name`, which must be a relative path that
/// stays inside `gen_dir`.
fn output_path(gen_dir: &Path, name: &str) -> Result<PathBuf> {
    let relative: PathBuf = Path::new(name)
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    let stays_inside = relative
        .components()
        .all(|c| matches!(c, Component::Normal(_)));
    if relative.as_os_str().is_empty() || !stays_inside {
        bail!("output {name:?} must be a relative path inside the generation directory");
    }
    Ok(gen_dir.join(relative))
}
