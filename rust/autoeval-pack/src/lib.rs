//! Extension packaging
//!
//! Collects the built extension assets and writes them into a zip archive with
//! paths relative to the extension root.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Files shipped in the archive, relative to the extension root
pub const DEFAULT_PATTERNS: [&str; 5] = [
    "dist/**/*",
    "manifest.json",
    "popup.html",
    "popup.css",
    "icon*.png",
];

pub const DEFAULT_ARCHIVE_NAME: &str = "auto-evaluate-utec.zip";

/// Regular files under `root` matching any pattern, deduplicated and sorted
pub fn collect_files(root: &Path, patterns: &[&str]) -> Result<Vec<PathBuf>> {
    let mut files = BTreeSet::new();

    for pattern in patterns {
        let full = root.join(pattern);
        let full = full
            .to_str()
            .ok_or_else(|| anyhow!("Non UTF-8 path: {}", full.display()))?;
        for entry in glob::glob(full).with_context(|| format!("Invalid pattern: {}", pattern))? {
            let path = entry.context("Failed to read matched path")?;
            if path.is_dir() {
                continue;
            }
            let relative = path
                .strip_prefix(root)
                .with_context(|| format!("{} is outside {}", path.display(), root.display()))?
                .to_path_buf();
            files.insert(relative);
        }
    }

    if files.is_empty() {
        return Err(anyhow!(
            "No files found to zip under {}. Check the patterns: {}",
            root.display(),
            patterns.join(", ")
        ));
    }

    Ok(files.into_iter().collect())
}

/// Archive entry name: root-relative with forward slashes
fn entry_name(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Write `files` (relative to `root`) into a DEFLATE zip at `output`.
///
/// `progress` receives each entry name as it is added.
pub fn write_archive<F>(root: &Path, files: &[PathBuf], output: &Path, mut progress: F) -> Result<usize>
where
    F: FnMut(&str),
{
    let out = File::create(output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    let mut zip = ZipWriter::new(out);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for relative in files {
        let name = entry_name(relative);
        progress(&name);
        zip.start_file(name.as_str(), options)
            .with_context(|| format!("Failed to add {}", name))?;
        let mut source = File::open(root.join(relative))
            .with_context(|| format!("Failed to read {}", relative.display()))?;
        io::copy(&mut source, &mut zip).with_context(|| format!("Failed to write {}", name))?;
    }

    let mut out = zip.finish().context("Failed to finalize archive")?;
    out.flush().context("Failed to flush archive")?;
    Ok(files.len())
}

/// Collect with the default patterns and write the archive
pub fn package<F>(root: &Path, output: &Path, progress: F) -> Result<usize>
where
    F: FnMut(&str),
{
    let files = collect_files(root, &DEFAULT_PATTERNS)?;
    write_archive(root, &files, output, progress)
}
