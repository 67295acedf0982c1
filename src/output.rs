//! Writing extracted sprites and documents to disk.

use crate::error::{Result, UnpackError};
use crate::texture::encode_png;
use image::RgbaImage;
use std::path::{Path, PathBuf};

const RESERVED_CHARS: [char; 7] = [':', '*', '?', '"', '<', '>', '|'];

/// Replace characters that are not allowed in file names with `_`.
///
/// A leading Windows drive prefix such as `C:\` is kept intact.
pub fn sanitize_path_input(input: &str) -> String {
    let bytes = input.as_bytes();
    let has_drive = bytes.len() >= 3
        && bytes[0].is_ascii_alphabetic()
        && bytes[1] == b':'
        && (bytes[2] == b'\\' || bytes[2] == b'/');

    input
        .char_indices()
        .map(|(i, c)| {
            if RESERVED_CHARS.contains(&c) && !(has_drive && i == 1) {
                '_'
            } else {
                c
            }
        })
        .collect()
}

/// Decide where an output file goes.
///
/// A requested path ending in `extension` names the file itself, any other
/// requested path is a directory that receives `default_name`. Without a
/// request the file lands in `cwd`.
pub fn resolve_output_file(
    cwd: &Path,
    requested: Option<&str>,
    extension: &str,
    default_name: &str,
) -> PathBuf {
    match requested {
        Some(requested) => {
            let requested = cwd.join(sanitize_path_input(requested));
            let names_file = requested
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case(extension));
            if names_file {
                requested
            } else {
                requested.join(default_name)
            }
        }
        None => cwd.join(default_name),
    }
}

/// Make sure `dir` exists as a directory.
pub fn prepare_dir(dir: &Path) -> Result<()> {
    if dir.as_os_str().is_empty() {
        return Ok(());
    }
    if dir.exists() {
        if !dir.is_dir() {
            return Err(UnpackError::Output(format!(
                "{:?} exists and is not a directory",
                dir
            )));
        }
        return Ok(());
    }
    std::fs::create_dir_all(dir)?;
    Ok(())
}

/// Encode `sprite` as PNG and write it to `path`, creating parent
/// directories as needed.
pub fn write_sprite(path: &Path, sprite: &RgbaImage) -> Result<()> {
    if let Some(parent) = path.parent() {
        prepare_dir(parent)?;
    }
    std::fs::write(path, encode_png(sprite)?)?;
    Ok(())
}

/// Write a text document to `path`, creating parent directories as needed.
pub fn write_text(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        prepare_dir(parent)?;
    }
    std::fs::write(path, contents)?;
    Ok(())
}

/// File name used for an alias, which is stored with or without `.png`.
pub fn alias_file_name(alias: &str) -> String {
    if alias.ends_with(".png") {
        alias.to_string()
    } else {
        format!("{}.png", alias)
    }
}
