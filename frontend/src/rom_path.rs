//! Cartridge resolution: loads an image from a loose file or from the
//! first cartridge image inside a ZIP archive.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// File extensions recognized as cartridge images inside archives.
const IMAGE_EXTENSIONS: &[&str] = &["bin", "a26", "rom"];

#[derive(Error, Debug)]
pub enum RomLoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid ZIP {path}: {message}")]
    Zip { path: PathBuf, message: String },

    #[error("no cartridge image (.bin, .a26, .rom) in {0}")]
    NoImage(PathBuf),
}

fn has_image_extension(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e)))
}

/// Read a cartridge image.
///
/// Resolution order:
/// 1. If `path` ends with `.zip` → the first entry with an image extension.
/// 2. Otherwise → the file's bytes as-is.
pub fn load_cartridge(path: &Path) -> Result<Vec<u8>, RomLoadError> {
    if path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"))
    {
        return load_from_zip(path);
    }
    Ok(std::fs::read(path)?)
}

fn load_from_zip(path: &Path) -> Result<Vec<u8>, RomLoadError> {
    let zip_error = |e: zip::result::ZipError| RomLoadError::Zip {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    let file = File::open(path)?;
    let mut archive = zip::ZipArchive::new(BufReader::new(file)).map_err(zip_error)?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(zip_error)?;
        if entry.is_dir() || !has_image_extension(entry.name()) {
            continue;
        }
        let mut data = Vec::with_capacity(entry.size() as usize);
        std::io::Read::read_to_end(&mut entry, &mut data)?;
        return Ok(data);
    }

    Err(RomLoadError::NoImage(path.to_path_buf()))
}
