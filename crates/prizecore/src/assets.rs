//! On-disk prize images.
//!
//! Originals live in one directory, blurred teasers in a sibling directory under
//! the same filename. Teasers are generated lazily and never regenerated once
//! present.

use image::ImageFormat;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::core::config;
use crate::core::error::{AppError, AppResult};
use crate::imaging::{load_image, obscure};

#[derive(Debug, Clone)]
pub struct AssetStore {
    images_dir: PathBuf,
    hidden_dir: PathBuf,
}

impl AssetStore {
    pub fn new(images_dir: impl AsRef<str>, hidden_dir: impl AsRef<str>) -> Self {
        Self {
            images_dir: PathBuf::from(shellexpand::tilde(images_dir.as_ref()).into_owned()),
            hidden_dir: PathBuf::from(shellexpand::tilde(hidden_dir.as_ref()).into_owned()),
        }
    }

    /// Store rooted at IMAGES_DIR / HIDDEN_IMAGES_DIR.
    pub fn from_config() -> Self {
        Self::new(config::IMAGES_DIR.as_str(), config::HIDDEN_IMAGES_DIR.as_str())
    }

    pub fn images_dir(&self) -> &Path {
        &self.images_dir
    }

    pub fn hidden_dir(&self) -> &Path {
        &self.hidden_dir
    }

    /// Creates both directories if missing.
    pub fn ensure_dirs(&self) -> AppResult<()> {
        fs_err::create_dir_all(&self.images_dir)?;
        fs_err::create_dir_all(&self.hidden_dir)?;
        Ok(())
    }

    pub fn original_path(&self, image: &str) -> AppResult<PathBuf> {
        Ok(self.images_dir.join(validate_file_name(image)?))
    }

    pub fn teaser_path(&self, image: &str) -> AppResult<PathBuf> {
        Ok(self.hidden_dir.join(validate_file_name(image)?))
    }

    pub fn has_teaser(&self, image: &str) -> bool {
        self.teaser_path(image).map(|p| p.is_file()).unwrap_or(false)
    }

    /// Returns the teaser path, blurring the original first if no teaser exists yet.
    ///
    /// Each call writes to its own temporary file in the teaser directory and
    /// renames it into place, so concurrent callers never share a partial file
    /// and a crash mid-write never leaves a truncated teaser behind.
    pub fn ensure_teaser(&self, image: &str) -> AppResult<PathBuf> {
        let teaser_path = self.teaser_path(image)?;
        if teaser_path.is_file() {
            return Ok(teaser_path);
        }

        let original = load_image(&self.original_path(image)?)?;
        let format = ImageFormat::from_path(&teaser_path)?;
        let blurred = obscure(&original);

        fs_err::create_dir_all(&self.hidden_dir)?;
        let mut tmp = NamedTempFile::new_in(&self.hidden_dir)?;
        blurred.write_to(tmp.as_file_mut(), format)?;

        if let Err(e) = tmp.persist(&teaser_path) {
            // Another caller finished the same teaser first
            if teaser_path.is_file() {
                return Ok(teaser_path);
            }
            return Err(AppError::Io(e.error));
        }

        log::info!("Generated teaser {}", teaser_path.display());
        Ok(teaser_path)
    }

    /// Raw bytes of the original image, for delivery to a winner.
    pub fn read_original(&self, image: &str) -> AppResult<Vec<u8>> {
        let path = self.original_path(image)?;
        if !path.is_file() {
            return Err(AppError::MissingImage(path));
        }
        Ok(fs_err::read(&path)?)
    }

    /// Raw bytes of the teaser, generating it on first use.
    pub fn read_teaser(&self, image: &str) -> AppResult<Vec<u8>> {
        let path = self.ensure_teaser(image)?;
        Ok(fs_err::read(&path)?)
    }

    /// Filenames in the images directory with a supported extension, sorted.
    pub fn list_image_files(&self) -> AppResult<Vec<String>> {
        list_image_files_in(&self.images_dir)
    }

    /// Copies supported images from `source_dir` into the images directory.
    ///
    /// Files whose name is already present are left alone. Returns the number
    /// of files copied.
    pub fn import_images(&self, source_dir: &Path) -> AppResult<usize> {
        fs_err::create_dir_all(&self.images_dir)?;
        let mut copied = 0;
        for name in list_image_files_in(source_dir)? {
            let target = self.original_path(&name)?;
            if target.exists() {
                continue;
            }
            fs_err::copy(source_dir.join(&name), &target)?;
            copied += 1;
        }
        if copied > 0 {
            log::info!(
                "Imported {} image(s) from {} into {}",
                copied,
                source_dir.display(),
                self.images_dir.display()
            );
        }
        Ok(copied)
    }
}

fn list_image_files_in(dir: &Path) -> AppResult<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs_err::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            log::warn!("Skipping non UTF-8 filename in {}", dir.display());
            continue;
        };
        if has_supported_extension(&name) {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}

fn has_supported_extension(name: &str) -> bool {
    if name.starts_with('.') {
        return false;
    }
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let e = e.to_ascii_lowercase();
            config::imaging::SUPPORTED_EXTENSIONS.contains(&e.as_str())
        })
        .unwrap_or(false)
}

/// Prize images are bare filenames; anything that could escape the asset
/// directories is rejected.
fn validate_file_name(image: &str) -> AppResult<&str> {
    let bad = image.is_empty()
        || image == "."
        || image == ".."
        || image.contains('/')
        || image.contains('\\')
        || image.contains('\0');
    if bad {
        return Err(AppError::Validation(format!("invalid image file name: {:?}", image)));
    }
    Ok(image)
}
