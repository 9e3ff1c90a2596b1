//! Shared fixtures for prizecore integration tests
//!
//! Every `TestEnv` gets its own temp directory holding the SQLite file and both
//! image directories, so tests can run in parallel.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use image::{Rgb, RgbImage};
use prizecore::{create_pool, AssetStore, PrizeManager};
use tempfile::TempDir;

pub struct TestEnv {
    pub dir: TempDir,
    pub db_path: PathBuf,
    pub manager: PrizeManager,
    pub assets: AssetStore,
}

impl TestEnv {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let db_path = dir.path().join("test.sqlite");
        let manager = open_manager(&db_path);
        let assets = AssetStore::new(
            dir.path().join("img").to_str().unwrap(),
            dir.path().join("hidden_img").to_str().unwrap(),
        );
        assets.ensure_dirs().unwrap();
        Self {
            dir,
            db_path,
            manager,
            assets,
        }
    }

    /// Opens a second, independent pool on the same database file.
    pub fn reopen(&self) -> PrizeManager {
        open_manager(&self.db_path)
    }

    /// Writes a solid-color PNG into the images directory.
    pub fn write_image(&self, name: &str, color: [u8; 3]) {
        RgbImage::from_pixel(32, 32, Rgb(color))
            .save(self.assets.images_dir().join(name))
            .unwrap();
    }

    /// Writes images and registers them as prizes, returning their names.
    pub fn seed_images(&self, names: &[&str]) -> Vec<String> {
        let names: Vec<String> = names.iter().map(|s| s.to_string()).collect();
        for (i, name) in names.iter().enumerate() {
            let shade = (i as u8).wrapping_mul(40);
            self.write_image(name, [shade, 255 - shade, 128]);
        }
        self.manager.seed_prizes(&names).unwrap();
        names
    }

    pub fn prize_id(&self, image: &str) -> i64 {
        self.manager
            .list_prizes()
            .unwrap()
            .into_iter()
            .find(|p| p.image == image)
            .map(|p| p.prize_id)
            .expect("prize not seeded")
    }
}

fn open_manager(path: &std::path::Path) -> PrizeManager {
    let pool = create_pool(path.to_str().unwrap()).expect("failed to create pool");
    PrizeManager::new(Arc::new(pool))
}
