//! Shared fixtures for prizebot integration tests

#![allow(dead_code)]

use std::sync::Arc;

use image::{Rgb, RgbImage};
use prizecore::{create_pool, AssetStore, PrizeManager};
use tempfile::TempDir;

pub struct TestEnv {
    pub dir: TempDir,
    pub manager: Arc<PrizeManager>,
    pub assets: Arc<AssetStore>,
}

impl TestEnv {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let db_path = dir.path().join("bot.sqlite");
        let pool = create_pool(db_path.to_str().unwrap()).expect("failed to create pool");
        let assets = AssetStore::new(
            dir.path().join("img").to_str().unwrap(),
            dir.path().join("hidden_img").to_str().unwrap(),
        );
        assets.ensure_dirs().unwrap();
        Self {
            dir,
            manager: Arc::new(PrizeManager::new(Arc::new(pool))),
            assets: Arc::new(assets),
        }
    }

    pub fn write_image(&self, name: &str) {
        RgbImage::from_fn(24, 24, |x, y| Rgb([(x * 10) as u8, (y * 10) as u8, 90]))
            .save(self.assets.images_dir().join(name))
            .unwrap();
    }

    /// Writes the images and seeds them, returning prize ids in the same order.
    pub fn seed(&self, names: &[&str]) -> Vec<i64> {
        for name in names {
            self.write_image(name);
        }
        let owned: Vec<String> = names.iter().map(|s| s.to_string()).collect();
        self.manager.seed_prizes(&owned).unwrap();
        let prizes = self.manager.list_prizes().unwrap();
        names
            .iter()
            .map(|name| prizes.iter().find(|p| p.image == *name).unwrap().prize_id)
            .collect()
    }
}
