#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use dukkan::application::EntityStore;
use dukkan::testkit::memory::MemoryAdapter;

/// Store over a fresh in-memory backend, plus the backend for inspection.
pub async fn memory_store() -> (Arc<MemoryAdapter>, EntityStore) {
    let backend = Arc::new(MemoryAdapter::new());
    let store = EntityStore::open(backend.clone())
        .await
        .expect("open store over memory backend");
    (backend, store)
}

/// Write a config file into `dir` that keeps the database inside `dir`.
pub fn local_config(dir: &Path) -> PathBuf {
    let db = dir.join("dukkan.db");
    write_config(
        dir,
        &format!(
            "[persistence]\nstrategy = \"local\"\n\n[persistence.local]\npath = \"{}\"\n",
            db.display().to_string().replace('\\', "/")
        ),
    )
}

pub fn write_config(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("dukkan.toml");
    fs::write(&path, contents).expect("write temp config");
    path
}
