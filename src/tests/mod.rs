pub mod data;


use log::LevelFilter;
use std::{path::PathBuf, sync::Once};

static INIT: Once = Once::new();

pub fn init_logger() {
    INIT.call_once(|| {
        env_logger::builder()
            .is_test(true)
            .filter_level(LevelFilter::Debug)
            .init();
    });
}

/// Creates a fresh directory, dedicated to this test
pub fn temp_directory(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("gnss-ephem-{}-{}", std::process::id(), name));
    if path.exists() {
        let _ = std::fs::remove_dir_all(&path);
    }
    std::fs::create_dir_all(&path)
        .unwrap_or_else(|e| panic!("failed to create {}: {}", path.display(), e));
    path
}
