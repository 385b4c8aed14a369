use std::{fs, io::ErrorKind, path::Path};

use log::{debug, error};

use crate::{error::Error, ingestion::Page};

/// Trailing line closing some products
const END_OF_FILE: &str = "EOF";

/// Reads one product file, line by line.
pub fn read_page(path: &Path) -> Result<Page, Error> {
    let content = fs::read_to_string(path).map_err(|e| {
        error!("{}: {}", path.display(), e);
        match e.kind() {
            ErrorKind::NotFound => Error::FileNotFound(path.display().to_string()),
            _ => Error::FileRead(format!("{}: {}", path.display(), e)),
        }
    })?;

    let mut page = content.lines().map(str::to_string).collect::<Page>();

    if page.last().is_some_and(|line| line.trim() == END_OF_FILE) {
        page.pop();
    }

    debug!("{}: {} lines", path.display(), page.len());
    Ok(page)
}
