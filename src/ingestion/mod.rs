//! Product files loading
use std::path::{Path, PathBuf};

use log::debug;

use crate::{
    cfg::{ClockProduct, PositionProduct},
    error::Error,
};

mod naming;
mod reader;

pub use naming::{is_ultra_rapid, product_directory, NamingScheme, MAX_SEQUENCE_FILES};
pub use reader::read_page;

/// Content of one product file, one entry per line
pub type Page = Vec<String>;

/// Any product provider should implement [ProductSource].
/// Products are entirely loaded when the engine is built:
/// there is no I/O once the simulation has started.
pub trait ProductSource {
    /// Provide the orbit product (SP3) pages of this [PositionProduct],
    /// in chronological order.
    fn orbit_pages(&self, product: &PositionProduct) -> Result<Vec<Page>, Error>;

    /// Provide the pages of this [ClockProduct], in chronological order.
    /// SP3 clock products (`.sp3` extension) follow the orbit conventions.
    fn clock_pages(&self, product: &ClockProduct) -> Result<Vec<Page>, Error>;
}

/// [ProductSource] reading from a local products tree, such as
/// `<root>/IGS/igs/igs22775.sp3` or `<root>/COD/final/clk/cod22775.clk`.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn read_all(directory: &Path, names: Vec<String>) -> Result<Vec<Page>, Error> {
        debug!("{}: loading {} file(s)", directory.display(), names.len());
        names
            .iter()
            .map(|name| read_page(&directory.join(name)))
            .collect()
    }
}

impl ProductSource for DirectorySource {
    fn orbit_pages(&self, product: &PositionProduct) -> Result<Vec<Page>, Error> {
        let directory = self.root.join(product_directory(&product.file_sort)?);
        let names = NamingScheme::orbit(&product.file_sort, &product.first)?.sequence(&product.last)?;
        Self::read_all(&directory, names)
    }

    fn clock_pages(&self, product: &ClockProduct) -> Result<Vec<Page>, Error> {
        let directory = self.root.join(product_directory(&product.file_sort)?);
        if product.is_sp3() {
            let names =
                NamingScheme::orbit(&product.file_sort, &product.first)?.sequence(&product.last)?;
            Self::read_all(&directory, names)
        } else {
            let directory = directory.join(product.file_extension.trim_start_matches('.'));
            let names =
                NamingScheme::clock(&product.file_sort, &product.first)?.sequence(&product.last)?;
            Self::read_all(&directory, names)
        }
    }
}
