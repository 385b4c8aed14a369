//! Synthetic product files
mod clock;
mod sp3;

pub use clock::ClockBuilder;
pub use sp3::Sp3Builder;

use crate::ingestion::Page;

/// Arbitrary reference instant (unix seconds) of the synthetic products
pub const REFERENCE_UNIX_S: f64 = 1_692_000_000.0;

/// Deterministic phase (rad) attributed to each satellite identifier
pub fn phase_rad(id: &str) -> f64 {
    id.bytes()
        .enumerate()
        .map(|(i, b)| (i as f64 + 1.0) * b as f64)
        .sum::<f64>()
        * 0.37
}

/// Writes this [Page] in a new file, within given directory.
pub fn write_page(directory: &std::path::Path, name: &str, page: &Page) -> std::path::PathBuf {
    std::fs::create_dir_all(directory)
        .unwrap_or_else(|e| panic!("failed to create {}: {}", directory.display(), e));
    let path = directory.join(name);
    let mut content = page.join("\n");
    content.push('\n');
    std::fs::write(&path, content)
        .unwrap_or_else(|e| panic!("failed to write {}: {}", path.display(), e));
    path
}

/// Satellites of the synthetic products tree
pub const TREE_SATELLITES: [&str; 6] = ["G01", "G05", "R03", "E11", "C07", "J02"];

/// Writes two consecutive days of IGS products (2023-08-27 and 2023-08-28)
/// under `root`: orbits in `IGS/igs` and 30 s clocks in `IGS/igs/clk_30s`.
pub fn write_igs_tree(root: &std::path::Path) {
    for (day, name) in [(27, "igs22770"), (28, "igs22771")] {
        let sp3 = Sp3Builder::new(2023, 8, day)
            .satellites(&TREE_SATELLITES)
            .build();
        write_page(&root.join("IGS/igs"), &format!("{}.sp3", name), &sp3);

        let clk = ClockBuilder::new(2023, 8, day)
            .satellites(&TREE_SATELLITES)
            .build();
        write_page(
            &root.join("IGS/igs/clk_30s"),
            &format!("{}.clk_30s", name),
            &clk,
        );
    }
}
