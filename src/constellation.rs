//! Flat satellite indexing across constellations
use std::str::FromStr;

use log::warn;

use crate::prelude::{Constellation, SV};

#[cfg(feature = "serde")]
use serde::Deserialize;

/// Constellations tracked by the engine, in flat index order.
pub const TRACKED_CONSTELLATIONS: [Constellation; 5] = [
    Constellation::GPS,
    Constellation::Glonass,
    Constellation::Galileo,
    Constellation::BeiDou,
    Constellation::QZSS,
];

/// Largest number of satellites per constellation
pub const MAX_PRN: usize = u8::MAX as usize;

/// One letter tag used in product files
fn tag(constellation: Constellation) -> Option<char> {
    match constellation {
        Constellation::GPS => Some('G'),
        Constellation::Glonass => Some('R'),
        Constellation::Galileo => Some('E'),
        Constellation::BeiDou => Some('C'),
        Constellation::QZSS => Some('J'),
        _ => None,
    }
}

fn from_tag(c: char) -> Option<Constellation> {
    match c {
        'G' => Some(Constellation::GPS),
        'R' => Some(Constellation::Glonass),
        'E' => Some(Constellation::Galileo),
        'C' => Some(Constellation::BeiDou),
        'J' => Some(Constellation::QZSS),
        _ => None,
    }
}

/// Number of satellites tracked per constellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ConstellationSizes {
    pub gps: usize,
    pub glonass: usize,
    pub galileo: usize,
    pub beidou: usize,
    pub qzss: usize,
}

impl Default for ConstellationSizes {
    fn default() -> Self {
        Self {
            gps: 32,
            glonass: 26,
            galileo: 36,
            beidou: 16,
            qzss: 7,
        }
    }
}

/// [ConstellationTable] maps each tracked [SV] to a flat index
/// spanning all constellations, and back. It is built once
/// and never changes afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstellationTable {
    sizes: [usize; 5],
    offsets: [usize; 5],
    total: usize,
}

impl Default for ConstellationTable {
    fn default() -> Self {
        Self::new(ConstellationSizes::default())
    }
}

impl ConstellationTable {
    pub fn new(sizes: ConstellationSizes) -> Self {
        let mut sizes = [
            sizes.gps,
            sizes.glonass,
            sizes.galileo,
            sizes.beidou,
            sizes.qzss,
        ];
        // PRN are 8 bit numbers
        for (size, constellation) in sizes.iter_mut().zip(TRACKED_CONSTELLATIONS.iter()) {
            if *size > MAX_PRN {
                warn!("{:?}: {} satellites, limited to {}", constellation, size, MAX_PRN);
                *size = MAX_PRN;
            }
        }
        let mut offsets = [0; 5];
        let mut total = 0;
        for (offset, size) in offsets.iter_mut().zip(sizes.iter()) {
            *offset = total;
            total += size;
        }
        Self {
            sizes,
            offsets,
            total,
        }
    }

    /// Total number of satellites
    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of tracked satellites for this [Constellation]
    pub fn size(&self, constellation: Constellation) -> usize {
        TRACKED_CONSTELLATIONS
            .iter()
            .position(|c| *c == constellation)
            .map(|pos| self.sizes[pos])
            .unwrap_or(0)
    }

    /// Flat index of this [SV], None if this vehicle is not tracked.
    pub fn index_of(&self, sv: SV) -> Option<usize> {
        let pos = TRACKED_CONSTELLATIONS
            .iter()
            .position(|c| *c == sv.constellation)?;
        let prn = sv.prn as usize;
        if prn == 0 || prn > self.sizes[pos] {
            return None;
        }
        Some(self.offsets[pos] + prn - 1)
    }

    /// [SV] described by this flat index, None beyond [Self::total].
    pub fn sv_from_index(&self, index: usize) -> Option<SV> {
        if index >= self.total {
            return None;
        }
        let pos = (0..TRACKED_CONSTELLATIONS.len())
            .find(|p| self.offsets[*p] <= index && index < self.offsets[*p] + self.sizes[*p])?;
        let prn = index - self.offsets[pos] + 1;
        Some(SV::new(TRACKED_CONSTELLATIONS[pos], prn as u8))
    }

    /// Flat index from satellite identifier such as "G12",
    /// "PG12" (orbit record) or "G 1". None is the invalid sentinel.
    pub fn index_from_id(&self, id: &str) -> Option<usize> {
        let id = id.trim();
        let id = match id.strip_prefix('P') {
            Some(stripped) if stripped.len() > 1 => stripped,
            _ => id,
        };
        let mut chars = id.chars();
        let constellation = from_tag(chars.next()?)?;
        let prn = u8::from_str(chars.as_str().trim()).ok()?;
        self.index_of(SV::new(constellation, prn))
    }

    /// Identifier ("G01", "R24"..) from flat index, None beyond [Self::total].
    pub fn id_from_index(&self, index: usize) -> Option<String> {
        let sv = self.sv_from_index(index)?;
        let tag = tag(sv.constellation)?;
        Some(format!("{}{:02}", tag, sv.prn))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::*;

    #[fixture]
    fn table() -> ConstellationTable {
        ConstellationTable::default()
    }

    #[rstest]
    #[case("G01", Some(0))]
    #[case("G32", Some(31))]
    #[case("PG12", Some(11))]
    #[case("G 1", Some(0))]
    #[case("R01", Some(32))]
    #[case("E01", Some(58))]
    #[case("C01", Some(94))]
    #[case("J01", Some(110))]
    #[case("J07", Some(116))]
    #[case("J08", None)]
    #[case("G33", None)]
    #[case("G00", None)]
    #[case("S20", None)]
    #[case("I05", None)]
    #[case("", None)]
    #[case("Gxx", None)]
    fn index_from_id(table: ConstellationTable, #[case] id: &str, #[case] expected: Option<usize>) {
        assert_eq!(table.index_from_id(id), expected, "failed for \"{}\"", id);
    }

    #[rstest]
    fn round_trip(table: ConstellationTable) {
        assert_eq!(table.total(), 117);
        for index in 0..table.total() {
            let id = table
                .id_from_index(index)
                .unwrap_or_else(|| panic!("no identifier for #{}", index));
            assert_eq!(table.index_from_id(&id), Some(index), "round trip failed for {}", id);
        }
        assert!(table.id_from_index(table.total()).is_none());
        assert!(table.sv_from_index(usize::MAX).is_none());
    }

    #[test]
    fn custom_sizes() {
        let table = ConstellationTable::new(ConstellationSizes {
            gps: 2,
            glonass: 0,
            galileo: 3,
            beidou: 0,
            qzss: 1,
        });
        assert_eq!(table.total(), 6);
        assert_eq!(table.id_from_index(1).as_deref(), Some("G02"));
        assert_eq!(table.id_from_index(2).as_deref(), Some("E01"));
        assert_eq!(table.id_from_index(5).as_deref(), Some("J01"));
        assert_eq!(table.index_from_id("R01"), None);
        assert_eq!(table.size(Constellation::Galileo), 3);
        assert_eq!(table.size(Constellation::SBAS), 0);
    }

    #[test]
    fn oversized_constellations() {
        let table = ConstellationTable::new(ConstellationSizes {
            gps: 300,
            glonass: 1,
            galileo: usize::MAX,
            beidou: 0,
            qzss: 0,
        });
        assert_eq!(table.size(Constellation::GPS), 255);
        assert_eq!(table.size(Constellation::Galileo), 255);
        assert_eq!(table.total(), 255 + 1 + 255);

        assert_eq!(table.id_from_index(254).as_deref(), Some("G255"));
        assert_eq!(table.id_from_index(255).as_deref(), Some("R01"));
        for index in 0..table.total() {
            let id = table
                .id_from_index(index)
                .unwrap_or_else(|| panic!("no identifier for #{}", index));
            assert_eq!(table.index_from_id(&id), Some(index), "round trip failed for {}", id);
        }
    }
}
