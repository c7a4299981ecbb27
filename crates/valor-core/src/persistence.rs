//! Save/Load functionality for persisting the hall of fame
//!
//! Uses bincode for binary serialization. The file starts with a fixed
//! marker and a format version; both are checked before any entry data is
//! touched. Logbook entries travel in their single-line text form.

use std::collections::BTreeSet;
use std::io::{Read, Write};

use bincode::Options;
use serde::{Deserialize, Serialize};

use crate::ledger::{HallOfFame, HallOfFameEntry};
use crate::logbook::LogbookEntry;

/// Magic marker at the start of every save file
const SAVE_MARKER: &str = "VALORHOF";

/// Version number for save file format (increment when format changes)
const SAVE_VERSION: u32 = 1;

/// Upper bound on a decoded save, in bytes. Corrupt input claims absurd
/// collection lengths; the limit turns those into a decode error instead
/// of an allocation attempt.
const SAVE_SIZE_LIMIT: u64 = 64 * 1024 * 1024;

fn codec() -> impl Options {
    bincode::options()
        .with_fixint_encoding()
        .allow_trailing_bytes()
        .with_limit(SAVE_SIZE_LIMIT)
}

/// Serializable snapshot of the whole hall of fame
#[derive(Serialize, Deserialize)]
pub struct SaveData {
    /// File marker, always [`SAVE_MARKER`]
    pub marker: String,
    /// Save format version
    pub version: u32,
    /// All ledger entries
    pub entries: Vec<SavedEntry>,
}

/// Serializable form of one ledger entry
#[derive(Serialize, Deserialize)]
pub struct SavedEntry {
    pub name: String,
    pub ribbons: Vec<String>,
    pub stats: valor_logic::stats::CrewStats,
    pub visited: Vec<String>,
    pub grand_tour: bool,
    pub moons_tour: bool,
    /// Logbook entries in their `~`-delimited line form
    pub logbook: Vec<String>,
    pub prestige: i64,
}

impl From<&HallOfFameEntry> for SavedEntry {
    fn from(entry: &HallOfFameEntry) -> Self {
        Self {
            name: entry.name.clone(),
            ribbons: entry.ribbon_codes().map(str::to_string).collect(),
            stats: entry.stats.clone(),
            visited: entry.visited_bodies().map(str::to_string).collect(),
            grand_tour: entry.grand_tour(),
            moons_tour: entry.moons_tour(),
            logbook: entry.logbook().iter().map(LogbookEntry::as_line).collect(),
            prestige: entry.prestige(),
        }
    }
}

impl SavedEntry {
    fn into_entry(self) -> HallOfFameEntry {
        let logbook = self
            .logbook
            .iter()
            .filter_map(|line| {
                let parsed = LogbookEntry::parse_line(line);
                if parsed.is_none() {
                    log::warn!("skipping malformed logbook line: '{line}'");
                }
                parsed
            })
            .collect();
        HallOfFameEntry::restore(
            self.name,
            self.ribbons.into_iter().collect::<BTreeSet<_>>(),
            self.stats,
            self.visited.into_iter().collect::<BTreeSet<_>>(),
            self.grand_tour,
            self.moons_tour,
            logbook,
            self.prestige,
        )
    }
}

/// Save the hall of fame to a writer
pub fn save_hall_of_fame<W: Write>(writer: W, hall_of_fame: &HallOfFame) -> Result<(), SaveError> {
    let entries: Vec<SavedEntry> = hall_of_fame.snapshot().iter().map(SavedEntry::from).collect();

    let save_data = SaveData {
        marker: SAVE_MARKER.to_string(),
        version: SAVE_VERSION,
        entries,
    };

    codec().serialize_into(writer, &save_data)?;
    Ok(())
}

/// Load a hall of fame from a reader
pub fn load_hall_of_fame<R: Read>(reader: R) -> Result<Vec<HallOfFameEntry>, SaveError> {
    let save_data: SaveData = codec().deserialize_from(reader)?;

    if save_data.marker != SAVE_MARKER {
        return Err(SaveError::MarkerMismatch {
            found: save_data.marker,
        });
    }
    if save_data.version != SAVE_VERSION {
        return Err(SaveError::VersionMismatch {
            expected: SAVE_VERSION,
            found: save_data.version,
        });
    }

    Ok(save_data
        .entries
        .into_iter()
        .map(SavedEntry::into_entry)
        .collect())
}

/// Errors that can occur during save/load
#[derive(Debug)]
pub enum SaveError {
    Io(std::io::Error),
    Bincode(Box<bincode::ErrorKind>),
    MarkerMismatch { found: String },
    VersionMismatch { expected: u32, found: u32 },
}

impl From<std::io::Error> for SaveError {
    fn from(e: std::io::Error) -> Self {
        SaveError::Io(e)
    }
}

impl From<Box<bincode::ErrorKind>> for SaveError {
    fn from(e: Box<bincode::ErrorKind>) -> Self {
        SaveError::Bincode(e)
    }
}

impl std::fmt::Display for SaveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaveError::Io(e) => write!(f, "IO error: {}", e),
            SaveError::Bincode(e) => write!(f, "Serialization error: {}", e),
            SaveError::MarkerMismatch { found } => {
                write!(f, "Not a hall of fame file: marker '{}'", found)
            }
            SaveError::VersionMismatch { expected, found } => {
                write!(
                    f,
                    "Save version mismatch: expected {}, found {}",
                    expected, found
                )
            }
        }
    }
}

impl std::error::Error for SaveError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::ActivityRegistry;
    use crate::pool::RibbonPool;
    use valor_logic::body::BodyCatalog;
    use valor_logic::stats::StatUpdate;

    fn populated_hall() -> (HallOfFame, RibbonPool, BodyCatalog) {
        let hof = HallOfFame::new();
        let mut pool = RibbonPool::new();
        let mut registry = ActivityRegistry::new();
        let catalog = BodyCatalog::default_system();
        pool.create_builtins(&mut registry, &catalog);
        let luna = pool.get("O:Luna").cloned().unwrap();
        hof.award_ribbon("Sam Carter", &luna, 5_000.0, &pool, &catalog);
        hof.record_stat_update(
            "Sam Carter",
            &StatUpdate::MissionCompleted { duration: 86_400.0 },
        );
        (hof, pool, catalog)
    }

    #[test]
    fn test_save_load_roundtrip() {
        let (hof, _, _) = populated_hall();

        let mut buffer = Vec::new();
        save_hall_of_fame(&mut buffer, &hof).expect("save failed");

        let loaded = HallOfFame::new();
        loaded.replace(load_hall_of_fame(&buffer[..]).expect("load failed"));

        assert_eq!(loaded.entry_count(), 1);
        assert!(loaded.has_ribbon("Sam Carter", "O:Luna"));
        loaded
            .with_entry("Sam Carter", |entry| {
                assert_eq!(entry.stats.missions_flown, 1);
                assert!(entry.visited_bodies().any(|b| b == "Luna"));
                assert_eq!(entry.logbook().len(), 1);
                assert_eq!(entry.logbook()[0].code, "O:Luna");
            })
            .unwrap();
    }

    #[test]
    fn test_garbage_input_is_a_decode_error() {
        // the leading bytes decode as an enormous string length; the size
        // limit has to catch that before any allocation happens
        let garbage = b"definitely not a save file";
        assert!(matches!(
            load_hall_of_fame(&garbage[..]),
            Err(SaveError::Bincode(_))
        ));
    }

    #[test]
    fn test_truncated_save_is_a_decode_error() {
        let (hof, _, _) = populated_hall();
        let mut buffer = Vec::new();
        save_hall_of_fame(&mut buffer, &hof).expect("save failed");

        buffer.truncate(buffer.len() / 2);
        assert!(matches!(
            load_hall_of_fame(&buffer[..]),
            Err(SaveError::Bincode(_))
        ));
    }

    #[test]
    fn test_wrong_marker_is_rejected() {
        let data = SaveData {
            marker: "NOTVALOR".to_string(),
            version: SAVE_VERSION,
            entries: Vec::new(),
        };
        let mut buffer = Vec::new();
        bincode::serialize_into(&mut buffer, &data).unwrap();
        assert!(matches!(
            load_hall_of_fame(&buffer[..]),
            Err(SaveError::MarkerMismatch { .. })
        ));
    }

    #[test]
    fn test_wrong_version_is_rejected() {
        let data = SaveData {
            marker: SAVE_MARKER.to_string(),
            version: SAVE_VERSION + 1,
            entries: Vec::new(),
        };
        let mut buffer = Vec::new();
        bincode::serialize_into(&mut buffer, &data).unwrap();
        assert!(matches!(
            load_hall_of_fame(&buffer[..]),
            Err(SaveError::VersionMismatch { expected: SAVE_VERSION, .. })
        ));
    }

    #[test]
    fn test_malformed_logbook_lines_are_skipped() {
        let entry = SavedEntry {
            name: "Sam".to_string(),
            ribbons: vec!["DE".to_string()],
            stats: Default::default(),
            visited: Vec::new(),
            grand_tour: false,
            moons_tour: false,
            logbook: vec!["garbage".to_string(), "1.0~DE~Sam~Dangerous EVA".to_string()],
            prestige: 100,
        };
        let restored = entry.into_entry();
        assert_eq!(restored.logbook().len(), 1);
        assert!(restored.has_ribbon("DE"));
    }
}
