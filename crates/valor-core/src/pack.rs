//! Ribbon packs: user-authored custom ribbon sets loaded from disk.
//!
//! A pack is a plain text file, one statement per line:
//!
//! ```text
//! # comment
//! NAME:Expedition Ribbons
//! FOLDER:packs/expedition
//! BASE:200
//! 0:expedition1:Expedition I:Awarded for the first expedition
//! 1:expedition2:Expedition II:Awarded for the second expedition:150
//! ```
//!
//! Ribbon lines are `relativeId:assetFile:name:description[:prestige]`; the
//! ribbon's pool index is `BASE + relativeId`. Malformed ribbon lines are
//! logged and skipped so one typo does not take the whole pack down, but a
//! pack without a `BASE` before its first ribbon line is rejected.

use std::fs;
use std::path::{Path, PathBuf};

use crate::activity::ActivityRegistry;
use crate::pool::RibbonPool;

/// File name a pack scan looks for.
pub const PACK_FILE_NAME: &str = "ribbonpack.cfg";

#[derive(Debug, Clone, PartialEq)]
pub struct PackRibbon {
    /// Absolute custom ribbon index (base + relative id).
    pub index: u32,
    pub texture: String,
    pub name: String,
    pub description: String,
    pub prestige: i32,
}

#[derive(Debug, Clone, Default)]
pub struct RibbonPack {
    pub name: String,
    pub folder: String,
    pub base: Option<u32>,
    pub ribbons: Vec<PackRibbon>,
}

impl RibbonPack {
    /// Parse a pack from its text form.
    pub fn parse(text: &str) -> Result<Self, PackError> {
        let mut pack = RibbonPack::default();
        for (number, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some(name) = line.strip_prefix("NAME:") {
                pack.name = name.trim().to_string();
            } else if let Some(folder) = line.strip_prefix("FOLDER:") {
                pack.folder = folder.trim().to_string();
            } else if let Some(base) = line.strip_prefix("BASE:") {
                let base: u32 = base
                    .trim()
                    .parse()
                    .map_err(|_| PackError::InvalidBase(base.trim().to_string()))?;
                pack.base = Some(base);
            } else {
                let Some(base) = pack.base else {
                    return Err(PackError::BaseMissing);
                };
                match Self::parse_ribbon_line(line, base, &pack.folder) {
                    Some(ribbon) => pack.ribbons.push(ribbon),
                    None => {
                        log::warn!("skipping malformed ribbon line {}: '{line}'", number + 1);
                    }
                }
            }
        }
        Ok(pack)
    }

    fn parse_ribbon_line(line: &str, base: u32, folder: &str) -> Option<PackRibbon> {
        let fields: Vec<&str> = line.split(':').collect();
        if fields.len() != 4 && fields.len() != 5 {
            return None;
        }
        let relative: u32 = fields[0].trim().parse().ok()?;
        let prestige = match fields.get(4) {
            Some(raw) => raw.trim().parse().ok()?,
            None => 0,
        };
        Some(PackRibbon {
            index: base + relative,
            texture: if folder.is_empty() {
                fields[1].trim().to_string()
            } else {
                format!("{folder}/{}", fields[1].trim())
            },
            name: fields[2].trim().to_string(),
            description: fields[3].trim().to_string(),
            prestige,
        })
    }

    /// Read and parse a pack file.
    pub fn load(path: &Path) -> Result<Self, PackError> {
        let text = fs::read_to_string(path)?;
        let mut pack = Self::parse(&text)?;
        if pack.name.is_empty() {
            pack.name = path.display().to_string();
        }
        Ok(pack)
    }

    /// Register every ribbon of this pack into the pool. Returns how many
    /// made it in; collisions are refused by the pool and logged there.
    pub fn install(&self, pool: &mut RibbonPool, registry: &mut ActivityRegistry) -> usize {
        let mut installed = 0;
        for ribbon in &self.ribbons {
            if pool.register_custom(
                ribbon.index,
                &ribbon.name,
                &ribbon.description,
                &ribbon.texture,
                ribbon.prestige,
                registry,
            ) {
                installed += 1;
            }
        }
        log::info!(
            "installed {installed} of {} ribbons from pack '{}'",
            self.ribbons.len(),
            self.name
        );
        installed
    }
}

/// Recursively find every pack file under a directory.
pub fn find_packs(root: &Path) -> Vec<PathBuf> {
    let mut found = Vec::new();
    walk(root, &mut found);
    found.sort();
    found
}

fn walk(dir: &Path, found: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            walk(&path, found);
        } else if path.file_name().is_some_and(|name| name == PACK_FILE_NAME) {
            found.push(path);
        }
    }
}

/// Errors a pack file can produce. Individual ribbon lines never error,
/// they are skipped; these cover the file as a whole.
#[derive(Debug)]
pub enum PackError {
    Io(std::io::Error),
    /// A ribbon line appeared before any `BASE:` statement.
    BaseMissing,
    InvalidBase(String),
}

impl From<std::io::Error> for PackError {
    fn from(e: std::io::Error) -> Self {
        PackError::Io(e)
    }
}

impl std::fmt::Display for PackError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PackError::Io(e) => write!(f, "IO error: {}", e),
            PackError::BaseMissing => write!(f, "ribbon line before BASE statement"),
            PackError::InvalidBase(raw) => write!(f, "invalid BASE value '{}'", raw),
        }
    }
}

impl std::error::Error for PackError {}

#[cfg(test)]
mod tests {
    use super::*;

    const PACK: &str = "\
# Expedition ribbons
NAME:Expedition Ribbons
FOLDER:packs/expedition
BASE:200

0:expedition1:Expedition I:Awarded for the first expedition
1:expedition2:Expedition II:Awarded for the second expedition:150
not a ribbon line at all
";

    #[test]
    fn test_parse_pack() {
        let pack = RibbonPack::parse(PACK).unwrap();
        assert_eq!(pack.name, "Expedition Ribbons");
        assert_eq!(pack.base, Some(200));
        assert_eq!(pack.ribbons.len(), 2);
        assert_eq!(pack.ribbons[0].index, 200);
        assert_eq!(pack.ribbons[0].texture, "packs/expedition/expedition1");
        assert_eq!(pack.ribbons[0].prestige, 0);
        assert_eq!(pack.ribbons[1].index, 201);
        assert_eq!(pack.ribbons[1].prestige, 150);
    }

    #[test]
    fn test_ribbon_line_before_base_is_rejected() {
        let result = RibbonPack::parse("0:tex:Name:Description\nBASE:100\n");
        assert!(matches!(result, Err(PackError::BaseMissing)));
    }

    #[test]
    fn test_invalid_base_is_rejected() {
        assert!(matches!(
            RibbonPack::parse("BASE:many\n"),
            Err(PackError::InvalidBase(_))
        ));
    }

    #[test]
    fn test_install_registers_customs() {
        let pack = RibbonPack::parse(PACK).unwrap();
        let mut pool = RibbonPool::new();
        let mut registry = ActivityRegistry::new();
        assert_eq!(pack.install(&mut pool, &mut registry), 2);
        assert_eq!(
            pool.get_custom(200).map(|r| r.name()),
            Some("Expedition I".to_string())
        );
        // a second install collides on every code
        assert_eq!(pack.install(&mut pool, &mut registry), 0);
    }

    #[test]
    fn test_find_packs_walks_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("mods/expedition");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join(PACK_FILE_NAME), PACK).unwrap();
        fs::write(dir.path().join("unrelated.txt"), "nope").unwrap();

        let packs = find_packs(dir.path());
        assert_eq!(packs.len(), 1);
        let pack = RibbonPack::load(&packs[0]).unwrap();
        assert_eq!(pack.ribbons.len(), 2);
    }
}
