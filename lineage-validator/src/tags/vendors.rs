//! Built-in custom tag tables for common genealogy software.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tags::registry::TagDefinition;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vendor {
    Ancestry,
    FamilySearch,
    MyHeritage,
    RootsMagic,
    FamilyTreeMaker,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown vendor {0:?} (expected one of: ancestry, familysearch, myheritage, rootsmagic, familytreemaker)")]
pub struct UnknownVendor(pub String);

const RELATIONSHIP_TYPES: &str =
    "Natural|Birth|Adopted|Step|Foster|Guardian|Related|Sealing|Private|Unknown";

fn builtin(name: &str, description: &str, parents: &[&str], pattern: Option<&str>) -> TagDefinition {
    let definition = TagDefinition::new(name, description).with_parents(parents.iter().copied());
    let Some(pattern) = pattern else {
        return definition;
    };
    match definition.with_pattern(pattern) {
        Ok(definition) => definition,
        Err(err) => panic!("Invalid built-in tag pattern: {err}"),
    }
}

impl Vendor {
    pub const ALL: [Self; 5] = [
        Self::Ancestry,
        Self::FamilySearch,
        Self::MyHeritage,
        Self::RootsMagic,
        Self::FamilyTreeMaker,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Ancestry => "ancestry",
            Self::FamilySearch => "familysearch",
            Self::MyHeritage => "myheritage",
            Self::RootsMagic => "rootsmagic",
            Self::FamilyTreeMaker => "familytreemaker",
        }
    }

    /// Fresh definitions for this vendor's tags. Each call builds new values.
    #[must_use]
    pub fn definitions(self) -> Vec<TagDefinition> {
        match self {
            Self::Ancestry => vec![
                builtin(
                    "_APID",
                    "Ancestry database record pointer",
                    &["SOUR"],
                    Some(r"\d+,\d+::\d+"),
                ),
                builtin("_TREE", "Ancestry online tree name", &["HEAD"], None),
                builtin("_MILT", "Military service event", &["INDI"], None),
            ],
            Self::FamilySearch => vec![
                builtin(
                    "_FSFTID",
                    "FamilySearch Family Tree person id",
                    &["INDI"],
                    Some("[A-Z0-9]{4}-[A-Z0-9]{3,4}"),
                ),
                builtin("_FSID", "FamilySearch record id", &[], None),
            ],
            Self::MyHeritage => vec![
                builtin(
                    "_UID",
                    "MyHeritage unique record id",
                    &[],
                    Some("[0-9A-Fa-f]{8}-?[0-9A-Fa-f]{4}-?[0-9A-Fa-f]{4}-?[0-9A-Fa-f]{4}-?[0-9A-Fa-f]{12}"),
                ),
                builtin("_UPD", "Last update timestamp", &[], None),
                builtin("_RTLSAVE", "Right-to-left text flag", &["HEAD"], Some("RTL|LTR")),
            ],
            Self::RootsMagic => vec![
                builtin(
                    "_UID",
                    "RootsMagic unique record id",
                    &[],
                    Some("[0-9A-F]{32,36}"),
                ),
                builtin("_PRIM", "Primary media item", &["OBJE"], Some("Y|N")),
                builtin("_SDATE", "Sort date", &[], None),
            ],
            Self::FamilyTreeMaker => vec![
                builtin(
                    "_FREL",
                    "Relationship to father",
                    &["CHIL"],
                    Some(RELATIONSHIP_TYPES),
                ),
                builtin(
                    "_MREL",
                    "Relationship to mother",
                    &["CHIL"],
                    Some(RELATIONSHIP_TYPES),
                ),
                builtin("_PHOTO", "Preferred photo", &["INDI", "FAM"], None),
            ],
        }
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Vendor {
    type Err = UnknownVendor;

    /// Case-insensitive; spaces, dashes and underscores are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|v| v.name() == key)
            .ok_or_else(|| UnknownVendor(s.to_owned()))
    }
}
