use std::collections::BTreeMap;
use std::fmt;

use serde::{de::Error as _, Deserialize, Deserializer, Serialize};

/// Kind of named actor referenced by a killmail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActorKind {
    Character,
    Corporation,
    Alliance,
}

impl ActorKind {
    pub const ALL: [ActorKind; 3] = [
        ActorKind::Character,
        ActorKind::Corporation,
        ActorKind::Alliance,
    ];

    /// Value stored in the `actor_name.kind` column
    pub fn as_str(&self) -> &'static str {
        match self {
            ActorKind::Character => "character",
            ActorKind::Corporation => "corporation",
            ActorKind::Alliance => "alliance",
        }
    }
}

impl fmt::Display for ActorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Actor ID to name mappings broadcast alongside each killmail.
///
/// ID 0 is the absent sentinel and maps to an empty string in every mapping. Any
/// other ID may be missing when ESI could not resolve it, callers must treat a
/// missing ID as unknown.
///
/// JSON objects only have string keys, so the IDs travel as strings and are
/// converted back to integers by [`string_keys_to_ids`] on deserialization.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorNames {
    #[serde(deserialize_with = "deserialize_id_map")]
    pub character_ids: BTreeMap<i64, String>,
    #[serde(deserialize_with = "deserialize_id_map")]
    pub corporation_ids: BTreeMap<i64, String>,
    #[serde(deserialize_with = "deserialize_id_map")]
    pub alliance_ids: BTreeMap<i64, String>,
}

impl ActorNames {
    /// Empty mappings containing only the 0 -> "" sentinel
    pub fn new() -> Self {
        let mut names = Self::default();
        for kind in ActorKind::ALL {
            names.map_mut(kind).insert(0, String::new());
        }
        names
    }

    pub fn map(&self, kind: ActorKind) -> &BTreeMap<i64, String> {
        match kind {
            ActorKind::Character => &self.character_ids,
            ActorKind::Corporation => &self.corporation_ids,
            ActorKind::Alliance => &self.alliance_ids,
        }
    }

    pub fn map_mut(&mut self, kind: ActorKind) -> &mut BTreeMap<i64, String> {
        match kind {
            ActorKind::Character => &mut self.character_ids,
            ActorKind::Corporation => &mut self.corporation_ids,
            ActorKind::Alliance => &mut self.alliance_ids,
        }
    }

    /// Name for an actor, `None` when it could not be resolved
    pub fn get(&self, kind: ActorKind, id: i64) -> Option<&str> {
        self.map(kind).get(&id).map(String::as_str)
    }

    /// Name for an actor, empty when unknown
    pub fn get_or_empty(&self, kind: ActorKind, id: i64) -> &str {
        self.get(kind, id).unwrap_or("")
    }
}

/// Convert a string-keyed JSON map back into an ID-keyed map.
///
/// Fails on the first key that is not an integer.
pub fn string_keys_to_ids(
    raw: BTreeMap<String, String>,
) -> Result<BTreeMap<i64, String>, String> {
    raw.into_iter()
        .map(|(key, name)| {
            key.parse::<i64>()
                .map(|id| (id, name))
                .map_err(|e| format!("name map key {:?} is not an ID: {}", key, e))
        })
        .collect()
}

fn deserialize_id_map<'de, D>(deserializer: D) -> Result<BTreeMap<i64, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, String>::deserialize(deserializer)?;
    string_keys_to_ids(raw).map_err(D::Error::custom)
}
