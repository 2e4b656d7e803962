use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A killmail as published by RedisQ, with the ESI hash copied in as `hash`.
///
/// Fields the pipeline does not read are preserved in `extra` so re-serializing the
/// killmail reproduces the received payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Killmail {
    pub killmail_id: i64,
    pub killmail_time: DateTime<Utc>,
    pub solar_system_id: i64,
    pub victim: Victim,
    pub attackers: Vec<Attacker>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Victim {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corporation_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alliance_id: Option<i64>,
    pub ship_type_id: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Attacker {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corporation_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alliance_id: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Character, corporation and alliance references of a killmail participant.
///
/// An absent reference is reported as ID 0, which every name map resolves to an
/// empty string.
pub trait Participant {
    fn character_ref(&self) -> Option<i64>;
    fn corporation_ref(&self) -> Option<i64>;
    fn alliance_ref(&self) -> Option<i64>;

    fn character(&self) -> i64 {
        self.character_ref().unwrap_or(0)
    }

    fn corporation(&self) -> i64 {
        self.corporation_ref().unwrap_or(0)
    }

    fn alliance(&self) -> i64 {
        self.alliance_ref().unwrap_or(0)
    }
}

impl Participant for Victim {
    fn character_ref(&self) -> Option<i64> {
        self.character_id
    }

    fn corporation_ref(&self) -> Option<i64> {
        self.corporation_id
    }

    fn alliance_ref(&self) -> Option<i64> {
        self.alliance_id
    }
}

impl Participant for Attacker {
    fn character_ref(&self) -> Option<i64> {
        self.character_id
    }

    fn corporation_ref(&self) -> Option<i64> {
        self.corporation_id
    }

    fn alliance_ref(&self) -> Option<i64> {
        self.alliance_id
    }
}

/// Actor IDs referenced by a killmail, victim first, 0 for absent references.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NameIds {
    pub character_ids: Vec<i64>,
    pub corporation_ids: Vec<i64>,
    pub alliance_ids: Vec<i64>,
}

impl Killmail {
    /// Collect every actor ID that needs a name for this killmail
    pub fn name_ids(&self) -> NameIds {
        let participants = std::iter::once(&self.victim as &dyn Participant)
            .chain(self.attackers.iter().map(|a| a as &dyn Participant));

        let mut ids = NameIds::default();
        for participant in participants {
            ids.character_ids.push(participant.character());
            ids.corporation_ids.push(participant.corporation());
            ids.alliance_ids.push(participant.alliance());
        }

        ids
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sample() -> Value {
        json!({
            "killmail_id": 100,
            "killmail_time": "2025-11-01T12:30:00Z",
            "solar_system_id": 30002086,
            "hash": "5f4d8c",
            "victim": {
                "character_id": 1,
                "corporation_id": 2,
                "ship_type_id": 587,
                "damage_taken": 1200,
                "position": { "x": 1.0, "y": 2.0, "z": 3.0 }
            },
            "attackers": [
                { "corporation_id": 3, "final_blow": true, "damage_done": 1200 },
                { "character_id": 4, "corporation_id": 5, "alliance_id": 6 }
            ]
        })
    }

    #[test]
    fn parses_killmail_and_keeps_unread_fields() {
        let raw = sample();
        let killmail: Killmail = serde_json::from_value(raw.clone()).unwrap();

        assert_eq!(killmail.killmail_id, 100);
        assert_eq!(killmail.solar_system_id, 30002086);
        assert_eq!(killmail.victim.alliance_id, None);
        assert_eq!(killmail.attackers.len(), 2);
        assert_eq!(killmail.extra.get("hash"), Some(&json!("5f4d8c")));

        // Re-serializing must reproduce the payload for the cache and bus
        assert_eq!(serde_json::to_value(&killmail).unwrap(), raw);
    }

    #[test]
    fn missing_killmail_id_is_rejected() {
        let mut raw = sample();
        raw.as_object_mut().unwrap().remove("killmail_id");

        assert!(serde_json::from_value::<Killmail>(raw).is_err());
    }

    #[test]
    fn missing_attackers_is_rejected() {
        let mut raw = sample();
        raw.as_object_mut().unwrap().remove("attackers");

        assert!(serde_json::from_value::<Killmail>(raw).is_err());
    }

    #[test]
    fn name_ids_use_zero_for_absent_references() {
        let killmail: Killmail = serde_json::from_value(sample()).unwrap();

        let ids = killmail.name_ids();

        assert_eq!(ids.character_ids, vec![1, 0, 4]);
        assert_eq!(ids.corporation_ids, vec![2, 3, 5]);
        assert_eq!(ids.alliance_ids, vec![0, 0, 6]);
    }
}
