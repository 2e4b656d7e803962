use chrono::{DateTime, SecondsFormat, Utc};
use eve_esi::model::{alliance::Alliance, character::Character, corporation::Corporation};
use serde_json::{json, Value};

/// Create a mock character with the provided name.
///
/// Only `name` matters to killwatch, the remaining fields carry plausible values.
pub fn mock_character(name: &str) -> Character {
    Character {
        alliance_id: None,
        birthday: DateTime::parse_from_rfc3339("2018-12-20T16:11:54Z")
            .unwrap()
            .with_timezone(&Utc),
        bloodline_id: 7,
        corporation_id: 1000001,
        description: None,
        faction_id: None,
        gender: "male".to_string(),
        name: name.to_string(),
        race_id: 8,
        security_status: Some(-0.1),
        title: None,
    }
}

/// Create a mock corporation with the provided name.
pub fn mock_corporation(name: &str) -> Corporation {
    Corporation {
        alliance_id: None,
        ceo_id: 2114794365,
        creator_id: 2114794365,
        date_founded: None,
        description: None,
        home_station_id: None,
        member_count: 21,
        name: name.to_string(),
        shares: None,
        tax_rate: 0.0,
        ticker: "TICK".to_string(),
        url: None,
        war_eligible: None,
        faction_id: None,
    }
}

/// Create a mock alliance with the provided name.
pub fn mock_alliance(name: &str) -> Alliance {
    Alliance {
        creator_corporation_id: 98784257,
        creator_id: 2114794365,
        faction_id: None,
        date_founded: DateTime::parse_from_rfc3339("2024-09-25T06:25:58Z")
            .unwrap()
            .with_timezone(&Utc),
        executor_corporation_id: None,
        name: name.to_string(),
        ticker: "ALLY".to_string(),
    }
}

/// Create a killmail body as ESI and RedisQ deliver it.
///
/// The victim is character 1 in a Rifter (type 587) with no corporation, the only
/// attacker is corporation 2. Tests mutate the returned value when they need other
/// participants.
pub fn mock_killmail(killmail_id: i64, solar_system_id: i64, killmail_time: DateTime<Utc>) -> Value {
    json!({
        "killmail_id": killmail_id,
        "killmail_time": killmail_time.to_rfc3339_opts(SecondsFormat::Secs, true),
        "solar_system_id": solar_system_id,
        "victim": {
            "character_id": 1,
            "ship_type_id": 587,
            "damage_taken": 1200,
            "items": [],
            "position": { "x": 1.0, "y": 2.0, "z": 3.0 }
        },
        "attackers": [
            {
                "corporation_id": 2,
                "damage_done": 1200,
                "final_blow": true,
                "security_status": 0.5,
                "ship_type_id": 11198
            }
        ]
    })
}

/// Wrap a killmail in a RedisQ response body with a zKillboard hash.
pub fn redisq_package(killmail: Value) -> Value {
    let killmail_id = killmail["killmail_id"].clone();

    json!({
        "package": {
            "killID": killmail_id,
            "killmail": killmail,
            "zkb": {
                "locationID": 50000001,
                "hash": "5c8b6bba1c3b6c21e6d5b7e2b0e3e1c9a0d1f2e3",
                "totalValue": 10000000.0,
                "points": 1,
                "npc": false
            }
        }
    })
}

/// RedisQ response body when no killmail arrived during the poll window.
pub fn redisq_empty() -> Value {
    json!({ "package": null })
}
