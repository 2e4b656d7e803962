//! Alert text layout.
//!
//! ```text
//! 100 [2025-11-01 12:30 / Venal / Home / 3 jumps]   [Corp | Pilot - Rifter]  -  [Attackers: 1    Corporations: Gank Squad]
//! ```

use std::collections::BTreeSet;

use crate::model::{
    killmail::{Attacker, Killmail, Participant, Victim},
    names::{ActorKind, ActorNames},
};

const MAX_GROUP_NAME_CHARS: usize = 30;
const MAX_SHIP_NAME_CHARS: usize = 20;

const UNKNOWN_ALLIANCE: &str = "[unknown alliance]";
const UNKNOWN_CORPORATION: &str = "[unknown corporation]";

/// Static data resolved for one killmail, plus the jump count from home.
pub struct AlertContext<'a> {
    pub region_name: &'a str,
    pub system_name: &'a str,
    pub ship_name: &'a str,
    /// -1 when no route from home is known
    pub jumps: i64,
}

pub fn format_alert(killmail: &Killmail, names: &ActorNames, context: &AlertContext) -> String {
    format!(
        "{} [{} / {} / {} / {} jumps]   [{} - {:.ship$}]  -  [Attackers: {}    {}]",
        killmail.killmail_id,
        killmail.killmail_time.format("%Y-%m-%d %H:%M"),
        context.region_name,
        context.system_name,
        context.jumps,
        victim_summary(&killmail.victim, names),
        context.ship_name,
        killmail.attackers.len(),
        faction_summary(&killmail.attackers, names),
        ship = MAX_SHIP_NAME_CHARS,
    )
}

/// `alliance | corporation | pilot`, leaving out the groups the victim is not in
pub fn victim_summary(victim: &Victim, names: &ActorNames) -> String {
    let pilot = names.get_or_empty(ActorKind::Character, victim.character());
    let corporation = names.get_or_empty(ActorKind::Corporation, victim.corporation());
    let alliance = names.get_or_empty(ActorKind::Alliance, victim.alliance());

    if victim.alliance() != 0 {
        format!(
            "{:.max$} | {:.max$} | {}",
            alliance,
            corporation,
            pilot,
            max = MAX_GROUP_NAME_CHARS
        )
    } else if victim.corporation() != 0 {
        format!("{:.max$} | {}", corporation, pilot, max = MAX_GROUP_NAME_CHARS)
    } else {
        pilot.to_string()
    }
}

/// Unique attacker alliances and corporations.
///
/// Each attacker counts once: by alliance when in one, otherwise by
/// corporation. Names are listed in ID order.
pub fn faction_summary(attackers: &[Attacker], names: &ActorNames) -> String {
    let mut alliance_ids = BTreeSet::new();
    let mut corporation_ids = BTreeSet::new();

    for attacker in attackers {
        if attacker.alliance() != 0 {
            alliance_ids.insert(attacker.alliance());
        } else if attacker.corporation() != 0 {
            corporation_ids.insert(attacker.corporation());
        }
    }

    let mut groups = Vec::new();
    if !alliance_ids.is_empty() {
        groups.push(format!(
            "Alliances: {}",
            group_names(names, ActorKind::Alliance, &alliance_ids, UNKNOWN_ALLIANCE)
        ));
    }
    if !corporation_ids.is_empty() {
        groups.push(format!(
            "Corporations: {}",
            group_names(
                names,
                ActorKind::Corporation,
                &corporation_ids,
                UNKNOWN_CORPORATION
            )
        ));
    }

    groups.join(" | ")
}

fn group_names(names: &ActorNames, kind: ActorKind, ids: &BTreeSet<i64>, unknown: &str) -> String {
    ids.iter()
        .map(|&id| names.get(kind, id).unwrap_or(unknown))
        .collect::<Vec<_>>()
        .join(", ")
}
