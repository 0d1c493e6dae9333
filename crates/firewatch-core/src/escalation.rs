//! Escalation detection between consecutive zone snapshots.
//!
//! A zone escalates when its risk level in the newer snapshot is strictly
//! greater than in the older one. Zones are matched by id. Zones new in
//! `next` have no baseline and never escalate; zones dropped from `next`
//! are ignored. Events follow the iteration order of `next`.

use std::collections::BTreeMap;

use firewatch_types::{EscalationEvent, RiskLevel, ZoneId, ZoneSnapshot};

/// Report every zone whose risk level increased from `previous` to `next`.
pub fn detect_escalations(previous: &ZoneSnapshot, next: &ZoneSnapshot) -> Vec<EscalationEvent> {
    let baseline: BTreeMap<&ZoneId, RiskLevel> = previous
        .zones
        .iter()
        .map(|zone| (&zone.id, zone.risk_level))
        .collect();

    next.zones
        .iter()
        .filter_map(|zone| {
            let previous_level = *baseline.get(&zone.id)?;
            (zone.risk_level > previous_level).then(|| EscalationEvent {
                zone_id: zone.id.clone(),
                zone_name: zone.name.clone(),
                previous_level,
                new_level: zone.risk_level,
            })
        })
        .collect()
}
