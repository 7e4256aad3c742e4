//! Best-effort schema upgrades for raw document trees.
//!
//! Migration runs on the freeform JSON value before typed deserialization,
//! so documents written by any historical release still load. Missing
//! sub-structures are skipped, never treated as errors.

use serde_json::{json, Value};

/// Schema version written by this release.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Numbered upgrade steps; each entry lifts documents below its version
/// up to it. Append new steps here and bump [`CURRENT_SCHEMA_VERSION`].
const STEPS: &[(u32, fn(&mut Value))] = &[(1, upgrade_v0_to_v1)];

/// Upgrade `raw` in place to the current schema version. Returns whether
/// anything changed, so callers can persist the upgraded document and run
/// migration at most once per document.
pub fn migrate(raw: &mut Value) -> bool {
    let mut changed = false;

    let stored = schema_version(raw);
    for (target, step) in STEPS {
        if stored < *target {
            step(raw);
            changed = true;
        }
    }

    if raw.get("version") != Some(&json!(CURRENT_SCHEMA_VERSION)) {
        if let Some(map) = raw.as_object_mut() {
            map.insert("version".to_string(), json!(CURRENT_SCHEMA_VERSION));
            changed = true;
        }
    }

    if raw.get("system").is_none() {
        if let Some(map) = raw.as_object_mut() {
            map.insert(
                "system".to_string(),
                json!({"hostname": "None", "port": "None"}),
            );
            changed = true;
        }
    }

    changed
}

/// Read the stored schema version. Missing or unparseable values mean 0;
/// legacy documents stored the version as a string.
fn schema_version(raw: &Value) -> u32 {
    match raw.get("version") {
        Some(Value::Number(n)) => u32::try_from(n.as_u64().unwrap_or(0)).unwrap_or(0),
        Some(Value::String(s)) => s.parse().unwrap_or(0),
        _ => 0,
    }
}

/// Version 0 documents called chains "tables" and filter-rule jump targets
/// "fw_table".
fn upgrade_v0_to_v1(raw: &mut Value) {
    for ip_version in ["ipv4", "ipv6"] {
        let Some(block) = raw.get_mut(ip_version).and_then(Value::as_object_mut) else {
            continue;
        };

        if let Some(tables) = block.remove("tables") {
            block.insert("chains".to_string(), tables);
        }

        let Some(filters) = block.get_mut("filters").and_then(Value::as_object_mut) else {
            continue;
        };
        for filter in filters.values_mut() {
            let Some(rules) = filter.get_mut("rules").and_then(Value::as_object_mut) else {
                continue;
            };
            for rule in rules.values_mut() {
                let Some(rule) = rule.as_object_mut() else {
                    continue;
                };
                if let Some(target) = rule.remove("fw_table") {
                    rule.insert("fw_chain".to_string(), target);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{migrate, CURRENT_SCHEMA_VERSION};

    #[test]
    fn renames_tables_to_chains_and_fw_table_to_fw_chain() {
        let mut raw = json!({
            "ipv4": {
                "tables": {"INPUT": {"rule-order": []}},
                "filters": {
                    "input": {
                        "rule-order": ["10"],
                        "rules": {"10": {"action": "jump", "fw_table": "INPUT"}}
                    }
                }
            }
        });

        assert!(migrate(&mut raw));

        assert!(raw["ipv4"].get("tables").is_none());
        assert!(raw["ipv4"]["chains"].get("INPUT").is_some());
        let rule = &raw["ipv4"]["filters"]["input"]["rules"]["10"];
        assert!(rule.get("fw_table").is_none());
        assert_eq!(rule["fw_chain"], json!("INPUT"));
        assert_eq!(raw["version"], json!(CURRENT_SCHEMA_VERSION));
    }

    #[test]
    fn migrating_twice_changes_nothing_further() {
        let mut raw = json!({"ipv4": {"tables": {}}});
        assert!(migrate(&mut raw));
        let settled = raw.clone();
        assert!(!migrate(&mut raw));
        assert_eq!(raw, settled);
    }

    #[test]
    fn legacy_string_version_is_normalized_to_an_integer() {
        let mut raw = json!({"version": "1", "system": {"hostname": "fw", "port": "22"}});
        assert!(migrate(&mut raw));
        assert_eq!(raw["version"], json!(1));
        assert!(!migrate(&mut raw));
    }

    #[test]
    fn synthesizes_a_system_block_when_absent() {
        let mut raw = json!({});
        assert!(migrate(&mut raw));
        assert_eq!(raw["system"]["hostname"], json!("None"));
        assert_eq!(raw["system"]["port"], json!("None"));
    }

    #[test]
    fn non_object_input_is_left_alone() {
        let mut raw = json!(["not", "a", "document"]);
        migrate(&mut raw);
        assert!(raw.is_array());
    }
}
