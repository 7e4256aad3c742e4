//! Pure document-to-directive compiler.
//!
//! `compile` has no side effects and is deterministic: the same document
//! always yields byte-identical output. Section banners keep their
//! embedded newlines; consumers split or join as their medium requires.

use std::collections::BTreeMap;

use crate::model::{
    AddressKind, Chain, ConfigDocument, Filter, FilterAction, FilterKind, Group, IpVersion,
    PortKind,
};

/// Placeholder emitted when the document has no IP version blocks and no
/// extra items.
pub const EMPTY_RULESET: &str = "Empty rule set.";

/// Compile a configuration document into ordered CLI directive lines.
pub fn compile(doc: &ConfigDocument) -> Vec<String> {
    let mut out = Vec::new();

    if doc.is_empty_ruleset() {
        out.push(EMPTY_RULESET.to_string());
    }

    if !doc.extra_items.is_empty() {
        out.push("#\n#\n# Extra Configuration Items\n#\n#".to_string());
        for item in &doc.extra_items {
            out.push(item.clone());
        }
        out.push(String::new());
    }

    if !doc.flowtables.is_empty() {
        out.push("#\n#\n# FLOW TABLES\n#\n#\n".to_string());
        for flowtable in &doc.flowtables {
            out.push(format!("# Flowtable: {}", flowtable.name));
            for interface in &flowtable.interfaces {
                out.push(format!(
                    "set firewall flowtable {} interface '{}'",
                    flowtable.name, interface
                ));
            }
            out.push(format!(
                "set firewall flowtable {} description '{}'",
                flowtable.name, flowtable.description
            ));
            out.push(format!(
                "set firewall flowtable {} offload software",
                flowtable.name
            ));
            out.push(String::new());
        }
    }

    for version in [IpVersion::V4, IpVersion::V6] {
        let Some(block) = doc.block(version) else {
            continue;
        };
        out.push(match version {
            IpVersion::V4 => "#\n#\n# IPv4\n#\n#\n".to_string(),
            IpVersion::V6 => "#\n#\n# IPv6\n#\n#\n".to_string(),
        });
        emit_groups(&mut out, version, &block.groups);
        emit_filters(&mut out, version, &block.filters);
        emit_chains(&mut out, version, &block.chains);
    }

    out
}

fn emit_groups(out: &mut Vec<String>, version: IpVersion, groups: &BTreeMap<String, Group>) {
    if groups.is_empty() {
        return;
    }
    out.push("#\n# Groups\n#".to_string());
    for (name, group) in groups {
        out.push(format!("\n# Group: {name}"));
        // The v6 dialect wedges an ip-version marker ahead of the kind.
        let prefix = match version {
            IpVersion::V4 => format!("set firewall group {} {name}", group.kind.token()),
            IpVersion::V6 => format!("set firewall group ipv6-{} {name}", group.kind.token()),
        };
        if !group.description.is_empty() {
            out.push(format!("{prefix} description '{}'", group.description));
        }
        for value in &group.values {
            if !value.is_empty() {
                out.push(format!("{prefix} {} '{value}'", group.kind.value_token()));
            }
        }
    }
    out.push(String::new());
}

fn emit_filters(out: &mut Vec<String>, version: IpVersion, filters: &BTreeMap<FilterKind, Filter>) {
    for (kind, filter) in filters {
        out.push(format!("#\n# Filter: {kind}\n#"));
        out.push(format!(
            "set firewall {version} {kind} filter description '{}'",
            filter.description
        ));
        out.push(format!(
            "set firewall {version} {kind} filter default-action {}",
            filter.default_action.as_str()
        ));
        if filter.log {
            out.push(format!(
                "set firewall {version} {kind} filter enable-default-log"
            ));
        }
        out.push("\n".to_string());

        for number in &filter.rule_order {
            let Some(rule) = filter.rules.get(number) else {
                continue;
            };
            let base = format!("set firewall {version} {kind} filter rule {number}");
            out.push(format!("# Rule {number}"));
            if !rule.description.is_empty() {
                out.push(format!("{base} description '{}'", rule.description));
            }
            out.push(format!("{base} action '{}'", rule.action.as_str()));
            if rule.action == FilterAction::Offload {
                if let Some(target) = &rule.target {
                    out.push(format!("{base} offload-target '{target}'"));
                }
            }
            if rule.action == FilterAction::Jump {
                if let (Some(direction), Some(interface)) = (rule.direction, &rule.interface) {
                    let side = match direction {
                        crate::model::Direction::Inbound => "inbound-interface",
                        crate::model::Direction::Outbound => "outbound-interface",
                    };
                    out.push(format!("{base} {side} name '{interface}'"));
                }
                if let Some(target) = &rule.target {
                    out.push(format!("{base} jump-target '{target}'"));
                }
            }
            if rule.disabled {
                out.push(format!("{base} disable"));
            }
            if rule.log {
                out.push(format!("{base} log"));
            }
            out.push("\n".to_string());
        }
    }
}

fn emit_chains(out: &mut Vec<String>, version: IpVersion, chains: &BTreeMap<String, Chain>) {
    for (name, chain) in chains {
        out.push(format!("#\n# Chain: {name}\n#"));

        if let Some(policy) = &chain.default {
            out.push(format!(
                "set firewall {version} name {name} description '{}'",
                policy.description
            ));
            out.push(format!(
                "set firewall {version} name {name} default-action '{}'",
                policy.default_action.as_str()
            ));
            if policy.default_logging {
                out.push(format!("set firewall {version} name {name} default-log"));
            }
            out.push("\n".to_string());
        }

        for number in &chain.rule_order {
            let Some(rule) = chain.rules.get(number) else {
                continue;
            };
            let base = format!("set firewall {version} name {name} rule {number}");
            out.push(format!("# Rule {number}"));

            if rule.disabled {
                out.push(format!("{base} disable"));
            }
            if !rule.description.is_empty() {
                out.push(format!("{base} description '{}'", rule.description));
            }
            out.push(format!("{base} action '{}'", rule.action.as_str()));

            emit_endpoint(
                out,
                &base,
                "destination",
                &rule.dest_address,
                rule.dest_address_type,
                &rule.dest_port,
                rule.dest_port_type,
            );
            emit_endpoint(
                out,
                &base,
                "source",
                &rule.source_address,
                rule.source_address_type,
                &rule.source_port,
                rule.source_port_type,
            );

            if !rule.protocol.is_empty() {
                // The v6 dialect has no bare "icmp" token.
                let protocol = if version == IpVersion::V6 && rule.protocol == "icmp" {
                    "ipv6-icmp"
                } else {
                    rule.protocol.as_str()
                };
                out.push(format!("{base} protocol '{protocol}'"));
            }

            if rule.logging {
                out.push(format!("{base} log"));
            }

            for (state, enabled) in [
                ("established", rule.state_established),
                ("invalid", rule.state_invalid),
                ("new", rule.state_new),
                ("related", rule.state_related),
            ] {
                if enabled {
                    out.push(format!("{base} state '{state}'"));
                }
            }
            out.push(String::new());
        }
    }
}

fn emit_endpoint(
    out: &mut Vec<String>,
    base: &str,
    side: &str,
    address: &str,
    address_kind: AddressKind,
    port: &str,
    port_kind: PortKind,
) {
    if !address.is_empty() {
        match address_kind.group_token() {
            None => out.push(format!("{base} {side} address '{address}'")),
            Some(token) => out.push(format!("{base} {side} group {token} '{address}'")),
        }
    }
    if !port.is_empty() {
        match port_kind {
            PortKind::Port => out.push(format!("{base} {side} port '{port}'")),
            PortKind::PortGroup => out.push(format!("{base} {side} group port-group '{port}'")),
        }
    }
}
