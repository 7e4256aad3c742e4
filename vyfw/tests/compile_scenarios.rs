use pretty_assertions::assert_eq;
use vyfw::compile::{compile, EMPTY_RULESET};
use vyfw::model::{
    Chain, ChainPolicy, ChainRule, ConfigDocument, Direction, Filter, FilterAction, FilterKind,
    FilterRule, Group, GroupKind, IpVersion, RuleAction,
};

fn chain_doc(version: IpVersion, protocol: &str) -> ConfigDocument {
    let mut doc = ConfigDocument::default();
    let mut chain = Chain::default();
    chain.rules.insert(
        "10".to_string(),
        ChainRule {
            description: "allow lan".to_string(),
            action: RuleAction::Accept,
            dest_address: "10.0.0.0/24".to_string(),
            protocol: protocol.to_string(),
            state_established: true,
            ..ChainRule::default()
        },
    );
    chain.normalize();
    doc.block_mut(version).chains.insert("INPUT".to_string(), chain);
    doc
}

fn assert_contains_run(lines: &[String], expected: &[&str]) {
    let found = lines
        .windows(expected.len())
        .any(|window| window.iter().zip(expected).all(|(line, want)| line == want));
    assert!(
        found,
        "expected contiguous lines {expected:#?} in output {lines:#?}"
    );
}

#[test]
fn v4_chain_rule_compiles_in_the_documented_order() {
    let lines = compile(&chain_doc(IpVersion::V4, "tcp"));
    assert_contains_run(
        &lines,
        &[
            "# Rule 10",
            "set firewall ipv4 name INPUT rule 10 description 'allow lan'",
            "set firewall ipv4 name INPUT rule 10 action 'accept'",
            "set firewall ipv4 name INPUT rule 10 destination address '10.0.0.0/24'",
            "set firewall ipv4 name INPUT rule 10 protocol 'tcp'",
            "set firewall ipv4 name INPUT rule 10 state 'established'",
        ],
    );
}

#[test]
fn v6_chain_rewrites_icmp_to_ipv6_icmp() {
    let lines = compile(&chain_doc(IpVersion::V6, "icmp"));
    assert!(lines.contains(&"set firewall ipv6 name INPUT rule 10 protocol 'ipv6-icmp'".to_string()));
    assert!(!lines.iter().any(|line| line.ends_with("protocol 'icmp'")));
}

#[test]
fn v4_protocol_icmp_is_left_alone() {
    let lines = compile(&chain_doc(IpVersion::V4, "icmp"));
    assert!(lines.contains(&"set firewall ipv4 name INPUT rule 10 protocol 'icmp'".to_string()));
}

#[test]
fn v6_groups_use_the_ipv6_prefixed_directive() {
    let mut doc = ConfigDocument::default();
    doc.block_mut(IpVersion::V6).groups.insert(
        "WEB".to_string(),
        Group {
            description: "web servers".to_string(),
            kind: GroupKind::Address,
            values: vec!["2001:db8::10".to_string()],
        },
    );
    doc.block_mut(IpVersion::V4).groups.insert(
        "LAN".to_string(),
        Group {
            description: String::new(),
            kind: GroupKind::Network,
            values: vec!["10.0.0.0/24".to_string()],
        },
    );

    let lines = compile(&doc);
    assert!(lines
        .contains(&"set firewall group ipv6-address-group WEB description 'web servers'".to_string()));
    assert!(lines.contains(&"set firewall group ipv6-address-group WEB address '2001:db8::10'".to_string()));
    assert!(lines.contains(&"set firewall group network-group LAN network '10.0.0.0/24'".to_string()));
    // Empty descriptions emit nothing.
    assert!(!lines.iter().any(|line| line.contains("LAN description")));
}

#[test]
fn filter_jump_and_offload_rules_emit_their_target_lines() {
    let mut doc = ConfigDocument::default();
    let mut filter = Filter {
        description: "forward filter".to_string(),
        default_action: RuleAction::Drop,
        log: true,
        rule_order: Vec::new(),
        rules: Default::default(),
    };
    filter.rules.insert(
        "10".to_string(),
        FilterRule {
            description: String::new(),
            disabled: false,
            log: false,
            action: FilterAction::Jump,
            interface: Some("eth0".to_string()),
            direction: Some(Direction::Inbound),
            target: Some("INPUT".to_string()),
        },
    );
    filter.rules.insert(
        "20".to_string(),
        FilterRule {
            description: String::new(),
            disabled: true,
            log: false,
            action: FilterAction::Offload,
            interface: None,
            direction: None,
            target: Some("ft0".to_string()),
        },
    );
    filter.normalize();
    doc.block_mut(IpVersion::V4)
        .filters
        .insert(FilterKind::Forward, filter);

    let lines = compile(&doc);
    assert!(lines.contains(&"set firewall ipv4 forward filter description 'forward filter'".to_string()));
    assert!(lines.contains(&"set firewall ipv4 forward filter default-action drop".to_string()));
    assert!(lines.contains(&"set firewall ipv4 forward filter enable-default-log".to_string()));
    assert_contains_run(
        &lines,
        &[
            "# Rule 10",
            "set firewall ipv4 forward filter rule 10 action 'jump'",
            "set firewall ipv4 forward filter rule 10 inbound-interface name 'eth0'",
            "set firewall ipv4 forward filter rule 10 jump-target 'INPUT'",
        ],
    );
    assert_contains_run(
        &lines,
        &[
            "# Rule 20",
            "set firewall ipv4 forward filter rule 20 action 'offload'",
            "set firewall ipv4 forward filter rule 20 offload-target 'ft0'",
            "set firewall ipv4 forward filter rule 20 disable",
        ],
    );
}

#[test]
fn chain_default_policy_lines_precede_rules() {
    let mut doc = ConfigDocument::default();
    let mut chain = Chain {
        default: Some(ChainPolicy {
            description: "input chain".to_string(),
            default_action: RuleAction::Drop,
            default_logging: true,
        }),
        ..Chain::default()
    };
    chain.rules.insert(
        "10".to_string(),
        ChainRule {
            action: RuleAction::Accept,
            ..ChainRule::default()
        },
    );
    chain.normalize();
    doc.block_mut(IpVersion::V4).chains.insert("INPUT".to_string(), chain);

    let lines = compile(&doc);
    assert_contains_run(
        &lines,
        &[
            "set firewall ipv4 name INPUT description 'input chain'",
            "set firewall ipv4 name INPUT default-action 'drop'",
            "set firewall ipv4 name INPUT default-log",
        ],
    );
    let policy_pos = lines
        .iter()
        .position(|l| l.contains("default-action 'drop'"))
        .expect("policy line");
    let rule_pos = lines
        .iter()
        .position(|l| l == "# Rule 10")
        .expect("rule header");
    assert!(policy_pos < rule_pos);
}

#[test]
fn ipv4_block_always_compiles_before_ipv6() {
    let mut doc = chain_doc(IpVersion::V6, "tcp");
    doc.block_mut(IpVersion::V4).chains.insert(
        "OUTPUT".to_string(),
        Chain::default(),
    );

    let lines = compile(&doc);
    let v4_pos = lines
        .iter()
        .position(|l| l.contains("# IPv4"))
        .expect("v4 header");
    let v6_pos = lines
        .iter()
        .position(|l| l.contains("# IPv6"))
        .expect("v6 header");
    assert!(v4_pos < v6_pos);
}

#[test]
fn compilation_is_idempotent() {
    let doc = chain_doc(IpVersion::V4, "tcp");
    assert_eq!(compile(&doc), compile(&doc));
}

#[test]
fn empty_document_yields_only_the_placeholder() {
    assert_eq!(
        compile(&ConfigDocument::default()),
        vec![EMPTY_RULESET.to_string()]
    );
}
