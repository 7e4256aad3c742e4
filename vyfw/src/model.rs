//! Typed configuration document.
//!
//! The serde attributes pin the on-disk JSON shape: presence-only flags
//! round-trip as booleans that serialize only when set, empty strings mean
//! "absent" and are dropped on write, and chain rules live as sibling keys
//! of `default`/`rule-order` inside the chain object (a flattened map).
//! Invalid kind or action strings fail deserialization, which surfaces as
//! a decode error instead of a silent no-op branch.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::migrate::CURRENT_SCHEMA_VERSION;

fn is_false(value: &bool) -> bool {
    !*value
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum IpVersion {
    #[serde(rename = "ipv4")]
    V4,
    #[serde(rename = "ipv6")]
    V6,
}

impl IpVersion {
    pub fn as_str(self) -> &'static str {
        match self {
            IpVersion::V4 => "ipv4",
            IpVersion::V6 => "ipv6",
        }
    }
}

impl fmt::Display for IpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The typed collection kinds a [`Group`] can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GroupKind {
    #[serde(rename = "address-group")]
    Address,
    #[serde(rename = "domain-group")]
    Domain,
    #[serde(rename = "interface-group")]
    Interface,
    #[serde(rename = "mac-group")]
    Mac,
    #[serde(rename = "network-group")]
    Network,
    #[serde(rename = "port-group")]
    Port,
}

impl GroupKind {
    /// The group-kind token as it appears in a `set firewall group` line.
    pub fn token(self) -> &'static str {
        match self {
            GroupKind::Address => "address-group",
            GroupKind::Domain => "domain-group",
            GroupKind::Interface => "interface-group",
            GroupKind::Mac => "mac-group",
            GroupKind::Network => "network-group",
            GroupKind::Port => "port-group",
        }
    }

    /// The per-value token inside a group definition line.
    pub fn value_token(self) -> &'static str {
        match self {
            GroupKind::Address | GroupKind::Domain => "address",
            GroupKind::Interface => "interface",
            GroupKind::Mac => "mac-address",
            GroupKind::Network => "network",
            GroupKind::Port => "port",
        }
    }

    /// Address and network groups carry the IP version of the block that
    /// holds them; every other kind lives in the v4 block.
    pub fn ip_versioned(self) -> bool {
        matches!(self, GroupKind::Address | GroupKind::Network)
    }
}

/// Action of a chain rule or a chain's default policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleAction {
    Accept,
    Continue,
    Drop,
    Queue,
    Reject,
    Return,
}

impl RuleAction {
    pub fn as_str(self) -> &'static str {
        match self {
            RuleAction::Accept => "accept",
            RuleAction::Continue => "continue",
            RuleAction::Drop => "drop",
            RuleAction::Queue => "queue",
            RuleAction::Reject => "reject",
            RuleAction::Return => "return",
        }
    }
}

/// Action of a filter rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterAction {
    Accept,
    Drop,
    Jump,
    Offload,
}

impl FilterAction {
    pub fn as_str(self) -> &'static str {
        match self {
            FilterAction::Accept => "accept",
            FilterAction::Drop => "drop",
            FilterAction::Jump => "jump",
            FilterAction::Offload => "offload",
        }
    }
}

/// The fixed hook points a filter can bind to. Declaration order is the
/// compile order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    Input,
    Forward,
    Output,
}

impl FilterKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FilterKind::Input => "input",
            FilterKind::Forward => "forward",
            FilterKind::Output => "output",
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Inbound,
    Outbound,
}

/// How a rule endpoint's address value is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressKind {
    #[default]
    Address,
    AddressGroup,
    DomainGroup,
    MacGroup,
    NetworkGroup,
}

impl AddressKind {
    /// The group-reference token for non-literal kinds.
    pub fn group_token(self) -> Option<&'static str> {
        match self {
            AddressKind::Address => None,
            AddressKind::AddressGroup => Some("address-group"),
            AddressKind::DomainGroup => Some("domain-group"),
            AddressKind::MacGroup => Some("mac-group"),
            AddressKind::NetworkGroup => Some("network-group"),
        }
    }

    /// Whether a reference of this kind is IP-versioned and must match the
    /// rule's block.
    pub fn ip_versioned(self) -> bool {
        matches!(self, AddressKind::AddressGroup | AddressKind::NetworkGroup)
    }
}

/// How a rule endpoint's port value is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortKind {
    #[default]
    Port,
    PortGroup,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemSettings {
    pub hostname: String,
    pub port: String,
}

impl Default for SystemSettings {
    fn default() -> Self {
        Self {
            hostname: "None".to_string(),
            port: "None".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    #[serde(rename = "group_desc", default)]
    pub description: String,
    #[serde(rename = "group_type")]
    pub kind: GroupKind,
    #[serde(rename = "group_value", default)]
    pub values: Vec<String>,
}

/// A chain's default policy block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainPolicy {
    #[serde(default)]
    pub description: String,
    #[serde(rename = "default_action")]
    pub default_action: RuleAction,
    #[serde(rename = "default_logging", default, skip_serializing_if = "is_false")]
    pub default_logging: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainRule {
    #[serde(default)]
    pub description: String,
    #[serde(rename = "rule_disable", default, skip_serializing_if = "is_false")]
    pub disabled: bool,
    #[serde(rename = "logging", default, skip_serializing_if = "is_false")]
    pub logging: bool,
    #[serde(default)]
    pub action: RuleAction,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub dest_address: String,
    #[serde(default)]
    pub dest_address_type: AddressKind,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub dest_port: String,
    #[serde(default)]
    pub dest_port_type: PortKind,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub source_address: String,
    #[serde(default)]
    pub source_address_type: AddressKind,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub source_port: String,
    #[serde(default)]
    pub source_port_type: PortKind,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub protocol: String,
    #[serde(rename = "state_est", default, skip_serializing_if = "is_false")]
    pub state_established: bool,
    #[serde(rename = "state_inv", default, skip_serializing_if = "is_false")]
    pub state_invalid: bool,
    #[serde(rename = "state_new", default, skip_serializing_if = "is_false")]
    pub state_new: bool,
    #[serde(rename = "state_rel", default, skip_serializing_if = "is_false")]
    pub state_related: bool,
}

impl Default for RuleAction {
    fn default() -> Self {
        RuleAction::Accept
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Chain {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<ChainPolicy>,
    #[serde(rename = "rule-order", default)]
    pub rule_order: Vec<String>,
    #[serde(flatten)]
    pub rules: BTreeMap<String, ChainRule>,
}

impl Chain {
    /// Re-derive `rule-order` as the integer-sorted set of rule numbers.
    /// The stored order is never trusted as authoritative.
    pub fn normalize(&mut self) {
        self.rule_order = sorted_rule_numbers(&self.rules);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterRule {
    #[serde(default)]
    pub description: String,
    #[serde(rename = "rule_disable", default, skip_serializing_if = "is_false")]
    pub disabled: bool,
    #[serde(rename = "log", default, skip_serializing_if = "is_false")]
    pub log: bool,
    pub action: FilterAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    #[serde(rename = "fw_chain", default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    #[serde(default)]
    pub description: String,
    #[serde(rename = "default-action")]
    pub default_action: RuleAction,
    #[serde(rename = "log", default, skip_serializing_if = "is_false")]
    pub log: bool,
    #[serde(rename = "rule-order", default)]
    pub rule_order: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub rules: BTreeMap<String, FilterRule>,
}

impl Filter {
    pub fn normalize(&mut self) {
        self.rule_order = sorted_rule_numbers(&self.rules);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flowtable {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub interfaces: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interface {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IpVersionBlock {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub groups: BTreeMap<String, Group>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub chains: BTreeMap<String, Chain>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub filters: BTreeMap<FilterKind, Filter>,
}

impl IpVersionBlock {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty() && self.chains.is_empty() && self.filters.is_empty()
    }
}

/// Root of a firewall configuration document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigDocument {
    #[serde(default)]
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<SystemSettings>,
    #[serde(rename = "extra-items", default, skip_serializing_if = "Vec::is_empty")]
    pub extra_items: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flowtables: Vec<Flowtable>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<Interface>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv4: Option<IpVersionBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6: Option<IpVersionBlock>,
}

impl Default for ConfigDocument {
    fn default() -> Self {
        Self {
            version: CURRENT_SCHEMA_VERSION,
            system: Some(SystemSettings::default()),
            extra_items: Vec::new(),
            flowtables: Vec::new(),
            interfaces: Vec::new(),
            ipv4: None,
            ipv6: None,
        }
    }
}

impl ConfigDocument {
    pub fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    pub fn to_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    pub fn block(&self, version: IpVersion) -> Option<&IpVersionBlock> {
        match version {
            IpVersion::V4 => self.ipv4.as_ref(),
            IpVersion::V6 => self.ipv6.as_ref(),
        }
    }

    /// The block for `version`, created empty when absent.
    pub fn block_mut(&mut self, version: IpVersion) -> &mut IpVersionBlock {
        let slot = match version {
            IpVersion::V4 => &mut self.ipv4,
            IpVersion::V6 => &mut self.ipv6,
        };
        slot.get_or_insert_with(IpVersionBlock::default)
    }

    /// Drop the block for `version` when it holds nothing.
    pub fn drop_block_if_empty(&mut self, version: IpVersion) {
        let slot = match version {
            IpVersion::V4 => &mut self.ipv4,
            IpVersion::V6 => &mut self.ipv6,
        };
        if slot.as_ref().is_some_and(IpVersionBlock::is_empty) {
            *slot = None;
        }
    }

    /// True when compiling would emit only the empty-ruleset placeholder.
    pub fn is_empty_ruleset(&self) -> bool {
        self.ipv4.is_none() && self.ipv6.is_none() && self.extra_items.is_empty()
    }

    /// Self-heal every chain and filter rule order.
    pub fn normalize(&mut self) {
        for block in [self.ipv4.as_mut(), self.ipv6.as_mut()].into_iter().flatten() {
            for chain in block.chains.values_mut() {
                chain.normalize();
            }
            for filter in block.filters.values_mut() {
                filter.normalize();
            }
        }
    }
}

/// Rule numbers sorted by integer value. Non-numeric stragglers sort last,
/// lexically, so a damaged document still compiles deterministically.
fn sorted_rule_numbers<V>(rules: &BTreeMap<String, V>) -> Vec<String> {
    let mut numbers: Vec<&String> = rules.keys().collect();
    numbers.sort_by_key(|number| (number.parse::<u64>().unwrap_or(u64::MAX), (*number).clone()));
    numbers.into_iter().cloned().collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::{Chain, ChainRule, ConfigDocument, RuleAction};

    #[test]
    fn chain_rules_flatten_next_to_default_and_rule_order() {
        let chain: Chain = serde_json::from_value(json!({
            "default": {"description": "base", "default_action": "drop"},
            "rule-order": ["10"],
            "10": {"description": "ssh", "action": "accept"}
        }))
        .expect("chain deserializes");

        assert_eq!(chain.rules.len(), 1);
        assert_eq!(chain.rules["10"].action, RuleAction::Accept);
        assert_eq!(
            chain.default.as_ref().map(|d| d.default_action),
            Some(RuleAction::Drop)
        );
    }

    #[test]
    fn normalize_re_derives_rule_order_from_rule_keys() {
        let mut chain: Chain = serde_json::from_value(json!({
            "rule-order": ["300"],
            "2": {"action": "accept"},
            "10": {"action": "drop"}
        }))
        .expect("chain deserializes");

        chain.normalize();

        assert_eq!(chain.rule_order, vec!["2".to_string(), "10".to_string()]);
    }

    #[test]
    fn presence_flags_round_trip_without_false_noise() {
        let rule = ChainRule {
            state_established: true,
            ..ChainRule::default()
        };
        let value = serde_json::to_value(&rule).expect("serializes");

        assert_eq!(value["state_est"], json!(true));
        assert!(value.get("state_inv").is_none());
        assert!(value.get("rule_disable").is_none());
    }

    #[test]
    fn unknown_action_strings_fail_to_decode() {
        let result: Result<ChainRule, _> =
            serde_json::from_value(json!({"action": "allow-all"}));
        assert!(result.is_err());
    }

    #[test]
    fn empty_document_round_trips_with_current_version() {
        let doc = ConfigDocument::default();
        let value = doc.to_value().expect("serializes");
        let back = ConfigDocument::from_value(value).expect("deserializes");
        assert_eq!(doc, back);
        assert!(back.is_empty_ruleset());
    }
}
