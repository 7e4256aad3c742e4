use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use vyfw::model::{
    AddressKind, Direction, FilterAction, FilterKind, GroupKind, IpVersion, PortKind, RuleAction,
};

#[derive(Parser, Debug)]
#[command(name = "vyfw")]
#[command(about = "Model, compile, snapshot, and diff VyOS firewall rulesets")]
pub struct Cli {
    /// Data directory backing the filesystem document store.
    #[arg(long, default_value = "data", global = true)]
    pub data_dir: PathBuf,
    /// Owner identity; doubles as the store collection name.
    #[arg(long, default_value = "local", global = true)]
    pub owner: String,
    /// Firewall the command applies to.
    #[arg(long, default_value = "firewall", global = true)]
    pub firewall: String,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Compile the current configuration and print the directives.
    Show,
    /// Print the current configuration document as JSON.
    Json,
    /// Render the commands file handed to the device client.
    Render(RenderArgs),
    /// List configured entities.
    List(ListArgs),
    /// Compare the compiled output of two snapshots.
    Diff(DiffArgs),
    /// Manage snapshots.
    #[command(subcommand)]
    Snapshot(SnapshotCommand),
    /// Manage groups.
    #[command(subcommand)]
    Group(GroupCommand),
    /// Manage chains and chain rules.
    #[command(subcommand)]
    Chain(ChainCommand),
    /// Manage filters and filter rules.
    #[command(subcommand)]
    Filter(FilterCommand),
    /// Manage interfaces.
    #[command(subcommand)]
    Interface(InterfaceCommand),
    /// Manage flowtables.
    #[command(subcommand)]
    Flowtable(FlowtableCommand),
    /// Manage extra raw configuration lines.
    #[command(subcommand)]
    Extra(ExtraCommand),
    /// Set the device hostname and port.
    System(SystemArgs),
}

#[derive(Parser, Debug)]
pub struct RenderArgs {
    /// Prepend a full `delete firewall` before the directives.
    #[arg(long)]
    pub delete: bool,
    /// Write to a file instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum ListTarget {
    Firewalls,
    Chains,
    Rules,
    Groups,
    Filters,
    Interfaces,
    Flowtables,
    Snapshots,
}

#[derive(Parser, Debug)]
pub struct ListArgs {
    #[arg(value_enum)]
    pub target: ListTarget,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
pub struct DiffArgs {
    /// Left snapshot label, or `current`.
    pub label_a: String,
    /// Right snapshot label, or `current`.
    pub label_b: String,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    /// Print only the row counts.
    #[arg(long)]
    pub summary: bool,
}

#[derive(clap::Subcommand, Debug)]
pub enum SnapshotCommand {
    /// Copy the current configuration into a new snapshot.
    Create,
    /// List snapshots, newest first.
    List,
    /// Attach free text to a snapshot.
    Tag { label: String, text: String },
    /// Replace the current configuration with a snapshot's content.
    Select { label: String },
    /// Delete a snapshot.
    Delete { label: String },
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum IpVersionArg {
    Ipv4,
    Ipv6,
}

impl From<IpVersionArg> for IpVersion {
    fn from(value: IpVersionArg) -> Self {
        match value {
            IpVersionArg::Ipv4 => IpVersion::V4,
            IpVersionArg::Ipv6 => IpVersion::V6,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum GroupKindArg {
    AddressGroup,
    DomainGroup,
    InterfaceGroup,
    MacGroup,
    NetworkGroup,
    PortGroup,
}

impl From<GroupKindArg> for GroupKind {
    fn from(value: GroupKindArg) -> Self {
        match value {
            GroupKindArg::AddressGroup => GroupKind::Address,
            GroupKindArg::DomainGroup => GroupKind::Domain,
            GroupKindArg::InterfaceGroup => GroupKind::Interface,
            GroupKindArg::MacGroup => GroupKind::Mac,
            GroupKindArg::NetworkGroup => GroupKind::Network,
            GroupKindArg::PortGroup => GroupKind::Port,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ActionArg {
    Accept,
    Continue,
    Drop,
    Queue,
    Reject,
    Return,
}

impl From<ActionArg> for RuleAction {
    fn from(value: ActionArg) -> Self {
        match value {
            ActionArg::Accept => RuleAction::Accept,
            ActionArg::Continue => RuleAction::Continue,
            ActionArg::Drop => RuleAction::Drop,
            ActionArg::Queue => RuleAction::Queue,
            ActionArg::Reject => RuleAction::Reject,
            ActionArg::Return => RuleAction::Return,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum FilterActionArg {
    Accept,
    Drop,
    Jump,
    Offload,
}

impl From<FilterActionArg> for FilterAction {
    fn from(value: FilterActionArg) -> Self {
        match value {
            FilterActionArg::Accept => FilterAction::Accept,
            FilterActionArg::Drop => FilterAction::Drop,
            FilterActionArg::Jump => FilterAction::Jump,
            FilterActionArg::Offload => FilterAction::Offload,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum FilterKindArg {
    Input,
    Forward,
    Output,
}

impl From<FilterKindArg> for FilterKind {
    fn from(value: FilterKindArg) -> Self {
        match value {
            FilterKindArg::Input => FilterKind::Input,
            FilterKindArg::Forward => FilterKind::Forward,
            FilterKindArg::Output => FilterKind::Output,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum DirectionArg {
    Inbound,
    Outbound,
}

impl From<DirectionArg> for Direction {
    fn from(value: DirectionArg) -> Self {
        match value {
            DirectionArg::Inbound => Direction::Inbound,
            DirectionArg::Outbound => Direction::Outbound,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum AddressKindArg {
    Address,
    AddressGroup,
    DomainGroup,
    MacGroup,
    NetworkGroup,
}

impl From<AddressKindArg> for AddressKind {
    fn from(value: AddressKindArg) -> Self {
        match value {
            AddressKindArg::Address => AddressKind::Address,
            AddressKindArg::AddressGroup => AddressKind::AddressGroup,
            AddressKindArg::DomainGroup => AddressKind::DomainGroup,
            AddressKindArg::MacGroup => AddressKind::MacGroup,
            AddressKindArg::NetworkGroup => AddressKind::NetworkGroup,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum PortKindArg {
    Port,
    PortGroup,
}

impl From<PortKindArg> for PortKind {
    fn from(value: PortKindArg) -> Self {
        match value {
            PortKindArg::Port => PortKind::Port,
            PortKindArg::PortGroup => PortKind::PortGroup,
        }
    }
}

#[derive(clap::Subcommand, Debug)]
pub enum GroupCommand {
    /// Add or replace a group.
    Add(GroupAddArgs),
    /// Delete a group.
    Delete {
        #[arg(long, value_enum, default_value_t = IpVersionArg::Ipv4)]
        ip_version: IpVersionArg,
        name: String,
    },
}

#[derive(Parser, Debug)]
pub struct GroupAddArgs {
    pub name: String,
    #[arg(long, value_enum)]
    pub kind: GroupKindArg,
    #[arg(long, value_enum, default_value_t = IpVersionArg::Ipv4)]
    pub ip_version: IpVersionArg,
    #[arg(long, default_value = "")]
    pub description: String,
    /// Group member; repeatable.
    #[arg(long = "value")]
    pub values: Vec<String>,
}

#[derive(clap::Subcommand, Debug)]
pub enum ChainCommand {
    /// Add a chain or replace its default policy.
    Add(ChainAddArgs),
    /// Add a rule to a chain.
    RuleAdd(ChainRuleAddArgs),
    /// Delete a rule from a chain.
    RuleDelete {
        #[arg(long, value_enum, default_value_t = IpVersionArg::Ipv4)]
        ip_version: IpVersionArg,
        chain: String,
        number: String,
    },
    /// Move a rule to a new number.
    RuleMove {
        #[arg(long, value_enum, default_value_t = IpVersionArg::Ipv4)]
        ip_version: IpVersionArg,
        chain: String,
        from: String,
        to: String,
    },
}

#[derive(Parser, Debug)]
pub struct ChainAddArgs {
    pub name: String,
    #[arg(long, value_enum, default_value_t = IpVersionArg::Ipv4)]
    pub ip_version: IpVersionArg,
    #[arg(long, default_value = "")]
    pub description: String,
    #[arg(long, value_enum, default_value_t = ActionArg::Drop)]
    pub default_action: ActionArg,
    /// Log packets hitting the default action.
    #[arg(long)]
    pub log: bool,
}

#[derive(Parser, Debug)]
pub struct ChainRuleAddArgs {
    pub chain: String,
    pub number: String,
    #[arg(long, value_enum, default_value_t = IpVersionArg::Ipv4)]
    pub ip_version: IpVersionArg,
    #[arg(long, default_value = "")]
    pub description: String,
    #[arg(long)]
    pub disable: bool,
    #[arg(long)]
    pub log: bool,
    #[arg(long, value_enum, default_value_t = ActionArg::Accept)]
    pub action: ActionArg,
    #[arg(long, default_value = "")]
    pub dest_address: String,
    #[arg(long, value_enum, default_value_t = AddressKindArg::Address)]
    pub dest_address_type: AddressKindArg,
    #[arg(long, default_value = "")]
    pub dest_port: String,
    #[arg(long, value_enum, default_value_t = PortKindArg::Port)]
    pub dest_port_type: PortKindArg,
    #[arg(long, default_value = "")]
    pub source_address: String,
    #[arg(long, value_enum, default_value_t = AddressKindArg::Address)]
    pub source_address_type: AddressKindArg,
    #[arg(long, default_value = "")]
    pub source_port: String,
    #[arg(long, value_enum, default_value_t = PortKindArg::Port)]
    pub source_port_type: PortKindArg,
    #[arg(long, default_value = "")]
    pub protocol: String,
    #[arg(long)]
    pub state_established: bool,
    #[arg(long)]
    pub state_invalid: bool,
    #[arg(long)]
    pub state_new: bool,
    #[arg(long)]
    pub state_related: bool,
}

#[derive(clap::Subcommand, Debug)]
pub enum FilterCommand {
    /// Add a filter or replace its settings.
    Add(FilterAddArgs),
    /// Add a rule to a filter.
    RuleAdd(FilterRuleAddArgs),
    /// Delete a rule from a filter.
    RuleDelete {
        #[arg(long, value_enum, default_value_t = IpVersionArg::Ipv4)]
        ip_version: IpVersionArg,
        #[arg(value_enum)]
        kind: FilterKindArg,
        number: String,
    },
    /// Move a rule to a new number.
    RuleMove {
        #[arg(long, value_enum, default_value_t = IpVersionArg::Ipv4)]
        ip_version: IpVersionArg,
        #[arg(value_enum)]
        kind: FilterKindArg,
        from: String,
        to: String,
    },
}

#[derive(Parser, Debug)]
pub struct FilterAddArgs {
    #[arg(value_enum)]
    pub kind: FilterKindArg,
    #[arg(long, value_enum, default_value_t = IpVersionArg::Ipv4)]
    pub ip_version: IpVersionArg,
    #[arg(long, default_value = "")]
    pub description: String,
    #[arg(long, value_enum, default_value_t = ActionArg::Drop)]
    pub default_action: ActionArg,
    /// Log packets hitting the default action.
    #[arg(long)]
    pub log: bool,
}

#[derive(Parser, Debug)]
pub struct FilterRuleAddArgs {
    #[arg(value_enum)]
    pub kind: FilterKindArg,
    pub number: String,
    #[arg(long, value_enum, default_value_t = IpVersionArg::Ipv4)]
    pub ip_version: IpVersionArg,
    #[arg(long, default_value = "")]
    pub description: String,
    #[arg(long)]
    pub disable: bool,
    #[arg(long)]
    pub log: bool,
    #[arg(long, value_enum)]
    pub action: FilterActionArg,
    /// Interface for jump rules.
    #[arg(long)]
    pub interface: Option<String>,
    /// Direction for jump rules.
    #[arg(long, value_enum)]
    pub direction: Option<DirectionArg>,
    /// Target chain (jump) or flowtable (offload).
    #[arg(long)]
    pub target: Option<String>,
}

#[derive(clap::Subcommand, Debug)]
pub enum InterfaceCommand {
    /// Add or replace an interface.
    Add {
        name: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Delete an interface.
    Delete { name: String },
}

#[derive(clap::Subcommand, Debug)]
pub enum FlowtableCommand {
    /// Add or replace a flowtable.
    Add {
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Member interface; repeatable.
        #[arg(long = "interface")]
        interfaces: Vec<String>,
    },
    /// Delete a flowtable.
    Delete { name: String },
}

#[derive(clap::Subcommand, Debug)]
pub enum ExtraCommand {
    /// Store extra lines, replacing any previous set.
    Set {
        /// Raw line; repeatable.
        #[arg(long = "item")]
        items: Vec<String>,
        /// Read lines from a file instead.
        #[arg(long, conflicts_with = "items")]
        file: Option<PathBuf>,
    },
    /// Print the stored extra lines (or the starter template).
    Show,
}

#[derive(Parser, Debug)]
pub struct SystemArgs {
    pub hostname: String,
    pub port: String,
}
