//! Boundary types for the external device client.
//!
//! The core never speaks the device protocol. It hands a finished
//! [`PushRequest`] to a [`DeviceClient`] implementation and passes the
//! result through untouched.

use thiserror::Error;

/// Everything a device client needs to apply a compiled ruleset.
#[derive(Debug, Clone)]
pub struct PushRequest {
    pub hostname: String,
    pub port: String,
    /// Reference to the operator's SSH key material; resolution is the
    /// client's business.
    pub key_reference: Option<String>,
    pub directives: Vec<String>,
    pub delete_before_apply: bool,
}

/// Opaque failure reported by a device client.
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("device communication failed: {0}")]
    Transport(String),
}

/// Implemented by the SSH/device-protocol collaborator.
pub trait DeviceClient {
    /// Preview what the device would change without committing.
    fn diff(&self, request: &PushRequest) -> Result<String, DeviceError>;
    /// Apply and commit the directives; returns the device's commit output.
    fn commit(&self, request: &PushRequest) -> Result<String, DeviceError>;
    /// Cheap reachability probe.
    fn check_connectivity(&self, request: &PushRequest) -> Result<(), DeviceError>;
}

/// Render the commands file a device client consumes, one directive per
/// line, optionally preceded by a full wipe of the firewall tree.
pub fn render_command_file(directives: &[String], delete_before_apply: bool) -> String {
    let mut out = String::new();
    if delete_before_apply {
        out.push_str("#\n# Delete all firewall before setting new values\ndelete firewall\n");
    }
    for line in directives {
        out.push_str(line);
        out.push('\n');
    }
    out
}
