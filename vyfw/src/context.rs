/// Identity and scoping for one logical request.
///
/// Every operation receives the context explicitly; there is no ambient
/// per-request state. The owner doubles as the store collection name and
/// the firewall name as the document key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub owner: String,
    pub firewall: String,
}

impl RequestContext {
    pub fn new(owner: impl Into<String>, firewall: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            firewall: firewall.into(),
        }
    }
}
