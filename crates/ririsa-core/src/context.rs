/// Identified caller, attached to requests by the auth layer
///
/// Handlers only use it for logging; dispatch never looks at it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIdentity {
    /// Name of the API key the request authenticated with
    pub client_id: String,
}
