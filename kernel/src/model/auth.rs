/// Opaque bearer token presented by the HTTP layer. Token issuance is the
/// auth collaborator's concern; this core only resolves tokens to users.
pub struct AccessToken(pub String);
