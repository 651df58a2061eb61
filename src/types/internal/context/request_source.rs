/// Source of the request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestSource {
    /// Request originated from an API endpoint
    API,

    /// Startup work such as seeding roles and the initial administrator
    System,
}
