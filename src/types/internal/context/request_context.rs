use std::net::IpAddr;

use crate::types::internal::caller::Caller;

use super::{request_id::RequestId, request_source::RequestSource};

/// Request context that flows through all layers
///
/// Carries the verified caller explicitly. Coordinators evaluate access
/// requirements against `caller`; there is no ambient "current user".
#[derive(Debug, Clone, PartialEq)]
pub struct RequestContext {
    /// IP address of the client making the request
    pub ip_address: Option<IpAddr>,

    /// Unique identifier for this request (for tracing across layers)
    pub request_id: RequestId,

    /// Source of the request (API or System)
    pub source: RequestSource,

    /// Caller resolved from a valid bearer token, `None` when unauthenticated
    pub caller: Option<Caller>,
}

impl RequestContext {
    /// Create an unauthenticated API context with a fresh request id
    pub fn new() -> Self {
        Self {
            ip_address: None,
            request_id: RequestId::generate(),
            source: RequestSource::API,
            caller: None,
        }
    }

    /// Create a RequestContext for system operations
    ///
    /// # Arguments
    /// * `operation_name` - Name of the system operation, used in logs
    pub fn for_system(operation_name: &str) -> Self {
        tracing::debug!("Creating system context for {}", operation_name);
        Self {
            ip_address: None,
            request_id: RequestId::generate(),
            source: RequestSource::System,
            caller: None,
        }
    }

    /// Set the ip_address
    pub fn with_ip_address(mut self, ip_address: IpAddr) -> Self {
        self.ip_address = Some(ip_address);
        self
    }

    /// Attach the verified caller
    pub fn with_caller(mut self, caller: Caller) -> Self {
        self.caller = Some(caller);
        self
    }

    pub fn is_authenticated(&self) -> bool {
        self.caller.is_some()
    }

    /// Identifier used in log lines
    pub fn actor_id(&self) -> String {
        match (&self.caller, self.source) {
            (Some(caller), _) => caller.user_id.clone(),
            (None, RequestSource::System) => "system".to_string(),
            (None, RequestSource::API) => "anonymous".to_string(),
        }
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}
