//! Turns raw request envelopes into response envelopes.
//!
//! The dispatcher owns the whole message path apart from transport:
//! 1. Decode the envelope
//! 2. Resolve the payload root in the routing table
//! 3. Invoke the handler
//! 4. Encode the response payload, or report a fault

use soap::{Envelope, Fault, PayloadRoot};
use tracing::{debug, warn};

use crate::error::{ServerError, ServerResult};
use crate::router::EndpointRouter;

/// Result of dispatching one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Encoded response envelope
    Response(String),
    /// The message was routed (or could not be decoded) and failed
    Fault(Fault),
    /// No handler is registered for the payload root
    NoEndpoint(PayloadRoot),
}

#[derive(Debug, Clone)]
pub struct MessageDispatcher {
    router: EndpointRouter,
}

impl MessageDispatcher {
    pub fn new(router: EndpointRouter) -> Self {
        Self { router }
    }

    pub fn router(&self) -> &EndpointRouter {
        &self.router
    }

    /// Dispatch a raw request body. Bodies that are not UTF-8 are client faults.
    pub fn dispatch_bytes(&self, body: &[u8]) -> DispatchOutcome {
        match std::str::from_utf8(body) {
            Ok(body) => self.dispatch(body),
            Err(err) => {
                warn!(error = %err, "Request body is not UTF-8");
                DispatchOutcome::Fault(Fault::client(format!(
                    "Request body is not valid UTF-8: {err}"
                )))
            }
        }
    }

    /// Dispatch one request envelope.
    pub fn dispatch(&self, body: &str) -> DispatchOutcome {
        match self.try_dispatch(body) {
            Ok(response) => DispatchOutcome::Response(response),
            Err(ServerError::NoEndpoint(root)) => {
                warn!(%root, "No endpoint mapping found");
                DispatchOutcome::NoEndpoint(root)
            }
            Err(err) => {
                warn!(error = %err, "Request failed");
                // Every other error maps to a fault.
                let fault = err
                    .to_fault()
                    .unwrap_or_else(|| Fault::server(err.to_string()));
                DispatchOutcome::Fault(fault)
            }
        }
    }

    fn try_dispatch(&self, body: &str) -> ServerResult<String> {
        let envelope = Envelope::decode(body)?;
        let root = envelope.payload_root();

        let handler = self
            .router
            .resolve(&root)
            .ok_or_else(|| ServerError::NoEndpoint(root.clone()))?;

        debug!(%root, "Dispatching request");
        let response = handler(&envelope.payload)?;
        Ok(Envelope::new(response).encode()?)
    }
}
