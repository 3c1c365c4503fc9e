//! SOAP 1.1 message codec.
//!
//! Decodes inbound envelopes into a namespace-resolved [`Element`] payload,
//! encodes response payloads and faults back into envelopes, and defines the
//! [`PayloadRoot`] key that requests are routed on.

pub mod element;
pub mod envelope;
pub mod error;

pub use element::{Element, PAYLOAD_PREFIX};
pub use envelope::{Envelope, Fault, FaultCode, PayloadRoot, SOAP_ENV_NS};
pub use error::{SoapError, SoapResult};
