use catalog::CatalogError;
use soap::{Fault, PayloadRoot, SoapError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    /// A handler precondition failed
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("SOAP error: {0}")]
    Soap(#[from] SoapError),

    #[error("No endpoint mapping found for {0}")]
    NoEndpoint(PayloadRoot),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ServerError {
    /// The fault reported to the caller, if this error is reported as one.
    ///
    /// Unroutable messages are not faults; the transport answers them with
    /// a bare 404.
    pub fn to_fault(&self) -> Option<Fault> {
        match self {
            ServerError::NoEndpoint(_) => None,
            ServerError::Soap(err) => Some(Fault::client(err.to_string())),
            other => Some(Fault::server(other.to_string())),
        }
    }
}

pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;
    use soap::FaultCode;

    #[test]
    fn precondition_is_a_server_fault_with_its_message() {
        let fault = ServerError::from(CatalogError::MissingName).to_fault().unwrap();
        assert_eq!(fault.code, FaultCode::Server);
        assert_eq!(fault.string, "The movie's name must not be null");
    }

    #[test]
    fn decode_errors_are_client_faults() {
        let fault = ServerError::from(SoapError::EmptyBody).to_fault().unwrap();
        assert_eq!(fault.code, FaultCode::Client);
    }

    #[test]
    fn missing_route_is_not_a_fault() {
        let err = ServerError::NoEndpoint(PayloadRoot::new("urn:x", "y"));
        assert!(err.to_fault().is_none());
        assert_eq!(err.to_string(), "No endpoint mapping found for {urn:x}y");
    }
}
