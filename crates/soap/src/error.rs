use thiserror::Error;

/// Errors raised while decoding or encoding SOAP envelopes
#[derive(Error, Debug)]
pub enum SoapError {
    /// The document is not well-formed XML
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Well-formed XML that cannot be used as a message
    #[error("Malformed message: {0}")]
    Malformed(String),

    /// The root element is not a SOAP 1.1 envelope
    #[error("Expected a SOAP envelope but found {0}")]
    NotAnEnvelope(String),

    #[error("SOAP envelope has no Body")]
    MissingBody,

    #[error("SOAP Body carries no payload element")]
    EmptyBody,

    /// A payload element lacks a child the message type requires
    #[error("Payload {payload} is missing element {element}")]
    MissingElement { payload: String, element: String },

    /// A payload child carries text that cannot be converted
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },
}

pub type SoapResult<T> = std::result::Result<T, SoapError>;
