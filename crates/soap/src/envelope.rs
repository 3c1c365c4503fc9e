//! SOAP 1.1 envelopes and faults.

use std::fmt;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use tracing::trace;

use crate::element::Element;
use crate::error::{SoapError, SoapResult};

/// Namespace of the SOAP 1.1 envelope elements.
pub const SOAP_ENV_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";

/// Prefix used for envelope elements when writing.
pub const SOAP_ENV_PREFIX: &str = "SOAP-ENV";

// =============================================================================
// PayloadRoot
// =============================================================================

/// The namespace and local name of a payload element.
///
/// This pair is what requests are routed on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PayloadRoot {
    pub namespace: String,
    pub local_part: String,
}

impl PayloadRoot {
    pub fn new(namespace: impl Into<String>, local_part: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            local_part: local_part.into(),
        }
    }

    pub fn of(element: &Element) -> Self {
        Self {
            namespace: element.namespace.clone().unwrap_or_default(),
            local_part: element.name.clone(),
        }
    }
}

impl fmt::Display for PayloadRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}{}", self.namespace, self.local_part)
    }
}

// =============================================================================
// Envelope
// =============================================================================

/// A decoded SOAP message: optional header plus exactly one payload element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub header: Option<Element>,
    pub payload: Element,
}

impl Envelope {
    pub fn new(payload: Element) -> Self {
        Self {
            header: None,
            payload,
        }
    }

    /// Decode an envelope and pull out the first element of its Body.
    pub fn decode(xml: &str) -> SoapResult<Self> {
        let root = Element::parse(xml)?;
        if !root.is(SOAP_ENV_NS, "Envelope") {
            return Err(SoapError::NotAnEnvelope(PayloadRoot::of(&root).to_string()));
        }

        let mut header = None;
        let mut body = None;
        for child in root.children {
            if child.is(SOAP_ENV_NS, "Header") {
                header = Some(child);
            } else if child.is(SOAP_ENV_NS, "Body") {
                body = Some(child);
                break;
            }
        }

        let body = body.ok_or(SoapError::MissingBody)?;
        let payload = body.children.into_iter().next().ok_or(SoapError::EmptyBody)?;
        trace!(root = %PayloadRoot::of(&payload), "Decoded SOAP envelope");

        Ok(Self { header, payload })
    }

    /// Routing key of the payload
    pub fn payload_root(&self) -> PayloadRoot {
        PayloadRoot::of(&self.payload)
    }

    /// Encode as a complete document. Headers are not written back.
    pub fn encode(&self) -> SoapResult<String> {
        write_envelope(|writer| self.payload.write_to(writer, None))
    }

    /// If the payload is a SOAP fault, decode it.
    pub fn fault(&self) -> Option<Fault> {
        Fault::from_element(&self.payload)
    }
}

// =============================================================================
// Fault
// =============================================================================

/// Who is to blame for a fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultCode {
    /// The message itself was wrong
    Client,
    /// Processing failed on the receiving side
    Server,
}

impl FaultCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FaultCode::Client => "Client",
            FaultCode::Server => "Server",
        }
    }

    fn parse(code: &str) -> Option<Self> {
        // The code is a QName; the prefix is whatever the sender bound.
        let local = code.rsplit(':').next().unwrap_or(code);
        match local {
            "Client" => Some(FaultCode::Client),
            "Server" => Some(FaultCode::Server),
            _ => None,
        }
    }
}

/// A SOAP 1.1 fault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fault {
    pub code: FaultCode,
    pub string: String,
}

impl Fault {
    pub fn client(string: impl Into<String>) -> Self {
        Self {
            code: FaultCode::Client,
            string: string.into(),
        }
    }

    pub fn server(string: impl Into<String>) -> Self {
        Self {
            code: FaultCode::Server,
            string: string.into(),
        }
    }

    /// Encode as a complete envelope with the fault as its Body.
    pub fn encode(&self) -> SoapResult<String> {
        write_envelope(|writer| {
            let fault = format!("{SOAP_ENV_PREFIX}:Fault");
            writer.write_event(Event::Start(BytesStart::new(fault.as_str())))?;

            writer.write_event(Event::Start(BytesStart::new("faultcode")))?;
            let code = format!("{SOAP_ENV_PREFIX}:{}", self.code.as_str());
            writer.write_event(Event::Text(BytesText::new(&code)))?;
            writer.write_event(Event::End(BytesEnd::new("faultcode")))?;

            let mut string = BytesStart::new("faultstring");
            string.push_attribute(("xml:lang", "en"));
            writer.write_event(Event::Start(string))?;
            writer.write_event(Event::Text(BytesText::new(&self.string)))?;
            writer.write_event(Event::End(BytesEnd::new("faultstring")))?;

            writer.write_event(Event::End(BytesEnd::new(fault.as_str())))?;
            Ok(())
        })
    }

    pub fn from_element(element: &Element) -> Option<Self> {
        if !element.is(SOAP_ENV_NS, "Fault") {
            return None;
        }
        let code = FaultCode::parse(element.child("faultcode")?.text.trim())?;
        let string = element
            .child("faultstring")
            .map(|s| s.text.clone())
            .unwrap_or_default();
        Some(Self { code, string })
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.as_str(), self.string)
    }
}

/// Write declaration, Envelope, empty Header and Body around `body`.
fn write_envelope<F>(body: F) -> SoapResult<String>
where
    F: FnOnce(&mut Writer<Vec<u8>>) -> SoapResult<()>,
{
    let mut writer = Writer::new(Vec::new());
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let envelope = format!("{SOAP_ENV_PREFIX}:Envelope");
    let header = format!("{SOAP_ENV_PREFIX}:Header");
    let body_name = format!("{SOAP_ENV_PREFIX}:Body");

    let mut start = BytesStart::new(envelope.as_str());
    let xmlns = format!("xmlns:{SOAP_ENV_PREFIX}");
    start.push_attribute((xmlns.as_str(), SOAP_ENV_NS));
    writer.write_event(Event::Start(start))?;
    writer.write_event(Event::Empty(BytesStart::new(header.as_str())))?;
    writer.write_event(Event::Start(BytesStart::new(body_name.as_str())))?;

    body(&mut writer)?;

    writer.write_event(Event::End(BytesEnd::new(body_name.as_str())))?;
    writer.write_event(Event::End(BytesEnd::new(envelope.as_str())))?;

    String::from_utf8(writer.into_inner()).map_err(|e| SoapError::Malformed(e.to_string()))
}
