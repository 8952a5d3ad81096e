//! Commit acknowledgments for inbound HL7 messages

use crate::config::Environment;
use chrono::{DateTime, Utc};
use log::warn;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

pub const HUB_APPLICATION: &str = "ReportStream";
pub const HUB_FACILITY: &str = "CDC";
pub const ACK_VERSION: &str = "2.5.1";
pub const COMMIT_ACCEPT: &str = "CA";
/// Acknowledgment type "never"
pub const NO_ACKNOWLEDGMENT: &str = "NE";

const FIELD_SEPARATOR: &str = "|";
const ENCODING_CHARACTERS: &str = "^~\\&";
const SEGMENT_SEPARATOR: &str = "\r";

type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;
type IdSource = Arc<dyn Fn() -> String + Send + Sync>;

/// Routing fields read from an inbound message header
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageHeader {
    pub sending_application: String,
    pub sending_facility: String,
    pub control_id: String,
}

impl MessageHeader {
    /// Read the MSH segment of an HL7 message.
    ///
    /// The field separator is the one the message declares at MSH-1. Fields
    /// are kept verbatim, components included. Missing fields are empty.
    pub fn parse(message: &str) -> Self {
        let Some(msh) = message
            .split(['\r', '\n'])
            .map(|segment| segment.trim_start_matches('\u{feff}'))
            .find(|segment| segment.starts_with("MSH"))
        else {
            return Self::default();
        };
        let Some(separator) = msh[3..].chars().next() else {
            return Self::default();
        };
        let fields: Vec<&str> = msh.split(separator).collect();
        // fields[0] is the segment name, so MSH-n is fields[n - 1]
        let field = |n: usize| fields.get(n - 1).copied().unwrap_or_default().to_string();
        Self {
            sending_application: field(3),
            sending_facility: field(4),
            control_id: field(10),
        }
    }
}

/// An HL7 ACK message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AckMessage {
    pub sending_application: String,
    pub sending_facility: String,
    pub receiving_application: String,
    pub receiving_facility: String,
    /// `yyyyMMddHHmmss`
    pub timestamp: String,
    pub control_id: String,
    pub processing_id: String,
    pub version: String,
    pub accept_ack_type: String,
    pub application_ack_type: String,
    pub ack_code: String,
    pub acknowledged_control_id: String,
}

impl AckMessage {
    /// MSH and MSA segments, `\r` separated
    pub fn encode(&self) -> String {
        let fields: [&str; 16] = [
            "MSH",
            ENCODING_CHARACTERS,
            &self.sending_application,
            &self.sending_facility,
            &self.receiving_application,
            &self.receiving_facility,
            &self.timestamp,
            "",
            "ACK",
            &self.control_id,
            &self.processing_id,
            &self.version,
            "",
            "",
            &self.accept_ack_type,
            &self.application_ack_type,
        ];
        let msh = fields.join(FIELD_SEPARATOR);
        let msa: [&str; 3] = ["MSA", &self.ack_code, &self.acknowledged_control_id];
        let msa = msa.join(FIELD_SEPARATOR);
        format!("{msh}{SEGMENT_SEPARATOR}{msa}")
    }
}

impl fmt::Display for AckMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

/// Builds ACKs with the hub as sender
#[derive(Clone)]
pub struct AckGenerator {
    environment: Environment,
    clock: Clock,
    control_ids: IdSource,
}

impl fmt::Debug for AckGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AckGenerator")
            .field("environment", &self.environment)
            .finish_non_exhaustive()
    }
}

impl Default for AckGenerator {
    fn default() -> Self {
        Self::new(Environment::default())
    }
}

impl AckGenerator {
    pub fn new(environment: Environment) -> Self {
        Self {
            environment,
            clock: Arc::new(Utc::now),
            control_ids: Arc::new(|| Uuid::new_v4().to_string()),
        }
    }

    /// Replace the clock and the control id source
    pub fn with_clock<C, I>(mut self, clock: C, control_ids: I) -> Self
    where
        C: Fn() -> DateTime<Utc> + Send + Sync + 'static,
        I: Fn() -> String + Send + Sync + 'static,
    {
        self.clock = Arc::new(clock);
        self.control_ids = Arc::new(control_ids);
        self
    }

    pub fn build(&self, incoming: &str) -> AckMessage {
        let header = MessageHeader::parse(incoming);
        if header.control_id.is_empty() {
            warn!("acknowledging a message without a control id");
        }
        AckMessage {
            sending_application: HUB_APPLICATION.to_string(),
            sending_facility: HUB_FACILITY.to_string(),
            receiving_application: header.sending_application,
            receiving_facility: header.sending_facility,
            timestamp: (self.clock)().format("%Y%m%d%H%M%S").to_string(),
            control_id: (self.control_ids)(),
            processing_id: self.environment.processing_id().to_string(),
            version: ACK_VERSION.to_string(),
            accept_ack_type: NO_ACKNOWLEDGMENT.to_string(),
            application_ack_type: NO_ACKNOWLEDGMENT.to_string(),
            ack_code: COMMIT_ACCEPT.to_string(),
            acknowledged_control_id: header.control_id,
        }
    }

    pub fn generate_ack(&self, incoming: &str) -> String {
        self.build(incoming).encode()
    }
}
