//! HL7 field values produced from a receiver configuration

// The glob import below brings `hl7_translation::core` into scope; keep the
// built-in `core` resolvable for macro expansions (rstest).
extern crate core;

use hl7_translation::hl7::ack::{COMMIT_ACCEPT, HUB_APPLICATION, HUB_FACILITY};
use hl7_translation::*;
use pretty_assertions::assert_eq;
use rstest::rstest;

const RECEIVER_CONFIG: &str = r#"{
    "truncation": {
        "truncateHDNamespaceIds": true,
        "truncateHl7Fields": ["ORC-12-1", "OBX-23-1"],
        "customLengths": {"OBX-23-1": 30}
    },
    "dateTime": {
        "timeZone": "America/Denver",
        "convertToReceiverLocalTime": true,
        "useHighPrecisionHeaderFormat": false,
        "convertPositiveOffsetToNegative": true,
        "convertTimestampToDateTime": ["OBX-14"]
    },
    "environment": "production"
}"#;

fn receiver() -> TranslationConfig {
    TranslationConfig::from_json(RECEIVER_CONFIG).unwrap()
}

#[test]
fn test_receiver_config_from_json() {
    let config = receiver();
    assert!(config.truncation.truncate_hd_namespace_ids);
    assert!(config.truncation.is_truncated("ORC-12-1"));
    assert_eq!(config.truncation.custom_lengths.get("OBX-23-1"), Some(&30));
    assert_eq!(config.date_time.time_zone, Some("America/Denver".parse().unwrap()));
    assert_eq!(config.date_time.output_format(), DateTimeFormat::Offset);
    assert_eq!(config.environment, Environment::Production);

    let err = TranslationConfig::from_json("{\"environment\": 3}").unwrap_err();
    assert!(matches!(err, TranslationError::ConfigurationError { .. }));
}

#[rstest]
#[case("MSH-4-1", "Rocky Mountain Regional Laboratory", "Rocky Mountain Regio")]
#[case("/PATIENT_RESULT(0)/ORDER_OBSERVATION(0)/OBSERVATION(0)/OBX-23(0)-1", "Rocky Mountain Regional Laboratory Services", "Rocky Mountain Regional Labora")]
#[case("ORC-12-1", "12345678901234567890", "123456789012345")]
#[case("PID-5-1-1", "A Surname Well Beyond Any Sensible Length", "A Surname Well Beyond Any Sensible Length")]
fn test_truncation_per_receiver(#[case] path: &str, #[case] value: &str, #[case] expected: &str) {
    let config = receiver();
    let truncated = Hl7Truncator::new().maybe_truncate(value, path, &config.truncation);
    assert_eq!(truncated, expected);
    assert_eq!(
        Hl7Truncator::new().maybe_truncate(&truncated, path, &config.truncation),
        truncated
    );
}

#[test]
fn test_dtm_in_receiver_zone() {
    let context = ConstantContext::with_config(receiver());
    let converter = Hl7DateTimeConverter::new();
    let collected = FhirTemporal::parse("2023-03-01T18:45:00Z").unwrap();

    assert_eq!(converter.convert(&collected, Some(&context)).unwrap(), "20230301114500-0700");
    assert_eq!(
        converter
            .convert_with_field(&collected, "/PATIENT_RESULT/ORDER_OBSERVATION/OBSERVATION/OBX-14", Some(&context))
            .unwrap(),
        "20230301114500"
    );
    assert_eq!(converter.convert(&collected, None).unwrap(), "20230301184500+0000");
}

#[test]
fn test_dtm_keeps_partial_precision() {
    let january = FhirTemporal {
        year: 2021,
        month: 0,
        day: 1,
        hour: 0,
        minute: 0,
        second: 0,
        millis: 0,
        precision: TemporalPrecision::Month,
        time_zone: None,
    };
    assert_eq!(Hl7DateTimeConverter::to_dtm(&january).unwrap(), "202101");

    let context = ConstantContext::with_config(receiver());
    let birth_date = FhirTemporal::parse("1980-07-14").unwrap();
    assert_eq!(
        Hl7DateTimeConverter::new().convert(&birth_date, Some(&context)).unwrap(),
        "19800714"
    );
}

#[test]
fn test_ack_for_incoming_message() {
    let config = receiver();
    let incoming = "MSH|^~\\&|LabSys|LabFacility|ReportStream|CDC|20230301184500||ORU^R01^ORU_R01|CTRL123|P|2.5.1\r\
PID|1||12345^^^LabFacility^MR\r\
OBX|1|CWE|94558-4^SARS-CoV-2 Ag^LN||260373001^Detected^SCT";
    let generator = AckGenerator::new(config.environment);
    let ack = generator.build(incoming);

    assert_eq!(ack.sending_application, HUB_APPLICATION);
    assert_eq!(ack.sending_facility, HUB_FACILITY);
    assert_eq!(ack.receiving_application, "LabSys");
    assert_eq!(ack.receiving_facility, "LabFacility");
    assert_eq!(ack.processing_id, "P");
    assert_eq!(ack.ack_code, COMMIT_ACCEPT);
    assert_eq!(ack.acknowledged_control_id, "CTRL123");

    let encoded = generator.generate_ack(incoming);
    let segments: Vec<&str> = encoded.split('\r').collect();
    assert_eq!(segments.len(), 2);
    let msh: Vec<&str> = segments[0].split('|').collect();
    assert_eq!(msh[2], "ReportStream");
    assert_eq!(msh[4], "LabSys");
    assert_eq!(msh[5], "LabFacility");
    assert_eq!(msh[8], "ACK");
    assert_eq!(msh[6].len(), 14);
    assert_eq!(segments[1], "MSA|CA|CTRL123");
}
