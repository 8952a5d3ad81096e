//! HL7 2.5.1 maximum lengths
//!
//! Component lengths come from the data type definitions of chapter 2A; field
//! lengths from the segment definitions.

/// Formatted text fields are not component structured
pub const FT_MAX_LENGTH: usize = 65536;

/// Namespace ids of HD fields are limited to 20 characters
pub const HD_NAMESPACE_MAX_LENGTH: usize = 20;

/// Maximum length of each component, by composite type
pub const COMPONENT_LENGTHS: &[(&str, &[usize])] = &[
    ("CE", &[20, 199, 20, 20, 199, 20]),
    ("CWE", &[20, 199, 20, 20, 199, 20, 10, 10, 199]),
    ("CX", &[15, 1, 3, 227, 5, 227, 8, 8, 705, 705]),
    ("EI", &[199, 20, 199, 6]),
    ("EIP", &[427, 427]),
    ("HD", &[20, 199, 6]),
    ("XAD", &[184, 120, 50, 50, 12, 3, 3, 50, 20, 20, 1, 53, 26, 26]),
    (
        "XCN",
        &[15, 194, 30, 30, 20, 20, 5, 4, 227, 1, 1, 3, 5, 227, 1, 483, 53, 1, 26, 26, 199, 705, 705],
    ),
    ("XON", &[50, 20, 4, 1, 3, 227, 5, 227, 1, 20]),
    ("XPN", &[194, 30, 30, 20, 20, 6, 1, 1, 483, 53, 1, 26, 26, 199]),
    ("XTN", &[199, 3, 8, 199, 3, 5, 9, 5, 199, 4, 6, 199]),
];

/// Type and maximum length of each field, by segment
const SEGMENT_FIELDS: &[(&str, &[(&str, usize)])] = &[
    (
        "MSH",
        &[
            ("ST", 1), ("ST", 4), ("HD", 227), ("HD", 227), ("HD", 227), ("HD", 227),
            ("TS", 26), ("ST", 40), ("MSG", 15), ("ST", 20), ("PT", 3), ("VID", 60),
            ("NM", 15), ("ST", 180), ("ID", 2), ("ID", 2), ("ID", 3), ("ID", 16),
            ("CE", 250), ("ID", 20), ("EI", 427),
        ],
    ),
    (
        "PID",
        &[
            ("SI", 4), ("CX", 20), ("CX", 250), ("CX", 20), ("XPN", 250), ("XPN", 250),
            ("TS", 26), ("IS", 1), ("XPN", 250), ("CE", 250), ("XAD", 250), ("IS", 4),
            ("XTN", 250), ("XTN", 250), ("CE", 250), ("CE", 250), ("CE", 250), ("CX", 250),
            ("ST", 16), ("DLN", 25), ("CX", 250), ("CE", 250), ("ST", 250), ("ID", 1),
            ("NM", 2), ("CE", 250), ("CE", 250), ("CE", 250), ("TS", 26), ("ID", 1),
        ],
    ),
    (
        "ORC",
        &[
            ("ID", 2), ("EI", 22), ("EI", 22), ("EI", 22), ("ID", 2), ("ID", 1),
            ("TQ", 200), ("EIP", 200), ("TS", 26), ("XCN", 250), ("XCN", 250), ("XCN", 250),
            ("PL", 80), ("XTN", 250), ("TS", 26), ("CE", 250), ("CE", 250), ("CE", 250),
            ("XCN", 250), ("CE", 250), ("XON", 250), ("XAD", 250), ("XTN", 250), ("XAD", 250),
        ],
    ),
    (
        "OBR",
        &[
            ("SI", 4), ("EI", 22), ("EI", 22), ("CE", 250), ("ID", 2), ("TS", 26),
            ("TS", 26), ("TS", 26), ("CQ", 20), ("XCN", 250), ("ID", 1), ("CE", 250),
            ("ST", 300), ("TS", 26), ("SPS", 300), ("XCN", 250), ("XTN", 250), ("ST", 60),
            ("ST", 60), ("ST", 60), ("ST", 60), ("TS", 26), ("MOC", 40), ("ID", 10),
            ("ID", 1), ("PRL", 400), ("TQ", 200), ("XCN", 250), ("EIP", 200),
        ],
    ),
    (
        "OBX",
        &[
            ("SI", 4), ("ID", 2), ("CE", 250), ("ST", 20), ("varies", 99999), ("CE", 250),
            ("ST", 60), ("IS", 5), ("NM", 5), ("ID", 2), ("ID", 1), ("TS", 26),
            ("ST", 20), ("TS", 26), ("CE", 250), ("XCN", 250), ("CE", 250), ("EI", 22),
            ("TS", 26), ("", 0), ("", 0), ("", 0), ("XON", 567), ("XAD", 631),
            ("XCN", 3002),
        ],
    ),
    ("SPM", &[("SI", 4), ("EIP", 80), ("EIP", 80), ("CWE", 250)]),
    ("NTE", &[("SI", 4), ("ID", 8), ("FT", 65536), ("CE", 250)]),
];

/// HD namespace id components
pub const HD_FIELDS_LOCAL: [&str; 11] = [
    "MSH-3-1", "MSH-4-1", "OBR-3-2", "OBR-2-2", "ORC-3-2", "ORC-2-2", "ORC-4-2", "PID-3-4-1",
    "PID-3-6-1", "SPM-2-1-2", "SPM-2-2-2",
];

/// HD universal id components
pub const HD_FIELDS_UNIVERSAL: [&str; 11] = [
    "MSH-3-2", "MSH-4-2", "OBR-3-3", "OBR-2-3", "ORC-3-3", "ORC-2-3", "ORC-4-3", "PID-3-4-2",
    "PID-3-6-2", "SPM-2-1-3", "SPM-2-2-3",
];

/// A parsed field spec: `SEG-f`, `SEG-f-c` or `SEG-f-c-s`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    pub segment: String,
    pub field: usize,
    pub component: Option<usize>,
    pub sub_component: Option<usize>,
}

impl FieldPath {
    /// Parse a field spec, accepting full terser paths.
    ///
    /// Only the part after the last `/` is used and repetition indexes are
    /// dropped, so `/PATIENT_RESULT(0)/ORDER_OBSERVATION(0)/ORC-12(0)-1` is
    /// `ORC-12-1`.
    pub fn parse(path: &str) -> Option<Self> {
        let spec = normalize_field_path(path);
        let mut parts = spec.split('-');
        let segment = parts.next().filter(|s| !s.is_empty())?.to_ascii_uppercase();
        let mut numbers = parts.map(|p| p.parse::<usize>().ok().filter(|n| *n > 0));
        let field = numbers.next()??;
        let component = numbers.next().map(|n| n.ok_or(())).transpose().ok()?;
        let sub_component = numbers.next().map(|n| n.ok_or(())).transpose().ok()?;
        if numbers.next().is_some() {
            return None;
        }
        Some(Self {
            segment,
            field,
            component,
            sub_component,
        })
    }
}

/// `SEG-f[-c[-s]]` with terser prefixes and repetition indexes removed
pub fn normalize_field_path(path: &str) -> String {
    let spec = path.rsplit('/').next().unwrap_or(path);
    let mut normalized = String::with_capacity(spec.len());
    let mut depth = 0usize;
    for c in spec.trim().chars() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            c if depth == 0 => normalized.push(c),
            _ => {}
        }
    }
    normalized
}

/// Static length tables
pub struct FieldLengthTable;

impl FieldLengthTable {
    /// Component lengths of a composite type
    pub fn component_lengths(hl7_type: &str) -> Option<&'static [usize]> {
        COMPONENT_LENGTHS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(hl7_type))
            .map(|(_, lengths)| *lengths)
    }

    /// Maximum length of a component, 1-based
    pub fn component_length(hl7_type: &str, component: usize) -> Option<usize> {
        Self::component_lengths(hl7_type)?
            .get(component.checked_sub(1)?)
            .copied()
    }

    /// HL7 type and maximum length of a field
    pub fn field_definition(segment: &str, field: usize) -> Option<(&'static str, usize)> {
        SEGMENT_FIELDS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(segment))?
            .1
            .get(field.checked_sub(1)?)
            .copied()
            .filter(|(hl7_type, _)| !hl7_type.is_empty())
    }

    /// Table length for a field spec.
    ///
    /// Whole fields use the segment definition (a fixed large value for
    /// formatted text); components use the table of the field's composite
    /// type. Sub-components have no table length.
    pub fn max_length(path: &str) -> Option<usize> {
        let path = FieldPath::parse(path)?;
        let (hl7_type, field_length) = Self::field_definition(&path.segment, path.field)?;
        match (path.component, path.sub_component) {
            (None, _) if hl7_type == "FT" => Some(FT_MAX_LENGTH),
            (None, _) => Some(field_length),
            (Some(component), None) => Self::component_length(hl7_type, component),
            (Some(_), Some(_)) => None,
        }
    }

    pub fn is_hd_namespace_field(path: &str) -> bool {
        let spec = normalize_field_path(path);
        HD_FIELDS_LOCAL.iter().any(|f| f.eq_ignore_ascii_case(&spec))
    }

    pub fn is_hd_universal_field(path: &str) -> bool {
        let spec = normalize_field_path(path);
        HD_FIELDS_UNIVERSAL.iter().any(|f| f.eq_ignore_ascii_case(&spec))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("/PATIENT_RESULT(0)/ORDER_OBSERVATION(0)/ORC-12(0)-1", "ORC-12-1")]
    #[case("MSH-4-1", "MSH-4-1")]
    #[case("/PATIENT_RESULT/PATIENT/PID-3(1)-4-1", "PID-3-4-1")]
    fn test_normalize(#[case] path: &str, #[case] expected: &str) {
        assert_eq!(normalize_field_path(path), expected);
    }

    #[rstest]
    #[case("MSH-4-1", Some(20))]
    #[case("MSH-4-2", Some(199))]
    #[case("ORC-12-1", Some(15))]
    #[case("PID-5-1", Some(194))]
    #[case("OBX-23-1", Some(50))]
    #[case("SPM-4-9", Some(199))]
    #[case("PID-11", Some(250))]
    #[case("NTE-3", Some(65536))]
    #[case("PID-7-1", None)]
    #[case("PID-3-4-1", None)]
    #[case("OBX-21", None)]
    #[case("ZZZ-1", None)]
    #[case("MSH", None)]
    fn test_max_length(#[case] path: &str, #[case] expected: Option<usize>) {
        assert_eq!(FieldLengthTable::max_length(path), expected);
    }

    #[test]
    fn test_every_hd_field_is_an_hd_component() {
        for path in HD_FIELDS_LOCAL.iter().chain(HD_FIELDS_UNIVERSAL.iter()) {
            assert!(FieldPath::parse(path).is_some(), "{path}");
        }
        assert!(FieldLengthTable::is_hd_namespace_field("/MSH-4(0)-1"));
        assert!(FieldLengthTable::is_hd_universal_field("ORC-2-3"));
        assert!(!FieldLengthTable::is_hd_namespace_field("MSH-4-2"));
    }

    #[test]
    fn test_field_path_parse() {
        assert_eq!(
            FieldPath::parse("pid-3-4-1"),
            Some(FieldPath {
                segment: "PID".to_string(),
                field: 3,
                component: Some(4),
                sub_component: Some(1),
            })
        );
        assert_eq!(FieldPath::parse("PID-x"), None);
        assert_eq!(FieldPath::parse("PID-1-2-3-4"), None);
        assert_eq!(FieldPath::parse("PID-0"), None);
    }
}
