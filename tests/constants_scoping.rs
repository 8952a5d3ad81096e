//! Constant contexts shared between sibling schema elements

use hl7_translation::*;
use pretty_assertions::assert_eq;

fn root_context() -> ConstantContext {
    ConstantContext::new()
        .add_constants([
            ("rsext", "'https://reportstream.cdc.gov/fhir/StructureDefinition/'"),
            ("hl7Version", "2.5.1"),
            ("setId", "3"),
            ("greeting", "Hello %{name}"),
            ("name", "World"),
        ])
        .unwrap()
}

#[test]
fn test_sibling_scopes_are_isolated() {
    let root = root_context();
    let first = root.add_constant("orderIndex", "1").unwrap();
    let second = root.add_constant("orderIndex", "2").unwrap();

    assert_eq!(first.get("orderIndex"), Some("1"));
    assert_eq!(second.get("orderIndex"), Some("2"));
    assert_eq!(root.get("orderIndex"), None);
    assert_eq!(root.len(), 5);
}

#[test]
fn test_empty_extension_shares_constants() {
    let root = root_context();
    let same = root.add_constants(Vec::<(String, String)>::new()).unwrap();
    assert!(same.shares_constants_with(&root));
    let extended = root.add_constant("x", "y").unwrap();
    assert!(!extended.shares_constants_with(&root));
}

#[test]
fn test_reserved_names_are_rejected() {
    let root = root_context();
    for name in ["resource", "rootResource", "`vs-loinc", "`ext-foo"] {
        let err = root.add_constant(name, "value").unwrap_err();
        assert!(
            matches!(err, TranslationError::ReservedConstantName { .. }),
            "{name}: {err:?}"
        );
    }
}

#[test]
fn test_substitution_through_scopes() {
    let substitutor = ConstantSubstitutor::new();
    let root = root_context();
    let child = root.add_constant("name", "Child").unwrap();

    assert_eq!(substitutor.replace("%{greeting}!", Some(&root)).unwrap(), "Hello World!");
    assert_eq!(substitutor.replace("%{greeting}!", Some(&child)).unwrap(), "Hello Child!");
    assert_eq!(
        substitutor.replace("MSH-12 is %{hl7Version}, %%{escaped}", Some(&root)).unwrap(),
        "MSH-12 is 2.5.1, %{escaped}"
    );
    assert!(matches!(
        substitutor.replace("%{missing}", Some(&root)),
        Err(TranslationError::UnresolvedConstant { .. })
    ));
    assert_eq!(substitutor.replace("no tokens", None).unwrap(), "no tokens");
}

#[test]
fn test_resolver_reads_scope_values() {
    let resolver = PathConstantResolver::new();
    let root = root_context();

    assert_eq!(
        resolver.resolve_constant(&root, "`rsext-patient-notes`"),
        Some(TranslationValue::string(
            "https://reportstream.cdc.gov/fhir/StructureDefinition/patient-notes"
        ))
    );
    assert_eq!(resolver.resolve_constant(&root, "setId"), Some(TranslationValue::Integer(3)));
    assert_eq!(
        resolver.resolve_constant(&root, "hl7Version"),
        Some(TranslationValue::string("2.5.1"))
    );
    assert_eq!(resolver.resolve_constant(&root, "unbound"), None);
}

#[test]
fn test_append_index_travels_with_scope() {
    let root = root_context();
    let scoped = root.with_append_to_index(4);
    assert_eq!(scoped.append_to_index(), Some(4));
    assert_eq!(root.append_to_index(), None);
    assert_eq!(scoped.get("hl7Version"), Some("2.5.1"));
}
