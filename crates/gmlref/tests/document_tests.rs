//! End-to-end document loading tests

use gmlref::readers::JsonReader;
use gmlref::*;
use pretty_assertions::assert_eq;

fn load(source: &str) -> LoadedDocument {
    load_str(&JsonReader::new(), source, SessionConfig::default()).unwrap()
}

#[test]
fn test_dangling_set_is_exactly_unparsed_ids() {
    let doc = load(
        r##"{ "features": [
            { "id": "f1", "geometries": { "at": { "href": "#A" } } },
            { "id": "f2", "geometries": { "at": { "href": "#B" } } },
            { "id": "f3", "geometries": { "at": {
                "type": "Point", "id": "A", "coordinates": [1, 1] } } }
        ] }"##,
    );

    assert_eq!(doc.outcome.dangling_ids(), vec!["B"]);
    assert_eq!(doc.outcome.resolved, 1);

    let f1 = doc.feature("f1").unwrap().geometry("at").unwrap();
    assert_eq!(f1.envelope().unwrap().min(), &[1.0, 1.0]);

    let f2 = doc.feature("f2").unwrap().geometry("at").unwrap();
    assert_eq!(
        f2.crs(),
        Err(RefError::UnresolvedReference {
            id: "B".to_string()
        })
    );
}

#[test]
fn test_predicate_between_two_references_matches_targets() {
    let doc = load(
        r##"{ "features": [
            { "id": "site", "geometries": {
                "parcel": { "href": "#parcel" },
                "well": { "href": "doc.json#well" } } },
            { "id": "defs", "geometries": {
                "parcel": { "type": "Rectangle", "id": "parcel",
                            "lower": [0, 0], "upper": [10, 10] },
                "well": { "type": "Point", "id": "well", "coordinates": [3, 4] } } }
        ] }"##,
    );
    assert!(doc.outcome.is_clean());

    let site = doc.feature("site").unwrap();
    let defs = doc.feature("defs").unwrap();
    let (parcel_ref, well_ref) = (site.geometry("parcel").unwrap(), site.geometry("well").unwrap());
    let (parcel, well) = (defs.geometry("parcel").unwrap(), defs.geometry("well").unwrap());

    assert_eq!(
        parcel_ref.contains(well_ref.as_ref()),
        parcel.contains(well.as_ref())
    );
    assert_eq!(
        well_ref.is_within(parcel_ref.as_ref()),
        well.is_within(parcel.as_ref())
    );
    assert_eq!(
        well_ref.contains(parcel_ref.as_ref()),
        well.contains(parcel.as_ref())
    );
    assert_eq!(parcel_ref.contains(well_ref.as_ref()), Ok(true));
    assert_eq!(well_ref.contains(parcel_ref.as_ref()), Ok(false));
}

#[test]
fn test_backward_and_repeated_references() {
    let doc = load(
        r##"{ "features": [
            { "id": "a", "geometries": { "at": {
                "type": "Point", "id": "p", "coordinates": [2, 3] } } },
            { "id": "b", "geometries": { "at": { "href": "#p" } } },
            { "id": "c", "geometries": { "at": { "href": "#q" } } },
            { "id": "d", "geometries": { "at": { "href": "#q" } } },
            { "id": "e", "geometries": { "at": {
                "type": "Point", "id": "q", "coordinates": [4, 5] } } }
        ] }"##,
    );
    assert!(doc.outcome.is_clean());
    // one backward reference plus one shared forward placeholder
    assert_eq!(doc.outcome.resolved, 2);

    let c = doc.feature("c").unwrap().geometry("at").unwrap();
    let d = doc.feature("d").unwrap().geometry("at").unwrap();
    assert!(std::sync::Arc::ptr_eq(c, d));
    assert_eq!(c.envelope().unwrap().min(), &[4.0, 5.0]);
}

#[test]
fn test_properties_are_visible_through_reference() {
    let doc = load(
        r##"{ "features": [
            { "id": "a", "geometries": { "at": { "href": "#p" } } },
            { "id": "b", "geometries": { "at": {
                "type": "Point", "id": "p", "coordinates": [0, 0],
                "description": "survey marker", "names": ["M-12"] } } }
        ] }"##,
    );
    let at = doc.feature("a").unwrap().geometry("at").unwrap();
    assert_eq!(
        at.standard_properties().unwrap(),
        StandardProperties::with_description("survey marker").with_name("M-12")
    );
}

#[test]
fn test_empty_document() {
    let doc = load("{}");
    assert!(doc.features.is_empty());
    assert!(doc.outcome.is_clean());
    assert_eq!(doc.outcome.resolved, 0);
}

#[test]
fn test_strict_loading_fails_on_dangling() {
    let doc = load(r##"{ "features": [ { "id": "f", "geometries": { "at": { "href": "#x" } } } ] }"##);
    assert_eq!(
        doc.outcome.into_result(),
        Err(RefError::DanglingReferences {
            ids: vec!["x".to_string()]
        })
    );
}

#[test]
fn test_unknown_feature_field_is_rejected() {
    let err = load_str(
        &JsonReader::new(),
        r#"{ "features": [ { "id": "f", "colour": "red" } ] }"#,
        SessionConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, RefError::Document(_)));
}

#[test]
fn test_empty_fragment_surfaces_as_dangling() {
    let doc = load(r##"{ "features": [ { "id": "f", "geometries": { "at": { "href": "doc.json#" } } } ] }"##);
    assert_eq!(doc.outcome.dangling_ids(), vec![""]);
}
