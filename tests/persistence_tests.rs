//! Extended-data round-trips through the public API, including damaged
//! records.

use eskdraft::notification::NotificationType;
use eskdraft::xdata::{from_xdata, to_xdata, XDataValue, XDATA_APP_NAME};
use eskdraft::{DraftError, EntityKind, ParamValue, SmartEntity, Vector3};

fn customized(kind: EntityKind) -> SmartEntity {
    let mut e = SmartEntity::new(kind);
    e.insertion_point = Vector3::new(5.0, -3.0, 0.0);
    e.end_point = Vector3::new(105.0, 47.0, 0.0);
    e.set_annotation_scale(2.5);
    e.style_name = "site plan".to_string();
    // tweak the first real parameter so defaults alone do not pass
    if let Some(spec) = e
        .params
        .schema()
        .iter()
        .find(|s| matches!(s.kind, eskdraft::params::schema::ParamKind::Real))
    {
        let value = e.params.real(spec.name).unwrap();
        e.params
            .set(spec.name, ParamValue::Real(value + 1.0))
            .unwrap();
    }
    e.update_entities().unwrap();
    e
}

#[test]
fn every_family_roundtrips_with_custom_state() {
    for kind in EntityKind::ALL {
        let original = customized(kind);
        let restored = from_xdata(&to_xdata(&original)).unwrap();
        assert_eq!(restored.kind(), kind);
        assert_eq!(restored.insertion_point, original.insertion_point);
        assert_eq!(restored.end_point, original.end_point);
        assert_eq!(restored.annotation_scale(), 2.5);
        assert_eq!(restored.style_name, "site plan");
        assert_eq!(restored.params, original.params);
        assert_eq!(restored.entities(), original.entities(), "{kind:?}");
    }
}

#[test]
fn middle_points_and_reversal_roundtrip() {
    let mut e = SmartEntity::new(EntityKind::LetterLine);
    e.end_point = Vector3::new(200.0, 0.0, 0.0);
    e.middle_points.push(Vector3::new(80.0, 40.0, 0.0));
    e.middle_points.push(Vector3::new(140.0, -10.0, 0.0));
    e.direction_reversed = true;
    e.update_entities().unwrap();

    let restored = from_xdata(&to_xdata(&e)).unwrap();
    assert_eq!(restored.middle_points, e.middle_points);
    assert!(restored.direction_reversed);
}

#[test]
fn record_head_identifies_version_and_kind() {
    let e = customized(EntityKind::NodeLabel);
    let record = to_xdata(&e);
    assert_eq!(record.application_name, XDATA_APP_NAME);
    assert_eq!(record.values[0], XDataValue::Integer16(1));
    assert_eq!(
        record.values[1],
        XDataValue::String("NODELABEL".to_string())
    );
}

#[test]
fn truncated_parameter_tail_falls_back_to_defaults() {
    let original = customized(EntityKind::GroundLine);
    let mut record = to_xdata(&original);
    let param_count = original.params.len();
    record.values.truncate(record.values.len() - param_count);

    let restored = from_xdata(&record).unwrap();
    assert!(restored
        .notifications()
        .has_type(NotificationType::Recovered));
    // control points survive, parameters are back at schema defaults
    assert_eq!(restored.end_point, original.end_point);
    let defaults = SmartEntity::new(EntityKind::GroundLine);
    assert_eq!(restored.params, defaults.params);
}

#[test]
fn record_without_any_body_still_loads() {
    let mut record = to_xdata(&customized(EntityKind::ThickArrow));
    record.values.truncate(2); // version + kind only
    let restored = from_xdata(&record).unwrap();
    assert_eq!(restored.kind(), EntityKind::ThickArrow);
    assert!(restored
        .notifications()
        .has_type(NotificationType::Recovered));
    // end falls back to the sentinel; geometry previews instead of failing
    assert!(restored.end_is_unset());
    assert!(!restored.entities().is_empty());
}

#[test]
fn future_version_is_rejected() {
    let mut record = to_xdata(&customized(EntityKind::BreakLine));
    record.values[0] = XDataValue::Integer16(2);
    assert!(matches!(
        from_xdata(&record),
        Err(DraftError::UnsupportedVersion(2))
    ));
}

#[test]
fn unknown_kind_is_rejected() {
    let mut record = to_xdata(&customized(EntityKind::BreakLine));
    record.values[1] = XDataValue::String("TITLEBLOCK".to_string());
    assert!(matches!(
        from_xdata(&record),
        Err(DraftError::UnknownKind(tag)) if tag == "TITLEBLOCK"
    ));
}
