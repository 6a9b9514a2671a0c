#![allow(clippy::clone_on_copy, clippy::float_cmp)]

use serde_json::json;

use super::*;

// --- FieldType serde ---

#[test]
fn type_serde_all_variants() {
    let cases = [
        (FieldType::Text, "\"text\""),
        (FieldType::Signature, "\"signature\""),
        (FieldType::Initials, "\"initials\""),
        (FieldType::Date, "\"date\""),
        (FieldType::Checkbox, "\"checkbox\""),
        (FieldType::Number, "\"number\""),
        (FieldType::Radio, "\"radio\""),
        (FieldType::Multiple, "\"multiple\""),
        (FieldType::Select, "\"select\""),
        (FieldType::Cells, "\"cells\""),
        (FieldType::Image, "\"image\""),
        (FieldType::File, "\"file\""),
    ];
    for (field_type, expected) in cases {
        assert_eq!(serde_json::to_string(&field_type).unwrap(), expected);
        let back: FieldType = serde_json::from_str(expected).unwrap();
        assert_eq!(back, field_type);
    }
}

#[test]
fn type_deserialize_unknown_rejects() {
    assert!(serde_json::from_str::<FieldType>("\"hologram\"").is_err());
}

#[test]
fn type_class_predicates() {
    assert!(FieldType::Radio.is_choice());
    assert!(FieldType::Multiple.is_choice());
    assert!(FieldType::Select.is_choice());
    assert!(!FieldType::Text.is_choice());
    assert!(FieldType::Cells.is_table());
    assert!(!FieldType::Radio.is_table());
}

// --- default options table ---

#[test]
fn simple_types_have_no_default_options() {
    for field_type in [
        FieldType::Text,
        FieldType::Signature,
        FieldType::Initials,
        FieldType::Date,
        FieldType::Checkbox,
        FieldType::Number,
        FieldType::Image,
        FieldType::File,
    ] {
        assert!(field_type.default_options().is_none());
    }
}

#[test]
fn radio_defaults_to_two_placeholders() {
    let Some(FieldOptions::Choice { options, default_value }) = FieldType::Radio.default_options()
    else {
        panic!("expected choice options");
    };
    assert_eq!(options, vec!["Option 1", "Option 2"]);
    assert!(default_value.is_none());
}

#[test]
fn multiple_and_select_default_to_three_placeholders() {
    for field_type in [FieldType::Multiple, FieldType::Select] {
        let Some(FieldOptions::Choice { options, .. }) = field_type.default_options() else {
            panic!("expected choice options");
        };
        assert_eq!(options.len(), 3);
    }
}

#[test]
fn cells_defaults_to_three_uniform_columns() {
    let Some(FieldOptions::Table { columns, widths }) = FieldType::Cells.default_options() else {
        panic!("expected table options");
    };
    assert_eq!(columns, 3);
    assert_eq!(widths.len(), 3);
    for w in widths {
        assert!((w - 1.0 / 3.0).abs() < 1e-12);
    }
}

// --- uniform_table ---

#[test]
fn uniform_table_zero_columns_is_floored_to_one() {
    let FieldOptions::Table { columns, widths } = FieldOptions::uniform_table(0) else {
        panic!("expected table options");
    };
    assert_eq!(columns, 1);
    assert_eq!(widths, vec![1.0]);
}

// --- from_stored ---

#[test]
fn from_stored_simple_type_is_none_even_with_bag() {
    let bag = json!({ "options": ["A"] });
    assert!(FieldOptions::from_stored(FieldType::Text, Some(&bag)).is_none());
}

#[test]
fn from_stored_choice_missing_bag_backfills_defaults() {
    let parsed = FieldOptions::from_stored(FieldType::Radio, None);
    assert_eq!(parsed, FieldType::Radio.default_options());
}

#[test]
fn from_stored_choice_keeps_stored_options() {
    let bag = json!({ "options": ["Yes", "No"], "defaultValue": "Yes" });
    let Some(FieldOptions::Choice { options, default_value }) =
        FieldOptions::from_stored(FieldType::Select, Some(&bag))
    else {
        panic!("expected choice options");
    };
    assert_eq!(options, vec!["Yes", "No"]);
    assert_eq!(default_value.as_deref(), Some("Yes"));
}

#[test]
fn from_stored_choice_empty_list_backfills_defaults() {
    let bag = json!({ "options": [] });
    let parsed = FieldOptions::from_stored(FieldType::Multiple, Some(&bag));
    assert_eq!(parsed, FieldType::Multiple.default_options());
}

#[test]
fn from_stored_table_partial_columns_gets_uniform_widths() {
    let bag = json!({ "columns": 4 });
    let Some(FieldOptions::Table { columns, widths }) =
        FieldOptions::from_stored(FieldType::Cells, Some(&bag))
    else {
        panic!("expected table options");
    };
    assert_eq!(columns, 4);
    assert_eq!(widths, vec![0.25; 4]);
}

#[test]
fn from_stored_table_keeps_matching_widths() {
    let bag = json!({ "columns": 2, "widths": [0.7, 0.3] });
    let Some(FieldOptions::Table { columns, widths }) =
        FieldOptions::from_stored(FieldType::Cells, Some(&bag))
    else {
        panic!("expected table options");
    };
    assert_eq!(columns, 2);
    assert_eq!(widths, vec![0.7, 0.3]);
}

#[test]
fn from_stored_table_mismatched_widths_reset_uniform() {
    let bag = json!({ "columns": 3, "widths": [0.5, 0.5] });
    let Some(FieldOptions::Table { columns, widths }) =
        FieldOptions::from_stored(FieldType::Cells, Some(&bag))
    else {
        panic!("expected table options");
    };
    assert_eq!(columns, 3);
    assert_eq!(widths.len(), 3);
}

// --- to_wire ---

#[test]
fn choice_to_wire_shape() {
    let options = FieldOptions::Choice {
        options: vec!["A".into(), "B".into()],
        default_value: Some("B".into()),
    };
    assert_eq!(options.to_wire(), json!({ "options": ["A", "B"], "defaultValue": "B" }));
}

#[test]
fn choice_to_wire_omits_absent_default() {
    let options = FieldOptions::Choice { options: vec!["A".into()], default_value: None };
    assert_eq!(options.to_wire(), json!({ "options": ["A"] }));
}

#[test]
fn table_to_wire_shape() {
    let options = FieldOptions::uniform_table(2);
    assert_eq!(options.to_wire(), json!({ "columns": 2, "widths": [0.5, 0.5] }));
}

#[test]
fn wire_round_trip_through_stored_bag() {
    let original = FieldOptions::Choice {
        options: vec!["Yes".into(), "No".into()],
        default_value: None,
    };
    let bag = original.to_wire();
    let back = FieldOptions::from_stored(FieldType::Radio, Some(&bag));
    assert_eq!(back, Some(original));
}

// --- temp ids ---

#[test]
fn server_temp_id_format() {
    assert_eq!(server_temp_id(42), "field-42");
}

#[test]
fn drawn_temp_id_has_new_prefix_and_timestamp() {
    let id = drawn_temp_id();
    let millis = id.strip_prefix("new-").and_then(|s| s.parse::<i64>().ok());
    assert!(millis.is_some_and(|ms| ms > 0), "unexpected temp id {id}");
}

#[test]
fn copy_temp_id_has_field_prefix_and_two_parts() {
    let id = copy_temp_id();
    let rest = id.strip_prefix("field-").unwrap();
    let parts: Vec<&str> = rest.split('-').collect();
    assert_eq!(parts.len(), 2, "unexpected temp id {id}");
    assert!(parts[0].parse::<i64>().is_ok());
    assert!(parts[1].parse::<u32>().is_ok());
}

#[test]
fn copy_temp_ids_are_distinct() {
    let a = copy_temp_id();
    let b = copy_temp_id();
    // Random suffix keeps same-millisecond copies apart; a collision here
    // is astronomically unlikely.
    assert_ne!(a, b);
}

// --- FieldPatch helpers ---

#[test]
fn moved_to_sets_only_origin() {
    let patch = FieldPatch::moved_to(0.2, 0.3);
    assert_eq!(patch.x, Some(0.2));
    assert_eq!(patch.y, Some(0.3));
    assert!(patch.width.is_none());
    assert!(patch.height.is_none());
    assert!(patch.name.is_none());
}

#[test]
fn resized_to_sets_full_rect() {
    let patch = FieldPatch::resized_to(crate::geom::Rect::new(0.1, 0.2, 0.3, 0.4));
    assert_eq!(patch.x, Some(0.1));
    assert_eq!(patch.y, Some(0.2));
    assert_eq!(patch.width, Some(0.3));
    assert_eq!(patch.height, Some(0.4));
}
