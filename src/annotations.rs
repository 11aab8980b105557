use crate::geometry::Point;
use crate::map::MapDocument;

/// Free-text map annotation in render space.
#[derive(Clone, Debug, PartialEq)]
pub struct Annotation {
    pub position: Point,
    pub text: String,
}

/// Every text label in the document, empty ones included.
pub fn extract_annotations(document: &MapDocument) -> Vec<Annotation> {
    document
        .text_labels
        .iter()
        .map(|(_, label)| Annotation {
            position: label.position,
            text: label.text.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn emits_every_label_with_defaults() {
        let document = MapDocument::from_value(&json!([{}, {
            "nodes": {},
            "reactions": {},
            "text_labels": {
                "1": {"x": 12.0, "y": 30.0, "text": "TCA cycle"},
                "2": {"y": 4.0},
                "3": {"text": ""}
            }
        }]))
        .unwrap();
        let annotations = extract_annotations(&document);
        assert_eq!(annotations.len(), 3);
        assert_eq!(annotations[0].position, Point::new(12.0, -30.0));
        assert_eq!(annotations[0].text, "TCA cycle");
        assert_eq!(annotations[1].position, Point::new(0.0, -4.0));
        assert_eq!(annotations[1].text, "");
        assert_eq!(annotations[2].position, Point::new(0.0, 0.0));
    }

    #[test]
    fn missing_text_labels_collection_is_empty() {
        let document = MapDocument::from_value(&json!([{}, {"nodes": {}, "reactions": {}}])).unwrap();
        assert!(extract_annotations(&document).is_empty());
    }
}
