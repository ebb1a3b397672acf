//! Annotation lookup for alerts that reference one.
//!
//! Each lookup is an independent fetch against the record's related
//! link; identical links on different records are fetched again. A
//! failed lookup degrades to a visible marker instead of aborting the
//! page walk.

use serde_json::Value;
use tracing::warn;

use super::record::EventRecord;
use crate::retrieve::decode::fetch_document;
use crate::retrieve::transport::Transport;

/// Rendered when an alert has no annotation relationship.
pub const NO_ANNOTATION: &str = "None";

/// Rendered when the annotation lookup fails; the record still renders.
pub const ANNOTATION_UNAVAILABLE: &str = "<unavailable>";

/// Resolve the annotation text for one record.
pub fn resolve<T>(transport: &T, record: &EventRecord) -> String
where
    T: Transport + ?Sized,
{
    let Some(link) = record.annotation_link.as_deref() else {
        return NO_ANNOTATION.to_string();
    };

    match fetch_document(transport, link) {
        Ok(document) => match annotation_text(&document) {
            Some(text) => text.to_string(),
            None => {
                warn!(
                    "annotation document for alert {} has no usable text entry ({})",
                    record.id, link
                );
                ANNOTATION_UNAVAILABLE.to_string()
            }
        },
        Err(e) => {
            warn!("annotation lookup for alert {} failed: {}", record.id, e);
            ANNOTATION_UNAVAILABLE.to_string()
        }
    }
}

/// First annotation's text, if the document carries one.
fn annotation_text(document: &Value) -> Option<&str> {
    document
        .get("data")?
        .get(0)?
        .get("attributes")?
        .get("text")?
        .as_str()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn first_data_entry_supplies_the_text() {
        let document = json!({
            "data": [
                {"attributes": {"text": "rebooted by admin"}},
                {"attributes": {"text": "second entry ignored"}}
            ]
        });
        assert_eq!(annotation_text(&document), Some("rebooted by admin"));
    }

    #[test]
    fn empty_data_array_yields_no_text() {
        let document = json!({"data": []});
        assert_eq!(annotation_text(&document), None);
    }

    #[test]
    fn missing_text_attribute_yields_no_text() {
        let document = json!({"data": [{"attributes": {}}]});
        assert_eq!(annotation_text(&document), None);
    }
}
