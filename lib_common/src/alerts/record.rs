//! Typed view of one alert resource from a decoded page.

use serde_json::Value;
use thiserror::Error;

/// Alert class rendered by this client; every other class is skipped.
pub const SYSTEM_EVENT_CLASS: &str = "system_event";

/// Extraction failures for a single resource. These fail the record,
/// never the page walk.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("record field {0} is missing or has the wrong type")]
    MissingField(&'static str),

    #[error("importance {0} is outside the supported range 0-2")]
    ImportanceOutOfRange(u64),
}

/// Importance level of an alert, mapped from the wire integers 0-2.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Importance {
    Low,
    Medium,
    High,
}

impl Importance {
    pub fn from_wire(raw: u64) -> Result<Self, RecordError> {
        match raw {
            0 => Ok(Importance::Low),
            1 => Ok(Importance::Medium),
            2 => Ok(Importance::High),
            other => Err(RecordError::ImportanceOutOfRange(other)),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Importance::Low => "Low",
            Importance::Medium => "Medium",
            Importance::High => "High",
        }
    }
}

/// One system event alert, ready for rendering.
#[derive(Debug, Clone)]
pub struct EventRecord {
    pub id: String,
    pub importance: Importance,
    pub username: String,
    pub version: String,
    pub start_time: String,
    /// `None` while the alert is ongoing; the renderer substitutes the
    /// `Ongoing` sentinel in that case.
    pub stop_time: Option<String>,
    /// Related annotation URL, when the alert carries one.
    pub annotation_link: Option<String>,
}

impl EventRecord {
    /// Extract a record from one entry of a page's `data` array.
    ///
    /// Returns `Ok(None)` for resources whose alert class is not
    /// `system_event`; those are skipped without touching any other
    /// field, so a malformed non-system resource never fails.
    pub fn from_resource(resource: &Value) -> Result<Option<Self>, RecordError> {
        let attributes = resource
            .get("attributes")
            .ok_or(RecordError::MissingField("attributes"))?;

        let alert_class = attributes
            .get("alert_class")
            .and_then(Value::as_str)
            .ok_or(RecordError::MissingField("attributes.alert_class"))?;
        if alert_class != SYSTEM_EVENT_CLASS {
            return Ok(None);
        }

        let id = match resource.get("id") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => return Err(RecordError::MissingField("id")),
        };

        let importance_raw = attributes
            .get("importance")
            .and_then(Value::as_u64)
            .ok_or(RecordError::MissingField("attributes.importance"))?;
        let importance = Importance::from_wire(importance_raw)?;

        let ongoing = attributes
            .get("ongoing")
            .and_then(Value::as_bool)
            .ok_or(RecordError::MissingField("attributes.ongoing"))?;

        let start_time = attributes
            .get("start_time")
            .and_then(Value::as_str)
            .ok_or(RecordError::MissingField("attributes.start_time"))?
            .to_string();

        // stop_time only matters once the alert has ended
        let stop_time = if ongoing {
            None
        } else {
            Some(
                attributes
                    .get("stop_time")
                    .and_then(Value::as_str)
                    .ok_or(RecordError::MissingField("attributes.stop_time"))?
                    .to_string(),
            )
        };

        let subobject = attributes
            .get("subobject")
            .ok_or(RecordError::MissingField("attributes.subobject"))?;
        let username = subobject
            .get("username")
            .and_then(Value::as_str)
            .ok_or(RecordError::MissingField("attributes.subobject.username"))?
            .to_string();
        let version = subobject
            .get("version")
            .and_then(Value::as_str)
            .ok_or(RecordError::MissingField("attributes.subobject.version"))?
            .to_string();

        let annotation_link = resource
            .get("relationships")
            .and_then(|r| r.get("annotations"))
            .and_then(|a| a.get("links"))
            .and_then(|l| l.get("related"))
            .and_then(Value::as_str)
            .map(str::to_string);

        Ok(Some(EventRecord {
            id,
            importance,
            username,
            version,
            start_time,
            stop_time,
            annotation_link,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn system_event(extra: Value) -> Value {
        let mut resource = json!({
            "id": "101",
            "attributes": {
                "alert_class": "system_event",
                "importance": 1,
                "ongoing": false,
                "start_time": "2023-02-01T10:00:00+00:00",
                "stop_time": "2023-02-01T10:05:00+00:00",
                "subobject": {"username": "admin", "version": "9.0"}
            }
        });
        if let (Some(target), Some(patch)) = (resource.as_object_mut(), extra.as_object()) {
            for (key, value) in patch {
                target.insert(key.clone(), value.clone());
            }
        }
        resource
    }

    #[test]
    fn system_event_resources_extract_fully() {
        let record = EventRecord::from_resource(&system_event(json!({})))
            .unwrap()
            .expect("system_event must produce a record");
        assert_eq!(record.id, "101");
        assert_eq!(record.importance, Importance::Medium);
        assert_eq!(record.username, "admin");
        assert_eq!(record.version, "9.0");
        assert_eq!(record.stop_time.as_deref(), Some("2023-02-01T10:05:00+00:00"));
        assert!(record.annotation_link.is_none());
    }

    #[test]
    fn other_alert_classes_are_skipped() {
        let resource = json!({
            "id": "7",
            "attributes": {"alert_class": "dos"}
        });
        assert!(EventRecord::from_resource(&resource).unwrap().is_none());
    }

    #[test]
    fn ongoing_alerts_carry_no_stop_time() {
        let mut resource = system_event(json!({}));
        resource["attributes"]["ongoing"] = json!(true);
        resource["attributes"]["stop_time"] = json!("ignored anyway");

        let record = EventRecord::from_resource(&resource).unwrap().unwrap();
        assert!(record.stop_time.is_none());
    }

    #[test]
    fn importance_maps_to_exactly_three_labels() {
        assert_eq!(Importance::from_wire(0).unwrap().label(), "Low");
        assert_eq!(Importance::from_wire(1).unwrap().label(), "Medium");
        assert_eq!(Importance::from_wire(2).unwrap().label(), "High");
    }

    #[test]
    fn out_of_range_importance_fails_the_record() {
        let mut resource = system_event(json!({}));
        resource["attributes"]["importance"] = json!(5);

        let err = EventRecord::from_resource(&resource).unwrap_err();
        assert!(matches!(err, RecordError::ImportanceOutOfRange(5)));
    }

    #[test]
    fn annotation_link_is_read_from_relationships() {
        let resource = system_event(json!({
            "relationships": {
                "annotations": {
                    "links": {"related": "https://leader.example.com/api/sp/alerts/101/annotations/"}
                }
            }
        }));
        let record = EventRecord::from_resource(&resource).unwrap().unwrap();
        assert_eq!(
            record.annotation_link.as_deref(),
            Some("https://leader.example.com/api/sp/alerts/101/annotations/")
        );
    }

    #[test]
    fn partial_relationship_trees_mean_no_annotation() {
        let resource = system_event(json!({
            "relationships": {"annotations": {}}
        }));
        let record = EventRecord::from_resource(&resource).unwrap().unwrap();
        assert!(record.annotation_link.is_none());
    }
}
