//! Shape validation of play files before typed deserialization.
//!
//! Validation runs on the raw JSON tree so that every violation is reported with the path of the
//! offending field (`$.play.timeline.keyframes[2]`), and so that nothing is deserialized into engine
//! types until the document is known to be well formed.

use std::fmt;

use serde_json::{Map, Value};

use crate::schema::version::{SNAPSHOT_SCHEMA_VERSION, TRACK_SCHEMA_VERSION};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SchemaPathElem {
    Field(&'static str),
    Key(String),
    Index(usize),
}

#[derive(Debug, Clone)]
pub(crate) struct SchemaError {
    pub(crate) path: Vec<SchemaPathElem>,
    pub(crate) message: String,
}

impl SchemaError {
    pub(crate) fn at(path: &[SchemaPathElem], message: impl Into<String>) -> Self {
        Self {
            path: path.to_vec(),
            message: message.into(),
        }
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", format_path(&self.path), self.message)
    }
}

fn format_path(path: &[SchemaPathElem]) -> String {
    let mut s = String::from("$");
    for p in path {
        match p {
            SchemaPathElem::Field(name) => {
                s.push('.');
                s.push_str(name);
            }
            SchemaPathElem::Key(key) => {
                s.push('[');
                s.push_str(&format!("{key:?}"));
                s.push(']');
            }
            SchemaPathElem::Index(i) => {
                s.push('[');
                s.push_str(&i.to_string());
                s.push(']');
            }
        }
    }
    s
}

#[derive(Debug, Clone)]
pub(crate) struct SchemaErrors {
    pub(crate) errors: Vec<SchemaError>,
}

impl SchemaErrors {
    pub(crate) fn single(path: &[SchemaPathElem], message: impl Into<String>) -> Self {
        Self {
            errors: vec![SchemaError::at(path, message)],
        }
    }

    fn from_vec(errors: Vec<SchemaError>) -> Result<(), Self> {
        if errors.is_empty() {
            Ok(())
        } else {
            Err(Self { errors })
        }
    }
}

impl fmt::Display for SchemaErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{e}")?;
        }
        Ok(())
    }
}

impl std::error::Error for SchemaErrors {}

use SchemaPathElem::{Field, Index, Key};

/// Validate the discrete-snapshot (`play-export-v1`) layout.
pub(crate) fn validate_snapshot_doc(root: &Value) -> Result<(), SchemaErrors> {
    let root = expect_root(root, SNAPSHOT_SCHEMA_VERSION)?;
    let mut errors = Vec::new();

    let Some(play) = object_at(root, "play", &[], &mut errors) else {
        return SchemaErrors::from_vec(errors);
    };
    let play_path = [Field("play")];
    expect_string(play, "name", &play_path, &mut errors);

    let entities_path = [Field("play"), Field("entities")];
    if let Some(entities) = object_at(play, "entities", &play_path, &mut errors) {
        object_at(entities, "playersById", &entities_path, &mut errors);
        if let Some(ids) = entities.get("representedPlayerIds") {
            if !ids.is_array() {
                errors.push(SchemaError::at(
                    &[Field("play"), Field("entities"), Field("representedPlayerIds")],
                    "must be an array of player ids",
                ));
            }
        }
    }

    let timeline_path = [Field("play"), Field("timeline")];
    if let Some(timeline) = object_at(play, "timeline", &play_path, &mut errors) {
        match timeline.get("keyframes") {
            Some(Value::Array(items)) => {
                for (i, v) in items.iter().enumerate() {
                    if !v.as_f64().is_some_and(f64::is_finite) {
                        errors.push(SchemaError::at(
                            &[Field("play"), Field("timeline"), Field("keyframes"), Index(i)],
                            "keyframe time must be a finite number",
                        ));
                    }
                }
            }
            Some(_) => errors.push(SchemaError::at(
                &[Field("play"), Field("timeline"), Field("keyframes")],
                "must be an array of numbers",
            )),
            None => errors.push(SchemaError::at(
                &[Field("play"), Field("timeline"), Field("keyframes")],
                "missing field",
            )),
        }
        object_at(timeline, "keyframeSnapshots", &timeline_path, &mut errors);
    }

    SchemaErrors::from_vec(errors)
}

/// Validate the continuous-track (`1.0.0`) layout.
pub(crate) fn validate_track_doc(root: &Value) -> Result<(), SchemaErrors> {
    let root = expect_root(root, TRACK_SCHEMA_VERSION)?;
    let mut errors = Vec::new();

    if let Some(play) = object_at(root, "play", &[], &mut errors) {
        expect_string(play, "name", &[Field("play")], &mut errors);
    }

    match root.get("items") {
        Some(Value::Array(items)) => {
            for (i, item) in items.iter().enumerate() {
                validate_track_item(item, i, &mut errors);
            }
        }
        Some(_) => errors.push(SchemaError::at(&[Field("items")], "must be an array")),
        None => errors.push(SchemaError::at(&[Field("items")], "missing field")),
    }

    if let Some(tracks) = object_at(root, "tracks", &[], &mut errors) {
        for (id, track) in tracks {
            if !track.is_object() {
                errors.push(SchemaError::at(
                    &[Field("tracks"), Key(id.clone())],
                    "track must be an object",
                ));
                continue;
            }
            if track.get("keyframes").is_some_and(|k| !k.is_array()) {
                errors.push(SchemaError::at(
                    &[Field("tracks"), Key(id.clone()), Field("keyframes")],
                    "must be an array",
                ));
            }
        }
    }

    if let Some(timeline) = root.get("timeline") {
        if !timeline.is_object() {
            errors.push(SchemaError::at(&[Field("timeline")], "must be an object"));
        } else if let Some(d) = timeline.get("durationMs") {
            if !d.is_number() {
                errors.push(SchemaError::at(
                    &[Field("timeline"), Field("durationMs")],
                    "must be a number",
                ));
            }
        }
    }

    SchemaErrors::from_vec(errors)
}

fn validate_track_item(item: &Value, i: usize, errors: &mut Vec<SchemaError>) {
    let path = [Field("items"), Index(i)];
    let Some(obj) = item.as_object() else {
        errors.push(SchemaError::at(&path, "item must be an object"));
        return;
    };
    expect_string(obj, "id", &path, errors);
    match obj.get("type").and_then(Value::as_str) {
        Some("player" | "ball") => {}
        Some(other) => errors.push(SchemaError::at(
            &[Field("items"), Index(i), Field("type")],
            format!("unknown item type \"{other}\" (expected \"player\" or \"ball\")"),
        )),
        None => errors.push(SchemaError::at(
            &[Field("items"), Index(i), Field("type")],
            "must be a string",
        )),
    }
    for coord in ["x", "y"] {
        if let Some(v) = obj.get(coord) {
            if !v.is_number() {
                errors.push(SchemaError::at(
                    &[Field("items"), Index(i), Field(coord)],
                    "must be a number",
                ));
            }
        }
    }
}

fn expect_root<'a>(root: &'a Value, version: &str) -> Result<&'a Map<String, Value>, SchemaErrors> {
    let Some(obj) = root.as_object() else {
        return Err(SchemaErrors::single(&[], "root must be an object"));
    };
    match obj.get("schemaVersion").and_then(Value::as_str) {
        Some(v) if v == version => Ok(obj),
        _ => Err(SchemaErrors::single(
            &[Field("schemaVersion")],
            format!("schemaVersion must be \"{version}\""),
        )),
    }
}

fn object_at<'a>(
    parent: &'a Map<String, Value>,
    field: &'static str,
    parent_path: &[SchemaPathElem],
    errors: &mut Vec<SchemaError>,
) -> Option<&'a Map<String, Value>> {
    let mut path = parent_path.to_vec();
    path.push(Field(field));
    match parent.get(field) {
        Some(Value::Object(obj)) => Some(obj),
        Some(Value::Array(_)) => {
            errors.push(SchemaError::at(&path, "must be an object, not an array"));
            None
        }
        Some(_) => {
            errors.push(SchemaError::at(&path, "must be an object"));
            None
        }
        None => {
            errors.push(SchemaError::at(&path, "missing field"));
            None
        }
    }
}

fn expect_string(
    parent: &Map<String, Value>,
    field: &'static str,
    parent_path: &[SchemaPathElem],
    errors: &mut Vec<SchemaError>,
) {
    if !parent.get(field).is_some_and(Value::is_string) {
        let mut path = parent_path.to_vec();
        path.push(Field(field));
        errors.push(SchemaError::at(&path, "must be a string"));
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schema/validate.rs"]
mod tests;
