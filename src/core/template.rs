//! core::template
//!
//! Path templates: definitions like
//! `sequences/{Sequence}/{Shot}/{level_sequence}[_{name}].v{version}.{ue_mov_ext}`
//! turned into paths by substituting field values.
//!
//! # Syntax
//!
//! - `{key}` - a placeholder, required unless the key definition has a default
//! - `[...]` - an optional group, rendered only when every key inside it has
//!   a value; groups do not nest
//! - anything else is literal text
//!
//! # Keys
//!
//! Key definitions give a key its kind (`str` or `int`), an optional
//! `format_spec` (zero-padded width for ints, e.g. `"03"`), and an optional
//! default. Keys without a definition behave as plain strings.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from template parsing and application.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("invalid template '{template}': {message}")]
    Parse { template: String, message: String },

    #[error("missing keys required for the template '{template}': {}", keys.join(", "))]
    MissingKeys { template: String, keys: Vec<String> },

    #[error("value for key '{key}' is not a valid {expected}")]
    KindMismatch { key: String, expected: &'static str },

    #[error("unknown template: {0}")]
    UnknownTemplate(String),
}

/// A template field value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Int(i64),
    Str(String),
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Str(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Str(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Int(value)
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        FieldValue::Int(i64::from(value))
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Int(v) => write!(f, "{}", v),
            FieldValue::Str(s) => write!(f, "{}", s),
        }
    }
}

/// Field values keyed by template key name.
pub type Fields = BTreeMap<String, FieldValue>;

/// Kind of a template key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyKind {
    #[default]
    Str,
    Int,
}

/// Definition of a template key.
///
/// # Example
///
/// ```toml
/// [templates.keys.version]
/// type = "int"
/// format_spec = "03"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TemplateKey {
    #[serde(rename = "type")]
    pub kind: KeyKind,
    pub format_spec: Option<String>,
    pub default: Option<FieldValue>,
}

impl TemplateKey {
    /// Check the format spec is a plain width, optionally zero-prefixed.
    pub fn validate(&self, name: &str) -> Result<(), String> {
        if let Some(spec) = &self.format_spec {
            if spec.is_empty() || !spec.chars().all(|c| c.is_ascii_digit()) {
                return Err(format!(
                    "key '{}' has invalid format_spec '{}', expected digits like \"03\"",
                    name, spec
                ));
            }
            if self.kind != KeyKind::Int {
                return Err(format!("key '{}' has a format_spec but is not an int", name));
            }
        }
        Ok(())
    }

    fn render(&self, name: &str, value: &FieldValue) -> Result<String, TemplateError> {
        match self.kind {
            KeyKind::Str => Ok(value.to_string()),
            KeyKind::Int => {
                let number = match value {
                    FieldValue::Int(v) => *v,
                    FieldValue::Str(s) => {
                        s.trim().parse::<i64>().map_err(|_| TemplateError::KindMismatch {
                            key: name.to_string(),
                            expected: "int",
                        })?
                    }
                };
                Ok(match &self.format_spec {
                    Some(spec) => {
                        let width: usize = spec.parse().unwrap_or(0);
                        if spec.starts_with('0') {
                            format!("{:0width$}", number, width = width)
                        } else {
                            format!("{:width$}", number, width = width)
                        }
                    }
                    None => number.to_string(),
                })
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Key(String),
    Optional(Vec<Segment>),
}

/// A parsed path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    name: String,
    definition: String,
    segments: Vec<Segment>,
}

impl Template {
    /// Parse a template definition.
    ///
    /// # Example
    ///
    /// ```
    /// use shotpath::core::template::{Fields, Template};
    /// use std::collections::BTreeMap;
    ///
    /// let template = Template::parse("movie", "{Shot}[_{name}].mov").unwrap();
    ///
    /// let mut fields = Fields::new();
    /// fields.insert("Shot".into(), "SH010".into());
    /// let path = template.apply_fields(&fields, &BTreeMap::new()).unwrap();
    /// assert_eq!(path, "SH010.mov");
    /// ```
    pub fn parse(name: &str, definition: &str) -> Result<Self, TemplateError> {
        let error = |message: &str| TemplateError::Parse {
            template: name.to_string(),
            message: message.to_string(),
        };

        let mut top: Vec<Segment> = Vec::new();
        let mut group: Option<Vec<Segment>> = None;
        let mut literal = String::new();
        let mut chars = definition.chars();

        while let Some(c) = chars.next() {
            match c {
                '{' => {
                    let mut key = String::new();
                    let mut closed = false;
                    for k in chars.by_ref() {
                        if k == '}' {
                            closed = true;
                            break;
                        }
                        if matches!(k, '{' | '[' | ']') {
                            return Err(error("unexpected bracket inside key"));
                        }
                        key.push(k);
                    }
                    if !closed {
                        return Err(error("unterminated '{'"));
                    }
                    let key = key.trim();
                    if key.is_empty() {
                        return Err(error("empty key"));
                    }
                    let target = group.as_mut().unwrap_or(&mut top);
                    flush_literal(&mut literal, target);
                    target.push(Segment::Key(key.to_string()));
                }
                '}' => return Err(error("unmatched '}'")),
                '[' => {
                    if group.is_some() {
                        return Err(error("optional groups cannot nest"));
                    }
                    flush_literal(&mut literal, &mut top);
                    group = Some(Vec::new());
                }
                ']' => {
                    let Some(mut segments) = group.take() else {
                        return Err(error("unmatched ']'"));
                    };
                    flush_literal(&mut literal, &mut segments);
                    top.push(Segment::Optional(segments));
                }
                other => literal.push(other),
            }
        }

        if group.is_some() {
            return Err(error("unterminated '['"));
        }
        flush_literal(&mut literal, &mut top);

        Ok(Self {
            name: name.to_string(),
            definition: definition.to_string(),
            segments: top,
        })
    }

    /// Template name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw definition string.
    pub fn definition(&self) -> &str {
        &self.definition
    }

    /// Every key the template mentions, in definition order, without
    /// duplicates.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys = Vec::new();
        for segment in &self.segments {
            collect_keys(segment, &mut keys);
        }
        keys
    }

    /// Required keys that have neither a field value nor a default.
    pub fn missing_keys(&self, fields: &Fields, key_defs: &BTreeMap<String, TemplateKey>) -> Vec<String> {
        let mut missing: Vec<String> = Vec::new();
        for segment in &self.segments {
            if let Segment::Key(key) = segment {
                if lookup(key, fields, key_defs).is_none() && !missing.contains(key) {
                    missing.push(key.clone());
                }
            }
        }
        missing
    }

    /// Render the template with the given fields.
    ///
    /// # Errors
    ///
    /// Returns `TemplateError::MissingKeys` listing every required key
    /// without a value, or `TemplateError::KindMismatch` when a value does
    /// not fit its key's kind.
    pub fn apply_fields(
        &self,
        fields: &Fields,
        key_defs: &BTreeMap<String, TemplateKey>,
    ) -> Result<String, TemplateError> {
        let missing = self.missing_keys(fields, key_defs);
        if !missing.is_empty() {
            return Err(TemplateError::MissingKeys {
                template: self.name.clone(),
                keys: missing,
            });
        }

        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Key(key) => out.push_str(&render_key(key, fields, key_defs)?),
                Segment::Optional(inner) => {
                    let complete = inner.iter().all(|s| match s {
                        Segment::Key(key) => lookup(key, fields, key_defs).is_some(),
                        _ => true,
                    });
                    if !complete {
                        continue;
                    }
                    for s in inner {
                        match s {
                            Segment::Literal(text) => out.push_str(text),
                            Segment::Key(key) => out.push_str(&render_key(key, fields, key_defs)?),
                            Segment::Optional(_) => {}
                        }
                    }
                }
            }
        }
        Ok(out)
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Template {}: {}>", self.name, self.definition)
    }
}

fn flush_literal(literal: &mut String, target: &mut Vec<Segment>) {
    if !literal.is_empty() {
        target.push(Segment::Literal(std::mem::take(literal)));
    }
}

fn collect_keys<'a>(segment: &'a Segment, keys: &mut Vec<&'a str>) {
    match segment {
        Segment::Literal(_) => {}
        Segment::Key(key) => {
            if !keys.contains(&key.as_str()) {
                keys.push(key);
            }
        }
        Segment::Optional(inner) => inner.iter().for_each(|s| collect_keys(s, keys)),
    }
}

fn lookup<'a>(
    key: &str,
    fields: &'a Fields,
    key_defs: &'a BTreeMap<String, TemplateKey>,
) -> Option<&'a FieldValue> {
    fields
        .get(key)
        .or_else(|| key_defs.get(key).and_then(|def| def.default.as_ref()))
}

fn render_key(
    key: &str,
    fields: &Fields,
    key_defs: &BTreeMap<String, TemplateKey>,
) -> Result<String, TemplateError> {
    let value = lookup(key, fields, key_defs).ok_or_else(|| TemplateError::MissingKeys {
        template: String::new(),
        keys: vec![key.to_string()],
    })?;
    match key_defs.get(key) {
        Some(def) => def.render(key, value),
        None => Ok(value.to_string()),
    }
}

/// Named templates sharing one set of key definitions.
#[derive(Debug, Clone, Default)]
pub struct TemplateSet {
    keys: BTreeMap<String, TemplateKey>,
    templates: BTreeMap<String, Template>,
}

impl TemplateSet {
    /// Parse every path definition.
    pub fn new(
        keys: BTreeMap<String, TemplateKey>,
        paths: &BTreeMap<String, String>,
    ) -> Result<Self, TemplateError> {
        let templates = paths
            .iter()
            .map(|(name, definition)| Ok((name.clone(), Template::parse(name, definition)?)))
            .collect::<Result<_, TemplateError>>()?;
        Ok(Self { keys, templates })
    }

    /// Look up a template by name.
    pub fn get(&self, name: &str) -> Option<&Template> {
        self.templates.get(name)
    }

    /// Look up a template by name, failing if it does not exist.
    pub fn require(&self, name: &str) -> Result<&Template, TemplateError> {
        self.get(name)
            .ok_or_else(|| TemplateError::UnknownTemplate(name.to_string()))
    }

    /// Key definitions.
    pub fn keys(&self) -> &BTreeMap<String, TemplateKey> {
        &self.keys
    }

    /// Missing keys for a named template.
    pub fn missing_keys(&self, name: &str, fields: &Fields) -> Result<Vec<String>, TemplateError> {
        Ok(self.require(name)?.missing_keys(fields, &self.keys))
    }

    /// Render a named template.
    pub fn apply(&self, name: &str, fields: &Fields) -> Result<String, TemplateError> {
        self.require(name)?.apply_fields(fields, &self.keys)
    }

    /// Template names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, FieldValue)]) -> Fields {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn version_key() -> BTreeMap<String, TemplateKey> {
        let mut keys = BTreeMap::new();
        keys.insert(
            "version".to_string(),
            TemplateKey {
                kind: KeyKind::Int,
                format_spec: Some("03".into()),
                default: None,
            },
        );
        keys
    }

    #[test]
    fn parse_and_list_keys() {
        let t = Template::parse("t", "seq/{Sequence}/{Shot}/{Shot}_v{version}[.{ext}]").unwrap();
        assert_eq!(t.keys(), vec!["Sequence", "Shot", "version", "ext"]);
    }

    #[test]
    fn parse_errors() {
        for bad in ["{open", "close}", "{}", "[a[b]]", "[x", "x]", "{a[b}"] {
            assert!(
                matches!(Template::parse("t", bad), Err(TemplateError::Parse { .. })),
                "{bad} should fail to parse"
            );
        }
    }

    #[test]
    fn apply_pads_int_keys() {
        let t = Template::parse("t", "{name}_v{version}.mov").unwrap();
        let f = fields(&[("name", "SH010".into()), ("version", 7i64.into())]);
        assert_eq!(t.apply_fields(&f, &version_key()).unwrap(), "SH010_v007.mov");
    }

    #[test]
    fn int_key_accepts_numeric_string() {
        let t = Template::parse("t", "v{version}").unwrap();
        let f = fields(&[("version", "12".into())]);
        assert_eq!(t.apply_fields(&f, &version_key()).unwrap(), "v012");
    }

    #[test]
    fn int_key_rejects_text() {
        let t = Template::parse("t", "v{version}").unwrap();
        let f = fields(&[("version", "latest".into())]);
        assert_eq!(
            t.apply_fields(&f, &version_key()),
            Err(TemplateError::KindMismatch {
                key: "version".into(),
                expected: "int"
            })
        );
    }

    #[test]
    fn missing_keys_reported_in_order() {
        let t = Template::parse("movie", "{Sequence}/{Shot}/{name}[_{extra}]").unwrap();
        let f = fields(&[("Shot", "SH010".into())]);

        assert_eq!(t.missing_keys(&f, &BTreeMap::new()), vec!["Sequence", "name"]);
        let err = t.apply_fields(&f, &BTreeMap::new()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "missing keys required for the template 'movie': Sequence, name"
        );
    }

    #[test]
    fn optional_group_skipped_when_incomplete() {
        let t = Template::parse("t", "{name}[_{variant}].fbx").unwrap();
        let f = fields(&[("name", "Chair".into())]);
        assert_eq!(t.apply_fields(&f, &BTreeMap::new()).unwrap(), "Chair.fbx");

        let f = fields(&[("name", "Chair".into()), ("variant", "red".into())]);
        assert_eq!(t.apply_fields(&f, &BTreeMap::new()).unwrap(), "Chair_red.fbx");
    }

    #[test]
    fn defaults_fill_missing_keys() {
        let t = Template::parse("t", "{name}.{ext}").unwrap();
        let mut keys = BTreeMap::new();
        keys.insert(
            "ext".to_string(),
            TemplateKey {
                default: Some("mov".into()),
                ..Default::default()
            },
        );
        let f = fields(&[("name", "SH010".into())]);

        assert!(t.missing_keys(&f, &keys).is_empty());
        assert_eq!(t.apply_fields(&f, &keys).unwrap(), "SH010.mov");
    }

    #[test]
    fn format_spec_validation() {
        let good = TemplateKey {
            kind: KeyKind::Int,
            format_spec: Some("04".into()),
            default: None,
        };
        assert!(good.validate("version").is_ok());

        let bad = TemplateKey {
            kind: KeyKind::Int,
            format_spec: Some("%03d".into()),
            default: None,
        };
        assert!(bad.validate("version").is_err());

        let on_str = TemplateKey {
            kind: KeyKind::Str,
            format_spec: Some("03".into()),
            default: None,
        };
        assert!(on_str.validate("name").is_err());
    }

    #[test]
    fn template_set_lookup() {
        let mut paths = BTreeMap::new();
        paths.insert("movie".to_string(), "{name}_v{version}.mov".to_string());
        let set = TemplateSet::new(version_key(), &paths).unwrap();

        let f = fields(&[("name", "SH010".into()), ("version", 2i64.into())]);
        assert_eq!(set.apply("movie", &f).unwrap(), "SH010_v002.mov");
        assert_eq!(
            set.apply("nope", &f),
            Err(TemplateError::UnknownTemplate("nope".into()))
        );
        assert_eq!(set.names().collect::<Vec<_>>(), vec!["movie"]);
    }

    #[test]
    fn template_set_rejects_bad_definition() {
        let mut paths = BTreeMap::new();
        paths.insert("broken".to_string(), "{name".to_string());
        assert!(TemplateSet::new(BTreeMap::new(), &paths).is_err());
    }

    #[test]
    fn field_values_deserialize_untagged() {
        let f: Fields = serde_json::from_str(r#"{"Shot":"SH010","version":3}"#).unwrap();
        assert_eq!(f["Shot"], FieldValue::Str("SH010".into()));
        assert_eq!(f["version"], FieldValue::Int(3));
    }
}
