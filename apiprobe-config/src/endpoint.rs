//! Endpoint template rendering

use crate::error::{ConfigError, ConfigResult};
use std::collections::BTreeMap;

/// Named values substituted into `{placeholder}` segments of an endpoint template
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Placeholders {
    values: BTreeMap<String, String>,
}

impl Placeholders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a placeholder value, builder style
    pub fn with(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl ToString) {
        self.values.insert(name.into(), value.to_string());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Placeholders
where
    K: Into<String>,
    V: ToString,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut placeholders = Placeholders::new();
        for (name, value) in iter {
            placeholders.insert(name, value);
        }
        placeholders
    }
}

/// Render `{name}` segments of a template.
///
/// Unknown extra placeholders are ignored; a segment without a value fails with
/// [`ConfigError::PlaceholderMissing`] and one with an empty value with
/// [`ConfigError::PlaceholderEmpty`]. An unterminated `{` is kept literally.
pub fn render_template(template: &str, placeholders: &Placeholders) -> ConfigResult<String> {
    let mut rendered = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        rendered.push_str(&rest[..open]);
        let after_open = &rest[open + 1..];

        let Some(close) = after_open.find('}') else {
            rendered.push_str(&rest[open..]);
            return Ok(rendered);
        };

        let name = after_open[..close].trim();
        let value = placeholders
            .get(name)
            .ok_or_else(|| ConfigError::PlaceholderMissing {
                template: template.to_string(),
                placeholder: name.to_string(),
            })?;
        if value.trim().is_empty() {
            return Err(ConfigError::PlaceholderEmpty {
                template: template.to_string(),
                placeholder: name.to_string(),
            });
        }
        rendered.push_str(value);
        rest = &after_open[close + 1..];
    }

    rendered.push_str(rest);
    Ok(rendered)
}

/// List the placeholder names a template expects, in order of appearance
pub fn template_placeholders(template: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        let after_open = &rest[open + 1..];
        match after_open.find('}') {
            Some(close) => {
                names.push(after_open[..close].trim().to_string());
                rest = &after_open[close + 1..];
            }
            None => break,
        }
    }
    names
}
