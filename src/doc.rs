//! Markdown documentation for config files.
//!
//! Renders one section per config file: a `###` heading and, when key
//! documentation is given, a table with one row per documented key.

use crate::config::ConfigOptions;
use std::collections::HashMap;

/// Line terminator of the current platform.
pub const LINE_ENDING: &str = if cfg!(windows) { "\r\n" } else { "\n" };

const DEFAULT_HEADER: &str = "## Configuration";

/// Cells of one documented key, by column key.
pub type KeyDoc = HashMap<String, String>;

/// Documentation of one config file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigDoc {
    pub file_name: String,
    pub description: Option<String>,
    /// Documented keys in table order. `None` renders no table.
    pub key_options: Option<Vec<(String, KeyDoc)>>,
}

impl ConfigDoc {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Document `key` with `(column, value)` cells.
    pub fn with_key<I, C, V>(mut self, key: impl Into<String>, cells: I) -> Self
    where
        I: IntoIterator<Item = (C, V)>,
        C: Into<String>,
        V: Into<String>,
    {
        let cells = cells
            .into_iter()
            .map(|(column, value)| (column.into(), value.into()))
            .collect();
        self.key_options
            .get_or_insert_with(Vec::new)
            .push((key.into(), cells));
        self
    }
}

/// Column `env` holds the variable name, column `description` the key description.
impl<K> From<&ConfigOptions<K>> for ConfigDoc {
    fn from(options: &ConfigOptions<K>) -> Self {
        let key_options = (!options.key_options.is_empty()).then(|| {
            options
                .key_options
                .iter()
                .map(|(key_path, key)| {
                    let mut cells = KeyDoc::new();
                    if let Some(env) = &key.env {
                        cells.insert("env".to_string(), env.clone());
                    }
                    if let Some(description) = &key.description {
                        cells.insert("description".to_string(), description.clone());
                    }
                    (key_path.clone(), cells)
                })
                .collect()
        });

        Self {
            file_name: options.file_name.clone(),
            description: None,
            key_options,
        }
    }
}

/// Options of a whole document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocOptions {
    /// First line (default: `## Configuration`).
    pub header: Option<String>,
    pub description: Option<String>,
    /// `(column key, column label)` pairs, in column order.
    pub key_headers: Vec<(String, String)>,
    pub config_options: Vec<ConfigDoc>,
    /// Rendered for cells without a value (default: empty).
    pub empty_value_placeholder: Option<String>,
}

impl DocOptions {
    pub fn new<I, C, L>(key_headers: I) -> Self
    where
        I: IntoIterator<Item = (C, L)>,
        C: Into<String>,
        L: Into<String>,
    {
        Self {
            key_headers: key_headers
                .into_iter()
                .map(|(column, label)| (column.into(), label.into()))
                .collect(),
            ..Self::default()
        }
    }

    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_config(mut self, config: impl Into<ConfigDoc>) -> Self {
        self.config_options.push(config.into());
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.empty_value_placeholder = Some(placeholder.into());
        self
    }
}

/// Render the markdown document.
pub fn write_doc(options: &DocOptions) -> String {
    let mut doc = String::new();

    doc.push_str(options.header.as_deref().unwrap_or(DEFAULT_HEADER));
    doc.push_str(LINE_ENDING);
    if let Some(description) = &options.description {
        doc.push_str(description);
        doc.push_str(LINE_ENDING);
    }

    let table = Table::new(options);
    for config in &options.config_options {
        doc.push_str(&table.render_config(config));
    }

    doc
}

struct Table<'a> {
    header_line: String,
    under_header_line: String,
    columns: Vec<&'a str>,
    placeholder: &'a str,
}

impl<'a> Table<'a> {
    fn new(options: &'a DocOptions) -> Self {
        let labels: Vec<&str> = std::iter::once("key")
            .chain(options.key_headers.iter().map(|(_, label)| label.as_str()))
            .collect();

        Self {
            header_line: format!("|{}|", labels.join("|")),
            under_header_line: format!("|{}|", vec!["-"; labels.len()].join("|")),
            columns: options
                .key_headers
                .iter()
                .map(|(column, _)| column.as_str())
                .collect(),
            placeholder: options.empty_value_placeholder.as_deref().unwrap_or_default(),
        }
    }

    fn render_config(&self, config: &ConfigDoc) -> String {
        let heading = match &config.description {
            Some(description) => format!("### {} - {}", config.file_name, description),
            None => format!("### {}", config.file_name),
        };

        let lines = match &config.key_options {
            Some(keys) => vec![
                heading,
                self.header_line.clone(),
                self.under_header_line.clone(),
                keys.iter().map(|(key, cells)| self.render_row(key, cells)).collect(),
            ],
            None => vec![heading, String::new()],
        };

        lines.join(LINE_ENDING)
    }

    fn render_row(&self, key: &str, cells: &KeyDoc) -> String {
        let values: Vec<&str> = self
            .columns
            .iter()
            .map(|column| cells.get(*column).map_or(self.placeholder, String::as_str))
            .collect();
        format!("|{}|{}|{}", key, values.join("|"), LINE_ENDING)
    }
}
