//! Column descriptors.
//!
//! Columns govern which fields take part in an export, and in which order.
//! They are independent of the fields used for filtering and sorting.

use serde::{Deserialize, Serialize};

/// How a column's values should be treated when exported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    /// Let the value decide.
    #[default]
    Auto,
    /// Free text.
    Text,
    /// Phone number; all-digit values are rendered with a leading `+`.
    Phone,
}

/// One column of a list screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Field key the column reads.
    pub key: String,
    /// Header label.
    pub label: String,
    /// Whether the column takes part in exports.
    #[serde(default = "default_visible")]
    pub visible: bool,
    /// Export treatment of the values.
    #[serde(default)]
    pub kind: ColumnKind,
}

fn default_visible() -> bool {
    true
}

impl ColumnDescriptor {
    /// Creates a visible column.
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            visible: true,
            kind: ColumnKind::Auto,
        }
    }

    /// Sets the visibility (builder style).
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Sets the kind (builder style).
    pub fn with_kind(mut self, kind: ColumnKind) -> Self {
        self.kind = kind;
        self
    }

    /// Returns `true` if this column holds phone numbers.
    ///
    /// Either the kind says so, or the key mentions a phone.
    pub fn is_phone(&self) -> bool {
        match self.kind {
            ColumnKind::Phone => true,
            ColumnKind::Text => false,
            ColumnKind::Auto => {
                let key = self.key.to_lowercase();
                key.contains("phone") || key.contains("mobile")
            }
        }
    }
}

/// The ordered columns of a screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnSet {
    columns: Vec<ColumnDescriptor>,
}

impl ColumnSet {
    /// Creates a column set.
    pub fn new(columns: Vec<ColumnDescriptor>) -> Self {
        Self { columns }
    }

    /// Returns all columns in order.
    pub fn all(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    /// Returns the visible columns in order.
    pub fn visible(&self) -> impl Iterator<Item = &ColumnDescriptor> {
        self.columns.iter().filter(|c| c.visible)
    }

    /// Returns the number of visible columns.
    pub fn visible_count(&self) -> usize {
        self.visible().count()
    }

    /// Returns the column with `key`.
    pub fn get(&self, key: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.key == key)
    }

    /// Sets the visibility of the column with `key`.
    ///
    /// Returns `false` if there is no such column.
    pub fn set_visible(&mut self, key: &str, visible: bool) -> bool {
        match self.columns.iter_mut().find(|c| c.key == key) {
            Some(column) => {
                column.visible = visible;
                true
            }
            None => false,
        }
    }

    /// Flips the visibility of the column with `key`.
    ///
    /// Returns the new visibility, or `None` if there is no such column.
    pub fn toggle(&mut self, key: &str) -> Option<bool> {
        let column = self.columns.iter_mut().find(|c| c.key == key)?;
        column.visible = !column.visible;
        Some(column.visible)
    }

    /// Returns the number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns `true` if there are no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl From<Vec<ColumnDescriptor>> for ColumnSet {
    fn from(columns: Vec<ColumnDescriptor>) -> Self {
        Self::new(columns)
    }
}

impl FromIterator<ColumnDescriptor> for ColumnSet {
    fn from_iter<I: IntoIterator<Item = ColumnDescriptor>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
