//! Layout configuration: where documents and the counter record live.
//!
//! The defaults describe the layout the tool was written for, so running
//! without a config file needs no arguments at all:
//! ```toml
//! prefix = "CP"
//! posts_dir = "src/content/posts"
//! file_stem = "clawd-picks"
//! extension = "mdx"
//! variant_marker = "en-"
//! counter_file = "scripts/article-counter.json"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TicketError};
use crate::frontmatter::TicketField;

/// Document layout for one identifier prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    /// Identifier prefix, e.g. `CP` for `CP-12`.
    pub prefix: String,
    /// Directory holding both variants, relative to the project root.
    pub posts_dir: PathBuf,
    /// Primary documents are named `<file_stem>-*.<extension>`.
    pub file_stem: String,
    pub extension: String,
    /// Translated counterparts are named `<variant_marker><primary file name>`.
    pub variant_marker: String,
    /// Counter record, relative to the project root.
    pub counter_file: PathBuf,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            prefix: "CP".to_string(),
            posts_dir: PathBuf::from("src/content/posts"),
            file_stem: "clawd-picks".to_string(),
            extension: "mdx".to_string(),
            variant_marker: "en-".to_string(),
            counter_file: PathBuf::from("scripts/article-counter.json"),
        }
    }
}

impl LayoutConfig {
    /// Parse a TOML layout. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`TicketError::Config`] if the TOML is malformed or the
    /// resulting layout fails [`LayoutConfig::validate`].
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|e| TicketError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read a TOML layout file.
    ///
    /// # Errors
    ///
    /// Returns [`TicketError::Io`] if the file cannot be read, otherwise as
    /// [`LayoutConfig::from_toml`].
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| TicketError::io(path, e))?;
        Self::from_toml(&text)
    }

    /// Check that every name component is usable in a file pattern.
    ///
    /// # Errors
    ///
    /// Returns [`TicketError::Config`] naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        TicketField::new(&self.prefix)?;
        for (field, value) in [
            ("file_stem", &self.file_stem),
            ("extension", &self.extension),
            ("variant_marker", &self.variant_marker),
        ] {
            if value.is_empty() {
                return Err(TicketError::Config(format!("{field} must not be empty")));
            }
            if value.contains(['/', '\\']) {
                return Err(TicketError::Config(format!(
                    "{field} must not contain path separators, got '{value}'"
                )));
            }
        }
        Ok(())
    }

    /// Matcher for this layout's `ticketId` field.
    ///
    /// # Errors
    ///
    /// Returns [`TicketError::Config`] if the prefix is invalid.
    pub fn ticket_field(&self) -> Result<TicketField> {
        TicketField::new(&self.prefix)
    }

    pub fn posts_dir_in(&self, root: &Path) -> PathBuf {
        root.join(&self.posts_dir)
    }

    pub fn counter_path_in(&self, root: &Path) -> PathBuf {
        root.join(&self.counter_file)
    }

    /// Whether `file_name` names a translated counterpart.
    pub fn is_translated(&self, file_name: &str) -> bool {
        file_name.starts_with(&self.variant_marker)
    }

    /// Path of the translated counterpart for a primary document.
    ///
    /// Returns `None` if `primary` has no UTF-8 file name.
    pub fn counterpart_of(&self, primary: &Path) -> Option<PathBuf> {
        let name = primary.file_name()?.to_str()?;
        Some(primary.with_file_name(format!("{}{name}", self.variant_marker)))
    }
}
