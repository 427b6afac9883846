//! `package.json` generation.
//!
//! Builds a manifest from the collected module set, pinning every dependency
//! to `*`. A project type adds `private`, `type` and a fixed `scripts` table.

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

pub const DEFAULT_NAME: &str = "recover-json";
pub const DEFAULT_VERSION: &str = "1.0.0";
pub const DEFAULT_OUTPUT: &str = "package.json";

/// Version constraint written for every recovered dependency.
pub const PLACEHOLDER_VERSION: &str = "*";

/// Project flavor, selecting the `scripts` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProjectType {
    /// Next.js web application.
    Web,
    /// Plain Node.js program.
    Node,
    /// React Native application.
    Mobile,
}

impl ProjectType {
    pub fn scripts(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::Web => &[
                ("dev", "next dev"),
                ("build", "next build"),
                ("start", "next start"),
                ("lint", "next lint"),
            ],
            Self::Node => &[
                ("start", "node index.js"),
                ("dev", "node --watch index.js"),
                ("test", "node --test"),
            ],
            Self::Mobile => &[
                ("start", "react-native start"),
                ("android", "react-native run-android"),
                ("ios", "react-native run-ios"),
                ("test", "jest"),
            ],
        }
    }

    /// Value of the `type` field; React Native projects leave it unset.
    pub fn module_type(self) -> Option<&'static str> {
        match self {
            Self::Web | Self::Node => Some("module"),
            Self::Mobile => None,
        }
    }
}

/// A generated `package.json`.
#[derive(Debug, Clone, Serialize)]
pub struct Manifest {
    pub name: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private: Option<bool>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub module_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scripts: Option<BTreeMap<String, String>>,
    pub dependencies: BTreeMap<String, String>,
}

impl Manifest {
    pub fn new(
        name: &str,
        version: &str,
        modules: &[String],
        project_type: Option<ProjectType>,
    ) -> Self {
        let dependencies = modules
            .iter()
            .map(|m| (m.clone(), PLACEHOLDER_VERSION.to_string()))
            .collect();

        let scripts = project_type.map(|t| {
            t.scripts()
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect()
        });

        Self {
            name: name.to_string(),
            version: version.to_string(),
            private: project_type.map(|_| true),
            module_type: project_type
                .and_then(ProjectType::module_type)
                .map(str::to_string),
            scripts,
            dependencies,
        }
    }

    /// Renders the manifest as two-space indented JSON with a trailing newline.
    pub fn to_json(&self) -> Result<String> {
        let mut json = serde_json::to_string_pretty(self).context("Failed to serialize manifest")?;
        json.push('\n');
        Ok(json)
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)
            .with_context(|| format!("Failed to write {}", path.display()))
    }
}
