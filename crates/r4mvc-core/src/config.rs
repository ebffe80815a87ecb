//! Configuration for analysis, file location and generation.
//!
//! Load order: `r4mvc.toml` → environment variables → defaults.

use crate::naming;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const CONFIG_FILE: &str = "r4mvc.toml";

/// Name written into every `[GeneratedCode]` attribute.
pub const GENERATOR_NAME: &str = "R4Mvc";
pub const GENERATOR_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct R4MvcConfig {
    pub generation: GenerationSettings,
    pub analysis: AnalysisConfig,
    pub locators: LocatorConfig,
}

/// Settings threaded through synthesis. Only used to qualify generated names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    /// Name of the root class exposing one field per controller.
    pub helpers_prefix: String,
    /// Namespace for the root and links classes. Empty means the global namespace.
    pub namespace: String,
    /// Name of the class holding one field per static file.
    pub links_class: String,
    /// Suffix stripped from controller type names.
    pub controller_suffix: String,
    /// File name of the generated source, relative to the project directory.
    pub output_file: String,
}

/// Source collection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Glob patterns (relative to the project directory) never parsed.
    pub exclude: Vec<String>,
}

/// View and static-file locator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocatorConfig {
    pub views_folder: String,
    /// View file extensions, without the dot.
    pub view_extensions: Vec<String>,
    /// Web root holding static assets.
    pub static_root: String,
    /// Glob patterns (relative to the static root) left out of the links class.
    pub static_exclude: Vec<String>,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            helpers_prefix: "MVC".to_string(),
            namespace: String::new(),
            links_class: "Links".to_string(),
            controller_suffix: "Controller".to_string(),
            output_file: "R4Mvc.generated.cs".to_string(),
        }
    }
}

impl GenerationSettings {
    /// Settings with a root namespace and every other value defaulted.
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            ..Self::default()
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            exclude: vec!["bin/**".to_string(), "obj/**".to_string()],
        }
    }
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            views_folder: "Views".to_string(),
            view_extensions: vec!["cshtml".to_string()],
            static_root: "wwwroot".to_string(),
            static_exclude: Vec::new(),
        }
    }
}

/// Helper to parse an env var and apply it to a config field.
fn env_override<T: std::str::FromStr>(var: &str, target: &mut T) {
    if let Ok(v) = std::env::var(var)
        && let Ok(n) = v.parse()
    {
        *target = n;
    }
}

impl R4MvcConfig {
    /// Load `r4mvc.toml` from the project directory, with env var overrides.
    /// Falls back to defaults if no config file exists.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let config_path = project_dir.join(CONFIG_FILE);

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            Self::default()
        };

        // Leading dots would produce `..cshtml` patterns
        config.locators.view_extensions = std::mem::take(&mut config.locators.view_extensions)
            .into_iter()
            .map(|ext| ext.trim_start_matches('.').to_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect();

        env_override("R4MVC_HELPERS_PREFIX", &mut config.generation.helpers_prefix);
        env_override("R4MVC_NAMESPACE", &mut config.generation.namespace);
        env_override("R4MVC_LINKS_CLASS", &mut config.generation.links_class);
        env_override("R4MVC_OUTPUT_FILE", &mut config.generation.output_file);

        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would generate uncompilable code.
    pub fn validate(&self) -> Result<()> {
        let generation = &self.generation;
        for (key, value) in [
            ("helpers_prefix", &generation.helpers_prefix),
            ("links_class", &generation.links_class),
            ("controller_suffix", &generation.controller_suffix),
        ] {
            if !naming::is_identifier(value) {
                anyhow::bail!("generation.{} must be a C# identifier, got {:?}", key, value);
            }
        }
        if !naming::is_namespace(&generation.namespace) {
            anyhow::bail!(
                "generation.namespace must be empty or a dotted C# name, got {:?}",
                generation.namespace
            );
        }
        if generation.helpers_prefix == generation.links_class {
            anyhow::bail!(
                "generation.helpers_prefix and generation.links_class must differ (both {:?})",
                generation.helpers_prefix
            );
        }
        if generation.output_file.trim().is_empty() {
            anyhow::bail!("generation.output_file must not be empty");
        }
        Ok(())
    }
}
