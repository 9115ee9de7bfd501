//! Viewer startup configuration with TOML preset support.
//!
//! Everything a deployment tweaks (initial structure, default style and
//! color scheme, clip distance, screenshot defaults) lives here. Options
//! serialize to/from TOML for presets and export a JSON Schema so UIs can
//! generate settings panels.

use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::engine::ImageParams;
use crate::error::StoreError;

/// Screenshot defaults forwarded to the engine's make-image operation.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema,
)]
#[schemars(title = "Screenshot", inline)]
#[serde(default)]
pub struct ScreenshotOptions {
    /// Supersampling factor.
    #[schemars(title = "Scale Factor")]
    pub factor: u32,
    /// Whether to antialias the output.
    #[schemars(title = "Antialias")]
    pub antialias: bool,
    /// Whether the background is transparent.
    #[schemars(title = "Transparent Background")]
    pub transparent: bool,
    /// Whether to trim empty borders.
    #[schemars(title = "Trim Borders")]
    pub trim: bool,
}

impl Default for ScreenshotOptions {
    fn default() -> Self {
        Self {
            factor: 2,
            antialias: true,
            transparent: false,
            trim: false,
        }
    }
}

impl ScreenshotOptions {
    /// The engine-level image parameters these defaults describe.
    #[must_use]
    pub fn image_params(&self) -> ImageParams {
        ImageParams {
            factor: self.factor,
            antialias: self.antialias,
            transparent: self.transparent,
            trim: self.trim,
        }
    }
}

/// Top-level viewer options. All fields use `#[serde(default)]` so
/// partial TOML presets (e.g. only overriding the initial file) work.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(default)]
pub struct ViewerOptions {
    /// File reference loaded when the session starts.
    #[schemars(title = "Initial File")]
    pub initial_file: String,
    /// Display name of the initial file.
    #[schemars(title = "Initial Name")]
    pub initial_name: String,
    /// Initial representation style.
    #[schemars(title = "Display Style")]
    pub display: String,
    /// Initial color scheme.
    #[schemars(title = "Color Scheme")]
    pub color: String,
    /// Initial selection expression.
    #[schemars(title = "Selection")]
    pub selection: String,
    /// Initial near clipping distance.
    #[schemars(title = "Near Clip")]
    pub clip_near: f32,
    /// Screenshot defaults.
    pub screenshot: ScreenshotOptions,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            initial_file: "rcsb://1crn".to_owned(),
            initial_name: "1crn".to_owned(),
            display: "licorice".to_owned(),
            color: "element".to_owned(),
            selection: "*".to_owned(),
            clip_near: 0.0,
            screenshot: ScreenshotOptions::default(),
        }
    }
}

impl ViewerOptions {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(ViewerOptions)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| StoreError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if serialization or the write fails.
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| StoreError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) =
                        path.file_stem().and_then(|s| s.to_str())
                    {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::ViewerOptions;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = ViewerOptions::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: ViewerOptions = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r#"
initial_file = "rcsb://4pnk"
initial_name = "4pnk"

[screenshot]
factor = 4
"#;
        let opts: ViewerOptions = toml::from_str(toml_str).unwrap();
        assert_eq!(opts.initial_file, "rcsb://4pnk");
        assert_eq!(opts.screenshot.factor, 4);
        // Everything else should be default
        assert_eq!(opts.display, "licorice");
        assert_eq!(opts.color, "element");
        assert!(opts.screenshot.antialias);
    }

    #[test]
    fn image_params_mirror_screenshot_defaults() {
        let opts = ViewerOptions::default();
        let params = opts.screenshot.image_params();
        assert_eq!(params.factor, 2);
        assert!(params.antialias);
        assert!(!params.transparent);
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value =
            serde_json::to_value(ViewerOptions::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();
        assert!(props.contains_key("initial_file"));
        assert!(props.contains_key("display"));
        assert!(props.contains_key("color"));
        assert!(props.contains_key("screenshot"));
    }
}
