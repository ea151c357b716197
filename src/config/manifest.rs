//! Manifest presets.
//!
//! A manifest is a scanned page image. Each one places its table at a
//! different margin and with a different typical row height, so the ledger
//! is configured per manifest.

use serde::Deserialize;
use std::collections::BTreeMap;

/// Page geometry for one manifest.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ManifestPreset {
    /// Human-readable name.
    pub label: String,
    /// IIIF manifest URL.
    #[serde(default)]
    pub url: Option<String>,
    /// Width of the region requested from the viewer.
    pub width: f64,
    /// Offset of the top of row 0.
    pub margin_top: f64,
    /// Initial per-row height.
    pub default_height: f64,
}

impl ManifestPreset {
    fn builtin(label: &str, url: &str, width: f64, margin_top: f64, default_height: f64) -> Self {
        Self {
            label: label.to_string(),
            url: Some(url.to_string()),
            width,
            margin_top,
            default_height,
        }
    }
}

/// Presets available without a config file, keyed by name.
pub fn builtin_manifests() -> BTreeMap<String, ManifestPreset> {
    BTreeMap::from([
        (
            "ghent-1".to_string(),
            ManifestPreset::builtin(
                "Ghent 1",
                "https://iiif.ghentcdh.ugent.be/iiif/manifests/test:primitief_kadaster_leggers:GENT_B_0001-0172",
                3100.0,
                420.0,
                50.0,
            ),
        ),
        (
            "botanic-garden-1".to_string(),
            ManifestPreset::builtin(
                "Botanic Garden 1",
                "https://sandbox.zenodo.org/api/iiif/record:385592/manifest",
                3709.0,
                1150.0,
                60.0,
            ),
        ),
        (
            "botanic-garden-2".to_string(),
            ManifestPreset::builtin(
                "Botanic Garden 2",
                "https://sandbox.zenodo.org/api/iiif/record:385594/manifest",
                3709.0,
                500.0,
                140.0,
            ),
        ),
        (
            "botanic-garden-3".to_string(),
            ManifestPreset::builtin(
                "Botanic Garden 3",
                "https://sandbox.zenodo.org/api/iiif/record:385598/manifest",
                7800.0,
                520.0,
                120.0,
            ),
        ),
        (
            "nlw".to_string(),
            ManifestPreset::builtin(
                "NLW",
                "https://damsssl.llgc.org.uk/iiif/2.0/5798978/manifest.json",
                3100.0,
                300.0,
                50.0,
            ),
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_manifests_has_five_presets() {
        let presets = builtin_manifests();
        assert_eq!(presets.len(), 5);
        assert!(presets.contains_key("ghent-1"));
        assert!(presets.contains_key("nlw"));
    }

    #[test]
    fn ghent_preset_geometry() {
        let presets = builtin_manifests();
        let ghent = &presets["ghent-1"];
        assert_eq!(ghent.label, "Ghent 1");
        assert_eq!(ghent.width, 3100.0);
        assert_eq!(ghent.margin_top, 420.0);
        assert_eq!(ghent.default_height, 50.0);
    }

    #[test]
    fn preset_parses_from_toml_without_url() {
        let preset: ManifestPreset = toml::from_str(
            r#"
label = "Local scan"
width = 2000.0
margin_top = 100.0
default_height = 30.0
"#,
        )
        .unwrap();
        assert_eq!(preset.url, None);
        assert_eq!(preset.default_height, 30.0);
    }

    #[test]
    fn preset_rejects_unknown_fields() {
        let result: Result<ManifestPreset, _> = toml::from_str(
            r#"
label = "x"
width = 1.0
margin_top = 1.0
default_height = 1.0
zoom = 2.0
"#,
        );
        assert!(result.is_err());
    }
}
