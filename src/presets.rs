//! Named render presets

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::warn;

use crate::format::RasterFormat;
use crate::geometry::ResizeMode;
use crate::renderer::TargetSpec;

pub type PresetId = String;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preset {
    pub id: PresetId,
    #[serde(default)]
    pub description: String,
    pub width: u32,
    pub height: u32,
    pub mode: ResizeMode,
    #[serde(default)]
    pub padding: bool,
    #[serde(default)]
    pub format: Option<RasterFormat>,
}

impl Preset {
    pub fn target(&self) -> TargetSpec {
        TargetSpec {
            width: self.width,
            height: self.height,
            mode: self.mode,
            padding: self.padding,
            format: self.format,
        }
    }
}

/// Preset registry - built-ins plus configured presets
pub struct PresetRegistry {
    presets: HashMap<PresetId, Preset>,
}

impl PresetRegistry {
    pub fn new() -> Self {
        Self {
            presets: HashMap::new(),
        }
    }

    /// Built-in presets, then `extra` on top (same id replaces)
    pub fn with_builtins(extra: impl IntoIterator<Item = Preset>) -> Self {
        let mut registry = Self::new();
        for preset in builtin_presets().into_iter().chain(extra) {
            registry.register(preset);
        }
        registry
    }

    /// Add every `*.json` preset in `dir`. Unreadable or invalid files are skipped.
    pub fn load_from_dir(&mut self, dir: &Path) -> Result<usize, std::io::Error> {
        let mut loaded = 0;
        if !dir.exists() {
            return Ok(loaded);
        }
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().map_or(true, |e| e != "json") {
                continue;
            }
            let parsed = fs::read_to_string(&path)
                .map_err(|e| e.to_string())
                .and_then(|c| serde_json::from_str::<Preset>(&c).map_err(|e| e.to_string()));
            match parsed {
                Ok(preset) => {
                    self.register(preset);
                    loaded += 1;
                }
                Err(e) => warn!(path = %path.display(), error = %e, "skipping preset"),
            }
        }
        Ok(loaded)
    }

    pub fn get(&self, id: &str) -> Option<&Preset> {
        self.presets.get(id)
    }

    /// All presets, sorted by id
    pub fn list(&self) -> Vec<&Preset> {
        let mut presets: Vec<_> = self.presets.values().collect();
        presets.sort_by(|a, b| a.id.cmp(&b.id));
        presets
    }

    pub fn register(&mut self, preset: Preset) {
        self.presets.insert(preset.id.clone(), preset);
    }
}

impl Default for PresetRegistry {
    fn default() -> Self {
        Self::with_builtins(vec![])
    }
}

fn builtin_presets() -> Vec<Preset> {
    vec![
        Preset {
            id: "thumbnail".into(),
            description: "Part list thumbnail".into(),
            width: 48,
            height: 48,
            mode: ResizeMode::FitWithinPadded,
            padding: true,
            format: None,
        },
        Preset {
            id: "preview".into(),
            description: "Hover preview".into(),
            width: 320,
            height: 240,
            mode: ResizeMode::FitWithinPadded,
            padding: false,
            format: None,
        },
        Preset {
            id: "square".into(),
            description: "Cropped square tile".into(),
            width: 150,
            height: 150,
            mode: ResizeMode::FitWithinExactCropped,
            padding: false,
            format: None,
        },
    ]
}
