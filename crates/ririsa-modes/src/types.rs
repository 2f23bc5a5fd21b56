use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A named prompt template offered by the UI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModePreset {
    /// Prompt sent with the images; empty for free-form modes
    pub prompt: String,
    pub description: String,
    /// Whether the UI hides the prompt box
    pub input_disabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Display position, 1-based
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
    #[serde(default)]
    pub is_custom: bool,
}

/// Every mode plus the time of the last change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModesDatabase {
    pub modes: IndexMap<String, ModePreset>,
    /// Milliseconds since the Unix epoch
    pub last_updated: i64,
}

/// Ids of the built-in modes, which cannot be changed
pub const DEFAULT_MODE_IDS: [&str; 3] = ["clothing", "hairstyle", "freestyle"];

/// The built-in modes in display order
pub fn default_presets() -> IndexMap<String, ModePreset> {
    let clothing = ModePreset {
        prompt: "Dress the person in the first image in the clothes from the second image. \
                 Keep the person's face and features unchanged and make the result look natural."
            .to_string(),
        description: "Image 1: you, image 2: the clothes to try on".to_string(),
        input_disabled: true,
        input_placeholder: None,
        icon: Some("👕".to_string()),
        order: Some(1),
        is_custom: false,
    };

    let hairstyle = ModePreset {
        prompt: "Change the hairstyle of the person in the first image to the hairstyle in the second image. \
                 Keep the person's face and clothing unchanged and make the result look natural."
            .to_string(),
        description: "Image 1: you, image 2: the hairstyle you want".to_string(),
        input_disabled: true,
        input_placeholder: None,
        icon: Some("💇".to_string()),
        order: Some(2),
        is_custom: false,
    };

    let freestyle = ModePreset {
        prompt: String::new(),
        description: "Combine images and prompts freely".to_string(),
        input_disabled: false,
        input_placeholder: Some("Describe the edit or image you want...".to_string()),
        icon: Some("🎨".to_string()),
        order: Some(3),
        is_custom: false,
    };

    IndexMap::from([
        ("clothing".to_string(), clothing),
        ("hairstyle".to_string(), hairstyle),
        ("freestyle".to_string(), freestyle),
    ])
}
