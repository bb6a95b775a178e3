use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub font_weight: String,
    pub node_fill: String,
    pub node_border: String,
    pub label_color: String,
    pub line_color: String,
    pub title_color: String,
    pub background: String,
}

impl Theme {
    pub fn classic() -> Self {
        Self {
            font_family: "DejaVu Sans, Verdana, sans-serif".to_string(),
            font_size: 10.0,
            font_weight: "bold".to_string(),
            node_fill: "#ADD8E6".to_string(),
            node_border: "#ADD8E6".to_string(),
            label_color: "#000000".to_string(),
            line_color: "#000000".to_string(),
            title_color: "#000000".to_string(),
            background: "#FFFFFF".to_string(),
        }
    }

    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 13.0,
            font_weight: "600".to_string(),
            node_fill: "#F8FAFF".to_string(),
            node_border: "#C7D2E5".to_string(),
            label_color: "#1C2430".to_string(),
            line_color: "#7A8AA6".to_string(),
            title_color: "#1C2430".to_string(),
            background: "#FFFFFF".to_string(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::classic()
    }
}
