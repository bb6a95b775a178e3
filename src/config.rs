use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Angle of the first node, in degrees from the positive x axis.
    pub start_angle_deg: f32,
    pub clockwise: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            start_angle_deg: 0.0,
            clockwise: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
    pub node_radius: f32,
    pub edge_width: f32,
    pub self_loop_radius: f32,
    pub title: Option<String>,
    /// Plain ASCII glyphs on the character canvas.
    pub ascii: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 800.0,
            margin: 60.0,
            node_radius: 18.0,
            edge_width: 1.4,
            self_loop_radius: 10.0,
            title: None,
            ascii: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<f32>,
    font_weight: Option<String>,
    node_fill: Option<String>,
    node_border: Option<String>,
    label_color: Option<String>,
    line_color: Option<String>,
    title_color: Option<String>,
    background: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LayoutConfigFile {
    start_angle: Option<f32>,
    clockwise: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RenderConfigFile {
    width: Option<f32>,
    height: Option<f32>,
    margin: Option<f32>,
    node_radius: Option<f32>,
    edge_width: Option<f32>,
    self_loop_radius: Option<f32>,
    title: Option<String>,
    ascii: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    layout: Option<LayoutConfigFile>,
    render: Option<RenderConfigFile>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };

    let contents = std::fs::read_to_string(path)?;
    let is_json5 = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json5"))
        .unwrap_or(false);
    let parsed: ConfigFile = if is_json5 {
        json5::from_str(&contents)?
    } else {
        serde_json::from_str(&contents)?
    };
    apply_config_file(Config::default(), parsed)
}

fn apply_config_file(mut config: Config, parsed: ConfigFile) -> anyhow::Result<Config> {
    if let Some(theme_name) = parsed.theme.as_deref() {
        config.theme = match theme_name {
            "modern" => Theme::modern(),
            "classic" | "default" => Theme::classic(),
            other => return Err(anyhow::anyhow!("Unknown theme: {other}")),
        };
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.font_size {
            config.theme.font_size = v;
        }
        if let Some(v) = vars.font_weight {
            config.theme.font_weight = v;
        }
        if let Some(v) = vars.node_fill {
            config.theme.node_fill = v;
        }
        if let Some(v) = vars.node_border {
            config.theme.node_border = v;
        }
        if let Some(v) = vars.label_color {
            config.theme.label_color = v;
        }
        if let Some(v) = vars.line_color {
            config.theme.line_color = v;
        }
        if let Some(v) = vars.title_color {
            config.theme.title_color = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = v;
        }
    }

    if let Some(layout) = parsed.layout {
        if let Some(v) = layout.start_angle {
            config.layout.start_angle_deg = v;
        }
        if let Some(v) = layout.clockwise {
            config.layout.clockwise = v;
        }
    }

    if let Some(render) = parsed.render {
        if let Some(v) = render.width {
            config.render.width = v;
        }
        if let Some(v) = render.height {
            config.render.height = v;
        }
        if let Some(v) = render.margin {
            config.render.margin = v;
        }
        if let Some(v) = render.node_radius {
            config.render.node_radius = v;
        }
        if let Some(v) = render.edge_width {
            config.render.edge_width = v;
        }
        if let Some(v) = render.self_loop_radius {
            config.render.self_loop_radius = v;
        }
        if render.title.is_some() {
            config.render.title = render.title;
        }
        if let Some(v) = render.ascii {
            config.render.ascii = v;
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn no_path_gives_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config.theme.node_fill, "#ADD8E6");
        assert_eq!(config.render.width, 800.0);
        assert!(!config.layout.clockwise);
    }

    #[test]
    fn theme_preset_then_variables() {
        let parsed: ConfigFile = serde_json::from_str(
            r##"{"theme": "modern", "themeVariables": {"lineColor": "#FF0000"}}"##,
        )
        .unwrap();
        let config = apply_config_file(Config::default(), parsed).unwrap();
        assert_eq!(config.theme.node_fill, Theme::modern().node_fill);
        assert_eq!(config.theme.line_color, "#FF0000");
    }

    #[test]
    fn unknown_theme_is_an_error() {
        let parsed: ConfigFile = serde_json::from_str(r#"{"theme": "neon"}"#).unwrap();
        assert!(apply_config_file(Config::default(), parsed).is_err());
    }

    #[test]
    fn reads_json5_file() {
        let mut file = tempfile::Builder::new().suffix(".json5").tempfile().unwrap();
        writeln!(
            file,
            "{{ layout: {{ startAngle: 90.0, clockwise: true }}, render: {{ title: 'Route', }} }}"
        )
        .unwrap();
        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.layout.start_angle_deg, 90.0);
        assert!(config.layout.clockwise);
        assert_eq!(config.render.title.as_deref(), Some("Route"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(Some(&dir.path().join("nope.json"))).is_err());
    }
}
