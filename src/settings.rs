use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Run configuration that is not supplied on the command line: default
/// title/instructions and the board's colors and font. Everything can be
/// overridden from a TOML file passed via `--read-settings`.
#[derive(Debug, Clone)]
pub struct Settings {
    pub title: String,
    pub instructions: String,
    pub panel_fill: String,
    pub panel_edge: String,
    pub free_fill: String,
    pub grid_color: String,
    pub text_color: String,
    pub font_family: Option<String>,
    pub font_path: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            title: "SciComp Bingo".to_string(),
            instructions: "Talk to people and mark off items when you find someone that \
                           matches the point. There is no real rules here, if someone can \
                           tell a story about the topic of the cell, consider it good enough."
                .to_string(),
            panel_fill: "#f2f2f2".to_string(),
            panel_edge: "#b3b3b3".to_string(),
            free_fill: "#e6ffe6".to_string(),
            grid_color: "#000000".to_string(),
            text_color: "#000000".to_string(),
            font_family: None,
            font_path: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
    board: Option<BoardSettings>,
    colors: Option<ColorSettings>,
    font: Option<FontSettings>,
}

#[derive(Debug, Default, Deserialize)]
struct BoardSettings {
    title: Option<String>,
    instructions: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ColorSettings {
    panel_fill: Option<String>,
    panel_edge: Option<String>,
    free_fill: Option<String>,
    grid: Option<String>,
    text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct FontSettings {
    family: Option<String>,
    path: Option<String>,
}

pub fn load_settings(extra_path: Option<&Path>) -> Result<Settings> {
    let mut settings = Settings::default();
    if let Some(path) = extra_path {
        if !path.exists() {
            return Err(anyhow!("settings file not found: {}", path.display()));
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings: {}", path.display()))?;
        let parsed: SettingsFile = toml::from_str(&content)
            .with_context(|| format!("failed to parse settings: {}", path.display()))?;
        settings.merge(parsed);
    }
    Ok(settings)
}

impl Settings {
    fn merge(&mut self, incoming: SettingsFile) {
        if let Some(board) = incoming.board {
            if let Some(title) = board.title {
                if !title.trim().is_empty() {
                    self.title = title;
                }
            }
            if let Some(instructions) = board.instructions {
                if !instructions.trim().is_empty() {
                    self.instructions = instructions;
                }
            }
        }
        if let Some(colors) = incoming.colors {
            merge_color(&mut self.panel_fill, colors.panel_fill);
            merge_color(&mut self.panel_edge, colors.panel_edge);
            merge_color(&mut self.free_fill, colors.free_fill);
            merge_color(&mut self.grid_color, colors.grid);
            merge_color(&mut self.text_color, colors.text);
        }
        if let Some(font) = incoming.font {
            if let Some(family) = font.family {
                if !family.trim().is_empty() {
                    self.font_family = Some(family);
                }
            }
            if let Some(path) = font.path {
                if !path.trim().is_empty() {
                    self.font_path = Some(path);
                }
            }
        }
    }
}

fn merge_color(target: &mut String, incoming: Option<String>) {
    if let Some(color) = incoming {
        if !color.trim().is_empty() {
            *target = color;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn defaults_apply_without_a_file() {
        let settings = load_settings(None).expect("load");
        assert_eq!(settings.title, "SciComp Bingo");
        assert_eq!(settings.free_fill, "#e6ffe6");
        assert!(settings.font_path.is_none());
    }

    #[test]
    fn file_overrides_merge_over_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("board.toml");
        fs::write(
            &path,
            "[board]\n\
             title = \"Office Bingo\"\n\
             \n\
             [colors]\n\
             free_fill = \"#ffe6e6\"\n\
             \n\
             [font]\n\
             family = \"Lato\"\n",
        )
        .expect("write settings");

        let settings = load_settings(Some(&path)).expect("load");
        assert_eq!(settings.title, "Office Bingo");
        assert_eq!(settings.free_fill, "#ffe6e6");
        assert_eq!(settings.font_family.as_deref(), Some("Lato"));
        // Untouched keys keep their defaults.
        assert_eq!(settings.panel_fill, "#f2f2f2");
        assert!(!settings.instructions.is_empty());
    }

    #[test]
    fn empty_values_do_not_clobber_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("board.toml");
        fs::write(&path, "[board]\ntitle = \"  \"\n[colors]\ngrid = \"\"\n").expect("write");

        let settings = load_settings(Some(&path)).expect("load");
        assert_eq!(settings.title, "SciComp Bingo");
        assert_eq!(settings.grid_color, "#000000");
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(load_settings(Some(&dir.path().join("absent.toml"))).is_err());
    }
}
