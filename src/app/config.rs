use crate::app::cli::Cli;
use crate::app::models::RuntimeConfig;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

const DEFAULT_PRESET: &str = "default";

#[derive(Deserialize, Debug)]
struct PresetsFile {
    #[serde(flatten)]
    presets: HashMap<String, PresetConfig>,
}

#[derive(Deserialize, Debug, Clone, Default)]
struct PresetConfig {
    max_bytes: Option<usize>,
    max_json_bytes: Option<usize>,
    separator: Option<String>,
    ignore_globs: Option<Vec<String>>,
    exclude_markdown: Option<bool>,
    include_headers: Option<bool>,
    metadata_inside_fence: Option<bool>,
}

impl PresetConfig {
    /// Layers `self` over `base`; lists are concatenated.
    fn apply(self, base: &mut RuntimeConfig) {
        if let Some(v) = self.max_bytes {
            base.max_bytes = v;
        }
        if let Some(v) = self.max_json_bytes {
            base.max_json_bytes = v;
        }
        if let Some(v) = self.separator {
            base.separator = v;
        }
        if let Some(v) = self.exclude_markdown {
            base.exclude_markdown = v;
        }
        if let Some(v) = self.include_headers {
            base.include_headers = v;
        }
        if let Some(v) = self.metadata_inside_fence {
            base.metadata_inside_fence = v;
        }
        base.ignore_globs = merge_vecs(std::mem::take(&mut base.ignore_globs), self.ignore_globs);
    }
}

fn load_presets_file() -> Result<HashMap<String, PresetConfig>> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    let config_path = home
        .join(".config")
        .join("code_bundle")
        .join("presets.toml");
    load_presets_from(&config_path)
}

fn load_presets_from(config_path: &Path) -> Result<HashMap<String, PresetConfig>> {
    if !config_path.exists() {
        return Ok(HashMap::new());
    }

    let content = fs::read_to_string(config_path)
        .context(format!("Failed to read config at {:?}", config_path))?;

    let parsed: PresetsFile = toml::from_str(&content).context("Failed to parse presets.toml")?;

    Ok(parsed.presets)
}

fn merge_vecs(mut combined: Vec<String>, extra: Option<Vec<String>>) -> Vec<String> {
    if let Some(mut items) = extra {
        combined.append(&mut items);
    }
    // Deduplicate while keeping order
    let mut seen = std::collections::HashSet::new();
    combined.retain(|item| seen.insert(item.clone()));
    combined
}

/// Expands `\n`, `\t` and `\\` so separators can be typed on a command line.
fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

pub fn resolve_config(cli: &Cli, project_name: Option<&str>) -> Result<RuntimeConfig> {
    let presets = load_presets_file()?;
    Ok(resolve_with_presets(cli, project_name, presets))
}

/// Defaults < `default` preset < named preset < CLI flags.
fn resolve_with_presets(
    cli: &Cli,
    project_name: Option<&str>,
    mut presets: HashMap<String, PresetConfig>,
) -> RuntimeConfig {
    let mut config = RuntimeConfig::default();

    if let Some(base) = presets.remove(DEFAULT_PRESET) {
        base.apply(&mut config);
    }

    // Determine preset to use: CLI flag > Auto-detect > None
    let preset_key = cli.preset.as_deref().or(project_name);
    if let Some(preset) = preset_key.and_then(|k| presets.remove(k)) {
        preset.apply(&mut config);
    } else if let Some(key) = cli.preset.as_deref() {
        log::warn!("Preset '{}' not found, using defaults", key);
    }

    let overrides = PresetConfig {
        max_bytes: cli.max_bytes,
        max_json_bytes: cli.max_json_bytes,
        separator: cli.separator.as_deref().map(unescape),
        ignore_globs: cli.ignore.clone(),
        exclude_markdown: cli.include_markdown.then_some(false),
        include_headers: cli.no_headers.then_some(false),
        metadata_inside_fence: cli.metadata_inside_fence.then_some(true),
    };
    overrides.apply(&mut config);

    config.normalized()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::PathBuf;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("code_bundle").chain(args.iter().copied()))
    }

    fn presets(toml_src: &str) -> HashMap<String, PresetConfig> {
        toml::from_str::<PresetsFile>(toml_src).unwrap().presets
    }

    #[test]
    fn defaults_without_presets_or_flags() {
        let config = resolve_with_presets(&cli(&["."]), None, HashMap::new());
        assert_eq!(config, RuntimeConfig::default());
    }

    #[test]
    fn layering_order_is_default_preset_then_named_then_cli() {
        let presets = presets(
            r#"
            [default]
            max_bytes = 5000
            ignore_globs = ["**/*.log"]
            include_headers = false

            [webapp]
            max_bytes = 8000
            ignore_globs = ["**/dist/**", "**/*.log"]
            "#,
        );
        let config = resolve_with_presets(
            &cli(&[".", "--ignore", "**/*.tmp", "--metadata-inside-fence"]),
            Some("webapp"),
            presets,
        );

        assert_eq!(config.max_bytes, 8000);
        assert!(!config.include_headers);
        assert!(config.metadata_inside_fence);
        assert_eq!(
            config.ignore_globs,
            vec!["**/*.log", "**/dist/**", "**/*.tmp"]
        );
    }

    #[test]
    fn ignore_takes_one_glob_per_flag_and_keeps_paths() {
        let args = cli(&["--ignore", "**/*.log", "a.ts", "--ignore", "dist/**", "b.ts"]);
        assert_eq!(args.paths, vec![PathBuf::from("a.ts"), PathBuf::from("b.ts")]);

        let config = resolve_with_presets(&args, None, HashMap::new());
        assert_eq!(config.ignore_globs, vec!["**/*.log", "dist/**"]);
    }

    #[test]
    fn explicit_preset_beats_project_name() {
        let presets = presets(
            r#"
            [webapp]
            max_bytes = 8000
            [strict]
            max_bytes = 2000
            "#,
        );
        let config =
            resolve_with_presets(&cli(&[".", "--preset", "strict"]), Some("webapp"), presets);
        assert_eq!(config.max_bytes, 2000);
    }

    #[test]
    fn floors_and_fallbacks_apply() {
        let config = resolve_with_presets(
            &cli(&[".", "--max-bytes", "10", "--max-json-bytes", "0", "--separator", ""]),
            None,
            HashMap::new(),
        );
        assert_eq!(config.max_bytes, 1024);
        assert_eq!(config.max_json_bytes, 1024);
        assert_eq!(config.separator, "\n\n");
    }

    #[test]
    fn separator_escapes_are_expanded() {
        assert_eq!(unescape(r"\n---\n"), "\n---\n");
        assert_eq!(unescape(r"a\tb\\c\q"), "a\tb\\c\\q");
        assert_eq!(unescape(r"\r"), "\\r");
    }

    #[test]
    fn missing_presets_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_presets_from(&dir.path().join("presets.toml")).unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn malformed_presets_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("presets.toml");
        fs::write(&path, "[default]\nmax_bytes = \"lots\"\n").unwrap();
        assert!(load_presets_from(&path).is_err());
    }
}
