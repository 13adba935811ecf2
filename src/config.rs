use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Guide characters drawn in front of tree rows.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeStyle {
    #[default]
    Unicode,
    Ascii,
}

impl TreeStyle {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unicode => "unicode",
            Self::Ascii => "ascii",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "unicode" => Some(Self::Unicode),
            "ascii" => Some(Self::Ascii),
            _ => None,
        }
    }
}

/// Persistent defaults, stored as command-line flag tokens.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub no_tree: bool,
    pub tree_focus: bool,
    pub perf: bool,
    pub tree_style: Option<TreeStyle>,
    pub log_file: Option<PathBuf>,
}

impl ConfigFlags {
    /// Merge `other` on top of `self`: switches accumulate, options from
    /// `other` win when set.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            no_tree: self.no_tree || other.no_tree,
            tree_focus: self.tree_focus || other.tree_focus,
            perf: self.perf || other.perf,
            tree_style: other.tree_style.or(self.tree_style),
            log_file: other.log_file.clone().or_else(|| self.log_file.clone()),
        }
    }

    fn to_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if self.no_tree {
            lines.push("--no-tree".to_string());
        }
        if self.tree_focus {
            lines.push("--tree-focus".to_string());
        }
        if let Some(style) = self.tree_style {
            lines.push(format!("--tree-style {}", style.as_str()));
        }
        if self.perf {
            lines.push("--perf".to_string());
        }
        if let Some(path) = &self.log_file {
            lines.push(format!("--log-file {}", path.display()));
        }
        lines
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("mindmark").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("mindmark")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("mindmark").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join(".config")
                .join("mindmark")
                .join("config");
        }
    }

    local_override_path()
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".mindmarkrc")
}

pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split_whitespace().map(ToOwned::to_owned))
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

/// Effective defaults before the command line: global file, then the local
/// override on top.
pub fn load_layered(global: &Path, local: &Path) -> Result<ConfigFlags> {
    let global = load_config_flags(global)?;
    let local = load_config_flags(local)?;
    Ok(global.union(&local))
}

pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = vec!["# mindmark defaults (saved with --save)".to_string()];
    lines.extend(flags.to_lines());
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Pick known flags out of raw tokens. Unknown tokens (including a file
/// argument) are ignored.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();
        match token {
            "--no-tree" => flags.no_tree = true,
            "--tree-focus" => flags.tree_focus = true,
            "--perf" => flags.perf = true,
            "--tree-style" => {
                if let Some(next) = tokens.get(i + 1) {
                    flags.tree_style = TreeStyle::parse(next);
                    i += 1;
                }
            }
            "--log-file" => {
                if let Some(next) = tokens.get(i + 1) {
                    flags.log_file = Some(PathBuf::from(next));
                    i += 1;
                }
            }
            _ => {
                if let Some(value) = token.strip_prefix("--tree-style=") {
                    flags.tree_style = TreeStyle::parse(value);
                } else if let Some(value) = token.strip_prefix("--log-file=") {
                    flags.log_file = Some(PathBuf::from(value));
                }
            }
        }
        i += 1;
    }
    flags
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn tokens(args: &[&str]) -> Vec<String> {
        args.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_parse_flag_tokens_extracts_known_flags() {
        let args = tokens(&[
            "mindmark",
            "--no-tree",
            "--tree-focus",
            "--tree-style",
            "ascii",
            "--log-file=mindmark.log",
            "plan.md",
        ]);
        let flags = parse_flag_tokens(&args);
        assert!(flags.no_tree);
        assert!(flags.tree_focus);
        assert!(!flags.perf);
        assert_eq!(flags.tree_style, Some(TreeStyle::Ascii));
        assert_eq!(flags.log_file, Some(PathBuf::from("mindmark.log")));
    }

    #[test]
    fn test_unknown_style_is_dropped() {
        let flags = parse_flag_tokens(&tokens(&["--tree-style", "fancy"]));
        assert_eq!(flags.tree_style, None);
    }

    #[test]
    fn test_trailing_option_without_value_is_ignored() {
        let flags = parse_flag_tokens(&tokens(&["--perf", "--log-file"]));
        assert!(flags.perf);
        assert_eq!(flags.log_file, None);
    }

    #[test]
    fn test_config_union_merges_cli_over_file_for_options() {
        let file = ConfigFlags {
            no_tree: true,
            tree_style: Some(TreeStyle::Ascii),
            ..ConfigFlags::default()
        };
        let cli = ConfigFlags {
            tree_focus: true,
            tree_style: Some(TreeStyle::Unicode),
            ..ConfigFlags::default()
        };
        let merged = file.union(&cli);
        assert!(merged.no_tree);
        assert!(merged.tree_focus);
        assert_eq!(merged.tree_style, Some(TreeStyle::Unicode));
    }

    #[test]
    fn test_save_load_and_clear_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config");
        let flags = ConfigFlags {
            no_tree: true,
            tree_focus: true,
            perf: true,
            tree_style: Some(TreeStyle::Ascii),
            log_file: Some(PathBuf::from("mindmark.log")),
        };

        save_config_flags(&path, &flags).unwrap();
        assert_eq!(load_config_flags(&path).unwrap(), flags);

        clear_config_flags(&path).unwrap();
        assert!(!path.exists());
        assert_eq!(load_config_flags(&path).unwrap(), ConfigFlags::default());
    }

    #[test]
    fn test_local_file_overrides_global() {
        let dir = tempdir().unwrap();
        let global = dir.path().join("config");
        let local = dir.path().join(".mindmarkrc");
        fs::write(&global, "--perf\n--tree-style ascii\n").unwrap();
        fs::write(&local, "--tree-style unicode\n").unwrap();

        let flags = load_layered(&global, &local).unwrap();
        assert!(flags.perf);
        assert_eq!(flags.tree_style, Some(TreeStyle::Unicode));
    }
}
