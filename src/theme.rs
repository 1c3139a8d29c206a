use std::path::{Path, PathBuf};
use std::{env, fs, io};

/// Colour theme for the rendered report. The choice persists across runs
/// as a single value in the user's config directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl std::str::FromStr for Theme {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        })
    }
}

/// `$XDG_CONFIG_HOME/wordlens/theme`, falling back to
/// `~/.config/wordlens/theme`.
pub fn preference_path() -> Option<PathBuf> {
    if let Ok(dir) = env::var("XDG_CONFIG_HOME")
        && !dir.is_empty()
    {
        return Some(PathBuf::from(dir).join("wordlens").join("theme"));
    }
    env::var("HOME")
        .ok()
        .filter(|home| !home.is_empty())
        .map(|home| {
            PathBuf::from(home)
                .join(".config")
                .join("wordlens")
                .join("theme")
        })
}

/// Resolve the active theme: stored preference, else `WORDLENS_THEME` env,
/// else light. A missing or unreadable preference file is never an error.
pub fn load(path: Option<&Path>) -> Theme {
    if let Some(path) = path
        && let Ok(raw) = fs::read_to_string(path)
        && let Ok(theme) = raw.trim().parse()
    {
        return theme;
    }
    if let Ok(raw) = env::var("WORDLENS_THEME")
        && let Ok(theme) = raw.trim().parse()
    {
        return theme;
    }
    Theme::Light
}

pub fn store(path: &Path, theme: Theme) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, theme.to_string())
}
