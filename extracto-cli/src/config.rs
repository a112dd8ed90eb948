use anyhow::{Context, Result};
use extracto_finance::{DirectionRuleFile, DirectionRules};
use extracto_ingest::{Engine, EngineConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::{ensure_extracto_home, extracto_home};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub extract: ExtractSection,
    #[serde(default)]
    pub rules: RulesSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractSection {
    /// Resolved on PATH (default: "pdftotext")
    pub pdftotext_command: String,
    /// Extra args placed before the input/output arguments
    pub pdftotext_args: Vec<String>,
    /// Seconds before pdftotext is killed
    pub timeout_secs: u64,
}

impl Default for ExtractSection {
    fn default() -> Self {
        Self {
            pdftotext_command: "pdftotext".to_string(),
            // Reading order, not -layout: the engine expects the columns flattened.
            pdftotext_args: vec!["-enc".to_string(), "UTF-8".to_string()],
            timeout_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesSection {
    /// TOML file with extra `[[rules]]` for the direction classifier
    pub direction_rules: Option<PathBuf>,
    /// Use only the file's rules instead of appending them to the built-ins
    pub replace_defaults: bool,
}

impl Config {
    /// Build the engine, loading the direction rules file if one is configured.
    pub fn engine(&self, rules_override: Option<&Path>) -> Result<Engine> {
        let engine = Engine::new(self.engine.clone());
        let path = rules_override.or(self.rules.direction_rules.as_deref());
        let Some(path) = path else {
            return Ok(engine);
        };
        Ok(engine.with_direction_rules(load_direction_rules(path, self.rules.replace_defaults)?))
    }
}

pub fn load_direction_rules(path: &Path, replace_defaults: bool) -> Result<DirectionRules> {
    let file = DirectionRuleFile::from_file(path)?;
    Ok(file.into_rules(replace_defaults))
}

pub fn config_path() -> Result<PathBuf> {
    Ok(extracto_home()?.join("config.toml"))
}

pub fn parse_config(s: &str) -> Result<Config> {
    toml::from_str(s).context("parse config.toml")
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    parse_config(&s).with_context(|| format!("in {}", p.display()))
}

pub fn save_config(cfg: &Config) -> Result<PathBuf> {
    let p = ensure_extracto_home()?.join("config.toml");
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(p)
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    let written = save_config(&Config::default())?;
    println!("Wrote {}", written.display());
    Ok(())
}
