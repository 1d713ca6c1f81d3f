use crate::model::Role;
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Effectif requis pour un rôle sur un shift (0 = rôle non planifié).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRequirement {
    pub role: Role,
    pub required: u32,
}

impl RoleRequirement {
    pub fn new(role: Role, required: u32) -> Self {
        Self { role, required }
    }
}

/// Shift récurrent dans la journée.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftDefinition {
    pub name: String,
    /// Plage horaire affichée, ex. `7am-3pm`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours: Option<String>,
    #[serde(default)]
    pub requirements: Vec<RoleRequirement>,
}

impl ShiftDefinition {
    pub fn new<S: Into<String>>(name: S, requirements: Vec<RoleRequirement>) -> Self {
        Self {
            name: name.into(),
            hours: None,
            requirements,
        }
    }

    pub fn with_hours<S: Into<String>>(mut self, hours: S) -> Self {
        self.hours = Some(hours.into());
        self
    }

    pub fn required_for(&self, role: &Role) -> u32 {
        self.requirements
            .iter()
            .find(|r| &r.role == role)
            .map(|r| r.required)
            .unwrap_or(0)
    }

    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            bail!("shift name cannot be empty");
        }
        let mut seen = HashSet::new();
        for req in &self.requirements {
            if !seen.insert(&req.role) {
                bail!("shift {} lists role {} more than once", self.name, req.role);
            }
        }
        Ok(())
    }
}

/// Configuration statique des shifts, dans l'ordre de planification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftConfig {
    pub shifts: Vec<ShiftDefinition>,
}

impl ShiftConfig {
    /// Configuration de référence : trois shifts, pas de piste la nuit.
    pub fn reference() -> Self {
        let both = |cashier, forecourt| {
            vec![
                RoleRequirement::new(Role::Cashier, cashier),
                RoleRequirement::new(Role::Forecourt, forecourt),
            ]
        };
        Self {
            shifts: vec![
                ShiftDefinition::new("morning", both(2, 2)).with_hours("7am-3pm"),
                ShiftDefinition::new("evening", both(2, 2)).with_hours("3pm-11pm"),
                ShiftDefinition::new("night", both(2, 0)).with_hours("11pm-7am"),
            ],
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.shifts.is_empty() {
            bail!("shift configuration must contain at least one shift");
        }
        let mut names = HashSet::new();
        for shift in &self.shifts {
            shift.validate()?;
            if !names.insert(shift.name.as_str()) {
                bail!("duplicate shift name: {}", shift.name);
            }
        }
        Ok(())
    }

    pub fn shift(&self, name: &str) -> Option<&ShiftDefinition> {
        self.shifts.iter().find(|s| s.name == name)
    }
}

impl Default for ShiftConfig {
    fn default() -> Self {
        Self::reference()
    }
}

#[derive(Debug, Clone)]
pub struct ConfigInfo {
    pub name: String,
    pub config: ShiftConfig,
    pub path: PathBuf,
    pub modified: Option<DateTime<Utc>>,
}

/// Configurations de shifts nommées, un fichier `<nom>.json` par configuration.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    base_dir: PathBuf,
}

impl ConfigStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            base_dir: dir.as_ref().to_path_buf(),
        }
    }

    fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.base_dir)
            .with_context(|| format!("creating config directory {}", self.base_dir.display()))
    }

    pub fn save(&self, name: &str, config: &ShiftConfig) -> Result<PathBuf> {
        if name.trim().is_empty() {
            bail!("config name cannot be empty");
        }
        if name.contains(['/', '\\', '.']) {
            bail!("config name must not contain path separators or dots: {name}");
        }
        config.validate()?;
        self.ensure_dir()?;
        let path = self.base_dir.join(format!("{name}.json"));
        let json = serde_json::to_string_pretty(config)?;
        fs::write(&path, json).with_context(|| format!("writing config {}", path.display()))?;
        Ok(path)
    }

    pub fn load(&self, name: &str) -> Result<ShiftConfig> {
        load_config_from_file(self.base_dir.join(format!("{name}.json")))
    }

    pub fn list(&self) -> Result<Vec<ConfigInfo>> {
        if !self.base_dir.exists() {
            return Ok(Vec::new());
        }
        let mut infos = Vec::new();
        for entry in fs::read_dir(&self.base_dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()).map(str::to_string) else {
                continue;
            };
            let data = fs::read(&path)?;
            let config: ShiftConfig = match serde_json::from_slice(&data) {
                Ok(c) => c,
                Err(_err) => {
                    #[cfg(feature = "logging")]
                    tracing::warn!(
                        path = %path.display(),
                        error = %_err,
                        "skipping unreadable shift config"
                    );
                    continue;
                }
            };
            let modified = entry
                .metadata()
                .and_then(|meta| meta.modified())
                .ok()
                .map(DateTime::<Utc>::from);
            infos.push(ConfigInfo {
                name,
                config,
                path,
                modified,
            });
        }
        infos.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(infos)
    }
}

pub fn load_config_from_file<P: AsRef<Path>>(path: P) -> Result<ShiftConfig> {
    let path = path.as_ref();
    let data = fs::read(path).with_context(|| format!("reading config {}", path.display()))?;
    let config: ShiftConfig = serde_json::from_slice(&data)
        .with_context(|| format!("parsing config {}", path.display()))?;
    config.validate()?;
    Ok(config)
}

pub fn export_config_json<P: AsRef<Path>>(path: P, config: &ShiftConfig) -> Result<()> {
    let json = serde_json::to_string_pretty(config)?;
    fs::write(path, json)?;
    Ok(())
}
