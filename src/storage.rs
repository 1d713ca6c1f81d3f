use crate::model::Workforce;
use anyhow::{bail, Context};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub trait Storage {
    /// Charge l'effectif (employés + congés) depuis un support.
    fn load(&self) -> anyhow::Result<Workforce>;
    /// Sauvegarde de manière atomique.
    fn save(&self, workforce: &Workforce) -> anyhow::Result<()>;
}

pub struct JsonStorage {
    path: PathBuf,
}

impl JsonStorage {
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        Ok(Self {
            path: path.as_ref().to_path_buf(),
        })
    }

    /// Charge l'effectif, ou un effectif vide si le fichier n'existe pas encore.
    pub fn load_or_default(&self) -> anyhow::Result<Workforce> {
        if !self.path.exists() {
            #[cfg(feature = "logging")]
            tracing::debug!(path = %self.path.display(), "no workforce file, starting empty");
            return Ok(Workforce::default());
        }
        self.load()
    }
}

impl Storage for JsonStorage {
    fn load(&self) -> anyhow::Result<Workforce> {
        let data =
            fs::read(&self.path).with_context(|| format!("reading {}", self.path.display()))?;
        let workforce: Workforce = serde_json::from_slice(&data)
            .with_context(|| format!("parsing {}", self.path.display()))?;
        let duplicates = workforce.duplicate_ids();
        if !duplicates.is_empty() {
            let ids: Vec<&str> = duplicates.iter().map(|id| id.as_str()).collect();
            bail!(
                "{} contains duplicate employee ids: {}",
                self.path.display(),
                ids.join(", ")
            );
        }
        #[cfg(feature = "logging")]
        for leave in workforce.orphan_leave() {
            tracing::warn!(
                leave = leave.id.as_str(),
                employee = leave.employee_id.as_str(),
                "leave request for unknown employee"
            );
        }
        #[cfg(feature = "logging")]
        tracing::debug!(
            employees = workforce.employees.len(),
            leave_requests = workforce.leave_requests.len(),
            "workforce loaded"
        );
        Ok(workforce)
    }

    fn save(&self, workforce: &Workforce) -> anyhow::Result<()> {
        let json = serde_json::to_vec_pretty(workforce)?;
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir).with_context(|| "creating temp file")?;
        tmp.write_all(&json)?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).with_context(|| "atomic rename")?;
        #[cfg(feature = "logging")]
        tracing::debug!(path = %self.path.display(), "workforce saved");
        Ok(())
    }
}
