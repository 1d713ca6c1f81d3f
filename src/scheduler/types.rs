use super::fairness::FairnessCounter;
use crate::model::Role;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;
use thiserror::Error;

/// Politique de choix quand le pool disponible dépasse le besoin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionPolicy {
    /// Tirage uniforme sans remise.
    #[default]
    Random,
    /// Priorité aux compteurs d'équité les plus bas, égalités tirées au sort.
    LeastAssigned,
}

impl FromStr for SelectionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random" => Ok(SelectionPolicy::Random),
            "least-assigned" | "least_assigned" | "fair" => Ok(SelectionPolicy::LeastAssigned),
            other => Err(format!("unknown selection policy: {other}")),
        }
    }
}

/// Sous-effectif pour un triplet (date, shift, rôle).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shortage {
    pub date: NaiveDate,
    pub shift: String,
    pub role: Role,
    pub missing: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAssignment {
    pub role: Role,
    pub required: u32,
    /// Noms affectés, sans marqueur.
    pub assigned: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shortage: Option<Shortage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftAssignment {
    pub shift: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours: Option<String>,
    pub roles: Vec<RoleAssignment>,
}

impl ShiftAssignment {
    pub fn role(&self, role: &Role) -> Option<&RoleAssignment> {
        self.roles.iter().find(|r| &r.role == role)
    }
}

/// Planning d'une journée, shifts dans l'ordre de la configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayAssignment {
    pub date: NaiveDate,
    pub shifts: Vec<ShiftAssignment>,
}

impl DayAssignment {
    pub fn shift(&self, name: &str) -> Option<&ShiftAssignment> {
        self.shifts.iter().find(|s| s.shift == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total_days: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub role_counts: BTreeMap<Role, usize>,
    pub distribution: FairnessCounter,
}

impl Summary {
    pub fn total_for(&self, role: &Role) -> usize {
        self.role_counts.get(role).copied().unwrap_or(0)
    }
}

/// Résultat d'une génération : jours contigus puis le résumé de la période.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleResult {
    pub days: Vec<DayAssignment>,
    pub summary: Summary,
}

impl ScheduleResult {
    pub fn shortages(&self) -> impl Iterator<Item = &Shortage> {
        self.days
            .iter()
            .flat_map(|d| d.shifts.iter())
            .flat_map(|s| s.roles.iter())
            .filter_map(|r| r.shortage.as_ref())
    }

    pub fn has_shortage(&self) -> bool {
        self.shortages().next().is_some()
    }

    /// Nombre total de places réellement pourvues.
    pub fn filled_slots(&self) -> usize {
        self.days
            .iter()
            .flat_map(|d| d.shifts.iter())
            .flat_map(|s| s.roles.iter())
            .map(|r| r.assigned.len())
            .sum()
    }
}

#[derive(Error, Debug)]
pub enum SchedError {
    #[error("invalid day count: {0} (must be >= 1)")]
    InvalidDayCount(u32),
    #[error("duplicate employee id in roster: {0}")]
    DuplicateEmployee(String),
    #[error("date range out of bounds starting at {0}")]
    DateOutOfRange(NaiveDate),
    #[error("invalid shift configuration: {0}")]
    InvalidConfig(String),
}
