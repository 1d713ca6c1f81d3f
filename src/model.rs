use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Identifiant fort pour Employee (fourni par l'appelant, ex. `C001`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EmployeeId(String);

impl EmployeeId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Rôle d'un employé. Ensemble fermé mais extensible via `Other`.
///
/// Sérialisé sous forme de chaîne simple (`"cashier"`, `"forecourt"`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Role {
    Cashier,
    Forecourt,
    Other(String),
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::Cashier => "cashier",
            Role::Forecourt => "forecourt",
            Role::Other(s) => s,
        }
    }

    /// Libellé utilisé en tête de liste dans le rendu texte.
    pub fn heading(&self) -> String {
        match self {
            Role::Cashier => "Cashiers".to_string(),
            Role::Forecourt => "Forecourt".to_string(),
            Role::Other(s) => {
                let mut chars = s.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            }
        }
    }

    /// Nom employé dans le marqueur de sous-effectif.
    pub fn shortage_noun(&self) -> String {
        match self {
            Role::Cashier => "cashier(s)".to_string(),
            Role::Forecourt => "forecourt staff".to_string(),
            Role::Other(s) => format!("{s}(s)"),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().to_ascii_lowercase();
        match norm.as_str() {
            "" => Err("role cannot be empty".to_string()),
            "cashier" => Ok(Role::Cashier),
            "forecourt" | "forecourt staff" => Ok(Role::Forecourt),
            _ => Ok(Role::Other(norm)),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

/// Employé (lu par le planificateur, jamais modifié)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hire_date: Option<NaiveDate>,
}

impl Employee {
    pub fn new<I: AsRef<str>, N: Into<String>>(id: I, name: N, role: Role) -> Self {
        Self {
            id: EmployeeId::new(id),
            name: name.into(),
            role,
            phone: None,
            email: None,
            hire_date: None,
        }
    }
}

/// Identifiant fort pour une demande de congé
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LeaveId(String);

impl LeaveId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaveStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl LeaveStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeaveStatus::Pending => "pending",
            LeaveStatus::Approved => "approved",
            LeaveStatus::Rejected => "rejected",
        }
    }
}

impl FromStr for LeaveStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(LeaveStatus::Pending),
            "approved" => Ok(LeaveStatus::Approved),
            "rejected" => Ok(LeaveStatus::Rejected),
            other => Err(format!("unknown leave status: {other}")),
        }
    }
}

/// Congé d'un employé : intervalle de dates inclusif `[start, end]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveInterval {
    #[serde(default = "LeaveId::random")]
    pub id: LeaveId,
    pub employee_id: EmployeeId,
    pub start: NaiveDate,
    pub end: NaiveDate,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub status: LeaveStatus,
}

impl LeaveInterval {
    /// Crée une demande en attente. Aucune validation : un intervalle inversé
    /// est accepté ici et ne couvre simplement aucune date.
    pub fn new(employee_id: EmployeeId, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            id: LeaveId::random(),
            employee_id,
            start,
            end,
            reason: String::new(),
            status: LeaveStatus::Pending,
        }
    }

    pub fn with_status(mut self, status: LeaveStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_reason<S: Into<String>>(mut self, reason: S) -> Self {
        self.reason = reason.into();
        self
    }

    pub fn is_approved(&self) -> bool {
        self.status == LeaveStatus::Approved
    }

    pub fn is_well_formed(&self) -> bool {
        self.start <= self.end
    }

    /// Vrai si le congé est approuvé et couvre `date` (bornes incluses).
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.is_approved() && self.start <= date && date <= self.end
    }
}

/// Effectif complet : employés et demandes de congé.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Workforce {
    pub employees: Vec<Employee>,
    #[serde(default)]
    pub leave_requests: Vec<LeaveInterval>,
}

impl Workforce {
    pub fn find_employee<'a>(&'a self, id: &EmployeeId) -> Option<&'a Employee> {
        self.employees.iter().find(|e| &e.id == id)
    }

    /// Ajoute un employé en refusant les identifiants en double.
    pub fn add_employee(&mut self, employee: Employee) -> Result<(), String> {
        if self.find_employee(&employee.id).is_some() {
            return Err(format!("duplicate employee id: {}", employee.id));
        }
        self.employees.push(employee);
        Ok(())
    }

    /// Ids présents plusieurs fois (fichier édité à la main, fusion...).
    pub fn duplicate_ids(&self) -> Vec<&EmployeeId> {
        let mut seen = HashSet::new();
        let mut dups = Vec::new();
        for e in &self.employees {
            if !seen.insert(&e.id) && !dups.contains(&&e.id) {
                dups.push(&e.id);
            }
        }
        dups
    }

    /// Congés dont l'employé n'existe plus dans l'effectif.
    pub fn orphan_leave(&self) -> impl Iterator<Item = &LeaveInterval> {
        self.leave_requests
            .iter()
            .filter(|l| self.find_employee(&l.employee_id).is_none())
    }

    /// Enregistre une demande de congé pour un employé connu.
    pub fn request_leave(&mut self, leave: LeaveInterval) -> Result<LeaveId, String> {
        if self.find_employee(&leave.employee_id).is_none() {
            return Err(format!("unknown employee id: {}", leave.employee_id));
        }
        if !leave.is_well_formed() {
            return Err("leave end must not be before start".to_string());
        }
        let id = leave.id.clone();
        self.leave_requests.push(leave);
        Ok(id)
    }
}
