#![forbid(unsafe_code)]
//! Shiftplan : bibliothèque de planification des équipes (sans BD).
//!
//! - Filtrage des disponibilités à partir des congés approuvés.
//! - Affectation par quota et par rôle, avec détection des sous-effectifs.
//! - Compteur d'équité par employé sur la période.
//! - Stockage fichiers (JSON/CSV) et rendu texte en dehors du cœur.

pub mod config;
pub mod io;
pub mod model;
pub mod render;
pub mod scheduler;
pub mod storage;

pub use config::{ConfigStore, RoleRequirement, ShiftConfig, ShiftDefinition};
pub use model::{Employee, EmployeeId, LeaveId, LeaveInterval, LeaveStatus, Role, Workforce};
pub use render::{ScheduleRenderer, TextSchedule};
pub use scheduler::{
    DayAssignment, FairnessCounter, LeaveIndex, LeaveLookup, RoleAssignment, ScheduleResult,
    SchedError, Scheduler, SelectionPolicy, ShiftAssignment, Shortage, Summary,
};
