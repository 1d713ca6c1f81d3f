use crate::model::{Employee, EmployeeId, LeaveInterval, Role};
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashSet};

/// Source des absences : ids indisponibles à une date donnée.
///
/// Seuls les congés approuvés comptent. Un intervalle inversé ne couvre aucune date.
pub trait LeaveLookup {
    fn unavailable_on(&self, date: NaiveDate) -> HashSet<EmployeeId>;
}

impl LeaveLookup for [LeaveInterval] {
    fn unavailable_on(&self, date: NaiveDate) -> HashSet<EmployeeId> {
        self.iter()
            .filter(|leave| leave.covers(date))
            .map(|leave| leave.employee_id.clone())
            .collect()
    }
}

impl LeaveLookup for Vec<LeaveInterval> {
    fn unavailable_on(&self, date: NaiveDate) -> HashSet<EmployeeId> {
        self.as_slice().unavailable_on(date)
    }
}

/// Index des congés approuvés et bien formés, triés par date de début.
#[derive(Debug, Clone, Default)]
pub struct LeaveIndex {
    entries: Vec<(NaiveDate, NaiveDate, EmployeeId)>,
}

impl LeaveIndex {
    pub fn new(leaves: &[LeaveInterval]) -> Self {
        let mut entries: Vec<_> = leaves
            .iter()
            .filter(|l| l.is_approved() && l.is_well_formed())
            .map(|l| (l.start, l.end, l.employee_id.clone()))
            .collect();
        entries.sort_by_key(|(start, _, _)| *start);
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl LeaveLookup for LeaveIndex {
    fn unavailable_on(&self, date: NaiveDate) -> HashSet<EmployeeId> {
        let upto = self.entries.partition_point(|(start, _, _)| *start <= date);
        self.entries[..upto]
            .iter()
            .filter(|(_, end, _)| date <= *end)
            .map(|(_, _, id)| id.clone())
            .collect()
    }
}

/// Partition du roster par rôle, ordre du roster conservé.
pub(super) fn partition_by_role(roster: &[Employee]) -> BTreeMap<Role, Vec<&Employee>> {
    let mut out: BTreeMap<Role, Vec<&Employee>> = BTreeMap::new();
    for emp in roster {
        out.entry(emp.role.clone()).or_default().push(emp);
    }
    out
}

pub(super) fn available<'a>(
    staff: &[&'a Employee],
    unavailable: &HashSet<EmployeeId>,
) -> Vec<&'a Employee> {
    staff
        .iter()
        .copied()
        .filter(|e| !unavailable.contains(&e.id))
        .collect()
}
