use super::fairness::FairnessCounter;
use super::types::{RoleAssignment, SelectionPolicy, ShiftAssignment, Shortage};
use crate::config::ShiftDefinition;
use crate::model::{Employee, Role};
use chrono::NaiveDate;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeMap;

/// Remplit un shift pour une date. Ne peut pas échouer : un pool insuffisant
/// donne un marqueur de sous-effectif.
pub(super) fn assign_shift<R: Rng + ?Sized>(
    shift: &ShiftDefinition,
    date: NaiveDate,
    pools: &BTreeMap<Role, Vec<&Employee>>,
    counter: &mut FairnessCounter,
    policy: SelectionPolicy,
    rng: &mut R,
) -> ShiftAssignment {
    let roles = shift
        .requirements
        .iter()
        .map(|req| {
            let pool = pools.get(&req.role).map(Vec::as_slice).unwrap_or(&[]);
            let need = req.required as usize;

            let (chosen, shortage) = if need == 0 {
                (Vec::new(), None)
            } else if pool.len() >= need {
                (select(pool, need, counter, policy, &mut *rng), None)
            } else {
                let missing = (need - pool.len()) as u32;
                let shortage = Shortage {
                    date,
                    shift: shift.name.clone(),
                    role: req.role.clone(),
                    missing,
                };
                (pool.to_vec(), Some(shortage))
            };

            let assigned: Vec<String> = chosen.iter().map(|e| e.name.clone()).collect();
            for name in &assigned {
                counter.record(name);
            }

            RoleAssignment {
                role: req.role.clone(),
                required: req.required,
                assigned,
                shortage,
            }
        })
        .collect();

    ShiftAssignment {
        shift: shift.name.clone(),
        hours: shift.hours.clone(),
        roles,
    }
}

fn select<'a, R: Rng + ?Sized>(
    pool: &[&'a Employee],
    need: usize,
    counter: &FairnessCounter,
    policy: SelectionPolicy,
    rng: &mut R,
) -> Vec<&'a Employee> {
    match policy {
        SelectionPolicy::Random => pool.choose_multiple(rng, need).copied().collect(),
        SelectionPolicy::LeastAssigned => {
            let mut shuffled = pool.to_vec();
            shuffled.shuffle(rng);
            // tri stable : l'ordre aléatoire départage les égalités
            shuffled.sort_by_key(|e| counter.get(&e.name));
            shuffled.truncate(need);
            shuffled
        }
    }
}
