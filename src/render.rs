use crate::scheduler::{DayAssignment, RoleAssignment, ScheduleResult, Shortage, Summary};

const WIDE: usize = 80;
const NARROW: usize = 40;

/// Permet de customiser le rendu d'un planning (texte, mail, etc.).
pub trait ScheduleRenderer {
    fn render(&self, schedule: &ScheduleResult) -> String;
}

/// Rendu texte destiné au terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextSchedule;

impl ScheduleRenderer for TextSchedule {
    fn render(&self, schedule: &ScheduleResult) -> String {
        let mut out = String::new();
        push_header(&mut out, &schedule.summary);
        for day in &schedule.days {
            push_day(&mut out, day);
        }
        push_distribution(&mut out, &schedule.summary);
        out
    }
}

/// Marqueur de sous-effectif, ex. `[SHORTAGE: 1 cashier(s) needed]`.
pub fn shortage_tag(shortage: &Shortage) -> String {
    format!(
        "[SHORTAGE: {} {} needed]",
        shortage.missing,
        shortage.role.shortage_noun()
    )
}

/// Liste affichée pour un rôle : noms puis marqueur éventuel.
pub fn role_entries(assignment: &RoleAssignment) -> Vec<String> {
    let mut entries = assignment.assigned.clone();
    if let Some(shortage) = &assignment.shortage {
        entries.push(shortage_tag(shortage));
    }
    entries
}

fn push_header(out: &mut String, summary: &Summary) {
    let totals: Vec<String> = summary
        .role_counts
        .iter()
        .map(|(role, n)| format!("{n} {}", role.heading()))
        .collect();
    let totals = if totals.is_empty() {
        "none".to_string()
    } else {
        totals.join(", ")
    };

    out.push_str(&"=".repeat(WIDE));
    out.push('\n');
    out.push_str("WORK SCHEDULE SUMMARY\n");
    out.push_str(&"=".repeat(WIDE));
    out.push('\n');
    out.push_str(&format!(
        "Period: {} to {}\n",
        summary.start_date, summary.end_date
    ));
    out.push_str(&format!("Total Staff: {totals}\n"));
    out.push_str(&"-".repeat(WIDE));
    out.push('\n');
}

fn push_day(out: &mut String, day: &DayAssignment) {
    out.push_str(&format!("\n{} ({})\n", day.date, day.date.format("%A")));
    out.push_str(&"-".repeat(NARROW));
    out.push('\n');

    for shift in &day.shifts {
        match &shift.hours {
            Some(hours) => out.push_str(&format!("  {} ({hours}):\n", shift.shift)),
            None => out.push_str(&format!("  {}:\n", shift.shift)),
        }
        let mut any = false;
        for role in &shift.roles {
            let entries = role_entries(role);
            if entries.is_empty() {
                continue;
            }
            any = true;
            out.push_str(&format!(
                "    • {}: {}\n",
                role.role.heading(),
                entries.join(", ")
            ));
        }
        if !any {
            out.push_str("    • No staff assigned\n");
        }
    }
}

fn push_distribution(out: &mut String, summary: &Summary) {
    out.push('\n');
    out.push_str(&"=".repeat(WIDE));
    out.push('\n');
    out.push_str("Shift distribution:\n");
    if summary.distribution.is_empty() {
        out.push_str("  (no assignments)\n");
    }
    for (name, count) in summary.distribution.iter() {
        out.push_str(&format!("  {name}: {count}\n"));
    }
}
