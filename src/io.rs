use crate::model::{Employee, EmployeeId, LeaveInterval, LeaveStatus, Role};
use crate::render;
use crate::scheduler::ScheduleResult;
use anyhow::{bail, Context};
use chrono::NaiveDate;
use csv::{ReaderBuilder, WriterBuilder};
use std::fs;
use std::path::Path;

/// Import d'employés depuis CSV: header `id,name,role[,phone][,email]`
pub fn import_employees_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Employee>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let id = rec.get(0).context("missing id")?.trim();
        let name = rec.get(1).context("missing name")?.trim();
        let role = rec.get(2).context("missing role")?.trim();
        if id.is_empty() || name.is_empty() {
            bail!("invalid employee row (empty)");
        }
        let role: Role = role
            .parse()
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("invalid role for employee {id}"))?;
        let mut employee = Employee::new(id, name, role);
        employee.phone = optional(rec.get(3));
        employee.email = optional(rec.get(4));
        out.push(employee);
    }
    Ok(out)
}

/// Import de congés: header `employee_id,start,end[,reason][,status]` (dates `YYYY-MM-DD`)
pub fn import_leave_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<LeaveInterval>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let employee = rec.get(0).context("missing employee_id")?.trim();
        if employee.is_empty() {
            bail!("invalid leave row (empty employee_id)");
        }
        let start = parse_date(rec.get(1).context("missing start")?)?;
        let end = parse_date(rec.get(2).context("missing end")?)?;
        let mut leave = LeaveInterval::new(EmployeeId::new(employee), start, end);
        if let Some(reason) = optional(rec.get(3)) {
            leave.reason = reason;
        }
        if let Some(status) = optional(rec.get(4)) {
            leave.status = status
                .parse::<LeaveStatus>()
                .map_err(anyhow::Error::msg)
                .with_context(|| format!("invalid status for employee {employee}"))?;
        }
        out.push(leave);
    }
    Ok(out)
}

pub fn parse_date(raw: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .with_context(|| format!("invalid date (expected YYYY-MM-DD): {raw}"))
}

fn optional(field: Option<&str>) -> Option<String> {
    field
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Export JSON du planning (jolie mise en forme)
pub fn export_schedule_json<P: AsRef<Path>>(path: P, schedule: &ScheduleResult) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(schedule)?;
    fs::write(path, s)?;
    Ok(())
}

/// Export CSV à plat: header `date,shift,role,required,assigned,shortage`
pub fn export_schedule_csv<P: AsRef<Path>>(path: P, schedule: &ScheduleResult) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record(["date", "shift", "role", "required", "assigned", "shortage"])?;
    for day in &schedule.days {
        let date = day.date.to_string();
        for shift in &day.shifts {
            for role in &shift.roles {
                let required = role.required.to_string();
                let assigned = role.assigned.join(";");
                let shortage = role
                    .shortage
                    .as_ref()
                    .map(render::shortage_tag)
                    .unwrap_or_default();
                w.write_record([
                    date.as_str(),
                    shift.shift.as_str(),
                    role.role.as_str(),
                    required.as_str(),
                    assigned.as_str(),
                    shortage.as_str(),
                ])?;
            }
        }
    }
    w.flush()?;
    Ok(())
}
