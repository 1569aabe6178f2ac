use crate::calendar::MissionCalendar;
use crate::model::{
    DayRange, Obligation, PersonId, PersonRecord, RequestedRole, Task, TaskId, TaskKind,
};
use crate::scheduler::{DutyGrid, Horizon, ShiftPlan};
use crate::storage::{JsonStorage, Storage};
use anyhow::bail;
use chrono::NaiveDate;
use csv::WriterBuilder;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Document d'entrée : horizon, personnes et tâches déjà résolues.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanInput {
    #[serde(default)]
    pub horizon: Horizon,
    #[serde(default)]
    pub people: Vec<PersonRecord>,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl PlanInput {
    pub fn validate(&self) -> anyhow::Result<()> {
        self.horizon.validate()?;
        let mut ids = HashSet::new();
        for person in &self.people {
            if person.id.as_str().trim().is_empty() {
                bail!("person id cannot be empty");
            }
            if !ids.insert(person.id.as_str()) {
                bail!("duplicate person id: {}", person.id);
            }
        }
        let mut ids = HashSet::new();
        for task in &self.tasks {
            if !ids.insert(task.id.as_str()) {
                bail!("duplicate task id: {}", task.id);
            }
            if task.duration < 0 {
                bail!("task {} has a negative duration", task.id);
            }
        }
        Ok(())
    }

    pub fn into_plan(self) -> ShiftPlan {
        ShiftPlan::from_records(self.horizon, &self.people, self.tasks)
    }

    /// Petit exemple complet, utilisé par `rota-cli init`.
    pub fn sample() -> Self {
        let launch = NaiveDate::from_ymd_opt(2021, 12, 18).unwrap_or_default();
        let mut horizon = Horizon::new(21, 4, 2)
            .with_window(10, 13, 3)
            .with_buffers(1, 1);
        horizon.calendar = MissionCalendar::anchored(launch, -3);

        let person = |id: &str, surname: &str, max_days: usize| PersonRecord {
            id: PersonId::new(id),
            forename: String::new(),
            surname: surname.to_string(),
            email: String::new(),
            organisation: String::new(),
            colour: String::new(),
            max_days,
            max_contiguous_days: 7,
            blackout: Vec::new(),
            greyout: Vec::new(),
            scheduled: Vec::new(),
            analysis: Vec::new(),
            obligations: Vec::new(),
        };

        let mut ada = person("AL", "Lovelace", 14);
        ada.scheduled.push(DayRange::new(0, 2));
        ada.obligations.push(Obligation {
            task: TaskId::new("SUP-1"),
            role: RequestedRole::Analyst,
        });
        let mut alan = person("AT", "Turing", 10);
        alan.blackout.push(DayRange::new(5, 8));
        alan.obligations.push(Obligation {
            task: TaskId::new("ACT-1"),
            role: RequestedRole::Console,
        });
        let mut grace = person("GH", "Hopper", 12);
        grace.greyout.push(DayRange::day(15));
        grace.obligations.push(Obligation {
            task: TaskId::new("MS-1"),
            role: RequestedRole::Analyst,
        });
        let edsger = person("ED", "Dijkstra", 9);

        let mut activity = Task::new("ACT-1", TaskKind::PrimaryActivity, 11, 2);
        activity.label = "Routine activity".into();
        let mut support = Task::new("SUP-1", TaskKind::SupportActivity, 6, 2);
        support.label = "Support activity".into();
        let mut milestone = Task::new("MS-1", TaskKind::Milestone, 12, 0);
        milestone.label = "Milestone review".into();

        Self {
            horizon,
            people: vec![ada, alan, grace, edsger],
            tasks: vec![support, activity, milestone],
        }
    }
}

/// Emploi du temps d'une personne dans l'instantané de sortie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimetableEntry {
    pub id: PersonId,
    pub surname: String,
    pub allocated: usize,
    pub max_allocation: usize,
    /// Un code de rôle par jour.
    pub attendance: String,
}

/// Instantané du plan final, remis aux collaborateurs de rendu.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanSnapshot {
    pub labels: Vec<String>,
    pub daily_capacity: Vec<usize>,
    /// `grid[seat][day]`
    pub grid: Vec<Vec<Option<PersonId>>>,
    pub analysis: Vec<Vec<Option<PersonId>>>,
    pub timetables: Vec<TimetableEntry>,
    pub advisories: Vec<String>,
}

impl PlanSnapshot {
    pub fn capture(plan: &ShiftPlan) -> Self {
        Self {
            labels: day_labels(plan.horizon()),
            daily_capacity: plan.daily_capacity().to_vec(),
            grid: grid_ids(plan, plan.grid()),
            analysis: grid_ids(plan, &plan.analysis_grid()),
            timetables: plan
                .people()
                .iter()
                .map(|p| TimetableEntry {
                    id: p.id.clone(),
                    surname: p.surname.clone(),
                    allocated: p.allocated_days(),
                    max_allocation: p.max_allocation,
                    attendance: p.attendance(),
                })
                .collect(),
            advisories: plan.advisories().iter().map(ToString::to_string).collect(),
        }
    }
}

fn grid_ids(plan: &ShiftPlan, grid: &DutyGrid) -> Vec<Vec<Option<PersonId>>> {
    (0..grid.seats())
        .map(|seat| {
            grid.row(seat)
                .iter()
                .map(|cell| cell.and_then(|idx| plan.people().get(idx)).map(|p| p.id.clone()))
                .collect()
        })
        .collect()
}

pub fn day_labels(horizon: &Horizon) -> Vec<String> {
    (0..horizon.n_days).map(|day| horizon.label(day)).collect()
}

/// Lecture et validation d'un document d'entrée JSON.
pub fn load_plan_input<P: AsRef<Path>>(path: P) -> anyhow::Result<PlanInput> {
    let input: PlanInput = JsonStorage::open(path)?.load()?;
    input.validate()?;
    Ok(input)
}

/// Export CSV de la grille: header `seat,<jours...>`, cellules = id de personne
pub fn export_grid_csv<P: AsRef<Path>>(path: P, plan: &ShiftPlan) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    let mut header = vec!["seat".to_string()];
    header.extend(day_labels(plan.horizon()));
    w.write_record(&header)?;

    let grid = plan.grid();
    for seat in 0..grid.seats() {
        let mut record = vec![seat.to_string()];
        record.extend(
            (0..grid.days())
                .map(|day| plan.occupant(seat, day).map_or_else(String::new, |p| p.id.to_string())),
        );
        w.write_record(&record)?;
    }
    w.flush()?;
    Ok(())
}

/// Export CSV des emplois du temps: header `id,surname,allocated,max,<jours...>`
pub fn export_timetables_csv<P: AsRef<Path>>(path: P, plan: &ShiftPlan) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    let mut header: Vec<String> = ["id", "surname", "allocated", "max"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    header.extend(day_labels(plan.horizon()));
    w.write_record(&header)?;

    for p in plan.people() {
        let mut record = vec![
            p.id.to_string(),
            p.surname.clone(),
            p.allocated_days().to_string(),
            p.max_allocation.to_string(),
        ];
        record.extend(p.timetable().iter().map(|r| r.code().to_string()));
        w.write_record(&record)?;
    }
    w.flush()?;
    Ok(())
}
