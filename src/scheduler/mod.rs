mod check;
mod grid;
mod placement;
mod repair;
pub mod rules;
mod types;

pub use grid::DutyGrid;
pub use rules::{next_role, DayContext, Decision, GridEffect, Refusal, Request};
pub use types::{
    Advisory, AdvisoryKind, CapacityWindow, ConsistencyReport, DayStats, Horizon, Phase, PlanError,
};

use crate::model::{Person, PersonId, PersonRecord, Role, SupportLink, Task, TaskKind, TaskLink};
use tracing::{info, warn};

/// ShiftPlan : possède la grille et les personnes pendant toute l'allocation.
#[derive(Debug)]
pub struct ShiftPlan {
    horizon: Horizon,
    capacity: Vec<usize>,
    grid: DutyGrid,
    people: Vec<Person>,
    tasks: Vec<Task>,
    advisories: Vec<Advisory>,
    phase: Phase,
}

impl ShiftPlan {
    /// Construit le plan à partir de personnes déjà liées à leurs tâches.
    pub fn new(horizon: Horizon, mut people: Vec<Person>, mut tasks: Vec<Task>) -> Self {
        for person in people.iter_mut() {
            person.fit_horizon(horizon.n_days);
        }
        for task in tasks.iter_mut() {
            task.support_links = people
                .iter()
                .flat_map(|p| {
                    p.task_links
                        .iter()
                        .filter(|link| link.task == task.id)
                        .map(|link| SupportLink {
                            person: p.id.clone(),
                            role: link.role,
                        })
                })
                .collect();
        }

        let capacity = horizon.daily_capacity();
        let grid = DutyGrid::new(horizon.max_seats, horizon.n_days);
        Self {
            horizon,
            capacity,
            grid,
            people,
            tasks,
            advisories: Vec::new(),
            phase: Phase::Constructed,
        }
    }

    /// Construit le plan depuis les enregistrements d'entrée ; une obligation
    /// vers une tâche inconnue est abandonnée avec un avertissement.
    pub fn from_records(horizon: Horizon, records: &[PersonRecord], tasks: Vec<Task>) -> Self {
        let mut unresolved = Vec::new();
        let people = records
            .iter()
            .map(|record| {
                let mut person = Person::from_record(record, horizon.n_days);
                for obligation in &record.obligations {
                    match tasks.iter().find(|t| t.id == obligation.task) {
                        Some(task) => person.task_links.push(TaskLink::to(task, obligation.role)),
                        None => unresolved.push(Advisory::new(
                            Some(record.id.clone()),
                            None,
                            AdvisoryKind::UnknownTask(obligation.task.clone()),
                        )),
                    }
                }
                person
            })
            .collect();

        let mut plan = Self::new(horizon, people, tasks);
        for advisory in unresolved {
            advise(&mut plan.advisories, advisory);
        }
        plan
    }

    pub fn horizon(&self) -> &Horizon {
        &self.horizon
    }
    pub fn daily_capacity(&self) -> &[usize] {
        &self.capacity
    }
    pub fn grid(&self) -> &DutyGrid {
        &self.grid
    }
    pub fn people(&self) -> &[Person] {
        &self.people
    }
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }
    pub fn advisories(&self) -> &[Advisory] {
        &self.advisories
    }
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn person(&self, id: &PersonId) -> Option<&Person> {
        self.people.iter().find(|p| &p.id == id)
    }

    pub fn timetable_of(&self, id: &PersonId) -> Result<&[Role], PlanError> {
        self.person(id)
            .map(Person::timetable)
            .ok_or_else(|| PlanError::UnknownPerson(id.as_str().to_string()))
    }

    pub fn occupant(&self, seat: usize, day: usize) -> Option<&Person> {
        self.grid.get(seat, day).and_then(|idx| self.people.get(idx))
    }

    /// Exécute toutes les étapes dans l'ordre et renvoie le contrôle final.
    pub fn run(&mut self) -> ConsistencyReport {
        self.allocate_forced();
        for kind in TaskKind::ALLOCATION_ORDER {
            self.allocate_tasks(kind);
        }
        self.allocate_remaining();
        self.tidy();
        self.remove_singles();
        self.check()
    }

    pub fn allocate_forced(&mut self) {
        placement::allocate_forced(self);
        self.advance(Phase::Forced);
    }

    pub fn allocate_tasks(&mut self, kind: TaskKind) {
        placement::allocate_tasks(self, kind);
        self.advance(Phase::TaskDriven);
    }

    pub fn allocate_remaining(&mut self) {
        placement::allocate_remaining(self);
        self.advance(Phase::Remaining);
    }

    pub fn tidy(&mut self) {
        repair::tidy(self);
        self.advance(Phase::Tidied);
    }

    pub fn remove_singles(&mut self) {
        repair::remove_singles(self);
        self.advance(Phase::SinglesRemoved);
    }

    pub fn check(&mut self) -> ConsistencyReport {
        let report = check::check(self);
        for advisory in &report.advisories {
            advise(&mut self.advisories, advisory.clone());
        }
        self.advance(Phase::Checked);
        report
    }

    /// Grille des analystes par jour, remplie dans l'ordre des personnes.
    pub fn analysis_grid(&self) -> DutyGrid {
        let mut grid = DutyGrid::new(self.horizon.max_seats, self.horizon.n_days);
        for (idx, person) in self.people.iter().enumerate() {
            for day in 0..self.horizon.n_days {
                if !person.role(day).is_analyst() {
                    continue;
                }
                if let Some(seat) = grid.find_seat(day, self.horizon.max_seats, idx) {
                    grid.set(seat, day, Some(idx));
                }
            }
        }
        grid
    }

    fn advance(&mut self, phase: Phase) {
        if phase > self.phase {
            self.phase = phase;
        }
        info!(?phase, advisories = self.advisories.len(), "phase completed");
    }
}

pub(crate) fn advise(advisories: &mut Vec<Advisory>, advisory: Advisory) {
    warn!(person = ?advisory.person, day = ?advisory.day, "{advisory}");
    advisories.push(advisory);
}
