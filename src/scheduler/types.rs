use crate::calendar::MissionCalendar;
use crate::model::{DayRange, PersonId, Role, TaskId};
use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use thiserror::Error;

/// Configuration de l'horizon de planification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Horizon {
    pub n_days: usize,
    pub max_seats: usize,
    pub base_capacity: usize,
    /// Surcharges de capacité ; la dernière fenêtre l'emporte.
    pub capacity_windows: Vec<CapacityWindow>,
    pub arrival_buffer: i64,
    pub departure_buffer: i64,
    /// Jours de semaine admis pour débuter un bloc de permanence.
    pub start_weekdays: Vec<Weekday>,
    pub calendar: Option<MissionCalendar>,
}

impl Default for Horizon {
    fn default() -> Self {
        Self {
            n_days: 28,
            max_seats: 15,
            base_capacity: 10,
            capacity_windows: Vec::new(),
            arrival_buffer: 0,
            departure_buffer: 0,
            start_weekdays: vec![Weekday::Tue, Weekday::Fri],
            calendar: None,
        }
    }
}

impl Horizon {
    pub fn new(n_days: usize, max_seats: usize, base_capacity: usize) -> Self {
        Self {
            n_days,
            max_seats,
            base_capacity,
            ..Self::default()
        }
    }

    pub fn with_window(mut self, first: i64, last: i64, seats: usize) -> Self {
        self.capacity_windows.push(CapacityWindow { first, last, seats });
        self
    }

    pub fn with_buffers(mut self, arrival: i64, departure: i64) -> Self {
        self.arrival_buffer = arrival;
        self.departure_buffer = departure;
        self
    }

    pub fn with_calendar(mut self, calendar: MissionCalendar) -> Self {
        self.calendar = Some(calendar);
        self
    }

    /// Nombre de postes requis pour chaque jour.
    pub fn daily_capacity(&self) -> Vec<usize> {
        let mut capacity = vec![self.base_capacity.min(self.max_seats); self.n_days];
        for window in &self.capacity_windows {
            if let Some(days) = self.clamp_window(window.first, window.last) {
                for day in days {
                    capacity[day] = window.seats.min(self.max_seats);
                }
            }
        }
        capacity
    }

    /// Restreint `[first, last]` à l'horizon ; `None` si l'intersection est vide.
    pub fn clamp_window(&self, first: i64, last: i64) -> Option<RangeInclusive<usize>> {
        DayRange::new(first, last).clamp(self.n_days)
    }

    /// Début de bloc aligné sur un jour de semaine admis, si un calendrier est configuré.
    pub fn align_start(&self, day: i64) -> i64 {
        match &self.calendar {
            Some(calendar) => calendar.align_back(day, &self.start_weekdays),
            None => day,
        }
    }

    pub fn label(&self, day: usize) -> String {
        let day = i64::try_from(day).unwrap_or(i64::MAX);
        match &self.calendar {
            Some(calendar) => calendar.label(day),
            None => format!("D{day}"),
        }
    }

    pub fn validate(&self) -> Result<(), PlanError> {
        if self.n_days == 0 {
            return Err(PlanError::InvalidHorizon("n_days must be > 0"));
        }
        if self.max_seats == 0 {
            return Err(PlanError::InvalidHorizon("max_seats must be > 0"));
        }
        if self.arrival_buffer < 0 || self.departure_buffer < 0 {
            return Err(PlanError::InvalidHorizon("buffers cannot be negative"));
        }
        if self.capacity_windows.iter().any(|w| w.first > w.last) {
            return Err(PlanError::InvalidHorizon(
                "capacity window first day after last day",
            ));
        }
        Ok(())
    }
}

/// Fenêtre de capacité inhabituelle (pic ou creux d'activité).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityWindow {
    pub first: i64,
    pub last: i64,
    pub seats: usize,
}

/// Étapes du plan, dans l'ordre d'exécution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    Constructed,
    Forced,
    TaskDriven,
    Remaining,
    Tidied,
    SinglesRemoved,
    Checked,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvisoryKind {
    Unavailable { task: TaskId, role: Role },
    AllocationCap { task: TaskId },
    NoFreeSeat { task: TaskId },
    UnknownTask(TaskId),
    AlreadyScheduled,
    CapacityMismatch {
        filled: usize,
        capacity: usize,
        analysts: usize,
    },
    UnseatedDuty,
    SeatRoleMismatch { role: Role },
}

/// Avertissement non bloquant produit par une passe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advisory {
    pub person: Option<PersonId>,
    pub day: Option<usize>,
    pub kind: AdvisoryKind,
}

impl Advisory {
    pub fn new(person: Option<PersonId>, day: Option<usize>, kind: AdvisoryKind) -> Self {
        Self { person, day, kind }
    }
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let who = self.person.as_ref().map_or("-", |p| p.as_str());
        if let Some(day) = self.day {
            write!(f, "day {day}: ")?;
        }
        match &self.kind {
            AdvisoryKind::Unavailable { task, role } => {
                write!(f, "unable to schedule {who} for {task} ({role})")
            }
            AdvisoryKind::AllocationCap { task } => {
                write!(f, "{who} reached allocation cap, not scheduled for {task}")
            }
            AdvisoryKind::NoFreeSeat { task } => {
                write!(f, "no free seat for {who} on {task}")
            }
            AdvisoryKind::UnknownTask(task) => {
                write!(f, "unable to find task {task} for {who}")
            }
            AdvisoryKind::AlreadyScheduled => write!(f, "{who} already scheduled"),
            AdvisoryKind::CapacityMismatch {
                filled,
                capacity,
                analysts,
            } => write!(
                f,
                "on duty seats filled/allocated = {filled}/{capacity}, plus analyst = {analysts}"
            ),
            AdvisoryKind::UnseatedDuty => write!(f, "{who} on duty without a seat"),
            AdvisoryKind::SeatRoleMismatch { role } => {
                write!(f, "{who} holds a seat while {role}")
            }
        }
    }
}

/// Statistiques d'une journée au contrôle de cohérence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayStats {
    pub day: usize,
    pub capacity: usize,
    pub on_duty: usize,
    pub analysts: usize,
}

impl DayStats {
    pub fn is_filled(&self) -> bool {
        self.on_duty == self.capacity
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConsistencyReport {
    pub days: Vec<DayStats>,
    pub advisories: Vec<Advisory>,
}

impl ConsistencyReport {
    pub fn mismatched_days(&self) -> impl Iterator<Item = &DayStats> {
        self.days.iter().filter(|d| !d.is_filled())
    }

    pub fn is_consistent(&self) -> bool {
        self.advisories.is_empty()
    }
}

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("invalid horizon: {0}")]
    InvalidHorizon(&'static str),
    #[error("unknown person: {0}")]
    UnknownPerson(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
