#![forbid(unsafe_code)]
//! Rota : bibliothèque de planification de permanences sur une grille postes × jours.
//!
//! - Emplois du temps individuels : un rôle par personne et par jour.
//! - Passes d'allocation ordonnées : imposé, tâches par catégorie, reste.
//! - Réparations : alignement des lignes, absorption des jours isolés.
//! - Contrôle de cohérence consultatif ; aucune passe n'échoue.

pub mod calendar;
pub mod io;
pub mod model;
pub mod scheduler;
pub mod storage;

pub use calendar::MissionCalendar;
pub use io::{PlanInput, PlanSnapshot, TimetableEntry};
pub use model::{
    DayRange, Obligation, Person, PersonId, PersonRecord, RequestedRole, Role, SupportLink, Task,
    TaskId, TaskKind, TaskLink,
};
pub use scheduler::{
    Advisory, AdvisoryKind, CapacityWindow, ConsistencyReport, DayStats, DutyGrid, Horizon, Phase,
    PlanError, ShiftPlan,
};
pub use storage::{JsonStorage, Storage};
