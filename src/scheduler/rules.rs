//! Table de transition des rôles pour une personne et une journée.
//!
//! `next_role` ne touche ni à la grille ni à l'emploi du temps : il décide du
//! rôle suivant et de l'effet attendu sur la grille. L'application est faite
//! par les passes de placement.

use crate::model::{RequestedRole, Role, TaskKind};

/// Nature de la demande de placement pour une journée.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    /// Soutien à une tâche, dans le mode demandé.
    Task { kind: TaskKind, mode: RequestedRole },
    /// Remplissage des postes restants (jours libres uniquement).
    Remaining,
    /// Jour déjà marqué en permanence par une entrée externe.
    Forced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DayContext {
    /// Le jour est le jour de début de la tâche.
    pub is_task_day: bool,
    /// La personne a atteint `max_allocation`.
    pub at_allocation_cap: bool,
    /// La série de jours consécutifs a atteint `max_contiguous_allocation`.
    pub rest_due: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridEffect {
    None,
    /// Libérer la case occupée ce jour-là.
    Vacate,
    /// Occuper une case libre (ou la sienne) ce jour-là.
    Occupy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refusal {
    Unavailable(Role),
    AllocationCap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Refuse(Refusal),
    Apply { role: Role, grid: GridEffect },
}

impl Decision {
    fn keep(role: Role) -> Self {
        Decision::Apply {
            role,
            grid: GridEffect::None,
        }
    }

    /// Vrai si la décision ne change rien pour `current`.
    pub fn is_noop(&self, current: Role) -> bool {
        matches!(self, Decision::Apply { role, grid: GridEffect::None } if *role == current)
    }
}

pub fn next_role(current: Role, request: Request, ctx: DayContext) -> Decision {
    if current.is_unavailable() {
        return Decision::Refuse(Refusal::Unavailable(current));
    }

    match request {
        Request::Forced => {
            if current.is_on_duty() {
                Decision::Apply {
                    role: current,
                    grid: GridEffect::Occupy,
                }
            } else {
                Decision::keep(current)
            }
        }
        Request::Remaining => {
            if current != Role::Free {
                return Decision::keep(current);
            }
            if ctx.at_allocation_cap {
                return Decision::Refuse(Refusal::AllocationCap);
            }
            if ctx.rest_due {
                return Decision::keep(Role::Resting);
            }
            Decision::Apply {
                role: Role::OnDuty,
                grid: GridEffect::Occupy,
            }
        }
        Request::Task { kind, mode } => {
            // un jour déjà compté ne consomme pas d'allocation supplémentaire
            if ctx.at_allocation_cap && !current.is_allocated() {
                return Decision::Refuse(Refusal::AllocationCap);
            }
            let wanted = match (kind, mode) {
                (TaskKind::Milestone, _) => Role::MilestoneSupport,
                (TaskKind::SupportActivity, _) | (TaskKind::PrimaryActivity, RequestedRole::Analyst) => {
                    if ctx.is_task_day {
                        Role::AnalystExpert
                    } else {
                        Role::Analyst
                    }
                }
                (TaskKind::PrimaryActivity, RequestedRole::Console) => {
                    return console(current, ctx.is_task_day)
                }
            };
            support(current, wanted)
        }
    }
}

fn support(current: Role, wanted: Role) -> Decision {
    if current.support_rank() >= wanted.support_rank() {
        return Decision::keep(current);
    }
    let grid = if current.is_on_duty() {
        GridEffect::Vacate
    } else {
        GridEffect::None
    };
    Decision::Apply { role: wanted, grid }
}

fn console(current: Role, is_task_day: bool) -> Decision {
    match current {
        Role::OnDuty if is_task_day => Decision::keep(Role::OnDutyExpert),
        Role::Free | Role::Resting => Decision::Apply {
            role: if is_task_day {
                Role::OnDutyExpert
            } else {
                Role::OnDuty
            },
            grid: GridEffect::Occupy,
        },
        // déjà en poste, ou rôle de soutien prioritaire
        _ => Decision::keep(current),
    }
}
