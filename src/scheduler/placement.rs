use super::rules::{self, DayContext, Decision, GridEffect, Refusal, Request};
use super::{advise, Advisory, AdvisoryKind, DutyGrid, Horizon, ShiftPlan};
use crate::model::{Person, Role, TaskKind, TaskLink};
use std::ops::RangeInclusive;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Changed,
    Unchanged,
    NoSeat,
    Refused(Refusal),
}

/// Applique une décision : au plus un changement de rôle et une mutation de grille.
fn apply(
    person: &mut Person,
    who: usize,
    day: usize,
    decision: Decision,
    grid: &mut DutyGrid,
    capacity: usize,
) -> Outcome {
    let (role, effect) = match decision {
        Decision::Refuse(refusal) => return Outcome::Refused(refusal),
        Decision::Apply { role, grid } => (role, grid),
    };

    match effect {
        GridEffect::Occupy => {
            let Some(seat) = grid.find_seat(day, capacity, who) else {
                return Outcome::NoSeat;
            };
            grid.set(seat, day, Some(who));
        }
        GridEffect::Vacate => {
            grid.vacate(day, who);
        }
        GridEffect::None => {}
    }

    if person.role(day) == role && effect == GridEffect::None {
        return Outcome::Unchanged;
    }
    person.set_role(day, role);
    Outcome::Changed
}

pub(super) fn allocate_forced(plan: &mut ShiftPlan) {
    let ShiftPlan {
        people,
        grid,
        capacity,
        ..
    } = plan;

    for (who, person) in people.iter_mut().enumerate() {
        for day in 0..capacity.len() {
            let current = person.role(day);
            if !current.is_on_duty() {
                continue;
            }
            let decision = rules::next_role(current, Request::Forced, DayContext::default());
            if apply(person, who, day, decision, grid, capacity[day]) == Outcome::NoSeat {
                debug!(person = %person.id, day, "prescheduled duty left without a seat");
            }
        }
    }
}

pub(super) fn allocate_tasks(plan: &mut ShiftPlan, kind: TaskKind) {
    let ShiftPlan {
        horizon,
        people,
        grid,
        capacity,
        advisories,
        ..
    } = plan;

    for (who, person) in people.iter_mut().enumerate() {
        let links: Vec<TaskLink> = person
            .task_links
            .iter()
            .filter(|link| link.kind == kind)
            .cloned()
            .collect();

        for link in &links {
            let Some(days) = task_window(link, horizon) else {
                debug!(person = %person.id, task = %link.task, "task window outside horizon");
                continue;
            };
            for day in days {
                let ctx = DayContext {
                    is_task_day: day as i64 == link.start,
                    at_allocation_cap: person.is_at_cap(),
                    rest_due: false,
                };
                let request = Request::Task {
                    kind: link.kind,
                    mode: link.role,
                };
                let decision = rules::next_role(person.role(day), request, ctx);
                let advisory = match apply(person, who, day, decision, grid, capacity[day]) {
                    Outcome::Changed | Outcome::Unchanged => continue,
                    Outcome::NoSeat => AdvisoryKind::NoFreeSeat {
                        task: link.task.clone(),
                    },
                    Outcome::Refused(Refusal::AllocationCap) => AdvisoryKind::AllocationCap {
                        task: link.task.clone(),
                    },
                    Outcome::Refused(Refusal::Unavailable(role)) => AdvisoryKind::Unavailable {
                        task: link.task.clone(),
                        role,
                    },
                };
                advise(
                    advisories,
                    Advisory::new(Some(person.id.clone()), Some(day), advisory),
                );
            }
        }
    }
}

pub(super) fn allocate_remaining(plan: &mut ShiftPlan) {
    let ShiftPlan {
        people,
        grid,
        capacity,
        ..
    } = plan;

    for (who, person) in people.iter_mut().enumerate() {
        person.contiguously_allocated = 0;
        for day in 0..capacity.len() {
            let current = person.role(day);
            if current == Role::Free {
                let limit = person.max_contiguous_allocation;
                let ctx = DayContext {
                    is_task_day: false,
                    at_allocation_cap: person.is_at_cap(),
                    rest_due: limit > 0 && person.contiguously_allocated >= limit,
                };
                let decision = rules::next_role(current, Request::Remaining, ctx);
                let outcome = apply(person, who, day, decision, grid, capacity[day]);
                debug!(person = %person.id, day, ?outcome, "remaining allocation");
            }

            if person.role(day).is_on_duty() {
                person.contiguously_allocated += 1;
            } else {
                person.contiguously_allocated = 0;
            }
        }
    }
}

/// Jours couverts par une obligation, restreints à l'horizon.
pub(super) fn task_window(link: &TaskLink, horizon: &Horizon) -> Option<RangeInclusive<usize>> {
    let (first, last) = match link.kind {
        TaskKind::Milestone => (link.start, link.start),
        TaskKind::SupportActivity => (
            link.start.saturating_sub(horizon.arrival_buffer),
            link.end().saturating_add(horizon.departure_buffer),
        ),
        TaskKind::PrimaryActivity => (
            horizon.align_start(link.start.saturating_sub(horizon.arrival_buffer)),
            link.start.saturating_add(horizon.departure_buffer),
        ),
    };
    horizon.clamp_window(first, last)
}
