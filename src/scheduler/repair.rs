use super::{advise, Advisory, AdvisoryKind, ShiftPlan};
use crate::model::{Person, Role};
use tracing::debug;

/// Aligne les séries : une personne présente deux jours de suite garde la même
/// ligne. Seules les lignes changent, jamais les affectations.
pub(super) fn tidy(plan: &mut ShiftPlan) {
    let grid = &mut plan.grid;
    let days = grid.days();

    for day in 0..days.saturating_sub(1) {
        for seat in 0..grid.seats() {
            let Some(person) = grid.get(seat, day) else {
                continue;
            };
            if let Some(tomorrow_seat) = grid.seat_of(day + 1, person) {
                grid.swap(day + 1, seat, tomorrow_seat);
            }
        }
    }
}

/// Réduit les passages isolés d'un jour. Pour chaque ligne, quand la personne B
/// de demain diffère d'aujourd'hui, B est ramenée sur la case du jour si elle
/// y est libre : case vide (capacité non atteinte) ou occupée par un passage
/// isolé ordinaire d'une autre personne, qui redevient libre ce jour-là.
pub(super) fn remove_singles(plan: &mut ShiftPlan) {
    let ShiftPlan {
        people,
        grid,
        capacity,
        advisories,
        ..
    } = plan;
    let days = grid.days();
    if days < 3 {
        return;
    }

    for seat in 0..grid.seats() {
        for day in 1..days - 1 {
            let yesterday = grid.get(seat, day - 1);
            let today = grid.get(seat, day);
            if today == yesterday {
                continue;
            }
            let Some(incoming) = grid.get(seat, day + 1) else {
                continue;
            };
            if today == Some(incoming) {
                continue;
            }
            if grid.seat_of(day, incoming).is_some() {
                advise(
                    advisories,
                    Advisory::new(
                        Some(people[incoming].id.clone()),
                        Some(day),
                        AdvisoryKind::AlreadyScheduled,
                    ),
                );
                continue;
            }
            if !can_extend(&people[incoming], day) {
                continue;
            }

            match today {
                None => {
                    if grid.occupied(day) >= capacity[day] {
                        continue;
                    }
                }
                Some(outgoing) => {
                    let isolated = grid.seat_of(day - 1, outgoing).is_none()
                        && grid.seat_of(day + 1, outgoing).is_none();
                    if !isolated || !is_displaceable(&people[outgoing], day) {
                        continue;
                    }
                    people[outgoing].set_role(day, Role::Free);
                }
            }

            grid.set(seat, day, Some(incoming));
            people[incoming].set_role(day, Role::OnDuty);
            debug!(person = %people[incoming].id, seat, day, "single day absorbed");
        }
    }
}

/// B peut prendre `day` : libre, sous plafond, et la série ainsi formée avec
/// les jours voisins ne dépasse pas `max_contiguous_allocation`.
fn can_extend(person: &Person, day: usize) -> bool {
    if person.role(day) != Role::Free || person.is_at_cap() {
        return false;
    }
    let limit = person.max_contiguous_allocation;
    limit == 0 || duty_run(person, (0..day).rev()) + 1 + duty_run(person, day + 1..) <= limit
}

/// Nombre de jours de permanence consécutifs dans l'ordre de `days`.
fn duty_run(person: &Person, days: impl Iterator<Item = usize>) -> usize {
    days.take_while(|d| person.role(*d).is_on_duty()).count()
}

/// Seul un jour de permanence ordinaire, non imposé, peut être cédé.
fn is_displaceable(person: &Person, day: usize) -> bool {
    person.role(day) == Role::OnDuty && !person.is_prescheduled(day)
}
