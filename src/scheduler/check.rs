use super::{Advisory, AdvisoryKind, ConsistencyReport, DayStats, ShiftPlan};

/// Compare, jour par jour, les postes occupés à la capacité prévue et vérifie
/// l'accord entre grille et emplois du temps. Ne corrige rien.
pub(super) fn check(plan: &ShiftPlan) -> ConsistencyReport {
    let mut report = ConsistencyReport::default();

    for (day, &capacity) in plan.capacity.iter().enumerate() {
        let mut on_duty = 0;
        for idx in plan.grid.column(day).flatten() {
            let person = &plan.people[idx];
            let role = person.role(day);
            if role.is_on_duty() {
                on_duty += 1;
            } else {
                report.advisories.push(Advisory::new(
                    Some(person.id.clone()),
                    Some(day),
                    AdvisoryKind::SeatRoleMismatch { role },
                ));
            }
        }

        for (idx, person) in plan.people.iter().enumerate() {
            if person.role(day).is_on_duty() && plan.grid.seat_of(day, idx).is_none() {
                report.advisories.push(Advisory::new(
                    Some(person.id.clone()),
                    Some(day),
                    AdvisoryKind::UnseatedDuty,
                ));
            }
        }

        let analysts = plan
            .people
            .iter()
            .filter(|p| p.role(day).is_analyst())
            .count();

        let stats = DayStats {
            day,
            capacity,
            on_duty,
            analysts,
        };
        if !stats.is_filled() {
            report.advisories.push(Advisory::new(
                None,
                Some(day),
                AdvisoryKind::CapacityMismatch {
                    filled: on_duty,
                    capacity,
                    analysts,
                },
            ));
        }
        report.days.push(stats);
    }

    report
}
