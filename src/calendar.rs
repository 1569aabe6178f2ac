//! Arithmétique calendaire : jour d'horizon ↔ date civile ↔ jour de mission.
//!
//! Le moteur d'allocation ne travaille qu'en indices de jour ; ce module sert
//! à l'alignement des débuts de bloc sur des jours de semaine et aux libellés.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Calendrier d'une période d'opérations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionCalendar {
    /// Date civile du jour d'horizon 0.
    pub epoch: NaiveDate,
    /// Jour de mission (`L+n`) du jour d'horizon 0.
    #[serde(default)]
    pub first_mission_day: i64,
}

impl MissionCalendar {
    pub fn new(epoch: NaiveDate, first_mission_day: i64) -> Self {
        Self {
            epoch,
            first_mission_day,
        }
    }

    /// Calendrier dont le jour de mission 0 tombe le `reference`.
    pub fn anchored(reference: NaiveDate, first_mission_day: i64) -> Option<Self> {
        let epoch = reference.checked_add_signed(Duration::try_days(first_mission_day)?)?;
        Some(Self::new(epoch, first_mission_day))
    }

    pub fn date_of(&self, day: i64) -> Option<NaiveDate> {
        self.epoch.checked_add_signed(Duration::try_days(day)?)
    }

    pub fn day_of(&self, date: NaiveDate) -> i64 {
        date.signed_duration_since(self.epoch).num_days()
    }

    pub fn mission_day(&self, day: i64) -> i64 {
        day.saturating_add(self.first_mission_day)
    }

    pub fn day_of_mission(&self, mission_day: i64) -> i64 {
        mission_day.saturating_sub(self.first_mission_day)
    }

    pub fn weekday(&self, day: i64) -> Option<Weekday> {
        self.date_of(day).map(|d| d.weekday())
    }

    pub fn label(&self, day: i64) -> String {
        mission_label(self.mission_day(day))
    }

    /// Recule `day` jusqu'au jour autorisé le plus proche (au plus six jours).
    /// Sans jour autorisé, `day` est renvoyé tel quel.
    pub fn align_back(&self, day: i64, allowed: &[Weekday]) -> i64 {
        if allowed.is_empty() {
            return day;
        }
        (0..7)
            .map(|back| day.saturating_sub(back))
            .find(|d| self.weekday(*d).is_some_and(|w| allowed.contains(&w)))
            .unwrap_or(day)
    }
}

/// Libellé `L+12`, `L-3`, `L+0`.
pub fn mission_label(mission_day: i64) -> String {
    format!("L{mission_day:+}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calendar() -> MissionCalendar {
        // jour de mission 0 = samedi 18 décembre 2021, horizon démarrant à L-3
        MissionCalendar::anchored(NaiveDate::from_ymd_opt(2021, 12, 18).unwrap(), -3).unwrap()
    }

    #[test]
    fn anchored_epoch_and_labels() {
        let cal = calendar();
        assert_eq!(cal.epoch, NaiveDate::from_ymd_opt(2021, 12, 15).unwrap());
        assert_eq!(cal.label(0), "L-3");
        assert_eq!(cal.label(3), "L+0");
        assert_eq!(cal.label(15), "L+12");
        assert_eq!(cal.day_of_mission(12), 15);
    }

    #[test]
    fn dates_cross_year_and_leap_day() {
        let cal = calendar();
        assert_eq!(cal.date_of(17), NaiveDate::from_ymd_opt(2022, 1, 1));

        let leap = MissionCalendar::new(NaiveDate::from_ymd_opt(2024, 2, 28).unwrap(), 0);
        assert_eq!(leap.date_of(1), NaiveDate::from_ymd_opt(2024, 2, 29));
        assert_eq!(leap.day_of(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()), 2);
    }

    #[test]
    fn align_back_to_tuesday_or_friday() {
        let cal = calendar();
        let allowed = [Weekday::Tue, Weekday::Fri];
        // jour 0 = mercredi 15/12, jour 3 = samedi 18/12 -> vendredi 17/12
        assert_eq!(cal.weekday(3), Some(Weekday::Sat));
        assert_eq!(cal.align_back(3, &allowed), 2);
        // jour 6 = mardi 21/12 reste en place
        assert_eq!(cal.align_back(6, &allowed), 6);
        // jour 1 = jeudi 16/12 -> mardi 14/12, avant l'horizon
        assert_eq!(cal.align_back(1, &allowed), -1);
        assert_eq!(cal.align_back(5, &[]), 5);
    }
}
