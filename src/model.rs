use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::ops::RangeInclusive;
use uuid::Uuid;

/// Identifiant fort pour Person
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PersonId(String);

impl PersonId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifiant fort pour Task
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskId(String);

impl TaskId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Rôle d'une personne pour une journée. Un seul rôle par jour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Free,
    OnDuty,
    OnDutyExpert,
    Resting,
    Blackout,
    Greyout,
    Analyst,
    AnalystExpert,
    MilestoneSupport,
}

impl Role {
    pub const ALL: [Role; 9] = [
        Role::Free,
        Role::OnDuty,
        Role::OnDutyExpert,
        Role::Resting,
        Role::Blackout,
        Role::Greyout,
        Role::Analyst,
        Role::AnalystExpert,
        Role::MilestoneSupport,
    ];

    /// Code d'affichage sur un caractère.
    pub const fn code(self) -> char {
        match self {
            Role::Free => '.',
            Role::OnDuty => 'm',
            Role::OnDutyExpert => 'M',
            Role::Resting => 'r',
            Role::Blackout => 'X',
            Role::Greyout => 'x',
            Role::Analyst => 'a',
            Role::AnalystExpert => 'A',
            Role::MilestoneSupport => 'K',
        }
    }

    pub fn from_code(code: char) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.code() == code)
    }

    pub fn is_on_duty(self) -> bool {
        matches!(self, Role::OnDuty | Role::OnDutyExpert)
    }

    pub fn is_analyst(self) -> bool {
        matches!(self, Role::Analyst | Role::AnalystExpert)
    }

    pub fn is_unavailable(self) -> bool {
        matches!(self, Role::Blackout | Role::Greyout)
    }

    /// Jour compté dans l'allocation (tout sauf libre, blackout, greyout).
    pub fn is_allocated(self) -> bool {
        !matches!(self, Role::Free | Role::Blackout | Role::Greyout)
    }

    /// Rang entre rôles de soutien ; 0 pour les autres.
    pub fn support_rank(self) -> u8 {
        match self {
            Role::Analyst => 1,
            Role::AnalystExpert => 2,
            Role::MilestoneSupport => 3,
            _ => 0,
        }
    }

    /// Priorité à la construction : blackout > greyout > le reste.
    fn availability_rank(self) -> u8 {
        match self {
            Role::Blackout => 2,
            Role::Greyout => 1,
            _ => 0,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Free => "free",
            Role::OnDuty => "on-duty",
            Role::OnDutyExpert => "on-duty (task expert)",
            Role::Resting => "resting",
            Role::Blackout => "blackout",
            Role::Greyout => "greyout",
            Role::Analyst => "analyst",
            Role::AnalystExpert => "analyst (task expert)",
            Role::MilestoneSupport => "milestone support",
        };
        f.write_str(name)
    }
}

/// Catégorie de tâche
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    PrimaryActivity,
    SupportActivity,
    Milestone,
}

impl TaskKind {
    /// Ordre des passes d'allocation par catégorie.
    pub const ALLOCATION_ORDER: [TaskKind; 3] = [
        TaskKind::SupportActivity,
        TaskKind::Milestone,
        TaskKind::PrimaryActivity,
    ];
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TaskKind::PrimaryActivity => "primary activity",
            TaskKind::SupportActivity => "support activity",
            TaskKind::Milestone => "milestone",
        };
        f.write_str(name)
    }
}

/// Mode de présence demandé pour une tâche.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestedRole {
    #[default]
    Console,
    Analyst,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportLink {
    pub person: PersonId,
    pub role: RequestedRole,
}

/// Tâche planifiée (jours d'horizon).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    #[serde(default)]
    pub label: String,
    pub kind: TaskKind,
    pub start: i64,
    #[serde(default)]
    pub duration: i64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub support_links: Vec<SupportLink>,
}

impl Task {
    pub fn new<S: AsRef<str>>(id: S, kind: TaskKind, start: i64, duration: i64) -> Self {
        Self {
            id: TaskId::new(id),
            label: String::new(),
            kind,
            start,
            duration,
            support_links: Vec::new(),
        }
    }

    pub fn end(&self) -> i64 {
        self.start.saturating_add(self.duration)
    }
}

/// Obligation d'une personne envers une tâche, avec le mode demandé.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskLink {
    pub task: TaskId,
    pub kind: TaskKind,
    pub start: i64,
    pub duration: i64,
    pub role: RequestedRole,
}

impl TaskLink {
    pub fn to(task: &Task, role: RequestedRole) -> Self {
        Self {
            task: task.id.clone(),
            kind: task.kind,
            start: task.start,
            duration: task.duration,
            role,
        }
    }

    pub fn end(&self) -> i64 {
        self.start.saturating_add(self.duration)
    }
}

/// Plage de jours d'horizon inclusive `[first, last]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRange {
    pub first: i64,
    pub last: i64,
}

impl DayRange {
    pub fn new(first: i64, last: i64) -> Self {
        Self { first, last }
    }

    pub fn day(day: i64) -> Self {
        Self { first: day, last: day }
    }

    pub fn days(&self) -> impl Iterator<Item = i64> {
        self.first..=self.last
    }

    /// Jours de la plage compris dans `[0, n_days)` ; `None` si aucun.
    pub fn clamp(&self, n_days: usize) -> Option<RangeInclusive<usize>> {
        let end = i64::try_from(n_days).ok()?.checked_sub(1)?;
        let first = self.first.max(0);
        let last = self.last.min(end);
        if first > last {
            return None;
        }
        Some(usize::try_from(first).ok()?..=usize::try_from(last).ok()?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Obligation {
    pub task: TaskId,
    #[serde(default)]
    pub role: RequestedRole,
}

/// Enregistrement d'entrée d'une personne, tel que fourni par l'ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonRecord {
    /// Généré (uuid v4) quand absent.
    #[serde(default = "PersonId::random")]
    pub id: PersonId,
    #[serde(default)]
    pub forename: String,
    pub surname: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub organisation: String,
    #[serde(default)]
    pub colour: String,
    pub max_days: usize,
    #[serde(default)]
    pub max_contiguous_days: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blackout: Vec<DayRange>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub greyout: Vec<DayRange>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scheduled: Vec<DayRange>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub analysis: Vec<DayRange>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub obligations: Vec<Obligation>,
}

/// Personne de la liste de permanence, avec son emploi du temps.
///
/// L'emploi du temps n'est modifiable qu'au travers des passes de placement ;
/// le nombre de jours alloués est tenu à jour à chaque changement de rôle.
#[derive(Debug, Clone)]
pub struct Person {
    pub id: PersonId,
    pub forename: String,
    pub surname: String,
    pub email: String,
    pub organisation: String,
    pub colour: String,
    pub max_allocation: usize,
    /// 0 = pas de limite.
    pub max_contiguous_allocation: usize,
    pub contiguously_allocated: usize,
    pub task_links: Vec<TaskLink>,
    timetable: Vec<Role>,
    prescheduled: BTreeSet<usize>,
    allocated: usize,
}

impl Person {
    /// Personne entièrement libre sur `n_days`, sans plafond effectif.
    pub fn new<I: AsRef<str>, S: Into<String>>(id: I, surname: S, n_days: usize) -> Self {
        Self {
            id: PersonId::new(id),
            forename: String::new(),
            surname: surname.into(),
            email: String::new(),
            organisation: String::new(),
            colour: String::new(),
            max_allocation: n_days,
            max_contiguous_allocation: 0,
            contiguously_allocated: 0,
            task_links: Vec::new(),
            timetable: vec![Role::Free; n_days],
            prescheduled: BTreeSet::new(),
            allocated: 0,
        }
    }

    /// Construit une personne depuis son enregistrement (sans les obligations,
    /// résolues par le plan).
    pub fn from_record(record: &PersonRecord, n_days: usize) -> Self {
        let mut person = Person::new(record.id.as_str(), record.surname.clone(), n_days)
            .with_limits(record.max_days, record.max_contiguous_days);
        person.forename = record.forename.clone();
        person.email = record.email.clone();
        person.organisation = record.organisation.clone();
        person.colour = record.colour.clone();

        for range in &record.scheduled {
            person = person.with_scheduled(*range);
        }
        for range in &record.analysis {
            person = person.with_analysis(*range);
        }
        for range in &record.greyout {
            person = person.with_greyout(*range);
        }
        for range in &record.blackout {
            person = person.with_blackout(*range);
        }
        person
    }

    pub fn with_limits(mut self, max_allocation: usize, max_contiguous: usize) -> Self {
        self.max_allocation = max_allocation;
        self.max_contiguous_allocation = max_contiguous;
        self
    }

    pub fn with_blackout(mut self, range: DayRange) -> Self {
        for day in self.mark(range, Role::Blackout) {
            self.prescheduled.remove(&day);
        }
        self
    }

    pub fn with_greyout(mut self, range: DayRange) -> Self {
        for day in self.mark(range, Role::Greyout) {
            self.prescheduled.remove(&day);
        }
        self
    }

    /// Jours de permanence imposés par une entrée externe.
    pub fn with_scheduled(mut self, range: DayRange) -> Self {
        for day in self.mark(range, Role::OnDuty) {
            self.prescheduled.insert(day);
        }
        self
    }

    pub fn with_analysis(mut self, range: DayRange) -> Self {
        for day in self.mark(range, Role::Analyst) {
            self.prescheduled.remove(&day);
        }
        self
    }

    pub fn link_task(&mut self, task: &Task, role: RequestedRole) {
        self.task_links.push(TaskLink::to(task, role));
    }

    pub fn timetable(&self) -> &[Role] {
        &self.timetable
    }

    /// Rôle du jour ; `Free` hors horizon.
    pub fn role(&self, day: usize) -> Role {
        self.timetable.get(day).copied().unwrap_or_default()
    }

    pub fn allocated_days(&self) -> usize {
        self.allocated
    }

    pub fn is_at_cap(&self) -> bool {
        self.allocated >= self.max_allocation
    }

    pub fn is_prescheduled(&self, day: usize) -> bool {
        self.prescheduled.contains(&day)
    }

    pub fn blackout_days(&self) -> impl Iterator<Item = usize> + '_ {
        self.days_with(Role::Blackout)
    }

    pub fn greyout_days(&self) -> impl Iterator<Item = usize> + '_ {
        self.days_with(Role::Greyout)
    }

    pub fn days_with(&self, role: Role) -> impl Iterator<Item = usize> + '_ {
        self.timetable
            .iter()
            .enumerate()
            .filter(move |(_, r)| **r == role)
            .map(|(day, _)| day)
    }

    /// Emploi du temps sous forme de codes, un caractère par jour.
    pub fn attendance(&self) -> String {
        self.timetable.iter().map(|r| r.code()).collect()
    }

    pub fn allocation_text(&self) -> String {
        format!("{}{:4}/{}", self.surname, self.allocated, self.max_allocation)
    }

    pub(crate) fn set_role(&mut self, day: usize, role: Role) {
        let Some(slot) = self.timetable.get_mut(day) else {
            return;
        };
        match (slot.is_allocated(), role.is_allocated()) {
            (false, true) => self.allocated += 1,
            (true, false) => self.allocated -= 1,
            _ => {}
        }
        *slot = role;
    }

    pub(crate) fn fit_horizon(&mut self, n_days: usize) {
        if self.timetable.len() == n_days {
            return;
        }
        self.timetable.resize(n_days, Role::Free);
        self.prescheduled.retain(|day| *day < n_days);
        self.allocated = self.timetable.iter().filter(|r| r.is_allocated()).count();
    }

    /// Marque les jours de `range` sans écraser une indisponibilité plus forte.
    /// Retourne les jours effectivement marqués.
    fn mark(&mut self, range: DayRange, role: Role) -> Vec<usize> {
        let mut marked = Vec::new();
        let Some(days) = range.clamp(self.timetable.len()) else {
            return marked;
        };
        for day in days {
            if self.timetable[day].availability_rank() > role.availability_rank() {
                continue;
            }
            self.set_role(day, role);
            marked.push(day);
        }
        marked
    }
}
