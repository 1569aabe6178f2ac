/// Grille de permanence : `seats` lignes × `days` colonnes.
///
/// Chaque case est vide ou contient l'index d'une personne du plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DutyGrid {
    seats: usize,
    days: usize,
    cells: Vec<Option<usize>>,
}

impl DutyGrid {
    pub fn new(seats: usize, days: usize) -> Self {
        Self {
            seats,
            days,
            cells: vec![None; seats * days],
        }
    }

    pub fn seats(&self) -> usize {
        self.seats
    }

    pub fn days(&self) -> usize {
        self.days
    }

    pub fn get(&self, seat: usize, day: usize) -> Option<usize> {
        if seat >= self.seats || day >= self.days {
            return None;
        }
        self.cells[self.index(seat, day)]
    }

    pub fn row(&self, seat: usize) -> &[Option<usize>] {
        let start = seat * self.days;
        &self.cells[start..start + self.days]
    }

    pub fn column(&self, day: usize) -> impl Iterator<Item = Option<usize>> + '_ {
        (0..self.seats).map(move |seat| self.get(seat, day))
    }

    pub fn seat_of(&self, day: usize, person: usize) -> Option<usize> {
        (0..self.seats).find(|seat| self.get(*seat, day) == Some(person))
    }

    pub fn occupied(&self, day: usize) -> usize {
        self.column(day).flatten().count()
    }

    /// Paires (jour, personne) occupées, triées.
    pub fn assignments(&self) -> Vec<(usize, usize)> {
        let mut out: Vec<(usize, usize)> = (0..self.days)
            .flat_map(|day| self.column(day).flatten().map(move |p| (day, p)))
            .collect();
        out.sort_unstable();
        out
    }

    /// Case de `person` pour `day` : la sienne si déjà placée, sinon la première
    /// case vide parmi les `limit` premières, tant que la colonne n'est pas pleine.
    pub fn find_seat(&self, day: usize, limit: usize, person: usize) -> Option<usize> {
        if day >= self.days {
            return None;
        }
        if let Some(seat) = self.seat_of(day, person) {
            return Some(seat);
        }
        if self.occupied(day) >= limit {
            return None;
        }
        (0..limit.min(self.seats)).find(|seat| self.get(*seat, day).is_none())
    }

    pub(crate) fn set(&mut self, seat: usize, day: usize, person: Option<usize>) {
        if seat >= self.seats || day >= self.days {
            return;
        }
        let idx = self.index(seat, day);
        self.cells[idx] = person;
    }

    pub(crate) fn vacate(&mut self, day: usize, person: usize) -> Option<usize> {
        let seat = self.seat_of(day, person)?;
        self.set(seat, day, None);
        Some(seat)
    }

    pub(crate) fn swap(&mut self, day: usize, a: usize, b: usize) {
        if a == b || a >= self.seats || b >= self.seats || day >= self.days {
            return;
        }
        let (ia, ib) = (self.index(a, day), self.index(b, day));
        self.cells.swap(ia, ib);
    }

    fn index(&self, seat: usize, day: usize) -> usize {
        seat * self.days + day
    }
}
