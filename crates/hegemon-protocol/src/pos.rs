use serde::{Deserialize, Serialize};

/// Square-grid tile coordinate. `x` grows east, `y` grows south.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

impl Pos {
    /// Fixed order for determinism: N, E, S, W.
    pub const DIRECTIONS: [Pos; 4] = [
        Pos { x: 0, y: -1 },
        Pos { x: 1, y: 0 },
        Pos { x: 0, y: 1 },
        Pos { x: -1, y: 0 },
    ];

    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn neighbors(self) -> impl Iterator<Item = Pos> {
        Self::DIRECTIONS.into_iter().map(move |d| self + d)
    }

    #[inline]
    pub fn manhattan(self, other: Pos) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// All positions of the `(2 * radius + 1)`-wide square centered here, in
    /// row-major order. Bounds are not checked.
    pub fn window(self, radius: i32) -> impl Iterator<Item = Pos> {
        let radius = radius.max(0);
        (-radius..=radius)
            .flat_map(move |dy| (-radius..=radius).map(move |dx| Pos::new(self.x + dx, self.y + dy)))
    }

    /// One grid step from `self` toward `target` (x axis first). Returns `self`
    /// when already there.
    pub fn step_toward(self, target: Pos) -> Pos {
        if self.x != target.x {
            Pos::new(self.x + (target.x - self.x).signum(), self.y)
        } else {
            Pos::new(self.x, self.y + (target.y - self.y).signum())
        }
    }
}

impl std::ops::Add for Pos {
    type Output = Pos;

    fn add(self, other: Pos) -> Pos {
        Pos {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl std::fmt::Display for Pos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_covers_square_in_row_major_order() {
        let cells: Vec<Pos> = Pos::new(5, 5).window(1).collect();
        assert_eq!(cells.len(), 9);
        assert_eq!(cells[0], Pos::new(4, 4));
        assert_eq!(cells[4], Pos::new(5, 5));
        assert_eq!(cells[8], Pos::new(6, 6));
    }

    #[test]
    fn neighbors_are_orthogonal() {
        let origin = Pos::new(0, 0);
        assert!(origin.neighbors().all(|n| n.manhattan(origin) == 1));
    }

    #[test]
    fn step_toward_reduces_distance() {
        let from = Pos::new(0, 0);
        let to = Pos::new(3, -2);
        let step = from.step_toward(to);
        assert_eq!(step.manhattan(to), from.manhattan(to) - 1);
        assert_eq!(to.step_toward(to), to);
    }
}
