//! Tower, disk and move representation.
//!
//! A [`TowerState`] is an immutable snapshot of every tower. Moves never
//! mutate a state in place: [`TowerState::transfer`] returns a fresh, owned
//! copy so sibling branches of the search tree never share tower storage.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde::Serialize;
use smallvec::SmallVec;

use crate::error::{MoveError, StateError};

/// Token used in instance files and renderings for an empty slot.
pub const EMPTY_SLOT: &str = ".";

/// Disk color label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Color(Arc<str>);

impl Color {
    pub fn new(label: &str) -> Self {
        Self(Arc::from(label))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Color {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A stack of disks, bottom first.
pub type Tower = SmallVec<[Color; 8]>;

/// Move the top disk of tower `from` onto tower `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Move {
    pub from: usize,
    pub to: usize,
}

impl Move {
    pub fn new(from: usize, to: usize) -> Self {
        Self { from, to }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move disk from tower {} to tower {}", self.from, self.to)
    }
}

/// Contents of every tower at one point of the search.
///
/// Equality and hashing look at `towers` only; `last_move` is a label for
/// rendering and two states reached by different moves compare equal.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TowerState {
    capacity: usize,
    towers: Vec<Tower>,
    last_move: Option<Move>,
}

impl TowerState {
    /// Build an initial state, checking the tower invariants.
    pub fn new<I, T>(capacity: usize, towers: I) -> Result<Self, StateError>
    where
        I: IntoIterator<Item = T>,
        T: IntoIterator<Item = Color>,
    {
        if capacity == 0 {
            return Err(StateError::ZeroCapacity);
        }
        let towers: Vec<Tower> = towers
            .into_iter()
            .map(|tower| tower.into_iter().collect())
            .collect();
        if towers.is_empty() {
            return Err(StateError::NoTowers);
        }
        for (index, tower) in towers.iter().enumerate() {
            if tower.len() > capacity {
                return Err(StateError::Overfull {
                    tower: index,
                    len: tower.len(),
                    capacity,
                });
            }
        }

        Ok(Self {
            capacity,
            towers,
            last_move: None,
        })
    }

    /// Convenience constructor from string labels, bottom first.
    pub fn from_labels(capacity: usize, towers: &[&[&str]]) -> Result<Self, StateError> {
        Self::new(
            capacity,
            towers
                .iter()
                .map(|tower| tower.iter().map(|label| Color::new(label)).collect::<Vec<_>>()),
        )
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn tower_count(&self) -> usize {
        self.towers.len()
    }

    pub fn towers(&self) -> &[Tower] {
        &self.towers
    }

    pub fn tower(&self, index: usize) -> Option<&[Color]> {
        self.towers.get(index).map(|tower| tower.as_slice())
    }

    /// Exposed disk of a tower, `None` if the tower is empty or missing.
    pub fn top(&self, index: usize) -> Option<&Color> {
        self.towers.get(index).and_then(|tower| tower.last())
    }

    pub fn last_move(&self) -> Option<Move> {
        self.last_move
    }

    /// Total number of disks over all towers.
    pub fn disk_count(&self) -> usize {
        self.towers.iter().map(|tower| tower.len()).sum()
    }

    /// True when every non-empty tower holds a single color.
    pub fn is_sorted(&self) -> bool {
        self.towers.iter().all(|tower| match tower.split_first() {
            None => true,
            Some((bottom, rest)) => rest.iter().all(|disk| disk == bottom),
        })
    }

    fn check_index(&self, tower: usize) -> Result<(), MoveError> {
        if tower < self.towers.len() {
            Ok(())
        } else {
            Err(MoveError::NoSuchTower {
                tower,
                tower_count: self.towers.len(),
            })
        }
    }

    /// Check every rule a move must satisfy to be offered by the search.
    ///
    /// The target must be empty or expose a disk of the same color as the
    /// moving disk, and it must have room below `capacity`.
    pub fn check_move(&self, mv: Move) -> Result<(), MoveError> {
        self.check_index(mv.from)?;
        self.check_index(mv.to)?;
        if mv.from == mv.to {
            return Err(MoveError::SameTower(mv.from));
        }
        let disk = self.top(mv.from).ok_or(MoveError::EmptySource(mv.from))?;
        if self.towers[mv.to].len() >= self.capacity {
            return Err(MoveError::TargetFull {
                tower: mv.to,
                capacity: self.capacity,
            });
        }
        match self.top(mv.to) {
            Some(top) if top != disk => Err(MoveError::ColorMismatch {
                tower: mv.to,
                disk: disk.to_string(),
                top: top.to_string(),
            }),
            _ => Ok(()),
        }
    }

    /// Every legal move, ordered by source tower then target tower.
    ///
    /// Stricter than the bare "empty or same color on top" rule: a full
    /// target tower is skipped too, so no tower ever exceeds `capacity`.
    pub fn legal_moves(&self) -> Vec<Move> {
        let count = self.towers.len();
        let mut moves = Vec::new();
        for from in 0..count {
            for to in 0..count {
                let mv = Move::new(from, to);
                if self.check_move(mv).is_ok() {
                    moves.push(mv);
                }
            }
        }
        moves
    }

    /// Copy of this state with the top disk of `mv.from` moved onto `mv.to`.
    ///
    /// Only the precondition of the transition is checked here (both towers
    /// exist and the source holds a disk); use [`check_move`](Self::check_move)
    /// for the full puzzle rules.
    pub fn transfer(&self, mv: Move) -> Result<Self, MoveError> {
        self.check_index(mv.from)?;
        self.check_index(mv.to)?;

        let mut next = self.clone();
        let disk = next.towers[mv.from]
            .pop()
            .ok_or(MoveError::EmptySource(mv.from))?;
        next.towers[mv.to].push(disk);
        next.last_move = Some(mv);
        Ok(next)
    }
}

impl PartialEq for TowerState {
    fn eq(&self, other: &Self) -> bool {
        self.towers == other.towers
    }
}

impl Eq for TowerState {}

impl Hash for TowerState {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.towers.hash(state);
    }
}

impl fmt::Display for TowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.last_move {
            Some(mv) => writeln!(f, "{mv}")?,
            None => writeln!(f, "Init")?,
        }
        let height = self
            .towers
            .iter()
            .map(|tower| tower.len())
            .max()
            .unwrap_or(0)
            .max(self.capacity);
        for row in (0..height).rev() {
            for (index, tower) in self.towers.iter().enumerate() {
                if index > 0 {
                    f.write_str(" ")?;
                }
                match tower.get(row) {
                    Some(disk) => write!(f, "{disk}")?,
                    None => f.write_str(EMPTY_SLOT)?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn state(capacity: usize, towers: &[&[&str]]) -> TowerState {
        TowerState::from_labels(capacity, towers).unwrap()
    }

    #[test]
    fn test_new_rejects_overfull_tower() {
        let err = TowerState::from_labels(1, &[&["A", "A"], &[]]).unwrap_err();
        assert_eq!(
            err,
            StateError::Overfull {
                tower: 0,
                len: 2,
                capacity: 1
            }
        );
        assert_eq!(TowerState::from_labels(2, &[]).unwrap_err(), StateError::NoTowers);
        assert_eq!(
            TowerState::from_labels(0, &[&[]]).unwrap_err(),
            StateError::ZeroCapacity
        );
    }

    #[test]
    fn test_is_sorted() {
        assert!(state(3, &[&["A", "A", "A"], &[], &[]]).is_sorted());
        assert!(state(2, &[&["A"], &["B"]]).is_sorted());
        assert!(state(2, &[&[], &[]]).is_sorted());
        assert!(!state(3, &[&["3", "2", "1"], &[], &[]]).is_sorted());
        assert!(!state(2, &[&["A", "B"], &["B"]]).is_sorted());
    }

    #[test]
    fn test_check_move_rules() {
        let s = state(2, &[&["A", "B"], &["B"], &[], &["C", "C"]]);

        assert_eq!(s.check_move(Move::new(0, 1)), Ok(()));
        assert_eq!(s.check_move(Move::new(0, 2)), Ok(()));
        assert_eq!(s.check_move(Move::new(1, 1)), Err(MoveError::SameTower(1)));
        assert_eq!(s.check_move(Move::new(2, 0)), Err(MoveError::EmptySource(2)));
        assert_eq!(
            s.check_move(Move::new(1, 0)),
            Err(MoveError::TargetFull {
                tower: 0,
                capacity: 2
            })
        );
        assert_eq!(
            s.check_move(Move::new(0, 4)),
            Err(MoveError::NoSuchTower {
                tower: 4,
                tower_count: 4
            })
        );
        let s = state(3, &[&["A", "B"], &["C"]]);
        assert_eq!(
            s.check_move(Move::new(0, 1)),
            Err(MoveError::ColorMismatch {
                tower: 1,
                disk: "B".to_string(),
                top: "C".to_string()
            })
        );
    }

    #[test]
    fn test_legal_moves_order() {
        let s = state(2, &[&["A", "B"], &["B", "A"], &[]]);
        assert_eq!(s.legal_moves(), vec![Move::new(0, 2), Move::new(1, 2)]);

        let s = state(2, &[&["A"], &["A"]]);
        assert_eq!(s.legal_moves(), vec![Move::new(0, 1), Move::new(1, 0)]);

        let s = state(1, &[&["A"], &["B"]]);
        assert!(s.legal_moves().is_empty());
    }

    #[test]
    fn test_transfer_copies_state() {
        let s = state(3, &[&["A", "B"], &["B"], &[]]);
        let next = s.transfer(Move::new(0, 1)).unwrap();

        assert_eq!(next, state(3, &[&["A"], &["B", "B"], &[]]));
        assert_eq!(next.last_move(), Some(Move::new(0, 1)));
        // parent untouched
        assert_eq!(s.tower(0).unwrap().len(), 2);
        assert_eq!(s.last_move(), None);
        assert_eq!(s.disk_count(), next.disk_count());
    }

    #[test]
    fn test_transfer_empty_source_fails() {
        let s = state(2, &[&[], &["A"]]);
        assert_eq!(s.transfer(Move::new(0, 1)), Err(MoveError::EmptySource(0)));
    }

    #[test]
    fn test_equality_ignores_last_move() {
        let s = state(2, &[&["A"], &["A"]]);
        let there = s.transfer(Move::new(0, 1)).unwrap();
        let back = there.transfer(Move::new(1, 0)).unwrap();

        assert_eq!(back, s);
        assert_ne!(back.last_move(), s.last_move());

        let mut seen = HashSet::new();
        seen.insert(s.clone());
        assert!(seen.contains(&back));
        assert!(!seen.contains(&there));
    }

    #[test]
    fn test_equality_is_positional() {
        assert_ne!(state(2, &[&["A"], &[]]), state(2, &[&[], &["A"]]));
    }

    #[test]
    fn test_display_grid() {
        let s = state(3, &[&["A", "B"], &[], &["C"]]);
        assert_eq!(s.to_string(), "Init\n. . .\nB . .\nA . C\n");

        let next = s.transfer(Move::new(0, 1)).unwrap();
        assert_eq!(
            next.to_string(),
            "Move disk from tower 0 to tower 1\n. . .\n. . .\nA B C\n"
        );
    }
}
