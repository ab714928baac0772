//! Attack tables for every piece type.
//!
//! King and knight attacks are fixed-offset lookups. Sliding pieces use a
//! full-length ray per direction; blockers are applied at lookup time by
//! cutting the ray at the nearest occupied square.

use crate::Bitboard;
use chess_core::Square;
use std::sync::OnceLock;

/// The eight ray directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
        Direction::NorthEast,
        Direction::NorthWest,
        Direction::SouthEast,
        Direction::SouthWest,
    ];

    pub const ORTHOGONAL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    pub const DIAGONAL: [Direction; 4] = [
        Direction::NorthEast,
        Direction::NorthWest,
        Direction::SouthEast,
        Direction::SouthWest,
    ];

    /// Step as `(d_rank, d_file)`.
    pub const fn delta(self) -> (i8, i8) {
        match self {
            Direction::North => (1, 0),
            Direction::South => (-1, 0),
            Direction::East => (0, 1),
            Direction::West => (0, -1),
            Direction::NorthEast => (1, 1),
            Direction::NorthWest => (1, -1),
            Direction::SouthEast => (-1, 1),
            Direction::SouthWest => (-1, -1),
        }
    }

    /// True when travelling this way increases the square index, so the
    /// nearest blocker is the lowest set bit. Otherwise it is the highest.
    pub const fn scans_forward(self) -> bool {
        matches!(
            self,
            Direction::North | Direction::East | Direction::NorthEast | Direction::NorthWest
        )
    }

    #[inline]
    const fn index(self) -> usize {
        self as usize
    }
}

/// Precomputed attack masks, built once per process.
pub struct AttackTables {
    king: [Bitboard; 64],
    knight: [Bitboard; 64],
    rays: [[Bitboard; 64]; 8],
    attacks_to: [Bitboard; 64],
}

const KING_OFFSETS: [(i8, i8); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (2, 1),
    (2, -1),
    (-2, 1),
    (-2, -1),
    (1, 2),
    (1, -2),
    (-1, 2),
    (-1, -2),
];

impl AttackTables {
    fn new() -> Self {
        let mut tables = AttackTables {
            king: [Bitboard::EMPTY; 64],
            knight: [Bitboard::EMPTY; 64],
            rays: [[Bitboard::EMPTY; 64]; 8],
            attacks_to: [Bitboard::EMPTY; 64],
        };

        for index in 0..64u8 {
            let sq = Square::from_index_masked(index);
            let i = index as usize;

            tables.king[i] = offsets_from(sq, &KING_OFFSETS);
            tables.knight[i] = offsets_from(sq, &KNIGHT_OFFSETS);

            for dir in Direction::ALL {
                let (d_rank, d_file) = dir.delta();
                let mut ray = Bitboard::EMPTY;
                let mut cursor = sq.offset(d_rank, d_file);
                while let Some(target) = cursor {
                    ray.set(target);
                    cursor = target.offset(d_rank, d_file);
                }
                tables.rays[dir.index()][i] = ray;
                tables.attacks_to[i] |= ray;
            }
            tables.attacks_to[i] |= tables.knight[i];
        }

        tables
    }

    #[inline]
    pub fn king(&self, sq: Square) -> Bitboard {
        self.king[sq.index() as usize]
    }

    #[inline]
    pub fn knight(&self, sq: Square) -> Bitboard {
        self.knight[sq.index() as usize]
    }

    /// The full ray from `sq` to the board edge, ignoring blockers.
    #[inline]
    pub fn ray(&self, dir: Direction, sq: Square) -> Bitboard {
        self.rays[dir.index()][sq.index() as usize]
    }

    /// Every square from which some piece could reach `sq` on an empty board.
    #[inline]
    pub fn attacks_to(&self, sq: Square) -> Bitboard {
        self.attacks_to[sq.index() as usize]
    }

    /// The ray from `sq` in `dir`, cut after the first occupied square.
    #[inline]
    pub fn slider_ray(&self, dir: Direction, sq: Square, occupied: Bitboard) -> Bitboard {
        let ray = self.ray(dir, sq);
        let blockers = ray & occupied;
        let nearest = if dir.scans_forward() {
            blockers.lsb()
        } else {
            blockers.msb()
        };
        match nearest {
            Some(blocker) => ray ^ self.ray(dir, blocker),
            None => ray,
        }
    }
}

fn offsets_from(sq: Square, offsets: &[(i8, i8)]) -> Bitboard {
    offsets
        .iter()
        .filter_map(|&(d_rank, d_file)| sq.offset(d_rank, d_file))
        .fold(Bitboard::EMPTY, |bb, target| bb | Bitboard::from_square(target))
}

static ATTACK_TABLES: OnceLock<AttackTables> = OnceLock::new();

/// Gets the global attack tables, initializing if necessary.
pub fn attack_tables() -> &'static AttackTables {
    ATTACK_TABLES.get_or_init(AttackTables::new)
}

/// Returns knight attacks from the given square.
#[inline]
pub fn knight_attacks(sq: Square) -> Bitboard {
    attack_tables().knight(sq)
}

/// Returns king attacks from the given square.
#[inline]
pub fn king_attacks(sq: Square) -> Bitboard {
    attack_tables().king(sq)
}

/// Returns bishop attacks from `sq` given the board occupancy.
#[inline]
pub fn bishop_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    let tables = attack_tables();
    Direction::DIAGONAL
        .iter()
        .fold(Bitboard::EMPTY, |bb, &dir| bb | tables.slider_ray(dir, sq, occupied))
}

/// Returns rook attacks from `sq` given the board occupancy.
#[inline]
pub fn rook_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    let tables = attack_tables();
    Direction::ORTHOGONAL
        .iter()
        .fold(Bitboard::EMPTY, |bb, &dir| bb | tables.slider_ray(dir, sq, occupied))
}

/// Returns queen attacks from `sq` given the board occupancy.
#[inline]
pub fn queen_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    bishop_attacks(sq, occupied) | rook_attacks(sq, occupied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::{File, Rank};

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn bb(squares: &[&str]) -> Bitboard {
        squares
            .iter()
            .fold(Bitboard::EMPTY, |acc, s| acc | Bitboard::from_square(sq(s)))
    }

    #[test]
    fn knight_attacks_center() {
        let sq = Square::new(File::D, Rank::R4);
        assert_eq!(knight_attacks(sq).count(), 8);
    }

    #[test]
    fn knight_attacks_corner() {
        assert_eq!(knight_attacks(Square::A1).count(), 2);
    }

    #[test]
    fn knight_attacks_edge() {
        let sq = Square::new(File::A, Rank::R4);
        assert_eq!(knight_attacks(sq).count(), 4);
    }

    #[test]
    fn king_attacks_center_corner_edge() {
        assert_eq!(king_attacks(sq("d4")).count(), 8);
        assert_eq!(king_attacks(Square::A1).count(), 3);
        assert_eq!(king_attacks(sq("a4")).count(), 5);
    }

    #[test]
    fn knight_specific_squares() {
        let expected = bb(&["d6", "f6", "g5", "g3", "f2", "d2", "c3", "c5"]);
        assert_eq!(knight_attacks(sq("e4")), expected);
    }

    #[test]
    fn rays_run_to_the_edge() {
        let tables = attack_tables();
        assert_eq!(tables.ray(Direction::North, Square::A1), Bitboard::FILE_A ^ Bitboard::from_square(Square::A1));
        assert_eq!(tables.ray(Direction::East, Square::H1), Bitboard::EMPTY);
        assert_eq!(tables.ray(Direction::SouthWest, sq("c3")), bb(&["b2", "a1"]));
        assert_eq!(tables.ray(Direction::NorthWest, sq("c3")), bb(&["b4", "a5"]));
    }

    #[test]
    fn scan_direction_matches_index_order() {
        for dir in Direction::ALL {
            let (d_rank, d_file) = dir.delta();
            let step = d_rank * 8 + d_file;
            assert_eq!(dir.scans_forward(), step > 0, "{:?}", dir);
        }
    }

    #[test]
    fn slider_ray_stops_at_blocker() {
        let tables = attack_tables();
        let occupied = bb(&["d6", "d2"]);
        assert_eq!(tables.slider_ray(Direction::North, sq("d4"), occupied), bb(&["d5", "d6"]));
        assert_eq!(tables.slider_ray(Direction::South, sq("d4"), occupied), bb(&["d3", "d2"]));
    }

    #[test]
    fn rook_attacks_with_blockers() {
        let occupied = bb(&["d6", "b4", "d1"]);
        let expected = bb(&["d5", "d6", "d3", "d2", "d1", "c4", "b4", "e4", "f4", "g4", "h4"]);
        assert_eq!(rook_attacks(sq("d4"), occupied), expected);
    }

    #[test]
    fn bishop_attacks_with_blockers() {
        let occupied = bb(&["f6", "b2"]);
        let expected = bb(&["e5", "f6", "c5", "b6", "a7", "e3", "f2", "g1", "c3", "b2"]);
        assert_eq!(bishop_attacks(sq("d4"), occupied), expected);
    }

    #[test]
    fn queen_attacks_open_board() {
        assert_eq!(queen_attacks(sq("d4"), Bitboard::EMPTY).count(), 27);
        assert_eq!(queen_attacks(Square::A1, Bitboard::EMPTY).count(), 21);
    }

    #[test]
    fn attacks_to_covers_every_reach() {
        let tables = attack_tables();
        let e4 = sq("e4");
        let reach = tables.attacks_to(e4);
        assert!(reach.contains(sq("e8")));
        assert!(reach.contains(sq("a8")));
        assert!(reach.contains(sq("f6")));
        assert!(!reach.contains(sq("f7")));
        assert!(!reach.contains(e4));
        assert_eq!(reach, queen_attacks(e4, Bitboard::EMPTY) | knight_attacks(e4));
    }
}
