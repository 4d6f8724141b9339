use rand::Rng;

use crate::game::Board;

/// Picks uniformly at random among the legal columns.
pub fn random_column<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Option<usize> {
    let legal: Vec<usize> = board.legal_columns().collect();
    if legal.is_empty() {
        return None;
    }
    let idx = rng.random_range(0..legal.len());
    Some(legal[idx])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Player, COLS, ROWS};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn selects_legal_column() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut board = Board::new();
        for _ in 0..ROWS {
            board.drop_piece(2, Player::One).unwrap();
        }

        for _ in 0..100 {
            let col = random_column(&board, &mut rng).unwrap();
            assert!(board.is_legal(col), "column {col} is not legal");
        }
    }

    #[test]
    fn covers_every_legal_column() {
        let mut rng = StdRng::seed_from_u64(11);
        let board = Board::new();
        let mut seen = [false; COLS];
        for _ in 0..500 {
            seen[random_column(&board, &mut rng).unwrap()] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn same_seed_same_choices() {
        let board = Board::new();
        let mut a = StdRng::seed_from_u64(3);
        let mut b = StdRng::seed_from_u64(3);
        for _ in 0..20 {
            assert_eq!(random_column(&board, &mut a), random_column(&board, &mut b));
        }
    }

    #[test]
    fn none_when_full() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut board = Board::new();
        for col in 0..COLS {
            for _ in 0..ROWS {
                board.drop_piece(col, Player::Two).unwrap();
            }
        }
        assert_eq!(random_column(&board, &mut rng), None);
    }
}
