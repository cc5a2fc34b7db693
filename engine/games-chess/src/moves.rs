//! Move-plane action codec
//!
//! Every source square owns a block of 73 planes, so an action id is
//! `file * 584 + rank * 73 + plane` with `rank` relative to the mover (rank 0
//! is the mover's back rank). Planes:
//!
//! - `0..56`: sliding moves, `direction * 7 + distance - 1`
//! - `56..64`: knight moves, by index into [`KNIGHT_DELTAS`]
//! - `64..73`: under-promotions, `64 + piece * 3 + (d_col + 1)` for knight,
//!   bishop, rook
//!
//! Deltas are `(d_row, d_col)` in mover-relative rows, "up" is towards the
//! opponent. Queen promotions, castling (the king's two-square slide) and en
//! passant captures use the ordinary geometric planes.

use chess::{ChessMove, Color, File, Piece, Rank, Square};

pub const PLANES: usize = 73;
pub const SQUARE_ACTIONS: usize = 8 * PLANES; // 584
pub const NUM_ACTIONS: usize = 8 * SQUARE_ACTIONS; // 4672

const KNIGHT_PLANES: usize = 56;
const UNDERPROMOTION_PLANES: usize = 64;

/// Sliding directions in plane order: up, up-right, right, down-right, down,
/// down-left, left, up-left
pub const DIRECTIONS: [(i8, i8); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

/// Knight deltas in plane order, offset by 56
pub const KNIGHT_DELTAS: [(i8, i8); 8] = [
    (2, 1),
    (1, 2),
    (-1, 2),
    (-2, 1),
    (-2, -1),
    (-1, -2),
    (1, -2),
    (2, -1),
];

const UNDERPROMOTIONS: [Piece; 3] = [Piece::Knight, Piece::Bishop, Piece::Rook];

/// Rank seen from `mover`'s side of the board
#[inline]
pub fn relative_rank(rank: usize, mover: Color) -> usize {
    match mover {
        Color::White => rank,
        Color::Black => 7 - rank,
    }
}

#[inline]
pub fn action_id(file: usize, rank: usize, plane: usize) -> usize {
    file * SQUARE_ACTIONS + rank * PLANES + plane
}

/// `(file, relative rank, plane)` of an action id
pub fn split_action(action: usize) -> Option<(usize, usize, usize)> {
    if action >= NUM_ACTIONS {
        return None;
    }
    Some((
        action / SQUARE_ACTIONS,
        (action / PLANES) % 8,
        action % PLANES,
    ))
}

/// Plane of a knight or sliding move vector
pub fn plane_for_delta(d_row: i8, d_col: i8) -> Option<usize> {
    if let Some(index) = KNIGHT_DELTAS.iter().position(|&d| d == (d_row, d_col)) {
        return Some(KNIGHT_PLANES + index);
    }

    let distance = d_row.abs().max(d_col.abs());
    if distance == 0 || distance > 7 {
        return None;
    }
    // Only straight lines and true diagonals slide
    if d_row != 0 && d_col != 0 && d_row.abs() != d_col.abs() {
        return None;
    }

    let direction = DIRECTIONS
        .iter()
        .position(|&d| d == (d_row.signum(), d_col.signum()))?;
    Some(direction * 7 + distance as usize - 1)
}

/// Plane of a one-step pawn push or capture promoting to `piece`
pub fn underpromotion_plane(piece: Piece, d_col: i8) -> Option<usize> {
    let index = UNDERPROMOTIONS.iter().position(|&p| p == piece)?;
    if !(-1..=1).contains(&d_col) {
        return None;
    }
    Some(UNDERPROMOTION_PLANES + index * 3 + (d_col + 1) as usize)
}

/// Move vector of a plane and the under-promotion it implies, if any
pub fn plane_geometry(plane: usize) -> Option<(i8, i8, Option<Piece>)> {
    match plane {
        p if p < KNIGHT_PLANES => {
            let (d_row, d_col) = DIRECTIONS[p / 7];
            let distance = (p % 7 + 1) as i8;
            Some((d_row * distance, d_col * distance, None))
        }
        p if p < UNDERPROMOTION_PLANES => {
            let (d_row, d_col) = KNIGHT_DELTAS[p - KNIGHT_PLANES];
            Some((d_row, d_col, None))
        }
        p if p < PLANES => {
            let offset = p - UNDERPROMOTION_PLANES;
            Some((1, (offset % 3) as i8 - 1, Some(UNDERPROMOTIONS[offset / 3])))
        }
        _ => None,
    }
}

fn action_between(
    from: Square,
    to: Square,
    promotion: Option<Piece>,
    mover: Color,
) -> Option<usize> {
    let from_file = from.get_file().to_index();
    let from_rank = relative_rank(from.get_rank().to_index(), mover);
    let to_rank = relative_rank(to.get_rank().to_index(), mover);
    let d_row = to_rank as i8 - from_rank as i8;
    let d_col = to.get_file().to_index() as i8 - from_file as i8;

    let plane = match promotion {
        Some(piece) if piece != Piece::Queen => underpromotion_plane(piece, d_col)?,
        _ => plane_for_delta(d_row, d_col)?,
    };
    Some(action_id(from_file, from_rank, plane))
}

/// Action id of an engine move played by `mover`
pub fn move_to_action(mv: ChessMove, mover: Color) -> Option<usize> {
    action_between(mv.get_source(), mv.get_dest(), mv.get_promotion(), mover)
}

/// Squares of an action played by `mover`, ignoring legality
///
/// Queen promotions are not visible here; only the board knows whether the
/// moving piece is a pawn.
pub fn action_squares(action: usize, mover: Color) -> Option<(Square, Square, Option<Piece>)> {
    let (file, rank, plane) = split_action(action)?;
    let (d_row, d_col, promotion) = plane_geometry(plane)?;

    let to_file = file as i8 + d_col;
    let to_rank = rank as i8 + d_row;
    if !(0..8).contains(&to_file) || !(0..8).contains(&to_rank) {
        return None;
    }

    let from = square(file, relative_rank(rank, mover));
    let to = square(to_file as usize, relative_rank(to_rank as usize, mover));
    Some((from, to, promotion))
}

/// Action id for a client move between algebraic squares
///
/// `promotion` is one of `q`, `r`, `b`, `n` (any case) and only valid on a
/// step onto the last rank; a pawn reaching the last rank without one is
/// treated as a queen promotion.
pub fn intent_action(from: &str, to: &str, promotion: Option<char>, mover: Color) -> Option<usize> {
    let from = parse_square(from)?;
    let to = parse_square(to)?;
    let promotion = match promotion {
        None => None,
        Some(c) => Some(promotion_piece(c)?),
    };
    if promotion.is_some() && !is_promotion_step(from, to, mover) {
        return None;
    }
    action_between(from, to, promotion, mover)
}

/// One-rank step from the mover's seventh rank onto the last rank
fn is_promotion_step(from: Square, to: Square, mover: Color) -> bool {
    let from_rank = relative_rank(from.get_rank().to_index(), mover);
    let to_rank = relative_rank(to.get_rank().to_index(), mover);
    let d_col = to.get_file().to_index() as i8 - from.get_file().to_index() as i8;
    from_rank == 6 && to_rank == 7 && d_col.abs() <= 1
}

fn promotion_piece(c: char) -> Option<Piece> {
    match c.to_ascii_lowercase() {
        'q' => Some(Piece::Queen),
        'r' => Some(Piece::Rook),
        'b' => Some(Piece::Bishop),
        'n' => Some(Piece::Knight),
        _ => None,
    }
}

#[inline]
pub fn square(file: usize, rank: usize) -> Square {
    Square::make_square(Rank::from_index(rank), File::from_index(file))
}

/// Parse an algebraic square such as `e4`
pub fn parse_square(name: &str) -> Option<Square> {
    let bytes = name.trim().as_bytes();
    if bytes.len() != 2 {
        return None;
    }
    let file = bytes[0].to_ascii_lowercase();
    let rank = bytes[1];
    if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
        return None;
    }
    Some(square((file - b'a') as usize, (rank - b'1') as usize))
}

pub fn square_name(sq: Square) -> String {
    let file = (b'a' + sq.get_file().to_index() as u8) as char;
    format!("{}{}", file, sq.get_rank().to_index() + 1)
}

/// UCI text of a move, e.g. `e2e4` or `e7e8n`
pub fn uci(from: Square, to: Square, promotion: Option<Piece>) -> String {
    let suffix = match promotion {
        Some(Piece::Queen) => "q",
        Some(Piece::Rook) => "r",
        Some(Piece::Bishop) => "b",
        Some(Piece::Knight) => "n",
        _ => "",
    };
    format!("{}{}{}", square_name(from), square_name(to), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rook_slide_example() {
        // (row 7, col 0) -> (row 7, col 3): right, distance 3
        assert_eq!(plane_for_delta(0, 3), Some(16));
        let mv = ChessMove::new(square(0, 7), square(3, 7), None);
        assert_eq!(move_to_action(mv, Color::White), Some(527));
    }

    #[test]
    fn test_knight_table() {
        assert_eq!(plane_for_delta(-2, 1), Some(59));
        for (index, &(d_row, d_col)) in KNIGHT_DELTAS.iter().enumerate() {
            assert_eq!(plane_for_delta(d_row, d_col), Some(56 + index));
        }
    }

    #[test]
    fn test_sliding_planes() {
        assert_eq!(plane_for_delta(1, 0), Some(0));
        assert_eq!(plane_for_delta(7, 7), Some(13));
        assert_eq!(plane_for_delta(-1, 1), Some(21));
        assert_eq!(plane_for_delta(-3, -3), Some(37));
        assert_eq!(plane_for_delta(0, -7), Some(48));
        assert_eq!(plane_for_delta(1, -1), Some(49));
    }

    #[test]
    fn test_rejects_non_geometric_deltas() {
        assert_eq!(plane_for_delta(0, 0), None);
        assert_eq!(plane_for_delta(3, 1), None);
        assert_eq!(plane_for_delta(2, 3), None);
        assert_eq!(plane_for_delta(8, 0), None);
    }

    #[test]
    fn test_plane_geometry_inverts_planes() {
        for plane in 0..64 {
            let (d_row, d_col, promotion) = plane_geometry(plane).unwrap();
            assert_eq!(promotion, None);
            assert_eq!(plane_for_delta(d_row, d_col), Some(plane));
        }
        for plane in 64..PLANES {
            let (d_row, d_col, promotion) = plane_geometry(plane).unwrap();
            assert_eq!(d_row, 1);
            assert_eq!(underpromotion_plane(promotion.unwrap(), d_col), Some(plane));
        }
        assert_eq!(plane_geometry(PLANES), None);
    }

    #[test]
    fn test_underpromotion_planes() {
        assert_eq!(underpromotion_plane(Piece::Knight, 0), Some(65));
        assert_eq!(underpromotion_plane(Piece::Bishop, -1), Some(67));
        assert_eq!(underpromotion_plane(Piece::Rook, 1), Some(72));
        assert_eq!(underpromotion_plane(Piece::Queen, 0), None);
        assert_eq!(underpromotion_plane(Piece::Rook, 2), None);
    }

    #[test]
    fn test_split_action() {
        assert_eq!(split_action(527), Some((0, 7, 16)));
        assert_eq!(split_action(NUM_ACTIONS - 1), Some((7, 7, 72)));
        assert_eq!(split_action(NUM_ACTIONS), None);
    }

    #[test]
    fn test_black_moves_are_mirrored() {
        let e2e4 = ChessMove::new(square(4, 1), square(4, 3), None);
        let e7e5 = ChessMove::new(square(4, 6), square(4, 4), None);
        assert_eq!(move_to_action(e2e4, Color::White), Some(2410));
        assert_eq!(move_to_action(e7e5, Color::Black), Some(2410));

        let (from, to, promotion) = action_squares(2410, Color::Black).unwrap();
        assert_eq!(uci(from, to, promotion), "e7e5");
    }

    #[test]
    fn test_action_squares_off_board() {
        // a1 sliding left leaves the board
        assert_eq!(action_squares(action_id(0, 0, 48), Color::White), None);
    }

    #[test]
    fn test_intent_action() {
        assert_eq!(intent_action("e2", "e4", None, Color::White), Some(2410));
        assert_eq!(intent_action("E7", "E5", None, Color::Black), Some(2410));
        assert_eq!(
            intent_action("a7", "a8", Some('n'), Color::White),
            Some(action_id(0, 6, 65))
        );
        assert_eq!(
            intent_action("a7", "a8", Some('Q'), Color::White),
            Some(action_id(0, 6, 0))
        );
        assert_eq!(intent_action("a7", "a8", Some('k'), Color::White), None);
        assert_eq!(intent_action("i1", "a1", None, Color::White), None);
        assert_eq!(intent_action("b1", "c4", None, Color::White), None);
    }

    #[test]
    fn test_intent_promotion_requires_last_rank_step() {
        assert_eq!(intent_action("g1", "f3", Some('q'), Color::White), None);
        assert_eq!(intent_action("e2", "e4", Some('q'), Color::White), None);
        assert_eq!(intent_action("a6", "a7", Some('q'), Color::White), None);
        assert_eq!(intent_action("a7", "c8", Some('q'), Color::White), None);
        // Black promotes on rank 1
        assert_eq!(intent_action("a7", "a8", Some('q'), Color::Black), None);
        assert_eq!(
            intent_action("b2", "a1", Some('r'), Color::Black),
            Some(action_id(1, 6, 70))
        );
    }

    #[test]
    fn test_square_names() {
        let e4 = parse_square("e4").unwrap();
        assert_eq!(square_name(e4), "e4");
        assert_eq!(parse_square("h9"), None);
        assert_eq!(parse_square("e"), None);
        assert_eq!(
            uci(square(4, 6), square(4, 7), Some(Piece::Knight)),
            "e7e8n"
        );
    }
}
