//! 8x8x111 agent-relative chess observation
//!
//! Rows are ranks seen from the side to move (the board is mirrored
//! vertically when black moves), columns are files. Channels:
//!
//! | channel | content |
//! |---|---|
//! | 0, 1 | mover queen-side / king-side castling right |
//! | 2, 3 | opponent queen-side / king-side castling right |
//! | 4 | all ones when the mover is black |
//! | 5 | halfmove clock, one cell set at flattened index `min(clock, 63)` |
//! | 6 | all ones |
//! | 7.. | 8 history frames of 13 channels, most recent first |
//!
//! A history frame holds the mover's pawn..king planes, the opponent's
//! pawn..king planes and a plane set when that position had occurred before.

use chess::{Board, Color, Piece, ALL_SQUARES};
use engine_core::{CodecError, DisplayBoard, Observation, Seat};

use crate::moves::relative_rank;
use crate::{color_for, State};

pub const SIZE: usize = 8;
pub const META_CHANNELS: usize = 7;
pub const HISTORY_FRAMES: usize = 8;
pub const FRAME_CHANNELS: usize = 13;
pub const CHANNELS: usize = META_CHANNELS + HISTORY_FRAMES * FRAME_CHANNELS; // 111

const PIECE_CHANNELS: usize = 12;
const REPETITION_CHANNEL: usize = 12;

const PIECES: [Piece; 6] = [
    Piece::Pawn,
    Piece::Knight,
    Piece::Bishop,
    Piece::Rook,
    Piece::Queen,
    Piece::King,
];

/// Display code of a piece: 1-6 white pawn..king, 7-12 black pawn..king
#[inline]
pub fn piece_code(piece: Piece, color: Color) -> u8 {
    let base = piece.to_index() as u8 + 1;
    match color {
        Color::White => base,
        Color::Black => base + 6,
    }
}

pub(crate) fn observe(state: &State) -> Observation {
    let mut obs = Observation::zeros(SIZE, SIZE, CHANNELS);
    let mover = state.board.side_to_move();

    for (offset, color) in [(0, mover), (2, !mover)] {
        let rights = state.board.castle_rights(color);
        if rights.has_queenside() {
            obs.fill_channel(offset, 1);
        }
        if rights.has_kingside() {
            obs.fill_channel(offset + 1, 1);
        }
    }
    if mover == Color::Black {
        obs.fill_channel(4, 1);
    }
    let clock = (state.halfmove_clock as usize).min(SIZE * SIZE - 1);
    obs.set(clock / SIZE, clock % SIZE, 5, 1);
    obs.fill_channel(6, 1);

    let latest = state.history.len();
    for frame in 0..HISTORY_FRAMES.min(latest) {
        let index = latest - 1 - frame;
        let base = META_CHANNELS + frame * FRAME_CHANNELS;
        let board = &state.history[index];
        write_frame(&mut obs, board, mover, base);

        let hash = board.get_hash();
        if state.history[..index].iter().any(|b| b.get_hash() == hash) {
            obs.fill_channel(base + REPETITION_CHANNEL, 1);
        }
    }

    obs
}

fn write_frame(obs: &mut Observation, board: &Board, mover: Color, base: usize) {
    for sq in ALL_SQUARES {
        let (Some(piece), Some(color)) = (board.piece_on(sq), board.color_on(sq)) else {
            continue;
        };
        let owner_offset = if color == mover { 0 } else { 6 };
        let row = relative_rank(sq.get_rank().to_index(), mover);
        let col = sq.get_file().to_index();
        obs.set(row, col, base + owner_offset + piece.to_index(), 1);
    }
}

/// Decode the most recent frame into an absolute board
///
/// Display row 0 is rank 8. Every piece channel of the frame is checked, so a
/// cell claimed by two pieces or holding a value other than 0/1 is an error.
pub(crate) fn decode(obs: &Observation, current: Seat) -> Result<DisplayBoard, CodecError> {
    let expected = [SIZE, SIZE, CHANNELS];
    if obs.shape() != expected {
        return Err(CodecError::Shape {
            expected,
            actual: obs.shape(),
        });
    }

    let mover = color_for(current);
    let mut board = DisplayBoard::new(SIZE, SIZE);
    for row in 0..SIZE {
        for col in 0..SIZE {
            let mut found = None;
            let mut set = 0;
            for slot in 0..PIECE_CHANNELS {
                let channel = META_CHANNELS + slot;
                match obs.get(row, col, channel) {
                    0 => {}
                    1 => {
                        set += 1;
                        let color = if slot < 6 { mover } else { !mover };
                        found = Some(piece_code(PIECES[slot % 6], color));
                    }
                    value => {
                        return Err(CodecError::InvalidValue {
                            row,
                            col,
                            channel,
                            value,
                        })
                    }
                }
            }
            if set > 1 {
                return Err(CodecError::Ambiguous {
                    row,
                    col,
                    channels: set,
                });
            }
            if let Some(code) = found {
                let rank = relative_rank(row, mover);
                board.set(SIZE - 1 - rank, col, code);
            }
        }
    }
    Ok(board)
}
