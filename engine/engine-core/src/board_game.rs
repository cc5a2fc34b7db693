//! Shared types for two-player board games.
//!
//! Observations are agent-relative: channel 0 always holds the pieces of the
//! seat to move and channel 1 those of the other seat. `relative_channel` and
//! `owner_of_channel` are the only places that convention is spelled out; every
//! encoder and decoder goes through them.

use serde::{Deserialize, Serialize};

use crate::codec::CodecError;
use crate::observation::Observation;

/// One of the two seats at the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Seat {
    First,
    Second,
}

impl Seat {
    /// The opposing seat.
    pub fn other(self) -> Seat {
        match self {
            Seat::First => Seat::Second,
            Seat::Second => Seat::First,
        }
    }

    /// 0 for the first seat, 1 for the second.
    pub fn index(self) -> usize {
        match self {
            Seat::First => 0,
            Seat::Second => 1,
        }
    }

    /// Absolute player id used on display boards (1 or 2).
    pub fn player_id(self) -> u8 {
        self.index() as u8 + 1
    }

    pub fn from_player_id(id: u8) -> Option<Seat> {
        match id {
            1 => Some(Seat::First),
            2 => Some(Seat::Second),
            _ => None,
        }
    }
}

/// Channel holding `owner`'s pieces when `current` is to move.
#[inline]
pub fn relative_channel(owner: Seat, current: Seat) -> usize {
    if owner == current {
        0
    } else {
        1
    }
}

/// Absolute owner of a relative channel (0 or 1) when `current` is to move.
#[inline]
pub fn owner_of_channel(channel: usize, current: Seat) -> Seat {
    if channel == 0 {
        current
    } else {
        current.other()
    }
}

/// Mark `owner`'s piece at (`row`, `col`) in a two-channel observation.
pub fn mark_two_planes(obs: &mut Observation, row: usize, col: usize, owner: Seat, current: Seat) {
    obs.set(row, col, relative_channel(owner, current), 1);
}

/// Decode a `[rows][cols][2]` observation into absolute player ids.
///
/// The result is indexed exactly like the observation (`[row][col]` in
/// observation order); games map it to display coordinates themselves.
/// Cells with both channels set, or values other than 0/1, are rejected.
pub fn decode_two_planes(
    obs: &Observation,
    expected_rows: usize,
    expected_cols: usize,
    current: Seat,
) -> Result<Vec<Vec<u8>>, CodecError> {
    let expected = [expected_rows, expected_cols, 2];
    if obs.shape() != expected {
        return Err(CodecError::Shape {
            expected,
            actual: obs.shape(),
        });
    }

    let mut owners = vec![vec![0u8; expected_cols]; expected_rows];
    for (row, owner_row) in owners.iter_mut().enumerate() {
        for (col, cell) in owner_row.iter_mut().enumerate() {
            let mut set = 0;
            for channel in 0..2 {
                match obs.get(row, col, channel) {
                    0 => {}
                    1 => {
                        set += 1;
                        *cell = owner_of_channel(channel, current).player_id();
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
        }
    }
    Ok(owners)
}
