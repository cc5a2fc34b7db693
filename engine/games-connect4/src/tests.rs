use super::*;
use engine_core::{EngineError, ErasedGame};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

const R: Option<Seat> = Some(Seat::First);
const Y: Option<Seat> = Some(Seat::Second);

fn play(columns: &[usize]) -> State {
    columns
        .iter()
        .fold(State::new(), |state, &col| state.drop_piece(col))
}

#[test]
fn test_initial_state() {
    let state = State::new();
    assert_eq!(state.board, [None; BOARD_SIZE]);
    assert_eq!(state.current_player(), Seat::First);
    assert_eq!(state.outcome(), None);
    assert_eq!(state.column_heights, [0; COLS]);
    assert!(!state.is_done());
}

#[test]
fn test_legal_moves() {
    let state = State::new();
    assert_eq!(state.legal_moves(), (0..COLS).collect::<Vec<_>>());
    assert_eq!(Connect4::legal_mask(&state), vec![true; COLS]);

    let state = state.drop_piece(3);
    assert_eq!(state.legal_moves().len(), 7);
}

#[test]
fn test_drop_piece() {
    let new_state = State::new().drop_piece(3);

    assert_eq!(new_state.cell(3, 0), R);
    assert_eq!(new_state.column_heights[3], 1);
    assert_eq!(new_state.current_player(), Seat::Second);
    assert!(!new_state.is_done());
}

#[test]
fn test_stacking_pieces() {
    let mut state = State::new();
    for i in 0..ROWS {
        state = state.drop_piece(0);
        assert_eq!(state.column_heights[0], (i + 1) as u8);
        assert_eq!(state.last_row_in_column(0), Some(i));
    }

    assert!(!state.legal_moves().contains(&0));
    assert!(!Connect4::legal_mask(&state)[0]);
}

#[test]
fn test_invalid_move_full_column() {
    let state = play(&[0; ROWS]);
    assert_eq!(state.drop_piece(0), state);
    assert_eq!(state.drop_piece(COLS), state);
}

#[test]
fn test_horizontal_win() {
    let state = play(&[0, 0, 1, 1, 2, 2, 3]);

    assert_eq!(state.outcome(), Some(Outcome::Winner(Seat::First)));
    assert!(state.legal_moves().is_empty());
    // The turn still passes on the winning move
    assert_eq!(state.current_player(), Seat::Second);
}

#[test]
fn test_vertical_win() {
    let state = play(&[0, 1, 0, 1, 0, 1, 0]);
    assert_eq!(state.outcome(), Some(Outcome::Winner(Seat::First)));
}

#[test]
fn test_second_player_win() {
    let state = play(&[6, 0, 6, 1, 5, 2, 4, 3]);
    assert_eq!(state.outcome(), Some(Outcome::Winner(Seat::Second)));
    assert_eq!(state.current_player(), Seat::First);
}

#[test]
fn test_diagonal_win_ascending() {
    // Red builds (0,0), (1,1), (2,2), (3,3); Yellow plays in columns 5 and 6
    let state = play(&[0, 5, 1, 6, 1, 5, 2, 6, 2, 5, 2, 6, 3, 5, 3, 6, 3, 5, 3]);
    assert_eq!(state.outcome(), Some(Outcome::Winner(Seat::First)));
}

#[test]
fn test_diagonal_win_descending() {
    // Red builds (3,0), (2,1), (1,2), (0,3)
    let state = play(&[3, 2, 2, 1, 1, 0, 1, 0, 0, 4, 0]);
    assert_eq!(state.outcome(), Some(Outcome::Winner(Seat::First)));
}

#[test]
fn test_draw_game() {
    // Columns alternate R R Y Y R R / Y Y R R Y Y, which has no four in a row
    let red_column = [R, R, Y, Y, R, R];
    let yellow_column = [Y, Y, R, R, Y, Y];

    let mut state = State::new();
    for col in 0..COLS {
        let pattern = if col % 2 == 0 { red_column } else { yellow_column };
        for (row, owner) in pattern.iter().enumerate() {
            state.board[State::pos(col, row)] = *owner;
        }
    }
    state.column_heights = [ROWS as u8; COLS];
    state.outcome = state.check_outcome_at(0, 0);

    assert_eq!(state.outcome(), Some(Outcome::Draw));
    assert!(state.is_done());
    assert_eq!(Connect4::legal_mask(&state), vec![false; COLS]);
}

#[test]
fn test_observation_is_top_down_and_relative() {
    let state = State::new().drop_piece(3);
    let obs = Connect4::observe(&state);

    assert_eq!(obs.shape(), [ROWS, COLS, CHANNELS]);
    // Red's disc sits in the bottom row, which is observation row 5, and
    // Yellow is to move so it is in the opponent channel
    assert_eq!(obs.get(5, 3, 1), 1);
    assert_eq!(obs.get(5, 3, 0), 0);
    assert_eq!(obs.get(0, 3, 1), 0);

    let state = state.drop_piece(3);
    let obs = Connect4::observe(&state);
    // Red to move again: own disc in channel 0, Yellow's above it in channel 1
    assert_eq!(obs.get(5, 3, 0), 1);
    assert_eq!(obs.get(4, 3, 1), 1);
}

#[test]
fn test_decode_board_absolute_ids() {
    let state = play(&[3, 3, 4]);
    let obs = Connect4::observe(&state);
    let board = Connect4::decode_board(&obs, state.current_player()).unwrap();

    assert_eq!(board.rows, ROWS);
    assert_eq!(board.cols, COLS);
    assert_eq!(board.get(5, 3), 1);
    assert_eq!(board.get(4, 3), 2);
    assert_eq!(board.get(5, 4), 1);
    assert_eq!(board.occupied(), 3);
}

#[test]
fn test_decode_matches_rules_for_every_cell() {
    let mut rng = ChaCha20Rng::seed_from_u64(7);
    let mut state = State::new();
    while !state.is_done() {
        let obs = Connect4::observe(&state);
        let board = Connect4::decode_board(&obs, state.current_player()).unwrap();
        for row in 0..ROWS {
            for col in 0..COLS {
                let expected = state.cell(col, row).map_or(0, Seat::player_id);
                assert_eq!(board.get(ROWS - 1 - row, col), expected);
            }
        }
        let legal = state.legal_moves();
        state = state.drop_piece(legal[rng.gen_range(0..legal.len())]);
    }
}

#[test]
fn test_decode_rejects_bad_observations() {
    let obs = Observation::zeros(3, 3, 2);
    assert!(matches!(
        Connect4::decode_board(&obs, Seat::First),
        Err(CodecError::Shape { .. })
    ));

    let mut obs = Observation::zeros(ROWS, COLS, CHANNELS);
    obs.set(2, 2, 0, 1);
    obs.set(2, 2, 1, 1);
    assert!(matches!(
        Connect4::decode_board(&obs, Seat::First),
        Err(CodecError::Ambiguous { row: 2, col: 2, .. })
    ));
}

#[test]
fn test_encode_intent() {
    let state = play(&[0; ROWS]);
    let mask = Connect4::legal_mask(&state);

    assert_eq!(
        Connect4::encode_intent(&MoveIntent::Column { column: 4 }, Seat::First, &mask),
        Encoded::Action(4)
    );
    // Full column
    assert_eq!(
        Connect4::encode_intent(&MoveIntent::Column { column: 0 }, Seat::First, &mask),
        Encoded::NotLegal
    );
    assert_eq!(
        Connect4::encode_intent(&MoveIntent::Column { column: 9 }, Seat::First, &mask),
        Encoded::NotLegal
    );
    assert_eq!(
        Connect4::encode_intent(&MoveIntent::Cell { col: 4, row: 0 }, Seat::First, &mask),
        Encoded::NotLegal
    );
    assert_eq!(Connect4::describe_action(&state, 4), "column 4");
}

#[test]
fn test_metadata() {
    let meta = Connect4::new().metadata();

    assert_eq!(meta.game_type, GameType::ConnectFour);
    assert_eq!(meta.display_name, "Connect Four");
    assert_eq!(meta.board_width, COLS);
    assert_eq!(meta.board_height, ROWS);
    assert_eq!(meta.num_actions, COLS);
    assert_eq!(meta.obs_shape, [ROWS, COLS, CHANNELS]);
    assert_eq!(meta.player_labels, vec!["player_0", "player_1"]);
    assert_eq!(meta.board_type, "drop_column");
}

#[test]
fn test_engine_rejects_illegal_and_terminal_steps() {
    let mut engine = GameAdapter::new(Connect4::new());
    for _ in 0..ROWS {
        engine.step(0).unwrap();
    }
    assert_eq!(engine.step(0), Err(EngineError::IllegalAction { action: 0 }));

    let mut engine = GameAdapter::with_state(Connect4::new(), play(&[0, 0, 1, 1, 2, 2]));
    let last = engine.step(3).unwrap();
    assert!(last.done);
    assert_eq!(last.reward, -1.0);
    assert_eq!(last.snapshot.current_player, Seat::Second);
    assert_eq!(engine.step(4), Err(EngineError::Terminated));
}

#[test]
fn test_random_games_invariants() {
    for seed in 0..20 {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let mut engine = GameAdapter::new(Connect4::new());
        let mut snapshot = engine.reset();
        let mut move_count = 0;

        while !snapshot.done {
            let legal = snapshot.valid_actions();
            assert!(
                !legal.is_empty(),
                "Non-done game must have legal moves (seed={}, moves={})",
                seed,
                move_count
            );

            let prev_player = snapshot.current_player;
            let outcome = engine.step(legal[rng.gen_range(0..legal.len())]).unwrap();
            move_count += 1;

            assert_ne!(
                outcome.snapshot.current_player, prev_player,
                "Player should switch after every move (seed={})",
                seed
            );
            match Connect4::outcome(engine.state()) {
                Some(Outcome::Winner(winner)) => {
                    assert_eq!(winner, prev_player, "Only the mover can win (seed={})", seed);
                    assert_eq!(outcome.reward, -1.0);
                }
                Some(Outcome::Draw) | None => assert_eq!(outcome.reward, 0.0),
            }
            snapshot = outcome.snapshot;
        }

        assert!(move_count <= BOARD_SIZE, "seed={}", seed);
        assert!(snapshot.valid_actions().is_empty());
    }
}
