//! Crate root module declarations for the relay chess rules engine.
//!
//! Exposes the data model, legal move generation, the turn codec, the
//! turn-by-turn state machine and the negotiation/history layer so that the
//! UI and transport layers (which live outside this crate) can import stable
//! module paths.

pub mod errors;

pub mod game_state {
    pub mod board;
    pub mod chess_rules;
    pub mod chess_types;
    pub mod game_state;
}

pub mod moves {
    pub mod attacks;
    pub mod move_descriptions;
    pub mod piece_rules;
}

pub mod move_generation {
    pub mod legal_move_apply;
    pub mod legal_move_checks;
    pub mod legal_move_generator;
    pub mod legal_moves_king;
    pub mod legal_moves_knight;
    pub mod legal_moves_pawn;
    pub mod legal_moves_sliding;
    pub mod move_generator;
    pub mod perft;
}

pub mod protocol {
    pub mod action_classifier;
    pub mod game_status;
    pub mod history;
    pub mod session_message;
}

pub mod utils {
    pub mod algebraic;
    pub mod render_game_state;
    pub mod turn_diff;
    pub mod turn_generator;
    pub mod turn_parser;
}
