pub mod circuit;
pub mod errors;
pub mod gap;
pub mod handle_sim;
pub mod opponent;
pub mod pace;
pub mod pace_model;
pub mod stint;
pub mod tire;
