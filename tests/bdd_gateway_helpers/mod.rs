//! Behavioural step helpers for gateway HTTP scenarios.

mod assertions;
mod engine;
mod state;
mod steps;

pub use state::{GatewayTestState, gateway_state};
