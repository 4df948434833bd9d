pub mod calculators;
pub mod commands;
pub mod conditions;
pub mod engine;
pub mod observation;
pub mod rng;
pub mod runner;
pub mod state;
pub mod stats;
pub mod status;
pub mod turn_orchestrator;
pub mod validation;

#[cfg(test)]
pub(crate) mod tests;
