pub mod chain;
pub mod fixer;
pub mod local;
pub mod synthetic;

// Re-export the chain and adapters for the wiring in lib.rs
pub use chain::ProviderChain;
pub use fixer::FixerProvider;
pub use local::LocalProvider;
pub use synthetic::SyntheticProvider;
