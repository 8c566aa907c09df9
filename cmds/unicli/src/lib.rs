pub mod cli;
pub mod commands;
pub mod completion;
pub mod k8s;
pub mod output;
pub mod scope;
pub mod session;
pub mod telemetry;
