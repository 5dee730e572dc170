//! CLI commands, one struct per `<group> <action>`

pub mod analyses;
pub mod data;
pub mod pipelines;
pub mod registry;
pub mod session;
pub mod templates;

pub use registry::{CommandContext, CommandRegistry, GlobalArgs, Invocation, PluginCommand};
