pub mod builtin;
pub mod calc;
pub mod registry;
pub mod schema;

pub use registry::ToolRegistry;
