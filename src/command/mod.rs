//! Command declarations: options, positional slots, values and the command tree

pub mod argument;
pub mod help;
pub mod node;
pub mod option;
pub mod value;

pub use argument::*;
pub use node::*;
pub use option::*;
pub use value::*;
