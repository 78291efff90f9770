//! # toyvm - A Toy Stack Machine on a Mark-Sweep Heap
//!
//! The machine holds integers and pairs on a value stack. The stack doubles
//! as the root set of a [`toygc::Heap`], so anything the program can no
//! longer reach from it is reclaimed by the next collection.
//!
//! ```rust
//! use toyvm::{Program, Vm};
//!
//! let mut vm = Vm::with_threshold(8)?;
//! vm.run(&Program::parse("push 1; push 2; pair; gc")?)?;
//!
//! assert_eq!(vm.render(vm.stack()[0])?, "(2 . 1)");
//! assert_eq!(vm.heap().live_object_count(), 3);
//! # Ok::<(), toyvm::VmError>(())
//! ```
//!
//! ## Modules
//!
//! - [`op`]: Instructions and the program text format
//! - [`vm`]: The machine
//! - [`printer`]: Dotted-pair rendering of heap values
//! - [`scenario`]: Demonstration programs with known outcomes
//! - [`error`]: Error types

pub mod error;
pub mod op;
pub mod printer;
pub mod scenario;
pub mod vm;

pub use error::{Result, VmError};
pub use op::{Op, Program};
pub use printer::Printer;
pub use scenario::{run_scenario, Scenario, ScenarioReport};
pub use vm::Vm;

/// toyvm version string from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
