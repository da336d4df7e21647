//! # Scaffold
//!
//! Generates the header/source pair of a new msctl subsystem and registers it
//! in the aggregation file.
//!
//! For a subsystem named `foo` the scaffold:
//! 1. validates `foo` as a C++ identifier ([`SubsystemName::parse`]),
//! 2. checks that `subsys-foo.h` and `subsys-foo.cpp` do not exist and that
//!    `subsys.inc` does,
//! 3. renders both templates by substituting the `%ss-name%` placeholder,
//! 4. writes both files and appends `#include "subsys-foo.h"` to `subsys.inc`.
//!
//! Steps 1 and 2 complete before anything is written.
//!
//! ## Example
//!
//! ```rust,no_run
//! use ssgen_scaffold::{ScaffoldConfig, scaffold};
//! use std::path::Path;
//!
//! let outcome = scaffold(Path::new("agent"), "watchdog", &ScaffoldConfig::default())?;
//! println!("created {}", outcome.header.display());
//! # Ok::<(), ssgen_scaffold::ScaffoldError>(())
//! ```

pub mod config;
pub mod emitter;
mod error;
pub mod name;
pub mod plan;
pub mod registry;
pub mod template;

pub use crate::config::{ScaffoldConfig, load_config, load_config_with_env};
pub use crate::error::{ScaffoldError, ScaffoldErrorExt};
pub use crate::name::{Namespace, SubsystemName};
pub use crate::plan::{PlannedFile, ScaffoldOutcome, ScaffoldPlan, scaffold};
pub use crate::registry::{Registry, RegistryEntry};
pub use crate::template::{FactoryStyle, RenderedSubsystem, render};
