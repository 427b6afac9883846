//! recover-json library for rebuilding a lost `package.json`.
//!
//! The workflow has three phases:
//!
//! 1. **Scanning**: Collect JavaScript/TypeScript files and extract the module
//!    paths named by `import` and `require` statements
//! 2. **Classification**: Drop built-ins, relative paths and malformed names,
//!    and reduce the rest to their package names
//! 3. **Generation**: Write a manifest declaring every package as a dependency
//!
//! # Example
//!
//! ```no_run
//! use recover_json::{collector, manifest};
//! use std::path::Path;
//!
//! let report = collector::collect_modules(Path::new("./src"), &Default::default()).unwrap();
//! println!("Found {} packages", report.modules.len());
//!
//! let pkg = manifest::Manifest::new(
//!     manifest::DEFAULT_NAME,
//!     manifest::DEFAULT_VERSION,
//!     &report.modules,
//!     None,
//! );
//! pkg.write(Path::new(manifest::DEFAULT_OUTPUT)).unwrap();
//! ```

pub mod classifier;
pub mod collector;
pub mod manifest;
pub mod scanner;

// Re-export commonly used types at crate root
pub use classifier::Policy;
pub use collector::{Diagnostics, ScanOptions, ScanReport};
pub use manifest::{Manifest, ProjectType};
pub use scanner::SkippedFile;
