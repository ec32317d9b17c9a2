//! Convenient imports for kvadmin.
//!
//! ```ignore
//! use kvadmin::prelude::*;
//!
//! let admin = KvAdmin::in_memory()?;
//! admin.populate(10);
//! ```

// Main entry point
pub use crate::admin::{KvAdmin, KvAdminBuilder};

// Configuration
pub use crate::config::AdminConfig;

// Error handling
pub use crate::error::{Error, Result};

// Reports
pub use kvadmin_core::{Operation, OperationReport, Status};

// Arguments
pub use kvadmin_core::{Filter, Pattern};
pub use kvadmin_executor::Command;
