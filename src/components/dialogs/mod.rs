//! Modal workflow dialogs.
//!
//! - [`DeployDialog`] - manual and smart contract deployment
//! - [`ImportDialog`] - local project import

mod deploy;
mod import;
mod progress;

pub use deploy::DeployDialog;
pub use import::ImportDialog;

stylance::import_crate_style!(css, "src/components/dialogs/dialog.module.css");
