//! AWS CLI wrapper for relflow
//!
//! Only the calls needed before an upload are wrapped here: the CLI
//! presence check and the caller identity lookup. The upload itself runs
//! inside the built image, not through this crate.
//!
//! # Requirements
//!
//! - `aws` CLI v2 must be installed
//! - Credentials are resolved by the CLI from the selected profile
//!
//! # Example
//!
//! ```ignore
//! use relflow_cloud_aws::AwsCli;
//! use relflow_core::SystemRunner;
//!
//! let aws = AwsCli::new(&SystemRunner);
//! aws.version()?;
//! let identity = aws.caller_identity("deploy-user")?;
//! println!("{}", identity.describe());
//! ```

pub mod aws;
pub mod error;

pub use aws::{AwsCli, CallerIdentity};
pub use error::{AwsError, Result};
