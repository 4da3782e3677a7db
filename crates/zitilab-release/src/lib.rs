//! Release resolution and artifact staging for zitilab.
//!
//! This crate finds the release of an external product (by default
//! `openziti/ziti`) that matches the running platform, downloads its archive
//! once, and stages the product executable at a deterministic, version-scoped
//! path.
//!
//! # Acquisition Flow
//!
//! ```text
//! acquire()
//!     ↓
//! 1. Detect platform ({os}-{arch})
//!     ↓
//! 2. Resolve release (latest, or the explicit tag)
//!     → pick first asset named {product}-{os}-{arch}-*
//!     ↓
//! 3. {home}/{product}-bin/{product}-{tag}/{exe} exists?
//!     → yes: return it, no download
//!     ↓ (no)
//! 4. Download archive to a temporary file
//!     ↓
//! 5. Extract (tar or zip) into a scratch directory, chmod +x,
//!    then move the executable into place last
//!     ↓
//! 6. Remove the temporary file, return the path
//! ```
//!
//! # Examples
//!
//! ```no_run
//! use zitilab_core::ReleaseConfig;
//! use zitilab_release::{AcquireOptions, acquire};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ReleaseConfig::from_env()?;
//! let staged = acquire(&config, None, &AcquireOptions::default())?;
//! println!("ziti {} at {}", staged.version, staged.path.display());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod github;
pub mod install;

pub use error::ReleaseError;
pub use install::{
    AcquireOptions, ArchiveFormat, ArchiveReader, Platform, ReleaseQuery, ReleaseRef,
    ReleaseSource, StagedExecutable, Stager, acquire, add_to_path,
};

pub type Result<T> = std::result::Result<T, ReleaseError>;
