pub mod archive;
pub mod download;
pub mod platform;
pub mod release;
pub mod resolve;
pub mod select;
pub mod source;
pub mod stage;

// Re-export for convenience
pub use archive::{ArchiveFormat, ArchiveReader, open_archive};
pub use platform::{Arch, Os, Platform};
pub use release::{Asset, Release, ReleaseRef};
pub use resolve::resolve_release;
pub use select::select_asset;
pub use source::{ProgressFn, ReleaseQuery, ReleaseSource};
pub use stage::{AcquireOptions, StagedExecutable, Stager, acquire, add_to_path};
