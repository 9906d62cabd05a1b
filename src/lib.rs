//! apk-publisher - Binary package publication stage
//!
//! This crate implements the final stage of a build pipeline: taking the
//! installed output of a completed build (a destination directory) and
//! publishing it as an immutable, versioned, signed binary package inside a
//! shared repository.

pub mod backend;
pub mod debuginfo;
pub mod lock;
pub mod metadata;
pub mod mock;
pub mod package;
pub mod publish;
pub mod repo;

pub use backend::{ArchiveBackend, ArchiveRequest, BackendError};
pub use metadata::{assemble, MetadataError, MetadataRecord};
pub use package::{BuiltPackage, PackageIdentity, Provisions, SourceRevision};
pub use publish::{ArtifactOutcome, PublishError, PublishReport, Publisher};
