//! Object storage access and dataset provisioning

pub mod provisioner;
pub mod s3;

pub use provisioner::provision;
pub use s3::S3Store;

use anyhow::Result;

/// Outcome of an existence probe against the remote store.
///
/// Probe failures (connectivity, permissions) travel through `Err`, so the
/// three-way distinction between present, absent and error is explicit
/// rather than inferred from a provider error string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Existence {
    Present,
    Absent,
}

/// Capability interface over an S3-compatible blob store.
///
/// The provisioner only ever needs these five operations; keeping them
/// behind a trait lets the provisioning logic run against a deterministic
/// in-memory store in tests.
pub trait ObjectStore {
    /// Cheap authenticated round-trip to verify the endpoint is reachable
    fn probe(&self) -> impl std::future::Future<Output = Result<()>>;

    /// Existence probe for a bucket (HEAD, not a listing)
    fn bucket_exists(&self, bucket: &str) -> impl std::future::Future<Output = Result<Existence>>;

    /// Create a bucket
    fn create_bucket(&self, bucket: &str) -> impl std::future::Future<Output = Result<()>>;

    /// Existence probe for an object
    fn object_exists(
        &self,
        bucket: &str,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Existence>>;

    /// Upload raw bytes under the given key
    fn put_object(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
    ) -> impl std::future::Future<Output = Result<()>>;
}
