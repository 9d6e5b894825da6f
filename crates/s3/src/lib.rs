//! obsync-s3: S3 SDK adapter for obsync
//!
//! Implements `obsync_core::ObjectStore` on top of aws-sdk-s3 for any
//! S3-compatible endpoint.

mod client;

pub use client::S3Client;
