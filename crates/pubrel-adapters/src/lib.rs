//! pubrel Adapters - Manifest and publish adapters
//!
//! This crate provides the `pubspec.yaml` rewriter used to switch packages
//! between development and release dependency modes, and the publisher that
//! runs the external publish command in a package directory.

pub mod publish;
pub mod pubspec;

pub use publish::{CommandPublisher, PublishOutput, Publisher};
pub use pubspec::{rewrite, DependencyMode, ManifestLine, PubspecDocument};
