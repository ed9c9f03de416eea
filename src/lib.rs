#![warn(
    clippy::pedantic,
    future_incompatible,
    missing_debug_implementations,
    missing_docs,
    rust_2018_idioms,
    rust_2021_compatibility
)]
#![cfg_attr(docsrs, feature(doc_auto_cfg, doc_cfg))]
#![deny(rustdoc::broken_intra_doc_links)]

//! Welcome to `javacraft`, a library that, given a loaded bytecode image and
//! a target class, searches for a cheap way to construct an instance of
//! that class and emits the Java source that does it.
//!
//! The pipeline is three stages, each its own module:
//!
//! 1. [`miner`] turns a [`view::View`] into candidate [`model::Dependency`]
//!    choices for any [`model::Node`].
//! 2. [`solver`] runs a budget-bounded randomized search over those choices
//!    and returns the cheapest valid [`model::Plan`] it finds.
//! 3. [`emit`] walks a plan and prints the `org.example.Main` Java source
//!    that realizes it.
//!
//! [`compile_check`] is an optional, separate end-to-end validator: it
//! shells out to `javac` to confirm an emitted program actually compiles.
//! ## Features
#![doc = document_features::document_features!()]

pub mod compile_check;
pub mod emit;
pub mod miner;
pub mod model;
pub mod solver;
pub mod types;
pub mod view;
