//! PariVaani: AI voiceovers and video dubbing in Indian languages.
//!
//! The crate is a thin orchestration layer over a backend-as-a-service
//! (auth, blob storage, AI endpoints, document collections):
//!
//! - [`wizard`] collects inputs step by step
//! - [`workflow`] runs the sequential translate / synthesize / persist chains
//! - [`dashboard`] aggregates a user's history
//! - [`gateway`] serves the HTML pages and a JSON API over axum
//! - [`download`] saves finished media with an open-externally and
//!   clipboard fallback

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]

pub mod auth;
pub mod baas;
pub mod catalog;
pub mod config;
pub mod content;
pub mod dashboard;
pub mod download;
pub mod gateway;
pub mod store;
pub mod views;
pub mod wizard;
pub mod workflow;

pub use config::Config;
