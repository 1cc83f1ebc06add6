//! Core library for the Launchpad dev-environment bootstrapper.
//!
//! The CLI crate wires these pieces into the `up` flow: load config and env,
//! ensure the toolchain, gate the frontend rebuild on the repository HEAD,
//! reinstall backend dependencies, reclaim the service ports, and supervise
//! the launched services.

pub mod config;
pub mod ports;
pub mod prepare;
pub mod revision;
pub mod runner;
pub mod supervisor;
pub mod toolchain;
