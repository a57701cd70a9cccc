//! Stage bodies, one `impl Workflow` block per concern.

mod application;
mod cleanup;
mod login;
mod packages;
mod preflight;
mod service;
