//! vgrid
//!
//! A responsive, virtualized grid layout engine, and a terminal record
//! browser built on it.
//!
//! The engine ([`grid`]) maps a flat list of items into rows of a responsive
//! column count and mounts only the rows near the viewport. It talks to its
//! environment through the collaborator traits in [`host`], so it runs the
//! same under a terminal event loop or a deterministic test driver.
//!
//! Pure Core / Impure Shell: `grid`, `model`, `parser` and `state` are pure;
//! `source`, `view` and `logging` do I/O.

pub mod config;
pub mod grid;
pub mod host;
pub mod logging;
pub mod model;
pub mod parser;
pub mod source;
pub mod state;
pub mod view;
