#![forbid(unsafe_code)]

//! `wfall` command-line front end.
//!
//! Reads one JSON document (canonical items or an adapter's record), runs it
//! through the matching adapter, the reducer and the render contract, and
//! prints draw instructions as JSON or plain-text bars.

pub mod cli;
pub mod run;
