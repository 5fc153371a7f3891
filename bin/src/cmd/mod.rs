//! CLI subcommand modules.
//!
//! This module contains the implementations for all margin CLI subcommands.

pub(crate) mod criteria;
pub(crate) mod markets;
pub(crate) mod screen;
