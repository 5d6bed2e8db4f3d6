//! Gatewatch terminal view: text rendering of the derived dashboard and stdin commands.

pub mod commands;
pub mod screens;
