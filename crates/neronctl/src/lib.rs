//! Neron Control - terminal front end for the NeronExpert avatar

pub mod cli;
pub mod commands;
pub mod logging;
pub mod repl;
pub mod surface;
