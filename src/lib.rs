//! Layout and rendering core of the calgrid terminal calendar.

pub mod cell;
pub mod config;
pub mod date;
pub mod geometry;
pub mod journal;
pub mod logging;
pub mod model;
pub mod recurrence;
pub mod render;
pub mod screen;
pub mod storage;
pub mod style;
pub mod terminal;
pub mod text;
