//! SimRail train delay server.
//!
//! Answers "where is this train, and how late is it?" for trains running
//! on a SimRail multiplayer server, from the live roster, the station
//! directory and the planned timetable.

pub mod domain;
pub mod simrail;
pub mod stations;
pub mod tracking;
pub mod web;
