//! Transit trip planner server.
//!
//! A web application that answers: "Which buses get me from here to
//! there, and when do they reach each stop?"

pub mod cache;
pub mod config;
pub mod directions;
pub mod domain;
pub mod fixtures;
pub mod schedule;
pub mod selection;
pub mod web;
