//! Portuguese rail departures lookup.
//!
//! A local web application that answers: "what leaves this station, on this
//! day, on these kinds of train?" Departures come from a public JSON proxy of
//! Infraestruturas de Portugal data; each row's status is derived from the
//! free-text observations the upstream attaches to it.

pub mod cache;
pub mod config;
pub mod domain;
pub mod fetch;
pub mod ip;
pub mod prefs;
pub mod selection;
pub mod session;
pub mod web;
