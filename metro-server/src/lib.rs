//! Metro network route finder.
//!
//! Models a metro system as lines calling at stations and answers "how do I
//! get from here to there?" by searching the graph of connecting lines.
//! Exposed over HTTP by the `metro-server` binary.

pub mod config;
pub mod domain;
pub mod ingest;
pub mod network;
pub mod web;
