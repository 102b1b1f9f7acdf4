//! Device-client seam for Luxtronik heat pump controllers.
//!
//! A Luxtronik controller exposes three flat tables (parameters,
//! calculations, visibilities). This crate defines the value model for
//! those tables, the [`DeviceClient`] trait every transport implements,
//! and [`MemoryDevice`], an in-memory client backed by a snapshot.

pub mod client;
pub mod error;
pub mod model;

pub use client::{DeviceClient, MemoryDevice};
pub use error::Error;
pub use model::{Field, Group, Snapshot, Table, Value};
