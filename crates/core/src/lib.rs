//! Core entities, calendar math, and classification rules for the sales
//! warehouse reports.

pub mod calendar;
pub mod error;
pub mod kpi;
pub mod number;
pub mod schema;
pub mod segments;

pub use error::{Error, Result};
pub use schema::*;
pub use segments::*;
