//! CAR (Content Addressable aRchive) file reading
//!
//! CAR files are the usual way to ship a self-contained slice of a merkle
//! graph around; the explorer uses them as a block source.
//!
//! # Example
//!
//! ```ignore
//! use ipld_explorer::car::read_car;
//!
//! let parsed = read_car("graph.car").await?;
//! println!("{} blocks under {:?}", parsed.blocks.len(), parsed.roots);
//! ```

pub mod reader;

pub use reader::{ParsedCar, parse_car_bytes, read_car};
