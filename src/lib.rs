extern crate cfg_if;
extern crate clap;
extern crate rand;
extern crate rand_xoshiro;

pub mod cli;
pub mod code;
pub mod driver;
pub mod fault_injection;
pub mod geometry;
pub mod sweep;
pub mod util;

pub use code::Code;
pub use geometry::{Boundary, Family, Geometry};
pub use util::{EdgeIndex, FaceIndex, GeometryError, GeometryResult, VertexIndex};
