pub mod blend;
pub mod color;
pub mod config;
pub mod controller;
pub mod eraser;
pub mod history;
pub mod id;
pub mod image;
pub mod io;
pub mod path;
pub mod render;
pub mod smoothing;
pub mod stroke;
pub mod util;

pub use id::SketchID;
