pub mod renderer;

pub use renderer::{Playback, Renderer};
