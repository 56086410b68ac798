mod classify;
mod render;

pub use classify::{classify, Style};
pub use render::Renderer;
