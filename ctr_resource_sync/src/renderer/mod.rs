/// Renderer module - collaborator traits for the render-binding tier

pub mod renderer;

#[cfg(test)]
pub mod mock_renderer;

pub use renderer::*;
