// Chart presentation math: gradients, axes and per-chart state
pub mod axis;
pub mod color;
pub mod crosshair;
pub mod gradient_cache;
pub mod gradients;
pub mod palette;
pub mod style;
pub mod value_render;
pub mod view;
