pub mod html;
pub mod style;

pub use html::{render_map, write_map};
pub use style::{MarkerStyle, marker_style};
