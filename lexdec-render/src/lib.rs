pub mod error;
pub mod layout;
pub mod render;

pub use error::RenderError;
pub use layout::{Bounds, Layout};
pub use render::{DEFAULT_FONT_PATH, FrameStats, SkiaRenderer, View, load_font, render_text_pixmap};

pub use ab_glyph::FontVec;
