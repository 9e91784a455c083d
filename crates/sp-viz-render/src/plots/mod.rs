pub mod histogram;

mod axes_draw;

pub use axes_draw::PanelRole;
