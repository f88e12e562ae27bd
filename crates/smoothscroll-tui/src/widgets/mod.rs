mod status_bar;
mod text_view;

pub use status_bar::StatusBarWidget;
pub use text_view::TextViewWidget;
