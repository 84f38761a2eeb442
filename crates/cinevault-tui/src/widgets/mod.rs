mod carousel;
mod detail;
mod popup;
mod status_bar;

pub use carousel::{CarouselWidget, InfoPanelWidget};
pub use detail::DetailWidget;
pub use popup::PopupWidget;
pub use status_bar::StatusBarWidget;
