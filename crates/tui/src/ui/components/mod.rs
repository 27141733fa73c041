pub mod component;
pub mod cross_menu;
pub mod hint_bar;
pub mod reader;

pub(crate) use component::Component;
pub use cross_menu::CrossMenuComponent;
pub use hint_bar::HintBarComponent;
pub use reader::ReaderComponent;
