pub mod components;
pub mod gesture;
pub mod layout;
pub mod main_view;
pub mod motion;
pub mod pulse;
pub mod runtime;
pub mod theme;
pub mod utils;
