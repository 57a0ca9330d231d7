pub mod log_list;
pub mod message_banner;
pub mod status_panel;

pub use log_list::LogList;
pub use message_banner::view_message;
pub use status_panel::view_status;
