pub mod preview;
pub mod template;
pub mod update;
pub mod upload;

pub use preview::handle_preview_command;
pub use template::handle_template_command;
pub use update::handle_update_command;
pub use upload::handle_upload_command;
