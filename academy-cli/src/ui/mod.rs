mod confirm;
mod delete_progress;
mod footer;
mod header;
mod help;
mod layout;
mod message;
mod modal;
mod table_view;
mod theme;

pub use confirm::ConfirmDeleteView;
pub use delete_progress::DeleteProgressView;
pub use footer::Footer;
pub use header::Header;
pub use help::HelpView;
pub use layout::AppLayout;
pub use message::MessageView;
pub use modal::{ModalView, modal_visible_rows};
pub use table_view::TableView;
pub use theme::Theme;
