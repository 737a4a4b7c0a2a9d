pub mod emergency;
pub mod history;
pub mod homecare;
pub mod identity;
pub mod log_entry;
pub mod module;
pub mod patient;

pub use emergency::EmergencyEvent;
pub use history::HistoryEntry;
pub use homecare::HomecareRequest;
pub use identity::{Identity, Role};
pub use log_entry::LogEntry;
pub use module::Module;
pub use patient::Patient;
