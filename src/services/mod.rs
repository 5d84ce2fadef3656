pub mod classification;
pub mod notification;
pub mod presenter;
pub mod selection;

pub use classification::{Severity, Tier};
pub use notification::{Notification, NotificationChannel, NotificationKind};
pub use presenter::{FunctionRow, ResultView, SummaryCard};
pub use selection::{InputSource, SelectionManager};
