mod backdrop;
mod card;
mod command;
mod feeders;
mod field;
mod navbar;
mod shutdown;
mod styles;
mod tui;
mod view;

pub use card::{CardAction, InputCard};
pub use command::{Command, parse_command};
pub use feeders::spawn_tui_feeders;
pub use navbar::NavBar;
pub use shutdown::ShutdownHandle;
pub use tui::{Flow, TuiApp, TuiMsg, run};
pub use view::{Notice, NoticeKind, PLACEHOLDER, ViewSnap};
