pub mod board;
pub mod events;
pub mod poller;
pub mod state;
pub mod view;

pub use board::Board;
pub use events::{BoardEvent, MergeKind};
pub use poller::Poller;
pub use state::{BoardState, MergeMode};
