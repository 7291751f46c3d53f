pub mod archived;
pub mod create;
pub mod list;
pub mod manager;
pub mod thread;

pub use archived::*;
pub use create::*;
pub use list::*;
pub use manager::*;
pub use thread::*;
