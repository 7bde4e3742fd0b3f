pub mod init;
pub mod inspect;
pub mod layouts;
pub mod migrate;
pub mod new;

pub use init::{init, InitArgs};
pub use inspect::{inspect, InspectArgs};
pub use layouts::layouts;
pub use migrate::{migrate, MigrateArgs};
pub use new::{new_page, NewArgs};
