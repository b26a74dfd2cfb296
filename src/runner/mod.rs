pub mod core;
pub mod dispatch;
pub mod error;
pub mod suite;

pub use self::core::ClassRunner;
pub use dispatch::ClassExecution;
pub use error::FatalError;
pub use suite::Runner;
