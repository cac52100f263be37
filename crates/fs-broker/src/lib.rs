pub mod broker;
pub mod config;
pub mod error;
pub mod fetch;
pub mod fs;
pub mod path;
pub mod protocol;
pub mod root;

pub use broker::Broker;
pub use config::{BrokerConfig, ConfigStore};
pub use error::{BrokerError, Result};
pub use fs::{DirEntryInfo, FileMeta, Filesystem, LocalFs};
pub use protocol::{Command, Entry, FileContent, Response};
pub use root::RootHandle;
