pub mod codec;
mod interface;
mod dump_dir;
mod flat_file;
mod history;

pub use interface::{WalletStore, Result, BackendError};
pub use dump_dir::DumpDir;
pub use flat_file::FlatFile;
pub use history::history_to_files;
