//! Process lifecycle: shutdown signals and the connectivity probe

mod probe;
mod shutdown;

pub use probe::ConnectivityProbe;
pub use shutdown::ShutdownSignal;
