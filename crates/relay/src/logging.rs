use tracing::Level;
use tracing::subscriber::SetGlobalDefaultError;
use tracing_subscriber::FmtSubscriber;

/// Installs the process-wide subscriber writing formatted events up to `level`.
///
/// Fails if a global subscriber has already been set.
pub fn init(level: Level) -> Result<(), SetGlobalDefaultError> {
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)
}
