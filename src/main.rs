use fpvote::config::Config;
use fpvote::console::Console;
use fpvote::crypto::FingerprintHasher;
use fpvote::{ElectionSession, Result};

fn main() -> Result<()> {
    let config = Config::from_env()?;
    fpvote::init_logging(&config.logging)?;

    let hasher = FingerprintHasher::from_config(&config.hashing)?;
    tracing::info!("Fingerprints hashed with {}", hasher.name());

    let mut session = ElectionSession::new(hasher);
    let stdin = std::io::stdin();
    let mut console = Console::new(stdin.lock(), std::io::stdout(), &config.console);

    console.run(&mut session)
}
