//! Seqseal walkthrough binary.
//!
//! Runs the host call-site flow end to end: one identity, a keypair per
//! party, a message sealed at sequence 0 and opened again. Optionally sends
//! a batch through the session layer, delivered in reverse with a replay.
//!
//! # Usage
//!
//! ```bash
//! seqseal-demo --message "hello world :)"
//! seqseal-demo --messages 5 --log-level debug
//! ```

use clap::Parser;
use seqseal_crypto::{Engine, EngineConfig, decrypt_dh, encrypt_dh_at};
use seqseal_session::{Inbox, Outbox, SessionError};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Seqseal engine walkthrough
#[derive(Parser, Debug)]
#[command(name = "seqseal-demo")]
#[command(about = "Seal and open messages with the seqseal engine")]
#[command(version)]
struct Args {
    /// Text to encrypt
    #[arg(short, long, default_value = "hello world :)")]
    message: String,

    /// Sequence to seal the first message at
    #[arg(short, long, default_value = "0")]
    sequence: u64,

    /// Extra messages to send through an outbox/inbox pair
    #[arg(long, default_value = "0")]
    messages: u32,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    let engine = Engine::init(EngineConfig::default())?;

    let identity = engine.generate_fingerprint()?;
    let sender = engine.generate_dh_keys()?;
    let receiver = engine.generate_dh_keys()?;
    tracing::info!("verifier: {}", hex::encode(identity.verifier.as_bytes()));

    let envelope = encrypt_dh_at(
        args.sequence,
        identity.fingerprint.as_bytes(),
        args.message.as_bytes(),
        sender.private.as_bytes(),
        receiver.public.as_bytes(),
    )?;
    tracing::info!("encrypted: {}", hex::encode(&envelope));

    let decrypted = decrypt_dh(
        args.sequence,
        &envelope,
        identity.verifier.as_bytes(),
        sender.public.as_bytes(),
        receiver.private.as_bytes(),
    )?;
    tracing::info!("decrypted: {}", String::from_utf8_lossy(&decrypted));

    match decrypt_dh(
        args.sequence.wrapping_add(1),
        &envelope,
        identity.verifier.as_bytes(),
        sender.public.as_bytes(),
        receiver.private.as_bytes(),
    ) {
        Ok(_) => tracing::error!("envelope opened at the wrong sequence"),
        Err(err) => tracing::info!("wrong sequence rejected: {}", err),
    }

    if args.messages > 0 {
        run_session(&engine, &args.message, args.messages)?;
    }

    Ok(())
}

/// Send `count` messages through the session layer and deliver them newest
/// first, followed by a replay of the oldest.
fn run_session(engine: &Engine, text: &str, count: u32) -> Result<(), SessionError> {
    let identity = engine.generate_fingerprint()?;
    let sender = engine.generate_dh_keys()?;
    let receiver = engine.generate_dh_keys()?;

    let mut outbox = Outbox::new(identity.fingerprint, sender.private, receiver.public);
    let mut inbox = Inbox::new(identity.verifier, sender.public, receiver.private);

    let mut sealed = Vec::with_capacity(count as usize);
    for i in 0..count {
        sealed.push(outbox.seal(format!("{text} #{i}").as_bytes())?);
    }

    for message in sealed.iter().rev() {
        let plaintext = inbox.open(&message.envelope)?;
        tracing::info!(
            sequence = message.sequence,
            "session received: {}",
            String::from_utf8_lossy(&plaintext)
        );
    }

    if let Some(first) = sealed.first() {
        match inbox.open(&first.envelope) {
            Err(err) if err.is_duplicate() => tracing::info!("replay rejected: {}", err),
            Err(err) => return Err(err),
            Ok(_) => tracing::error!("replayed envelope was accepted"),
        }
    }

    Ok(())
}
