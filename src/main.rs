//! Optical Capture CLI
//!
//! Captures one frame, writes it to disk and prints the keyed digest that
//! binds it to a fresh nonce and timestamp. Also verifies stored digests
//! and generates keys.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use optical_capture::{
    config::FileConfig,
    digest::DigestError,
    keys::{generate_key, load_key, DEFAULT_KEY_LEN},
    proof::{
        capture_proof, verify_capture, CameraSource, CaptureMetadata, CaptureProof, Nonce,
        ProofError,
    },
};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "optical-capture", version, about)]
struct Cli {
    /// TOML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Capture one frame and print its combined digest (default).
    Capture(CaptureArgs),
    /// Check a combined digest against a stored image, nonce and timestamp.
    Verify(VerifyArgs),
    /// Print a fresh base64 key suitable for the key environment variable.
    Keygen {
        /// Key length in bytes.
        #[arg(long, default_value_t = DEFAULT_KEY_LEN)]
        length: usize,
    },
}

#[derive(Args, Default)]
struct CaptureArgs {
    /// Where to write the captured PNG.
    #[arg(long)]
    output: Option<PathBuf>,
    /// Environment variable holding the base64 key.
    #[arg(long)]
    key_env: Option<String>,
    /// Camera device index.
    #[arg(long)]
    device: Option<u32>,
    /// Use synthetic frames instead of a camera device. Required when built
    /// without the `camera` feature.
    #[arg(long)]
    mock: bool,
}

#[derive(Args)]
struct VerifyArgs {
    /// Combined digest (hex) printed by `capture`.
    #[arg(long)]
    expected: String,
    /// Captured PNG.
    #[arg(long)]
    image: PathBuf,
    /// Nonce (hex) printed by `capture`.
    #[arg(long)]
    nonce: String,
    /// Unix timestamp printed by `capture`.
    #[arg(long, allow_hyphen_values = true)]
    timestamp: i64,
    /// Environment variable holding the base64 key.
    #[arg(long)]
    key_env: Option<String>,
}

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match FileConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load config {}: {}", path.display(), e);
                return ExitCode::from(2);
            }
        },
        None => FileConfig::default(),
    };

    let result = match cli.command.unwrap_or_else(|| Command::Capture(CaptureArgs::default())) {
        Command::Capture(args) => run_capture(config, args).map(|()| 0),
        Command::Verify(args) => {
            let outcome = run_verify(&config, args);
            report_verify(&outcome);
            let code = verify_exit_status(&outcome);
            outcome.map(|_| code)
        }
        Command::Keygen { length } => run_keygen(length).map(|()| 0),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(2)
        }
    }
}

fn run_capture(mut config: FileConfig, args: CaptureArgs) -> Result<(), ProofError> {
    if let Some(device) = args.device {
        config.capture.device_id = device;
    }
    if let Some(output) = args.output {
        config.output.image_path = output;
    }
    if let Some(key_env) = args.key_env {
        config.key.env_var = key_env;
    }
    config.validate()?;

    info!("Optical Capture v{}", optical_capture::VERSION);

    let source = if args.mock {
        CameraSource::Mock
    } else {
        CameraSource::Device
    };
    let settings = config.proof_settings();
    let key_env = settings.key_env.clone();
    let proof = capture_proof(source, config.capture, settings)?;

    if proof.key_origin.is_ephemeral() {
        warn!("The ephemeral key below is shown once; anyone who can read this output can recompute the digest");
    }
    write_report(
        &mut io::stdout().lock(),
        &proof,
        config.output.preview_chars,
        &key_env,
    )
    .map_err(|source| ProofError::Output {
        path: PathBuf::from("<stdout>"),
        source,
    })
}

/// Human-readable capture report. The key is printed only when it was
/// generated for this run, since nothing else records it.
fn write_report<W: Write>(
    out: &mut W,
    proof: &CaptureProof,
    preview_chars: usize,
    key_env: &str,
) -> io::Result<()> {
    writeln!(out, "Image written to: {}", proof.image_path.display())?;
    writeln!(
        out,
        "Base64 preview: {}... ({} chars)",
        proof.base64_preview(preview_chars),
        proof.image_base64.len()
    )?;
    writeln!(out, "Nonce: {}", proof.metadata.nonce().to_hex())?;
    writeln!(out, "Timestamp: {}", proof.metadata.timestamp())?;
    writeln!(out, "Image digest: {}", proof.digests.image)?;
    writeln!(out, "Metadata digest: {}", proof.digests.metadata)?;
    writeln!(out, "Combined digest: {}", proof.combined())?;

    if proof.key_origin.is_ephemeral() {
        writeln!(out, "Ephemeral key (base64): {}", proof.key.to_base64())?;
        writeln!(out, "Set {}=<key> to reuse it on later runs.", key_env)?;
    }
    Ok(())
}

fn run_verify(config: &FileConfig, args: VerifyArgs) -> Result<bool, ProofError> {
    let key_env = args.key_env.unwrap_or_else(|| config.key.env_var.clone());
    let key = load_key(&key_env)?;

    let image = std::fs::read(&args.image).map_err(DigestError::from)?;
    let metadata = CaptureMetadata::new(Nonce::from_hex(&args.nonce)?, args.timestamp);

    Ok(verify_capture(
        args.expected.trim(),
        &image,
        &metadata,
        key.as_ref(),
        config.output.digest_size,
    )?)
}

fn report_verify(outcome: &Result<bool, ProofError>) {
    match outcome {
        Ok(true) => println!("OK: combined digest matches"),
        Ok(false) => println!("MISMATCH: combined digest does not match the supplied capture"),
        Err(_) => {}
    }
}

/// Process status for `verify`: 0 match, 1 mismatch, 2 error.
fn verify_exit_status(outcome: &Result<bool, ProofError>) -> u8 {
    match outcome {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(_) => 2,
    }
}

fn run_keygen(length: usize) -> Result<(), ProofError> {
    let key = generate_key(length)?;
    println!("{}", key.to_base64());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use optical_capture::keys::{KeyError, SecretKey};
    use optical_capture::proof::{combine_capture, KeyOrigin};

    fn proof_with(key_origin: KeyOrigin) -> CaptureProof {
        let key = SecretKey::from_bytes(vec![7u8; 32]).unwrap();
        let metadata = CaptureMetadata::new(Nonce::from_bytes([3u8; 16]), 1_700_000_000);
        let image = b"\x89PNG\r\n\x1a\nreport".to_vec();
        let digests = combine_capture(&image, &metadata, &key, 32).unwrap();
        CaptureProof {
            digests,
            metadata,
            key,
            key_origin,
            image_path: PathBuf::from("output/captured_image.png"),
            image_base64: "iVBORw0KGgo=".to_string(),
        }
    }

    fn report(proof: &CaptureProof) -> String {
        let mut out = Vec::new();
        write_report(&mut out, proof, 4, "OPTICAL_CAPTURE_KEY").unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_verify_exit_status() {
        assert_eq!(verify_exit_status(&Ok(true)), 0);
        assert_eq!(verify_exit_status(&Ok(false)), 1);

        let malformed = Err(DigestError::MalformedInput("odd length".into()).into());
        assert_eq!(verify_exit_status(&malformed), 2);
        let bad_key = Err(ProofError::Key(KeyError::InvalidLength(0)));
        assert_eq!(verify_exit_status(&bad_key), 2);
    }

    #[test]
    fn test_report_prints_key_only_when_ephemeral() {
        let ephemeral = proof_with(KeyOrigin::Ephemeral);
        let text = report(&ephemeral);
        assert!(text.contains(&format!(
            "Ephemeral key (base64): {}",
            ephemeral.key.to_base64()
        )));
        assert!(text.contains("Set OPTICAL_CAPTURE_KEY=<key>"));

        for origin in [KeyOrigin::Provided, KeyOrigin::Environment] {
            let proof = proof_with(origin);
            let text = report(&proof);
            assert!(!text.contains("Ephemeral key"));
            assert!(!text.contains(&proof.key.to_base64()));
        }
    }

    #[test]
    fn test_report_lists_digests() {
        let proof = proof_with(KeyOrigin::Environment);
        let text = report(&proof);
        assert!(text.contains("Base64 preview: iVBO... (12 chars)"));
        assert!(text.contains(&format!("Combined digest: {}", proof.combined())));
        assert!(text.contains("Timestamp: 1700000000"));
    }
}
