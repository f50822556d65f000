//! DualPass CLI - encrypt data for two passwords, decrypt with either.
//!
//! Reads from stdin and writes to stdout unless `-i`/`-o` are given, so it
//! composes with pipes. Logs and status lines go to stderr.

mod io;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

use dualpass_cipher::{CipherConfig, DualPasswordCipher};
use dualpass_common::Password;
use dualpass_crypto::KdfParams;

#[derive(Parser)]
#[command(name = "dualpass")]
#[command(about = "Encrypt or decrypt data. Data encrypted with two passwords can be decrypted by either one.")]
#[command(version)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(flatten)]
    tuning: Tuning,

    #[command(subcommand)]
    command: Commands,
}

/// Cipher parameters. Both sides must use the same iteration count.
#[derive(Args)]
struct Tuning {
    /// JSON file with cipher configuration.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// PBKDF2 iteration count (default: 100000).
    #[arg(long, global = true)]
    iterations: Option<u32>,

    /// zlib compression level, 0-9 (default: 6).
    #[arg(long, global = true)]
    compression_level: Option<u32>,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt data with two passwords.
    Encrypt {
        /// The first password. Prompted for when omitted.
        #[arg(long)]
        password_a: Option<String>,

        /// The second password. Prompted for when omitted.
        #[arg(long)]
        password_b: Option<String>,

        /// Input file to encrypt (default: stdin).
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file for the encrypted text (default: stdout).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Decrypt data with a single password.
    Decrypt {
        /// The password for decryption. Prompted for when omitted.
        #[arg(long)]
        password: Option<String>,

        /// Input file to decrypt (default: stdin).
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file for the decrypted data (default: stdout).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cipher = build_cipher(&cli.tuning)?;

    match cli.command {
        Commands::Encrypt {
            password_a,
            password_b,
            input,
            output,
        } => cmd_encrypt(&cipher, password_a, password_b, input, output),

        Commands::Decrypt {
            password,
            input,
            output,
        } => cmd_decrypt(&cipher, password, input, output),
    }
}

/// Resolve configuration: file first, then command-line overrides.
fn build_cipher(tuning: &Tuning) -> Result<DualPasswordCipher> {
    let mut config = match &tuning.config {
        Some(path) => CipherConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => CipherConfig::default(),
    };

    if let Some(iterations) = tuning.iterations {
        config = config.with_kdf(KdfParams::new(iterations)?);
    }
    if let Some(level) = tuning.compression_level {
        config = config.with_compression_level(level);
    }

    debug!(
        iterations = config.kdf.iterations,
        compression_level = config.compression_level,
        "Cipher configured"
    );

    Ok(DualPasswordCipher::with_config(config)?)
}

/// Prompt for password securely.
fn prompt_password(prompt: &str) -> Result<Password> {
    let password = rpassword::prompt_password(prompt).context("Failed to read password")?;
    Ok(Password::new(password))
}

/// Use the password from the command line, or prompt for it.
fn resolve_password(given: Option<String>, label: &str, confirm: bool) -> Result<Password> {
    if let Some(password) = given {
        return Ok(Password::new(password));
    }

    let password = prompt_password(&format!("Enter {}: ", label))?;
    if confirm {
        let again = prompt_password(&format!("Confirm {}: ", label))?;
        if password != again {
            anyhow::bail!("Passwords do not match");
        }
    }
    Ok(password)
}

/// Encrypt input for two passwords.
fn cmd_encrypt(
    cipher: &DualPasswordCipher,
    password_a: Option<String>,
    password_b: Option<String>,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<()> {
    let password_a = resolve_password(password_a, "password A", true)?;
    let password_b = resolve_password(password_b, "password B", true)?;

    let data = io::read_bytes(input.as_deref())?;
    debug!(bytes = data.len(), "Read plaintext");

    let text = cipher
        .encrypt(password_a, password_b, &data)
        .context("Encryption failed")?;

    io::write_bytes(output.as_deref(), text.as_bytes())?;
    if let Some(path) = &output {
        info!("Encryption successful. Output written to {}", path.display());
    }

    Ok(())
}

/// Decrypt input with one password.
fn cmd_decrypt(
    cipher: &DualPasswordCipher,
    password: Option<String>,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<()> {
    let password = resolve_password(password, "password", false)?;

    let text = io::read_text(input.as_deref())?;
    let unlocked = cipher.unlock(password, &text)?;
    debug!(slot = unlocked.slot.label(), bytes = unlocked.data.len(), "Unlocked");

    io::write_bytes(output.as_deref(), &unlocked.data)?;
    if let Some(path) = &output {
        info!("Decryption successful. Output written to {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_encrypt() {
        let cli = Cli::parse_from([
            "dualpass",
            "encrypt",
            "--password-a",
            "alice123",
            "--password-b",
            "bob456",
            "-i",
            "in.bin",
        ]);
        match cli.command {
            Commands::Encrypt {
                password_a,
                password_b,
                input,
                output,
            } => {
                assert_eq!(password_a.as_deref(), Some("alice123"));
                assert_eq!(password_b.as_deref(), Some("bob456"));
                assert_eq!(input, Some(PathBuf::from("in.bin")));
                assert!(output.is_none());
            }
            Commands::Decrypt { .. } => panic!("expected encrypt"),
        }
    }

    #[test]
    fn test_parse_decrypt_with_overrides() {
        let cli = Cli::parse_from([
            "dualpass",
            "decrypt",
            "--password",
            "pw",
            "--iterations",
            "2000",
            "-o",
            "out.bin",
        ]);
        assert_eq!(cli.tuning.iterations, Some(2000));
        assert!(matches!(cli.command, Commands::Decrypt { .. }));
    }

    #[test]
    fn test_build_cipher_applies_overrides() {
        let tuning = Tuning {
            config: None,
            iterations: Some(1234),
            compression_level: Some(9),
        };
        let cipher = build_cipher(&tuning).unwrap();
        assert_eq!(cipher.config().kdf.iterations, 1234);
        assert_eq!(cipher.config().compression_level, 9);
    }

    #[test]
    fn test_build_cipher_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cipher.json");
        std::fs::write(&path, r#"{"kdf": {"iterations": 4321}}"#).unwrap();

        let tuning = Tuning {
            config: Some(path),
            iterations: None,
            compression_level: None,
        };
        let cipher = build_cipher(&tuning).unwrap();
        assert_eq!(cipher.config().kdf.iterations, 4321);
    }

    #[test]
    fn test_build_cipher_rejects_zero_iterations() {
        let tuning = Tuning {
            config: None,
            iterations: Some(0),
            compression_level: None,
        };
        assert!(build_cipher(&tuning).is_err());
    }

    #[test]
    fn test_file_encrypt_then_decrypt() {
        let dir = tempfile::tempdir().unwrap();
        let plain = dir.path().join("plain.bin");
        let sealed = dir.path().join("sealed.txt");
        let recovered = dir.path().join("recovered.bin");
        std::fs::write(&plain, b"file contents").unwrap();

        let cipher = build_cipher(&Tuning {
            config: None,
            iterations: Some(1000),
            compression_level: None,
        })
        .unwrap();

        cmd_encrypt(
            &cipher,
            Some("alice123".to_string()),
            Some("bob456".to_string()),
            Some(plain),
            Some(sealed.clone()),
        )
        .unwrap();

        cmd_decrypt(
            &cipher,
            Some("bob456".to_string()),
            Some(sealed.clone()),
            Some(recovered.clone()),
        )
        .unwrap();
        assert_eq!(std::fs::read(&recovered).unwrap(), b"file contents");

        let err = cmd_decrypt(&cipher, Some("nope".to_string()), Some(sealed), None).unwrap_err();
        assert!(err.to_string().contains("Decryption failed"));
    }
}
