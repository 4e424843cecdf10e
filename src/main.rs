use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use sign_typed_data::eip712::{encoder_for_request, Eip712Encoder, TypedDataRequest, Version, DOMAIN_TYPE_NAME};
use sign_typed_data::types::{DigestResponse, EncodeTypeResponse};
use sign_typed_data::{log_debug, log_warn, to_hex_prefixed, EncoderSettings};
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

const LOG_MODULE: &str = "cli";

/// Hash EIP-712 typed data requests
#[derive(Parser, Debug)]
#[command(name = "typed-data", version, about)]
struct Cli {
    /// Protocol version used when the request has no "version" member (v3 or v4)
    #[arg(long, global = true)]
    protocol: Option<Version>,

    /// Reject uintN/intN values that do not fit in N bits
    #[arg(long, global = true)]
    strict_int_width: bool,

    /// Emit debug log lines on stderr
    #[arg(long, global = true)]
    debug: bool,

    /// Print JSON instead of bare values
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Signing digest: keccak256(0x1901 || domainSeparator || structHash)
    Digest {
        /// Request file; reads stdin when omitted
        input: Option<PathBuf>,
    },
    /// Canonical type string of a struct and its dependencies
    EncodeType(TypeArgs),
    /// keccak256 of the canonical type string
    TypeHash(TypeArgs),
    /// Struct hash of the message (or of the domain for EIP712Domain)
    HashStruct(TypeArgs),
    /// Full encoded buffer of the message (or of the domain for EIP712Domain)
    EncodeData(TypeArgs),
}

#[derive(Args, Debug)]
struct TypeArgs {
    /// Struct type to operate on; defaults to primaryType
    #[arg(long = "type")]
    type_name: Option<String>,

    /// Request file; reads stdin when omitted
    input: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = settings_for(&cli);
    settings.apply_logging();

    let output = run(&cli.command, &settings, cli.json)?;
    println!("{}", output);
    Ok(())
}

/// Environment first, flags on top
fn settings_for(cli: &Cli) -> EncoderSettings {
    let (mut settings, warnings) = EncoderSettings::from_env();
    if let Some(protocol) = cli.protocol {
        settings = settings.with_version(protocol);
    }
    if cli.strict_int_width {
        settings = settings.with_int_width_enforcement(true);
    }
    if cli.debug {
        settings = settings.with_debug_logging(true);
    }

    for warning in warnings {
        log_warn!(LOG_MODULE, warning);
    }
    settings
}

fn run(command: &Command, settings: &EncoderSettings, json: bool) -> Result<String> {
    match command {
        Command::Digest { input } => {
            let request = read_request(input.as_ref())?;
            let encoder = encoder_for_request(&request, settings)?;
            let pre_image = encoder
                .pre_image(&request.primary_type, &request.message, &request.domain)
                .with_context(|| format!("hashing {} request", request.primary_type))?;
            log_debug!(LOG_MODULE, "digest computed", primary_type = request.primary_type, digest = to_hex_prefixed(pre_image.digest));

            if json {
                let response = DigestResponse {
                    primary_type: request.primary_type.clone(),
                    version: encoder.version(),
                    pre_image: pre_image.to_hex(),
                };
                Ok(serde_json::to_string_pretty(&response)?)
            } else {
                Ok(to_hex_prefixed(pre_image.digest))
            }
        }
        Command::EncodeType(args) | Command::TypeHash(args) => {
            let (request, encoder) = load(args, settings)?;
            let type_name = target_type(args, &request);
            ensure_defined(&encoder, type_name)?;

            let encoded_type = encoder.encode_types(type_name);
            let type_hash = to_hex_prefixed(encoder.type_hash(type_name));
            if json {
                let response = EncodeTypeResponse {
                    type_name: type_name.to_string(),
                    encoded_type,
                    type_hash,
                };
                Ok(serde_json::to_string_pretty(&response)?)
            } else if matches!(command, Command::EncodeType(_)) {
                Ok(encoded_type)
            } else {
                Ok(type_hash)
            }
        }
        Command::HashStruct(args) | Command::EncodeData(args) => {
            let (request, encoder) = load(args, settings)?;
            let type_name = target_type(args, &request);
            let data = if type_name == DOMAIN_TYPE_NAME {
                &request.domain
            } else {
                &request.message
            };

            let (key, bytes) = if matches!(command, Command::HashStruct(_)) {
                ("structHash", encoder.hash_struct(type_name, data)?.to_vec())
            } else {
                ("encodedData", encoder.encode_data(type_name, data)?)
            };
            let rendered = to_hex_prefixed(bytes);
            if json {
                Ok(serde_json::to_string_pretty(&serde_json::json!({
                    "typeName": type_name,
                    "version": encoder.version(),
                    key: rendered,
                }))?)
            } else {
                Ok(rendered)
            }
        }
    }
}

fn load(args: &TypeArgs, settings: &EncoderSettings) -> Result<(TypedDataRequest, Eip712Encoder)> {
    let request = read_request(args.input.as_ref())?;
    let encoder = encoder_for_request(&request, settings)?;
    Ok((request, encoder))
}

fn target_type<'a>(args: &'a TypeArgs, request: &'a TypedDataRequest) -> &'a str {
    args.type_name.as_deref().unwrap_or(&request.primary_type)
}

fn ensure_defined(encoder: &Eip712Encoder, type_name: &str) -> Result<()> {
    if !encoder.registry().contains(type_name) {
        bail!("type {} is not defined in types", type_name);
    }
    Ok(())
}

fn read_request(input: Option<&PathBuf>) -> Result<TypedDataRequest> {
    let payload = match input {
        Some(path) => fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer).context("reading stdin")?;
            buffer
        }
    };

    Ok(TypedDataRequest::from_json(&payload)?)
}
