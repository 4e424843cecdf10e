use serde_json::Value;
use std::io::Write;
use std::process::{Command, Output, Stdio};

const MAIL_REQUEST: &str = r#"{
    "types": {
        "EIP712Domain": [
            {"name": "name", "type": "string"},
            {"name": "version", "type": "string"},
            {"name": "chainId", "type": "uint256"},
            {"name": "verifyingContract", "type": "address"}
        ],
        "Person": [
            {"name": "name", "type": "string"},
            {"name": "wallet", "type": "address"}
        ],
        "Mail": [
            {"name": "from", "type": "Person"},
            {"name": "to", "type": "Person"},
            {"name": "contents", "type": "string"}
        ]
    },
    "primaryType": "Mail",
    "domain": {
        "name": "Ether Mail",
        "version": "1",
        "chainId": 1,
        "verifyingContract": "0xCcCCccccCCCCcCCCCCCcCcCccCcCCCcCcccccccC"
    },
    "message": {
        "from": {"name": "Cow", "wallet": "0xCD2a3d9F938E13CD947Ec05AbC7FE734Df8DD826"},
        "to": {"name": "Bob", "wallet": "0xbBbBBBBbbBBBbbbBbbBbbbbBBbBbbbbBbBbbBBbB"},
        "contents": "Hello, Bob!"
    }
}"#;

const BATCH_REQUEST: &str = r#"{
    "types": {
        "EIP712Domain": [{"name": "name", "type": "string"}],
        "Batch": [{"name": "ids", "type": "uint256[]"}]
    },
    "primaryType": "Batch",
    "domain": {"name": "Test"},
    "message": {"ids": [1, 2, 3]}
}"#;

const MAIL_DIGEST: &str = "0xbe609aee343fb3c4b28e1df9e632fca64fcfaede20f02e86244efddf30957bd2";

fn run_cli(args: &[&str], stdin: &str) -> Output {
    let binary_path = assert_cmd::cargo::cargo_bin!("typed-data");
    let mut child = Command::new(binary_path)
        .args(args)
        .env_remove("TYPED_DATA_VERSION")
        .env_remove("TYPED_DATA_STRICT_INT_WIDTH")
        .env_remove("TYPED_DATA_DEBUG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("cli spawns");

    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(stdin.as_bytes())
        .expect("request written to stdin");
    child.wait_with_output().expect("cli run completes")
}

fn stdout_of(output: &Output) -> String {
    assert!(
        output.status.success(),
        "cli exited unsuccessfully: {:?}",
        output
    );
    String::from_utf8(output.stdout.clone())
        .expect("stdout is utf8")
        .trim()
        .to_string()
}

#[test]
fn cli_prints_mail_digest() {
    let output = run_cli(&["digest"], MAIL_REQUEST);
    assert_eq!(stdout_of(&output), MAIL_DIGEST);
}

#[test]
fn cli_reads_request_from_file() {
    let path = std::env::temp_dir().join(format!("typed-data-mail-{}.json", std::process::id()));
    std::fs::write(&path, MAIL_REQUEST).expect("fixture written");

    let output = run_cli(&["digest", path.to_str().expect("utf8 path")], "");
    let _ = std::fs::remove_file(&path);
    assert_eq!(stdout_of(&output), MAIL_DIGEST);
}

#[test]
fn cli_json_digest_includes_pre_image() {
    let output = run_cli(&["--json", "digest"], MAIL_REQUEST);
    let json: Value = serde_json::from_str(&stdout_of(&output)).expect("stdout is valid json");

    assert_eq!(json["primaryType"], "Mail");
    assert_eq!(json["version"], "v4");
    assert_eq!(json["digest"], MAIL_DIGEST);
    assert_eq!(
        json["domainSeparator"],
        "0xf2cee375fa42b42143804025fc449deafd50cc031ca257e0b194a650a912090f"
    );
    assert_eq!(
        json["structHash"],
        "0xc52c0ee5d84264471806290a3f2c4cecfc5490626bf912d01f240d7a274b371e"
    );
}

#[test]
fn cli_encodes_types() {
    let output = run_cli(&["encode-type"], MAIL_REQUEST);
    assert_eq!(
        stdout_of(&output),
        "Mail(Person from,Person to,string contents)Person(string name,address wallet)"
    );

    let output = run_cli(&["type-hash", "--type", "Person"], MAIL_REQUEST);
    assert_eq!(
        stdout_of(&output),
        "0xb9d8c78acf9b987311de6c7b45bb6a9c8e1bf361fa7fd3467a2163f994c79500"
    );
}

#[test]
fn cli_hashes_domain_struct() {
    let output = run_cli(&["hash-struct", "--type", "EIP712Domain"], MAIL_REQUEST);
    assert_eq!(
        stdout_of(&output),
        "0xf2cee375fa42b42143804025fc449deafd50cc031ca257e0b194a650a912090f"
    );
}

#[test]
fn cli_encode_data_starts_with_type_hash() {
    let output = run_cli(&["encode-data"], MAIL_REQUEST);
    let encoded = stdout_of(&output);
    assert!(encoded.starts_with("0xa0cedeb2dc280ba39b857546d74f5549c3a1d7bdc2dd96bf881f76108e23dac2"));
    assert_eq!(encoded.len(), 2 + 4 * 64);
}

#[test]
fn cli_array_requires_current_version() {
    let output = run_cli(&["digest"], BATCH_REQUEST);
    assert!(output.status.success(), "v4 accepts arrays: {:?}", output);

    let output = run_cli(&["--protocol", "v3", "digest"], BATCH_REQUEST);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Type uint256[] is not supported by v3"),
        "unexpected stderr: {}",
        stderr
    );
}

#[test]
fn cli_rejects_unknown_type() {
    let output = run_cli(&["encode-type", "--type", "Letter"], MAIL_REQUEST);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Letter"));
}

#[test]
fn cli_rejects_malformed_json() {
    let output = run_cli(&["digest"], "{not json");
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}
