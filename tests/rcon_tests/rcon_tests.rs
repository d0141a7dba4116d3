//! RCON Tests
//!
//! These tests verify:
//! - Packet layout
//! - Login success, refusal and the leading empty response value
//! - Command preconditions
//! - Fragmented response reassembly

#[path = "../common/mod.rs"]
mod common;

use mcwire::rcon::{
    decode_packet, encode_packet, RconClient, RconPacket, COMMAND_REQUEST_TYPE,
    INVALID_REQUEST_TYPE, LOGIN_REQUEST_TYPE, MAX_COMMAND_LEN, UNKNOWN_REQUEST_REPLY,
};
use mcwire::{ClientConfig, McError};
use rand::rngs::mock::StepRng;

use common::{rcon_packet, rcon_packet_bytes, ScriptedStream};

/// Ids drawn by `StepRng::new(100, 1)`: login first, then each command
const LOGIN_ID: i32 = 100;
const COMMAND_ID: i32 = 101;

fn client_with(input: Vec<u8>) -> RconClient<ScriptedStream> {
    client_with_config(input, ClientConfig::default())
}

fn client_with_config(input: Vec<u8>, config: ClientConfig) -> RconClient<ScriptedStream> {
    let mut client = RconClient::detached("localhost", 25575)
        .with_config(config)
        .with_id_source(Box::new(StepRng::new(100, 1)));
    client.connect_with(ScriptedStream::new(input)).unwrap();
    client
}

/// Every packet the client wrote
fn sent_packets(written: &[u8]) -> Vec<RconPacket> {
    let mut reader = written;
    let mut packets = Vec::new();
    while !reader.is_empty() {
        packets.push(decode_packet(&mut reader).unwrap());
    }
    packets
}

// =============================================================================
// Packet Tests
// =============================================================================

#[test]
fn test_encode_packet_layout() {
    let packet = encode_packet(7, COMMAND_REQUEST_TYPE, "list");
    assert_eq!(
        &packet[..],
        &[
            0x0E, 0x00, 0x00, 0x00, // length
            0x07, 0x00, 0x00, 0x00, // request id
            0x02, 0x00, 0x00, 0x00, // type
            b'l', b'i', b's', b't', 0x00, // payload
            0x00, // pad
        ]
    );
}

#[test]
fn test_decode_packet() {
    let bytes = rcon_packet(7, 0, "There are 0 of a max of 20 players online");
    let packet = decode_packet(&mut bytes.as_slice()).unwrap();
    assert_eq!(packet.request_id, 7);
    assert_eq!(packet.packet_type, 0);
    assert_eq!(packet.payload, b"There are 0 of a max of 20 players online");
    assert_eq!(packet.padding, 0);
    assert_eq!(packet.length as usize, bytes.len() - 4);
}

#[test]
fn test_decode_packet_length_bounds() {
    let bytes = 9u32.to_le_bytes();
    let err = decode_packet(&mut bytes.as_slice()).unwrap_err();
    assert!(matches!(err, McError::MalformedPacket(_)));

    let bytes = (2u32 << 20).to_le_bytes();
    let err = decode_packet(&mut bytes.as_slice()).unwrap_err();
    assert!(matches!(err, McError::FrameTooLarge { .. }));
}

// =============================================================================
// Authentication Tests
// =============================================================================

#[test]
fn test_authenticate_success() {
    let stream = ScriptedStream::new(rcon_packet(LOGIN_ID, 2, ""));
    let written = stream.written();

    let mut client = RconClient::detached("localhost", 25575)
        .with_id_source(Box::new(StepRng::new(100, 1)));
    client.connect_with(stream).unwrap();

    assert!(client.authenticate("hunter2").unwrap());
    assert!(client.is_authenticated());

    let sent = sent_packets(&written.lock());
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].request_id, LOGIN_ID);
    assert_eq!(sent[0].packet_type, LOGIN_REQUEST_TYPE);
    assert_eq!(sent[0].payload, b"hunter2");
}

#[test]
fn test_authenticate_wrong_password() {
    let mut client = client_with(rcon_packet(-1, 2, ""));
    assert!(!client.authenticate("wrong").unwrap());
    assert!(!client.is_authenticated());
}

#[test]
fn test_authenticate_skips_empty_response_value() {
    let mut input = rcon_packet(LOGIN_ID, 0, "");
    input.extend(rcon_packet(LOGIN_ID, 2, ""));

    let mut client = client_with(input);
    assert!(client.authenticate("hunter2").unwrap());
}

#[test]
fn test_authenticate_id_mismatch_strict() {
    let config = ClientConfig::builder().strict_ids(true).build();
    let mut client = client_with_config(rcon_packet(5, 2, ""), config);
    let err = client.authenticate("hunter2").unwrap_err();
    assert!(matches!(err, McError::IdMismatch { expected: 100, actual: 5 }));
}

// =============================================================================
// Command Tests
// =============================================================================

#[test]
fn test_command_requires_authentication() {
    let mut client = client_with(Vec::new());
    assert!(matches!(client.command("list").unwrap_err(), McError::NotAuthenticated));
}

#[test]
fn test_command_requires_connection() {
    let mut client: RconClient<ScriptedStream> = RconClient::detached("localhost", 25575);
    assert!(matches!(client.command("list").unwrap_err(), McError::NotConnected));
}

#[test]
fn test_command_too_long_sends_nothing() {
    let stream = ScriptedStream::new(rcon_packet(LOGIN_ID, 2, ""));
    let written = stream.written();

    let mut client = RconClient::detached("localhost", 25575)
        .with_id_source(Box::new(StepRng::new(100, 1)));
    client.connect_with(stream).unwrap();
    client.authenticate("hunter2").unwrap();
    let before = written.lock().len();

    let command = "a".repeat(MAX_COMMAND_LEN + 1);
    let err = client.command(&command).unwrap_err();
    assert!(matches!(err, McError::CommandTooLong { len: 1447, max: 1446 }));
    assert_eq!(written.lock().len(), before);

    // Exactly at the limit is fine
    assert!(client.command(&"a".repeat(MAX_COMMAND_LEN)).is_err_and(|e| e.is_transport()));
}

#[test]
fn test_command_single_packet() {
    let mut input = rcon_packet(LOGIN_ID, 2, "");
    input.extend(rcon_packet(COMMAND_ID, 0, "There are 3 of a max of 20 players online"));

    let mut client = client_with(input);
    client.authenticate("hunter2").unwrap();
    let output = client.command("list").unwrap();
    assert_eq!(output, "There are 3 of a max of 20 players online");
}

#[test]
fn test_command_fragmented_response() {
    let first = "x".repeat(4096);
    let second = "tail of the output";

    let mut input = rcon_packet(LOGIN_ID, 2, "");
    input.extend(rcon_packet(COMMAND_ID, 0, &first));
    input.extend(rcon_packet(COMMAND_ID, 0, second));
    input.extend(rcon_packet(COMMAND_ID, 0, UNKNOWN_REQUEST_REPLY));

    let stream = ScriptedStream::new(input).chunked(512);
    let written = stream.written();

    let mut client = RconClient::detached("localhost", 25575)
        .with_id_source(Box::new(StepRng::new(100, 1)));
    client.connect_with(stream).unwrap();
    client.authenticate("hunter2").unwrap();

    let output = client.command("help").unwrap();
    assert_eq!(output.len(), 4096 + second.len());
    assert!(output.starts_with(&first));
    assert!(output.ends_with(second));

    let sent = sent_packets(&written.lock());
    let invalid: Vec<&RconPacket> = sent
        .iter()
        .filter(|p| p.packet_type == INVALID_REQUEST_TYPE)
        .collect();
    assert_eq!(invalid.len(), 1);
    assert_eq!(invalid[0].request_id, COMMAND_ID);
    assert!(invalid[0].payload.is_empty());
}

#[test]
fn test_command_fragments_split_inside_a_character() {
    // 'é' is C3 A9, cut between the two packets
    let mut first = vec![b'a'; 4095];
    first.push(0xC3);
    let mut second = vec![0xA9];
    second.extend_from_slice(b" tail");

    let mut input = rcon_packet(LOGIN_ID, 2, "");
    input.extend(rcon_packet_bytes(COMMAND_ID, 0, &first));
    input.extend(rcon_packet_bytes(COMMAND_ID, 0, &second));
    input.extend(rcon_packet(COMMAND_ID, 0, UNKNOWN_REQUEST_REPLY));

    let mut client = client_with(input);
    client.authenticate("hunter2").unwrap();
    let output = client.command("help").unwrap();

    assert_eq!(output, format!("{}é tail", "a".repeat(4095)));
    assert!(!output.contains('\u{FFFD}'));
}

#[test]
fn test_command_fragment_with_foreign_id_is_dropped() {
    let first = "y".repeat(5000);

    let mut input = rcon_packet(LOGIN_ID, 2, "");
    input.extend(rcon_packet(COMMAND_ID, 0, &first));
    input.extend(rcon_packet(9999, 0, "stray"));
    input.extend(rcon_packet(COMMAND_ID, 0, UNKNOWN_REQUEST_REPLY));

    let mut client = client_with(input);
    client.authenticate("hunter2").unwrap();
    assert_eq!(client.command("help").unwrap(), first);
}

#[test]
fn test_command_below_threshold_sends_no_invalid_request() {
    let payload = "z".repeat(4095);

    let mut input = rcon_packet(LOGIN_ID, 2, "");
    input.extend(rcon_packet(COMMAND_ID, 0, &payload));

    let stream = ScriptedStream::new(input);
    let written = stream.written();
    let mut client = RconClient::detached("localhost", 25575)
        .with_id_source(Box::new(StepRng::new(100, 1)));
    client.connect_with(stream).unwrap();
    client.authenticate("hunter2").unwrap();

    assert_eq!(client.command("help").unwrap(), payload);
    assert!(sent_packets(&written.lock())
        .iter()
        .all(|p| p.packet_type != INVALID_REQUEST_TYPE));
}

#[test]
fn test_disconnect_drops_authentication() {
    let mut client = client_with(rcon_packet(LOGIN_ID, 2, ""));
    client.authenticate("hunter2").unwrap();
    client.disconnect().unwrap();

    assert!(!client.is_authenticated());
    assert!(matches!(client.command("list").unwrap_err(), McError::NotConnected));
}
