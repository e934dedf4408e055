//! Scripted transport for unit tests

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use mockall::mock;
use parking_lot::Mutex;

use zkem_core::{Command, Packet};
use zkem_transport::{Error as TransportError, Result as TransportResult, Transport};

pub const SESSION_ID: u16 = 0x2A53;

mock! {
    pub Link {}

    #[async_trait]
    impl Transport for Link {
        async fn connect(&mut self) -> TransportResult<()>;
        async fn disconnect(&mut self) -> TransportResult<()>;
        fn is_connected(&self) -> bool;
        async fn send(&mut self, data: &[u8]) -> TransportResult<()>;
        async fn receive(&mut self, max_len: usize) -> TransportResult<BytesMut>;
        fn remote_addr(&self) -> String;
    }
}

/// Frames written by the client, in order
pub type Sent = Arc<Mutex<Vec<Vec<u8>>>>;

/// Mock link that answers receives from `datagrams` in order and times out
/// once they run out.
pub fn scripted(datagrams: Vec<Vec<u8>>) -> (MockLink, Sent) {
    let mut link = MockLink::new();
    let queue = Arc::new(Mutex::new(VecDeque::from(datagrams)));
    let sent: Sent = Arc::new(Mutex::new(Vec::new()));

    link.expect_connect().returning(|| Ok(()));
    link.expect_disconnect().returning(|| Ok(()));
    link.expect_is_connected().return_const(true);
    link.expect_remote_addr()
        .return_const("10.0.0.2:4370".to_string());

    let log = sent.clone();
    link.expect_send().returning(move |data: &[u8]| {
        log.lock().push(data.to_vec());
        Ok(())
    });

    link.expect_receive().returning(move |max_len| {
        match queue.lock().pop_front() {
            Some(mut datagram) => {
                datagram.truncate(max_len);
                Ok(BytesMut::from(&datagram[..]))
            }
            None => Err(TransportError::ReadTimeout),
        }
    });

    (link, sent)
}

/// Device frame with the given opcode
pub fn frame(command: Command, payload: &[u8]) -> Vec<u8> {
    Packet {
        command: command.into(),
        checksum: 0,
        session_id: SESSION_ID,
        reply_id: 0,
        payload: Bytes::copy_from_slice(payload),
    }
    .encode()
    .to_vec()
}

pub fn ack() -> Vec<u8> {
    frame(Command::AckOk, &[])
}

/// 16-byte "prepare data" reply announcing `size` bytes
pub fn prepare(size: u32) -> Vec<u8> {
    let mut payload = size.to_le_bytes().to_vec();
    payload.resize(8, 0);
    frame(Command::PrepareData, &payload)
}

/// One data chunk carrying `payload`
pub fn chunk(payload: &[u8]) -> Vec<u8> {
    frame(Command::Data, payload)
}
