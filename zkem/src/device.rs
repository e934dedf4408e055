//! High-level device interface

use bytes::{Bytes, BytesMut};
use chrono::NaiveDateTime;
use tracing::{debug, info, instrument, trace, warn, Span};

use zkem_core::{
    constants::{data_types::FCT_USER, ACK_SIZE, CLEAR_REPLY_SIZE, PREPARE_REPLY_SIZE, TIME_REPLY_SIZE},
    timecode, Command, Packet, Session, HEADER_SIZE,
};
use zkem_transport::{Transport, UdpTransport};
use zkem_types::{AttendanceRecord, UserRecord};

use crate::{
    config::DeviceConfig,
    error::{Error, Result},
    records,
    transfer::{self, ChunkMode},
};

/// zkem time clock
///
/// Owns the transport and the session counters. Every operation takes
/// `&mut self` and completes its whole request/reply cycle before
/// returning, so only one request is ever in flight.
///
/// # Examples
///
/// ```no_run
/// use zkem::{Device, DeviceConfig};
///
/// #[tokio::main]
/// async fn main() -> zkem::Result<()> {
///     let mut device = Device::new(DeviceConfig::new("192.168.1.201"));
///
///     device.connect().await?;
///     println!("Device time: {}", device.get_time().await?);
///
///     device.disconnect().await?;
///     Ok(())
/// }
/// ```
pub struct Device {
    config: DeviceConfig,
    transport: Box<dyn Transport>,
    session: Session,
    user_data: BytesMut,
    attendance_data: BytesMut,
    span: Span,
}

impl Device {
    /// Create a device reached over UDP
    pub fn new(config: DeviceConfig) -> Self {
        let transport = UdpTransport::new(config.host().unwrap_or_default(), config.port)
            .with_connect_timeout(config.timeout)
            .with_read_timeout(config.timeout);

        Self::with_transport(config, Box::new(transport))
    }

    /// Shortcut for [`Device::new`] with default timeout
    pub fn new_udp(host: impl Into<String>, port: u16) -> Self {
        Self::new(DeviceConfig::new(host).with_port(port))
    }

    /// Create a device over a caller-supplied transport
    pub fn with_transport(config: DeviceConfig, transport: Box<dyn Transport>) -> Self {
        let span = tracing::info_span!("device", addr = %config.addr());

        Self {
            config,
            transport,
            session: Session::new(),
            user_data: BytesMut::new(),
            attendance_data: BytesMut::new(),
            span,
        }
    }

    /// Log every operation under `span` instead of the default `device` span
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    /// Check if connected
    pub fn is_connected(&self) -> bool {
        self.session.is_connected() && self.transport.is_connected()
    }

    /// Session id assigned by the device (0 when disconnected)
    pub fn session_id(&self) -> u16 {
        self.session.session_id()
    }

    /// Open a session
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - No host is configured
    /// - The session is already connected
    /// - The device does not answer, or answers anything but `CMD_ACK_OK`
    ///
    /// On failure the transport is closed and the session stays
    /// disconnected.
    #[instrument(parent = &self.span, skip_all)]
    pub async fn connect(&mut self) -> Result<()> {
        if self.config.host().is_none() {
            return Err(Error::HostNotSet);
        }

        if self.session.is_connected() {
            return Err(zkem_core::Error::InvalidSessionState("Already connected".into()).into());
        }

        info!("Connecting to {}...", self.transport.remote_addr());

        match self.handshake().await {
            Ok(session_id) => {
                info!("Connected (session_id={})", session_id);
                Ok(())
            }
            Err(e) => {
                warn!("Connect failed: {}", e);

                self.session.close();
                if let Err(e) = self.transport.disconnect().await {
                    debug!("Failed to close transport: {}", e);
                }

                Err(e)
            }
        }
    }

    async fn handshake(&mut self) -> Result<u16> {
        self.transport.connect().await?;

        let reply = self.request(Command::Connect, Bytes::new(), ACK_SIZE).await?;
        expect(&reply, Command::AckOk)?;

        self.session.initialize(reply.session_id)?;

        Ok(reply.session_id)
    }

    /// End the session
    ///
    /// The transport is closed and the session reset even when the device
    /// does not acknowledge `CMD_EXIT`; that failure is still returned.
    #[instrument(parent = &self.span, skip_all)]
    pub async fn disconnect(&mut self) -> Result<()> {
        if !self.session.is_connected() {
            return Ok(());
        }

        info!("Disconnecting from {}...", self.transport.remote_addr());

        let result = self.command(Command::Exit, Bytes::new()).await;
        if let Err(e) = &result {
            warn!("EXIT not acknowledged: {}", e);
        }

        self.session.close();
        self.transport.disconnect().await?;

        info!("Disconnected");
        result
    }

    /// Enable the terminal keypad and sensor again
    #[instrument(parent = &self.span, skip_all)]
    pub async fn enable(&mut self) -> Result<()> {
        self.ensure_connected()?;

        debug!("Enabling device...");
        self.command(Command::EnableDevice, Bytes::new()).await
    }

    /// Lock the terminal for the duration of a transfer
    #[instrument(parent = &self.span, skip_all)]
    pub async fn disable(&mut self) -> Result<()> {
        self.ensure_connected()?;

        debug!("Disabling device...");
        self.command(Command::DisableDevice, vec![0u8, 0]).await
    }

    /// Read the device clock
    #[instrument(parent = &self.span, skip_all)]
    pub async fn get_time(&mut self) -> Result<NaiveDateTime> {
        self.ensure_connected()?;

        let reply = self.request(Command::GetTime, Bytes::new(), TIME_REPLY_SIZE).await?;
        expect(&reply, Command::AckOk)?;

        let field = reply.payload.get(..4).ok_or(Error::ShortReply {
            command: Command::GetTime,
            expected: TIME_REPLY_SIZE,
            actual: reply.size(),
        })?;
        let packed = u32::from_le_bytes([field[0], field[1], field[2], field[3]]);

        let time = timecode::decode(packed).ok_or(Error::InvalidTimestamp(packed))?;
        debug!("Device time: {}", time);

        Ok(time)
    }

    /// Set the device clock
    #[instrument(parent = &self.span, skip_all, fields(time = %time))]
    pub async fn set_time(&mut self, time: NaiveDateTime) -> Result<()> {
        self.ensure_connected()?;

        let packed = timecode::encode(&time);
        self.command(Command::SetTime, packed.to_le_bytes().to_vec()).await
    }

    /// Download the user table
    ///
    /// The raw data is kept for [`Device::unpack_user_data`]. Any earlier
    /// download is discarded first.
    #[instrument(parent = &self.span, skip_all)]
    pub async fn get_user_data(&mut self) -> Result<()> {
        self.ensure_connected()?;
        self.user_data.clear();

        self.user_data = self
            .fetch(Command::UserTempRrq, vec![FCT_USER], ChunkMode::KeepHeader)
            .await?;

        info!("Fetched {} bytes of user data", self.user_data.len());
        Ok(())
    }

    /// Users from the last [`Device::get_user_data`], in device order
    pub fn unpack_user_data(&self) -> Vec<UserRecord> {
        records::unpack_users(&self.user_data)
    }

    /// Download the attendance log
    ///
    /// The raw data is kept for [`Device::unpack_attendance_log`] and
    /// [`Device::clear_attendance_log`]. Any earlier download is discarded
    /// first.
    #[instrument(parent = &self.span, skip_all)]
    pub async fn get_attendance_log(&mut self) -> Result<()> {
        self.ensure_connected()?;
        self.attendance_data.clear();

        self.attendance_data = self
            .fetch(Command::AttLogRrq, Bytes::new(), ChunkMode::StripHeader)
            .await?;

        info!("Fetched {} bytes of attendance log", self.attendance_data.len());
        Ok(())
    }

    /// Punches from the last [`Device::get_attendance_log`], in device order
    pub fn unpack_attendance_log(&self) -> Vec<AttendanceRecord> {
        records::unpack_attendance(&self.attendance_data)
    }

    /// Erase the attendance log on the device
    ///
    /// # Errors
    ///
    /// Returns [`Error::NothingFetched`] without contacting the device
    /// unless a log has been downloaded first.
    ///
    /// The downloaded log is kept, so it can still be unpacked afterwards.
    #[instrument(parent = &self.span, skip_all)]
    pub async fn clear_attendance_log(&mut self) -> Result<()> {
        self.ensure_connected()?;

        if self.attendance_data.is_empty() {
            return Err(Error::NothingFetched);
        }

        warn!("Clearing attendance log...");

        let reply = self.request(Command::ClearAttLog, Bytes::new(), CLEAR_REPLY_SIZE).await?;
        expect(&reply, Command::AckOk)?;

        info!("Attendance log cleared");
        Ok(())
    }

    // Helper methods

    fn ensure_connected(&self) -> Result<()> {
        if !self.is_connected() {
            return Err(Error::NotConnected);
        }
        Ok(())
    }

    /// Send a command and expect a plain `CMD_ACK_OK`
    async fn command(&mut self, command: Command, payload: impl Into<Bytes>) -> Result<()> {
        let reply = self.request(command, payload, ACK_SIZE).await?;
        expect(&reply, Command::AckOk)?;

        debug!("{} acknowledged", command);
        Ok(())
    }

    /// Request a data transfer, reassemble it and read the closing ack
    async fn fetch(
        &mut self,
        command: Command,
        payload: impl Into<Bytes>,
        mode: ChunkMode,
    ) -> Result<BytesMut> {
        let reply = self.request(command, payload, PREPARE_REPLY_SIZE).await?;

        if !reply.is(Command::PrepareData) {
            debug!("No data to send: {}", reply);
            return Err(Error::NoData {
                received: reply.command,
            });
        }

        let field = reply.payload.get(..4).ok_or(Error::ShortReply {
            command,
            expected: HEADER_SIZE + 4,
            actual: reply.size(),
        })?;
        let announced = u32::from_le_bytes([field[0], field[1], field[2], field[3]]);

        debug!("Device announced {} bytes", announced);

        let data = transfer::reassemble(self.transport.as_mut(), announced, mode).await?;

        let ack = self.receive(ACK_SIZE).await?;
        expect(&ack, Command::AckOk)?;

        Ok(data)
    }

    async fn request(
        &mut self,
        command: Command,
        payload: impl Into<Bytes>,
        reply_size: usize,
    ) -> Result<Packet> {
        self.send(command, payload).await?;
        self.receive(reply_size).await
    }

    async fn send(&mut self, command: Command, payload: impl Into<Bytes>) -> Result<()> {
        let packet = self.session.frame(command, payload);

        trace!("Sending: {:?}", packet);
        self.transport.send(&packet.encode()).await?;

        Ok(())
    }

    async fn receive(&mut self, max_len: usize) -> Result<Packet> {
        let buf = self.transport.receive(max_len).await?;
        let packet = Packet::decode(buf)?;

        trace!("Received: {:?}", packet);
        Ok(packet)
    }
}

fn expect(reply: &Packet, expected: Command) -> Result<()> {
    if reply.is(expected) {
        return Ok(());
    }

    warn!("Expected {}, got {}", expected, reply);
    Err(Error::Rejected {
        expected,
        received: reply.command,
    })
}
