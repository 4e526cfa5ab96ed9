use std::process::ExitCode;
use std::time::Duration;

use camgrid::media::{NalProbe, classify_datagram};
use camgrid::{RtpReceiver, RtspSession, SessionConfig};
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "camgrid-probe",
    about = "Negotiate RTSP sessions with cameras and watch their RTP streams for keyframes"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Send DESCRIBE and print the SDP
    Describe {
        /// Camera URL, optionally with user:pass@
        url: String,
        /// Socket read timeout in seconds
        #[arg(long, default_value_t = 5)]
        timeout: u64,
    },
    /// DESCRIBE + SETUP one track and print the session
    Setup {
        /// Camera URL, optionally with user:pass@
        url: String,
        /// SDP control attribute of the track to set up
        #[arg(long, default_value = "trackID=1")]
        track: String,
        /// Local RTP port (RTCP uses the next one)
        #[arg(long, default_value_t = 8000)]
        client_port: u16,
        /// Socket read timeout in seconds
        #[arg(long, default_value_t = 5)]
        timeout: u64,
        /// Listen on the client port after SETUP
        #[arg(long)]
        listen: bool,
        #[command(flatten)]
        probe: ProbeArgs,
    },
    /// Listen for RTP packets and report IDR keyframe starts
    Listen {
        /// Local UDP port
        #[arg(long, short, default_value_t = 8000)]
        port: u16,
        #[command(flatten)]
        probe: ProbeArgs,
    },
}

#[derive(Args)]
struct ProbeArgs {
    /// Byte offset of the NAL/FU header within each datagram
    #[arg(long, default_value_t = 14)]
    payload_offset: usize,
    /// Treat every packet as a single NAL unit (no FU start bit)
    #[arg(long)]
    single_nal: bool,
    /// Stop after this many packets
    #[arg(long)]
    max_packets: Option<u64>,
}

impl ProbeArgs {
    fn probe(&self) -> NalProbe {
        NalProbe {
            payload_offset: self.payload_offset,
            fragmentation_aware: !self.single_nal,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Describe { url, timeout } => describe(&url, timeout),
        Command::Setup {
            url,
            track,
            client_port,
            timeout,
            listen: then_listen,
            probe,
        } => setup(&url, &track, client_port, timeout).and_then(|_| {
            if then_listen {
                listen(client_port, &probe)
            } else {
                Ok(())
            }
        }),
        Command::Listen { port, probe } => listen(port, &probe),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn session_config(client_port: u16, timeout: u64) -> SessionConfig {
    let timeout = Some(Duration::from_secs(timeout)).filter(|t| !t.is_zero());
    SessionConfig {
        client_rtp_port: client_port,
        client_rtcp_port: client_port.saturating_add(1),
        read_timeout: timeout,
        write_timeout: timeout,
        ..SessionConfig::default()
    }
}

fn describe(url: &str, timeout: u64) -> camgrid::Result<()> {
    let mut session = RtspSession::connect(url, session_config(8000, timeout))?;
    let sdp = session.describe()?;
    print!("{}", sdp.body);
    Ok(())
}

fn setup(url: &str, track: &str, client_port: u16, timeout: u64) -> camgrid::Result<()> {
    let mut session = RtspSession::connect(url, session_config(client_port, timeout))?;
    session.describe()?;
    let params = session.setup(track)?;

    println!("Session: {}", params.session_id);
    if let Some(timeout) = params.session_timeout {
        println!("Timeout: {timeout}s");
    }
    println!("Track:   {}", params.uri);
    println!("Transport: {}", params.transport.raw);
    Ok(())
}

fn listen(port: u16, args: &ProbeArgs) -> camgrid::Result<()> {
    let probe = args.probe();
    let mut receiver = RtpReceiver::bind(port)?;
    let mut received = 0u64;

    while args.max_packets.is_none_or(|max| received < max) {
        let Some((datagram, from)) = receiver.recv()? else {
            continue;
        };
        received += 1;

        match classify_datagram(datagram, &probe) {
            Ok(packet) => {
                tracing::trace!(
                    %from,
                    seq = packet.header.sequence_number,
                    ts = packet.header.timestamp,
                    nal_type = packet.nal.nal_unit_type,
                    extension = packet.header.has_extension(),
                    "packet"
                );
                if packet.is_idr_start() {
                    println!(
                        "IDR_W_RADL start packet received with timestamp: {}",
                        packet.header.timestamp
                    );
                }
            }
            Err(e) => tracing::debug!(%from, error = %e, "dropping datagram"),
        }
    }

    Ok(())
}
