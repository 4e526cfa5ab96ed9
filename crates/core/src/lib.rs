pub mod error;
pub mod frame;
pub mod media;
pub mod protocol;
pub mod session;
pub mod transport;

pub use error::{AuthFailure, DecodeError, ParseError, Result, RtspError};
pub use frame::{DecodedFrame, PixelFormatTag, decode};
pub use media::h265::{NalClassification, NalProbe, classify_nal};
pub use media::rtp::{RtpHeader, parse_header};
pub use session::auth::Credentials;
pub use session::{RtspSession, SdpInfo, SessionConfig, TransportParams};
pub use transport::RtpReceiver;
