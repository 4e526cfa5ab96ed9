use crate::error::DecodeError;

use super::PixelFormatTag;

/// Raw-video capabilities of a pulled sample.
///
/// Parsed from the textual caps form media frameworks print:
///
/// ```text
/// video/x-raw, format=(string)NV12, width=(int)1920, height=(int)1080, framerate=(fraction)25/1
/// ```
///
/// Only `format`, `width` and `height` are interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleCaps {
    pub media_type: String,
    pub format: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl SampleCaps {
    /// ```
    /// use camgrid::frame::SampleCaps;
    ///
    /// let caps = SampleCaps::parse("video/x-raw, format=(string)RGB, width=(int)640, height=(int)480").unwrap();
    /// assert_eq!(caps.format.as_deref(), Some("RGB"));
    /// assert_eq!((caps.width, caps.height), (Some(640), Some(480)));
    /// ```
    pub fn parse(caps: &str) -> Result<Self, DecodeError> {
        let mut fields = caps.split(',');
        let media_type = fields.next().unwrap_or_default().trim();
        if media_type.is_empty() || media_type.contains('=') {
            return Err(DecodeError::InvalidCaps(format!("missing media type in {caps:?}")));
        }

        let mut parsed = SampleCaps {
            media_type: media_type.to_string(),
            format: None,
            width: None,
            height: None,
        };

        for field in fields {
            let Some((key, value)) = field.split_once('=') else {
                continue;
            };
            let value = strip_type(value.trim());
            match key.trim() {
                "format" => parsed.format = Some(value.to_string()),
                "width" => parsed.width = Some(parse_dimension("width", value)?),
                "height" => parsed.height = Some(parse_dimension("height", value)?),
                _ => {}
            }
        }

        Ok(parsed)
    }

    /// Declared `(width, height)`.
    pub fn dimensions(&self) -> Result<(u32, u32), DecodeError> {
        match (self.width, self.height) {
            (Some(w), Some(h)) => Ok((w, h)),
            _ => Err(DecodeError::InvalidCaps("width and height are required".into())),
        }
    }

    /// Map the declared format to a [`PixelFormatTag`].
    ///
    /// NV12 buffers from hardware decoders are padded; `padded` gives the
    /// allocated dimensions. Without it the buffer is assumed unpadded.
    pub fn pixel_format(&self, padded: Option<(u32, u32)>) -> Result<PixelFormatTag, DecodeError> {
        let format = self
            .format
            .as_deref()
            .ok_or_else(|| DecodeError::InvalidCaps("format is required".into()))?;

        match format {
            "RGB" => Ok(PixelFormatTag::Rgb24),
            "GRAY8" => Ok(PixelFormatTag::Gray8),
            "NV12" => {
                let (padded_width, padded_height) = match padded {
                    Some(dims) => dims,
                    None => self.dimensions()?,
                };
                Ok(PixelFormatTag::Nv12Padded {
                    padded_width,
                    padded_height,
                })
            }
            other => Err(DecodeError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// `(int)1920` -> `1920`
fn strip_type(value: &str) -> &str {
    match value.strip_prefix('(').and_then(|v| v.split_once(')')) {
        Some((_, rest)) => rest.trim(),
        None => value,
    }
}

fn parse_dimension(name: &str, value: &str) -> Result<u32, DecodeError> {
    value
        .parse()
        .map_err(|_| DecodeError::InvalidCaps(format!("{name} is not an integer: {value:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nv12_with_padding() {
        let caps = SampleCaps::parse(
            "video/x-raw, format=(string)NV12, width=(int)1920, height=(int)1080, framerate=(fraction)25/1",
        )
        .unwrap();
        assert_eq!(caps.media_type, "video/x-raw");
        assert_eq!(caps.dimensions().unwrap(), (1920, 1080));
        assert_eq!(
            caps.pixel_format(Some((1920, 1088))).unwrap(),
            PixelFormatTag::Nv12Padded {
                padded_width: 1920,
                padded_height: 1088
            }
        );
        assert_eq!(
            caps.pixel_format(None).unwrap(),
            PixelFormatTag::Nv12Padded {
                padded_width: 1920,
                padded_height: 1080
            }
        );
    }

    #[test]
    fn untyped_values() {
        let caps = SampleCaps::parse("video/x-raw,format=GRAY8,width=4,height=2").unwrap();
        assert_eq!(caps.pixel_format(None).unwrap(), PixelFormatTag::Gray8);
        assert_eq!(caps.dimensions().unwrap(), (4, 2));
    }

    #[test]
    fn errors() {
        assert!(matches!(
            SampleCaps::parse("format=RGB"),
            Err(DecodeError::InvalidCaps(_))
        ));
        assert!(matches!(
            SampleCaps::parse("video/x-raw, width=(int)wide"),
            Err(DecodeError::InvalidCaps(_))
        ));

        let i420 = SampleCaps::parse("video/x-raw, format=(string)I420").unwrap();
        assert_eq!(
            i420.pixel_format(None),
            Err(DecodeError::UnsupportedFormat("I420".to_string()))
        );

        let no_format = SampleCaps::parse("video/x-raw, width=(int)2").unwrap();
        assert!(no_format.pixel_format(None).is_err());
        assert!(no_format.dimensions().is_err());
    }
}
