//! Embedded image representation: base64 data URLs, self-contained and
//! transport-independent.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

/// Whether a locator is already an embedded representation.
pub fn is_data_url(locator: &str) -> bool {
    locator.starts_with("data:")
}

/// Encode raw bytes as a `data:<mime>;base64,...` URL.
pub fn encode(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", BASE64.encode(bytes))
}

/// Decode a base64 data URL back into its mime type and payload.
pub fn decode(data_url: &str) -> Option<(String, Vec<u8>)> {
    let rest = data_url.strip_prefix("data:")?;
    let (header, payload) = rest.split_once(',')?;
    let mime = header.strip_suffix(";base64")?;
    let bytes = BASE64.decode(payload).ok()?;
    Some((mime.to_string(), bytes))
}

/// Sniff the mime type of encoded image bytes, when recognizable.
pub fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    image::guess_format(bytes).ok().map(|f| f.to_mime_type())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrips_bytes() {
        let url = encode("image/png", b"hello");
        assert!(is_data_url(&url));
        let (mime, bytes) = decode(&url).unwrap();
        assert_eq!(mime, "image/png");
        assert_eq!(bytes, b"hello");
    }

    #[test]
    fn rejects_non_base64_urls() {
        assert!(decode("data:text/plain,hello").is_none());
        assert!(decode("https://example.com/a.png").is_none());
        assert!(decode("data:image/png;base64,!!!").is_none());
    }

    #[test]
    fn sniffs_png_signature() {
        let mut img = image::RgbaImage::new(2, 2);
        img.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
        let mut buf = std::io::Cursor::new(Vec::new());
        img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
        assert_eq!(sniff_mime(buf.get_ref()), Some("image/png"));
        assert_eq!(sniff_mime(b"not an image"), None);
    }
}
