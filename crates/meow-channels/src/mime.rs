//! Content-based MIME detection for outgoing images.

/// Fallback when the content matches no known signature.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Detect the MIME type of an image from its leading bytes.
pub fn sniff_image_mime(data: &[u8]) -> &'static str {
    if data.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
        "image/png"
    } else if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        "image/jpeg"
    } else if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
        "image/gif"
    } else if data.len() >= 12 && &data[..4] == b"RIFF" && &data[8..12] == b"WEBP" {
        "image/webp"
    } else {
        OCTET_STREAM
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_signatures() {
        assert_eq!(
            sniff_image_mime(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0]),
            "image/png"
        );
        assert_eq!(sniff_image_mime(&[0xFF, 0xD8, 0xFF, 0xE0]), "image/jpeg");
        assert_eq!(sniff_image_mime(b"GIF89a...."), "image/gif");
        assert_eq!(sniff_image_mime(b"RIFF\x10\x00\x00\x00WEBPVP8 "), "image/webp");
    }

    #[test]
    fn test_unknown_content_falls_back() {
        assert_eq!(sniff_image_mime(b"hello"), OCTET_STREAM);
        assert_eq!(sniff_image_mime(&[]), OCTET_STREAM);
        assert_eq!(sniff_image_mime(b"RIFF1234WAVE"), OCTET_STREAM);
    }
}
