//! Deterministic placeholder icons
//!
//! Terminal tier of the resolution pipeline. When no real icon can be
//! obtained, the domain is hashed into a fill colour and rendered as a
//! solid 32x32 PNG. The same domain always produces byte-identical output.

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use sha2::{Digest, Sha256};
use std::io::Cursor;
use tracing::debug;

use crate::ICON_SIZE;

/// Generate the placeholder PNG for a domain.
///
/// The fill colour is the first three bytes of the SHA-256 digest of the
/// domain, interpreted as an RGB triplet.
pub fn generate(domain: &str) -> Result<Vec<u8>, image::ImageError> {
    let digest = Sha256::digest(domain.as_bytes());
    let colour = Rgb([digest[0], digest[1], digest[2]]);
    debug!(
        "Using placeholder colour #{:02x}{:02x}{:02x} for {domain}",
        digest[0], digest[1], digest[2]
    );

    let img = RgbImage::from_pixel(ICON_SIZE, ICON_SIZE, colour);

    let mut out = Vec::new();
    DynamicImage::ImageRgb8(img).write_to(&mut Cursor::new(&mut out), ImageFormat::Png)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::GenericImageView;

    #[test]
    fn output_is_deterministic() {
        let first = generate("example.com").unwrap();
        let second = generate("example.com").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn output_is_a_32x32_png() {
        let bytes = generate("example.com").unwrap();
        let img = image::load_from_memory(&bytes).unwrap();
        assert_eq!(img.dimensions(), (ICON_SIZE, ICON_SIZE));
        assert_eq!(
            image::guess_format(&bytes).unwrap(),
            image::ImageFormat::Png
        );
    }

    #[test]
    fn different_domains_get_different_colours() {
        let a = image::load_from_memory(&generate("example.com").unwrap()).unwrap();
        let b = image::load_from_memory(&generate("example.org").unwrap()).unwrap();
        assert_ne!(a.get_pixel(0, 0), b.get_pixel(0, 0));
    }

    #[test]
    fn fill_colour_matches_domain_digest() {
        let digest = Sha256::digest(b"example.com");
        let img = image::load_from_memory(&generate("example.com").unwrap()).unwrap();
        let pixel = img.get_pixel(16, 16);
        assert_eq!(&pixel.0[..3], &digest[..3]);
    }
}
