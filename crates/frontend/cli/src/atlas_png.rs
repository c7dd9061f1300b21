//! RGBA PNG output for composed atlases.

use crate::{write_bytes, Result};
use lsmap_core::types::Bitmap;
use std::path::Path;

pub fn encode(bitmap: &Bitmap) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, bitmap.width, bitmap.height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&bitmap.to_rgba8())?;
        writer.finish()?;
    }
    Ok(out)
}

pub fn save(bitmap: &Bitmap, path: &Path) -> Result<()> {
    log::debug!(
        "Encoding {}x{} atlas to {}",
        bitmap.width,
        bitmap.height,
        path.display()
    );
    write_bytes(path, encode(bitmap)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(bytes: &[u8]) -> (png::OutputInfo, Vec<u8>) {
        let decoder = png::Decoder::new(bytes);
        let mut reader = decoder.read_info().expect("read info");
        let mut buf = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buf).expect("frame");
        buf.truncate(info.buffer_size());
        (info, buf)
    }

    #[test]
    fn test_encode_preserves_pixels_and_alpha() {
        let mut bitmap = Bitmap::new(3, 2);
        bitmap.set(0, 0, 0x88FF0000);
        bitmap.set(2, 1, 0xFF00FF00);

        let (info, data) = decode(&encode(&bitmap).expect("encode"));
        assert_eq!((info.width, info.height), (3, 2));
        assert_eq!(info.color_type, png::ColorType::Rgba);
        assert_eq!(data, bitmap.to_rgba8());
        assert_eq!(&data[0..4], &[0xFF, 0x00, 0x00, 0x88]);
    }
}
