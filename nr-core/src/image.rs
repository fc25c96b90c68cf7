use crate::{RgbBuffers, RootBasins, Size};

/// Renders finished rasters into images.
#[derive(Default)]
pub struct Renderer {}

impl Renderer {
    /// Render Newton basins into an image.
    ///
    /// Each root gets its own hue, evenly spaced around the color wheel; unclassified
    /// pixels are black.
    pub fn render_basins(&self, basins: &RootBasins) -> Result<image::DynamicImage, String> {
        let size = basins.size;
        if basins.data.len() != size.pixels() {
            return Err(format!(
                "error: data size != width * height: {} != {} * {}",
                basins.data.len(),
                size.width,
                size.height
            ));
        }
        // Class 0 is "unclassified"; the rest are roots.
        let roots = basins.classes.saturating_sub(1).max(1);

        let pixel_values = basins.data.iter().map(|v| match *v {
            0 => image::Rgb([0, 0, 0]),
            class => basin_to_rgb(roots, class - 1),
        });

        let (width, height) = dimensions(size)?;
        let mut img = image::ImageBuffer::<image::Rgb<u8>, _>::new(width, height);
        img.pixels_mut()
            .zip(pixel_values)
            .for_each(|(pixel, value)| {
                *pixel = value;
            });

        Ok(img.into())
    }

    /// Interleave the red, green and blue channels into an image.
    pub fn render_rgb(&self, buffers: &RgbBuffers) -> Result<image::DynamicImage, String> {
        let size = buffers.size;
        for (name, channel) in [
            ("red", &buffers.red),
            ("green", &buffers.green),
            ("blue", &buffers.blue),
        ] {
            if channel.len() != size.pixels() {
                return Err(format!(
                    "error: {} channel size != width * height: {} != {} * {}",
                    name,
                    channel.len(),
                    size.width,
                    size.height
                ));
            }
        }

        let pixel_values = buffers
            .red
            .iter()
            .zip(&buffers.green)
            .zip(&buffers.blue)
            .map(|((r, g), b)| image::Rgb([*r, *g, *b]));

        let (width, height) = dimensions(size)?;
        let mut img = image::ImageBuffer::<image::Rgb<u8>, _>::new(width, height);
        img.pixels_mut()
            .zip(pixel_values)
            .for_each(|(pixel, value)| {
                *pixel = value;
            });

        Ok(img.into())
    }
}

/// Image dimensions for `size`, if they fit the image library's `u32` coordinates.
fn dimensions(size: Size) -> Result<(u32, u32), String> {
    match (u32::try_from(size.width), u32::try_from(size.height)) {
        (Ok(width), Ok(height)) => Ok((width, height)),
        _ => Err(format!(
            "error: image too large: {} * {}",
            size.width, size.height
        )),
    }
}

fn basin_to_rgb(num_roots: u16, which_root: u16) -> image::Rgb<u8> {
    let hue = (f64::from(which_root) * 360.0 / f64::from(num_roots)) % 360.0;
    let (r, g, b) = hsv::hsv_to_rgb(hue, 1.0, 1.0);
    image::Rgb([r, g, b])
}
