/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Jpeg decoding into and encoding out of a conversion buffer
use std::io::Write;

use jpeg_encoder::{ColorType, Density, Encoder};
use log::{debug, warn};
use zune_core::colorspace::ColorSpace;
use zune_core::options::DecoderOptions;
use zune_jpeg::JpegDecoder;
use zune_luma::coordinator::{Coordinator, PreparedRound};
use zune_luma::options::LumaOptions;
use zune_luma::INPUT_COMPONENTS;

use crate::errors::ZuneLumaErrors;

/// Pixel density carried from the input file to the output file
///
/// `unit` follows the JFIF APP0 convention, 0 for none/aspect ratio,
/// 1 for dots per inch, 2 for dots per centimetre.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub struct JpegDensity {
    pub unit: u8,
    pub x:    u16,
    pub y:    u16
}

impl JpegDensity {
    /// Density in the form the encoder writes it
    pub fn to_encoder_density(self) -> Density {
        match self.unit {
            1 => Density::Inch {
                x: self.x,
                y: self.y
            },
            2 => Density::Centimeter {
                x: self.x,
                y: self.y
            },
            0 => Density::None,
            unit => {
                warn!("Unknown density unit {unit}, writing no density");
                Density::None
            }
        }
    }
}

/// An RGB jpeg decoded into memory
pub struct DecodedJpeg {
    pub width:   usize,
    pub height:  usize,
    pub density: JpegDensity,
    pub pixels:  Vec<u8>
}

fn decoder_options() -> DecoderOptions {
    DecoderOptions::default().jpeg_set_out_colorspace(ColorSpace::RGB)
}

fn read_headers(decoder: &mut JpegDecoder<&[u8]>) -> Result<(usize, usize, JpegDensity), ZuneLumaErrors> {
    decoder.decode_headers()?;

    let info = decoder.info().ok_or(ZuneLumaErrors::NoImageInfo)?;
    let density = JpegDensity {
        unit: info.pixel_density,
        x:    info.x_density,
        y:    info.y_density
    };
    let (width, height) = (usize::from(info.width), usize::from(info.height));

    debug!("Jpeg is {width}x{height}, density {density:?}");

    Ok((width, height, density))
}

fn check_rgb_output(decoder: &JpegDecoder<&[u8]>, expected: usize) -> Result<(), ZuneLumaErrors> {
    let found = decoder.output_buffer_size().ok_or(ZuneLumaErrors::NoImageInfo)?;

    if found != expected {
        return Err(ZuneLumaErrors::UnsupportedComponents(expected, found));
    }
    Ok(())
}

/// Decode `data` straight into the input region of a new conversion
///
/// The worker count is validated against the image height before the
/// buffer is allocated.
///
/// # Errors
/// Decoding errors, configuration and allocation errors of the conversion, or
/// [`ZuneLumaErrors::UnsupportedComponents`] if the decoder cannot produce RGB.
pub fn decode_into_round(
    data: &[u8], options: LumaOptions
) -> Result<(PreparedRound, JpegDensity), ZuneLumaErrors> {
    let mut decoder = JpegDecoder::new_with_options(data, decoder_options());
    let (width, height, density) = read_headers(&mut decoder)?;

    let mut round = Coordinator::new(options).prepare(width, height)?;

    check_rgb_output(&decoder, round.input_mut().len())?;
    decoder.decode_into(round.input_mut())?;

    Ok((round, density))
}

/// Decode `data` into its own buffer
///
/// # Errors
/// Decoding errors, or [`ZuneLumaErrors::UnsupportedComponents`] if the
/// decoder cannot produce RGB.
pub fn decode_rgb(data: &[u8]) -> Result<DecodedJpeg, ZuneLumaErrors> {
    let mut decoder = JpegDecoder::new_with_options(data, decoder_options());
    let (width, height, density) = read_headers(&mut decoder)?;

    check_rgb_output(&decoder, width * height * INPUT_COMPONENTS)?;
    let pixels = decoder.decode()?;

    Ok(DecodedJpeg {
        width,
        height,
        density,
        pixels
    })
}

/// Encode single channel `pixels` as a grayscale jpeg
///
/// # Errors
/// [`ZuneLumaErrors::DimensionsTooLarge`] if a dimension does not fit in
/// a `u16`, or any encoder error.
pub fn encode_luma<W: Write>(
    pixels: &[u8], width: usize, height: usize, density: JpegDensity, quality: u8, writer: W
) -> Result<(), ZuneLumaErrors> {
    let (Ok(enc_width), Ok(enc_height)) = (u16::try_from(width), u16::try_from(height)) else {
        return Err(ZuneLumaErrors::DimensionsTooLarge(width, height));
    };

    let mut encoder = Encoder::new(writer, quality);
    encoder.set_density(density.to_encoder_density());
    encoder.encode(pixels, enc_width, enc_height, ColorType::Luma)?;

    debug!("Encoded {width}x{height} grayscale jpeg at quality {quality}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use jpeg_encoder::Density;

    use crate::codec::JpegDensity;

    #[test]
    fn density_units_map_to_encoder() {
        let inch = JpegDensity {
            unit: 1,
            x:    300,
            y:    150
        };
        assert!(matches!(
            inch.to_encoder_density(),
            Density::Inch { x: 300, y: 150 }
        ));

        let cm = JpegDensity {
            unit: 2,
            x:    40,
            y:    40
        };
        assert!(matches!(
            cm.to_encoder_density(),
            Density::Centimeter { x: 40, y: 40 }
        ));

        assert!(matches!(
            JpegDensity::default().to_encoder_density(),
            Density::None
        ));
        let odd = JpegDensity { unit: 9, x: 1, y: 1 };
        assert!(matches!(odd.to_encoder_density(), Density::None));
    }
}
