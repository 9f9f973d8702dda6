/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Errors possible while reading, converting and writing an image
use std::fmt::{Debug, Display, Formatter};

use zune_jpeg::errors::DecodeErrors;
use zune_luma::errors::LumaErrors;

pub enum ZuneLumaErrors {
    IoErrors(std::io::Error),
    JpegDecodeErrors(DecodeErrors),
    JpegEncodeErrors(jpeg_encoder::EncodingError),
    ConversionErrors(LumaErrors),
    /// Decoder output is not three interleaved components, expected bytes vs found bytes
    UnsupportedComponents(usize, usize),
    /// Image is too large for the jpeg encoder
    DimensionsTooLarge(usize, usize),
    NoImageInfo,
    GenericString(String)
}

impl Debug for ZuneLumaErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IoErrors(err) => writeln!(f, "I/O error: {err}"),
            Self::JpegDecodeErrors(err) => writeln!(f, "Jpeg decoding failed: {err:?}"),
            Self::JpegEncodeErrors(err) => writeln!(f, "Jpeg encoding failed: {err:?}"),
            Self::ConversionErrors(err) => writeln!(f, "{err:?}"),
            Self::UnsupportedComponents(expected, found) => {
                writeln!(
                    f,
                    "Expected {expected} bytes of interleaved RGB from the decoder but found {found}"
                )
            }
            Self::DimensionsTooLarge(width, height) => {
                writeln!(
                    f,
                    "Image dimensions {width}x{height} exceed what a jpeg can hold"
                )
            }
            Self::NoImageInfo => writeln!(f, "Decoder did not report image information"),
            Self::GenericString(err) => writeln!(f, "{err}")
        }
    }
}

impl Display for ZuneLumaErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{self:?}")
    }
}

impl std::error::Error for ZuneLumaErrors {}

impl From<std::io::Error> for ZuneLumaErrors {
    fn from(err: std::io::Error) -> Self {
        ZuneLumaErrors::IoErrors(err)
    }
}

impl From<DecodeErrors> for ZuneLumaErrors {
    fn from(err: DecodeErrors) -> Self {
        ZuneLumaErrors::JpegDecodeErrors(err)
    }
}

impl From<jpeg_encoder::EncodingError> for ZuneLumaErrors {
    fn from(err: jpeg_encoder::EncodingError) -> Self {
        ZuneLumaErrors::JpegEncodeErrors(err)
    }
}

impl From<LumaErrors> for ZuneLumaErrors {
    fn from(err: LumaErrors) -> Self {
        ZuneLumaErrors::ConversionErrors(err)
    }
}

impl From<String> for ZuneLumaErrors {
    fn from(s: String) -> ZuneLumaErrors {
        ZuneLumaErrors::GenericString(s)
    }
}
