use jpeg_encoder::{ColorType, Encoder};
use zune_core::colorspace::ColorSpace;
use zune_core::options::DecoderOptions;
use zune_jpeg::JpegDecoder;
use zune_luma::errors::LumaErrors;
use zune_luma::luma::luma;
use zune_luma::options::LumaOptions;
use zune_luma_bin::errors::ZuneLumaErrors;
use zune_luma_bin::workflow::{benchmark, transcode};

/// Encode a solid color rgb jpeg at full quality
fn solid_jpeg(width: u16, height: u16, rgb: [u8; 3]) -> Vec<u8> {
    let pixels = rgb.repeat(usize::from(width) * usize::from(height));
    let mut out = vec![];

    Encoder::new(&mut out, 100)
        .encode(&pixels, width, height, ColorType::Rgb)
        .unwrap();
    out
}

fn decode(data: &[u8], colorspace: ColorSpace) -> (Vec<u8>, usize, usize) {
    let options = DecoderOptions::default().jpeg_set_out_colorspace(colorspace);
    let mut decoder = JpegDecoder::new_with_options(data, options);
    let pixels = decoder.decode().unwrap();
    let (width, height) = decoder.dimensions().unwrap();
    (pixels, width, height)
}

#[test]
fn grayscale_output_matches_luma_of_input() {
    let input = solid_jpeg(64, 48, [200, 100, 50]);
    let mut output = vec![];

    transcode(&input, LumaOptions::default().set_workers(4), 100, &mut output).unwrap();

    let (rgb, ..) = decode(&input, ColorSpace::RGB);
    let (gray, width, height) = decode(&output, ColorSpace::Luma);

    assert_eq!((width, height), (64, 48));
    assert_eq!(gray.len(), 64 * 48);

    for (px, g) in rgb.chunks_exact(3).zip(gray.iter()) {
        let expected = i32::from(luma(px[0], px[1], px[2]));
        // jpeg is lossy, a flat image only drifts by rounding
        assert!(
            (expected - i32::from(*g)).abs() <= 3,
            "expected around {expected}, found {g}"
        );
    }
}

#[test]
fn thread_count_does_not_change_output_file() {
    let input = solid_jpeg(40, 33, [12, 240, 90]);

    let mut single = vec![];
    transcode(&input, LumaOptions::default().set_workers(1), 90, &mut single).unwrap();

    for workers in [2, 5, 8, 33] {
        let mut out = vec![];
        transcode(&input, LumaOptions::default().set_workers(workers), 90, &mut out).unwrap();
        assert_eq!(out, single, "{workers} workers produced a different file");
    }
}

#[test]
fn too_many_threads_writes_nothing() {
    let input = solid_jpeg(16, 2, [1, 2, 3]);
    let mut output = vec![];

    let result = transcode(&input, LumaOptions::default().set_workers(4), 90, &mut output);

    assert!(matches!(
        result,
        Err(ZuneLumaErrors::ConversionErrors(LumaErrors::TooFewRows {
            rows:    2,
            workers: 4
        }))
    ));
    assert!(output.is_empty());
}

#[test]
fn garbage_input_is_a_decode_error() {
    let mut output = vec![];
    let result = transcode(&[0, 1, 2, 3], LumaOptions::default(), 90, &mut output);

    assert!(result.is_err());
    assert!(output.is_empty());
}

#[test]
fn benchmark_writes_csv_per_thread_count() {
    let input = solid_jpeg(32, 16, [100, 100, 100]);
    let mut output = vec![];
    let mut csv = vec![];

    let timings = benchmark(&input, 4, 90, &mut output, &mut csv).unwrap();

    assert_eq!(
        timings.iter().map(|x| x.0).collect::<Vec<_>>(),
        vec![1, 2, 3, 4]
    );

    let csv = String::from_utf8(csv).unwrap();
    let lines = csv.lines().collect::<Vec<_>>();
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[0], "threads,time");
    assert!(lines[3].starts_with("3,"));
    assert!(!output.is_empty());
}

#[test]
fn benchmark_stops_at_image_height() {
    let input = solid_jpeg(8, 3, [100, 100, 100]);
    let mut output = vec![];
    let mut csv = vec![];

    let timings = benchmark(&input, 10, 90, &mut output, &mut csv).unwrap();
    assert_eq!(timings.len(), 3);
}

#[test]
fn benchmark_with_no_threads_writes_nothing() {
    let input = solid_jpeg(8, 8, [100, 100, 100]);
    let mut output = vec![];
    let mut csv = vec![];

    assert!(benchmark(&input, 0, 90, &mut output, &mut csv).is_err());
    assert!(csv.is_empty());
    assert!(output.is_empty());
}
