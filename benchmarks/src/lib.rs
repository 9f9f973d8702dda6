/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

/// Create a `width` x `height` interleaved RGB image with a diagonal gradient
pub fn synthetic_rgb(width: usize, height: usize) -> Vec<u8> {
    let mut pixels = Vec::with_capacity(width * height * 3);

    for y in 0..height {
        for x in 0..width {
            pixels.push((x & 255) as u8);
            pixels.push((y & 255) as u8);
            pixels.push(((x + y) & 255) as u8);
        }
    }
    pixels
}
