//! Image preprocessing variants for multi-pass OCR.
//!
//! Scans of social posts are often low-contrast screenshots or phone photos.
//! Each variant binarizes the page differently; the extractor OCRs all of them
//! and keeps whichever yields the most usable text.

use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, Luma};
use imageproc::contrast::{otsu_level, threshold};
use imageproc::filter::{gaussian_blur_f32, median_filter};

const UPSCALE: f32 = 1.8;
/// OpenCV's sigma for a 31px Gaussian kernel.
const ADAPTIVE_SIGMA: f32 = 5.0;
const ADAPTIVE_OFFSET: i16 = 11;

pub struct OcrVariant {
    pub name: &'static str,
    pub image: GrayImage,
}

/// Grayscale upscaled copy plus three binarized versions of it.
pub fn build_ocr_variants(img: &DynamicImage) -> Vec<OcrVariant> {
    let gray = img.to_luma8();
    let width = ((gray.width() as f32 * UPSCALE).round() as u32).max(1);
    let height = ((gray.height() as f32 * UPSCALE).round() as u32).max(1);
    let gray_up = imageops::resize(&gray, width, height, FilterType::CatmullRom);

    let otsu = threshold(&gray_up, otsu_level(&gray_up));
    let adaptive = gaussian_adaptive_threshold(&gray_up);
    let denoised = median_filter(&gray_up, 1, 1);
    let denoise_otsu = threshold(&denoised, otsu_level(&denoised));

    vec![
        OcrVariant {
            name: "gray_up",
            image: gray_up,
        },
        OcrVariant {
            name: "otsu",
            image: otsu,
        },
        OcrVariant {
            name: "adaptive",
            image: adaptive,
        },
        OcrVariant {
            name: "denoise_otsu",
            image: denoise_otsu,
        },
    ]
}

/// Compare each pixel against its Gaussian-weighted neighbourhood minus a
/// fixed offset. imageproc's own `adaptive_threshold` is mean-based, so the
/// weighted mean comes from `gaussian_blur_f32` instead.
pub fn gaussian_adaptive_threshold(img: &GrayImage) -> GrayImage {
    let local_mean = gaussian_blur_f32(img, ADAPTIVE_SIGMA);
    GrayImage::from_fn(img.width(), img.height(), |x, y| {
        let value = img.get_pixel(x, y)[0] as i16;
        let limit = local_mean.get_pixel(x, y)[0] as i16 - ADAPTIVE_OFFSET;
        if value > limit {
            Luma([255])
        } else {
            Luma([0])
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Left half dark, right half light.
    fn two_tone(width: u32, height: u32) -> GrayImage {
        GrayImage::from_fn(width, height, |x, _| {
            if x < width / 2 {
                Luma([30])
            } else {
                Luma([220])
            }
        })
    }

    fn is_binary(img: &GrayImage) -> bool {
        img.pixels().all(|p| p[0] == 0 || p[0] == 255)
    }

    #[test]
    fn test_otsu_separates_two_tones() {
        let img = two_tone(20, 10);
        let level = otsu_level(&img);
        assert!((30..220).contains(&level));

        let binary = threshold(&img, level);
        assert_eq!(binary.get_pixel(0, 0)[0], 0);
        assert_eq!(binary.get_pixel(19, 9)[0], 255);
    }

    #[test]
    fn test_otsu_uniform_image() {
        let img = GrayImage::from_pixel(8, 8, Luma([128]));
        let binary = threshold(&img, otsu_level(&img));
        let first = binary.get_pixel(0, 0)[0];
        assert!(binary.pixels().all(|p| p[0] == first));
    }

    #[test]
    fn test_median_removes_salt_noise() {
        let mut img = GrayImage::from_pixel(5, 5, Luma([10]));
        img.put_pixel(2, 2, Luma([255]));
        let filtered = median_filter(&img, 1, 1);
        assert!(filtered.pixels().all(|p| p[0] == 10));
    }

    #[test]
    fn test_gaussian_adaptive_keeps_flat_regions_white() {
        // A flat region sits above its own blurred mean minus the offset.
        let img = GrayImage::from_pixel(12, 12, Luma([90]));
        let binary = gaussian_adaptive_threshold(&img);
        assert!(binary.pixels().all(|p| p[0] == 255));

        // A dark stroke on a light page falls below the local limit.
        let mut page = GrayImage::from_pixel(24, 24, Luma([230]));
        for y in 0..24 {
            page.put_pixel(12, y, Luma([20]));
        }
        let binary = gaussian_adaptive_threshold(&page);
        assert_eq!(binary.get_pixel(12, 12)[0], 0);
        assert_eq!(binary.get_pixel(2, 12)[0], 255);
    }

    #[test]
    fn test_build_variants() {
        let img = DynamicImage::ImageLuma8(two_tone(20, 10));
        let variants = build_ocr_variants(&img);

        let names: Vec<&str> = variants.iter().map(|v| v.name).collect();
        assert_eq!(names, vec!["gray_up", "otsu", "adaptive", "denoise_otsu"]);

        for variant in &variants {
            assert_eq!(variant.image.dimensions(), (36, 18));
        }
        for variant in &variants[1..] {
            assert!(is_binary(&variant.image), "{} not binary", variant.name);
        }
    }
}
