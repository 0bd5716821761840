//! Image re-hosting: fetch the source image, cap its width, upload the
//! bytes to the content store's asset endpoint.
//!
//! Every failure here is product-local: the caller skips the product and
//! carries on with the rest of the batch.

use image::ImageFormat;
use image::imageops::FilterType;
use tracing::{debug, instrument};
use url::Url;

use crate::content::{ContentClient, ContentStoreError};

/// Images wider than this are scaled down, preserving aspect ratio.
/// Narrower images are uploaded untouched (never upscaled).
pub const MAX_WIDTH: u32 = 1000;

const DEFAULT_FILENAME: &str = "image";
const DEFAULT_CONTENT_TYPE: &str = "image/jpeg";

/// A product-local image failure. Recoverable: skips one product only.
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    /// The source URL returned a non-success status.
    #[error("failed to fetch image {url}: status {status}")]
    Fetch { url: String, status: u16 },

    /// Network failure while fetching the source image.
    #[error("HTTP error fetching image {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The fetched bytes could not be decoded as an image.
    #[error("failed to decode image {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: image::ImageError,
    },

    /// The resized image could not be re-encoded.
    #[error("failed to re-encode image {url}: {source}")]
    Encode {
        url: String,
        #[source]
        source: image::ImageError,
    },

    /// The asset upload to the content store failed.
    #[error("failed to upload image {url}: {source}")]
    Upload {
        url: String,
        #[source]
        source: ContentStoreError,
    },
}

/// Fetch, resize, and upload one product image.
///
/// The uploaded asset keeps the original URL's last path segment as its
/// filename (falling back to `"image"`) and the source response's
/// content-type header (falling back to `"image/jpeg"`).
///
/// Returns the id of the created asset document.
///
/// # Errors
///
/// Returns [`ImageError`] on any fetch, decode, re-encode, or upload
/// failure. All variants are product-local.
#[instrument(skip(http, content))]
pub async fn rehost_image(
    http: &reqwest::Client,
    content: &ContentClient,
    source_url: &str,
) -> Result<String, ImageError> {
    let response = http
        .get(source_url)
        .send()
        .await
        .map_err(|source| ImageError::Http {
            url: source_url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(ImageError::Fetch {
            url: source_url.to_string(),
            status: status.as_u16(),
        });
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or(DEFAULT_CONTENT_TYPE)
        .to_string();

    let original = response
        .bytes()
        .await
        .map_err(|source| ImageError::Http {
            url: source_url.to_string(),
            source,
        })?
        .to_vec();

    let bytes = match scale_to_limit(&original) {
        Ok(Some(resized)) => {
            debug!(
                original_size = original.len(),
                resized_size = resized.len(),
                "Resized image to width limit"
            );
            resized
        }
        // Already within the limit: keep the original bytes untouched.
        Ok(None) => original,
        Err(ScaleError::Decode(source)) => {
            return Err(ImageError::Decode {
                url: source_url.to_string(),
                source,
            });
        }
        Err(ScaleError::Encode(source)) => {
            return Err(ImageError::Encode {
                url: source_url.to_string(),
                source,
            });
        }
    };

    let filename = filename_from_url(source_url);
    content
        .upload_image_asset(bytes, &filename, &content_type)
        .await
        .map_err(|source| ImageError::Upload {
            url: source_url.to_string(),
            source,
        })
}

enum ScaleError {
    Decode(image::ImageError),
    Encode(image::ImageError),
}

/// Scale an encoded image down to [`MAX_WIDTH`], preserving aspect ratio
/// and the original encoding.
///
/// Returns `Ok(None)` when the image is already within the limit, so the
/// caller can upload the original bytes without a lossy re-encode.
fn scale_to_limit(bytes: &[u8]) -> Result<Option<Vec<u8>>, ScaleError> {
    let format = image::guess_format(bytes).map_err(ScaleError::Decode)?;
    let decoded =
        image::load_from_memory_with_format(bytes, format).map_err(ScaleError::Decode)?;

    let (width, height) = (decoded.width(), decoded.height());
    if width <= MAX_WIDTH {
        return Ok(None);
    }

    let scaled_height = scaled_height(width, height);
    let resized = decoded.resize_exact(MAX_WIDTH, scaled_height, FilterType::Lanczos3);

    let mut out = std::io::Cursor::new(Vec::new());
    // Some decodable formats have no encoder; fall back to PNG for those.
    let target = if matches!(
        format,
        ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::Gif | ImageFormat::WebP
    ) {
        format
    } else {
        ImageFormat::Png
    };
    resized.write_to(&mut out, target).map_err(ScaleError::Encode)?;
    Ok(Some(out.into_inner()))
}

/// Height after scaling `width` down to [`MAX_WIDTH`], never below 1px.
fn scaled_height(width: u32, height: u32) -> u32 {
    let scaled = u64::from(height) * u64::from(MAX_WIDTH) / u64::from(width);
    u32::try_from(scaled.max(1)).unwrap_or(height)
}

/// Last path segment of the source URL, or `"image"` when the URL has no
/// usable segment.
fn filename_from_url(source: &str) -> String {
    Url::parse(source)
        .ok()
        .and_then(|url| {
            url.path_segments()
                .and_then(|mut segments| segments.next_back().map(ToOwned::to_owned))
        })
        .filter(|segment| !segment.is_empty())
        .unwrap_or_else(|| DEFAULT_FILENAME.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, RgbImage};

    fn encode_png(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::new(width, height));
        let mut out = std::io::Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).expect("encode png");
        out.into_inner()
    }

    fn decode(bytes: &[u8]) -> DynamicImage {
        image::load_from_memory(bytes).expect("decode")
    }

    #[test]
    fn test_wide_image_is_scaled_to_limit_preserving_ratio() {
        let bytes = encode_png(2000, 500);
        let resized = scale_to_limit(&bytes)
            .ok()
            .flatten()
            .expect("wide image should be resized");

        let img = decode(&resized);
        assert_eq!(img.width(), 1000);
        assert_eq!(img.height(), 250, "aspect ratio should be preserved");
    }

    #[test]
    fn test_narrow_image_is_not_upscaled() {
        let bytes = encode_png(640, 480);
        let result = scale_to_limit(&bytes).ok().flatten();
        assert!(result.is_none(), "images within the limit pass through");
    }

    #[test]
    fn test_exactly_limit_width_passes_through() {
        let bytes = encode_png(1000, 700);
        let result = scale_to_limit(&bytes).ok().flatten();
        assert!(result.is_none());
    }

    #[test]
    fn test_undecodable_bytes_are_a_decode_error() {
        let result = scale_to_limit(b"definitely not an image");
        assert!(matches!(result, Err(ScaleError::Decode(_))));
    }

    #[test]
    fn test_scaled_height_never_hits_zero() {
        // A 4000x1 banner must not collapse to zero height.
        assert_eq!(scaled_height(4000, 1), 1);
        assert_eq!(scaled_height(2000, 500), 250);
    }

    #[test]
    fn test_filename_from_url_takes_last_segment() {
        assert_eq!(
            filename_from_url("https://cdn.example.com/images/dune-vase.jpg"),
            "dune-vase.jpg"
        );
    }

    #[test]
    fn test_filename_from_url_ignores_query() {
        assert_eq!(
            filename_from_url("https://cdn.example.com/images/bowl.png?w=800"),
            "bowl.png"
        );
    }

    #[test]
    fn test_filename_falls_back_on_empty_segment() {
        assert_eq!(filename_from_url("https://cdn.example.com/"), "image");
        assert_eq!(filename_from_url("not a url"), "image");
    }
}
