use crate::refs::{ObjectReferences, RefType};
use image::{ColorType, DynamicImage, GenericImageView, ImageFormat};
use miniz_oxide::deflate::{compress_to_vec_zlib, CompressionLevel};
use pdf_writer::{Filter, Finish, Pdf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImageError {
    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Base64(#[from] base64::DecodeError),

    #[error("image has no pixels ({width}x{height})")]
    Empty { width: u32, height: u32 },

    #[error("image data is empty")]
    NoData,
}

/// An image that has already been encoded for embedding. Encoding happens when
/// the image is created so that a broken image is discovered while the page is
/// being laid out rather than when the document is written.
#[derive(Debug, Clone)]
pub struct Image {
    pub width: u32,
    pub height: u32,
    filter: Filter,
    bytes: Vec<u8>,
    mask: Option<Vec<u8>>,
}

impl Image {
    /// Decode an encoded image (PNG, JPEG, ...) from memory. RGB JPEGs are kept
    /// as-is and embedded directly; everything else is re-encoded.
    pub fn from_bytes(data: &[u8]) -> Result<Image, ImageError> {
        if data.is_empty() {
            return Err(ImageError::NoData);
        }

        let format = image::guess_format(data)?;
        let image = image::load_from_memory_with_format(data, format)?;

        match (format, image.color()) {
            (ImageFormat::Jpeg, ColorType::Rgb8) => {
                let (width, height) = Self::check_dimensions(&image)?;
                Ok(Image {
                    width,
                    height,
                    filter: Filter::DctDecode,
                    bytes: data.to_vec(),
                    mask: None,
                })
            }
            _ => Self::new_raster(&image),
        }
    }

    /// Encode an already decoded image as Flate-compressed RGB, with a soft mask
    /// if the image has an alpha channel
    pub fn new_raster(image: &DynamicImage) -> Result<Image, ImageError> {
        let (width, height) = Self::check_dimensions(image)?;
        let level = CompressionLevel::DefaultLevel as u8;

        let mask = image.color().has_alpha().then(|| {
            let alphas: Vec<u8> = image.pixels().map(|(_, _, p)| p.0[3]).collect();
            compress_to_vec_zlib(&alphas, level)
        });
        let bytes = compress_to_vec_zlib(image.to_rgb8().as_raw(), level);

        Ok(Image {
            width,
            height,
            filter: Filter::FlateDecode,
            bytes,
            mask,
        })
    }

    fn check_dimensions(image: &DynamicImage) -> Result<(u32, u32), ImageError> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(ImageError::Empty { width, height });
        }
        Ok((width, height))
    }

    /// Width divided by height
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    pub fn has_mask(&self) -> bool {
        self.mask.is_some()
    }

    pub(crate) fn write(&self, refs: &mut ObjectReferences, image_index: usize, writer: &mut Pdf) {
        let id = refs.gen(RefType::Image(image_index));
        let mask_id = self
            .mask
            .as_ref()
            .map(|_| refs.gen(RefType::ImageMask(image_index)));

        let mut image = writer.image_xobject(id, self.bytes.as_slice());
        image.filter(self.filter);
        image.width(self.width as i32);
        image.height(self.height as i32);
        image.color_space().device_rgb();
        image.bits_per_component(8);
        if let Some(mask_id) = mask_id {
            image.s_mask(mask_id);
        }
        image.finish();

        if let (Some(mask_id), Some(mask)) = (mask_id, &self.mask) {
            let mut s_mask = writer.image_xobject(mask_id, mask.as_slice());
            s_mask.filter(Filter::FlateDecode);
            s_mask.width(self.width as i32);
            s_mask.height(self.height as i32);
            s_mask.color_space().device_gray();
            s_mask.bits_per_component(8);
        }
    }
}
