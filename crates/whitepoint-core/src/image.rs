//! Decoded linear image buffers with an explicit channel order.

use serde::{Deserialize, Serialize};

use crate::error::{Result, WbError};
use crate::parallel::{parallel_fold_reduce, parallel_for_each_chunk_mut};

/// Interleaved sample order of a 3-channel buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelOrder {
    #[default]
    Rgb,
    Bgr,
}

impl ChannelOrder {
    /// Positions of red, green and blue inside one pixel.
    #[inline]
    pub const fn rgb_indices(self) -> [usize; 3] {
        match self {
            Self::Rgb => [0, 1, 2],
            Self::Bgr => [2, 1, 0],
        }
    }

    /// Read a pixel stored in this order as `[r, g, b]`.
    #[inline]
    pub fn to_rgb(self, px: &[f32]) -> [f32; 3] {
        let [ri, gi, bi] = self.rgb_indices();
        [px[ri], px[gi], px[bi]]
    }

    /// Lay out an `[r, g, b]` triple in this order.
    #[inline]
    pub fn arrange<T: Copy>(self, rgb: [T; 3]) -> [T; 3] {
        match self {
            Self::Rgb => rgb,
            Self::Bgr => [rgb[2], rgb[1], rgb[0]],
        }
    }
}

impl std::str::FromStr for ChannelOrder {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rgb" => Ok(Self::Rgb),
            "bgr" => Ok(Self::Bgr),
            _ => Err(format!("Unknown channel order: {} (expected rgb or bgr)", s)),
        }
    }
}

/// Linear, 3-channel interleaved f32 image.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearImage {
    pub width: u32,
    pub height: u32,
    pub data: Vec<f32>,
    pub order: ChannelOrder,
}

impl LinearImage {
    /// Wrap an interleaved 3-channel buffer.
    ///
    /// # Errors
    /// `WbError::BufferLength` when `data.len() != width * height * 3`.
    pub fn new(width: u32, height: u32, data: Vec<f32>, order: ChannelOrder) -> Result<Self> {
        let expected = width as usize * height as usize * 3;
        if data.len() != expected {
            return Err(WbError::BufferLength {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
            order,
        })
    }

    /// Like [`LinearImage::new`] but checks a caller-reported channel count first.
    pub fn from_interleaved(
        width: u32,
        height: u32,
        channels: usize,
        data: Vec<f32>,
        order: ChannelOrder,
    ) -> Result<Self> {
        if channels != 3 {
            return Err(WbError::ChannelCount(channels));
        }
        Self::new(width, height, data, order)
    }

    /// 8-bit samples normalized by 255.
    pub fn from_u8(width: u32, height: u32, samples: &[u8], order: ChannelOrder) -> Result<Self> {
        let data = samples.iter().map(|&v| v as f32 / 255.0).collect();
        Self::new(width, height, data, order)
    }

    /// 16-bit samples normalized by 65535.
    pub fn from_u16(width: u32, height: u32, samples: &[u16], order: ChannelOrder) -> Result<Self> {
        let data = samples.iter().map(|&v| v as f32 / 65535.0).collect();
        Self::new(width, height, data, order)
    }

    pub fn pixel_count(&self) -> usize {
        self.data.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The `[r, g, b]` value at `(x, y)`.
    pub fn pixel_rgb(&self, x: u32, y: u32) -> [f32; 3] {
        let offset = (y as usize * self.width as usize + x as usize) * 3;
        self.order.to_rgb(&self.data[offset..offset + 3])
    }

    /// Mean of each channel as `[r, g, b]`; zeros for an empty image.
    pub fn channel_means(&self) -> [f64; 3] {
        if self.is_empty() {
            return [0.0; 3];
        }
        let order = self.order;
        let sums = parallel_fold_reduce(
            &self.data,
            3,
            || [0.0f64; 3],
            |mut acc, px| {
                let [r, g, b] = order.to_rgb(px);
                acc[0] += r as f64;
                acc[1] += g as f64;
                acc[2] += b as f64;
                acc
            },
            |a, b| [a[0] + b[0], a[1] + b[1], a[2] + b[2]],
        );
        let n = self.pixel_count() as f64;
        [sums[0] / n, sums[1] / n, sums[2] / n]
    }

    /// Rewrite the buffer into `order` in place.
    pub fn reorder(&mut self, order: ChannelOrder) {
        if self.order == order {
            return;
        }
        parallel_for_each_chunk_mut(&mut self.data, 3, |px| px.swap(0, 2));
        self.order = order;
    }
}
