use image::DynamicImage;

use crate::{
    error::{CreditError, Result},
    image_utils::{downsample_gray, mean_intensity},
};

pub const DEFAULT_HASH_SIZE: u32 = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitHash {
    blocks: Vec<u64>,
    bit_len: usize,
}

impl BitHash {
    fn from_bits<I: IntoIterator<Item = bool>>(bits: I) -> Self {
        let mut blocks = Vec::new();
        let mut bit_len = 0;

        for bit in bits {
            if bit_len % 64 == 0 {
                blocks.push(0u64);
            }
            if bit {
                let last = blocks.len() - 1;
                blocks[last] |= 1u64 << (bit_len % 64);
            }
            bit_len += 1;
        }

        Self { blocks, bit_len }
    }

    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    pub fn count_ones(&self) -> u32 {
        self.blocks.iter().map(|b| b.count_ones()).sum()
    }

    // None means the hashes are incomparable (different bit lengths); callers
    // must treat that as "no match", never as distance zero.
    pub fn distance(&self, other: &BitHash) -> Option<u32> {
        if self.bit_len != other.bit_len {
            return None;
        }

        Some(
            self.blocks
                .iter()
                .zip(other.blocks.iter())
                .map(|(a, b)| (a ^ b).count_ones())
                .sum(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFingerprint {
    pub dhash: BitHash,
    pub ahash: BitHash,
}

impl ImageFingerprint {
    pub fn similarity(&self, other: &ImageFingerprint) -> Option<f64> {
        let dhash_distance = self.dhash.distance(&other.dhash)?;
        let ahash_distance = self.ahash.distance(&other.ahash)?;

        let dhash_similarity = 1.0 - dhash_distance as f64 / self.dhash.bit_len() as f64;
        let ahash_similarity = 1.0 - ahash_distance as f64 / self.ahash.bit_len() as f64;

        Some((dhash_similarity + ahash_similarity) / 2.0)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PerceptualHasher {
    size: u32,
}

impl PerceptualHasher {
    pub fn new(size: u32) -> Result<Self> {
        if size == 0 {
            return Err(CreditError::InvalidParameter(
                "hash size must be at least 1".into(),
            ));
        }
        Ok(Self { size })
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn difference_hash(&self, image: &DynamicImage) -> Result<BitHash> {
        let gray = downsample_gray(image, self.size + 1, self.size)?;

        let mut bits = Vec::with_capacity((self.size * self.size) as usize);
        for row in 0..self.size {
            for col in 0..self.size {
                let left = gray.get_pixel(col, row)[0];
                let right = gray.get_pixel(col + 1, row)[0];
                bits.push(left > right);
            }
        }

        Ok(BitHash::from_bits(bits))
    }

    pub fn average_hash(&self, image: &DynamicImage) -> Result<BitHash> {
        let gray = downsample_gray(image, self.size, self.size)?;
        let mean = mean_intensity(&gray);

        let mut bits = Vec::with_capacity((self.size * self.size) as usize);
        for row in 0..self.size {
            for col in 0..self.size {
                bits.push(gray.get_pixel(col, row)[0] as f64 >= mean);
            }
        }

        Ok(BitHash::from_bits(bits))
    }

    pub fn fingerprint(&self, image: &DynamicImage) -> Result<ImageFingerprint> {
        Ok(ImageFingerprint {
            dhash: self.difference_hash(image)?,
            ahash: self.average_hash(image)?,
        })
    }
}

impl Default for PerceptualHasher {
    fn default() -> Self {
        Self {
            size: DEFAULT_HASH_SIZE,
        }
    }
}
