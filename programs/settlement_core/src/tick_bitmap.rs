/// Tick Bitmap Module
///
/// This module implements a space-efficient bitmap for tracking initialized ticks.
/// Ticks are first compressed by the pool's tick spacing; each 256-bit word then
/// covers 256 consecutive compressed ticks. Only nonzero words are stored, in an
/// ordered map, so a search skips empty regions of the curve in one lookup.
use crate::errors::ErrorCode;
use anchor_lang::prelude::*;
use primitive_types::U256;
use std::collections::BTreeMap;

/// Number of bits in a word
pub const WORD_SIZE: i32 = 256;

/// Compresses a tick by the tick spacing, rounding toward negative infinity.
///
/// # Errors
/// * `ErrorCode::InvalidTickSpacing` - If `tick_spacing` is zero
pub fn compress_tick(tick: i32, tick_spacing: u32) -> Result<i32> {
    require!(tick_spacing != 0, ErrorCode::InvalidTickSpacing);
    let spacing = i64::from(tick_spacing);
    Ok(i64::from(tick).div_euclid(spacing) as i32)
}

/// Word index and bit index of a compressed tick.
pub fn position(compressed: i32) -> (i32, u32) {
    (compressed >> 8, compressed.rem_euclid(WORD_SIZE) as u32)
}

/// Mask of bits at positions `>= bit`.
fn mask_at_or_above(bit: u32) -> U256 {
    !((U256::one() << bit) - U256::one())
}

/// Mask of bits at positions `<= bit`.
fn mask_at_or_below(bit: u32) -> U256 {
    if bit == 255 {
        U256::MAX
    } else {
        (U256::one() << (bit + 1)) - U256::one()
    }
}

/// Bitmap over the initialized ticks of one pool.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickBitmap {
    words: BTreeMap<i32, U256>,
}

impl TickBitmap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggles the initialized bit of `tick`.
    ///
    /// # Errors
    /// * `ErrorCode::InvalidTickRange` - If the tick is not a multiple of the spacing
    pub fn flip_tick(&mut self, tick: i32, tick_spacing: u32) -> Result<()> {
        require!(
            i64::from(tick) % i64::from(tick_spacing.max(1)) == 0,
            ErrorCode::InvalidTickRange
        );
        let (word_pos, bit_pos) = position(compress_tick(tick, tick_spacing)?);

        let word = self.words.entry(word_pos).or_insert_with(U256::zero);
        *word = *word ^ (U256::one() << bit_pos);
        if word.is_zero() {
            self.words.remove(&word_pos);
        }
        Ok(())
    }

    pub fn is_tick_initialized(&self, tick: i32, tick_spacing: u32) -> bool {
        let Ok(compressed) = compress_tick(tick, tick_spacing) else {
            return false;
        };
        if i64::from(compressed) * i64::from(tick_spacing) != i64::from(tick) {
            return false;
        }
        let (word_pos, bit_pos) = position(compressed);
        self.words
            .get(&word_pos)
            .is_some_and(|word| word.bit(bit_pos as usize))
    }

    /// Nearest initialized tick strictly greater than `tick`.
    ///
    /// Returns `None` when no initialized tick lies above, i.e. the search ran
    /// into the pool boundary.
    pub fn next_initialized_tick_above(&self, tick: i32, tick_spacing: u32) -> Option<i32> {
        let start = compress_tick(tick, tick_spacing).ok()?.checked_add(1)?;
        let (word_pos, bit_pos) = position(start);

        if let Some(word) = self.words.get(&word_pos) {
            let masked = *word & mask_at_or_above(bit_pos);
            if !masked.is_zero() {
                return Some(decompress(word_pos, masked.trailing_zeros(), tick_spacing));
            }
        }

        self.words
            .range(word_pos + 1..)
            .next()
            .map(|(word_pos, word)| decompress(*word_pos, word.trailing_zeros(), tick_spacing))
    }

    /// Nearest initialized tick at or below `tick`.
    ///
    /// Returns `None` when no initialized tick lies at or below, i.e. the
    /// search ran into the pool boundary.
    pub fn next_initialized_tick_at_or_below(&self, tick: i32, tick_spacing: u32) -> Option<i32> {
        let start = compress_tick(tick, tick_spacing).ok()?;
        let (word_pos, bit_pos) = position(start);

        if let Some(word) = self.words.get(&word_pos) {
            let masked = *word & mask_at_or_below(bit_pos);
            if !masked.is_zero() {
                return Some(decompress(word_pos, 255 - masked.leading_zeros(), tick_spacing));
            }
        }

        self.words
            .range(..word_pos)
            .next_back()
            .map(|(word_pos, word)| {
                decompress(*word_pos, 255 - word.leading_zeros(), tick_spacing)
            })
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

fn decompress(word_pos: i32, bit_pos: u32, tick_spacing: u32) -> i32 {
    let compressed = i64::from(word_pos) * i64::from(WORD_SIZE) + i64::from(bit_pos);
    (compressed * i64::from(tick_spacing)) as i32
}
